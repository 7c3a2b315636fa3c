use std::collections::BTreeMap;
use std::env;
use std::fs;
use serde::Deserialize;
use crate::errors::ConfigError;
use crate::logging::setup_logger;

#[derive(Deserialize, Clone, Debug)]
pub struct WebServerParameters {
    pub bind_address: String,
    pub bind_port: u16,
}

#[derive(Deserialize, Clone, Debug)]
pub struct General {
    pub log_path: Option<String>,
    pub log_level: String,
    pub log_to_stdout: bool,
}

#[derive(Deserialize, Clone, Debug)]
pub struct OpenMeteoConfig {
    pub forecast_url: String,
    pub air_quality_url: String,
    pub geocoding_url: String,
    pub timeout_secs: u64,
}

#[derive(Deserialize, Clone, Debug)]
pub struct Dashboard {
    pub translations_dir: String,
    pub templates_dir: String,
    pub default_latitude: String,
    pub default_longitude: String,
    pub default_location: String,
    pub languages: BTreeMap<String, String>,
    pub cookie_max_age_days: i64,
}

#[derive(Deserialize, Clone, Debug)]
pub struct Config {
    pub web_server: WebServerParameters,
    pub general: General,
    pub open_meteo: OpenMeteoConfig,
    pub dashboard: Dashboard,
}

/// Returns a configuration struct for the application and starts logging
///
/// The config file is given with `--config=<path>` on the command line,
/// `config.toml` in the working directory is used otherwise.
pub fn config() -> Result<Config, ConfigError> {
    let args: Vec<String> = env::args().collect();
    let config_path = args
        .iter()
        .find_map(|a| a.strip_prefix("--config="))
        .unwrap_or("config.toml");

    let config = load_config(config_path)?;

    setup_logger(&config.general)?;

    Ok(config)
}

/// Loads the configuration file and returns a struct with all configuration items
///
/// # Arguments
///
/// * 'config_path' - path to the config file
fn load_config(config_path: &str) -> Result<Config, ConfigError> {
    let toml = fs::read_to_string(config_path)?;
    parse_config(&toml)
}

/// Parses and validates a configuration document
///
/// # Arguments
///
/// * 'toml' - the configuration document
fn parse_config(toml: &str) -> Result<Config, ConfigError> {
    let config: Config = toml::from_str(toml)?;

    if config.dashboard.languages.is_empty() {
        return Err(ConfigError::from("at least one language must be configured"));
    }
    if config.dashboard.cookie_max_age_days <= 0 {
        return Err(ConfigError::from("cookie_max_age_days must be positive"));
    }

    Ok(config)
}
