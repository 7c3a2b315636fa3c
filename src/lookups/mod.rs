pub mod errors;

use std::collections::HashMap;
use std::fs;
use std::path::Path;
use chrono::{Locale, NaiveDate};
use log::info;
use serde::Deserialize;
use crate::lookups::errors::LookupError;

/// Locale used when a lookup has no entry for the requested one
pub const DEFAULT_LOCALE: &str = "en";

/// Key of the localized day label format, a chrono format string
const DAY_FORMAT: &str = "%A, %B %-d";

/// Localized text for weather data and page labels
pub trait Translator {
    /// Translated text for an english key, the key itself when there is no translation
    fn localize(&self, key: &str, locale: &str) -> String;

    /// Condition text and icon for a WMO weather code
    fn condition(&self, weathercode: u8, is_day: bool, locale: &str) -> Result<Condition, LookupError>;

    /// Abbreviated and full name of a compass point code
    fn azimuth(&self, code: &str, locale: &str) -> Result<AzimuthName, LookupError>;

    /// Weekday and date, e.g. "Monday, January 1"
    fn day_label(&self, date: NaiveDate, locale: &str) -> String {
        let format = self.localize(DAY_FORMAT, locale);
        date.format_localized(&format, chrono_locale(locale)).to_string()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    pub text: String,
    pub icon: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AzimuthName {
    pub abbr: String,
    pub full: String,
}

#[derive(Deserialize, Debug)]
struct ConditionTexts {
    day_text: String,
    night_text: String,
}

#[derive(Deserialize, Debug)]
struct ConditionEntry {
    icon: u16,
    day: String,
    night: String,
    #[serde(default)]
    languages: HashMap<String, ConditionTexts>,
}

/// Lookup tables for conditions, compass points and page messages.
/// Loaded once at startup and shared read only between requests.
#[derive(Debug)]
pub struct Lookups {
    conditions: HashMap<u8, ConditionEntry>,
    azimuths: HashMap<String, HashMap<String, (String, String)>>,
    messages: HashMap<String, HashMap<String, String>>,
}

impl Lookups {
    /// Loads `conditions.json`, `azimuths.json` and `messages.json` from a directory
    ///
    /// # Arguments
    ///
    /// * 'dir' - the translations directory
    pub fn load<P: AsRef<Path>>(dir: P) -> Result<Lookups, LookupError> {
        let dir = dir.as_ref();
        let lookups = Lookups::from_json(
            &fs::read_to_string(dir.join("conditions.json"))?,
            &fs::read_to_string(dir.join("azimuths.json"))?,
            &fs::read_to_string(dir.join("messages.json"))?,
        )?;

        info!("loaded {} weather conditions and {} compass points from {}",
            lookups.conditions.len(), lookups.azimuths.len(), dir.display());

        Ok(lookups)
    }

    /// Builds the lookups from json documents
    ///
    /// # Arguments
    ///
    /// * 'conditions' - weather code to icon and texts
    /// * 'azimuths' - compass point to locale to [abbr, full]
    /// * 'messages' - locale to english key to translation
    pub fn from_json(conditions: &str, azimuths: &str, messages: &str) -> Result<Lookups, LookupError> {
        let raw_conditions: HashMap<String, ConditionEntry> = serde_json::from_str(conditions)?;
        let mut conditions = HashMap::with_capacity(raw_conditions.len());
        for (code, entry) in raw_conditions {
            let code = code.parse::<u8>()
                .map_err(|e| LookupError::Document(format!("weather code {}: {}", code, e)))?;
            conditions.insert(code, entry);
        }

        Ok(Lookups {
            conditions,
            azimuths: serde_json::from_str(azimuths)?,
            messages: serde_json::from_str(messages)?,
        })
    }
}

impl Translator for Lookups {
    fn localize(&self, key: &str, locale: &str) -> String {
        self.messages
            .get(locale)
            .and_then(|m| m.get(key))
            .cloned()
            .unwrap_or_else(|| key.to_string())
    }

    fn condition(&self, weathercode: u8, is_day: bool, locale: &str) -> Result<Condition, LookupError> {
        let entry = self.conditions
            .get(&weathercode)
            .ok_or(LookupError::UnknownWeatherCode(weathercode))?;

        let period = if is_day { "day" } else { "night" };
        let text = match entry.languages.get(locale) {
            Some(texts) if is_day => texts.day_text.clone(),
            Some(texts) => texts.night_text.clone(),
            None if is_day => entry.day.clone(),
            None => entry.night.clone(),
        };

        Ok(Condition {
            text,
            icon: format!("images/icons/{}/{}.png", period, entry.icon),
        })
    }

    fn azimuth(&self, code: &str, locale: &str) -> Result<AzimuthName, LookupError> {
        let names = self.azimuths
            .get(code)
            .ok_or_else(|| LookupError::UnknownAzimuth(code.to_string()))?;

        let (abbr, full) = names
            .get(locale)
            .or_else(|| names.get(DEFAULT_LOCALE))
            .ok_or_else(|| LookupError::MissingLocale(format!("{} for {}", locale, code)))?;

        Ok(AzimuthName { abbr: abbr.clone(), full: full.clone() })
    }
}

fn chrono_locale(locale: &str) -> Locale {
    match locale {
        "fr" => Locale::fr_FR,
        _ => Locale::en_US,
    }
}
