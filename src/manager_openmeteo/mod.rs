pub mod errors;
pub mod models;

use std::time::Duration;
use chrono::NaiveDate;
use log::debug;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use crate::initialization::OpenMeteoConfig;
use crate::manager_openmeteo::errors::OpenMeteoError;
use crate::manager_openmeteo::models::{RawAirQuality, RawForecast, RawHistory};

const FORECAST_HOURLY: &str =
    "temperature_2m,apparent_temperature,precipitation,weathercode,windspeed_10m,winddirection_10m,windgusts_10m";
const FORECAST_DAILY: &str =
    "weathercode,sunrise,sunset,apparent_temperature_max,apparent_temperature_min";
const AIR_QUALITY_HOURLY: &str =
    "pm10,nitrogen_dioxide,sulphur_dioxide,ozone,alder_pollen,birch_pollen,grass_pollen,mugwort_pollen,olive_pollen,ragweed_pollen";
const HISTORY_DAILY: &str = "temperature_2m_max,temperature_2m_min";

/// Struct for fetching forecasts, air quality, temperature history and places from Open-Meteo
pub struct OpenMeteo {
    client: Client,
    forecast_url: String,
    air_quality_url: String,
    geocoding_url: String,
}

impl OpenMeteo {
    /// Returns an OpenMeteo struct ready for fetching data
    ///
    /// # Arguments
    ///
    /// * 'config' - endpoints and timeout for the upstream API
    pub fn new(config: &OpenMeteoConfig) -> Result<OpenMeteo, OpenMeteoError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            forecast_url: config.forecast_url.clone(),
            air_quality_url: config.air_quality_url.clone(),
            geocoding_url: config.geocoding_url.clone(),
        })
    }

    /// Retrieves the hourly and daily forecast together with the current weather
    ///
    /// # Arguments
    ///
    /// * 'latitude' - latitude of the location
    /// * 'longitude' - longitude of the location
    pub async fn forecast(&self, latitude: &str, longitude: &str) -> Result<Option<RawForecast>, OpenMeteoError> {
        let params = [
            ("latitude", latitude),
            ("longitude", longitude),
            ("hourly", FORECAST_HOURLY),
            ("daily", FORECAST_DAILY),
            ("timezone", "auto"),
            ("current_weather", "true"),
        ];

        self.get_api_data(&self.forecast_url, &params).await
    }

    /// Retrieves hourly pollutant and pollen concentrations
    ///
    /// # Arguments
    ///
    /// * 'latitude' - latitude of the location
    /// * 'longitude' - longitude of the location
    pub async fn air_quality(&self, latitude: &str, longitude: &str) -> Result<Option<RawAirQuality>, OpenMeteoError> {
        let params = [
            ("latitude", latitude),
            ("longitude", longitude),
            ("hourly", AIR_QUALITY_HOURLY),
            ("timezone", "auto"),
        ];

        self.get_api_data(&self.air_quality_url, &params).await
    }

    /// Retrieves daily max and min temperatures between two dates, both included
    ///
    /// # Arguments
    ///
    /// * 'latitude' - latitude of the location
    /// * 'longitude' - longitude of the location
    /// * 'start' - first day
    /// * 'end' - last day
    pub async fn history(&self, latitude: &str, longitude: &str, start: NaiveDate, end: NaiveDate)
        -> Result<Option<RawHistory>, OpenMeteoError> {
        let start_date = start.format("%Y-%m-%d").to_string();
        let end_date = end.format("%Y-%m-%d").to_string();
        let params = [
            ("latitude", latitude),
            ("longitude", longitude),
            ("daily", HISTORY_DAILY),
            ("start_date", start_date.as_str()),
            ("end_date", end_date.as_str()),
            ("timezone", "auto"),
        ];

        self.get_api_data(&self.forecast_url, &params).await
    }

    /// Searches places by name, the upstream document is returned untouched
    ///
    /// # Arguments
    ///
    /// * 'name' - the search term
    /// * 'language' - language for place names
    pub async fn locations(&self, name: &str, language: &str) -> Result<Option<Value>, OpenMeteoError> {
        let params = [("name", name), ("language", language)];

        self.get_api_data(&self.geocoding_url, &params).await
    }

    /// Makes a GET request and decodes the json body
    ///
    /// A 400 from upstream means there is no data for the request and gives `None`,
    /// any other unsuccessful status is an error.
    ///
    /// # Arguments
    ///
    /// * 'url' - endpoint
    /// * 'params' - query parameters
    async fn get_api_data<T: DeserializeOwned>(&self, url: &str, params: &[(&str, &str)]) -> Result<Option<T>, OpenMeteoError> {
        let response = self.client
            .get(url)
            .query(params)
            .send().await?;

        let status = response.status();
        debug!("GET {} -> {}", url, status);

        if status == StatusCode::BAD_REQUEST {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(OpenMeteoError::Status(status.as_u16()));
        }

        let json = response.text().await?;
        Ok(Some(serde_json::from_str(&json)?))
    }
}
