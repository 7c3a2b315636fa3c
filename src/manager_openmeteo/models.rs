use serde::Deserialize;

/// Per day series of a forecast, index aligned with `time`
#[derive(Deserialize, Debug, Clone)]
pub struct DailySeries {
    pub time: Vec<String>,
    pub weathercode: Vec<u8>,
    pub sunrise: Vec<Option<String>>,
    pub sunset: Vec<Option<String>>,
    pub apparent_temperature_max: Vec<f64>,
    pub apparent_temperature_min: Vec<f64>,
}

/// Per hour series of a forecast, index aligned with `time`
#[derive(Deserialize, Debug, Clone)]
pub struct HourlySeries {
    pub time: Vec<String>,
    pub temperature_2m: Vec<f64>,
    pub apparent_temperature: Vec<f64>,
    pub precipitation: Vec<f64>,
    pub weathercode: Vec<u8>,
    pub windspeed_10m: Vec<f64>,
    pub winddirection_10m: Vec<f64>,
    pub windgusts_10m: Vec<f64>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct CurrentWeatherData {
    pub time: String,
    pub temperature: Option<f64>,
    pub windspeed: Option<f64>,
    pub winddirection: Option<f64>,
    pub weathercode: Option<u8>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct RawForecast {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub timezone: String,
    pub daily: DailySeries,
    pub hourly: HourlySeries,
    pub current_weather: CurrentWeatherData,
}

/// Hourly pollutant and pollen concentrations, any value may be null upstream
#[derive(Deserialize, Debug, Clone, Default)]
pub struct AirQualitySeries {
    pub time: Vec<String>,
    #[serde(default)]
    pub pm10: Vec<Option<f64>>,
    #[serde(default)]
    pub nitrogen_dioxide: Vec<Option<f64>>,
    #[serde(default)]
    pub sulphur_dioxide: Vec<Option<f64>>,
    #[serde(default)]
    pub ozone: Vec<Option<f64>>,
    #[serde(default)]
    pub alder_pollen: Vec<Option<f64>>,
    #[serde(default)]
    pub birch_pollen: Vec<Option<f64>>,
    #[serde(default)]
    pub grass_pollen: Vec<Option<f64>>,
    #[serde(default)]
    pub mugwort_pollen: Vec<Option<f64>>,
    #[serde(default)]
    pub olive_pollen: Vec<Option<f64>>,
    #[serde(default)]
    pub ragweed_pollen: Vec<Option<f64>>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct RawAirQuality {
    pub hourly: AirQualitySeries,
}

#[derive(Deserialize, Debug, Clone)]
pub struct HistorySeries {
    pub time: Vec<String>,
    pub temperature_2m_max: Vec<Option<f64>>,
    pub temperature_2m_min: Vec<Option<f64>>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct RawHistory {
    pub daily: HistorySeries,
}
