use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;

/// Pollutant and pollen concentrations of one hour, µg/m³ and grains/m³
#[derive(Serialize, Debug, Clone, Default, PartialEq)]
pub struct AirQualitySample {
    pub pm10: Option<f64>,
    pub nitrogen_dioxide: Option<f64>,
    pub sulphur_dioxide: Option<f64>,
    pub ozone: Option<f64>,
    pub alder_pollen: Option<f64>,
    pub birch_pollen: Option<f64>,
    pub grass_pollen: Option<f64>,
    pub mugwort_pollen: Option<f64>,
    pub olive_pollen: Option<f64>,
    pub ragweed_pollen: Option<f64>,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct AirQualityView {
    pub air_quality_index: u8,
    pub air_quality_translation: String,
    pub air_quality_gradient: String,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct HourView {
    pub time: NaiveDateTime,
    pub hour: u32,
    pub temperature_2m: f64,
    pub apparent_temperature: f64,
    pub precipitation: f64,
    pub weathercode: u8,
    pub windspeed_10m: f64,
    pub winddirection_10m: f64,
    pub windgusts_10m: f64,
    pub air_quality: Option<AirQualitySample>,
    #[serde(flatten)]
    pub air_quality_index: Option<AirQualityView>,
    pub is_day: bool,
    pub condition_text: String,
    pub condition_icon: String,
    pub proba_value: i64,
    pub proba_gradient: String,
    pub wind_azimuth_abbr: String,
    pub wind_azimuth_full: String,
    pub precip_percent: f64,
    pub precip_gradient: String,
    pub temperature_2m_color: String,
    pub apparent_temperature_color: String,
    pub windgusts_notice: String,
    pub windspeed_notice: String,
    pub past: bool,
    pub classes: String,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct DayView {
    pub day: NaiveDate,
    pub date: String,
    pub weathercode: u8,
    pub sunrise: Option<String>,
    pub sunset: Option<String>,
    pub apparent_temperature_max: f64,
    pub apparent_temperature_min: f64,
    pub feelslike_emoji: String,
    pub condition_text: String,
    pub condition_icon: String,
    pub hour: Vec<HourView>,
}

/// Everything the dashboard shows for one forecast
#[derive(Serialize, Debug, Clone, PartialEq, Default)]
pub struct WeatherView {
    pub days: Vec<DayView>,
    pub current: Option<HourView>,
}
