use chrono::{NaiveDate, TimeDelta};
use log::{info, warn};
use serde::Serialize;
use crate::manager_openmeteo::errors::OpenMeteoError;
use crate::manager_openmeteo::models::RawHistory;
use crate::manager_openmeteo::OpenMeteo;
use crate::metrics::{MAX_TEMP_ACCEPTABLE, MIN_TEMP_ACCEPTABLE};

/// Number of past days averaged for relative temperatures
pub const HISTORY_DAYS: i64 = 5;

/// The temperature band, in Celsius, considered most comfortable
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
pub struct IdealTemps {
    pub min: i32,
    pub max: i32,
}

impl Default for IdealTemps {
    fn default() -> Self {
        IdealTemps { min: 13, max: 19 }
    }
}

impl IdealTemps {
    /// Band derived from the daily averages of the last days.
    ///
    /// The band only widens from the default. The low end drops to the warmest day of a
    /// cold week and the high end rises to the coldest day of a hot week, both kept within
    /// the acceptable extremes.
    ///
    /// # Arguments
    ///
    /// * 'history' - daily max and min temperatures
    pub fn from_history(history: &RawHistory) -> Option<IdealTemps> {
        let averages: Vec<f64> = history.daily.temperature_2m_max
            .iter()
            .zip(history.daily.temperature_2m_min.iter())
            .filter_map(|(max, min)| Some((max.as_ref()? + min.as_ref()?) / 2.0))
            .take(HISTORY_DAYS as usize)
            .collect();

        if averages.is_empty() {
            return None;
        }

        let warmest = averages.iter().cloned().fold(f64::MIN, f64::max);
        let coldest = averages.iter().cloned().fold(f64::MAX, f64::min);
        let default = IdealTemps::default();

        Some(IdealTemps {
            min: MIN_TEMP_ACCEPTABLE.max(default.min.min(warmest.floor() as i32)),
            max: MAX_TEMP_ACCEPTABLE.min(default.max.max(coldest.ceil() as i32)),
        })
    }
}

/// Fetches the last days of temperatures and derives the ideal band from them.
/// Falls back to the default band when upstream has no usable data.
///
/// # Arguments
///
/// * 'open_meteo' - upstream client
/// * 'latitude' - latitude of the location
/// * 'longitude' - longitude of the location
/// * 'today' - current date in the location's timezone
pub async fn relative_ideal_temps(open_meteo: &OpenMeteo, latitude: &str, longitude: &str, today: NaiveDate)
    -> Result<IdealTemps, OpenMeteoError> {
    let yesterday = today - TimeDelta::days(1);
    let start = yesterday - TimeDelta::days(HISTORY_DAYS);

    let ideal = match open_meteo.history(latitude, longitude, start, yesterday).await? {
        Some(history) => IdealTemps::from_history(&history),
        None => None,
    };

    match ideal {
        Some(ideal) => {
            info!("relative ideal temperatures: {:?}", ideal);
            Ok(ideal)
        },
        None => {
            warn!("no temperature history between {} and {}, using default band", start, yesterday);
            Ok(IdealTemps::default())
        }
    }
}
