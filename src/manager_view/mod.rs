pub mod errors;
pub mod models;

use std::collections::HashMap;
use chrono::{NaiveDate, NaiveDateTime, Timelike, Utc};
use chrono_tz::Tz;
use log::warn;
use crate::colors::temperature_color;
use crate::ideal_temps::IdealTemps;
use crate::lookups::Translator;
use crate::manager_openmeteo::models::{AirQualitySeries, RawAirQuality, RawForecast};
use crate::manager_view::errors::ViewError;
use crate::manager_view::models::{AirQualitySample, AirQualityView, DayView, HourView, WeatherView};
use crate::metrics::{self, Pollutants, ProbaInputs, MAX_HOUR, MIN_HOUR};

const HOUR_FORMAT: &str = "%Y-%m-%dT%H:%M";
const DAY_FORMAT: &str = "%Y-%m-%d";

/// Builds the dashboard records out of the raw upstream documents
pub struct ViewBuilder<'a, T: Translator> {
    translator: &'a T,
    locale: &'a str,
    ideal: IdealTemps,
}

impl<'a, T: Translator> ViewBuilder<'a, T> {
    /// Returns a builder for one request
    ///
    /// # Arguments
    ///
    /// * 'translator' - lookup tables for conditions, compass points and labels
    /// * 'locale' - language of the texts
    /// * 'ideal' - band the temperature colors are centered on
    pub fn new(translator: &'a T, locale: &'a str, ideal: IdealTemps) -> Self {
        ViewBuilder { translator, locale, ideal }
    }

    /// Switches the forecast from parallel series to one record per day, each holding
    /// its displayed hours, and finds the record matching the current weather.
    ///
    /// Hours outside `MIN_HOUR..=MAX_HOUR` are computed but not listed, today is left
    /// out once `MAX_HOUR` has passed.
    ///
    /// # Arguments
    ///
    /// * 'forecast' - hourly and daily forecast
    /// * 'air_quality' - hourly pollutants, matched to the forecast by timestamp
    /// * 'now' - current time in the forecast's timezone
    pub fn serialize(&self, forecast: &RawForecast, air_quality: Option<&RawAirQuality>, now: NaiveDateTime)
        -> Result<WeatherView, ViewError> {
        check_alignment(forecast)?;

        let hourly = &forecast.hourly;
        let daily = &forecast.daily;

        let hour_times = hourly.time
            .iter()
            .map(|t| parse_hour(t))
            .collect::<Result<Vec<NaiveDateTime>, ViewError>>()?;

        let air_quality_index: HashMap<&str, usize> = air_quality
            .map(|aq| aq.hourly.time.iter().enumerate().map(|(i, t)| (t.as_str(), i)).collect())
            .unwrap_or_default();

        let mut view = WeatherView::default();

        for (day_index, day_str) in daily.time.iter().enumerate() {
            let day = NaiveDate::parse_from_str(day_str, DAY_FORMAT)
                .map_err(|e| ViewError::InvalidTimestamp(format!("{}: {}", day_str, e)))?;

            let daylight = match (
                parse_daylight(daily.sunrise[day_index].as_deref(), "sunrise"),
                parse_daylight(daily.sunset[day_index].as_deref(), "sunset"),
            ) {
                (Some(sunrise), Some(sunset)) => Some((sunrise, sunset)),
                _ => None,
            };

            let condition = self.translator.condition(daily.weathercode[day_index], true, self.locale)?;

            let mut day_view = DayView {
                day,
                date: self.translator.day_label(day, self.locale),
                weathercode: daily.weathercode[day_index],
                sunrise: daily.sunrise[day_index].clone(),
                sunset: daily.sunset[day_index].clone(),
                apparent_temperature_max: daily.apparent_temperature_max[day_index],
                apparent_temperature_min: daily.apparent_temperature_min[day_index],
                feelslike_emoji: metrics::feelslike_emoji(
                    daily.apparent_temperature_max[day_index],
                    daily.apparent_temperature_min[day_index],
                ).to_string(),
                condition_text: condition.text,
                condition_icon: condition.icon,
                hour: Vec::new(),
            };

            for (hour_index, hour_str) in hourly.time.iter().enumerate() {
                // "2022-11-04" in "2022-11-04T05:43"
                if !hour_str.starts_with(day_str.as_str()) {
                    continue;
                }

                let sample = match (air_quality, air_quality_index.get(hour_str.as_str())) {
                    (Some(aq), Some(aq_index)) => Some(air_quality_sample(&aq.hourly, *aq_index)),
                    _ => None,
                };

                let hour_view = self.hour_view(forecast, hour_index, hour_times[hour_index], daylight, sample, now)?;

                if forecast.current_weather.time == *hour_str {
                    view.current = Some(hour_view.clone());
                }

                if (MIN_HOUR..=MAX_HOUR).contains(&hour_view.hour) {
                    day_view.hour.push(hour_view);
                }
            }

            if now.hour() <= MAX_HOUR || day != now.date() {
                view.days.push(day_view);
            }
        }

        Ok(view)
    }

    fn hour_view(
        &self,
        forecast: &RawForecast,
        index: usize,
        time: NaiveDateTime,
        daylight: Option<(NaiveDateTime, NaiveDateTime)>,
        air_quality: Option<AirQualitySample>,
        now: NaiveDateTime,
    ) -> Result<HourView, ViewError> {
        let hourly = &forecast.hourly;

        let is_day = match daylight {
            Some((sunrise, sunset)) => sunrise <= time && time <= sunset,
            None => true,
        };

        let aqi = air_quality.as_ref().and_then(|s| metrics::air_quality_index(&Pollutants {
            pm10: s.pm10,
            sulphur_dioxide: s.sulphur_dioxide,
            nitrogen_dioxide: s.nitrogen_dioxide,
            ozone: s.ozone,
        }));

        let condition = self.translator.condition(hourly.weathercode[index], is_day, self.locale)?;
        let azimuth = self.translator.azimuth(
            metrics::closest_azimuth(hourly.winddirection_10m[index]),
            self.locale,
        )?;

        let proba = metrics::proba(&ProbaInputs {
            precipitation: hourly.precipitation[index],
            windspeed: hourly.windspeed_10m[index],
            temperature: hourly.temperature_2m[index],
            apparent_temperature: hourly.apparent_temperature[index],
            air_quality_index: aqi.as_ref().map(|a| a.index),
            is_day,
        });
        let precipitation = metrics::precipitation(hourly.precipitation[index]);

        let past = time.date() == now.date() && time.hour() < now.hour();

        Ok(HourView {
            time,
            hour: time.hour(),
            temperature_2m: hourly.temperature_2m[index],
            apparent_temperature: hourly.apparent_temperature[index],
            precipitation: hourly.precipitation[index],
            weathercode: hourly.weathercode[index],
            windspeed_10m: hourly.windspeed_10m[index],
            winddirection_10m: hourly.winddirection_10m[index],
            windgusts_10m: hourly.windgusts_10m[index],
            air_quality,
            air_quality_index: aqi.map(|a| AirQualityView {
                air_quality_index: a.index,
                air_quality_translation: self.translator.localize(a.term, self.locale),
                air_quality_gradient: a.gradient,
            }),
            is_day,
            condition_text: condition.text,
            condition_icon: condition.icon,
            proba_value: proba.value,
            proba_gradient: proba.gradient,
            wind_azimuth_abbr: azimuth.abbr,
            wind_azimuth_full: azimuth.full,
            precip_percent: precipitation.percent,
            precip_gradient: precipitation.gradient.to_string(),
            temperature_2m_color: temperature_color(hourly.temperature_2m[index], self.ideal),
            apparent_temperature_color: temperature_color(hourly.apparent_temperature[index], self.ideal),
            windgusts_notice: metrics::wind_notice(hourly.windgusts_10m[index]),
            windspeed_notice: metrics::wind_notice(hourly.windspeed_10m[index]),
            past,
            classes: metrics::classes(is_day, past),
        })
    }
}

/// Current wall clock time in an IANA timezone
///
/// # Arguments
///
/// * 'timezone' - e.g. "Europe/Paris"
pub fn local_now(timezone: &str) -> Result<NaiveDateTime, ViewError> {
    let tz: Tz = timezone
        .parse()
        .map_err(|_| ViewError::UnknownTimezone(timezone.to_string()))?;

    Ok(Utc::now().with_timezone(&tz).naive_local())
}

fn parse_hour(value: &str) -> Result<NaiveDateTime, ViewError> {
    NaiveDateTime::parse_from_str(value, HOUR_FORMAT)
        .map_err(|e| ViewError::InvalidTimestamp(format!("{}: {}", value, e)))
}

/// Sunrise or sunset, a missing or malformed value only costs the day/night distinction
fn parse_daylight(value: Option<&str>, name: &str) -> Option<NaiveDateTime> {
    let Some(value) = value else {
        warn!("no {} data", name);
        return None;
    };

    match NaiveDateTime::parse_from_str(value, HOUR_FORMAT) {
        Ok(t) => Some(t),
        Err(e) => {
            warn!("wrong date format for {} data '{}': {}", name, value, e);
            None
        }
    }
}

fn check_alignment(forecast: &RawForecast) -> Result<(), ViewError> {
    let daily = &forecast.daily;
    let days = daily.time.len();
    let daily_lengths = [
        ("daily.weathercode", daily.weathercode.len()),
        ("daily.sunrise", daily.sunrise.len()),
        ("daily.sunset", daily.sunset.len()),
        ("daily.apparent_temperature_max", daily.apparent_temperature_max.len()),
        ("daily.apparent_temperature_min", daily.apparent_temperature_min.len()),
    ];

    let hourly = &forecast.hourly;
    let hours = hourly.time.len();
    let hourly_lengths = [
        ("hourly.temperature_2m", hourly.temperature_2m.len()),
        ("hourly.apparent_temperature", hourly.apparent_temperature.len()),
        ("hourly.precipitation", hourly.precipitation.len()),
        ("hourly.weathercode", hourly.weathercode.len()),
        ("hourly.windspeed_10m", hourly.windspeed_10m.len()),
        ("hourly.winddirection_10m", hourly.winddirection_10m.len()),
        ("hourly.windgusts_10m", hourly.windgusts_10m.len()),
    ];

    let misaligned = daily_lengths.iter()
        .map(|(name, len)| (name, len, days))
        .chain(hourly_lengths.iter().map(|(name, len)| (name, len, hours)))
        .find(|(_, len, expected)| **len != *expected);

    match misaligned {
        Some((name, len, expected)) => Err(ViewError::MisalignedSeries(
            format!("{} has {} values, expected {}", name, len, expected))),
        None => Ok(()),
    }
}

fn air_quality_sample(series: &AirQualitySeries, index: usize) -> AirQualitySample {
    let at = |values: &Vec<Option<f64>>| values.get(index).copied().flatten();

    AirQualitySample {
        pm10: at(&series.pm10),
        nitrogen_dioxide: at(&series.nitrogen_dioxide),
        sulphur_dioxide: at(&series.sulphur_dioxide),
        ozone: at(&series.ozone),
        alder_pollen: at(&series.alder_pollen),
        birch_pollen: at(&series.birch_pollen),
        grass_pollen: at(&series.grass_pollen),
        mugwort_pollen: at(&series.mugwort_pollen),
        olive_pollen: at(&series.olive_pollen),
        ragweed_pollen: at(&series.ragweed_pollen),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lookups::tests::shipped;
    use crate::lookups::Lookups;
    use crate::manager_openmeteo::models::{CurrentWeatherData, DailySeries, HourlySeries};
    use crate::manager_openmeteo::tests::forecast_document;

    fn at(value: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(value, HOUR_FORMAT).unwrap()
    }

    fn single_hour() -> RawForecast {
        serde_json::from_value(forecast_document()).unwrap()
    }

    /// Two days of 24 hours, calm and mild, sun up from 08:00 to 17:00
    fn two_days() -> RawForecast {
        let days = ["2024-01-01", "2024-01-02"];
        let hours: Vec<String> = days
            .iter()
            .flat_map(|d| (0..24).map(move |h| format!("{}T{:02}:00", d, h)))
            .collect();
        let n = hours.len();

        RawForecast {
            latitude: None,
            longitude: None,
            timezone: "Europe/Paris".to_string(),
            daily: DailySeries {
                time: days.iter().map(|d| d.to_string()).collect(),
                weathercode: vec![3, 61],
                sunrise: days.iter().map(|d| Some(format!("{}T08:00", d))).collect(),
                sunset: days.iter().map(|d| Some(format!("{}T17:00", d))).collect(),
                apparent_temperature_max: vec![18.0, 6.0],
                apparent_temperature_min: vec![14.0, 4.0],
            },
            hourly: HourlySeries {
                time: hours,
                temperature_2m: vec![16.0; n],
                apparent_temperature: vec![16.0; n],
                precipitation: vec![0.0; n],
                weathercode: vec![3; n],
                windspeed_10m: vec![0.0; n],
                winddirection_10m: vec![180.0; n],
                windgusts_10m: vec![0.0; n],
            },
            current_weather: CurrentWeatherData {
                time: "2024-01-01T09:00".to_string(),
                temperature: Some(16.0),
                windspeed: Some(0.0),
                winddirection: Some(180.0),
                weathercode: Some(3),
            },
        }
    }

    fn build(lookups: &Lookups, forecast: &RawForecast, aq: Option<&RawAirQuality>, now: &str) -> WeatherView {
        ViewBuilder::new(lookups, "en", IdealTemps::default())
            .serialize(forecast, aq, at(now))
            .unwrap()
    }

    #[test]
    fn single_hour_end_to_end() {
        let lookups = shipped();
        let view = build(&lookups, &single_hour(), None, "2024-01-01T10:00");

        assert_eq!(view.days.len(), 1);
        let day = &view.days[0];
        assert_eq!(day.date, "Monday, January 1");
        assert_eq!(day.feelslike_emoji, "🙂");
        assert_eq!(day.condition_text, "Mainly clear");
        assert_eq!(day.hour.len(), 1);

        let hour = &day.hour[0];
        assert!(hour.is_day);
        assert_eq!(hour.hour, 12);
        assert_eq!(hour.wind_azimuth_abbr, "N");
        assert_eq!(hour.wind_azimuth_full, "North");
        assert_eq!(hour.precip_percent, 0.0);
        // 20 * 5 / 35 for the wind, nothing else
        assert_eq!(hour.proba_value, 3);
        assert_eq!(hour.temperature_2m_color, "hsl(220,100%,100%)");
        assert_eq!(hour.windspeed_notice, "💨");
        assert_eq!(hour.air_quality_index, None);
        assert!(!hour.past);
        assert_eq!(hour.classes, "cell_day");

        assert_eq!(view.current.as_ref(), Some(hour));
    }

    #[test]
    fn only_daytime_window_is_listed() {
        let lookups = shipped();
        let view = build(&lookups, &two_days(), None, "2024-01-01T09:30");

        assert_eq!(view.days.len(), 2);
        for day in &view.days {
            assert_eq!(day.hour.len(), (MAX_HOUR - MIN_HOUR + 1) as usize);
            assert!(day.hour.iter().all(|h| (7..=20).contains(&h.hour)));
        }
    }

    #[test]
    fn night_hours_use_night_condition() {
        let lookups = shipped();
        let view = build(&lookups, &two_days(), None, "2024-01-01T00:00");
        let hours = &view.days[0].hour;

        let seven = hours.iter().find(|h| h.hour == 7).unwrap();
        assert!(!seven.is_day);
        assert_eq!(seven.classes, "cell_night");
        assert_eq!(seven.condition_icon, "images/icons/night/122.png");

        let noon = hours.iter().find(|h| h.hour == 12).unwrap();
        assert!(noon.is_day);
        assert_eq!(noon.condition_icon, "images/icons/day/122.png");

        let sunset = hours.iter().find(|h| h.hour == 17).unwrap();
        assert!(sunset.is_day);
    }

    #[test]
    fn past_hours_are_only_today() {
        let lookups = shipped();
        let view = build(&lookups, &two_days(), None, "2024-01-01T12:30");

        let today = &view.days[0].hour;
        assert!(today.iter().filter(|h| h.hour < 12).all(|h| h.past));
        assert!(today.iter().filter(|h| h.hour >= 12).all(|h| !h.past));
        assert_eq!(today[0].classes, "cell_night cell_past");
        assert!(view.days[1].hour.iter().all(|h| !h.past));
    }

    #[test]
    fn today_is_dropped_late_in_the_evening() {
        let lookups = shipped();

        let view = build(&lookups, &two_days(), None, "2024-01-01T20:59");
        assert_eq!(view.days.len(), 2);

        let view = build(&lookups, &two_days(), None, "2024-01-01T21:00");
        assert_eq!(view.days.len(), 1);
        assert_eq!(view.days[0].date, "Tuesday, January 2");
    }

    #[test]
    fn current_weather_may_be_outside_the_window() {
        let lookups = shipped();
        let mut forecast = two_days();
        forecast.current_weather.time = "2024-01-01T03:00".to_string();

        let view = build(&lookups, &forecast, None, "2024-01-01T03:10");

        let current = view.current.unwrap();
        assert_eq!(current.hour, 3);
        assert!(!current.is_day);
        assert!(view.days[0].hour.iter().all(|h| h.time != current.time));
    }

    #[test]
    fn no_matching_current_weather() {
        let lookups = shipped();
        let mut forecast = two_days();
        forecast.current_weather.time = "2023-12-31T23:00".to_string();

        assert_eq!(build(&lookups, &forecast, None, "2024-01-01T10:00").current, None);
    }

    #[test]
    fn malformed_sunrise_means_always_day() {
        let lookups = shipped();
        let mut forecast = two_days();
        forecast.daily.sunrise[0] = Some("dawn".to_string());

        let view = build(&lookups, &forecast, None, "2024-01-01T00:00");

        assert!(view.days[0].hour.iter().all(|h| h.is_day));
        assert!(!view.days[1].hour.iter().find(|h| h.hour == 20).unwrap().is_day);
    }

    #[test]
    fn missing_sunset_means_always_day() {
        let lookups = shipped();
        let mut document = forecast_document();
        document["daily"]["sunset"] = serde_json::json!([null]);
        let forecast: RawForecast = serde_json::from_value(document).unwrap();

        let view = build(&lookups, &forecast, None, "2024-01-01T00:00");

        assert_eq!(view.days[0].sunset, None);
        assert!(view.days[0].hour.iter().all(|h| h.is_day));
    }

    #[test]
    fn air_quality_is_matched_by_timestamp() {
        let lookups = shipped();
        // starts one day earlier than the forecast and skips 2024-01-01T13:00
        let mut times: Vec<String> = (0..24).map(|h| format!("2023-12-31T{:02}:00", h)).collect();
        times.extend((0..24).filter(|h| *h != 13).map(|h| format!("2024-01-01T{:02}:00", h)));
        let n = times.len();
        let pm10: Vec<Option<f64>> = times
            .iter()
            .map(|t| if t == "2024-01-01T12:00" { Some(130.0) } else { Some(5.0) })
            .collect();
        let aq = RawAirQuality {
            hourly: AirQualitySeries {
                time: times,
                pm10,
                grass_pollen: vec![Some(2.0); n],
                ..Default::default()
            },
        };

        let view = build(&lookups, &two_days(), Some(&aq), "2024-01-01T08:00");
        let hours = &view.days[0].hour;

        let noon = hours.iter().find(|h| h.hour == 12).unwrap();
        let index = noon.air_quality_index.as_ref().unwrap();
        assert_eq!(index.air_quality_index, 10);
        assert_eq!(index.air_quality_translation, "Very bad");
        assert_eq!(noon.air_quality.as_ref().unwrap().grass_pollen, Some(2.0));
        // half the index joins the score
        assert_eq!(noon.proba_value, 5);

        let one = hours.iter().find(|h| h.hour == 13).unwrap();
        assert_eq!(one.air_quality, None);
        assert_eq!(one.air_quality_index, None);

        let two = hours.iter().find(|h| h.hour == 14).unwrap();
        assert_eq!(two.air_quality_index.as_ref().unwrap().air_quality_index, 1);

        assert!(view.days[1].hour.iter().all(|h| h.air_quality.is_none()));
    }

    #[test]
    fn texts_follow_the_locale() {
        let lookups = shipped();
        let view = ViewBuilder::new(&lookups, "fr", IdealTemps::default())
            .serialize(&single_hour(), None, at("2024-01-01T10:00"))
            .unwrap();

        assert_eq!(view.days[0].date, "lundi 1 janvier");
        assert_eq!(view.days[0].condition_text, "Plutôt ensoleillé");
        assert_eq!(view.days[0].hour[0].wind_azimuth_full, "Nord");
    }

    #[test]
    fn ideal_band_moves_the_colors() {
        let lookups = shipped();
        let view = ViewBuilder::new(&lookups, "en", IdealTemps { min: 3, max: 10 })
            .serialize(&single_hour(), None, at("2024-01-01T10:00"))
            .unwrap();

        assert_eq!(view.days[0].hour[0].temperature_2m_color, "hsl(22,100%,88%)");
    }

    #[test]
    fn serializing_twice_gives_the_same_view() {
        let lookups = shipped();
        let forecast = two_days();

        let first = build(&lookups, &forecast, None, "2024-01-01T11:00");
        let second = build(&lookups, &forecast, None, "2024-01-01T11:00");

        assert_eq!(first, second);
        assert_eq!(serde_json::to_string(&first).unwrap(), serde_json::to_string(&second).unwrap());
    }

    #[test]
    fn unknown_weather_code_fails_the_build() {
        let lookups = shipped();
        let mut forecast = two_days();
        forecast.hourly.weathercode[30] = 42;

        let result = ViewBuilder::new(&lookups, "en", IdealTemps::default())
            .serialize(&forecast, None, at("2024-01-01T10:00"));

        assert!(matches!(result, Err(ViewError::Lookup(_))));
    }

    #[test]
    fn misaligned_series_fail_the_build() {
        let lookups = shipped();
        let mut forecast = two_days();
        forecast.hourly.windgusts_10m.pop();

        let result = ViewBuilder::new(&lookups, "en", IdealTemps::default())
            .serialize(&forecast, None, at("2024-01-01T10:00"));

        assert!(matches!(result, Err(ViewError::MisalignedSeries(m)) if m.starts_with("hourly.windgusts_10m")));
    }

    #[test]
    fn malformed_hour_fails_the_build() {
        let lookups = shipped();
        let mut forecast = two_days();
        forecast.hourly.time[5] = "2024-01-01 05h".to_string();

        let result = ViewBuilder::new(&lookups, "en", IdealTemps::default())
            .serialize(&forecast, None, at("2024-01-01T10:00"));

        assert!(matches!(result, Err(ViewError::InvalidTimestamp(_))));
    }

    #[test]
    fn local_now_needs_a_known_timezone() {
        assert!(local_now("Europe/Paris").is_ok());
        assert!(matches!(local_now("Mars/Olympus"), Err(ViewError::UnknownTimezone(_))));
    }
}
