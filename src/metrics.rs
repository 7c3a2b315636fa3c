use crate::colors::{gradient, Hsl, RED};

/// Top of the wind scale, km/h
pub const MAX_WIND_ACCEPTABLE: f64 = 35.0;

/// Top of the rain scale, mm per hour. 7.6 mm per hour and more is heavy rain
pub const MAX_RAIN_ACCEPTABLE: f64 = 7.6;

/// Alert level for rain, mm per hour
pub const PRECIP_ALERT: f64 = MAX_RAIN_ACCEPTABLE * 2.0;

/// Bottom and top of the temperature scale, Celsius
pub const MIN_TEMP_ACCEPTABLE: i32 = -5;
pub const MAX_TEMP_ACCEPTABLE: i32 = 35;

/// Top probability score, the worst weather
pub const MAX_PROBA_VALUE: u32 = 20;

pub const WIND_CHAR: &str = "💨";

/// Displayed hours of the day
pub const MIN_HOUR: u32 = 7;
pub const MAX_HOUR: u32 = 20;

const FEELSLIKE_EMOJI: [&str; 5] = ["🥶", "😨", "🙂", "😊", "🥵"];

pub const AZIMUTHS: [&str; 16] = [
    "N", "NNE", "NE", "ENE", "E", "ESE", "SE", "SSE",
    "S", "SSW", "SW", "WSW", "W", "WNW", "NW", "NNW",
];

/// Upper bounds of each air quality step per pollutant, µg/m³
const PM10_SCALE: [f64; 10] = [0.0, 10.0, 20.0, 30.0, 40.0, 50.0, 65.0, 80.0, 100.0, 125.0];
const SULPHUR_DIOXIDE_SCALE: [f64; 10] = [0.0, 40.0, 80.0, 120.0, 160.0, 200.0, 250.0, 300.0, 400.0, 500.0];
const NITROGEN_DIOXIDE_SCALE: [f64; 10] = [0.0, 30.0, 55.0, 85.0, 110.0, 135.0, 165.0, 200.0, 275.0, 400.0];
const OZONE_SCALE: [f64; 10] = [0.0, 30.0, 55.0, 80.0, 105.0, 130.0, 150.0, 180.0, 210.0, 240.0];

/// English keys of the air quality labels, translated at render time
const AIR_QUALITY_TERMS: [&str; 11] = [
    "No data",
    "Very good",
    "Very good",
    "Good",
    "Good",
    "Average",
    "Below average",
    "Below average",
    "Bad",
    "Bad",
    "Very bad",
];

const AIR_QUALITY_START: Hsl = Hsl(0.4, 0.8, 0.5);
const PROBA_START: Hsl = Hsl(0.4, 0.8, 0.5);
const PROBA_END: Hsl = Hsl(0.0, 0.8, 0.6);

/// Pollutant concentrations used for the air quality index
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Pollutants {
    pub pm10: Option<f64>,
    pub sulphur_dioxide: Option<f64>,
    pub nitrogen_dioxide: Option<f64>,
    pub ozone: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AirQualityIndex {
    pub index: u8,
    pub term: &'static str,
    pub gradient: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Proba {
    pub value: i64,
    pub gradient: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Precipitation {
    pub percent: f64,
    pub gradient: &'static str,
}

/// Inputs of the probability score for one hour
#[derive(Debug, Copy, Clone)]
pub struct ProbaInputs {
    pub precipitation: f64,
    pub windspeed: f64,
    pub temperature: f64,
    pub apparent_temperature: f64,
    pub air_quality_index: Option<u8>,
    pub is_day: bool,
}

/// Emoji for the average apparent temperature of a day
///
/// # Arguments
///
/// * 'apparent_max' - highest apparent temperature of the day
/// * 'apparent_min' - lowest apparent temperature of the day
pub fn feelslike_emoji(apparent_max: f64, apparent_min: f64) -> &'static str {
    let average = (apparent_max + apparent_min) / 2.0;

    if average <= MIN_TEMP_ACCEPTABLE as f64 {
        return FEELSLIKE_EMOJI[0];
    }
    if average > MAX_TEMP_ACCEPTABLE as f64 {
        return FEELSLIKE_EMOJI[FEELSLIKE_EMOJI.len() - 1];
    }

    let span = (MAX_TEMP_ACCEPTABLE - MIN_TEMP_ACCEPTABLE) as f64 / FEELSLIKE_EMOJI.len() as f64;
    let bucket = ((average - MIN_TEMP_ACCEPTABLE as f64) / span).floor() as usize;

    FEELSLIKE_EMOJI[bucket.min(FEELSLIKE_EMOJI.len() - 1)]
}

/// Repeats the wind character depending on the force of the wind
///
/// # Arguments
///
/// * 'windspeed' - speed in km/h
pub fn wind_notice(windspeed: f64) -> String {
    let count = if windspeed < MAX_WIND_ACCEPTABLE {
        (windspeed / 10.0).round_ties_even().max(0.0) as usize
    } else {
        4
    };

    WIND_CHAR.repeat(count)
}

/// Air quality index from 1 to 10, based on PM10, SO2, NO2 and O3.
/// The worst pollutant gives the index. Returns None when no pollutant has a value.
///
/// Based on http://www.atmo-alsace.net/site/Explications-sur-le-calcul-des-indices-22.html
///
/// # Arguments
///
/// * 'pollutants' - measured concentrations
pub fn air_quality_index(pollutants: &Pollutants) -> Option<AirQualityIndex> {
    let measures = [
        (pollutants.pm10, &PM10_SCALE),
        (pollutants.sulphur_dioxide, &SULPHUR_DIOXIDE_SCALE),
        (pollutants.nitrogen_dioxide, &NITROGEN_DIOXIDE_SCALE),
        (pollutants.ozone, &OZONE_SCALE),
    ];

    let index = measures
        .iter()
        .filter_map(|(value, scale)| match value {
            Some(v) if *v > 0.0 => Some(scale_index(*v, scale)),
            _ => None,
        })
        .max()?;

    Some(AirQualityIndex {
        index,
        term: AIR_QUALITY_TERMS[index as usize],
        gradient: air_quality_gradient(index),
    })
}

/// Position of the smallest threshold at or above the value, values over the top step get 10
fn scale_index(value: f64, scale: &[f64; 10]) -> u8 {
    scale
        .iter()
        .position(|threshold| *threshold >= value)
        .map_or(scale.len(), |p| p.max(1)) as u8
}

fn air_quality_gradient(index: u8) -> String {
    if index > 0 {
        gradient(index as f64, 10, AIR_QUALITY_START, RED)
    } else {
        "#fff".to_string()
    }
}

/// A discomfort score: rain, wind, ice, extreme temperatures and bad air add up.
/// This is not a statistical probability.
///
/// # Arguments
///
/// * 'hour' - the metrics of the hour
pub fn proba(hour: &ProbaInputs) -> Proba {
    let precip = hour.precipitation.min(MAX_RAIN_ACCEPTABLE);
    let wind = hour.windspeed.min(MAX_WIND_ACCEPTABLE);
    let feelslike = hour.apparent_temperature;
    let min_temp = MIN_TEMP_ACCEPTABLE as f64;
    let max_temp = MAX_TEMP_ACCEPTABLE as f64;

    let mut score = hour.air_quality_index.unwrap_or(0) as f64 / 2.0;
    score += 12.0 * precip / MAX_RAIN_ACCEPTABLE;
    // wind is twice as annoying
    score += 20.0 * wind / MAX_WIND_ACCEPTABLE;

    // ice on the road
    if hour.temperature < 0.0 && precip > 0.0 {
        score += 10.0;
    }

    if feelslike <= min_temp {
        score += (min_temp - 5.0).max(feelslike).abs();
    }

    if feelslike >= max_temp {
        score += (max_temp + 5.0).min(feelslike) - (max_temp - 5.0);
    }

    // rain is worse by night
    if !hour.is_day {
        score += 5.0 * precip / MAX_RAIN_ACCEPTABLE;
    }

    let value = score.round_ties_even() as i64;
    let clamped = value.clamp(0, MAX_PROBA_VALUE as i64);

    Proba {
        value,
        gradient: gradient(clamped as f64, MAX_PROBA_VALUE, PROBA_START, PROBA_END),
    }
}

/// Gauge percentage and color for precipitation in mm
///
/// # Arguments
///
/// * 'precipitation' - mm per hour
pub fn precipitation(precipitation: f64) -> Precipitation {
    let precipitation = if precipitation > 0.0 { precipitation + 1.0 } else { precipitation };
    let gradient = if precipitation >= PRECIP_ALERT { "#000" } else { "hsl(210, 80%, 50%)" };
    let clamped = precipitation.min(MAX_RAIN_ACCEPTABLE);

    Precipitation {
        percent: clamped / MAX_RAIN_ACCEPTABLE * 100.0,
        gradient,
    }
}

/// Compass point code closest to an angle in degrees
///
/// # Arguments
///
/// * 'angle' - wind direction, 0 to 360
pub fn closest_azimuth(angle: f64) -> &'static str {
    let step = 360.0 / AZIMUTHS.len() as f64;

    let mut closest = 0;
    let mut distance = f64::MAX;
    for i in 0..=AZIMUTHS.len() {
        let d = (i as f64 * step - angle).abs();
        if d < distance {
            distance = d;
            closest = i;
        }
    }

    AZIMUTHS[closest % AZIMUTHS.len()]
}

/// CSS classes of an hour cell
pub fn classes(is_day: bool, past: bool) -> String {
    let mut classes = vec![if is_day { "cell_day" } else { "cell_night" }];
    if past {
        classes.push("cell_past");
    }

    classes.join(" ")
}
