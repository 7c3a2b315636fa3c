use crate::ideal_temps::IdealTemps;
use crate::metrics::{MAX_TEMP_ACCEPTABLE, MIN_TEMP_ACCEPTABLE};

/// A color given as hue, saturation and lightness, each in 0..=1
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Hsl(pub f64, pub f64, pub f64);

/// Default gradient end, a plain red
pub const RED: Hsl = Hsl(0.0, 0.8, 0.5);

/// Picks the color for `value` on an HSL gradient of `max + 1` evenly spaced steps.
/// Values above `max` get the end color.
///
/// # Arguments
///
/// * 'value' - position on the gradient, truncated to an integer
/// * 'max' - last step of the gradient
/// * 'start' - color at step 0
/// * 'end' - color at step `max`
pub fn gradient(value: f64, max: u32, start: Hsl, end: Hsl) -> String {
    let step = (value.max(0.0) as u32).min(max) as f64;
    let fraction = |from: f64, to: f64| {
        if max == 0 { from } else { from + (to - from) / max as f64 * step }
    };

    let color = Hsl(fraction(start.0, end.0), fraction(start.1, end.1), fraction(start.2, end.2));
    to_hex(hsl_to_rgb(color))
}

/// Returns a CSS color for a temperature, relative to the ideal band.
///
/// The scale holds one entry per degree between the acceptable extremes: a blue ramp
/// getting lighter up to the ideal band, plain white inside it, then an orange ramp
/// getting darker up to the hottest acceptable temperature.
///
/// # Arguments
///
/// * 'temp' - temperature in Celsius
/// * 'ideal' - the ideal temperature band
pub fn temperature_color(temp: f64, ideal: IdealTemps) -> String {
    let temp = temp.clamp(MIN_TEMP_ACCEPTABLE as f64, MAX_TEMP_ACCEPTABLE as f64);
    let scale = temperature_scale(ideal);

    let index = (temp.round_ties_even() as i32 - MIN_TEMP_ACCEPTABLE) as usize;
    scale[index.min(scale.len() - 1)].clone()
}

fn temperature_scale(ideal: IdealTemps) -> Vec<String> {
    let ideal_min = ideal.min.clamp(MIN_TEMP_ACCEPTABLE, MAX_TEMP_ACCEPTABLE);
    let ideal_max = ideal.max.clamp(ideal_min, MAX_TEMP_ACCEPTABLE);

    let mut scale = Vec::with_capacity((MAX_TEMP_ACCEPTABLE - MIN_TEMP_ACCEPTABLE + 1) as usize);

    let cold_steps = ideal_min - MIN_TEMP_ACCEPTABLE;
    for t in 0..cold_steps {
        let luminance = 50.0 + (50.0 / cold_steps as f64) * t as f64;
        scale.push(format!("hsl(220,100%,{}%)", luminance.round_ties_even()));
    }

    for _ in ideal_min..=ideal_max {
        scale.push("hsl(220,100%,100%)".to_string());
    }

    let hot_steps = MAX_TEMP_ACCEPTABLE - ideal_max;
    for t in 1..=hot_steps {
        let luminance = 100.0 - (50.0 / hot_steps as f64) * t as f64;
        scale.push(format!("hsl(22,100%,{}%)", luminance.round_ties_even()));
    }

    scale
}

fn hsl_to_rgb(color: Hsl) -> (f64, f64, f64) {
    let Hsl(h, s, l) = color;
    if s == 0.0 {
        return (l, l, l);
    }

    let v2 = if l < 0.5 { l * (1.0 + s) } else { (l + s) - (s * l) };
    let v1 = 2.0 * l - v2;

    (
        hue_to_rgb(v1, v2, h + 1.0 / 3.0),
        hue_to_rgb(v1, v2, h),
        hue_to_rgb(v1, v2, h - 1.0 / 3.0),
    )
}

fn hue_to_rgb(v1: f64, v2: f64, hue: f64) -> f64 {
    let hue = hue.rem_euclid(1.0);

    if 6.0 * hue < 1.0 {
        v1 + (v2 - v1) * 6.0 * hue
    } else if 2.0 * hue < 1.0 {
        v2
    } else if 3.0 * hue < 2.0 {
        v1 + (v2 - v1) * (2.0 / 3.0 - hue) * 6.0
    } else {
        v1
    }
}

/// Web hex notation, shortened to three digits when possible
fn to_hex(rgb: (f64, f64, f64)) -> String {
    let channel = |c: f64| (c * 255.0 + 0.5 - 1e-7).clamp(0.0, 255.0) as u8;
    let hex = format!("{:02x}{:02x}{:02x}", channel(rgb.0), channel(rgb.1), channel(rgb.2));

    let bytes = hex.as_bytes();
    if bytes[0] == bytes[1] && bytes[2] == bytes[3] && bytes[4] == bytes[5] {
        format!("#{}{}{}", &hex[0..1], &hex[2..3], &hex[4..5])
    } else {
        format!("#{}", hex)
    }
}
