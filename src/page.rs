use std::collections::BTreeMap;
use std::error::Error;
use std::fmt;
use std::path::Path;
use serde::Serialize;
use tera::{Context, Tera};
use crate::ideal_temps::IdealTemps;
use crate::lookups::Translator;
use crate::manager_view::models::WeatherView;
use crate::metrics::{MAX_RAIN_ACCEPTABLE, MAX_TEMP_ACCEPTABLE, MAX_WIND_ACCEPTABLE, MIN_TEMP_ACCEPTABLE};

const INDEX_TEMPLATE: &str = "index.html";

/// Page labels, english text used as translation key
const LABELS: [(&str, &str); 18] = [
    ("weather", "Weather"),
    ("now", "Now"),
    ("feels_like", "Feels like"),
    ("wind", "Wind"),
    ("gusts", "Gusts"),
    ("precipitation", "Precipitation"),
    ("air_quality", "Air quality"),
    ("location", "Location"),
    ("search", "Search a place"),
    ("update", "Update"),
    ("relative_temps", "Relative temperatures"),
    ("ideal_temps", "Ideal temperatures"),
    ("language", "Language"),
    ("no_data", "No forecast available for this location."),
    ("hour", "Hour"),
    ("discomfort", "Discomfort"),
    ("yes", "Yes"),
    ("no", "No"),
];

#[derive(Debug)]
pub struct PageError(pub String);

impl fmt::Display for PageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PageError: {}", self.0)
    }
}
impl From<tera::Error> for PageError {
    fn from(e: tera::Error) -> Self {
        // tera keeps the interesting part in the source chain
        let mut message = e.to_string();
        let mut source = e.source();
        while let Some(s) = source {
            message.push_str(": ");
            message.push_str(&s.to_string());
            source = s.source();
        }
        PageError(message)
    }
}

/// Everything the dashboard template shows besides the weather itself
#[derive(Serialize, Debug)]
pub struct PageContext<'a> {
    pub timezone: Option<&'a str>,
    pub location: &'a str,
    pub latitude: &'a str,
    pub longitude: &'a str,
    pub locale: &'a str,
    pub languages: &'a BTreeMap<String, String>,
    pub ideal_temps: IdealTemps,
    pub use_relative_temps: bool,
}

/// Loads the page templates
///
/// # Arguments
///
/// * 'dir' - the templates directory
pub fn load_templates<P: AsRef<Path>>(dir: P) -> Result<Tera, PageError> {
    let glob = dir.as_ref().join("**").join("*.html");
    let tera = Tera::new(&glob.to_string_lossy())?;

    if !tera.get_template_names().any(|n| n == INDEX_TEMPLATE) {
        return Err(PageError(format!("{} not found in {}", INDEX_TEMPLATE, dir.as_ref().display())));
    }

    Ok(tera)
}

/// Renders the dashboard
///
/// # Arguments
///
/// * 'tera' - loaded templates
/// * 'translator' - page label translations
/// * 'view' - the weather, `None` when upstream had no forecast
/// * 'page' - location, preferences and language
pub fn render_index<T: Translator>(tera: &Tera, translator: &T, view: Option<&WeatherView>, page: &PageContext)
    -> Result<String, PageError> {
    let labels: BTreeMap<&str, String> = LABELS
        .iter()
        .map(|(id, text)| (*id, translator.localize(text, page.locale)))
        .collect();

    let mut context = Context::new();
    context.insert("data", &view.map(|v| &v.days));
    context.insert("current_weather", &view.and_then(|v| v.current.as_ref()));
    context.insert("page", page);
    context.insert("labels", &labels);
    context.insert("max_rain", &MAX_RAIN_ACCEPTABLE);
    context.insert("max_wind", &MAX_WIND_ACCEPTABLE);
    context.insert("extreme_temps", &(MIN_TEMP_ACCEPTABLE, MAX_TEMP_ACCEPTABLE));
    context.insert("default_ideal_temps", &IdealTemps::default());

    Ok(tera.render(INDEX_TEMPLATE, &context)?)
}
