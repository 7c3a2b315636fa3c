use std::collections::BTreeMap;
use actix_web::cookie::time::Duration;
use actix_web::cookie::{Cookie, SameSite};
use actix_web::http::header::{self, AcceptLanguage, Header, Preference};
use actix_web::{HttpRequest, HttpResponseBuilder};
use serde::Deserialize;
use serde_with::{serde_as, NoneAsEmptyString};
use url::form_urlencoded;
use crate::initialization::Dashboard;
use crate::lookups::DEFAULT_LOCALE;

const COOKIE_NAME: &str = "preferences";

const LATITUDE: &str = "latitude";
const LONGITUDE: &str = "longitude";
const LOCATION: &str = "location";
const USE_RELATIVE_TEMPS: &str = "use_relative_temps";
const LANG: &str = "lang";

/// Values sent with the request, from the query string or the form body.
/// Empty fields count as absent.
#[serde_as]
#[derive(Deserialize, Debug, Default, Clone)]
pub struct PreferenceParams {
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub latitude: Option<String>,
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub longitude: Option<String>,
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub location: Option<String>,
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub use_relative_temps: Option<String>,
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub lang: Option<String>,
}

/// What the dashboard is rendered with for one request
#[derive(Debug, Clone, PartialEq)]
pub struct Preferences {
    pub latitude: String,
    pub longitude: String,
    pub location: String,
    pub use_relative_temps: bool,
    pub locale: String,
}

/// Preferences remembered from earlier requests
#[derive(Debug, Default, Clone, PartialEq)]
pub struct StoredPreferences {
    values: BTreeMap<String, String>,
    dirty: bool,
}

impl StoredPreferences {
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(|v| v.as_str()).filter(|v| !v.is_empty())
    }

    pub fn set(&mut self, name: &str, value: &str) {
        if self.get(name) != Some(value) {
            self.values.insert(name.to_string(), value.to_string());
            self.dirty = true;
        }
    }

    /// True when a value changed since loading
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    fn encode(&self) -> String {
        form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.values.iter())
            .finish()
    }

    fn decode(value: &str) -> StoredPreferences {
        StoredPreferences {
            values: form_urlencoded::parse(value.as_bytes()).into_owned().collect(),
            dirty: false,
        }
    }
}

/// Keeps preferences in a single client side cookie
pub struct CookiePreferenceStore {
    max_age_days: i64,
}

impl CookiePreferenceStore {
    pub fn new(max_age_days: i64) -> Self {
        CookiePreferenceStore { max_age_days }
    }

    /// Reads the preferences sent with a request, nothing stored gives empty preferences
    ///
    /// # Arguments
    ///
    /// * 'req' - the incoming request
    pub fn load(&self, req: &HttpRequest) -> StoredPreferences {
        req.cookie(COOKIE_NAME)
            .map(|c| StoredPreferences::decode(c.value()))
            .unwrap_or_default()
    }

    /// Attaches the preferences to a response.
    /// Requests hand cookie values back percent-decoded, so the value is percent-encoded here.
    ///
    /// # Arguments
    ///
    /// * 'response' - response under construction
    /// * 'stored' - the preferences to remember
    pub fn save(&self, response: &mut HttpResponseBuilder, stored: &StoredPreferences) {
        let cookie = Cookie::build(COOKIE_NAME, stored.encode())
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .max_age(Duration::days(self.max_age_days))
            .finish();

        response.append_header((header::SET_COOKIE, cookie.encoded().to_string()));
    }
}

impl Preferences {
    /// Picks each preference from the request, then from what was stored, then from
    /// the configured defaults. Request values are written back into `stored`.
    ///
    /// # Arguments
    ///
    /// * 'params' - values sent with the request
    /// * 'stored' - remembered values
    /// * 'dashboard' - configured defaults and languages
    /// * 'accepted' - best language from the Accept-Language header
    pub fn resolve(params: &PreferenceParams, stored: &mut StoredPreferences, dashboard: &Dashboard, accepted: Option<String>)
        -> Preferences {
        let latitude = pick(stored, LATITUDE, params.latitude.as_deref(), &dashboard.default_latitude);
        let longitude = pick(stored, LONGITUDE, params.longitude.as_deref(), &dashboard.default_longitude);
        let location = pick(stored, LOCATION, params.location.as_deref(), &dashboard.default_location);
        let use_relative_temps = pick(stored, USE_RELATIVE_TEMPS, params.use_relative_temps.as_deref(), "0");

        Preferences {
            latitude,
            longitude,
            location,
            use_relative_temps: use_relative_temps.trim().parse::<u8>().map(|v| v != 0).unwrap_or(false),
            locale: resolve_locale(params.lang.as_deref(), stored, dashboard, accepted),
        }
    }
}

/// Language of the request: `lang` argument, then remembered language, then the
/// browser's best match. Only configured languages are kept.
///
/// # Arguments
///
/// * 'lang' - the `lang` request argument
/// * 'stored' - remembered values
/// * 'dashboard' - configured languages
/// * 'accepted' - best language from the Accept-Language header
pub fn resolve_locale(lang: Option<&str>, stored: &mut StoredPreferences, dashboard: &Dashboard, accepted: Option<String>)
    -> String {
    let known = |l: &&str| dashboard.languages.contains_key(*l);

    if let Some(lang) = lang.filter(known) {
        stored.set(LANG, lang);
        return lang.to_string();
    }
    if let Some(lang) = stored.get(LANG).filter(known) {
        return lang.to_string();
    }
    if let Some(lang) = accepted.as_deref().filter(known) {
        stored.set(LANG, lang);
        return lang.to_string();
    }

    DEFAULT_LOCALE.to_string()
}

/// Highest ranked configured language of the Accept-Language header
///
/// # Arguments
///
/// * 'req' - the incoming request
/// * 'dashboard' - configured languages
pub fn accepted_language(req: &HttpRequest, dashboard: &Dashboard) -> Option<String> {
    let accept = AcceptLanguage::parse(req).ok()?;

    accept.ranked().into_iter().find_map(|preference| match preference {
        Preference::Specific(tag) => {
            let primary = tag.primary_language().to_lowercase();
            dashboard.languages.contains_key(&primary).then_some(primary)
        },
        Preference::Any => None,
    })
}

fn pick(stored: &mut StoredPreferences, name: &str, requested: Option<&str>, default: &str) -> String {
    if let Some(value) = requested {
        stored.set(name, value);
        return value.to_string();
    }

    stored.get(name).unwrap_or(default).to_string()
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use actix_web::test::TestRequest;
    use actix_web::HttpResponse;

    pub(crate) fn dashboard() -> Dashboard {
        Dashboard {
            translations_dir: "translations".to_string(),
            templates_dir: "templates".to_string(),
            default_latitude: "48.86415".to_string(),
            default_longitude: "2.44322".to_string(),
            default_location: "Montreuil, Île-de-France (France)".to_string(),
            languages: [("en", "English"), ("fr", "Français")]
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            cookie_max_age_days: 30,
        }
    }

    #[test]
    fn defaults_without_anything() {
        let mut stored = StoredPreferences::default();
        let prefs = Preferences::resolve(&PreferenceParams::default(), &mut stored, &dashboard(), None);

        assert_eq!(prefs, Preferences {
            latitude: "48.86415".to_string(),
            longitude: "2.44322".to_string(),
            location: "Montreuil, Île-de-France (France)".to_string(),
            use_relative_temps: false,
            locale: "en".to_string(),
        });
        assert!(!stored.is_dirty());
    }

    #[test]
    fn request_values_win_and_are_stored() {
        let mut stored = StoredPreferences::default();
        stored.set(LATITUDE, "1.0");
        stored.set(LOCATION, "Somewhere");
        let mut stored = StoredPreferences::decode(&stored.encode());

        let params = PreferenceParams {
            latitude: Some("45.76".to_string()),
            use_relative_temps: Some("1".to_string()),
            ..Default::default()
        };
        let prefs = Preferences::resolve(&params, &mut stored, &dashboard(), None);

        assert_eq!(prefs.latitude, "45.76");
        assert_eq!(prefs.location, "Somewhere");
        assert!(prefs.use_relative_temps);
        assert!(stored.is_dirty());
        assert_eq!(stored.get(LATITUDE), Some("45.76"));
        assert_eq!(stored.get(USE_RELATIVE_TEMPS), Some("1"));
    }

    #[test]
    fn unchanged_values_do_not_dirty_the_store() {
        let mut stored = StoredPreferences::default();
        stored.set(LATITUDE, "45.76");
        let mut stored = StoredPreferences::decode(&stored.encode());

        let params = PreferenceParams { latitude: Some("45.76".to_string()), ..Default::default() };
        Preferences::resolve(&params, &mut stored, &dashboard(), None);

        assert!(!stored.is_dirty());
    }

    #[test]
    fn empty_fields_are_absent() {
        let params: PreferenceParams = serde_json::from_value(serde_json::json!({
            "latitude": "",
            "longitude": "2.35",
            "use_relative_temps": ""
        })).unwrap();

        assert_eq!(params.latitude, None);
        assert_eq!(params.longitude.as_deref(), Some("2.35"));
        assert_eq!(params.use_relative_temps, None);
    }

    #[test]
    fn garbage_relative_flag_is_off() {
        let mut stored = StoredPreferences::default();
        let params = PreferenceParams { use_relative_temps: Some("yes".to_string()), ..Default::default() };

        assert!(!Preferences::resolve(&params, &mut stored, &dashboard(), None).use_relative_temps);
    }

    #[test]
    fn locale_order() {
        let dashboard = dashboard();

        let mut stored = StoredPreferences::default();
        assert_eq!(resolve_locale(None, &mut stored, &dashboard, Some("fr".to_string())), "fr");
        assert_eq!(stored.get(LANG), Some("fr"));

        assert_eq!(resolve_locale(None, &mut stored, &dashboard, Some("en".to_string())), "fr");
        assert_eq!(resolve_locale(Some("en"), &mut stored, &dashboard, None), "en");
        assert_eq!(stored.get(LANG), Some("en"));

        let mut stored = StoredPreferences::default();
        assert_eq!(resolve_locale(Some("de"), &mut stored, &dashboard, Some("de".to_string())), "en");
        assert_eq!(stored.get(LANG), None);
    }

    #[test]
    fn accept_language_negotiation() {
        let dashboard = dashboard();

        let req = TestRequest::default()
            .insert_header(("Accept-Language", "de-DE, fr-FR;q=0.8, en;q=0.5"))
            .to_http_request();
        assert_eq!(accepted_language(&req, &dashboard).as_deref(), Some("fr"));

        let req = TestRequest::default()
            .insert_header(("Accept-Language", "de, it;q=0.9"))
            .to_http_request();
        assert_eq!(accepted_language(&req, &dashboard), None);

        assert_eq!(accepted_language(&TestRequest::default().to_http_request(), &dashboard), None);
    }

    /// Sends the Set-Cookie header of a response back the way a browser does
    fn browser_request(response: &HttpResponse) -> HttpRequest {
        let set_cookie = response.headers().get(header::SET_COOKIE).unwrap().to_str().unwrap();
        let pair = set_cookie.split(';').next().unwrap().to_string();

        TestRequest::default()
            .insert_header((header::COOKIE, pair))
            .to_http_request()
    }

    #[test]
    fn cookie_round_trip() {
        let store = CookiePreferenceStore::new(30);
        let mut stored = StoredPreferences::default();
        stored.set(LOCATION, "Bed & Breakfast + Île=1%, 100% (France); ok");
        stored.set(LATITUDE, "48.86415");

        let mut builder = HttpResponse::Ok();
        store.save(&mut builder, &stored);
        let response = builder.finish();

        let set_cookie = response.headers().get(header::SET_COOKIE).unwrap().to_str().unwrap();
        assert!(set_cookie.is_ascii());
        assert!(set_cookie.contains("HttpOnly"));
        assert!(set_cookie.contains("SameSite=Lax"));

        let loaded = store.load(&browser_request(&response));

        assert_eq!(loaded.get(LOCATION), Some("Bed & Breakfast + Île=1%, 100% (France); ok"));
        assert_eq!(loaded.get(LATITUDE), Some("48.86415"));
        assert_eq!(loaded.values.len(), 2);
        assert!(!loaded.is_dirty());
    }
}
