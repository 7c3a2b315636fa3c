use std::fmt;
use actix_web::http::header::ContentType;
use actix_web::{get, post, web, HttpRequest, HttpResponse, Responder};
use log::{error, info};
use serde::Deserialize;
use crate::ideal_temps::{relative_ideal_temps, IdealTemps};
use crate::manager_openmeteo::errors::OpenMeteoError;
use crate::manager_view::errors::ViewError;
use crate::manager_view::models::WeatherView;
use crate::manager_view::{local_now, ViewBuilder};
use crate::page::{render_index, PageContext, PageError};
use crate::preferences::{accepted_language, resolve_locale, CookiePreferenceStore, PreferenceParams, Preferences};
use crate::AppState;

#[derive(Deserialize, Debug)]
struct LocationQuery {
    search: Option<String>,
}

enum DashboardError {
    Upstream(OpenMeteoError),
    View(ViewError),
    Page(PageError),
}

impl fmt::Display for DashboardError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            DashboardError::Upstream(e) => write!(f, "{}", e),
            DashboardError::View(e) => write!(f, "{}", e),
            DashboardError::Page(e) => write!(f, "{}", e),
        }
    }
}
impl From<OpenMeteoError> for DashboardError {
    fn from(e: OpenMeteoError) -> Self { DashboardError::Upstream(e) }
}
impl From<ViewError> for DashboardError {
    fn from(e: ViewError) -> Self { DashboardError::View(e) }
}
impl From<PageError> for DashboardError {
    fn from(e: PageError) -> Self { DashboardError::Page(e) }
}

/// Registers the dashboard routes
pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.service(index)
        .service(index_form)
        .service(location);
}

#[get("/")]
async fn index(params: web::Query<PreferenceParams>, req: HttpRequest, data: web::Data<AppState>) -> impl Responder {
    dashboard(params.into_inner(), &req, &data).await
}

#[post("/")]
async fn index_form(params: web::Form<PreferenceParams>, req: HttpRequest, data: web::Data<AppState>) -> impl Responder {
    dashboard(params.into_inner(), &req, &data).await
}

#[get("/location")]
async fn location(params: web::Query<LocationQuery>, req: HttpRequest, data: web::Data<AppState>) -> impl Responder {
    info!("{:?}", params);

    let store = CookiePreferenceStore::new(data.dashboard.cookie_max_age_days);
    let mut stored = store.load(&req);
    let locale = resolve_locale(None, &mut stored, &data.dashboard, accepted_language(&req, &data.dashboard));
    let search = params.search.as_deref().unwrap_or_default();

    match data.open_meteo.locations(search, &locale).await {
        Ok(places) => {
            let mut response = HttpResponse::Ok();
            if stored.is_dirty() {
                store.save(&mut response, &stored);
            }
            response.json(places)
        },
        Err(e) => {
            error!("failed to search locations: {}", e);
            HttpResponse::BadGateway().finish()
        }
    }
}

/// Resolves preferences, fetches the weather and renders the page
async fn dashboard(params: PreferenceParams, req: &HttpRequest, data: &AppState) -> HttpResponse {
    let store = CookiePreferenceStore::new(data.dashboard.cookie_max_age_days);
    let mut stored = store.load(req);
    let prefs = Preferences::resolve(&params, &mut stored, &data.dashboard, accepted_language(req, &data.dashboard));
    info!("{:?}", prefs);

    match render_dashboard(&prefs, data).await {
        Ok(html) => {
            let mut response = HttpResponse::Ok();
            if stored.is_dirty() {
                store.save(&mut response, &stored);
            }
            response.content_type(ContentType::html()).body(html)
        },
        Err(e) => {
            error!("failed to render dashboard: {}", e);
            match e {
                DashboardError::Upstream(_) => HttpResponse::BadGateway().finish(),
                _ => HttpResponse::InternalServerError().finish(),
            }
        }
    }
}

async fn render_dashboard(prefs: &Preferences, data: &AppState) -> Result<String, DashboardError> {
    let (forecast, air_quality) = tokio::join!(
        data.open_meteo.forecast(&prefs.latitude, &prefs.longitude),
        data.open_meteo.air_quality(&prefs.latitude, &prefs.longitude),
    );
    let forecast = forecast?;
    let air_quality = air_quality?;

    let mut ideal_temps = IdealTemps::default();
    let mut view: Option<WeatherView> = None;

    if let Some(forecast) = &forecast {
        let now = local_now(&forecast.timezone)?;
        if prefs.use_relative_temps {
            ideal_temps = relative_ideal_temps(&data.open_meteo, &prefs.latitude, &prefs.longitude, now.date()).await?;
        }

        let builder = ViewBuilder::new(&data.lookups, &prefs.locale, ideal_temps);
        view = Some(builder.serialize(forecast, air_quality.as_ref(), now)?);
    }

    let page = PageContext {
        timezone: forecast.as_ref().map(|f| f.timezone.as_str()),
        location: &prefs.location,
        latitude: &prefs.latitude,
        longitude: &prefs.longitude,
        locale: &prefs.locale,
        languages: &data.dashboard.languages,
        ideal_temps,
        use_relative_temps: prefs.use_relative_temps,
    };

    Ok(render_index(&data.templates, &data.lookups, view.as_ref(), &page)?)
}
