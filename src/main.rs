mod errors;
mod logging;
mod initialization;
mod handlers;
mod manager_openmeteo;
mod manager_view;
mod metrics;
mod colors;
mod lookups;
mod ideal_temps;
mod preferences;
mod page;

use actix_web::{web, App, HttpServer};
use log::info;
use tera::Tera;
use crate::errors::UnrecoverableError;
use crate::handlers::routes;
use crate::initialization::{config, Dashboard};
use crate::lookups::Lookups;
use crate::manager_openmeteo::OpenMeteo;
use crate::page::load_templates;

pub struct AppState {
    pub open_meteo: OpenMeteo,
    pub lookups: Lookups,
    pub templates: Tera,
    pub dashboard: Dashboard,
}

#[actix_web::main]
async fn main() -> Result<(), UnrecoverableError> {
    let config = config()?;

    let lookups = Lookups::load(&config.dashboard.translations_dir)?;
    let templates = load_templates(&config.dashboard.templates_dir)?;
    let open_meteo = OpenMeteo::new(&config.open_meteo)?;

    let state = web::Data::new(AppState {
        open_meteo,
        lookups,
        templates,
        dashboard: config.dashboard,
    });

    info!("listening on {}:{}", config.web_server.bind_address, config.web_server.bind_port);

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .configure(routes)
    })
        .bind((config.web_server.bind_address, config.web_server.bind_port))?
        .run()
        .await?;

    Ok(())
}
