#[macro_use]
extern crate rocket;

mod auth;
mod config;
mod env;
mod error;
mod models;
mod routes;
mod storage;
mod telemetry;
#[cfg(test)]
mod test;

use config::AppConfig;
use error::AppError;
use rocket::fairing::AdHoc;
use rocket::figment::Figment;
use rocket::{Build, Rocket};
use rocket_dyn_templates::Template;
use routes::{
    health, index, login, logout, submit_report, submit_report_unauthorized, update_board,
};
use storage::Store;
use telemetry::{TelemetryFairing, init_tracing};
use tracing::{error, info};

#[launch]
fn rocket() -> _ {
    init_tracing();

    if let Err(e) = env::load_environment() {
        error!("Failed to load environment files: {:#}", e);
    }

    init_rocket(rocket::Config::figment())
}

pub fn init_rocket(figment: Figment) -> Rocket<Build> {
    info!("Starting daily report board");

    rocket::custom(figment)
        .mount(
            "/",
            routes![
                index,
                login,
                logout,
                submit_report,
                submit_report_unauthorized,
                update_board,
                health,
            ],
        )
        .attach(AdHoc::try_on_ignite("Report store", |rocket| async move {
            match open_store(rocket.figment()) {
                Ok(store) => Ok(rocket.manage(store)),
                Err(e) => {
                    e.log_and_record("Opening report store");
                    Err(rocket)
                }
            }
        }))
        .attach(Template::fairing())
        .attach(TelemetryFairing)
}

fn open_store(figment: &Figment) -> Result<Store, AppError> {
    let config = AppConfig::from_figment(figment)?;
    let store = Store::from_config(&config);
    store.initialize()?;

    info!(data_dir = %store.data_dir().display(), "Report store ready");
    Ok(store)
}
