#[macro_use]
extern crate rocket;

#[macro_use]
extern crate log;

use rocket::{Build, Rocket};

pub mod api;
pub mod cache;
pub mod clock;
pub mod config;
pub mod error;
pub mod logging;
pub mod model;
pub mod rules;

pub use config::Config;

use cache::Caches;
use clock::Clock;
use config::{ConfigFairing, DatabaseFairing};
use logging::LoggerFairing;

/// Build the rocket instance: routes, fairings and managed state.
/// The database connection is established when the instance ignites.
pub fn build() -> Rocket<Build> {
    rocket::build()
        .mount("/", api::routes())
        .attach(ConfigFairing)
        .attach(DatabaseFairing)
        .attach(LoggerFairing)
        .manage(Clock::system())
        .manage(Caches::default())
}
