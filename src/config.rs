use chrono::{Duration, NaiveTime};
use mongodb::Client as MongoClient;
use rocket::{
    fairing::{Fairing, Info, Kind},
    futures::TryFutureExt,
    Build, Rocket,
};
use serde::Deserialize;

use crate::model::{
    db::ensure_admin_exists,
    mongodb::{ensure_counters_exist, ensure_indexes_exist},
};

/// Application configuration, derived from `Rocket.toml` and `ROCKET_*`
/// environment variables. This struct becomes managed state and can be
/// inspected by any endpoint.
#[derive(Deserialize)]
pub struct Config {
    // non-secrets
    vote_end: NaiveTime,
    auth_ttl: u32,
    // secrets
    jwt_secret: String,
}

impl Config {
    /// Time of day after which votes can no longer be created or changed.
    pub fn vote_end(&self) -> NaiveTime {
        self.vote_end
    }

    /// Valid lifetime of auth token cookies.
    pub fn auth_ttl(&self) -> Duration {
        Duration::seconds(self.auth_ttl.into())
    }

    /// Secret key used to sign auth tokens.
    pub fn jwt_secret(&self) -> &[u8] {
        self.jwt_secret.as_bytes()
    }
}

/// A fairing that loads the application config and puts it in managed
/// state, with control over the error message on failure.
pub struct ConfigFairing;

#[rocket::async_trait]
impl Fairing for ConfigFairing {
    fn info(&self) -> Info {
        Info {
            name: "Config",
            kind: Kind::Ignite,
        }
    }

    async fn on_ignite(&self, rocket: Rocket<Build>) -> rocket::fairing::Result {
        let config = match rocket.figment().extract::<Config>() {
            Ok(config) => config,
            Err(e) => {
                error!("Failed to load application config");
                rocket::config::pretty_print_error(e);
                return Err(rocket);
            }
        };
        Ok(rocket.manage(config))
    }
}

/// Configuration for the database.
#[derive(Deserialize)]
struct DbConfig {
    // secrets
    db_uri: String,
}

/// A fairing that loads the database config, connects, performs any setup
/// necessary, and places both a `Client` and a `Database` into managed
/// state.
pub struct DatabaseFairing;

#[rocket::async_trait]
impl Fairing for DatabaseFairing {
    fn info(&self) -> Info {
        Info {
            name: "MongoDB",
            kind: Kind::Ignite,
        }
    }

    async fn on_ignite(&self, mut rocket: Rocket<Build>) -> rocket::fairing::Result {
        let config = match rocket.figment().extract::<DbConfig>() {
            Ok(config) => config,
            Err(e) => {
                error!("Failed to load database config");
                rocket::config::pretty_print_error(e);
                return Err(rocket);
            }
        };
        info!("Loaded database config, connecting...");
        let client = match MongoClient::with_uri_str(config.db_uri).await {
            Ok(client) => client,
            Err(e) => {
                error!("Failed to connect to database: {e}");
                return Err(rocket);
            }
        };
        let db = client.database(&get_database_name());

        // Unique indexes are the sole arbiter of the one-vote-per-day and
        // the catalog uniqueness rules; they must exist before launch.
        if let Err(e) = ensure_indexes_exist(&db).await {
            error!("Failed to prepare database indexes: {e}");
            return Err(rocket);
        }

        // Id counters and a bootstrap admin account must exist as well.
        if let Err(e) = ensure_counters_exist(&db)
            .err_into()
            .and_then(|_| ensure_admin_exists(&db))
            .await
        {
            error!("Failed to prepare database contents: {e}");
            return Err(rocket);
        }
        info!("...database connection online!");

        rocket = rocket.manage(client).manage(db);
        Ok(rocket)
    }
}

/// Get the name of the database to use (production version).
#[cfg(not(test))]
fn get_database_name() -> String {
    "lunchvote".to_string()
}

/// Get the name of the database to use (test version).
/// Use a random name to avoid collisions between tests.
#[cfg(test)]
fn get_database_name() -> String {
    let random: u32 = rand::random();
    let db = format!("test{random}");
    info!("Using database {db}");
    db
}

/// Example data for tests.
#[cfg(test)]
mod examples {
    use super::*;

    impl Config {
        pub fn example() -> Self {
            Self {
                vote_end: NaiveTime::from_hms_opt(11, 0, 0).unwrap(),
                auth_ttl: 86400,
                jwt_secret: "super-secret-test-key".to_string(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cutoff_parses_from_iso_time() {
        let config: Config = rocket::figment::Figment::new()
            .merge(rocket::figment::providers::Serialized::defaults(
                serde_json::json!({
                    "vote_end": "11:00:00",
                    "auth_ttl": 3600,
                    "jwt_secret": "secret",
                }),
            ))
            .extract()
            .unwrap();
        assert_eq!(config.vote_end(), NaiveTime::from_hms_opt(11, 0, 0).unwrap());
        assert_eq!(config.auth_ttl(), Duration::seconds(3600));
    }
}
