use crate::models::Calories;
use std::{env, path::PathBuf};
use tracing::warn;

pub const DEFAULT_CALORIE_LIMIT: Calories = 2000;
pub const DEFAULT_PORT: u16 = 8080;

/// Runtime settings, read from the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub data_path: PathBuf,
    pub port: u16,
    pub default_calorie_limit: Calories,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let data_path = lookup("APP_DATA_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("data/tracker.json"));

        let port = lookup("PORT")
            .and_then(|value| value.parse::<u16>().ok())
            .unwrap_or(DEFAULT_PORT);

        let default_calorie_limit = match lookup("CALORIE_LIMIT") {
            Some(value) => value.trim().parse::<Calories>().unwrap_or_else(|_| {
                warn!("ignoring CALORIE_LIMIT={value:?}, using {DEFAULT_CALORIE_LIMIT}");
                DEFAULT_CALORIE_LIMIT
            }),
            None => DEFAULT_CALORIE_LIMIT,
        };

        Self {
            data_path,
            port,
            default_calorie_limit,
        }
    }
}
