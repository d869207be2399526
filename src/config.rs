use std::path::PathBuf;

use rocket::figment::Figment;
use serde::Deserialize;

const DEFAULT_DATA_DIR: &str = "data";

/// Application settings read from the same figment as Rocket's own config,
/// so `Rocket.toml` and `ROCKET_DATA_DIR` both work.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub data_dir: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
        }
    }
}

impl AppConfig {
    pub fn from_figment(figment: &Figment) -> Result<Self, rocket::figment::Error> {
        figment.extract()
    }
}
