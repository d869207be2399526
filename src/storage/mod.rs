pub mod announcements;
pub mod credentials;
pub mod dates;
pub mod reports;
pub mod table;

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{info, instrument};

use crate::config::AppConfig;
use crate::error::AppError;

const CREDENTIALS_FILE: &str = "credentials.csv";
const ANNOUNCEMENTS_FILE: &str = "global_announcements.csv";
const REPORTS_DIR: &str = "reports";
const REPORTS_FILE: &str = "reports.csv";

/// Locations of every table under the data directory. Managed as Rocket state.
#[derive(Debug, Clone)]
pub struct Store {
    data_dir: PathBuf,
}

impl Store {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(config.data_dir.clone())
    }

    /// Creates the directory layout, the sample credentials and an empty
    /// announcement log. Existing files are left untouched.
    #[instrument(skip(self), fields(data_dir = %self.data_dir.display()))]
    pub fn initialize(&self) -> Result<(), AppError> {
        fs::create_dir_all(self.data_dir.join(REPORTS_DIR))?;

        if credentials::seed_if_missing(self)? {
            info!("Seeded sample credentials");
        }
        if announcements::initialize(self)? {
            info!("Created empty announcement log");
        }

        Ok(())
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn credentials_path(&self) -> PathBuf {
        self.data_dir.join(CREDENTIALS_FILE)
    }

    pub fn announcements_path(&self) -> PathBuf {
        self.data_dir.join(ANNOUNCEMENTS_FILE)
    }

    pub fn reports_path(&self, user_id: &str) -> Result<PathBuf, AppError> {
        validate_user_id(user_id)?;
        Ok(self
            .data_dir
            .join(REPORTS_DIR)
            .join(user_id)
            .join(REPORTS_FILE))
    }
}

fn validate_user_id(user_id: &str) -> Result<(), AppError> {
    let invalid = user_id.is_empty()
        || user_id == "."
        || user_id.contains("..")
        || user_id.contains(['/', '\\', '\0']);

    if invalid {
        return Err(AppError::Validation(format!(
            "User id {:?} cannot be used as a report directory",
            user_id
        )));
    }

    Ok(())
}
