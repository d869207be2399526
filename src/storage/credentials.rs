use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

use crate::auth::Identity;
use crate::error::AppError;

use super::Store;
use super::table::{Table, read_table, write_table};

pub const COLUMNS: &[&str] = &["user_id", "password", "display_name"];

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Credential {
    pub user_id: String,
    pub password: String,
    pub display_name: String,
}

impl Credential {
    fn new(user_id: &str, password: &str, display_name: &str) -> Self {
        Self {
            user_id: user_id.to_string(),
            password: password.to_string(),
            display_name: display_name.to_string(),
        }
    }

    pub fn identity(&self) -> Identity {
        let display_name = if self.display_name.trim().is_empty() {
            self.user_id.clone()
        } else {
            self.display_name.clone()
        };

        Identity {
            user_id: self.user_id.clone(),
            display_name,
        }
    }
}

fn sample_credentials() -> Vec<Credential> {
    vec![
        Credential::new("taro", "pass123", "山田 太郎"),
        Credential::new("hanako", "pass456", "佐藤 花子"),
    ]
}

/// Returns `true` when the sample file was written.
pub fn seed_if_missing(store: &Store) -> Result<bool, AppError> {
    let path = store.credentials_path();
    if path.exists() {
        return Ok(false);
    }

    write_table(&path, COLUMNS, &sample_credentials())?;
    Ok(true)
}

pub fn load(store: &Store) -> Vec<Credential> {
    let path = store.credentials_path();
    match read_table::<Credential>(&path) {
        Table::Missing => {
            warn!(path = %path.display(), "Credentials table is missing, nobody can log in");
            Vec::new()
        }
        table => table.into_rows_or_empty(&path),
    }
}

pub fn find(store: &Store, user_id: &str) -> Option<Credential> {
    load(store).into_iter().find(|c| c.user_id == user_id)
}

#[instrument(skip(store, password))]
pub fn authenticate(store: &Store, user_id: &str, password: &str) -> Option<Identity> {
    let identity = load(store)
        .into_iter()
        .find(|c| c.user_id == user_id && c.password == password)
        .map(|c| c.identity());

    match &identity {
        Some(_) => info!("Credentials accepted"),
        None => warn!("Credentials rejected"),
    }

    identity
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn seeded_store() -> (TempDir, Store) {
        let dir = TempDir::new().unwrap();
        let store = Store::new(dir.path());
        store.initialize().unwrap();
        (dir, store)
    }

    #[test]
    fn test_seeded_users_can_authenticate() {
        let (_dir, store) = seeded_store();

        let taro = authenticate(&store, "taro", "pass123").expect("taro should log in");
        assert_eq!(taro.user_id, "taro");
        assert_eq!(taro.display_name, "山田 太郎");

        let hanako = authenticate(&store, "hanako", "pass456").expect("hanako should log in");
        assert_eq!(hanako.display_name, "佐藤 花子");
    }

    #[test]
    fn test_wrong_password_is_rejected() {
        let (_dir, store) = seeded_store();

        assert!(authenticate(&store, "taro", "pass456").is_none());
        assert!(authenticate(&store, "taro", "PASS123").is_none());
        assert!(authenticate(&store, "nobody", "pass123").is_none());
        assert!(authenticate(&store, "taro", "").is_none());
    }

    #[test]
    fn test_blank_display_name_falls_back_to_user_id() {
        let dir = TempDir::new().unwrap();
        let store = Store::new(dir.path());
        fs::write(
            store.credentials_path(),
            "user_id,password,display_name\njiro,pw,\n",
        )
        .unwrap();

        let jiro = authenticate(&store, "jiro", "pw").expect("jiro should log in");
        assert_eq!(jiro.display_name, "jiro");
    }

    #[test]
    fn test_missing_display_name_column() {
        let dir = TempDir::new().unwrap();
        let store = Store::new(dir.path());
        fs::write(store.credentials_path(), "user_id,password\njiro,pw\n").unwrap();

        let jiro = find(&store, "jiro").expect("jiro should be found");
        assert_eq!(jiro.identity().display_name, "jiro");
    }

    #[test]
    fn test_missing_table_rejects_everyone() {
        let dir = TempDir::new().unwrap();
        let store = Store::new(dir.path());

        assert!(authenticate(&store, "taro", "pass123").is_none());
        assert!(find(&store, "taro").is_none());
    }
}
