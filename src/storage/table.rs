//! Whole-file CSV tables with a header row.
//!
//! Reads report whether the file was missing, parsed, or unreadable so the
//! caller can decide between "empty" and "refuse to overwrite". Writes always
//! replace the complete file through a temporary sibling and a rename.

use std::fs::{self, File};
use std::io::{ErrorKind, Read, Write};
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tracing::{debug, instrument};
use uuid::Uuid;

use crate::error::AppError;

#[derive(Debug)]
pub enum Table<T> {
    Missing,
    Present(Vec<T>),
    Unreadable(AppError),
}

impl<T> Table<T> {
    /// Display paths treat a broken file like an absent one, after logging it.
    pub fn into_rows_or_empty(self, path: &Path) -> Vec<T> {
        match self {
            Table::Present(rows) => rows,
            Table::Missing => Vec::new(),
            Table::Unreadable(err) => {
                err.log_and_record(&format!("Reading {}", path.display()));
                Vec::new()
            }
        }
    }

    /// Rows to rewrite. An unreadable file is an error so it is never clobbered.
    pub fn into_rows_for_update(self) -> Result<Vec<T>, AppError> {
        match self {
            Table::Present(rows) => Ok(rows),
            Table::Missing => Ok(Vec::new()),
            Table::Unreadable(err) => Err(err),
        }
    }
}

#[instrument(level = "debug")]
pub fn read_table<T: DeserializeOwned>(path: &Path) -> Table<T> {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(err) if err.kind() == ErrorKind::NotFound => return Table::Missing,
        Err(err) => return Table::Unreadable(AppError::Io(err)),
    };

    let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(file);
    match read_rows(&mut reader) {
        Ok(rows) => {
            debug!(rows = rows.len(), "Read table");
            Table::Present(rows)
        }
        Err(err) => Table::Unreadable(AppError::Malformed(format!(
            "{}: {}",
            path.display(),
            err
        ))),
    }
}

fn read_rows<T: DeserializeOwned, R: Read>(reader: &mut csv::Reader<R>) -> Result<Vec<T>, csv::Error> {
    let headers = reader.headers()?.clone();

    let mut rows = Vec::new();
    for record in reader.records() {
        let mut record = record?;
        // Short rows get empty cells; absent columns fall back to `#[serde(default)]`.
        while record.len() < headers.len() {
            record.push_field("");
        }
        rows.push(record.deserialize(Some(&headers))?);
    }

    Ok(rows)
}

#[instrument(level = "debug", skip(rows))]
pub fn write_table<T: Serialize>(path: &Path, headers: &[&str], rows: &[T]) -> Result<(), AppError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let tmp_path = temporary_sibling(path);
    let result = write_rows(&tmp_path, headers, rows)
        .and_then(|()| fs::rename(&tmp_path, path).map_err(AppError::from));

    match &result {
        Ok(()) => debug!(rows = rows.len(), "Wrote table"),
        Err(_) => {
            let _ = fs::remove_file(&tmp_path);
        }
    }

    result
}

fn write_rows<T: Serialize>(path: &Path, headers: &[&str], rows: &[T]) -> Result<(), AppError> {
    let file = File::create(path)?;

    // Headers are written by hand so an empty table still carries its schema.
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(file);

    writer.write_record(headers)?;
    for row in rows {
        writer.serialize(row)?;
    }

    let mut file = writer
        .into_inner()
        .map_err(|err| AppError::Io(err.into_error()))?;
    file.flush()?;
    file.sync_all()?;

    Ok(())
}

fn temporary_sibling(path: &Path) -> PathBuf {
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "table".to_string());

    path.with_file_name(format!(".{}.{}.tmp", file_name, Uuid::new_v4()))
}

pub fn parse_flag(raw: &str) -> bool {
    matches!(
        raw.trim().to_ascii_lowercase().as_str(),
        "true" | "1" | "1.0" | "yes" | "on"
    )
}

pub fn deserialize_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.as_deref().map(parse_flag).unwrap_or(false))
}

pub fn serialize_flag<S>(flag: &bool, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(if *flag { "True" } else { "False" })
}
