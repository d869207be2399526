use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::error::AppError;

use super::Store;
use super::dates::{newest_first, normalize_date_key, parse_date};
use super::table::{deserialize_flag, read_table, serialize_flag, write_table};

pub const COLUMNS: &[&str] = &["date", "user_id", "display_name", "announcement", "done"];

/// One row of the shared log. Older files without a `done` column read as not done.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Announcement {
    pub date: String,
    pub user_id: String,
    pub display_name: String,
    pub announcement: String,
    #[serde(
        deserialize_with = "deserialize_flag",
        serialize_with = "serialize_flag"
    )]
    pub done: bool,
}

/// An announcement as shown on the board, remembering its row in the file.
/// `done` stays a plain bool here so templates can branch on it.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct BoardEntry {
    pub row: usize,
    pub date: String,
    pub user_id: String,
    pub display_name: String,
    pub announcement: String,
    pub done: bool,
}

impl BoardEntry {
    fn new(row: usize, entry: Announcement) -> Self {
        Self {
            row,
            date: entry.date,
            user_id: entry.user_id,
            display_name: entry.display_name,
            announcement: entry.announcement,
            done: entry.done,
        }
    }
}

/// Returns `true` when the log file had to be created.
pub fn initialize(store: &Store) -> Result<bool, AppError> {
    let path = store.announcements_path();
    if path.exists() {
        return Ok(false);
    }

    write_table::<Announcement>(&path, COLUMNS, &[])?;
    Ok(true)
}

pub fn load(store: &Store) -> Vec<Announcement> {
    let path = store.announcements_path();
    read_table(&path).into_rows_or_empty(&path)
}

/// Appends `text` to the shared log unless it is blank. Returns whether a row was added.
#[instrument(skip(store, text))]
pub fn append(
    store: &Store,
    user_id: &str,
    display_name: &str,
    date: &str,
    text: &str,
) -> Result<bool, AppError> {
    if text.trim().is_empty() {
        return Ok(false);
    }

    let path = store.announcements_path();
    let mut rows = read_table::<Announcement>(&path).into_rows_for_update()?;

    rows.push(Announcement {
        date: normalize_date_key(date),
        user_id: user_id.to_string(),
        display_name: display_name.to_string(),
        announcement: text.to_string(),
        done: false,
    });

    write_table(&path, COLUMNS, &rows)?;
    info!(rows = rows.len(), "Appended announcement");

    Ok(true)
}

/// Applies `(row, done)` pairs and rewrites the log if anything changed.
/// Returns the number of rows whose flag actually flipped.
#[instrument(skip(store))]
pub fn set_done_flags(store: &Store, changes: &[(usize, bool)]) -> Result<usize, AppError> {
    let path = store.announcements_path();
    let mut rows = read_table::<Announcement>(&path).into_rows_for_update()?;

    if let Some((row, _)) = changes.iter().find(|(row, _)| *row >= rows.len()) {
        return Err(AppError::NotFound(format!(
            "Announcement row {} (log has {} rows)",
            row,
            rows.len()
        )));
    }

    let mut changed = 0;
    for &(row, done) in changes {
        if rows[row].done != done {
            rows[row].done = done;
            changed += 1;
        }
    }

    if changed > 0 {
        write_table(&path, COLUMNS, &rows)?;
        info!(changed, "Updated announcement done flags");
    }

    Ok(changed)
}

/// Open items first, then done ones; newest date first inside each group.
pub fn board(store: &Store) -> Vec<BoardEntry> {
    sort_for_board(load(store))
}

pub fn sort_for_board(rows: Vec<Announcement>) -> Vec<BoardEntry> {
    let mut entries: Vec<BoardEntry> = rows
        .into_iter()
        .enumerate()
        .map(|(row, entry)| BoardEntry::new(row, entry))
        .collect();

    entries.sort_by(|a, b| {
        a.done
            .cmp(&b.done)
            .then_with(|| newest_first(parse_date(&a.date), parse_date(&b.date)))
    });

    entries
}
