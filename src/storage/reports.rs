use std::collections::HashMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::error::AppError;

use super::Store;
use super::dates::{newest_first, normalize_date_key, parse_date};
use super::table::{read_table, write_table};

pub const COLUMNS: &[&str] = &["date", "work", "announcement", "notes", "next_plan"];

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DailyReport {
    pub date: String,
    pub work: String,
    pub announcement: String,
    pub notes: String,
    pub next_plan: String,
}

impl DailyReport {
    pub fn parsed_date(&self) -> Option<NaiveDate> {
        parse_date(&self.date)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    Created,
    Updated,
}

/// What the "next working day" banner shows for a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Banner {
    NoReports,
    Blank,
    Plan(String),
}

/// All reports for `user_id` in file order. Never fails: a missing or broken
/// table reads as empty.
#[instrument(skip(store))]
pub fn load(store: &Store, user_id: &str) -> Vec<DailyReport> {
    match store.reports_path(user_id) {
        Ok(path) => read_table(&path).into_rows_or_empty(&path),
        Err(err) => {
            err.log_and_record("Loading reports");
            Vec::new()
        }
    }
}

/// Stores one report per normalized date, replacing any earlier one.
#[instrument(skip(store, report), fields(date = %report.date))]
pub fn save(store: &Store, user_id: &str, report: DailyReport) -> Result<SaveOutcome, AppError> {
    let path = store.reports_path(user_id)?;
    let mut rows = read_table::<DailyReport>(&path).into_rows_for_update()?;

    for row in rows.iter_mut() {
        row.date = normalize_date_key(&row.date);
    }

    let date_key = normalize_date_key(&report.date);
    let existed = rows.iter().any(|row| row.date == date_key);
    rows.retain(|row| row.date != date_key);

    rows.push(DailyReport {
        date: date_key,
        ..report
    });

    let rows = keep_last_per_date(rows);
    write_table(&path, COLUMNS, &rows)?;

    let outcome = if existed {
        SaveOutcome::Updated
    } else {
        SaveOutcome::Created
    };
    info!(outcome = ?outcome, "Saved report");

    Ok(outcome)
}

fn keep_last_per_date(rows: Vec<DailyReport>) -> Vec<DailyReport> {
    let last_index: HashMap<String, usize> = rows
        .iter()
        .enumerate()
        .map(|(idx, row)| (row.date.clone(), idx))
        .collect();

    rows.into_iter()
        .enumerate()
        .filter(|(idx, row)| last_index.get(&row.date) == Some(idx))
        .map(|(_, row)| row)
        .collect()
}

/// Newest first; rows whose date does not parse go last in file order.
pub fn history(store: &Store, user_id: &str) -> Vec<DailyReport> {
    let mut rows = load(store, user_id);
    rows.sort_by(|a, b| newest_first(a.parsed_date(), b.parsed_date()));
    rows
}

pub fn latest_next_plan(store: &Store, user_id: &str) -> Banner {
    banner_for(&history(store, user_id))
}

pub fn banner_for(history: &[DailyReport]) -> Banner {
    match history.first() {
        None => Banner::NoReports,
        Some(report) => {
            let plan = report.next_plan.trim();
            if plan.is_empty() {
                Banner::Blank
            } else {
                Banner::Plan(plan.to_string())
            }
        }
    }
}
