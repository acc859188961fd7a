//! Roster persistence: six parallel newline-delimited column files per dataset.

use std::io;
use std::sync::Arc;

use thiserror::Error;
use tracing::debug;

use crate::schema::IdentityRow;
use crate::storage::Storage;

pub const ROLL_FILE: &str = "roll.txt";
pub const NAME_FILE: &str = "name.txt";
pub const URL_FILE: &str = "urls.txt";
pub const SECTION_FILE: &str = "sections.txt";
pub const DAY_FILE: &str = "day.txt";
pub const PHONE_FILE: &str = "mobno.txt";

#[derive(Debug, Error)]
pub enum RosterError {
    #[error("roster shape mismatch in {dataset}: {counts}")]
    ShapeMismatch { dataset: String, counts: String },
    #[error("failed to read {path}: {source}")]
    ReadFailed { path: String, source: io::Error },
    #[error("failed to write {path}: {source}")]
    WriteFailed { path: String, source: io::Error },
    #[error("row {index} out of range for {dataset} ({len} rows)")]
    RowOutOfRange { dataset: String, index: usize, len: usize },
    #[error("invalid column value {value:?}: {reason}")]
    InvalidValue { value: String, reason: &'static str },
}

pub type Result<T> = std::result::Result<T, RosterError>;

/// A dataset's roster, assembled once from the column files.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Roster {
    pub dataset: String,
    pub rows: Vec<IdentityRow>,
}

impl Roster {
    pub fn find(&self, identifier: &str) -> Option<usize> {
        find_row_index(&self.rows, identifier)
    }
}

pub fn roster_dir(dataset: &str) -> String {
    format!("details_{dataset}")
}

pub fn column_path(dataset: &str, file: &str) -> String {
    format!("{}/{file}", roster_dir(dataset))
}

/// Normalizes a value for a column file the way `load` would read it back.
///
/// Blank values would be dropped by the loader and line breaks would split
/// the row, so both are rejected.
pub fn column_value(value: &str) -> Result<&str> {
    let trimmed = value.trim();
    let reason = if trimmed.is_empty() {
        "value is blank"
    } else if trimmed.contains(['\n', '\r']) {
        "value contains a line break"
    } else {
        return Ok(trimmed);
    };
    Err(RosterError::InvalidValue { value: value.to_string(), reason })
}

/// Exact match against the identifier column.
pub fn find_row_index(rows: &[IdentityRow], identifier: &str) -> Option<usize> {
    rows.iter().position(|r| r.identifier == identifier)
}

#[derive(Clone)]
pub struct RosterStore {
    storage: Arc<dyn Storage>,
}

impl RosterStore {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    pub fn load(&self, dataset: &str) -> Result<Roster> {
        let rolls = self.read_column(dataset, ROLL_FILE)?;
        let names = self.read_column(dataset, NAME_FILE)?;
        let urls = self.read_column(dataset, URL_FILE)?;
        let sections = self.read_column(dataset, SECTION_FILE)?;
        let phones = self.read_column(dataset, PHONE_FILE)?;
        // five-file rosters have no day column
        let days = if self.storage.exists(&column_path(dataset, DAY_FILE)) {
            Some(self.read_column(dataset, DAY_FILE)?)
        } else {
            None
        };

        let n = rolls.len();
        let mut counts = vec![
            (ROLL_FILE, rolls.len()),
            (NAME_FILE, names.len()),
            (URL_FILE, urls.len()),
            (SECTION_FILE, sections.len()),
            (PHONE_FILE, phones.len()),
        ];
        if let Some(days) = &days {
            counts.push((DAY_FILE, days.len()));
        }
        if counts.iter().any(|(_, c)| *c != n) {
            let counts = counts
                .iter()
                .map(|(file, c)| format!("{file}={c}"))
                .collect::<Vec<_>>()
                .join(", ");
            return Err(RosterError::ShapeMismatch { dataset: dataset.to_string(), counts });
        }

        let mut days = days.map(Vec::into_iter);
        let rows = rolls
            .into_iter()
            .zip(names)
            .zip(urls)
            .zip(sections)
            .zip(phones)
            .map(|((((identifier, name), profile_url), section), phone)| IdentityRow {
                identifier,
                name,
                profile_url,
                section,
                day: days.as_mut().and_then(Iterator::next).unwrap_or_default(),
                phone,
            })
            .collect::<Vec<_>>();

        debug!(dataset, rows = rows.len(), "roster loaded");
        Ok(Roster { dataset: dataset.to_string(), rows })
    }

    /// Overwrites the whole URL column with `new_url` at `row_index`.
    pub fn replace_profile_url(&self, dataset: &str, row_index: usize, new_url: &str) -> Result<()> {
        let new_url = column_value(new_url)?;
        let roster = self.load(dataset)?;
        if row_index >= roster.rows.len() {
            return Err(RosterError::RowOutOfRange {
                dataset: dataset.to_string(),
                index: row_index,
                len: roster.rows.len(),
            });
        }

        let urls = roster
            .rows
            .iter()
            .enumerate()
            .map(|(i, r)| if i == row_index { new_url } else { r.profile_url.as_str() })
            .collect::<Vec<_>>()
            .join("\n");

        let path = column_path(dataset, URL_FILE);
        self.storage
            .write(&path, &urls)
            .map_err(|source| RosterError::WriteFailed { path, source })
    }

    fn read_column(&self, dataset: &str, file: &str) -> Result<Vec<String>> {
        let path = column_path(dataset, file);
        let raw = self
            .storage
            .read(&path)
            .map_err(|source| RosterError::ReadFailed { path, source })?;
        Ok(raw
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(str::to_string)
            .collect())
    }
}
