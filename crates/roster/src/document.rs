//! Per-dataset merged documents (`data_<Dataset>.json`) and the ranking rule.

use std::io;
use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::storage::Storage;

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("failed to read {path}: {source}")]
    ReadFailed { path: String, source: io::Error },
    #[error("{path} is not a JSON array of records: {source}")]
    Malformed { path: String, source: serde_json::Error },
    #[error("failed to write {path}: {source}")]
    WriteFailed { path: String, source: io::Error },
    #[error("failed to serialize {path}: {source}")]
    Serialize { path: String, source: serde_json::Error },
}

pub fn document_path(dataset: &str) -> String {
    format!("data_{dataset}.json")
}

/// Solved count of a stored entry; missing or non-numeric counts as 0.
pub fn solved_count(entry: &Value) -> u64 {
    match entry.get("totalSolved") {
        Some(v) => v
            .as_u64()
            .or_else(|| v.as_f64().filter(|f| f.is_finite() && *f > 0.0).map(|f| f as u64))
            .unwrap_or(0),
        None => 0,
    }
}

/// Descending by solved count. Stable, so ties keep input order.
pub fn rank_by_solved<T>(records: &mut [T], solved: impl Fn(&T) -> u64) {
    records.sort_by(|a, b| solved(b).cmp(&solved(a)));
}

#[derive(Clone)]
pub struct DocumentStore {
    storage: Arc<dyn Storage>,
}

impl DocumentStore {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    /// Raw document text, `None` if the dataset has not been merged yet.
    pub fn read_raw(&self, dataset: &str) -> Result<Option<String>, DocumentError> {
        let path = document_path(dataset);
        match self.storage.read(&path) {
            Ok(raw) => Ok(Some(raw)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(DocumentError::ReadFailed { path, source }),
        }
    }

    /// Entries kept as plain JSON so records written by older runs survive untouched.
    pub fn load_entries(&self, dataset: &str) -> Result<Option<Vec<Value>>, DocumentError> {
        let Some(raw) = self.read_raw(dataset)? else {
            return Ok(None);
        };
        serde_json::from_str(&raw)
            .map(Some)
            .map_err(|source| DocumentError::Malformed { path: document_path(dataset), source })
    }

    pub fn save<T: Serialize>(&self, dataset: &str, records: &[T]) -> Result<(), DocumentError> {
        let path = document_path(dataset);
        let body = match serde_json::to_string_pretty(records) {
            Ok(b) => b,
            Err(source) => return Err(DocumentError::Serialize { path, source }),
        };
        self.storage
            .write(&path, &body)
            .map_err(|source| DocumentError::WriteFailed { path, source })
    }
}
