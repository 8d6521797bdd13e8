//! Index and record file persistence (index.json, quote_*.json).

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::core::paths;

use super::{HistoryError, QuotationMeta, QuotationRecord};

fn index_path() -> Option<PathBuf> {
    paths::quotations_dir().map(|d| d.join("index.json"))
}

/// Record ids become file names, so only `[A-Za-z0-9_-]` is accepted.
pub(super) fn valid_id(id: &str) -> bool {
    !id.is_empty()
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

fn record_path(id: &str) -> Result<PathBuf, HistoryError> {
    if !valid_id(id) {
        return Err(HistoryError::InvalidId(id.to_string()));
    }
    paths::quotations_dir()
        .map(|d| d.join(format!("quote_{}.json", id)))
        .ok_or(HistoryError::NoDataDir)
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub(super) struct IndexFile {
    pub(super) quotations: Vec<QuotationMeta>,
}

pub(super) fn ensure_data_dir() -> Result<PathBuf, HistoryError> {
    let dir = paths::quotations_dir().ok_or(HistoryError::NoDataDir)?;
    fs::create_dir_all(&dir)?;
    Ok(dir)
}

/// Write through a temp file so a crash never leaves a truncated file behind.
fn write_atomic(path: &Path, json: &str) -> Result<(), HistoryError> {
    let tmp = path.with_extension("tmp");
    fs::write(&tmp, json)?;
    fs::rename(tmp, path)?;
    Ok(())
}

/// Load the index. Empty when there is no data dir or no file yet (first run).
pub(super) fn load_index() -> Result<IndexFile, HistoryError> {
    let Some(path) = index_path() else {
        return Ok(IndexFile::default());
    };
    let data = match fs::read_to_string(&path) {
        Ok(d) => d,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(IndexFile::default()),
        Err(e) => return Err(e.into()),
    };
    Ok(serde_json::from_str(&data)?)
}

pub(super) fn save_index(index: &IndexFile) -> Result<(), HistoryError> {
    ensure_data_dir()?;
    let path = index_path().ok_or(HistoryError::NoDataDir)?;
    write_atomic(&path, &serde_json::to_string_pretty(index)?)
}

pub(super) fn read_record(id: &str) -> Result<QuotationRecord, HistoryError> {
    let path = record_path(id)?;
    let data = match fs::read_to_string(&path) {
        Ok(d) => d,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Err(HistoryError::NotFound(id.to_string()));
        }
        Err(e) => return Err(e.into()),
    };
    Ok(serde_json::from_str(&data)?)
}

pub(super) fn write_record(record: &QuotationRecord) -> Result<(), HistoryError> {
    ensure_data_dir()?;
    let path = record_path(&record.id)?;
    write_atomic(&path, &serde_json::to_string_pretty(record)?)
}

pub(super) fn remove_record(id: &str) -> Result<(), HistoryError> {
    let path = record_path(id)?;
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e.into()),
    }
}
