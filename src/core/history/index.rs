//! Quotation index: metadata, listing, filtering, and index mutations.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::util::filter_by_query;

use super::{HistoryError, QuotationRecord, storage};

/// Metadata for one saved quotation, kept in `index.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuotationMeta {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub customer_name: Option<String>,
    #[serde(default)]
    pub quotation_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&QuotationRecord> for QuotationMeta {
    fn from(r: &QuotationRecord) -> Self {
        Self {
            id: r.id.clone(),
            title: r.title.clone(),
            customer_name: r.customer_name.clone(),
            quotation_id: r.quotation_id.as_ref().map(|q| q.to_string()),
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

/// Filter by title, customer, quotation number, or record id (case-insensitive).
pub fn filter_quotations<'a>(items: &'a [QuotationMeta], query: &str) -> Vec<&'a QuotationMeta> {
    filter_by_query(items, query.trim(), |m| {
        [
            m.title.as_str(),
            m.customer_name.as_deref().unwrap_or(""),
            m.quotation_id.as_deref().unwrap_or(""),
            m.id.as_str(),
        ]
    })
}

/// All saved quotations, most recently updated first.
pub fn list_quotations() -> Result<Vec<QuotationMeta>, HistoryError> {
    let mut index = storage::load_index()?;
    index
        .quotations
        .sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
    Ok(index.quotations)
}

pub(super) fn find(id: &str) -> Result<Option<QuotationMeta>, HistoryError> {
    Ok(storage::load_index()?
        .quotations
        .into_iter()
        .find(|m| m.id == id))
}

/// Insert or replace the entry with the same id.
pub(super) fn add_or_update(meta: QuotationMeta) -> Result<(), HistoryError> {
    let mut index = storage::load_index()?;
    index.quotations.retain(|m| m.id != meta.id);
    index.quotations.push(meta);
    storage::save_index(&index)
}

pub(super) fn update_title(id: &str, title: &str) -> Result<(), HistoryError> {
    let mut index = storage::load_index()?;
    let Some(meta) = index.quotations.iter_mut().find(|m| m.id == id) else {
        return Err(HistoryError::NotFound(id.to_string()));
    };
    meta.title = title.to_string();
    storage::save_index(&index)
}

/// Remove an entry. Returns whether it existed.
pub(super) fn remove(id: &str) -> Result<bool, HistoryError> {
    let mut index = storage::load_index()?;
    let before = index.quotations.len();
    index.quotations.retain(|m| m.id != id);
    let removed = index.quotations.len() != before;
    if removed {
        storage::save_index(&index)?;
    }
    Ok(removed)
}

/// Drop the oldest quotations beyond `max` (0 keeps everything).
pub(super) fn prune(max: usize) -> Result<(), HistoryError> {
    if max == 0 {
        return Ok(());
    }
    let mut index = storage::load_index()?;
    if index.quotations.len() <= max {
        return Ok(());
    }
    index
        .quotations
        .sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
    let to_remove: Vec<_> = index.quotations.drain(max..).collect();
    for meta in &to_remove {
        if let Err(e) = storage::remove_record(&meta.id) {
            log::warn!("Failed to remove quotation file {}: {}", meta.id, e);
        }
    }
    log::debug!("pruned {} old quotations", to_remove.len());
    storage::save_index(&index)
}
