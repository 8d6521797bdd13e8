//! Saved quotations in ~/.local/share/cotizador/quotations/.
//!
//! Records use the same shape as the web service's `GET /quotation-history/`
//! items, so a dump of that endpoint can be imported as-is.

mod index;
mod storage;

pub use index::{QuotationMeta, filter_quotations, list_quotations};

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use thiserror::Error;
use uuid::Uuid;

use crate::core::quotation::{
    DualQuotationResult, QuotationId, assemble_dual_markdown, split_dual_response,
};
use crate::core::util::truncate_preview;

const TITLE_MAX_LEN: usize = 60;

#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("no data directory available")]
    NoDataDir,
    #[error("quotation not found: {0}")]
    NotFound(String),
    #[error("invalid quotation id: {0:?}")]
    InvalidId(String),
    #[error("title cannot be empty")]
    EmptyTitle,
    #[error("invalid history dump: {0}")]
    InvalidImport(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Accept numeric ids from the web service as well as strings.
fn id_from_any<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    match Value::deserialize(d)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected string or number id, got {other}"
        ))),
    }
}

/// RFC 3339, or a naive `YYYY-MM-DDTHH:MM:SS[.f]` taken as UTC.
fn timestamp<'de, D: Deserializer<'de>>(d: D) -> Result<DateTime<Utc>, D::Error> {
    let s = String::deserialize(d)?;
    if let Ok(t) = DateTime::parse_from_rfc3339(&s) {
        return Ok(t.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(&s, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|t| t.and_utc())
        .map_err(serde::de::Error::custom)
}

/// One saved quotation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuotationRecord {
    #[serde(deserialize_with = "id_from_any")]
    pub id: String,
    #[serde(default)]
    pub user_query: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub customer_name: Option<String>,
    #[serde(default)]
    pub customer_location: Option<String>,
    #[serde(default)]
    pub quotation_id: Option<QuotationId>,
    #[serde(default)]
    pub internal_quotation: Option<String>,
    #[serde(default)]
    pub customer_quotation: Option<String>,
    #[serde(default)]
    pub raw_response: String,
    #[serde(deserialize_with = "timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(deserialize_with = "timestamp")]
    pub updated_at: DateTime<Utc>,
}

fn non_blank(s: &str) -> Option<String> {
    let s = s.trim();
    (!s.is_empty()).then(|| s.to_string())
}

impl QuotationRecord {
    /// New unsaved record from a model response. Stores the split payloads
    /// next to the raw response and derives a title.
    pub fn from_response(
        user_query: &str,
        raw_response: &str,
        customer_name: Option<&str>,
        customer_location: Option<&str>,
        quotation_id: QuotationId,
    ) -> Self {
        let dual = split_dual_response(raw_response);
        let title = dual
            .customer
            .as_ref()
            .and_then(|c| c.title.clone())
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| title_preview(user_query));
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().simple().to_string(),
            user_query: user_query.trim().to_string(),
            title,
            customer_name: customer_name.and_then(non_blank),
            customer_location: customer_location.and_then(non_blank),
            quotation_id: Some(quotation_id),
            internal_quotation: non_blank(&dual.internal_markdown),
            customer_quotation: non_blank(&dual.customer_markdown),
            raw_response: raw_response.to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Parse the stored quotation. When both payloads are present they are
    /// reassembled into the marker format, so edits to either column win over
    /// the raw response.
    pub fn dual_result(&self) -> DualQuotationResult {
        match (&self.internal_quotation, &self.customer_quotation) {
            (Some(internal), Some(customer))
                if !internal.trim().is_empty() && !customer.trim().is_empty() =>
            {
                let mut result = split_dual_response(&assemble_dual_markdown(internal, customer));
                result.raw_response = self.raw_response.clone();
                result
            }
            _ => split_dual_response(&self.raw_response),
        }
    }

    /// Label for export file names: the quotation number, else the record id.
    pub fn export_label(&self) -> String {
        self.quotation_id
            .as_ref()
            .map(|q| q.as_str().to_string())
            .unwrap_or_else(|| self.id.clone())
    }
}

/// Title derived from the user's request.
pub fn title_preview(user_query: &str) -> String {
    if user_query.trim().is_empty() {
        return "(Sin título)".to_string();
    }
    truncate_preview(user_query, TITLE_MAX_LEN)
}

/// Save a record (create or update). An existing entry keeps its `created_at`;
/// `updated_at` is set to now. Old records beyond `max_quotations` are pruned.
pub fn save_quotation(
    record: &QuotationRecord,
    max_quotations: usize,
) -> Result<QuotationRecord, HistoryError> {
    let mut record = record.clone();
    if let Some(existing) = index::find(&record.id)? {
        record.created_at = existing.created_at;
    }
    record.updated_at = Utc::now();
    storage::write_record(&record)?;
    index::add_or_update(QuotationMeta::from(&record))?;
    index::prune(max_quotations)?;
    log::info!("saved quotation {}", record.id);
    Ok(record)
}

pub fn load_quotation(id: &str) -> Result<QuotationRecord, HistoryError> {
    storage::read_record(id)
}

/// Rename a quotation. Updates the index and the record file.
pub fn rename_quotation(id: &str, new_title: &str) -> Result<(), HistoryError> {
    let new_title = new_title.trim();
    if new_title.is_empty() {
        return Err(HistoryError::EmptyTitle);
    }
    let mut record = storage::read_record(id)?;
    record.title = new_title.to_string();
    storage::write_record(&record)?;
    index::update_title(id, new_title)
}

/// Delete a quotation. Removes the file and index entry.
pub fn delete_quotation(id: &str) -> Result<(), HistoryError> {
    storage::remove_record(id)?;
    if !index::remove(id)? {
        return Err(HistoryError::NotFound(id.to_string()));
    }
    Ok(())
}

/// Import a `GET /quotation-history/` dump: a bare array of records or an
/// object with an `items` array. Records keep their own timestamps. Entries
/// that fail to deserialize are skipped with a warning. Returns how many were
/// imported.
pub fn import_history(json: &str, max_quotations: usize) -> Result<usize, HistoryError> {
    let items = match serde_json::from_str::<Value>(json)? {
        Value::Array(items) => items,
        Value::Object(mut obj) => match obj.remove("items") {
            Some(Value::Array(items)) => items,
            _ => {
                return Err(HistoryError::InvalidImport(
                    "expected an array or an object with an \"items\" array".to_string(),
                ));
            }
        },
        _ => {
            return Err(HistoryError::InvalidImport(
                "expected an array or an object with an \"items\" array".to_string(),
            ));
        }
    };

    let mut imported = 0;
    for (i, item) in items.into_iter().enumerate() {
        let mut record: QuotationRecord = match serde_json::from_value(item) {
            Ok(r) => r,
            Err(e) => {
                log::warn!("skipping history item {}: {}", i, e);
                continue;
            }
        };
        if !storage::valid_id(&record.id) {
            log::warn!("skipping history item {}: invalid id {:?}", i, record.id);
            continue;
        }
        if record.title.trim().is_empty() {
            record.title = title_preview(&record.user_query);
        }
        storage::write_record(&record)?;
        index::add_or_update(QuotationMeta::from(&record))?;
        imported += 1;
    }
    index::prune(max_quotations)?;
    log::info!("imported {} quotations", imported);
    Ok(imported)
}

#[cfg(test)]
mod tests;
