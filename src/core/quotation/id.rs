//! Human-readable quotation number: 6 random digits followed by the date as DDMMYY.
//!
//! It is a display label, not a key: collisions are possible. Generate it once per
//! quotation and pass the value along.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuotationId(String);

impl QuotationId {
    /// New id for a quotation dated `date`. The random part comes from a v4 UUID.
    pub fn generate(date: NaiveDate) -> Self {
        let random = (Uuid::new_v4().as_u128() % 1_000_000) as u32;
        Self::from_parts(random, date)
    }

    /// New id dated today (local time).
    pub fn generate_today() -> Self {
        Self::generate(chrono::Local::now().date_naive())
    }

    /// Deterministic construction; `random` is reduced to 6 digits.
    pub fn from_parts(random: u32, date: NaiveDate) -> Self {
        Self(format!("{:06}{}", random % 1_000_000, date.format("%d%m%y")))
    }

    /// Accept an existing label (e.g. from history). Returns None unless it is 12 digits.
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        if s.len() == 12 && s.chars().all(|c| c.is_ascii_digit()) {
            Some(Self(s.to_string()))
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for QuotationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 7).unwrap()
    }

    #[test]
    fn from_parts_pads_random_and_formats_date() {
        let id = QuotationId::from_parts(42, date());
        assert_eq!(id.as_str(), "000042070326");
    }

    #[test]
    fn from_parts_reduces_to_six_digits() {
        let id = QuotationId::from_parts(1_234_567, date());
        assert_eq!(id.as_str(), "234567070326");
    }

    #[test]
    fn generate_matches_format() {
        let re = regex::Regex::new(r"^\d{6}\d{6}$").unwrap();
        for _ in 0..50 {
            let id = QuotationId::generate(date());
            assert!(re.is_match(id.as_str()), "bad id {}", id);
            assert!(id.as_str().ends_with("070326"));
        }
    }

    #[test]
    fn generate_today_matches_format() {
        let id = QuotationId::generate_today();
        assert_eq!(id.as_str().len(), 12);
        assert!(QuotationId::parse(id.as_str()).is_some());
    }

    #[test]
    fn parse_rejects_malformed() {
        assert!(QuotationId::parse("12345").is_none());
        assert!(QuotationId::parse("abcdef070326").is_none());
        assert_eq!(
            QuotationId::parse(" 000042070326 ").map(|id| id.to_string()),
            Some("000042070326".to_string())
        );
    }

    #[test]
    fn serializes_as_plain_string() {
        let id = QuotationId::from_parts(7, date());
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"000007070326\"");
    }
}
