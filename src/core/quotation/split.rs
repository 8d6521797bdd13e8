//! Dual-response splitter: separates the internal and customer documents carried
//! between sentinel comments in one AI response.

use std::sync::OnceLock;

use regex::Regex;

use super::{DualQuotationResult, parse_internal_quotation, parse_quotation};

pub const INTERNAL_START: &str = "<!-- INTERNAL_QUOTATION_START -->";
pub const INTERNAL_END: &str = "<!-- INTERNAL_QUOTATION_END -->";
pub const CUSTOMER_START: &str = "<!-- CUSTOMER_QUOTATION_START -->";
pub const CUSTOMER_END: &str = "<!-- CUSTOMER_QUOTATION_END -->";

struct Markers {
    internal_start: Regex,
    internal_end: Regex,
    customer_start: Regex,
    customer_end: Regex,
}

fn marker(name: &str) -> Regex {
    Regex::new(&format!(r"<!--\s*{}\s*-->", name)).expect("marker pattern is a literal")
}

static MARKERS: OnceLock<Markers> = OnceLock::new();

fn markers() -> &'static Markers {
    MARKERS.get_or_init(|| Markers {
        internal_start: marker("INTERNAL_QUOTATION_START"),
        internal_end: marker("INTERNAL_QUOTATION_END"),
        customer_start: marker("CUSTOMER_QUOTATION_START"),
        customer_end: marker("CUSTOMER_QUOTATION_END"),
    })
}

/// Text strictly between `start` and the first `end` after it, trimmed.
/// None when either marker is missing or the enclosed text is blank.
fn extract_between<'a>(raw: &'a str, start: &Regex, end: &Regex) -> Option<&'a str> {
    let open = start.find(raw)?;
    let after = &raw[open.end()..];
    let close = end.find(after)?;
    let body = after[..close.start()].trim();
    (!body.is_empty()).then_some(body)
}

/// Split a raw AI response and parse each side.
///
/// A side whose markers are absent or unpaired is `None` with an empty markdown
/// string; the caller falls back to `raw_response` for it. Never fails.
pub fn split_dual_response(raw: &str) -> DualQuotationResult {
    let m = markers();
    let internal_md = extract_between(raw, &m.internal_start, &m.internal_end);
    let customer_md = extract_between(raw, &m.customer_start, &m.customer_end);
    if internal_md.is_none() || customer_md.is_none() {
        log::debug!(
            "dual response incomplete: internal={} customer={}",
            internal_md.is_some(),
            customer_md.is_some()
        );
    }
    DualQuotationResult {
        internal: internal_md.map(parse_internal_quotation),
        customer: customer_md.map(parse_quotation),
        internal_markdown: internal_md.unwrap_or_default().to_string(),
        customer_markdown: customer_md.unwrap_or_default().to_string(),
        raw_response: raw.to_string(),
    }
}

/// Rebuild the marker format from two stored payloads (internal first).
pub fn assemble_dual_markdown(internal: &str, customer: &str) -> String {
    format!(
        "{}\n{}\n{}\n\n{}\n{}\n{}\n",
        INTERNAL_START,
        internal.trim(),
        INTERNAL_END,
        CUSTOMER_START,
        customer.trim(),
        CUSTOMER_END
    )
}
