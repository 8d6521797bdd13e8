//! Price extraction from table cells and peso formatting.
//!
//! Extraction is best-effort: anything that does not parse as a number counts as
//! zero. A malformed price therefore under-totals the document instead of
//! failing the render.

use super::LineItem;

/// Parse an amount cell such as `"$12,345.67"` or `"$1,200.00 MXN"`.
/// Returns 0.0 for `"Consultar"`, empty or otherwise non-numeric cells.
pub fn extract_price(cell: &str) -> f64 {
    let mut cleaned: String = cell
        .chars()
        .filter(|c| !matches!(c, '$' | ',' | '*' | '_') && !c.is_whitespace())
        .collect();
    let lowered = cleaned.to_ascii_lowercase();
    for suffix in ["mxn", "m.n.", "m.n"] {
        if lowered.ends_with(suffix) {
            cleaned.truncate(cleaned.len() - suffix.len());
            break;
        }
    }
    match cleaned.parse::<f64>() {
        Ok(v) if v.is_finite() => v,
        _ => 0.0,
    }
}

/// Sum of the `importe` cells of one table block, added up in whole cents.
pub fn table_total<T: LineItem>(items: &[T]) -> f64 {
    let cents: i64 = items
        .iter()
        .map(|item| (extract_price(item.importe()) * 100.0).round() as i64)
        .sum();
    cents as f64 / 100.0
}

/// Format as pesos with thousands separators and two decimals: `$1,234.50`.
pub fn format_currency(amount: f64) -> String {
    if !amount.is_finite() {
        return "$0.00".to_string();
    }
    let cents = (amount.abs() * 100.0).round() as u64;
    let whole = (cents / 100).to_string();
    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, c) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    let sign = if amount < 0.0 && cents > 0 { "-" } else { "" };
    format!("{}${}.{:02}", sign, grouped, cents % 100)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::quotation::QuotationLineItem;

    fn item(importe: &str) -> QuotationLineItem {
        QuotationLineItem {
            importe: importe.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn extract_price_formatted_amounts() {
        assert_eq!(extract_price("$12,345.67"), 12345.67);
        assert_eq!(extract_price("$1,234.50"), 1234.50);
        assert_eq!(extract_price(" $ 100.00 "), 100.0);
        assert_eq!(extract_price("2500"), 2500.0);
    }

    #[test]
    fn extract_price_strips_currency_suffix_and_emphasis() {
        assert_eq!(extract_price("$1,200.00 MXN"), 1200.0);
        assert_eq!(extract_price("$1,200.00 mxn"), 1200.0);
        assert_eq!(extract_price("**$3,000.00**"), 3000.0);
        assert_eq!(extract_price("$45.10 M.N."), 45.10);
    }

    #[test]
    fn extract_price_non_numeric_is_zero() {
        assert_eq!(extract_price("Consultar"), 0.0);
        assert_eq!(extract_price(""), 0.0);
        assert_eq!(extract_price("$abc"), 0.0);
        assert_eq!(extract_price("N/A"), 0.0);
        assert_eq!(extract_price("inf"), 0.0);
        assert_eq!(extract_price("NaN"), 0.0);
    }

    #[test]
    fn table_total_sums_and_ignores_malformed() {
        let items = vec![item("$100.00"), item("$50.50"), item("$abc"), item("Consultar")];
        assert_eq!(table_total(&items), 150.50);
        // Repeated computation yields the same value.
        assert_eq!(table_total(&items), table_total(&items));
    }

    #[test]
    fn table_total_adds_cents_exactly() {
        let items = vec![item("$0.10"), item("$0.20")];
        assert_eq!(table_total(&items), 0.30);
        let items: Vec<QuotationLineItem> = (0..10).map(|_| item("$1,234.01")).collect();
        assert_eq!(table_total(&items), 12340.10);
    }

    #[test]
    fn table_total_empty_is_zero() {
        let items: Vec<QuotationLineItem> = vec![];
        assert_eq!(table_total(&items), 0.0);
    }

    #[test]
    fn format_currency_groups_thousands() {
        assert_eq!(format_currency(0.0), "$0.00");
        assert_eq!(format_currency(150.5), "$150.50");
        assert_eq!(format_currency(1234.5), "$1,234.50");
        assert_eq!(format_currency(12345.678), "$12,345.68");
        assert_eq!(format_currency(1_000_000.0), "$1,000,000.00");
        assert_eq!(format_currency(-25.0), "-$25.00");
    }
}
