//! Column mapping: header text → line-item field.
//!
//! Synonyms are loaded from `config/column-synonyms.json` (embedded at compile time,
//! validated by build.rs). Adding a header variant only touches that file.

use std::sync::OnceLock;

use serde::Deserialize;

use super::LineItem;
use super::money::extract_price;

/// Named line-item field a table column can map to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Descripcion,
    Proveedor,
    CostoUnitario,
    Margen,
    PrecioUnitario,
    Unidad,
    Cantidad,
    Importe,
}

#[derive(Debug, Deserialize)]
struct SynonymEntry {
    field: Field,
    synonyms: Vec<String>,
}

/// (normalized synonym, field), longest synonym first so "precio total" beats "precio".
fn load_synonyms() -> Vec<(String, Field)> {
    let json = include_str!("../../../config/column-synonyms.json");
    let entries: Vec<SynonymEntry> =
        serde_json::from_str(json).expect("column-synonyms.json is validated by build.rs");
    let mut table: Vec<(String, Field)> = entries
        .into_iter()
        .flat_map(|e| {
            let field = e.field;
            e.synonyms.into_iter().map(move |s| (s, field))
        })
        .collect();
    table.sort_by(|a, b| b.0.len().cmp(&a.0.len()).then_with(|| a.0.cmp(&b.0)));
    table
}

static SYNONYMS: OnceLock<Vec<(String, Field)>> = OnceLock::new();

fn synonyms() -> &'static [(String, Field)] {
    SYNONYMS.get_or_init(load_synonyms)
}

fn fold_accent(c: char) -> char {
    match c {
        'á' | 'à' | 'ä' | 'â' => 'a',
        'é' | 'è' | 'ë' | 'ê' => 'e',
        'í' | 'ì' | 'ï' | 'î' => 'i',
        'ó' | 'ò' | 'ö' | 'ô' => 'o',
        'ú' | 'ù' | 'ü' | 'û' => 'u',
        'ñ' => 'n',
        other => other,
    }
}

/// Lowercase, fold accents, drop emphasis markers and a trailing colon, collapse spaces.
pub(super) fn normalize_header(header: &str) -> String {
    let lowered: String = header
        .to_lowercase()
        .chars()
        .filter(|c| !matches!(c, '*' | '_' | '`'))
        .map(fold_accent)
        .collect();
    let collapsed = lowered.split_whitespace().collect::<Vec<_>>().join(" ");
    collapsed.trim_end_matches(':').trim_end().to_string()
}

/// Field for one header cell: exact synonym, or a synonym followed by a non-alphanumeric
/// boundary ("precio unitario (mxn)"). Longest synonym wins.
pub(super) fn match_header(header: &str) -> Option<Field> {
    let normalized = normalize_header(header);
    if normalized.is_empty() {
        return None;
    }
    synonyms().iter().find_map(|(syn, field)| {
        let rest = normalized.strip_prefix(syn.as_str())?;
        match rest.chars().next() {
            None => Some(*field),
            Some(c) if !c.is_alphanumeric() => Some(*field),
            Some(_) => None,
        }
    })
}

/// Column → field assignment for one table block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct ColumnMap {
    pub(super) fields: Vec<Option<Field>>,
    /// True when the row that produced the map is a header (not a data row).
    pub(super) from_header: bool,
}

impl ColumnMap {
    /// Map the first row of a table. When no cell names a known column, or a cell
    /// holds an amount, the row is data and columns follow `T::FIELDS` order.
    pub(super) fn from_first_row<T: LineItem>(cells: &[String]) -> Self {
        let has_amount = cells
            .iter()
            .any(|c| c.chars().any(|ch| ch.is_ascii_digit()) && extract_price(c) != 0.0);
        let mut fields = Vec::with_capacity(cells.len());
        let mut any = false;
        for cell in cells {
            let matched = match_header(cell);
            any |= matched.is_some();
            let field = matched
                .filter(|f| T::FIELDS.contains(f))
                .filter(|f| !fields.contains(&Some(*f)));
            fields.push(field);
        }
        if any && !has_amount {
            return Self {
                fields,
                from_header: true,
            };
        }
        Self::positional::<T>(cells.len())
    }

    pub(super) fn positional<T: LineItem>(width: usize) -> Self {
        Self {
            fields: (0..width).map(|i| T::FIELDS.get(i).copied()).collect(),
            from_header: false,
        }
    }

    /// Build a line item from a data row. Missing trailing cells stay empty.
    pub(super) fn build<T: LineItem>(&self, cells: Vec<String>) -> T {
        let mut item = T::default();
        for (field, value) in self.fields.iter().zip(cells) {
            if let Some(field) = field {
                item.set(*field, value);
            }
        }
        item
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::quotation::{InternalQuotationLineItem, QuotationLineItem};

    fn cells(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn normalize_strips_accents_emphasis_and_colon() {
        assert_eq!(normalize_header("  **Descripción:** "), "descripcion");
        assert_eq!(normalize_header("Precio   Unitario"), "precio unitario");
    }

    #[test]
    fn match_header_synonyms_case_insensitive() {
        assert_eq!(match_header("CONCEPTO"), Some(Field::Descripcion));
        assert_eq!(match_header("Descripción"), Some(Field::Descripcion));
        assert_eq!(match_header("P.U."), Some(Field::PrecioUnitario));
        assert_eq!(match_header("Cant."), Some(Field::Cantidad));
    }

    #[test]
    fn match_header_prefers_longest_synonym() {
        assert_eq!(match_header("Precio Total"), Some(Field::Importe));
        assert_eq!(match_header("Precio"), Some(Field::PrecioUnitario));
        assert_eq!(match_header("Costo Unitario"), Some(Field::CostoUnitario));
    }

    #[test]
    fn match_header_allows_suffix_after_boundary() {
        assert_eq!(
            match_header("Precio Unitario (MXN)"),
            Some(Field::PrecioUnitario)
        );
        assert_eq!(match_header("Importe MXN"), Some(Field::Importe));
    }

    #[test]
    fn match_header_rejects_partial_words() {
        assert_eq!(match_header("Cantidades raras"), None);
        assert_eq!(match_header(""), None);
    }

    #[test]
    fn header_row_maps_by_name_in_any_order() {
        let map = ColumnMap::from_first_row::<QuotationLineItem>(&cells(&[
            "Importe",
            "Concepto",
            "Cantidad",
        ]));
        assert!(map.from_header);
        assert_eq!(
            map.fields,
            vec![
                Some(Field::Importe),
                Some(Field::Descripcion),
                Some(Field::Cantidad)
            ]
        );
    }

    #[test]
    fn customer_map_drops_internal_columns() {
        let map = ColumnMap::from_first_row::<QuotationLineItem>(&cells(&[
            "Descripción",
            "Proveedor",
            "Importe",
        ]));
        assert_eq!(
            map.fields,
            vec![Some(Field::Descripcion), None, Some(Field::Importe)]
        );
    }

    #[test]
    fn internal_map_accepts_supplier_columns() {
        let map = ColumnMap::from_first_row::<InternalQuotationLineItem>(&cells(&[
            "Descripción",
            "Proveedor",
            "Costo Unitario",
            "Margen",
        ]));
        assert_eq!(
            map.fields,
            vec![
                Some(Field::Descripcion),
                Some(Field::Proveedor),
                Some(Field::CostoUnitario),
                Some(Field::Margen)
            ]
        );
    }

    #[test]
    fn duplicate_header_binds_first_column_only() {
        let map = ColumnMap::from_first_row::<QuotationLineItem>(&cells(&[
            "Total", "Importe",
        ]));
        assert_eq!(map.fields, vec![Some(Field::Importe), None]);
    }

    #[test]
    fn unknown_headers_fall_back_to_positions() {
        let map = ColumnMap::from_first_row::<QuotationLineItem>(&cells(&[
            "Cemento gris",
            "bulto",
            "10",
            "$250.00",
            "$2,500.00",
        ]));
        assert!(!map.from_header);
        let item: QuotationLineItem = map.build(cells(&[
            "Cemento gris",
            "bulto",
            "10",
            "$250.00",
            "$2,500.00",
        ]));
        assert_eq!(item.descripcion, "Cemento gris");
        assert_eq!(item.importe, "$2,500.00");
    }

    #[test]
    fn build_tolerates_short_rows() {
        let map = ColumnMap::positional::<QuotationLineItem>(5);
        let item: QuotationLineItem = map.build(cells(&["Arena"]));
        assert_eq!(item.descripcion, "Arena");
        assert!(item.importe.is_empty());
    }
}
