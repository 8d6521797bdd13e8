//! Quotation document model and the parsing pipeline that builds it.
//!
//! An AI response carries two markdown documents (internal and customer) between
//! sentinel comments. [`split_dual_response`] separates them and parses each one
//! with [`parse_quotation`] / [`parse_internal_quotation`].

mod columns;
mod id;
mod money;
mod parser;
mod split;
mod words;

pub use columns::Field;
pub use id::QuotationId;
pub use money::{extract_price, format_currency, table_total};
pub use parser::{parse_internal_quotation, parse_quotation};
pub use split::{assemble_dual_markdown, split_dual_response};
pub use words::amount_in_words;

use serde::{Deserialize, Serialize};

/// Block of prose outside the price tables (characteristics, closing remarks).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedQuotationSection {
    pub title: Option<String>,
    pub content: Vec<String>,
}

/// Customer-facing line item. Cells are kept verbatim (e.g. `"$1,234.50"`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuotationLineItem {
    pub descripcion: String,
    pub unidad: String,
    pub cantidad: String,
    pub precio_unitario: String,
    pub importe: String,
}

/// Internal line item: adds supplier, cost and margin columns.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InternalQuotationLineItem {
    pub descripcion: String,
    pub proveedor: String,
    pub costo_unitario: String,
    pub margen: String,
    pub precio_unitario: String,
    pub cantidad: String,
    pub importe: String,
}

/// A row kind the table parser can fill from mapped columns.
pub trait LineItem: Default {
    /// Fields this kind accepts, in positional-fallback order.
    const FIELDS: &'static [Field];

    /// Store a cell value into the named field. Fields outside `FIELDS` are ignored.
    fn set(&mut self, field: Field, value: String);

    fn descripcion(&self) -> &str;

    fn importe(&self) -> &str;
}

impl LineItem for QuotationLineItem {
    const FIELDS: &'static [Field] = &[
        Field::Descripcion,
        Field::Unidad,
        Field::Cantidad,
        Field::PrecioUnitario,
        Field::Importe,
    ];

    fn set(&mut self, field: Field, value: String) {
        match field {
            Field::Descripcion => self.descripcion = value,
            Field::Unidad => self.unidad = value,
            Field::Cantidad => self.cantidad = value,
            Field::PrecioUnitario => self.precio_unitario = value,
            Field::Importe => self.importe = value,
            Field::Proveedor | Field::CostoUnitario | Field::Margen => {}
        }
    }

    fn descripcion(&self) -> &str {
        &self.descripcion
    }

    fn importe(&self) -> &str {
        &self.importe
    }
}

impl LineItem for InternalQuotationLineItem {
    const FIELDS: &'static [Field] = &[
        Field::Descripcion,
        Field::Proveedor,
        Field::CostoUnitario,
        Field::Margen,
        Field::PrecioUnitario,
        Field::Cantidad,
        Field::Importe,
    ];

    fn set(&mut self, field: Field, value: String) {
        match field {
            Field::Descripcion => self.descripcion = value,
            Field::Proveedor => self.proveedor = value,
            Field::CostoUnitario => self.costo_unitario = value,
            Field::Margen => self.margen = value,
            Field::PrecioUnitario => self.precio_unitario = value,
            Field::Cantidad => self.cantidad = value,
            Field::Importe => self.importe = value,
            Field::Unidad => {}
        }
    }

    fn descripcion(&self) -> &str {
        &self.descripcion
    }

    fn importe(&self) -> &str {
        &self.importe
    }
}

/// Structured quotation parsed from one markdown payload.
///
/// `has_table` decides the rendering: structured layout when true, plain
/// sections otherwise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedDocument<T> {
    pub title: Option<String>,
    pub sections: Vec<ParsedQuotationSection>,
    pub tables: Vec<Vec<T>>,
    pub notes: Vec<String>,
    pub has_table: bool,
}

impl<T> Default for ParsedDocument<T> {
    fn default() -> Self {
        Self {
            title: None,
            sections: vec![],
            tables: vec![],
            notes: vec![],
            has_table: false,
        }
    }
}

impl<T: LineItem> ParsedDocument<T> {
    /// Document total: sum of the first table block. Zero when there is no table.
    pub fn total(&self) -> f64 {
        self.tables.first().map(|t| table_total(t)).unwrap_or(0.0)
    }
}

pub type ParsedQuotation = ParsedDocument<QuotationLineItem>;
pub type ParsedInternalQuotation = ParsedDocument<InternalQuotationLineItem>;

/// Both documents extracted from one AI response.
///
/// A side is `None` when its marker pair was missing; callers then show
/// `raw_response` for that side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DualQuotationResult {
    pub internal: Option<ParsedInternalQuotation>,
    pub customer: Option<ParsedQuotation>,
    pub internal_markdown: String,
    pub customer_markdown: String,
    pub raw_response: String,
}

#[cfg(test)]
mod tests;
