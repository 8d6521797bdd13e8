//! Document renderers: parsed quotation → [`Document`] block model.
//!
//! Rendering is pure. The same input and context always produce the same
//! document; the quotation id is supplied by the caller, never generated here.
//! Output backends ([`markdown`], [`text`]) turn a document into bytes or lines.

pub mod markdown;
pub mod text;

use chrono::{Datelike, Local, NaiveDate};

use crate::core::config::CompanyProfile;
use crate::core::history::QuotationRecord;
use crate::core::quotation::{
    DualQuotationResult, InternalQuotationLineItem, LineItem, ParsedDocument, ParsedInternalQuotation,
    ParsedQuotation, ParsedQuotationSection, QuotationId, QuotationLineItem, amount_in_words,
    extract_price, format_currency, table_total,
};

const CUSTOMER_HEADERS: [&str; 5] = [
    "Descripción",
    "Unidad",
    "Cantidad",
    "Precio Unitario",
    "Importe",
];
const CUSTOMER_ALIGN: [Align; 5] = [
    Align::Left,
    Align::Left,
    Align::Right,
    Align::Right,
    Align::Right,
];

const INTERNAL_HEADERS: [&str; 7] = [
    "Descripción",
    "Proveedor",
    "Costo Unitario",
    "Margen",
    "Precio Unitario",
    "Cantidad",
    "Importe",
];
const INTERNAL_ALIGN: [Align; 7] = [
    Align::Left,
    Align::Left,
    Align::Right,
    Align::Right,
    Align::Right,
    Align::Right,
    Align::Right,
];

const MONTHS: [&str; 12] = [
    "enero",
    "febrero",
    "marzo",
    "abril",
    "mayo",
    "junio",
    "julio",
    "agosto",
    "septiembre",
    "octubre",
    "noviembre",
    "diciembre",
];

/// Who the document is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Audience {
    Internal,
    Customer,
}

impl Audience {
    pub fn label(self) -> &'static str {
        match self {
            Audience::Internal => "Interna",
            Audience::Customer => "Cliente",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Right,
}

/// Computed row under a table (label in the second-to-last column, value in the last).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryRow {
    pub label: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    pub headers: Vec<String>,
    pub align: Vec<Align>,
    /// Cells verbatim; a cell may hold `\n` or `<br>` line breaks (see [`cell_lines`]).
    pub rows: Vec<Vec<String>>,
    pub summary: Vec<SummaryRow>,
    pub amount_in_words: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Header {
        title: String,
        subtitle: Option<String>,
        fields: Vec<(String, String)>,
    },
    Heading(String),
    Paragraph(Vec<String>),
    Table(Table),
    Notes(Vec<String>),
    BankDetails(Vec<(String, String)>),
    /// Unparsed response shown as-is.
    Raw(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub audience: Audience,
    pub blocks: Vec<Block>,
}

/// Inputs besides the parsed quotation.
#[derive(Debug, Clone, Copy)]
pub struct RenderContext<'a> {
    pub date: NaiveDate,
    pub company: &'a CompanyProfile,
    pub customer_name: Option<&'a str>,
    pub customer_location: Option<&'a str>,
    pub quotation_id: Option<&'a QuotationId>,
}

impl<'a> RenderContext<'a> {
    pub fn new(date: NaiveDate, company: &'a CompanyProfile) -> Self {
        Self {
            date,
            company,
            customer_name: None,
            customer_location: None,
            quotation_id: None,
        }
    }

    pub fn with_customer(mut self, name: Option<&'a str>, location: Option<&'a str>) -> Self {
        self.customer_name = name.filter(|s| !s.trim().is_empty());
        self.customer_location = location.filter(|s| !s.trim().is_empty());
        self
    }

    pub fn with_quotation_id(mut self, id: Option<&'a QuotationId>) -> Self {
        self.quotation_id = id;
        self
    }

    /// Context of a saved quotation: dated on its creation day (local time).
    pub fn for_record(record: &'a QuotationRecord, company: &'a CompanyProfile) -> Self {
        Self::new(
            record.created_at.with_timezone(&Local).date_naive(),
            company,
        )
        .with_customer(
            record.customer_name.as_deref(),
            record.customer_location.as_deref(),
        )
        .with_quotation_id(record.quotation_id.as_ref())
    }
}

/// "19 de octubre de 2026".
pub fn format_long_date(date: NaiveDate) -> String {
    format!(
        "{} de {} de {}",
        date.day(),
        MONTHS[date.month0() as usize],
        date.year()
    )
}

/// Split a cell on embedded line breaks: a literal `\n`, `<br>` variants, or a newline.
pub fn cell_lines(cell: &str) -> Vec<&str> {
    let mut lines = vec![cell];
    for sep in ["\\n", "<br />", "<br/>", "<br>", "\n"] {
        lines = lines.into_iter().flat_map(|l| l.split(sep)).collect();
    }
    lines.into_iter().map(str::trim).collect()
}

fn section_blocks(sections: &[ParsedQuotationSection], blocks: &mut Vec<Block>) {
    for section in sections {
        if let Some(title) = &section.title {
            blocks.push(Block::Heading(title.clone()));
        }
        if !section.content.is_empty() {
            blocks.push(Block::Paragraph(section.content.clone()));
        }
    }
}

/// Layout used when no table was detected: headed paragraphs only.
fn fallback<T>(audience: Audience, parsed: &ParsedDocument<T>) -> Document {
    let mut blocks = Vec::new();
    if let Some(title) = &parsed.title {
        blocks.push(Block::Heading(title.clone()));
    }
    section_blocks(&parsed.sections, &mut blocks);
    if !parsed.notes.is_empty() {
        blocks.push(Block::Notes(parsed.notes.clone()));
    }
    Document { audience, blocks }
}

fn header_fields(ctx: &RenderContext<'_>) -> Vec<(String, String)> {
    let mut fields = vec![("Fecha".to_string(), format_long_date(ctx.date))];
    if let Some(id) = ctx.quotation_id {
        fields.push(("Cotización No.".to_string(), id.to_string()));
    }
    if let Some(name) = ctx.customer_name {
        fields.push(("Cliente".to_string(), name.trim().to_string()));
    }
    if let Some(location) = ctx.customer_location {
        fields.push(("Ubicación".to_string(), location.trim().to_string()));
    }
    fields
}

/// Leading number of a quantity cell ("10 sacos" → 10). Zero when absent.
fn quantity(cell: &str) -> f64 {
    let numeric: String = cell
        .trim()
        .chars()
        .take_while(|c| c.is_ascii_digit() || matches!(c, '.' | ','))
        .collect();
    extract_price(&numeric)
}

fn table_block<T: LineItem>(
    items: &[T],
    headers: &[&str],
    align: &[Align],
    row: impl Fn(&T) -> Vec<String>,
    mut summary: Vec<SummaryRow>,
) -> Block {
    let total = table_total(items);
    summary.push(SummaryRow {
        label: "TOTAL".to_string(),
        value: format_currency(total),
    });
    Block::Table(Table {
        headers: headers.iter().map(|h| h.to_string()).collect(),
        align: align.to_vec(),
        rows: items.iter().map(row).collect(),
        summary,
        amount_in_words: amount_in_words(total),
    })
}

/// Parsed notes followed by the company's legal notes, without repeats.
fn merged_notes(parsed: &[String], legal: &[String]) -> Vec<String> {
    let mut notes: Vec<String> = parsed.to_vec();
    for note in legal {
        if !notes.iter().any(|n| n.eq_ignore_ascii_case(note)) {
            notes.push(note.clone());
        }
    }
    notes
}

fn customer_row(item: &QuotationLineItem) -> Vec<String> {
    vec![
        item.descripcion.clone(),
        item.unidad.clone(),
        item.cantidad.clone(),
        item.precio_unitario.clone(),
        item.importe.clone(),
    ]
}

fn internal_row(item: &InternalQuotationLineItem) -> Vec<String> {
    vec![
        item.descripcion.clone(),
        item.proveedor.clone(),
        item.costo_unitario.clone(),
        item.margen.clone(),
        item.precio_unitario.clone(),
        item.cantidad.clone(),
        item.importe.clone(),
    ]
}

/// Customer document: header, characteristics, priced tables, notes, bank details.
pub fn render_customer(parsed: &ParsedQuotation, ctx: &RenderContext<'_>) -> Document {
    if !parsed.has_table {
        return fallback(Audience::Customer, parsed);
    }
    let mut blocks = vec![Block::Header {
        title: parsed
            .title
            .clone()
            .unwrap_or_else(|| "COTIZACIÓN".to_string()),
        subtitle: Some(ctx.company.name.clone()),
        fields: header_fields(ctx),
    }];
    section_blocks(&parsed.sections, &mut blocks);
    for table in &parsed.tables {
        blocks.push(table_block(
            table,
            &CUSTOMER_HEADERS,
            &CUSTOMER_ALIGN,
            customer_row,
            vec![],
        ));
    }
    let notes = merged_notes(&parsed.notes, &ctx.company.legal_notes);
    if !notes.is_empty() {
        blocks.push(Block::Notes(notes));
    }
    if let Some(bank) = &ctx.company.bank {
        blocks.push(Block::BankDetails(bank.fields()));
    }
    Document {
        audience: Audience::Customer,
        blocks,
    }
}

/// Internal document: like the customer one plus supplier, cost and margin columns,
/// cost and profit summary rows, and no bank details.
pub fn render_internal(parsed: &ParsedInternalQuotation, ctx: &RenderContext<'_>) -> Document {
    if !parsed.has_table {
        return fallback(Audience::Internal, parsed);
    }
    let mut blocks = vec![Block::Header {
        title: parsed
            .title
            .clone()
            .unwrap_or_else(|| "COTIZACIÓN INTERNA".to_string()),
        subtitle: Some("USO INTERNO · NO COMPARTIR CON EL CLIENTE".to_string()),
        fields: header_fields(ctx),
    }];
    section_blocks(&parsed.sections, &mut blocks);
    for table in &parsed.tables {
        let cost: f64 = table
            .iter()
            .map(|item| extract_price(&item.costo_unitario) * quantity(&item.cantidad))
            .sum();
        let summary = if cost > 0.0 {
            vec![
                SummaryRow {
                    label: "COSTO TOTAL".to_string(),
                    value: format_currency(cost),
                },
                SummaryRow {
                    label: "UTILIDAD ESTIMADA".to_string(),
                    value: format_currency(table_total(table) - cost),
                },
            ]
        } else {
            vec![]
        };
        blocks.push(table_block(
            table,
            &INTERNAL_HEADERS,
            &INTERNAL_ALIGN,
            internal_row,
            summary,
        ));
    }
    if !parsed.notes.is_empty() {
        blocks.push(Block::Notes(parsed.notes.clone()));
    }
    Document {
        audience: Audience::Internal,
        blocks,
    }
}

/// Document for a side whose markers were missing: the raw response as-is.
pub fn render_raw(raw: &str, audience: Audience) -> Document {
    Document {
        audience,
        blocks: vec![Block::Raw(raw.trim().to_string())],
    }
}

/// Document for one side of a dual response; the raw response when that side is absent.
pub fn render_dual(
    dual: &DualQuotationResult,
    audience: Audience,
    ctx: &RenderContext<'_>,
) -> Document {
    match audience {
        Audience::Customer => match &dual.customer {
            Some(parsed) => render_customer(parsed, ctx),
            None => render_raw(&dual.raw_response, audience),
        },
        Audience::Internal => match &dual.internal {
            Some(parsed) => render_internal(parsed, ctx),
            None => render_raw(&dual.raw_response, audience),
        },
    }
}
