//! Markdown quotation parser.
//!
//! Lines are classified ([`LineKind`]) and fed through a three-state scan
//! ([`ScanState`]): prose before tables, inside a table block, and after a table.
//! [`transition`] is the whole state machine; [`Builder`] applies the effects of
//! each step.
//!
//! Text after a table is held back until the next table or the end of input:
//! between two tables it is section content, after the last one it is notes.

use std::sync::OnceLock;

use regex::Regex;

use super::columns::{ColumnMap, normalize_header};
use super::{
    LineItem, ParsedDocument, ParsedInternalQuotation, ParsedQuotation, ParsedQuotationSection,
};

/// Lines that only label the notes list ("**Notas:**").
const NOTE_LABELS: &[&str] = &[
    "nota",
    "notas",
    "notas importantes",
    "observaciones",
    "condiciones",
    "condiciones comerciales",
];

/// First-cell prefixes of rows the model adds for totals; the renderer computes its own.
const SUMMARY_ROW_PREFIXES: &[&str] = &["total", "subtotal", "gran total", "iva"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) enum LineKind {
    Blank,
    /// Horizontal rule (`---`, `***`).
    Rule,
    Heading(String),
    /// Table separator row (`| --- | :---: |`).
    Separator,
    Row(Vec<String>),
    /// Bullet or numbered list item, marker removed.
    Bullet(String),
    Text { text: String, indented: bool },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum ScanState {
    Prose,
    InTable,
    AfterTable,
}

/// Next scan state for a classified line. Pure.
pub(super) fn transition(state: ScanState, kind: &LineKind) -> ScanState {
    match (state, kind) {
        (_, LineKind::Row(_)) => ScanState::InTable,
        (ScanState::InTable, LineKind::Separator) => ScanState::InTable,
        // "### Notas importantes" after a table labels the notes that follow.
        (ScanState::InTable | ScanState::AfterTable, LineKind::Heading(text))
            if is_note_heading(text) =>
        {
            ScanState::AfterTable
        }
        (ScanState::InTable | ScanState::AfterTable, LineKind::Heading(_)) => ScanState::Prose,
        (ScanState::InTable, _) => ScanState::AfterTable,
        (state, _) => state,
    }
}

fn separator_cell() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^:?-+:?$").expect("separator pattern is a literal"))
}

fn rule_line() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(?:(?:-\s*){3,}|(?:\*\s*){3,}|(?:_\s*){3,})$").expect("rule pattern is a literal")
    })
}

/// Split a pipe row into trimmed cells. `\|` stays a literal pipe; other escapes
/// (including a literal `\n`) are kept verbatim.
pub(super) fn split_cells(row: &str) -> Vec<String> {
    let trimmed = row.trim();
    let inner = trimmed.strip_prefix('|').unwrap_or(trimmed);
    let mut cells = Vec::new();
    let mut current = String::new();
    let mut chars = inner.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\\' if chars.peek() == Some(&'|') => {
                current.push('|');
                chars.next();
            }
            '|' => cells.push(std::mem::take(&mut current).trim().to_string()),
            _ => current.push(c),
        }
    }
    let last = current.trim();
    if !last.is_empty() {
        cells.push(last.to_string());
    }
    cells
}

fn strip_bullet(s: &str) -> Option<&str> {
    for marker in ["- ", "* ", "• ", "+ "] {
        if let Some(rest) = s.strip_prefix(marker) {
            return Some(rest.trim_start());
        }
    }
    let digits = s.chars().take_while(|c| c.is_ascii_digit()).count();
    if digits > 0 {
        let rest = &s[digits..];
        if let Some(rest) = rest.strip_prefix(". ").or_else(|| rest.strip_prefix(") ")) {
            return Some(rest.trim_start());
        }
    }
    None
}

fn heading_text(s: &str) -> Option<String> {
    let hashes = s.chars().take_while(|c| *c == '#').count();
    if hashes == 0 || hashes > 6 {
        return None;
    }
    let text = s[hashes..].trim().trim_end_matches('#').trim();
    let text = text.trim_matches('*').trim();
    Some(text.to_string())
}

/// Classify one raw line.
pub(super) fn classify(line: &str) -> LineKind {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return LineKind::Blank;
    }
    if trimmed.starts_with('|') && trimmed.matches('|').count() >= 2 {
        let cells = split_cells(trimmed);
        let non_empty: Vec<&String> = cells.iter().filter(|c| !c.is_empty()).collect();
        if !non_empty.is_empty() && non_empty.iter().all(|c| separator_cell().is_match(c)) {
            return LineKind::Separator;
        }
        return LineKind::Row(cells);
    }
    if rule_line().is_match(trimmed) {
        return LineKind::Rule;
    }
    if let Some(text) = heading_text(trimmed) {
        return if text.is_empty() {
            LineKind::Blank
        } else {
            LineKind::Heading(text)
        };
    }
    if let Some(rest) = strip_bullet(trimmed) {
        return LineKind::Bullet(rest.to_string());
    }
    LineKind::Text {
        text: trimmed.to_string(),
        indented: line.starts_with([' ', '\t']),
    }
}

fn is_summary_row(cells: &[String]) -> bool {
    let Some(first) = cells.iter().find(|c| !c.is_empty()) else {
        return true;
    };
    let normalized = normalize_header(first);
    SUMMARY_ROW_PREFIXES
        .iter()
        .any(|p| normalized == *p || normalized.starts_with(&format!("{} ", p)))
}

fn is_note_label(text: &str) -> bool {
    NOTE_LABELS.contains(&normalize_header(text).as_str())
}

/// A heading naming the notes list; "Condiciones de pago" counts too.
fn is_note_heading(text: &str) -> bool {
    let normalized = normalize_header(text);
    NOTE_LABELS.iter().any(|label| {
        normalized == *label
            || normalized
                .strip_prefix(label)
                .is_some_and(|rest| rest.starts_with(' '))
    })
}

struct OpenTable<T> {
    columns: ColumnMap,
    rows: Vec<T>,
}

/// Accumulates the parsed document while the scan advances.
struct Builder<T> {
    title: Option<String>,
    sections: Vec<ParsedQuotationSection>,
    section: Option<ParsedQuotationSection>,
    tables: Vec<Vec<T>>,
    table: Option<OpenTable<T>>,
    /// Header-derived map of the last table, for header-less continuation blocks.
    last_columns: Option<ColumnMap>,
    /// Lines seen after the latest table, with their raw text.
    pending: Vec<(LineKind, String)>,
    notes: Vec<String>,
    /// The previous line was a note, so an indented line continues it.
    note_open: bool,
    seen_table: bool,
}

impl<T: LineItem> Builder<T> {
    fn new() -> Self {
        Self {
            title: None,
            sections: vec![],
            section: None,
            tables: vec![],
            table: None,
            last_columns: None,
            pending: vec![],
            notes: vec![],
            note_open: false,
            seen_table: false,
        }
    }

    fn flush_section(&mut self) {
        if let Some(section) = self.section.take()
            && (section.title.is_some() || !section.content.is_empty())
        {
            self.sections.push(section);
        }
    }

    fn close_table(&mut self) {
        if let Some(table) = self.table.take()
            && !table.rows.is_empty()
        {
            self.tables.push(table.rows);
        }
    }

    fn heading(&mut self, text: &str) {
        if self.title.is_none() && !self.seen_table {
            self.title = Some(text.to_string());
            return;
        }
        self.flush_section();
        self.section = Some(ParsedQuotationSection {
            title: Some(text.to_string()),
            content: vec![],
        });
    }

    fn prose(&mut self, line: &str) {
        self.section
            .get_or_insert_with(ParsedQuotationSection::default)
            .content
            .push(line.trim().to_string());
    }

    /// Another table follows: text held since the previous table was prose.
    /// It goes before the section a later heading may have opened.
    fn pending_to_sections(&mut self) {
        if self.pending.is_empty() {
            return;
        }
        let open = self.section.take();
        for (kind, raw) in std::mem::take(&mut self.pending) {
            match kind {
                LineKind::Heading(text) => {
                    self.flush_section();
                    self.section = Some(ParsedQuotationSection {
                        title: Some(text),
                        content: vec![],
                    });
                }
                LineKind::Bullet(_) | LineKind::Text { .. } => self.prose(&raw),
                _ => {}
            }
        }
        self.flush_section();
        self.section = open;
    }

    /// No table follows: text held since the last table is notes.
    fn pending_to_notes(&mut self) {
        for (kind, _) in std::mem::take(&mut self.pending) {
            self.note(&kind);
        }
        self.note_open = false;
    }

    fn columns_for(&self, cells: &[String]) -> ColumnMap {
        let columns = ColumnMap::from_first_row::<T>(cells);
        match &self.last_columns {
            Some(prev) if !columns.from_header && prev.fields.len() == cells.len() => ColumnMap {
                fields: prev.fields.clone(),
                from_header: false,
            },
            _ => columns,
        }
    }

    fn row(&mut self, cells: Vec<String>) {
        if self.table.is_none() {
            self.pending_to_sections();
            self.flush_section();
            self.seen_table = true;
            let columns = self.columns_for(&cells);
            let is_header = columns.from_header;
            if is_header {
                self.last_columns = Some(columns.clone());
            }
            self.table = Some(OpenTable {
                columns,
                rows: vec![],
            });
            if is_header {
                return;
            }
        }
        if is_summary_row(&cells) {
            return;
        }
        let Some(table) = self.table.as_mut() else {
            return;
        };
        let item: T = table.columns.build(cells);
        if item.descripcion().is_empty() {
            return;
        }
        table.rows.push(item);
    }

    fn note(&mut self, kind: &LineKind) {
        match kind {
            LineKind::Bullet(text) => {
                self.notes.push(text.clone());
                self.note_open = true;
            }
            LineKind::Text { text, indented } => {
                if *indented && self.note_open {
                    if let Some(last) = self.notes.last_mut() {
                        last.push(' ');
                        last.push_str(text);
                    }
                } else if is_note_label(text) {
                    self.note_open = false;
                } else {
                    self.notes.push(text.clone());
                    self.note_open = true;
                }
            }
            _ => self.note_open = false,
        }
    }

    /// Apply one line: `from` is the state before the line, `to` the state after it.
    fn apply(&mut self, from: ScanState, to: ScanState, kind: LineKind, raw: &str) {
        if from == ScanState::InTable && to != ScanState::InTable {
            self.close_table();
        }
        if from == ScanState::AfterTable && to == ScanState::Prose {
            // A section heading ends the current run of notes.
            self.pending.push((LineKind::Blank, String::new()));
        }
        match (to, kind) {
            (ScanState::InTable, LineKind::Row(cells)) => self.row(cells),
            (ScanState::AfterTable, kind) => self.pending.push((kind, raw.to_string())),
            (_, LineKind::Heading(text)) => self.heading(&text),
            (ScanState::Prose, LineKind::Bullet(_) | LineKind::Text { .. }) => self.prose(raw),
            _ => {}
        }
    }

    fn finish(mut self) -> ParsedDocument<T> {
        self.close_table();
        self.pending_to_notes();
        self.flush_section();
        let has_table = !self.tables.is_empty();
        ParsedDocument {
            title: self.title,
            sections: self.sections,
            tables: self.tables,
            notes: self.notes,
            has_table,
        }
    }
}

fn parse_document<T: LineItem>(markdown: &str) -> ParsedDocument<T> {
    let mut state = ScanState::Prose;
    let mut builder = Builder::<T>::new();
    for raw in markdown.lines() {
        let kind = classify(raw);
        let next = transition(state, &kind);
        builder.apply(state, next, kind, raw);
        state = next;
    }
    builder.finish()
}

/// Parse a customer-facing quotation. Never fails; unrecognized lines end up in
/// the nearest section.
pub fn parse_quotation(markdown: &str) -> ParsedQuotation {
    parse_document(markdown)
}

/// Parse an internal quotation (supplier, cost and margin columns).
pub fn parse_internal_quotation(markdown: &str) -> ParsedInternalQuotation {
    parse_document(markdown)
}
