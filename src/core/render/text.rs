//! Plain-text backend: styled, width-aware lines for stdout and the TUI.

use textwrap::core::display_width;

use super::{Align, Block, Document, Table, cell_lines};

const GAP: &str = "  ";
const MIN_DESCRIPTION_WIDTH: usize = 12;

/// What a line represents. The TUI maps each kind to a style; stdout ignores it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineStyle {
    Title,
    Subtitle,
    Field,
    Heading,
    Body,
    TableHeader,
    TableRow,
    TableBorder,
    Summary,
    Words,
    Note,
    Muted,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyledLine {
    pub style: LineStyle,
    pub text: String,
}

impl StyledLine {
    fn new(style: LineStyle, text: impl Into<String>) -> Self {
        Self {
            style,
            text: text.into(),
        }
    }

    fn blank() -> Self {
        Self::new(LineStyle::Muted, "")
    }
}

fn wrap(text: &str, width: usize) -> Vec<String> {
    if width == 0 {
        return vec![text.to_string()];
    }
    textwrap::wrap(text, width)
        .into_iter()
        .map(|cow| cow.into_owned())
        .collect()
}

fn pad(s: &str, width: usize, align: Align) -> String {
    let fill = " ".repeat(width.saturating_sub(display_width(s)));
    match align {
        Align::Left => format!("{s}{fill}"),
        Align::Right => format!("{fill}{s}"),
    }
}

/// Column widths fitted to `width`: natural widths, then the first column shrinks.
fn column_widths(t: &Table, width: usize) -> Vec<usize> {
    let mut widths: Vec<usize> = t.headers.iter().map(|h| display_width(h)).collect();
    for row in &t.rows {
        for (i, cell) in row.iter().enumerate().take(widths.len()) {
            let w = cell_lines(cell)
                .iter()
                .map(|l| display_width(l))
                .max()
                .unwrap_or(0);
            widths[i] = widths[i].max(w);
        }
    }
    if let Some(last) = widths.last_mut() {
        for s in &t.summary {
            *last = (*last).max(display_width(&s.value));
        }
    }
    let total: usize = widths.iter().sum::<usize>() + GAP.len() * widths.len().saturating_sub(1);
    if width > 0 && total > width && !widths.is_empty() {
        let others = total - widths[0];
        widths[0] = width.saturating_sub(others).max(MIN_DESCRIPTION_WIDTH);
    }
    widths
}

fn table_row(cells: &[String], widths: &[usize], align: &[Align]) -> Vec<String> {
    let wrapped: Vec<Vec<String>> = widths
        .iter()
        .enumerate()
        .map(|(i, &w)| {
            let cell = cells.get(i).map(String::as_str).unwrap_or("");
            cell_lines(cell).iter().flat_map(|l| wrap(l, w)).collect()
        })
        .collect();
    let height = wrapped.iter().map(Vec::len).max().unwrap_or(1).max(1);
    (0..height)
        .map(|line| {
            let parts: Vec<String> = wrapped
                .iter()
                .enumerate()
                .map(|(i, lines)| {
                    let text = lines.get(line).map(String::as_str).unwrap_or("");
                    pad(text, widths[i], align.get(i).copied().unwrap_or(Align::Left))
                })
                .collect();
            parts.join(GAP).trim_end().to_string()
        })
        .collect()
}

fn table(t: &Table, width: usize, out: &mut Vec<StyledLine>) {
    let widths = column_widths(t, width);
    let total: usize = widths.iter().sum::<usize>() + GAP.len() * widths.len().saturating_sub(1);
    let border = "─".repeat(total);

    for line in table_row(&t.headers, &widths, &t.align) {
        out.push(StyledLine::new(LineStyle::TableHeader, line));
    }
    out.push(StyledLine::new(LineStyle::TableBorder, border.clone()));
    for row in &t.rows {
        for line in table_row(row, &widths, &t.align) {
            out.push(StyledLine::new(LineStyle::TableRow, line));
        }
    }
    out.push(StyledLine::new(LineStyle::TableBorder, border));

    let value_width = widths.last().copied().unwrap_or(0);
    let label_width = total.saturating_sub(value_width + GAP.len());
    for s in &t.summary {
        let text = format!(
            "{}{}{}",
            pad(&s.label, label_width, Align::Right),
            GAP,
            pad(&s.value, value_width, Align::Right)
        );
        out.push(StyledLine::new(LineStyle::Summary, text));
    }
    for line in wrap(&format!("Son: {}", t.amount_in_words), width) {
        out.push(StyledLine::new(LineStyle::Words, line));
    }
}

fn labelled(fields: &[(String, String)], out: &mut Vec<StyledLine>) {
    for (k, v) in fields {
        out.push(StyledLine::new(LineStyle::Field, format!("{k}: {v}")));
    }
}

/// Lay out a document for a terminal `width` columns wide (0 disables wrapping).
///
/// Blocks are separated by one blank line.
pub fn to_lines(doc: &Document, width: usize) -> Vec<StyledLine> {
    let mut out = Vec::new();
    for (i, block) in doc.blocks.iter().enumerate() {
        if i > 0 {
            out.push(StyledLine::blank());
        }
        match block {
            Block::Header {
                title,
                subtitle,
                fields,
            } => {
                out.push(StyledLine::new(LineStyle::Title, title.clone()));
                if let Some(subtitle) = subtitle {
                    out.push(StyledLine::new(LineStyle::Subtitle, subtitle.clone()));
                }
                if !fields.is_empty() {
                    out.push(StyledLine::blank());
                    labelled(fields, &mut out);
                }
            }
            Block::Heading(text) => out.push(StyledLine::new(LineStyle::Heading, text.clone())),
            Block::Paragraph(lines) => {
                for line in lines {
                    for w in wrap(line, width) {
                        out.push(StyledLine::new(LineStyle::Body, w));
                    }
                }
            }
            Block::Table(t) => table(t, width, &mut out),
            Block::Notes(notes) => {
                out.push(StyledLine::new(LineStyle::Heading, "Notas"));
                for note in notes {
                    let wrapped = if width == 0 {
                        vec![format!("• {note}")]
                    } else {
                        let opts = textwrap::Options::new(width)
                            .initial_indent("• ")
                            .subsequent_indent("  ");
                        textwrap::wrap(note, opts)
                            .into_iter()
                            .map(|c| c.into_owned())
                            .collect()
                    };
                    for line in wrapped {
                        out.push(StyledLine::new(LineStyle::Note, line));
                    }
                }
            }
            Block::BankDetails(fields) => {
                out.push(StyledLine::new(LineStyle::Heading, "Datos bancarios"));
                labelled(fields, &mut out);
            }
            Block::Raw(raw) => {
                for line in raw.lines() {
                    if line.trim().is_empty() {
                        out.push(StyledLine::new(LineStyle::Body, ""));
                        continue;
                    }
                    for w in wrap(line, width) {
                        out.push(StyledLine::new(LineStyle::Body, w));
                    }
                }
            }
        }
    }
    out
}

/// Document as plain text, one line per [`StyledLine`].
pub fn to_plain_text(doc: &Document, width: usize) -> String {
    let mut text = to_lines(doc, width)
        .into_iter()
        .map(|l| l.text)
        .collect::<Vec<_>>()
        .join("\n");
    text.push('\n');
    text
}
