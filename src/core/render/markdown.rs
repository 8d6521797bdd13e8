//! Markdown backend for exports.

use super::{Align, Block, Document, Table, cell_lines};

fn escape_cell(cell: &str) -> String {
    cell_lines(cell)
        .iter()
        .map(|line| line.replace('|', "\\|"))
        .collect::<Vec<_>>()
        .join("<br>")
}

fn table(t: &Table, out: &mut String) {
    let width = t.headers.len();
    out.push_str("| ");
    out.push_str(&t.headers.join(" | "));
    out.push_str(" |\n|");
    for align in &t.align {
        out.push_str(match align {
            Align::Left => "---|",
            Align::Right => "---:|",
        });
    }
    out.push('\n');
    for row in &t.rows {
        let cells: Vec<String> = row.iter().map(|c| escape_cell(c)).collect();
        out.push_str("| ");
        out.push_str(&cells.join(" | "));
        out.push_str(" |\n");
    }
    for summary in &t.summary {
        let mut cells = vec![String::new(); width.saturating_sub(2)];
        cells.push(format!("**{}**", summary.label));
        cells.push(format!("**{}**", summary.value));
        out.push_str("| ");
        out.push_str(&cells.join(" | "));
        out.push_str(" |\n");
    }
    out.push_str(&format!("\n*Son: {}*\n", t.amount_in_words));
}

/// Render a document as GitHub-flavored Markdown. Blocks are separated by a blank line.
pub fn to_markdown(doc: &Document) -> String {
    let mut parts: Vec<String> = Vec::with_capacity(doc.blocks.len());
    for block in &doc.blocks {
        let mut out = String::new();
        match block {
            Block::Header {
                title,
                subtitle,
                fields,
            } => {
                out.push_str(&format!("# {}\n", title));
                if let Some(subtitle) = subtitle {
                    out.push_str(&format!("\n**{}**\n", subtitle));
                }
                if !fields.is_empty() {
                    out.push('\n');
                    for (k, v) in fields {
                        out.push_str(&format!("- **{}:** {}\n", k, v));
                    }
                }
            }
            Block::Heading(text) => out.push_str(&format!("## {}\n", text)),
            Block::Paragraph(lines) => {
                for line in lines {
                    out.push_str(line);
                    out.push('\n');
                }
            }
            Block::Table(t) => table(t, &mut out),
            Block::Notes(notes) => {
                out.push_str("### Notas\n\n");
                for note in notes {
                    out.push_str(&format!("- {}\n", note));
                }
            }
            Block::BankDetails(fields) => {
                out.push_str("### Datos bancarios\n\n");
                for (k, v) in fields {
                    out.push_str(&format!("- **{}:** {}\n", k, v));
                }
            }
            Block::Raw(raw) => {
                out.push_str(raw);
                out.push('\n');
            }
        }
        parts.push(out);
    }
    parts.join("\n")
}
