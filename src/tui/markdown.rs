//! Inline Markdown for the document pane: headings, bullets, table rows,
//! **bold** and `code` spans.

use ratatui::style::{Modifier, Style};
use ratatui::text::Span;

use super::constants::{ACCENT, ACCENT_SECONDARY};

/// Spans for one line of a raw response.
pub(crate) fn parse_markdown_line(s: &str, base: Style) -> Vec<Span<'static>> {
    let trimmed = s.trim_start();
    if trimmed.starts_with('#') {
        let content = trimmed.trim_start_matches('#').trim_start();
        return vec![Span::styled(
            content.to_string(),
            base.fg(ACCENT).add_modifier(Modifier::BOLD),
        )];
    }
    if let Some(rest) = trimmed
        .strip_prefix("- ")
        .or_else(|| trimmed.strip_prefix("* "))
    {
        let mut spans = vec![Span::styled("• ", base.fg(ACCENT))];
        spans.extend(parse_inline(rest, base));
        return spans;
    }
    if trimmed.starts_with('|') {
        let cells: Vec<&str> = trimmed
            .trim_matches('|')
            .split('|')
            .map(str::trim)
            .collect();
        if cells
            .iter()
            .all(|c| !c.is_empty() && c.chars().all(|ch| matches!(ch, '-' | ':')))
        {
            return vec![Span::styled("─".repeat(s.chars().count()), base.fg(ACCENT))];
        }
        let mut spans = Vec::new();
        for (i, cell) in cells.iter().enumerate() {
            if i > 0 {
                spans.push(Span::styled(" │ ", base.fg(ACCENT)));
            }
            spans.extend(parse_inline(cell, base));
        }
        return spans;
    }
    parse_inline(s, base)
}

/// `**bold**` and `` `code` `` on top of `base`. Unclosed markers stay literal.
pub(crate) fn parse_inline(s: &str, base: Style) -> Vec<Span<'static>> {
    let mut spans = Vec::new();
    let mut rest = s;
    while !rest.is_empty() {
        let bold = rest.find("**");
        let code = rest.find('`');
        let (pos, marker) = match (bold, code) {
            (Some(b), Some(c)) if c < b => (c, "`"),
            (Some(b), _) => (b, "**"),
            (None, Some(c)) => (c, "`"),
            (None, None) => break,
        };
        let after = &rest[pos + marker.len()..];
        let Some(end) = after.find(marker) else {
            break;
        };
        if pos > 0 {
            spans.push(Span::styled(rest[..pos].to_string(), base));
        }
        let inner = after[..end].to_string();
        spans.push(if marker == "**" {
            Span::styled(inner, base.add_modifier(Modifier::BOLD))
        } else {
            Span::styled(inner, base.fg(ACCENT_SECONDARY))
        });
        rest = &after[end + marker.len()..];
    }
    if !rest.is_empty() {
        spans.push(Span::styled(rest.to_string(), base));
    }
    spans
}
