//! Layout: quotation list (left), document pane (right), footer.

use std::time::Instant;

use chrono::Local;
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Flex, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph};

use crate::core::config::CompanyProfile;
use crate::core::history::QuotationMeta;
use crate::core::render::text::{LineStyle, StyledLine, to_lines};
use crate::core::util::truncate_preview;

use super::app::{App, ConfirmDelete};
use super::constants::{ACCENT, ACCENT_SECONDARY, ERROR, LIST_PANE_PERCENT, LIST_TITLE_MAX_LEN};
use super::markdown::{parse_inline, parse_markdown_line};

const KEYS_HINT: &str =
    "↑↓ select · / filter · Tab cliente/interna · r raw · PgUp/PgDn scroll · e export · c copy · Del delete · q quit";

pub(crate) fn draw(f: &mut Frame, app: &mut App, company: &CompanyProfile, area: Rect) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(1)])
        .split(area);
    let panes = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(LIST_PANE_PERCENT),
            Constraint::Min(20),
        ])
        .split(rows[0]);

    draw_list(f, app, panes[0]);
    draw_document(f, app, company, panes[1]);
    draw_footer(f, app, rows[1]);
    if let Some(pending) = &app.confirm_delete {
        draw_confirm_delete(f, area, pending);
    }
}

fn popup_area(area: Rect, percent_x: u16, percent_y: u16) -> Rect {
    let vertical = Layout::vertical([Constraint::Percentage(percent_y)]).flex(Flex::Center);
    let horizontal = Layout::horizontal([Constraint::Percentage(percent_x)]).flex(Flex::Center);
    let vertical_areas = vertical.split(area);
    let horizontal_areas = horizontal.split(vertical_areas[0]);
    horizontal_areas[0]
}

fn draw_confirm_delete(f: &mut Frame, area: Rect, pending: &ConfirmDelete) {
    let popup_rect = popup_area(area, 60, 25);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(ERROR))
        .title(" Eliminar cotización ");

    let text = vec![
        Line::from(""),
        Line::from(Span::styled(
            truncate_preview(&pending.title, LIST_TITLE_MAX_LEN),
            Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("y ", Style::default().fg(ERROR)),
            Span::raw("eliminar  "),
            Span::styled("n ", Style::default().fg(Color::DarkGray)),
            Span::raw("cancelar"),
        ]),
    ];
    let paragraph = Paragraph::new(text)
        .block(block)
        .alignment(Alignment::Center);

    f.render_widget(Clear, popup_rect);
    f.render_widget(paragraph, popup_rect);
}

fn format_meta(meta: &QuotationMeta) -> Line<'static> {
    let date = meta
        .updated_at
        .with_timezone(&Local)
        .format("%Y-%m-%d")
        .to_string();
    let mut spans = vec![
        Span::styled(format!("{date} "), Style::default().fg(Color::DarkGray)),
        Span::raw(truncate_preview(&meta.title, LIST_TITLE_MAX_LEN)),
    ];
    if let Some(customer) = meta.customer_name.as_deref() {
        spans.push(Span::styled(
            format!(" · {customer}"),
            Style::default().fg(ACCENT_SECONDARY),
        ));
    }
    Line::from(spans)
}

fn draw_list(f: &mut Frame, app: &mut App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(1)])
        .split(area);

    let filter_border = if app.filter_editing {
        ACCENT
    } else {
        Color::DarkGray
    };
    let mut filter_spans = if app.filter.is_empty() && !app.filter_editing {
        vec![Span::styled(
            "/ para filtrar",
            Style::default().fg(Color::DarkGray),
        )]
    } else {
        vec![Span::raw(app.filter.clone())]
    };
    if app.filter_editing {
        filter_spans.push(Span::styled("_", Style::default().fg(Color::DarkGray)));
    }
    let filter = Paragraph::new(Line::from(filter_spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(filter_border))
            .title(" Filtro "),
    );
    f.render_widget(filter, chunks[0]);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(ACCENT))
        .title(" Cotizaciones ");

    if let Some(err) = &app.list_error {
        let para = Paragraph::new(Line::from(Span::styled(
            format!("Error al leer el historial: {err}"),
            Style::default().fg(ERROR),
        )))
        .block(block);
        f.render_widget(para, chunks[1]);
        return;
    }

    app.clamp_selection();
    let filtered = app.filtered();
    if filtered.is_empty() {
        let msg = if app.filter.is_empty() {
            "Sin cotizaciones guardadas"
        } else {
            "Sin coincidencias"
        };
        let para = Paragraph::new(Line::from(Span::styled(
            msg,
            Style::default().fg(Color::DarkGray),
        )))
        .block(block);
        f.render_widget(para, chunks[1]);
        return;
    }

    let items: Vec<ListItem> = filtered
        .iter()
        .map(|m| ListItem::new(format_meta(m)))
        .collect();
    let list = List::new(items).block(block).highlight_style(
        Style::default()
            .fg(Color::Black)
            .bg(ACCENT)
            .add_modifier(Modifier::BOLD),
    );
    let mut state = ListState::default().with_selected(Some(app.selected_index));
    f.render_stateful_widget(list, chunks[1], &mut state);
}

fn line_style(style: LineStyle) -> Style {
    let s = Style::default();
    match style {
        LineStyle::Title => s.fg(ACCENT).add_modifier(Modifier::BOLD),
        LineStyle::Subtitle => s.fg(ACCENT_SECONDARY).add_modifier(Modifier::BOLD),
        LineStyle::Field => s.fg(Color::Gray),
        LineStyle::Heading => s.fg(ACCENT).add_modifier(Modifier::BOLD),
        LineStyle::TableHeader => s.add_modifier(Modifier::BOLD),
        LineStyle::TableBorder | LineStyle::Muted => s.fg(Color::DarkGray),
        LineStyle::Summary => s.fg(ACCENT).add_modifier(Modifier::BOLD),
        LineStyle::Words => s.fg(ACCENT_SECONDARY).add_modifier(Modifier::ITALIC),
        LineStyle::Body | LineStyle::TableRow | LineStyle::Note => s,
    }
}

fn styled_line(line: &StyledLine, raw: bool) -> Line<'static> {
    let style = line_style(line.style);
    match line.style {
        LineStyle::Body if raw => Line::from(parse_markdown_line(&line.text, style)),
        LineStyle::Body | LineStyle::Note => Line::from(parse_inline(&line.text, style)),
        _ => Line::from(Span::styled(line.text.clone(), style)),
    }
}

fn draw_document(f: &mut Frame, app: &mut App, company: &CompanyProfile, area: Rect) {
    let view = if app.show_raw {
        "respuesta original"
    } else {
        app.audience.label()
    };
    let title = match app.current.as_ref() {
        Some(c) => format!(" {} · {} ", c.record.title, view),
        None => " Cotización ".to_string(),
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(ACCENT))
        .title(title);
    let inner = block.inner(area);

    let Some(doc) = app.document(company) else {
        let para = Paragraph::new(Line::from(Span::styled(
            "Seleccione una cotización",
            Style::default().fg(Color::DarkGray),
        )))
        .block(block);
        f.render_widget(para, area);
        return;
    };

    let styled = to_lines(&doc, inner.width as usize);
    app.clamp_scroll(styled.len(), inner.height as usize);
    let lines: Vec<Line> = styled
        .iter()
        .map(|l| styled_line(l, app.show_raw))
        .collect();
    let para = Paragraph::new(lines)
        .block(block)
        .scroll((u16::try_from(app.scroll).unwrap_or(u16::MAX), 0));
    f.render_widget(para, area);
}

fn draw_footer(f: &mut Frame, app: &App, area: Rect) {
    let line = match app.active_toast(Instant::now()) {
        Some(toast) => {
            let color = if toast.is_error { ERROR } else { ACCENT };
            Line::from(Span::styled(
                toast.message.clone(),
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            ))
        }
        None => Line::from(Span::styled(KEYS_HINT, Style::default().fg(Color::DarkGray))),
    };
    f.render_widget(Paragraph::new(line), area);
}
