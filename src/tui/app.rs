//! Browser state: quotation list, filter, selection, loaded record, toast.

use std::time::Instant;

use crate::core::config::CompanyProfile;
use crate::core::history::{QuotationMeta, QuotationRecord, filter_quotations};
use crate::core::quotation::DualQuotationResult;
use crate::core::render::{Audience, Document, RenderContext, render_dual, render_raw};

use super::constants::TOAST_DURATION;

/// A saved quotation loaded for display.
pub(crate) struct LoadedQuotation {
    pub record: QuotationRecord,
    pub dual: DualQuotationResult,
}

impl LoadedQuotation {
    pub fn new(record: QuotationRecord) -> Self {
        let dual = record.dual_result();
        Self { record, dual }
    }
}

/// Footer notification after an export, copy or delete.
pub(crate) struct Toast {
    pub message: String,
    pub is_error: bool,
    pub until: Instant,
}

/// Pending delete waiting for y/n.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ConfirmDelete {
    pub id: String,
    pub title: String,
}

pub(crate) struct App {
    pub quotations: Vec<QuotationMeta>,
    pub filter: String,
    /// Keys go to the filter input instead of commands.
    pub filter_editing: bool,
    /// Index into the filtered list.
    pub selected_index: usize,
    pub current: Option<LoadedQuotation>,
    pub audience: Audience,
    pub show_raw: bool,
    pub scroll: usize,
    pub toast: Option<Toast>,
    /// Error from listing the history, shown in the list pane.
    pub list_error: Option<String>,
    pub confirm_delete: Option<ConfirmDelete>,
}

impl App {
    pub fn new(quotations: Vec<QuotationMeta>) -> Self {
        Self {
            quotations,
            filter: String::new(),
            filter_editing: false,
            selected_index: 0,
            current: None,
            audience: Audience::Customer,
            show_raw: false,
            scroll: 0,
            toast: None,
            list_error: None,
            confirm_delete: None,
        }
    }

    pub fn filtered(&self) -> Vec<&QuotationMeta> {
        filter_quotations(&self.quotations, &self.filter)
    }

    pub fn selected(&self) -> Option<&QuotationMeta> {
        self.filtered().get(self.selected_index).copied()
    }

    pub fn selected_id(&self) -> Option<String> {
        self.selected().map(|m| m.id.clone())
    }

    /// Keep the selection inside the filtered list.
    pub fn clamp_selection(&mut self) {
        let len = self.filtered().len();
        self.selected_index = self.selected_index.min(len.saturating_sub(1));
    }

    /// Move the selection by `delta`, clamped. Returns true when it changed.
    pub fn move_selection(&mut self, delta: isize) -> bool {
        let len = self.filtered().len();
        if len == 0 {
            return false;
        }
        let next = self
            .selected_index
            .saturating_add_signed(delta)
            .min(len - 1);
        let changed = next != self.selected_index;
        self.selected_index = next;
        changed
    }

    /// Replace the list (after a delete or reload), keeping the selection in range.
    pub fn set_quotations(&mut self, quotations: Vec<QuotationMeta>) {
        self.quotations = quotations;
        self.clamp_selection();
    }

    /// Show `loaded` in the document pane, scrolled to the top.
    pub fn set_current(&mut self, loaded: Option<LoadedQuotation>) {
        self.current = loaded;
        self.scroll = 0;
    }

    /// True when the document pane shows something other than the selected entry.
    pub fn needs_load(&self) -> bool {
        let selected = self.selected().map(|m| m.id.as_str());
        let current = self.current.as_ref().map(|c| c.record.id.as_str());
        selected != current
    }

    pub fn toggle_audience(&mut self) {
        self.audience = match self.audience {
            Audience::Customer => Audience::Internal,
            Audience::Internal => Audience::Customer,
        };
        self.scroll = 0;
    }

    pub fn toggle_raw(&mut self) {
        self.show_raw = !self.show_raw;
        self.scroll = 0;
    }

    pub fn scroll_down(&mut self, lines: usize) {
        self.scroll = self.scroll.saturating_add(lines);
    }

    pub fn scroll_up(&mut self, lines: usize) {
        self.scroll = self.scroll.saturating_sub(lines);
    }

    /// Clamp scroll so the last page stays filled.
    pub fn clamp_scroll(&mut self, total_lines: usize, visible: usize) {
        self.scroll = self.scroll.min(total_lines.saturating_sub(visible));
    }

    /// Document for the pane: the rendering for the current audience, or the
    /// raw response when `show_raw` is set.
    pub fn document(&self, company: &CompanyProfile) -> Option<Document> {
        let loaded = self.current.as_ref()?;
        if self.show_raw {
            return Some(render_raw(&loaded.dual.raw_response, self.audience));
        }
        let ctx = RenderContext::for_record(&loaded.record, company);
        Some(render_dual(&loaded.dual, self.audience, &ctx))
    }

    pub fn show_toast(&mut self, message: impl Into<String>, is_error: bool, now: Instant) {
        self.toast = Some(Toast {
            message: message.into(),
            is_error,
            until: now + TOAST_DURATION,
        });
    }

    /// The toast, if it has not expired.
    pub fn active_toast(&self, now: Instant) -> Option<&Toast> {
        self.toast.as_ref().filter(|t| now < t.until)
    }
}
