//! TUI constants: colors, timing, scroll steps.

use std::time::Duration;

use ratatui::style::Color;

/// Accent green color (#98FB98).
pub(super) const ACCENT: Color = Color::Rgb(152, 251, 152);

/// Secondary accent, soft cyan (#7EC8E3).
pub(super) const ACCENT_SECONDARY: Color = Color::Rgb(126, 200, 227);

/// Error red for failure toasts.
pub(super) const ERROR: Color = Color::Rgb(255, 121, 121);

/// Event poll timeout in milliseconds (main loop).
pub(crate) const EVENT_POLL_TIMEOUT_MS: u64 = 100;

/// How long a toast stays in the footer.
pub(crate) const TOAST_DURATION: Duration = Duration::from_secs(3);

/// Scroll amount for Shift+arrows and j/k.
pub(crate) const SCROLL_LINES_SMALL: usize = 3;

/// Scroll amount for PageUp/PageDown.
pub(crate) const SCROLL_LINES_PAGE: usize = 10;

/// Width of the quotation list pane, in percent.
pub(super) const LIST_PANE_PERCENT: u16 = 35;

/// Max characters of a title in the list pane.
pub(super) const LIST_TITLE_MAX_LEN: usize = 40;
