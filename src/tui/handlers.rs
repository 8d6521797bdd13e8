//! Key handling for the history browser.
//!
//! Handlers only mutate [`App`] state and return an [`Action`]; anything that
//! touches the disk or the clipboard is applied by the caller.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::app::{App, ConfirmDelete};
use super::constants::{SCROLL_LINES_PAGE, SCROLL_LINES_SMALL};

/// Side effect requested by a key.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum Action {
    Quit,
    /// Selection or filter changed; load the selected record.
    Load,
    /// Export the shown document as Markdown.
    Export,
    /// Copy the shown document as Markdown.
    Copy,
    Delete { id: String },
    None,
}

fn is_ctrl_c(key: &KeyEvent) -> bool {
    key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c')
}

/// Handle one key press.
pub(crate) fn handle_key(key: KeyEvent, app: &mut App) -> Action {
    if is_ctrl_c(&key) {
        return Action::Quit;
    }
    if app.confirm_delete.is_some() {
        return handle_confirm_key(key, app);
    }
    if app.filter_editing {
        return handle_filter_key(key, app);
    }

    let shift = key.modifiers.contains(KeyModifiers::SHIFT);
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => Action::Quit,
        KeyCode::Char('/') => {
            app.filter_editing = true;
            Action::None
        }
        KeyCode::Up if shift => {
            app.scroll_up(SCROLL_LINES_SMALL);
            Action::None
        }
        KeyCode::Down if shift => {
            app.scroll_down(SCROLL_LINES_SMALL);
            Action::None
        }
        KeyCode::Char('k') => {
            app.scroll_up(SCROLL_LINES_SMALL);
            Action::None
        }
        KeyCode::Char('j') => {
            app.scroll_down(SCROLL_LINES_SMALL);
            Action::None
        }
        KeyCode::Up => select(app, -1),
        KeyCode::Down => select(app, 1),
        KeyCode::Home => select(app, isize::MIN),
        KeyCode::End => select(app, isize::MAX),
        KeyCode::PageUp => {
            app.scroll_up(SCROLL_LINES_PAGE);
            Action::None
        }
        KeyCode::PageDown => {
            app.scroll_down(SCROLL_LINES_PAGE);
            Action::None
        }
        KeyCode::Tab | KeyCode::BackTab => {
            app.toggle_audience();
            Action::None
        }
        KeyCode::Char('r') => {
            app.toggle_raw();
            Action::None
        }
        KeyCode::Char('e') if app.current.is_some() => Action::Export,
        KeyCode::Char('c') if app.current.is_some() => Action::Copy,
        KeyCode::Delete => {
            app.confirm_delete = app.selected().map(|meta| ConfirmDelete {
                id: meta.id.clone(),
                title: meta.title.clone(),
            });
            Action::None
        }
        _ => Action::None,
    }
}

/// Delete popup: y deletes; n, Enter or Esc cancel; other keys are ignored.
fn handle_confirm_key(key: KeyEvent, app: &mut App) -> Action {
    match key.code {
        KeyCode::Char('y') | KeyCode::Char('Y') => match app.confirm_delete.take() {
            Some(pending) => Action::Delete { id: pending.id },
            None => Action::None,
        },
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Enter | KeyCode::Esc => {
            app.confirm_delete = None;
            Action::None
        }
        _ => Action::None,
    }
}

fn select(app: &mut App, delta: isize) -> Action {
    if app.move_selection(delta) {
        Action::Load
    } else {
        Action::None
    }
}

/// Filter input: characters edit the filter, Enter keeps it, Esc clears it.
fn handle_filter_key(key: KeyEvent, app: &mut App) -> Action {
    match key.code {
        KeyCode::Enter => {
            app.filter_editing = false;
            Action::None
        }
        KeyCode::Esc => {
            app.filter_editing = false;
            if app.filter.is_empty() {
                return Action::None;
            }
            app.filter.clear();
            filter_changed(app)
        }
        KeyCode::Backspace => {
            if app.filter.pop().is_some() {
                filter_changed(app)
            } else {
                Action::None
            }
        }
        KeyCode::Up => select(app, -1),
        KeyCode::Down => select(app, 1),
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.filter.push(c);
            filter_changed(app)
        }
        _ => Action::None,
    }
}

fn filter_changed(app: &mut App) -> Action {
    app.selected_index = 0;
    Action::Load
}
