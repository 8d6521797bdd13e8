//! TUI to browse saved quotations: list, filter, customer/internal view,
//! export and copy.

mod app;
mod constants;
mod draw;
mod handlers;
mod markdown;

use std::io;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyEventKind};
use crossterm::execute;

use crate::core::config::Config;
use crate::core::export::{self, ExportFormat};
use crate::core::history;

use app::{App, LoadedQuotation};
use handlers::Action;

/// Guard that restores terminal state on drop (including on panic).
struct TerminalGuard;

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        use crossterm::terminal::{LeaveAlternateScreen, disable_raw_mode};
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), crossterm::cursor::Show, LeaveAlternateScreen);
    }
}

/// Run the history browser until the user quits.
pub fn run(config: Arc<Config>) -> io::Result<()> {
    use crossterm::terminal::{Clear, ClearType, EnterAlternateScreen, enable_raw_mode};
    use ratatui::Terminal;
    use ratatui::backend::CrosstermBackend;

    let _guard = TerminalGuard;

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    execute!(stdout, Clear(ClearType::All))?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(Vec::new());
    reload_list(&mut app);
    load_selected(&mut app);

    loop {
        terminal.draw(|f| {
            let area = f.area();
            draw::draw(f, &mut app, &config.company, area)
        })?;

        if !event::poll(Duration::from_millis(constants::EVENT_POLL_TIMEOUT_MS))? {
            continue;
        }
        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }
        match handlers::handle_key(key, &mut app) {
            Action::Quit => break,
            Action::Load => load_selected(&mut app),
            Action::Export => export_current(&mut app, &config),
            Action::Copy => copy_current(&mut app, &config),
            Action::Delete { id } => delete(&mut app, &id),
            Action::None => {}
        }
    }
    Ok(())
}

fn reload_list(app: &mut App) {
    match history::list_quotations() {
        Ok(items) => {
            app.list_error = None;
            app.set_quotations(items);
        }
        Err(e) => {
            log::warn!("failed to list quotations: {}", e);
            app.list_error = Some(e.to_string());
            app.set_quotations(Vec::new());
        }
    }
}

/// Load the selected record into the document pane if it is not shown yet.
fn load_selected(app: &mut App) {
    if !app.needs_load() {
        return;
    }
    let Some(id) = app.selected_id() else {
        app.set_current(None);
        return;
    };
    match history::load_quotation(&id) {
        Ok(record) => app.set_current(Some(LoadedQuotation::new(record))),
        Err(e) => {
            log::warn!("failed to load quotation {}: {}", id, e);
            app.set_current(None);
            app.show_toast(format!("No se pudo abrir: {e}"), true, Instant::now());
        }
    }
}

/// Markdown of the shown document and the file name to export it under.
fn current_markdown(app: &App, config: &Config) -> Option<Result<(String, String), String>> {
    let loaded = app.current.as_ref()?;
    let doc = app.document(&config.company)?;
    let name = export::file_name(
        &loaded.record.export_label(),
        (!app.show_raw).then_some(app.audience),
        ExportFormat::Markdown,
    );
    Some(
        export::export_string(&[&doc], &loaded.dual, ExportFormat::Markdown)
            .map(|content| (content, name))
            .map_err(|e| e.to_string()),
    )
}

fn export_current(app: &mut App, config: &Config) {
    let result = match current_markdown(app, config) {
        Some(Ok((content, name))) => {
            export::write_export(&content, None, &name).map_err(|e| e.to_string())
        }
        Some(Err(e)) => Err(e),
        None => return,
    };
    match result {
        Ok(path) => app.show_toast(
            format!("Exportado: {}", path.display()),
            false,
            Instant::now(),
        ),
        Err(e) => app.show_toast(format!("Error al exportar: {e}"), true, Instant::now()),
    }
}

fn copy_current(app: &mut App, config: &Config) {
    let result = match current_markdown(app, config) {
        Some(Ok((content, _))) => export::copy_to_clipboard(&content).map_err(|e| e.to_string()),
        Some(Err(e)) => Err(e),
        None => return,
    };
    match result {
        Ok(()) => app.show_toast("Copiado al portapapeles", false, Instant::now()),
        Err(e) => app.show_toast(format!("Error al copiar: {e}"), true, Instant::now()),
    }
}

fn delete(app: &mut App, id: &str) {
    match history::delete_quotation(id) {
        Ok(()) => {
            reload_list(app);
            load_selected(app);
            app.show_toast("Cotización eliminada", false, Instant::now());
        }
        Err(e) => app.show_toast(format!("Error al eliminar: {e}"), true, Instant::now()),
    }
}
