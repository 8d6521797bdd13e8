//! Application run modes: logger init, command dispatch, TUI launch.

use std::io;
use std::sync::Arc;

use crate::cli::{Args, Commands, HistorySubcommand};
use crate::core;
use crate::core::cli::{AskOptions, RenderRequest};
use crate::core::config::Config;

/// Initialize env_logger. In TUI mode, writes to file to avoid corrupting the display.
pub fn init_logger(args: &Args) {
    let log_level = args.log_level();
    let mut logger =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level));

    if args.is_tui() {
        let log_path = core::paths::log_file();
        if let Some(path) = log_path
            && path.parent().is_some_and(|dir| std::fs::create_dir_all(dir).is_ok())
            && let Ok(file) = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(&path)
        {
            logger.target(env_logger::Target::Pipe(Box::new(file)));
        }
    }
    let _ = logger.try_init();
}

/// Run the selected subcommand.
pub async fn run_command(
    command: Commands,
    config: &Config,
) -> Result<(), Box<dyn std::error::Error>> {
    use crate::core::cli as c;

    match command {
        Commands::Parse { file } => c::run_parse(file.as_deref()),
        Commands::Render {
            file,
            opts,
            customer,
            location,
            quotation_id,
            date,
        } => {
            let date = c::default_date(date);
            let id = c::quotation_id_arg(quotation_id.as_deref(), date)?;
            c::run_render(
                config,
                file.as_deref(),
                &RenderRequest {
                    audiences: &opts.doc.audiences(),
                    format: opts.format.into(),
                    customer_name: customer.as_deref(),
                    customer_location: location.as_deref(),
                    quotation_id: Some(&id),
                    date,
                },
            )
        }
        Commands::Ask {
            query,
            model,
            no_stream,
            customer,
            location,
            no_save,
        } => {
            c::run_ask(
                config,
                AskOptions {
                    query: &query,
                    model: model.as_deref(),
                    stream: !no_stream,
                    customer_name: customer.as_deref(),
                    customer_location: location.as_deref(),
                    save: !no_save,
                },
            )
            .await
        }
        Commands::Words { amount } => c::run_words(&amount),
        Commands::Id { date } => c::run_id(date),
        Commands::History { subcommand } => match subcommand {
            HistorySubcommand::List { limit, query } => c::run_history_list(limit, query.as_deref()),
            HistorySubcommand::Show { id, opts } => {
                c::run_history_show(config, &id, &opts.doc.audiences(), opts.format.into())
            }
            HistorySubcommand::Import { file } => c::run_history_import(config, &file),
            HistorySubcommand::Rename { id, title } => c::run_history_rename(&id, &title),
            HistorySubcommand::Delete { id } => c::run_history_delete(&id),
            HistorySubcommand::Export { id, opts, out } => c::run_history_export(
                config,
                &id,
                &opts.doc.audiences(),
                opts.format.into(),
                out.as_deref(),
            ),
        },
        Commands::Config => {
            c::run_config(config);
            Ok(())
        }
        // Handled in main before config is loaded.
        Commands::Completions { .. } => Ok(()),
    }
}

/// Launch the TUI in a blocking thread. Returns on panic or IO error.
pub async fn launch_tui(config: Config) -> Result<(), Box<dyn std::error::Error>> {
    let config = Arc::new(config);
    let join_result: Result<io::Result<()>, tokio::task::JoinError> =
        tokio::task::spawn_blocking(move || crate::tui::run(config)).await;

    match join_result {
        Ok(io_result) => io_result?,
        Err(join_err) => {
            if let Ok(panic) = join_err.try_into_panic() {
                let msg = if let Some(s) = panic.downcast_ref::<&str>() {
                    s.to_string()
                } else if let Some(s) = panic.downcast_ref::<String>() {
                    s.clone()
                } else {
                    format!("{:?}", panic)
                };
                eprintln!("TUI panic: {}", msg);
            }
            return Err(
                Box::new(io::Error::other("TUI thread panicked")) as Box<dyn std::error::Error>
            );
        }
    }
    Ok(())
}
