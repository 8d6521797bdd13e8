//! # cotizador
//!
//! Turns AI chat responses into internal and customer quotation documents,
//! keeps a local history of them, and browses that history in a terminal UI.

mod cli;
mod core;
mod run;
mod tui;

use clap::{CommandFactory, Parser};
use dotenv::dotenv;

use crate::cli::{Args, Commands};

#[tokio::main]
async fn main() {
    dotenv().ok();
    let args = Args::parse();
    run::init_logger(&args);

    if let Some(Commands::Completions { shell }) = &args.command {
        let mut cmd = Args::command();
        let name = cmd.get_name().to_string();
        cli::generate(*shell, &mut cmd, name, &mut std::io::stdout());
        return;
    }

    let config = core::config::load().unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    });

    let result = match args.command {
        Some(command) => run::run_command(command, &config).await,
        None => run::launch_tui(config).await,
    };
    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
