//! CLI definitions: argument parsing, subcommands, and help text.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;

pub use clap_complete::generate;

use crate::core::export::ExportFormat;
use crate::core::render::Audience;

const AFTER_HELP: &str = "\
EXAMPLES:
  cotizador                                   Browse saved quotations (TUI)
  cotizador ask \"50 sacos de cemento gris\"    Request a quotation and save it
  cotizador parse respuesta.md                Print the parsed quotation as JSON
  cat respuesta.md | cotizador render --doc both
  cotizador words 1234.5                      Amount in words
  cotizador history list --query norte        Search saved quotations
  cotizador history export <ID> --format markdown
  cotizador completions bash                  Generate bash completions
";

/// Command-line arguments for the application.
#[derive(Parser)]
#[command(
    author,
    version,
    about = "Quotation documents from AI responses for a materials supplier",
    after_help = AFTER_HELP
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Increase log verbosity (use multiple times for debug)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Reduce log output (errors only)
    #[arg(short = 'q', long = "quiet", global = true)]
    pub quiet: bool,
}

/// Which document(s) to output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DocArg {
    Customer,
    Internal,
    Both,
}

impl DocArg {
    pub fn audiences(self) -> Vec<Audience> {
        match self {
            DocArg::Customer => vec![Audience::Customer],
            DocArg::Internal => vec![Audience::Internal],
            DocArg::Both => vec![Audience::Internal, Audience::Customer],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FormatArg {
    Text,
    Markdown,
    Json,
}

impl From<FormatArg> for ExportFormat {
    fn from(f: FormatArg) -> Self {
        match f {
            FormatArg::Text => ExportFormat::Text,
            FormatArg::Markdown => ExportFormat::Markdown,
            FormatArg::Json => ExportFormat::Json,
        }
    }
}

/// Document selection and customer data shared by rendering commands.
#[derive(clap::Args, Debug, Clone)]
pub struct RenderOpts {
    /// Document to output
    #[arg(long, value_enum, default_value_t = DocArg::Customer)]
    pub doc: DocArg,

    /// Output format
    #[arg(long, value_enum, default_value_t = FormatArg::Text)]
    pub format: FormatArg,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Parse an AI response and print the result as JSON
    Parse {
        /// Response file ('-' or omitted reads stdin)
        file: Option<PathBuf>,
    },
    /// Render the documents of an AI response
    Render {
        /// Response file ('-' or omitted reads stdin)
        file: Option<PathBuf>,
        #[command(flatten)]
        opts: RenderOpts,
        /// Customer name for the header
        #[arg(long)]
        customer: Option<String>,
        /// Delivery location for the header
        #[arg(long)]
        location: Option<String>,
        /// Quotation number (12 digits); generated when omitted
        #[arg(long)]
        quotation_id: Option<String>,
        /// Document date (YYYY-MM-DD); today when omitted
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Request a quotation from the model, print it, and save it to history
    Ask {
        /// What to quote (use '-' to read from stdin)
        query: String,
        /// Model ID (e.g. anthropic/claude-haiku-4.5)
        #[arg(short = 'm', long)]
        model: Option<String>,
        /// Wait for the full response instead of streaming it
        #[arg(long)]
        no_stream: bool,
        /// Customer name
        #[arg(long)]
        customer: Option<String>,
        /// Delivery location
        #[arg(long)]
        location: Option<String>,
        /// Do not save the quotation to history
        #[arg(long)]
        no_save: bool,
    },
    /// Spell out an amount in Spanish (pesos)
    Words {
        /// Amount, e.g. 1234.50 or "$1,234.50"
        amount: String,
    },
    /// Generate a quotation number
    Id {
        /// Date for the number (YYYY-MM-DD); today when omitted
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Manage saved quotations
    History {
        #[command(subcommand)]
        subcommand: HistorySubcommand,
    },
    /// Show config paths, model, company profile, and API key status
    Config,
    /// Generate shell completion script
    Completions {
        /// Shell to generate completions for (bash, zsh, fish, powershell, elvish)
        #[arg(value_parser = clap::value_parser!(Shell))]
        shell: Shell,
    },
}

#[derive(Subcommand)]
pub enum HistorySubcommand {
    /// List saved quotations
    List {
        /// Maximum number of quotations to show
        #[arg(short, long)]
        limit: Option<usize>,
        /// Filter by title, customer, or number
        #[arg(long)]
        query: Option<String>,
    },
    /// Render a saved quotation
    Show {
        id: String,
        #[command(flatten)]
        opts: RenderOpts,
    },
    /// Import a quotation history JSON dump
    Import { file: PathBuf },
    /// Rename a saved quotation
    Rename { id: String, title: String },
    /// Delete a saved quotation
    Delete { id: String },
    /// Export a saved quotation to a file
    Export {
        id: String,
        #[command(flatten)]
        opts: RenderOpts,
        /// Output file or directory (defaults to the exports directory)
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
}

impl Args {
    /// Log level based on -v/-q flags: error, warn, info, or debug.
    pub fn log_level(&self) -> &'static str {
        if self.quiet {
            "error"
        } else if self.verbose >= 2 {
            "debug"
        } else if self.verbose >= 1 {
            "info"
        } else {
            "warn"
        }
    }

    /// TUI mode logs to a file so the display is not corrupted.
    pub fn is_tui(&self) -> bool {
        self.command.is_none()
    }
}
