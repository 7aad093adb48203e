//! # sectionsync-cli
//!
//! Command-line bridge to the section synchronization engine.
//!
//! Every command prints one JSON document on stdout; logs go to stderr.
//!
//! ## Usage
//!
//! ```bash
//! export NOTION_API_KEY=secret_...
//!
//! # Replace the "Status" section of a page with the contents of a file
//! sectionsync replace --parent <page-id> --title Status --file status.md
//!
//! # Same, reading the text from stdin
//! echo "- deployed" | sectionsync replace --parent root --title Status
//!
//! # Dispatch a bridge action
//! echo '{"action": "section_update", "parentId": "root", "sectionTitle": "Log", "rawText": "ok"}' \
//!     | sectionsync exec
//! ```

pub mod action;
pub mod commands;
pub mod settings;

use std::io::{Read, Write};

use tracing_subscriber::EnvFilter;

pub use action::Action;
pub use commands::{execute, Command, Report};
pub use settings::{Args, ConnectionArgs};

/// Environment variable holding the log filter.
pub const LOG_ENV: &str = "SECTIONSYNC_LOG";

#[derive(thiserror::Error, Debug)]
pub enum CliError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("configuration error: {message}")]
    Config { message: String },

    #[error("store setup failed: {0}")]
    Store(#[from] sectionsync_http::Error),
}

/// Log to stderr, filtered by `SECTIONSYNC_LOG` (default `warn`).
pub fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Run one command and print its JSON report.
///
/// Returns whether the operation itself succeeded; `Err` is reserved for
/// usage and setup problems.
pub fn run(args: &Args, input: &mut dyn Read, output: &mut dyn Write) -> Result<bool, CliError> {
    let report = if let Command::Parse { file } = &args.command {
        commands::parse_only(file.as_deref(), input)?
    } else {
        let replacer = args.connection.replacer()?;
        execute(&args.command, &replacer, input)?
    };

    serde_json::to_writer_pretty(&mut *output, &report.json)?;
    writeln!(output)?;
    Ok(report.success)
}
