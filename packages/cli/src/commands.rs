//! Command definitions and execution.
//!
//! Commands:
//! - `replace` - Replace or create a section from text
//! - `replace-block` - Swap the first block containing a string
//! - `list` - Print the live children of a node
//! - `parse` - Print the blocks text would parse into (offline)
//! - `exec` - Run one JSON action read from stdin

use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use clap::Subcommand;
use serde_json::Value as JsonValue;

use sectionsync_core::{
    parse, Outcome, RemoteDocumentStore, ReplaceBlockRequest, ReplaceSectionRequest,
    SectionReplacer,
};

use crate::action::Action;
use crate::CliError;

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Replace the section titled TITLE under PARENT (or append it)
    Replace {
        /// Parent block or page id (`root` for the configured root page)
        #[arg(long)]
        parent: String,

        /// Section title to find and rewrite
        #[arg(long)]
        title: String,

        /// Read the new content from a file instead of stdin
        #[arg(long)]
        file: Option<PathBuf>,
    },

    /// Replace the first block whose text contains MATCH
    ReplaceBlock {
        #[arg(long)]
        parent: String,

        #[arg(long = "match")]
        match_text: String,

        /// Kind of the new block, e.g. paragraph or heading_2
        #[arg(long)]
        kind: String,

        #[arg(long)]
        content: String,
    },

    /// Print the direct children of PARENT
    List {
        #[arg(long)]
        parent: String,
    },

    /// Print the blocks the given text parses into
    Parse {
        #[arg(long)]
        file: Option<PathBuf>,
    },

    /// Read one JSON action from stdin and run it
    Exec,
}

/// What a command prints, and whether it counts as success.
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub json: JsonValue,
    pub success: bool,
}

impl Report {
    fn from_outcome(outcome: Outcome) -> Result<Self, CliError> {
        Ok(Self {
            success: outcome.is_success(),
            json: serde_json::to_value(outcome)?,
        })
    }
}

/// Run a command against a replacer.
pub fn execute<S: RemoteDocumentStore>(
    command: &Command,
    replacer: &SectionReplacer<S>,
    input: &mut dyn Read,
) -> Result<Report, CliError> {
    match command {
        Command::Replace {
            parent,
            title,
            file,
        } => {
            let raw_text = read_text(file.as_deref(), input)?;
            let request = ReplaceSectionRequest::new(parent.as_str(), title.as_str(), raw_text);
            Report::from_outcome(Outcome::from_result(replacer.replace(&request)))
        }
        Command::ReplaceBlock {
            parent,
            match_text,
            kind,
            content,
        } => {
            let request = ReplaceBlockRequest::new(
                parent.as_str(),
                match_text.as_str(),
                kind.as_str(),
                content.as_str(),
            );
            Report::from_outcome(Outcome::from_result(replacer.replace_block(&request)))
        }
        Command::List { parent } => list(replacer, parent),
        Command::Parse { file } => parse_only(file.as_deref(), input),
        Command::Exec => {
            let mut raw = String::new();
            input.read_to_string(&mut raw)?;
            let action: Action = serde_json::from_str(&raw)?;
            Report::from_outcome(action.dispatch(replacer))
        }
    }
}

/// Parse text without touching any store.
pub fn parse_only(file: Option<&Path>, input: &mut dyn Read) -> Result<Report, CliError> {
    let text = read_text(file, input)?;
    Ok(Report {
        json: serde_json::to_value(parse(&text))?,
        success: true,
    })
}

fn list<S: RemoteDocumentStore>(
    replacer: &SectionReplacer<S>,
    parent: &str,
) -> Result<Report, CliError> {
    match replacer.store().list_children(replacer.resolve_parent(parent)) {
        Ok(blocks) => Ok(Report {
            json: serde_json::to_value(blocks)?,
            success: true,
        }),
        Err(e) => Ok(Report {
            json: serde_json::json!({"status": "error", "detail": e.to_string()}),
            success: false,
        }),
    }
}

fn read_text(file: Option<&Path>, input: &mut dyn Read) -> Result<String, CliError> {
    match file {
        Some(path) => Ok(fs::read_to_string(path)?),
        None => {
            let mut text = String::new();
            input.read_to_string(&mut text)?;
            Ok(text)
        }
    }
}
