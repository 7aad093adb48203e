//! Command-line arguments and store configuration.
//!
//! Connection settings come from flags with environment fallbacks. They
//! are resolved here, once, and passed down explicitly.

use std::time::Duration;

use clap::Parser;

use sectionsync_core::{InMemoryDocumentStore, RemoteDocumentStore, SectionReplacer};
use sectionsync_http::config::{DEFAULT_API_VERSION, DEFAULT_BASE_URL};
use sectionsync_http::{NotionConfig, NotionStore};

use crate::commands::Command;
use crate::CliError;

/// sectionsync - keep named sections of a remote document up to date
#[derive(Parser, Debug)]
#[command(name = "sectionsync")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    #[command(flatten)]
    pub connection: ConnectionArgs,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(clap::Args, Debug, Clone)]
pub struct ConnectionArgs {
    /// Integration token for the block API
    #[arg(long, env = "NOTION_API_KEY", hide_env_values = true, global = true)]
    pub api_key: Option<String>,

    /// Base URL of the block API
    #[arg(long, env = "NOTION_BASE_URL", default_value = DEFAULT_BASE_URL, global = true)]
    pub base_url: String,

    /// API version header value
    #[arg(long, env = "NOTION_VERSION", default_value = DEFAULT_API_VERSION, global = true)]
    pub notion_version: String,

    /// Page id that the parent id `root` stands for
    #[arg(long, env = "NOTION_ROOT_PAGE_ID", global = true)]
    pub root_page_id: Option<String>,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = 30, global = true)]
    pub timeout_secs: u64,

    /// Use an empty in-memory document instead of the remote API
    #[arg(long, global = true)]
    pub memory: bool,
}

impl ConnectionArgs {
    pub fn notion_config(&self) -> Result<NotionConfig, CliError> {
        let api_key = self.api_key.clone().ok_or_else(|| CliError::Config {
            message: "missing API key: pass --api-key or set NOTION_API_KEY".to_string(),
        })?;

        Ok(NotionConfig::new(api_key)
            .with_base_url(self.base_url.clone())
            .with_api_version(self.notion_version.clone())
            .with_timeout(Duration::from_secs(self.timeout_secs)))
    }

    pub fn store(&self) -> Result<Box<dyn RemoteDocumentStore>, CliError> {
        if self.memory {
            return Ok(Box::new(InMemoryDocumentStore::new()));
        }
        Ok(Box::new(NotionStore::new(self.notion_config()?)?))
    }

    pub fn replacer(&self) -> Result<SectionReplacer<Box<dyn RemoteDocumentStore>>, CliError> {
        let replacer = SectionReplacer::new(self.store()?);
        Ok(match &self.root_page_id {
            Some(root) => replacer.with_root_page(root.clone()),
            None => replacer,
        })
    }
}
