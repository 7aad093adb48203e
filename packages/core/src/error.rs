//! Error taxonomy of the replace operations.
//!
//! Every variant says how far the remote document was mutated before the
//! failure, so the caller can decide on its own retry or compensation.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::block::Block;
use crate::store::RemoteError;

/// The stage an operation failed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Stage {
    MissingParameter,
    InvalidParameter,
    FetchFailed,
    NoMatch,
    PartialArchiveFailure,
    AppendFailed,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::MissingParameter => "MissingParameter",
            Stage::InvalidParameter => "InvalidParameter",
            Stage::FetchFailed => "FetchFailed",
            Stage::NoMatch => "NoMatch",
            Stage::PartialArchiveFailure => "PartialArchiveFailure",
            Stage::AppendFailed => "AppendFailed",
        };
        f.write_str(name)
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum SyncError {
    /// A required request field was absent or empty. Nothing was sent.
    #[error("missing required parameter: {name}")]
    MissingParameter { name: &'static str },

    /// A request field was present but unusable. Nothing was sent.
    #[error("invalid parameter {name}: {message}")]
    InvalidParameter { name: &'static str, message: String },

    /// Listing the live document failed. Nothing was mutated.
    #[error("failed to fetch children: {source}")]
    FetchFailed { source: RemoteError },

    /// No live block contained the match text. Nothing was mutated.
    #[error("no block matched text: '{match_text}'")]
    NoMatch { match_text: String },

    /// Archival stopped at the first failing block.
    ///
    /// `archived` were removed, `remaining` were not; the first of
    /// `remaining` is the block whose archival failed. No new content was
    /// written.
    #[error(
        "archived {} of {} blocks before failing on {}: {source}",
        archived.len(),
        archived.len() + remaining.len(),
        remaining.first().map(String::as_str).unwrap_or("?")
    )]
    PartialArchiveFailure {
        archived: Vec<String>,
        remaining: Vec<String>,
        source: RemoteError,
    },

    /// The old content is gone and the new content did not land.
    ///
    /// `pending` holds exactly the blocks that should be appended again.
    #[error("old content removed ({archived_count} blocks) but append failed: {source}")]
    AppendFailed {
        archived_count: usize,
        pending: Vec<Block>,
        source: RemoteError,
    },
}

impl SyncError {
    pub fn stage(&self) -> Stage {
        match self {
            SyncError::MissingParameter { .. } => Stage::MissingParameter,
            SyncError::InvalidParameter { .. } => Stage::InvalidParameter,
            SyncError::FetchFailed { .. } => Stage::FetchFailed,
            SyncError::NoMatch { .. } => Stage::NoMatch,
            SyncError::PartialArchiveFailure { .. } => Stage::PartialArchiveFailure,
            SyncError::AppendFailed { .. } => Stage::AppendFailed,
        }
    }

    /// Number of blocks archived before the failure, for stages that mutate.
    pub fn archived_count(&self) -> Option<usize> {
        match self {
            SyncError::PartialArchiveFailure { archived, .. } => Some(archived.len()),
            SyncError::AppendFailed { archived_count, .. } => Some(*archived_count),
            _ => None,
        }
    }

    /// True when no remote mutation happened, so re-running is safe.
    pub fn is_retryable(&self) -> bool {
        !matches!(
            self,
            SyncError::PartialArchiveFailure { .. } | SyncError::AppendFailed { .. }
        )
    }
}
