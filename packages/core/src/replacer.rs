//! Section replacement against a non-transactional remote store.
//!
//! A replace is strictly sequential: parse, fetch, locate, archive the old
//! span block by block, then append the new section in one call. The first
//! failure ends the operation and is reported with how far it got. Nothing
//! is retried or rolled back here.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::block::{Block, BlockKind};
use crate::error::SyncError;
use crate::locator::locate;
use crate::parser::parse;
use crate::store::{RemoteDocumentStore, RemoteError};

/// Parent id that resolves to the configured root page.
pub const ROOT_ALIAS: &str = "root";

/// Input of a section replace.
///
/// All fields are optional on the wire; `SectionReplacer::replace` reports
/// the first missing one before touching the store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplaceSectionRequest {
    #[serde(default, alias = "parent_id")]
    pub parent_id: Option<String>,
    #[serde(default, alias = "section_title")]
    pub section_title: Option<String>,
    #[serde(default, alias = "raw_text")]
    pub raw_text: Option<String>,
}

impl ReplaceSectionRequest {
    pub fn new(
        parent_id: impl Into<String>,
        section_title: impl Into<String>,
        raw_text: impl Into<String>,
    ) -> Self {
        Self {
            parent_id: Some(parent_id.into()),
            section_title: Some(section_title.into()),
            raw_text: Some(raw_text.into()),
        }
    }
}

/// Input of a single-block replace: the first block containing `match_text`
/// is swapped for a new block of `new_kind`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplaceBlockRequest {
    #[serde(default, alias = "parent_id", alias = "page_id")]
    pub parent_id: Option<String>,
    #[serde(default, alias = "match_text")]
    pub match_text: Option<String>,
    #[serde(default, alias = "new_kind", alias = "new_block_type")]
    pub new_kind: Option<String>,
    #[serde(default, alias = "new_content")]
    pub new_content: Option<String>,
}

impl ReplaceBlockRequest {
    pub fn new(
        parent_id: impl Into<String>,
        match_text: impl Into<String>,
        new_kind: impl Into<String>,
        new_content: impl Into<String>,
    ) -> Self {
        Self {
            parent_id: Some(parent_id.into()),
            match_text: Some(match_text.into()),
            new_kind: Some(new_kind.into()),
            new_content: Some(new_content.into()),
        }
    }
}

/// Drives section replacement against a `RemoteDocumentStore`.
///
/// Holds no document state between calls. Concurrent replaces against the
/// same parent are not serialized and can race.
pub struct SectionReplacer<S> {
    store: S,
    root_page_id: Option<String>,
}

impl<S: RemoteDocumentStore> SectionReplacer<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            root_page_id: None,
        }
    }

    /// Resolve the parent id `root` to `page_id`.
    pub fn with_root_page(mut self, page_id: impl Into<String>) -> Self {
        self.root_page_id = Some(page_id.into());
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Replace (or create) the section titled `sectionTitle` under `parentId`.
    ///
    /// Returns the appended blocks with their new remote ids.
    pub fn replace(&self, request: &ReplaceSectionRequest) -> Result<Vec<Block>, SyncError> {
        let parent_id = required(&request.parent_id, "parentId")?;
        let title = required(&request.section_title, "sectionTitle")?;
        let raw_text = request
            .raw_text
            .as_deref()
            .ok_or(SyncError::MissingParameter { name: "rawText" })?;

        self.replace_section(self.resolve_parent(parent_id), title, raw_text)
    }

    /// `replace` with already validated arguments.
    ///
    /// The new section is `[Heading2(title)] + parse(raw_text)` and always
    /// lands at the end of the parent, whatever level or position the old
    /// heading had.
    pub fn replace_section(
        &self,
        parent_id: &str,
        title: &str,
        raw_text: &str,
    ) -> Result<Vec<Block>, SyncError> {
        let content = parse(raw_text);
        debug!(
            parent_id,
            title,
            blocks = content.len(),
            "parsed section content"
        );

        let live = self.fetch(parent_id)?;
        let to_archive = match locate(&live, title) {
            Some(span) => {
                debug!(parent_id, title, start = span.start, end = span.end, "located section");
                remote_ids(span.slice(&live))?
            }
            None => {
                debug!(parent_id, title, "section not present, appending new one");
                Vec::new()
            }
        };

        self.archive_in_order(parent_id, &to_archive)?;

        let mut section = Vec::with_capacity(content.len() + 1);
        section.push(Block::heading2(title));
        section.extend(content);

        self.append(parent_id, section, to_archive.len())
    }

    /// Swap the first block whose text contains `matchText` for a new block.
    ///
    /// The whole child list is rewritten: every live block is archived in
    /// order, then the edited list is appended.
    pub fn replace_block(&self, request: &ReplaceBlockRequest) -> Result<Vec<Block>, SyncError> {
        let parent_id = self.resolve_parent(required(&request.parent_id, "parentId")?);
        let match_text = required(&request.match_text, "matchText")?.trim();
        let kind_name = required(&request.new_kind, "newKind")?.trim();
        let new_content = required(&request.new_content, "newContent")?.trim();

        let kind = BlockKind::from_type_name(kind_name);
        if !kind.is_supported() {
            return Err(SyncError::InvalidParameter {
                name: "newKind",
                message: format!("unknown block kind '{}'", kind_name),
            });
        }

        let live = self.fetch(parent_id)?;
        let target = live
            .iter()
            .position(|block| block.text.contains(match_text))
            .ok_or_else(|| SyncError::NoMatch {
                match_text: match_text.to_string(),
            })?;

        if let Some(unsupported) = live.iter().find(|block| !block.kind.is_supported()) {
            return Err(SyncError::InvalidParameter {
                name: "parentId",
                message: format!(
                    "document holds a '{}' block that cannot be rewritten",
                    unsupported.kind
                ),
            });
        }

        let rewritten: Vec<Block> = live
            .iter()
            .enumerate()
            .map(|(index, block)| {
                if index == target {
                    Block::new(kind.clone(), new_content)
                } else {
                    block.detached()
                }
            })
            .collect();

        let to_archive = remote_ids(&live)?;
        self.archive_in_order(parent_id, &to_archive)?;
        self.append(parent_id, rewritten, to_archive.len())
    }

    /// Map the `root` alias to the configured root page, if any.
    pub fn resolve_parent<'a>(&'a self, parent_id: &'a str) -> &'a str {
        match &self.root_page_id {
            Some(root) if parent_id == ROOT_ALIAS => root.as_str(),
            _ => parent_id,
        }
    }

    fn fetch(&self, parent_id: &str) -> Result<Vec<Block>, SyncError> {
        match self.store.list_children(parent_id) {
            Ok(live) => {
                debug!(parent_id, blocks = live.len(), "fetched live blocks");
                Ok(live)
            }
            Err(source) => {
                warn!(parent_id, error = %source, "fetch failed, nothing mutated");
                Err(SyncError::FetchFailed { source })
            }
        }
    }

    /// Archive `ids` one at a time, in order, stopping at the first failure.
    fn archive_in_order(&self, parent_id: &str, ids: &[String]) -> Result<(), SyncError> {
        for (index, id) in ids.iter().enumerate() {
            debug!(parent_id, block_id = %id, "archiving block");
            if let Err(source) = self.store.archive_block(id) {
                warn!(
                    parent_id,
                    block_id = %id,
                    archived = index,
                    total = ids.len(),
                    error = %source,
                    "archive failed, document left partially archived"
                );
                return Err(SyncError::PartialArchiveFailure {
                    archived: ids[..index].to_vec(),
                    remaining: ids[index..].to_vec(),
                    source,
                });
            }
        }

        if !ids.is_empty() {
            info!(parent_id, archived = ids.len(), "archived old blocks");
        }
        Ok(())
    }

    fn append(
        &self,
        parent_id: &str,
        blocks: Vec<Block>,
        archived_count: usize,
    ) -> Result<Vec<Block>, SyncError> {
        match self.store.append_children(parent_id, &blocks) {
            Ok(appended) => {
                info!(parent_id, appended = appended.len(), "appended new blocks");
                Ok(appended)
            }
            Err(source) => {
                warn!(
                    parent_id,
                    archived = archived_count,
                    pending = blocks.len(),
                    error = %source,
                    "append failed after archival"
                );
                Err(SyncError::AppendFailed {
                    archived_count,
                    pending: blocks,
                    source,
                })
            }
        }
    }
}

/// A present, non-blank field.
fn required<'a>(field: &'a Option<String>, name: &'static str) -> Result<&'a str, SyncError> {
    match field.as_deref() {
        Some(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(SyncError::MissingParameter { name }),
    }
}

/// Remote ids of live blocks. Checked before any archival so a malformed
/// listing fails without mutating anything.
fn remote_ids(blocks: &[Block]) -> Result<Vec<String>, SyncError> {
    blocks
        .iter()
        .map(|block| {
            block.remote_id.clone().ok_or_else(|| SyncError::FetchFailed {
                source: RemoteError::decode(format!(
                    "live {} block '{}' has no remote id",
                    block.kind, block.text
                )),
            })
        })
        .collect()
}
