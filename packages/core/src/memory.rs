//! In-memory document store.
//!
//! Keeps an ordered child list per node. Archival removes a block from its
//! parent. Every call is recorded, and individual operations can be made to
//! fail, which makes this store the test double for the replacer.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use uuid::Uuid;

use crate::block::Block;
use crate::store::{RemoteDocumentStore, RemoteError};

/// A call made against an `InMemoryDocumentStore`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreCall {
    ListChildren(String),
    Archive(String),
    Append(String, Vec<Block>),
}

#[derive(Default)]
struct Inner {
    children: HashMap<String, Vec<Block>>,
    calls: Vec<StoreCall>,
    archive_calls: usize,
    fail_archive_at: Option<usize>,
    fail_list: bool,
    fail_append: bool,
}

/// Thread-safe in-memory `RemoteDocumentStore`.
///
/// Clones share state.
///
/// # Example
///
/// ```rust
/// use sectionsync_core::{Block, InMemoryDocumentStore, RemoteDocumentStore};
///
/// let store = InMemoryDocumentStore::new()
///     .with_children("page", vec![Block::heading2("Status"), Block::paragraph("old")]);
///
/// let live = store.list_children("page").unwrap();
/// assert!(live.iter().all(|block| block.remote_id.is_some()));
/// ```
#[derive(Clone, Default)]
pub struct InMemoryDocumentStore {
    inner: Arc<Mutex<Inner>>,
}

impl InMemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the children of `node_id`. Blocks without a remote id get one.
    pub fn with_children(self, node_id: impl Into<String>, blocks: Vec<Block>) -> Self {
        let blocks = blocks.into_iter().map(assign_id).collect();
        self.lock().children.insert(node_id.into(), blocks);
        self
    }

    /// Make the `n`-th archive call (0-based) fail with a 500.
    pub fn fail_archive_at(self, n: usize) -> Self {
        self.lock().fail_archive_at = Some(n);
        self
    }

    /// Make every `list_children` call fail.
    pub fn fail_list(self) -> Self {
        self.lock().fail_list = true;
        self
    }

    /// Make every `append_children` call fail.
    pub fn fail_append(self) -> Self {
        self.lock().fail_append = true;
        self
    }

    /// Current children of `node_id`, without recording a call.
    pub fn children(&self, node_id: &str) -> Vec<Block> {
        self.lock()
            .children
            .get(node_id)
            .cloned()
            .unwrap_or_default()
    }

    /// Every call made so far, in order.
    pub fn calls(&self) -> Vec<StoreCall> {
        self.lock().calls.clone()
    }

    /// Ids passed to `archive_block`, in order.
    pub fn archive_calls(&self) -> Vec<String> {
        self.lock()
            .calls
            .iter()
            .filter_map(|call| match call {
                StoreCall::Archive(id) => Some(id.clone()),
                _ => None,
            })
            .collect()
    }

    /// Block lists passed to `append_children`, in order.
    pub fn append_calls(&self) -> Vec<Vec<Block>> {
        self.lock()
            .calls
            .iter()
            .filter_map(|call| match call {
                StoreCall::Append(_, blocks) => Some(blocks.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn clear_calls(&self) {
        self.lock().calls.clear();
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        // A panic while holding the lock leaves plain data behind; keep going.
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

fn assign_id(block: Block) -> Block {
    if block.remote_id.is_some() {
        block
    } else {
        block.with_remote_id(Uuid::new_v4().to_string())
    }
}

impl RemoteDocumentStore for InMemoryDocumentStore {
    fn list_children(&self, node_id: &str) -> Result<Vec<Block>, RemoteError> {
        let mut inner = self.lock();
        inner.calls.push(StoreCall::ListChildren(node_id.to_string()));

        if inner.fail_list {
            return Err(RemoteError::status(503, "list failed"));
        }

        Ok(inner.children.get(node_id).cloned().unwrap_or_default())
    }

    fn archive_block(&self, block_id: &str) -> Result<(), RemoteError> {
        let mut inner = self.lock();
        inner.calls.push(StoreCall::Archive(block_id.to_string()));

        let attempt = inner.archive_calls;
        inner.archive_calls += 1;
        if inner.fail_archive_at == Some(attempt) {
            return Err(RemoteError::status(
                500,
                format!("archive of {} failed", block_id),
            ));
        }

        for blocks in inner.children.values_mut() {
            if let Some(position) = blocks
                .iter()
                .position(|block| block.remote_id.as_deref() == Some(block_id))
            {
                blocks.remove(position);
                return Ok(());
            }
        }

        Err(RemoteError::status(
            404,
            format!("block {} not found", block_id),
        ))
    }

    fn append_children(&self, node_id: &str, blocks: &[Block]) -> Result<Vec<Block>, RemoteError> {
        let mut inner = self.lock();
        inner
            .calls
            .push(StoreCall::Append(node_id.to_string(), blocks.to_vec()));

        if inner.fail_append {
            return Err(RemoteError::status(400, "append failed"));
        }

        let appended: Vec<Block> = blocks
            .iter()
            .map(|block| block.detached().with_remote_id(Uuid::new_v4().to_string()))
            .collect();
        inner
            .children
            .entry(node_id.to_string())
            .or_default()
            .extend(appended.iter().cloned());

        Ok(appended)
    }
}
