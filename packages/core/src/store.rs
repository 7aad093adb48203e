//! The remote document store interface.

use std::sync::Arc;

use crate::block::Block;

/// Failure of a single remote call.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum RemoteError {
    /// The store answered with a non-2xx status.
    #[error("remote store returned {status}: {body}")]
    Status { status: u16, body: String },

    /// The request never completed.
    #[error("transport error: {message}")]
    Transport { message: String },

    /// A 2xx answer whose body could not be understood.
    #[error("could not decode remote response: {message}")]
    Decode { message: String },
}

impl RemoteError {
    pub fn status(status: u16, body: impl Into<String>) -> Self {
        RemoteError::Status {
            status,
            body: body.into(),
        }
    }

    pub fn transport(message: impl Into<String>) -> Self {
        RemoteError::Transport {
            message: message.into(),
        }
    }

    pub fn decode(message: impl Into<String>) -> Self {
        RemoteError::Decode {
            message: message.into(),
        }
    }

    /// HTTP-like status code, when the store produced one.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            RemoteError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// The three capabilities the engine needs from a remote block tree.
///
/// Each call either completes or fails definitively. No call is expected to
/// be atomic with any other.
///
/// # Object Safety
///
/// This trait is object-safe: you can use `Box<dyn RemoteDocumentStore>`.
pub trait RemoteDocumentStore: Send + Sync {
    /// Direct children of `node_id`, in document order, each with its remote id.
    fn list_children(&self, node_id: &str) -> Result<Vec<Block>, RemoteError>;

    /// Remove one block from its parent.
    fn archive_block(&self, block_id: &str) -> Result<(), RemoteError>;

    /// Append `blocks` as the last children of `node_id`.
    ///
    /// Returns the appended blocks carrying their new remote ids.
    fn append_children(&self, node_id: &str, blocks: &[Block]) -> Result<Vec<Block>, RemoteError>;
}

// Blanket implementations for references and smart pointers

impl<T: RemoteDocumentStore + ?Sized> RemoteDocumentStore for &T {
    fn list_children(&self, node_id: &str) -> Result<Vec<Block>, RemoteError> {
        (**self).list_children(node_id)
    }

    fn archive_block(&self, block_id: &str) -> Result<(), RemoteError> {
        (**self).archive_block(block_id)
    }

    fn append_children(&self, node_id: &str, blocks: &[Block]) -> Result<Vec<Block>, RemoteError> {
        (**self).append_children(node_id, blocks)
    }
}

impl<T: RemoteDocumentStore + ?Sized> RemoteDocumentStore for Box<T> {
    fn list_children(&self, node_id: &str) -> Result<Vec<Block>, RemoteError> {
        self.as_ref().list_children(node_id)
    }

    fn archive_block(&self, block_id: &str) -> Result<(), RemoteError> {
        self.as_ref().archive_block(block_id)
    }

    fn append_children(&self, node_id: &str, blocks: &[Block]) -> Result<Vec<Block>, RemoteError> {
        self.as_ref().append_children(node_id, blocks)
    }
}

impl<T: RemoteDocumentStore + ?Sized> RemoteDocumentStore for Arc<T> {
    fn list_children(&self, node_id: &str) -> Result<Vec<Block>, RemoteError> {
        self.as_ref().list_children(node_id)
    }

    fn archive_block(&self, block_id: &str) -> Result<(), RemoteError> {
        self.as_ref().archive_block(block_id)
    }

    fn append_children(&self, node_id: &str, blocks: &[Block]) -> Result<Vec<Block>, RemoteError> {
        self.as_ref().append_children(node_id, blocks)
    }
}
