//! Section synchronization engine.
//!
//! This crate maintains named sections inside a remote document made of an
//! ordered, flat list of typed blocks:
//! - `Block`: one heading, paragraph or list item
//! - `parse`: turns lightly structured text into blocks
//! - `locate`: finds the contiguous span of a titled section
//! - `SectionReplacer`: archives the old span and appends the new section
//!
//! The remote document is only reachable through a `RemoteDocumentStore`,
//! which offers no transactions. Every partial failure is reported as data
//! (see `SyncError`) and never rolled back.
//!
//! # Example
//!
//! ```rust
//! use sectionsync_core::{InMemoryDocumentStore, ReplaceSectionRequest, SectionReplacer};
//!
//! let store = InMemoryDocumentStore::new();
//! let replacer = SectionReplacer::new(&store);
//!
//! let request = ReplaceSectionRequest::new("page", "Status", "all green\n- deploy done");
//! let appended = replacer.replace(&request).unwrap();
//! assert_eq!(appended.len(), 3);
//! ```

mod block;
mod error;
mod locator;
pub mod memory;
mod outcome;
mod parser;
mod replacer;
mod store;

pub use block::{Block, BlockKind};
pub use error::{Stage, SyncError};
pub use locator::{locate, SectionSpan};
pub use memory::InMemoryDocumentStore;
pub use outcome::Outcome;
pub use parser::{parse, TextBlockParser};
pub use replacer::{ReplaceBlockRequest, ReplaceSectionRequest, SectionReplacer, ROOT_ALIAS};
pub use store::{RemoteDocumentStore, RemoteError};
