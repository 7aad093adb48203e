//! # sectionsync-http
//!
//! A `RemoteDocumentStore` that reaches a Notion-style block API over HTTP.
//!
//! ## NotionStore
//!
//! Blocking store backed by reqwest; every call is one request (or one
//! request per page for listings):
//!
//! ```ignore
//! use sectionsync_core::{RemoteDocumentStore, SectionReplacer, ReplaceSectionRequest};
//! use sectionsync_http::{NotionConfig, NotionStore};
//!
//! let config = NotionConfig::new(api_key);
//! let store = NotionStore::new(config)?;
//!
//! // Raw block access
//! let children = store.list_children(&page_id)?;
//!
//! // Section replacement
//! let replacer = SectionReplacer::new(store).with_root_page(root_page);
//! replacer.replace(&ReplaceSectionRequest::new("root", "Status", "all green"))?;
//! ```
//!
//! ## Testing
//!
//! Requests go through the `HttpExecutor` trait, so the store can run
//! against scripted responses instead of the network.

pub mod config;
pub mod error;
pub mod executor;
pub mod types;
pub mod wire;

mod store;

// Re-export main types
pub use config::NotionConfig;
pub use error::Error;
pub use executor::{HttpExecutor, ReqwestExecutor};
pub use store::NotionStore;
pub use types::{HttpRequest, HttpResponse, Method};
