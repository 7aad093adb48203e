//! `RemoteDocumentStore` over a Notion-style REST API.
//!
//! ## Protocol
//!
//! - `list_children(id)` → `GET blocks/{id}/children`, following
//!   `has_more`/`next_cursor` until the listing is exhausted
//! - `archive_block(id)` → `PATCH blocks/{id}` with `{"archived": true}`
//! - `append_children(id, blocks)` → `PATCH blocks/{id}/children` with
//!   `{"children": [...]}`
//!
//! Any non-2xx answer becomes `RemoteError::Status` carrying the raw body.

use serde::Deserialize;
use serde_json::json;
use tracing::{debug, warn};
use url::Url;

use sectionsync_core::{Block, RemoteDocumentStore, RemoteError};

use crate::config::NotionConfig;
use crate::error::Error;
use crate::executor::{HttpExecutor, ReqwestExecutor};
use crate::types::{HttpRequest, HttpResponse};
use crate::wire;

/// One page of a child listing.
#[derive(Deserialize)]
struct ListPage {
    results: Vec<serde_json::Value>,
    #[serde(default)]
    has_more: bool,
    #[serde(default)]
    next_cursor: Option<String>,
}

/// A block store backed by the Notion HTTP API.
///
/// # Example
///
/// ```ignore
/// use sectionsync_core::{ReplaceSectionRequest, SectionReplacer};
/// use sectionsync_http::{NotionConfig, NotionStore};
///
/// let store = NotionStore::new(NotionConfig::new(api_key))?;
/// let replacer = SectionReplacer::new(store);
/// replacer.replace(&ReplaceSectionRequest::new(page_id, "Status", "all green"))?;
/// ```
pub struct NotionStore<E = ReqwestExecutor> {
    executor: E,
    base_url: Url,
    api_key: String,
    api_version: String,
    page_size: u32,
}

impl NotionStore<ReqwestExecutor> {
    /// Create a store that talks to the network with reqwest.
    pub fn new(config: NotionConfig) -> Result<Self, Error> {
        let executor =
            ReqwestExecutor::new(config.timeout).map_err(|message| Error::Client { message })?;
        Self::with_executor(config, executor)
    }
}

impl<E: HttpExecutor> NotionStore<E> {
    /// Create a store with a custom executor.
    pub fn with_executor(config: NotionConfig, executor: E) -> Result<Self, Error> {
        if config.api_key.trim().is_empty() {
            return Err(Error::MissingApiKey);
        }

        let mut base_url = Url::parse(&config.base_url)?;
        if base_url.cannot_be_a_base() {
            return Err(Error::InvalidUrl {
                message: format!("{} cannot be used as a base URL", config.base_url),
            });
        }
        // Without a trailing slash `join` would replace the last segment.
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        Ok(Self {
            executor,
            base_url,
            api_key: config.api_key,
            api_version: config.api_version,
            page_size: config.page_size,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Build the full URL below the base URL, one percent-encoded path
    /// segment per element of `segments`.
    ///
    /// `/`, `?` and `#` inside a segment are escaped; empty and dot
    /// segments are refused.
    fn build_url(&self, segments: &[&str]) -> Result<String, RemoteError> {
        if let Some(bad) = segments
            .iter()
            .find(|segment| matches!(segment.trim(), "" | "." | ".."))
        {
            return Err(Error::InvalidUrl {
                message: format!("invalid path segment '{}'", bad),
            }
            .into());
        }

        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| Error::InvalidUrl {
                message: format!("{} cannot be used as a base URL", self.base_url),
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url.into())
    }

    fn authorized(&self, request: HttpRequest) -> HttpRequest {
        request
            .with_header("Authorization", format!("Bearer {}", self.api_key))
            .with_header("Notion-Version", self.api_version.clone())
            .with_header("Content-Type", "application/json")
    }

    /// Execute a request, turning non-2xx responses into errors.
    fn send(&self, request: HttpRequest) -> Result<HttpResponse, RemoteError> {
        let request = self.authorized(request);
        debug!(method = ?request.method, url = %request.path, "sending request");

        let response = self
            .executor
            .execute(&request)
            .map_err(RemoteError::transport)?;

        if !response.is_success() {
            debug!(status = response.status, url = %request.path, "request rejected");
            return Err(RemoteError::status(response.status, response.body_string()));
        }
        Ok(response)
    }
}

impl<E: HttpExecutor> RemoteDocumentStore for NotionStore<E> {
    fn list_children(&self, node_id: &str) -> Result<Vec<Block>, RemoteError> {
        let url = self.build_url(&["blocks", node_id, "children"])?;
        let mut blocks = Vec::new();
        let mut cursor: Option<String> = None;

        loop {
            let mut request =
                HttpRequest::get(url.clone()).with_query("page_size", self.page_size.to_string());
            if let Some(cursor) = &cursor {
                request = request.with_query("start_cursor", cursor.clone());
            }

            let response = self.send(request)?;
            let page: ListPage = response.json().map_err(Error::from)?;
            for raw in &page.results {
                blocks.push(wire::decode_block(raw)?);
            }

            match (page.has_more, page.next_cursor) {
                (true, Some(next)) => cursor = Some(next),
                _ => break,
            }
        }

        debug!(node_id, blocks = blocks.len(), "listed children");
        Ok(blocks)
    }

    fn archive_block(&self, block_id: &str) -> Result<(), RemoteError> {
        let url = self.build_url(&["blocks", block_id])?;
        self.send(HttpRequest::patch(url).with_json_body(json!({"archived": true})))?;
        Ok(())
    }

    fn append_children(&self, node_id: &str, blocks: &[Block]) -> Result<Vec<Block>, RemoteError> {
        let url = self.build_url(&["blocks", node_id, "children"])?;
        let children: Vec<serde_json::Value> = blocks.iter().map(wire::encode_block).collect();
        let response =
            self.send(HttpRequest::patch(url).with_json_body(json!({ "children": children })))?;

        // The append landed; an unreadable answer must not be reported as a failure.
        match wire::decode_results(&response.body) {
            Ok(appended) => Ok(appended),
            Err(e) => {
                warn!(node_id, error = %e, "append succeeded but response was unreadable");
                Ok(blocks.iter().map(Block::detached).collect())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executor::mock::MockExecutor;
    use crate::types::Method;

    const BASE: &str = "https://api.example.com/v1/";

    fn store(executor: MockExecutor) -> NotionStore<MockExecutor> {
        NotionStore::with_executor(NotionConfig::new("key").with_base_url(BASE), executor).unwrap()
    }

    fn block_json(id: &str, kind: &str, text: &str) -> serde_json::Value {
        json!({
            "object": "block",
            "id": id,
            "type": kind,
            kind: {"rich_text": [{"type": "text", "plain_text": text}]}
        })
    }

    #[test]
    fn rejects_empty_api_key() {
        let result = NotionStore::with_executor(NotionConfig::new("  "), MockExecutor::new());
        assert!(matches!(result, Err(Error::MissingApiKey)));
    }

    #[test]
    fn base_url_gets_trailing_slash() {
        let store = NotionStore::with_executor(
            NotionConfig::new("key").with_base_url("https://api.example.com/v1"),
            MockExecutor::new(),
        )
        .unwrap();
        assert_eq!(store.base_url().as_str(), "https://api.example.com/v1/");
        assert_eq!(
            store.build_url(&["blocks", "abc"]).unwrap(),
            "https://api.example.com/v1/blocks/abc"
        );
    }

    #[test]
    fn ids_stay_inside_blocks_path() {
        let store = store(MockExecutor::new());

        let url = store.build_url(&["blocks", "../x?y", "children"]).unwrap();
        assert_eq!(
            url,
            "https://api.example.com/v1/blocks/..%2Fx%3Fy/children"
        );

        let url = store
            .build_url(&["blocks", "../../evil?x=1#", "children"])
            .unwrap();
        assert!(url.starts_with("https://api.example.com/v1/blocks/"));
        assert!(!url.contains('?'));
        assert!(!url.contains('#'));
    }

    #[test]
    fn dot_segment_ids_are_rejected_before_sending() {
        let executor = MockExecutor::new();
        let err = store(executor.clone()).archive_block("..").unwrap_err();
        assert!(matches!(err, RemoteError::Transport { .. }));
        assert!(store(executor.clone()).list_children("").is_err());
        assert!(executor.recorded_requests().is_empty());
    }

    #[test]
    fn rejects_unparseable_base_url() {
        let result = NotionStore::with_executor(
            NotionConfig::new("key").with_base_url("not a url"),
            MockExecutor::new(),
        );
        assert!(matches!(result, Err(Error::UrlParse(_))));
    }

    #[test]
    fn list_follows_cursor() {
        let url = format!("{}blocks/page/children", BASE);
        let executor = MockExecutor::new()
            .with_response(
                Method::GET,
                url.clone(),
                MockExecutor::success_response(json!({
                    "results": [block_json("1", "heading_2", "A")],
                    "has_more": true,
                    "next_cursor": "c1"
                })),
            )
            .with_response(
                Method::GET,
                url.clone(),
                MockExecutor::success_response(json!({
                    "results": [block_json("2", "paragraph", "b")],
                    "has_more": false,
                    "next_cursor": null
                })),
            );

        let blocks = store(executor.clone()).list_children("page").unwrap();
        assert_eq!(
            blocks,
            vec![
                Block::heading2("A").with_remote_id("1"),
                Block::paragraph("b").with_remote_id("2"),
            ]
        );

        let requests = executor.recorded_requests();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].query.get("start_cursor"), None);
        assert_eq!(requests[0].query.get("page_size"), Some(&"100".to_string()));
        assert_eq!(requests[1].query.get("start_cursor"), Some(&"c1".to_string()));
    }

    #[test]
    fn requests_carry_auth_headers() {
        let executor = MockExecutor::new().with_response(
            Method::PATCH,
            format!("{}blocks/b1", BASE),
            MockExecutor::success_response(json!({"id": "b1", "archived": true})),
        );
        store(executor.clone()).archive_block("b1").unwrap();

        let request = &executor.recorded_requests()[0];
        assert_eq!(request.headers.get("Authorization"), Some(&"Bearer key".to_string()));
        assert_eq!(request.headers.get("Notion-Version"), Some(&"2022-06-28".to_string()));
        assert_eq!(request.body, Some(json!({"archived": true})));
    }

    #[test]
    fn non_success_becomes_status_error() {
        let executor = MockExecutor::new().with_response(
            Method::PATCH,
            format!("{}blocks/b1", BASE),
            MockExecutor::error_response(409, "conflict"),
        );
        let err = store(executor).archive_block("b1").unwrap_err();
        assert_eq!(err.status_code(), Some(409));
        assert!(err.to_string().contains("conflict"));
    }

    #[test]
    fn transport_failure_becomes_transport_error() {
        let err = store(MockExecutor::new().fail_with("connection refused"))
            .list_children("page")
            .unwrap_err();
        assert_eq!(err, RemoteError::transport("connection refused"));
    }

    #[test]
    fn append_sends_encoded_children() {
        let executor = MockExecutor::new().with_response(
            Method::PATCH,
            format!("{}blocks/page/children", BASE),
            MockExecutor::success_response(json!({
                "results": [
                    block_json("n1", "heading_2", "Status"),
                    block_json("n2", "bulleted_list_item", "item")
                ]
            })),
        );

        let appended = store(executor.clone())
            .append_children("page", &[Block::heading2("Status"), Block::bulleted("item")])
            .unwrap();
        assert_eq!(appended[1], Block::bulleted("item").with_remote_id("n2"));

        let body = executor.recorded_requests()[0].body.clone().unwrap();
        assert_eq!(body["children"][0]["type"], "heading_2");
        assert_eq!(
            body["children"][1]["bulleted_list_item"]["rich_text"][0]["text"]["content"],
            "item"
        );
    }

    #[test]
    fn unreadable_append_answer_is_still_success() {
        let executor = MockExecutor::new().with_response(
            Method::PATCH,
            format!("{}blocks/page/children", BASE),
            MockExecutor::success_response(json!({"unexpected": true})),
        );
        let appended = store(executor)
            .append_children("page", &[Block::paragraph("x")])
            .unwrap();
        assert_eq!(appended, vec![Block::paragraph("x")]);
    }

    #[test]
    fn unexpected_list_body_is_decode_error() {
        let executor = MockExecutor::new().with_response(
            Method::GET,
            format!("{}blocks/page/children", BASE),
            MockExecutor::success_response(json!({"object": "list"})),
        );
        let err = store(executor).list_children("page").unwrap_err();
        assert!(matches!(err, RemoteError::Decode { .. }));
    }
}
