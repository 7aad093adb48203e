//! Connection settings for a Notion-style block API.

use std::fmt;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://api.notion.com/v1/";
pub const DEFAULT_API_VERSION: &str = "2022-06-28";
/// Largest page the API serves for a child listing.
pub const DEFAULT_PAGE_SIZE: u32 = 100;
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Everything a `NotionStore` needs to reach the API.
///
/// Credentials are passed in by the caller; nothing here reads the
/// environment.
#[derive(Clone)]
pub struct NotionConfig {
    pub base_url: String,
    pub api_key: String,
    pub api_version: String,
    pub page_size: u32,
    pub timeout: Duration,
}

impl NotionConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: api_key.into(),
            api_version: DEFAULT_API_VERSION.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_api_version(mut self, api_version: impl Into<String>) -> Self {
        self.api_version = api_version.into();
        self
    }

    /// Clamped to `1..=100`.
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size.clamp(1, DEFAULT_PAGE_SIZE);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl fmt::Debug for NotionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NotionConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .field("api_version", &self.api_version)
            .field("page_size", &self.page_size)
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = NotionConfig::new("secret");
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.api_version, "2022-06-28");
        assert_eq!(config.page_size, 100);
        assert_eq!(config.timeout, Duration::from_secs(30));
    }

    #[test]
    fn page_size_is_clamped() {
        assert_eq!(NotionConfig::new("k").with_page_size(0).page_size, 1);
        assert_eq!(NotionConfig::new("k").with_page_size(500).page_size, 100);
        assert_eq!(NotionConfig::new("k").with_page_size(25).page_size, 25);
    }

    #[test]
    fn debug_hides_api_key() {
        let debug = format!("{:?}", NotionConfig::new("secret_abc"));
        assert!(!debug.contains("secret_abc"));
        assert!(debug.contains("<redacted>"));
    }
}
