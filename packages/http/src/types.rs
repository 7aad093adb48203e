use serde::Deserialize;
use std::collections::HashMap;

/// HTTP method for requests
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Method {
    #[default]
    GET,
    PATCH,
}

impl From<Method> for http::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::GET => http::Method::GET,
            Method::PATCH => http::Method::PATCH,
        }
    }
}

/// A full HTTP request
///
/// `path` is the absolute URL; the store resolves it against its base URL
/// before handing the request to an executor.
#[derive(Debug, Clone, Default)]
pub struct HttpRequest {
    /// HTTP method (GET, PATCH)
    pub method: Method,

    /// Absolute request URL
    pub path: String,

    /// Query parameters
    pub query: HashMap<String, String>,

    /// Request headers
    pub headers: HashMap<String, String>,

    /// Request body (will be JSON-serialized)
    pub body: Option<serde_json::Value>,
}

impl HttpRequest {
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            method: Method::GET,
            path: path.into(),
            ..Default::default()
        }
    }

    pub fn patch(path: impl Into<String>) -> Self {
        Self {
            method: Method::PATCH,
            path: path.into(),
            ..Default::default()
        }
    }

    pub fn with_json_body(mut self, body: serde_json::Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    pub fn with_query(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.insert(name.into(), value.into());
        self
    }
}

/// HTTP response from a request
#[derive(Debug, Clone)]
pub struct HttpResponse {
    /// HTTP status code
    pub status: u16,

    /// Response body as JSON value
    /// Will be null if body was empty or not valid JSON
    pub body: serde_json::Value,

    /// Raw body as string (useful when body isn't JSON)
    pub body_text: Option<String>,
}

impl HttpResponse {
    /// Check if the response status indicates success (2xx)
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Raw body for error reporting, falling back to the parsed JSON.
    pub fn body_string(&self) -> String {
        match &self.body_text {
            Some(text) => text.clone(),
            None => self.body.to_string(),
        }
    }

    /// Try to deserialize the body into a specific type
    pub fn json<T: for<'de> Deserialize<'de>>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_value(self.body.clone())
    }
}
