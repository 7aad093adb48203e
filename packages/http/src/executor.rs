//! HTTP execution abstraction for testing.
//!
//! The store talks to the network only through `HttpExecutor`, so unit
//! tests can script responses without a server.

use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};

use crate::types::{HttpRequest, HttpResponse};

/// Trait for executing HTTP requests.
///
/// Implementations can use real HTTP clients or mock responses for testing.
pub trait HttpExecutor: Send + Sync {
    /// Execute an HTTP request and return the response.
    ///
    /// Returns `Err` with a message if no response was received. Non-2xx
    /// responses are `Ok`.
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, String>;
}

/// Production HTTP executor using reqwest.
pub struct ReqwestExecutor {
    client: Client,
}

impl ReqwestExecutor {
    /// Create a new executor with the given timeout.
    pub fn new(timeout: Duration) -> Result<Self, String> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| e.to_string())?;

        Ok(Self { client })
    }
}

impl HttpExecutor for ReqwestExecutor {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, String> {
        let method: http::Method = request.method.clone().into();

        let mut headers = HeaderMap::new();
        for (name, value) in &request.headers {
            let header_name = HeaderName::try_from(name.as_str()).map_err(|e| e.to_string())?;
            let header_value = HeaderValue::try_from(value.as_str()).map_err(|e| e.to_string())?;
            headers.insert(header_name, header_value);
        }

        let mut req_builder = self.client.request(method, &request.path);
        req_builder = req_builder.headers(headers);

        if !request.query.is_empty() {
            req_builder = req_builder.query(&request.query);
        }

        if let Some(body) = &request.body {
            req_builder = req_builder.json(body);
        }

        let response = req_builder.send().map_err(|e| e.to_string())?;

        let status = response.status().as_u16();
        let body_text = response.text().map_err(|e| e.to_string())?;
        let body = serde_json::from_str(&body_text).unwrap_or(serde_json::Value::Null);

        Ok(HttpResponse {
            status,
            body,
            body_text: Some(body_text),
        })
    }
}

/// Mock HTTP executor for testing.
///
/// Responses are scripted per `METHOD url` key. Several responses for one
/// key are served in order; the last one repeats.
#[cfg(test)]
pub mod mock {
    use super::*;
    use std::collections::{HashMap, VecDeque};
    use std::sync::{Arc, Mutex};

    use crate::types::Method;

    #[derive(Clone, Default)]
    pub struct MockExecutor {
        /// Scripted responses keyed by `METHOD url`.
        responses: Arc<Mutex<HashMap<String, VecDeque<HttpResponse>>>>,
        /// Recorded requests for verification.
        recorded_requests: Arc<Mutex<Vec<HttpRequest>>>,
        /// Transport failure for every request, when set.
        error_message: Arc<Mutex<Option<String>>>,
    }

    fn key(method: &Method, path: &str) -> String {
        format!("{:?} {}", method, path)
    }

    impl MockExecutor {
        pub fn new() -> Self {
            Self::default()
        }

        /// Queue a response for `method` on `path`.
        pub fn with_response(
            self,
            method: Method,
            path: impl Into<String>,
            response: HttpResponse,
        ) -> Self {
            let path: String = path.into();
            self.responses
                .lock()
                .unwrap()
                .entry(key(&method, &path))
                .or_default()
                .push_back(response);
            self
        }

        /// Configure to fail all requests with a transport error.
        pub fn fail_with(self, message: impl Into<String>) -> Self {
            *self.error_message.lock().unwrap() = Some(message.into());
            self
        }

        pub fn recorded_requests(&self) -> Vec<HttpRequest> {
            self.recorded_requests.lock().unwrap().clone()
        }

        /// Create a simple success response.
        pub fn success_response(body: serde_json::Value) -> HttpResponse {
            let body_text = body.to_string();
            HttpResponse {
                status: 200,
                body,
                body_text: Some(body_text),
            }
        }

        /// Create a simple error response.
        pub fn error_response(status: u16, message: &str) -> HttpResponse {
            HttpResponse {
                status,
                body: serde_json::json!({"object": "error", "message": message}),
                body_text: Some(format!(
                    r#"{{"object":"error","message":"{}"}}"#,
                    message
                )),
            }
        }

        /// Create a 404 Not Found response.
        pub fn not_found() -> HttpResponse {
            Self::error_response(404, "Not Found")
        }
    }

    impl HttpExecutor for MockExecutor {
        fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, String> {
            self.recorded_requests.lock().unwrap().push(request.clone());

            if let Some(message) = self.error_message.lock().unwrap().clone() {
                return Err(message);
            }

            let mut responses = self.responses.lock().unwrap();
            match responses.get_mut(&key(&request.method, &request.path)) {
                Some(queue) if queue.len() > 1 => Ok(queue.pop_front().unwrap()),
                Some(queue) => Ok(queue.front().cloned().unwrap_or_else(Self::not_found)),
                None => Ok(Self::not_found()),
            }
        }
    }
}
