use sectionsync_core::RemoteError;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("HTTP client error: {message}")]
    Client { message: String },

    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("Invalid URL: {message}")]
    InvalidUrl { message: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("API key is empty")]
    MissingApiKey,
}

impl From<Error> for RemoteError {
    fn from(error: Error) -> Self {
        match error {
            Error::Json(e) => RemoteError::decode(e.to_string()),
            other => RemoteError::transport(other.to_string()),
        }
    }
}
