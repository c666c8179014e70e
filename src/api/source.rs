use std::fmt;

use async_trait::async_trait;
use serde_json::Value;

/// The only error text the user ever sees, whatever went wrong.
pub const USER_ERROR_MESSAGE: &str = "There was an error fetching the data.";

/// Errors that can occur while fetching a playlist.
/// The UI collapses all of them into [`USER_ERROR_MESSAGE`]; the variants
/// exist so the log can tell them apart.
#[derive(Debug)]
pub enum FetchError {
    /// Transport failure (DNS, connection refused, TLS, body read).
    Network(String),
    /// The endpoint answered with a non-2xx status.
    Status { status: u16, body: String },
    /// 2xx response whose body is not valid JSON.
    Parse(String),
    /// The access token could not be obtained.
    Auth(String),
    /// 2xx response whose JSON body carries an `error` key.
    Upstream(String),
    /// Source misconfigured (missing credentials).
    Config(String),
}

impl FetchError {
    pub fn user_message(&self) -> &'static str {
        USER_ERROR_MESSAGE
    }
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchError::Network(msg) => write!(f, "network error: {msg}"),
            FetchError::Status { status, body } => {
                write!(f, "API error (HTTP {status}): {body}")
            }
            FetchError::Parse(msg) => write!(f, "parse error: {msg}"),
            FetchError::Auth(msg) => write!(f, "token error: {msg}"),
            FetchError::Upstream(msg) => write!(f, "upstream error: {msg}"),
            FetchError::Config(msg) => write!(f, "configuration error: {msg}"),
        }
    }
}

impl std::error::Error for FetchError {}

/// Anything that can resolve a user id into a playlist JSON document.
#[async_trait]
pub trait PlaylistSource: Send + Sync {
    /// Returns the name of the source (used in logs).
    fn name(&self) -> &str;

    /// Fetches the playlist document for `user_id`. The id is passed raw;
    /// encoding is the source's job.
    async fn fetch(&self, user_id: &str) -> Result<Value, FetchError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_variant_has_the_same_user_message() {
        let errors = [
            FetchError::Network("connection refused".to_string()),
            FetchError::Status {
                status: 404,
                body: "not found".to_string(),
            },
            FetchError::Status {
                status: 502,
                body: String::new(),
            },
            FetchError::Parse("expected value at line 1".to_string()),
            FetchError::Auth("invalid_client".to_string()),
            FetchError::Upstream("{\"status\":404}".to_string()),
            FetchError::Config("SPOTIFY_CLIENT_ID is not set".to_string()),
        ];
        for err in &errors {
            assert_eq!(err.user_message(), USER_ERROR_MESSAGE);
        }
    }

    #[test]
    fn test_display_keeps_the_detail() {
        let err = FetchError::Status {
            status: 500,
            body: "boom".to_string(),
        };
        assert_eq!(err.to_string(), "API error (HTTP 500): boom");
        assert_eq!(
            FetchError::Network("dns".to_string()).to_string(),
            "network error: dns"
        );
    }
}
