//! HTTP client for the user-playlist endpoint.
//!
//! One GET per lookup: `<endpoint>?userId=<percent-encoded id>`.
//! Any non-2xx status is a failure; a 2xx body is parsed as JSON.

use async_trait::async_trait;
use log::{debug, info, warn};
use serde_json::Value;

use super::source::{FetchError, PlaylistSource};

pub const DEFAULT_ENDPOINT: &str =
    "https://wz3soxp4h1.execute-api.us-east-1.amazonaws.com/dev/user-playlist";

/// Name of the query parameter that carries the user id.
pub const USER_ID_PARAM: &str = "userId";

/// Percent-encodes a user id for use as a query value.
/// Everything except ASCII alphanumerics and `-_.~` is escaped, so
/// `a b&c` becomes `a%20b%26c`.
pub fn encode_user_id(user_id: &str) -> String {
    urlencoding::encode(user_id).into_owned()
}

/// Builds the full request URL for `user_id`.
///
/// # Example
/// ```
/// use playlist_lookup::api::request_url;
/// let url = request_url("https://example.com/dev/user-playlist", "a b&c");
/// assert_eq!(url, "https://example.com/dev/user-playlist?userId=a%20b%26c");
/// ```
pub fn request_url(endpoint: &str, user_id: &str) -> String {
    let separator = if endpoint.contains('?') { '&' } else { '?' };
    format!(
        "{endpoint}{separator}{USER_ID_PARAM}={}",
        encode_user_id(user_id)
    )
}

/// Playlist source backed by the remote HTTP endpoint.
pub struct PlaylistClient {
    endpoint: String,
    client: reqwest::Client,
}

impl PlaylistClient {
    /// Creates a new client.
    ///
    /// # Arguments
    /// * `endpoint` - Optional endpoint override (defaults to [`DEFAULT_ENDPOINT`])
    pub fn new(endpoint: Option<String>) -> Self {
        Self {
            endpoint: endpoint.unwrap_or_else(|| DEFAULT_ENDPOINT.to_string()),
            client: reqwest::Client::new(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Sends the GET and returns the response if its status is 2xx.
    async fn send_request(&self, url: &str) -> Result<reqwest::Response, FetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))?;

        ensure_success(response, "Playlist").await
    }
}

/// Passes 2xx responses through; anything else becomes `FetchError::Status`
/// carrying the body text.
pub(super) async fn ensure_success(
    response: reqwest::Response,
    label: &str,
) -> Result<reqwest::Response, FetchError> {
    debug!("{} response status: {}", label, response.status());

    if !response.status().is_success() {
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "unknown error".to_string());
        warn!("{} API error: {} - {}", label, status, body);
        return Err(FetchError::Status { status, body });
    }

    Ok(response)
}

/// Reads the whole body, then parses it as JSON.
pub(super) async fn read_json(response: reqwest::Response, label: &str) -> Result<Value, FetchError> {
    // Read the body first so a transport failure mid-body is a Network
    // error rather than a Parse error.
    let body = response
        .text()
        .await
        .map_err(|e| FetchError::Network(e.to_string()))?;
    debug!("{} response body: {} bytes", label, body.len());

    serde_json::from_str(&body).map_err(|e| {
        warn!("{} response is not valid JSON: {}", label, e);
        FetchError::Parse(e.to_string())
    })
}

#[async_trait]
impl PlaylistSource for PlaylistClient {
    fn name(&self) -> &str {
        "http"
    }

    async fn fetch(&self, user_id: &str) -> Result<Value, FetchError> {
        let url = request_url(&self.endpoint, user_id);
        info!("GET {}", url);

        let response = self.send_request(&url).await?;
        read_json(response, "Playlist").await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_user_id_reserved_characters() {
        assert_eq!(encode_user_id("a b&c"), "a%20b%26c");
        assert_eq!(encode_user_id("x=y?z#w"), "x%3Dy%3Fz%23w");
        assert_eq!(encode_user_id("50%/off"), "50%25%2Foff");
    }

    #[test]
    fn test_encode_user_id_leaves_unreserved_alone() {
        assert_eq!(encode_user_id("spotify_user-01.test~"), "spotify_user-01.test~");
    }

    #[test]
    fn test_encode_user_id_utf8() {
        assert_eq!(encode_user_id("é"), "%C3%A9");
    }

    #[test]
    fn test_encode_empty_user_id() {
        assert_eq!(encode_user_id(""), "");
        assert_eq!(
            request_url("http://localhost/user-playlist", ""),
            "http://localhost/user-playlist?userId="
        );
    }

    #[test]
    fn test_request_url_default_endpoint() {
        let url = request_url(DEFAULT_ENDPOINT, "a b&c");
        assert_eq!(
            url,
            "https://wz3soxp4h1.execute-api.us-east-1.amazonaws.com/dev/user-playlist?userId=a%20b%26c"
        );
    }

    #[test]
    fn test_request_url_appends_to_existing_query() {
        let url = request_url("http://localhost/user-playlist?stage=dev", "bob");
        assert_eq!(url, "http://localhost/user-playlist?stage=dev&userId=bob");
    }

    #[test]
    fn test_client_defaults_endpoint() {
        let client = PlaylistClient::new(None);
        assert_eq!(client.endpoint(), DEFAULT_ENDPOINT);
        assert_eq!(client.name(), "http");

        let custom = PlaylistClient::new(Some("http://127.0.0.1:9/x".to_string()));
        assert_eq!(custom.endpoint(), "http://127.0.0.1:9/x");
    }
}
