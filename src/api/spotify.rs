//! Direct Spotify Web API source.
//!
//! Does what the hosted Lambda proxy does, from the local machine:
//!
//! 1. POST `grant_type=client_credentials` to the accounts service with the
//!    client id/secret as HTTP Basic auth, yielding a bearer token.
//! 2. GET `<api_base>/users/<percent-encoded id>/playlists` with that token.
//!
//! The token is reused until shortly before it expires. A 401 from the API
//! drops it so the next lookup fetches a fresh one.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use log::{debug, info, warn};
use serde::Deserialize;
use serde_json::Value;
use tokio::sync::Mutex;

use super::client::{encode_user_id, ensure_success, read_json};
use super::source::{FetchError, PlaylistSource};

pub const DEFAULT_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";
pub const DEFAULT_API_BASE: &str = "https://api.spotify.com/v1";

/// Refresh this long before the advertised expiry.
const EXPIRY_MARGIN: Duration = Duration::from_secs(30);

/// Builds the playlists URL for `user_id` under `api_base`.
///
/// # Example
/// ```
/// use playlist_lookup::api::playlists_url;
/// let url = playlists_url("https://api.spotify.com/v1/", "a b&c");
/// assert_eq!(url, "https://api.spotify.com/v1/users/a%20b%26c/playlists");
/// ```
pub fn playlists_url(api_base: &str, user_id: &str) -> String {
    format!(
        "{}/users/{}/playlists",
        api_base.trim_end_matches('/'),
        encode_user_id(user_id)
    )
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<u64>,
}

struct CachedToken {
    value: String,
    expires_at: Instant,
}

/// Playlist source that talks to the Spotify Web API itself.
pub struct SpotifySource {
    client_id: String,
    client_secret: String,
    token_url: String,
    api_base: String,
    client: reqwest::Client,
    token: Mutex<Option<CachedToken>>,
}

impl SpotifySource {
    /// Creates a new source.
    ///
    /// # Arguments
    /// * `client_id`, `client_secret` - Spotify app credentials
    /// * `token_url` - Optional accounts endpoint (defaults to [`DEFAULT_TOKEN_URL`])
    /// * `api_base` - Optional Web API base (defaults to [`DEFAULT_API_BASE`])
    pub fn new(
        client_id: String,
        client_secret: String,
        token_url: Option<String>,
        api_base: Option<String>,
    ) -> Self {
        Self {
            client_id,
            client_secret,
            token_url: token_url.unwrap_or_else(|| DEFAULT_TOKEN_URL.to_string()),
            api_base: api_base.unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
            client: reqwest::Client::new(),
            token: Mutex::new(None),
        }
    }

    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    /// Returns a valid bearer token, requesting a new one when needed.
    async fn access_token(&self) -> Result<String, FetchError> {
        let mut cached = self.token.lock().await;
        if let Some(token) = cached.as_ref()
            && Instant::now() < token.expires_at
        {
            return Ok(token.value.clone());
        }

        let token = self.request_token().await?;
        let value = token.access_token.clone();
        match token.expires_in {
            Some(secs) => {
                let lifetime = Duration::from_secs(secs).saturating_sub(EXPIRY_MARGIN);
                *cached = Some(CachedToken {
                    value: token.access_token,
                    expires_at: Instant::now() + lifetime,
                });
            }
            None => *cached = None,
        }
        Ok(value)
    }

    async fn request_token(&self) -> Result<TokenResponse, FetchError> {
        info!("POST {} (client credentials)", self.token_url);
        let response = self
            .client
            .post(&self.token_url)
            .basic_auth(&self.client_id, Some(&self.client_secret))
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))?;

        let response = ensure_success(response, "Spotify token")
            .await
            .map_err(|e| FetchError::Auth(e.to_string()))?;
        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| FetchError::Auth(format!("unreadable token response: {e}")))?;
        debug!("Got Spotify token, expires in {:?}s", token.expires_in);
        Ok(token)
    }
}

#[async_trait]
impl PlaylistSource for SpotifySource {
    fn name(&self) -> &str {
        "spotify"
    }

    async fn fetch(&self, user_id: &str) -> Result<Value, FetchError> {
        let token = self.access_token().await?;
        let url = playlists_url(&self.api_base, user_id);
        info!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .bearer_auth(&token)
            .send()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))?;

        let response = match ensure_success(response, "Spotify").await {
            Ok(response) => response,
            Err(e) => {
                if matches!(e, FetchError::Status { status: 401, .. }) {
                    *self.token.lock().await = None;
                }
                return Err(e);
            }
        };

        let payload = read_json(response, "Spotify").await?;
        // A 200 can still carry an error document
        if let Some(error) = payload.get("error") {
            warn!("Spotify returned an error body: {}", error);
            return Err(FetchError::Upstream(error.to_string()));
        }
        Ok(payload)
    }
}
