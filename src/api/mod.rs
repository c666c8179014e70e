pub mod client;
pub mod source;
pub mod spotify;

use std::sync::Arc;

use crate::SourceKind;
use crate::core::config::ResolvedConfig;

pub use client::{DEFAULT_ENDPOINT, PlaylistClient, encode_user_id, request_url};
pub use source::{FetchError, PlaylistSource, USER_ERROR_MESSAGE};
pub use spotify::{DEFAULT_API_BASE, DEFAULT_TOKEN_URL, SpotifySource, playlists_url};

/// Build the playlist source a resolved config asks for.
///
/// The Spotify source needs both credentials; a missing one is a
/// `FetchError::Config`.
pub fn build_source(config: &ResolvedConfig) -> Result<Arc<dyn PlaylistSource>, FetchError> {
    match config.source {
        SourceKind::Proxy => Ok(Arc::new(PlaylistClient::new(Some(config.endpoint.clone())))),
        SourceKind::Spotify => {
            let client_id = config.spotify_client_id.clone().ok_or_else(|| {
                FetchError::Config(
                    "Spotify client id must be set (config file or SPOTIFY_CLIENT_ID)".to_string(),
                )
            })?;
            let client_secret = config.spotify_client_secret.clone().ok_or_else(|| {
                FetchError::Config(
                    "Spotify client secret must be set (config file or SPOTIFY_CLIENT_SECRET)"
                        .to_string(),
                )
            })?;
            Ok(Arc::new(SpotifySource::new(
                client_id,
                client_secret,
                Some(config.spotify_token_url.clone()),
                Some(config.spotify_api_base.clone()),
            )))
        }
    }
}
