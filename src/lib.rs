//! playlist-lookup library exports for testing

use clap::ValueEnum;

pub mod api;
pub mod core;
pub mod headless;
pub mod tui;

#[cfg(test)]
pub mod test_support;

/// Where lookups go.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum SourceKind {
    /// The hosted user-playlist endpoint (`?userId=...`).
    #[default]
    Proxy,
    /// The Spotify Web API directly, with client credentials.
    Spotify,
}
