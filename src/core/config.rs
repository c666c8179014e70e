//! # Configuration
//!
//! Centralizes all settings with a clear override hierarchy:
//! defaults → config file → env vars → CLI flags.
//!
//! Config lives at `~/.playlist-lookup/config.toml`. If missing on first run,
//! a commented-out default is generated so users can discover all options.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use simplelog::LevelFilter;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use clap::ValueEnum;

use crate::SourceKind;
use crate::api::{DEFAULT_API_BASE, DEFAULT_ENDPOINT, DEFAULT_TOKEN_URL};

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct LookupConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub spotify: SpotifyConfig,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct GeneralConfig {
    pub log_file: Option<String>,
    pub log_level: Option<String>,
    /// Prefilled into the input box on startup.
    pub user_id: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct ApiConfig {
    pub endpoint: Option<String>,
    /// "proxy" or "spotify"
    pub source: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct SpotifyConfig {
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub token_url: Option<String>,
    pub api_base: Option<String>,
}

// ============================================================================
// Defaults
// ============================================================================

pub const DEFAULT_LOG_FILE: &str = "playlist-lookup.log";
pub const DEFAULT_LOG_LEVEL: LevelFilter = LevelFilter::Debug;

// ============================================================================
// Resolved Config (concrete values, no Options)
// ============================================================================

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub source: SourceKind,
    pub endpoint: String,
    pub log_file: PathBuf,
    pub log_level: LevelFilter,
    pub user_id: Option<String>,
    pub spotify_client_id: Option<String>,
    pub spotify_client_secret: Option<String>,
    pub spotify_token_url: String,
    pub spotify_api_base: String,
}

impl ResolvedConfig {
    /// The URL lookups are sent to, for display.
    pub fn target(&self) -> &str {
        match self.source {
            SourceKind::Proxy => &self.endpoint,
            SourceKind::Spotify => &self.spotify_api_base,
        }
    }
}

/// Values given on the command line. `None` = not specified.
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    pub source: Option<SourceKind>,
    pub endpoint: Option<String>,
    pub log_file: Option<PathBuf>,
    pub user_id: Option<String>,
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "config I/O error: {e}"),
            ConfigError::Parse(e) => write!(f, "config parse error: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Loading
// ============================================================================

/// Returns the path to `~/.playlist-lookup/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".playlist-lookup").join("config.toml"))
}

/// Load config from `~/.playlist-lookup/config.toml`.
///
/// If the file doesn't exist, generates a commented-out default and
/// returns `LookupConfig::default()`. If it exists but is malformed,
/// returns `ConfigError::Parse`.
pub fn load_config() -> Result<LookupConfig, ConfigError> {
    let path = match config_path() {
        Some(p) => p,
        None => {
            warn!("Could not determine home directory, using default config");
            return Ok(LookupConfig::default());
        }
    };

    if !path.exists() {
        info!("No config file found, generating default at {}", path.display());
        generate_default_config(&path);
        return Ok(LookupConfig::default());
    }

    load_config_from(&path)
}

/// Parse the config file at `path`.
pub fn load_config_from(path: &Path) -> Result<LookupConfig, ConfigError> {
    let contents = fs::read_to_string(path).map_err(ConfigError::Io)?;
    let config: LookupConfig = toml::from_str(&contents).map_err(ConfigError::Parse)?;
    info!("Loaded config from {}", path.display());
    debug!("Config: {:?}", config);
    Ok(config)
}

/// Generates a commented-out default config file at the given path.
fn generate_default_config(path: &Path) {
    let default_content = r#"# playlist-lookup configuration
# All settings are optional. Defaults are used for anything not specified.
# Override hierarchy: defaults → this file → env vars → CLI flags.

# [general]
# log_file = "playlist-lookup.log"   # Relative to the working directory
# log_level = "debug"                # "off", "error", "warn", "info", "debug", "trace"
# user_id = "spotify"                # Prefilled into the input box

# [api]
# source = "proxy"                   # "proxy" or "spotify". Or set PLAYLIST_SOURCE
# endpoint = "https://wz3soxp4h1.execute-api.us-east-1.amazonaws.com/dev/user-playlist"
#                                    # Or set PLAYLIST_API_ENDPOINT env var

# [spotify]                          # Used when source = "spotify"
# client_id = "..."                  # Or set SPOTIFY_CLIENT_ID env var
# client_secret = "..."              # Or set SPOTIFY_CLIENT_SECRET env var
# token_url = "https://accounts.spotify.com/api/token"
# api_base = "https://api.spotify.com/v1"
"#;

    if let Some(parent) = path.parent() {
        if let Err(e) = fs::create_dir_all(parent) {
            warn!("Failed to create config directory: {}", e);
            return;
        }
    }
    if let Err(e) = fs::write(path, default_content) {
        warn!("Failed to write default config: {}", e);
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Resolve the final config by collapsing: defaults → config file → env vars → CLI.
pub fn resolve(config: &LookupConfig, cli: &CliOverrides) -> ResolvedConfig {
    resolve_with_env(config, cli, |key| std::env::var(key).ok())
}

/// Same as [`resolve`] with an injectable environment lookup.
pub fn resolve_with_env(
    config: &LookupConfig,
    cli: &CliOverrides,
    env: impl Fn(&str) -> Option<String>,
) -> ResolvedConfig {
    // Source: CLI → env → config → default. Unknown names fall back to the default.
    let source = cli
        .source
        .or_else(|| {
            env("PLAYLIST_SOURCE")
                .or_else(|| config.api.source.clone())
                .and_then(|name| parse_source(&name))
        })
        .unwrap_or_default();

    // Endpoint: CLI → env → config → default
    let endpoint = cli
        .endpoint
        .clone()
        .or_else(|| env("PLAYLIST_API_ENDPOINT"))
        .or_else(|| config.api.endpoint.clone())
        .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());

    // Log file: CLI → config → default
    let log_file = cli
        .log_file
        .clone()
        .or_else(|| config.general.log_file.as_ref().map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_FILE));

    // Log level: env → config → default. Unknown names fall back to the default.
    let log_level = env("PLAYLIST_LOG_LEVEL")
        .or_else(|| config.general.log_level.clone())
        .and_then(|name| parse_level(&name))
        .unwrap_or(DEFAULT_LOG_LEVEL);

    let user_id = cli.user_id.clone().or_else(|| config.general.user_id.clone());

    // Spotify credentials: env (including .env) → config
    let spotify_client_id =
        env("SPOTIFY_CLIENT_ID").or_else(|| config.spotify.client_id.clone());
    let spotify_client_secret =
        env("SPOTIFY_CLIENT_SECRET").or_else(|| config.spotify.client_secret.clone());
    let spotify_token_url = config
        .spotify
        .token_url
        .clone()
        .unwrap_or_else(|| DEFAULT_TOKEN_URL.to_string());
    let spotify_api_base = config
        .spotify
        .api_base
        .clone()
        .unwrap_or_else(|| DEFAULT_API_BASE.to_string());

    ResolvedConfig {
        source,
        endpoint,
        log_file,
        log_level,
        user_id,
        spotify_client_id,
        spotify_client_secret,
        spotify_token_url,
        spotify_api_base,
    }
}

fn parse_source(name: &str) -> Option<SourceKind> {
    match SourceKind::from_str(name.trim(), true) {
        Ok(kind) => Some(kind),
        Err(_) => {
            warn!("Unknown source {:?}, using the default", name);
            None
        }
    }
}

fn parse_level(name: &str) -> Option<LevelFilter> {
    match name.trim().to_ascii_lowercase().as_str() {
        "off" => Some(LevelFilter::Off),
        "error" => Some(LevelFilter::Error),
        "warn" => Some(LevelFilter::Warn),
        "info" => Some(LevelFilter::Info),
        "debug" => Some(LevelFilter::Debug),
        "trace" => Some(LevelFilter::Trace),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn test_default_config_parses() {
        let config = LookupConfig::default();
        assert!(config.api.endpoint.is_none());
        assert!(config.general.user_id.is_none());
    }

    #[test]
    fn test_resolve_uses_defaults_when_empty() {
        let resolved = resolve_with_env(&LookupConfig::default(), &CliOverrides::default(), no_env);
        assert_eq!(resolved.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(resolved.log_file, PathBuf::from(DEFAULT_LOG_FILE));
        assert_eq!(resolved.log_level, DEFAULT_LOG_LEVEL);
        assert!(resolved.user_id.is_none());
        assert_eq!(resolved.source, SourceKind::Proxy);
        assert_eq!(resolved.target(), DEFAULT_ENDPOINT);
        assert_eq!(resolved.spotify_api_base, DEFAULT_API_BASE);
    }

    #[test]
    fn test_resolve_config_values_override_defaults() {
        let config = LookupConfig {
            general: GeneralConfig {
                log_file: Some("lookup.log".to_string()),
                log_level: Some("warn".to_string()),
                user_id: Some("spotify".to_string()),
            },
            api: ApiConfig {
                endpoint: Some("http://localhost:3000/user-playlist".to_string()),
                source: Some("Spotify".to_string()),
            },
            spotify: SpotifyConfig {
                client_id: Some("id-from-config".to_string()),
                api_base: Some("http://localhost:3001/v1".to_string()),
                ..Default::default()
            },
        };
        let resolved = resolve_with_env(&config, &CliOverrides::default(), no_env);
        assert_eq!(resolved.endpoint, "http://localhost:3000/user-playlist");
        assert_eq!(resolved.log_file, PathBuf::from("lookup.log"));
        assert_eq!(resolved.log_level, LevelFilter::Warn);
        assert_eq!(resolved.user_id.as_deref(), Some("spotify"));
        assert_eq!(resolved.source, SourceKind::Spotify);
        assert_eq!(resolved.spotify_client_id.as_deref(), Some("id-from-config"));
        assert!(resolved.spotify_client_secret.is_none());
        assert_eq!(resolved.spotify_token_url, DEFAULT_TOKEN_URL);
        assert_eq!(resolved.target(), "http://localhost:3001/v1");
    }

    #[test]
    fn test_env_beats_config_and_cli_beats_env() {
        let config = LookupConfig {
            api: ApiConfig {
                endpoint: Some("http://from-config".to_string()),
                ..Default::default()
            },
            ..Default::default()
        };
        let env = |key: &str| match key {
            "PLAYLIST_API_ENDPOINT" => Some("http://from-env".to_string()),
            "PLAYLIST_LOG_LEVEL" => Some("INFO".to_string()),
            _ => None,
        };

        let resolved = resolve_with_env(&config, &CliOverrides::default(), env);
        assert_eq!(resolved.endpoint, "http://from-env");
        assert_eq!(resolved.log_level, LevelFilter::Info);

        let cli = CliOverrides {
            endpoint: Some("http://from-cli".to_string()),
            ..Default::default()
        };
        let resolved = resolve_with_env(&config, &cli, env);
        assert_eq!(resolved.endpoint, "http://from-cli");
    }

    #[test]
    fn test_source_selection_order() {
        let config = LookupConfig {
            api: ApiConfig {
                source: Some("spotify".to_string()),
                ..Default::default()
            },
            ..Default::default()
        };
        let resolved = resolve_with_env(&config, &CliOverrides::default(), no_env);
        assert_eq!(resolved.source, SourceKind::Spotify);

        let env = |key: &str| match key {
            "PLAYLIST_SOURCE" => Some("proxy".to_string()),
            "SPOTIFY_CLIENT_ID" => Some("id-from-env".to_string()),
            "SPOTIFY_CLIENT_SECRET" => Some("secret-from-env".to_string()),
            _ => None,
        };
        let resolved = resolve_with_env(&config, &CliOverrides::default(), env);
        assert_eq!(resolved.source, SourceKind::Proxy);
        assert_eq!(resolved.spotify_client_id.as_deref(), Some("id-from-env"));
        assert_eq!(resolved.spotify_client_secret.as_deref(), Some("secret-from-env"));

        let cli = CliOverrides {
            source: Some(SourceKind::Spotify),
            ..Default::default()
        };
        let resolved = resolve_with_env(&config, &cli, env);
        assert_eq!(resolved.source, SourceKind::Spotify);
    }

    #[test]
    fn test_unknown_source_falls_back() {
        let env = |key: &str| (key == "PLAYLIST_SOURCE").then(|| "lambda".to_string());
        let resolved = resolve_with_env(&LookupConfig::default(), &CliOverrides::default(), env);
        assert_eq!(resolved.source, SourceKind::Proxy);
    }

    #[test]
    fn test_unknown_log_level_falls_back() {
        let config = LookupConfig {
            general: GeneralConfig {
                log_level: Some("chatty".to_string()),
                ..Default::default()
            },
            ..Default::default()
        };
        let resolved = resolve_with_env(&config, &CliOverrides::default(), no_env);
        assert_eq!(resolved.log_level, DEFAULT_LOG_LEVEL);
    }

    #[test]
    fn test_toml_parses() {
        let toml_str = r#"
[general]
log_file = "/tmp/lookup.log"
log_level = "trace"
user_id = "bob"

[api]
endpoint = "http://127.0.0.1:8080/dev/user-playlist"
source = "spotify"

[spotify]
client_id = "abc"
client_secret = "xyz"
"#;
        let config: LookupConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.general.log_file.as_deref(), Some("/tmp/lookup.log"));
        assert_eq!(config.general.user_id.as_deref(), Some("bob"));
        assert_eq!(
            config.api.endpoint.as_deref(),
            Some("http://127.0.0.1:8080/dev/user-playlist")
        );
        assert_eq!(config.api.source.as_deref(), Some("spotify"));
        assert_eq!(config.spotify.client_secret.as_deref(), Some("xyz"));
        assert!(config.spotify.api_base.is_none());
    }

    #[test]
    fn test_sparse_toml_parses() {
        // Only override one thing; everything else stays default
        let toml_str = r#"
[api]
endpoint = "http://localhost/x"
"#;
        let config: LookupConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.api.endpoint.as_deref(), Some("http://localhost/x"));
        assert!(config.general.log_file.is_none());
        assert!(config.general.user_id.is_none());
    }

    #[test]
    fn test_malformed_file_is_parse_error() {
        let path = std::env::temp_dir().join(format!(
            "playlist-lookup-bad-config-{}.toml",
            std::process::id()
        ));
        fs::write(&path, "[api\nendpoint = ").unwrap();
        let result = load_config_from(&path);
        let _ = fs::remove_file(&path);
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let path = std::env::temp_dir().join("playlist-lookup-does-not-exist/config.toml");
        assert!(matches!(load_config_from(&path), Err(ConfigError::Io(_))));
    }
}
