//! Configuration management for the liked-track checker.
//!
//! This module loads configuration from environment variables and `.env`
//! files and builds a single [`Config`] that is passed by reference to the
//! components that need it. Nothing reads the environment after startup.
//!
//! The configuration system follows a layered approach:
//! 1. Environment variables (highest priority)
//! 2. An explicit `--env-file`, then `./.env`
//! 3. `.env` in the local data directory
//! 4. Application defaults (where applicable)

use std::{
    env,
    net::SocketAddr,
    path::{Path, PathBuf},
};

use log::LevelFilter;

use crate::{LikedError, debug, logging, warning};

pub const APP_DIR: &str = "spotify-liked";
pub const DEFAULT_REDIRECT_URI: &str = "http://localhost:8080/callback";
pub const DEFAULT_SERVER_ADDRESS: &str = "127.0.0.1:8080";
pub const DEFAULT_AUTH_URL: &str = "https://accounts.spotify.com/authorize";
pub const DEFAULT_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";
pub const DEFAULT_API_URL: &str = "https://api.spotify.com/v1";
pub const CREDENTIAL_FILE: &str = ".spotify_auth";

/// Loads environment variables from `.env` files.
///
/// Files are tried in order: `explicit` (from `--env-file`), `./.env`, and
/// `<data_local_dir>/spotify-liked/.env`. Variables that are already set are
/// never overridden, so the real environment always wins over a file, and
/// earlier files win over later ones. Missing files are skipped silently.
pub fn load_env(explicit: Option<&Path>) {
    for path in env_file_candidates(explicit) {
        if !path.is_file() {
            continue;
        }
        match dotenv::from_path(&path) {
            Ok(()) => debug!("Loaded environment from {}", path.display()),
            Err(e) => warning!("Cannot load {}: {}", path.display(), e),
        }
    }
}

fn env_file_candidates(explicit: Option<&Path>) -> Vec<PathBuf> {
    let mut paths = Vec::new();
    if let Some(path) = explicit {
        paths.push(path.to_path_buf());
    }
    paths.push(PathBuf::from(".env"));
    if let Some(mut data_dir) = dirs::data_local_dir() {
        data_dir.push(APP_DIR);
        data_dir.push(".env");
        paths.push(data_dir);
    }
    paths
}

/// Runtime configuration, built once at process entry.
#[derive(Debug, Clone)]
pub struct Config {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
    pub server_addr: SocketAddr,
    pub auth_url: String,
    pub token_url: String,
    pub api_url: String,
    pub credential_path: PathBuf,
    pub open_browser: bool,
    pub log_level: LevelFilter,
}

impl Config {
    /// Builds the configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`LikedError::Config`] if `SPOTIFY_ID` or `SPOTIFY_SECRET` is
    /// missing, or if an optional value cannot be parsed.
    pub fn from_env() -> Result<Self, LikedError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, LikedError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let required = |key: &str| {
            get(key).ok_or_else(|| LikedError::Config(format!("{} must be set", key)))
        };

        let server_addr = get("SERVER_ADDRESS")
            .unwrap_or_else(|| DEFAULT_SERVER_ADDRESS.to_string())
            .parse::<SocketAddr>()
            .map_err(|e| LikedError::Config(format!("invalid SERVER_ADDRESS: {}", e)))?;

        let log_level = match get(logging::LOG_ENV) {
            Some(value) => value.trim().parse::<LevelFilter>().map_err(|e| {
                LikedError::Config(format!("invalid {}: {}", logging::LOG_ENV, e))
            })?,
            None => logging::DEFAULT_LEVEL,
        };

        let credential_path = match get("SPOTIFY_AUTH_FILE") {
            Some(path) => PathBuf::from(path),
            None => default_credential_path(),
        };

        Ok(Config {
            client_id: required("SPOTIFY_ID")?,
            client_secret: required("SPOTIFY_SECRET")?,
            redirect_uri: get("SPOTIFY_REDIRECT_URI")
                .unwrap_or_else(|| DEFAULT_REDIRECT_URI.to_string()),
            server_addr,
            auth_url: get("SPOTIFY_AUTH_URL").unwrap_or_else(|| DEFAULT_AUTH_URL.to_string()),
            token_url: get("SPOTIFY_TOKEN_URL").unwrap_or_else(|| DEFAULT_TOKEN_URL.to_string()),
            api_url: get("SPOTIFY_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            credential_path,
            open_browser: true,
            log_level,
        })
    }
}

/// `$HOME/.spotify_auth`, or `./.spotify_auth` if no home directory is known.
pub fn default_credential_path() -> PathBuf {
    let mut path = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push(CREDENTIAL_FILE);
    path
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn applies_defaults() {
        let config =
            Config::from_lookup(lookup(&[("SPOTIFY_ID", "id"), ("SPOTIFY_SECRET", "secret")]))
                .unwrap();
        assert_eq!(config.client_id, "id");
        assert_eq!(config.redirect_uri, DEFAULT_REDIRECT_URI);
        assert_eq!(config.server_addr.port(), 8080);
        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert!(config.credential_path.ends_with(CREDENTIAL_FILE));
        assert!(config.open_browser);
        assert_eq!(config.log_level, LevelFilter::Warn);
    }

    #[test]
    fn requires_client_credentials() {
        let err = Config::from_lookup(lookup(&[("SPOTIFY_ID", "id")])).unwrap_err();
        assert!(err.to_string().contains("SPOTIFY_SECRET"));

        let blank = Config::from_lookup(lookup(&[("SPOTIFY_ID", " "), ("SPOTIFY_SECRET", "s")]))
            .unwrap_err();
        assert!(blank.to_string().contains("SPOTIFY_ID"));
    }

    #[test]
    fn reads_overrides() {
        let config = Config::from_lookup(lookup(&[
            ("SPOTIFY_ID", "id"),
            ("SPOTIFY_SECRET", "secret"),
            ("SERVER_ADDRESS", "127.0.0.1:9999"),
            ("SPOTIFY_AUTH_FILE", "/tmp/auth.json"),
            ("SPOTIFY_LIKED_LOG", "debug"),
        ]))
        .unwrap();
        assert_eq!(config.server_addr.port(), 9999);
        assert_eq!(config.credential_path, PathBuf::from("/tmp/auth.json"));
        assert_eq!(config.log_level, LevelFilter::Debug);
    }

    #[test]
    fn rejects_bad_server_address() {
        let err = Config::from_lookup(lookup(&[
            ("SPOTIFY_ID", "id"),
            ("SPOTIFY_SECRET", "secret"),
            ("SERVER_ADDRESS", ":8080"),
        ]))
        .unwrap_err();
        assert!(matches!(err, LikedError::Config(_)));
    }

    #[test]
    fn rejects_unknown_log_level() {
        let err = Config::from_lookup(lookup(&[
            ("SPOTIFY_ID", "id"),
            ("SPOTIFY_SECRET", "secret"),
            ("SPOTIFY_LIKED_LOG", "loud"),
        ]))
        .unwrap_err();
        assert!(err.to_string().contains("SPOTIFY_LIKED_LOG"));
    }

    #[test]
    fn explicit_env_file_is_tried_first() {
        let candidates = env_file_candidates(Some(Path::new("/etc/liked.env")));
        assert_eq!(candidates[0], PathBuf::from("/etc/liked.env"));
        assert_eq!(candidates[1], PathBuf::from(".env"));
    }
}
