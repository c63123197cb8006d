//! Configuration management for Monthlify.
//!
//! Configuration is read once at startup into a [`Config`] value that is
//! passed by reference (or shared through the server state) to every
//! component that needs it. Nothing reads the environment after startup.
//!
//! The configuration system follows a hierarchical approach:
//! 1. Environment variables (highest priority)
//! 2. `.env` file in the local data directory
//! 3. Application defaults (where applicable)

use std::{env, path::PathBuf};

use crate::{Error, Res};

pub const DEFAULT_SERVER_ADDRESS: &str = "127.0.0.1:3000";
pub const DEFAULT_API_URL: &str = "https://api.spotify.com/v1";
pub const DEFAULT_AUTH_URL: &str = "https://accounts.spotify.com/authorize";
pub const DEFAULT_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";
pub const DEFAULT_FRONTEND_ORIGIN: &str = "http://127.0.0.1:3001";
pub const DEFAULT_SCOPE: &str = "user-library-read playlist-read-private playlist-modify-private playlist-modify-public ugc-image-upload";

/// Loads environment variables from a `.env` file in the local data directory.
///
/// Creates the directory structure if it doesn't exist and loads variables
/// from `monthlify/.env` under the platform-specific local data directory.
/// A missing file is not an error: every value can also come straight from
/// the process environment.
///
/// # Directory Structure
///
/// - Linux: `~/.local/share/monthlify/.env`
/// - macOS: `~/Library/Application Support/monthlify/.env`
/// - Windows: `%LOCALAPPDATA%/monthlify/.env`
///
/// # Errors
///
/// Returns an error string if the parent directory cannot be created or the
/// file exists but cannot be parsed.
pub async fn load_env() -> Result<(), String> {
    let path = env_file_path();
    if let Some(parent) = path.parent() {
        async_fs::create_dir_all(parent)
            .await
            .map_err(|e| e.to_string())?;
    }

    if path.is_file() {
        dotenv::from_path(&path).map_err(|e| e.to_string())?;
    }
    Ok(())
}

fn env_file_path() -> PathBuf {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("monthlify/.env");
    path
}

/// Static configuration for the service and the CLI.
#[derive(Debug, Clone)]
pub struct Config {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
    pub server_addr: String,
    pub api_url: String,
    pub auth_url: String,
    pub token_url: String,
    pub scope: String,
    pub frontend_origin: String,
}

impl Config {
    /// Builds the configuration from the current process environment.
    ///
    /// `SPOTIFY_CLIENT_ID`, `SPOTIFY_CLIENT_SECRET` and
    /// `SPOTIFY_REDIRECT_URI` are required; everything else falls back to
    /// the public Spotify endpoints and local defaults.
    pub fn from_env() -> Res<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Res<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| Error::Unexpected(format!("{} must be set", key)))
        };
        let optional = |key: &str, default: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        Ok(Self {
            client_id: required("SPOTIFY_CLIENT_ID")?,
            client_secret: required("SPOTIFY_CLIENT_SECRET")?,
            redirect_uri: required("SPOTIFY_REDIRECT_URI")?,
            server_addr: optional("SERVER_ADDRESS", DEFAULT_SERVER_ADDRESS),
            api_url: optional("SPOTIFY_API_URL", DEFAULT_API_URL)
                .trim_end_matches('/')
                .to_string(),
            auth_url: optional("SPOTIFY_AUTH_URL", DEFAULT_AUTH_URL),
            token_url: optional("SPOTIFY_TOKEN_URL", DEFAULT_TOKEN_URL),
            scope: optional("SPOTIFY_SCOPE", DEFAULT_SCOPE),
            frontend_origin: optional("FRONTEND_ORIGIN", DEFAULT_FRONTEND_ORIGIN),
        })
    }
}
