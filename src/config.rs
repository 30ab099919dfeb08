//! Configuration management for the now-playing visualizer.
//!
//! This module handles loading and accessing configuration values from
//! environment variables and `.env` files. It provides a centralized way to
//! manage application configuration including Spotify API credentials, the
//! local callback server address, and polling parameters.
//!
//! The configuration system follows a hierarchical approach:
//! 1. Environment variables (highest priority)
//! 2. `.env` file in the local data directory
//! 3. Application defaults (where applicable)

use dotenv;
use std::{env, path::PathBuf, time::Duration};

/// Default OAuth scopes: read-only access to the user's playback state.
const DEFAULT_SCOPE: &str = "user-read-currently-playing user-read-playback-state";

/// Default playback polling interval in milliseconds.
const DEFAULT_POLL_INTERVAL_MS: u64 = 3000;

/// Lower bound for the polling interval; shorter intervals hammer the API
/// without the progress display getting any smoother.
const MIN_POLL_INTERVAL_MS: u64 = 1500;

/// Loads environment variables from a `.env` file in the local data directory.
///
/// Creates the necessary directory structure if it doesn't exist and loads
/// environment variables from a `.env` file located in the platform-specific
/// local data directory under `sponowcli/.env`. This allows users to store
/// configuration securely without hardcoding sensitive values.
///
/// # Directory Structure
///
/// The function looks for the `.env` file in:
/// - Linux: `~/.local/share/sponowcli/.env`
/// - macOS: `~/Library/Application Support/sponowcli/.env`
/// - Windows: `%LOCALAPPDATA%/sponowcli/.env`
///
/// A missing `.env` file is not an error; configuration may come entirely
/// from process environment variables.
///
/// # Returns
///
/// Returns `Ok(())` if the environment is ready, or an error string if the
/// directory structure could not be created.
pub async fn load_env() -> Result<(), String> {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("sponowcli/.env");
    if let Some(parent) = path.parent() {
        async_fs::create_dir_all(parent)
            .await
            .map_err(|e| e.to_string())?;
    }

    let _ = dotenv::from_path(path);
    Ok(())
}

/// Returns the address for the local OAuth callback server.
///
/// Reads the `SERVER_ADDRESS` environment variable, falling back to
/// `127.0.0.1:8080`. The port must match the redirect URI registered with
/// the Spotify application.
pub fn server_addr() -> String {
    env::var("SERVER_ADDRESS").unwrap_or_else(|_| "127.0.0.1:8080".to_string())
}

/// Returns the Spotify API client ID for authentication.
///
/// Retrieves the `SPOTIFY_API_AUTH_CLIENT_ID` environment variable which
/// contains the client ID obtained when registering the application with
/// Spotify's developer platform.
///
/// # Panics
///
/// Panics if the `SPOTIFY_API_AUTH_CLIENT_ID` environment variable is not set.
pub fn spotify_client_id() -> String {
    env::var("SPOTIFY_API_AUTH_CLIENT_ID").expect("SPOTIFY_API_AUTH_CLIENT_ID must be set")
}

/// Returns the Spotify OAuth redirect URI.
///
/// Reads the `SPOTIFY_API_REDIRECT_URI` environment variable, falling back
/// to the local callback server's `/callback` route. This must match the
/// redirect URI registered in the Spotify application settings exactly,
/// both at the authorize and the token-exchange step.
pub fn spotify_redirect_uri() -> String {
    env::var("SPOTIFY_API_REDIRECT_URI")
        .unwrap_or_else(|_| "http://127.0.0.1:8080/callback".to_string())
}

/// Returns the space-joined OAuth scope list.
///
/// Reads the `SPOTIFY_API_AUTH_SCOPE` environment variable, falling back to
/// the read-only playback scopes this application needs.
pub fn spotify_scope() -> String {
    env::var("SPOTIFY_API_AUTH_SCOPE").unwrap_or_else(|_| DEFAULT_SCOPE.to_string())
}

/// Returns the Spotify OAuth authorization URL.
///
/// Reads the `SPOTIFY_API_AUTH_URL` environment variable, falling back to
/// the public accounts endpoint.
pub fn spotify_apiauth_url() -> String {
    env::var("SPOTIFY_API_AUTH_URL")
        .unwrap_or_else(|_| "https://accounts.spotify.com/authorize".to_string())
}

/// Returns the Spotify OAuth token exchange URL.
///
/// Reads the `SPOTIFY_API_TOKEN_URL` environment variable, falling back to
/// the public accounts endpoint. Used in the final step of authentication
/// when exchanging an authorization code for an access token.
pub fn spotify_apitoken_url() -> String {
    env::var("SPOTIFY_API_TOKEN_URL")
        .unwrap_or_else(|_| "https://accounts.spotify.com/api/token".to_string())
}

/// Returns the Spotify Web API base URL.
///
/// Reads the `SPOTIFY_API_URL` environment variable, falling back to the
/// public v1 endpoint. This is used for all API operations after
/// authentication.
pub fn spotify_apiurl() -> String {
    env::var("SPOTIFY_API_URL").unwrap_or_else(|_| "https://api.spotify.com/v1".to_string())
}

/// Returns the playback polling interval.
///
/// Reads the `SPONOW_POLL_INTERVAL_MS` environment variable, falling back
/// to 3000 ms. Values below 1500 ms are clamped up.
pub fn poll_interval() -> Duration {
    let ms = env::var("SPONOW_POLL_INTERVAL_MS")
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(DEFAULT_POLL_INTERVAL_MS);
    Duration::from_millis(ms.max(MIN_POLL_INTERVAL_MS))
}
