//! Configuration management for spyt.
//!
//! This module handles loading and accessing configuration values from
//! environment variables and `.env` files. Every value has a default that
//! points at the public Spotify endpoints, so a plain run only needs the
//! client credentials.
//!
//! The configuration system follows a hierarchical approach:
//! 1. Environment variables (highest priority)
//! 2. `.env` file in the working directory
//! 3. `.env` file in the local data directory
//! 4. Application defaults

use std::{
    env,
    path::{Path, PathBuf},
};

/// Name of the application directory below the platform data directory.
pub const APP_DIR: &str = "spyt";

/// OAuth scopes requested from Spotify.
pub const SPOTIFY_SCOPE: &str =
    "playlist-read-private playlist-read-collaborative user-library-read";

/// Seconds to wait for the browser to hit the callback URL.
pub const AUTH_TIMEOUT_SECS: u64 = 120;

/// Target format of every placed file.
pub const TARGET_FORMAT: &str = "mp3";

/// Bitrate passed to the MP3 encoder.
pub const TARGET_BITRATE: &str = "320k";

const DEFAULT_API_URL: &str = "https://api.spotify.com/v1";
const DEFAULT_AUTH_URL: &str = "https://accounts.spotify.com/authorize";
const DEFAULT_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";
const DEFAULT_REDIRECT_URI: &str = "http://localhost:8888/callback";

/// Loads environment variables from `.env` files.
///
/// Creates `<local data dir>/spyt/` if needed, then loads `.env` from the
/// working directory and from there. Missing files are not an error; a file
/// that exists but cannot be parsed is.
///
/// # Directory Structure
///
/// - Linux: `~/.local/share/spyt/.env`
/// - macOS: `~/Library/Application Support/spyt/.env`
/// - Windows: `%LOCALAPPDATA%/spyt/.env`
///
/// # Example
///
/// ```
/// use spyt::config;
///
/// #[tokio::main]
/// async fn main() {
///     if let Err(e) = config::load_env().await {
///         eprintln!("Configuration error: {}", e);
///     }
/// }
/// ```
pub async fn load_env() -> Result<(), String> {
    let dir = app_data_dir();
    async_fs::create_dir_all(&dir)
        .await
        .map_err(|e| e.to_string())?;

    // dotenv never overrides variables that are already set, so the working
    // directory file is loaded first to take precedence over the data dir.
    load_env_file(Path::new(".env"))?;
    load_env_file(&dir.join(".env"))
}

fn load_env_file(path: &Path) -> Result<(), String> {
    if !path.is_file() {
        return Ok(());
    }

    dotenv::from_path(path)
        .map(|_| ())
        .map_err(|e| format!("{}: {}", path.display(), e))
}

/// Returns `<local data dir>/spyt`, or `./spyt` when the platform has none.
pub fn app_data_dir() -> PathBuf {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push(APP_DIR);
    path
}

/// Default download root: `<audio dir>/SpotifyDownloads`.
///
/// Falls back to `~/Music/SpotifyDownloads` and finally to `./downloads`
/// when the platform reports neither an audio nor a home directory.
pub fn default_download_dir() -> PathBuf {
    if let Some(audio) = dirs::audio_dir() {
        return audio.join("SpotifyDownloads");
    }

    match dirs::home_dir() {
        Some(home) => home.join("Music").join("SpotifyDownloads"),
        None => PathBuf::from("downloads"),
    }
}

/// Expands a leading `~` to the home directory.
pub fn expand_home(path: &Path) -> PathBuf {
    let Ok(rest) = path.strip_prefix("~") else {
        return path.to_path_buf();
    };

    match dirs::home_dir() {
        Some(home) => home.join(rest),
        None => path.to_path_buf(),
    }
}

/// Spotify Web API base URL (`SPOTIFY_API_URL`).
pub fn spotify_apiurl() -> String {
    env_or("SPOTIFY_API_URL", DEFAULT_API_URL)
}

/// Spotify OAuth authorization endpoint (`SPOTIFY_API_AUTH_URL`).
pub fn spotify_apiauth_url() -> String {
    env_or("SPOTIFY_API_AUTH_URL", DEFAULT_AUTH_URL)
}

/// Spotify OAuth token endpoint (`SPOTIFY_API_TOKEN_URL`).
pub fn spotify_apitoken_url() -> String {
    env_or("SPOTIFY_API_TOKEN_URL", DEFAULT_TOKEN_URL)
}

/// Redirect URI registered for the Spotify application
/// (`SPOTIFY_API_REDIRECT_URI`).
///
/// This must match the redirect URI in the Spotify dashboard exactly.
pub fn spotify_redirect_uri() -> String {
    env_or("SPOTIFY_API_REDIRECT_URI", DEFAULT_REDIRECT_URI)
}

/// Address the callback listener binds to (`SPYT_CALLBACK_ADDRESS`).
///
/// Without an override the listener binds the loopback interface on the
/// port of the redirect URI.
pub fn callback_addr(redirect_port: u16) -> String {
    env::var("SPYT_CALLBACK_ADDRESS").unwrap_or_else(|_| format!("127.0.0.1:{redirect_port}"))
}

/// Executable used to download audio (`YT_DLP_BIN`).
pub fn ytdlp_bin() -> String {
    env_or("YT_DLP_BIN", "yt-dlp")
}

/// Executable used to convert audio (`FFMPEG_BIN`).
pub fn ffmpeg_bin() -> String {
    env_or("FFMPEG_BIN", "ffmpeg")
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}
