//! Error taxonomy.
//!
//! Startup errors ([`AuthError`], [`FetchError`] while listing playlists,
//! [`FilesystemError`] for the download root) end the program. Per-track
//! errors ([`DownloadError`], [`ConversionError`], [`FilesystemError`] below
//! the root) are turned into outcome records by the orchestrator and never
//! stop the batch. [`SearchError`] only signals a transport fault; an empty
//! search result is a regular not-found outcome.

use std::path::PathBuf;

use reqwest::StatusCode;

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// The user declined the consent screen (or Spotify reported another error).
    #[error("Authorization was denied: {0}")]
    Denied(String),
    #[error("Authorization callback carried an unexpected state value")]
    StateMismatch,
    #[error("No authorization callback received within {0} seconds")]
    TimedOut(u64),
    #[error("Cannot start callback listener on {addr}: {source}")]
    Listener {
        addr: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid redirect URI {0}")]
    RedirectUri(String),
    /// The token endpoint refused the code or refresh token.
    #[error("Token exchange rejected ({status}): {body}")]
    Rejected { status: StatusCode, body: String },
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("Spotify rejected the access token")]
    Unauthorized,
    #[error("Spotify returned {status} for {url}")]
    Status { status: StatusCode, url: String },
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    #[error("Search request failed: {0}")]
    Transport(String),
}

#[derive(Debug, thiserror::Error)]
pub enum DownloadError {
    #[error("Cannot run {tool}: {source}")]
    Spawn {
        tool: String,
        #[source]
        source: std::io::Error,
    },
    #[error("{tool} exited with {code}: {stderr}")]
    Exit {
        tool: String,
        code: String,
        stderr: String,
    },
    #[error("{0} reported no output file")]
    MissingOutput(String),
}

#[derive(Debug, thiserror::Error)]
pub enum ConversionError {
    #[error("Cannot run {tool}: {source}")]
    Spawn {
        tool: String,
        #[source]
        source: std::io::Error,
    },
    #[error("{tool} exited with {code}: {stderr}")]
    Exit {
        tool: String,
        code: String,
        stderr: String,
    },
}

#[derive(Debug, thiserror::Error)]
#[error("{}: {source}", path.display())]
pub struct FilesystemError {
    pub path: PathBuf,
    #[source]
    pub source: std::io::Error,
}

impl FilesystemError {
    pub fn new(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self {
            path: path.into(),
            source,
        }
    }
}
