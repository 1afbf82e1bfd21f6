//! Spotify Playlist Downloader Library
//!
//! This library authenticates against the Spotify Web API, lists the user's
//! playlists and, for every selected track, finds the matching song on YouTube
//! Music, downloads it, converts it to MP3 and files it under
//! `<download root>/<artist>/<title>.mp3`.
//!
//! # Modules
//!
//! - `api` - HTTP handlers for the local OAuth callback listener
//! - `cli` - Interactive shell: playlist menu, selection prompt and report
//! - `config` - Configuration management and environment variables
//! - `download` - Capability traits, track resolver, orchestrator, placement and summary
//! - `error` - Error taxonomy shared by all components
//! - `management` - Token cache management
//! - `media` - ffmpeg based audio conversion
//! - `server` - Local HTTP server for OAuth callbacks
//! - `spotify` - Spotify Web API client (authorization, playlists)
//! - `types` - Data structures and type definitions
//! - `utils` - Selection parsing, name sanitizing and other helpers
//! - `youtube` - YouTube Music search and yt-dlp download
//!
//! # Example
//!
//! ```
//! use spyt::{config, spotify};
//!
//! #[tokio::main]
//! async fn main() -> spyt::Res<()> {
//!     config::load_env().await?;
//!     // Authorize and list playlists...
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod cli;
pub mod config;
pub mod download;
pub mod error;
pub mod management;
pub mod media;
pub mod server;
pub mod spotify;
pub mod types;
pub mod utils;
pub mod youtube;

/// A convenient Result type alias for top-level glue code.
///
/// Component boundaries use the typed errors from [`error`]; this alias is
/// used where several of them meet and only a message is needed.
pub type Res<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Prints an informational message with a blue bullet point.
///
/// # Example
///
/// ```
/// info!("Opening browser for Spotify authentication...");
/// info!("Found {} playlists", count);
/// ```
#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "o".blue().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a success message with a green checkmark.
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "✓".green().bold(), std::format_args!($($arg)*));
  })
}

/// Prints an error message with a red exclamation mark and exits the program.
///
/// Only the binary's startup path uses this macro; library code returns
/// typed errors instead.
///
/// # Behavior
///
/// Terminates the process with exit status 1 after printing.
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".red().bold(), std::format_args!($($arg)*));
    std::process::exit(1);
  })
}

/// Prints a warning message with a yellow exclamation mark.
///
/// Used for recoverable issues, such as a track that could not be found or a
/// token cache that could not be written.
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}
