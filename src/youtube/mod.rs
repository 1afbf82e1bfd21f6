//! YouTube Music search and audio download.
//!
//! - [`YtMusicSearch`] finds song candidates for a text query.
//! - [`YtDlp`] fetches the best audio stream of a video id with `yt-dlp`.

mod download;
mod search;

pub use download::{YtDlp, printed_path};
pub use search::YtMusicSearch;

pub(crate) use download::exit_code;
