//! # Download Pipeline
//!
//! Turns selected playlists into files on disk. Every external system sits
//! behind one of four capability traits so the pipeline can run against the
//! real services or against in-memory fakes:
//!
//! | Trait              | Real implementation                         |
//! |--------------------|---------------------------------------------|
//! | [`PlaylistSource`] | [`crate::spotify::playlists::SpotifyPlaylists`] |
//! | [`TrackSearch`]    | [`crate::youtube::YtMusicSearch`]           |
//! | [`AudioDownloader`]| [`crate::youtube::YtDlp`]                   |
//! | [`Converter`]      | [`crate::media::Ffmpeg`]                    |
//!
//! ## Per-track states
//!
//! ```text
//! pending → resolved → downloaded → converted → placed      (succeeded)
//! pending → search-failed                                    (batch stops)
//!           resolved → not-found
//!           resolved → download-failed
//!                      downloaded → conversion-failed
//!                                   converted → placement-failed
//! ```
//!
//! A terminal failure ends the work for that track only. The
//! [`Orchestrator`] processes tracks strictly one after another and records
//! exactly one [`crate::types::OutcomeRecord`] per track it resolves.

mod orchestrator;
mod placement;
mod resolver;
mod summary;

use std::path::{Path, PathBuf};

pub use orchestrator::Orchestrator;
pub use placement::{Placement, copy_into_place, ensure_dir, partial_path};
pub use resolver::Resolver;
pub use summary::{StatusCounts, Summary};

use crate::{
    error::{ConversionError, DownloadError, FetchError, SearchError},
    types::{Playlist, SearchCandidate, Track},
};

/// Read access to the user's playlists.
#[allow(async_fn_in_trait)]
pub trait PlaylistSource {
    async fn list_playlists(&self) -> Result<Vec<Playlist>, FetchError>;

    async fn list_tracks(&self, playlist: &Playlist) -> Result<Vec<Track>, FetchError>;
}

/// Song search on the video service.
#[allow(async_fn_in_trait)]
pub trait TrackSearch {
    /// Candidates in the service's own ranking order. An empty list is a
    /// valid answer, errors are transport faults only.
    async fn search(&self, query: &str) -> Result<Vec<SearchCandidate>, SearchError>;
}

#[allow(async_fn_in_trait)]
pub trait AudioDownloader {
    /// Downloads the audio of `external_id` to a temporary file and returns its path.
    ///
    /// The file may or may not already be in `target_format`.
    async fn download_audio(
        &self,
        external_id: &str,
        target_format: &str,
    ) -> Result<PathBuf, DownloadError>;
}

#[allow(async_fn_in_trait)]
pub trait Converter {
    /// Converts `input` to `target_format`, tagging it with the track metadata.
    async fn convert(
        &self,
        input: &Path,
        track: &Track,
        target_format: &str,
    ) -> Result<PathBuf, ConversionError>;
}
