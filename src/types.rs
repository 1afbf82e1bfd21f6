use std::{fmt, path::PathBuf};

use serde::{Deserialize, Serialize};
use tabled::Tabled;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Token {
    pub access_token: String,
    pub refresh_token: String,
    pub scope: String,
    pub expires_in: u64,
    pub obtained_at: u64,
}

/// What the browser redirect delivered to the callback listener.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthorizationReply {
    Code(String),
    Denied(String),
    StateMismatch,
}

/// Authorization request waiting for its callback.
#[derive(Debug, Clone)]
pub struct PendingAuthorization {
    pub state: String,
    pub reply: Option<AuthorizationReply>,
}

/// Body returned by the token endpoint for both code exchange and refresh.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub scope: Option<String>,
    #[serde(default = "default_expires_in")]
    pub expires_in: u64,
}

fn default_expires_in() -> u64 {
    3600
}

/// One page of a Spotify paging object.
#[derive(Debug, Clone, Deserialize)]
pub struct Page<T> {
    #[serde(default = "Vec::new")]
    pub items: Vec<Option<T>>,
    pub next: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SimplifiedPlaylist {
    pub id: String,
    pub name: String,
    pub owner: PlaylistOwner,
    #[serde(default)]
    pub tracks: Option<PlaylistTracksRef>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlaylistOwner {
    pub id: String,
    #[serde(default)]
    pub display_name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlaylistTracksRef {
    pub total: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlaylistItem {
    #[serde(default)]
    pub track: Option<PlaylistTrack>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlaylistTrack {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub artists: Vec<ArtistRef>,
    #[serde(default)]
    pub album: Option<AlbumRef>,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub is_local: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ArtistRef {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AlbumRef {
    pub name: String,
}

/// A saved playlist of the authorized user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Playlist {
    pub id: String,
    pub name: String,
    pub owner: String,
    pub track_count: u64,
}

impl From<SimplifiedPlaylist> for Playlist {
    fn from(p: SimplifiedPlaylist) -> Self {
        Playlist {
            id: p.id,
            name: p.name,
            owner: p.owner.display_name.unwrap_or(p.owner.id),
            track_count: p.tracks.map(|t| t.total).unwrap_or(0),
        }
    }
}

pub const UNKNOWN_ARTIST: &str = "Unknown Artist";

/// Immutable snapshot of a playlist entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Track {
    pub id: String,
    pub title: String,
    pub artists: Vec<String>,
    pub album: Option<String>,
}

impl Track {
    /// First credited artist; the one used for searching and filing.
    pub fn primary_artist(&self) -> &str {
        self.artists
            .first()
            .map(String::as_str)
            .unwrap_or(UNKNOWN_ARTIST)
    }
}

impl PlaylistTrack {
    /// Only music tracks with a Spotify id convert; episodes and local files do not.
    pub fn into_track(self) -> Option<Track> {
        if self.is_local || self.kind.as_deref().is_some_and(|k| k != "track") {
            return None;
        }

        Some(Track {
            id: self.id?,
            title: self.name,
            artists: self.artists.into_iter().map(|a| a.name).collect(),
            album: self.album.map(|a| a.name).filter(|a| !a.is_empty()),
        })
    }
}

/// One result of a song search, identified by its video id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchCandidate {
    pub id: String,
}

/// Outcome of resolving a track against the search collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolutionResult {
    Found { external_id: String },
    NotFound,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutcomeStatus {
    Succeeded,
    NotFound,
    /// The search service could not be reached; the batch stopped at this track.
    SearchFailed,
    DownloadFailed,
    ConversionFailed,
    PlacementFailed,
}

impl fmt::Display for OutcomeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            OutcomeStatus::Succeeded => "succeeded",
            OutcomeStatus::NotFound => "not-found",
            OutcomeStatus::SearchFailed => "search-failed",
            OutcomeStatus::DownloadFailed => "download-failed",
            OutcomeStatus::ConversionFailed => "conversion-failed",
            OutcomeStatus::PlacementFailed => "placement-failed",
        };
        write!(f, "{}", s)
    }
}

/// Terminal result for one track. Built once, never changed.
#[derive(Debug, Clone)]
pub struct OutcomeRecord {
    playlist: String,
    track: Track,
    status: OutcomeStatus,
    path: Option<PathBuf>,
    detail: Option<String>,
}

impl OutcomeRecord {
    pub fn succeeded(playlist: &str, track: &Track, path: PathBuf) -> Self {
        Self {
            playlist: playlist.to_string(),
            track: track.clone(),
            status: OutcomeStatus::Succeeded,
            path: Some(path),
            detail: None,
        }
    }

    pub fn failed(
        playlist: &str,
        track: &Track,
        status: OutcomeStatus,
        detail: Option<String>,
    ) -> Self {
        Self {
            playlist: playlist.to_string(),
            track: track.clone(),
            status,
            path: None,
            detail,
        }
    }

    pub fn playlist(&self) -> &str {
        &self.playlist
    }

    pub fn track(&self) -> &Track {
        &self.track
    }

    pub fn status(&self) -> OutcomeStatus {
        self.status
    }

    pub fn path(&self) -> Option<&PathBuf> {
        self.path.as_ref()
    }

    pub fn detail(&self) -> Option<&str> {
        self.detail.as_deref()
    }
}

#[derive(Tabled)]
pub struct PlaylistTableRow {
    #[tabled(rename = "#")]
    pub index: usize,
    #[tabled(rename = "Name")]
    pub name: String,
    #[tabled(rename = "Owner")]
    pub owner: String,
    #[tabled(rename = "Tracks")]
    pub tracks: u64,
}

#[derive(Tabled)]
pub struct FailureTableRow {
    #[tabled(rename = "Playlist")]
    pub playlist: String,
    #[tabled(rename = "Artist")]
    pub artist: String,
    #[tabled(rename = "Title")]
    pub title: String,
    #[tabled(rename = "Status")]
    pub status: String,
    #[tabled(rename = "Detail")]
    pub detail: String,
}
