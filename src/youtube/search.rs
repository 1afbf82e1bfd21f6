use rustypipe::client::RustyPipe;

use crate::{download::TrackSearch, error::SearchError, types::SearchCandidate};

/// YouTube Music song search.
///
/// Uses the songs filter, so videos, albums and playlists never show up as
/// candidates.
pub struct YtMusicSearch {
    client: RustyPipe,
}

impl YtMusicSearch {
    pub fn new() -> Self {
        Self {
            client: RustyPipe::new(),
        }
    }
}

impl Default for YtMusicSearch {
    fn default() -> Self {
        Self::new()
    }
}

impl TrackSearch for YtMusicSearch {
    async fn search(&self, query: &str) -> Result<Vec<SearchCandidate>, SearchError> {
        let results = self
            .client
            .query()
            .music_search_tracks(query)
            .await
            .map_err(|e| SearchError::Transport(e.to_string()))?;

        Ok(results
            .items
            .items
            .into_iter()
            .map(|item| SearchCandidate { id: item.id })
            .collect())
    }
}
