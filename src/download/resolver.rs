use crate::{
    download::TrackSearch,
    error::SearchError,
    types::{ResolutionResult, Track},
};

/// Maps a track to a candidate on the video service.
///
/// The first candidate returned by the search wins. There is no ranking,
/// similarity threshold or duration check, so a wrong first hit is
/// downloaded as is.
pub struct Resolver<S> {
    search: S,
}

impl<S: TrackSearch> Resolver<S> {
    pub fn new(search: S) -> Self {
        Self { search }
    }

    /// Search query for `track`: title followed by the primary artist.
    pub fn query_for(track: &Track) -> String {
        format!("{} {}", track.title, track.primary_artist())
    }

    pub async fn resolve(&self, track: &Track) -> Result<ResolutionResult, SearchError> {
        let candidates = self.search.search(&Self::query_for(track)).await?;

        Ok(match candidates.into_iter().next() {
            Some(candidate) => ResolutionResult::Found {
                external_id: candidate.id,
            },
            None => ResolutionResult::NotFound,
        })
    }
}
