use crate::types::{OutcomeRecord, OutcomeStatus};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatusCounts {
    pub succeeded: usize,
    pub not_found: usize,
    pub search_failed: usize,
    pub download_failed: usize,
    pub conversion_failed: usize,
    pub placement_failed: usize,
}

impl StatusCounts {
    pub fn failed(&self) -> usize {
        self.not_found
            + self.search_failed
            + self.download_failed + self.conversion_failed + self.placement_failed
    }
}

/// Everything a batch run produced, in processing order.
#[derive(Debug, Default)]
pub struct Summary {
    outcomes: Vec<OutcomeRecord>,
    skipped_playlists: Vec<(String, String)>,
    /// Index into `outcomes` of the track that stopped the batch.
    aborted: Option<usize>,
}

impl Summary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, outcome: OutcomeRecord) {
        self.outcomes.push(outcome);
    }

    /// Notes a playlist whose tracks could not be listed.
    pub fn skip_playlist(&mut self, name: &str, reason: String) {
        self.skipped_playlists.push((name.to_string(), reason));
    }

    /// Records the track that stopped the batch and marks the run as aborted.
    pub fn abort(&mut self, outcome: OutcomeRecord) {
        self.aborted = Some(self.outcomes.len());
        self.outcomes.push(outcome);
    }

    pub fn outcomes(&self) -> &[OutcomeRecord] {
        &self.outcomes
    }

    pub fn skipped_playlists(&self) -> &[(String, String)] {
        &self.skipped_playlists
    }

    /// The outcome of the track at which the batch stopped, if it did.
    pub fn aborted(&self) -> Option<&OutcomeRecord> {
        self.aborted.and_then(|i| self.outcomes.get(i))
    }

    pub fn counts(&self) -> StatusCounts {
        self.outcomes
            .iter()
            .fold(StatusCounts::default(), |mut counts, o| {
                match o.status() {
                    OutcomeStatus::Succeeded => counts.succeeded += 1,
                    OutcomeStatus::NotFound => counts.not_found += 1,
                    OutcomeStatus::SearchFailed => counts.search_failed += 1,
                    OutcomeStatus::DownloadFailed => counts.download_failed += 1,
                    OutcomeStatus::ConversionFailed => counts.conversion_failed += 1,
                    OutcomeStatus::PlacementFailed => counts.placement_failed += 1,
                }
                counts
            })
    }

    /// Records of tracks that did not end up on disk, in processing order.
    pub fn failures(&self) -> impl Iterator<Item = &OutcomeRecord> {
        self.outcomes
            .iter()
            .filter(|o| o.status() != OutcomeStatus::Succeeded)
    }
}
