use std::path::Path;

use indicatif::{ProgressBar, ProgressStyle};

use crate::{
    download::{
        AudioDownloader, Converter, PlaylistSource, Resolver, Summary, TrackSearch,
        placement::Placement,
    },
    error::SearchError,
    info,
    types::{OutcomeRecord, OutcomeStatus, Playlist, ResolutionResult, Track},
    warning,
};

/// Batch driver: resolve, download, convert and place every selected track.
///
/// Tracks are handled one at a time in playlist order. A failing track is
/// recorded and the batch moves on; only a search transport fault stops it.
pub struct Orchestrator<S, D, C> {
    resolver: Resolver<S>,
    downloader: D,
    converter: C,
    placement: Placement,
}

impl<S, D, C> Orchestrator<S, D, C>
where
    S: TrackSearch,
    D: AudioDownloader,
    C: Converter,
{
    pub fn new(search: S, downloader: D, converter: C, placement: Placement) -> Self {
        Self {
            resolver: Resolver::new(search),
            downloader,
            converter,
            placement,
        }
    }

    pub fn placement(&self) -> &Placement {
        &self.placement
    }

    /// Processes `playlists` in the given order and returns the collected outcomes.
    ///
    /// A playlist whose tracks cannot be listed is skipped and noted in the
    /// summary. A [`SearchError`] records the current track as `search-failed`,
    /// marks the summary as aborted and returns what was collected so far.
    pub async fn run<P: PlaylistSource>(&self, source: &P, playlists: &[Playlist]) -> Summary {
        let mut summary = Summary::new();

        for playlist in playlists {
            let tracks = match source.list_tracks(playlist).await {
                Ok(tracks) => tracks,
                Err(e) => {
                    warning!("Failed to load tracks of {}: {}", playlist.name, e);
                    summary.skip_playlist(&playlist.name, e.to_string());
                    continue;
                }
            };

            if let Err(e) = self.run_playlist(playlist, &tracks, &mut summary).await {
                warning!("Search failed, stopping the batch: {}", e);
                break;
            }
        }

        summary
    }

    async fn run_playlist(
        &self,
        playlist: &Playlist,
        tracks: &[Track],
        summary: &mut Summary,
    ) -> Result<(), SearchError> {
        let total = tracks.len();
        info!("Processing playlist: {} ({} tracks)", playlist.name, total);

        let pb = ProgressBar::new(total as u64);
        pb.set_style(
            ProgressStyle::with_template("{bar:40.blue} {pos}/{len} {eta} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );

        for (i, track) in tracks.iter().enumerate() {
            pb.set_message(format!(
                "[{}/{}] {} - {}",
                i + 1,
                total,
                track.title,
                track.primary_artist()
            ));

            let outcome = self.process_track(&playlist.name, track, &pb).await;
            pb.inc(1);

            match outcome {
                Ok(record) => summary.record(record),
                Err(e) => {
                    pb.abandon();
                    summary.abort(OutcomeRecord::failed(
                        &playlist.name,
                        track,
                        OutcomeStatus::SearchFailed,
                        Some(e.to_string()),
                    ));
                    return Err(e);
                }
            }
        }

        pb.finish_and_clear();
        Ok(())
    }

    /// Runs one track through the pipeline and returns its single outcome.
    pub async fn process_track(
        &self,
        playlist: &str,
        track: &Track,
        pb: &ProgressBar,
    ) -> Result<OutcomeRecord, SearchError> {
        let destination = self.placement.destination(track);
        if async_fs::metadata(&destination).await.is_ok() {
            pb.suspend(|| {
                info!(
                    "Already downloaded: {} - {}",
                    track.title,
                    track.primary_artist()
                )
            });
            return Ok(OutcomeRecord::succeeded(playlist, track, destination));
        }

        let external_id = match self.resolver.resolve(track).await? {
            ResolutionResult::Found { external_id } => external_id,
            ResolutionResult::NotFound => {
                pb.suspend(|| {
                    warning!("Could not find: {} - {}", track.title, track.primary_artist())
                });
                return Ok(OutcomeRecord::failed(
                    playlist,
                    track,
                    OutcomeStatus::NotFound,
                    None,
                ));
            }
        };

        let format = self.placement.format();
        let downloaded = match self.downloader.download_audio(&external_id, format).await {
            Ok(path) => path,
            Err(e) => {
                pb.suspend(|| warning!("Error downloading {}: {}", track.title, e));
                return Ok(OutcomeRecord::failed(
                    playlist,
                    track,
                    OutcomeStatus::DownloadFailed,
                    Some(e.to_string()),
                ));
            }
        };

        let converted = if has_extension(&downloaded, format) {
            downloaded
        } else {
            let result = self.converter.convert(&downloaded, track, format).await;
            let _ = async_fs::remove_file(&downloaded).await;

            match result {
                Ok(path) => path,
                Err(e) => {
                    pb.suspend(|| warning!("Error converting {}: {}", track.title, e));
                    return Ok(OutcomeRecord::failed(
                        playlist,
                        track,
                        OutcomeStatus::ConversionFailed,
                        Some(e.to_string()),
                    ));
                }
            }
        };

        match self.placement.place(track, &converted).await {
            Ok(path) => Ok(OutcomeRecord::succeeded(playlist, track, path)),
            Err(e) => {
                pb.suspend(|| warning!("Error saving {}: {}", track.title, e));
                Ok(OutcomeRecord::failed(
                    playlist,
                    track,
                    OutcomeStatus::PlacementFailed,
                    Some(e.to_string()),
                ))
            }
        }
    }
}

fn has_extension(path: &Path, format: &str) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(format))
}
