use std::{
    collections::{HashMap, HashSet},
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
};

use indicatif::ProgressBar;
use spyt::{
    cli::failure_rows,
    download::{
        AudioDownloader, Converter, Orchestrator, Placement, PlaylistSource, Resolver, TrackSearch,
    },
    error::{ConversionError, DownloadError, FetchError, SearchError},
    types::{OutcomeStatus, Playlist, ResolutionResult, SearchCandidate, Track},
};
use tempfile::TempDir;

// Helper function to create a test track
fn create_test_track(n: usize) -> Track {
    Track {
        id: format!("sp{}", n),
        title: format!("Song {}", n),
        artists: vec![format!("Artist {}", n)],
        album: Some("Album".to_string()),
    }
}

fn create_test_playlist(id: &str, tracks: u64) -> Playlist {
    Playlist {
        id: id.to_string(),
        name: format!("Playlist {}", id),
        owner: "me".to_string(),
        track_count: tracks,
    }
}

struct FakeSource {
    tracks: HashMap<String, Vec<Track>>,
}

impl PlaylistSource for FakeSource {
    async fn list_playlists(&self) -> Result<Vec<Playlist>, FetchError> {
        Ok(Vec::new())
    }

    async fn list_tracks(&self, playlist: &Playlist) -> Result<Vec<Track>, FetchError> {
        self.tracks
            .get(&playlist.id)
            .cloned()
            .ok_or(FetchError::Unauthorized)
    }
}

/// Answers every query with two candidates unless the title is listed as
/// missing; fails with a transport error for the listed title.
#[derive(Default)]
struct FakeSearch {
    missing: HashSet<String>,
    broken: Option<String>,
    queries: Arc<Mutex<Vec<String>>>,
}

impl TrackSearch for FakeSearch {
    async fn search(&self, query: &str) -> Result<Vec<SearchCandidate>, SearchError> {
        self.queries.lock().unwrap().push(query.to_string());

        if self.broken.as_deref().is_some_and(|b| query.starts_with(b)) {
            return Err(SearchError::Transport("connection reset".to_string()));
        }
        if self.missing.iter().any(|m| query.starts_with(m.as_str())) {
            return Ok(Vec::new());
        }

        let id = query.replace(' ', "_");
        Ok(vec![
            SearchCandidate { id: id.clone() },
            SearchCandidate {
                id: format!("{}_live", id),
            },
        ])
    }
}

struct FakeDownloader {
    dir: PathBuf,
    ext: &'static str,
    failing: HashSet<String>,
    calls: Arc<Mutex<Vec<String>>>,
}

impl AudioDownloader for FakeDownloader {
    async fn download_audio(
        &self,
        external_id: &str,
        _target_format: &str,
    ) -> Result<PathBuf, DownloadError> {
        self.calls.lock().unwrap().push(external_id.to_string());

        if self.failing.contains(external_id) {
            return Err(DownloadError::Exit {
                tool: "yt-dlp".to_string(),
                code: "1".to_string(),
                stderr: "HTTP Error 403".to_string(),
            });
        }

        let path = self.dir.join(format!("{}.{}", external_id, self.ext));
        std::fs::write(&path, external_id).unwrap();
        Ok(path)
    }
}

#[derive(Default)]
struct FakeConverter {
    fail: bool,
    calls: Arc<Mutex<usize>>,
}

impl Converter for FakeConverter {
    async fn convert(
        &self,
        input: &Path,
        _track: &Track,
        target_format: &str,
    ) -> Result<PathBuf, ConversionError> {
        *self.calls.lock().unwrap() += 1;

        if self.fail {
            return Err(ConversionError::Exit {
                tool: "ffmpeg".to_string(),
                code: "1".to_string(),
                stderr: "Invalid data found when processing input".to_string(),
            });
        }

        let output = input.with_extension(target_format);
        std::fs::copy(input, &output).unwrap();
        Ok(output)
    }
}

struct Harness {
    tmp: TempDir,
    scratch: PathBuf,
    root: PathBuf,
}

impl Harness {
    fn new() -> Self {
        let tmp = tempfile::tempdir().unwrap();
        let scratch = tmp.path().join("scratch");
        let root = tmp.path().join("library");
        std::fs::create_dir_all(&scratch).unwrap();
        std::fs::create_dir_all(&root).unwrap();
        Self { tmp, scratch, root }
    }

    fn downloader(&self, failing: &[&str]) -> FakeDownloader {
        FakeDownloader {
            dir: self.scratch.clone(),
            ext: "webm",
            failing: failing.iter().map(|s| s.to_string()).collect(),
            calls: Arc::default(),
        }
    }

    fn placement(&self) -> Placement {
        Placement::new(&self.root, "mp3")
    }
}

#[tokio::test]
async fn test_all_tracks_succeed() {
    let h = Harness::new();
    let tracks: Vec<Track> = (1..=3).map(create_test_track).collect();
    let source = FakeSource {
        tracks: HashMap::from([("a".to_string(), tracks.clone())]),
    };

    let orchestrator = Orchestrator::new(
        FakeSearch::default(),
        h.downloader(&[]),
        FakeConverter::default(),
        h.placement(),
    );
    let summary = orchestrator
        .run(&source, &[create_test_playlist("a", 3)])
        .await;

    let counts = summary.counts();
    assert_eq!(counts.succeeded, 3);
    assert_eq!(counts.failed(), 0);
    assert!(summary.aborted().is_none());

    for (outcome, track) in summary.outcomes().iter().zip(&tracks) {
        assert_eq!(outcome.track(), track);
        let path = outcome.path().unwrap();
        assert_eq!(
            path,
            &h.root
                .join(track.primary_artist())
                .join(format!("{}.mp3", track.title))
        );
        assert!(path.is_file());
    }
    assert!(h.tmp.path().exists());
}

#[tokio::test]
async fn test_one_download_failure_does_not_stop_batch() {
    let h = Harness::new();
    let tracks: Vec<Track> = (1..=5).map(create_test_track).collect();
    let source = FakeSource {
        tracks: HashMap::from([("a".to_string(), tracks.clone())]),
    };
    let downloader = h.downloader(&["Song_3_Artist_3"]);
    let calls = Arc::clone(&downloader.calls);

    let orchestrator = Orchestrator::new(
        FakeSearch::default(),
        downloader,
        FakeConverter::default(),
        h.placement(),
    );
    let summary = orchestrator
        .run(&source, &[create_test_playlist("a", 5)])
        .await;

    let counts = summary.counts();
    assert_eq!(counts.download_failed, 1);
    assert_eq!(counts.succeeded, 4);
    assert_eq!(summary.outcomes().len(), 5);

    // Order is preserved and processing continued past the failing track
    assert_eq!(summary.outcomes()[2].status(), OutcomeStatus::DownloadFailed);
    assert_eq!(summary.outcomes()[2].track(), &tracks[2]);
    assert!(summary.outcomes()[2].path().is_none());
    assert_eq!(
        calls.lock().unwrap().last().map(String::as_str),
        Some("Song_5_Artist_5")
    );

    let failures: Vec<_> = summary.failures().collect();
    assert_eq!(failures.len(), 1);
    assert!(failures[0].detail().unwrap().contains("403"));

    let rows = failure_rows(&summary);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].artist, "Artist 3");
    assert_eq!(rows[0].status, "download-failed");
}

#[tokio::test]
async fn test_not_found_is_recorded_without_error() {
    let h = Harness::new();
    let tracks: Vec<Track> = (1..=2).map(create_test_track).collect();
    let source = FakeSource {
        tracks: HashMap::from([("a".to_string(), tracks)]),
    };
    let search = FakeSearch {
        missing: HashSet::from(["Song 1".to_string()]),
        ..Default::default()
    };
    let downloader = h.downloader(&[]);
    let calls = Arc::clone(&downloader.calls);

    let orchestrator =
        Orchestrator::new(search, downloader, FakeConverter::default(), h.placement());
    let summary = orchestrator
        .run(&source, &[create_test_playlist("a", 2)])
        .await;

    assert_eq!(summary.outcomes()[0].status(), OutcomeStatus::NotFound);
    assert_eq!(summary.outcomes()[1].status(), OutcomeStatus::Succeeded);
    assert!(summary.aborted().is_none());
    // Nothing is downloaded for a track that was not found
    assert_eq!(*calls.lock().unwrap(), vec!["Song_2_Artist_2".to_string()]);
}

#[tokio::test]
async fn test_conversion_failure_is_per_track() {
    let h = Harness::new();
    let source = FakeSource {
        tracks: HashMap::from([("a".to_string(), vec![create_test_track(1)])]),
    };
    let converter = FakeConverter {
        fail: true,
        ..Default::default()
    };

    let orchestrator =
        Orchestrator::new(FakeSearch::default(), h.downloader(&[]), converter, h.placement());
    let summary = orchestrator
        .run(&source, &[create_test_playlist("a", 1)])
        .await;

    assert_eq!(summary.counts().conversion_failed, 1);
    assert!(!h.root.join("Artist 1").join("Song 1.mp3").exists());
}

#[tokio::test]
async fn test_conversion_skipped_for_target_format() {
    let h = Harness::new();
    let source = FakeSource {
        tracks: HashMap::from([("a".to_string(), vec![create_test_track(1)])]),
    };
    let mut downloader = h.downloader(&[]);
    downloader.ext = "mp3";
    let converter = FakeConverter::default();
    let conversions = Arc::clone(&converter.calls);

    let orchestrator =
        Orchestrator::new(FakeSearch::default(), downloader, converter, h.placement());
    let summary = orchestrator
        .run(&source, &[create_test_playlist("a", 1)])
        .await;

    assert_eq!(summary.counts().succeeded, 1);
    assert_eq!(*conversions.lock().unwrap(), 0);
}

#[tokio::test]
async fn test_existing_file_is_not_downloaded_again() {
    let h = Harness::new();
    let track = create_test_track(1);
    let placement = h.placement();
    let existing = placement.destination(&track);
    std::fs::create_dir_all(existing.parent().unwrap()).unwrap();
    std::fs::write(&existing, b"old").unwrap();

    let search = FakeSearch::default();
    let queries = Arc::clone(&search.queries);
    let orchestrator =
        Orchestrator::new(search, h.downloader(&[]), FakeConverter::default(), placement);
    let outcome = orchestrator
        .process_track("a", &track, &ProgressBar::hidden())
        .await
        .unwrap();

    assert_eq!(outcome.status(), OutcomeStatus::Succeeded);
    assert_eq!(outcome.path(), Some(&existing));
    assert!(queries.lock().unwrap().is_empty());
    assert_eq!(std::fs::read(&existing).unwrap(), b"old");
}

#[tokio::test]
async fn test_unlistable_playlist_is_skipped() {
    let h = Harness::new();
    let source = FakeSource {
        tracks: HashMap::from([("b".to_string(), vec![create_test_track(1)])]),
    };

    let orchestrator = Orchestrator::new(
        FakeSearch::default(),
        h.downloader(&[]),
        FakeConverter::default(),
        h.placement(),
    );
    let summary = orchestrator
        .run(
            &source,
            &[create_test_playlist("a", 4), create_test_playlist("b", 1)],
        )
        .await;

    assert_eq!(summary.skipped_playlists().len(), 1);
    assert_eq!(summary.skipped_playlists()[0].0, "Playlist a");
    assert_eq!(summary.counts().succeeded, 1);
    assert_eq!(summary.outcomes()[0].playlist(), "Playlist b");
}

#[tokio::test]
async fn test_search_transport_fault_aborts_batch() {
    let h = Harness::new();
    let tracks: Vec<Track> = (1..=3).map(create_test_track).collect();
    let source = FakeSource {
        tracks: HashMap::from([
            ("a".to_string(), tracks.clone()),
            ("b".to_string(), vec![create_test_track(4)]),
        ]),
    };
    let search = FakeSearch {
        broken: Some("Song 2".to_string()),
        ..Default::default()
    };
    let queries = Arc::clone(&search.queries);

    let orchestrator = Orchestrator::new(
        search,
        h.downloader(&[]),
        FakeConverter::default(),
        h.placement(),
    );
    let summary = orchestrator
        .run(
            &source,
            &[create_test_playlist("a", 3), create_test_playlist("b", 1)],
        )
        .await;

    assert_eq!(queries.lock().unwrap().len(), 2);

    // The track that hit the fault gets its own record; nothing after it runs
    let outcomes = summary.outcomes();
    assert_eq!(outcomes.len(), 2);
    assert_eq!(outcomes[0].status(), OutcomeStatus::Succeeded);
    assert_eq!(outcomes[1].status(), OutcomeStatus::SearchFailed);
    assert_eq!(outcomes[1].track(), &tracks[1]);

    let stopped = summary.aborted().unwrap();
    assert_eq!(stopped.track(), &tracks[1]);
    assert_eq!(stopped.playlist(), "Playlist a");
    assert!(stopped.detail().unwrap().contains("connection reset"));
    assert_eq!(summary.counts().search_failed, 1);

    let rows = failure_rows(&summary);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].title, "Song 2");
    assert_eq!(rows[0].status, "search-failed");
}

#[tokio::test]
async fn test_artist_dir_failure_is_recorded_per_track() {
    let h = Harness::new();
    let tracks: Vec<Track> = (1..=2).map(create_test_track).collect();
    let source = FakeSource {
        tracks: HashMap::from([("a".to_string(), tracks.clone())]),
    };
    // A plain file where the first artist's directory should go
    std::fs::write(h.root.join("Artist 1"), b"not a directory").unwrap();

    let orchestrator = Orchestrator::new(
        FakeSearch::default(),
        h.downloader(&[]),
        FakeConverter::default(),
        h.placement(),
    );
    let summary = orchestrator
        .run(&source, &[create_test_playlist("a", 2)])
        .await;

    let statuses: Vec<_> = summary.outcomes().iter().map(|o| o.status()).collect();
    assert_eq!(
        statuses,
        vec![OutcomeStatus::PlacementFailed, OutcomeStatus::Succeeded]
    );
    assert!(summary.outcomes()[0].detail().unwrap().contains("Artist 1"));
    assert!(summary.aborted().is_none());
    assert!(h.root.join("Artist 2").join("Song 2.mp3").is_file());
}

#[tokio::test]
async fn test_resolver_takes_first_candidate() {
    let resolver = Resolver::new(FakeSearch::default());
    let track = create_test_track(7);

    assert_eq!(Resolver::<FakeSearch>::query_for(&track), "Song 7 Artist 7");
    assert_eq!(
        resolver.resolve(&track).await.unwrap(),
        ResolutionResult::Found {
            external_id: "Song_7_Artist_7".to_string()
        }
    );
}

#[tokio::test]
async fn test_resolver_empty_result_is_not_found() {
    let resolver = Resolver::new(FakeSearch {
        missing: HashSet::from(["Song 7".to_string()]),
        ..Default::default()
    });

    assert_eq!(
        resolver.resolve(&create_test_track(7)).await.unwrap(),
        ResolutionResult::NotFound
    );
}
