use std::{path::PathBuf, time::Duration};

use indicatif::{ProgressBar, ProgressStyle};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

use crate::{
    Res,
    cli::report,
    config,
    download::{Orchestrator, Placement, PlaylistSource},
    error::FetchError,
    media::Ffmpeg,
    spotify::{self, auth::Credentials, playlists::SpotifyPlaylists},
    types::Playlist,
    utils, warning,
    youtube::{YtDlp, YtMusicSearch},
};

pub struct DownloadSettings {
    pub credentials: Credentials,
    pub download_dir: PathBuf,
}

/// How an interactive run ended, once startup succeeded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// Every selected track was processed (individual failures included).
    Completed,
    /// No playlists exist or none were selected.
    NothingSelected,
    /// The operator interrupted the batch.
    Canceled,
    /// A search transport fault stopped the batch.
    Aborted,
}

/// Runs the whole download session: authorize, pick playlists, download, report.
///
/// Errors returned here are startup failures (download root, authorization,
/// playlist listing, temporary directory); everything after that is reported
/// through the summary.
pub async fn download(settings: DownloadSettings) -> Res<RunOutcome> {
    let placement = Placement::new(&settings.download_dir, config::TARGET_FORMAT);
    placement.ensure_root().await?;
    check_tools();

    let mut session = spotify::auth::authorize(&settings.credentials).await?;
    let fetched = fetch_playlists(&SpotifyPlaylists::new(&session)).await;
    let playlists = match fetched {
        Err(e) if session.is_rejected_by(&e) => {
            warning!("Spotify rejected the cached authorization, signing in again.");
            session = spotify::auth::reauthorize(&settings.credentials).await?;
            fetch_playlists(&SpotifyPlaylists::new(&session)).await?
        }
        result => result?,
    };
    let source = SpotifyPlaylists::new(&session);

    if playlists.is_empty() {
        warning!("No playlists found.");
        return Ok(RunOutcome::NothingSelected);
    }

    report::print_menu(&playlists);
    let input = prompt("\nEnter playlist numbers to download (comma-separated) or 'all': ").await?;
    let selected: Vec<Playlist> = utils::parse_selection(&input, playlists.len())
        .into_iter()
        .filter_map(|i| playlists.get(i).cloned())
        .collect();

    if selected.is_empty() {
        warning!("No playlists selected.");
        return Ok(RunOutcome::NothingSelected);
    }

    let work_dir = tempfile::Builder::new().prefix("spyt-").tempdir()?;
    let orchestrator = Orchestrator::new(
        YtMusicSearch::new(),
        YtDlp::new(config::ytdlp_bin(), work_dir.path()),
        Ffmpeg::new(config::ffmpeg_bin()),
        placement,
    );

    let summary = tokio::select! {
        summary = orchestrator.run(&source, &selected) => summary,
        _ = tokio::signal::ctrl_c() => {
            println!();
            warning!("Download canceled.");
            return Ok(RunOutcome::Canceled);
        }
    };

    report::print_summary(&summary, orchestrator.placement().root());

    if summary.aborted().is_some() {
        Ok(RunOutcome::Aborted)
    } else {
        Ok(RunOutcome::Completed)
    }
}

async fn fetch_playlists(source: &SpotifyPlaylists<'_>) -> Result<Vec<Playlist>, FetchError> {
    let pb = ProgressBar::new_spinner();
    pb.set_message("Fetching playlists...");
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_style(
        ProgressStyle::with_template("{spinner:.blue} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
    );

    let result = source.list_playlists().await;
    pb.finish_and_clear();
    result
}

async fn prompt(question: &str) -> std::io::Result<String> {
    let mut stdout = tokio::io::stdout();
    stdout.write_all(question.as_bytes()).await?;
    stdout.flush().await?;

    let mut line = String::new();
    BufReader::new(tokio::io::stdin())
        .read_line(&mut line)
        .await?;
    Ok(line)
}

fn check_tools() {
    for bin in [config::ytdlp_bin(), config::ffmpeg_bin()] {
        if which::which(&bin).is_err() {
            warning!(
                "{} not found in PATH, downloads will fail until it is installed.",
                bin
            );
        }
    }
}
