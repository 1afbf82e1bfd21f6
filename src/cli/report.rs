use std::path::Path;

use tabled::Table;

use crate::{
    download::Summary,
    info, success,
    types::{FailureTableRow, Playlist, PlaylistTableRow},
    warning,
};

pub fn playlist_rows(playlists: &[Playlist]) -> Vec<PlaylistTableRow> {
    playlists
        .iter()
        .enumerate()
        .map(|(i, p)| PlaylistTableRow {
            index: i + 1,
            name: p.name.clone(),
            owner: p.owner.clone(),
            tracks: p.track_count,
        })
        .collect()
}

pub fn print_menu(playlists: &[Playlist]) {
    println!();
    info!("Your Spotify playlists:");
    println!("{}", Table::new(playlist_rows(playlists)));
}

pub fn failure_rows(summary: &Summary) -> Vec<FailureTableRow> {
    summary
        .failures()
        .map(|o| FailureTableRow {
            playlist: o.playlist().to_string(),
            artist: o.track().primary_artist().to_string(),
            title: o.track().title.clone(),
            status: o.status().to_string(),
            detail: o
                .detail()
                .map(|d| d.lines().next().unwrap_or_default().to_string())
                .unwrap_or_default(),
        })
        .collect()
}

pub fn print_summary(summary: &Summary, download_root: &Path) {
    let counts = summary.counts();

    println!();
    info!("Processed {} tracks", summary.outcomes().len());
    success!(
        "{} tracks saved to {}",
        counts.succeeded,
        download_root.display()
    );

    if counts.failed() > 0 {
        warning!(
            "not-found: {}, search-failed: {}, download-failed: {}, conversion-failed: {}, placement-failed: {}",
            counts.not_found,
            counts.search_failed,
            counts.download_failed,
            counts.conversion_failed,
            counts.placement_failed
        );
        println!("{}", Table::new(failure_rows(summary)));
    }

    for (name, reason) in summary.skipped_playlists() {
        warning!("Skipped playlist {}: {}", name, reason);
    }

    if let Some(stopped) = summary.aborted() {
        warning!(
            "Batch stopped at {} - {} ({}): {}",
            stopped.track().title,
            stopped.track().primary_artist(),
            stopped.playlist(),
            stopped.detail().unwrap_or_default()
        );
    }
}
