use std::path::{Path, PathBuf};

use spyt::{media::Ffmpeg, types::Track, youtube::printed_path};

fn create_test_track(album: Option<&str>) -> Track {
    Track {
        id: "t1".to_string(),
        title: "Hey Jude".to_string(),
        artists: vec!["The Beatles".to_string()],
        album: album.map(str::to_string),
    }
}

#[test]
fn test_printed_path_takes_last_line() {
    let stdout = b"/tmp/spyt-1/abc.webm\n";
    assert_eq!(
        printed_path(stdout),
        Some(PathBuf::from("/tmp/spyt-1/abc.webm"))
    );

    let stdout = b"[info] something\n/tmp/spyt-1/abc.m4a\n\n";
    assert_eq!(
        printed_path(stdout),
        Some(PathBuf::from("/tmp/spyt-1/abc.m4a"))
    );

    assert_eq!(printed_path(b"\n  \n"), None);
}

#[test]
fn test_ffmpeg_args_tag_metadata() {
    let ffmpeg = Ffmpeg::new("ffmpeg");
    let args = ffmpeg.args(
        Path::new("/tmp/in.webm"),
        Path::new("/tmp/in.mp3"),
        &create_test_track(Some("Hey Jude")),
    );

    assert_eq!(args.last().map(String::as_str), Some("/tmp/in.mp3"));
    assert!(args.windows(2).any(|w| w[0] == "-i" && w[1] == "/tmp/in.webm"));
    assert!(args.windows(2).any(|w| w[0] == "-b:a" && w[1] == "320k"));
    assert!(args.contains(&"title=Hey Jude".to_string()));
    assert!(args.contains(&"artist=The Beatles".to_string()));
    assert!(args.contains(&"album=Hey Jude".to_string()));
}

#[test]
fn test_ffmpeg_args_without_album() {
    let args = Ffmpeg::new("ffmpeg").args(
        Path::new("in.opus"),
        Path::new("in.mp3"),
        &create_test_track(None),
    );

    assert!(!args.iter().any(|a| a.starts_with("album=")));
}
