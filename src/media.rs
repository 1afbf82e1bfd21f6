//! Audio conversion with ffmpeg.

use std::path::{Path, PathBuf};

use tokio::process::Command;

use crate::{
    config, download::Converter, error::ConversionError, types::Track, youtube::exit_code,
};

/// Transcodes downloads to MP3 and writes title, artist and album tags.
pub struct Ffmpeg {
    bin: String,
    bitrate: String,
}

impl Ffmpeg {
    pub fn new(bin: impl Into<String>) -> Self {
        Self {
            bin: bin.into(),
            bitrate: config::TARGET_BITRATE.to_string(),
        }
    }

    /// Command line for converting `input` into `output`.
    pub fn args(&self, input: &Path, output: &Path, track: &Track) -> Vec<String> {
        let mut args = vec![
            "-hide_banner".to_string(),
            "-loglevel".to_string(),
            "error".to_string(),
            "-y".to_string(),
            "-i".to_string(),
            input.to_string_lossy().into_owned(),
            "-vn".to_string(),
            "-codec:a".to_string(),
            "libmp3lame".to_string(),
            "-b:a".to_string(),
            self.bitrate.clone(),
        ];

        let mut tag = |key: &str, value: &str| {
            args.push("-metadata".to_string());
            args.push(format!("{key}={value}"));
        };
        tag("title", &track.title);
        tag("artist", track.primary_artist());
        if let Some(album) = &track.album {
            tag("album", album);
        }

        args.push(output.to_string_lossy().into_owned());
        args
    }
}

impl Converter for Ffmpeg {
    async fn convert(
        &self,
        input: &Path,
        track: &Track,
        target_format: &str,
    ) -> Result<PathBuf, ConversionError> {
        let output_path = input.with_extension(target_format);

        let output = Command::new(&self.bin)
            .args(self.args(input, &output_path, track))
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|source| ConversionError::Spawn {
                tool: self.bin.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(ConversionError::Exit {
                tool: self.bin.clone(),
                code: exit_code(&output),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(output_path)
    }
}
