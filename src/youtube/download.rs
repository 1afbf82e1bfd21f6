use std::{
    path::{Path, PathBuf},
    process::Output,
};

use tokio::process::Command;

use crate::{download::AudioDownloader, error::DownloadError};

const WATCH_URL: &str = "https://www.youtube.com/watch?v=";

/// Downloads audio streams with the `yt-dlp` executable.
///
/// Files land in `work_dir` as `<video id>.<ext>`, in whatever container
/// the best audio stream comes in; conversion happens elsewhere.
pub struct YtDlp {
    bin: String,
    work_dir: PathBuf,
}

impl YtDlp {
    pub fn new(bin: impl Into<String>, work_dir: impl Into<PathBuf>) -> Self {
        Self {
            bin: bin.into(),
            work_dir: work_dir.into(),
        }
    }

    fn args(&self, external_id: &str, target_format: &str) -> Vec<String> {
        let template = self.work_dir.join(format!("{external_id}.%(ext)s"));
        vec![
            "--no-playlist".to_string(),
            "--quiet".to_string(),
            "--no-warnings".to_string(),
            "--no-progress".to_string(),
            "--format".to_string(),
            format!("bestaudio[ext={target_format}]/bestaudio/best"),
            "--output".to_string(),
            template.to_string_lossy().into_owned(),
            "--print".to_string(),
            "after_move:filepath".to_string(),
            "--no-simulate".to_string(),
            format!("{WATCH_URL}{external_id}"),
        ]
    }
}

impl AudioDownloader for YtDlp {
    async fn download_audio(
        &self,
        external_id: &str,
        target_format: &str,
    ) -> Result<PathBuf, DownloadError> {
        let output = Command::new(&self.bin)
            .args(self.args(external_id, target_format))
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|source| DownloadError::Spawn {
                tool: self.bin.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(DownloadError::Exit {
                tool: self.bin.clone(),
                code: exit_code(&output),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let path = printed_path(&output.stdout)
            .ok_or_else(|| DownloadError::MissingOutput(self.bin.clone()))?;
        if async_fs::metadata(&path).await.is_err() {
            return Err(DownloadError::MissingOutput(self.bin.clone()));
        }

        Ok(path)
    }
}

/// Last non-empty line of the tool's stdout, read as a path.
pub fn printed_path(stdout: &[u8]) -> Option<PathBuf> {
    String::from_utf8_lossy(stdout)
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .last()
        .map(|l| Path::new(l).to_path_buf())
}

pub(crate) fn exit_code(output: &Output) -> String {
    output
        .status
        .code()
        .map(|c| c.to_string())
        .unwrap_or_else(|| "signal".to_string())
}
