use std::{
    ffi::OsString,
    path::{Path, PathBuf},
};

use crate::{error::FilesystemError, types::Track, utils};

/// Files finished tracks as `<root>/<artist>/<title>.<format>`.
#[derive(Debug, Clone)]
pub struct Placement {
    root: PathBuf,
    format: String,
}

impl Placement {
    /// Files into `root` with the extension `format` (without the dot).
    pub fn new(root: impl Into<PathBuf>, format: &str) -> Self {
        Self {
            root: root.into(),
            format: format.to_string(),
        }
    }

    /// The download root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Target format, also the extension of every placed file.
    pub fn format(&self) -> &str {
        &self.format
    }

    /// `<root>/<primary artist>`, sanitized.
    pub fn artist_dir(&self, track: &Track) -> PathBuf {
        self.root
            .join(utils::sanitize_path_segment(track.primary_artist()))
    }

    /// Final path of `track`, whether or not it exists yet.
    pub fn destination(&self, track: &Track) -> PathBuf {
        self.artist_dir(track).join(format!(
            "{}.{}",
            utils::sanitize_path_segment(&track.title),
            self.format
        ))
    }

    /// Creates the download root. A failure here is a startup failure.
    pub async fn ensure_root(&self) -> Result<(), FilesystemError> {
        ensure_dir(&self.root).await
    }

    /// Moves `local_temp_path` to the destination of `track`.
    ///
    /// Renames when possible and falls back to [`copy_into_place`] and remove
    /// when the temporary file lives on another filesystem.
    pub async fn place(
        &self,
        track: &Track,
        local_temp_path: &Path,
    ) -> Result<PathBuf, FilesystemError> {
        ensure_dir(&self.artist_dir(track)).await?;
        let destination = self.destination(track);

        if async_fs::rename(local_temp_path, &destination).await.is_err() {
            copy_into_place(local_temp_path, &destination).await?;
            let _ = async_fs::remove_file(local_temp_path).await;
        }

        Ok(destination)
    }
}

/// Creates `path` and its parents. Succeeds if the directory already exists.
pub async fn ensure_dir(path: &Path) -> Result<(), FilesystemError> {
    async_fs::create_dir_all(path)
        .await
        .map_err(|e| FilesystemError::new(path, e))
}

/// Copies `source` to `destination` through a `<name>.part` sibling.
///
/// The sibling is renamed over `destination` only after the copy completed,
/// so a failed or interrupted copy never leaves a file at `destination`. The
/// sibling is removed again when the copy or the rename fails.
pub async fn copy_into_place(source: &Path, destination: &Path) -> Result<(), FilesystemError> {
    let partial = partial_path(destination);

    let result = match async_fs::copy(source, &partial).await {
        Ok(_) => async_fs::rename(&partial, destination).await,
        Err(e) => Err(e),
    };

    if let Err(e) = result {
        let _ = async_fs::remove_file(&partial).await;
        return Err(FilesystemError::new(destination, e));
    }

    Ok(())
}

/// `<destination>.part`, in the same directory as `destination`.
pub fn partial_path(destination: &Path) -> PathBuf {
    let mut name = destination
        .file_name()
        .map(OsString::from)
        .unwrap_or_default();
    name.push(".part");
    destination.with_file_name(name)
}
