//! Saving downloaded files.

use std::future::Future;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Where finished downloads go.
pub trait FileSink: Send + Sync {
    /// Persist `bytes` under `filename` and return the final location.
    fn save(&self, filename: &str, bytes: &[u8]) -> impl Future<Output = Result<PathBuf>> + Send;
}

/// Writes files into a directory.
///
/// Each file is written to a hidden temporary name first and renamed into
/// place, so a reader never sees a partial file.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
    overwrite: bool,
}

impl DirectorySink {
    /// Save into `dir`, replacing existing files.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            overwrite: true,
        }
    }

    /// Keep existing files by appending ` (n)` to new names.
    pub fn keep_existing(mut self) -> Self {
        self.overwrite = false;
        self
    }

    /// Target directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    async fn target_path(&self, filename: &str) -> PathBuf {
        let path = self.dir.join(filename);
        if self.overwrite || !exists(&path).await {
            return path;
        }

        let (stem, ext) = match filename.rfind('.') {
            Some(i) if i > 0 => (&filename[..i], &filename[i..]),
            _ => (filename, ""),
        };
        let mut n = 1;
        loop {
            let candidate = self.dir.join(format!("{} ({}){}", stem, n, ext));
            if !exists(&candidate).await {
                return candidate;
            }
            n += 1;
        }
    }
}

impl FileSink for DirectorySink {
    async fn save(&self, filename: &str, bytes: &[u8]) -> Result<PathBuf> {
        if filename.is_empty() || filename.contains(['/', '\\']) {
            return Err(Error::Other(format!("refusing to save as {:?}", filename)));
        }

        tokio::fs::create_dir_all(&self.dir).await?;
        let target = self.target_path(filename).await;
        let temp = self.dir.join(format!(".{}.part", filename));

        let written = async {
            tokio::fs::write(&temp, bytes).await?;
            tokio::fs::rename(&temp, &target).await
        }
        .await;
        if let Err(e) = written {
            // Either step may leave a partial temp file behind.
            let _ = tokio::fs::remove_file(&temp).await;
            return Err(e.into());
        }

        log::info!("Saved {} bytes to {}", bytes.len(), target.display());
        Ok(target)
    }
}

async fn exists(path: &Path) -> bool {
    tokio::fs::try_exists(path).await.unwrap_or(false)
}
