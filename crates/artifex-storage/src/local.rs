use crate::keys::{basename, validate_relative_path};
use crate::traits::{ArtifactError, ArtifactResult};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use uuid::Uuid;

/// Local filesystem side of the artifact store.
///
/// Every write goes to a hidden staging file next to its destination and is
/// renamed into place, so a failed write never leaves a partial file under the
/// artifact's own name.
#[derive(Clone, Debug)]
pub struct LocalArtifacts {
    base_path: PathBuf,
}

impl LocalArtifacts {
    /// Create a new LocalArtifacts rooted at `base_path`, creating the directory if needed.
    pub async fn new(base_path: impl Into<PathBuf>) -> ArtifactResult<Self> {
        let base_path = base_path.into();

        fs::create_dir_all(&base_path).await.map_err(|e| {
            ArtifactError::Persistence(format!(
                "Failed to create output directory {}: {}",
                base_path.display(),
                e
            ))
        })?;

        Ok(LocalArtifacts { base_path })
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Convert a relative path to an absolute one under the output root.
    pub fn key_to_path(&self, relative_path: &str) -> ArtifactResult<PathBuf> {
        validate_relative_path(relative_path)?;
        Ok(self.base_path.join(relative_path))
    }

    /// True only for an existing regular file.
    pub async fn is_file(&self, relative_path: &str) -> bool {
        match self.key_to_path(relative_path) {
            Ok(path) => is_regular_file(&path).await,
            Err(_) => false,
        }
    }

    /// Ensure parent directory exists
    async fn ensure_parent_dir(&self, path: &Path) -> ArtifactResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await.map_err(|e| {
                ArtifactError::Persistence(format!(
                    "Failed to create directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }
        Ok(())
    }

    fn staging_path(path: &Path) -> PathBuf {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        path.with_file_name(format!(".{}.{}.partial", name, Uuid::new_v4()))
    }

    /// Write `data` as the artifact at `relative_path`.
    pub async fn write(&self, relative_path: &str, data: &[u8]) -> ArtifactResult<PathBuf> {
        let path = self.key_to_path(relative_path)?;
        self.ensure_parent_dir(&path).await?;

        let start = std::time::Instant::now();
        let staging = Self::staging_path(&path);

        if let Err(e) = write_and_sync(&staging, data).await {
            discard(&staging).await;
            return Err(ArtifactError::Persistence(format!(
                "Failed to write file {}: {}",
                path.display(),
                e
            )));
        }

        if let Err(e) = fs::rename(&staging, &path).await {
            discard(&staging).await;
            return Err(ArtifactError::Persistence(format!(
                "Failed to move {} into place: {}",
                path.display(),
                e
            )));
        }

        tracing::info!(
            path = %path.display(),
            key = %relative_path,
            size_bytes = data.len(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Artifact written"
        );

        Ok(path)
    }

    /// Move an existing file into place as the artifact at `relative_path`.
    ///
    /// Tries a rename first; when that fails (typically across filesystems)
    /// the file is copied to a staging file, renamed into place, and the
    /// source removed.
    pub async fn move_into(&self, relative_path: &str, source: &Path) -> ArtifactResult<PathBuf> {
        let path = self.key_to_path(relative_path)?;

        if !is_regular_file(source).await {
            return Err(ArtifactError::Persistence(format!(
                "Source file {} does not exist or is not a file",
                source.display()
            )));
        }

        self.ensure_parent_dir(&path).await?;
        let start = std::time::Instant::now();

        if let Err(rename_err) = fs::rename(source, &path).await {
            tracing::debug!(
                source = %source.display(),
                error = %rename_err,
                "Rename failed, falling back to copy"
            );
            self.copy_then_remove(source, &path).await?;
        }

        tracing::info!(
            path = %path.display(),
            key = %relative_path,
            source = %source.display(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Artifact moved into place"
        );

        Ok(path)
    }

    async fn copy_then_remove(&self, source: &Path, path: &Path) -> ArtifactResult<()> {
        let staging = Self::staging_path(path);

        if let Err(e) = fs::copy(source, &staging).await {
            discard(&staging).await;
            return Err(ArtifactError::Persistence(format!(
                "Failed to copy {} to {}: {}",
                source.display(),
                path.display(),
                e
            )));
        }

        if let Err(e) = fs::rename(&staging, path).await {
            discard(&staging).await;
            return Err(ArtifactError::Persistence(format!(
                "Failed to move {} into place: {}",
                path.display(),
                e
            )));
        }

        // The artifact is in place; a leftover source file is only clutter.
        if let Err(e) = fs::remove_file(source).await {
            tracing::warn!(
                source = %source.display(),
                error = %e,
                "Failed to remove source file after copy"
            );
        }

        Ok(())
    }

    /// Read the artifact's bytes. `Ok(None)` when it is absent or not a regular file.
    pub async fn read(&self, relative_path: &str) -> ArtifactResult<Option<Vec<u8>>> {
        let path = self.key_to_path(relative_path)?;

        if !is_regular_file(&path).await {
            return Ok(None);
        }

        match fs::read(&path).await {
            Ok(data) => Ok(Some(data)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(ArtifactError::Io(e)),
        }
    }

    /// Remove the artifact. Failures are logged and reported as `false`.
    pub async fn delete(&self, relative_path: &str) -> bool {
        let path = match self.key_to_path(relative_path) {
            Ok(path) => path,
            Err(e) => {
                tracing::error!(key = %relative_path, error = %e, "Delete output file failed");
                return false;
            }
        };

        if !is_regular_file(&path).await {
            tracing::warn!(
                key = %relative_path,
                "Output file does not exist or is not a file"
            );
        }

        match fs::remove_file(&path).await {
            Ok(()) => {
                tracing::info!(
                    path = %path.display(),
                    key = %relative_path,
                    file = %basename(relative_path),
                    "Deleted output file"
                );
                true
            }
            Err(e) => {
                tracing::error!(
                    path = %path.display(),
                    key = %relative_path,
                    error = %e,
                    "Delete output file failed"
                );
                false
            }
        }
    }
}

async fn is_regular_file(path: &Path) -> bool {
    fs::metadata(path)
        .await
        .map(|meta| meta.is_file())
        .unwrap_or(false)
}

async fn write_and_sync(path: &Path, data: &[u8]) -> std::io::Result<()> {
    let mut file = fs::File::create(path).await?;
    file.write_all(data).await?;
    file.sync_all().await?;
    Ok(())
}

async fn discard(path: &Path) {
    if let Err(e) = fs::remove_file(path).await {
        if e.kind() != ErrorKind::NotFound {
            tracing::warn!(path = %path.display(), error = %e, "Failed to remove staging file");
        }
    }
}
