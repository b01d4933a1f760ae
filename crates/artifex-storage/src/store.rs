//! Artifact store
//!
//! `ArtifactStore` is the entry point for the whole artifact lifecycle:
//! persisting generated images, deleting them, reading them back in several
//! representations and publishing them to the remote object store.
//!
//! Write paths (`persist`, `publish_to_remote`) return errors. Read-back paths
//! return `Ok(None)` when the artifact is absent and reserve `Err` for real
//! failures. `delete` reports through its boolean result only.

use crate::clock::{Clock, SystemClock};
use crate::convert;
use crate::keys::{self, join_url};
use crate::local::LocalArtifacts;
use crate::traits::{ArtifactError, ArtifactResult, RemoteStore};
use artifex_core::ArtifactFormat;
use bytes::Bytes;
use image::DynamicImage;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// What `persist` stores.
#[derive(Debug, Clone)]
pub enum ArtifactSource {
    /// Decoded pixels, encoded in the requested format on write.
    RawBuffer(DynamicImage),
    /// A file already written by the producer (e.g. a temp file), moved into place as is.
    ExistingFile(PathBuf),
}

impl From<DynamicImage> for ArtifactSource {
    fn from(img: DynamicImage) -> Self {
        ArtifactSource::RawBuffer(img)
    }
}

impl From<PathBuf> for ArtifactSource {
    fn from(path: PathBuf) -> Self {
        ArtifactSource::ExistingFile(path)
    }
}

#[derive(Clone)]
pub struct ArtifactStore {
    local: LocalArtifacts,
    serve_base_url: String,
    remote_endpoint: Option<String>,
    remote: Option<Arc<dyn RemoteStore>>,
    clock: Arc<dyn Clock>,
}

impl ArtifactStore {
    /// Open a store rooted at `output_root`, creating the directory if needed.
    ///
    /// The store starts without a remote; see `with_remote_endpoint` and `with_remote`.
    pub async fn open(
        output_root: impl Into<PathBuf>,
        serve_base_url: impl Into<String>,
    ) -> ArtifactResult<Self> {
        let local = LocalArtifacts::new(output_root).await?;

        Ok(ArtifactStore {
            local,
            serve_base_url: serve_base_url.into(),
            remote_endpoint: None,
            remote: None,
            clock: Arc::new(SystemClock),
        })
    }

    /// Set the object-store endpoint used to build remote URLs.
    pub fn with_remote_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.remote_endpoint = Some(endpoint.into());
        self
    }

    /// Set the client `publish_to_remote` uploads through.
    pub fn with_remote(mut self, remote: Arc<dyn RemoteStore>) -> Self {
        self.remote = Some(remote);
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn output_root(&self) -> &Path {
        self.local.base_path()
    }

    pub fn serve_base_url(&self) -> &str {
        &self.serve_base_url
    }

    pub fn remote_endpoint(&self) -> Option<&str> {
        self.remote_endpoint.as_deref()
    }

    pub fn has_remote(&self) -> bool {
        self.remote.is_some() && self.remote_endpoint.is_some()
    }

    /// Absolute path of an artifact. Nothing is checked on disk.
    pub fn local_path(&self, relative_path: &str) -> ArtifactResult<PathBuf> {
        self.local.key_to_path(relative_path)
    }

    pub async fn exists(&self, relative_path: &str) -> bool {
        self.local.is_file(relative_path).await
    }

    /// Store a new artifact under today's date partition and return its relative path.
    ///
    /// An existing artifact with the same date, name and format is replaced.
    pub async fn persist(
        &self,
        source: ArtifactSource,
        name: &str,
        format: ArtifactFormat,
    ) -> ArtifactResult<String> {
        let relative_path = keys::relative_path(self.clock.today(), name, format)?;

        match source {
            ArtifactSource::RawBuffer(img) => {
                let data = convert::encode(&img, format).map_err(|e| {
                    ArtifactError::Persistence(format!("encode {}: {}", relative_path, e))
                })?;
                self.local.write(&relative_path, &data).await?;
            }
            ArtifactSource::ExistingFile(path) => {
                self.local.move_into(&relative_path, &path).await?;
            }
        }

        Ok(relative_path)
    }

    /// Remove the local copy of an artifact. Remote copies are left alone.
    ///
    /// Returns `false` when removal failed, including when there was nothing to remove.
    pub async fn delete(&self, relative_path: &str) -> bool {
        self.local.delete(relative_path).await
    }

    /// Upload the local file to the object store and return its remote URL.
    ///
    /// The key is dated today, whatever date the relative path carries.
    /// Re-publishing overwrites the same key.
    pub async fn publish_to_remote(&self, relative_path: &str) -> ArtifactResult<String> {
        let remote = self.remote.as_ref().ok_or_else(|| {
            ArtifactError::RemoteNotConfigured("no remote object client".to_string())
        })?;
        let endpoint = self.remote_endpoint.as_deref().ok_or_else(|| {
            ArtifactError::RemoteNotConfigured("no object-store endpoint".to_string())
        })?;

        let data = self
            .local
            .read(relative_path)
            .await?
            .ok_or_else(|| ArtifactError::MissingArtifact(relative_path.to_string()))?;

        let key = keys::remote_key(self.clock.today(), relative_path);
        let content_type = ArtifactFormat::from_path(relative_path).content_type();

        remote
            .put_object(&key, Bytes::from(data), content_type)
            .await?;

        tracing::info!(
            key = %relative_path,
            remote_key = %key,
            backend = remote.backend_name(),
            "Artifact published to remote store"
        );

        Ok(join_url(endpoint, &key))
    }

    /// Re-encode the artifact in its own format and wrap it in a data URI.
    ///
    /// Unsupported extensions are treated as png.
    pub async fn to_base64(&self, relative_path: &str) -> ArtifactResult<Option<String>> {
        let Some(data) = self.local.read(relative_path).await? else {
            return Ok(None);
        };

        let format = ArtifactFormat::from_path(relative_path);
        let encoded = convert::reencode(&data, format)?;
        Ok(Some(convert::data_uri(&encoded, format)))
    }

    /// Re-encode the artifact as png, whatever its stored format.
    pub async fn to_bytes(&self, relative_path: &str) -> ArtifactResult<Option<Bytes>> {
        let Some(data) = self.local.read(relative_path).await? else {
            return Ok(None);
        };

        convert::reencode(&data, ArtifactFormat::Png).map(Some)
    }

    /// URL under which the static file server exposes the artifact.
    ///
    /// Only the date segment and basename are used, so the result does not
    /// depend on the output root.
    pub fn local_serve_url(&self, relative_path: &str) -> String {
        join_url(&self.serve_base_url, keys::serve_suffix(relative_path))
    }

    pub fn local_serve_url_opt(&self, relative_path: Option<&str>) -> Option<String> {
        relative_path.map(|p| self.local_serve_url(p))
    }

    /// URL the artifact would have if it were published today.
    ///
    /// Nothing is checked remotely; the object may never have been uploaded.
    /// `None` when no endpoint is configured.
    pub fn remote_url(&self, relative_path: &str) -> Option<String> {
        let endpoint = self.remote_endpoint.as_deref()?;
        let key = keys::remote_key(self.clock.today(), relative_path);
        Some(join_url(endpoint, &key))
    }

    pub fn remote_url_opt(&self, relative_path: Option<&str>) -> Option<String> {
        relative_path.and_then(|p| self.remote_url(p))
    }
}
