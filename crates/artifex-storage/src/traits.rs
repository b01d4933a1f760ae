//! Error types and the remote object store seam
//!
//! This module defines the error taxonomy shared by every artifact operation
//! and the `RemoteStore` trait that remote backends implement.

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;

/// Artifact operation errors
///
/// Absence of an artifact on a read-back path is not an error; those
/// operations return `Ok(None)` instead.
#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("Invalid artifact name: {0}")]
    InvalidName(String),

    #[error("Invalid relative path: {0}")]
    InvalidPath(String),

    #[error("Persistence failed: {0}")]
    Persistence(String),

    #[error("Upload failed: {0}")]
    Upload(String),

    #[error("Remote object store not configured: {0}")]
    RemoteNotConfigured(String),

    #[error("Artifact not found locally: {0}")]
    MissingArtifact(String),

    #[error("Image conversion failed: {0}")]
    Conversion(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for artifact operations
pub type ArtifactResult<T> = Result<T, ArtifactError>;

/// Upload-by-key capability of a remote object store.
///
/// Implementations must overwrite an existing object under the same key so
/// that publishing stays idempotent.
#[async_trait]
pub trait RemoteStore: Send + Sync {
    /// Store `data` under `key`, replacing any existing object.
    async fn put_object(&self, key: &str, data: Bytes, content_type: &str) -> ArtifactResult<()>;

    /// Short backend label used in logs.
    fn backend_name(&self) -> &'static str;
}
