use crate::traits::{ArtifactError, ArtifactResult, RemoteStore};
use artifex_core::InfraSettings;
use async_trait::async_trait;
use bytes::Bytes;
use object_store::aws::AmazonS3Builder;
use object_store::path::Path;
use object_store::{Attribute, Attributes, ObjectStore, PutOptions, PutPayload};
use std::sync::Arc;

/// Remote store backed by any `object_store` implementation.
///
/// Production uses an S3-compatible bucket built from `InfraSettings`;
/// tests hand in `object_store::memory::InMemory`.
#[derive(Clone)]
pub struct ObjectStoreRemote {
    store: Arc<dyn ObjectStore>,
    bucket: String,
}

impl ObjectStoreRemote {
    pub fn new(store: Arc<dyn ObjectStore>, bucket: impl Into<String>) -> Self {
        ObjectStoreRemote {
            store,
            bucket: bucket.into(),
        }
    }

    /// Build an S3 client for the configured endpoint and bucket.
    ///
    /// Requests use path-style addressing (`{endpoint}/{bucket}/{key}`), which
    /// MinIO and most self-hosted S3 servers expect.
    pub fn s3(settings: &InfraSettings, region: &str) -> ArtifactResult<Self> {
        let endpoint = settings.endpoint.clone().ok_or_else(|| {
            ArtifactError::RemoteNotConfigured("URL_S3 not configured".to_string())
        })?;
        let bucket = settings.bucket.clone().ok_or_else(|| {
            ArtifactError::RemoteNotConfigured("BUCKET_NAME not configured".to_string())
        })?;

        let mut builder = AmazonS3Builder::new()
            .with_region(region)
            .with_bucket_name(bucket.clone())
            .with_endpoint(endpoint.clone())
            .with_allow_http(endpoint.starts_with("http://"))
            .with_virtual_hosted_style_request(false);

        if let Some(ref access_key) = settings.access_key {
            builder = builder.with_access_key_id(access_key);
        }
        if let Some(ref secret_key) = settings.secret_key {
            builder = builder.with_secret_access_key(secret_key);
        }

        let store = builder
            .build()
            .map_err(|e| ArtifactError::RemoteNotConfigured(e.to_string()))?;

        Ok(Self::new(Arc::new(store), bucket))
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }
}

#[async_trait]
impl RemoteStore for ObjectStoreRemote {
    async fn put_object(&self, key: &str, data: Bytes, content_type: &str) -> ArtifactResult<()> {
        let size = data.len() as u64;
        let location = Path::from(key);
        let start = std::time::Instant::now();

        let mut attributes = Attributes::new();
        attributes.insert(Attribute::ContentType, content_type.to_string().into());
        let opts = PutOptions {
            attributes,
            ..Default::default()
        };

        self.store
            .put_opts(&location, PutPayload::from(data), opts)
            .await
            .map_err(|e| {
                tracing::error!(
                    error = %e,
                    bucket = %self.bucket,
                    key = %key,
                    size_bytes = size,
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "Remote upload failed"
                );
                ArtifactError::Upload(e.to_string())
            })?;

        tracing::info!(
            bucket = %self.bucket,
            key = %key,
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Remote upload successful"
        );

        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "s3"
    }
}
