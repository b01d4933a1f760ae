#[cfg(feature = "storage-s3")]
use crate::ObjectStoreRemote;
use crate::{ArtifactResult, ArtifactStore};
use artifex_core::Config;
#[cfg(feature = "storage-s3")]
use std::sync::Arc;

/// Create an artifact store based on configuration
///
/// The remote side is wired only as far as the settings allow: an endpoint
/// alone enables `remote_url`, endpoint plus bucket also enables publishing.
pub async fn create_store(config: &Config) -> ArtifactResult<ArtifactStore> {
    let mut store = ArtifactStore::open(&config.output_root, config.serve_base_url.clone()).await?;

    if let Some(ref endpoint) = config.infra.endpoint {
        store = store.with_remote_endpoint(endpoint.clone());
    }

    if config.infra.is_remote_configured() {
        #[cfg(feature = "storage-s3")]
        {
            if !config.infra.has_credentials() {
                tracing::warn!("Object-store credentials not set; uploads will likely be rejected");
            }
            let remote = ObjectStoreRemote::s3(&config.infra, &config.s3_region)?;
            store = store.with_remote(Arc::new(remote));
        }

        #[cfg(not(feature = "storage-s3"))]
        tracing::warn!("Remote storage configured but storage-s3 feature not enabled");
    } else {
        tracing::info!("Remote object store not configured; publishing disabled");
    }

    Ok(store)
}
