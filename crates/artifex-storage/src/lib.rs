//! Artifex Storage Library
//!
//! Persists generated images under a date-partitioned output root, mirrors
//! them to an S3-compatible object store on request, and reads them back as
//! re-encoded bytes, data URIs or URLs.
//!
//! # On-disk layout
//!
//! Every artifact lives at `{output_root}/{YYYY-MM-DD}/{name}.{ext}`. The
//! `{YYYY-MM-DD}/{name}.{ext}` part is the artifact's relative path and its
//! only identifier. Remote keys are `{YYYY-MM-DD}/{name}.{ext}` as well, but the
//! date is taken when the key is computed, not from the relative path.

pub mod clock;
pub mod convert;
pub mod factory;
pub mod keys;
pub mod local;
#[cfg(feature = "storage-s3")]
pub mod remote;
pub mod store;
pub mod traits;

// Re-export commonly used types
pub use artifex_core::ArtifactFormat;
pub use clock::{Clock, FixedClock, SystemClock};
pub use factory::create_store;
pub use local::LocalArtifacts;
#[cfg(feature = "storage-s3")]
pub use remote::ObjectStoreRemote;
pub use store::{ArtifactSource, ArtifactStore};
pub use traits::{ArtifactError, ArtifactResult, RemoteStore};
