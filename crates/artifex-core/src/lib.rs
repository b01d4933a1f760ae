//! Artifex Core Library
//!
//! This crate provides the configuration provider, the artifact format
//! enumeration and shared constants used by the storage engine and the CLI.

pub mod config;
pub mod constants;
pub mod format;

// Re-export commonly used types
pub use config::{Config, InfraSettings};
pub use format::ArtifactFormat;
