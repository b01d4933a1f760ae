//! Configuration module
//!
//! Settings are read from the process environment once at start-up, after
//! loading an optional `.env` file. The remote object-store fields are all
//! optional: leaving them out only disables publishing and remote URLs.

use std::env;
use std::path::PathBuf;

use crate::constants::{DEFAULT_OUTPUT_DIR, DEFAULT_S3_REGION, DEFAULT_SERVE_BASE_URL};

/// Object-store credentials and location.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InfraSettings {
    pub access_key: Option<String>,
    pub secret_key: Option<String>,
    pub endpoint: Option<String>, // S3-compatible endpoint, e.g. http://localhost:9000 for MinIO
    pub bucket: Option<String>,
}

impl InfraSettings {
    /// Build settings from an arbitrary key lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        InfraSettings {
            access_key: get("MINIO_ACCESS_KEY"),
            secret_key: get("MINIO_SECRET_KEY"),
            endpoint: get("URL_S3"),
            bucket: get("BUCKET_NAME"),
        }
    }

    /// Endpoint and bucket are the minimum needed to upload anything.
    pub fn is_remote_configured(&self) -> bool {
        self.endpoint.is_some() && self.bucket.is_some()
    }

    pub fn has_credentials(&self) -> bool {
        self.access_key.is_some() && self.secret_key.is_some()
    }
}

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config {
    pub output_root: PathBuf,
    pub serve_base_url: String,
    pub s3_region: String,
    pub infra: InfraSettings,
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();
        let config = Self::from_lookup(|key| env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Config {
            output_root: lookup("ARTIFEX_OUTPUT_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR)),
            serve_base_url: lookup("ARTIFEX_SERVE_BASE_URL")
                .unwrap_or_else(|| DEFAULT_SERVE_BASE_URL.to_string()),
            s3_region: lookup("S3_REGION")
                .or_else(|| lookup("AWS_REGION"))
                .unwrap_or_else(|| DEFAULT_S3_REGION.to_string()),
            infra: InfraSettings::from_lookup(&lookup),
        }
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if !is_http_url(&self.serve_base_url) {
            return Err(anyhow::anyhow!(
                "ARTIFEX_SERVE_BASE_URL must be an http(s) URL, got '{}'",
                self.serve_base_url
            ));
        }

        if let Some(ref endpoint) = self.infra.endpoint {
            if !is_http_url(endpoint) {
                return Err(anyhow::anyhow!(
                    "URL_S3 must be an http(s) URL, got '{}'",
                    endpoint
                ));
            }
        }

        if self.output_root.as_os_str().is_empty() {
            return Err(anyhow::anyhow!("ARTIFEX_OUTPUT_DIR must not be empty"));
        }

        Ok(())
    }
}

fn is_http_url(value: &str) -> bool {
    value.starts_with("http://") || value.starts_with("https://")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn infra_settings_all_optional() {
        let settings = InfraSettings::from_lookup(lookup(&[]));
        assert_eq!(settings, InfraSettings::default());
        assert!(!settings.is_remote_configured());
        assert!(!settings.has_credentials());
    }

    #[test]
    fn infra_settings_blank_values_are_unset() {
        let settings = InfraSettings::from_lookup(lookup(&[
            ("URL_S3", "  "),
            ("BUCKET_NAME", "outputs"),
        ]));
        assert_eq!(settings.endpoint, None);
        assert_eq!(settings.bucket.as_deref(), Some("outputs"));
        assert!(!settings.is_remote_configured());
    }

    #[test]
    fn infra_settings_full() {
        let settings = InfraSettings::from_lookup(lookup(&[
            ("MINIO_ACCESS_KEY", "minio"),
            ("MINIO_SECRET_KEY", "minio123"),
            ("URL_S3", "http://localhost:9000"),
            ("BUCKET_NAME", "outputs"),
        ]));
        assert!(settings.is_remote_configured());
        assert!(settings.has_credentials());
    }

    #[test]
    fn config_defaults() {
        let config = Config::from_lookup(lookup(&[]));
        assert_eq!(config.output_root, PathBuf::from(DEFAULT_OUTPUT_DIR));
        assert_eq!(config.serve_base_url, DEFAULT_SERVE_BASE_URL);
        assert_eq!(config.s3_region, DEFAULT_S3_REGION);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn config_rejects_non_http_serve_url() {
        let config = Config::from_lookup(lookup(&[("ARTIFEX_SERVE_BASE_URL", "files/")]));
        assert!(config.validate().is_err());
    }

    #[test]
    fn config_rejects_non_http_endpoint() {
        let config = Config::from_lookup(lookup(&[("URL_S3", "localhost:9000")]));
        assert!(config.validate().is_err());
    }

    #[test]
    fn config_region_falls_back_to_aws_region() {
        let config = Config::from_lookup(lookup(&[("AWS_REGION", "eu-west-1")]));
        assert_eq!(config.s3_region, "eu-west-1");
    }
}
