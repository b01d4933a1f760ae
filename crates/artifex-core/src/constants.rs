//! Shared constants

/// Default output root, relative to the process working directory.
pub const DEFAULT_OUTPUT_DIR: &str = "outputs/files";

/// Default base URL of the static file server that serves the output root.
pub const DEFAULT_SERVE_BASE_URL: &str = "http://127.0.0.1:8888/files/";

/// Region handed to the S3 client when none is configured. Most
/// S3-compatible servers (MinIO included) ignore it.
pub const DEFAULT_S3_REGION: &str = "us-east-1";

/// `chrono` format string for the date partition of relative paths and remote keys.
pub const DATE_PARTITION_FORMAT: &str = "%Y-%m-%d";
