//! Relative path and remote key derivation.
//!
//! Relative path: `{YYYY-MM-DD}/{name}.{ext}`, date taken when the artifact is persisted.
//! Remote key: `{YYYY-MM-DD}/{basename}`, date taken when the key is computed.
//! Keys must not contain `..`, backslashes or a leading `/`.

use crate::traits::{ArtifactError, ArtifactResult};
use artifex_core::constants::DATE_PARTITION_FORMAT;
use artifex_core::ArtifactFormat;
use chrono::NaiveDate;

/// Date partition segment, e.g. `2024-03-22`.
pub fn date_partition(date: NaiveDate) -> String {
    date.format(DATE_PARTITION_FORMAT).to_string()
}

/// Reject names that are empty or would escape their date directory.
pub fn validate_name(name: &str) -> ArtifactResult<()> {
    if name.trim().is_empty() {
        return Err(ArtifactError::InvalidName(
            "artifact name must not be empty".to_string(),
        ));
    }
    if name.contains('/') || name.contains('\\') || name.contains("..") {
        return Err(ArtifactError::InvalidName(format!(
            "artifact name '{}' must not contain path separators or '..'",
            name
        )));
    }
    Ok(())
}

/// Build the relative path for a new artifact.
pub fn relative_path(date: NaiveDate, name: &str, format: ArtifactFormat) -> ArtifactResult<String> {
    validate_name(name)?;
    Ok(format!(
        "{}/{}.{}",
        date_partition(date),
        name,
        format.extension()
    ))
}

/// Validate a caller-supplied relative path before it touches the filesystem.
pub fn validate_relative_path(relative_path: &str) -> ArtifactResult<()> {
    if relative_path.is_empty()
        || relative_path.starts_with('/')
        || relative_path.contains('\\')
        || relative_path.split('/').any(|segment| segment == "..")
    {
        return Err(ArtifactError::InvalidPath(relative_path.to_string()));
    }
    Ok(())
}

/// Final path segment.
pub fn basename(relative_path: &str) -> &str {
    relative_path.rsplit('/').next().unwrap_or(relative_path)
}

/// Last two path segments (date and basename), or the whole path when it has only one.
pub fn serve_suffix(relative_path: &str) -> &str {
    let mut separators = relative_path.rmatch_indices('/').map(|(idx, _)| idx);
    match (separators.next(), separators.next()) {
        (Some(_), Some(second)) => &relative_path[second + 1..],
        _ => relative_path,
    }
}

/// Remote key for an artifact, dated `date` rather than with the date in its relative path.
pub fn remote_key(date: NaiveDate, relative_path: &str) -> String {
    format!("{}/{}", date_partition(date), basename(relative_path))
}

/// Join a base URL and a path with exactly one separating slash.
pub fn join_url(base: &str, path: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 22).unwrap()
    }

    #[test]
    fn relative_path_is_date_partitioned() {
        let path = relative_path(day(), "render1", ArtifactFormat::Png).unwrap();
        assert_eq!(path, "2024-03-22/render1.png");

        let path = relative_path(day(), "render1", ArtifactFormat::Jpg).unwrap();
        assert_eq!(path, "2024-03-22/render1.jpg");
    }

    #[test]
    fn empty_name_rejected() {
        assert!(matches!(
            relative_path(day(), "", ArtifactFormat::Png),
            Err(ArtifactError::InvalidName(_))
        ));
        assert!(matches!(
            relative_path(day(), "   ", ArtifactFormat::Png),
            Err(ArtifactError::InvalidName(_))
        ));
    }

    #[test]
    fn name_with_separator_rejected() {
        assert!(validate_name("a/b").is_err());
        assert!(validate_name("..").is_err());
        assert!(validate_name("a\\b").is_err());
        assert!(validate_name("render-1_final").is_ok());
    }

    #[test]
    fn relative_path_traversal_rejected() {
        assert!(validate_relative_path("../../etc/passwd").is_err());
        assert!(validate_relative_path("/etc/passwd").is_err());
        assert!(validate_relative_path("2024-03-22/../x.png").is_err());
        assert!(validate_relative_path("").is_err());
        assert!(validate_relative_path("2024-03-22/render1.png").is_ok());
        assert!(validate_relative_path("2024-03-22/render..1.png").is_ok());
    }

    #[test]
    fn serve_suffix_keeps_last_two_segments() {
        assert_eq!(serve_suffix("2024-03-22/render1.png"), "2024-03-22/render1.png");
        assert_eq!(
            serve_suffix("outputs/files/2024-03-22/render1.png"),
            "2024-03-22/render1.png"
        );
        assert_eq!(serve_suffix("render1.png"), "render1.png");
    }

    #[test]
    fn remote_key_uses_given_date_and_basename() {
        let tomorrow = NaiveDate::from_ymd_opt(2024, 3, 23).unwrap();
        assert_eq!(
            remote_key(tomorrow, "2024-03-22/render1.png"),
            "2024-03-23/render1.png"
        );
        assert_eq!(remote_key(day(), "render1.png"), "2024-03-22/render1.png");
    }

    #[test]
    fn join_url_normalizes_slashes() {
        assert_eq!(join_url("http://h:1/files/", "a/b.png"), "http://h:1/files/a/b.png");
        assert_eq!(join_url("http://h:1/files", "a/b.png"), "http://h:1/files/a/b.png");
        assert_eq!(join_url("http://minio:9000", "/a/b.png"), "http://minio:9000/a/b.png");
    }
}
