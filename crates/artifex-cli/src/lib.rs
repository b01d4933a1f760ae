use serde::Serialize;

/// URLs reported for an artifact by `artifex urls`.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct ArtifactUrls {
    pub relative_path: String,
    pub local_url: String,
    pub remote_url: Option<String>,
}

/// Print a value as pretty JSON on stdout.
pub fn print_json(value: &impl Serialize) -> anyhow::Result<()> {
    let out = serde_json::to_string_pretty(value)?;
    println!("{}", out);
    Ok(())
}

/// Initialize tracing for CLI binaries.
///
/// Logs go to stderr so stdout stays parseable.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn artifact_urls_serialize_missing_remote_as_null() {
        let urls = ArtifactUrls {
            relative_path: "2024-03-22/render1.png".to_string(),
            local_url: "http://127.0.0.1:8888/files/2024-03-22/render1.png".to_string(),
            remote_url: None,
        };
        let value = serde_json::to_value(&urls).unwrap();
        assert_eq!(value["remote_url"], serde_json::Value::Null);
        assert_eq!(value["relative_path"], "2024-03-22/render1.png");
    }
}
