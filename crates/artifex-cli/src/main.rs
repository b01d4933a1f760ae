//! Artifex CLI: manage generated artifacts from the command line.
//!
//! Reads the same environment as the service: ARTIFEX_OUTPUT_DIR,
//! ARTIFEX_SERVE_BASE_URL and, for remote operations, URL_S3, BUCKET_NAME,
//! MINIO_ACCESS_KEY and MINIO_SECRET_KEY.

use anyhow::Context;
use artifex_cli::{init_tracing, print_json, ArtifactUrls};
use artifex_core::{ArtifactFormat, Config};
use artifex_storage::{create_store, ArtifactSource};
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "artifex", about = "Generated artifact store CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Store a file as a new artifact under today's date
    Persist {
        /// File to store; it is moved, not copied
        file: std::path::PathBuf,
        /// Artifact base name, without extension
        #[arg(long)]
        name: String,
        /// Target format: png, jpg, jpeg or webp
        #[arg(long, default_value = "png")]
        format: ArtifactFormat,
        /// Decode the file and re-encode it in the target format instead of moving it
        #[arg(long)]
        encode: bool,
    },
    /// Delete the local copy of an artifact
    Delete {
        /// Relative path, e.g. 2024-03-22/render1.png
        path: String,
    },
    /// Print an artifact as a base64 data URI
    Base64 { path: String },
    /// Write an artifact, re-encoded as png, to a file
    Bytes {
        path: String,
        /// Destination file
        #[arg(long)]
        out: std::path::PathBuf,
    },
    /// Upload an artifact to the object store
    Publish { path: String },
    /// Show the local and remote URLs of an artifact
    Urls { path: String },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let config = Config::from_env().context("Invalid configuration")?;
    let store = create_store(&config)
        .await
        .context("Failed to open artifact store")?;

    match cli.command {
        Commands::Persist {
            file,
            name,
            format,
            encode,
        } => {
            let source = if encode {
                let img = image_from(&file)?;
                ArtifactSource::RawBuffer(img)
            } else {
                ArtifactSource::ExistingFile(file)
            };
            let relative_path = store.persist(source, &name, format).await?;
            print_json(&serde_json::json!({ "relative_path": relative_path }))?;
        }
        Commands::Delete { path } => {
            let deleted = store.delete(&path).await;
            print_json(&serde_json::json!({ "relative_path": path, "deleted": deleted }))?;
            if !deleted {
                std::process::exit(1);
            }
        }
        Commands::Base64 { path } => match store.to_base64(&path).await? {
            Some(uri) => println!("{}", uri),
            None => anyhow::bail!("Artifact {} not found", path),
        },
        Commands::Bytes { path, out } => match store.to_bytes(&path).await? {
            Some(data) => {
                tokio::fs::write(&out, &data)
                    .await
                    .with_context(|| format!("Failed to write {}", out.display()))?;
                print_json(&serde_json::json!({
                    "relative_path": path,
                    "out": out.display().to_string(),
                    "size_bytes": data.len(),
                }))?;
            }
            None => anyhow::bail!("Artifact {} not found", path),
        },
        Commands::Publish { path } => {
            let url = store.publish_to_remote(&path).await?;
            print_json(&serde_json::json!({ "relative_path": path, "remote_url": url }))?;
        }
        Commands::Urls { path } => {
            let urls = ArtifactUrls {
                local_url: store.local_serve_url(&path),
                remote_url: store.remote_url(&path),
                relative_path: path,
            };
            print_json(&urls)?;
        }
    }

    Ok(())
}

fn image_from(file: &std::path::Path) -> anyhow::Result<image::DynamicImage> {
    image::open(file).with_context(|| format!("Failed to decode {}", file.display()))
}
