use std::fmt::{Display, Formatter, Result as FmtResult};
use std::path::Path;
use std::str::FromStr;

/// Content formats an artifact can be stored in.
///
/// `Jpg` and `Jpeg` are kept apart because the extension is part of the
/// artifact's relative path and of the data URI produced for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArtifactFormat {
    #[default]
    Png,
    Jpg,
    Jpeg,
    Webp,
}

impl ArtifactFormat {
    /// Normalize a file extension into a format.
    ///
    /// Matching is case-insensitive; anything unknown (or empty) falls back to png.
    pub fn from_extension(ext: &str) -> Self {
        ext.parse().unwrap_or_default()
    }

    /// Format implied by the extension of `path`, png when there is none.
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        path.as_ref()
            .extension()
            .and_then(|ext| ext.to_str())
            .map(Self::from_extension)
            .unwrap_or_default()
    }

    /// File extension written to disk, without the leading dot.
    pub fn extension(&self) -> &'static str {
        match self {
            ArtifactFormat::Png => "png",
            ArtifactFormat::Jpg => "jpg",
            ArtifactFormat::Jpeg => "jpeg",
            ArtifactFormat::Webp => "webp",
        }
    }

    /// Encoder used when writing this format.
    pub fn image_format(&self) -> image::ImageFormat {
        match self {
            ArtifactFormat::Png => image::ImageFormat::Png,
            ArtifactFormat::Jpg | ArtifactFormat::Jpeg => image::ImageFormat::Jpeg,
            ArtifactFormat::Webp => image::ImageFormat::WebP,
        }
    }

    /// Subtype used in `data:image/<subtype>;base64,` URIs. This is the
    /// extension itself, so `jpg` artifacts yield `image/jpg`.
    pub fn data_uri_subtype(&self) -> &'static str {
        self.extension()
    }

    /// MIME type sent to the object store on upload.
    pub fn content_type(&self) -> &'static str {
        match self {
            ArtifactFormat::Png => "image/png",
            ArtifactFormat::Jpg | ArtifactFormat::Jpeg => "image/jpeg",
            ArtifactFormat::Webp => "image/webp",
        }
    }
}

impl FromStr for ArtifactFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().trim_start_matches('.').to_lowercase().as_str() {
            "png" => Ok(ArtifactFormat::Png),
            "jpg" => Ok(ArtifactFormat::Jpg),
            "jpeg" => Ok(ArtifactFormat::Jpeg),
            "webp" => Ok(ArtifactFormat::Webp),
            _ => Err(anyhow::anyhow!("Unsupported artifact format: {}", s)),
        }
    }
}

impl Display for ArtifactFormat {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.extension())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!("PNG".parse::<ArtifactFormat>().unwrap(), ArtifactFormat::Png);
        assert_eq!("Jpeg".parse::<ArtifactFormat>().unwrap(), ArtifactFormat::Jpeg);
        assert_eq!(".webp".parse::<ArtifactFormat>().unwrap(), ArtifactFormat::Webp);
    }

    #[test]
    fn parse_rejects_unknown() {
        assert!("gif".parse::<ArtifactFormat>().is_err());
        assert!("".parse::<ArtifactFormat>().is_err());
    }

    #[test]
    fn from_extension_defaults_to_png() {
        assert_eq!(ArtifactFormat::from_extension("gif"), ArtifactFormat::Png);
        assert_eq!(ArtifactFormat::from_extension(""), ArtifactFormat::Png);
        assert_eq!(ArtifactFormat::from_extension("JPG"), ArtifactFormat::Jpg);
    }

    #[test]
    fn from_path_uses_last_extension() {
        assert_eq!(
            ArtifactFormat::from_path("2024-03-22/render1.webp"),
            ArtifactFormat::Webp
        );
        assert_eq!(ArtifactFormat::from_path("2024-03-22/render1"), ArtifactFormat::Png);
        assert_eq!(
            ArtifactFormat::from_path("2024-03-22/render1.tiff"),
            ArtifactFormat::Png
        );
    }

    #[test]
    fn jpg_and_jpeg_share_an_encoder() {
        assert_eq!(ArtifactFormat::Jpg.image_format(), image::ImageFormat::Jpeg);
        assert_eq!(ArtifactFormat::Jpeg.image_format(), image::ImageFormat::Jpeg);
        assert_eq!(ArtifactFormat::Jpg.data_uri_subtype(), "jpg");
        assert_eq!(ArtifactFormat::Jpg.to_string(), "jpg");
    }

    #[test]
    fn serde_uses_lowercase_names() {
        let json = serde_json::to_string(&ArtifactFormat::Webp).unwrap();
        assert_eq!(json, "\"webp\"");
    }
}
