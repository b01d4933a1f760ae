//! Image encoding and re-encoding for artifact read-back.

use crate::traits::{ArtifactError, ArtifactResult};
use artifex_core::ArtifactFormat;
use base64::{engine::general_purpose, Engine as _};
use bytes::Bytes;
use image::{DynamicImage, ImageReader};
use std::io::Cursor;

/// Encode `img` in `format`.
///
/// JPEG has no alpha channel and the WebP encoder only takes 8-bit RGB(A),
/// so the pixel layout is narrowed first when the target needs it.
pub fn encode(img: &DynamicImage, format: ArtifactFormat) -> ArtifactResult<Bytes> {
    let prepared = match format {
        ArtifactFormat::Jpg | ArtifactFormat::Jpeg => DynamicImage::ImageRgb8(img.to_rgb8()),
        ArtifactFormat::Webp => DynamicImage::ImageRgba8(img.to_rgba8()),
        ArtifactFormat::Png => match img {
            DynamicImage::ImageRgb32F(_) | DynamicImage::ImageRgba32F(_) => {
                DynamicImage::ImageRgba16(img.to_rgba16())
            }
            _ => img.clone(),
        },
    };

    let mut buffer = Vec::new();
    prepared
        .write_to(&mut Cursor::new(&mut buffer), format.image_format())
        .map_err(|e| ArtifactError::Conversion(format!("encode as {}: {}", format, e)))?;

    Ok(Bytes::from(buffer))
}

/// Decode image bytes, guessing the container from its magic number.
pub fn decode(data: &[u8]) -> ArtifactResult<DynamicImage> {
    ImageReader::new(Cursor::new(data))
        .with_guessed_format()
        .map_err(|e| ArtifactError::Conversion(e.to_string()))?
        .decode()
        .map_err(|e| ArtifactError::Conversion(e.to_string()))
}

/// Decode `data` and encode it again in `format`.
pub fn reencode(data: &[u8], format: ArtifactFormat) -> ArtifactResult<Bytes> {
    let img = decode(data)?;
    encode(&img, format)
}

/// `data:image/<ext>;base64,<payload>`
pub fn data_uri(data: &[u8], format: ArtifactFormat) -> String {
    format!(
        "data:image/{};base64,{}",
        format.data_uri_subtype(),
        general_purpose::STANDARD.encode(data)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GenericImageView, Rgba, RgbaImage};

    fn gradient() -> DynamicImage {
        let img = RgbaImage::from_fn(16, 8, |x, y| {
            Rgba([(x * 16) as u8, (y * 32) as u8, 128, if x % 2 == 0 { 255 } else { 200 }])
        });
        DynamicImage::ImageRgba8(img)
    }

    #[test]
    fn png_roundtrip_is_pixel_identical() {
        let img = gradient();
        let encoded = encode(&img, ArtifactFormat::Png).unwrap();
        let decoded = decode(&encoded).unwrap();
        assert_eq!(decoded.to_rgba8(), img.to_rgba8());
    }

    #[test]
    fn jpeg_drops_alpha() {
        let encoded = encode(&gradient(), ArtifactFormat::Jpeg).unwrap();
        assert_eq!(
            image::guess_format(&encoded).unwrap(),
            image::ImageFormat::Jpeg
        );
        let decoded = decode(&encoded).unwrap();
        assert_eq!(decoded.dimensions(), (16, 8));
        assert!(!decoded.color().has_alpha());
    }

    #[test]
    fn webp_encodes() {
        let encoded = encode(&gradient(), ArtifactFormat::Webp).unwrap();
        assert_eq!(
            image::guess_format(&encoded).unwrap(),
            image::ImageFormat::WebP
        );
    }

    #[test]
    fn float_images_encode_as_png() {
        let img = DynamicImage::ImageRgb32F(gradient().to_rgb32f());
        let encoded = encode(&img, ArtifactFormat::Png).unwrap();
        assert_eq!(decode(&encoded).unwrap().dimensions(), (16, 8));
    }

    #[test]
    fn reencode_converts_container() {
        let jpeg = encode(&gradient(), ArtifactFormat::Jpg).unwrap();
        let png = reencode(&jpeg, ArtifactFormat::Png).unwrap();
        assert_eq!(image::guess_format(&png).unwrap(), image::ImageFormat::Png);
    }

    #[test]
    fn decode_rejects_garbage() {
        assert!(matches!(
            decode(b"not an image"),
            Err(ArtifactError::Conversion(_))
        ));
    }

    #[test]
    fn data_uri_prefix() {
        let uri = data_uri(b"abc", ArtifactFormat::Jpg);
        assert_eq!(uri, "data:image/jpg;base64,YWJj");
    }
}
