//! Image format detection and data URI handling.
//!
//! Uploaded images are embedded in the document as base64 `data:` URIs, so
//! the editor never has to resolve files or remote URLs at export time.
//! Any raster format the `image` crate decodes is accepted; formats the
//! exporter cannot draw directly are re-encoded as PNG on the way in.

use std::io::Cursor;

use base64::Engine;
use designlite_core::Document;

use crate::error::{RenderError, RenderResult};

/// Image formats the exporter can draw straight from a data URI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    /// PNG with alpha support.
    Png,
    /// JPEG (no alpha).
    Jpeg,
    /// GIF (first frame only).
    Gif,
    /// WebP (alpha support).
    WebP,
    /// Unknown/other format.
    Unknown,
}

impl ImageFormat {
/// Detect format from MIME type.
    #[must_use]
    pub fn from_mime(mime: &str) -> Self {
        match mime.to_lowercase().as_str() {
            "image/png" => Self::Png,
            "image/jpeg" | "image/jpg" => Self::Jpeg,
            "image/gif" => Self::Gif,
            "image/webp" => Self::WebP,
            _ => Self::Unknown,
        }
    }

    /// Detect format from magic bytes.
    #[must_use]
    pub fn from_magic_bytes(data: &[u8]) -> Self {
        if data.len() < 4 {
            return Self::Unknown;
        }

        // PNG: 89 50 4E 47
        if data.starts_with(&[0x89, 0x50, 0x4E, 0x47]) {
            return Self::Png;
        }

        // JPEG: FF D8 FF
        if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
            return Self::Jpeg;
        }

        // GIF87a / GIF89a
        if data.starts_with(b"GIF8") {
            return Self::Gif;
        }

        // WebP: RIFF....WEBP
        if data.len() >= 12 && &data[0..4] == b"RIFF" && &data[8..12] == b"WEBP" {
            return Self::WebP;
        }

        Self::Unknown
    }

    /// MIME type for data URIs.
    #[must_use]
    pub fn mime_type(self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
            Self::Gif => "image/gif",
            Self::WebP => "image/webp",
            Self::Unknown => "application/octet-stream",
        }
    }
}

/// Dimensions and format of a decoded image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageInfo {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Format detected from the leading bytes.
    pub format: ImageFormat,
}

/// Decode image bytes far enough to prove they are a usable, embeddable image.
///
/// # Errors
///
/// Returns an error if the bytes are not in a supported format or cannot be
/// decoded.
pub fn probe_image(data: &[u8]) -> RenderResult<ImageInfo> {
    let format = ImageFormat::from_magic_bytes(data);
    if format == ImageFormat::Unknown {
        return Err(RenderError::Resource("Unrecognized image format".to_string()));
    }

    let img = image::load_from_memory(data)
        .map_err(|e| RenderError::Resource(format!("Failed to decode image: {e}")))?;

    Ok(ImageInfo {
        width: img.width(),
        height: img.height(),
        format,
    })
}

/// A parsed `data:` URI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataUri {
    /// Declared media type, e.g. `image/png`. Empty when omitted.
    pub mime: String,
    /// Decoded payload.
    pub bytes: Vec<u8>,
}

/// Parse a data URI such as `data:image/png;base64,iVBORw0KGgo...`.
///
/// Payloads without `;base64` are percent-decoded.
///
/// # Errors
///
/// Returns an error if the URI is malformed or the payload cannot be decoded.
pub fn decode_data_uri(uri: &str) -> RenderResult<DataUri> {
    let rest = uri
        .strip_prefix("data:")
        .ok_or_else(|| RenderError::Resource("Not a data URI".to_string()))?;

    let (metadata, payload) = rest
        .split_once(',')
        .ok_or_else(|| RenderError::Resource("Invalid data URI: missing comma".to_string()))?;

    let (mime, is_base64) = match metadata.strip_suffix(";base64") {
        Some(mime) => (mime, true),
        None => (metadata, false),
    };

    let bytes = if is_base64 {
        base64::engine::general_purpose::STANDARD
            .decode(payload)
            .map_err(|e| RenderError::Resource(format!("Failed to decode base64: {e}")))?
    } else {
        urlencoding::decode_binary(payload.as_bytes()).into_owned()
    };

    Ok(DataUri {
        mime: mime.split(';').next().unwrap_or_default().to_string(),
        bytes,
    })
}

/// Encode bytes as a base64 data URI.
#[must_use]
pub fn encode_data_uri(bytes: &[u8], mime: &str) -> String {
    let encoded = base64::engine::general_purpose::STANDARD.encode(bytes);
    format!("data:{mime};base64,{encoded}")
}

/// An uploaded image ready to embed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedImage {
    /// Encoded bytes in one of the directly drawable formats.
    pub bytes: Vec<u8>,
    /// Dimensions and format of `bytes`.
    pub info: ImageInfo,
    /// Whether the upload was re-encoded as PNG.
    pub transcoded: bool,
}

impl PreparedImage {
    /// The image as a base64 data URI.
    #[must_use]
    pub fn to_data_uri(&self) -> String {
        encode_data_uri(&self.bytes, self.info.format.mime_type())
    }
}

/// Decode an uploaded image and put it in a form the exporter can draw.
///
/// PNG, JPEG, GIF and WebP pass through untouched. Other raster formats the
/// `image` crate reads (BMP, TIFF, ICO, ...) are re-encoded as PNG.
///
/// # Errors
///
/// Returns an error if the bytes cannot be decoded as a raster image.
pub fn prepare_image(data: &[u8]) -> RenderResult<PreparedImage> {
    let img = image::load_from_memory(data)
        .map_err(|e| RenderError::Resource(format!("Failed to decode image: {e}")))?;
    let (width, height) = (img.width(), img.height());

    let format = ImageFormat::from_magic_bytes(data);
    if format != ImageFormat::Unknown {
        return Ok(PreparedImage {
            bytes: data.to_vec(),
            info: ImageInfo {
                width,
                height,
                format,
            },
            transcoded: false,
        });
    }

    let mut png = Cursor::new(Vec::new());
    image::DynamicImage::ImageRgba8(img.to_rgba8())
        .write_to(&mut png, image::ImageFormat::Png)
        .map_err(|e| RenderError::Resource(format!("Failed to re-encode image: {e}")))?;

    Ok(PreparedImage {
        bytes: png.into_inner(),
        info: ImageInfo {
            width,
            height,
            format: ImageFormat::Png,
        },
        transcoded: true,
    })
}

/// Decode the raster image behind a data URI. Media types outside the
/// drawable raster set (e.g. `image/svg+xml`) are left to the SVG renderer.
fn check_data_uri(uri: &str) -> RenderResult<Option<ImageInfo>> {
    let data = decode_data_uri(uri)?;
    if ImageFormat::from_mime(&data.mime) == ImageFormat::Unknown {
        return Ok(None);
    }
    probe_image(&data.bytes).map(Some)
}

/// Verify that every embedded `data:` image in `doc` decodes.
///
/// Remote URLs are not fetched here; the renderer skips ones it cannot load.
///
/// # Errors
///
/// Returns [`RenderError::Resource`] naming the background or element whose
/// embedded image is malformed.
pub fn check_embedded_images(doc: &Document) -> RenderResult<()> {
    let background = doc
        .background_image
        .iter()
        .map(|src| ("background".to_string(), src));
    let elements = doc.elements().iter().filter_map(|el| {
        el.kind
            .image_source()
            .map(|src| (format!("element {}", el.id), src))
    });

    for (owner, src) in background.chain(elements) {
        if !src.is_data_uri() {
            continue;
        }
        if let Err(RenderError::Resource(reason) | RenderError::Export(reason)) =
            check_data_uri(src.as_str())
        {
            return Err(RenderError::Resource(format!(
                "{owner} has an unusable embedded image: {reason}"
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    // 1x1 red pixel
    const PNG_BASE64: &str = "iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mP8z8DwHwAFBQIAX8jx0gAAAABJRU5ErkJggg==";

    #[test]
    fn test_format_detection_from_mime() {
        assert_eq!(ImageFormat::from_mime("image/jpg"), ImageFormat::Jpeg);
        assert_eq!(ImageFormat::from_mime("image/webp"), ImageFormat::WebP);
        assert_eq!(ImageFormat::from_mime("text/plain"), ImageFormat::Unknown);
    }

    #[test]
    fn test_format_detection_from_magic_bytes() {
        assert_eq!(
            ImageFormat::from_magic_bytes(&[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A]),
            ImageFormat::Png
        );
        assert_eq!(
            ImageFormat::from_magic_bytes(&[0xFF, 0xD8, 0xFF, 0xE0]),
            ImageFormat::Jpeg
        );
        assert_eq!(ImageFormat::from_magic_bytes(b"GIF89a"), ImageFormat::Gif);
        assert_eq!(
            ImageFormat::from_magic_bytes(b"RIFF\x00\x00\x00\x00WEBP"),
            ImageFormat::WebP
        );
        assert_eq!(ImageFormat::from_magic_bytes(b"%PDF-1.7"), ImageFormat::Unknown);
        assert_eq!(ImageFormat::from_magic_bytes(&[0x89]), ImageFormat::Unknown);
    }

    #[test]
    fn test_mime_matches_detection() {
        for format in [
            ImageFormat::Png,
            ImageFormat::Jpeg,
            ImageFormat::Gif,
            ImageFormat::WebP,
        ] {
            assert_eq!(ImageFormat::from_mime(format.mime_type()), format);
        }
    }

    #[test]
    fn test_data_uri_parsing() {
        let uri = format!("data:image/png;base64,{PNG_BASE64}");
        let parsed = decode_data_uri(&uri).expect("valid");
        assert_eq!(parsed.mime, "image/png");
        assert_eq!(encode_data_uri(&parsed.bytes, &parsed.mime), uri);

        let info = probe_image(&parsed.bytes).expect("valid png");
        assert_eq!((info.width, info.height), (1, 1));
        assert_eq!(info.format, ImageFormat::Png);
    }

    #[test]
    fn test_percent_encoded_payload() {
        let parsed = decode_data_uri("data:text/plain,a%20b").expect("valid");
        assert_eq!(parsed.mime, "text/plain");
        assert_eq!(parsed.bytes, b"a b");
    }

    #[test]
    fn test_invalid_data_uri() {
        assert!(decode_data_uri("not a data uri").is_err());
        assert!(decode_data_uri("data:image/png").is_err());
        assert!(decode_data_uri("data:image/png;base64,@@@").is_err());
    }

    #[test]
    fn test_probe_rejects_non_images() {
        assert!(probe_image(b"hello world, not an image").is_err());
        // right magic, truncated body
        assert!(probe_image(&[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A]).is_err());
    }

    fn encoded(format: image::ImageFormat) -> Vec<u8> {
        let img = image::RgbaImage::from_pixel(3, 2, image::Rgba([10, 20, 30, 255]));
        let mut buf = Cursor::new(Vec::new());
        image::DynamicImage::ImageRgba8(img)
            .write_to(&mut buf, format)
            .expect("encode");
        buf.into_inner()
    }

    fn doc_with_image(src: &str) -> Document {
        let store = designlite_core::DocumentStore::new();
        store.insert(designlite_core::ElementType::Image, Some(src.to_string()));
        store.snapshot()
    }

    #[test]
    fn test_drawable_uploads_pass_through() {
        let png = encoded(image::ImageFormat::Png);
        let prepared = prepare_image(&png).expect("png");
        assert!(!prepared.transcoded);
        assert_eq!(prepared.bytes, png);
        assert_eq!(prepared.info.format, ImageFormat::Png);
        assert!(prepared.to_data_uri().starts_with("data:image/png;base64,"));
    }

    #[test]
    fn test_bmp_upload_is_reencoded_as_png() {
        let bmp = encoded(image::ImageFormat::Bmp);
        assert!(bmp.starts_with(b"BM"));

        let prepared = prepare_image(&bmp).expect("bmp decodes");
        assert!(prepared.transcoded);
        assert_eq!(
            prepared.info,
            ImageInfo {
                width: 3,
                height: 2,
                format: ImageFormat::Png
            }
        );
        assert_eq!(ImageFormat::from_magic_bytes(&prepared.bytes), ImageFormat::Png);
        let back = image::load_from_memory(&prepared.bytes).expect("png").to_rgba8();
        assert_eq!(back.get_pixel(2, 1).0, [10, 20, 30, 255]);
    }

    #[test]
    fn test_undecodable_upload_is_rejected() {
        assert!(matches!(
            prepare_image(b"<svg xmlns=\"http://www.w3.org/2000/svg\"/>"),
            Err(RenderError::Resource(_))
        ));
    }

    #[test]
    fn test_embedded_images_that_decode_pass() {
        let good = format!("data:image/png;base64,{PNG_BASE64}");
        let mut doc = doc_with_image(&good);
        doc.set_background(Some(designlite_core::ImageSource::new(
            "data:image/svg+xml,%3Csvg%20xmlns%3D%22http%3A%2F%2Fwww.w3.org%2F2000%2Fsvg%22%2F%3E",
        )));
        assert!(check_embedded_images(&doc).is_ok());
        assert!(check_embedded_images(&doc_with_image("https://example.com/cat.png")).is_ok());
        assert!(check_embedded_images(&doc_with_image("")).is_ok());
    }

    #[test]
    fn test_broken_embedded_image_names_its_owner() {
        let doc = doc_with_image("data:image/png;base64,AAAA");
        let id = doc.elements()[0].id;
        let err = check_embedded_images(&doc).expect_err("truncated png");
        let message = err.to_string();
        assert!(matches!(err, RenderError::Resource(_)));
        assert!(message.contains(&format!("element {id}")));

        let mut doc = Document::new(10.0, 10.0);
        doc.set_background(Some(designlite_core::ImageSource::new(
            "data:image/jpeg;base64,@@@",
        )));
        let err = check_embedded_images(&doc).expect_err("bad base64");
        assert!(err.to_string().contains("background has an unusable embedded image"));
    }
}
