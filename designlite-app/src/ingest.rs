//! Turning user-picked image files into embeddable image sources.

use std::path::{Path, PathBuf};

use designlite_core::ImageSource;
use designlite_renderer::{prepare_image, RenderError};
use thiserror::Error;

/// Errors while ingesting an image file.
#[derive(Debug, Error)]
pub enum IngestError {
    /// The file could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        /// File that was being read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The bytes are not a decodable image.
    #[error("not a usable image: {0}")]
    Invalid(#[from] RenderError),
}

/// Validate image bytes and wrap them in a base64 `data:` URI.
///
/// Raster formats the exporter cannot draw directly arrive as PNG.
///
/// # Errors
///
/// Returns [`IngestError::Invalid`] if the bytes are not a decodable raster
/// image. SVG and AVIF uploads land here.
pub fn image_source_from_bytes(bytes: &[u8]) -> Result<ImageSource, IngestError> {
    let image = prepare_image(bytes)?;
    tracing::debug!(
        width = image.info.width,
        height = image.info.height,
        format = ?image.info.format,
        transcoded = image.transcoded,
        "ingested image"
    );
    Ok(ImageSource::new(image.to_data_uri()))
}

/// Read and validate an image file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not an image.
pub async fn read_image(path: &Path) -> Result<ImageSource, IngestError> {
    let bytes = tokio::fs::read(path).await.map_err(|source| IngestError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    image_source_from_bytes(&bytes)
}

/// Ingest an optional file pick.
///
/// No file is a no-op. Read or decode failures are logged and also yield
/// `None`, leaving the document untouched.
pub async fn ingest_file(path: Option<&Path>) -> Option<ImageSource> {
    let path = path?;
    match read_image(path).await {
        Ok(source) => Some(source),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "ignoring image upload");
            None
        }
    }
}
