//! Writing exports to disk.
//!
//! Rasterization is CPU-bound and runs on the blocking pool. Every format goes
//! through [`ExportService::export`], so every failure surfaces the same way.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use designlite_core::Document;
use designlite_renderer::{DocumentExporter, ExportConfig, ExportFormat, RenderError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// File name stem of every export.
pub const EXPORT_FILE_STEM: &str = "design-export";

/// Errors while exporting.
#[derive(Debug, Error)]
pub enum ExportError {
    /// The document could not be rendered or encoded.
    #[error("rendering failed: {0}")]
    Render(#[from] RenderError),
    /// The output file could not be written.
    #[error("failed to write {path}: {source}")]
    Io {
        /// Destination path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The blocking render task panicked or was cancelled.
    #[error("export task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Severity of a user-facing notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    /// Something completed.
    Info,
    /// Something failed; the session is still usable.
    Error,
}

/// A message for the host to show the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    /// Severity.
    pub level: NoticeLevel,
    /// Human-readable text.
    pub message: String,
}

impl Notice {
    /// An informational notice.
    #[must_use]
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }

    /// An error notice.
    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }

    /// The notice shown after an export was written to `path`.
    #[must_use]
    pub fn exported(format: ExportFormat, path: &Path) -> Self {
        Self::info(format!(
            "Saved {} to {}",
            format.extension().to_uppercase(),
            path.display()
        ))
    }

    /// The notice shown when exporting to `format` fails.
    #[must_use]
    pub fn export_failed(format: ExportFormat, error: &ExportError) -> Self {
        Self::error(format!(
            "Could not export {}. {error}",
            format.extension().to_uppercase()
        ))
    }
}

/// File name for an export in `format`, e.g. `design-export.png`.
#[must_use]
pub fn export_file_name(format: ExportFormat) -> String {
    format!("{EXPORT_FILE_STEM}.{}", format.extension())
}

/// Renders documents and writes them into a directory.
#[derive(Debug, Clone)]
pub struct ExportService {
    exporter: Arc<DocumentExporter>,
    dir: PathBuf,
}

impl ExportService {
    /// Create a service writing into `dir`.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>, config: ExportConfig) -> Self {
        Self {
            exporter: Arc::new(DocumentExporter::new(config)),
            dir: dir.into(),
        }
    }

    /// Build a service from application configuration.
    #[must_use]
    pub fn from_config(config: &crate::AppConfig) -> Self {
        Self::new(
            config.export_dir.clone(),
            ExportConfig {
                scale: config.export_scale,
                ..ExportConfig::default()
            },
        )
    }

    /// Target directory.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Render `doc` to `format` without writing it.
    ///
    /// # Errors
    ///
    /// Returns an error if rendering fails.
    pub async fn render(&self, doc: Document, format: ExportFormat) -> Result<Vec<u8>, ExportError> {
        let exporter = Arc::clone(&self.exporter);
        let bytes = tokio::task::spawn_blocking(move || exporter.export(&doc, format)).await??;
        Ok(bytes)
    }

    /// Render `doc` to `format` and write it to `design-export.<ext>`.
    ///
    /// Returns the written path.
    ///
    /// # Errors
    ///
    /// Returns an error if rendering or writing fails.
    pub async fn export(&self, doc: Document, format: ExportFormat) -> Result<PathBuf, ExportError> {
        let bytes = self.render(doc, format).await?;
        let path = self.dir.join(export_file_name(format));
        tokio::fs::write(&path, &bytes)
            .await
            .map_err(|source| ExportError::Io {
                path: path.clone(),
                source,
            })?;

        tracing::info!(path = %path.display(), bytes = bytes.len(), ?format, "exported design");
        Ok(path)
    }
}
