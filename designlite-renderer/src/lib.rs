//! # DesignLite Renderer
//!
//! Turns a document into something that can leave the editor.
//!
//! ## Pipeline
//!
//! ```text
//! ┌──────────┐    ┌─────────┐    ┌──────────────┐    ┌───────────┐
//! │ Document │ -> │   SVG   │ -> │ resvg pixmap │ -> │ PNG / JPEG│
//! └──────────┘    └─────────┘    └──────────────┘    └─────┬─────┘
//!                                                          v
//!                                                    ┌───────────┐
//!                                                    │  A4 PDF   │
//!                                                    └───────────┘
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
#[cfg(feature = "export")]
pub mod export;
pub mod image;
pub mod svg;

pub use error::{RenderError, RenderResult};
#[cfg(feature = "export")]
pub use export::{a4_placement, DocumentExporter, ExportConfig, ExportFormat, PdfPlacement};
pub use crate::image::{
    check_embedded_images, decode_data_uri, encode_data_uri, prepare_image, probe_image, DataUri,
    ImageFormat, ImageInfo, PreparedImage,
};
pub use svg::document_to_svg;
