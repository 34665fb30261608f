//! Document export to image and print formats.
//!
//! Renders a [`Document`] to PNG, JPEG, SVG, or PDF using the SVG from
//! [`crate::svg`] and the resvg/tiny-skia rasterization pipeline. PDF output
//! places the PNG capture on a single A4 page.

use std::sync::Arc;

use designlite_core::Document;
use image::ImageEncoder;
use serde::{Deserialize, Serialize};

use crate::error::{RenderError, RenderResult};
use crate::image::check_embedded_images;
use crate::svg::document_to_svg;

/// A4 short side in millimetres.
pub const A4_SHORT_MM: f64 = 210.0;

/// A4 long side in millimetres.
pub const A4_LONG_MM: f64 = 297.0;

const MM_PER_INCH: f64 = 25.4;

/// Export output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    /// PNG image.
    Png,
    /// JPEG image.
    Jpeg,
    /// SVG vector graphics (returns the SVG XML string as UTF-8 bytes).
    Svg,
    /// PDF document with embedded raster image.
    Pdf,
}

impl ExportFormat {
    /// File extension without the dot.
    #[must_use]
    pub fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpeg",
            Self::Svg => "svg",
            Self::Pdf => "pdf",
        }
    }

    /// MIME type of the encoded output.
    #[must_use]
    pub fn mime_type(self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
            Self::Svg => "image/svg+xml",
            Self::Pdf => "application/pdf",
        }
    }
}

/// Configuration for document export.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ExportConfig {
    /// Output pixels per canvas pixel (default: 2.0).
    pub scale: f64,
    /// Pixel density assumed when embedding the capture in a PDF (default: 96.0).
    pub dpi: f64,
    /// Color that transparent pixels are flattened onto for JPEG, as RGBA bytes.
    pub background: [u8; 4],
    /// JPEG quality 1-100 (default: 90).
    pub jpeg_quality: u8,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            scale: 2.0,
            dpi: 96.0,
            background: [255, 255, 255, 255],
            jpeg_quality: 90,
        }
    }
}

/// Where a capture lands on an A4 page, in millimetres from the top-left.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PdfPlacement {
    /// Whether the page is landscape.
    pub landscape: bool,
    /// Page width.
    pub page_width: f64,
    /// Page height.
    pub page_height: f64,
    /// Left edge of the image.
    pub x: f64,
    /// Top edge of the image.
    pub y: f64,
    /// Image width.
    pub width: f64,
    /// Image height.
    pub height: f64,
}

/// Fit a `px_width` x `px_height` capture onto A4.
///
/// The page is landscape when the capture is wider than tall. The image is
/// 210mm wide, shrunk to the page height if it would overflow, keeps its
/// aspect ratio, and is centered.
#[must_use]
pub fn a4_placement(px_width: u32, px_height: u32) -> PdfPlacement {
    let px_w = f64::from(px_width.max(1));
    let px_h = f64::from(px_height.max(1));

    let landscape = px_w > px_h;
    let (page_width, page_height) = if landscape {
        (A4_LONG_MM, A4_SHORT_MM)
    } else {
        (A4_SHORT_MM, A4_LONG_MM)
    };

    let mut width = A4_SHORT_MM;
    let mut height = px_h * width / px_w;
    if height > page_height {
        height = page_height;
        width = px_w * height / px_h;
    }

    PdfPlacement {
        landscape,
        page_width,
        page_height,
        x: (page_width - width) / 2.0,
        y: (page_height - height) / 2.0,
        width,
        height,
    }
}

/// Exports a [`Document`] to various image and document formats.
pub struct DocumentExporter {
    config: ExportConfig,
    fontdb: Arc<usvg::fontdb::Database>,
}

impl std::fmt::Debug for DocumentExporter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocumentExporter")
            .field("config", &self.config)
            .field("font_faces", &self.fontdb.len())
            .finish()
    }
}

impl DocumentExporter {
    /// Create a new exporter with the given configuration.
    ///
    /// System fonts are loaded once here and reused for every export.
    #[must_use]
    pub fn new(config: ExportConfig) -> Self {
        let mut db = usvg::fontdb::Database::new();
        db.load_system_fonts();
        tracing::debug!(faces = db.len(), "loaded fonts for export");
        Self {
            config,
            fontdb: Arc::new(db),
        }
    }

    /// Create an exporter with default configuration.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(ExportConfig::default())
    }

    /// The active configuration.
    #[must_use]
    pub fn config(&self) -> &ExportConfig {
        &self.config
    }

    /// Export a document to the specified format.
    ///
    /// Embedded `data:` images are decoded first, so a malformed one fails
    /// the export instead of silently vanishing from the output.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::Resource`] for a malformed embedded image, or an
    /// error if the document cannot be rendered or encoded.
    pub fn export(&self, doc: &Document, format: ExportFormat) -> RenderResult<Vec<u8>> {
        check_embedded_images(doc)?;
        match format {
            ExportFormat::Png => self.render_to_png(doc),
            ExportFormat::Jpeg => self.render_to_jpeg(doc),
            ExportFormat::Svg => Ok(self.render_to_svg(doc).into_bytes()),
            ExportFormat::Pdf => self.render_to_pdf(doc),
        }
    }

    /// Export the document to an SVG string.
    #[must_use]
    pub fn render_to_svg(&self, doc: &Document) -> String {
        document_to_svg(doc, self.config.scale)
    }

    /// Export the document to PNG bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if rendering or encoding fails.
    pub fn render_to_png(&self, doc: &Document) -> RenderResult<Vec<u8>> {
        let pixmap = self.rasterize(doc)?;

        pixmap
            .encode_png()
            .map_err(|e| RenderError::Export(format!("PNG encoding failed: {e}")))
    }

    /// Export the document to JPEG bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if rendering or encoding fails.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn render_to_jpeg(&self, doc: &Document) -> RenderResult<Vec<u8>> {
        let pixmap = self.rasterize(doc)?;

        let (width, height) = (pixmap.width(), pixmap.height());
        let bg = &self.config.background;
        let mut rgb_data = Vec::with_capacity((width * height * 3) as usize);
        // tiny-skia stores premultiplied RGBA
        for pixel in pixmap.data().chunks_exact(4) {
            let inv = 1.0 - f32::from(pixel[3]) / 255.0;
            rgb_data.push(f32::from(bg[0]).mul_add(inv, f32::from(pixel[0])) as u8);
            rgb_data.push(f32::from(bg[1]).mul_add(inv, f32::from(pixel[1])) as u8);
            rgb_data.push(f32::from(bg[2]).mul_add(inv, f32::from(pixel[2])) as u8);
        }

        let mut buf = std::io::Cursor::new(Vec::new());
        let encoder =
            image::codecs::jpeg::JpegEncoder::new_with_quality(&mut buf, self.config.jpeg_quality);
        encoder
            .write_image(&rgb_data, width, height, image::ExtendedColorType::Rgb8)
            .map_err(|e| RenderError::Export(format!("JPEG encoding failed: {e}")))?;

        Ok(buf.into_inner())
    }

    /// Export the document to a single-page A4 PDF.
    ///
    /// # Errors
    ///
    /// Returns an error if rendering or PDF generation fails.
    #[allow(clippy::cast_possible_truncation)]
    pub fn render_to_pdf(&self, doc: &Document) -> RenderResult<Vec<u8>> {
        let png_data = self.render_to_png(doc)?;

        // Decode PNG using printpdf's bundled image crate for compatibility
        let dynamic_image = printpdf::image_crate::load_from_memory(&png_data)
            .map_err(|e| RenderError::Export(format!("Failed to decode PNG for PDF: {e}")))?;
        let (px_w, px_h) = (dynamic_image.width(), dynamic_image.height());

        let placement = a4_placement(px_w, px_h);
        tracing::debug!(
            landscape = placement.landscape,
            width_mm = placement.width,
            height_mm = placement.height,
            "placing capture on A4"
        );

        let (pdf, page, layer) = printpdf::PdfDocument::new(
            "Design Export",
            printpdf::Mm(placement.page_width as f32),
            printpdf::Mm(placement.page_height as f32),
            "Layer 1",
        );
        let current_layer = pdf.get_page(page).get_layer(layer);

        let pdf_image = printpdf::Image::from_dynamic_image(&dynamic_image);

        // natural size at the configured dpi, scaled to the placement width
        let natural_width_mm = f64::from(px_w) / self.config.dpi * MM_PER_INCH;
        let scale = placement.width / natural_width_mm;

        // PDF space grows upwards from the bottom-left corner
        let bottom = placement.page_height - placement.y - placement.height;

        let transform = printpdf::ImageTransform {
            translate_x: Some(printpdf::Mm(placement.x as f32)),
            translate_y: Some(printpdf::Mm(bottom as f32)),
            scale_x: Some(scale as f32),
            scale_y: Some(scale as f32),
            dpi: Some(self.config.dpi as f32),
            ..Default::default()
        };

        pdf_image.add_to_layer(current_layer, transform);

        pdf.save_to_bytes()
            .map_err(|e| RenderError::Export(format!("PDF save failed: {e}")))
    }

    /// Rasterize the document to a tiny-skia Pixmap.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn rasterize(&self, doc: &Document) -> RenderResult<tiny_skia::Pixmap> {
        let svg_string = self.render_to_svg(doc);
        let opt = usvg::Options {
            fontdb: Arc::clone(&self.fontdb),
            ..Default::default()
        };
        let tree = usvg::Tree::from_str(&svg_string, &opt)
            .map_err(|e| RenderError::Export(format!("SVG parsing failed: {e}")))?;

        let px_w = tree.size().width().round() as u32;
        let px_h = tree.size().height().round() as u32;

        let mut pixmap = tiny_skia::Pixmap::new(px_w.max(1), px_h.max(1))
            .ok_or_else(|| RenderError::Export("Failed to create pixmap".to_string()))?;

        resvg::render(&tree, tiny_skia::Transform::default(), &mut pixmap.as_mut());

        Ok(pixmap)
    }
}
