//! SVG serialization of a document.
//!
//! The output mirrors what the editor shows: the canvas fill, a cover-fitted
//! background image, then every element in z-order, rotated about its
//! center and clipped to its (optionally rounded) box. Images are
//! cover-fitted too. Text is centered in the box with 8px padding and
//! wrapped on word boundaries.

use std::fmt::Write;

use designlite_core::{Document, Element, ElementKind, Style};

/// Inner padding of text boxes, in pixels.
const TEXT_PADDING: f64 = 8.0;

/// Line height as a multiple of the font size.
const LINE_HEIGHT: f64 = 1.2;

/// Average glyph advance as a multiple of the font size, used for wrapping.
const GLYPH_ADVANCE: f64 = 0.55;

/// Font size when the style leaves it unset.
const FALLBACK_FONT_SIZE: f64 = 16.0;

/// Serialize `doc` to SVG at `scale` output pixels per canvas pixel.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn document_to_svg(doc: &Document, scale: f64) -> String {
    let (w, h) = (doc.width(), doc.height());
    let out_w = (w * scale).round().max(1.0) as u32;
    let out_h = (h * scale).round().max(1.0) as u32;

    let mut svg = String::with_capacity(4096);
    let _ = write!(
        svg,
        "<svg xmlns=\"http://www.w3.org/2000/svg\" xmlns:xlink=\"http://www.w3.org/1999/xlink\" width=\"{out_w}\" height=\"{out_h}\" viewBox=\"0 0 {w} {h}\">",
    );

    let _ = write!(
        svg,
        "<rect width=\"{w}\" height=\"{h}\" fill=\"{}\"/>",
        escape_xml(&doc.background_color),
    );

    if let Some(bg) = &doc.background_image {
        let _ = write!(
            svg,
            "<image x=\"0\" y=\"0\" width=\"{w}\" height=\"{h}\" preserveAspectRatio=\"xMidYMid slice\" xlink:href=\"{}\"/>",
            escape_xml(bg.as_str()),
        );
    }

    for (index, element) in doc.elements().iter().enumerate() {
        render_element_svg(&mut svg, index, element);
    }

    svg.push_str("</svg>");
    svg
}

/// Render a single element to SVG.
fn render_element_svg(svg: &mut String, index: usize, element: &Element) {
    let t = &element.transform;
    let style = &element.style;
    let center = t.center();
    let rotation = t.rotation.rem_euclid(360.0);
    let opacity = style.opacity.unwrap_or(1.0).clamp(0.0, 1.0);
    let radius = style.border_radius.unwrap_or(0.0).clamp(0.0, 100.0);

    let _ = write!(
        svg,
        "<g transform=\"rotate({rotation} {} {})\" opacity=\"{opacity}\">",
        center.x, center.y,
    );
    let _ = write!(
        svg,
        "<clipPath id=\"clip-{index}\"><rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" rx=\"{radius}\" ry=\"{radius}\"/></clipPath>",
        t.x, t.y, t.width, t.height,
    );
    let _ = write!(svg, "<g clip-path=\"url(#clip-{index})\">");

    if let Some(fill) = &style.background_color {
        let _ = write!(
            svg,
            "<rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" fill=\"{}\"/>",
            t.x,
            t.y,
            t.width,
            t.height,
            escape_xml(fill),
        );
    }

    match &element.kind {
        ElementKind::Image { src } => {
            if !src.as_str().is_empty() {
                let _ = write!(
                    svg,
                    "<image x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" preserveAspectRatio=\"xMidYMid slice\" xlink:href=\"{}\"/>",
                    t.x,
                    t.y,
                    t.width,
                    t.height,
                    escape_xml(src.as_str()),
                );
            }
        }
        ElementKind::Text { content } => render_text_svg(svg, element, content, style),
    }

    svg.push_str("</g></g>");
}

#[allow(clippy::cast_precision_loss)]
fn render_text_svg(svg: &mut String, element: &Element, content: &str, style: &Style) {
    let t = &element.transform;
    let font_size = style.font_size.unwrap_or(FALLBACK_FONT_SIZE);
    let lines = wrap_text(content, t.width - TEXT_PADDING * 2.0, font_size);
    if lines.is_empty() {
        return;
    }

    let center = t.center();
    let line_height = font_size * LINE_HEIGHT;
    // the 0.35em shift puts the x-height, not the baseline, on the line center
    let first_baseline =
        center.y - (lines.len() - 1) as f64 * line_height / 2.0 + font_size * 0.35;

    let _ = write!(
        svg,
        "<text text-anchor=\"middle\" font-size=\"{font_size}\" font-family=\"{}\" font-weight=\"{}\" fill=\"{}\">",
        escape_xml(style.font_family.as_deref().unwrap_or("sans-serif")),
        if style.is_bold() { "bold" } else { "normal" },
        escape_xml(style.color.as_deref().unwrap_or("#000000")),
    );
    for (i, line) in lines.iter().enumerate() {
        let y = first_baseline + i as f64 * line_height;
        let _ = write!(
            svg,
            "<tspan x=\"{}\" y=\"{y}\">{}</tspan>",
            center.x,
            escape_xml(line),
        );
    }
    svg.push_str("</text>");
}

/// Greedy word wrap against an estimated glyph width.
///
/// Explicit newlines always break. A word wider than the line stays whole.
#[must_use]
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
pub fn wrap_text(content: &str, max_width: f64, font_size: f64) -> Vec<String> {
    let max_chars = (max_width / (font_size * GLYPH_ADVANCE)).floor().max(1.0) as usize;

    let mut lines = Vec::new();
    for paragraph in content.lines() {
        let mut current = String::new();
        for word in paragraph.split_whitespace() {
            let needed = if current.is_empty() {
                word.chars().count()
            } else {
                current.chars().count() + 1 + word.chars().count()
            };
            if needed > max_chars && !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            if !current.is_empty() {
                current.push(' ');
            }
            current.push_str(word);
        }
        lines.push(current);
    }

    while lines.last().is_some_and(String::is_empty) {
        lines.pop();
    }
    lines
}

/// Escape special XML characters.
fn escape_xml(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
