//! Editor configuration: canvas dimensions, per-kind defaults, and resize
//! limits.

use serde::{Deserialize, Serialize};

use crate::element::{ElementType, Style};
use crate::geometry::Size;

/// Default canvas width in pixels.
pub const DEFAULT_CANVAS_WIDTH: f64 = 800.0;

/// Default canvas height in pixels.
pub const DEFAULT_CANVAS_HEIGHT: f64 = 600.0;

/// Default canvas fill.
pub const DEFAULT_BACKGROUND_COLOR: &str = "#ffffff";

/// Smallest width the resize gesture can produce.
pub const MIN_ELEMENT_WIDTH: f64 = 50.0;

/// Smallest height the resize gesture can produce.
pub const MIN_ELEMENT_HEIGHT: f64 = 20.0;

/// Placeholder content for new text boxes.
pub const DEFAULT_TEXT_CONTENT: &str = "Double click to edit";

/// Font choices offered by the property editor as `(label, css family)`.
pub const FONTS: [(&str, &str); 4] = [
    ("Inter", "Inter, sans-serif"),
    ("Serif", "\"Playfair Display\", serif"),
    ("Mono", "\"Roboto Mono\", monospace"),
    ("System", "sans-serif"),
];

/// Color swatches offered by the property editor.
pub const PALETTE: [&str; 14] = [
    "#000000", "#ffffff", "#ef4444", "#f97316", "#f59e0b", "#84cc16", "#10b981", "#06b6d4",
    "#3b82f6", "#6366f1", "#8b5cf6", "#d946ef", "#f43f5e", "#334155",
];

/// Geometry and style a freshly inserted element starts with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementDefaults {
    /// Initial unrotated size.
    pub size: Size,
    /// Initial style.
    pub style: Style,
}

/// Configuration for a document and its editor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditorConfig {
    /// Canvas width in pixels.
    pub canvas_width: f64,
    /// Canvas height in pixels.
    pub canvas_height: f64,
    /// Canvas fill color.
    pub background_color: String,
    /// Defaults for text elements.
    pub text: ElementDefaults,
    /// Defaults for image elements.
    pub image: ElementDefaults,
    /// Lower bound on width and height for the resize gesture.
    pub min_size: Size,
}

impl EditorConfig {
    /// Create a configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self {
            canvas_width: DEFAULT_CANVAS_WIDTH,
            canvas_height: DEFAULT_CANVAS_HEIGHT,
            background_color: DEFAULT_BACKGROUND_COLOR.to_string(),
            text: ElementDefaults {
                size: Size::new(300.0, 60.0),
                style: Style {
                    color: Some("#334155".to_string()),
                    font_size: Some(24.0),
                    font_family: Some(FONTS[0].1.to_string()),
                    font_weight: Some("normal".to_string()),
                    ..Style::default()
                },
            },
            image: ElementDefaults {
                size: Size::new(300.0, 300.0),
                style: Style {
                    border_radius: Some(0.0),
                    ..Style::default()
                },
            },
            min_size: Size::new(MIN_ELEMENT_WIDTH, MIN_ELEMENT_HEIGHT),
        }
    }

    /// Set the canvas dimensions.
    #[must_use]
    pub fn with_canvas_size(mut self, width: f64, height: f64) -> Self {
        self.canvas_width = width;
        self.canvas_height = height;
        self
    }

    /// Set the canvas fill color.
    #[must_use]
    pub fn with_background_color(mut self, color: impl Into<String>) -> Self {
        self.background_color = color.into();
        self
    }

    /// Defaults for the given kind.
    #[must_use]
    pub fn defaults_for(&self, kind: ElementType) -> &ElementDefaults {
        match kind {
            ElementType::Text => &self.text,
            ElementType::Image => &self.image,
        }
    }
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_size_table() {
        let config = EditorConfig::default();
        assert_eq!(config.defaults_for(ElementType::Text).size, Size::new(300.0, 60.0));
        assert_eq!(config.defaults_for(ElementType::Image).size, Size::new(300.0, 300.0));
        assert_eq!(config.min_size, Size::new(50.0, 20.0));
    }

    #[test]
    fn test_text_defaults_are_styled() {
        let config = EditorConfig::default();
        let style = &config.text.style;
        assert_eq!(style.color.as_deref(), Some("#334155"));
        assert_eq!(style.font_size, Some(24.0));
        assert!(!style.is_bold());
        assert_eq!(config.image.style.border_radius, Some(0.0));
    }

    #[test]
    fn test_builder_overrides() {
        let config = EditorConfig::new()
            .with_canvas_size(1024.0, 768.0)
            .with_background_color("#000000");
        assert_eq!(config.canvas_width, 1024.0);
        assert_eq!(config.background_color, "#000000");
    }

    #[test]
    fn test_config_json_roundtrip() {
        let config = EditorConfig::default();
        let json = serde_json::to_string(&config).expect("serialize");
        let back: EditorConfig = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(config, back);
    }
}
