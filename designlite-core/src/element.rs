//! Canvas elements - the placeable units of a document.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::geometry::{Point, Size};

/// Unique identifier for an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementId(Uuid);

impl ElementId {
    /// Create a new unique element ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse an element ID from its string form.
    ///
    /// # Errors
    ///
    /// Returns an error if the string is not a valid UUID.
    pub fn parse(s: &str) -> Result<Self, uuid::Error> {
        Uuid::parse_str(s).map(Self)
    }
}

impl Default for ElementId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ElementId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The plain tag of an element kind, used to pick per-kind defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementType {
    /// Editable text box.
    Text,
    /// Image referenced by URL or data URI.
    Image,
}

/// Reference to image content: a remote URL or an embedded `data:` URI.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImageSource(String);

impl ImageSource {
    /// Wrap a URL or data URI.
    #[must_use]
    pub fn new(src: impl Into<String>) -> Self {
        Self(src.into())
    }

    /// The reference as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the image bytes are embedded in the reference itself.
    #[must_use]
    pub fn is_data_uri(&self) -> bool {
        self.0.starts_with("data:")
    }
}

impl From<&str> for ImageSource {
    fn from(src: &str) -> Self {
        Self::new(src)
    }
}

impl From<String> for ImageSource {
    fn from(src: String) -> Self {
        Self(src)
    }
}

/// The content an element carries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ElementKind {
    /// A text box.
    Text {
        /// Text content.
        content: String,
    },

    /// An image.
    Image {
        /// Image URL or data URI.
        src: ImageSource,
    },
}

impl ElementKind {
    /// The plain tag for this kind.
    #[must_use]
    pub fn element_type(&self) -> ElementType {
        match self {
            Self::Text { .. } => ElementType::Text,
            Self::Image { .. } => ElementType::Image,
        }
    }

    /// Text content, if this is a text element.
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Text { content } => Some(content),
            Self::Image { .. } => None,
        }
    }

    /// Image reference, if this is an image element.
    #[must_use]
    pub fn image_source(&self) -> Option<&ImageSource> {
        match self {
            Self::Image { src } => Some(src),
            Self::Text { .. } => None,
        }
    }
}

/// Position, size, and rotation of an element.
///
/// `x`/`y` locate the top-left corner of the unrotated box in canvas-local
/// coordinates. Rotation is applied around the box center, in degrees, and is
/// never normalized.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    /// X position (pixels from left).
    pub x: f64,
    /// Y position (pixels from top).
    pub y: f64,
    /// Width in pixels.
    pub width: f64,
    /// Height in pixels.
    pub height: f64,
    /// Clockwise rotation in degrees.
    pub rotation: f64,
}

impl Transform {
    /// Top-left corner.
    #[must_use]
    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Unrotated dimensions.
    #[must_use]
    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Center of the box, which is also the rotation pivot.
    #[must_use]
    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            width: 100.0,
            height: 100.0,
            rotation: 0.0,
        }
    }
}

/// Open style attribute set shared by every element kind.
///
/// Every field is optional; which fields apply to which kind is decided by
/// the editing UI, not here. The same type doubles as a style patch: merging
/// copies only the fields that are set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Style {
    /// Foreground (text) color.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// Fill behind the content.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    /// Font size in pixels.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f64>,
    /// CSS font family list.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,
    /// CSS font weight (`normal`, `bold`, ...).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_weight: Option<String>,
    /// Opacity between 0 and 1.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
    /// Corner radius between 0 and 100.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border_radius: Option<f64>,
}

impl Style {
    /// Copy every field set in `patch` over `self`, leaving the rest alone.
    pub fn merge_from(&mut self, patch: &StylePatch) {
        if let Some(ref color) = patch.color {
            self.color = Some(color.clone());
        }
        if let Some(ref bg) = patch.background_color {
            self.background_color = Some(bg.clone());
        }
        if let Some(size) = patch.font_size {
            self.font_size = Some(size);
        }
        if let Some(ref family) = patch.font_family {
            self.font_family = Some(family.clone());
        }
        if let Some(ref weight) = patch.font_weight {
            self.font_weight = Some(weight.clone());
        }
        if let Some(opacity) = patch.opacity {
            self.opacity = Some(opacity);
        }
        if let Some(radius) = patch.border_radius {
            self.border_radius = Some(radius);
        }
    }

    /// Whether the font weight is bold: `bold`, `bolder`, or a numeric
    /// weight of 600 and up.
    #[must_use]
    pub fn is_bold(&self) -> bool {
        match self.font_weight.as_deref().map(str::trim) {
            Some("bold" | "bolder") => true,
            Some(weight) => weight.parse::<u16>().is_ok_and(|w| w >= 600),
            None => false,
        }
    }
}

/// A style used as a patch: only the fields that are set get merged.
pub type StylePatch = Style;

/// Sparse update for an element. Only present fields are applied.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ElementPatch {
    /// New x position.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    /// New y position.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    /// New width.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    /// New height.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    /// New rotation in degrees.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotation: Option<f64>,
    /// New text (text elements) or image reference (image elements).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    /// Style fields to merge.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<StylePatch>,
}

impl ElementPatch {
    /// Patch that moves the top-left corner.
    #[must_use]
    pub fn position(point: Point) -> Self {
        Self {
            x: Some(point.x),
            y: Some(point.y),
            ..Self::default()
        }
    }

    /// Patch that changes the unrotated dimensions.
    #[must_use]
    pub fn size(size: Size) -> Self {
        Self {
            width: Some(size.width),
            height: Some(size.height),
            ..Self::default()
        }
    }

    /// Patch that sets the rotation.
    #[must_use]
    pub fn rotation(degrees: f64) -> Self {
        Self {
            rotation: Some(degrees),
            ..Self::default()
        }
    }

    /// Patch that replaces the content.
    #[must_use]
    pub fn content(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            ..Self::default()
        }
    }

    /// Patch that merges style fields.
    #[must_use]
    pub fn style(style: StylePatch) -> Self {
        Self {
            style: Some(style),
            ..Self::default()
        }
    }

    /// Whether applying the patch would change nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// A canvas element with content, geometry, and style.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    /// Unique identifier.
    pub id: ElementId,
    /// Element content.
    pub kind: ElementKind,
    /// Position, size, and rotation.
    pub transform: Transform,
    /// Style attributes.
    #[serde(default)]
    pub style: Style,
}

impl Element {
    /// Create a new element with the given kind.
    #[must_use]
    pub fn new(kind: ElementKind) -> Self {
        Self {
            id: ElementId::new(),
            kind,
            transform: Transform::default(),
            style: Style::default(),
        }
    }

    /// Set the transform.
    #[must_use]
    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    /// Set the style.
    #[must_use]
    pub fn with_style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    /// The plain tag of this element's kind.
    #[must_use]
    pub fn element_type(&self) -> ElementType {
        self.kind.element_type()
    }

    /// A new element value with `patch` merged over this one.
    #[must_use]
    pub fn merged(&self, patch: &ElementPatch) -> Self {
        let mut next = self.clone();
        let t = &mut next.transform;
        if let Some(x) = patch.x {
            t.x = x;
        }
        if let Some(y) = patch.y {
            t.y = y;
        }
        if let Some(w) = patch.width {
            t.width = w;
        }
        if let Some(h) = patch.height {
            t.height = h;
        }
        if let Some(r) = patch.rotation {
            t.rotation = r;
        }
        if let Some(ref content) = patch.content {
            next.kind = match next.kind {
                ElementKind::Text { .. } => ElementKind::Text {
                    content: content.clone(),
                },
                ElementKind::Image { .. } => ElementKind::Image {
                    src: ImageSource::new(content.clone()),
                },
            };
        }
        if let Some(ref style) = patch.style {
            next.style.merge_from(style);
        }
        next
    }

    /// Check if a canvas point falls inside the element, honoring rotation.
    #[must_use]
    pub fn contains_point(&self, x: f64, y: f64) -> bool {
        let t = &self.transform;
        let center = t.center();
        let local = crate::geometry::to_local_frame(Point::new(x, y) - center, t.rotation);
        local.x.abs() <= t.width / 2.0 && local.y.abs() <= t.height / 2.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(content: &str) -> Element {
        Element::new(ElementKind::Text {
            content: content.to_string(),
        })
    }

    #[test]
    fn test_element_ids_are_unique() {
        assert_ne!(ElementId::new(), ElementId::new());
    }

    #[test]
    fn test_element_id_parse_roundtrip() {
        let id = ElementId::new();
        let parsed = ElementId::parse(&id.to_string()).expect("valid uuid");
        assert_eq!(id, parsed);
        assert!(ElementId::parse("not-a-uuid").is_err());
    }

    #[test]
    fn test_merge_keeps_unrelated_fields() {
        let el = text("hello").with_transform(Transform {
            x: 10.0,
            y: 20.0,
            width: 300.0,
            height: 60.0,
            rotation: 15.0,
        });
        let next = el.merged(&ElementPatch::position(Point::new(1.0, 2.0)));
        assert_eq!(next.transform.x, 1.0);
        assert_eq!(next.transform.y, 2.0);
        assert_eq!(next.transform.width, 300.0);
        assert_eq!(next.transform.rotation, 15.0);
        assert_eq!(next.kind.text(), Some("hello"));
        // the original value is untouched
        assert_eq!(el.transform.x, 10.0);
    }

    #[test]
    fn test_content_patch_respects_kind() {
        let el = text("before").merged(&ElementPatch::content("after"));
        assert_eq!(el.kind.text(), Some("after"));

        let img = Element::new(ElementKind::Image {
            src: ImageSource::new("https://example.com/a.png"),
        })
        .merged(&ElementPatch::content("data:image/png;base64,AAAA"));
        assert_eq!(img.element_type(), ElementType::Image);
        assert!(img.kind.image_source().is_some_and(ImageSource::is_data_uri));
    }

    #[test]
    fn test_style_merge_does_not_clobber() {
        let mut style = Style {
            color: Some("#334155".into()),
            font_size: Some(24.0),
            font_family: Some("Inter, sans-serif".into()),
            ..Style::default()
        };
        style.merge_from(&Style {
            opacity: Some(0.5),
            ..Style::default()
        });
        assert_eq!(style.color.as_deref(), Some("#334155"));
        assert_eq!(style.font_size, Some(24.0));
        assert_eq!(style.opacity, Some(0.5));
    }

    #[test]
    fn test_contains_point_axis_aligned() {
        let el = text("x").with_transform(Transform {
            x: 100.0,
            y: 100.0,
            width: 200.0,
            height: 50.0,
            rotation: 0.0,
        });
        assert!(el.contains_point(150.0, 125.0));
        assert!(!el.contains_point(50.0, 50.0));
    }

    #[test]
    fn test_contains_point_rotated() {
        // 200x20 bar centered on (200, 200), rotated to stand upright
        let el = text("x").with_transform(Transform {
            x: 100.0,
            y: 190.0,
            width: 200.0,
            height: 20.0,
            rotation: 90.0,
        });
        assert!(el.contains_point(200.0, 280.0));
        assert!(!el.contains_point(280.0, 200.0));
    }

    #[test]
    fn test_style_serializes_camel_case_and_skips_unset() {
        let style = Style {
            background_color: Some("#fff".into()),
            ..Style::default()
        };
        let json = serde_json::to_string(&style).expect("serialize");
        assert_eq!(json, r##"{"backgroundColor":"#fff"}"##);
    }

    #[test]
    fn test_kind_serializes_tagged() {
        let json = serde_json::to_value(ElementKind::Text {
            content: "hi".into(),
        })
        .expect("serialize");
        assert_eq!(json["type"], "text");
        assert_eq!(json["content"], "hi");
    }

    #[test]
    fn test_bold_weights() {
        let weight = |w: &str| Style {
            font_weight: Some(w.into()),
            ..Style::default()
        };
        assert!(weight("bold").is_bold());
        assert!(weight("700").is_bold());
        assert!(weight(" 600 ").is_bold());
        assert!(!weight("normal").is_bold());
        assert!(!weight("400").is_bold());
        assert!(!Style::default().is_bold());
    }

    #[test]
    fn test_empty_patch() {
        assert!(ElementPatch::default().is_empty());
        assert!(!ElementPatch::rotation(0.0).is_empty());
    }
}
