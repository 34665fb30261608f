//! The canvas document: ordered elements, selection, and background.

use serde::{Deserialize, Serialize};

use crate::config::EditorConfig;
use crate::{EditorError, EditorResult, Element, ElementId, ElementPatch, ImageSource};

/// A canvas containing all placed elements.
///
/// Element order is z-order: later elements are drawn on top.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    /// Elements in drawing order.
    elements: Vec<Element>,
    /// Currently selected element, if any. May dangle; see [`Document::selected_element`].
    selected_id: Option<ElementId>,
    /// Background image reference.
    pub background_image: Option<ImageSource>,
    /// Canvas fill drawn beneath the background image.
    pub background_color: String,
    /// Canvas width in pixels.
    width: f64,
    /// Canvas height in pixels.
    height: f64,
}

impl Document {
    /// Create an empty document with the given canvas size and a white fill.
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            elements: Vec::new(),
            selected_id: None,
            background_image: None,
            background_color: crate::config::DEFAULT_BACKGROUND_COLOR.to_string(),
            width,
            height,
        }
    }

    /// Create an empty document from an editor configuration.
    #[must_use]
    pub fn from_config(config: &EditorConfig) -> Self {
        let mut doc = Self::new(config.canvas_width, config.canvas_height);
        doc.background_color.clone_from(&config.background_color);
        doc
    }

    /// Append an element on top of the stack and select it.
    pub fn insert(&mut self, element: Element) -> ElementId {
        let id = element.id;
        self.elements.retain(|e| e.id != id);
        self.elements.push(element);
        self.selected_id = Some(id);
        id
    }

    /// Replace the element matching `id` with `patch` merged over it.
    ///
    /// Returns `false` if no element has that id.
    pub fn update(&mut self, id: ElementId, patch: &ElementPatch) -> bool {
        let Some(slot) = self.elements.iter_mut().find(|e| e.id == id) else {
            return false;
        };
        *slot = slot.merged(patch);
        true
    }

    /// Remove an element, clearing the selection if it pointed at it.
    pub fn remove(&mut self, id: ElementId) -> Option<Element> {
        let index = self.elements.iter().position(|e| e.id == id)?;
        if self.selected_id == Some(id) {
            self.selected_id = None;
        }
        Some(self.elements.remove(index))
    }

    /// Set or clear the selection. The id is not validated.
    pub fn select(&mut self, id: Option<ElementId>) {
        self.selected_id = id;
    }

    /// The raw selection, which may name an element that no longer exists.
    #[must_use]
    pub fn selected_id(&self) -> Option<ElementId> {
        self.selected_id
    }

    /// The selected element. A dangling selection reads as none.
    #[must_use]
    pub fn selected_element(&self) -> Option<&Element> {
        self.selected_id.and_then(|id| self.get(id))
    }

    /// Get an element by ID.
    #[must_use]
    pub fn get(&self, id: ElementId) -> Option<&Element> {
        self.elements.iter().find(|e| e.id == id)
    }

    /// Get an element by ID.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::ElementNotFound`] if no element has that id.
    pub fn require(&self, id: ElementId) -> EditorResult<&Element> {
        self.get(id)
            .ok_or_else(|| EditorError::ElementNotFound(id.to_string()))
    }

    /// All elements, bottom to top.
    #[must_use]
    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    /// The topmost element containing the canvas point, if any.
    #[must_use]
    pub fn element_at(&self, x: f64, y: f64) -> Option<ElementId> {
        self.elements
            .iter()
            .rev()
            .find(|e| e.contains_point(x, y))
            .map(|e| e.id)
    }

    /// Set or clear the background image.
    pub fn set_background(&mut self, image: Option<ImageSource>) {
        self.background_image = image;
    }

    /// Set the canvas fill color.
    pub fn set_background_color(&mut self, color: impl Into<String>) {
        self.background_color = color.into();
    }

    /// Canvas width in pixels.
    #[must_use]
    pub fn width(&self) -> f64 {
        self.width
    }

    /// Canvas height in pixels.
    #[must_use]
    pub fn height(&self) -> f64 {
        self.height
    }

    /// Number of elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Check if the document has no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Serialize the document to JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> EditorResult<String> {
        serde_json::to_string(self).map_err(EditorError::Serialization)
    }

    /// Deserialize a document from JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if deserialization fails.
    pub fn from_json(json: &str) -> EditorResult<Self> {
        serde_json::from_str(json).map_err(EditorError::Serialization)
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::from_config(&EditorConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ElementKind, Transform};

    fn text(content: &str) -> Element {
        Element::new(ElementKind::Text {
            content: content.to_string(),
        })
    }

    #[test]
    fn test_insert_appends_and_selects() {
        let mut doc = Document::new(800.0, 600.0);
        assert!(doc.is_empty());

        let a = doc.insert(text("a"));
        let b = doc.insert(text("b"));

        assert_eq!(doc.len(), 2);
        assert_eq!(doc.elements()[0].id, a);
        assert_eq!(doc.elements()[1].id, b);
        assert_eq!(doc.selected_id(), Some(b));
    }

    #[test]
    fn test_remove_clears_selection() {
        let mut doc = Document::new(800.0, 600.0);
        let id = doc.insert(text("a"));

        assert!(doc.remove(id).is_some());
        assert!(doc.is_empty());
        assert_eq!(doc.selected_id(), None);
    }

    #[test]
    fn test_remove_other_keeps_selection() {
        let mut doc = Document::new(800.0, 600.0);
        let a = doc.insert(text("a"));
        let b = doc.insert(text("b"));
        doc.select(Some(a));

        doc.remove(b);
        assert_eq!(doc.selected_id(), Some(a));
    }

    #[test]
    fn test_remove_twice_is_noop() {
        let mut doc = Document::new(800.0, 600.0);
        let id = doc.insert(text("a"));
        doc.insert(text("b"));

        assert!(doc.remove(id).is_some());
        let after_first = doc.clone();
        assert!(doc.remove(id).is_none());
        assert_eq!(doc, after_first);
    }

    #[test]
    fn test_update_unknown_is_noop() {
        let mut doc = Document::new(800.0, 600.0);
        doc.insert(text("a"));
        let before = doc.clone();

        assert!(!doc.update(ElementId::new(), &ElementPatch::rotation(45.0)));
        assert_eq!(doc, before);
    }

    #[test]
    fn test_dangling_selection_reads_as_none() {
        let mut doc = Document::new(800.0, 600.0);
        doc.insert(text("a"));
        doc.select(Some(ElementId::new()));

        assert!(doc.selected_id().is_some());
        assert!(doc.selected_element().is_none());
    }

    #[test]
    fn test_require_reports_missing() {
        let doc = Document::new(800.0, 600.0);
        let err = doc.require(ElementId::new()).unwrap_err();
        assert!(matches!(err, EditorError::ElementNotFound(_)));
    }

    #[test]
    fn test_element_at_prefers_topmost() {
        let mut doc = Document::new(800.0, 600.0);
        let frame = Transform {
            x: 100.0,
            y: 100.0,
            width: 200.0,
            height: 50.0,
            rotation: 0.0,
        };
        doc.insert(text("below").with_transform(frame));
        let top = doc.insert(text("above").with_transform(frame));

        assert_eq!(doc.element_at(150.0, 125.0), Some(top));
        assert_eq!(doc.element_at(50.0, 50.0), None);
    }

    #[test]
    fn test_background_setters() {
        let mut doc = Document::default();
        assert_eq!(doc.background_color, "#ffffff");
        doc.set_background(Some(ImageSource::new("data:image/png;base64,AAAA")));
        doc.set_background_color("#123456");
        assert!(doc.background_image.is_some());
        assert_eq!(doc.background_color, "#123456");
        assert_eq!(doc.width(), 800.0);
        assert_eq!(doc.height(), 600.0);
    }

    #[test]
    fn test_json_roundtrip() {
        let mut doc = Document::new(640.0, 480.0);
        doc.insert(text("persisted"));
        let json = doc.to_json().expect("serialize");
        assert!(json.contains("selectedId"));
        let back = Document::from_json(&json).expect("deserialize");
        assert_eq!(doc, back);
    }

    #[test]
    fn test_from_json_rejects_garbage() {
        assert!(Document::from_json("{ not json }").is_err());
    }
}
