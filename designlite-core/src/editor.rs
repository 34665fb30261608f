//! Editor facade: routes pointer events to gestures and exposes the
//! property-editing operations a host UI calls.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::config::EditorConfig;
use crate::element::{Element, ElementId, ElementPatch, ElementType, ImageSource, StylePatch};
use crate::event::{HitPart, PointerEvent, PointerPhase};
use crate::geometry::{rendered_bounds, Point, Rect};
use crate::gesture::{GestureController, GestureError, GestureKind, GestureSession, GestureSummary};
use crate::store::DocumentStore;
use crate::Document;

/// What [`Editor::handle_pointer`] did with an event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", content = "detail", rename_all = "camelCase")]
pub enum PointerOutcome {
    /// Nothing to do.
    Ignored,
    /// Pointer-down on empty workspace cleared the selection.
    SelectionCleared,
    /// A gesture started.
    Started {
        /// Element under manipulation.
        id: ElementId,
        /// Gesture kind.
        kind: GestureKind,
    },
    /// A move was applied.
    Updated(ElementPatch),
    /// A gesture ended.
    Released(GestureSummary),
    /// The pointer-down could not start a gesture.
    Rejected(GestureError),
}

/// One editing session over a document.
#[derive(Debug)]
pub struct Editor {
    store: DocumentStore,
    gestures: GestureController,
    sessions: HashMap<u32, GestureSession>,
    canvas_origin: Point,
}

impl Editor {
    /// Create an editor over a fresh document.
    #[must_use]
    pub fn new(config: EditorConfig) -> Self {
        Self::with_store(DocumentStore::with_config(config))
    }

    /// Create an editor over an existing store.
    #[must_use]
    pub fn with_store(store: DocumentStore) -> Self {
        Self {
            gestures: GestureController::new(store.clone()),
            store,
            sessions: HashMap::new(),
            canvas_origin: Point::default(),
        }
    }

    /// The underlying store.
    #[must_use]
    pub fn store(&self) -> &DocumentStore {
        &self.store
    }

    /// A snapshot of the document.
    #[must_use]
    pub fn document(&self) -> Document {
        self.store.snapshot()
    }

    /// Set where the canvas's top-left corner sits on screen.
    pub fn set_canvas_origin(&mut self, origin: Point) {
        self.canvas_origin = origin;
    }

    /// Route a pointer event.
    pub fn handle_pointer(&mut self, event: &PointerEvent) -> PointerOutcome {
        match event.phase {
            PointerPhase::Down => self.pointer_down(event),
            PointerPhase::Move => match self.sessions.get_mut(&event.pointer_id) {
                Some(session) => PointerOutcome::Updated(session.pointer_move(event.position())),
                None => PointerOutcome::Ignored,
            },
            PointerPhase::Up | PointerPhase::Cancel => match self.sessions.remove(&event.pointer_id) {
                Some(session) => PointerOutcome::Released(session.release()),
                None => PointerOutcome::Ignored,
            },
        }
    }

    fn pointer_down(&mut self, event: &PointerEvent) -> PointerOutcome {
        if self.sessions.contains_key(&event.pointer_id) {
            return PointerOutcome::Rejected(GestureError::PointerInUse(event.pointer_id));
        }

        let Some(target) = event.target else {
            self.store.select(None);
            return PointerOutcome::SelectionCleared;
        };

        let kind = match target.part {
            HitPart::Body => {
                if self.store.element(target.element).is_some() {
                    self.store.select(Some(target.element));
                }
                GestureKind::Translate
            }
            HitPart::ResizeHandle => GestureKind::Resize,
            HitPart::RotateHandle => GestureKind::Rotate,
        };

        match self
            .gestures
            .begin(target.element, kind, event.position(), event.bounds)
        {
            Ok(session) => {
                let id = session.element_id();
                self.sessions.insert(event.pointer_id, session);
                PointerOutcome::Started { id, kind }
            }
            Err(GestureError::NotMeasurable) => {
                tracing::debug!(id = %target.element, "rotate skipped, bounds unavailable");
                PointerOutcome::Ignored
            }
            Err(GestureError::ElementNotFound(id)) => {
                tracing::trace!(%id, "pointer-down on stale element");
                PointerOutcome::Ignored
            }
            Err(err) => {
                tracing::debug!(error = %err, "gesture rejected");
                PointerOutcome::Rejected(err)
            }
        }
    }

    /// Number of gestures in progress.
    #[must_use]
    pub fn active_gestures(&self) -> usize {
        self.sessions.len()
    }

    /// Insert a text box with the default placeholder.
    pub fn insert_text(&self) -> ElementId {
        self.store.insert(ElementType::Text, None)
    }

    /// Insert an image element.
    pub fn insert_image(&self, src: impl Into<ImageSource>) -> ElementId {
        let src: ImageSource = src.into();
        self.store
            .insert(ElementType::Image, Some(src.as_str().to_string()))
    }

    /// Merge an arbitrary patch.
    pub fn update_properties(&self, id: ElementId, patch: &ElementPatch) -> bool {
        self.store.update(id, patch)
    }

    /// Replace the text of a text element. Other kinds are left alone.
    pub fn set_text(&self, id: ElementId, text: impl Into<String>) -> bool {
        match self.store.element(id) {
            Some(el) if el.element_type() == ElementType::Text => {
                self.store.update(id, &ElementPatch::content(text))
            }
            _ => false,
        }
    }

    /// Merge style fields; fields left `None` in `style` keep their value.
    pub fn set_style(&self, id: ElementId, style: StylePatch) -> bool {
        self.store.update(id, &ElementPatch::style(style))
    }

    /// Delete an element.
    pub fn remove(&self, id: ElementId) -> Option<Element> {
        self.store.remove(id)
    }

    /// Set or clear the selection.
    pub fn select(&self, id: Option<ElementId>) {
        self.store.select(id);
    }

    /// The selected element, if it still exists.
    #[must_use]
    pub fn selected_element(&self) -> Option<Element> {
        self.store.selected_element()
    }

    /// Set or clear the background image.
    pub fn set_background(&self, image: Option<ImageSource>) {
        self.store.set_background(image);
    }

    /// Set the canvas fill color.
    pub fn set_background_color(&self, color: impl Into<String>) {
        self.store.set_background_color(color);
    }

    /// The topmost element under a screen point.
    #[must_use]
    pub fn hit_test(&self, x: f64, y: f64) -> Option<ElementId> {
        let local = Point::new(x, y) - self.canvas_origin;
        self.store.snapshot().element_at(local.x, local.y)
    }

    /// Screen-space bounding box of an element, for hosts that cannot
    /// measure layout.
    #[must_use]
    pub fn rendered_bounds(&self, id: ElementId) -> Option<Rect> {
        self.store
            .element(id)
            .map(|el| rendered_bounds(&el.transform, self.canvas_origin))
    }
}

impl Default for Editor {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}
