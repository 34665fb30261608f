//! WebAssembly bindings for designlite-core.
//!
//! This module provides JavaScript-callable functions when compiled to WASM.
//! Fallible calls work in [`EditorResult`] and turn into a JS error string
//! only where they cross into JavaScript.

use wasm_bindgen::prelude::*;

use crate::{
    Editor, EditorConfig, EditorError, EditorResult, ElementId, ElementPatch, HitPart, ImageSource,
    Point, PointerEvent, PointerPhase, Rect,
};

impl From<EditorError> for String {
    fn from(err: EditorError) -> Self {
        err.to_string()
    }
}

/// Initialize the editor WASM module.
#[wasm_bindgen(start)]
pub fn init() {
    // Set up panic hook for better error messages
    #[cfg(feature = "wasm")]
    console_error_panic_hook::set_once();
}

/// Editor instance for WASM.
#[wasm_bindgen]
pub struct WasmEditor {
    editor: Editor,
}

fn parse_id(id: &str) -> EditorResult<ElementId> {
    Ok(ElementId::parse(id)?)
}

fn parse_part(part: &str) -> EditorResult<HitPart> {
    match part {
        "body" => Ok(HitPart::Body),
        "resize" | "resizeHandle" => Ok(HitPart::ResizeHandle),
        "rotate" | "rotateHandle" => Ok(HitPart::RotateHandle),
        other => Err(EditorError::InvalidHitPart(other.to_string())),
    }
}

fn phase_for(event_type: &str) -> EditorResult<PointerPhase> {
    match event_type {
        "pointerdown" => Ok(PointerPhase::Down),
        "pointermove" => Ok(PointerPhase::Move),
        "pointerup" => Ok(PointerPhase::Up),
        "pointercancel" | "lostpointercapture" => Ok(PointerPhase::Cancel),
        other => Err(EditorError::UnsupportedEvent(other.to_string())),
    }
}

/// Bounding box of a laid-out DOM node, rotation included.
fn measure(node: &web_sys::Element) -> Rect {
    let rect: web_sys::DomRect = node.get_bounding_client_rect();
    Rect::new(rect.x(), rect.y(), rect.width(), rect.height())
}

#[wasm_bindgen]
impl WasmEditor {
    /// Create an editor with a canvas of the given size.
    #[wasm_bindgen(constructor)]
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            editor: Editor::new(EditorConfig::new().with_canvas_size(width, height)),
        }
    }

    /// Insert a text box and return its id.
    #[wasm_bindgen(js_name = insertText)]
    #[must_use]
    pub fn insert_text(&self) -> String {
        self.editor.insert_text().to_string()
    }

    /// Insert an image element and return its id.
    #[wasm_bindgen(js_name = insertImage)]
    #[must_use]
    pub fn insert_image(&self, src: &str) -> String {
        self.editor.insert_image(src).to_string()
    }

    /// Tell the editor where the canvas sits on screen.
    #[wasm_bindgen(js_name = setCanvasOrigin)]
    pub fn set_canvas_origin(&mut self, x: f64, y: f64) {
        self.editor.set_canvas_origin(Point::new(x, y));
    }

    /// Pointer-down. `element_id` is absent for empty workspace; `part` is
    /// `body`, `resize`, or `rotate`. Returns the outcome as JSON.
    ///
    /// # Errors
    ///
    /// Returns an error string for a malformed id or part.
    #[wasm_bindgen(js_name = pointerDown)]
    #[allow(clippy::too_many_arguments)]
    pub fn pointer_down(
        &mut self,
        pointer_id: u32,
        x: f64,
        y: f64,
        element_id: Option<String>,
        part: &str,
        bounds_x: Option<f64>,
        bounds_y: Option<f64>,
        bounds_width: Option<f64>,
        bounds_height: Option<f64>,
    ) -> Result<String, String> {
        let mut event = PointerEvent::new(pointer_id, PointerPhase::Down, x, y);
        if let Some(id) = element_id {
            event = event.with_target(parse_id(&id)?, parse_part(part)?);
        }
        if let (Some(bx), Some(by), Some(bw), Some(bh)) =
            (bounds_x, bounds_y, bounds_width, bounds_height)
        {
            event = event.with_bounds(Rect::new(bx, by, bw, bh));
        }
        self.dispatch(&event)
    }

    /// Pointer-move. Returns the outcome as JSON.
    ///
    /// # Errors
    ///
    /// Returns an error string if the outcome cannot be serialized.
    #[wasm_bindgen(js_name = pointerMove)]
    pub fn pointer_move(&mut self, pointer_id: u32, x: f64, y: f64) -> Result<String, String> {
        self.dispatch(&PointerEvent::new(pointer_id, PointerPhase::Move, x, y))
    }

    /// Pointer-up. Returns the outcome as JSON.
    ///
    /// # Errors
    ///
    /// Returns an error string if the outcome cannot be serialized.
    #[wasm_bindgen(js_name = pointerUp)]
    pub fn pointer_up(&mut self, pointer_id: u32, x: f64, y: f64) -> Result<String, String> {
        self.dispatch(&PointerEvent::new(pointer_id, PointerPhase::Up, x, y))
    }

    /// Pointer-cancel. Returns the outcome as JSON.
    ///
    /// # Errors
    ///
    /// Returns an error string if the outcome cannot be serialized.
    #[wasm_bindgen(js_name = pointerCancel)]
    pub fn pointer_cancel(&mut self, pointer_id: u32) -> Result<String, String> {
        self.dispatch(&PointerEvent::new(pointer_id, PointerPhase::Cancel, 0.0, 0.0))
    }

    /// Handle a full pointer event serialized as JSON.
    ///
    /// # Errors
    ///
    /// Returns an error string if JSON parsing fails.
    #[wasm_bindgen(js_name = handlePointerJson)]
    pub fn handle_pointer_json(&mut self, json: &str) -> Result<String, String> {
        let event: PointerEvent = serde_json::from_str(json).map_err(EditorError::from)?;
        self.dispatch(&event)
    }

    /// Handle a DOM pointer event directly.
    ///
    /// For a pointer-down on an element, pass its id, the `part` that was
    /// hit, and the element's DOM node; the node's bounding client rect is
    /// measured here and becomes the rotate center. Moves, ups, and cancels
    /// need only the event.
    ///
    /// # Errors
    ///
    /// Returns an error string for an unsupported event type, a malformed id
    /// or part, or an outcome that cannot be serialized.
    #[wasm_bindgen(js_name = handlePointerEvent)]
    #[allow(clippy::needless_pass_by_value)]
    pub fn handle_pointer_event(
        &mut self,
        event: &web_sys::PointerEvent,
        element_id: Option<String>,
        part: Option<String>,
        node: Option<web_sys::Element>,
    ) -> Result<String, String> {
        let phase = phase_for(&event.type_())?;
        let mut pointer = PointerEvent::new(
            event.pointer_id().unsigned_abs(),
            phase,
            f64::from(event.client_x()),
            f64::from(event.client_y()),
        );
        if phase == PointerPhase::Down {
            if let Some(id) = element_id {
                let part = parse_part(part.as_deref().unwrap_or("body"))?;
                pointer = pointer.with_target(parse_id(&id)?, part);
            }
            if let Some(node) = node {
                pointer = pointer.with_bounds(measure(&node));
            }
        }
        self.dispatch(&pointer)
    }

    fn dispatch(&mut self, event: &PointerEvent) -> Result<String, String> {
        let outcome = self.editor.handle_pointer(event);
        Ok(serde_json::to_string(&outcome).map_err(EditorError::from)?)
    }

    /// Merge a JSON property patch into an element. Returns whether the
    /// element existed.
    ///
    /// # Errors
    ///
    /// Returns an error string for a malformed id or patch.
    #[wasm_bindgen(js_name = updateElementJson)]
    pub fn update_element_json(&self, id: &str, patch: &str) -> Result<bool, String> {
        let id = parse_id(id)?;
        let patch: ElementPatch = serde_json::from_str(patch).map_err(EditorError::from)?;
        Ok(self.editor.update_properties(id, &patch))
    }

    /// Get one element as JSON, for a properties panel.
    ///
    /// # Errors
    ///
    /// Returns an error string for a malformed id or an element that no
    /// longer exists.
    #[wasm_bindgen(js_name = getElementJson)]
    pub fn get_element_json(&self, id: &str) -> Result<String, String> {
        let doc = self.editor.document();
        let element = doc.require(parse_id(id)?)?;
        Ok(serde_json::to_string(element).map_err(EditorError::from)?)
    }

    /// Delete an element. Returns whether it existed.
    ///
    /// # Errors
    ///
    /// Returns an error string for a malformed id.
    pub fn remove(&self, id: &str) -> Result<bool, String> {
        Ok(self.editor.remove(parse_id(id)?).is_some())
    }

    /// Select an element, or clear the selection when `id` is absent.
    ///
    /// # Errors
    ///
    /// Returns an error string for a malformed id.
    pub fn select(&self, id: Option<String>) -> Result<(), String> {
        let id = id.as_deref().map(parse_id).transpose()?;
        self.editor.select(id);
        Ok(())
    }

    /// Set or clear the background image.
    #[wasm_bindgen(js_name = setBackground)]
    pub fn set_background(&self, src: Option<String>) {
        self.editor.set_background(src.map(ImageSource::from));
    }

    /// Set the canvas fill color.
    #[wasm_bindgen(js_name = setBackgroundColor)]
    pub fn set_background_color(&self, color: &str) {
        self.editor.set_background_color(color);
    }

    /// Get the current document as JSON.
    #[wasm_bindgen(js_name = getDocumentJson)]
    #[must_use]
    pub fn get_document_json(&self) -> String {
        self.editor.document().to_json().unwrap_or_default()
    }
}

impl Default for WasmEditor {
    fn default() -> Self {
        Self::new(
            crate::config::DEFAULT_CANVAS_WIDTH,
            crate::config::DEFAULT_CANVAS_HEIGHT,
        )
    }
}
