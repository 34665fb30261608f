//! Pointer input delivered by the host.

use serde::{Deserialize, Serialize};

use crate::geometry::{Point, Rect};
use crate::ElementId;

/// Phase of a pointer event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PointerPhase {
    /// Button pressed.
    Down,
    /// Pointer moved.
    Move,
    /// Button released.
    Up,
    /// The platform took the pointer away (e.g. touch scroll).
    Cancel,
}

/// Which part of an element the pointer landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum HitPart {
    /// The element itself.
    Body,
    /// The bottom-right resize handle.
    ResizeHandle,
    /// The rotate handle above the element.
    RotateHandle,
}

/// The element and part under the pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointerTarget {
    /// Element hit.
    pub element: ElementId,
    /// Part of the element hit.
    pub part: HitPart,
}

/// A pointer event in screen coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PointerEvent {
    /// Identifies one pointer across its down/move/up sequence.
    pub pointer_id: u32,
    /// Phase of this event.
    pub phase: PointerPhase,
    /// X position.
    pub x: f64,
    /// Y position.
    pub y: f64,
    /// What was hit on pointer-down. `None` means empty workspace.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<PointerTarget>,
    /// Measured on-screen bounding box of the target element, if the host
    /// could measure it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bounds: Option<Rect>,
}

impl PointerEvent {
    /// Create an event with no target.
    #[must_use]
    pub fn new(pointer_id: u32, phase: PointerPhase, x: f64, y: f64) -> Self {
        Self {
            pointer_id,
            phase,
            x,
            y,
            target: None,
            bounds: None,
        }
    }

    /// Pointer-down on `part` of `element`.
    #[must_use]
    pub fn down_on(pointer_id: u32, element: ElementId, part: HitPart, x: f64, y: f64) -> Self {
        Self::new(pointer_id, PointerPhase::Down, x, y).with_target(element, part)
    }

    /// Set the hit target.
    #[must_use]
    pub fn with_target(mut self, element: ElementId, part: HitPart) -> Self {
        self.target = Some(PointerTarget { element, part });
        self
    }

    /// Attach the measured bounds of the target.
    #[must_use]
    pub fn with_bounds(mut self, bounds: Rect) -> Self {
        self.bounds = Some(bounds);
        self
    }

    /// The pointer position.
    #[must_use]
    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }
}
