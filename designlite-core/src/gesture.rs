//! Direct-manipulation gestures: translate, resize, and rotate.
//!
//! A gesture runs `Idle -> Active -> Idle` for one element. Starting one
//! with [`GestureController::begin`] captures the element's state at
//! pointer-down and takes a claim on the element in the registry owned by the
//! [`DocumentStore`], so two controllers over one store never both drive an
//! element. The returned [`GestureSession`] turns each pointer position into
//! a patch and merges it into the store. The claim is released when the
//! session is released or dropped, whichever comes first, so an abandoned
//! session never leaves the element locked.
//!
//! Translate and resize are delta-based against the captured start. Rotate
//! is absolute: the angle comes straight from the pointer's bearing around
//! the element center.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::element::{ElementId, ElementPatch};
use crate::geometry::{bearing_degrees, to_local_frame, Point, Rect, Size};
use crate::store::DocumentStore;

/// Which transform a gesture drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GestureKind {
    /// Drag the element body.
    Translate,
    /// Drag the bottom-right handle; the top-left corner stays put.
    Resize,
    /// Drag the rotate handle around the element center.
    Rotate,
}

/// Errors raised when a gesture cannot start.
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
pub enum GestureError {
    /// The element already has a gesture in progress.
    #[error("Element {id} already has an active {active:?} gesture")]
    AlreadyActive {
        /// Element under manipulation.
        id: ElementId,
        /// The gesture holding the claim.
        active: GestureKind,
    },

    /// The pointer is already driving another gesture.
    #[error("Pointer {0} is already driving a gesture")]
    PointerInUse(u32),

    /// The element does not exist.
    #[error("Element not found: {0}")]
    ElementNotFound(ElementId),

    /// No usable on-screen bounding box was supplied for a rotate gesture.
    #[error("Element bounds could not be measured")]
    NotMeasurable,
}

/// Start state captured at pointer-down.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Gesture {
    /// Moving the element.
    Translate {
        /// Pointer position at pointer-down.
        start_pointer: Point,
        /// Element top-left at pointer-down.
        start_position: Point,
    },
    /// Resizing from the bottom-right handle.
    Resize {
        /// Pointer position at pointer-down.
        start_pointer: Point,
        /// Element size at pointer-down.
        start_size: Size,
        /// Element rotation in degrees at pointer-down.
        rotation: f64,
        /// Smallest size the gesture may produce.
        min_size: Size,
    },
    /// Rotating around the measured center.
    Rotate {
        /// On-screen center of the element at pointer-down.
        center: Point,
    },
}

impl Gesture {
    /// The kind of this gesture.
    #[must_use]
    pub fn kind(&self) -> GestureKind {
        match self {
            Self::Translate { .. } => GestureKind::Translate,
            Self::Resize { .. } => GestureKind::Resize,
            Self::Rotate { .. } => GestureKind::Rotate,
        }
    }

    /// The patch for the pointer at `pointer`. Only fields this gesture owns
    /// are set.
    #[must_use]
    pub fn update(&self, pointer: Point) -> ElementPatch {
        match *self {
            Self::Translate {
                start_pointer,
                start_position,
            } => ElementPatch::position(start_position + (pointer - start_pointer)),
            Self::Resize {
                start_pointer,
                start_size,
                rotation,
                min_size,
            } => {
                let local = to_local_frame(pointer - start_pointer, rotation);
                ElementPatch::size(Size::new(
                    (start_size.width + local.x).max(min_size.width),
                    (start_size.height + local.y).max(min_size.height),
                ))
            }
            Self::Rotate { center } => ElementPatch::rotation(bearing_degrees(center, pointer)),
        }
    }
}

/// Elements with a gesture in progress, shared through the [`DocumentStore`].
pub(crate) type ClaimRegistry = Arc<Mutex<HashMap<ElementId, GestureKind>>>;

fn lock(registry: &ClaimRegistry) -> MutexGuard<'_, HashMap<ElementId, GestureKind>> {
    registry.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Starts gestures and tracks which elements are currently claimed.
#[derive(Debug, Clone)]
pub struct GestureController {
    store: DocumentStore,
}

impl GestureController {
    /// Create a controller that writes into `store`.
    #[must_use]
    pub fn new(store: DocumentStore) -> Self {
        Self { store }
    }

    /// Start a gesture on `id` with the pointer at `pointer`.
    ///
    /// `bounds` is the element's measured on-screen bounding box, in the same
    /// coordinate space as `pointer`. Only rotate needs it.
    ///
    /// # Errors
    ///
    /// - [`GestureError::ElementNotFound`] if the element does not exist.
    /// - [`GestureError::NotMeasurable`] for a rotate without finite bounds.
    /// - [`GestureError::AlreadyActive`] if the element is already claimed.
    pub fn begin(
        &self,
        id: ElementId,
        kind: GestureKind,
        pointer: Point,
        bounds: Option<Rect>,
    ) -> Result<GestureSession, GestureError> {
        let element = self
            .store
            .element(id)
            .ok_or(GestureError::ElementNotFound(id))?;
        let t = element.transform;

        let gesture = match kind {
            GestureKind::Translate => Gesture::Translate {
                start_pointer: pointer,
                start_position: t.position(),
            },
            GestureKind::Resize => Gesture::Resize {
                start_pointer: pointer,
                start_size: t.size(),
                rotation: t.rotation,
                min_size: self.store.config().min_size,
            },
            GestureKind::Rotate => {
                let bounds = bounds
                    .filter(Rect::is_measurable)
                    .ok_or(GestureError::NotMeasurable)?;
                Gesture::Rotate {
                    center: bounds.center(),
                }
            }
        };

        let claim = Claim::acquire(self.store.claims(), id, kind)?;
        tracing::debug!(%id, ?kind, x = pointer.x, y = pointer.y, "gesture started");

        Ok(GestureSession {
            store: self.store.clone(),
            id,
            gesture,
            moves: 0,
            _claim: claim,
        })
    }

    /// The gesture currently claiming `id`, if any.
    #[must_use]
    pub fn active_kind(&self, id: ElementId) -> Option<GestureKind> {
        lock(self.store.claims()).get(&id).copied()
    }

    /// Number of elements with a gesture in progress.
    #[must_use]
    pub fn active_count(&self) -> usize {
        lock(self.store.claims()).len()
    }
}

/// Registry entry that lives exactly as long as its session.
#[derive(Debug)]
struct Claim {
    registry: ClaimRegistry,
    id: ElementId,
}

impl Claim {
    fn acquire(registry: &ClaimRegistry, id: ElementId, kind: GestureKind) -> Result<Self, GestureError> {
        let mut active = lock(registry);
        if let Some(&existing) = active.get(&id) {
            return Err(GestureError::AlreadyActive {
                id,
                active: existing,
            });
        }
        active.insert(id, kind);
        Ok(Self {
            registry: Arc::clone(registry),
            id,
        })
    }
}

impl Drop for Claim {
    fn drop(&mut self) {
        lock(&self.registry).remove(&self.id);
    }
}

/// Outcome of a finished gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GestureSummary {
    /// The manipulated element.
    pub id: ElementId,
    /// What the gesture did.
    pub kind: GestureKind,
    /// How many pointer moves were applied.
    pub moves: u32,
}

/// An in-progress gesture holding the claim on its element.
#[derive(Debug)]
pub struct GestureSession {
    store: DocumentStore,
    id: ElementId,
    gesture: Gesture,
    moves: u32,
    _claim: Claim,
}

impl GestureSession {
    /// The element under manipulation.
    #[must_use]
    pub fn element_id(&self) -> ElementId {
        self.id
    }

    /// The captured start state.
    #[must_use]
    pub fn gesture(&self) -> &Gesture {
        &self.gesture
    }

    /// Apply the pointer position to the element and return the patch that
    /// was merged.
    ///
    /// If the element was removed mid-gesture the store ignores the patch.
    pub fn pointer_move(&mut self, pointer: Point) -> ElementPatch {
        let patch = self.gesture.update(pointer);
        self.store.update(self.id, &patch);
        self.moves = self.moves.saturating_add(1);
        patch
    }

    /// End the gesture and free the element.
    pub fn release(self) -> GestureSummary {
        let summary = GestureSummary {
            id: self.id,
            kind: self.gesture.kind(),
            moves: self.moves,
        };
        tracing::debug!(id = %summary.id, kind = ?summary.kind, moves = summary.moves, "gesture ended");
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::{ElementType, Transform};

    const EPS: f64 = 1e-9;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < EPS
    }

    fn setup(transform: Transform) -> (DocumentStore, GestureController, ElementId) {
        let store = DocumentStore::new();
        let id = store.insert(ElementType::Text, None);
        store.update(
            id,
            &ElementPatch {
                x: Some(transform.x),
                y: Some(transform.y),
                width: Some(transform.width),
                height: Some(transform.height),
                rotation: Some(transform.rotation),
                ..ElementPatch::default()
            },
        );
        let controller = GestureController::new(store.clone());
        (store, controller, id)
    }

    fn frame(rotation: f64) -> Transform {
        Transform {
            x: 250.0,
            y: 270.0,
            width: 300.0,
            height: 60.0,
            rotation,
        }
    }

    // ========================================================================
    // Translate
    // ========================================================================

    #[test]
    fn test_translate_adds_pointer_delta() {
        let (store, gestures, id) = setup(frame(0.0));
        let mut session = gestures
            .begin(id, GestureKind::Translate, Point::new(300.0, 300.0), None)
            .expect("start");

        session.pointer_move(Point::new(310.0, 280.0));

        let t = store.element(id).expect("present").transform;
        assert_eq!(t.x, 260.0);
        assert_eq!(t.y, 250.0);
        assert_eq!(t.width, 300.0);
    }

    #[test]
    fn test_translate_is_path_independent() {
        let (store, gestures, id) = setup(frame(33.0));
        let mut session = gestures
            .begin(id, GestureKind::Translate, Point::new(0.0, 0.0), None)
            .expect("start");
        for p in [(5.0, 90.0), (-40.0, 12.0), (700.0, -3.0), (17.0, 23.0)] {
            session.pointer_move(Point::new(p.0, p.1));
        }
        let wandering = store.element(id).expect("present").transform;
        session.release();

        let (store, gestures, id) = setup(frame(33.0));
        let mut session = gestures
            .begin(id, GestureKind::Translate, Point::new(0.0, 0.0), None)
            .expect("start");
        session.pointer_move(Point::new(17.0, 23.0));
        let direct = store.element(id).expect("present").transform;

        assert_eq!(wandering, direct);
    }

    #[test]
    fn test_translate_does_not_clamp() {
        let (store, gestures, id) = setup(frame(0.0));
        let mut session = gestures
            .begin(id, GestureKind::Translate, Point::new(0.0, 0.0), None)
            .expect("start");
        session.pointer_move(Point::new(-1000.0, -1000.0));
        let t = store.element(id).expect("present").transform;
        assert_eq!(t.x, -750.0);
        assert_eq!(t.y, -730.0);
    }

    // ========================================================================
    // Resize
    // ========================================================================

    #[test]
    fn test_resize_unrotated_uses_global_delta() {
        let (store, gestures, id) = setup(frame(0.0));
        let mut session = gestures
            .begin(id, GestureKind::Resize, Point::new(550.0, 330.0), None)
            .expect("start");

        session.pointer_move(Point::new(590.0, 340.0));

        let t = store.element(id).expect("present").transform;
        assert!(approx(t.width, 340.0));
        assert!(approx(t.height, 70.0));
        assert_eq!((t.x, t.y), (250.0, 270.0));
    }

    #[test]
    fn test_resize_quarter_turn_swaps_axes() {
        let (store, gestures, id) = setup(frame(90.0));
        let mut session = gestures
            .begin(id, GestureKind::Resize, Point::new(0.0, 0.0), None)
            .expect("start");

        // screen-down is the box's local +x after a clockwise quarter turn
        session.pointer_move(Point::new(0.0, 30.0));
        let t = store.element(id).expect("present").transform;
        assert!(approx(t.width, 330.0));
        assert!(approx(t.height, 60.0));

        // screen-right is the box's local -y
        session.pointer_move(Point::new(30.0, 0.0));
        let t = store.element(id).expect("present").transform;
        assert!(approx(t.width, 300.0));
        assert!(approx(t.height, 30.0));
    }

    #[test]
    fn test_resize_clamps_to_minimum() {
        let (store, gestures, id) = setup(frame(0.0));
        let mut session = gestures
            .begin(id, GestureKind::Resize, Point::new(0.0, 0.0), None)
            .expect("start");

        for p in [(-290.0, -50.0), (-5000.0, -5000.0), (-251.0, -41.0)] {
            let patch = session.pointer_move(Point::new(p.0, p.1));
            assert!(patch.width.is_some_and(|w| w >= 50.0));
            assert!(patch.height.is_some_and(|h| h >= 20.0));
        }
        let t = store.element(id).expect("present").transform;
        assert_eq!(t.width, 50.0);
        assert_eq!(t.height, 20.0);
    }

    #[test]
    fn test_resize_uses_rotation_captured_at_start() {
        let (store, gestures, id) = setup(frame(0.0));
        let mut session = gestures
            .begin(id, GestureKind::Resize, Point::new(0.0, 0.0), None)
            .expect("start");
        store.update(id, &ElementPatch::rotation(90.0));

        session.pointer_move(Point::new(40.0, 10.0));
        let t = store.element(id).expect("present").transform;
        assert!(approx(t.width, 340.0));
        assert!(approx(t.height, 70.0));
    }

    // ========================================================================
    // Rotate
    // ========================================================================

    #[test]
    fn test_rotate_compass_points() {
        let (store, gestures, id) = setup(frame(0.0));
        let bounds = Rect::new(250.0, 270.0, 300.0, 60.0);
        let c = bounds.center();
        let mut session = gestures
            .begin(id, GestureKind::Rotate, Point::new(c.x, c.y - 50.0), Some(bounds))
            .expect("start");

        let cases = [
            (Point::new(c.x, c.y - 80.0), 0.0),
            (Point::new(c.x + 80.0, c.y), 90.0),
            (Point::new(c.x, c.y + 80.0), 180.0),
            (Point::new(c.x - 80.0, c.y), 270.0),
        ];
        for (pointer, expected) in cases {
            session.pointer_move(pointer);
            let rotation = store.element(id).expect("present").transform.rotation;
            assert!(approx(rotation, expected), "{rotation} != {expected}");
        }
    }

    #[test]
    fn test_rotate_is_absolute() {
        let (store, gestures, id) = setup(frame(725.0));
        let bounds = Rect::new(0.0, 0.0, 100.0, 100.0);
        let mut session = gestures
            .begin(id, GestureKind::Rotate, Point::new(50.0, 0.0), Some(bounds))
            .expect("start");
        session.pointer_move(Point::new(100.0, 50.0));
        assert!(approx(store.element(id).expect("present").transform.rotation, 90.0));
    }

    #[test]
    fn test_rotate_requires_measurable_bounds() {
        let (_store, gestures, id) = setup(frame(0.0));
        let err = gestures
            .begin(id, GestureKind::Rotate, Point::default(), None)
            .unwrap_err();
        assert_eq!(err, GestureError::NotMeasurable);

        let err = gestures
            .begin(
                id,
                GestureKind::Rotate,
                Point::default(),
                Some(Rect::new(f64::NAN, 0.0, 10.0, 10.0)),
            )
            .unwrap_err();
        assert_eq!(err, GestureError::NotMeasurable);
        assert_eq!(gestures.active_count(), 0);
    }

    // ========================================================================
    // Lifecycle
    // ========================================================================

    #[test]
    fn test_overlapping_start_is_rejected() {
        let (_store, gestures, id) = setup(frame(0.0));
        let _first = gestures
            .begin(id, GestureKind::Translate, Point::default(), None)
            .expect("start");

        let err = gestures
            .begin(id, GestureKind::Resize, Point::default(), None)
            .unwrap_err();
        assert_eq!(
            err,
            GestureError::AlreadyActive {
                id,
                active: GestureKind::Translate
            }
        );
    }

    #[test]
    fn test_claims_are_shared_across_controllers_of_one_store() {
        let (store, gestures, id) = setup(frame(0.0));
        let other = GestureController::new(store.clone());

        let first = gestures
            .begin(id, GestureKind::Translate, Point::default(), None)
            .expect("start");
        assert_eq!(other.active_kind(id), Some(GestureKind::Translate));
        assert!(matches!(
            other.begin(id, GestureKind::Resize, Point::default(), None),
            Err(GestureError::AlreadyActive { .. })
        ));

        drop(first);
        assert!(other
            .begin(id, GestureKind::Resize, Point::default(), None)
            .is_ok());

        // a separate document keeps its own claims
        let unrelated = DocumentStore::new();
        assert_eq!(GestureController::new(unrelated).active_count(), 0);
    }

    #[test]
    fn test_release_and_drop_free_the_claim() {
        let (_store, gestures, id) = setup(frame(0.0));

        let session = gestures
            .begin(id, GestureKind::Translate, Point::default(), None)
            .expect("start");
        assert_eq!(gestures.active_kind(id), Some(GestureKind::Translate));
        let summary = session.release();
        assert_eq!(summary.moves, 0);
        assert_eq!(gestures.active_kind(id), None);

        let session = gestures
            .begin(id, GestureKind::Resize, Point::default(), None)
            .expect("restart after release");
        drop(session);
        assert_eq!(gestures.active_count(), 0);
        assert!(gestures
            .begin(id, GestureKind::Translate, Point::default(), None)
            .is_ok());
    }

    #[test]
    fn test_zero_move_release_leaves_element_untouched() {
        let (store, gestures, id) = setup(frame(12.0));
        let before = store.element(id).expect("present");
        let rev = store.revision();

        gestures
            .begin(id, GestureKind::Resize, Point::new(9.0, 9.0), None)
            .expect("start")
            .release();

        assert_eq!(store.element(id).expect("present"), before);
        assert_eq!(store.revision(), rev);
    }

    #[test]
    fn test_unknown_element_cannot_start() {
        let store = DocumentStore::new();
        let gestures = GestureController::new(store);
        let ghost = ElementId::new();
        let err = gestures
            .begin(ghost, GestureKind::Translate, Point::default(), None)
            .unwrap_err();
        assert_eq!(err, GestureError::ElementNotFound(ghost));
    }

    #[test]
    fn test_move_after_remove_is_noop() {
        let (store, gestures, id) = setup(frame(0.0));
        let mut session = gestures
            .begin(id, GestureKind::Translate, Point::default(), None)
            .expect("start");
        store.remove(id);
        session.pointer_move(Point::new(10.0, 10.0));
        assert!(store.snapshot().is_empty());
        assert_eq!(session.release().moves, 1);
    }

    #[test]
    fn test_moves_merge_against_current_state() {
        let (store, gestures, id) = setup(frame(0.0));
        let mut session = gestures
            .begin(id, GestureKind::Translate, Point::default(), None)
            .expect("start");
        store.update(id, &ElementPatch::content("edited mid-drag"));
        session.pointer_move(Point::new(1.0, 1.0));
        let el = store.element(id).expect("present");
        assert_eq!(el.kind.text(), Some("edited mid-drag"));
        assert_eq!(el.transform.x, 251.0);
    }
}
