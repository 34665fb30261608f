//! # DesignLite Core
//!
//! Editing logic for the DesignLite composition editor.
//! Compiles to WASM for the browser shell.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │             designlite-core.wasm            │
//! ├─────────────────────────────────────────────┤
//! │  Document Model  │  Gesture Controller      │
//! │  - Elements      │  - Translate             │
//! │  - Selection     │  - Resize (rotated)      │
//! │  - Background    │  - Rotate                │
//! ├─────────────────────────────────────────────┤
//! │  Document Store  │  Editor                  │
//! │  - Atomic ops    │  - Pointer routing       │
//! │  - Snapshots     │  - Property edits        │
//! └─────────────────────────────────────────────┘
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod document;
pub mod editor;
pub mod element;
pub mod error;
pub mod event;
pub mod geometry;
pub mod gesture;
pub mod store;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use config::{EditorConfig, ElementDefaults};
pub use document::Document;
pub use editor::{Editor, PointerOutcome};
pub use element::{
    Element, ElementId, ElementKind, ElementPatch, ElementType, ImageSource, Style, StylePatch,
    Transform,
};
pub use error::{EditorError, EditorResult};
pub use event::{HitPart, PointerEvent, PointerPhase, PointerTarget};
pub use geometry::{Point, Rect, Size};
pub use gesture::{
    Gesture, GestureController, GestureError, GestureKind, GestureSession, GestureSummary,
};
pub use store::DocumentStore;

/// Core library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
