//! Shared document storage with atomic update operations.
//!
//! [`DocumentStore`] is a cloneable handle over one [`Document`]. Every
//! operation runs under a single write lock, so a reader taking a
//! [`DocumentStore::snapshot`] sees either the state before or after an
//! operation and never anything in between. Gestures call
//! [`DocumentStore::update`] at pointer-move frequency; each call merges
//! against the current state rather than a stale copy.
//!
//! The handle also owns the gesture claim registry, so every editor built
//! over clones of one store sees the same claims.

use std::sync::atomic::{AtomicU64, Ordering};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::config::EditorConfig;
use crate::element::{Element, ElementId, ElementKind, ElementPatch, ElementType, ImageSource, Transform};
use crate::gesture::ClaimRegistry;
use crate::Document;

/// Thread-safe handle to the session's document.
///
/// # Example
///
/// ```
/// use designlite_core::store::DocumentStore;
/// use designlite_core::ElementType;
///
/// let store = DocumentStore::new();
/// let id = store.insert(ElementType::Text, None);
///
/// let doc = store.snapshot();
/// assert_eq!(doc.selected_id(), Some(id));
/// ```
#[derive(Debug, Clone)]
pub struct DocumentStore {
    document: Arc<RwLock<Document>>,
    config: Arc<EditorConfig>,
    revision: Arc<AtomicU64>,
    claims: ClaimRegistry,
}

impl DocumentStore {
    /// Create a store with the default configuration (800x600 canvas).
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(EditorConfig::default())
    }

    /// Create a store for the given configuration.
    #[must_use]
    pub fn with_config(config: EditorConfig) -> Self {
        Self {
            document: Arc::new(RwLock::new(Document::from_config(&config))),
            config: Arc::new(config),
            revision: Arc::new(AtomicU64::new(0)),
            claims: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// The configuration this store was created with.
    #[must_use]
    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    /// Insert a new element of `kind`, centered on the canvas, and select it.
    ///
    /// `content` replaces the kind's default content; image elements without
    /// content get an empty reference.
    pub fn insert(&self, kind: ElementType, content: Option<String>) -> ElementId {
        let defaults = self.config.defaults_for(kind);
        let element_kind = match kind {
            ElementType::Text => ElementKind::Text {
                content: content
                    .unwrap_or_else(|| crate::config::DEFAULT_TEXT_CONTENT.to_string()),
            },
            ElementType::Image => ElementKind::Image {
                src: ImageSource::new(content.unwrap_or_default()),
            },
        };

        let id = self.write(|doc| {
            let size = defaults.size;
            let element = Element::new(element_kind)
                .with_transform(Transform {
                    x: doc.width() / 2.0 - size.width / 2.0,
                    y: doc.height() / 2.0 - size.height / 2.0,
                    width: size.width,
                    height: size.height,
                    rotation: 0.0,
                })
                .with_style(defaults.style.clone());
            let id = doc.insert(element);
            self.bump();
            id
        });
        tracing::debug!(%id, ?kind, "inserted element");
        id
    }

    /// Merge `patch` onto the element with `id`.
    ///
    /// Returns `false` without touching the document if the element is gone.
    /// An empty patch on a live element returns `true` but leaves the
    /// revision alone.
    pub fn update(&self, id: ElementId, patch: &ElementPatch) -> bool {
        let applied = self.write(|doc| {
            let applied = doc.update(id, patch);
            if applied && !patch.is_empty() {
                self.bump();
            }
            applied
        });
        if !applied {
            tracing::trace!(%id, "update ignored for missing element");
        }
        applied
    }

    /// Remove the element with `id`, clearing the selection if it was selected.
    pub fn remove(&self, id: ElementId) -> Option<Element> {
        let removed = self.write(|doc| {
            let removed = doc.remove(id);
            if removed.is_some() {
                self.bump();
            }
            removed
        });
        if removed.is_some() {
            tracing::debug!(%id, "removed element");
        }
        removed
    }

    /// Set or clear the selection without validating the id.
    pub fn select(&self, id: Option<ElementId>) {
        self.write(|doc| {
            if doc.selected_id() != id {
                doc.select(id);
                self.bump();
            }
        });
    }

    /// Set or clear the background image.
    pub fn set_background(&self, image: Option<ImageSource>) {
        self.write(|doc| {
            if doc.background_image != image {
                doc.set_background(image);
                self.bump();
            }
        });
    }

    /// Set the canvas fill color.
    pub fn set_background_color(&self, color: impl Into<String>) {
        let color = color.into();
        self.write(|doc| {
            if doc.background_color != color {
                doc.set_background_color(color);
                self.bump();
            }
        });
    }

    /// A consistent copy of the whole document.
    #[must_use]
    pub fn snapshot(&self) -> Document {
        self.read().clone()
    }

    /// A copy of one element.
    #[must_use]
    pub fn element(&self, id: ElementId) -> Option<Element> {
        self.read().get(id).cloned()
    }

    /// A copy of the selected element; a dangling selection reads as none.
    #[must_use]
    pub fn selected_element(&self) -> Option<Element> {
        self.read().selected_element().cloned()
    }

    /// Number of state changes applied so far.
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.revision.load(Ordering::Acquire)
    }

    /// Gesture claims shared by every clone of this handle.
    pub(crate) fn claims(&self) -> &ClaimRegistry {
        &self.claims
    }

    fn read(&self) -> RwLockReadGuard<'_, Document> {
        self.document
            .read()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Runs `f` under the write lock. Mutators bump the revision inside `f`
    /// so readers never pair a new document with an old revision.
    fn write<R>(&self, f: impl FnOnce(&mut Document) -> R) -> R {
        let mut guard: RwLockWriteGuard<'_, Document> = self
            .document
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        f(&mut guard)
    }

    fn bump(&self) {
        self.revision.fetch_add(1, Ordering::AcqRel);
    }
}

impl Default for DocumentStore {
    fn default() -> Self {
        Self::new()
    }
}
