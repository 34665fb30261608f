//! An editing session wired to its host services.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use designlite_core::{Editor, ElementId, ElementKind, ImageSource, PointerEvent, PointerOutcome};
use designlite_renderer::ExportFormat;

use crate::export::{ExportService, Notice};
use crate::ingest::ingest_file;
use crate::proofread::{proofread, GeminiClient, ProofreadError, TextImprover};
use crate::AppConfig;

/// An [`Editor`] plus the services its sidebar and toolbar call into.
///
/// Failures from services never escape. Proofreading falls back to the
/// original text and ingestion failures are no-ops. Every export queues a
/// [`Notice`]: info with the written path, or an error after logging it.
pub struct EditorSession {
    editor: Editor,
    improver: Arc<dyn TextImprover>,
    exports: ExportService,
    notices: Vec<Notice>,
}

impl std::fmt::Debug for EditorSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EditorSession")
            .field("editor", &self.editor)
            .field("exports", &self.exports)
            .field("notices", &self.notices.len())
            .finish_non_exhaustive()
    }
}

impl EditorSession {
    /// Create a session from application configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the text service client cannot be built.
    pub fn new(config: &AppConfig) -> Result<Self, ProofreadError> {
        let improver = GeminiClient::from_config(config)?;
        Ok(Self::with_services(
            Editor::new(config.editor.clone()),
            Arc::new(improver),
            ExportService::from_config(config),
        ))
    }

    /// Create a session from explicit parts.
    #[must_use]
    pub fn with_services(
        editor: Editor,
        improver: Arc<dyn TextImprover>,
        exports: ExportService,
    ) -> Self {
        Self {
            editor,
            improver,
            exports,
            notices: Vec::new(),
        }
    }

    /// The underlying editor.
    #[must_use]
    pub fn editor(&self) -> &Editor {
        &self.editor
    }

    /// The underlying editor, for pointer handling and canvas setup.
    pub fn editor_mut(&mut self) -> &mut Editor {
        &mut self.editor
    }

    /// Forward a pointer event to the editor.
    pub fn handle_pointer(&mut self, event: &PointerEvent) -> PointerOutcome {
        self.editor.handle_pointer(event)
    }

    /// Add a default text element.
    pub fn add_text(&self) -> ElementId {
        self.editor.insert_text()
    }

    /// Add an image element referencing `src` (e.g. a sample image URL).
    pub fn add_image(&self, src: impl Into<ImageSource>) -> ElementId {
        self.editor.insert_image(src)
    }

    /// Add an image element from a picked file.
    ///
    /// `None` (nothing picked) and unreadable files leave the document as is.
    pub async fn add_image_from_file(&self, path: Option<&Path>) -> Option<ElementId> {
        let source = ingest_file(path).await?;
        Some(self.editor.insert_image(source))
    }

    /// Replace the canvas background with a picked file.
    ///
    /// Returns whether the background changed.
    pub async fn set_background_from_file(&self, path: Option<&Path>) -> bool {
        match ingest_file(path).await {
            Some(source) => {
                self.editor.set_background(Some(source));
                true
            }
            None => false,
        }
    }

    /// Proofread the selected text element in place.
    ///
    /// Returns the text now in the element, or `None` if nothing was selected,
    /// the selection is not text, or the element went away while waiting.
    pub async fn proofread_selected(&self) -> Option<String> {
        let element = self.editor.selected_element()?;
        let ElementKind::Text { content } = &element.kind else {
            return None;
        };

        let improved = proofread(self.improver.as_ref(), content).await;
        self.editor
            .set_text(element.id, improved.clone())
            .then_some(improved)
    }

    /// Export the document, clearing the selection first.
    ///
    /// On success an info [`Notice`] names the written file. On failure the
    /// error is logged, an error [`Notice`] is queued, and `None` is returned.
    pub async fn export(&mut self, format: ExportFormat) -> Option<PathBuf> {
        self.editor.select(None);
        let doc = self.editor.document();

        match self.exports.export(doc, format).await {
            Ok(path) => {
                self.notices.push(Notice::exported(format, &path));
                Some(path)
            }
            Err(e) => {
                tracing::error!(error = %e, ?format, "export failed");
                self.notices.push(Notice::export_failed(format, &e));
                None
            }
        }
    }

    /// Export to `design-export.png`.
    pub async fn export_png(&mut self) -> Option<PathBuf> {
        self.export(ExportFormat::Png).await
    }

    /// Export to `design-export.jpeg`.
    pub async fn export_jpeg(&mut self) -> Option<PathBuf> {
        self.export(ExportFormat::Jpeg).await
    }

    /// Export to `design-export.pdf`.
    pub async fn export_pdf(&mut self) -> Option<PathBuf> {
        self.export(ExportFormat::Pdf).await
    }

    /// Pending notices, oldest first.
    #[must_use]
    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    /// Drain pending notices.
    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }
}
