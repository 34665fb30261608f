//! # DesignLite App
//!
//! Host-side services around the DesignLite editor core.
//!
//! The core is synchronous and knows nothing about files, networks, or
//! encoders. This crate supplies those collaborators and composes them into
//! an [`EditorSession`]:
//!
//! ```text
//! file pick ──▶ ingest ──▶ data: URI ──┐
//!                                      ▼
//! pointer events ──────────────▶ EditorSession ──▶ export ──▶ design-export.{png,pdf}
//!                                      │                │
//!                 proofread ◀──────────┘                └──▶ Notice queue (on failure)
//! ```
//!
//! ## Configuration
//!
//! [`AppConfig::from_env`] reads `GEMINI_API_KEY` (or `API_KEY`),
//! `DESIGNLITE_GEMINI_URL`, `DESIGNLITE_EXPORT_DIR`, and
//! `DESIGNLITE_EXPORT_SCALE`.
//!
//! ## Logging
//!
//! [`init_tracing`] installs a subscriber honoring `RUST_LOG`, with JSON
//! output when `RUST_LOG_FORMAT=json`.

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod export;
pub mod ingest;
pub mod proofread;
pub mod session;

pub use config::AppConfig;
pub use export::{export_file_name, ExportError, ExportService, Notice, NoticeLevel};
pub use ingest::{image_source_from_bytes, ingest_file, read_image, IngestError};
pub use proofread::{proofread, GeminiClient, ProofreadError, TextImprover};
pub use session::EditorSession;

use tracing_subscriber::util::TryInitError;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Log filter used when `RUST_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "info,designlite_core=debug,designlite_app=debug";

/// Initialize structured tracing with optional JSON format.
///
/// Set `RUST_LOG` to control log levels (default: [`DEFAULT_LOG_FILTER`]).
/// Set `RUST_LOG_FORMAT=json` for JSON output.
///
/// # Errors
///
/// Returns an error if a global subscriber is already installed.
pub fn init_tracing() -> Result<(), TryInitError> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_file(true)
        .with_line_number(true);

    if std::env::var("RUST_LOG_FORMAT").as_deref() == Ok("json") {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer.json())
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .try_init()
    }
}
