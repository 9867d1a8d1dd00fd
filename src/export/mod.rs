//! Tabular export subsystem.
//!
//! # Data Flow
//! ```text
//! Expenses + Users + Events (read-only snapshots)
//!     → model.rs (id → name lookups, built once per call)
//!     → encoder.rs (always-quoted expense CSV / minimally quoted generic CSV)
//!     → download.rs (filename normalization → FileSink or HTTP attachment)
//! ```
//!
//! # Design Decisions
//! - Encoders are pure and total; unresolved references degrade to placeholders
//! - Row order mirrors input order, no sorting
//! - Delivery goes through an injected sink

pub mod download;
pub mod encoder;
pub mod model;

use thiserror::Error;

pub use download::{csv_attachment, normalize_filename, trigger_download, DirectorySink, FileSink, MemorySink};
pub use encoder::{encode_expenses_to_csv, encode_generic_records_to_csv, FlatRecord};
pub use model::{Event, Expense, User};

/// Errors raised while delivering or loading exports.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid export filename `{0}`")]
    InvalidFilename(String),

    #[error("invalid input JSON: {0}")]
    Json(#[from] serde_json::Error),
}
