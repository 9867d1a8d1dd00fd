//! Delivery of finished exports.
//!
//! # Responsibilities
//! - Normalize export filenames (`.csv` suffix)
//! - Hand content to a [`FileSink`]
//! - Build the HTTP attachment response used by the export endpoints
//!
//! # Design Decisions
//! - Sink failures propagate to the caller untouched; no retry here
//! - Sinks are injected so the encoders stay testable without a filesystem

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};

use crate::export::ExportError;

/// Somewhere a finished export can be saved.
pub trait FileSink: Send + Sync {
    fn save(&self, content: &str, filename: &str) -> Result<(), ExportError>;
}

/// Append `.csv` unless the name already ends with it (any case).
pub fn normalize_filename(filename: &str) -> String {
    if filename.to_ascii_lowercase().ends_with(".csv") {
        filename.to_string()
    } else {
        format!("{filename}.csv")
    }
}

/// Save `content` through `sink` under the normalized filename.
pub fn trigger_download(sink: &dyn FileSink, content: &str, filename: &str) -> Result<(), ExportError> {
    let filename = normalize_filename(filename);
    tracing::debug!(filename = %filename, bytes = content.len(), "Saving export");
    sink.save(content, &filename)
}

/// Writes exports as files inside a root directory.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    root: PathBuf,
}

impl DirectorySink {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path a filename will be written to, if it is a plain file name.
    pub fn path_for(&self, filename: &str) -> Result<PathBuf, ExportError> {
        let plain = !filename.is_empty()
            && filename != "."
            && filename != ".."
            && !filename.contains(['/', '\\'])
            && !filename.contains("..");
        if !plain {
            return Err(ExportError::InvalidFilename(filename.to_string()));
        }
        Ok(self.root.join(filename))
    }
}

impl FileSink for DirectorySink {
    fn save(&self, content: &str, filename: &str) -> Result<(), ExportError> {
        let path = self.path_for(filename)?;
        fs::create_dir_all(&self.root)?;
        fs::write(&path, content)?;
        tracing::info!(path = %path.display(), "Export written");
        Ok(())
    }
}

/// Keeps saved exports in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    files: Mutex<Vec<(String, String)>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Saved `(filename, content)` pairs in save order.
    pub fn files(&self) -> Vec<(String, String)> {
        self.files.lock().expect("memory sink mutex poisoned").clone()
    }
}

impl FileSink for MemorySink {
    fn save(&self, content: &str, filename: &str) -> Result<(), ExportError> {
        self.files
            .lock()
            .expect("memory sink mutex poisoned")
            .push((filename.to_string(), content.to_string()));
        Ok(())
    }
}

/// A `200 OK` CSV attachment named after the normalized filename.
pub fn csv_attachment(content: String, filename: &str) -> Response {
    let filename = normalize_filename(filename).replace(['"', '\\', '\r', '\n'], "_");
    let disposition = HeaderValue::from_str(&format!("attachment; filename=\"{filename}\""))
        .unwrap_or_else(|_| HeaderValue::from_static("attachment; filename=\"export.csv\""));

    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, HeaderValue::from_static("text/csv; charset=utf-8")),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        content,
    )
        .into_response()
}
