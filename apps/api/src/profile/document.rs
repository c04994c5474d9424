//! Document text source: plain text out of an uploaded CV.

use std::panic::{catch_unwind, UnwindSafe};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("Failed to parse PDF: {0}")]
    Unreadable(String),

    #[error("PDF reader crashed on malformed input")]
    Crashed,
}

/// Extracts plain text from PDF bytes. Empty output is valid (a scanned CV, say).
///
/// Blocking and CPU-bound; async callers should run it on `spawn_blocking`.
pub fn extract_text(bytes: &[u8]) -> Result<String, DocumentError> {
    let text = guard_reader(|| pdf_extract::extract_text_from_mem(bytes))?
        .map_err(|e| DocumentError::Unreadable(e.to_string()))?;
    Ok(text.trim().to_string())
}

/// Runs a PDF reader call, turning a panic inside the library into `DocumentError::Crashed`.
fn guard_reader<T>(read: impl FnOnce() -> T + UnwindSafe) -> Result<T, DocumentError> {
    catch_unwind(read).map_err(|_| DocumentError::Crashed)
}
