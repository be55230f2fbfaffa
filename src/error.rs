use std::path::PathBuf;

use thiserror::Error;

use crate::locate::DocumentKind;

/// Convenient alias for fallible results returned throughout the crate.
pub type Result<T> = std::result::Result<T, MergeError>;

/// Error type covering the different failure cases that can occur while
/// locating the source files and assembling the combined workbook.
#[derive(Debug, Error)]
pub enum MergeError {
    /// Raised when one of the required source documents is not in the
    /// directory. This is the only condition that aborts the run with a
    /// non-zero status.
    #[error("{} file not found", .0.label())]
    MissingRequiredFile(DocumentKind),

    /// Wrapper for IO failures such as copying or enumerating files.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Errors bubbled up from the Excel writer implementation.
    #[error("Excel write error: {0}")]
    ExcelWrite(#[from] rust_xlsxwriter::XlsxError),

    /// Errors bubbled up from the Excel reader implementation.
    #[error("Excel read error: {0}")]
    ExcelRead(#[from] calamine::XlsxError),

    /// Raised when a filename pattern fails to compile.
    #[error("invalid filename pattern: {0}")]
    Pattern(#[from] globset::Error),

    /// Raised when a source workbook lacks the sheet it is copied from.
    #[error("sheet '{sheet}' not found in {}", path.display())]
    MissingSheet { path: PathBuf, sheet: String },

    /// Raised when the merge report cannot be serialised.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Raised when the tracing subscriber fails to initialise.
    #[error("failed to initialise logging: {0}")]
    Logging(String),
}

impl MergeError {
    /// Returns `true` when the error reports a missing required document.
    pub fn is_missing_file(&self) -> bool {
        matches!(self, MergeError::MissingRequiredFile(_))
    }
}
