//! Error handling for the SigEdit-RS application
//!
//! This module defines custom error types and a Result alias for use
//! throughout the application. The editing core reports its own narrow
//! taxonomy through [`EditorError`], which converts into the crate-wide
//! [`SigEditError`] at the collaborator boundary.

use thiserror::Error;

/// Failures raised by the editing core
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EditorError {
    /// Ingested table is missing required channels or has misaligned lengths
    #[error("Schema error: {0}")]
    Schema(String),

    /// Undo attempted with no captured snapshot
    #[error("No edit history to undo")]
    NoHistory,

    /// Marker category key outside the enumerated set
    #[error("Invalid marker category: {0:?}")]
    InvalidCategory(String),

    /// A sample index or range outside the current store
    #[error("Index range {start}..={end} out of bounds for {len} samples")]
    IndexOutOfRange { start: usize, end: usize, len: usize },
}

/// Main error type for SigEdit-RS operations
#[derive(Error, Debug)]
pub enum SigEditError {
    /// Errors from the editing core
    #[error(transparent)]
    Editor(#[from] EditorError),

    /// Errors related to reading data files
    #[error("Ingestion error: {0}")]
    Ingest(String),

    /// Errors related to writing exported files
    #[error("Export error: {0}")]
    Export(String),

    /// Errors from the CSV reader/writer
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Errors related to configuration loading/saving
    #[error("Configuration error: {0}")]
    Config(String),

    /// Errors reported by the peak detection service
    #[error("Detection error: {0}")]
    Detection(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Generic errors with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<SigEditError>,
    },
}

impl SigEditError {
    /// Add context to an error
    pub fn with_context(self, context: impl Into<String>) -> Self {
        SigEditError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }
}

/// Result type alias for SigEdit-RS operations
pub type Result<T> = std::result::Result<T, SigEditError>;

/// Extension trait for adding context to Results
pub trait ResultExt<T> {
    /// Add context to an error result
    fn context(self, context: impl Into<String>) -> Result<T>;

    /// Add context lazily to an error result
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T, E> ResultExt<T> for std::result::Result<T, E>
where
    E: Into<SigEditError>,
{
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.into().with_context(context))
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| e.into().with_context(f()))
    }
}
