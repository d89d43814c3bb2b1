//! Export functionality
//!
//! Provides exporters for a [`SchemaGraph`](crate::models::SchemaGraph):
//! - DOT (Graphviz ER diagram, laid out by an external engine)
//! - JSON

pub mod dot;
pub mod json;

/// Result of an export operation
#[derive(Debug)]
pub struct ExportResult {
    /// Exported content
    pub content: String,
    /// Format identifier
    pub format: String,
}

/// Error during export
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("Serialization error: {0}")]
    SerializationError(String),
    #[error("IO error: {0}")]
    IoError(String),
}

impl From<std::fmt::Error> for ExportError {
    fn from(err: std::fmt::Error) -> Self {
        ExportError::SerializationError(err.to_string())
    }
}

impl ExportResult {
    /// Write the exported content to `path`
    pub fn write_to(&self, path: &std::path::Path) -> Result<(), ExportError> {
        std::fs::write(path, &self.content)
            .map_err(|e| ExportError::IoError(format!("Failed to write {}: {}", path.display(), e)))
    }
}

// Re-export for convenience
pub use dot::{DiagramOptions, DotExporter};
pub use json::JsonExporter;
