//! JSON exporter

use super::{ExportError, ExportResult};
use crate::models::SchemaGraph;

/// Exports a schema graph as pretty-printed JSON
#[derive(Debug, Default)]
pub struct JsonExporter;

impl JsonExporter {
    pub fn new() -> Self {
        Self
    }

    pub fn export(&self, graph: &SchemaGraph) -> Result<ExportResult, ExportError> {
        let content = serde_json::to_string_pretty(graph)
            .map_err(|e| ExportError::SerializationError(format!("Failed to serialize graph: {}", e)))?;
        Ok(ExportResult {
            content,
            format: "json".to_string(),
        })
    }
}
