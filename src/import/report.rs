//! Report layout summary
//!
//! Reads the page and visual structure out of a report layout document
//! (`report.json`). Visual container configs are JSON documents embedded as
//! strings and are decoded one by one.

use super::ImportError;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

/// Pages and visuals of a report layout
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct ReportSummary {
    /// Section (page) display names in document order
    pub sections: Vec<String>,
    /// Visual types of all visual containers, in document order
    pub visual_types: Vec<String>,
    /// Visual containers whose config could not be decoded
    pub warnings: Vec<String>,
}

impl ReportSummary {
    /// Summarize a report layout document
    ///
    /// # Errors
    ///
    /// Returns [`ImportError::ParseError`] if `text` is not a JSON object.
    pub fn from_json(text: &str) -> Result<Self, ImportError> {
        let document: Value = serde_json::from_str(text)
            .map_err(|e| ImportError::ParseError(format!("Invalid report layout: {}", e)))?;
        let Some(document) = document.as_object() else {
            return Err(ImportError::ParseError(
                "Report layout is not a JSON object".to_string(),
            ));
        };

        let mut summary = Self::default();
        let sections = document
            .get("sections")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default();

        for (section_index, section) in sections.iter().enumerate() {
            let display_name = section
                .get("displayName")
                .and_then(Value::as_str)
                .unwrap_or_default();
            summary.sections.push(display_name.to_string());

            let containers = section
                .get("visualContainers")
                .and_then(Value::as_array)
                .map(Vec::as_slice)
                .unwrap_or_default();
            for (container_index, container) in containers.iter().enumerate() {
                summary.read_container(section_index, container_index, container);
            }
        }

        debug!(
            "Report layout has {} sections and {} visuals",
            summary.sections.len(),
            summary.visual_types.len()
        );
        Ok(summary)
    }

    fn read_container(&mut self, section: usize, container: usize, value: &Value) {
        let config = match value.get("config") {
            Some(Value::String(raw)) => match serde_json::from_str::<Value>(raw) {
                Ok(config) => config,
                Err(e) => {
                    self.warnings.push(format!(
                        "section {} visual {}: invalid config ({})",
                        section, container, e
                    ));
                    return;
                }
            },
            Some(config @ Value::Object(_)) => config.clone(),
            _ => return,
        };

        if let Some(visual_type) = config
            .get("singleVisual")
            .and_then(|v| v.get("visualType"))
            .and_then(Value::as_str)
        {
            self.visual_types.push(visual_type.to_string());
        }
    }
}
