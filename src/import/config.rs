//! Extraction configuration

use serde::{Deserialize, Serialize};

/// Which relationship blocks the relationship extractor consults
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RelationshipBlocks {
    /// Every block classified as a relationship block, in input order
    #[default]
    All,
    /// Only the first relationship block
    FirstOnly,
}

/// Configuration for TMDL table and relationship extraction
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Name prefixes of auto-generated calendar tables; relationships touching
    /// them are discarded
    pub synthetic_date_prefixes: Vec<String>,
    /// Relationship block selection
    pub relationship_blocks: RelationshipBlocks,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            synthetic_date_prefixes: vec!["LocalDate".to_string(), "DateTableTemplate".to_string()],
            relationship_blocks: RelationshipBlocks::All,
        }
    }
}

impl ExtractionConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the synthetic date-table prefixes
    pub fn with_synthetic_date_prefixes<I, S>(mut self, prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.synthetic_date_prefixes = prefixes.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_relationship_blocks(mut self, blocks: RelationshipBlocks) -> Self {
        self.relationship_blocks = blocks;
        self
    }

    /// Whether `name` belongs to a synthetic date table
    pub fn is_synthetic_date(&self, name: &str) -> bool {
        self.synthetic_date_prefixes
            .iter()
            .any(|prefix| !prefix.is_empty() && name.starts_with(prefix.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_prefixes() {
        let config = ExtractionConfig::default();
        assert!(config.is_synthetic_date("LocalDateTable_1c3e"));
        assert!(config.is_synthetic_date("DateTableTemplate_9a"));
        assert!(!config.is_synthetic_date("Date"));
    }

    #[test]
    fn test_empty_prefix_matches_nothing() {
        let config = ExtractionConfig::new().with_synthetic_date_prefixes([""]);
        assert!(!config.is_synthetic_date("Sales"));
    }

    #[test]
    fn test_deserialize_partial() {
        let config: ExtractionConfig =
            serde_json::from_str(r#"{"relationship_blocks": "first_only"}"#).unwrap();
        assert_eq!(config.relationship_blocks, RelationshipBlocks::FirstOnly);
        assert_eq!(config.synthetic_date_prefixes.len(), 2);
    }
}
