//! Relationship model for the SDK

use serde::{Deserialize, Serialize};

/// A foreign-key edge from one table column to another
///
/// Endpoints are plain names and are not required to exist in the owning
/// [`SchemaGraph`](super::SchemaGraph); see
/// [`RelationshipValidator`](crate::validation::RelationshipValidator) for
/// dangling-reference reporting.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Relationship {
    /// Identifier from the `relationship <name>` header, when present
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub source_table: String,
    pub source_column: String,
    pub target_table: String,
    pub target_column: String,
}

impl Relationship {
    pub fn new(
        source_table: impl Into<String>,
        source_column: impl Into<String>,
        target_table: impl Into<String>,
        target_column: impl Into<String>,
    ) -> Self {
        Self {
            name: None,
            source_table: source_table.into(),
            source_column: source_column.into(),
            target_table: target_table.into(),
            target_column: target_column.into(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// The edge as a `(source table, source column, target table, target column)` tuple
    pub fn as_tuple(&self) -> (&str, &str, &str, &str) {
        (
            &self.source_table,
            &self.source_column,
            &self.target_table,
            &self.target_column,
        )
    }

    pub fn is_self_reference(&self) -> bool {
        self.source_table == self.target_table
    }
}
