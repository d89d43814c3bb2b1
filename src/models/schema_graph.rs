//! Schema graph model
//!
//! The schema graph is rebuilt from scratch for every import and owns the
//! table set and the edge list of that single run.

use super::relationship::Relationship;
use super::table::{Table, upsert_table};
use serde::{Deserialize, Serialize};

/// Directed graph of tables (nodes) and foreign-key relationships (edges)
///
/// Table names are unique; inserting a table whose name already exists
/// replaces its column list but keeps its original position. Relationships
/// are kept in extraction order and are never deduplicated. Edges may point
/// at tables or columns that are not part of the table set.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(from = "SchemaGraphParts")]
pub struct SchemaGraph {
    tables: Vec<Table>,
    relationships: Vec<Relationship>,
}

/// Serialized form; rebuilt through [`SchemaGraph::from_parts`] so that
/// duplicate table names collapse on load
#[derive(Deserialize)]
struct SchemaGraphParts {
    #[serde(default)]
    tables: Vec<Table>,
    #[serde(default)]
    relationships: Vec<Relationship>,
}

impl From<SchemaGraphParts> for SchemaGraph {
    fn from(parts: SchemaGraphParts) -> Self {
        SchemaGraph::from_parts(parts.tables, parts.relationships)
    }
}

impl SchemaGraph {
    /// Create an empty schema graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Compose a graph from extracted tables and relationships
    ///
    /// Duplicate table names collapse to one entry, last declaration wins.
    /// Relationships are retained as-is, including dangling ones.
    pub fn from_parts(
        tables: impl IntoIterator<Item = Table>,
        relationships: impl IntoIterator<Item = Relationship>,
    ) -> Self {
        let mut graph = Self::new();
        for table in tables {
            graph.insert_table(table);
        }
        graph.relationships.extend(relationships);
        graph
    }

    /// Insert or replace a table; returns `true` if a table was replaced
    pub fn insert_table(&mut self, table: Table) -> bool {
        upsert_table(&mut self.tables, table)
    }

    pub fn add_relationship(&mut self, relationship: Relationship) {
        self.relationships.push(relationship);
    }

    pub fn tables(&self) -> &[Table] {
        &self.tables
    }

    pub fn relationships(&self) -> &[Relationship] {
        &self.relationships
    }

    pub fn table(&self, name: &str) -> Option<&Table> {
        self.tables.iter().find(|t| t.name == name)
    }

    pub fn has_table(&self, name: &str) -> bool {
        self.table(name).is_some()
    }

    /// Whether `table.column` is declared in this graph
    pub fn has_column(&self, table: &str, column: &str) -> bool {
        self.table(table).is_some_and(|t| t.has_column(column))
    }

    /// `(table name, ordered column names)` pairs in table insertion order
    pub fn table_columns(&self) -> impl Iterator<Item = (&str, Vec<&str>)> {
        self.tables
            .iter()
            .map(|t| (t.name.as_str(), t.column_names().collect()))
    }

    /// `(source table, source column, target table, target column)` edges in
    /// extraction order
    pub fn edges(&self) -> impl Iterator<Item = (&str, &str, &str, &str)> {
        self.relationships.iter().map(Relationship::as_tuple)
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty() && self.relationships.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Column;

    fn table(name: &str, columns: &[&str]) -> Table {
        Table::new(name, columns.iter().map(|c| Column::new(*c)).collect())
    }

    #[test]
    fn test_from_parts_last_write_wins() {
        let graph = SchemaGraph::from_parts(
            vec![
                table("Sales", &["Amount"]),
                table("Customer", &["CustomerKey"]),
                table("Sales", &["CustomerKey", "Amount", "Qty"]),
            ],
            Vec::new(),
        );

        let pairs: Vec<_> = graph.table_columns().collect();
        assert_eq!(pairs.len(), 2);
        assert_eq!(pairs[0], ("Sales", vec!["CustomerKey", "Amount", "Qty"]));
        assert_eq!(pairs[1], ("Customer", vec!["CustomerKey"]));
    }

    #[test]
    fn test_dangling_edges_are_retained() {
        let graph = SchemaGraph::from_parts(
            vec![table("Sales", &["CustomerKey"])],
            vec![
                Relationship::new("Sales", "CustomerKey", "Customer", "CustomerKey"),
                Relationship::new("Sales", "CustomerKey", "Customer", "CustomerKey"),
            ],
        );

        assert_eq!(graph.relationships().len(), 2);
        assert!(!graph.has_table("Customer"));
        assert!(graph.has_column("Sales", "CustomerKey"));
        assert_eq!(
            graph.edges().next(),
            Some(("Sales", "CustomerKey", "Customer", "CustomerKey"))
        );
    }

    #[test]
    fn test_json_roundtrip_preserves_order() {
        let graph = SchemaGraph::from_parts(
            vec![table("B", &["y"]), table("A", &["x"])],
            vec![Relationship::new("B", "y", "A", "x").with_name("r1")],
        );
        let json = serde_json::to_string(&graph).unwrap();
        let parsed: SchemaGraph = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, graph);
        assert_eq!(parsed.tables()[0].name, "B");
    }

    #[test]
    fn test_deserialize_collapses_duplicate_tables() {
        let json = r#"{
            "tables": [
                {"name": "Sales", "columns": [{"name": "Amount"}]},
                {"name": "Customer", "columns": []},
                {"name": "Sales", "columns": [{"name": "CustomerKey"}, {"name": "Amount"}]}
            ],
            "relationships": []
        }"#;
        let graph: SchemaGraph = serde_json::from_str(json).unwrap();

        let pairs: Vec<_> = graph.table_columns().collect();
        assert_eq!(pairs.len(), 2);
        assert_eq!(pairs[0], ("Sales", vec!["CustomerKey", "Amount"]));
        assert_eq!(pairs[1], ("Customer", vec![]));
    }
}
