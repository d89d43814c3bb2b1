//! Relationship validation functionality
//!
//! Reports dangling references, self-references and circular dependencies
//! in a schema graph. Findings are informational: extraction keeps every
//! edge and leaves it to consumers to decide how to present them.

use crate::models::SchemaGraph;
use petgraph::algo::tarjan_scc;
use petgraph::graph::{DiGraph, NodeIndex};
use std::collections::HashMap;
use tracing::debug;

/// Result of relationship validation
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RelationshipValidationResult {
    /// Endpoints naming an undeclared table or column
    pub dangling_references: Vec<DanglingReference>,
    /// Relationships whose source and target table are the same
    pub self_references: Vec<SelfReference>,
    /// Groups of tables that reference each other in a cycle
    pub circular_dependencies: Vec<CircularDependency>,
}

impl RelationshipValidationResult {
    pub fn is_clean(&self) -> bool {
        self.dangling_references.is_empty()
            && self.self_references.is_empty()
            && self.circular_dependencies.is_empty()
    }
}

/// Which end of a relationship a finding refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Source,
    Target,
}

/// A relationship endpoint that does not resolve against the table set
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DanglingReference {
    /// Index into [`SchemaGraph::relationships`]
    pub relationship_index: usize,
    pub endpoint: Endpoint,
    pub table: String,
    pub column: String,
    /// `false` when the table itself is missing
    pub table_exists: bool,
}

/// Self-reference detected
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelfReference {
    pub relationship_index: usize,
    pub table: String,
}

/// Circular dependency detected
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CircularDependency {
    /// Tables of one strongly connected component, sorted by name
    pub tables: Vec<String>,
}

/// Relationship validator
#[derive(Debug, Default)]
pub struct RelationshipValidator;

impl RelationshipValidator {
    /// Create a new relationship validator
    pub fn new() -> Self {
        Self
    }

    /// Validate every relationship of `graph`
    pub fn validate(&self, graph: &SchemaGraph) -> RelationshipValidationResult {
        let mut result = RelationshipValidationResult {
            dangling_references: self.find_dangling_references(graph),
            ..Default::default()
        };

        for (idx, relationship) in graph.relationships().iter().enumerate() {
            if relationship.is_self_reference() {
                result.self_references.push(SelfReference {
                    relationship_index: idx,
                    table: relationship.source_table.clone(),
                });
            }
        }

        result.circular_dependencies = self.find_cycles(graph);

        debug!(
            "Relationship validation: {} dangling, {} self-references, {} cycles",
            result.dangling_references.len(),
            result.self_references.len(),
            result.circular_dependencies.len()
        );
        result
    }

    /// Endpoints whose table or column is not declared
    pub fn find_dangling_references(&self, graph: &SchemaGraph) -> Vec<DanglingReference> {
        let mut dangling = Vec::new();
        for (idx, relationship) in graph.relationships().iter().enumerate() {
            let endpoints = [
                (Endpoint::Source, &relationship.source_table, &relationship.source_column),
                (Endpoint::Target, &relationship.target_table, &relationship.target_column),
            ];
            for (endpoint, table, column) in endpoints {
                if graph.has_column(table, column) {
                    continue;
                }
                dangling.push(DanglingReference {
                    relationship_index: idx,
                    endpoint,
                    table: table.clone(),
                    column: column.clone(),
                    table_exists: graph.has_table(table),
                });
            }
        }
        dangling
    }

    /// Table-level cycles of two or more tables
    ///
    /// Builds a directed graph with one node per table name (declared or
    /// not) and one edge per relationship, then reports every strongly
    /// connected component larger than one node.
    pub fn find_cycles(&self, graph: &SchemaGraph) -> Vec<CircularDependency> {
        let mut table_graph = DiGraph::<&str, ()>::new();
        let mut node_map: HashMap<&str, NodeIndex> = HashMap::new();

        for relationship in graph.relationships() {
            let source = *node_map
                .entry(relationship.source_table.as_str())
                .or_insert_with(|| table_graph.add_node(relationship.source_table.as_str()));
            let target = *node_map
                .entry(relationship.target_table.as_str())
                .or_insert_with(|| table_graph.add_node(relationship.target_table.as_str()));
            table_graph.add_edge(source, target, ());
        }

        let mut cycles: Vec<CircularDependency> = tarjan_scc(&table_graph)
            .into_iter()
            .filter(|component| component.len() > 1)
            .map(|component| {
                let mut tables: Vec<String> = component
                    .into_iter()
                    .map(|node| table_graph[node].to_string())
                    .collect();
                tables.sort();
                CircularDependency { tables }
            })
            .collect();
        cycles.sort_by(|a, b| a.tables.cmp(&b.tables));
        cycles
    }
}
