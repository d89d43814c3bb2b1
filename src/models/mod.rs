//! Models module for the SDK
//!
//! Defines the schema graph produced by TMDL extraction: tables with their
//! ordered columns, and foreign-key relationships between them.

pub mod column;
pub mod relationship;
pub mod schema_graph;
pub mod table;

pub use column::Column;
pub use relationship::Relationship;
pub use schema_graph::SchemaGraph;
pub use table::Table;
