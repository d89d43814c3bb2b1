//! Validation functionality
//!
//! Provides validation logic for:
//! - Relationship validation (dangling references, self-references, circular dependencies)

pub mod relationships;

pub use relationships::{
    CircularDependency, DanglingReference, Endpoint, RelationshipValidationResult,
    RelationshipValidator, SelfReference,
};
