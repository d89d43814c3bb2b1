//! TMDL ER SDK - Schema graphs from Power BI semantic models
//!
//! Provides:
//! - Table, column and relationship extraction from TMDL blocks
//! - ER diagram export (Graphviz DOT) and JSON export
//! - Relationship validation
//! - Decoding of streamed chat-completion responses
//! - Documentation prompts and request payloads
//!
//! ```rust
//! use tmdl_er_sdk::{DotExporter, TmdlImporter};
//!
//! let blocks = [
//!     "table Sales\n\tcolumn CustomerKey\n\tcolumn Amount",
//!     "table Customer\n\tcolumn CustomerKey",
//!     "relationship r1\n\tfromColumn: Sales.CustomerKey\n\ttoColumn: Customer.CustomerKey",
//! ];
//! let result = TmdlImporter::new().import(&blocks);
//!
//! assert_eq!(result.graph.tables().len(), 2);
//! assert_eq!(result.graph.relationships().len(), 1);
//!
//! let dot = DotExporter::new().export(&result.graph).unwrap();
//! assert!(dot.content.starts_with("digraph"));
//! ```

pub mod config;
pub mod export;
pub mod import;
pub mod llm;
pub mod models;
pub mod stream;
pub mod validation;

#[cfg(feature = "cli")]
pub mod cli;

// Re-export commonly used types
pub use config::{ConfigError, SdkConfig};
pub use export::{DiagramOptions, DotExporter, ExportError, ExportResult, JsonExporter};
pub use import::{
    ExtractionConfig, ImportError, ImportResult, ImportWarning, RelationshipBlocks,
    ReportSummary, SourceBundle, SourceEntry, SourceKind, TmdlImporter,
};
pub use llm::{ChatRequest, GenerationConfig, PromptContext};
pub use models::{Column, Relationship, SchemaGraph, Table};
pub use stream::{
    Accumulator, CancellationToken, DecoderState, DeltaStream, FrameDecoder, FrameError,
    StreamEvent, StreamProtocol,
};
pub use validation::{RelationshipValidationResult, RelationshipValidator};
