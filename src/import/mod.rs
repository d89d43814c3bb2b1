//! Import functionality
//!
//! Builds a [`SchemaGraph`] from TMDL semantic model blocks:
//! - [`lexer`]: identifier lexing for declaration lines
//! - [`tmdl`]: table and column extraction
//! - [`relationships`]: foreign-key extraction from relationship blocks
//! - [`source`]: selection of report and TMDL entries by source kind
//! - [`report`]: report layout summary
//!
//! Extraction is best-effort: malformed lines are skipped and reported as
//! [`ImportWarning`]s, never as errors.

pub mod config;
pub mod lexer;
pub mod relationships;
pub mod report;
pub mod source;
pub mod tmdl;

use crate::models::SchemaGraph;
use lexer::LexError;
use relationships::RelationshipExtractor;
use tmdl::{BlockKind, classify_block, extract_tables};
use tracing::info;

pub use config::{ExtractionConfig, RelationshipBlocks};
pub use report::ReportSummary;
pub use source::{SourceBundle, SourceEntry, SourceKind};

/// Result of an import operation
#[derive(Debug)]
pub struct ImportResult {
    /// Tables and relationships extracted from the input
    pub graph: SchemaGraph,
    /// Skipped lines and blocks
    pub warnings: Vec<ImportWarning>,
    /// Relationships dropped because they touch a synthetic date table
    pub discarded_relationships: usize,
}

/// Error during import
#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("Parse error: {0}")]
    ParseError(String),
}

/// A recoverable problem found while extracting; the offending line or
/// block was skipped
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ImportWarning {
    #[error("block {block}: no table name on the first declaration line ({reason})")]
    UnnamedBlock { block: usize, reason: LexError },
    #[error("block {block}, line {line}: column skipped ({reason})")]
    MalformedColumn {
        block: usize,
        line: usize,
        reason: LexError,
    },
    #[error("block {block}, line {line}: reference '{reference}' is not of the form table.column")]
    MalformedReference {
        block: usize,
        line: usize,
        reference: String,
    },
    #[error("block {block}, line {line}: relationship has no {missing}")]
    IncompleteRelationship {
        block: usize,
        line: usize,
        missing: String,
    },
    #[error("block {block}: table '{table}' declared again, earlier columns replaced")]
    RedeclaredTable { block: usize, table: String },
}

/// TMDL importer - composes table and relationship extraction into a schema graph
#[derive(Debug, Clone, Default)]
pub struct TmdlImporter {
    config: ExtractionConfig,
}

impl TmdlImporter {
    /// Create an importer with the default configuration
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ExtractionConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ExtractionConfig {
        &self.config
    }

    /// Extract a schema graph from TMDL blocks
    ///
    /// Each block is the full text of one file. Blank blocks are ignored,
    /// relationship blocks feed the edge list and every other block is read
    /// as a table. The same input always yields the same graph.
    pub fn import<S: AsRef<str>>(&self, blocks: &[S]) -> ImportResult {
        let mut warnings = Vec::new();
        let tables = extract_tables(blocks, &mut warnings);

        let extractor = RelationshipExtractor::new(&self.config);
        let mut relationships = Vec::new();
        let mut discarded = 0;

        let relationship_blocks = blocks
            .iter()
            .enumerate()
            .filter(|(_, block)| classify_block(block.as_ref()) == Some(BlockKind::Relationships));
        let limit = match self.config.relationship_blocks {
            RelationshipBlocks::All => usize::MAX,
            RelationshipBlocks::FirstOnly => 1,
        };

        for (block_index, block) in relationship_blocks.take(limit) {
            let extraction = extractor.extract(block.as_ref(), block_index, &mut warnings);
            discarded += extraction.discarded;
            relationships.extend(extraction.relationships);
        }

        let graph = SchemaGraph::from_parts(tables, relationships);
        info!(
            "Extracted {} tables and {} relationships ({} discarded, {} warnings)",
            graph.tables().len(),
            graph.relationships().len(),
            discarded,
            warnings.len()
        );

        ImportResult {
            graph,
            warnings,
            discarded_relationships: discarded,
        }
    }

    /// Extract a schema graph from the TMDL blocks of a source bundle
    pub fn import_bundle(&self, bundle: &SourceBundle) -> ImportResult {
        self.import(&bundle.blocks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RELATIONSHIPS: &str = "relationship r1\n\
        \tfromColumn: Sales.CustomerKey\n\
        \ttoColumn: Customer.CustomerKey\n";

    const MORE_RELATIONSHIPS: &str = "relationship r2\n\
        \tfromColumn: Sales.ProductKey\n\
        \ttoColumn: Product.ProductKey\n";

    #[test]
    fn test_import_builds_graph() {
        let blocks = [
            RELATIONSHIPS,
            "table Sales\n\tcolumn CustomerKey\n\tcolumn Amount\n",
            "table Customer\n\tcolumn CustomerKey\n\tcolumn Name\n",
        ];
        let result = TmdlImporter::new().import(&blocks);

        assert!(result.warnings.is_empty());
        assert_eq!(result.graph.tables().len(), 2);
        assert_eq!(
            result.graph.edges().collect::<Vec<_>>(),
            [("Sales", "CustomerKey", "Customer", "CustomerKey")]
        );
    }

    #[test]
    fn test_all_relationship_blocks_by_default() {
        let blocks = [RELATIONSHIPS, MORE_RELATIONSHIPS];
        let result = TmdlImporter::new().import(&blocks);
        assert_eq!(result.graph.relationships().len(), 2);
    }

    #[test]
    fn test_first_relationship_block_only() {
        let blocks = [RELATIONSHIPS, MORE_RELATIONSHIPS];
        let importer = TmdlImporter::with_config(
            ExtractionConfig::new().with_relationship_blocks(RelationshipBlocks::FirstOnly),
        );
        let result = importer.import(&blocks);
        assert_eq!(result.graph.relationships().len(), 1);
        assert_eq!(result.graph.relationships()[0].name.as_deref(), Some("r1"));
    }

    #[test]
    fn test_empty_input() {
        let blocks: [&str; 0] = [];
        let result = TmdlImporter::new().import(&blocks);
        assert!(result.graph.is_empty());
        assert!(result.warnings.is_empty());
    }
}
