//! TMDL relationship extraction
//!
//! A relationships block lists one `relationship` declaration per edge:
//!
//! ```text
//! relationship 8d1f5c2e-...
//!     fromColumn: Sales.CustomerKey
//!     toColumn: Customer.CustomerKey
//!
//! relationship 3b7a...
//!     fromColumn: Sales.OrderDate
//!     toColumn: LocalDateTable_5e1d.Date
//! ```
//!
//! Consecutive `fromColumn` / `toColumn` references pair into one
//! [`Relationship`]. Pairs touching a synthetic date table are discarded.

use super::ImportWarning;
use super::config::ExtractionConfig;
use super::lexer::{identifier_at, split_reference, unquote};
use super::tmdl::strip_bom;
use crate::models::Relationship;
use tracing::debug;

const FROM_MARKER: &str = "fromColumn:";
const TO_MARKER: &str = "toColumn:";
const RELATIONSHIP_KEYWORD: &str = "relationship";

/// Output of one relationship block
#[derive(Debug, Default)]
pub struct RelationshipExtraction {
    pub relationships: Vec<Relationship>,
    /// Pairs dropped because an endpoint is a synthetic date table
    pub discarded: usize,
}

/// Pairs `fromColumn` / `toColumn` references into relationship edges
pub struct RelationshipExtractor<'a> {
    config: &'a ExtractionConfig,
}

/// References seen since the last completed pair
#[derive(Default)]
struct PendingPair {
    name: Option<String>,
    from: Option<(usize, String)>,
    to: Option<(usize, String)>,
}

impl PendingPair {
    fn is_empty(&self) -> bool {
        self.from.is_none() && self.to.is_none()
    }
}

impl<'a> RelationshipExtractor<'a> {
    pub fn new(config: &'a ExtractionConfig) -> Self {
        Self { config }
    }

    /// Extract relationships from one block
    ///
    /// Never fails: malformed references and incomplete pairs are recorded in
    /// `warnings` and skipped.
    pub fn extract(
        &self,
        block: &str,
        block_index: usize,
        warnings: &mut Vec<ImportWarning>,
    ) -> RelationshipExtraction {
        let mut extraction = RelationshipExtraction::default();
        let mut pending = PendingPair::default();

        for (idx, raw_line) in strip_bom(block).lines().enumerate() {
            let line_number = idx + 1;
            let line = raw_line.trim();

            if let Some(reference) = line.strip_prefix(FROM_MARKER) {
                pending.from = Some((line_number, reference.trim().to_string()));
            } else if let Some(reference) = line.strip_prefix(TO_MARKER) {
                pending.to = Some((line_number, reference.trim().to_string()));
            } else if line.split_whitespace().next() == Some(RELATIONSHIP_KEYWORD) {
                Self::flush_incomplete(&pending, block_index, warnings);
                pending = PendingPair {
                    name: identifier_at(line, 1).ok().map(|n| unquote(n).to_string()),
                    ..PendingPair::default()
                };
                continue;
            } else {
                continue;
            }

            if pending.from.is_some() && pending.to.is_some() {
                let completed = std::mem::take(&mut pending);
                self.resolve(completed, block_index, &mut extraction, warnings);
            }
        }

        Self::flush_incomplete(&pending, block_index, warnings);
        extraction
    }

    fn resolve(
        &self,
        pair: PendingPair,
        block_index: usize,
        extraction: &mut RelationshipExtraction,
        warnings: &mut Vec<ImportWarning>,
    ) {
        let (Some((from_line, from)), Some((to_line, to))) = (pair.from, pair.to) else {
            return;
        };

        let Some((source_table, source_column)) = split_reference(&from) else {
            warnings.push(ImportWarning::MalformedReference {
                block: block_index,
                line: from_line,
                reference: from,
            });
            return;
        };
        let Some((target_table, target_column)) = split_reference(&to) else {
            warnings.push(ImportWarning::MalformedReference {
                block: block_index,
                line: to_line,
                reference: to,
            });
            return;
        };

        let synthetic = [source_table, source_column, target_table, target_column]
            .iter()
            .any(|part| self.config.is_synthetic_date(part));
        if synthetic {
            debug!("Discarding synthetic date relationship {} -> {}", from, to);
            extraction.discarded += 1;
            return;
        }

        let mut relationship =
            Relationship::new(source_table, source_column, target_table, target_column);
        relationship.name = pair.name;
        extraction.relationships.push(relationship);
    }

    fn flush_incomplete(pending: &PendingPair, block_index: usize, warnings: &mut Vec<ImportWarning>) {
        if pending.is_empty() {
            return;
        }
        let (line, missing) = match (&pending.from, &pending.to) {
            (Some((line, _)), None) => (*line, TO_MARKER),
            (None, Some((line, _))) => (*line, FROM_MARKER),
            _ => return,
        };
        warnings.push(ImportWarning::IncompleteRelationship {
            block: block_index,
            line,
            missing: missing.trim_end_matches(':').to_string(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(block: &str) -> (RelationshipExtraction, Vec<ImportWarning>) {
        let config = ExtractionConfig::default();
        let mut warnings = Vec::new();
        let extraction = RelationshipExtractor::new(&config).extract(block, 0, &mut warnings);
        (extraction, warnings)
    }

    #[test]
    fn test_pairs_consecutive_references() {
        let (extraction, warnings) = extract(
            "relationship a1\n\
             \tfromColumn: Sales.CustomerKey\n\
             \ttoColumn: Customer.CustomerKey\n\
             \n\
             relationship b2\n\
             \tcrossFilteringBehavior: bothDirections\n\
             \tfromColumn: 'Sales Order'.'Product Key'\n\
             \ttoColumn: Product.ProductKey\n",
        );

        assert!(warnings.is_empty());
        assert_eq!(extraction.discarded, 0);
        let edges: Vec<_> = extraction.relationships.iter().map(Relationship::as_tuple).collect();
        assert_eq!(
            edges,
            [
                ("Sales", "CustomerKey", "Customer", "CustomerKey"),
                ("Sales Order", "Product Key", "Product", "ProductKey"),
            ]
        );
        assert_eq!(extraction.relationships[0].name.as_deref(), Some("a1"));
        assert_eq!(extraction.relationships[1].name.as_deref(), Some("b2"));
    }

    #[test]
    fn test_synthetic_date_pairs_are_discarded() {
        let (extraction, warnings) = extract(
            "relationship d1\n\
             \tfromColumn: Sales.OrderDate\n\
             \ttoColumn: LocalDateTable_5e1d.Date\n\
             relationship d2\n\
             \tfromColumn: Sales.LocalDateKey\n\
             \ttoColumn: Calendar.Key\n\
             relationship ok\n\
             \tfromColumn: Sales.ProductKey\n\
             \ttoColumn: Product.ProductKey\n",
        );

        assert!(warnings.is_empty());
        assert_eq!(extraction.discarded, 2);
        assert_eq!(extraction.relationships.len(), 1);
        assert_eq!(extraction.relationships[0].target_table, "Product");
    }

    #[test]
    fn test_malformed_reference_skips_only_that_pair() {
        let (extraction, warnings) = extract(
            "relationship bad\n\
             \tfromColumn: SalesCustomerKey\n\
             \ttoColumn: Customer.CustomerKey\n\
             relationship good\n\
             \tfromColumn: Sales.ProductKey\n\
             \ttoColumn: Product.ProductKey\n",
        );

        assert_eq!(extraction.relationships.len(), 1);
        assert_eq!(
            warnings,
            vec![ImportWarning::MalformedReference {
                block: 0,
                line: 2,
                reference: "SalesCustomerKey".to_string()
            }]
        );
    }

    #[test]
    fn test_incomplete_pair_is_reported() {
        let (extraction, warnings) = extract(
            "relationship half\n\
             \tfromColumn: Sales.CustomerKey\n\
             relationship full\n\
             \tfromColumn: Sales.ProductKey\n\
             \ttoColumn: Product.ProductKey\n",
        );

        assert_eq!(extraction.relationships.len(), 1);
        assert_eq!(extraction.relationships[0].source_column, "ProductKey");
        assert_eq!(
            warnings,
            vec![ImportWarning::IncompleteRelationship {
                block: 0,
                line: 2,
                missing: "toColumn".to_string()
            }]
        );
    }

    #[test]
    fn test_pairs_without_headers() {
        let (extraction, _) = extract(
            "fromColumn: A.x\ntoColumn: B.y\nfromColumn: A.x\ntoColumn: B.y\n",
        );
        assert_eq!(extraction.relationships.len(), 2);
        assert!(extraction.relationships[0].name.is_none());
    }

    #[test]
    fn test_byte_order_mark_before_header() {
        let (extraction, warnings) =
            extract("\u{feff}relationship r1\n\tfromColumn: A.x\n\ttoColumn: B.y\n");
        assert!(warnings.is_empty());
        assert_eq!(extraction.relationships.len(), 1);
        assert_eq!(extraction.relationships[0].name.as_deref(), Some("r1"));
    }
}
