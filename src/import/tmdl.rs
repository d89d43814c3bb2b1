//! TMDL table and column extraction
//!
//! Each TMDL block is the full text of one source file. A table block starts
//! with a `table <name>` declaration and declares its columns on lines whose
//! first token is `column`:
//!
//! ```text
//! table 'Sales Order'
//!     lineageTag: 1f0e...
//!
//!     column OrderKey
//!         dataType: int64
//!
//!     column 'Order Date' = RELATED(...)
//! ```
//!
//! Relationship blocks start with `relationship` and are handled by
//! [`relationships`](super::relationships).

use super::ImportWarning;
use super::lexer::{identifier_at, identifier_span_at, keyword, unquote};
use crate::models::{Column, Table};
use crate::models::table::upsert_table;
use tracing::{debug, warn};

const COLUMN_KEYWORD: &str = "column";
const RELATIONSHIP_PREFIX: &str = "relationship";
const DESCRIPTION_PREFIX: &str = "///";
const BYTE_ORDER_MARK: char = '\u{feff}';

/// Kind of a TMDL block, decided by its first declaration line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    /// A table definition with column declarations
    Table,
    /// A relationships file with `fromColumn` / `toColumn` pairs
    Relationships,
}

/// `block` without a leading UTF-8 byte-order mark
pub fn strip_bom(block: &str) -> &str {
    block.strip_prefix(BYTE_ORDER_MARK).unwrap_or(block)
}

/// The first line that is neither blank nor a `///` description, with its
/// 1-based line number
pub fn first_declaration(block: &str) -> Option<(usize, &str)> {
    strip_bom(block).lines().enumerate().find_map(|(idx, line)| {
        let trimmed = line.trim();
        (!trimmed.is_empty() && !trimmed.starts_with(DESCRIPTION_PREFIX)).then_some((idx + 1, line))
    })
}

/// Classify a block; blank blocks have no kind
pub fn classify_block(block: &str) -> Option<BlockKind> {
    let (_, line) = first_declaration(block)?;
    if line.trim_start().starts_with(RELATIONSHIP_PREFIX) {
        Some(BlockKind::Relationships)
    } else {
        Some(BlockKind::Table)
    }
}

/// Extract the table declared by one block
///
/// Returns `None`, recording a warning, when the first declaration line has
/// no usable name. Column lines that cannot be lexed are skipped with a
/// warning; the rest of the block is still read.
pub fn extract_table(
    block: &str,
    block_index: usize,
    warnings: &mut Vec<ImportWarning>,
) -> Option<Table> {
    let block = strip_bom(block);
    let (_, header) = first_declaration(block)?;
    let name = match identifier_at(header, 1) {
        Ok(name) => unquote(name),
        Err(reason) => {
            warn!("Skipping block {}: no table name ({})", block_index, reason);
            warnings.push(ImportWarning::UnnamedBlock {
                block: block_index,
                reason,
            });
            return None;
        }
    };

    let mut columns = Vec::new();
    for (idx, line) in block.lines().enumerate() {
        if keyword(line) != Some(COLUMN_KEYWORD) {
            continue;
        }
        match identifier_span_at(line, 1) {
            Ok(span) => {
                let column_name = unquote(&line[span.clone()]).to_string();
                if line[span.end..].trim_start().starts_with('=') {
                    columns.push(Column::calculated(column_name));
                } else {
                    columns.push(Column::new(column_name));
                }
            }
            Err(reason) => {
                debug!(
                    "Skipping column line {} of block {}: {}",
                    idx + 1,
                    block_index,
                    reason
                );
                warnings.push(ImportWarning::MalformedColumn {
                    block: block_index,
                    line: idx + 1,
                    reason,
                });
            }
        }
    }

    debug!("Extracted table '{}' with {} columns", name, columns.len());
    Some(Table::new(name, columns))
}

/// Extract every table block of `blocks` into a name-unique table list
///
/// Relationship and blank blocks are skipped. A table declared twice keeps
/// its first position and its last column list.
pub fn extract_tables<S: AsRef<str>>(blocks: &[S], warnings: &mut Vec<ImportWarning>) -> Vec<Table> {
    let mut tables = Vec::new();
    for (block_index, block) in blocks.iter().enumerate() {
        let block = block.as_ref();
        if classify_block(block) != Some(BlockKind::Table) {
            continue;
        }
        if let Some(table) = extract_table(block, block_index, warnings) {
            let name = table.name.clone();
            if upsert_table(&mut tables, table) {
                warnings.push(ImportWarning::RedeclaredTable {
                    block: block_index,
                    table: name,
                });
            }
        }
    }
    tables
}
