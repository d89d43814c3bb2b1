//! Output formatting for CLI

use crate::import::{ImportResult, ReportSummary};
use crate::validation::{Endpoint, RelationshipValidationResult};
use std::fmt::Write;

/// Format an extraction summary with its validation findings
pub fn format_import_summary(
    result: &ImportResult,
    validation: &RelationshipValidationResult,
) -> String {
    let mut output = String::new();

    if !result.warnings.is_empty() {
        output.push_str("\n⚠️  Skipped Lines:\n");
        for warning in &result.warnings {
            let _ = writeln!(output, "  - {}", warning);
        }
    }

    let graph = &result.graph;
    let _ = writeln!(output, "\n✅ Parsed {} table(s):", graph.tables().len());
    for (table, columns) in graph.table_columns() {
        let _ = writeln!(output, "  {} ({}): {}", table, columns.len(), columns.join(", "));
    }

    let _ = writeln!(
        output,
        "\n✅ Parsed {} relationship(s):",
        graph.relationships().len()
    );
    for (source_table, source_column, target_table, target_column) in graph.edges() {
        let _ = writeln!(
            output,
            "  {}.{} → {}.{}",
            source_table, source_column, target_table, target_column
        );
    }
    if result.discarded_relationships > 0 {
        let _ = writeln!(
            output,
            "  ({} relationship(s) to date tables omitted)",
            result.discarded_relationships
        );
    }

    if !validation.dangling_references.is_empty() {
        output.push_str("\n⚠️  Unresolved References:\n");
        for dangling in &validation.dangling_references {
            let side = match dangling.endpoint {
                Endpoint::Source => "from",
                Endpoint::Target => "to",
            };
            let missing = if dangling.table_exists { "column" } else { "table" };
            let _ = writeln!(
                output,
                "  - relationship {} {}: {}.{} (unknown {})",
                dangling.relationship_index + 1,
                side,
                dangling.table,
                dangling.column,
                missing
            );
        }
    }

    if !validation.circular_dependencies.is_empty() {
        output.push_str("\n⚠️  Circular Dependencies:\n");
        for cycle in &validation.circular_dependencies {
            let _ = writeln!(output, "  - {}", cycle.tables.join(" ↔ "));
        }
    }

    if result.warnings.is_empty() && validation.is_clean() {
        output.push_str("\n✅ All checks passed!\n");
    }

    output
}

/// Format the pages and visuals of a report layout
pub fn format_report_summary(summary: &ReportSummary) -> String {
    let mut output = String::new();
    let _ = writeln!(
        output,
        "Report: {} page(s), {} visual(s)",
        summary.sections.len(),
        summary.visual_types.len()
    );
    for section in &summary.sections {
        let _ = writeln!(output, "  - {}", section);
    }
    for warning in &summary.warnings {
        let _ = writeln!(output, "  ⚠️  {}", warning);
    }
    output
}
