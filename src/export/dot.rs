//! DOT exporter for ER diagrams
//!
//! Renders each table as an HTML-like record with one row per column and
//! each relationship as an edge between column ports. Layout and rasterizing
//! are left to a Graphviz engine (`fdp` by default).
//!
//! Relationships may reference tables or columns the graph does not declare.
//! Unknown tables are drawn as dashed placeholder boxes; unknown columns on a
//! known table attach the edge to the table as a whole.

use super::{ExportError, ExportResult};
use crate::models::SchemaGraph;
use serde::{Deserialize, Serialize};
use std::fmt::Write;
use tracing::debug;

/// Graph and styling attributes for the rendered diagram
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DiagramOptions {
    /// Graphviz layout engine (`layout` graph attribute)
    pub layout_engine: String,
    pub rankdir: String,
    /// Maximum drawing size in inches, `!` forces scaling up
    pub size: String,
    pub dpi: u32,
    pub splines: String,
    pub concentrate: bool,
    /// Background of the table-name header cell
    pub header_color: String,
    pub edge_color: String,
    pub arrowhead: String,
    pub edge_font_size: u32,
}

impl Default for DiagramOptions {
    fn default() -> Self {
        Self {
            layout_engine: "fdp".to_string(),
            rankdir: "TB".to_string(),
            size: "10,10!".to_string(),
            dpi: 600,
            splines: "polyline".to_string(),
            concentrate: true,
            header_color: "lightblue".to_string(),
            edge_color: "blue".to_string(),
            arrowhead: "crow".to_string(),
            edge_font_size: 10,
        }
    }
}

impl DiagramOptions {
    pub fn with_layout_engine(mut self, engine: impl Into<String>) -> Self {
        self.layout_engine = engine.into();
        self
    }

    pub fn with_dpi(mut self, dpi: u32) -> Self {
        self.dpi = dpi;
        self
    }
}

/// Exporter for Graphviz DOT format
#[derive(Debug, Clone, Default)]
pub struct DotExporter {
    options: DiagramOptions,
}

impl DotExporter {
    /// Create a new DOT exporter with default diagram options
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: DiagramOptions) -> Self {
        Self { options }
    }

    /// Export the schema graph as a DOT document
    pub fn export(&self, graph: &SchemaGraph) -> Result<ExportResult, ExportError> {
        let content = self.render(graph)?;
        Ok(ExportResult {
            content,
            format: "dot".to_string(),
        })
    }

    fn render(&self, graph: &SchemaGraph) -> Result<String, std::fmt::Error> {
        let o = &self.options;
        let mut dot = String::new();

        writeln!(dot, "digraph \"schema\" {{")?;
        writeln!(
            dot,
            "    graph [layout={}, rankdir={}, size={}, concentrate={}, splines={}, dpi={}];",
            quote(&o.layout_engine),
            quote(&o.rankdir),
            quote(&o.size),
            quote(&o.concentrate.to_string()),
            quote(&o.splines),
            quote(&o.dpi.to_string()),
        )?;
        writeln!(dot, "    node [shape=\"plaintext\"];")?;

        for table in graph.tables() {
            writeln!(dot)?;
            writeln!(dot, "    {} [label=<", quote(&table.name))?;
            writeln!(
                dot,
                "    <TABLE BORDER=\"1\" CELLBORDER=\"1\" CELLSPACING=\"0\">"
            )?;
            writeln!(
                dot,
                "        <TR><TD BGCOLOR=\"{}\"><B>{}</B></TD></TR>",
                escape_html(&o.header_color),
                escape_html(&table.name)
            )?;
            for (idx, column) in table.columns.iter().enumerate() {
                writeln!(
                    dot,
                    "        <TR><TD ALIGN=\"LEFT\" PORT=\"{}\">{}</TD></TR>",
                    port(idx),
                    escape_html(&column.name)
                )?;
            }
            writeln!(dot, "    </TABLE>>];")?;
        }

        let mut placeholders: Vec<&str> = Vec::new();
        for relationship in graph.relationships() {
            for table in [&relationship.source_table, &relationship.target_table] {
                if !graph.has_table(table) && !placeholders.contains(&table.as_str()) {
                    placeholders.push(table);
                }
            }
        }
        if !placeholders.is_empty() {
            debug!("Rendering {} placeholder tables", placeholders.len());
            writeln!(dot)?;
        }
        for table in &placeholders {
            writeln!(
                dot,
                "    {} [shape=\"box\", style=\"dashed\", label={}];",
                quote(table),
                quote(table)
            )?;
        }

        if !graph.relationships().is_empty() {
            writeln!(dot)?;
        }
        for relationship in graph.relationships() {
            writeln!(
                dot,
                "    {} -> {} [label={}, color={}, arrowhead={}, fontsize={}];",
                endpoint(graph, &relationship.source_table, &relationship.source_column),
                endpoint(graph, &relationship.target_table, &relationship.target_column),
                quote(&format!(
                    "{} \u{2192} {}",
                    relationship.source_column, relationship.target_column
                )),
                quote(&o.edge_color),
                quote(&o.arrowhead),
                quote(&o.edge_font_size.to_string()),
            )?;
        }

        writeln!(dot, "}}")?;
        Ok(dot)
    }
}

fn port(column_index: usize) -> String {
    format!("c{}", column_index)
}

/// `"table":"port"` when the column is declared, otherwise `"table"`
fn endpoint(graph: &SchemaGraph, table: &str, column: &str) -> String {
    let column_index = graph
        .table(table)
        .and_then(|t| t.columns.iter().position(|c| c.name == column));
    match column_index {
        Some(idx) => format!("{}:{}", quote(table), quote(&port(idx))),
        None => quote(table),
    }
}

/// Quote a DOT identifier
fn quote(value: &str) -> String {
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('"');
    for c in value.chars() {
        match c {
            '"' => quoted.push_str("\\\""),
            '\\' => quoted.push_str("\\\\"),
            '\n' => quoted.push_str("\\n"),
            _ => quoted.push(c),
        }
    }
    quoted.push('"');
    quoted
}

fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
