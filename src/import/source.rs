//! Source kinds and source-entry selection
//!
//! Callers extract archives themselves and hand over `(path, contents)`
//! entries. A [`SourceKind`] decides which entries carry the report layout
//! and which are TMDL blocks for schema extraction.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// Supported input kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    /// A Power BI project (`.Report` and `.SemanticModel` folders)
    PowerBi,
}

impl SourceKind {
    /// Human-readable name used in prompts
    pub fn display_name(&self) -> &'static str {
        match self {
            SourceKind::PowerBi => "Power BI",
        }
    }

    /// Whether the entry at `path` is the report layout document
    pub fn is_report(&self, path: &str) -> bool {
        match self {
            SourceKind::PowerBi => path.ends_with("report.json"),
        }
    }

    /// Whether the entry at `path` is a TMDL block to extract
    pub fn is_schema_block(&self, path: &str) -> bool {
        match self {
            SourceKind::PowerBi => {
                const EXCLUDED_PREFIXES: [&str; 2] = ["LocalDate", "DateTableTemplate"];
                let mut components: Vec<&str> = path.split('/').filter(|c| !c.is_empty()).collect();
                let Some(file_name) = components.pop() else {
                    return false;
                };
                let excluded = components.contains(&"cultures")
                    || EXCLUDED_PREFIXES.iter().any(|prefix| {
                        file_name.starts_with(prefix) || components.iter().any(|c| c.starts_with(prefix))
                    });
                if excluded {
                    return false;
                }
                file_name.ends_with("relationships.tmdl")
                    || (components.contains(&"tables") && file_name.ends_with(".tmdl"))
            }
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Error for unknown source kind names
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported source kind: {0}")]
pub struct UnknownSourceKind(pub String);

impl FromStr for SourceKind {
    type Err = UnknownSourceKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "power bi" | "powerbi" | "power-bi" | "pbip" => Ok(SourceKind::PowerBi),
            _ => Err(UnknownSourceKind(s.to_string())),
        }
    }
}

/// One already-extracted text unit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceEntry {
    /// Path inside the source, `/`-separated
    pub path: String,
    pub contents: String,
}

impl SourceEntry {
    pub fn new(path: impl Into<String>, contents: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            contents: contents.into(),
        }
    }
}

/// Entries selected from a source for documentation and schema extraction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceBundle {
    pub kind: SourceKind,
    /// Report layout document, if the source had one
    pub report: Option<String>,
    /// TMDL blocks in input order
    pub blocks: Vec<String>,
}

impl SourceBundle {
    /// Select the report and TMDL blocks of `entries` according to `kind`
    ///
    /// Entries matching neither rule, and blocks with blank contents, are
    /// dropped. A later report entry replaces an earlier one.
    pub fn from_entries(kind: SourceKind, entries: impl IntoIterator<Item = SourceEntry>) -> Self {
        let mut bundle = Self {
            kind,
            report: None,
            blocks: Vec::new(),
        };

        for entry in entries {
            if kind.is_report(&entry.path) {
                debug!("Selected report layout {}", entry.path);
                bundle.report = Some(entry.contents);
            } else if kind.is_schema_block(&entry.path) {
                if entry.contents.trim().is_empty() {
                    debug!("Dropping empty block {}", entry.path);
                    continue;
                }
                debug!("Selected schema block {}", entry.path);
                bundle.blocks.push(entry.contents);
            }
        }

        bundle
    }

    /// Whether the bundle has enough content to document
    pub fn is_complete(&self) -> bool {
        self.report.as_deref().is_some_and(|r| !r.is_empty()) && !self.blocks.is_empty()
    }
}

/// Base name for generated outputs of an uploaded source file
///
/// ```rust
/// use tmdl_er_sdk::import::source::document_stem;
///
/// assert_eq!(document_stem("Finance.SemanticModel.zip"), "Finance");
/// assert_eq!(document_stem("Finance.Report.zip"), "Finance");
/// assert_eq!(document_stem("export.zip"), "export");
/// ```
pub fn document_stem(file_name: &str) -> &str {
    for suffix in [".Report.zip", ".SemanticModel.zip", ".zip"] {
        if let Some(stem) = file_name.strip_suffix(suffix) {
            return stem;
        }
    }
    file_name
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_power_bi_selection() {
        let entries = vec![
            SourceEntry::new("Finance.Report/report.json", "{\"sections\":[]}"),
            SourceEntry::new("Finance.SemanticModel/definition/model.tmdl", "model Model"),
            SourceEntry::new("Finance.SemanticModel/definition/relationships.tmdl", "relationship r"),
            SourceEntry::new("Finance.SemanticModel/definition/tables/Sales.tmdl", "table Sales"),
            SourceEntry::new(
                "Finance.SemanticModel/definition/tables/LocalDateTable_1a.tmdl",
                "table LocalDateTable_1a",
            ),
            SourceEntry::new(
                "Finance.SemanticModel/definition/tables/DateTableTemplate_2b.tmdl",
                "table DateTableTemplate_2b",
            ),
            SourceEntry::new("Finance.SemanticModel/definition/cultures/en-US.tmdl", "culture en-US"),
            SourceEntry::new("Finance.SemanticModel/definition/tables/Empty.tmdl", "  \n"),
        ];

        let bundle = SourceBundle::from_entries(SourceKind::PowerBi, entries);

        assert_eq!(bundle.report.as_deref(), Some("{\"sections\":[]}"));
        assert_eq!(bundle.blocks, vec!["relationship r", "table Sales"]);
        assert!(bundle.is_complete());
    }

    #[test]
    fn test_schema_block_paths_by_component() {
        let kind = SourceKind::PowerBi;
        assert!(kind.is_schema_block("tables/Sales.tmdl"));
        assert!(kind.is_schema_block("/work/Model.SemanticModel/definition/tables/Sales.tmdl"));
        assert!(kind.is_schema_block("relationships.tmdl"));
        assert!(!kind.is_schema_block("tables/LocalDateTable_9c.tmdl"));
        assert!(!kind.is_schema_block("cultures/tables/en-US.tmdl"));
        assert!(!kind.is_schema_block("mytables/Sales.tmdl"));
        assert!(!kind.is_schema_block("tables/Sales.json"));
        assert!(!kind.is_schema_block("tables"));
    }

    #[test]
    fn test_incomplete_bundle() {
        let bundle = SourceBundle::from_entries(
            SourceKind::PowerBi,
            vec![SourceEntry::new("x/tables/A.tmdl", "table A")],
        );
        assert!(!bundle.is_complete());
    }

    #[test]
    fn test_source_kind_from_str() {
        assert_eq!("Power BI".parse::<SourceKind>(), Ok(SourceKind::PowerBi));
        assert_eq!("powerbi".parse::<SourceKind>(), Ok(SourceKind::PowerBi));
        assert!("pdf".parse::<SourceKind>().is_err());
        assert_eq!(SourceKind::PowerBi.to_string(), "Power BI");
    }
}
