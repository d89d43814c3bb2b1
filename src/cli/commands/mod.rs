//! CLI command implementations

pub mod decode;
pub mod diagram;
pub mod prompt;

use crate::cli::error::CliError;
use crate::import::{SourceBundle, SourceEntry, SourceKind};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Build a source bundle from files and directories
///
/// Directories are walked recursively and filtered by the source kind's
/// entry rules. Files named explicitly are always taken, as the report if
/// the kind recognizes them as one, otherwise as a TMDL block.
pub fn load_bundle(paths: &[PathBuf], kind: SourceKind) -> Result<SourceBundle, CliError> {
    let mut bundle = SourceBundle::from_entries(kind, Vec::new());

    for path in paths {
        if path.is_dir() {
            let mut files = Vec::new();
            collect_files(path, &mut files)?;
            files.sort();
            debug!("Found {} files under {}", files.len(), path.display());

            let entries = files
                .iter()
                .map(|file| Ok(SourceEntry::new(entry_path(file), read_file(file)?)))
                .collect::<Result<Vec<_>, CliError>>()?;
            let found = SourceBundle::from_entries(kind, entries);
            if found.report.is_some() {
                bundle.report = found.report;
            }
            bundle.blocks.extend(found.blocks);
        } else {
            let contents = read_file(path)?;
            if kind.is_report(&entry_path(path)) {
                bundle.report = Some(contents);
            } else {
                bundle.blocks.push(contents);
            }
        }
    }

    Ok(bundle)
}

fn collect_files(dir: &Path, files: &mut Vec<PathBuf>) -> Result<(), CliError> {
    let entries = std::fs::read_dir(dir)
        .map_err(|e| CliError::FileReadError(dir.to_path_buf(), e.to_string()))?;
    for entry in entries {
        let path = entry
            .map_err(|e| CliError::FileReadError(dir.to_path_buf(), e.to_string()))?
            .path();
        if path.is_dir() {
            collect_files(&path, files)?;
        } else {
            files.push(path);
        }
    }
    Ok(())
}

fn read_file(path: &Path) -> Result<String, CliError> {
    std::fs::read_to_string(path).map_err(|e| CliError::FileReadError(path.to_path_buf(), e.to_string()))
}

/// `/`-separated form of a path for entry matching
fn entry_path(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_load_bundle_from_directory() {
        let dir = tempfile::tempdir().unwrap();
        let definition = dir.path().join("Finance.SemanticModel/definition");
        fs::create_dir_all(definition.join("tables")).unwrap();
        fs::create_dir_all(dir.path().join("Finance.Report")).unwrap();
        fs::write(definition.join("relationships.tmdl"), "relationship r1\n").unwrap();
        fs::write(definition.join("model.tmdl"), "model Model\n").unwrap();
        fs::write(definition.join("tables/Sales.tmdl"), "table Sales\n").unwrap();
        fs::write(definition.join("tables/LocalDateTable_1.tmdl"), "table LocalDateTable_1\n").unwrap();
        fs::write(dir.path().join("Finance.Report/report.json"), "{}").unwrap();

        let bundle = load_bundle(&[dir.path().to_path_buf()], SourceKind::PowerBi).unwrap();

        assert_eq!(bundle.report.as_deref(), Some("{}"));
        assert_eq!(bundle.blocks.len(), 2);
        assert!(bundle.blocks.contains(&"table Sales\n".to_string()));
    }

    #[test]
    fn test_load_bundle_from_tables_directory() {
        let dir = tempfile::tempdir().unwrap();
        let tables = dir.path().join("tables");
        fs::create_dir_all(&tables).unwrap();
        fs::write(tables.join("Sales.tmdl"), "table Sales\n").unwrap();
        fs::write(tables.join("LocalDateTable_1.tmdl"), "table LocalDateTable_1\n").unwrap();

        let bundle = load_bundle(&[tables], SourceKind::PowerBi).unwrap();
        assert_eq!(bundle.blocks, ["table Sales\n"]);
    }

    #[test]
    fn test_explicit_files_are_always_blocks() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("Anything.tmdl");
        fs::write(&file, "table Anything\n").unwrap();

        let bundle = load_bundle(&[file], SourceKind::PowerBi).unwrap();
        assert_eq!(bundle.blocks, ["table Anything\n"]);
        assert!(bundle.report.is_none());
    }

    #[test]
    fn test_missing_file() {
        let err = load_bundle(&[PathBuf::from("/nonexistent/a.tmdl")], SourceKind::PowerBi).unwrap_err();
        assert!(matches!(err, CliError::FileReadError(..)));
    }
}
