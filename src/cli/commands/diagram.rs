//! Diagram command implementation

use super::load_bundle;
use crate::cli::error::CliError;
use crate::cli::output::format_import_summary;
use crate::config::SdkConfig;
use crate::export::DotExporter;
use crate::import::{SourceKind, TmdlImporter};
use crate::validation::RelationshipValidator;
use std::path::PathBuf;

/// Arguments for the `diagram` command
pub struct DiagramArgs {
    /// TMDL files or project directories
    pub paths: Vec<PathBuf>,
    /// Output DOT file, stdout when absent
    pub output: Option<PathBuf>,
}

/// Handle the `diagram` command
///
/// The extraction summary goes to stderr so the DOT document can be piped.
pub fn handle_diagram(args: &DiagramArgs, config: &SdkConfig) -> Result<(), CliError> {
    let bundle = load_bundle(&args.paths, SourceKind::PowerBi)?;
    if bundle.blocks.is_empty() {
        return Err(CliError::InvalidArgument(
            "No TMDL blocks found in the given paths".to_string(),
        ));
    }

    let result = TmdlImporter::with_config(config.extraction.clone()).import_bundle(&bundle);
    let validation = RelationshipValidator::new().validate(&result.graph);
    eprint!("{}", format_import_summary(&result, &validation));

    let export = DotExporter::with_options(config.diagram.clone()).export(&result.graph)?;
    match &args.output {
        Some(path) => {
            export.write_to(path)?;
            eprintln!("\nER diagram written to {}", path.display());
        }
        None => print!("{}", export.content),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diagram_writes_dot_file() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("Sales.tmdl");
        std::fs::write(&input, "table Sales\n\tcolumn Amount\n").unwrap();
        let output = dir.path().join("Sales_ERDiagram.dot");

        let args = DiagramArgs {
            paths: vec![input],
            output: Some(output.clone()),
        };
        handle_diagram(&args, &SdkConfig::default()).unwrap();

        let dot = std::fs::read_to_string(output).unwrap();
        assert!(dot.contains("<B>Sales</B>"));
    }

    #[test]
    fn test_diagram_without_blocks() {
        let dir = tempfile::tempdir().unwrap();
        let args = DiagramArgs {
            paths: vec![dir.path().to_path_buf()],
            output: None,
        };
        assert!(matches!(
            handle_diagram(&args, &SdkConfig::default()),
            Err(CliError::InvalidArgument(_))
        ));
    }
}
