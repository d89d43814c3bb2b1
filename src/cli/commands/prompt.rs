//! Prompt command implementation

use super::load_bundle;
use crate::cli::error::CliError;
use crate::cli::output::format_report_summary;
use crate::config::SdkConfig;
use crate::import::{ReportSummary, SourceKind};
use crate::llm::{ChatRequest, PromptContext};
use std::path::PathBuf;
use tracing::warn;

/// Arguments for the `prompt` command
pub struct PromptArgs {
    /// Project directories or individual files
    pub paths: Vec<PathBuf>,
    /// Extra context for the documentation
    pub context: Option<String>,
}

/// Build the documentation request for a source
pub fn build_request(args: &PromptArgs, config: &SdkConfig) -> Result<ChatRequest, CliError> {
    let bundle = load_bundle(&args.paths, SourceKind::PowerBi)?;
    if !bundle.is_complete() {
        warn!("{} source is missing its report layout or TMDL blocks", bundle.kind);
    }

    let report = bundle.report.as_deref().unwrap_or_default();
    if !report.is_empty() {
        match ReportSummary::from_json(report) {
            Ok(summary) => eprint!("{}", format_report_summary(&summary)),
            Err(e) => warn!("{}", e),
        }
    }

    let mut generation = config.generation.clone();
    generation.apply_env_overrides();

    let prompt = PromptContext::for_source(bundle.kind, report, &bundle.blocks, args.context.as_deref());
    Ok(ChatRequest::new(&prompt, &generation))
}

/// Handle the `prompt` command
pub fn handle_prompt(args: &PromptArgs, config: &SdkConfig) -> Result<(), CliError> {
    let request = build_request(args, config)?;
    let json = request
        .to_json_pretty()
        .map_err(|e| CliError::SerializationError(e.to_string()))?;
    println!("{}", json);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_request() {
        let dir = tempfile::tempdir().unwrap();
        let tables = dir.path().join("Finance.SemanticModel/definition/tables");
        std::fs::create_dir_all(&tables).unwrap();
        std::fs::write(tables.join("Sales.tmdl"), "table Sales\n\tcolumn Amount\n").unwrap();
        std::fs::write(dir.path().join("report.json"), "{\"sections\":[]}").unwrap();

        let args = PromptArgs {
            paths: vec![dir.path().to_path_buf()],
            context: Some("Finance team".to_string()),
        };
        let request = build_request(&args, &SdkConfig::default()).unwrap();
        let system = &request.messages[0].content;

        assert!(system.contains("table Sales"));
        assert!(system.contains("{\"sections\":[]}"));
        assert!(system.ends_with("Finance team"));
        assert!(request.stream);
    }
}
