//! Documentation prompts
//!
//! Builds the system and user prompts that ask a chat model to document a
//! report from its layout and semantic-model blocks.

use crate::import::SourceKind;
use serde::Serialize;
use tracing::debug;

/// System prompt template for Power BI sources
pub const POWER_BI_SYSTEM_TEMPLATE: &str = r#"You are a Power BI report specialist turning a report into documentation.

## Report layout
{report}

## Semantic model (TMDL)
{semantic_model}

Extract as much information as possible and give a complete overview of the report. Keep it clear, avoid repetition and stay within 1000 tokens. Present the data dictionary as a markdown table."#;

/// User prompt for Power BI sources
pub const POWER_BI_USER_PROMPT: &str = "Write documentation for this Power BI report. \
It must contain an overview, key contacts, data flow, a data explorer section and a data dictionary \
formatted as a table.";

/// Section appended to the system prompt when the user supplied context
const USER_CONTEXT_TEMPLATE: &str =
    "\n\nTake into account the following context provided by the user:\n{user_context}";

/// System and user prompt for one documentation request
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct PromptContext {
    pub system_prompt: String,
    pub user_prompt: String,
}

impl PromptContext {
    pub fn new(system_prompt: impl Into<String>, user_prompt: impl Into<String>) -> Self {
        Self {
            system_prompt: system_prompt.into(),
            user_prompt: user_prompt.into(),
        }
    }

    /// Build the prompts for a source of `kind`
    ///
    /// `blocks` are joined with blank lines. `user_context` is appended to
    /// the system prompt only when it is not blank.
    pub fn for_source<S: AsRef<str>>(
        kind: SourceKind,
        report: &str,
        blocks: &[S],
        user_context: Option<&str>,
    ) -> Self {
        let semantic_model = blocks
            .iter()
            .map(AsRef::as_ref)
            .collect::<Vec<_>>()
            .join("\n\n");

        let (mut system_prompt, user_prompt) = match kind {
            SourceKind::PowerBi => (
                fill_template(
                    POWER_BI_SYSTEM_TEMPLATE,
                    &[("report", report), ("semantic_model", &semantic_model)],
                ),
                POWER_BI_USER_PROMPT.to_string(),
            ),
        };

        if let Some(context) = user_context.map(str::trim).filter(|c| !c.is_empty()) {
            system_prompt.push_str(&fill_template(USER_CONTEXT_TEMPLATE, &[("user_context", context)]));
        }

        let prompt = Self {
            system_prompt,
            user_prompt,
        };
        debug!(
            "{} prompt: system {} chars, user {} chars, ~{} tokens",
            kind,
            prompt.system_prompt.len(),
            prompt.user_prompt.len(),
            prompt.estimated_tokens()
        );
        prompt
    }

    /// Rough token count of both prompts
    pub fn estimated_tokens(&self) -> usize {
        estimate_tokens(&self.system_prompt) + estimate_tokens(&self.user_prompt)
    }
}

/// Substitute `{name}` placeholders in one pass
///
/// Substituted values are never scanned again, so a value that itself
/// contains `{name}` is inserted literally. Unknown placeholders are kept.
fn fill_template(template: &str, values: &[(&str, &str)]) -> String {
    let mut filled = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        filled.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let value = after.find('}').and_then(|close| {
            let name = &after[..close];
            values
                .iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| (*value, close))
        });
        match value {
            Some((value, close)) => {
                filled.push_str(value);
                rest = &after[close + 1..];
            }
            None => {
                filled.push('{');
                rest = after;
            }
        }
    }

    filled.push_str(rest);
    filled
}

/// Estimate token count for a string
///
/// Uses a rough estimate of 4 characters per token
pub fn estimate_tokens(text: &str) -> usize {
    text.len().div_ceil(4)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_power_bi_prompt() {
        let prompt = PromptContext::for_source(
            SourceKind::PowerBi,
            "{\"sections\":[]}",
            &["table Sales", "relationship r1"],
            None,
        );
        assert!(prompt.system_prompt.contains("{\"sections\":[]}"));
        assert!(prompt.system_prompt.contains("table Sales\n\nrelationship r1"));
        assert!(!prompt.system_prompt.contains("{semantic_model}"));
        assert!(!prompt.system_prompt.contains("provided by the user"));
        assert!(prompt.user_prompt.contains("data dictionary"));
    }

    #[test]
    fn test_user_context_appended_when_present() {
        let blocks: [&str; 0] = [];
        let with_context = PromptContext::for_source(
            SourceKind::PowerBi,
            "{}",
            &blocks,
            Some("Owned by the finance team"),
        );
        assert!(with_context
            .system_prompt
            .ends_with("provided by the user:\nOwned by the finance team"));

        let blank = PromptContext::for_source(SourceKind::PowerBi, "{}", &blocks, Some("  "));
        assert!(!blank.system_prompt.contains("provided by the user"));
    }

    #[test]
    fn test_placeholder_text_in_report_is_literal() {
        let prompt = PromptContext::for_source(
            SourceKind::PowerBi,
            "{\"title\":\"{semantic_model}\"}",
            &["table Sales"],
            Some("see {report}"),
        );
        assert_eq!(prompt.system_prompt.matches("table Sales").count(), 1);
        assert!(prompt.system_prompt.contains("{\"title\":\"{semantic_model}\"}"));
        assert!(prompt.system_prompt.ends_with("see {report}"));
    }

    #[test]
    fn test_fill_template() {
        assert_eq!(fill_template("{a}-{b}", &[("a", "{b}"), ("b", "2")]), "{b}-2");
        assert_eq!(fill_template("{x} {", &[("a", "1")]), "{x} {");
        assert_eq!(fill_template("plain", &[]), "plain");
    }

    #[test]
    fn test_estimate_tokens() {
        assert_eq!(estimate_tokens(""), 0);
        assert_eq!(estimate_tokens("test"), 1);
        assert_eq!(estimate_tokens("hello world"), 3);
        assert_eq!(PromptContext::new("abcd", "abcde").estimated_tokens(), 3);
    }
}
