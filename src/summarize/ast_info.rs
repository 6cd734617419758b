use super::Summarizer;
use super::prompt::AST_INFO_MARKER;
use crate::error::CollaboratorError;

/// Offline summarizer: answers with the prompt's AST section, flattened to
/// one line. Useful without a local model and for reproducible runs.
pub struct AstInfoSummarizer;

impl Summarizer for AstInfoSummarizer {
    fn name(&self) -> &str {
        "ast-info"
    }

    fn summarize(&self, prompt: &str) -> Result<String, CollaboratorError> {
        let (_, after) = prompt
            .split_once(AST_INFO_MARKER)
            .ok_or_else(|| CollaboratorError::parse("prompt", "no AST INFO section"))?;
        let section = after.split("###").next().unwrap_or_default();

        Ok(section
            .split_whitespace()
            .map(|word| word.trim_matches(|c| c == '`' || c == '*'))
            .filter(|word| !word.is_empty())
            .collect::<Vec<_>>()
            .join(" "))
    }
}
