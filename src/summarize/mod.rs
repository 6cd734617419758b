//! Natural-language summaries of classes and methods.

mod ast_info;
mod ollama;
pub mod prompt;

pub use ast_info::AstInfoSummarizer;
pub use ollama::OllamaSummarizer;

use crate::config::SummarizerConfig;
use crate::error::CollaboratorError;
use std::time::Duration;

/// Turns a prompt into a short summary.
pub trait Summarizer: Send + Sync {
    fn name(&self) -> &str;

    fn summarize(&self, prompt: &str) -> Result<String, CollaboratorError>;
}

// Factory function to get a summarizer by its CLI name
pub fn get_summarizer(kind: &str, config: &SummarizerConfig) -> Option<Box<dyn Summarizer>> {
    match kind {
        "ollama" => Some(Box::new(OllamaSummarizer::new(
            config.model.clone(),
            Duration::from_secs(config.timeout_secs),
        ))),
        "ast-info" => Some(Box::new(AstInfoSummarizer)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn factory_knows_both_summarizers() {
        let config = SummarizerConfig::default();
        assert_eq!(get_summarizer("ast-info", &config).unwrap().name(), "ast-info");
        assert_eq!(
            get_summarizer("ollama", &config).unwrap().name(),
            "ollama:codellama:13b"
        );
        assert!(get_summarizer("gpt", &config).is_none());
    }
}
