use super::Summarizer;
use crate::error::CollaboratorError;
use crate::utils::process::run_with_timeout;
use log::debug;
use std::time::Duration;

/// Runs `ollama run <model>` with the prompt on stdin.
pub struct OllamaSummarizer {
    label: String,
    model: String,
    timeout: Duration,
}

impl OllamaSummarizer {
    pub fn new(model: impl Into<String>, timeout: Duration) -> Self {
        let model = model.into();
        OllamaSummarizer {
            label: format!("ollama:{}", model),
            model,
            timeout,
        }
    }
}

impl Summarizer for OllamaSummarizer {
    fn name(&self) -> &str {
        &self.label
    }

    fn summarize(&self, prompt: &str) -> Result<String, CollaboratorError> {
        let args = vec!["run".to_string(), self.model.clone()];
        let output = run_with_timeout("ollama", &args, Some(prompt), self.timeout)?;
        let summary = output.stdout.trim().to_string();
        debug!("{} returned {} chars", self.label, summary.len());
        Ok(summary)
    }
}
