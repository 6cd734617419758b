use crate::error::{MoveRecError, Result};
use log::debug;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub const DEFAULT_MOVE_THRESHOLD: f64 = 0.60;
pub const DEFAULT_EXTRACT_THRESHOLD: f64 = 0.50;
pub const DEFAULT_EMBEDDING_DIMENSIONS: usize = 384;
pub const DEFAULT_SUMMARY_MODEL: &str = "codellama:13b";
pub const DEFAULT_SUMMARY_TIMEOUT_SECS: u64 = 300;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MoveRecConfig {
    pub scoring: ScoringConfig,
    pub embedding: EmbeddingConfig,
    pub summarizer: SummarizerConfig,
}

/// Weights and thresholds of the composite score.
///
/// `composite = base_weight * (summary_weight * summary_sim + code_weight * code_sim) + bonuses`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub move_threshold: f64,
    pub extract_threshold: f64,
    pub summary_weight: f64,
    pub code_weight: f64,
    pub base_weight: f64,
    pub package_bonus: f64,
    pub field_bonus: f64,
    pub write_bonus: f64,
    pub read_bonus: f64,
    pub call_bonus: f64,
    pub usage_bonus: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        ScoringConfig {
            move_threshold: DEFAULT_MOVE_THRESHOLD,
            extract_threshold: DEFAULT_EXTRACT_THRESHOLD,
            summary_weight: 0.5,
            code_weight: 0.5,
            base_weight: 0.8,
            package_bonus: 0.10,
            field_bonus: 0.10,
            write_bonus: 0.05,
            read_bonus: 0.01,
            call_bonus: 0.05,
            usage_bonus: 0.05,
        }
    }
}

impl ScoringConfig {
    pub fn validate(&self) -> Result<()> {
        if self.extract_threshold > self.move_threshold {
            return Err(MoveRecError::Config(format!(
                "extract_threshold ({}) must not exceed move_threshold ({})",
                self.extract_threshold, self.move_threshold
            )));
        }

        let weights = [
            ("summary_weight", self.summary_weight),
            ("code_weight", self.code_weight),
            ("base_weight", self.base_weight),
            ("package_bonus", self.package_bonus),
            ("field_bonus", self.field_bonus),
            ("write_bonus", self.write_bonus),
            ("read_bonus", self.read_bonus),
            ("call_bonus", self.call_bonus),
            ("usage_bonus", self.usage_bonus),
        ];
        for (name, value) in weights {
            if !value.is_finite() || value < 0.0 {
                return Err(MoveRecError::Config(format!(
                    "{} must be a non-negative number, got {}",
                    name, value
                )));
            }
        }

        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingConfig {
    pub dimensions: usize,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        EmbeddingConfig {
            dimensions: DEFAULT_EMBEDDING_DIMENSIONS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SummarizerConfig {
    pub model: String,
    pub timeout_secs: u64,
}

impl Default for SummarizerConfig {
    fn default() -> Self {
        SummarizerConfig {
            model: DEFAULT_SUMMARY_MODEL.to_string(),
            timeout_secs: DEFAULT_SUMMARY_TIMEOUT_SECS,
        }
    }
}

impl MoveRecConfig {
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: MoveRecConfig = toml::from_str(contents)
            .map_err(|e| MoveRecError::Config(format!("failed to parse TOML: {}", e)))?;
        config.scoring.validate()?;
        if config.embedding.dimensions == 0 {
            return Err(MoveRecError::Config(
                "embedding.dimensions must be positive".to_string(),
            ));
        }
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config = Self::from_toml_str(&contents)?;
        debug!("Loaded config from {}", path.display());
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_file_yields_defaults() {
        let config = MoveRecConfig::from_toml_str("").unwrap();
        assert_eq!(config, MoveRecConfig::default());
        assert_eq!(config.scoring.move_threshold, 0.60);
        assert_eq!(config.scoring.extract_threshold, 0.50);
    }

    #[test]
    fn partial_sections_keep_remaining_defaults() {
        let config = MoveRecConfig::from_toml_str(
            "[scoring]\nmove_threshold = 0.7\n\n[summarizer]\nmodel = \"llama3\"\n",
        )
        .unwrap();
        assert_eq!(config.scoring.move_threshold, 0.7);
        assert_eq!(config.scoring.package_bonus, 0.10);
        assert_eq!(config.summarizer.model, "llama3");
        assert_eq!(config.summarizer.timeout_secs, DEFAULT_SUMMARY_TIMEOUT_SECS);
    }

    #[test]
    fn inverted_thresholds_are_rejected() {
        let result = MoveRecConfig::from_toml_str(
            "[scoring]\nmove_threshold = 0.4\nextract_threshold = 0.5\n",
        );
        assert!(matches!(result, Err(MoveRecError::Config(_))));
    }

    #[test]
    fn negative_bonus_is_rejected() {
        let result = MoveRecConfig::from_toml_str("[scoring]\nread_bonus = -0.01\n");
        assert!(matches!(result, Err(MoveRecError::Config(_))));
    }

    #[test]
    fn zero_dimensions_are_rejected() {
        let result = MoveRecConfig::from_toml_str("[embedding]\ndimensions = 0\n");
        assert!(result.is_err());
    }
}
