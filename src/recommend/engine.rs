use crate::code_model::{Action, ClassInfo, Dataset, MethodInfo, Recommendation};
use crate::config::ScoringConfig;
use crate::embedding::{EmbeddingProvider, VectorPair, VectorStore};
use crate::error::{MoveRecError, Result};
use crate::recommend::bonus::{BonusBreakdown, bonuses};
use crate::recommend::candidates::structural_candidates;
use crate::recommend::classifier::classify;
use crate::recommend::similarity::cosine_similarity;
use log::{debug, info, trace};
use rayon::prelude::*;
use serde::Serialize;
use std::sync::Arc;

/// Score breakdown of one method against one candidate class.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CandidateScore {
    pub candidate: String,
    pub summary_similarity: f64,
    pub code_similarity: f64,
    pub base: f64,
    pub bonus: BonusBreakdown,
    pub composite: f64,
}

/// Scores methods against candidate classes using injected embedding
/// providers for the summary and code spaces.
pub struct RecommendationEngine {
    config: ScoringConfig,
    summary_provider: Arc<dyn EmbeddingProvider>,
    code_provider: Arc<dyn EmbeddingProvider>,
    num_threads: usize,
}

impl RecommendationEngine {
    pub fn new(
        config: ScoringConfig,
        summary_provider: Arc<dyn EmbeddingProvider>,
        code_provider: Arc<dyn EmbeddingProvider>,
    ) -> Self {
        RecommendationEngine {
            config,
            summary_provider,
            code_provider,
            num_threads: 0,
        }
    }

    /// Worker threads for the scoring pass; `0` uses one per CPU.
    pub fn with_threads(mut self, num_threads: usize) -> Self {
        self.num_threads = num_threads;
        self
    }

    /// Embeds the dataset, then scores every method.
    pub fn recommend(&self, dataset: &Dataset) -> Result<Vec<Recommendation>> {
        let vectors = VectorStore::embed_dataset(
            dataset,
            self.summary_provider.as_ref(),
            self.code_provider.as_ref(),
        )?;
        recommend_all(dataset, &vectors, &self.config, self.num_threads)
    }

    /// Scores every method against vectors computed elsewhere.
    pub fn recommend_with_vectors(
        &self,
        dataset: &Dataset,
        vectors: &VectorStore,
    ) -> Result<Vec<Recommendation>> {
        recommend_all(dataset, vectors, &self.config, self.num_threads)
    }
}

/// One recommendation per method, in dataset order.
///
/// Methods are independent, so they are scored in parallel over the frozen
/// dataset and vector store. Any missing vector aborts the whole run.
pub fn recommend_all(
    dataset: &Dataset,
    vectors: &VectorStore,
    config: &ScoringConfig,
    num_threads: usize,
) -> Result<Vec<Recommendation>> {
    config.validate()?;
    let num_threads = if num_threads == 0 {
        num_cpus::get()
    } else {
        num_threads
    };

    info!(
        "Scoring {} methods across {} classes with {} threads",
        dataset.method_count(),
        dataset.class_count(),
        num_threads
    );

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(num_threads)
        .build()
        .map_err(|e| MoveRecError::ThreadPool(e.to_string()))?;

    let recommendations: Vec<Recommendation> = pool.install(|| {
        dataset
            .all_methods()
            .par_iter()
            .map(|method| recommend_method(dataset, vectors, method, config))
            .collect::<Result<_>>()
    })?;

    let moves = recommendations
        .iter()
        .filter(|r| matches!(r.action, Action::Move { .. }))
        .count();
    info!(
        "Produced {} recommendations ({} moves)",
        recommendations.len(),
        moves
    );

    Ok(recommendations)
}

/// Decides KEEP / MOVE / EXTRACT / REVIEW for a single method.
pub fn recommend_method(
    dataset: &Dataset,
    vectors: &VectorStore,
    method: &MethodInfo,
    config: &ScoringConfig,
) -> Result<Recommendation> {
    let owner = dataset.get_class(&method.class_name);

    if let Some(action) = classify(owner, method) {
        trace!("{}.{} short-circuits as {}", method.class_name, method.name, action);
        return Ok(Recommendation::keep(&method.name, &method.class_name, action));
    }

    let method_vectors = vectors.method_vectors(&method.class_name, &method.name)?;

    if !method.has_structural_metadata() {
        trace!(
            "{}.{} has no structural metadata, scoring against every class",
            method.class_name,
            method.name
        );
    }

    let mut best_class = method.class_name.as_str();
    let mut best_score = f64::NEG_INFINITY;

    for candidate_name in structural_candidates(method, dataset.class_names()) {
        let Some(candidate) = dataset.get_class(candidate_name) else {
            continue;
        };
        let score = score_candidate(method, owner, candidate, method_vectors, vectors, config)?;

        debug!(
            "[{}] {} -> {} | summary: {:.4}, code: {:.4}, package: {:.3}, field: {:.3}, cohesion: {:.3}, uses: {:.3} -> final: {:.4}",
            method.name,
            method.class_name,
            candidate_name,
            score.summary_similarity,
            score.code_similarity,
            score.bonus.package,
            score.bonus.field,
            score.bonus.cohesion,
            score.bonus.usage,
            score.composite
        );

        // Strictly greater: ties keep the first candidate seen.
        if score.composite > best_score {
            best_class = candidate_name;
            best_score = score.composite;
        }
    }

    let action = decide(&method.class_name, best_class, best_score, config);
    Ok(Recommendation::scored(
        &method.name,
        &method.class_name,
        best_class,
        best_score,
        action,
    ))
}

pub fn score_candidate(
    method: &MethodInfo,
    owner: Option<&ClassInfo>,
    candidate: &ClassInfo,
    method_vectors: &VectorPair,
    vectors: &VectorStore,
    config: &ScoringConfig,
) -> Result<CandidateScore> {
    let class_vectors = vectors.class_vectors(&candidate.name)?;

    let summary_similarity =
        cosine_similarity(&method_vectors.summary_vec, &class_vectors.summary_vec);
    let code_similarity = cosine_similarity(&method_vectors.code_vec, &class_vectors.code_vec);
    let base = config.summary_weight * summary_similarity + config.code_weight * code_similarity;
    let bonus = bonuses(method, owner, candidate, config);
    let composite = composite_score(base, &bonus, config);

    Ok(CandidateScore {
        candidate: candidate.name.clone(),
        summary_similarity,
        code_similarity,
        base,
        bonus,
        composite,
    })
}

pub fn composite_score(base: f64, bonus: &BonusBreakdown, config: &ScoringConfig) -> f64 {
    config.base_weight * base + bonus.total()
}

/// Threshold policy applied to the winning candidate.
///
/// A winning score between the extract and move thresholds for another
/// class yields `Review` rather than a silent KEEP.
pub fn decide(current_class: &str, best_class: &str, best_score: f64, config: &ScoringConfig) -> Action {
    if best_class == current_class {
        Action::Keep
    } else if best_score >= config.move_threshold {
        Action::Move {
            target: best_class.to_string(),
        }
    } else if best_score < config.extract_threshold {
        Action::Extract
    } else {
        Action::Review {
            target: best_class.to_string(),
        }
    }
}
