pub mod bonus;
pub mod candidates;
pub mod classifier;
pub mod engine;
pub mod normalizer;
pub mod similarity;

pub use bonus::{BonusBreakdown, bonuses};
pub use candidates::{structural_candidates, used_classes};
pub use classifier::classify;
pub use engine::{
    CandidateScore, RecommendationEngine, decide, recommend_all, recommend_method, score_candidate,
};
pub use normalizer::normalize;
pub use similarity::cosine_similarity;
