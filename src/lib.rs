pub mod code_model;
pub mod config;
pub mod embedding;
pub mod error;
pub mod indexing;
pub mod parsers;
pub mod recommend;
pub mod summarize;
pub mod utils;

pub use error::{CollaboratorError, MoveRecError, Result};

use code_model::{Dataset, Recommendation, SummaryDocument};
use config::MoveRecConfig;
use embedding::{HashingEmbedder, VectorStore};
use indexing::extractor::AstExtractor;
use log::{debug, info};
use recommend::RecommendationEngine;
use std::path::Path;
use std::sync::Arc;
use summarize::Summarizer;

/// Extracts and summarizes every Java file under `root_path`, writing the
/// dataset document to `output_path`.
pub fn extract_codebase(
    root_path: &Path,
    output_path: &Path,
    extractor: &dyn AstExtractor,
    summarizer: &dyn Summarizer,
    num_threads: usize,
) -> Result<SummaryDocument> {
    info!("Starting extraction of {:?}", root_path);
    debug!("Root path: {:?}, Output path: {:?}", root_path, output_path);

    let files = indexing::process_codebase_parallel(root_path, extractor, num_threads)?;
    let document = indexing::generate_summaries(&files, summarizer)?;

    utils::io::save_summary_document(&document, output_path)?;
    info!(
        "Extraction complete: {} classes from {} files",
        document.len(),
        files.len()
    );

    Ok(document)
}

/// Scores a loaded document. Vectors come from `vectors_path` when given,
/// otherwise both spaces are embedded with the built-in hashing embedder.
pub fn recommend_document(
    document: &SummaryDocument,
    vectors_path: Option<&Path>,
    config: &MoveRecConfig,
    num_threads: usize,
) -> Result<Vec<Recommendation>> {
    let dataset = Dataset::from_records(document);
    info!(
        "Dataset holds {} classes and {} methods",
        dataset.class_count(),
        dataset.method_count()
    );

    let embedder = Arc::new(HashingEmbedder::new(config.embedding.dimensions));
    let engine = RecommendationEngine::new(config.scoring.clone(), embedder.clone(), embedder)
        .with_threads(num_threads);

    match vectors_path {
        Some(path) => {
            let vectors = VectorStore::from_document(utils::io::load_vector_document(path)?)?;
            engine.recommend_with_vectors(&dataset, &vectors)
        }
        None => engine.recommend(&dataset),
    }
}

/// Loads the dataset at `input_path`, scores it and writes the
/// recommendations to `output_path`.
pub fn recommend_from_file(
    input_path: &Path,
    output_path: &Path,
    vectors_path: Option<&Path>,
    config: &MoveRecConfig,
    num_threads: usize,
) -> Result<Vec<Recommendation>> {
    info!("Starting recommendation run");
    debug!("Input path: {:?}, Output path: {:?}", input_path, output_path);

    let document = utils::io::load_summary_document(input_path)?;
    let recommendations = recommend_document(&document, vectors_path, config, num_threads)?;

    utils::io::export_recommendations_to_json(&recommendations, output_path)?;
    Ok(recommendations)
}

pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
