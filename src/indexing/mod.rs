pub mod analyzer;
pub mod extractor;
pub mod processor;

pub use analyzer::{generate_summaries, uses_classes};
pub use processor::{ExtractedFile, process_codebase_parallel};
