use crate::error::{MoveRecError, Result};
use crate::indexing::extractor::{AstExtractor, SourceFileAst};
use log::{debug, error, info, trace, warn};
use rayon::prelude::*;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// One source file with its text and extracted structure.
#[derive(Debug, Clone)]
pub struct ExtractedFile {
    pub path: PathBuf,
    pub content: String,
    pub ast: SourceFileAst,
}

/// Extracts every supported file under `root_path` on a pool of `num_threads`.
///
/// Files that cannot be read or extracted are logged and skipped. Output
/// follows the sorted walk order regardless of thread scheduling.
pub fn process_codebase_parallel(
    root_path: &Path,
    extractor: &dyn AstExtractor,
    num_threads: usize,
) -> Result<Vec<ExtractedFile>> {
    info!(
        "Starting parallel extraction with {} threads using {}",
        num_threads,
        extractor.name()
    );

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(num_threads)
        .build()
        .map_err(|e| MoveRecError::ThreadPool(e.to_string()))?;

    let supported_extensions = get_supported_extensions();

    info!("Scanning directory for supported files...");
    let files_to_process = collect_files_to_process(root_path, &supported_extensions);
    info!("Found {} files to process", files_to_process.len());

    let extracted: Vec<ExtractedFile> = pool.install(|| {
        files_to_process
            .par_iter()
            .filter_map(|path| {
                debug!("Processing file: {:?}", path);
                let content = match fs::read_to_string(path) {
                    Ok(content) => content,
                    Err(e) => {
                        warn!("Failed to read file {:?}: {}", path, e);
                        return None;
                    }
                };
                match extractor.extract_ast(path) {
                    Ok(ast) => {
                        debug!("Extracted {} classes from {:?}", ast.classes.len(), path);
                        Some(ExtractedFile {
                            path: path.clone(),
                            content,
                            ast,
                        })
                    }
                    Err(e) => {
                        error!("Error processing file {:?}: {}", path, e);
                        None
                    }
                }
            })
            .collect()
    });

    let class_count: usize = extracted.iter().map(|f| f.ast.classes.len()).sum();
    info!(
        "File processing complete: {} of {} files, {} classes",
        extracted.len(),
        files_to_process.len(),
        class_count
    );

    Ok(extracted)
}

fn collect_files_to_process(
    root_path: &Path,
    supported_extensions: &HashSet<&'static str>,
) -> Vec<PathBuf> {
    let mut visited_files = HashSet::new();
    let mut files_to_process = Vec::new();

    for entry in WalkDir::new(root_path)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let path = entry.path();

        if path.is_dir() {
            continue;
        }

        if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
            if !supported_extensions.contains(ext) {
                trace!("Skipping unsupported file: {:?}", path);
                continue;
            }
        } else {
            trace!("Skipping file without extension: {:?}", path);
            continue;
        }

        let canonical_path = match fs::canonicalize(path) {
            Ok(p) => p,
            Err(e) => {
                warn!("Failed to canonicalize path {:?}: {}", path, e);
                continue;
            }
        };

        if !visited_files.insert(canonical_path) {
            trace!("Skipping already visited file: {:?}", path);
            continue;
        }

        files_to_process.push(path.to_path_buf());
    }

    files_to_process
}

fn get_supported_extensions() -> HashSet<&'static str> {
    crate::parsers::common::get_supported_extensions()
        .into_iter()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CollaboratorError;
    use crate::indexing::extractor::JavaExtractor;
    use tempfile::TempDir;

    struct FailingExtractor;

    impl AstExtractor for FailingExtractor {
        fn name(&self) -> &str {
            "failing"
        }

        fn extract_ast(&self, path: &Path) -> std::result::Result<SourceFileAst, CollaboratorError> {
            Err(CollaboratorError::parse(path.to_string_lossy(), "boom"))
        }
    }

    fn fixture() -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("shop")).unwrap();
        fs::write(
            dir.path().join("shop/Order.java"),
            "package shop; public class Order { private double total; }",
        )
        .unwrap();
        fs::write(
            dir.path().join("Cart.java"),
            "package shop; public class Cart { void clear() {} }",
        )
        .unwrap();
        fs::write(dir.path().join("notes.txt"), "not java").unwrap();
        dir
    }

    #[test]
    fn collects_only_java_files_in_sorted_order() {
        let dir = fixture();
        let files = collect_files_to_process(dir.path(), &get_supported_extensions());
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["Cart.java", "Order.java"]);
    }

    #[test]
    fn extracts_each_file() {
        let dir = fixture();
        let files = process_codebase_parallel(dir.path(), &JavaExtractor::new(), 2).unwrap();
        assert_eq!(files.len(), 2);
        assert_eq!(files[0].ast.classes[0].name, "Cart");
        assert_eq!(files[1].ast.classes[0].name, "Order");
        assert!(files[1].content.contains("private double total"));
    }

    #[test]
    fn failing_files_are_skipped() {
        let dir = fixture();
        let files = process_codebase_parallel(dir.path(), &FailingExtractor, 1).unwrap();
        assert!(files.is_empty());
    }
}
