use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use log::info;
use moverec::config::MoveRecConfig;
use moverec::indexing::extractor::{AstExtractor, CommandAstExtractor, get_extractor_for_language};
use moverec::summarize::get_summarizer;
use moverec::utils::io::render_recommendation_table;
use moverec::{extract_codebase, recommend_from_file, version};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

#[derive(Parser, Debug)]
#[command(name = "moverec")]
#[command(about = "Move-method refactoring recommender for Java codebases", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Extract and summarize every class and method under a Java directory
    Extract {
        /// Directory containing the Java sources
        java_dir: PathBuf,

        #[arg(short, long, default_value = "llm_code_summaries.json")]
        output: PathBuf,

        /// Worker threads for extraction (defaults to one per CPU)
        #[arg(long)]
        threads: Option<usize>,

        #[arg(long, default_value = "ollama", value_parser = ["ollama", "ast-info"])]
        summarizer: String,

        /// Ollama model (overrides the config file)
        #[arg(long)]
        model: Option<String>,

        /// External AST tool; the file path is appended as the last argument
        #[arg(long = "ast-command", num_args = 1.., allow_hyphen_values = true)]
        ast_command: Vec<String>,

        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Score every method of a summary document and recommend moves
    Recommend {
        #[arg(short, long, default_value = "llm_code_summaries.json")]
        input: PathBuf,

        #[arg(short, long, default_value = "refactor_recommendations.json")]
        output: PathBuf,

        /// Precomputed embedding vectors (JSON)
        #[arg(long)]
        vectors: Option<PathBuf>,

        #[arg(long)]
        config: Option<PathBuf>,

        /// Dimensions of the built-in embedder (overrides the config file)
        #[arg(long)]
        dimensions: Option<usize>,

        #[arg(long)]
        threads: Option<usize>,

        /// Skip the summary table on stdout
        #[arg(long)]
        no_table: bool,
    },
}

fn load_config(path: Option<&Path>) -> anyhow::Result<MoveRecConfig> {
    match path {
        Some(path) => MoveRecConfig::load(path)
            .with_context(|| format!("failed to load config from {}", path.display())),
        None => Ok(MoveRecConfig::default()),
    }
}

fn resolve_threads(threads: Option<usize>) -> usize {
    let num_threads = threads.filter(|n| *n > 0).unwrap_or_else(num_cpus::get);
    info!("Using {} threads", num_threads);
    num_threads
}

fn main() -> anyhow::Result<()> {
    // Initialize logger
    if std::env::var_os("RUST_LOG").is_none() {
        unsafe {
            std::env::set_var("RUST_LOG", "info");
        }
    }
    env_logger::init();

    let cli = Cli::parse();
    info!("moverec v{}", version());
    let start_time = Instant::now();

    match cli.command {
        Commands::Extract {
            java_dir,
            output,
            threads,
            summarizer,
            model,
            ast_command,
            config,
        } => {
            if !java_dir.is_dir() {
                bail!("not a valid directory: {}", java_dir.display());
            }
            let mut config = load_config(config.as_deref())?;
            if let Some(model) = model {
                config.summarizer.model = model;
            }
            let timeout = Duration::from_secs(config.summarizer.timeout_secs);

            let extractor: Box<dyn AstExtractor> = if ast_command.is_empty() {
                get_extractor_for_language("java").context("no built-in Java extractor")?
            } else {
                Box::new(
                    CommandAstExtractor::from_command_line(&ast_command, timeout)
                        .context("--ast-command needs a program")?,
                )
            };
            let summarizer = get_summarizer(&summarizer, &config.summarizer)
                .with_context(|| format!("unknown summarizer '{}'", summarizer))?;
            info!(
                "Extractor: {}, summarizer: {}",
                extractor.name(),
                summarizer.name()
            );

            let document = extract_codebase(
                &java_dir,
                &output,
                extractor.as_ref(),
                summarizer.as_ref(),
                resolve_threads(threads),
            )
            .with_context(|| format!("extraction of {} failed", java_dir.display()))?;

            println!(
                "Saved summaries of {} classes to {}",
                document.len(),
                output.display()
            );
        }
        Commands::Recommend {
            input,
            output,
            vectors,
            config,
            dimensions,
            threads,
            no_table,
        } => {
            let mut config = load_config(config.as_deref())?;
            if let Some(dimensions) = dimensions {
                if dimensions == 0 {
                    bail!("--dimensions must be positive");
                }
                config.embedding.dimensions = dimensions;
            }

            let recommendations = recommend_from_file(
                &input,
                &output,
                vectors.as_deref(),
                &config,
                resolve_threads(threads),
            )
            .with_context(|| format!("recommendation run on {} failed", input.display()))?;

            if !no_table {
                println!("{}", render_recommendation_table(&recommendations));
            }
            println!(
                "Saved {} recommendations to {}",
                recommendations.len(),
                output.display()
            );
        }
    }

    info!("Completed in {:.2?}", start_time.elapsed());
    Ok(())
}
