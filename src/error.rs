use std::io;
use std::path::PathBuf;
use std::time::Duration;

/// Errors raised by the recommendation pipeline.
#[derive(Debug, thiserror::Error)]
pub enum MoveRecError {
    #[error("no embedding vector for class '{class}'")]
    MissingClassVector { class: String },

    #[error("no embedding vector for method '{class}.{method}'")]
    MissingMethodVector { class: String, method: String },

    #[error("{space} vector for {owner} has {actual} dimensions, expected {expected}")]
    DimensionMismatch {
        space: &'static str,
        owner: String,
        expected: usize,
        actual: usize,
    },

    #[error("embedding provider '{provider}' failed for {owner}: {message}")]
    Embedding {
        provider: String,
        owner: String,
        message: String,
    },

    #[error(transparent)]
    Collaborator(#[from] CollaboratorError),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("failed to build thread pool: {0}")]
    ThreadPool(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, MoveRecError>;

/// Failures reported by the external AST extraction and summarization tools.
#[derive(Debug, thiserror::Error)]
pub enum CollaboratorError {
    #[error("process '{program}' failed ({status}): {stderr}")]
    ProcessFailed {
        program: String,
        status: String,
        stderr: String,
    },

    #[error("process '{program}' timed out after {timeout:?}")]
    Timeout { program: String, timeout: Duration },

    #[error("could not parse output for {source_name}: {message}")]
    ParseError {
        source_name: String,
        message: String,
    },

    #[error("I/O error on {path:?}: {error}")]
    Io {
        path: PathBuf,
        #[source]
        error: io::Error,
    },
}

impl CollaboratorError {
    pub fn parse(source_name: impl Into<String>, message: impl Into<String>) -> Self {
        CollaboratorError::ParseError {
            source_name: source_name.into(),
            message: message.into(),
        }
    }

    pub fn io(path: impl Into<PathBuf>, error: io::Error) -> Self {
        CollaboratorError::Io {
            path: path.into(),
            error,
        }
    }
}
