use crate::error::CollaboratorError;
use crate::indexing::extractor::{AstExtractor, SourceFileAst};
use crate::utils::process::run_with_timeout;
use log::debug;
use std::path::Path;
use std::time::Duration;

/// Delegates extraction to an external tool that prints the file's
/// structure as JSON on stdout, e.g. `java -jar ast-extractor.jar`.
///
/// The file path is appended as the last argument.
pub struct CommandAstExtractor {
    program: String,
    args: Vec<String>,
    timeout: Duration,
}

impl CommandAstExtractor {
    pub fn new(program: impl Into<String>, args: Vec<String>, timeout: Duration) -> Self {
        CommandAstExtractor {
            program: program.into(),
            args,
            timeout,
        }
    }

    /// Builds an extractor from a full command line, program first.
    pub fn from_command_line(command: &[String], timeout: Duration) -> Option<Self> {
        let (program, args) = command.split_first()?;
        Some(Self::new(program.clone(), args.to_vec(), timeout))
    }
}

impl AstExtractor for CommandAstExtractor {
    fn name(&self) -> &str {
        &self.program
    }

    fn extract_ast(&self, file_path: &Path) -> Result<SourceFileAst, CollaboratorError> {
        let mut args = self.args.clone();
        args.push(file_path.to_string_lossy().into_owned());

        let output = run_with_timeout(&self.program, &args, None, self.timeout)?;
        debug!(
            "{} printed {} bytes for {:?}",
            self.program,
            output.stdout.len(),
            file_path
        );

        serde_json::from_str(output.stdout.trim())
            .map_err(|e| CollaboratorError::parse(file_path.to_string_lossy(), e.to_string()))
    }
}
