mod command;
mod common;
mod java;

pub use command::CommandAstExtractor;
pub use java::JavaExtractor;

use crate::code_model::{FieldDecl, MethodMeta};
use crate::error::CollaboratorError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Structure of one source file: its package and the types it declares.
///
/// Serialized with the same keys the external AST tools print.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SourceFileAst {
    #[serde(default)]
    pub package: String,
    #[serde(default)]
    pub classes: Vec<ClassAst>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClassAst {
    #[serde(rename = "class", default)]
    pub name: String,
    /// Declaration text; empty when the tool only reports structure.
    #[serde(rename = "classBody", default, skip_serializing_if = "String::is_empty")]
    pub body: String,
    #[serde(rename = "classFields", default)]
    pub fields: Vec<FieldDecl>,
    #[serde(default)]
    pub methods: Vec<MethodMeta>,
}

/// Turns a source file into class and method metadata.
pub trait AstExtractor: Send + Sync {
    fn name(&self) -> &str;

    fn extract_ast(&self, file_path: &Path) -> Result<SourceFileAst, CollaboratorError>;
}

// Factory function to get the built-in extractor for a language
pub fn get_extractor_for_language(language: &str) -> Option<Box<dyn AstExtractor>> {
    match language {
        "java" => Some(Box::new(JavaExtractor::new())),
        _ => None,
    }
}
