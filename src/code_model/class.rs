use super::record::FieldDecl;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassInfo {
    pub name: String,
    pub package: String,
    pub body: String,
    pub fields: Vec<FieldDecl>,
    /// Normalized summary text, the input of the summary embedding space.
    pub summary: String,
}

impl ClassInfo {
    pub fn new(name: impl Into<String>, package: impl Into<String>) -> Self {
        ClassInfo {
            name: name.into(),
            package: package.into(),
            body: String::new(),
            fields: Vec::new(),
            summary: String::new(),
        }
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }

    pub fn with_field(mut self, name: impl Into<String>, declared_type: impl Into<String>) -> Self {
        self.fields.push(FieldDecl::new(name, declared_type));
        self
    }

    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = summary.into();
        self
    }

    pub fn field_type(&self, field_name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|f| f.name == field_name)
            .map(|f| f.declared_type.as_str())
    }
}
