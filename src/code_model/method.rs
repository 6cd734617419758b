use super::record::FieldDecl;
use serde::{Deserialize, Serialize};

/// Splits a `receiver.member` target at its first dot.
///
/// Bare targets such as `validate` have no receiver and yield `None`.
pub fn split_receiver(target: &str) -> Option<(&str, &str)> {
    target.split_once('.')
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodInfo {
    pub name: String,
    pub class_name: String,
    pub parameters: Vec<String>,
    pub return_type: String,
    pub body: String,
    pub calls: Vec<String>,
    pub field_accesses: Vec<String>,
    /// Copy of the owning class's declared fields at capture time.
    pub class_fields: Vec<FieldDecl>,
    /// Normalized summary text, the input of the summary embedding space.
    pub summary: String,
}

impl MethodInfo {
    pub fn new(class_name: impl Into<String>, name: impl Into<String>) -> Self {
        MethodInfo {
            name: name.into(),
            class_name: class_name.into(),
            parameters: Vec::new(),
            return_type: String::new(),
            body: String::new(),
            calls: Vec::new(),
            field_accesses: Vec::new(),
            class_fields: Vec::new(),
            summary: String::new(),
        }
    }

    pub fn with_parameter(mut self, declared_type: impl Into<String>) -> Self {
        self.parameters.push(declared_type.into());
        self
    }

    pub fn with_return_type(mut self, return_type: impl Into<String>) -> Self {
        self.return_type = return_type.into();
        self
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }

    pub fn with_call(mut self, target: impl Into<String>) -> Self {
        self.calls.push(target.into());
        self
    }

    pub fn with_field_access(mut self, target: impl Into<String>) -> Self {
        self.field_accesses.push(target.into());
        self
    }

    pub fn with_class_fields(mut self, fields: Vec<FieldDecl>) -> Self {
        self.class_fields = fields;
        self
    }

    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = summary.into();
        self
    }

    /// Declared type of `receiver` when it names a field of the owning class.
    pub fn receiver_type(&self, receiver: &str) -> Option<&str> {
        self.class_fields
            .iter()
            .find(|f| f.name == receiver)
            .map(|f| f.declared_type.as_str())
    }

    /// Whether the method carries anything the structural filter can use.
    pub fn has_structural_metadata(&self) -> bool {
        !(self.parameters.is_empty() && self.calls.is_empty() && self.field_accesses.is_empty())
    }
}
