//! Serialized shape of the class summary document exchanged with the
//! extraction stage (`llm_code_summaries.json`).
//!
//! Every key is optional on input and `null` is read as the empty value, so
//! sparse metadata from the AST tool never aborts a run.

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

/// Class records keyed by class name.
pub type SummaryDocument = BTreeMap<String, ClassRecord>;

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDecl {
    #[serde(rename = "var_name", default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(rename = "var_type", default, deserialize_with = "null_as_default")]
    pub declared_type: String,
}

impl FieldDecl {
    pub fn new(name: impl Into<String>, declared_type: impl Into<String>) -> Self {
        FieldDecl {
            name: name.into(),
            declared_type: declared_type.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClassRecord {
    #[serde(default, deserialize_with = "null_as_default")]
    pub summary: String,
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub uses_classes: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub package: String,
    #[serde(rename = "classBody", default, deserialize_with = "null_as_default")]
    pub class_body: String,
    #[serde(rename = "classFields", default, deserialize_with = "null_as_default")]
    pub class_fields: Vec<FieldDecl>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub methods: BTreeMap<String, String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub methods_meta: Vec<MethodMeta>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MethodMeta {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(
        rename = "returnType",
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "String::is_empty"
    )]
    pub return_type: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub parameters: Vec<String>,
    #[serde(rename = "methodCalls", default, deserialize_with = "null_as_default")]
    pub method_calls: Vec<String>,
    #[serde(
        rename = "methodFieldAccess",
        default,
        deserialize_with = "null_as_default"
    )]
    pub field_accesses: Vec<String>,
    #[serde(
        rename = "methodLocalVariables",
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub local_variables: Vec<FieldDecl>,
    /// `None` when the record did not carry the owning class's fields.
    #[serde(rename = "classFields", default)]
    pub class_fields: Option<Vec<FieldDecl>>,
    #[serde(rename = "methodBody", default, deserialize_with = "null_as_default")]
    pub body: String,
}
