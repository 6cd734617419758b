use std::collections::HashMap;
use tree_sitter::Language;

pub fn java_language() -> Language {
    tree_sitter_java::LANGUAGE.into()
}

pub fn get_language_parsers() -> HashMap<String, Language> {
    let mut parsers = HashMap::new();
    parsers.insert("java".to_string(), java_language());
    parsers
}

pub fn get_supported_extensions() -> Vec<&'static str> {
    vec!["java"]
}
