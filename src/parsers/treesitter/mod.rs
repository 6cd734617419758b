use std::collections::HashMap;
use tree_sitter::{Language, Parser, Tree};

pub mod languages;
pub mod queries;

pub struct TreeSitterParser {
    parser: Parser,
    language_parsers: HashMap<String, Language>,
}

impl TreeSitterParser {
    pub fn new() -> Self {
        Self {
            parser: Parser::new(),
            language_parsers: languages::get_language_parsers(),
        }
    }

    /// Parses `content` with the named grammar; `None` for unknown languages.
    pub fn parse_as(&mut self, language_name: &str, content: &str) -> Option<Tree> {
        let language = self.language_parsers.get(language_name)?.clone();
        self.parser.set_language(&language).ok()?;
        self.parser.parse(content.as_bytes(), None)
    }
}

impl Default for TreeSitterParser {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_java_and_rejects_unknown_languages() {
        let mut parser = TreeSitterParser::new();
        let tree = parser.parse_as("java", "class A { void f() {} }").unwrap();
        assert_eq!(tree.root_node().kind(), "program");
        assert!(!tree.root_node().has_error());
        assert!(parser.parse_as("cobol", "IDENTIFICATION DIVISION.").is_none());
    }
}
