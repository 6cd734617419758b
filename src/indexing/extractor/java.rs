use crate::code_model::{FieldDecl, MethodMeta};
use crate::error::CollaboratorError;
use crate::indexing::extractor::{AstExtractor, ClassAst, SourceFileAst, common};
use crate::parsers::treesitter::TreeSitterParser;
use crate::parsers::treesitter::languages::java_language;
use crate::parsers::treesitter::queries::java as queries;
use log::{debug, trace};
use std::fs;
use std::path::Path;
use tree_sitter::{Language, Node, Query};

/// The extractor's queries, compiled once against the Java grammar.
struct JavaQueries {
    package: Query,
    types: Query,
    calls: Query,
    field_accesses: Query,
    locals: Query,
}

impl JavaQueries {
    fn compile(language: &Language) -> Self {
        let compile = |source: &str| {
            Query::new(language, source).expect("bundled Java query is valid")
        };
        JavaQueries {
            package: compile(queries::PACKAGE_QUERY),
            types: compile(queries::TYPE_DECLARATION_QUERY),
            calls: compile(queries::CALL_QUERY),
            field_accesses: compile(queries::FIELD_ACCESS_QUERY),
            locals: compile(queries::LOCAL_VARIABLE_QUERY),
        }
    }
}

pub struct JavaExtractor {
    queries: JavaQueries,
}

impl JavaExtractor {
    pub fn new() -> Self {
        JavaExtractor {
            queries: JavaQueries::compile(&java_language()),
        }
    }

    /// Extracts package, classes, fields and methods from Java source text.
    pub fn extract_source(
        &self,
        content: &str,
        source_name: &str,
    ) -> Result<SourceFileAst, CollaboratorError> {
        let mut parser = TreeSitterParser::new();
        let tree = parser
            .parse_as("java", content)
            .ok_or_else(|| CollaboratorError::parse(source_name, "tree-sitter produced no tree"))?;
        let root = tree.root_node();
        let source = content.as_bytes();

        let package = common::execute_query(&self.queries.package, root, source, "package")
            .first()
            .map(|node| common::get_compact_text(*node, content))
            .unwrap_or_default();

        let classes: Vec<ClassAst> =
            common::execute_query(&self.queries.types, root, source, "node")
                .into_iter()
                .filter_map(|node| self.extract_class(node, content))
                .collect();

        debug!(
            "Extracted {} classes from {} (package '{}')",
            classes.len(),
            source_name,
            package
        );

        Ok(SourceFileAst { package, classes })
    }

    fn extract_class(&self, node: Node, content: &str) -> Option<ClassAst> {
        let name = common::field_text(node, "name", content)?;
        let body = node.child_by_field_name("body")?;

        let mut fields = Vec::new();
        let mut methods = Vec::new();
        for member in self.class_members(body) {
            match member.kind() {
                "field_declaration" | "constant_declaration" => {
                    fields.extend(self.variable_declarations(member, content));
                }
                "method_declaration" => {
                    if let Some(method) = self.extract_method(member, content) {
                        trace!("Found method {}.{}", name, method.name);
                        methods.push(method);
                    }
                }
                _ => {}
            }
        }

        Some(ClassAst {
            name,
            body: content
                .get(declaration_start(node, content)..node.end_byte())
                .unwrap_or_default()
                .to_string(),
            fields,
            methods,
        })
    }

    /// Direct members of a type body; enum members sit one level deeper.
    fn class_members<'a>(&self, body: Node<'a>) -> Vec<Node<'a>> {
        let mut members = Vec::new();
        let mut cursor = body.walk();
        for child in body.named_children(&mut cursor) {
            if child.kind() == "enum_body_declarations" {
                let mut inner = child.walk();
                members.extend(child.named_children(&mut inner));
            } else {
                members.push(child);
            }
        }
        members
    }

    /// `{name, type}` pairs of a field or local variable declaration.
    fn variable_declarations(&self, node: Node, content: &str) -> Vec<FieldDecl> {
        let declared_type = common::field_text(node, "type", content).unwrap_or_default();
        let mut cursor = node.walk();
        node.children_by_field_name("declarator", &mut cursor)
            .filter_map(|declarator| common::field_text(declarator, "name", content))
            .map(|name| FieldDecl::new(name, declared_type.clone()))
            .collect()
    }

    fn extract_method(&self, node: Node, content: &str) -> Option<MethodMeta> {
        let name = common::field_text(node, "name", content)?;
        let return_type = common::field_text(node, "type", content).unwrap_or_default();
        let parameters = node
            .child_by_field_name("parameters")
            .map(|params| self.parameter_types(params, content))
            .unwrap_or_default();

        let Some(block) = node.child_by_field_name("body") else {
            return Some(MethodMeta {
                name,
                return_type,
                parameters,
                ..MethodMeta::default()
            });
        };

        let source = content.as_bytes();
        let method_calls = common::execute_query(&self.queries.calls, block, source, "call")
            .into_iter()
            .filter_map(|call| self.call_target(call, content))
            .collect();
        let field_accesses =
            common::execute_query(&self.queries.field_accesses, block, source, "access")
                .into_iter()
                .filter_map(|access| {
                    let object = common::field_text(access, "object", content)?;
                    let field = common::field_text(access, "field", content)?;
                    Some(format!("{}.{}", object, field))
                })
                .collect();
        let local_variables =
            common::execute_query(&self.queries.locals, block, source, "declaration")
                .into_iter()
                .flat_map(|decl| self.variable_declarations(decl, content))
                .collect();

        Some(MethodMeta {
            name,
            return_type,
            parameters,
            method_calls,
            field_accesses,
            local_variables,
            class_fields: None,
            body: common::get_node_text(block, content),
        })
    }

    fn parameter_types(&self, params: Node, content: &str) -> Vec<String> {
        let mut cursor = params.walk();
        params
            .named_children(&mut cursor)
            .filter_map(|param| match param.kind() {
                "formal_parameter" => common::field_text(param, "type", content),
                "spread_parameter" => {
                    let mut inner = param.walk();
                    let declared = param
                        .named_children(&mut inner)
                        .find(|child| !matches!(child.kind(), "modifiers" | "variable_declarator"))
                        .map(|child| common::get_compact_text(child, content))?;
                    Some(format!("{}...", declared))
                }
                _ => None,
            })
            .collect()
    }

    /// `receiver.name` for qualified invocations, `name` for bare ones.
    fn call_target(&self, call: Node, content: &str) -> Option<String> {
        let name = common::field_text(call, "name", content)?;
        match common::field_text(call, "object", content) {
            Some(object) => Some(format!("{}.{}", object, name)),
            None => Some(name),
        }
    }
}

/// Start of the line holding a declaration's keyword. Annotations written on
/// lines of their own above it are left out.
fn declaration_start(node: Node, content: &str) -> usize {
    let mut cursor = node.walk();
    let keyword_start = node
        .children(&mut cursor)
        .find(|child| child.kind() != "modifiers")
        .map_or(node.start_byte(), |child| child.start_byte());

    content[..keyword_start]
        .rfind('\n')
        .map_or(0, |newline| newline + 1)
        .max(node.start_byte())
}

impl Default for JavaExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl AstExtractor for JavaExtractor {
    fn name(&self) -> &str {
        "tree-sitter-java"
    }

    fn extract_ast(&self, file_path: &Path) -> Result<SourceFileAst, CollaboratorError> {
        let content =
            fs::read_to_string(file_path).map_err(|e| CollaboratorError::io(file_path, e))?;
        self.extract_source(&content, &file_path.to_string_lossy())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::code_model::{Action, ClassInfo, MethodInfo};
    use crate::recommend::classifier::classify;
    use pretty_assertions::assert_eq;

    const ORDER_SERVICE: &str = r#"
package java.ecommerce;

import java.util.List;

public class OrderService {
    private PaymentService payments;
    private int retries, timeout;

    public void logOrder(Order order) {
        System.out.println("Logging order #" + order.getId());
    }

    public boolean refundOrder(Order order, String method) {
        payments.refund(order.total);
        int attempts = this.retries;
        return true;
    }

    public void tag(String... labels) {
        log();
    }
}

interface Notifier {
    void send(String message);
}
"#;

    fn extract() -> SourceFileAst {
        JavaExtractor::new()
            .extract_source(ORDER_SERVICE, "OrderService.java")
            .unwrap()
    }

    #[test]
    fn extracts_package_and_classes() {
        let ast = extract();
        assert_eq!(ast.package, "java.ecommerce");
        let names: Vec<&str> = ast.classes.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["OrderService", "Notifier"]);
    }

    #[test]
    fn extracts_fields_with_multiple_declarators() {
        let ast = extract();
        assert_eq!(
            ast.classes[0].fields,
            vec![
                FieldDecl::new("payments", "PaymentService"),
                FieldDecl::new("retries", "int"),
                FieldDecl::new("timeout", "int"),
            ]
        );
    }

    #[test]
    fn extracts_method_signature_and_usage() {
        let ast = extract();
        let refund = &ast.classes[0].methods[1];
        assert_eq!(refund.name, "refundOrder");
        assert_eq!(refund.return_type, "boolean");
        assert_eq!(refund.parameters, vec!["Order", "String"]);
        assert_eq!(refund.method_calls, vec!["payments.refund"]);
        assert_eq!(refund.field_accesses, vec!["order.total", "this.retries"]);
        assert_eq!(refund.local_variables, vec![FieldDecl::new("attempts", "int")]);
        assert!(refund.body.starts_with('{'));
        assert!(refund.body.ends_with('}'));
    }

    #[test]
    fn qualified_and_bare_calls() {
        let ast = extract();
        let log_order = &ast.classes[0].methods[0];
        assert!(log_order.method_calls.contains(&"System.out.println".to_string()));
        assert!(log_order.method_calls.contains(&"order.getId".to_string()));
        assert_eq!(log_order.field_accesses, vec!["System.out"]);

        let tag = &ast.classes[0].methods[2];
        assert_eq!(tag.parameters, vec!["String..."]);
        assert_eq!(tag.method_calls, vec!["log"]);
    }

    #[test]
    fn interface_body_starts_with_keyword_line() {
        let ast = extract();
        let notifier = &ast.classes[1];
        assert!(notifier.body.starts_with("interface Notifier"));
        assert_eq!(notifier.methods[0].name, "send");
        assert_eq!(notifier.methods[0].body, "");
    }

    #[test]
    fn annotated_interface_body_starts_at_keyword_line() {
        let source = "package shop;\n\n@FunctionalInterface\n@Deprecated(since = \"2\")\npublic interface Pricing {\n    double price(Order order);\n}\n";
        let ast = JavaExtractor::new().extract_source(source, "Pricing.java").unwrap();
        let pricing = &ast.classes[0];
        assert!(pricing.body.starts_with("public interface Pricing"), "{}", pricing.body);
        assert!(pricing.body.ends_with('}'));

        let class = ClassInfo::new("Pricing", "shop").with_body(pricing.body.clone());
        let method = MethodInfo::new("Pricing", "price");
        assert_eq!(classify(Some(&class), &method), Some(Action::KeepInterface));
    }

    #[test]
    fn inline_annotations_stay_on_the_keyword_line() {
        let source = "@Entity public class Order {\n    private int id;\n}\n";
        let ast = JavaExtractor::new().extract_source(source, "Order.java").unwrap();
        assert!(ast.classes[0].body.starts_with("@Entity public class Order"));
    }

    #[test]
    fn one_line_method_with_several_statements_is_not_short_circuited() {
        let source = "class Worker {\n    void process() { int t = compute(); save(t); notifyAll(t); }\n}\n";
        let ast = JavaExtractor::new().extract_source(source, "Worker.java").unwrap();
        let worker = &ast.classes[0];
        let process = &worker.methods[0];

        let class = ClassInfo::new("Worker", "").with_body(worker.body.clone());
        let method = MethodInfo::new("Worker", "process").with_body(process.body.clone());
        assert_eq!(classify(Some(&class), &method), None);
    }

    #[test]
    fn queries_expose_the_captures_the_extractor_reads() {
        let queries = JavaExtractor::new().queries;
        assert!(queries.package.capture_index_for_name("package").is_some());
        assert!(queries.types.capture_index_for_name("node").is_some());
        assert!(queries.calls.capture_index_for_name("call").is_some());
        assert!(queries.field_accesses.capture_index_for_name("access").is_some());
        assert!(queries.locals.capture_index_for_name("declaration").is_some());
    }
}
