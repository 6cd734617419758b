use crate::code_model::{Action, ClassInfo, MethodInfo};
use regex::Regex;
use std::sync::LazyLock;

static INTERFACE_KEYWORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\binterface\b").expect("interface pattern is valid"));

static ACCESSOR_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(get|set|is)[A-Z]").expect("accessor pattern is valid"));

static RETURN_STATEMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^return\b").expect("return pattern is valid"));

// A lone `=` that is not part of `==`, `!=`, `<=`, `>=` or `=>`.
static ASSIGNMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(^|[^=!<>])=($|[^=>])").expect("assignment pattern is valid"));

/// Returns the KEEP action for methods that are never scored, or `None`
/// when the method should go through candidate scoring.
///
/// Checks run cheapest first: interface, getter/setter, simple delegate.
pub fn classify(class: Option<&ClassInfo>, method: &MethodInfo) -> Option<Action> {
    if class.is_some_and(|c| is_interface(&c.body)) {
        return Some(Action::KeepInterface);
    }
    if is_getter_setter(&method.name, &method.body) {
        return Some(Action::KeepGetterSetter);
    }
    if is_simple_delegate(&method.body) {
        return Some(Action::KeepSimpleDelegate);
    }
    None
}

/// True when the first non-blank line of the class body mentions `interface`.
pub fn is_interface(class_body: &str) -> bool {
    class_body
        .lines()
        .find(|line| !line.trim().is_empty())
        .is_some_and(|line| INTERFACE_KEYWORD.is_match(line))
}

/// A body of exactly one statement that returns or assigns and ends with `;`.
pub fn is_simple_delegate(body: &str) -> bool {
    match single_statement(body) {
        Some(line) => {
            RETURN_STATEMENT.is_match(line) || (ASSIGNMENT.is_match(line) && line.ends_with(';'))
        }
        None => false,
    }
}

/// An accessor-style name whose body is a single return or assignment.
pub fn is_getter_setter(method_name: &str, body: &str) -> bool {
    if !ACCESSOR_NAME.is_match(method_name) {
        return false;
    }
    single_statement(body)
        .is_some_and(|line| RETURN_STATEMENT.is_match(line) || ASSIGNMENT.is_match(line))
}

/// The body's only top-level statement, with an enclosing `{ ... }` removed.
fn single_statement(body: &str) -> Option<&str> {
    let statements = top_level_statements(body);
    match statements.as_slice() {
        [only] => Some(*only),
        _ => None,
    }
}

/// Splits a method body into its top-level statements.
///
/// A statement ends at a `;` or at a closing `}` outside any parentheses,
/// braces, string literals or comments. Several statements on one line are
/// counted separately.
fn top_level_statements(body: &str) -> Vec<&str> {
    let mut inner = body.trim();
    if let Some(unwrapped) = inner.strip_prefix('{').and_then(|b| b.strip_suffix('}')) {
        inner = unwrapped;
    }

    fn push<'a>(statements: &mut Vec<&'a str>, text: &'a str) {
        let text = text.trim();
        if !text.is_empty() && text != ";" {
            statements.push(text);
        }
    }

    let bytes = inner.as_bytes();
    let mut statements = Vec::new();
    let (mut start, mut parens, mut braces) = (0usize, 0i32, 0i32);
    let mut quote: Option<u8> = None;
    let mut i = 0;

    while i < bytes.len() {
        let b = bytes[i];
        if let Some(q) = quote {
            if b == b'\\' {
                i += 2;
                continue;
            }
            if b == q {
                quote = None;
            }
            i += 1;
            continue;
        }

        match b {
            b'"' | b'\'' => quote = Some(b),
            b'/' if matches!(bytes.get(i + 1), Some(b'/' | b'*')) => {
                let end = if bytes[i + 1] == b'/' {
                    inner[i..].find('\n').map_or(bytes.len(), |n| i + n)
                } else {
                    inner[i + 2..].find("*/").map_or(bytes.len(), |n| i + 2 + n + 2)
                };
                // A comment between statements belongs to neither of them.
                if inner[start..i].trim().is_empty() {
                    start = end;
                }
                i = end;
                continue;
            }
            b'(' => parens += 1,
            b')' => parens -= 1,
            b'{' => braces += 1,
            b'}' => {
                braces -= 1;
                let continues = inner[i + 1..].trim_start().starts_with([';', ',', ')']);
                if braces == 0 && parens == 0 && !continues {
                    push(&mut statements, &inner[start..=i]);
                    start = i + 1;
                }
            }
            b';' if parens == 0 && braces == 0 => {
                push(&mut statements, &inner[start..=i]);
                start = i + 1;
            }
            _ => {}
        }
        i += 1;
    }
    push(&mut statements, &inner[start.min(bytes.len())..]);

    statements
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interface_detected_on_first_non_blank_line() {
        assert!(is_interface("public interface Foo { void bar(); }"));
        assert!(is_interface("\n\n  Interface Shape {\n}"));
        assert!(!is_interface("package shop;\npublic interface Foo {}"));
        assert!(!is_interface("public class InterfaceAdapter {}"));
        assert!(!is_interface(""));
    }

    #[test]
    fn simple_delegate_accepts_one_return_or_assignment() {
        assert!(is_simple_delegate("return x;"));
        assert!(is_simple_delegate("{\n    return repo.find(id);\n}"));
        assert!(is_simple_delegate("{ this.total = total; }"));
        assert!(!is_simple_delegate("this.total = total"));
        assert!(!is_simple_delegate("if (a == b) run();"));
        assert!(!is_simple_delegate("{\n  int x = 1;\n  return x;\n}"));
        assert!(!is_simple_delegate(""));
        assert!(!is_simple_delegate("{ }"));
    }

    #[test]
    fn statements_on_one_line_are_counted_separately() {
        assert_eq!(
            top_level_statements("{ int t = compute(); save(t); notifyAll(t); }"),
            vec!["int t = compute();", "save(t);", "notifyAll(t);"]
        );
        assert!(!is_simple_delegate("{ int t = compute(); save(t); notifyAll(t); }"));
        assert!(!is_getter_setter("getX", "{ x = load(); return x; }"));

        let method = MethodInfo::new("Worker", "process")
            .with_body("{ int t = compute(); save(t); notifyAll(t); }");
        assert_eq!(classify(None, &method), None);
    }

    #[test]
    fn separators_inside_literals_parens_and_blocks_do_not_split() {
        assert_eq!(top_level_statements("return \"a;b\";"), vec!["return \"a;b\";"]);
        assert_eq!(top_level_statements("return ';';"), vec!["return ';';"]);
        assert_eq!(
            top_level_statements("for (int i = 0; i < n; i++) { sum += i; }"),
            vec!["for (int i = 0; i < n; i++) { sum += i; }"]
        );
        assert_eq!(
            top_level_statements("int[] xs = {1, 2};"),
            vec!["int[] xs = {1, 2};"]
        );
        assert_eq!(
            top_level_statements("return x; // done; really"),
            vec!["return x;"]
        );
    }

    #[test]
    fn block_statement_followed_by_return_is_two_statements() {
        assert!(!is_getter_setter("getX", "{ if (x == null) { x = load(); } return x; }"));
        assert!(!is_simple_delegate("if (ready) { total = 0; }\nreturn total;"));
    }

    #[test]
    fn getter_setter_needs_name_and_single_statement() {
        assert!(is_getter_setter("getX", "return this.x;"));
        assert!(is_getter_setter("setTotal", "{\n this.total = total;\n}"));
        assert!(is_getter_setter("isEmpty", "return items.isEmpty();"));
        assert!(!is_getter_setter("getter", "return x;"));
        assert!(!is_getter_setter("getTotal", "{\n log();\n return total;\n}"));
        assert!(!is_getter_setter("settle", "this.done = true;"));
    }

    #[test]
    fn interface_takes_precedence_over_everything() {
        let class = ClassInfo::new("Foo", "shop").with_body("public interface Foo { void bar(); }");
        let method = MethodInfo::new("Foo", "bar").with_body("{\n  compute();\n  store();\n}");
        assert_eq!(classify(Some(&class), &method), Some(Action::KeepInterface));
    }

    #[test]
    fn getter_label_wins_over_simple_delegate() {
        let class = ClassInfo::new("Order", "shop").with_body("public class Order {}");
        let getter = MethodInfo::new("Order", "getX").with_body("return this.x;");
        assert_eq!(classify(Some(&class), &getter), Some(Action::KeepGetterSetter));

        let delegate = MethodInfo::new("Order", "total").with_body("return x;");
        assert_eq!(classify(Some(&class), &delegate), Some(Action::KeepSimpleDelegate));
    }

    #[test]
    fn sparse_methods_fall_through() {
        let method = MethodInfo::new("Order", "ship");
        assert_eq!(classify(None, &method), None);
    }
}
