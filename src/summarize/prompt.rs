//! Prompts sent to the summarizer for classes and methods.
//!
//! Both prompts carry an `AST INFO` section so an offline summarizer can
//! answer from the structure alone.

use crate::code_model::{FieldDecl, MethodMeta};
use std::fmt::Write;

pub const AST_INFO_MARKER: &str = "AST INFO ###";

const NONE: &str = " - None";

fn or_none(section: &str) -> &str {
    if section.is_empty() { NONE } else { section }
}

fn return_type(method: &MethodMeta) -> &str {
    if method.return_type.is_empty() {
        "void"
    } else {
        &method.return_type
    }
}

pub fn class_prompt(
    package: &str,
    class_name: &str,
    fields: &[FieldDecl],
    methods: &[MethodMeta],
    code: &str,
) -> String {
    let mut field_lines = String::new();
    for field in fields {
        let _ = writeln!(field_lines, "  - `{} {}`", field.declared_type, field.name);
    }
    let mut method_lines = String::new();
    for method in methods {
        let _ = writeln!(
            method_lines,
            "- `{} {}({})`",
            return_type(method),
            method.name,
            method.parameters.join(", ")
        );
    }

    format!(
        "### PACKAGE ###
{package}

### CLASS & METHODS {AST_INFO_MARKER}
Class: {class_name}

**Fields:**
{fields}

**Methods:**
{methods}

### CODE ###
{code}

### INSTRUCTIONS ###
You are summarizing the Java class `{class_name}` based on its actual code and structure.

Include the following in your summary:

- What data it owns (fields)
- What services/methods it offers (just summarize intent)
- What external classes it **uses** (e.g., in parameters, method calls, or field types)

### RULES ###
- Mention only those classes visible in the AST or code. Do NOT assume anything.
- If the class depends on another class, say clearly: \"uses class X\".
- Do NOT describe how the result is delivered (e.g., email/SMS) unless it's in the code.
- Avoid phrases like \"this class contains...\" or \"this class is responsible for...\".
- No method chains or imaginary behavior. Stick to what's in the code.

Output a clear, human-readable English summary. Avoid code formatting.",
        fields = or_none(field_lines.trim_end()),
        methods = or_none(method_lines.trim_end()),
    )
}

pub fn method_prompt(package: &str, method: &MethodMeta) -> String {
    let calls: Vec<String> = method
        .method_calls
        .iter()
        .map(|call| format!(" Call: {}", call))
        .collect();
    let accesses: Vec<String> = method
        .field_accesses
        .iter()
        .map(|access| format!("  FieldAccess: {}", access))
        .collect();
    let locals: Vec<String> = method
        .local_variables
        .iter()
        .map(|var| format!("  Var: {}->{}", var.name, var.declared_type))
        .collect();

    format!(
        "### PACKAGE ###
{package}

### METHOD {AST_INFO_MARKER}
Method: {name}({params}) -> {return_type}

Field Accesses:
{accesses}

Method Calls:
{calls}

Local Variables:
{locals}

### METHOD CODE ###
{body}

### INSTRUCTIONS ###
In 1 sentence (at most 30 words), describe what the method `{name}` does.

### RULES ###
- Start with a verb (e.g., Sends, Validates, Logs).
- Mention if it **uses** other classes (e.g., \"uses class X\"), but do **not** write full method chains or speculative behavior.
- Do **not** refer to any behavior or class not visible in the AST.
- Be strictly literal and grounded in the data above.
- Focus on clarity, not speculation.

Output format: A single sentence starting with a verb.",
        name = method.name,
        params = method.parameters.join(", "),
        return_type = return_type(method),
        accesses = or_none(&accesses.join("\n")),
        calls = or_none(&calls.join("\n")),
        locals = or_none(&locals.join("\n")),
        body = method.body,
    )
}
