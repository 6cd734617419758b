use crate::code_model::{ClassRecord, MethodMeta, SummaryDocument};
use crate::error::CollaboratorError;
use crate::indexing::extractor::ClassAst;
use crate::indexing::processor::ExtractedFile;
use crate::summarize::Summarizer;
use crate::summarize::prompt::{class_prompt, method_prompt};
use log::{debug, info, warn};
use std::collections::BTreeSet;

/// Classes a class depends on: field types, call receivers and parameter
/// types, minus the class itself. Sorted.
pub fn uses_classes(class: &ClassAst) -> Vec<String> {
    let mut used: BTreeSet<&str> = class
        .fields
        .iter()
        .map(|field| field.declared_type.as_str())
        .collect();

    for method in &class.methods {
        used.extend(
            method
                .method_calls
                .iter()
                .filter_map(|call| call.split_once('.').map(|(prefix, _)| prefix)),
        );
        used.extend(method.parameters.iter().map(String::as_str));
    }

    used.remove(class.name.as_str());
    used.retain(|name| !name.is_empty());
    used.into_iter().map(str::to_string).collect()
}

/// Summarizes every extracted class and method into the dataset document.
///
/// A class seen twice keeps the later definition.
pub fn generate_summaries(
    files: &[ExtractedFile],
    summarizer: &dyn Summarizer,
) -> Result<SummaryDocument, CollaboratorError> {
    let class_total: usize = files.iter().map(|f| f.ast.classes.len()).sum();
    info!(
        "Generating summaries for {} classes with {}",
        class_total,
        summarizer.name()
    );

    let mut document = SummaryDocument::new();
    let mut method_total = 0;

    for file in files {
        let package = &file.ast.package;
        for class in &file.ast.classes {
            let record = summarize_class(package, class, &file.content, summarizer)?;
            method_total += record.methods.len();

            if document.insert(class.name.clone(), record).is_some() {
                warn!(
                    "Class {} declared more than once; keeping the one in {:?}",
                    class.name, file.path
                );
            }
        }
    }

    info!(
        "Summary generation complete: {} classes, {} methods",
        document.len(),
        method_total
    );
    Ok(document)
}

fn summarize_class(
    package: &str,
    class: &ClassAst,
    file_content: &str,
    summarizer: &dyn Summarizer,
) -> Result<ClassRecord, CollaboratorError> {
    let code = if class.body.is_empty() {
        file_content
    } else {
        class.body.as_str()
    };

    let summary = summarizer.summarize(&class_prompt(
        package,
        &class.name,
        &class.fields,
        &class.methods,
        code,
    ))?;
    debug!("Class {}: {}", class.name, summary);

    let mut record = ClassRecord {
        summary,
        uses_classes: uses_classes(class),
        package: package.to_string(),
        class_body: code.to_string(),
        class_fields: class.fields.clone(),
        ..ClassRecord::default()
    };

    for method in &class.methods {
        let method_summary = summarizer.summarize(&method_prompt(package, method))?;
        debug!("  {}.{}: {}", class.name, method.name, method_summary);

        record.methods.insert(method.name.clone(), method_summary);
        record.methods_meta.push(MethodMeta {
            class_fields: Some(class.fields.clone()),
            ..method.clone()
        });
    }

    Ok(record)
}
