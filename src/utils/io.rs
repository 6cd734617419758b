use crate::code_model::{Recommendation, SummaryDocument};
use crate::embedding::VectorDocument;
use crate::error::{MoveRecError, Result};
use comfy_table::Table;
use comfy_table::presets::ASCII_MARKDOWN;
use log::{error, info};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fs;
use std::path::Path;

fn read_json<T: DeserializeOwned>(input_path: &Path) -> Result<T> {
    let contents = fs::read_to_string(input_path).map_err(|e| {
        error!("Failed to read {:?}: {}", input_path, e);
        MoveRecError::Io(e)
    })?;
    serde_json::from_str(&contents).map_err(|e| {
        error!("Failed to parse JSON in {:?}: {}", input_path, e);
        MoveRecError::Json(e)
    })
}

fn write_json<T: Serialize + ?Sized>(value: &T, output_path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(value).map_err(|e| {
        error!("Failed to serialize to JSON: {}", e);
        MoveRecError::Json(e)
    })?;

    match fs::write(output_path, &json) {
        Ok(_) => {
            info!(
                "Successfully wrote {} bytes to {:?}",
                json.len(),
                output_path
            );
            Ok(())
        }
        Err(e) => {
            error!("Failed to write JSON to file {:?}: {}", output_path, e);
            Err(MoveRecError::Io(e))
        }
    }
}

pub fn load_summary_document(input_path: &Path) -> Result<SummaryDocument> {
    let document: SummaryDocument = read_json(input_path)?;
    info!("Loaded {} class records from {:?}", document.len(), input_path);
    Ok(document)
}

pub fn save_summary_document(document: &SummaryDocument, output_path: &Path) -> Result<()> {
    info!(
        "Exporting {} class summaries to JSON: {:?}",
        document.len(),
        output_path
    );
    write_json(document, output_path)
}

pub fn load_vector_document(input_path: &Path) -> Result<VectorDocument> {
    let document: VectorDocument = read_json(input_path)?;
    info!(
        "Loaded vectors for {} classes and {} methods from {:?}",
        document.classes.len(),
        document.methods.len(),
        input_path
    );
    Ok(document)
}

pub fn export_recommendations_to_json(
    recommendations: &[Recommendation],
    output_path: &Path,
) -> Result<()> {
    info!(
        "Exporting {} recommendations to JSON: {:?}",
        recommendations.len(),
        output_path
    );
    write_json(recommendations, output_path)
}

/// Markdown-style table of recommendations for the terminal.
pub fn render_recommendation_table(recommendations: &[Recommendation]) -> String {
    let mut table = Table::new();
    table
        .load_preset(ASCII_MARKDOWN)
        .set_header(vec!["Method", "Current Class", "Action", "Score"]);

    for rec in recommendations {
        table.add_row(vec![
            rec.method.clone(),
            rec.current_class.clone(),
            rec.action.to_string(),
            format!("{:.3}", rec.score),
        ]);
    }

    table.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::code_model::{Action, ClassRecord};
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn summary_document_survives_save_and_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("llm_code_summaries.json");

        let mut document = SummaryDocument::new();
        document.insert(
            "Cart".to_string(),
            ClassRecord {
                summary: "Holds items".to_string(),
                package: "shop".to_string(),
                ..ClassRecord::default()
            },
        );

        save_summary_document(&document, &path).unwrap();
        assert_eq!(load_summary_document(&path).unwrap(), document);
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = TempDir::new().unwrap();
        let err = load_summary_document(&dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, MoveRecError::Io(_)));
    }

    #[test]
    fn malformed_vectors_are_json_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("vectors.json");
        fs::write(&path, "{\"classes\": [1, 2]}").unwrap();
        assert!(matches!(
            load_vector_document(&path).unwrap_err(),
            MoveRecError::Json(_)
        ));
    }

    #[test]
    fn recommendations_export_uses_wire_keys() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("refactor_recommendations.json");
        let recs = vec![Recommendation::keep("getTotal", "Order", Action::KeepGetterSetter)];

        export_recommendations_to_json(&recs, &path).unwrap();
        let value: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value[0]["method"], "getTotal");
        assert_eq!(value[0]["best_class"], "Order");
        assert_eq!(value[0]["action"], "KEEP (getter/setter)");
    }

    #[test]
    fn table_lists_every_recommendation() {
        let recs = vec![
            Recommendation::keep("getTotal", "Order", Action::KeepGetterSetter),
            Recommendation::keep("clear", "Cart", Action::Keep),
        ];
        let table = render_recommendation_table(&recs);
        assert!(table.contains("Current Class"));
        assert!(table.contains("KEEP (getter/setter)"));
        assert!(table.contains("| clear"));
    }
}
