//! Embedding capability and the per-run vector store.
//!
//! Two independent spaces exist: the summary space (normalized natural
//! language summaries) and the code space (raw source bodies). Vectors from
//! different spaces are never compared.

mod hashing;

pub use hashing::HashingEmbedder;

use crate::code_model::Dataset;
use crate::error::{MoveRecError, Result};
use log::{debug, info, warn};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Produces fixed-length vectors from text. Injected into the engine so
/// tests can substitute a deterministic stub.
pub trait EmbeddingProvider: Send + Sync {
    /// Provider name for logging.
    fn name(&self) -> &str;

    fn dimensions(&self) -> usize;

    fn embed(&self, text: &str) -> Result<Vec<f32>>;
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VectorPair {
    pub summary_vec: Vec<f32>,
    pub code_vec: Vec<f32>,
}

impl VectorPair {
    pub fn new(summary_vec: Vec<f32>, code_vec: Vec<f32>) -> Self {
        VectorPair {
            summary_vec,
            code_vec,
        }
    }
}

/// Serialized form of a [`VectorStore`], for vectors computed outside this crate.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VectorDocument {
    #[serde(default)]
    pub classes: BTreeMap<String, VectorPair>,
    #[serde(default)]
    pub methods: Vec<MethodVectors>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodVectors {
    pub class: String,
    pub method: String,
    #[serde(flatten)]
    pub vectors: VectorPair,
}

/// Read-only map from classes and `(class, method)` keys to their vectors.
#[derive(Debug, Clone, Default)]
pub struct VectorStore {
    classes: HashMap<String, VectorPair>,
    methods: HashMap<(String, String), VectorPair>,
}

impl VectorStore {
    pub fn new() -> Self {
        VectorStore::default()
    }

    pub fn insert_class(&mut self, class: impl Into<String>, vectors: VectorPair) {
        self.classes.insert(class.into(), vectors);
    }

    pub fn insert_method(
        &mut self,
        class: impl Into<String>,
        method: impl Into<String>,
        vectors: VectorPair,
    ) {
        self.methods.insert((class.into(), method.into()), vectors);
    }

    pub fn class_vectors(&self, class: &str) -> Result<&VectorPair> {
        self.classes
            .get(class)
            .ok_or_else(|| MoveRecError::MissingClassVector {
                class: class.to_string(),
            })
    }

    pub fn method_vectors(&self, class: &str, method: &str) -> Result<&VectorPair> {
        self.methods
            .get(&(class.to_string(), method.to_string()))
            .ok_or_else(|| MoveRecError::MissingMethodVector {
                class: class.to_string(),
                method: method.to_string(),
            })
    }

    pub fn class_count(&self) -> usize {
        self.classes.len()
    }

    pub fn method_count(&self) -> usize {
        self.methods.len()
    }

    /// Embeds every class and method of the dataset: summaries in the summary
    /// space, bodies in the code space.
    pub fn embed_dataset(
        dataset: &Dataset,
        summary_provider: &dyn EmbeddingProvider,
        code_provider: &dyn EmbeddingProvider,
    ) -> Result<Self> {
        info!(
            "Embedding {} classes and {} methods (summary: {}, code: {})",
            dataset.class_count(),
            dataset.method_count(),
            summary_provider.name(),
            code_provider.name()
        );

        let classes: Vec<(String, VectorPair)> = dataset
            .all_classes()
            .collect::<Vec<_>>()
            .par_iter()
            .map(|class| {
                let owner = format!("class '{}'", class.name);
                let pair = VectorPair::new(
                    embed_with(summary_provider, "summary", &class.summary, &owner)?,
                    embed_with(code_provider, "code", &class.body, &owner)?,
                );
                Ok((class.name.clone(), pair))
            })
            .collect::<Result<_>>()?;

        let methods: Vec<((String, String), VectorPair)> = dataset
            .all_methods()
            .par_iter()
            .map(|method| {
                let owner = format!("method '{}.{}'", method.class_name, method.name);
                let pair = VectorPair::new(
                    embed_with(summary_provider, "summary", &method.summary, &owner)?,
                    embed_with(code_provider, "code", &method.body, &owner)?,
                );
                Ok(((method.class_name.clone(), method.name.clone()), pair))
            })
            .collect::<Result<_>>()?;

        let store = VectorStore {
            classes: classes.into_iter().collect(),
            methods: methods.into_iter().collect(),
        };
        store.validate_dimensions()?;
        debug!(
            "Vector store holds {} class and {} method pairs",
            store.class_count(),
            store.method_count()
        );
        Ok(store)
    }

    /// Checks that each space uses a single dimensionality across all records.
    pub fn validate_dimensions(&self) -> Result<()> {
        let records = self
            .classes
            .iter()
            .map(|(class, pair)| (format!("class '{}'", class), pair))
            .chain(
                self.methods
                    .iter()
                    .map(|((class, method), pair)| (format!("method '{}.{}'", class, method), pair)),
            );

        let mut expected: Option<(usize, usize)> = None;
        for (owner, pair) in records {
            let dims = (pair.summary_vec.len(), pair.code_vec.len());
            let Some((summary_dims, code_dims)) = expected else {
                expected = Some(dims);
                continue;
            };
            if dims.0 != summary_dims {
                return Err(MoveRecError::DimensionMismatch {
                    space: "summary",
                    owner,
                    expected: summary_dims,
                    actual: dims.0,
                });
            }
            if dims.1 != code_dims {
                return Err(MoveRecError::DimensionMismatch {
                    space: "code",
                    owner,
                    expected: code_dims,
                    actual: dims.1,
                });
            }
        }
        Ok(())
    }

    pub fn from_document(document: VectorDocument) -> Result<Self> {
        let mut store = VectorStore::new();
        for (class, pair) in document.classes {
            store.insert_class(class, pair);
        }
        for entry in document.methods {
            store.insert_method(entry.class, entry.method, entry.vectors);
        }
        store.validate_dimensions()?;
        Ok(store)
    }

    pub fn to_document(&self) -> VectorDocument {
        let mut methods: Vec<MethodVectors> = self
            .methods
            .iter()
            .map(|((class, method), vectors)| MethodVectors {
                class: class.clone(),
                method: method.clone(),
                vectors: vectors.clone(),
            })
            .collect();
        methods.sort_by(|a, b| (&a.class, &a.method).cmp(&(&b.class, &b.method)));

        VectorDocument {
            classes: self
                .classes
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
            methods,
        }
    }
}

/// Embeds one text and checks the vector against the provider's declared size.
fn embed_with(
    provider: &dyn EmbeddingProvider,
    space: &'static str,
    text: &str,
    owner: &str,
) -> Result<Vec<f32>> {
    let vector = provider.embed(text).map_err(|e| MoveRecError::Embedding {
        provider: provider.name().to_string(),
        owner: owner.to_string(),
        message: e.to_string(),
    })?;
    if vector.len() != provider.dimensions() {
        return Err(MoveRecError::DimensionMismatch {
            space,
            owner: owner.to_string(),
            expected: provider.dimensions(),
            actual: vector.len(),
        });
    }
    if is_zero_vector(&vector) {
        // Cosine similarity against a zero vector is 0 for every candidate.
        warn!(
            "{} produced an all-zero {} vector for {}",
            provider.name(),
            space,
            owner
        );
    }
    Ok(vector)
}

fn is_zero_vector(vector: &[f32]) -> bool {
    vector.iter().all(|x| *x == 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::code_model::{ClassInfo, MethodInfo};

    struct FailingProvider;

    impl EmbeddingProvider for FailingProvider {
        fn name(&self) -> &str {
            "failing"
        }

        fn dimensions(&self) -> usize {
            4
        }

        fn embed(&self, text: &str) -> Result<Vec<f32>> {
            if text.contains("boom") {
                Err(MoveRecError::Config("model unavailable".to_string()))
            } else {
                Ok(vec![1.0; 4])
            }
        }
    }

    fn dataset() -> Dataset {
        Dataset::new()
            .with_class(ClassInfo::new("Order", "shop").with_summary("an order"))
            .with_method(MethodInfo::new("Order", "total").with_body("{ return sum; }"))
    }

    #[test]
    fn embeds_every_class_and_method() {
        let provider = HashingEmbedder::new(32);
        let store = VectorStore::embed_dataset(&dataset(), &provider, &provider).unwrap();
        assert_eq!(store.class_count(), 1);
        assert_eq!(store.method_count(), 1);
        assert_eq!(store.method_vectors("Order", "total").unwrap().code_vec.len(), 32);
    }

    #[test]
    fn provider_failure_names_the_record() {
        let data = dataset().with_method(MethodInfo::new("Order", "explode").with_body("boom"));
        let err = VectorStore::embed_dataset(&data, &HashingEmbedder::new(4), &FailingProvider)
            .unwrap_err();
        let message = err.to_string();
        assert!(message.contains("Order.explode"), "{}", message);
        assert!(message.contains("failing"), "{}", message);
    }

    struct ShortProvider;

    impl EmbeddingProvider for ShortProvider {
        fn name(&self) -> &str {
            "short"
        }

        fn dimensions(&self) -> usize {
            8
        }

        fn embed(&self, _text: &str) -> Result<Vec<f32>> {
            Ok(vec![1.0; 4])
        }
    }

    #[test]
    fn vectors_must_match_declared_dimensions() {
        let err = VectorStore::embed_dataset(&dataset(), &HashingEmbedder::new(4), &ShortProvider)
            .unwrap_err();
        assert!(matches!(
            err,
            MoveRecError::DimensionMismatch {
                space: "code",
                expected: 8,
                actual: 4,
                ..
            }
        ));
    }

    #[test]
    fn zero_vectors_are_detected() {
        assert!(is_zero_vector(&[0.0, 0.0, -0.0]));
        assert!(is_zero_vector(&[]));
        assert!(!is_zero_vector(&[0.0, 0.25]));
    }

    #[test]
    fn empty_body_embeds_to_a_zero_vector_without_failing() {
        let data = dataset().with_method(MethodInfo::new("Order", "ship"));
        let provider = HashingEmbedder::new(16);
        let store = VectorStore::embed_dataset(&data, &provider, &provider).unwrap();

        let ship = store.method_vectors("Order", "ship").unwrap();
        assert_eq!(ship.code_vec.len(), 16);
        assert!(is_zero_vector(&ship.code_vec));
        assert!(!is_zero_vector(&store.method_vectors("Order", "total").unwrap().code_vec));
    }

    #[test]
    fn missing_vectors_are_reported() {
        let store = VectorStore::new();
        assert!(matches!(
            store.class_vectors("Cart"),
            Err(MoveRecError::MissingClassVector { .. })
        ));
        assert!(matches!(
            store.method_vectors("Cart", "add"),
            Err(MoveRecError::MissingMethodVector { .. })
        ));
    }

    #[test]
    fn mismatched_dimensions_are_rejected() {
        let mut store = VectorStore::new();
        store.insert_class("A", VectorPair::new(vec![1.0, 0.0], vec![1.0]));
        store.insert_class("B", VectorPair::new(vec![1.0, 0.0, 0.0], vec![1.0]));
        assert!(matches!(
            store.validate_dimensions(),
            Err(MoveRecError::DimensionMismatch { space: "summary", .. })
        ));
    }

    #[test]
    fn document_round_trip_preserves_vectors() {
        let mut store = VectorStore::new();
        store.insert_class("Order", VectorPair::new(vec![0.5, 0.5], vec![1.0]));
        store.insert_method("Order", "total", VectorPair::new(vec![1.0, 0.0], vec![0.0]));

        let json = serde_json::to_string(&store.to_document()).unwrap();
        assert!(json.contains("\"summary_vec\""));
        let restored = VectorStore::from_document(serde_json::from_str(&json).unwrap()).unwrap();
        assert_eq!(
            restored.method_vectors("Order", "total").unwrap(),
            store.method_vectors("Order", "total").unwrap()
        );
    }
}
