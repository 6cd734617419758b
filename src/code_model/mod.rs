mod class;
mod method;
mod recommendation;
mod record;

pub use class::ClassInfo;
pub use method::{MethodInfo, split_receiver};
pub use recommendation::{Action, Recommendation, round_score};
pub use record::{ClassRecord, FieldDecl, MethodMeta, SummaryDocument};

use crate::recommend::normalizer::normalize;
use log::{debug, trace};
use std::collections::{BTreeMap, HashMap};

/// Frozen view of every class and method taking part in one scoring run.
///
/// Classes iterate in name order and methods in class order, then in the
/// order their metadata was captured. Candidate ranking depends on this order.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    classes: BTreeMap<String, ClassInfo>,
    methods: Vec<MethodInfo>,
    method_index: HashMap<(String, String), usize>,
}

impl Dataset {
    pub fn new() -> Self {
        Dataset::default()
    }

    /// Builds the dataset from summary records, normalizing every summary.
    pub fn from_records(records: &SummaryDocument) -> Self {
        let mut dataset = Dataset::new();

        for (class_name, record) in records {
            dataset.add_class(ClassInfo {
                name: class_name.clone(),
                package: record.package.clone(),
                body: record.class_body.clone(),
                fields: record.class_fields.clone(),
                summary: normalize(&record.summary),
            });
        }

        for (class_name, record) in records {
            let mut ordered: Vec<MethodInfo> = Vec::new();
            let mut positions: HashMap<&str, usize> = HashMap::new();

            for meta in &record.methods_meta {
                let method = method_from_meta(class_name, record, meta);
                match positions.get(meta.name.as_str()) {
                    Some(&pos) => {
                        debug!(
                            "Duplicate metadata for {}.{}, keeping the later record",
                            class_name, meta.name
                        );
                        ordered[pos] = method;
                    }
                    None => {
                        positions.insert(meta.name.as_str(), ordered.len());
                        ordered.push(method);
                    }
                }
            }

            for method_name in record.methods.keys() {
                if !positions.contains_key(method_name.as_str()) {
                    trace!("{}.{} has a summary but no metadata", class_name, method_name);
                    ordered.push(
                        MethodInfo::new(class_name.as_str(), method_name.as_str())
                            .with_class_fields(record.class_fields.clone())
                            .with_summary(normalize(&record.methods[method_name])),
                    );
                }
            }

            for method in ordered {
                dataset.add_method(method);
            }
        }

        debug!(
            "Dataset built with {} classes and {} methods",
            dataset.class_count(),
            dataset.method_count()
        );
        dataset
    }

    pub fn add_class(&mut self, class: ClassInfo) {
        self.classes.insert(class.name.clone(), class);
    }

    /// Adds a method, replacing any earlier method with the same key.
    pub fn add_method(&mut self, method: MethodInfo) {
        let key = (method.class_name.clone(), method.name.clone());
        match self.method_index.get(&key) {
            Some(&idx) => self.methods[idx] = method,
            None => {
                self.method_index.insert(key, self.methods.len());
                self.methods.push(method);
            }
        }
    }

    pub fn with_class(mut self, class: ClassInfo) -> Self {
        self.add_class(class);
        self
    }

    pub fn with_method(mut self, method: MethodInfo) -> Self {
        self.add_method(method);
        self
    }

    pub fn get_class(&self, name: &str) -> Option<&ClassInfo> {
        self.classes.get(name)
    }

    pub fn get_method(&self, class_name: &str, method_name: &str) -> Option<&MethodInfo> {
        self.method_index
            .get(&(class_name.to_string(), method_name.to_string()))
            .map(|&idx| &self.methods[idx])
    }

    pub fn all_classes(&self) -> impl Iterator<Item = &ClassInfo> {
        self.classes.values()
    }

    pub fn class_names(&self) -> impl Iterator<Item = &str> {
        self.classes.keys().map(String::as_str)
    }

    pub fn all_methods(&self) -> &[MethodInfo] {
        &self.methods
    }

    pub fn class_count(&self) -> usize {
        self.classes.len()
    }

    pub fn method_count(&self) -> usize {
        self.methods.len()
    }
}

fn method_from_meta(class_name: &str, record: &ClassRecord, meta: &MethodMeta) -> MethodInfo {
    let summary = record
        .methods
        .get(&meta.name)
        .map(|s| normalize(s))
        .unwrap_or_default();

    let class_fields = meta
        .class_fields
        .clone()
        .unwrap_or_else(|| record.class_fields.clone());

    let mut method = MethodInfo::new(class_name, &meta.name)
        .with_return_type(&meta.return_type)
        .with_body(&meta.body)
        .with_class_fields(class_fields)
        .with_summary(summary);
    method.parameters = meta.parameters.clone();
    method.calls = meta.method_calls.clone();
    method.field_accesses = meta.field_accesses.clone();
    method
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn records() -> SummaryDocument {
        serde_json::from_str(
            r#"{
                "Order": {
                    "summary": "Represents an order in the ecommerce system.",
                    "package": "shop",
                    "classFields": [{"var_name": "customer", "var_type": "Customer"}],
                    "methods": {
                        "total": "Computes the total method",
                        "describe": "Describes the order"
                    },
                    "methods_meta": [
                        {"name": "total", "returnType": "double", "parameters": [], "methodBody": "{ return 1; }"}
                    ]
                },
                "Customer": {
                    "summary": "A customer class",
                    "methods": {},
                    "methods_meta": []
                }
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn classes_iterate_in_name_order() {
        let dataset = Dataset::from_records(&records());
        let names: Vec<&str> = dataset.class_names().collect();
        assert_eq!(names, vec!["Customer", "Order"]);
    }

    #[test]
    fn summaries_are_normalized_on_load() {
        let dataset = Dataset::from_records(&records());
        assert_eq!(dataset.get_class("Order").unwrap().summary, "Represents an order .");
        assert_eq!(dataset.get_class("Customer").unwrap().summary, "A customer");
        assert_eq!(
            dataset.get_method("Order", "total").unwrap().summary,
            "Computes the total"
        );
    }

    #[test]
    fn methods_without_metadata_are_kept_with_class_fields() {
        let dataset = Dataset::from_records(&records());
        assert_eq!(dataset.method_count(), 2);

        let total = dataset.get_method("Order", "total").unwrap();
        assert_eq!(total.class_fields, vec![FieldDecl::new("customer", "Customer")]);

        let describe = dataset.get_method("Order", "describe").unwrap();
        assert!(describe.body.is_empty());
        assert!(!describe.has_structural_metadata());
        assert_eq!(describe.class_fields.len(), 1);
    }

    #[test]
    fn method_signature_and_usage_come_from_metadata() {
        let mut doc = records();
        let order = doc.get_mut("Order").unwrap();
        order.methods_meta[0].parameters = vec!["Coupon".to_string()];
        order.methods_meta[0].method_calls = vec!["customer.points".to_string()];
        order.methods_meta[0].field_accesses = vec!["this.customer".to_string()];

        let dataset = Dataset::from_records(&doc);
        let total = dataset.get_method("Order", "total").unwrap();
        assert_eq!(
            total,
            &MethodInfo::new("Order", "total")
                .with_parameter("Coupon")
                .with_return_type("double")
                .with_body("{ return 1; }")
                .with_call("customer.points")
                .with_field_access("this.customer")
                .with_class_fields(vec![FieldDecl::new("customer", "Customer")])
                .with_summary("Computes the total")
        );
        assert_eq!(dataset.get_method("Order", "describe").unwrap().return_type, "");
    }

    #[test]
    fn duplicate_metadata_keeps_one_record_per_key() {
        let mut doc = records();
        let order = doc.get_mut("Order").unwrap();
        order.methods_meta.push(MethodMeta {
            name: "total".to_string(),
            parameters: vec!["Discount".to_string()],
            ..MethodMeta::default()
        });

        let dataset = Dataset::from_records(&doc);
        assert_eq!(dataset.method_count(), 2);
        assert_eq!(
            dataset.get_method("Order", "total").unwrap().parameters,
            vec!["Discount".to_string()]
        );
        assert_eq!(dataset.all_methods()[0].name, "total");
    }
}
