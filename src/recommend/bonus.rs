//! Heuristic bonuses that reward cohesion between a method and a candidate
//! class. Every bonus is non-negative and they are summed unweighted.

use crate::code_model::{ClassInfo, MethodInfo, split_receiver};
use crate::config::ScoringConfig;
use crate::recommend::candidates::used_classes;
use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;

static WRITE_ACCESS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^set[A-Z]").expect("write pattern is valid"));

static READ_ACCESS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^get[A-Z]").expect("read pattern is valid"));

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct BonusBreakdown {
    pub package: f64,
    pub field: f64,
    pub cohesion: f64,
    pub usage: f64,
}

impl BonusBreakdown {
    pub fn total(&self) -> f64 {
        self.package + self.field + self.cohesion + self.usage
    }
}

/// Counts of the method's interactions with instances of one class.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Interactions {
    pub writes: usize,
    pub reads: usize,
    pub external_calls: usize,
}

pub fn package_bonus(source_package: &str, candidate_package: &str, weights: &ScoringConfig) -> f64 {
    if !source_package.is_empty() && source_package == candidate_package {
        weights.package_bonus
    } else {
        0.0
    }
}

pub fn field_bonus(method: &MethodInfo, candidate: &str, weights: &ScoringConfig) -> f64 {
    let touches_candidate = method.field_accesses.iter().any(|access| {
        split_receiver(access)
            .and_then(|(receiver, _)| method.receiver_type(receiver))
            .is_some_and(|declared| declared == candidate)
    });

    if touches_candidate { weights.field_bonus } else { 0.0 }
}

pub fn interactions(method: &MethodInfo, candidate: &str) -> Interactions {
    let mut counts = Interactions::default();

    for access in &method.field_accesses {
        let Some((receiver, member)) = split_receiver(access) else {
            continue;
        };
        if method.receiver_type(receiver) != Some(candidate) {
            continue;
        }
        if WRITE_ACCESS.is_match(member) {
            counts.writes += 1;
        } else if READ_ACCESS.is_match(member) {
            counts.reads += 1;
        }
    }

    counts.external_calls = method
        .calls
        .iter()
        .filter_map(|call| split_receiver(call))
        .filter(|(receiver, _)| method.receiver_type(receiver) == Some(candidate))
        .count();

    counts
}

pub fn cohesion_bonus(method: &MethodInfo, candidate: &str, weights: &ScoringConfig) -> f64 {
    let counts = interactions(method, candidate);
    weights.write_bonus * counts.writes as f64
        + weights.read_bonus * counts.reads as f64
        + weights.call_bonus * counts.external_calls as f64
}

pub fn usage_bonus(
    method: &MethodInfo,
    owner: Option<&ClassInfo>,
    candidate: &str,
    weights: &ScoringConfig,
) -> f64 {
    if used_classes(method, owner).contains(candidate) {
        weights.usage_bonus
    } else {
        0.0
    }
}

pub fn bonuses(
    method: &MethodInfo,
    owner: Option<&ClassInfo>,
    candidate: &ClassInfo,
    weights: &ScoringConfig,
) -> BonusBreakdown {
    let source_package = owner.map(|c| c.package.as_str()).unwrap_or_default();
    BonusBreakdown {
        package: package_bonus(source_package, &candidate.package, weights),
        field: field_bonus(method, &candidate.name, weights),
        cohesion: cohesion_bonus(method, &candidate.name, weights),
        usage: usage_bonus(method, owner, &candidate.name, weights),
    }
}
