//! Hashed term-frequency embedder.
//!
//! Produces deterministic dense vectors by hashing terms into fixed-dimension
//! buckets and weighting by term frequency. Not as semantically rich as a
//! neural model, but always available and reproducible across runs.

use super::EmbeddingProvider;
use crate::error::Result;
use std::collections::HashMap;

pub struct HashingEmbedder {
    dimensions: usize,
}

impl HashingEmbedder {
    pub fn new(dimensions: usize) -> Self {
        Self {
            dimensions: dimensions.max(1),
        }
    }

    /// FNV-1a bucket index of a term.
    fn hash_term(term: &str, dims: usize) -> usize {
        let mut h: u64 = 0xcbf29ce484222325;
        for b in term.as_bytes() {
            h ^= *b as u64;
            h = h.wrapping_mul(0x100000001b3);
        }
        (h % dims as u64) as usize
    }

    /// Lowercase terms of at least two characters; identifiers are also split
    /// at camelCase boundaries so `getCustomer` contributes `customer`.
    pub fn tokenize(text: &str) -> Vec<String> {
        let mut terms = Vec::new();
        for word in text.split(|c: char| !c.is_alphanumeric() && c != '_') {
            if word.len() < 2 {
                continue;
            }
            let parts = split_camel_case(word);
            if parts.len() > 1 {
                terms.extend(
                    parts
                        .iter()
                        .filter(|p| p.len() >= 2)
                        .map(|p| p.to_lowercase()),
                );
            }
            terms.push(word.to_lowercase());
        }
        terms
    }

    fn tf_vector(&self, text: &str) -> Vec<f32> {
        let tokens = Self::tokenize(text);
        if tokens.is_empty() {
            return vec![0.0; self.dimensions];
        }

        let mut tf: HashMap<&str, f32> = HashMap::new();
        for tok in &tokens {
            *tf.entry(tok.as_str()).or_default() += 1.0;
        }

        let total = tokens.len() as f32;
        let mut vec = vec![0.0f32; self.dimensions];
        for (term, count) in &tf {
            let freq = count / total;
            // Short terms are usually keywords or stopwords.
            let idf = 1.0 + (term.len() as f32).ln();
            vec[Self::hash_term(term, self.dimensions)] += freq * idf;
        }

        let norm: f32 = vec.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > f32::EPSILON {
            for v in &mut vec {
                *v /= norm;
            }
        }
        vec
    }
}

fn split_camel_case(word: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut start = 0;
    let mut prev_lower = false;
    for (idx, ch) in word.char_indices() {
        if ch == '_' {
            if start < idx {
                parts.push(&word[start..idx]);
            }
            start = idx + ch.len_utf8();
            prev_lower = false;
            continue;
        }
        if ch.is_uppercase() && prev_lower && start < idx {
            parts.push(&word[start..idx]);
            start = idx;
        }
        prev_lower = ch.is_lowercase() || ch.is_ascii_digit();
    }
    if start < word.len() {
        parts.push(&word[start..]);
    }
    parts
}

impl EmbeddingProvider for HashingEmbedder {
    fn name(&self) -> &str {
        "hashed-tf"
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn embed(&self, text: &str) -> Result<Vec<f32>> {
        Ok(self.tf_vector(text))
    }
}
