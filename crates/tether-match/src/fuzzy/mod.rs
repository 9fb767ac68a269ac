//! Fuzzy similarity algorithms.
//!
//! Both algorithms operate on `char` sequences (not bytes), are symmetric,
//! and return a normalized similarity in [0.0, 1.0]. Two empty strings are
//! defined as similarity 1.0.

pub mod jaro_winkler;
pub mod levenshtein;

use tether_core::FuzzyAlgorithm;

/// Compute similarity with the configured algorithm.
pub fn similarity(algorithm: FuzzyAlgorithm, a: &str, b: &str) -> f64 {
    match algorithm {
        FuzzyAlgorithm::Levenshtein => levenshtein::similarity(a, b),
        FuzzyAlgorithm::JaroWinkler => jaro_winkler::similarity(a, b),
    }
}
