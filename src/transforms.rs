//! Binarization hooks referenced by name from serialized artifacts.
//!
//! The training-time pipeline binarized two free-text columns through named
//! functions. Artifacts carry those names, and loading resolves them against
//! the registry here; the names and truth tables must match the training
//! code exactly or predictions are silently wrong.

use crate::error::{EstimatorError, Result};

/// A registered text-to-indicator transform.
pub type BinarizeFn = fn(&str) -> i64;

/// Registry of binarization hooks, keyed by the names baked into artifacts.
const REGISTRY: &[(&str, BinarizeFn)] = &[
    ("is_accident_reported", is_accident_reported),
    ("clean_title_yes", clean_title_yes),
];

/// 1 if the lowercased value differs from "none reported", else 0.
pub fn is_accident_reported(value: &str) -> i64 {
    i64::from(value.to_lowercase() != "none reported")
}

/// 1 if the lowercased value equals "yes", else 0.
pub fn clean_title_yes(value: &str) -> i64 {
    i64::from(value.to_lowercase() == "yes")
}

/// Resolve a hook by its serialized name.
///
/// An unknown name is the missing-dependency condition: the artifact cannot
/// be reconstructed without the exact callable it was fitted with.
pub fn lookup(name: &str) -> Result<BinarizeFn> {
    REGISTRY
        .iter()
        .find(|(n, _)| *n == name)
        .map(|(_, f)| *f)
        .ok_or_else(|| EstimatorError::MissingTransform {
            name: name.to_string(),
        })
}

/// Apply a hook across a column of values, yielding one indicator per row.
pub fn binarize_column(f: BinarizeFn, values: &[&str]) -> Vec<i64> {
    values.iter().map(|v| f(v)).collect()
}
