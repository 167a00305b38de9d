//! Feature schema: the explicit column contract between training and
//! inference.
//!
//! The schema ships inside the artifact and every constructed row is checked
//! against it before prediction, so a producer/consumer drift surfaces as a
//! precise missing/extra/mistyped diagnosis instead of whatever the
//! estimator math would have produced.

use crate::error::{EstimatorError, Result};
use crate::types::row::{FeatureRow, FeatureValue};
use serde::{Deserialize, Serialize};

/// Column value type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dtype {
    Float,
    Int,
    Text,
}

impl Dtype {
    /// Whether a concrete value satisfies this column type.
    /// Ints are accepted where floats are expected (numeric widening).
    fn accepts(self, value: &FeatureValue) -> bool {
        matches!(
            (self, value),
            (Dtype::Float, FeatureValue::Float(_))
                | (Dtype::Float, FeatureValue::Int(_))
                | (Dtype::Int, FeatureValue::Int(_))
                | (Dtype::Text, FeatureValue::Text(_))
        )
    }
}

/// One column of the contract.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnSpec {
    pub name: String,
    pub dtype: Dtype,
}

/// Ordered column contract for one artifact.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureSchema {
    pub columns: Vec<ColumnSpec>,
}

impl FeatureSchema {
    pub fn new(columns: Vec<ColumnSpec>) -> Self {
        Self { columns }
    }

    /// Convenience constructor from `(name, dtype)` pairs.
    pub fn from_pairs(pairs: &[(&str, Dtype)]) -> Self {
        Self {
            columns: pairs
                .iter()
                .map(|(name, dtype)| ColumnSpec {
                    name: (*name).to_string(),
                    dtype: *dtype,
                })
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn column(&self, name: &str) -> Option<&ColumnSpec> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Validate a row against the contract, failing fast with every
    /// violation listed: missing columns, unexpected columns, and mistyped
    /// columns.
    pub fn validate(&self, row: &FeatureRow) -> Result<()> {
        let mut problems: Vec<String> = Vec::new();

        for spec in &self.columns {
            match row.get(&spec.name) {
                None => problems.push(format!("missing column `{}`", spec.name)),
                Some(value) if !spec.dtype.accepts(value) => problems.push(format!(
                    "column `{}` has type {} (expected {:?})",
                    spec.name,
                    value.type_name(),
                    spec.dtype
                )),
                Some(_) => {}
            }
        }

        for name in row.names() {
            if self.column(name).is_none() {
                problems.push(format!("unexpected column `{name}`"));
            }
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(EstimatorError::Schema(problems.join("; ")))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schema() -> FeatureSchema {
        FeatureSchema::from_pairs(&[
            ("engine_size", Dtype::Float),
            ("model_year", Dtype::Int),
            ("fuel_type", Dtype::Text),
        ])
    }

    #[test]
    fn test_valid_row_passes() {
        let mut row = FeatureRow::new();
        row.push("engine_size", FeatureValue::Float(2.0));
        row.push("model_year", FeatureValue::Int(2018));
        row.push("fuel_type", FeatureValue::Text("Gasoline".into()));
        assert!(schema().validate(&row).is_ok());
    }

    #[test]
    fn test_int_widens_to_float() {
        let mut row = FeatureRow::new();
        row.push("engine_size", FeatureValue::Int(2));
        row.push("model_year", FeatureValue::Int(2018));
        row.push("fuel_type", FeatureValue::Text("Diesel".into()));
        assert!(schema().validate(&row).is_ok());
    }

    #[test]
    fn test_missing_extra_and_mistyped_are_all_reported() {
        let mut row = FeatureRow::new();
        row.push("engine_size", FeatureValue::Text("big".into()));
        row.push("model_year", FeatureValue::Int(2018));
        row.push("horsepower", FeatureValue::Float(150.0));

        let err = schema().validate(&row).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("column `engine_size` has type text"));
        assert!(msg.contains("missing column `fuel_type`"));
        assert!(msg.contains("unexpected column `horsepower`"));
        assert!(err.is_recoverable());
    }

    #[test]
    fn test_schema_roundtrips_through_json() {
        let json = serde_json::to_string(&schema()).unwrap();
        let back: FeatureSchema = serde_json::from_str(&json).unwrap();
        assert_eq!(back.len(), 3);
        assert_eq!(back.column("model_year").unwrap().dtype, Dtype::Int);
    }
}
