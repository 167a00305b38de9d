//! On-disk artifact format.
//!
//! Exported by the training side as JSON: an ordered feature schema, a
//! preprocessing plan, and the estimator parameters themselves (linear
//! coefficients or a tree-ensemble dump). Nothing opaque is deserialized;
//! every number in the file is inspectable.

use crate::artifact::trees::Tree;
use crate::schema::FeatureSchema;
use serde::{Deserialize, Serialize};

/// Space the target variable was modeled in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetSpace {
    /// Price in currency units; usable directly.
    #[default]
    Price,
    /// log1p(price); requires expm1 before the value is currency.
    LogPrice,
}

/// Top-level artifact file: either a bare pipeline or a bundle that also
/// carries the anchor year the age features were fitted against.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ArtifactFile {
    Bundle {
        pipeline: PipelineSpec,
        anchor_year: Option<i64>,
    },
    Bare(PipelineSpec),
}

impl ArtifactFile {
    /// Normalize both forms to (pipeline, optional anchor year).
    pub fn into_parts(self) -> (PipelineSpec, Option<i64>) {
        match self {
            Self::Bundle {
                pipeline,
                anchor_year,
            } => (pipeline, anchor_year),
            Self::Bare(pipeline) => (pipeline, None),
        }
    }
}

/// Serialized fitted pipeline: schema + preprocessing + estimator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineSpec {
    #[serde(default = "default_format_version")]
    pub format_version: u32,
    #[serde(default)]
    pub target: TargetSpace,
    pub schema: FeatureSchema,
    pub preprocessing: Vec<PreprocessStep>,
    pub estimator: EstimatorSpec,
}

fn default_format_version() -> u32 {
    1
}

/// One preprocessing step. Steps run in order; each consumes one named
/// column and appends one or more values to the encoded feature vector.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PreprocessStep {
    /// Emit the numeric value unchanged.
    Passthrough { column: String },
    /// Emit (value - mean) / std, as fitted.
    Standardize { column: String, mean: f64, std: f64 },
    /// One indicator per fitted category; unknown categories encode as all
    /// zeros (the training side ignored unknowns rather than erroring).
    OneHot {
        column: String,
        categories: Vec<String>,
    },
    /// Emit the 0/1 output of a named binarization hook on a text column.
    Binarize { column: String, transform: String },
}

impl PreprocessStep {
    pub fn column(&self) -> &str {
        match self {
            Self::Passthrough { column }
            | Self::Standardize { column, .. }
            | Self::OneHot { column, .. }
            | Self::Binarize { column, .. } => column,
        }
    }

    /// Number of encoded values this step emits.
    pub fn width(&self) -> usize {
        match self {
            Self::OneHot { categories, .. } => categories.len(),
            _ => 1,
        }
    }
}

/// Estimator parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EstimatorSpec {
    /// Exported ridge/linear coefficients over the encoded vector.
    Linear {
        intercept: f64,
        coefficients: Vec<f64>,
    },
    /// Gradient-boosted tree ensemble dump.
    TreeEnsemble { base_score: f64, trees: Vec<Tree> },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::Dtype;

    fn minimal_pipeline_json() -> &'static str {
        r#"{
            "target": "price",
            "schema": {"columns": [
                {"name": "engine_size", "dtype": "float"},
                {"name": "accident", "dtype": "text"}
            ]},
            "preprocessing": [
                {"kind": "standardize", "column": "engine_size", "mean": 2.5, "std": 1.0},
                {"kind": "binarize", "column": "accident", "transform": "is_accident_reported"}
            ],
            "estimator": {"kind": "linear", "intercept": 30000.0, "coefficients": [5000.0, -4000.0]}
        }"#
    }

    #[test]
    fn test_bare_form_parses() {
        let file: ArtifactFile = serde_json::from_str(minimal_pipeline_json()).unwrap();
        let (pipeline, anchor) = file.into_parts();
        assert!(anchor.is_none());
        assert_eq!(pipeline.format_version, 1);
        assert_eq!(pipeline.target, TargetSpace::Price);
        assert_eq!(pipeline.schema.column("accident").unwrap().dtype, Dtype::Text);
        assert_eq!(pipeline.preprocessing.len(), 2);
    }

    #[test]
    fn test_bundle_form_parses() {
        let json = format!(
            r#"{{"pipeline": {}, "anchor_year": 2024}}"#,
            minimal_pipeline_json()
        );
        let file: ArtifactFile = serde_json::from_str(&json).unwrap();
        let (_, anchor) = file.into_parts();
        assert_eq!(anchor, Some(2024));
    }

    #[test]
    fn test_step_widths() {
        let step = PreprocessStep::OneHot {
            column: "fuel_type".into(),
            categories: vec!["Gasoline".into(), "Diesel".into(), "Other".into()],
        };
        assert_eq!(step.width(), 3);
        assert_eq!(step.column(), "fuel_type");

        let step = PreprocessStep::Passthrough {
            column: "age".into(),
        };
        assert_eq!(step.width(), 1);
    }
}
