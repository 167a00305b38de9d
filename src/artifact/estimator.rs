//! Compiled predictive artifact: schema check, encoding, evaluation.

use crate::artifact::format::{EstimatorSpec, PipelineSpec, PreprocessStep, TargetSpace};
use crate::artifact::trees::{self, Tree};
use crate::error::{EstimatorError, Result};
use crate::schema::{Dtype, FeatureSchema};
use crate::transforms::{self, BinarizeFn};
use crate::types::row::FeatureRow;
use tracing::debug;

/// A preprocessing step with its hook resolved and its column checked
/// against the schema.
#[derive(Debug)]
enum CompiledStep {
    Passthrough { column: String },
    Standardize { column: String, mean: f64, std: f64 },
    OneHot { column: String, categories: Vec<String> },
    Binarize { column: String, func: BinarizeFn },
}

impl CompiledStep {
    fn column(&self) -> &str {
        match self {
            Self::Passthrough { column }
            | Self::Standardize { column, .. }
            | Self::OneHot { column, .. }
            | Self::Binarize { column, .. } => column,
        }
    }
}

/// Fitted estimator stage.
#[derive(Debug)]
enum Estimator {
    Linear { intercept: f64, coefficients: Vec<f64> },
    TreeEnsemble { base_score: f64, trees: Vec<Tree> },
}

/// A loaded, immutable predictive artifact. Compiled once at load time and
/// shared read-only for the process lifetime.
#[derive(Debug)]
pub struct PredictiveArtifact {
    schema: FeatureSchema,
    steps: Vec<CompiledStep>,
    estimator: Estimator,
    target: TargetSpace,
    feature_width: usize,
}

impl PredictiveArtifact {
    /// Compile a deserialized pipeline spec.
    ///
    /// Resolves binarization hooks against the registry, checks every step
    /// column against the schema, and checks the estimator parameters
    /// against the encoded feature width. A failure here is a load failure,
    /// so prediction itself can no longer hit a structural inconsistency.
    pub fn from_spec(spec: PipelineSpec) -> Result<Self> {
        let PipelineSpec {
            format_version,
            target,
            schema,
            preprocessing,
            estimator,
        } = spec;

        if format_version != 1 {
            return Err(EstimatorError::InvalidArtifact(format!(
                "unsupported artifact format version {format_version}"
            )));
        }

        let mut steps = Vec::with_capacity(preprocessing.len());
        let mut feature_width = 0usize;

        for step in preprocessing {
            let column = step.column().to_string();
            let spec_dtype = schema
                .column(&column)
                .map(|c| c.dtype)
                .ok_or_else(|| {
                    EstimatorError::InvalidArtifact(format!(
                        "preprocessing references column `{column}` absent from the schema"
                    ))
                })?;

            let compiled = match step {
                PreprocessStep::Passthrough { column } => {
                    require_numeric(&column, spec_dtype)?;
                    CompiledStep::Passthrough { column }
                }
                PreprocessStep::Standardize { column, mean, std } => {
                    require_numeric(&column, spec_dtype)?;
                    CompiledStep::Standardize { column, mean, std }
                }
                PreprocessStep::OneHot { column, categories } => {
                    require_text(&column, spec_dtype)?;
                    if categories.is_empty() {
                        return Err(EstimatorError::InvalidArtifact(format!(
                            "one-hot step for `{column}` has no categories"
                        )));
                    }
                    CompiledStep::OneHot { column, categories }
                }
                PreprocessStep::Binarize { column, transform } => {
                    require_text(&column, spec_dtype)?;
                    let func = transforms::lookup(&transform)?;
                    CompiledStep::Binarize { column, func }
                }
            };

            feature_width += match &compiled {
                CompiledStep::OneHot { categories, .. } => categories.len(),
                _ => 1,
            };
            steps.push(compiled);
        }

        let estimator = match estimator {
            EstimatorSpec::Linear {
                intercept,
                coefficients,
            } => {
                if coefficients.len() != feature_width {
                    return Err(EstimatorError::InvalidArtifact(format!(
                        "linear estimator has {} coefficients, but the preprocessing plan encodes {} features",
                        coefficients.len(),
                        feature_width
                    )));
                }
                Estimator::Linear {
                    intercept,
                    coefficients,
                }
            }
            EstimatorSpec::TreeEnsemble { base_score, trees } => {
                for tree in &trees {
                    tree.check(feature_width)
                        .map_err(EstimatorError::InvalidArtifact)?;
                }
                Estimator::TreeEnsemble { base_score, trees }
            }
        };

        Ok(Self {
            schema,
            steps,
            estimator,
            target,
            feature_width,
        })
    }

    pub fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    pub fn target(&self) -> TargetSpace {
        self.target
    }

    /// Width of the encoded feature vector.
    pub fn feature_width(&self) -> usize {
        self.feature_width
    }

    /// Validate a row against the schema, encode it, and evaluate the
    /// estimator for one raw scalar (in the artifact's target space).
    pub fn predict(&self, row: &FeatureRow) -> Result<f64> {
        self.schema.validate(row)?;
        let encoded = self.encode(row)?;

        let raw = match &self.estimator {
            Estimator::Linear {
                intercept,
                coefficients,
            } => {
                intercept
                    + coefficients
                        .iter()
                        .zip(&encoded)
                        .map(|(c, x)| c * x)
                        .sum::<f64>()
            }
            Estimator::TreeEnsemble { base_score, trees } => {
                trees::evaluate_ensemble(*base_score, trees, &encoded)
            }
        };

        if !raw.is_finite() {
            return Err(EstimatorError::Prediction(format!(
                "estimator produced a non-finite value ({raw})"
            )));
        }

        debug!(raw_output = raw, width = self.feature_width, "Artifact evaluated");
        Ok(raw)
    }

    /// Run the preprocessing plan over a validated row.
    fn encode(&self, row: &FeatureRow) -> Result<Vec<f64>> {
        let mut encoded = Vec::with_capacity(self.feature_width);

        for step in &self.steps {
            let value = row.get(step.column()).ok_or_else(|| {
                EstimatorError::Prediction(format!("row lost column `{}`", step.column()))
            })?;

            match step {
                CompiledStep::Passthrough { column } => {
                    encoded.push(numeric(column, value)?);
                }
                CompiledStep::Standardize { column, mean, std } => {
                    let v = numeric(column, value)? - mean;
                    // A non-positive fitted scale is a degenerate column;
                    // emit the centered value unscaled.
                    encoded.push(if *std > 0.0 { v / std } else { v });
                }
                CompiledStep::OneHot { column, categories } => {
                    let text = textual(column, value)?;
                    for category in categories {
                        encoded.push(f64::from(category == text));
                    }
                }
                CompiledStep::Binarize { column, func } => {
                    let text = textual(column, value)?;
                    encoded.push(func(text) as f64);
                }
            }
        }

        Ok(encoded)
    }
}

fn require_numeric(column: &str, dtype: Dtype) -> Result<()> {
    match dtype {
        Dtype::Float | Dtype::Int => Ok(()),
        Dtype::Text => Err(EstimatorError::InvalidArtifact(format!(
            "numeric preprocessing step on text column `{column}`"
        ))),
    }
}

fn require_text(column: &str, dtype: Dtype) -> Result<()> {
    match dtype {
        Dtype::Text => Ok(()),
        _ => Err(EstimatorError::InvalidArtifact(format!(
            "text preprocessing step on numeric column `{column}`"
        ))),
    }
}

fn numeric(column: &str, value: &crate::types::row::FeatureValue) -> Result<f64> {
    value.as_f64().ok_or_else(|| {
        EstimatorError::Prediction(format!("column `{column}` is not numeric"))
    })
}

fn textual<'a>(column: &str, value: &'a crate::types::row::FeatureValue) -> Result<&'a str> {
    value.as_text().ok_or_else(|| {
        EstimatorError::Prediction(format!("column `{column}` is not text"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifact::format::{EstimatorSpec, PreprocessStep};
    use crate::schema::FeatureSchema;
    use crate::types::row::FeatureValue;

    fn linear_spec() -> PipelineSpec {
        PipelineSpec {
            format_version: 1,
            target: TargetSpace::Price,
            schema: FeatureSchema::from_pairs(&[
                ("engine_size", Dtype::Float),
                ("fuel_type", Dtype::Text),
                ("accident", Dtype::Text),
            ]),
            preprocessing: vec![
                PreprocessStep::Standardize {
                    column: "engine_size".into(),
                    mean: 2.0,
                    std: 1.0,
                },
                PreprocessStep::OneHot {
                    column: "fuel_type".into(),
                    categories: vec!["Gasoline".into(), "Diesel".into()],
                },
                PreprocessStep::Binarize {
                    column: "accident".into(),
                    transform: "is_accident_reported".into(),
                },
            ],
            estimator: EstimatorSpec::Linear {
                intercept: 20_000.0,
                coefficients: vec![5_000.0, 1_000.0, 2_000.0, -3_000.0],
            },
        }
    }

    fn row(engine_size: f64, fuel: &str, accident: &str) -> FeatureRow {
        let mut row = FeatureRow::new();
        row.push("engine_size", FeatureValue::Float(engine_size));
        row.push("fuel_type", FeatureValue::Text(fuel.into()));
        row.push("accident", FeatureValue::Text(accident.into()));
        row
    }

    #[test]
    fn test_linear_prediction() {
        let artifact = PredictiveArtifact::from_spec(linear_spec()).unwrap();
        assert_eq!(artifact.feature_width(), 4);

        // engine_size 3.0 -> standardized 1.0; Gasoline -> [1, 0]; no accident -> 0
        let y = artifact.predict(&row(3.0, "Gasoline", "None reported")).unwrap();
        assert_eq!(y, 20_000.0 + 5_000.0 + 1_000.0);

        // accident reported flips the last coefficient on
        let y = artifact.predict(&row(3.0, "Gasoline", "Other")).unwrap();
        assert_eq!(y, 20_000.0 + 5_000.0 + 1_000.0 - 3_000.0);
    }

    #[test]
    fn test_unknown_category_encodes_as_zeros() {
        let artifact = PredictiveArtifact::from_spec(linear_spec()).unwrap();
        let y = artifact.predict(&row(2.0, "Hydrogen", "None reported")).unwrap();
        assert_eq!(y, 20_000.0);
    }

    #[test]
    fn test_schema_mismatch_is_recoverable() {
        let artifact = PredictiveArtifact::from_spec(linear_spec()).unwrap();
        let mut bad = FeatureRow::new();
        bad.push("engine_size", FeatureValue::Float(2.0));

        let err = artifact.predict(&bad).unwrap_err();
        assert!(err.is_recoverable());
        assert!(err.to_string().contains("missing column `fuel_type`"));
    }

    #[test]
    fn test_coefficient_width_mismatch_fails_at_load() {
        let mut spec = linear_spec();
        spec.estimator = EstimatorSpec::Linear {
            intercept: 0.0,
            coefficients: vec![1.0, 2.0],
        };
        let err = PredictiveArtifact::from_spec(spec).unwrap_err();
        assert!(matches!(err, EstimatorError::InvalidArtifact(_)));
        assert!(err.to_string().contains("2 coefficients"));
    }

    #[test]
    fn test_unknown_transform_fails_at_load() {
        let mut spec = linear_spec();
        spec.preprocessing[2] = PreprocessStep::Binarize {
            column: "accident".into(),
            transform: "no_such_hook".into(),
        };
        let err = PredictiveArtifact::from_spec(spec).unwrap_err();
        assert!(matches!(
            err,
            EstimatorError::MissingTransform { ref name } if name == "no_such_hook"
        ));
    }

    #[test]
    fn test_step_on_unknown_column_fails_at_load() {
        let mut spec = linear_spec();
        spec.preprocessing.push(PreprocessStep::Passthrough {
            column: "horsepower".into(),
        });
        let err = PredictiveArtifact::from_spec(spec).unwrap_err();
        assert!(err.to_string().contains("absent from the schema"));
    }
}
