//! Error taxonomy for artifact loading and prediction.
//!
//! Loading errors (`ArtifactNotFound`, `MissingTransform`, `InvalidArtifact`,
//! `Io`, `Serialization`) are fatal for the session and carry a user-facing
//! remediation where one exists. `Schema` and `Prediction` errors are raised
//! per estimate action and are recoverable: the caller may adjust inputs and
//! retry.

use std::path::PathBuf;

/// Result type for estimator operations.
pub type Result<T> = std::result::Result<T, EstimatorError>;

/// Main error type for the estimation pipeline.
#[derive(Debug, thiserror::Error)]
pub enum EstimatorError {
    /// No artifact file exists at any candidate path.
    #[error(
        "no model artifact found (searched: {})\n\
         place the exported model at `{}` or update the candidate paths in config",
        format_paths(.searched),
        first_path(.searched)
    )]
    ArtifactNotFound { searched: Vec<PathBuf> },

    /// The artifact names a binarization hook that is not registered in this
    /// build. The serialized preprocessing plan references transforms by
    /// name; loading cannot proceed without an exact match.
    #[error(
        "artifact references unknown transform `{name}`\n\
         register the function under that exact name in the transform registry \
         (src/transforms.rs) or re-export the artifact against a supported hook"
    )]
    MissingTransform { name: String },

    /// The artifact deserialized but is internally inconsistent.
    #[error("invalid model artifact: {0}")]
    InvalidArtifact(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A constructed row does not match the artifact schema.
    #[error("feature row does not match artifact schema: {0}")]
    Schema(String),

    /// Prediction itself failed; the session remains usable.
    #[error("prediction failed: {0}")]
    Prediction(String),
}

impl EstimatorError {
    /// Whether the user can recover by adjusting inputs and retrying.
    /// Loading errors halt the session; per-action errors do not.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::Schema(_) | Self::Prediction(_))
    }
}

fn format_paths(paths: &[PathBuf]) -> String {
    let joined: Vec<String> = paths.iter().map(|p| p.display().to_string()).collect();
    joined.join(", ")
}

fn first_path(paths: &[PathBuf]) -> String {
    paths
        .first()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "models/".to_string())
}
