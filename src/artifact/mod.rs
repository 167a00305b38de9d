//! Model artifact handling: on-disk format, compilation, evaluation,
//! resolution and caching.

pub mod estimator;
pub mod format;
pub mod loader;
pub mod trees;

pub use estimator::PredictiveArtifact;
pub use format::{ArtifactFile, EstimatorSpec, PipelineSpec, PreprocessStep, TargetSpace};
pub use loader::{ArtifactLoader, LoadedBundle, DEFAULT_ANCHOR_YEAR};
