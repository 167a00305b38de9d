//! Car Price Estimation Pipeline
//!
//! Two independent estimation flows feed user-entered car attributes as a
//! single-row feature table into a previously fitted regression artifact
//! and return a formatted currency estimate: an engine-size-focused flow
//! (USD) and a brand/model market flow (NOK, log-space model).

pub mod artifact;
pub mod config;
pub mod error;
pub mod features;
pub mod pipeline;
pub mod schema;
pub mod transforms;
pub mod types;

pub use artifact::{ArtifactLoader, PredictiveArtifact, DEFAULT_ANCHOR_YEAR};
pub use config::AppConfig;
pub use error::{EstimatorError, Result};
pub use pipeline::{EnginePriceEstimator, MarketPriceEstimator};
pub use types::{EngineEstimateRequest, EstimateRequest, MarketEstimateRequest, PriceEstimate};
