//! Core data structures: requests, feature rows, estimates.

pub mod estimate;
pub mod request;
pub mod row;

pub use estimate::PriceEstimate;
pub use request::{EngineEstimateRequest, EstimateRequest, MarketEstimateRequest};
pub use row::{FeatureRow, FeatureValue};
