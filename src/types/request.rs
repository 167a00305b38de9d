//! Estimate request structures for both flows.
//!
//! Field defaults mirror the form's initial widget values, so a partial
//! request is still a complete row. The option sets and numeric ranges here
//! are the input domains the collecting form is expected to enforce; the
//! row builders clamp numeric fields to the same ranges.

use serde::{Deserialize, Serialize};

/// Fuel options for the engine flow (model vocabulary, English).
pub const ENGINE_FUEL_TYPES: &[&str] = &[
    "Gasoline",
    "Diesel",
    "Hybrid",
    "Electric",
    "E85 Flex Fuel",
    "Other",
];

/// Transmission options for the engine flow.
pub const TRANSMISSIONS: &[&str] = &[
    "Automatic",
    "Manual",
    "CVT",
    "A/T",
    "8-Speed A/T",
    "10-Speed Automatic",
    "Other",
];

/// Exterior/interior color basis options for the engine flow.
pub const COLOR_BASES: &[&str] = &[
    "Black", "White", "Gray", "Silver", "Blue", "Red", "Green", "Brown", "Beige", "Yellow",
    "Other",
];

/// Accident history options for the engine flow.
pub const ACCIDENT_OPTIONS: &[&str] = &[
    "None reported",
    "At least 1 accident or damage reported",
    "Other",
];

/// Clean-title options for the engine flow.
pub const CLEAN_TITLE_OPTIONS: &[&str] = &["Yes", "No"];

/// Fuel display options for the market flow (Norwegian labels).
pub const MARKET_FUEL_DISPLAY: &[&str] = &["Bensin", "Diesel", "Elektrisk", "Hybrid", "Annet"];

/// Engine flow numeric domains.
pub const ENGINE_SIZE_RANGE: (f64, f64) = (0.5, 10.0);
pub const ENGINE_MODEL_YEAR_MIN: i64 = 1980;
pub const ENGINE_MILAGE_RANGE: (i64, i64) = (0, 1_500_000);

/// Market flow numeric domains.
pub const MARKET_ENGINE_SIZE_RANGE: (f64, f64) = (0.5, 8.0);
pub const MARKET_MODEL_YEAR_RANGE: (i64, i64) = (1990, 2025);
pub const MARKET_MILAGE_RANGE: (i64, i64) = (0, 500_000);

/// Raw field values from the engine-size-focused form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineEstimateRequest {
    #[serde(default = "default_engine_size")]
    pub engine_size: f64,
    #[serde(default = "default_model_year")]
    pub model_year: i64,
    #[serde(default = "default_engine_milage")]
    pub milage: i64,
    #[serde(default = "default_fuel_type")]
    pub fuel_type: String,
    #[serde(default = "default_transmission")]
    pub transmission: String,
    #[serde(default = "default_ext_base")]
    pub ext_base: String,
    #[serde(default = "default_int_base")]
    pub int_base: String,
    #[serde(default = "default_accident")]
    pub accident: String,
    #[serde(default = "default_clean_title")]
    pub clean_title: String,
}

impl Default for EngineEstimateRequest {
    fn default() -> Self {
        Self {
            engine_size: default_engine_size(),
            model_year: default_model_year(),
            milage: default_engine_milage(),
            fuel_type: default_fuel_type(),
            transmission: default_transmission(),
            ext_base: default_ext_base(),
            int_base: default_int_base(),
            accident: default_accident(),
            clean_title: default_clean_title(),
        }
    }
}

/// Raw field values from the brand/model-focused form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketEstimateRequest {
    /// Combined "Brand_Model" label from the selector; optional.
    #[serde(default)]
    pub brand_model: Option<String>,
    /// Norwegian fuel display label (see [`MARKET_FUEL_DISPLAY`]).
    #[serde(default = "default_fuel_display", alias = "fuel_display")]
    pub fuel: String,
    #[serde(default = "default_model_year")]
    pub model_year: i64,
    #[serde(default = "default_market_milage")]
    pub milage: i64,
    #[serde(default = "default_engine_size")]
    pub engine_size: f64,
}

impl Default for MarketEstimateRequest {
    fn default() -> Self {
        Self {
            brand_model: None,
            fuel: default_fuel_display(),
            model_year: default_model_year(),
            milage: default_market_milage(),
            engine_size: default_engine_size(),
        }
    }
}

/// Request envelope tagged by flow, as read from the session input stream.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "flow", rename_all = "snake_case")]
pub enum EstimateRequest {
    Engine(EngineEstimateRequest),
    Market(MarketEstimateRequest),
}

fn default_engine_size() -> f64 {
    2.0
}

fn default_model_year() -> i64 {
    2018
}

fn default_engine_milage() -> i64 {
    60_000
}

fn default_market_milage() -> i64 {
    100_000
}

fn default_fuel_type() -> String {
    "Gasoline".to_string()
}

fn default_fuel_display() -> String {
    "Bensin".to_string()
}

fn default_transmission() -> String {
    "Automatic".to_string()
}

fn default_ext_base() -> String {
    "Gray".to_string()
}

fn default_int_base() -> String {
    "Black".to_string()
}

fn default_accident() -> String {
    "None reported".to_string()
}

fn default_clean_title() -> String {
    "Yes".to_string()
}
