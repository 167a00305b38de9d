//! Configuration management for the price estimation pipeline.

use anyhow::{Context, Result};
use config::{Config, File};
use serde::Deserialize;
use std::path::Path;

/// Main application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub engine: EngineFlowConfig,
    pub market: MarketFlowConfig,
    #[serde(default)]
    pub currency: CurrencyConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Engine-size flow configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct EngineFlowConfig {
    /// Candidate artifact paths, probed in order; first existing wins.
    pub artifact_candidates: Vec<String>,
}

/// Brand/model market flow configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct MarketFlowConfig {
    /// Candidate artifact paths, probed in order; first existing wins.
    pub artifact_candidates: Vec<String>,
    /// JSON list of selectable "Brand_Model" labels.
    #[serde(default = "default_brand_list")]
    pub brand_list: String,
    /// Placeholder values for columns the form does not collect.
    #[serde(default)]
    pub defaults: MarketDefaults,
}

/// Placeholder feature values for the market flow.
///
/// The form collects neither horsepower nor transmission nor accident/title
/// history, but the fitted model requires all four columns. These stand-ins
/// bias every market prediction toward a 150 hp automatic with a clean,
/// accident-free history.
#[derive(Debug, Clone, Deserialize)]
pub struct MarketDefaults {
    #[serde(default = "default_horsepower")]
    pub horsepower: f64,
    #[serde(default = "default_market_transmission")]
    pub transmission: String,
    #[serde(default)]
    pub accident: i64,
    #[serde(default = "default_clean_title_flag")]
    pub clean_title: i64,
}

impl Default for MarketDefaults {
    fn default() -> Self {
        Self {
            horsepower: default_horsepower(),
            transmission: default_market_transmission(),
            accident: 0,
            clean_title: default_clean_title_flag(),
        }
    }
}

/// Currency conversion configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct CurrencyConfig {
    /// Fixed USD to NOK rate applied to market-flow estimates. Not a live
    /// conversion; drifts until someone updates it.
    #[serde(default = "default_usd_to_nok")]
    pub usd_to_nok: f64,
}

impl Default for CurrencyConfig {
    fn default() -> Self {
        Self {
            usd_to_nok: default_usd_to_nok(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format (json, pretty)
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_horsepower() -> f64 {
    150.0
}

fn default_market_transmission() -> String {
    "automatic".to_string()
}

fn default_clean_title_flag() -> i64 {
    1
}

fn default_usd_to_nok() -> f64 {
    11.0
}

fn default_brand_list() -> String {
    "data/brand_list.json".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl AppConfig {
    /// Load configuration from the default file location.
    pub fn load() -> Result<Self> {
        Self::load_from_path("config/config.toml")
    }

    /// Load configuration from a specific path.
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let config = Config::builder()
            .add_source(File::from(path.as_ref()))
            .build()
            .context("Failed to build configuration")?;

        config
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            engine: EngineFlowConfig {
                artifact_candidates: vec![
                    "models/engine_ridge.json".to_string(),
                    "models/motorstrelse.json".to_string(),
                ],
            },
            market: MarketFlowConfig {
                artifact_candidates: vec!["models/market_gbdt.json".to_string()],
                brand_list: default_brand_list(),
                defaults: MarketDefaults::default(),
            },
            currency: CurrencyConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}
