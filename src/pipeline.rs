//! Per-flow estimation pipelines: row construction, artifact invocation,
//! postprocessing, formatting.
//!
//! Each estimate action is a fresh, synchronous run of the whole pipeline;
//! the only state shared across actions is the immutable loaded artifact.

use crate::artifact::{ArtifactLoader, LoadedBundle, TargetSpace};
use crate::config::{CurrencyConfig, EngineFlowConfig, MarketFlowConfig};
use crate::error::Result;
use crate::features::{EngineRowBuilder, MarketRowBuilder};
use crate::types::estimate::PriceEstimate;
use crate::types::request::{EngineEstimateRequest, MarketEstimateRequest};
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

/// Inverse-transform the raw output into USD and clamp the floor.
///
/// Log-space artifacts yield expm1(raw); either way the displayed price is
/// never negative.
fn postprocess(raw: f64, target: TargetSpace) -> f64 {
    let usd = match target {
        TargetSpace::Price => raw,
        TargetSpace::LogPrice => raw.exp_m1(),
    };
    usd.max(0.0)
}

/// Engine-size-focused estimator (flow 1). Prices in USD.
#[derive(Debug)]
pub struct EnginePriceEstimator {
    bundle: Arc<LoadedBundle>,
    builder: EngineRowBuilder,
}

impl EnginePriceEstimator {
    /// Load the flow's artifact and set up the row builder. Fails with the
    /// load-error taxonomy; no estimate is possible on failure.
    pub fn new(config: &EngineFlowConfig) -> Result<Self> {
        let loader = ArtifactLoader::new(config.artifact_candidates.iter().map(String::as_str));
        let bundle = loader.get()?;
        Ok(Self::from_bundle(bundle))
    }

    pub fn from_bundle(bundle: Arc<LoadedBundle>) -> Self {
        let builder = EngineRowBuilder::new(bundle.anchor_year);
        Self { bundle, builder }
    }

    pub fn anchor_year(&self) -> i64 {
        self.builder.anchor_year()
    }

    /// Run one estimate action.
    pub fn estimate(&self, req: &EngineEstimateRequest) -> Result<PriceEstimate> {
        let row = self.builder.build(req);
        let raw = self.bundle.artifact.predict(&row)?;
        let usd = postprocess(raw, self.bundle.artifact.target());

        debug!(flow = "engine", raw_output = raw, usd = usd, "Estimate computed");
        Ok(PriceEstimate::new(raw, usd, None, row))
    }
}

/// Brand/model-focused estimator (flow 2). Prices in NOK with USD shown
/// alongside.
pub struct MarketPriceEstimator {
    bundle: Arc<LoadedBundle>,
    builder: MarketRowBuilder,
    usd_to_nok: f64,
    brand_labels: Vec<String>,
}

impl MarketPriceEstimator {
    /// Load the flow's artifact and the brand label list resource.
    pub fn new(config: &MarketFlowConfig, currency: &CurrencyConfig) -> Result<Self> {
        let loader = ArtifactLoader::new(config.artifact_candidates.iter().map(String::as_str));
        let bundle = loader.get()?;
        let brand_labels = load_brand_list(&config.brand_list)?;

        info!(
            horsepower = config.defaults.horsepower,
            transmission = %config.defaults.transmission,
            accident = config.defaults.accident,
            clean_title = config.defaults.clean_title,
            "Market flow placeholder defaults in effect (approximation, not measured)"
        );

        Ok(Self::from_parts(
            bundle,
            config.defaults.clone(),
            currency.usd_to_nok,
            brand_labels,
        ))
    }

    pub fn from_parts(
        bundle: Arc<LoadedBundle>,
        defaults: crate::config::MarketDefaults,
        usd_to_nok: f64,
        brand_labels: Vec<String>,
    ) -> Self {
        let builder = MarketRowBuilder::new(bundle.anchor_year, defaults);
        Self {
            bundle,
            builder,
            usd_to_nok,
            brand_labels,
        }
    }

    /// Selectable "Brand_Model" labels for the form.
    pub fn brand_labels(&self) -> &[String] {
        &self.brand_labels
    }

    pub fn anchor_year(&self) -> i64 {
        self.builder.anchor_year()
    }

    /// Run one estimate action.
    pub fn estimate(&self, req: &MarketEstimateRequest) -> Result<PriceEstimate> {
        let row = self.builder.build(req);
        let raw = self.bundle.artifact.predict(&row)?;
        let usd = postprocess(raw, self.bundle.artifact.target());
        let nok = usd * self.usd_to_nok;

        debug!(
            flow = "market",
            raw_output = raw,
            usd = usd,
            nok = nok,
            "Estimate computed"
        );
        Ok(PriceEstimate::new(raw, usd, Some(nok), row))
    }
}

/// Load the brand/model label list resource (a JSON array of strings).
pub fn load_brand_list<P: AsRef<Path>>(path: P) -> Result<Vec<String>> {
    let contents = fs::read_to_string(path.as_ref())?;
    let labels: Vec<String> = serde_json::from_str(&contents)?;
    Ok(labels)
}
