//! Car Price Estimator - Main Entry Point
//!
//! Loads both flow artifacts at startup, then runs the estimate session:
//! one JSON request per stdin line (tagged by flow), one formatted estimate
//! per line out. Artifact loading errors end the session with a remediation
//! message; per-request prediction errors are reported inline and the
//! session stays usable.

use anyhow::Result;
use car_price_estimator::{
    config::AppConfig, pipeline::EnginePriceEstimator, pipeline::MarketPriceEstimator,
    types::EstimateRequest, EstimatorError, PriceEstimate,
};
use std::io::BufRead;
use tracing::{error, info, warn};

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("car_price_estimator=info".parse()?),
        )
        .init();

    info!("Starting Car Price Estimator");

    let show_row = std::env::args().any(|arg| arg == "--show-row");

    // Load configuration
    let config = AppConfig::load()?;
    info!("Configuration loaded successfully");
    info!(
        usd_to_nok = config.currency.usd_to_nok,
        "Using fixed USD to NOK rate (update in config when it drifts)"
    );

    // Load both flow artifacts up front. A missing or broken artifact ends
    // the session here, before any estimate can be triggered.
    let engine = match EnginePriceEstimator::new(&config.engine) {
        Ok(estimator) => estimator,
        Err(e) => return session_halt(e),
    };
    info!(
        anchor_year = engine.anchor_year(),
        "Engine flow ready"
    );

    let market = match MarketPriceEstimator::new(&config.market, &config.currency) {
        Ok(estimator) => estimator,
        Err(e) => return session_halt(e),
    };
    info!(
        anchor_year = market.anchor_year(),
        brand_labels = market.brand_labels().len(),
        "Market flow ready"
    );

    info!("Reading estimate requests from stdin (one JSON object per line)");

    let stdin = std::io::stdin();
    for line in stdin.lock().lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        let request: EstimateRequest = match serde_json::from_str(&line) {
            Ok(request) => request,
            Err(e) => {
                warn!(error = %e, "Failed to parse estimate request");
                continue;
            }
        };

        // Prediction failures are recoverable: report and keep the session.
        let result = match &request {
            EstimateRequest::Engine(req) => engine.estimate(req),
            EstimateRequest::Market(req) => market.estimate(req),
        };

        match result {
            Ok(estimate) => display_estimate(&estimate, show_row),
            Err(e) => {
                error!(error = %e, "Prediction failed; adjust inputs and retry");
            }
        }
    }

    info!("Session closed");
    Ok(())
}

fn display_estimate(estimate: &PriceEstimate, show_row: bool) {
    println!("Estimated price: {}", estimate.display());
    if show_row {
        println!("  row: {}", estimate.row.to_json());
    }
}

/// Fatal load error: show the remediation text, not a stack trace.
fn session_halt(e: EstimatorError) -> Result<()> {
    error!("{e}");
    std::process::exit(1);
}
