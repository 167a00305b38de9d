//! Demo Artifact Writer
//!
//! Writes deterministic demo artifacts for both flows plus a small brand
//! list, so the estimator binary can be exercised end-to-end without the
//! original training exports. The weights are hand-picked to produce
//! plausible used-car prices; they carry no statistical meaning.

use anyhow::{Context, Result};
use car_price_estimator::artifact::format::{
    EstimatorSpec, PipelineSpec, PreprocessStep, TargetSpace,
};
use car_price_estimator::artifact::trees::{Tree, TreeNode};
use car_price_estimator::schema::{Dtype, FeatureSchema};
use car_price_estimator::types::request::{
    COLOR_BASES, ENGINE_FUEL_TYPES, TRANSMISSIONS,
};
use std::fs;
use std::path::Path;
use tracing::info;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("make_artifact=info".parse()?),
        )
        .init();

    write_json(
        "models/engine_ridge.json",
        &serde_json::json!({
            "pipeline": engine_pipeline(),
            "anchor_year": 2025
        }),
    )?;

    write_json(
        "models/market_gbdt.json",
        &serde_json::json!({
            "pipeline": market_pipeline(),
            "anchor_year": 2025
        }),
    )?;

    write_json("data/brand_list.json", &serde_json::json!(brand_list()))?;

    info!("Demo artifacts written; run the estimator from this directory");
    Ok(())
}

fn write_json<P: AsRef<Path>>(path: P, value: &serde_json::Value) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    fs::write(path, serde_json::to_string_pretty(value)?)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    info!(path = %path.display(), "Wrote artifact");
    Ok(())
}

/// Linear (ridge-style) demo pipeline over the 10-column engine schema.
fn engine_pipeline() -> PipelineSpec {
    let one_hot = |column: &str, categories: &[&str]| PreprocessStep::OneHot {
        column: column.to_string(),
        categories: categories.iter().map(|c| c.to_string()).collect(),
    };

    let preprocessing = vec![
        PreprocessStep::Standardize {
            column: "engine_size".into(),
            mean: 3.0,
            std: 1.2,
        },
        PreprocessStep::Standardize {
            column: "model_year".into(),
            mean: 2015.0,
            std: 6.0,
        },
        PreprocessStep::Standardize {
            column: "milage".into(),
            mean: 60_000.0,
            std: 40_000.0,
        },
        PreprocessStep::Standardize {
            column: "age".into(),
            mean: 10.0,
            std: 6.0,
        },
        one_hot("fuel_type", ENGINE_FUEL_TYPES),
        one_hot("transmission", TRANSMISSIONS),
        one_hot("ext_base", COLOR_BASES),
        one_hot("int_base", COLOR_BASES),
        PreprocessStep::Binarize {
            column: "accident".into(),
            transform: "is_accident_reported".into(),
        },
        PreprocessStep::Binarize {
            column: "clean_title".into(),
            transform: "clean_title_yes".into(),
        },
    ];

    // Coefficient blocks in encoding order: 4 standardized numerics, the
    // four one-hot groups, two binarized flags.
    let mut coefficients = vec![6_500.0, 1_200.0, -5_200.0, -4_800.0];
    coefficients.extend([500.0, 800.0, 1_200.0, 2_500.0, -300.0, -700.0]); // fuel (6)
    coefficients.extend([400.0, -250.0, -600.0, 150.0, 900.0, 1_100.0, -500.0]); // transmission (7)
    coefficients.extend([
        250.0, 180.0, 120.0, 160.0, 90.0, 140.0, -60.0, -120.0, -80.0, -40.0, -200.0,
    ]); // ext_base (11)
    coefficients.extend([
        300.0, 150.0, 100.0, 130.0, 70.0, 110.0, -50.0, -100.0, -70.0, -30.0, -180.0,
    ]); // int_base (11)
    coefficients.extend([-3_500.0, 2_400.0]); // accident, clean_title

    PipelineSpec {
        format_version: 1,
        target: TargetSpace::Price,
        schema: FeatureSchema::from_pairs(&[
            ("engine_size", Dtype::Float),
            ("model_year", Dtype::Int),
            ("milage", Dtype::Int),
            ("fuel_type", Dtype::Text),
            ("transmission", Dtype::Text),
            ("ext_base", Dtype::Text),
            ("int_base", Dtype::Text),
            ("age", Dtype::Int),
            ("accident", Dtype::Text),
            ("clean_title", Dtype::Text),
        ]),
        preprocessing,
        estimator: EstimatorSpec::Linear {
            intercept: 28_000.0,
            coefficients,
        },
    }
}

/// Log-space tree-ensemble demo pipeline over the 13-column market schema.
/// The model and brand_model text columns are schema-required but unused by
/// the plan, matching the original's dropped-remainder behavior.
fn market_pipeline() -> PipelineSpec {
    let preprocessing = vec![
        PreprocessStep::Passthrough {
            column: "model_year".into(),
        },
        PreprocessStep::Passthrough {
            column: "milage".into(),
        },
        PreprocessStep::Passthrough {
            column: "accident".into(),
        },
        PreprocessStep::Passthrough {
            column: "clean_title".into(),
        },
        PreprocessStep::Passthrough {
            column: "engine_size".into(),
        },
        PreprocessStep::Passthrough {
            column: "horsepower".into(),
        },
        PreprocessStep::Passthrough {
            column: "car_age".into(),
        },
        PreprocessStep::Passthrough {
            column: "km_per_year".into(),
        },
        PreprocessStep::OneHot {
            column: "brand".into(),
            categories: vec![
                "Toyota".into(),
                "Volkswagen".into(),
                "Ford".into(),
                "BMW".into(),
                "Mercedes-Benz".into(),
            ],
        },
        PreprocessStep::OneHot {
            column: "fuel_type".into(),
            categories: vec![
                "Gasoline".into(),
                "Diesel".into(),
                "Electric".into(),
                "Hybrid".into(),
                "Other".into(),
            ],
        },
        PreprocessStep::OneHot {
            column: "transmission".into(),
            categories: vec!["automatic".into(), "manual".into()],
        },
    ];

    // Encoded indices: 0..8 numerics, 8..13 brand, 13..18 fuel, 18..20
    // transmission.
    let split = |feature: usize, threshold: f64, left: usize, right: usize| TreeNode::Split {
        feature,
        threshold,
        left,
        right,
    };
    let leaf = |value: f64| TreeNode::Leaf { value };

    let trees = vec![
        // Age and mileage dominate depreciation.
        Tree {
            nodes: vec![
                split(6, 5.0, 1, 2),
                leaf(0.25),
                split(1, 150_000.0, 3, 4),
                leaf(-0.05),
                leaf(-0.35),
            ],
        },
        // Mild brand premium.
        Tree {
            nodes: vec![split(11, 0.5, 1, 2), leaf(-0.02), leaf(0.10)],
        },
        // Engine size premium.
        Tree {
            nodes: vec![split(4, 2.5, 1, 2), leaf(-0.04), leaf(0.12)],
        },
        // Electric premium.
        Tree {
            nodes: vec![split(15, 0.5, 1, 2), leaf(-0.01), leaf(0.15)],
        },
    ];

    PipelineSpec {
        format_version: 1,
        target: TargetSpace::LogPrice,
        schema: FeatureSchema::from_pairs(&[
            ("model_year", Dtype::Int),
            ("milage", Dtype::Int),
            ("accident", Dtype::Int),
            ("clean_title", Dtype::Int),
            ("engine_size", Dtype::Float),
            ("horsepower", Dtype::Float),
            ("car_age", Dtype::Int),
            ("km_per_year", Dtype::Float),
            ("brand", Dtype::Text),
            ("model", Dtype::Text),
            ("fuel_type", Dtype::Text),
            ("transmission", Dtype::Text),
            ("brand_model", Dtype::Text),
        ]),
        preprocessing,
        estimator: EstimatorSpec::TreeEnsemble {
            base_score: 10.2,
            trees,
        },
    }
}

fn brand_list() -> Vec<&'static str> {
    vec![
        "Audi_A4",
        "Audi_Q5",
        "BMW_3_Series",
        "BMW_X3",
        "Ford_Focus",
        "Ford_Mustang",
        "Honda_Civic",
        "Honda_CR-V",
        "Hyundai_Tucson",
        "Kia_Sportage",
        "Mazda_CX-5",
        "Mercedes-Benz_C-Class",
        "Mercedes-Benz_GLC",
        "Nissan_Leaf",
        "Skoda_Octavia",
        "Subaru_Outback",
        "Tesla_Model_3",
        "Toyota_Corolla",
        "Toyota_RAV4",
        "Volkswagen_Golf",
        "Volkswagen_Passat",
        "Volvo_XC60",
    ]
}
