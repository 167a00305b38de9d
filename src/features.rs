//! Feature reconstruction: raw form values to the exact row the fitted
//! artifact expects.
//!
//! Builders are pure; they never touch the filesystem or the artifact.
//! Column names, order, and derived-field formulas mirror the training-time
//! pipeline. Numeric inputs are clamped to the form's widget ranges.

use crate::config::MarketDefaults;
use crate::types::request::{
    EngineEstimateRequest, MarketEstimateRequest, ENGINE_MILAGE_RANGE, ENGINE_MODEL_YEAR_MIN,
    ENGINE_SIZE_RANGE, MARKET_ENGINE_SIZE_RANGE, MARKET_MILAGE_RANGE, MARKET_MODEL_YEAR_RANGE,
};
use crate::types::row::{FeatureRow, FeatureValue};

/// Builds the 10-column engine-flow row.
#[derive(Debug, Clone)]
pub struct EngineRowBuilder {
    anchor_year: i64,
}

impl EngineRowBuilder {
    pub fn new(anchor_year: i64) -> Self {
        Self { anchor_year }
    }

    pub fn anchor_year(&self) -> i64 {
        self.anchor_year
    }

    pub fn build(&self, req: &EngineEstimateRequest) -> FeatureRow {
        let engine_size = req.engine_size.clamp(ENGINE_SIZE_RANGE.0, ENGINE_SIZE_RANGE.1);
        let model_year = req.model_year.clamp(ENGINE_MODEL_YEAR_MIN, self.anchor_year);
        let milage = req.milage.clamp(ENGINE_MILAGE_RANGE.0, ENGINE_MILAGE_RANGE.1);
        let age = self.anchor_year - model_year;

        let mut row = FeatureRow::with_capacity(10);
        row.push("engine_size", FeatureValue::Float(engine_size));
        row.push("model_year", FeatureValue::Int(model_year));
        row.push("milage", FeatureValue::Int(milage));
        row.push("fuel_type", FeatureValue::Text(req.fuel_type.clone()));
        row.push("transmission", FeatureValue::Text(req.transmission.clone()));
        row.push("ext_base", FeatureValue::Text(req.ext_base.clone()));
        row.push("int_base", FeatureValue::Text(req.int_base.clone()));
        row.push("age", FeatureValue::Int(age));
        row.push("accident", FeatureValue::Text(req.accident.clone()));
        row.push("clean_title", FeatureValue::Text(req.clean_title.clone()));
        row
    }
}

/// Builds the 13-column market-flow row.
///
/// Columns the form does not collect (horsepower, transmission, accident,
/// clean_title) are filled from the configured defaults table; they are an
/// approximation, not a measurement.
#[derive(Debug, Clone)]
pub struct MarketRowBuilder {
    anchor_year: i64,
    defaults: MarketDefaults,
}

impl MarketRowBuilder {
    pub fn new(anchor_year: i64, defaults: MarketDefaults) -> Self {
        Self {
            anchor_year,
            defaults,
        }
    }

    pub fn anchor_year(&self) -> i64 {
        self.anchor_year
    }

    pub fn build(&self, req: &MarketEstimateRequest) -> FeatureRow {
        let engine_size = req
            .engine_size
            .clamp(MARKET_ENGINE_SIZE_RANGE.0, MARKET_ENGINE_SIZE_RANGE.1);
        let model_year = req
            .model_year
            .clamp(MARKET_MODEL_YEAR_RANGE.0, MARKET_MODEL_YEAR_RANGE.1);
        let milage = req.milage.clamp(MARKET_MILAGE_RANGE.0, MARKET_MILAGE_RANGE.1);

        let car_age = self.anchor_year - model_year;
        let km_per_year = if car_age > 0 {
            milage as f64 / car_age as f64
        } else {
            milage as f64
        };

        let (brand, model, brand_model) = split_brand_model(req.brand_model.as_deref());
        let fuel_type = map_fuel_display(&req.fuel);

        let mut row = FeatureRow::with_capacity(13);
        row.push("model_year", FeatureValue::Int(model_year));
        row.push("milage", FeatureValue::Int(milage));
        row.push("accident", FeatureValue::Int(self.defaults.accident));
        row.push("clean_title", FeatureValue::Int(self.defaults.clean_title));
        row.push("engine_size", FeatureValue::Float(engine_size));
        row.push("horsepower", FeatureValue::Float(self.defaults.horsepower));
        row.push("car_age", FeatureValue::Int(car_age));
        row.push("km_per_year", FeatureValue::Float(km_per_year));
        row.push("brand", FeatureValue::Text(brand));
        row.push("model", FeatureValue::Text(model));
        row.push("fuel_type", FeatureValue::Text(fuel_type.to_string()));
        row.push(
            "transmission",
            FeatureValue::Text(self.defaults.transmission.clone()),
        );
        row.push("brand_model", FeatureValue::Text(brand_model));
        row
    }
}

/// Split a combined "Brand_Model" label into (brand, model, normalized
/// label). Underscores become spaces, whitespace is collapsed, and the
/// split is on the first space. A missing or empty label yields empty
/// strings throughout.
pub fn split_brand_model(label: Option<&str>) -> (String, String, String) {
    let normalized = match label {
        Some(raw) => raw
            .replace('_', " ")
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" "),
        None => String::new(),
    };

    if normalized.is_empty() {
        return (String::new(), String::new(), normalized);
    }

    match normalized.split_once(' ') {
        Some((brand, model)) => (brand.to_string(), model.to_string(), normalized.clone()),
        None => (normalized.clone(), String::new(), normalized.clone()),
    }
}

/// Map the Norwegian fuel display label to the model's English vocabulary.
pub fn map_fuel_display(display: &str) -> &'static str {
    match display {
        "Bensin" => "Gasoline",
        "Diesel" => "Diesel",
        "Elektrisk" => "Electric",
        "Hybrid" => "Hybrid",
        _ => "Other",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::request::EngineEstimateRequest;

    #[test]
    fn test_engine_row_scenario() {
        let builder = EngineRowBuilder::new(2025);
        let req = EngineEstimateRequest {
            engine_size: 2.0,
            model_year: 2018,
            milage: 60_000,
            fuel_type: "Gasoline".into(),
            transmission: "Automatic".into(),
            ext_base: "Gray".into(),
            int_base: "Black".into(),
            accident: "None reported".into(),
            clean_title: "Yes".into(),
        };

        let row = builder.build(&req);
        assert_eq!(row.len(), 10);
        assert_eq!(row.get("age"), Some(&FeatureValue::Int(7)));
        assert_eq!(
            row.get("accident"),
            Some(&FeatureValue::Text("None reported".into()))
        );
        let names: Vec<&str> = row.names().collect();
        assert_eq!(
            names,
            vec![
                "engine_size",
                "model_year",
                "milage",
                "fuel_type",
                "transmission",
                "ext_base",
                "int_base",
                "age",
                "accident",
                "clean_title"
            ]
        );
    }

    #[test]
    fn test_engine_row_clamps_widget_ranges() {
        let builder = EngineRowBuilder::new(2025);
        let req = EngineEstimateRequest {
            engine_size: 55.0,
            model_year: 2030,
            milage: -5,
            ..Default::default()
        };

        let row = builder.build(&req);
        assert_eq!(row.get("engine_size"), Some(&FeatureValue::Float(10.0)));
        assert_eq!(row.get("model_year"), Some(&FeatureValue::Int(2025)));
        assert_eq!(row.get("milage"), Some(&FeatureValue::Int(0)));
        assert_eq!(row.get("age"), Some(&FeatureValue::Int(0)));
    }

    #[test]
    fn test_market_row_columns_and_placeholders() {
        let builder = MarketRowBuilder::new(2025, MarketDefaults::default());
        let req = MarketEstimateRequest {
            brand_model: Some("Toyota_Corolla".into()),
            fuel: "Bensin".into(),
            model_year: 2018,
            milage: 100_000,
            engine_size: 2.0,
        };

        let row = builder.build(&req);
        assert_eq!(row.len(), 13);
        assert_eq!(row.get("car_age"), Some(&FeatureValue::Int(7)));
        assert_eq!(row.get("horsepower"), Some(&FeatureValue::Float(150.0)));
        assert_eq!(row.get("accident"), Some(&FeatureValue::Int(0)));
        assert_eq!(row.get("clean_title"), Some(&FeatureValue::Int(1)));
        assert_eq!(
            row.get("transmission"),
            Some(&FeatureValue::Text("automatic".into()))
        );
        assert_eq!(row.get("brand"), Some(&FeatureValue::Text("Toyota".into())));
        assert_eq!(row.get("model"), Some(&FeatureValue::Text("Corolla".into())));
        assert_eq!(
            row.get("brand_model"),
            Some(&FeatureValue::Text("Toyota Corolla".into()))
        );
        assert_eq!(
            row.get("fuel_type"),
            Some(&FeatureValue::Text("Gasoline".into()))
        );
    }

    #[test]
    fn test_km_per_year_divide_by_zero_guard() {
        let builder = MarketRowBuilder::new(2025, MarketDefaults::default());

        let aged = builder.build(&MarketEstimateRequest {
            model_year: 2020,
            milage: 50_000,
            ..Default::default()
        });
        assert_eq!(aged.get("km_per_year"), Some(&FeatureValue::Float(10_000.0)));

        let brand_new = builder.build(&MarketEstimateRequest {
            model_year: 2025,
            milage: 5_000,
            ..Default::default()
        });
        assert_eq!(
            brand_new.get("km_per_year"),
            Some(&FeatureValue::Float(5_000.0))
        );
    }

    #[test]
    fn test_split_brand_model_cases() {
        assert_eq!(
            split_brand_model(Some("Toyota_Corolla")),
            ("Toyota".into(), "Corolla".into(), "Toyota Corolla".into())
        );
        assert_eq!(
            split_brand_model(Some("Toyota")),
            ("Toyota".into(), String::new(), "Toyota".into())
        );
        assert_eq!(
            split_brand_model(Some("Land_Rover_Range_Rover")),
            (
                "Land".into(),
                "Rover Range Rover".into(),
                "Land Rover Range Rover".into()
            )
        );
        assert_eq!(
            split_brand_model(None),
            (String::new(), String::new(), String::new())
        );
        assert_eq!(
            split_brand_model(Some("  ")),
            (String::new(), String::new(), String::new())
        );
    }

    #[test]
    fn test_fuel_display_mapping() {
        assert_eq!(map_fuel_display("Bensin"), "Gasoline");
        assert_eq!(map_fuel_display("Elektrisk"), "Electric");
        assert_eq!(map_fuel_display("Annet"), "Other");
        assert_eq!(map_fuel_display("Unknown"), "Other");
    }
}
