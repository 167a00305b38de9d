//! Price estimate produced per trigger action.

use crate::types::row::FeatureRow;
use chrono::{DateTime, Utc};

/// Result of one estimate action.
///
/// `raw_output` is the estimator's untouched scalar (log-space for market
/// artifacts); `usd` is post-processed (inverse transform, non-negative
/// clamp); `nok` is present only when a currency conversion was applied.
#[derive(Debug, Clone)]
pub struct PriceEstimate {
    pub raw_output: f64,
    pub usd: f64,
    pub nok: Option<f64>,
    /// The exact row sent to the artifact (debug view).
    pub row: FeatureRow,
    pub timestamp: DateTime<Utc>,
}

impl PriceEstimate {
    pub fn new(raw_output: f64, usd: f64, nok: Option<f64>, row: FeatureRow) -> Self {
        Self {
            raw_output,
            usd,
            nok,
            row,
            timestamp: Utc::now(),
        }
    }

    /// User-facing estimate line: `$60,000` for USD-only estimates,
    /// `660,000 kr (~ 60,000 USD)` when a NOK conversion was applied.
    pub fn display(&self) -> String {
        match self.nok {
            Some(nok) => format!(
                "{} kr (~ {} USD)",
                format_thousands(nok),
                format_thousands(self.usd)
            ),
            None => format!("${}", format_thousands(self.usd)),
        }
    }
}

/// Round to whole units and group digits by thousands.
pub fn format_thousands(value: f64) -> String {
    let n = value.round() as i64;
    let digits = n.abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);

    let offset = digits.len() % 3;
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (i + 3 - offset) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    if n < 0 {
        format!("-{grouped}")
    } else {
        grouped
    }
}
