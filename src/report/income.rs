use serde::{Deserialize, Serialize};
use std::fmt;

/// Advertising revenue assumed per 1000 views, in USD
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CpmRates {
    pub low: f64,
    pub high: f64,
}

impl Default for CpmRates {
    fn default() -> Self {
        Self { low: 0.5, high: 3.0 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IncomeRange {
    pub low: f64,
    pub high: f64,
}

impl fmt::Display for IncomeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${:.2} - ${:.2}", self.low, self.high)
    }
}

/// Rough order-of-magnitude earnings, not a financial figure
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IncomeEstimate {
    /// Lifetime views spread over twelve months
    pub monthly: IncomeRange,
    pub lifetime: IncomeRange,
}

pub fn estimate_income(views: u64, rates: CpmRates) -> IncomeEstimate {
    let thousands = views as f64 / 1000.0;
    let range = |periods: f64| IncomeRange {
        low: round_cents(thousands / periods * rates.low),
        high: round_cents(thousands / periods * rates.high),
    };

    IncomeEstimate {
        monthly: range(12.0),
        lifetime: range(1.0),
    }
}

fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
