//! Power-law trend model and the time base it is evaluated on.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

const MILLIS_PER_DAY: f64 = 24.0 * 60.0 * 60.0 * 1000.0;

/// Regression constants of one log-log power-law curve:
/// `log10(price) = coefficient_a + coefficient_b * log10(days)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ModelParameters {
    pub coefficient_a: f64,
    pub coefficient_b: f64,
}

impl ModelParameters {
    pub const fn new(coefficient_a: f64, coefficient_b: f64) -> Self {
        Self {
            coefficient_a,
            coefficient_b,
        }
    }

    pub fn is_finite(&self) -> bool {
        self.coefficient_a.is_finite() && self.coefficient_b.is_finite()
    }
}

/// Days elapsed between `genesis` and `now`.
///
/// `now` must be after `genesis`; the result is not meaningful otherwise.
pub fn elapsed_days(now: DateTime<Utc>, genesis: DateTime<Utc>) -> f64 {
    (now - genesis).num_milliseconds() as f64 / MILLIS_PER_DAY
}

/// Fair value of the modeled relation after `days` days.
pub fn fair_value(days: f64, params: &ModelParameters) -> f64 {
    debug_assert!(days > 0.0, "power-law model is undefined for days <= 0");
    10f64.powf(params.coefficient_a + params.coefficient_b * days.log10())
}
