//! Support/resistance band around a fair value and the status classifier.

use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Lower edge of the fair band, as a multiple of fair value.
pub const FAIR_BAND_LOWER: f64 = 0.7;
/// Upper edge of the fair band, as a multiple of fair value.
pub const FAIR_BAND_UPPER: f64 = 1.3;

/// Where a price sits relative to its modeled fair value, cheapest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub enum StatusKind {
    DeepValue,
    Undervalued,
    FairValue,
    AboveFair,
    Overvalued,
}

/// Static presentation data attached to a status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusDisplay {
    pub label: &'static str,
    pub glyph: &'static str,
    pub color: &'static str,
}

const STATUS_DISPLAY: [StatusDisplay; 5] = [
    StatusDisplay {
        label: "Deeply Undervalued",
        glyph: "🟢",
        color: "#00d395",
    },
    StatusDisplay {
        label: "Undervalued",
        glyph: "🟢",
        color: "#00d395",
    },
    StatusDisplay {
        label: "Fair Value",
        glyph: "🔵",
        color: "#4da6ff",
    },
    StatusDisplay {
        label: "Above Fair",
        glyph: "🟠",
        color: "#ff9500",
    },
    StatusDisplay {
        label: "Overvalued",
        glyph: "🔴",
        color: "#ff6b6b",
    },
];

impl StatusKind {
    pub const ALL: [StatusKind; 5] = [
        StatusKind::DeepValue,
        StatusKind::Undervalued,
        StatusKind::FairValue,
        StatusKind::AboveFair,
        StatusKind::Overvalued,
    ];

    /// Returns label, glyph and color for the status
    pub fn display(&self) -> &'static StatusDisplay {
        &STATUS_DISPLAY[*self as usize]
    }
}

impl Display for StatusKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display().label)
    }
}

/// Outcome of classifying one price against one fair value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValuationResult {
    pub price: f64,
    pub fair_value: f64,
    pub support: f64,
    pub resist: f64,
    pub deviation_pct: f64,
    pub status: StatusKind,
    /// Position of the price between support (0) and resistance (1) on a log scale.
    pub gauge_position: f64,
}

/// Signed percentage difference of `price` from `fair_value`.
pub fn deviation_pct(price: f64, fair_value: f64) -> f64 {
    (price - fair_value) / fair_value * 100.0
}

/// Status bands are checked cheapest first and a price on a boundary
/// belongs to the cheaper band.
pub fn classify_status(price: f64, fair_value: f64, support: f64, resist: f64) -> StatusKind {
    if price < support {
        StatusKind::DeepValue
    } else if price < fair_value * FAIR_BAND_LOWER {
        StatusKind::Undervalued
    } else if price < fair_value * FAIR_BAND_UPPER {
        StatusKind::FairValue
    } else if price < resist {
        StatusKind::AboveFair
    } else {
        StatusKind::Overvalued
    }
}

/// Log-scale position of `price` between `support` and `resist`, clamped to `[0, 1]`.
pub fn gauge_position(price: f64, support: f64, resist: f64) -> f64 {
    debug_assert!(resist > support, "gauge needs resist > support");
    let log_support = support.log10();
    let span = resist.log10() - log_support;
    ((price.log10() - log_support) / span).clamp(0.0, 1.0)
}

/// Builds the full valuation of `price` against `fair_value`.
pub fn classify(
    price: f64,
    fair_value: f64,
    support_multiplier: f64,
    resist_multiplier: f64,
) -> ValuationResult {
    debug_assert!(price > 0.0 && fair_value > 0.0);
    let support = fair_value * support_multiplier;
    let resist = fair_value * resist_multiplier;

    ValuationResult {
        price,
        fair_value,
        support,
        resist,
        deviation_pct: deviation_pct(price, fair_value),
        status: classify_status(price, fair_value, support, resist),
        gauge_position: gauge_position(price, support, resist),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SUPPORT: f64 = 0.35;
    const RESIST: f64 = 3.5;

    #[test]
    fn test_price_below_support_is_deep_value() {
        let result = classify(15_000.0, 50_000.0, SUPPORT, RESIST);
        assert_eq!(result.support, 17_500.0);
        assert_eq!(result.status, StatusKind::DeepValue);
        assert_eq!(result.gauge_position, 0.0);
        assert!((result.deviation_pct - -70.0).abs() < 1e-9);
    }

    #[test]
    fn test_price_near_fair_is_fair_value() {
        let result = classify(52_000.0, 50_000.0, SUPPORT, RESIST);
        assert_eq!(result.status, StatusKind::FairValue);
        assert!((result.deviation_pct - 4.0).abs() < 1e-9);
        assert!(result.gauge_position > 0.0 && result.gauge_position < 1.0);
    }

    #[test]
    fn test_price_above_resistance_is_overvalued_and_clamped() {
        let result = classify(200_000.0, 50_000.0, SUPPORT, RESIST);
        assert_eq!(result.resist, 175_000.0);
        assert_eq!(result.status, StatusKind::Overvalued);
        assert_eq!(result.gauge_position, 1.0);
    }

    #[test]
    fn test_boundaries_belong_to_cheaper_band() {
        let fair = 50_000.0;
        let support = fair * SUPPORT;
        let resist = fair * RESIST;
        assert_eq!(
            classify_status(support, fair, support, resist),
            StatusKind::Undervalued
        );
        assert_eq!(
            classify_status(fair * FAIR_BAND_LOWER, fair, support, resist),
            StatusKind::FairValue
        );
        assert_eq!(
            classify_status(fair * FAIR_BAND_UPPER, fair, support, resist),
            StatusKind::AboveFair
        );
        assert_eq!(
            classify_status(resist, fair, support, resist),
            StatusKind::Overvalued
        );
    }

    #[test]
    fn test_sweep_visits_every_status_in_order() {
        let fair = 50_000.0;
        let mut seen: Vec<StatusKind> = Vec::new();
        let mut price = 100.0;
        while price < 1_000_000.0 {
            let status = classify(price, fair, SUPPORT, RESIST).status;
            if seen.last() != Some(&status) {
                seen.push(status);
            }
            price *= 1.01;
        }
        assert_eq!(seen, StatusKind::ALL.to_vec());
    }

    #[test]
    fn test_deviation_strictly_increasing_in_price() {
        let fair = 50_000.0;
        let mut previous = f64::NEG_INFINITY;
        for step in 1..500 {
            let price = step as f64 * 250.0;
            let deviation = classify(price, fair, SUPPORT, RESIST).deviation_pct;
            assert!(deviation > previous, "not increasing at {price}");
            previous = deviation;
        }
    }

    #[test]
    fn test_gauge_stays_in_unit_interval() {
        let fair = 50_000.0;
        for price in [1.0, 100.0, 17_500.0, 50_000.0, 175_000.0, 1e9] {
            let gauge = classify(price, fair, SUPPORT, RESIST).gauge_position;
            assert!((0.0..=1.0).contains(&gauge), "{price} -> {gauge}");
        }
        assert_eq!(gauge_position(17_500.0, 17_500.0, 175_000.0), 0.0);
        assert_eq!(gauge_position(175_000.0, 17_500.0, 175_000.0), 1.0);
    }

    #[test]
    fn test_band_brackets_fair_value() {
        for fair in [0.01, 1.0, 50_000.0, 1e12] {
            let result = classify(fair, fair, SUPPORT, RESIST);
            assert!(result.support < result.fair_value);
            assert!(result.fair_value < result.resist);
        }
    }

    #[test]
    fn test_status_display_table() {
        assert_eq!(StatusKind::DeepValue.display().label, "Deeply Undervalued");
        assert_eq!(StatusKind::FairValue.display().color, "#4da6ff");
        assert_eq!(StatusKind::Overvalued.display().glyph, "🔴");
        assert_eq!(StatusKind::AboveFair.to_string(), "Above Fair");
    }
}
