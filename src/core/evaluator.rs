//! Composes the time base, power-law model and classifier into one evaluation.

use crate::core::config::ModelConfig;
use crate::core::model::{ModelParameters, elapsed_days, fair_value};
use crate::core::valuation::{ValuationResult, classify, deviation_pct};
use anyhow::{Result, ensure};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// Primary asset valued in units of the reference asset.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SecondaryValuation {
    pub cross_rate: f64,
    pub fair_value: f64,
    pub deviation_pct: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationResult {
    pub evaluated_at: DateTime<Utc>,
    pub elapsed_days: f64,
    pub primary: ValuationResult,
    pub secondary: Option<SecondaryValuation>,
}

/// Model band at an instant, without any market price.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ModelBand {
    pub elapsed_days: f64,
    pub fair_value: f64,
    pub support: f64,
    pub resist: f64,
}

#[derive(Debug, Clone)]
pub struct Evaluator {
    config: ModelConfig,
    primary: ModelParameters,
}

fn ensure_positive(value: f64, what: &str) -> Result<()> {
    ensure!(
        value.is_finite() && value > 0.0,
        "{what} must be a positive number, got {value}"
    );
    Ok(())
}

fn ensure_finite(params: &ModelParameters, relation: &str) -> Result<()> {
    ensure!(
        params.is_finite(),
        "{relation} model coefficients must be finite, got {params:?}"
    );
    Ok(())
}

impl Evaluator {
    /// Validates `config` once so that evaluations cannot hit a degenerate band.
    pub fn new(config: ModelConfig) -> Result<Self> {
        ensure!(
            config.support_multiplier > 0.0 && config.support_multiplier < 1.0,
            "support_multiplier must be in (0, 1), got {}",
            config.support_multiplier
        );
        ensure!(
            config.resist_multiplier > 1.0 && config.resist_multiplier.is_finite(),
            "resist_multiplier must be greater than 1, got {}",
            config.resist_multiplier
        );
        let primary = config.primary_parameters();
        ensure_finite(&primary, "primary")?;
        if let Some(secondary) = &config.secondary {
            ensure_finite(secondary, "secondary")?;
        }
        Ok(Self { config, primary })
    }

    /// Number of modeled relations, 1 or 2.
    pub fn relations(&self) -> usize {
        if self.config.secondary.is_some() { 2 } else { 1 }
    }

    fn days_at(&self, now: DateTime<Utc>) -> Result<f64> {
        ensure!(
            now > self.config.genesis,
            "evaluation instant {now} is not after genesis {}",
            self.config.genesis
        );
        Ok(elapsed_days(now, self.config.genesis))
    }

    pub fn model_band(&self, now: DateTime<Utc>) -> Result<ModelBand> {
        let days = self.days_at(now)?;
        let fair = fair_value(days, &self.primary);
        Ok(ModelBand {
            elapsed_days: days,
            fair_value: fair,
            support: fair * self.config.support_multiplier,
            resist: fair * self.config.resist_multiplier,
        })
    }

    #[instrument(name = "Evaluate", skip(self))]
    pub fn evaluate(
        &self,
        now: DateTime<Utc>,
        price: f64,
        reference_price: Option<f64>,
    ) -> Result<EvaluationResult> {
        ensure_positive(price, "price")?;
        let days = self.days_at(now)?;

        let primary = classify(
            price,
            fair_value(days, &self.primary),
            self.config.support_multiplier,
            self.config.resist_multiplier,
        );

        let secondary = match (reference_price, &self.config.secondary) {
            (Some(reference_price), Some(params)) => {
                ensure_positive(reference_price, "reference price")?;
                let cross_rate = price / reference_price;
                let secondary_fair = fair_value(days, params);
                Some(SecondaryValuation {
                    cross_rate,
                    fair_value: secondary_fair,
                    deviation_pct: deviation_pct(cross_rate, secondary_fair),
                })
            }
            (Some(_), None) => {
                debug!("Reference price given without a secondary model, ignoring it");
                None
            }
            (None, _) => None,
        };

        debug!(
            days,
            fair_value = primary.fair_value,
            status = ?primary.status,
            "Evaluated valuation"
        );

        Ok(EvaluationResult {
            evaluated_at: now,
            elapsed_days: days,
            primary,
            secondary,
        })
    }
}
