//! Pricing abstractions and core types

use anyhow::{Result, ensure};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// A tradeable asset and the identifiers quote sources know it by.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Asset {
    /// Ticker used for pair-style quotes, e.g. `BTC` in `BTC-USD`.
    pub symbol: String,
    /// CoinGecko coin id, e.g. `bitcoin`.
    pub coingecko_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceQuote {
    pub price: f64,
    /// 24 hour change in percent, if the source reports one.
    pub change_24h: Option<f64>,
    pub source: String,
}

#[async_trait]
pub trait PriceProvider: Send + Sync {
    fn name(&self) -> &str;

    async fn fetch_price(&self, asset: &Asset) -> Result<PriceQuote>;
}

/// Rejects prices the valuation model cannot take.
pub fn validate_price(price: f64, asset: &Asset) -> Result<f64> {
    ensure!(
        price.is_finite() && price > 0.0,
        "Invalid price {} for {}",
        price,
        asset.symbol
    );
    Ok(price)
}
