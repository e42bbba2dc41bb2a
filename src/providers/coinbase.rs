use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, instrument};

use super::util::{http_client, with_retry};
use crate::core::price::{Asset, PriceProvider, PriceQuote, validate_price};

pub struct CoinbaseProvider {
    base_url: String,
    currency: String,
}

impl CoinbaseProvider {
    pub fn new(base_url: &str, currency: &str) -> Self {
        CoinbaseProvider {
            base_url: base_url.trim_end_matches('/').to_string(),
            currency: currency.to_uppercase(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct SpotPriceResponse {
    data: SpotPrice,
}

#[derive(Debug, Deserialize)]
struct SpotPrice {
    amount: String,
}

#[async_trait]
impl PriceProvider for CoinbaseProvider {
    fn name(&self) -> &str {
        "coinbase"
    }

    #[instrument(
        name = "CoinbasePriceFetch",
        skip(self, asset),
        fields(symbol = %asset.symbol)
    )]
    async fn fetch_price(&self, asset: &Asset) -> Result<PriceQuote> {
        let pair = format!("{}-{}", asset.symbol.to_uppercase(), self.currency);
        let url = format!("{}/v2/prices/{}/spot", self.base_url, pair);
        debug!("Requesting spot price from {}", url);

        let client = http_client()?;
        let response = with_retry(|| async { client.get(&url).send().await }, 3, 500)
            .await
            .with_context(|| format!("Request error for pair: {pair}"))?;

        if !response.status().is_success() {
            return Err(anyhow!(
                "HTTP error: {} for pair: {}",
                response.status(),
                pair
            ));
        }

        let text = response.text().await?;
        let data: SpotPriceResponse = serde_json::from_str(&text)
            .map_err(|e| anyhow!("Failed to parse JSON response for {}: {}", pair, e))?;

        let price: f64 = data
            .data
            .amount
            .trim()
            .parse()
            .with_context(|| format!("Invalid amount '{}' for pair: {}", data.data.amount, pair))?;

        Ok(PriceQuote {
            price: validate_price(price, asset)?,
            change_24h: None,
            source: self.name().to_string(),
        })
    }
}
