use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use tracing::{debug, warn};

use crate::core::price::{Asset, PriceProvider, PriceQuote};

/// Tries each provider in order and returns the first quote that succeeds.
pub struct FallbackProvider {
    providers: Vec<Box<dyn PriceProvider>>,
}

impl FallbackProvider {
    pub fn new(providers: Vec<Box<dyn PriceProvider>>) -> Self {
        FallbackProvider { providers }
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}

#[async_trait]
impl PriceProvider for FallbackProvider {
    fn name(&self) -> &str {
        "fallback"
    }

    async fn fetch_price(&self, asset: &Asset) -> Result<PriceQuote> {
        let mut last_error = None;
        for provider in &self.providers {
            match provider.fetch_price(asset).await {
                Ok(quote) => {
                    debug!(provider = provider.name(), price = quote.price, "Price resolved");
                    return Ok(quote);
                }
                Err(e) => {
                    warn!(provider = provider.name(), error = %e, "Price source failed");
                    last_error = Some(e);
                }
            }
        }

        match last_error {
            Some(e) => Err(e).with_context(|| {
                format!("All price sources failed for {}", asset.symbol)
            }),
            None => Err(anyhow!("No price sources configured for {}", asset.symbol)),
        }
    }
}
