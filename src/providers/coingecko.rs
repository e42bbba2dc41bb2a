use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use std::collections::HashMap;
use tracing::{debug, instrument};

use super::util::{http_client, with_retry};
use crate::core::price::{Asset, PriceProvider, PriceQuote, validate_price};

/// `{ "<coin id>": { "<currency>": 60000.0, "<currency>_24h_change": 1.2 } }`
type SimplePriceResponse = HashMap<String, HashMap<String, Option<f64>>>;

// CoinGecko simple price API, the only source that reports a 24h change
pub struct CoinGeckoProvider {
    base_url: String,
    currency: String,
}

impl CoinGeckoProvider {
    pub fn new(base_url: &str, currency: &str) -> Self {
        CoinGeckoProvider {
            base_url: base_url.trim_end_matches('/').to_string(),
            currency: currency.to_lowercase(),
        }
    }
}

#[async_trait]
impl PriceProvider for CoinGeckoProvider {
    fn name(&self) -> &str {
        "coingecko"
    }

    #[instrument(
        name = "CoinGeckoPriceFetch",
        skip(self, asset),
        fields(coin = %asset.coingecko_id)
    )]
    async fn fetch_price(&self, asset: &Asset) -> Result<PriceQuote> {
        let url = format!(
            "{}/api/v3/simple/price?ids={}&vs_currencies={}&include_24hr_change=true",
            self.base_url, asset.coingecko_id, self.currency
        );
        debug!("Requesting price data from {}", url);

        let client = http_client()?;
        let response = with_retry(|| async { client.get(&url).send().await }, 3, 500)
            .await
            .with_context(|| format!("Request error for coin: {}", asset.coingecko_id))?;

        if !response.status().is_success() {
            return Err(anyhow!(
                "HTTP error: {} for coin: {}",
                response.status(),
                asset.coingecko_id
            ));
        }

        let text = response.text().await?;
        let data: SimplePriceResponse = serde_json::from_str(&text).map_err(|e| {
            anyhow!(
                "Failed to parse JSON response for {}: {}",
                asset.coingecko_id,
                e
            )
        })?;

        let fields = data
            .get(&asset.coingecko_id)
            .ok_or_else(|| anyhow!("No price data found for coin: {}", asset.coingecko_id))?;
        let price = fields
            .get(&self.currency)
            .copied()
            .flatten()
            .ok_or_else(|| {
                anyhow!(
                    "No {} price found for coin: {}",
                    self.currency,
                    asset.coingecko_id
                )
            })?;
        let change_24h = fields
            .get(&format!("{}_24h_change", self.currency))
            .copied()
            .flatten();

        Ok(PriceQuote {
            price: validate_price(price, asset)?,
            change_24h,
            source: self.name().to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn bitcoin() -> Asset {
        Asset {
            symbol: "BTC".to_string(),
            coingecko_id: "bitcoin".to_string(),
        }
    }

    async fn create_mock_server(status: u16, mock_response: &str) -> MockServer {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/v3/simple/price"))
            .and(query_param("ids", "bitcoin"))
            .and(query_param("vs_currencies", "usd"))
            .respond_with(ResponseTemplate::new(status).set_body_string(mock_response))
            .mount(&mock_server)
            .await;

        mock_server
    }

    #[tokio::test]
    async fn test_successful_price_fetch() {
        let mock_response = r#"{"bitcoin": {"usd": 67432.5, "usd_24h_change": -1.25}}"#;
        let mock_server = create_mock_server(200, mock_response).await;

        let provider = CoinGeckoProvider::new(&mock_server.uri(), "USD");
        let quote = provider.fetch_price(&bitcoin()).await.unwrap();
        assert_eq!(quote.price, 67432.5);
        assert_eq!(quote.change_24h, Some(-1.25));
        assert_eq!(quote.source, "coingecko");
    }

    #[tokio::test]
    async fn test_missing_or_null_change() {
        let mock_response = r#"{"bitcoin": {"usd": 67432.5, "usd_24h_change": null}}"#;
        let mock_server = create_mock_server(200, mock_response).await;

        let provider = CoinGeckoProvider::new(&mock_server.uri(), "usd");
        let quote = provider.fetch_price(&bitcoin()).await.unwrap();
        assert_eq!(quote.change_24h, None);
    }

    #[tokio::test]
    async fn test_unknown_coin() {
        let mock_server = create_mock_server(200, "{}").await;

        let provider = CoinGeckoProvider::new(&mock_server.uri(), "usd");
        let result = provider.fetch_price(&bitcoin()).await;
        assert_eq!(
            result.unwrap_err().to_string(),
            "No price data found for coin: bitcoin"
        );
    }

    #[tokio::test]
    async fn test_zero_price_is_rejected() {
        let mock_server = create_mock_server(200, r#"{"bitcoin": {"usd": 0.0}}"#).await;

        let provider = CoinGeckoProvider::new(&mock_server.uri(), "usd");
        let result = provider.fetch_price(&bitcoin()).await;
        assert_eq!(
            result.unwrap_err().to_string(),
            "Invalid price 0 for BTC"
        );
    }

    #[tokio::test]
    async fn test_rate_limited_response() {
        let mock_server = create_mock_server(429, "").await;

        let provider = CoinGeckoProvider::new(&mock_server.uri(), "usd");
        let result = provider.fetch_price(&bitcoin()).await;
        assert_eq!(
            result.unwrap_err().to_string(),
            "HTTP error: 429 Too Many Requests for coin: bitcoin"
        );
    }

    #[tokio::test]
    async fn test_malformed_response() {
        let mock_server = create_mock_server(200, r#"{"bitcoin": "nope"}"#).await;

        let provider = CoinGeckoProvider::new(&mock_server.uri(), "usd");
        let result = provider.fetch_price(&bitcoin()).await;
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("Failed to parse JSON response for bitcoin")
        );
    }
}
