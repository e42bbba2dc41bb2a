use crate::core::model::ModelParameters;
use crate::core::price::Asset;
use anyhow::{Context, Result, bail};
use chrono::{DateTime, TimeZone, Utc};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};
use tracing::debug;

pub const DEFAULT_SUPPORT_MULTIPLIER: f64 = 0.35;
pub const DEFAULT_RESIST_MULTIPLIER: f64 = 3.5;
pub const DEFAULT_PRIMARY_PARAMETERS: ModelParameters = ModelParameters::new(-17.01, 5.82);

/// Bitcoin genesis block timestamp.
pub fn default_genesis() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2009, 1, 3, 18, 15, 5)
        .single()
        .unwrap_or(DateTime::UNIX_EPOCH)
}

/// Constants the valuation model is parameterized by.
///
/// `primary` falls back to the USD-fitted defaults when not set.
/// `secondary` switches the evaluator into dual-relation mode, where the
/// primary asset is also valued in units of the reference asset.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ModelConfig {
    #[serde(default = "default_genesis")]
    pub genesis: DateTime<Utc>,
    #[serde(default = "default_support_multiplier")]
    pub support_multiplier: f64,
    #[serde(default = "default_resist_multiplier")]
    pub resist_multiplier: f64,
    #[serde(default)]
    pub primary: Option<ModelParameters>,
    #[serde(default)]
    pub secondary: Option<ModelParameters>,
}

fn default_support_multiplier() -> f64 {
    DEFAULT_SUPPORT_MULTIPLIER
}

fn default_resist_multiplier() -> f64 {
    DEFAULT_RESIST_MULTIPLIER
}

impl Default for ModelConfig {
    fn default() -> Self {
        ModelConfig {
            genesis: default_genesis(),
            support_multiplier: DEFAULT_SUPPORT_MULTIPLIER,
            resist_multiplier: DEFAULT_RESIST_MULTIPLIER,
            primary: None,
            secondary: None,
        }
    }
}

impl ModelConfig {
    pub fn primary_parameters(&self) -> ModelParameters {
        self.primary.unwrap_or(DEFAULT_PRIMARY_PARAMETERS)
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AssetsConfig {
    pub primary: Asset,
    #[serde(default)]
    pub reference: Option<Asset>,
}

impl Default for AssetsConfig {
    fn default() -> Self {
        AssetsConfig {
            primary: Asset {
                symbol: "BTC".to_string(),
                coingecko_id: "bitcoin".to_string(),
            },
            reference: None,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct CoinGeckoProviderConfig {
    pub base_url: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct CoinbaseProviderConfig {
    pub base_url: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ProvidersConfig {
    pub coingecko: Option<CoinGeckoProviderConfig>,
    pub coinbase: Option<CoinbaseProviderConfig>,
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        ProvidersConfig {
            coingecko: Some(CoinGeckoProviderConfig {
                base_url: "https://api.coingecko.com".to_string(),
            }),
            coinbase: Some(CoinbaseProviderConfig {
                base_url: "https://api.coinbase.com".to_string(),
            }),
        }
    }
}

const MODEL_CURRENCY: &str = "USD";

fn default_currency() -> String {
    MODEL_CURRENCY.to_string()
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default)]
    pub model: ModelConfig,
    #[serde(default)]
    pub assets: AssetsConfig,
    #[serde(default)]
    pub providers: ProvidersConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            currency: default_currency(),
            model: ModelConfig::default(),
            assets: AssetsConfig::default(),
            providers: ProvidersConfig::default(),
        }
    }
}

impl AppConfig {
    /// Loads the config from the default location, falling back to the
    /// built-in defaults when no file has been set up.
    pub fn load() -> Result<Self> {
        debug!("Loading default config");
        let config_path = Self::default_config_path()?;
        if !config_path.exists() {
            debug!(path = %config_path.display(), "No config file, using defaults");
            return Ok(Self::default());
        }
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("io", "loknlod", "powerlaw")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        config
            .validate()
            .with_context(|| format!("Invalid config file: {}", path.as_ref().display()))?;
        debug!("Successfully loaded config");
        Ok(config)
    }

    /// The default coefficients are fitted to USD prices, so quoting in any
    /// other currency needs its own primary coefficients.
    pub fn validate(&self) -> Result<()> {
        if !self.currency.eq_ignore_ascii_case(MODEL_CURRENCY) && self.model.primary.is_none() {
            bail!(
                "currency {} needs model.primary coefficients fitted to {} prices",
                self.currency,
                self.currency
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: AppConfig = serde_yaml::from_str("{}").expect("Failed to deserialize");
        assert_eq!(config.currency, "USD");
        assert_eq!(config.model, ModelConfig::default());
        assert_eq!(config.model.genesis.to_rfc3339(), "2009-01-03T18:15:05+00:00");
        assert_eq!(config.assets.primary.coingecko_id, "bitcoin");
        assert!(config.assets.reference.is_none());
        assert_eq!(
            config.providers.coingecko.unwrap().base_url,
            "https://api.coingecko.com"
        );
    }

    #[test]
    fn test_config_deserialization() {
        let yaml_str = r#"
currency: "EUR"
model:
  genesis: "2009-01-03T18:15:05Z"
  support_multiplier: 0.4
  resist_multiplier: 3.0
  primary:
    coefficient_a: -17.0
    coefficient_b: 5.8
  secondary:
    coefficient_a: -19.27
    coefficient_b: 5.5
assets:
  primary:
    symbol: "BTC"
    coingecko_id: "bitcoin"
  reference:
    symbol: "PAXG"
    coingecko_id: "pax-gold"
providers:
  coingecko:
    base_url: "http://example.com/coingecko"
  coinbase:
    base_url: "http://example.com/coinbase"
"#;

        let config: AppConfig = serde_yaml::from_str(yaml_str).expect("Failed to deserialize");
        assert_eq!(config.currency, "EUR");
        assert_eq!(config.model.support_multiplier, 0.4);
        assert_eq!(config.model.resist_multiplier, 3.0);
        assert_eq!(config.model.primary, Some(ModelParameters::new(-17.0, 5.8)));
        assert!(config.validate().is_ok());
        assert_eq!(
            config.model.secondary,
            Some(ModelParameters::new(-19.27, 5.5))
        );
        let reference = config.assets.reference.expect("reference asset");
        assert_eq!(reference.symbol, "PAXG");
        assert_eq!(reference.coingecko_id, "pax-gold");
        assert_eq!(
            config.providers.coinbase.unwrap().base_url,
            "http://example.com/coinbase"
        );
    }

    #[test]
    fn test_partial_model_section_keeps_other_defaults() {
        let yaml_str = r#"
model:
  resist_multiplier: 4.0
"#;
        let config: AppConfig = serde_yaml::from_str(yaml_str).expect("Failed to deserialize");
        assert_eq!(config.model.resist_multiplier, 4.0);
        assert_eq!(config.model.support_multiplier, DEFAULT_SUPPORT_MULTIPLIER);
        assert_eq!(config.model.primary_parameters(), DEFAULT_PRIMARY_PARAMETERS);
    }

    #[test]
    fn test_non_usd_currency_requires_primary_coefficients() -> Result<()> {
        let temp_dir = tempfile::TempDir::new()?;
        let config_path = temp_dir.path().join("config.yaml");

        fs::write(&config_path, "currency: \"EUR\"\n")?;
        let err = AppConfig::load_from_path(&config_path).unwrap_err();
        assert!(err.to_string().contains("Invalid config file"));
        assert_eq!(
            err.root_cause().to_string(),
            "currency EUR needs model.primary coefficients fitted to EUR prices"
        );

        fs::write(
            &config_path,
            r#"
currency: "EUR"
model:
  primary:
    coefficient_a: -17.1
    coefficient_b: 5.82
"#,
        )?;
        let config = AppConfig::load_from_path(&config_path)?;
        assert_eq!(config.model.primary_parameters(), ModelParameters::new(-17.1, 5.82));

        fs::write(&config_path, "currency: \"usd\"\n")?;
        assert!(AppConfig::load_from_path(&config_path).is_ok());
        Ok(())
    }

    #[test]
    fn test_load_from_missing_path_fails_with_context() {
        let err = AppConfig::load_from_path("/definitely/not/here.yaml").unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }
}
