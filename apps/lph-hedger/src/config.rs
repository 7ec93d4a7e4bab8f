//! TOML configuration for the hedger binary.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clients_binance::{BinancePerpsClientConfig, DEFAULT_BASE_URL};
use clients_subgraph::DEFAULT_SUBGRAPH_URL;
use lph::LPHStrategyConfig;
use serde::Deserialize;
use url::Url;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub debug: bool,
    pub subgraph_url: String,
    /// Position IDs to track
    pub positions: Vec<String>,
    pub amount_threshold_bps: u32,
    pub interval_secs: u64,
    pub quote_currency: String,
    pub snapshot_path: PathBuf,
    pub binance: BinanceConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BinanceConfig {
    pub api_key: String,
    pub secret_key: String,
    pub base_url: String,
    /// Token to perpetual instrument overrides
    pub symbols: Vec<SymbolOverride>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SymbolOverride {
    pub token: String,
    pub instrument: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            debug: false,
            subgraph_url: DEFAULT_SUBGRAPH_URL.to_string(),
            positions: Vec::new(),
            amount_threshold_bps: 10,
            interval_secs: 1,
            quote_currency: "USDT".to_string(),
            snapshot_path: PathBuf::from("positions.json"),
            binance: BinanceConfig::default(),
        }
    }
}

impl Default for BinanceConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            secret_key: String::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            symbols: Vec::new(),
        }
    }
}

impl AppConfig {
    /// Loads and validates the configuration file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        let config: Self = toml::from_str(&content)
            .with_context(|| format!("failed to parse config {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.interval_secs == 0 {
            bail!("interval_secs must be positive");
        }
        if self.quote_currency.trim().is_empty() {
            bail!("quote_currency cannot be empty");
        }
        Url::parse(&self.subgraph_url)
            .with_context(|| format!("invalid subgraph_url {:?}", self.subgraph_url))?;
        if self.has_credentials() {
            Url::parse(&self.binance.base_url)
                .with_context(|| format!("invalid binance.base_url {:?}", self.binance.base_url))?;
        }
        if let Some(entry) = self
            .binance
            .symbols
            .iter()
            .find(|s| s.token.trim().is_empty() || s.instrument.trim().is_empty())
        {
            bail!("incomplete symbol override {:?}", entry);
        }
        Ok(())
    }

    /// Hedging needs both credentials; otherwise the hedger only monitors.
    pub fn has_credentials(&self) -> bool {
        !self.binance.api_key.is_empty() && !self.binance.secret_key.is_empty()
    }

    pub fn binance_client_config(&self) -> Option<BinancePerpsClientConfig> {
        self.has_credentials().then(|| BinancePerpsClientConfig {
            api_key: self.binance.api_key.clone(),
            api_secret: self.binance.secret_key.clone(),
            base_url: self.binance.base_url.clone(),
        })
    }

    pub fn strategy_config(&self) -> LPHStrategyConfig {
        let token_instruments: HashMap<String, String> = self
            .binance
            .symbols
            .iter()
            .map(|s| (s.token.trim().to_uppercase(), s.instrument.trim().to_uppercase()))
            .collect();
        LPHStrategyConfig {
            position_ids: self.positions.clone(),
            amount_threshold_bps: self.amount_threshold_bps,
            token_instruments,
            quote_currency: self.quote_currency.trim().to_uppercase(),
            interval: Duration::from_secs(self.interval_secs),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn missing_keys_use_defaults() {
        let config: AppConfig = toml::from_str(r#"positions = ["799"]"#).unwrap();
        assert_eq!(config.positions, vec!["799"]);
        assert_eq!(config.amount_threshold_bps, 10);
        assert_eq!(config.interval_secs, 1);
        assert_eq!(config.quote_currency, "USDT");
        assert_eq!(config.snapshot_path, PathBuf::from("positions.json"));
        assert_eq!(config.binance.base_url, DEFAULT_BASE_URL);
        assert!(!config.has_credentials());
        assert!(config.binance_client_config().is_none());
        config.validate().unwrap();
    }

    #[test]
    fn loads_full_config_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
debug = true
positions = ["799", "1024"]
amount_threshold_bps = 50
interval_secs = 5
quote_currency = "busd"

[binance]
api_key = "key"
secret_key = "secret"

[[binance.symbols]]
token = "stMatic"
instrument = "maticusdt"
"#
        )
        .unwrap();

        let config = AppConfig::from_file(file.path()).unwrap();
        assert!(config.debug);
        let client = config.binance_client_config().unwrap();
        assert_eq!(client.api_secret, "secret");

        let strategy = config.strategy_config();
        assert_eq!(strategy.amount_threshold_bps, 50);
        assert_eq!(strategy.interval, Duration::from_secs(5));
        assert_eq!(strategy.quote_currency, "BUSD");
        assert_eq!(strategy.token_instruments["STMATIC"], "MATICUSDT");
    }

    #[test]
    fn rejects_invalid_values() {
        let config = AppConfig {
            interval_secs: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = AppConfig {
            subgraph_url: "not a url".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.binance.symbols.push(SymbolOverride {
            token: "WETH".to_string(),
            instrument: String::new(),
        });
        assert!(config.validate().is_err());
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(AppConfig::from_file("/nonexistent/lph-hedger.toml").is_err());
    }
}
