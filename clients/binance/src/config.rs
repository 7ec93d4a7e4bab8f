use serde::{Deserialize, Serialize};

/// Default REST endpoint for USDⓈ-M perpetual futures.
pub const DEFAULT_BASE_URL: &str = "https://fapi.binance.com";

/// Configuration for BinancePerpsClient
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BinancePerpsClientConfig {
    /// Binance API key
    pub api_key: String,
    /// Binance API secret
    pub api_secret: String,
    /// Base URL for API endpoints
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}
