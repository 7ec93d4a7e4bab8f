//! Configuration types for LPH Strategy.

use std::collections::HashMap;
use std::time::Duration;

/// Threshold value at which the initial hedge of a new position is skipped.
pub const BPS: u32 = 10_000;

/// Configuration for LPHStrategy (parameters only; collaborators are passed to `LPHStrategy::new`).
#[derive(Debug, Clone)]
pub struct LPHStrategyConfig {
    /// IDs of the positions to track
    pub position_ids: Vec<String>,
    /// Rehedge threshold in basis points of `max_amount0`; `>= 10000` skips the initial hedge
    pub amount_threshold_bps: u32,
    /// Upper-cased token symbol to perpetual instrument overrides (e.g. "STMATIC" -> "MATICUSDT")
    pub token_instruments: HashMap<String, String>,
    /// Quote currency appended to normalized symbols (e.g. "USDT")
    pub quote_currency: String,
    /// Refresh period
    pub interval: Duration,
}

impl Default for LPHStrategyConfig {
    fn default() -> Self {
        Self {
            position_ids: Vec::new(),
            amount_threshold_bps: 10,
            token_instruments: HashMap::new(),
            quote_currency: "USDT".to_string(),
            interval: Duration::from_secs(1),
        }
    }
}
