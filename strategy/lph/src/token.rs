//! Token amounts with their symbol and decimals.

use std::collections::HashMap;
use std::fmt;

use num_bigint::BigInt;
use utils::{format_amount, round_amount, RoundType};

/// Wrapped or bridged tickers and the asset they track.
const SYMBOL_ALIASES: &[(&str, &str)] = &[
    ("STMATIC", "MATIC"),
    ("WMATIC", "MATIC"),
    ("WBTC", "BTC"),
    ("WETH", "ETH"),
    ("WBNB", "BNB"),
];

/// Assets treated as already hedged 1:1 against the quote currency.
const STABLE_SYMBOLS: &[&str] = &["USDT", "USDC", "DAI", "BUSD", "MUSD", "USDK", "MIMATIC"];

/// A raw token amount scaled by `10^decimals`. Negative amounts are owed/short.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub amount: BigInt,
    pub symbol: String,
    pub decimals: u32,
}

impl Token {
    pub fn new(amount: BigInt, symbol: impl Into<String>, decimals: u32) -> Self {
        Self {
            amount,
            symbol: symbol.into(),
            decimals,
        }
    }

    /// Same token with a different amount.
    pub fn with_amount(&self, amount: BigInt) -> Self {
        Self {
            amount,
            symbol: self.symbol.clone(),
            decimals: self.decimals,
        }
    }

    /// Upper-cased ticker with wrapped variants collapsed, e.g. `wbtc` -> `BTC`.
    pub fn normalized_symbol(&self) -> String {
        let symbol = self.symbol.to_uppercase();
        SYMBOL_ALIASES
            .iter()
            .find(|(alias, _)| *alias == symbol)
            .map(|(_, canonical)| canonical.to_string())
            .unwrap_or(symbol)
    }

    pub fn is_stable(&self) -> bool {
        STABLE_SYMBOLS.contains(&self.normalized_symbol().as_str())
    }

    /// Perpetual instrument used to hedge this token.
    ///
    /// An override keyed by the upper-cased symbol wins, then one keyed by
    /// the normalized symbol; otherwise the normalized symbol plus `quote`.
    pub fn perpetual_symbol(&self, overrides: &HashMap<String, String>, quote: &str) -> String {
        let normalized = self.normalized_symbol();
        overrides
            .get(&self.symbol.to_uppercase())
            .or_else(|| overrides.get(&normalized))
            .cloned()
            .unwrap_or_else(|| format!("{}{}", normalized, quote))
    }

    pub fn round_amount(&self, precision: i32, round: RoundType) -> BigInt {
        round_amount(&self.amount, self.decimals, precision, round)
    }

    pub fn format_amount(&self, precision: i32) -> String {
        format_amount(&self.amount, self.decimals, precision)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.format_amount(5), self.symbol)
    }
}
