//! Raw position records as returned by the subgraph.
//!
//! Every numeric field is a decimal string; callers parse them exactly.

use serde::{Deserialize, Serialize};

/// Token metadata of one side of a pool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenData {
    pub symbol: String,
    /// Token decimals as a decimal string
    pub decimals: String,
}

/// Pool state at query time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PoolData {
    /// Current Q64.96 square-root price
    pub sqrt_price: String,
    /// Current tick
    pub tick: String,
    pub token0: TokenData,
    pub token1: TokenData,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TickData {
    pub tick_idx: String,
}

/// A liquidity position with its pool and range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionData {
    /// Position ID
    pub id: String,
    /// Position liquidity
    pub liquidity: String,
    pub pool: PoolData,
    pub tick_lower: TickData,
    pub tick_upper: TickData,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GraphQLResponse<T> {
    pub data: Option<T>,
    #[serde(default)]
    pub errors: Vec<GraphQLError>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GraphQLError {
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PositionsData {
    pub positions: Vec<PositionData>,
}
