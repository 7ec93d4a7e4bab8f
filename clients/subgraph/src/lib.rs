//! Client for the concentrated-liquidity subgraph GraphQL API.

mod client;
mod types;

pub use client::{SubgraphClient, DEFAULT_SUBGRAPH_URL};
pub use types::{PoolData, PositionData, TickData, TokenData};
