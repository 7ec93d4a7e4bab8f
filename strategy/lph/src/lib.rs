//! LP Hedging strategy crate.
//!
//! Values concentrated-liquidity positions from subgraph data and keeps
//! their out-of-range exposure delta-hedged with perpetual futures.

mod adapters;
pub mod config;
mod error;
mod lph;
pub mod ports;
mod position;
mod store;
mod token;
mod types;

pub use config::LPHStrategyConfig;
pub use error::{HedgeError, ValuationError, VenueError};
pub use lph::LPHStrategy;
pub use ports::{
    OrderAck, OrderRequest, OrderType, OrderVenue, Side, SnapshotStore, TimeInForce,
    ValuationSource,
};
pub use position::{value_position, Position};
pub use store::{JsonFileSnapshotStore, PositionRecord};
pub use token::Token;
pub use types::{HedgeOutcome, HedgeSnapshot, TrackedPosition};
