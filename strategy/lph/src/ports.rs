//! Collaborators the strategy depends on.

use std::collections::HashMap;

use anyhow::Result;
use async_trait::async_trait;
use clients_subgraph::PositionData;

use crate::error::VenueError;
use crate::store::PositionRecord;

/// Source of raw position records.
#[async_trait]
pub trait ValuationSource: Send + Sync {
    /// Returns the records for the given IDs; unknown IDs are omitted.
    async fn fetch_positions(&self, ids: &[String]) -> Result<Vec<PositionData>>;
}

/// Derivatives venue used for hedging.
#[async_trait]
pub trait OrderVenue: Send + Sync {
    /// Order quantity precision (fractional digits) per instrument.
    async fn quantity_precisions(&self) -> Result<HashMap<String, u32>, VenueError>;

    /// Submits an order. All-or-nothing: an error means nothing was traded.
    async fn submit_order(&self, order: &OrderRequest) -> Result<OrderAck, VenueError>;
}

/// Persistence for position snapshots, keyed by position ID.
#[async_trait]
pub trait SnapshotStore: Send + Sync {
    async fn load(&self) -> Result<Vec<PositionRecord>>;

    /// Inserts or replaces the given records.
    async fn upsert(&self, records: &[PositionRecord]) -> Result<()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Buy => "BUY",
            Side::Sell => "SELL",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderType {
    Market,
    Limit,
}

impl OrderType {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderType::Market => "MARKET",
            OrderType::Limit => "LIMIT",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeInForce {
    Gtc,
    Ioc,
    Fok,
}

impl TimeInForce {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeInForce::Gtc => "GTC",
            TimeInForce::Ioc => "IOC",
            TimeInForce::Fok => "FOK",
        }
    }
}

/// An order to submit to the venue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderRequest {
    /// Venue instrument, e.g. "ETHUSDT"
    pub symbol: String,
    /// Unsigned decimal quantity already rounded to the instrument's precision
    pub quantity: String,
    pub side: Side,
    pub order_type: OrderType,
    pub time_in_force: TimeInForce,
    pub reduce_only: bool,
}

/// Venue confirmation of an accepted order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderAck {
    pub order_id: String,
    pub status: String,
}
