//! Shared types for LP Hedging strategy.

use num_bigint::BigInt;

use crate::position::Position;

/// Cumulative signed amount of each token already hedged for a position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HedgeSnapshot {
    /// Token0 hedged so far (positive = sold, negative = bought back)
    pub token0_hedged_amount: BigInt,
    /// Token1 hedged so far
    pub token1_hedged_amount: BigInt,
}

/// Last valuation of a position together with its hedge snapshot.
#[derive(Debug, Clone)]
pub struct TrackedPosition {
    pub position: Position,
    pub hedge: HedgeSnapshot,
}

/// What a single position update did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HedgeOutcome {
    /// Token composition unchanged since the last update.
    Unchanged,
    /// First observation; carries the initial hedge snapshot.
    FirstSeen(HedgeSnapshot),
    /// Valuation recorded without hedging (no order venue).
    Tracked,
    /// Token0 delta within the rehedge threshold while in range.
    BelowThreshold,
    /// Both tokens hedged; carries the advanced snapshot.
    Rehedged(HedgeSnapshot),
}
