//! LP Hedging engine
//!
//! Keeps the last valuation and hedge snapshot of every tracked position and
//! trades perpetual futures whenever the token0 exposure drifts past the
//! configured threshold or the position leaves its range.

use std::collections::HashMap;
use std::future::Future;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use anyhow::Result;
use num_bigint::BigInt;
use num_traits::{Signed, Zero};
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info, warn};
use utils::{format_amount, RoundType};

use crate::config::{LPHStrategyConfig, BPS};
use crate::error::{HedgeError, VenueError};
use crate::ports::{
    OrderRequest, OrderType, OrderVenue, Side, SnapshotStore, TimeInForce, ValuationSource,
};
use crate::position::{value_position, Position};
use crate::store::PositionRecord;
use crate::token::Token;
use crate::types::{HedgeOutcome, HedgeSnapshot, TrackedPosition};

/// LP Hedging strategy
///
/// Owns the per-position state exclusively; collaborators are injected:
/// - `source` supplies raw position records
/// - `venue` places hedge orders (`None` runs in monitor-only mode)
/// - `store` persists snapshots across restarts
pub struct LPHStrategy<S, V, P> {
    source: S,
    venue: Option<V>,
    store: P,
    position_ids: Vec<String>,
    amount_threshold_bps: u32,
    token_instruments: HashMap<String, String>,
    quote_currency: String,
    interval: Duration,
    /// Quantity precision per venue symbol, loaded by `init`
    quantity_precisions: HashMap<String, u32>,
    positions: HashMap<String, TrackedPosition>,
}

impl<S, V, P> LPHStrategy<S, V, P>
where
    S: ValuationSource,
    V: OrderVenue,
    P: SnapshotStore,
{
    /// Creates a new `LPHStrategy` instance
    ///
    /// # Arguments
    /// * `config` - Strategy parameters (positions, threshold, instrument overrides, interval)
    /// * `source` - Source of raw position records
    /// * `venue` - Order venue; `None` runs in monitor-only mode
    /// * `store` - Snapshot store used by `init` and after every refresh
    ///
    /// # Returns
    /// A strategy with no tracked positions; call `init` (or `run`) before refreshing.
    pub fn new(config: LPHStrategyConfig, source: S, venue: Option<V>, store: P) -> Self {
        Self {
            source,
            venue,
            store,
            position_ids: config.position_ids,
            amount_threshold_bps: config.amount_threshold_bps,
            token_instruments: config
                .token_instruments
                .into_iter()
                .map(|(token, instrument)| (token.to_uppercase(), instrument.to_uppercase()))
                .collect(),
            quote_currency: config.quote_currency.to_uppercase(),
            interval: config.interval,
            quantity_precisions: HashMap::new(),
            positions: HashMap::new(),
        }
    }

    /// Whether orders are placed at all.
    pub fn is_hedging(&self) -> bool {
        self.venue.is_some()
    }

    pub fn positions(&self) -> &HashMap<String, TrackedPosition> {
        &self.positions
    }

    /// Loads venue precisions and restores persisted positions.
    pub async fn init(&mut self) -> Result<()> {
        if let Some(venue) = &self.venue {
            self.quantity_precisions = venue.quantity_precisions().await?;
            debug!(symbols = self.quantity_precisions.len(), "loaded quantity precisions");
        }
        self.load_positions().await
    }

    async fn load_positions(&mut self) -> Result<()> {
        let records = self.store.load().await?;
        for record in records {
            match record.to_tracked() {
                Ok(Some(tracked)) => {
                    info!(position = %tracked.position, "restored position");
                    self.positions.insert(record.id.clone(), tracked);
                }
                Ok(None) => debug!(position_id = %record.id, "skipping closed position"),
                Err(err) => warn!(position_id = %record.id, error = %err, "skipping unreadable position"),
            }
        }
        Ok(())
    }

    /// Runs `init` and then refreshes on every interval tick until `shutdown` resolves.
    pub async fn run<F>(&mut self, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()>,
    {
        self.init().await?;
        info!(
            positions = ?self.position_ids,
            hedging = self.is_hedging(),
            interval_ms = self.interval.as_millis() as u64,
            "starting LP hedging"
        );

        let mut ticker = tokio::time::interval(self.interval.max(Duration::from_millis(1)));
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    info!("shutting down LP hedging");
                    return Ok(());
                }
                _ = ticker.tick() => {
                    if let Err(err) = self.refresh().await {
                        error!(error = %err, "refresh failed");
                    }
                }
            }
        }
    }

    /// One refresh cycle: fetch, value and update every position, then persist.
    pub async fn refresh(&mut self) -> Result<()> {
        let records = self
            .source
            .fetch_positions(&self.position_ids)
            .await
            .inspect_err(|err| {
                error!(positions = ?self.position_ids, error = %err, "failed to fetch positions")
            })?;

        for raw in &records {
            let previous = self.positions.get(&raw.id).map(|t| &t.position);
            match value_position(raw, previous) {
                Ok(position) => {
                    let outcome = self.update_position(position).await;
                    debug!(position_id = %raw.id, outcome = ?outcome, "position updated");
                }
                Err(err) => warn!(position_id = %raw.id, error = %err, "failed to value position"),
            }
        }

        if let Err(err) = self.save_positions().await {
            warn!(error = %err, "failed to save positions");
        }
        Ok(())
    }

    /// Records a fresh valuation and hedges when needed.
    ///
    /// # Arguments
    /// * `position` - The position valued at the current pool price
    ///
    /// # Returns
    /// A `HedgeOutcome` describing whether the position was new, unchanged,
    /// within the threshold or rehedged. Hedge failures are logged and count as
    /// zero traded.
    pub async fn update_position(&mut self, position: Position) -> HedgeOutcome {
        let previous = match self.positions.get(&position.id) {
            Some(tracked) if tracked.position == position => return HedgeOutcome::Unchanged,
            Some(tracked) => tracked.clone(),
            None => return self.track_new(position).await,
        };

        info!(position = %position, "position changed");
        let id = position.id.clone();
        let tracked = TrackedPosition {
            position,
            hedge: previous.hedge.clone(),
        };
        if !self.is_hedging() {
            self.positions.insert(id, tracked);
            return HedgeOutcome::Tracked;
        }

        let position = &tracked.position;
        let threshold = &previous.position.max_amount0 * BigInt::from(self.amount_threshold_bps)
            / BigInt::from(BPS);
        let delta0 = position
            .token0
            .with_amount(&position.token0.amount - &previous.hedge.token0_hedged_amount);
        let in_range = position.token0.amount.is_positive()
            && position.token0.amount < position.max_amount0;
        if delta0.amount.abs() <= threshold && in_range {
            info!(
                delta = %delta0,
                threshold = %format_amount(&threshold, delta0.decimals, 5),
                "ignoring small change of amount"
            );
            self.positions.insert(id, tracked);
            return HedgeOutcome::BelowThreshold;
        }

        let delta1 = position
            .token1
            .with_amount(&position.token1.amount - &previous.hedge.token1_hedged_amount);
        let traded0 = self.hedge_or_log(&delta0).await;
        let traded1 = self.hedge_or_log(&delta1).await;
        let hedge = HedgeSnapshot {
            token0_hedged_amount: &previous.hedge.token0_hedged_amount + traded0,
            token1_hedged_amount: &previous.hedge.token1_hedged_amount + traded1,
        };

        info!(
            position_id = %id,
            hedged0 = %format_amount(&hedge.token0_hedged_amount, position.token0.decimals, 5),
            hedged1 = %format_amount(&hedge.token1_hedged_amount, position.token1.decimals, 5),
            "updated hedged amounts"
        );
        self.positions.insert(
            id,
            TrackedPosition {
                position: tracked.position,
                hedge: hedge.clone(),
            },
        );
        HedgeOutcome::Rehedged(hedge)
    }

    async fn track_new(&mut self, position: Position) -> HedgeOutcome {
        info!(position = %position, "tracking new position");
        let mut hedge = HedgeSnapshot::default();
        if self.is_hedging() && self.amount_threshold_bps < BPS {
            hedge.token0_hedged_amount = self.hedge_or_log(&position.token0).await;
            hedge.token1_hedged_amount = self.hedge_or_log(&position.token1).await;
        }
        self.positions.insert(
            position.id.clone(),
            TrackedPosition {
                position,
                hedge: hedge.clone(),
            },
        );
        HedgeOutcome::FirstSeen(hedge)
    }

    /// Hedges `token`, treating every failure as zero traded.
    async fn hedge_or_log(&self, token: &Token) -> BigInt {
        match self.hedge_token(token).await {
            Ok(traded) => traded,
            Err(err) => {
                warn!(token = %token, error = %err, "failed to hedge token");
                BigInt::zero()
            }
        }
    }

    /// Trades the exposure of `token` and returns the signed amount hedged.
    ///
    /// Stable tokens count as hedged as-is. Positive amounts are sold;
    /// negative amounts are bought back reduce-only.
    ///
    /// # Arguments
    /// * `token` - Signed exposure to hedge, usually a delta against the last snapshot
    ///
    /// # Returns
    /// The signed amount actually traded, rounded down to the instrument's quantity
    /// precision; zero when nothing was traded. Err on an unknown instrument or a
    /// venue rejection.
    pub async fn hedge_token(&self, token: &Token) -> Result<BigInt, HedgeError> {
        if token.is_stable() {
            return Ok(token.amount.clone());
        }
        let Some(venue) = &self.venue else {
            return Ok(BigInt::zero());
        };
        if token.amount.is_zero() {
            return Ok(BigInt::zero());
        }

        let symbol = token.perpetual_symbol(&self.token_instruments, &self.quote_currency);
        // A precision finer than the token's decimals rounds nothing.
        let precision = self
            .quantity_precisions
            .get(&symbol)
            .copied()
            .ok_or_else(|| HedgeError::UnknownSymbol(symbol.clone()))?
            .min(token.decimals);

        let (side, reduce_only) = if token.amount.is_negative() {
            (Side::Buy, true)
        } else {
            (Side::Sell, false)
        };
        let amount = token
            .with_amount(token.amount.abs())
            .round_amount(precision as i32, RoundType::Floor);
        if amount.is_zero() {
            debug!(token = %token, precision, "amount rounds to zero, skipping hedge");
            return Ok(BigInt::zero());
        }

        let order = OrderRequest {
            symbol,
            quantity: order_quantity(&amount, token.decimals, precision),
            side,
            order_type: OrderType::Market,
            time_in_force: TimeInForce::Gtc,
            reduce_only,
        };
        info!(
            token = %token,
            symbol = %order.symbol,
            side = order.side.as_str(),
            quantity = %order.quantity,
            "hedging token"
        );

        match venue.submit_order(&order).await {
            Ok(ack) => {
                info!(order_id = %ack.order_id, status = %ack.status, "hedge order placed");
                Ok(match side {
                    Side::Sell => amount,
                    Side::Buy => -amount,
                })
            }
            Err(VenueError::QuantityTooSmall(msg)) => {
                debug!(symbol = %order.symbol, msg = %msg, "quantity too small, nothing hedged");
                Ok(BigInt::zero())
            }
            Err(err) => Err(err.into()),
        }
    }

    async fn save_positions(&self) -> Result<()> {
        let now_ms = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or_default();
        let mut records: Vec<PositionRecord> = self
            .positions
            .values()
            .map(|tracked| PositionRecord::from_tracked(tracked, now_ms))
            .collect();
        records.sort_by(|a, b| a.id.cmp(&b.id));
        self.store.upsert(&records).await
    }
}

/// Order quantity string; precision 0 sends the integer part only.
fn order_quantity(amount: &BigInt, decimals: u32, precision: u32) -> String {
    let formatted = format_amount(amount, decimals, precision as i32);
    if precision == 0 {
        if let Some((integer, _)) = formatted.split_once('.') {
            return integer.to_string();
        }
    }
    formatted
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_quantity_matches_precision() {
        let amount = BigInt::from(6_000);
        assert_eq!(order_quantity(&amount, 6, 3), "0.006");
        assert_eq!(order_quantity(&amount, 6, 6), "0.006000");

        let matic: BigInt = "431000000000000000000".parse().unwrap();
        assert_eq!(order_quantity(&matic, 18, 0), "431");
    }
}
