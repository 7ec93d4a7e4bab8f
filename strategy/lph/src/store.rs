//! Position snapshot persistence.

use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use async_trait::async_trait;
use num_bigint::{BigInt, BigUint};
use num_traits::Zero;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::debug;
use utils::{parse_big_int, parse_big_uint};

use crate::error::ValuationError;
use crate::ports::SnapshotStore;
use crate::position::Position;
use crate::token::Token;
use crate::types::{HedgeSnapshot, TrackedPosition};

/// Persisted state of one position. Big integers are decimal strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionRecord {
    pub id: String,
    pub liquidity: String,
    pub tick_lower: i32,
    pub tick_upper: i32,
    pub symbol0: String,
    pub decimals0: u32,
    pub amount0: String,
    pub hedged_amount0: String,
    pub symbol1: String,
    pub decimals1: u32,
    pub amount1: String,
    pub hedged_amount1: String,
    /// Unix milliseconds of the last write
    pub updated_at_ms: u64,
}

impl PositionRecord {
    pub fn from_tracked(tracked: &TrackedPosition, updated_at_ms: u64) -> Self {
        let position = &tracked.position;
        Self {
            id: position.id.clone(),
            liquidity: position.liquidity.to_string(),
            tick_lower: position.tick_lower,
            tick_upper: position.tick_upper,
            symbol0: position.token0.symbol.clone(),
            decimals0: position.token0.decimals,
            amount0: position.token0.amount.to_string(),
            hedged_amount0: tracked.hedge.token0_hedged_amount.to_string(),
            symbol1: position.token1.symbol.clone(),
            decimals1: position.token1.decimals,
            amount1: position.token1.amount.to_string(),
            hedged_amount1: tracked.hedge.token1_hedged_amount.to_string(),
            updated_at_ms,
        }
    }

    /// Rebuilds the tracked state; `None` for a closed (zero liquidity) position.
    ///
    /// Max amounts are recomputed from liquidity and range.
    pub fn to_tracked(&self) -> Result<Option<TrackedPosition>, ValuationError> {
        let liquidity = self.big_uint("liquidity", &self.liquidity)?;
        if liquidity.is_zero() {
            return Ok(None);
        }
        let (max_amount0, max_amount1) =
            Position::max_amounts(&liquidity, self.tick_lower, self.tick_upper);

        let position = Position {
            id: self.id.clone(),
            liquidity,
            tick_lower: self.tick_lower,
            tick_upper: self.tick_upper,
            max_amount0,
            max_amount1,
            token0: Token::new(
                self.big_int("amount0", &self.amount0)?,
                self.symbol0.clone(),
                self.decimals("decimals0", self.decimals0)?,
            ),
            token1: Token::new(
                self.big_int("amount1", &self.amount1)?,
                self.symbol1.clone(),
                self.decimals("decimals1", self.decimals1)?,
            ),
        };
        let hedge = HedgeSnapshot {
            token0_hedged_amount: self.big_int("hedged_amount0", &self.hedged_amount0)?,
            token1_hedged_amount: self.big_int("hedged_amount1", &self.hedged_amount1)?,
        };
        Ok(Some(TrackedPosition { position, hedge }))
    }

    fn decimals(&self, field: &'static str, value: u32) -> Result<u32, ValuationError> {
        u8::try_from(value)
            .map(u32::from)
            .map_err(|_| ValuationError::invalid(&self.id, field, &value.to_string()))
    }

    fn big_int(&self, field: &'static str, value: &str) -> Result<BigInt, ValuationError> {
        parse_big_int(value).ok_or_else(|| ValuationError::invalid(&self.id, field, value))
    }

    fn big_uint(&self, field: &'static str, value: &str) -> Result<BigUint, ValuationError> {
        parse_big_uint(value).ok_or_else(|| ValuationError::invalid(&self.id, field, value))
    }
}

/// Stores all records as one JSON array, sorted by position ID.
pub struct JsonFileSnapshotStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonFileSnapshotStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_all(&self) -> Result<Vec<PositionRecord>> {
        let data = match tokio::fs::read(&self.path).await {
            Ok(data) => data,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => {
                return Err(err).with_context(|| format!("failed to read {}", self.path.display()))
            }
        };
        if data.iter().all(u8::is_ascii_whitespace) {
            return Ok(Vec::new());
        }
        serde_json::from_slice(&data)
            .with_context(|| format!("failed to decode {}", self.path.display()))
    }
}

#[async_trait]
impl SnapshotStore for JsonFileSnapshotStore {
    async fn load(&self) -> Result<Vec<PositionRecord>> {
        self.read_all().await
    }

    async fn upsert(&self, records: &[PositionRecord]) -> Result<()> {
        if records.is_empty() {
            return Ok(());
        }
        let _guard = self.write_lock.lock().await;

        let mut merged: BTreeMap<String, PositionRecord> = self
            .read_all()
            .await?
            .into_iter()
            .map(|r| (r.id.clone(), r))
            .collect();
        for record in records {
            merged.insert(record.id.clone(), record.clone());
        }
        let all: Vec<&PositionRecord> = merged.values().collect();
        let data = serde_json::to_vec_pretty(&all)?;

        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, data)
            .await
            .with_context(|| format!("failed to write {}", tmp.display()))?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .with_context(|| format!("failed to replace {}", self.path.display()))?;

        debug!(path = %self.path.display(), count = records.len(), "saved position snapshots");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, liquidity: &str, hedged0: &str) -> PositionRecord {
        PositionRecord {
            id: id.to_string(),
            liquidity: liquidity.to_string(),
            tick_lower: -16600,
            tick_upper: -14600,
            symbol0: "WMATIC".to_string(),
            decimals0: 18,
            amount0: "431795842829084192009".to_string(),
            hedged_amount0: hedged0.to_string(),
            symbol1: "USDC".to_string(),
            decimals1: 6,
            amount1: "111468606".to_string(),
            hedged_amount1: "0".to_string(),
            updated_at_ms: 1_700_000_000_000,
        }
    }

    #[test]
    fn restores_tracked_position() {
        let tracked = record("799", "4521273292232113180183", "-431000000000000000000")
            .to_tracked()
            .unwrap()
            .unwrap();
        assert_eq!(tracked.position.id, "799");
        assert_eq!(tracked.position.token0.symbol, "WMATIC");
        assert_eq!(
            tracked.hedge.token0_hedged_amount,
            "-431000000000000000000".parse::<BigInt>().unwrap()
        );
        let (max0, max1) = Position::max_amounts(&tracked.position.liquidity, -16600, -14600);
        assert_eq!(tracked.position.max_amount0, max0);
        assert_eq!(tracked.position.max_amount1, max1);

        let back = PositionRecord::from_tracked(&tracked, 1_700_000_000_000);
        assert_eq!(back, record("799", "4521273292232113180183", "-431000000000000000000"));
    }

    #[test]
    fn closed_positions_are_not_restored() {
        assert!(record("1", "0", "0").to_tracked().unwrap().is_none());
    }

    #[test]
    fn rejects_malformed_amounts() {
        let err = record("1", "1000", "12.5").to_tracked().unwrap_err();
        assert_eq!(err, ValuationError::invalid("1", "hedged_amount0", "12.5"));

        let mut huge_decimals = record("1", "1000", "0");
        huge_decimals.decimals1 = 2_000_000_000;
        let err = huge_decimals.to_tracked().unwrap_err();
        assert_eq!(err, ValuationError::invalid("1", "decimals1", "2000000000"));
    }

    #[tokio::test]
    async fn missing_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileSnapshotStore::new(dir.path().join("positions.json"));
        assert!(store.load().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn upsert_merges_by_id() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileSnapshotStore::new(dir.path().join("positions.json"));

        store
            .upsert(&[record("2", "1000", "0"), record("1", "1000", "0")])
            .await
            .unwrap();
        store.upsert(&[record("2", "2000", "5")]).await.unwrap();

        let loaded = store.load().await.unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[0].id, "1");
        assert_eq!(loaded[1], record("2", "2000", "5"));
        assert!(!store.path().with_extension("json.tmp").exists());
    }

    #[tokio::test]
    async fn corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("positions.json");
        std::fs::write(&path, "{not json").unwrap();
        let store = JsonFileSnapshotStore::new(path);
        assert!(store.load().await.is_err());
    }
}
