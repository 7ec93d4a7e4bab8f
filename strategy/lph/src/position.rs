//! Position valuation from raw subgraph records.

use std::fmt;

use clients_subgraph::PositionData;
use num_bigint::{BigInt, BigUint};
use utils::{amount0_delta, amount1_delta, extract_liquidity, parse_big_uint, sqrt_price_at_tick};

use crate::error::ValuationError;
use crate::token::Token;

/// A valued liquidity position.
///
/// Two positions are equal when both tokens are equal (amount, symbol and
/// decimals); liquidity and range do not take part.
#[derive(Debug, Clone)]
pub struct Position {
    /// Position ID
    pub id: String,
    /// Position liquidity
    pub liquidity: BigUint,
    /// Lower tick boundary
    pub tick_lower: i32,
    /// Upper tick boundary
    pub tick_upper: i32,
    /// Token0 held once price reaches the lower boundary
    pub max_amount0: BigInt,
    /// Token1 held once price reaches the upper boundary
    pub max_amount1: BigInt,
    /// Token0 held at the current price
    pub token0: Token,
    /// Token1 held at the current price
    pub token1: Token,
}

impl Position {
    /// Amounts held with one side fully depleted. Independent of the current price.
    pub fn max_amounts(liquidity: &BigUint, tick_lower: i32, tick_upper: i32) -> (BigInt, BigInt) {
        let sqrt_lower = sqrt_price_at_tick(tick_lower);
        let sqrt_upper = sqrt_price_at_tick(tick_upper);
        (
            BigInt::from(amount0_delta(&sqrt_lower, &sqrt_upper, liquidity)),
            BigInt::from(amount1_delta(&sqrt_lower, &sqrt_upper, liquidity)),
        )
    }

    fn same_range(&self, liquidity: &BigUint, tick_lower: i32, tick_upper: i32) -> bool {
        self.liquidity == *liquidity && self.tick_lower == tick_lower && self.tick_upper == tick_upper
    }
}

impl PartialEq for Position {
    fn eq(&self, other: &Self) -> bool {
        self.token0 == other.token0 && self.token1 == other.token1
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "PositionID={} Liquidity=({}, {})",
            self.id, self.token0, self.token1
        )
    }
}

/// Values a raw record at its pool's current price.
///
/// Max amounts are taken from `previous` when its liquidity and range match,
/// and recomputed otherwise.
pub fn value_position(
    raw: &PositionData,
    previous: Option<&Position>,
) -> Result<Position, ValuationError> {
    let id = raw.id.as_str();
    let current_tick = parse_i32(id, "tick", &raw.pool.tick)?;
    let tick_lower = parse_i32(id, "tick_lower", &raw.tick_lower.tick_idx)?;
    let tick_upper = parse_i32(id, "tick_upper", &raw.tick_upper.tick_idx)?;
    let sqrt_price = parse_big_uint(&raw.pool.sqrt_price)
        .ok_or_else(|| ValuationError::invalid(id, "sqrt_price", &raw.pool.sqrt_price))?;
    let liquidity = parse_big_uint(&raw.liquidity)
        .ok_or_else(|| ValuationError::invalid(id, "liquidity", &raw.liquidity))?;
    let decimals0 = parse_decimals(id, "token0_decimals", &raw.pool.token0.decimals)?;
    let decimals1 = parse_decimals(id, "token1_decimals", &raw.pool.token1.decimals)?;

    let (max_amount0, max_amount1) = match previous {
        Some(prev) if prev.same_range(&liquidity, tick_lower, tick_upper) => {
            (prev.max_amount0.clone(), prev.max_amount1.clone())
        }
        _ => Position::max_amounts(&liquidity, tick_lower, tick_upper),
    };

    let (amount0, amount1) =
        extract_liquidity(current_tick, tick_lower, tick_upper, &sqrt_price, &liquidity);

    Ok(Position {
        id: raw.id.clone(),
        liquidity,
        tick_lower,
        tick_upper,
        max_amount0,
        max_amount1,
        token0: Token::new(BigInt::from(amount0), raw.pool.token0.symbol.clone(), decimals0),
        token1: Token::new(BigInt::from(amount1), raw.pool.token1.symbol.clone(), decimals1),
    })
}

fn parse_i32(id: &str, field: &'static str, value: &str) -> Result<i32, ValuationError> {
    value
        .trim()
        .parse()
        .map_err(|_| ValuationError::invalid(id, field, value))
}

/// Token decimals are a `uint8` on chain.
fn parse_decimals(id: &str, field: &'static str, value: &str) -> Result<u32, ValuationError> {
    value
        .trim()
        .parse::<u8>()
        .map(u32::from)
        .map_err(|_| ValuationError::invalid(id, field, value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clients_subgraph::{PoolData, TickData, TokenData};
    use num_traits::Zero;

    const LIQUIDITY: &str = "4521273292232113180183";

    fn raw(tick: i32) -> PositionData {
        PositionData {
            id: "799".to_string(),
            liquidity: LIQUIDITY.to_string(),
            pool: PoolData {
                sqrt_price: sqrt_price_at_tick(tick).to_string(),
                tick: tick.to_string(),
                token0: TokenData {
                    symbol: "WMATIC".to_string(),
                    decimals: "18".to_string(),
                },
                token1: TokenData {
                    symbol: "USDC".to_string(),
                    decimals: "6".to_string(),
                },
            },
            tick_lower: TickData {
                tick_idx: "-16600".to_string(),
            },
            tick_upper: TickData {
                tick_idx: "-14600".to_string(),
            },
        }
    }

    fn big(value: &str) -> BigInt {
        value.parse().unwrap()
    }

    #[test]
    fn values_in_range_position() {
        let position = value_position(&raw(-15500), None).unwrap();
        assert_eq!(position.token0.amount, big("431795842829084192009"));
        assert_eq!(position.token1.amount, big("111468606089896287952"));
        assert_eq!(position.token0.decimals, 18);
        assert_eq!(position.token1.symbol, "USDC");
        assert!(position.token0.amount < position.max_amount0);
        assert!(position.token1.amount < position.max_amount1);
    }

    #[test]
    fn out_of_range_position_holds_max_amount() {
        let below = value_position(&raw(-17000), None).unwrap();
        assert_eq!(below.token0.amount, below.max_amount0);
        assert!(below.token1.amount.is_zero());

        let above = value_position(&raw(-14000), None).unwrap();
        assert!(above.token0.amount.is_zero());
        assert_eq!(above.token1.amount, above.max_amount1);
    }

    #[test]
    fn reuses_max_amounts_for_unchanged_range() {
        let mut previous = value_position(&raw(-15500), None).unwrap();
        previous.max_amount0 = BigInt::from(42);
        let position = value_position(&raw(-15400), Some(&previous)).unwrap();
        assert_eq!(position.max_amount0, BigInt::from(42));

        let mut changed = raw(-15400);
        changed.liquidity = "1000".to_string();
        let position = value_position(&changed, Some(&previous)).unwrap();
        assert_ne!(position.max_amount0, BigInt::from(42));
    }

    #[test]
    fn rejects_unparseable_fields() {
        let mut bad_tick = raw(-15500);
        bad_tick.pool.tick = "-15500.5".to_string();
        assert_eq!(
            value_position(&bad_tick, None).unwrap_err(),
            ValuationError::invalid("799", "tick", "-15500.5")
        );

        let mut bad_liquidity = raw(-15500);
        bad_liquidity.liquidity = "4.5e21".to_string();
        assert!(value_position(&bad_liquidity, None).is_err());

        let mut bad_decimals = raw(-15500);
        bad_decimals.pool.token1.decimals = "-6".to_string();
        assert!(value_position(&bad_decimals, None).is_err());

        let mut huge_decimals = raw(-15500);
        huge_decimals.pool.token0.decimals = "2000000000".to_string();
        assert_eq!(
            value_position(&huge_decimals, None).unwrap_err(),
            ValuationError::invalid("799", "token0_decimals", "2000000000")
        );

        let mut max_decimals = raw(-15500);
        max_decimals.pool.token1.decimals = "255".to_string();
        assert_eq!(value_position(&max_decimals, None).unwrap().token1.decimals, 255);
    }

    #[test]
    fn equality_ignores_range_and_liquidity() {
        let a = value_position(&raw(-15500), None).unwrap();
        let mut b = a.clone();
        b.tick_lower = -20000;
        b.liquidity = BigUint::from(1u32);
        assert_eq!(a, b);
        b.token1.amount += BigInt::from(1);
        assert_ne!(a, b);
    }

    #[test]
    fn displays_position_summary() {
        let position = value_position(&raw(-15500), None).unwrap();
        assert_eq!(
            position.to_string(),
            "PositionID=799 Liquidity=(431.79584-WMATIC, 111468606089896.28795-USDC)"
        );
    }
}
