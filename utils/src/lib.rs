//! Shared fixed-point utilities.
//!
//! Everything here is exact integer arithmetic on arbitrary-precision
//! integers; no floating point is involved anywhere.

pub mod amount;
pub mod liquidity;
pub mod tick_math;

pub use amount::{
    format_amount, parse_big_int, parse_big_uint, pow10, round_amount, shift_left, shift_right,
    RoundType,
};
pub use liquidity::{amount0_delta, amount1_delta, extract_liquidity, PriceRange};
pub use tick_math::{sqrt_price_at_tick, MAX_TICK, MIN_TICK};
