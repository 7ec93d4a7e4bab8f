//! Rounding and formatting of token amounts scaled by `10^decimals`.
//!
//! Division here is floor division (`div_floor`/`mod_floor`), so rounding a
//! negative amount with [`RoundType::Floor`] moves it away from zero. Order
//! sizes are derived from these helpers, so their results must stay exact.

use num_bigint::{BigInt, BigUint};
use num_integer::Integer;
use num_traits::{One, Signed, Zero};
use std::str::FromStr;

/// Rounding direction used by [`round_amount`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundType {
    /// Drop the remainder (floor division).
    Floor,
    /// Add one rounding unit whenever the remainder is non-zero.
    Ceiling,
}

/// Returns `10^exp`.
pub fn pow10(exp: u32) -> BigInt {
    BigInt::from(10u32).pow(exp)
}

/// Multiplies `value` by `2^bits`.
pub fn shift_left(value: &BigInt, bits: usize) -> BigInt {
    value << bits
}

/// Divides `value` by `2^bits`, rounding toward negative infinity.
pub fn shift_right(value: &BigInt, bits: usize) -> BigInt {
    value.div_floor(&(BigInt::one() << bits))
}

/// Rounds an amount with `decimals` fractional digits to `precision`
/// fractional digits, keeping the result expressed in `decimals`.
///
/// `round_amount(123456, 5, 1, Ceiling) == 130000` and
/// `round_amount(-123456, 5, 0, Floor) == -200000`. A precision at or above
/// `decimals` leaves the amount untouched; a negative precision rounds to
/// tens, hundreds, ... of whole units.
pub fn round_amount(amount: &BigInt, decimals: u32, precision: i32, round: RoundType) -> BigInt {
    let digits = i64::from(decimals) - i64::from(precision);
    if digits <= 0 {
        return amount.clone();
    }

    let factor = pow10(digits as u32);
    let (mut rounded, remainder) = amount.div_mod_floor(&factor);
    if round == RoundType::Ceiling && !remainder.is_zero() {
        rounded += BigInt::one();
    }
    rounded * factor
}

/// Renders an amount with `decimals` fractional digits as a decimal string
/// with exactly `precision` fractional digits.
///
/// `precision` is clamped to `decimals`. A negative precision rounds with
/// [`RoundType::Floor`] first and renders no significant fractional digits.
/// The fractional part is always printed, so precision zero yields `"1.0"`.
pub fn format_amount(amount: &BigInt, decimals: u32, precision: i32) -> String {
    let (amount, precision) = if precision < 0 {
        (round_amount(amount, decimals, precision, RoundType::Floor), 0)
    } else {
        (amount.clone(), (precision as u32).min(decimals))
    };

    let factor = pow10(decimals);
    let unit = pow10(decimals - precision);
    let (integer, remainder) = amount.abs().div_rem(&factor);
    let fraction = remainder / unit;
    let sign = if amount.is_negative() { "-" } else { "" };

    format!(
        "{}{}.{:0>width$}",
        sign,
        integer,
        fraction.to_string(),
        width = precision as usize
    )
}

/// Parses a base-10 signed integer string exactly.
pub fn parse_big_int(value: &str) -> Option<BigInt> {
    BigInt::from_str(value.trim()).ok()
}

/// Parses a base-10 unsigned integer string exactly.
pub fn parse_big_uint(value: &str) -> Option<BigUint> {
    BigUint::from_str(value.trim()).ok()
}
