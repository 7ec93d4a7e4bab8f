//! Token amounts implied by a liquidity position over a price range.

use num_bigint::BigUint;
use num_traits::Zero;

use crate::tick_math::sqrt_price_at_tick;

/// Where the current price sits relative to a position's tick range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriceRange {
    /// `current_tick < tick_lower`: the position holds only token0.
    Below,
    /// `tick_lower <= current_tick <= tick_upper`: both tokens are held.
    InRange,
    /// `current_tick > tick_upper`: the position holds only token1.
    Above,
}

impl PriceRange {
    pub fn classify(current_tick: i32, tick_lower: i32, tick_upper: i32) -> Self {
        if current_tick < tick_lower {
            PriceRange::Below
        } else if current_tick > tick_upper {
            PriceRange::Above
        } else {
            PriceRange::InRange
        }
    }
}

/// `floor((L << 96) * |b - a| / (a * b))`. Argument order does not matter.
pub fn amount0_delta(sqrt_price_a: &BigUint, sqrt_price_b: &BigUint, liquidity: &BigUint) -> BigUint {
    let denominator = sqrt_price_a * sqrt_price_b;
    if denominator.is_zero() {
        return BigUint::zero();
    }
    let numerator1: BigUint = liquidity << 96usize;
    let numerator2 = abs_diff(sqrt_price_a, sqrt_price_b);
    numerator1 * numerator2 / denominator
}

/// `floor(L * |b - a| >> 96)`. Argument order does not matter.
pub fn amount1_delta(sqrt_price_a: &BigUint, sqrt_price_b: &BigUint, liquidity: &BigUint) -> BigUint {
    (liquidity * abs_diff(sqrt_price_a, sqrt_price_b)) >> 96usize
}

fn abs_diff(a: &BigUint, b: &BigUint) -> BigUint {
    if a >= b {
        a - b
    } else {
        b - a
    }
}

/// Splits `liquidity` into `(amount0, amount1)` at the current price.
///
/// Out of range below, everything is token0 valued across the whole range;
/// out of range above, everything is token1. In range, token0 covers the
/// current price up to the upper bound and token1 the lower bound up to the
/// current price.
pub fn extract_liquidity(
    current_tick: i32,
    tick_lower: i32,
    tick_upper: i32,
    sqrt_price: &BigUint,
    liquidity: &BigUint,
) -> (BigUint, BigUint) {
    let sqrt_lower = sqrt_price_at_tick(tick_lower);
    let sqrt_upper = sqrt_price_at_tick(tick_upper);

    match PriceRange::classify(current_tick, tick_lower, tick_upper) {
        PriceRange::Below => (
            amount0_delta(&sqrt_lower, &sqrt_upper, liquidity),
            BigUint::zero(),
        ),
        PriceRange::Above => (
            BigUint::zero(),
            amount1_delta(&sqrt_lower, &sqrt_upper, liquidity),
        ),
        PriceRange::InRange => (
            amount0_delta(sqrt_price, &sqrt_upper, liquidity),
            amount1_delta(&sqrt_lower, sqrt_price, liquidity),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::str::FromStr;

    fn dec(value: &str) -> BigUint {
        BigUint::from_str(value).unwrap()
    }

    fn ten_pow_14() -> BigUint {
        BigUint::from(100_000_000_000_000u64)
    }

    #[test]
    fn amount0_reference_values() {
        assert_eq!(
            amount0_delta(&sqrt_price_at_tick(-276310), &sqrt_price_at_tick(-276300), &ten_pow_14()),
            dec("49949961958869841")
        );
        assert_eq!(
            amount0_delta(
                &sqrt_price_at_tick(-15500),
                &sqrt_price_at_tick(-14600),
                &dec("4521273292232113180183")
            ),
            dec("431795842829084192009")
        );
    }

    #[test]
    fn amount1_reference_values() {
        assert_eq!(
            amount1_delta(&sqrt_price_at_tick(-276310), &sqrt_price_at_tick(-276300), &ten_pow_14()),
            dec("50045")
        );
        assert_eq!(
            amount1_delta(
                &sqrt_price_at_tick(-16600),
                &sqrt_price_at_tick(-15500),
                &dec("4521273292232113180183")
            ),
            dec("111468606089896287952")
        );
    }

    #[test]
    fn zero_sqrt_price_yields_zero_amount0() {
        assert!(amount0_delta(&BigUint::zero(), &sqrt_price_at_tick(10), &ten_pow_14()).is_zero());
    }

    #[test]
    fn classifies_price_range() {
        assert_eq!(PriceRange::classify(-10, 0, 100), PriceRange::Below);
        assert_eq!(PriceRange::classify(0, 0, 100), PriceRange::InRange);
        assert_eq!(PriceRange::classify(100, 0, 100), PriceRange::InRange);
        assert_eq!(PriceRange::classify(101, 0, 100), PriceRange::Above);
    }

    #[test]
    fn extract_liquidity_in_range() {
        let (amount0, amount1) = extract_liquidity(
            -15500,
            -16600,
            -14600,
            &sqrt_price_at_tick(-15500),
            &dec("4521273292232113180183"),
        );
        assert_eq!(amount0, dec("431795842829084192009"));
        assert_eq!(amount1, dec("111468606089896287952"));
    }

    #[test]
    fn extract_liquidity_out_of_range_holds_one_side() {
        let liquidity = dec("4521273292232113180183");
        let sqrt_lower = sqrt_price_at_tick(-16600);
        let sqrt_upper = sqrt_price_at_tick(-14600);

        let (amount0, amount1) =
            extract_liquidity(-17000, -16600, -14600, &sqrt_price_at_tick(-17000), &liquidity);
        assert_eq!(amount0, amount0_delta(&sqrt_lower, &sqrt_upper, &liquidity));
        assert!(amount1.is_zero());

        let (amount0, amount1) =
            extract_liquidity(-14000, -16600, -14600, &sqrt_price_at_tick(-14000), &liquidity);
        assert!(amount0.is_zero());
        assert_eq!(amount1, amount1_delta(&sqrt_lower, &sqrt_upper, &liquidity));
    }

    proptest! {
        #[test]
        fn amounts_ignore_bound_order(
            a in -200_000i32..200_000,
            b in -200_000i32..200_000,
            liquidity in 1u128..u128::MAX,
        ) {
            let sa = sqrt_price_at_tick(a);
            let sb = sqrt_price_at_tick(b);
            let l = BigUint::from(liquidity);
            prop_assert_eq!(amount0_delta(&sa, &sb, &l), amount0_delta(&sb, &sa, &l));
            prop_assert_eq!(amount1_delta(&sa, &sb, &l), amount1_delta(&sb, &sa, &l));
        }

        #[test]
        fn in_range_amounts_stay_below_max(
            lower in -100_000i32..0,
            width in 20i32..50_000,
            offset in 1i32..1_000_000,
        ) {
            let upper = lower + width;
            let current = lower + 1 + offset % (width - 1);
            let liquidity = BigUint::from(10u64).pow(20);
            let sqrt_lower = sqrt_price_at_tick(lower);
            let sqrt_upper = sqrt_price_at_tick(upper);
            let max0 = amount0_delta(&sqrt_lower, &sqrt_upper, &liquidity);
            let max1 = amount1_delta(&sqrt_lower, &sqrt_upper, &liquidity);

            let (amount0, amount1) =
                extract_liquidity(current, lower, upper, &sqrt_price_at_tick(current), &liquidity);
            prop_assert!(!amount0.is_zero() && amount0 < max0);
            prop_assert!(!amount1.is_zero() && amount1 < max1);
        }
    }
}
