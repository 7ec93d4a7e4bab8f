//! Tick to Q64.96 square-root price conversion.
//!
//! Computes `sqrt(1.0001^tick) * 2^96` by bit-decomposing `|tick|` over
//! precomputed Q128 factors. The constants must match the on-chain tick math
//! bit for bit; drift here silently changes every token amount downstream.

use num_bigint::BigUint;
use num_traits::{One, Zero};
use once_cell::sync::Lazy;

/// Lowest tick of the reference price grid.
pub const MIN_TICK: i32 = -887272;
/// Highest tick of the reference price grid.
pub const MAX_TICK: i32 = 887272;

static RATIO_ODD_SEED: Lazy<BigUint> = Lazy::new(|| hex("fffcb933bd6fad37aa2d162d1a594001"));
static RATIO_EVEN_SEED: Lazy<BigUint> = Lazy::new(|| BigUint::one() << 128);
static MAX_UINT256: Lazy<BigUint> = Lazy::new(|| (BigUint::one() << 256) - BigUint::one());

// Factors for bits 1..=19 of |tick|, each 1.0001^(-2^(bit-1)) in Q128.
static BIT_FACTORS: Lazy<[BigUint; 19]> = Lazy::new(|| {
    [
        hex("fff97272373d413259a46990580e213a"),
        hex("fff2e50f5f656932ef12357cf3c7fdcc"),
        hex("ffe5caca7e10e4e61c3624eaa0941cd0"),
        hex("ffcb9843d60f6159c9db58835c926644"),
        hex("ff973b41fa98c081472e6896dfb254c0"),
        hex("ff2ea16466c96a3843ec78b326b52861"),
        hex("fe5dee046a99a2a811c461f1969c3053"),
        hex("fcbe86c7900a88aedcffc83b479aa3a4"),
        hex("f987a7253ac413176f2b074cf7815e54"),
        hex("f3392b0822b70005940c7a398e4b70f3"),
        hex("e7159475a2c29b7443b29c7fa6e889d9"),
        hex("d097f3bdfd2022b8845ad8f792aa5825"),
        hex("a9f746462d870fdf8a65dc1f90e061e5"),
        hex("70d869a156d2a1b890bb3df62baf32f7"),
        hex("31be135f97d08fd981231505542fcfa6"),
        hex("9aa508b5b7a84e1c677de54f3e99bc9"),
        hex("5d6af8dedb81196699c329225ee604"),
        hex("2216e584f5fa1ea926041bedfe98"),
        hex("48a170391f7dc42444e8fa2"),
    ]
});

fn hex(digits: &str) -> BigUint {
    // Literals above are valid hex; an empty value is unreachable.
    BigUint::parse_bytes(digits.as_bytes(), 16).unwrap_or_default()
}

/// Returns `sqrt(1.0001^tick) * 2^96`, rounded up on the final downshift.
///
/// Ticks outside `[MIN_TICK, MAX_TICK]` are not rejected: only the low 20
/// bits of `|tick|` take part, so the result is well defined but meaningless.
pub fn sqrt_price_at_tick(tick: i32) -> BigUint {
    let abs_tick = tick.unsigned_abs();

    let mut ratio = if abs_tick & 0x1 != 0 {
        RATIO_ODD_SEED.clone()
    } else {
        RATIO_EVEN_SEED.clone()
    };

    for (bit, factor) in BIT_FACTORS.iter().enumerate() {
        if abs_tick & (1 << (bit + 1)) != 0 {
            ratio = (ratio * factor) >> 128;
        }
    }

    if tick > 0 && !ratio.is_zero() {
        ratio = &*MAX_UINT256 / ratio;
    }

    let low_bits = BigUint::from(u32::MAX);
    let round_up = !(&ratio & &low_bits).is_zero();
    let mut sqrt_price = ratio >> 32;
    if round_up {
        sqrt_price += 1u32;
    }
    sqrt_price
}
