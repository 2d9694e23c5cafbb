use fixed::types::I32F32;

/// Q32.32 fixed-point: 32 integer bits, 32 fractional bits.
///
/// Used for everything fractional the simulation exposes or computes
/// with: progress fractions, fill levels, upgrade modifiers. No floats
/// ever enter the tick loop, so identical inputs produce identical
/// state on every platform.
pub type Fixed64 = I32F32;

/// Ticks are the atomic unit of simulation time.
pub type Ticks = u64;

/// Convert an f64 to Fixed64. Use only for initialization, never in sim loop.
#[inline]
pub fn f64_to_fixed64(v: f64) -> Fixed64 {
    Fixed64::from_num(v)
}

/// Convert Fixed64 to f64. Use only for display/FFI, never in sim loop.
#[inline]
pub fn fixed64_to_f64(v: Fixed64) -> f64 {
    v.to_num::<f64>()
}

/// Checked multiplication for Fixed64 that returns None on overflow.
#[inline]
pub fn checked_mul_64(a: Fixed64, b: Fixed64) -> Option<Fixed64> {
    a.checked_mul(b)
}

// ---------------------------------------------------------------------------
// u32 quantity math
// ---------------------------------------------------------------------------
//
// `Fixed64::from_num` only covers the signed 32-bit integer range, so
// arithmetic over raw u32 quantities (store fill, tick counts, stack
// counts) goes through the Q32.32 bit representation with a wide
// intermediate instead of converting the operands.

/// Exact `num / den` in `[0, 1]` over the full `u32` range.
/// `num` is clamped to `den`; a zero `den` yields zero.
pub fn fraction_u32(num: u32, den: u32) -> Fixed64 {
    if den == 0 {
        return Fixed64::ZERO;
    }
    let num = num.min(den);
    Fixed64::from_bits(((u64::from(num) << 32) / u64::from(den)) as i64)
}

/// `floor(value * modifier)` saturated to `u32`. `modifier` must be
/// non-negative.
pub fn scale_u32(value: u32, modifier: Fixed64) -> u32 {
    debug_assert!(modifier >= Fixed64::ZERO);
    let bits = modifier.to_bits().max(0) as u128;
    let scaled = (u128::from(value) * bits) >> 32;
    scaled.min(u128::from(u32::MAX)) as u32
}

/// `floor(value / divisor)` saturated to `u32`. A non-positive divisor
/// leaves `value` unchanged.
pub fn div_u32(value: u32, divisor: Fixed64) -> u32 {
    if divisor <= Fixed64::ZERO {
        return value;
    }
    let scaled = (u128::from(value) << 32) / divisor.to_bits() as u128;
    scaled.min(u128::from(u32::MAX)) as u32
}
