//! Round-half-away-from-zero numeric kernel.
//!
//! Tie-breaking matters here: `1.5` goes to `2`, `-1.5` to `-2`, `2.5` to
//! `3`. This is the semantics of Python's `round()` on the reference test
//! literals and of Rust's [`f64::round`] — and explicitly NOT bankers'
//! rounding (`f64::round_ties_even`). The tests pin the tie cases so a swap
//! to the wrong intrinsic cannot slip through.

use crate::error::{Result, RoundingDomainSnafu};

/// Nearest integer to `x` as a float, ties away from zero.
///
/// NaN and infinities propagate unchanged; already-integral values are
/// returned as-is.
///
/// `f64::round` is used directly rather than the portable
/// `floor(x + 0.5)` / `ceil(x - 0.5)` formulation: the latter is wrong for
/// values like `0.49999999999999994`, where adding `0.5` rounds up to `1.0`
/// in the addition itself.
pub fn round_half_away_from_zero(x: f64) -> f64 {
    x.round()
}

/// Nearest integer to `x` as an `i64`, ties away from zero.
///
/// NaN and values whose rounding falls outside the `i64` range are a domain
/// error; the kernel never saturates or wraps.
pub fn checked_round_to_i64(x: f64) -> Result<i64> {
    if x.is_nan() {
        return RoundingDomainSnafu { value: x }.fail();
    }
    let rounded = round_half_away_from_zero(x);
    // 2^63 exactly; i64::MIN is representable, i64::MAX is not a float.
    const BOUND: f64 = 9_223_372_036_854_775_808.0;
    if rounded >= -BOUND && rounded < BOUND {
        Ok(rounded as i64)
    } else {
        RoundingDomainSnafu { value: x }.fail()
    }
}
