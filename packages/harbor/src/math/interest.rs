//! Per-second compounding of stability fees.
//!
//! Rates and factors carry 18 decimals. Every product is truncated, so
//! compounded values never exceed their exact counterparts.

use crate::constants::{DECIMAL, SECONDS_PER_YEAR};
use crate::error::{ErrorCode, HarborResult};
use crate::math::bn::U256;

/// `base ^ exp` by repeated squaring. `None` if an intermediate product
/// does not fit in 256 bits.
pub fn checked_pow_decimal(base: u128, exp: u64) -> Option<U256> {
    let one = U256::from(DECIMAL);
    let mut result = one;
    let mut base = U256::from(base);
    let mut exp = exp;
    while exp > 0 {
        if exp & 1 == 1 {
            result = result.checked_mul(base)? / one;
        }
        exp >>= 1;
        if exp > 0 {
            base = base.checked_mul(base)? / one;
        }
    }
    Some(result)
}

/// Largest per-second factor `x` with `x ^ SECONDS_PER_YEAR <= 1 + annual_rate`.
pub fn per_second_rate(annual_rate: u128) -> HarborResult<u128> {
    if annual_rate == 0 {
        return Ok(DECIMAL);
    }
    let target = U256::from(
        DECIMAL
            .checked_add(annual_rate)
            .ok_or(ErrorCode::MathError)?,
    );

    // (1 + r / Y) ^ Y >= 1 + r bounds the answer from above
    let mut lo = DECIMAL;
    let mut hi = DECIMAL + annual_rate / SECONDS_PER_YEAR as u128 + 1;
    while hi - lo > 1 {
        let mid = lo + (hi - lo) / 2;
        match checked_pow_decimal(mid, SECONDS_PER_YEAR) {
            Some(compounded) if compounded <= target => lo = mid,
            _ => hi = mid,
        }
    }
    Ok(lo)
}

/// Compounds `factor` by `per_second` over `elapsed` seconds.
pub fn accumulate_interest_factor(factor: u128, per_second: u128, elapsed: u64) -> HarborResult<u128> {
    if elapsed == 0 || per_second == DECIMAL {
        return Ok(factor);
    }
    let growth = checked_pow_decimal(per_second, elapsed).ok_or(ErrorCode::MathError)?;
    let next = U256::from(factor)
        .checked_mul(growth)
        .ok_or(ErrorCode::MathError)?
        / U256::from(DECIMAL);
    next.try_to_u128()
}

/// Scales `principal` taken at `factor_snapshot` up to `factor_now`, rounding down.
pub fn apply_interest_factor(principal: i128, factor_now: u128, factor_snapshot: u128) -> HarborResult<i128> {
    if principal < 0 || factor_snapshot == 0 {
        return Err(ErrorCode::MathError);
    }
    if factor_now == factor_snapshot {
        return Ok(principal);
    }
    let scaled = U256::from(principal as u128)
        .checked_mul(U256::from(factor_now))
        .ok_or(ErrorCode::MathError)?
        / U256::from(factor_snapshot);
    scaled.try_to_i128()
}
