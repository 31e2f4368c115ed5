//! Integer payout arithmetic.
//!
//! Amounts are raw token units (`u128`). Every payout is a floor: the truncated remainder
//! stays with whoever funded the pool and is never redistributed.

/// `floor(amount * percentage / 100)`, or `None` on overflow.
///
/// Computed as `(amount / 100) * percentage + (amount % 100) * percentage / 100` so that
/// amounts close to `u128::MAX` do not overflow for percentages up to 100.
pub fn percent_of(amount: u128, percentage: u32) -> Option<u128> {
    let pct = percentage as u128;
    let whole = (amount / 100).checked_mul(pct)?;
    let rest = (amount % 100) * pct / 100;
    whole.checked_add(rest)
}

/// `floor(pool * part / total)`, or `None` on overflow. A zero `total` yields zero.
pub fn proportional_share(pool: u128, part: u128, total: u128) -> Option<u128> {
    if total == 0 {
        return Some(0);
    }
    pool.checked_mul(part).map(|scaled| scaled / total)
}
