// LEDGER LIFETIMES

pub const DAY_IN_LEDGERS: u32 = 17280;
pub const INSTANCE_BUMP_AMOUNT: u32 = 7 * DAY_IN_LEDGERS;
pub const INSTANCE_LIFETIME_THRESHOLD: u32 = INSTANCE_BUMP_AMOUNT - DAY_IN_LEDGERS;
pub const PERSISTENT_BUMP_AMOUNT: u32 = 30 * DAY_IN_LEDGERS;
pub const PERSISTENT_LIFETIME_THRESHOLD: u32 = PERSISTENT_BUMP_AMOUNT - DAY_IN_LEDGERS;

// PRECISIONS

/// Scale of ratios and percentages (1.0 == 10^7)
pub const SCALAR_7: i128 = 10_000_000;
/// Scale of interest rates and interest factors (1.0 == 10^18)
pub const DECIMAL: u128 = 1_000_000_000_000_000_000;

// TIME

pub const SECONDS_PER_YEAR: u64 = 31_536_000;

// LIMITS

/// Highest annual stability fee accepted (100% APR)
pub const MAX_STABILITY_FEE: u128 = DECIMAL;
