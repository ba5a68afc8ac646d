use soroban_sdk::{contractclient, contracttype, log, Address, Env, Symbol};

use crate::error::{ErrorCode, HarborResult};
use crate::math::safe_math::SafeMath;

/// Asset identifier understood by SEP-40 price feeds
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Asset {
    Stellar(Address),
    Other(Symbol),
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PriceData {
    pub price: i128,
    pub timestamp: u64,
}

/// The subset of the SEP-40 interface read by Harbor
#[contractclient(name = "PriceFeedClient")]
pub trait PriceFeed {
    fn decimals(env: Env) -> u32;
    fn lastprice(env: Env, asset: Asset) -> Option<PriceData>;
}

/// A validated price together with the feed's decimals
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct OraclePrice {
    pub price: i128,
    pub decimals: u32,
    pub timestamp: u64,
}

impl OraclePrice {
    /// Value of `amount` denominated in the feed's quote unit
    pub fn value_of(&self, env: &Env, amount: i128) -> HarborResult<i128> {
        let scale = 10_i128
            .checked_pow(self.decimals)
            .ok_or(ErrorCode::MathError)?;
        amount.safe_mul(self.price, env)?.safe_div(scale, env)
    }
}

/// Reads the latest price of `asset`, rejecting prices older than `max_age`
/// seconds and non-positive quotes.
pub fn get_oracle_price(
    env: &Env,
    feed: &Address,
    asset: &Asset,
    max_age: u64,
    now: u64,
) -> HarborResult<OraclePrice> {
    let client = PriceFeedClient::new(env, feed);
    let data = match client.try_lastprice(asset) {
        Ok(Ok(Some(data))) => data,
        _ => {
            log!(env, "Oracle has no price");
            return Err(ErrorCode::OracleUnavailable);
        }
    };
    if data.price <= 0 {
        log!(env, "Oracle price not positive: {}", data.price);
        return Err(ErrorCode::OracleNonPositive);
    }
    let delay = now.saturating_sub(data.timestamp);
    if delay > max_age {
        log!(env, "Oracle price stale: delay {} max age {}", delay, max_age);
        return Err(ErrorCode::OracleStale);
    }
    let decimals = match client.try_decimals() {
        Ok(Ok(decimals)) => decimals,
        _ => return Err(ErrorCode::OracleUnavailable),
    };

    Ok(OraclePrice {
        price: data.price,
        decimals,
        timestamp: data.timestamp,
    })
}
