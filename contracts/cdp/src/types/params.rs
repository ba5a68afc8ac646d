use harbor::{
    constants::{ MAX_STABILITY_FEE, SCALAR_7 },
    oracle::Asset,
    utils::{ is_blank, MAX_IDENTIFIER_LEN },
    validate,
};
use soroban_sdk::{ contracttype, Address, Env, String };

use crate::errors::CdpError;

pub const DEFAULT_MAX_AUCTION_DURATION: u64 = 24 * 60 * 60;
pub const DEFAULT_BID_DURATION: u64 = 60 * 60;
pub const DEFAULT_INCREMENT: i128 = 500_000;

/// Ledger-wide configuration set at initialization
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LedgerConfig {
    /// Governance account allowed to change parameters
    pub admin: Address,
    /// Stable asset minted against collateral. The ledger must be its admin.
    pub debt_token: Address,
    /// Asset minted by debt auctions and burned by surplus auctions. The
    /// ledger must be its admin.
    pub gov_token: Address,
    /// SEP-40 price feed
    pub price_feed: Address,
    /// Prices older than this many seconds are stale
    pub max_price_age: u64,
    pub global_debt_limit: i128,
    /// Smallest non-zero principal a CDP may carry
    pub debt_floor: i128,
    pub surplus_auction_threshold: i128,
    pub surplus_auction_lot: i128,
    pub debt_auction_threshold: i128,
    /// Debt raised by a single debt auction
    pub debt_auction_lot: i128,
    /// Governance tokens offered when a debt auction opens
    pub debt_auction_initial_lot: i128,
    /// Ledgers between liquidation scans
    pub liquidation_block_interval: u32,
    /// CDPs scanned per collateral type, and auctions checked for expiry,
    /// by a single tick
    pub tick_batch_size: u32,
}

impl LedgerConfig {
    pub fn validate(&self, env: &Env) -> Result<(), CdpError> {
        validate!(env, self.max_price_age > 0, CdpError::InvalidParams, "max price age must be positive")?;
        validate!(
            env,
            self.global_debt_limit >= 0 && self.debt_floor >= 0,
            CdpError::InvalidParams,
            "debt limits must not be negative"
        )?;
        validate!(
            env,
            self.surplus_auction_threshold > 0 && self.surplus_auction_lot > 0,
            CdpError::InvalidParams,
            "surplus auction threshold and lot must be positive"
        )?;
        validate!(
            env,
            self.debt_auction_threshold > 0 &&
                self.debt_auction_lot > 0 &&
                self.debt_auction_initial_lot > 0,
            CdpError::InvalidParams,
            "debt auction threshold and lots must be positive"
        )?;
        validate!(
            env,
            self.liquidation_block_interval > 0,
            CdpError::InvalidParams,
            "liquidation block interval must be positive"
        )?;
        validate!(env, self.tick_batch_size > 0, CdpError::InvalidParams, "tick batch size must be positive")
    }

    pub fn apply(&mut self, update: ConfigUpdate) {
        if let Some(admin) = update.admin {
            self.admin = admin;
        }
        if let Some(price_feed) = update.price_feed {
            self.price_feed = price_feed;
        }
        if let Some(max_price_age) = update.max_price_age {
            self.max_price_age = max_price_age;
        }
        if let Some(global_debt_limit) = update.global_debt_limit {
            self.global_debt_limit = global_debt_limit;
        }
        if let Some(debt_floor) = update.debt_floor {
            self.debt_floor = debt_floor;
        }
        if let Some(threshold) = update.surplus_auction_threshold {
            self.surplus_auction_threshold = threshold;
        }
        if let Some(lot) = update.surplus_auction_lot {
            self.surplus_auction_lot = lot;
        }
        if let Some(threshold) = update.debt_auction_threshold {
            self.debt_auction_threshold = threshold;
        }
        if let Some(lot) = update.debt_auction_lot {
            self.debt_auction_lot = lot;
        }
        if let Some(lot) = update.debt_auction_initial_lot {
            self.debt_auction_initial_lot = lot;
        }
        if let Some(interval) = update.liquidation_block_interval {
            self.liquidation_block_interval = interval;
        }
        if let Some(size) = update.tick_batch_size {
            self.tick_batch_size = size;
        }
    }
}

/// Partial update of `LedgerConfig`. Token addresses are fixed for the life
/// of the ledger.
#[contracttype]
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ConfigUpdate {
    pub admin: Option<Address>,
    pub price_feed: Option<Address>,
    pub max_price_age: Option<u64>,
    pub global_debt_limit: Option<i128>,
    pub debt_floor: Option<i128>,
    pub surplus_auction_threshold: Option<i128>,
    pub surplus_auction_lot: Option<i128>,
    pub debt_auction_threshold: Option<i128>,
    pub debt_auction_lot: Option<i128>,
    pub debt_auction_initial_lot: Option<i128>,
    pub liquidation_block_interval: Option<u32>,
    pub tick_batch_size: Option<u32>,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CollateralParams {
    /// Identifier such as `BTC-A`
    pub collateral_type: String,
    pub token: Address,
    /// Asset queried on the price feed
    pub price_asset: Asset,
    /// Minimum collateral value to debt ratio, `SCALAR_7`
    pub liquidation_ratio: i128,
    /// Maximum aggregate principal for the type
    pub debt_ceiling: i128,
    /// Annual fee, `DECIMAL`
    pub stability_fee: u128,
    /// Added on top of seized debt when sizing the max bid, `SCALAR_7`
    pub liquidation_penalty: i128,
    /// Largest collateral lot a single auction may carry
    pub auction_size: i128,
    pub bid_duration: u64,
    pub max_auction_duration: u64,
    /// Minimum relative bid step, `SCALAR_7`
    pub min_bid_increment: i128,
    /// Share of seized collateral paid to the liquidating keeper, `SCALAR_7`
    pub keeper_reward: i128,
}

impl CollateralParams {
    pub fn validate(&self, env: &Env) -> Result<(), CdpError> {
        validate_collateral_type(env, &self.collateral_type)?;
        validate!(
            env,
            self.liquidation_ratio >= SCALAR_7,
            CdpError::InvalidParams,
            "liquidation ratio below one: {}",
            self.liquidation_ratio
        )?;
        validate!(env, self.debt_ceiling >= 0, CdpError::InvalidParams, "negative debt ceiling")?;
        validate!(
            env,
            self.stability_fee <= MAX_STABILITY_FEE,
            CdpError::InvalidParams,
            "stability fee above maximum: {}",
            self.stability_fee
        )?;
        validate!(env, self.liquidation_penalty >= 0, CdpError::InvalidParams, "negative liquidation penalty")?;
        validate!(env, self.auction_size > 0, CdpError::InvalidParams, "auction size must be positive")?;
        validate!(
            env,
            self.bid_duration > 0 && self.max_auction_duration >= self.bid_duration,
            CdpError::InvalidParams,
            "bid duration must be positive and within max auction duration"
        )?;
        validate!(
            env,
            self.min_bid_increment > 0 && self.min_bid_increment < SCALAR_7,
            CdpError::InvalidParams,
            "min bid increment out of range: {}",
            self.min_bid_increment
        )?;
        validate!(
            env,
            self.keeper_reward >= 0 && self.keeper_reward < SCALAR_7,
            CdpError::InvalidParams,
            "keeper reward out of range: {}",
            self.keeper_reward
        )
    }
}

pub fn validate_collateral_type(env: &Env, collateral_type: &String) -> Result<(), CdpError> {
    validate!(
        env,
        !is_blank(collateral_type),
        CdpError::EmptyCollateralType,
        "collateral type cannot be blank"
    )?;
    validate!(
        env,
        collateral_type.len() <= MAX_IDENTIFIER_LEN,
        CdpError::InvalidParams,
        "collateral type too long: {}",
        collateral_type.len()
    )
}

/// Durations and increments of protocol (surplus and debt) auctions
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AuctionParams {
    pub max_auction_duration: u64,
    /// Bid window of forward (surplus) auctions
    pub forward_bid_duration: u64,
    /// Bid window of reverse (debt) auctions
    pub reverse_bid_duration: u64,
    pub increment_surplus: i128,
    pub increment_debt: i128,
}

impl Default for AuctionParams {
    fn default() -> Self {
        AuctionParams {
            max_auction_duration: DEFAULT_MAX_AUCTION_DURATION,
            forward_bid_duration: DEFAULT_BID_DURATION,
            reverse_bid_duration: DEFAULT_BID_DURATION,
            increment_surplus: DEFAULT_INCREMENT,
            increment_debt: DEFAULT_INCREMENT,
        }
    }
}

impl AuctionParams {
    pub fn validate(&self, env: &Env) -> Result<(), CdpError> {
        validate!(
            env,
            self.forward_bid_duration > 0 && self.reverse_bid_duration > 0,
            CdpError::InvalidParams,
            "bid durations must be positive"
        )?;
        validate!(
            env,
            self.forward_bid_duration <= self.max_auction_duration &&
                self.reverse_bid_duration <= self.max_auction_duration,
            CdpError::InvalidParams,
            "bid durations must not exceed max auction duration"
        )?;
        validate!(
            env,
            self.increment_surplus > 0 &&
                self.increment_surplus < SCALAR_7 &&
                self.increment_debt > 0 &&
                self.increment_debt < SCALAR_7,
            CdpError::InvalidParams,
            "auction increments out of range"
        )
    }
}
