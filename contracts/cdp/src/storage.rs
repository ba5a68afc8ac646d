use harbor::constants::{
    INSTANCE_BUMP_AMOUNT,
    INSTANCE_LIFETIME_THRESHOLD,
    PERSISTENT_BUMP_AMOUNT,
    PERSISTENT_LIFETIME_THRESHOLD,
};
use soroban_sdk::{ contracttype, Address, Env, String, Vec };

use crate::{
    errors::CdpError,
    types::{
        Auction,
        AuctionParams,
        Cdp,
        CollateralParams,
        CollateralState,
        LedgerConfig,
        SystemAccounts,
    },
};

#[contracttype]
#[derive(Clone, Debug)]
pub enum DataKey {
    Initialized,
    Config,
    AuctionParams,
    Accounts,
    LastTick,
    CdpScanCursor(String),
    AuctionScanCursor,
    CollateralTypes,
    CollateralParams(String),
    CollateralState(String),
    NextCdpId,
    Cdp(u64),
    CdpByOwner(Address, String),
    CdpIndex(String),
    NextAuctionId,
    Auction(u64),
    AuctionIndex,
}

pub fn bump_instance(env: &Env) {
    env.storage().instance().extend_ttl(INSTANCE_LIFETIME_THRESHOLD, INSTANCE_BUMP_AMOUNT);
}

fn bump_persistent(env: &Env, key: &DataKey) {
    env.storage().persistent().extend_ttl(key, PERSISTENT_LIFETIME_THRESHOLD, PERSISTENT_BUMP_AMOUNT);
}

// ################################################################
//                             Ledger
// ################################################################

pub fn is_initialized(env: &Env) -> bool {
    env.storage().instance().get(&DataKey::Initialized).unwrap_or(false)
}

pub fn set_initialized(env: &Env) {
    env.storage().instance().set(&DataKey::Initialized, &true);
}

pub fn save_config(env: &Env, config: &LedgerConfig) {
    env.storage().instance().set(&DataKey::Config, config);
}

pub fn get_config(env: &Env) -> Result<LedgerConfig, CdpError> {
    env.storage().instance().get(&DataKey::Config).ok_or(CdpError::NotInitialized)
}

pub fn save_accounts(env: &Env, accounts: &SystemAccounts) {
    env.storage().instance().set(&DataKey::Accounts, accounts);
}

pub fn get_accounts(env: &Env) -> SystemAccounts {
    env.storage().instance().get(&DataKey::Accounts).unwrap_or_default()
}

pub fn get_last_tick(env: &Env) -> Option<u32> {
    env.storage().instance().get(&DataKey::LastTick)
}

pub fn set_last_tick(env: &Env, sequence: u32) {
    env.storage().instance().set(&DataKey::LastTick, &sequence);
}

/// Last CDP id visited by the liquidation scan of a collateral type
pub fn get_cdp_scan_cursor(env: &Env, collateral_type: &String) -> u64 {
    env.storage()
        .instance()
        .get(&DataKey::CdpScanCursor(collateral_type.clone()))
        .unwrap_or(0)
}

pub fn set_cdp_scan_cursor(env: &Env, collateral_type: &String, id: u64) {
    env.storage().instance().set(&DataKey::CdpScanCursor(collateral_type.clone()), &id);
}

/// Last auction id visited by the expiry scan
pub fn get_auction_scan_cursor(env: &Env) -> u64 {
    env.storage().instance().get(&DataKey::AuctionScanCursor).unwrap_or(0)
}

pub fn set_auction_scan_cursor(env: &Env, id: u64) {
    env.storage().instance().set(&DataKey::AuctionScanCursor, &id);
}

// ################################################################
//                         Collateral Types
// ################################################################

pub fn get_collateral_types(env: &Env) -> Vec<String> {
    env.storage()
        .instance()
        .get(&DataKey::CollateralTypes)
        .unwrap_or(Vec::new(env))
}

pub fn save_collateral_params(env: &Env, params: &CollateralParams) {
    let collateral_type = params.collateral_type.clone();
    let mut types = get_collateral_types(env);
    if !types.contains(&collateral_type) {
        types.push_back(collateral_type.clone());
        env.storage().instance().set(&DataKey::CollateralTypes, &types);
    }
    env.storage().instance().set(&DataKey::CollateralParams(collateral_type), params);
}

pub fn get_collateral_params(env: &Env, collateral_type: &String) -> Result<CollateralParams, CdpError> {
    env.storage()
        .instance()
        .get(&DataKey::CollateralParams(collateral_type.clone()))
        .ok_or(CdpError::CollateralTypeNotFound)
}

pub fn save_collateral_state(env: &Env, collateral_type: &String, state: &CollateralState) {
    env.storage().instance().set(&DataKey::CollateralState(collateral_type.clone()), state);
}

pub fn get_collateral_state(env: &Env, collateral_type: &String) -> Result<CollateralState, CdpError> {
    env.storage()
        .instance()
        .get(&DataKey::CollateralState(collateral_type.clone()))
        .ok_or(CdpError::CollateralTypeNotFound)
}

// ################################################################
//                              CDPs
// ################################################################

pub fn get_next_cdp_id(env: &Env) -> u64 {
    env.storage().instance().get(&DataKey::NextCdpId).unwrap_or(1)
}

pub fn set_next_cdp_id(env: &Env, id: u64) {
    env.storage().instance().set(&DataKey::NextCdpId, &id);
}

pub fn get_cdp(env: &Env, id: u64) -> Option<Cdp> {
    let key = DataKey::Cdp(id);
    let cdp = env.storage().persistent().get(&key);
    if cdp.is_some() {
        bump_persistent(env, &key);
    }
    cdp
}

pub fn get_cdp_id(env: &Env, owner: &Address, collateral_type: &String) -> Option<u64> {
    env.storage().persistent().get(&DataKey::CdpByOwner(owner.clone(), collateral_type.clone()))
}

/// Writes an existing or new CDP record.
pub fn save_cdp(env: &Env, cdp: &Cdp) {
    let key = DataKey::Cdp(cdp.id);
    env.storage().persistent().set(&key, cdp);
    bump_persistent(env, &key);
}

/// Stores a freshly created CDP and indexes it by owner and collateral type.
pub fn insert_cdp(env: &Env, cdp: &Cdp) {
    save_cdp(env, cdp);

    let owner_key = DataKey::CdpByOwner(cdp.owner.clone(), cdp.collateral_type.clone());
    env.storage().persistent().set(&owner_key, &cdp.id);
    bump_persistent(env, &owner_key);

    let mut index = get_cdp_index(env, &cdp.collateral_type);
    index.push_back(cdp.id);
    save_cdp_index(env, &cdp.collateral_type, &index);
}

pub fn remove_cdp(env: &Env, cdp: &Cdp) {
    env.storage().persistent().remove(&DataKey::Cdp(cdp.id));
    env.storage()
        .persistent()
        .remove(&DataKey::CdpByOwner(cdp.owner.clone(), cdp.collateral_type.clone()));

    let mut index = get_cdp_index(env, &cdp.collateral_type);
    if let Some(position) = index.first_index_of(cdp.id) {
        index.remove(position);
        save_cdp_index(env, &cdp.collateral_type, &index);
    }
}

/// Ids of every open CDP of a collateral type, in creation order
pub fn get_cdp_index(env: &Env, collateral_type: &String) -> Vec<u64> {
    env.storage()
        .persistent()
        .get(&DataKey::CdpIndex(collateral_type.clone()))
        .unwrap_or(Vec::new(env))
}

fn save_cdp_index(env: &Env, collateral_type: &String, index: &Vec<u64>) {
    let key = DataKey::CdpIndex(collateral_type.clone());
    env.storage().persistent().set(&key, index);
    bump_persistent(env, &key);
}

// ################################################################
//                             Auctions
// ################################################################

pub fn get_next_auction_id(env: &Env) -> u64 {
    env.storage().instance().get(&DataKey::NextAuctionId).unwrap_or(1)
}

pub fn set_next_auction_id(env: &Env, id: u64) {
    env.storage().instance().set(&DataKey::NextAuctionId, &id);
}

pub fn save_auction_params(env: &Env, params: &AuctionParams) {
    env.storage().instance().set(&DataKey::AuctionParams, params);
}

pub fn get_auction_params(env: &Env) -> AuctionParams {
    env.storage().instance().get(&DataKey::AuctionParams).unwrap_or_default()
}

pub fn get_auction(env: &Env, id: u64) -> Option<Auction> {
    let key = DataKey::Auction(id);
    let auction = env.storage().persistent().get(&key);
    if auction.is_some() {
        bump_persistent(env, &key);
    }
    auction
}

pub fn has_auction(env: &Env, id: u64) -> bool {
    env.storage().persistent().has(&DataKey::Auction(id))
}

pub fn save_auction(env: &Env, auction: &Auction) {
    let key = DataKey::Auction(auction.id());
    env.storage().persistent().set(&key, auction);
    bump_persistent(env, &key);
}

/// Stores a new auction and appends it to the active index.
pub fn insert_auction(env: &Env, auction: &Auction) {
    save_auction(env, auction);
    let mut index = get_auction_index(env);
    index.push_back(auction.id());
    save_auction_index(env, &index);
}

pub fn remove_auction(env: &Env, id: u64) {
    env.storage().persistent().remove(&DataKey::Auction(id));
    let mut index = get_auction_index(env);
    if let Some(position) = index.first_index_of(id) {
        index.remove(position);
        save_auction_index(env, &index);
    }
}

/// Ids of every active auction, in creation order
pub fn get_auction_index(env: &Env) -> Vec<u64> {
    env.storage()
        .persistent()
        .get(&DataKey::AuctionIndex)
        .unwrap_or(Vec::new(env))
}

fn save_auction_index(env: &Env, index: &Vec<u64>) {
    env.storage().persistent().set(&DataKey::AuctionIndex, index);
    bump_persistent(env, &DataKey::AuctionIndex);
}
