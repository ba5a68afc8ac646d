use soroban_sdk::{ Address, Env, String, Symbol, Vec };

use crate::types::{ Auction, Cdp };

pub struct CdpEvents {}

impl CdpEvents {
    /// Emitted when the ledger is initialized
    ///
    /// - topics - `["initialize", admin: Address]`
    /// - data - `[debt_token: Address, gov_token: Address, collateral_types: u32, genesis_auctions: u32]`
    pub fn initialize(
        env: &Env,
        admin: Address,
        debt_token: Address,
        gov_token: Address,
        collateral_types: u32,
        genesis_auctions: u32
    ) {
        let topics = (Symbol::new(env, "initialize"), admin);
        env.events().publish(topics, (debt_token, gov_token, collateral_types, genesis_auctions));
    }

    /// Emitted when governance adds or changes a collateral type
    ///
    /// - topics - `["collateral_params", collateral_type: String]`
    /// - data - `[stability_fee: u128, per_second_fee: u128]`
    pub fn collateral_params(env: &Env, collateral_type: String, stability_fee: u128, per_second_fee: u128) {
        let topics = (Symbol::new(env, "collateral_params"), collateral_type);
        env.events().publish(topics, (stability_fee, per_second_fee));
    }

    /// - topics - `["create_cdp", owner: Address]`
    /// - data - `[cdp_id: u64, collateral_type: String, collateral: i128, principal: i128]`
    pub fn create_cdp(env: &Env, cdp: &Cdp) {
        let topics = (Symbol::new(env, "create_cdp"), cdp.owner.clone());
        env.events().publish(topics, (
            cdp.id,
            cdp.collateral_type.clone(),
            cdp.collateral,
            cdp.principal,
        ));
    }

    /// - topics - `["deposit", owner: Address]`
    /// - data - `[cdp_id: u64, depositor: Address, amount: i128, collateral: i128]`
    pub fn deposit(env: &Env, cdp: &Cdp, depositor: Address, amount: i128) {
        let topics = (Symbol::new(env, "deposit"), cdp.owner.clone());
        env.events().publish(topics, (cdp.id, depositor, amount, cdp.collateral));
    }

    /// - topics - `["withdraw", owner: Address]`
    /// - data - `[cdp_id: u64, amount: i128, collateral: i128]`
    pub fn withdraw(env: &Env, cdp: &Cdp, amount: i128) {
        let topics = (Symbol::new(env, "withdraw"), cdp.owner.clone());
        env.events().publish(topics, (cdp.id, amount, cdp.collateral));
    }

    /// - topics - `["draw_debt", owner: Address]`
    /// - data - `[cdp_id: u64, amount: i128, principal: i128]`
    pub fn draw_debt(env: &Env, cdp: &Cdp, amount: i128) {
        let topics = (Symbol::new(env, "draw_debt"), cdp.owner.clone());
        env.events().publish(topics, (cdp.id, amount, cdp.principal));
    }

    /// - topics - `["repay_debt", owner: Address]`
    /// - data - `[cdp_id: u64, payment: i128, principal: i128]`
    pub fn repay_debt(env: &Env, cdp: &Cdp, payment: i128) {
        let topics = (Symbol::new(env, "repay_debt"), cdp.owner.clone());
        env.events().publish(topics, (cdp.id, payment, cdp.principal));
    }

    /// Emitted when a fully repaid CDP is deleted and its collateral returned
    ///
    /// - topics - `["close_cdp", owner: Address]`
    /// - data - `[cdp_id: u64, returned_collateral: i128]`
    pub fn close_cdp(env: &Env, owner: Address, cdp_id: u64, returned_collateral: i128) {
        let topics = (Symbol::new(env, "close_cdp"), owner);
        env.events().publish(topics, (cdp_id, returned_collateral));
    }

    /// - topics - `["liquidate", owner: Address]`
    /// - data - `[cdp_id: u64, keeper: Option<Address>, collateral: i128, debt: i128, auction_ids: Vec<u64>]`
    pub fn liquidate(
        env: &Env,
        cdp: &Cdp,
        keeper: Option<Address>,
        auction_ids: Vec<u64>
    ) {
        let topics = (Symbol::new(env, "liquidate"), cdp.owner.clone());
        env.events().publish(topics, (cdp.id, keeper, cdp.collateral, cdp.principal, auction_ids));
    }

    /// - topics - `["accrue_interest", collateral_type: String]`
    /// - data - `[interest_factor: u128, fees: i128]`
    pub fn accrue_interest(env: &Env, collateral_type: String, interest_factor: u128, fees: i128) {
        let topics = (Symbol::new(env, "accrue_interest"), collateral_type);
        env.events().publish(topics, (interest_factor, fees));
    }

    /// Emitted when surplus is burned against bad debt
    ///
    /// - topics - `["net_surplus_debt"]`
    /// - data - `[amount: i128, surplus: i128, bad_debt: i128]`
    pub fn net_surplus_debt(env: &Env, amount: i128, surplus: i128, bad_debt: i128) {
        let topics = (Symbol::new(env, "net_surplus_debt"),);
        env.events().publish(topics, (amount, surplus, bad_debt));
    }
}

pub struct AuctionEvents {}

impl AuctionEvents {
    /// - topics - `["auction_start", auction_id: u64]`
    /// - data - `[auction: Auction]`
    pub fn auction_start(env: &Env, auction: &Auction) {
        let topics = (Symbol::new(env, "auction_start"), auction.id());
        env.events().publish(topics, auction.clone());
    }

    /// - topics - `["auction_bid", auction_id: u64, bidder: Address]`
    /// - data - `[bid: i128, lot: i128, end_time: u64]`
    pub fn auction_bid(env: &Env, auction: &Auction, bidder: Address) {
        let base = auction.base();
        let topics = (Symbol::new(env, "auction_bid"), auction.id(), bidder);
        env.events().publish(topics, (base.bid, base.lot, base.end_time));
    }

    /// - topics - `["auction_close", auction_id: u64]`
    /// - data - `[winner: Option<Address>, bid: i128, lot: i128]`
    pub fn auction_close(env: &Env, auction: &Auction) {
        let base = auction.base();
        let topics = (Symbol::new(env, "auction_close"), auction.id());
        env.events().publish(topics, (base.bidder.clone(), base.bid, base.lot));
    }
}
