use soroban_sdk::{ Env, Vec };

use crate::{
    errors::CdpError,
    msg::MsgPlaceBid,
    types::{ Auction, AuctionParams, AuctionQuery, GenesisState },
};

pub trait AuctionHouseTrait {
    // ################################################################
    //                             Admin
    // ################################################################

    fn set_auction_params(env: Env, params: AuctionParams) -> Result<(), CdpError>;

    fn start_surplus_auction(env: Env, lot: i128) -> Result<u64, CdpError>;

    fn start_debt_auction(env: Env, debt: i128, initial_lot: i128) -> Result<u64, CdpError>;

    // ################################################################
    //                             User
    // ################################################################

    fn place_bid(env: Env, msg: MsgPlaceBid) -> Result<Auction, CdpError>;

    fn close_auction(env: Env, auction_id: u64) -> Result<Auction, CdpError>;

    // ################################################################
    //                             Queries
    // ################################################################

    fn get_auction(env: Env, auction_id: u64) -> Result<Auction, CdpError>;

    fn list_auctions(env: Env, query: AuctionQuery) -> Vec<Auction>;

    fn get_auction_params(env: Env) -> AuctionParams;

    fn next_auction_id(env: Env) -> u64;

    fn export_genesis(env: Env) -> GenesisState;
}
