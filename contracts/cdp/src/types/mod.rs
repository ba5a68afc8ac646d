pub mod auction;
pub mod cdp;
pub mod genesis;
pub mod params;

pub use auction::{
    Auction,
    AuctionKind,
    AuctionPhase,
    AuctionQuery,
    AuctionStatus,
    BaseAuction,
    CollateralAuction,
    DebtAuction,
    SurplusAuction,
};
pub use cdp::{ Cdp, CollateralState, LiquidationOutcome, SystemAccounts, TickSummary };
pub use genesis::{ GenesisState, PackedAuction };
pub use params::{ AuctionParams, CollateralParams, ConfigUpdate, LedgerConfig };
