pub mod auction_house;
pub mod ledger;
