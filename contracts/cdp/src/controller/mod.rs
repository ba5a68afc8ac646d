pub mod accounting;
pub mod auction;
pub mod cdp;
pub mod interest;
pub mod liquidation;
pub mod tick;
pub mod token;
