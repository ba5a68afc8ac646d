mod liquidation;
mod setup;
