#![no_std]

mod contract;
mod controller;
pub mod errors;
mod events;
mod interface;
pub mod msg;
mod storage;
pub mod types;

pub use contract::{ HarborCdp, HarborCdpClient };

#[cfg(test)]
mod tests;
