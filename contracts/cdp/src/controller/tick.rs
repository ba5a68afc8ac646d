use soroban_sdk::{ Env, Vec };

use crate::{
    controller::{
        accounting::settle_protocol_accounts,
        auction::close_expired_auctions,
        interest::accrue_interest,
        liquidation::liquidate_unsafe_cdps,
    },
    errors::CdpError,
    storage::{ get_collateral_types, get_config, get_last_tick, set_last_tick },
    types::TickSummary,
};

/// Per-ledger maintenance: accrue interest, scan for unsafe CDPs, close
/// expired auctions and settle protocol accounts. Runs at most once per
/// ledger sequence; later calls in the same ledger return an empty summary.
pub fn tick(env: &Env) -> Result<TickSummary, CdpError> {
    let sequence = env.ledger().sequence();
    let now = env.ledger().timestamp();
    let mut summary = TickSummary {
        sequence,
        liquidated: 0,
        deferred: 0,
        closed_auctions: 0,
        started_auctions: Vec::new(env),
    };
    if get_last_tick(env) == Some(sequence) {
        return Ok(summary);
    }
    set_last_tick(env, sequence);

    let config = get_config(env)?;
    let scan = sequence % config.liquidation_block_interval == 0;
    for collateral_type in get_collateral_types(env).iter() {
        accrue_interest(env, &collateral_type, now)?;
        if scan {
            liquidate_unsafe_cdps(env, &config, &collateral_type, now, &mut summary)?;
        }
    }

    close_expired_auctions(env, &config, now, &mut summary)?;
    summary.started_auctions.append(&settle_protocol_accounts(env, &config)?);
    Ok(summary)
}

/// Picks at most `size` ids from `index`, starting after `cursor` and
/// wrapping around to the ids at or before it. Each id is picked once.
pub fn next_batch(env: &Env, index: &Vec<u64>, cursor: u64, size: u32) -> Vec<u64> {
    let after = index.iter().filter(|id| *id > cursor);
    let before = index.iter().filter(|id| *id <= cursor);

    let mut batch = Vec::new(env);
    for id in after.chain(before).take(size as usize) {
        batch.push_back(id);
    }
    batch
}
