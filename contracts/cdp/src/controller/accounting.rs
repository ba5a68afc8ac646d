use harbor::safe_decrement;
use soroban_sdk::{ Env, Vec };

use crate::{
    controller::{ auction::{ start_debt_auction, start_surplus_auction }, token },
    errors::CdpError,
    events::CdpEvents,
    storage::{ get_accounts, save_accounts },
    types::LedgerConfig,
};

/// Burns surplus against bad debt, then opens at most one debt auction and
/// one surplus auction when the balances reach their thresholds.
pub fn settle_protocol_accounts(env: &Env, config: &LedgerConfig) -> Result<Vec<u64>, CdpError> {
    let mut accounts = get_accounts(env);
    let netted = accounts.surplus.min(accounts.bad_debt);
    if netted > 0 {
        token::burn(env, &config.debt_token, netted);
        safe_decrement!(accounts.surplus, netted);
        safe_decrement!(accounts.bad_debt, netted);
        save_accounts(env, &accounts);
        CdpEvents::net_surplus_debt(env, netted, accounts.surplus, accounts.bad_debt);
    }

    let mut started = Vec::new(env);
    if accounts.bad_debt >= config.debt_auction_threshold {
        let debt = accounts.bad_debt.min(config.debt_auction_lot);
        started.push_back(start_debt_auction(env, debt, config.debt_auction_initial_lot)?);
    }
    if accounts.surplus >= config.surplus_auction_threshold {
        let lot = accounts.surplus.min(config.surplus_auction_lot);
        started.push_back(start_surplus_auction(env, lot)?);
    }
    Ok(started)
}
