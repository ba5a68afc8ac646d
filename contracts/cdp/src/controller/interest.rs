use harbor::{
    constants::DECIMAL,
    math::interest::{ accumulate_interest_factor, apply_interest_factor, per_second_rate },
    math::safe_math::SafeMath,
    safe_increment,
};
use soroban_sdk::{ log, Env, String };

use crate::{
    controller::token,
    errors::CdpError,
    events::CdpEvents,
    storage::{ get_accounts, get_collateral_state, get_config, save_accounts, save_collateral_state },
    types::{ Cdp, CollateralParams, CollateralState },
};

/// Advances the interest factor of `collateral_type` to `now`.
///
/// The growth of the type's aggregate principal is minted to the ledger and
/// booked as surplus. Calling twice at the same time is a no-op.
pub fn accrue_interest(
    env: &Env,
    collateral_type: &String,
    now: u64
) -> Result<CollateralState, CdpError> {
    let mut state = get_collateral_state(env, collateral_type)?;
    if now <= state.last_accrual_time {
        return Ok(state);
    }

    let elapsed = now - state.last_accrual_time;
    let factor = accumulate_interest_factor(state.interest_factor, state.per_second_fee, elapsed)?;
    let total_principal = apply_interest_factor(
        state.total_principal,
        factor,
        state.interest_factor
    )?;
    let fees = total_principal.safe_sub(state.total_principal, env)?;

    state.interest_factor = factor;
    state.total_principal = total_principal;
    state.last_accrual_time = now;
    save_collateral_state(env, collateral_type, &state);

    if fees > 0 {
        let config = get_config(env)?;
        token::mint(env, &config.debt_token, &env.current_contract_address(), fees);

        let mut accounts = get_accounts(env);
        safe_increment!(accounts.surplus, fees);
        save_accounts(env, &accounts);
    }
    CdpEvents::accrue_interest(env, collateral_type.clone(), factor, fees);

    Ok(state)
}

/// Brings a CDP's principal up to the collateral type's current factor.
pub fn sync_cdp(env: &Env, cdp: &mut Cdp, state: &CollateralState, now: u64) -> Result<(), CdpError> {
    if let Err(error) = cdp.sync(state.interest_factor, now) {
        log!(env, "Failed to sync interest of cdp {}", cdp.id);
        return Err(error.into());
    }
    Ok(())
}

/// State of a newly registered collateral type
pub fn new_collateral_state(params: &CollateralParams, now: u64) -> Result<CollateralState, CdpError> {
    Ok(CollateralState {
        interest_factor: DECIMAL,
        per_second_fee: per_second_rate(params.stability_fee)?,
        last_accrual_time: now,
        total_principal: 0,
    })
}

/// Applies a new stability fee. Interest up to `now` accrues at the old fee.
pub fn update_stability_fee(
    env: &Env,
    params: &CollateralParams,
    now: u64
) -> Result<CollateralState, CdpError> {
    let mut state = accrue_interest(env, &params.collateral_type, now)?;
    state.per_second_fee = per_second_rate(params.stability_fee)?;
    save_collateral_state(env, &params.collateral_type, &state);
    Ok(state)
}
