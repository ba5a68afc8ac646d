use harbor::{ constants::SCALAR_7, safe_decrement, validate };
use soroban_fixed_point_math::FixedPoint;
use soroban_sdk::{ log, Address, Env, String, Vec };

use crate::{
    controller::{
        auction::start_collateral_auctions,
        cdp::{ collateral_ratio, find_cdp, load_price },
        interest::{ accrue_interest, sync_cdp },
        tick::next_batch,
        token,
    },
    errors::CdpError,
    events::CdpEvents,
    storage::{
        get_cdp,
        get_cdp_index,
        get_collateral_params,
        get_collateral_state,
        get_cdp_scan_cursor,
        get_config,
        remove_cdp,
        save_collateral_state,
        set_cdp_scan_cursor,
    },
    types::{ Cdp, CollateralParams, CollateralState, LedgerConfig, LiquidationOutcome, TickSummary },
};

/// Keeper-triggered liquidation of a single CDP.
pub fn liquidate(
    env: &Env,
    keeper: &Address,
    owner: &Address,
    collateral_type: &String
) -> Result<LiquidationOutcome, CdpError> {
    let config = get_config(env)?;
    let params = get_collateral_params(env, collateral_type)?;
    let mut cdp = find_cdp(env, owner, collateral_type)?;

    let now = env.ledger().timestamp();
    let mut state = accrue_interest(env, collateral_type, now)?;
    let price = match load_price(env, &config, &params, now) {
        Ok(price) => price,
        Err(_) => {
            log!(env, "Liquidation of cdp {} deferred: no usable price", cdp.id);
            return Ok(LiquidationOutcome::Deferred);
        }
    };
    sync_cdp(env, &mut cdp, &state, now)?;

    let ratio = collateral_ratio(env, &price, cdp.collateral, cdp.principal)?;
    validate!(
        env,
        ratio < params.liquidation_ratio,
        CdpError::NotUnderCollateralized,
        "cdp {} ratio {} is not below liquidation ratio",
        cdp.id,
        ratio
    )?;

    let auction_ids = seize_cdp(env, &config, &params, &mut state, &cdp, Some(keeper), now)?;
    Ok(LiquidationOutcome::Liquidated(auction_ids))
}

/// Liquidates the undercollateralized CDPs among the next
/// `tick_batch_size` CDPs of `collateral_type`. The batch is deferred, and
/// the scan cursor left in place, when the price is stale or missing.
pub fn liquidate_unsafe_cdps(
    env: &Env,
    config: &LedgerConfig,
    collateral_type: &String,
    now: u64,
    summary: &mut TickSummary
) -> Result<(), CdpError> {
    let cursor = get_cdp_scan_cursor(env, collateral_type);
    let batch = next_batch(env, &get_cdp_index(env, collateral_type), cursor, config.tick_batch_size);
    let Some(last) = batch.last() else {
        return Ok(());
    };

    let params = get_collateral_params(env, collateral_type)?;
    let price = match load_price(env, config, &params, now) {
        Ok(price) => price,
        Err(_) => {
            log!(env, "Liquidation scan deferred for {} cdps: no usable price", batch.len());
            summary.deferred += batch.len();
            return Ok(());
        }
    };

    let mut state = get_collateral_state(env, collateral_type)?;
    for id in batch.iter() {
        let Some(mut cdp) = get_cdp(env, id) else {
            continue;
        };
        sync_cdp(env, &mut cdp, &state, now)?;
        if collateral_ratio(env, &price, cdp.collateral, cdp.principal)? < params.liquidation_ratio {
            let auction_ids = seize_cdp(env, config, &params, &mut state, &cdp, None, now)?;
            summary.started_auctions.append(&auction_ids);
            summary.liquidated += 1;
        }
    }
    set_cdp_scan_cursor(env, collateral_type, last);
    Ok(())
}

/// Deletes `cdp` and moves its collateral and debt into collateral auctions.
/// `cdp` must already be synced to the current interest factor.
fn seize_cdp(
    env: &Env,
    config: &LedgerConfig,
    params: &CollateralParams,
    state: &mut CollateralState,
    cdp: &Cdp,
    keeper: Option<&Address>,
    now: u64
) -> Result<Vec<u64>, CdpError> {
    remove_cdp(env, cdp);
    state.total_principal = state.total_principal.saturating_sub(cdp.principal).max(0);
    save_collateral_state(env, &cdp.collateral_type, state);

    let mut lot = cdp.collateral;
    if let Some(keeper) = keeper {
        let reward = lot.fixed_mul_floor(params.keeper_reward, SCALAR_7).ok_or(CdpError::MathError)?;
        token::send(env, &params.token, keeper, reward);
        safe_decrement!(lot, reward);
    }

    let penalty = cdp.principal
        .fixed_mul_floor(params.liquidation_penalty, SCALAR_7)
        .ok_or(CdpError::MathError)?;
    let auction_ids = start_collateral_auctions(
        env,
        config,
        params,
        &cdp.owner,
        lot,
        cdp.principal,
        penalty,
        now
    )?;

    CdpEvents::liquidate(env, cdp, keeper.cloned(), auction_ids.clone());
    Ok(auction_ids)
}
