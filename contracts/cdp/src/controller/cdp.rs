use harbor::{
    constants::SCALAR_7,
    math::safe_math::SafeMath,
    oracle::{ get_oracle_price, OraclePrice },
    safe_decrement,
    safe_increment,
    validate,
};
use soroban_fixed_point_math::FixedPoint;
use soroban_sdk::{ log, Address, Env, String };

use crate::{
    controller::{ interest::{ accrue_interest, sync_cdp }, token },
    errors::CdpError,
    events::CdpEvents,
    storage::{
        get_cdp,
        get_cdp_id,
        get_collateral_params,
        get_collateral_state,
        get_collateral_types,
        get_config,
        get_next_cdp_id,
        insert_cdp,
        remove_cdp,
        save_cdp,
        save_collateral_state,
        set_next_cdp_id,
    },
    types::{ Cdp, CollateralParams, CollateralState, LedgerConfig },
};

pub fn find_cdp(env: &Env, owner: &Address, collateral_type: &String) -> Result<Cdp, CdpError> {
    match get_cdp_id(env, owner, collateral_type).and_then(|id| get_cdp(env, id)) {
        Some(cdp) => Ok(cdp),
        None => {
            log!(env, "No cdp found for owner and collateral type");
            Err(CdpError::NotFound)
        }
    }
}

pub fn load_price(
    env: &Env,
    config: &LedgerConfig,
    params: &CollateralParams,
    now: u64
) -> Result<OraclePrice, CdpError> {
    get_oracle_price(env, &config.price_feed, &params.price_asset, config.max_price_age, now).map_err(
        CdpError::from
    )
}

/// Collateral value over debt, `SCALAR_7`. Debt-free positions are infinitely safe.
pub fn collateral_ratio(
    env: &Env,
    price: &OraclePrice,
    collateral: i128,
    debt: i128
) -> Result<i128, CdpError> {
    if debt == 0 {
        return Ok(i128::MAX);
    }
    let value = price.value_of(env, collateral)?;
    value.fixed_div_floor(debt, SCALAR_7).ok_or(CdpError::MathError)
}

fn validate_collateral_ratio(
    env: &Env,
    params: &CollateralParams,
    price: &OraclePrice,
    collateral: i128,
    debt: i128
) -> Result<(), CdpError> {
    let ratio = collateral_ratio(env, price, collateral, debt)?;
    validate!(
        env,
        ratio >= params.liquidation_ratio,
        CdpError::BelowLiquidationRatio,
        "collateral ratio {} below liquidation ratio {}",
        ratio,
        params.liquidation_ratio
    )
}

/// Checks the collateral type's debt ceiling and the global debt limit
/// against `additional` new principal.
fn validate_debt_limits(
    env: &Env,
    config: &LedgerConfig,
    params: &CollateralParams,
    state: &CollateralState,
    additional: i128
) -> Result<(), CdpError> {
    let type_total = state.total_principal.safe_add(additional, env)?;
    validate!(
        env,
        type_total <= params.debt_ceiling,
        CdpError::DebtCeilingExceeded,
        "debt ceiling exceeded: {} > {}",
        type_total,
        params.debt_ceiling
    )?;

    let mut global_total = additional;
    for collateral_type in get_collateral_types(env).iter() {
        let other = get_collateral_state(env, &collateral_type)?;
        safe_increment!(global_total, other.total_principal);
    }
    validate!(
        env,
        global_total <= config.global_debt_limit,
        CdpError::DebtCeilingExceeded,
        "global debt limit exceeded: {} > {}",
        global_total,
        config.global_debt_limit
    )
}

pub fn create_cdp(
    env: &Env,
    owner: &Address,
    collateral: i128,
    principal: i128,
    collateral_type: &String
) -> Result<Cdp, CdpError> {
    let config = get_config(env)?;
    let params = get_collateral_params(env, collateral_type)?;

    validate!(
        env,
        get_cdp_id(env, owner, collateral_type).is_none(),
        CdpError::CdpAlreadyExists,
        "owner already has a cdp of this collateral type"
    )?;
    validate!(
        env,
        principal >= config.debt_floor,
        CdpError::BelowDebtFloor,
        "principal {} below debt floor {}",
        principal,
        config.debt_floor
    )?;

    let now = env.ledger().timestamp();
    let mut state = accrue_interest(env, collateral_type, now)?;
    let price = load_price(env, &config, &params, now)?;
    validate_collateral_ratio(env, &params, &price, collateral, principal)?;
    validate_debt_limits(env, &config, &params, &state, principal)?;

    token::receive(env, &params.token, owner, collateral);
    token::mint(env, &config.debt_token, owner, principal);

    let id = get_next_cdp_id(env);
    set_next_cdp_id(env, id.checked_add(1).ok_or(CdpError::MathError)?);

    let cdp = Cdp {
        id,
        owner: owner.clone(),
        collateral_type: collateral_type.clone(),
        collateral,
        principal,
        interest_factor: state.interest_factor,
        created_at: now,
        updated_at: now,
    };
    insert_cdp(env, &cdp);

    safe_increment!(state.total_principal, principal);
    save_collateral_state(env, collateral_type, &state);

    CdpEvents::create_cdp(env, &cdp);
    Ok(cdp)
}

pub fn deposit(
    env: &Env,
    owner: &Address,
    depositor: &Address,
    amount: i128,
    collateral_type: &String
) -> Result<Cdp, CdpError> {
    let params = get_collateral_params(env, collateral_type)?;
    let mut cdp = find_cdp(env, owner, collateral_type)?;

    let now = env.ledger().timestamp();
    let state = accrue_interest(env, collateral_type, now)?;
    sync_cdp(env, &mut cdp, &state, now)?;

    token::receive(env, &params.token, depositor, amount);
    safe_increment!(cdp.collateral, amount);
    save_cdp(env, &cdp);

    CdpEvents::deposit(env, &cdp, depositor.clone(), amount);
    Ok(cdp)
}

pub fn withdraw(
    env: &Env,
    owner: &Address,
    depositor: &Address,
    amount: i128,
    collateral_type: &String
) -> Result<Cdp, CdpError> {
    validate!(
        env,
        owner == depositor,
        CdpError::Unauthorized,
        "only the owner can withdraw collateral"
    )?;

    let config = get_config(env)?;
    let params = get_collateral_params(env, collateral_type)?;
    let mut cdp = find_cdp(env, owner, collateral_type)?;

    let now = env.ledger().timestamp();
    let state = accrue_interest(env, collateral_type, now)?;
    sync_cdp(env, &mut cdp, &state, now)?;

    validate!(
        env,
        amount <= cdp.collateral,
        CdpError::InvalidCoins,
        "withdrawal {} exceeds deposited collateral {}",
        amount,
        cdp.collateral
    )?;
    safe_decrement!(cdp.collateral, amount);

    let price = load_price(env, &config, &params, now)?;
    validate_collateral_ratio(env, &params, &price, cdp.collateral, cdp.principal)?;

    token::send(env, &params.token, owner, amount);
    save_cdp(env, &cdp);

    CdpEvents::withdraw(env, &cdp, amount);
    Ok(cdp)
}

pub fn draw_debt(
    env: &Env,
    owner: &Address,
    collateral_type: &String,
    amount: i128
) -> Result<Cdp, CdpError> {
    let config = get_config(env)?;
    let params = get_collateral_params(env, collateral_type)?;
    let mut cdp = find_cdp(env, owner, collateral_type)?;

    let now = env.ledger().timestamp();
    let mut state = accrue_interest(env, collateral_type, now)?;
    sync_cdp(env, &mut cdp, &state, now)?;

    let principal = cdp.principal.safe_add(amount, env)?;
    let price = load_price(env, &config, &params, now)?;
    validate_collateral_ratio(env, &params, &price, cdp.collateral, principal)?;
    validate_debt_limits(env, &config, &params, &state, amount)?;

    token::mint(env, &config.debt_token, owner, amount);

    cdp.principal = principal;
    save_cdp(env, &cdp);
    safe_increment!(state.total_principal, amount);
    save_collateral_state(env, collateral_type, &state);

    CdpEvents::draw_debt(env, &cdp, amount);
    Ok(cdp)
}

/// Repays up to the current debt. A fully repaid CDP returns its collateral
/// to the owner and is deleted; the returned record then holds no collateral.
pub fn repay_debt(
    env: &Env,
    owner: &Address,
    collateral_type: &String,
    payment: i128
) -> Result<Cdp, CdpError> {
    let config = get_config(env)?;
    let params = get_collateral_params(env, collateral_type)?;
    let mut cdp = find_cdp(env, owner, collateral_type)?;

    let now = env.ledger().timestamp();
    let mut state = accrue_interest(env, collateral_type, now)?;
    sync_cdp(env, &mut cdp, &state, now)?;

    let payment = payment.min(cdp.principal);
    let remaining = cdp.principal.safe_sub(payment, env)?;
    validate!(
        env,
        remaining == 0 || remaining >= config.debt_floor,
        CdpError::BelowDebtFloor,
        "remaining debt {} below debt floor {}",
        remaining,
        config.debt_floor
    )?;

    token::receive(env, &config.debt_token, owner, payment);
    token::burn(env, &config.debt_token, payment);

    cdp.principal = remaining;
    // per-position rounding can leave the aggregate a few units short
    state.total_principal = state.total_principal.saturating_sub(payment).max(0);
    save_collateral_state(env, collateral_type, &state);

    CdpEvents::repay_debt(env, &cdp, payment);
    if remaining == 0 {
        token::send(env, &params.token, owner, cdp.collateral);
        remove_cdp(env, &cdp);
        CdpEvents::close_cdp(env, owner.clone(), cdp.id, cdp.collateral);
        cdp.collateral = 0;
    } else {
        save_cdp(env, &cdp);
    }
    Ok(cdp)
}
