use harbor::{ math::interest::accumulate_interest_factor, validate };
use soroban_sdk::{
    contract,
    contractimpl,
    contractmeta,
    log,
    panic_with_error,
    Address,
    Env,
    IntoVal,
    Map,
    String,
    Vec,
};

use crate::{
    controller,
    errors::CdpError,
    events::CdpEvents,
    interface::{ auction_house::AuctionHouseTrait, ledger::CdpLedgerTrait },
    msg::{
        Msg,
        MsgCreateCdp,
        MsgDeposit,
        MsgDrawDebt,
        MsgLiquidate,
        MsgPlaceBid,
        MsgRepayDebt,
        MsgWithdraw,
    },
    storage::{
        bump_instance,
        get_accounts,
        get_auction_params,
        get_cdp,
        get_collateral_params,
        get_collateral_state,
        get_collateral_types,
        get_config,
        get_next_auction_id,
        get_next_cdp_id,
        insert_auction,
        is_initialized,
        save_accounts,
        save_auction_params,
        save_collateral_params,
        save_collateral_state,
        save_config,
        set_initialized,
        set_next_auction_id,
    },
    types::{
        genesis::pack_auctions,
        Auction,
        AuctionParams,
        AuctionQuery,
        Cdp,
        CollateralParams,
        CollateralState,
        ConfigUpdate,
        GenesisState,
        LedgerConfig,
        LiquidationOutcome,
        SystemAccounts,
        TickSummary,
    },
};

contractmeta!(
    key = "Description",
    val = "Collateralized debt positions with liquidation and protocol auctions"
);

#[contract]
pub struct HarborCdp;

/// Runs the stateless checks of `msg` and requires its signer to have
/// authorized the message's canonical bytes.
fn authorize<M: Msg>(env: &Env, msg: &M) -> Result<Address, CdpError> {
    msg.validate_basic(env)?;
    let signer = msg.signer(env)?;
    signer.require_auth_for_args((msg.sign_bytes(env),).into_val(env));
    Ok(signer)
}

fn require_admin(env: &Env) -> Result<LedgerConfig, CdpError> {
    let config = get_config(env)?;
    config.admin.require_auth();
    Ok(config)
}

fn unwrap_or_panic<T>(env: &Env, result: Result<T, CdpError>) -> T {
    match result {
        Ok(value) => value,
        Err(error) => panic_with_error!(env, error),
    }
}

/// Loads `genesis` into the auction house. The ledger must already hold every
/// coin the imported auctions escrow.
fn import_genesis(env: &Env, genesis: &GenesisState) -> Result<u32, CdpError> {
    genesis.validate(env)?;
    let auctions = genesis.unpacked_auctions(env)?;

    let mut escrowed: Map<Address, i128> = Map::new(env);
    for auction in auctions.iter() {
        auction.add_escrowed_coins(&mut escrowed)?;
    }
    for (token, amount) in escrowed.iter() {
        let held = controller::token::balance(env, &token);
        validate!(
            env,
            held >= amount,
            CdpError::GenesisBalanceMismatch,
            "ledger holds {} but genesis auctions escrow {}",
            held,
            amount
        )?;
    }

    save_auction_params(env, &genesis.params);
    for auction in auctions.iter() {
        insert_auction(env, &auction);
    }
    set_next_auction_id(env, genesis.next_auction_id);
    Ok(auctions.len())
}

#[contractimpl]
impl CdpLedgerTrait for HarborCdp {
    // ################################################################
    //                             Admin
    // ################################################################

    fn initialize(
        env: Env,
        config: LedgerConfig,
        collateral_params: Vec<CollateralParams>,
        genesis: GenesisState
    ) {
        if is_initialized(&env) {
            log!(&env, "Harbor: Initialize: initializing contract twice is not allowed");
            panic_with_error!(&env, CdpError::AlreadyInitialized);
        }
        config.admin.require_auth();
        unwrap_or_panic(&env, config.validate(&env));

        let now = env.ledger().timestamp();
        save_config(&env, &config);
        for params in collateral_params.iter() {
            unwrap_or_panic(&env, params.validate(&env));
            let state = unwrap_or_panic(&env, controller::interest::new_collateral_state(&params, now));
            save_collateral_params(&env, &params);
            save_collateral_state(&env, &params.collateral_type, &state);
        }

        let genesis_auctions = unwrap_or_panic(&env, import_genesis(&env, &genesis));
        save_accounts(&env, &SystemAccounts::default());
        set_initialized(&env);
        bump_instance(&env);

        CdpEvents::initialize(
            &env,
            config.admin,
            config.debt_token,
            config.gov_token,
            collateral_params.len(),
            genesis_auctions
        );
    }

    fn set_collateral_params(env: Env, params: CollateralParams) -> Result<(), CdpError> {
        require_admin(&env)?;
        params.validate(&env)?;
        bump_instance(&env);

        let now = env.ledger().timestamp();
        let state = if get_collateral_types(&env).contains(&params.collateral_type) {
            controller::interest::update_stability_fee(&env, &params, now)?
        } else {
            let state = controller::interest::new_collateral_state(&params, now)?;
            save_collateral_state(&env, &params.collateral_type, &state);
            state
        };
        save_collateral_params(&env, &params);

        CdpEvents::collateral_params(
            &env,
            params.collateral_type,
            params.stability_fee,
            state.per_second_fee
        );
        Ok(())
    }

    fn update_config(env: Env, update: ConfigUpdate) -> Result<LedgerConfig, CdpError> {
        let mut config = require_admin(&env)?;
        config.apply(update);
        config.validate(&env)?;
        save_config(&env, &config);
        bump_instance(&env);
        Ok(config)
    }

    // ################################################################
    //                             User
    // ################################################################

    fn create_cdp(env: Env, msg: MsgCreateCdp) -> Result<Cdp, CdpError> {
        let owner = authorize(&env, &msg)?;
        bump_instance(&env);
        controller::cdp::create_cdp(&env, &owner, msg.collateral, msg.principal, &msg.collateral_type)
    }

    fn deposit(env: Env, msg: MsgDeposit) -> Result<Cdp, CdpError> {
        let depositor = authorize(&env, &msg)?;
        let owner = harbor::utils::parse_address(&env, &msg.owner)?;
        bump_instance(&env);
        controller::cdp::deposit(&env, &owner, &depositor, msg.collateral, &msg.collateral_type)
    }

    fn withdraw(env: Env, msg: MsgWithdraw) -> Result<Cdp, CdpError> {
        let depositor = authorize(&env, &msg)?;
        let owner = harbor::utils::parse_address(&env, &msg.owner)?;
        bump_instance(&env);
        controller::cdp::withdraw(&env, &owner, &depositor, msg.collateral, &msg.collateral_type)
    }

    fn draw_debt(env: Env, msg: MsgDrawDebt) -> Result<Cdp, CdpError> {
        let owner = authorize(&env, &msg)?;
        bump_instance(&env);
        controller::cdp::draw_debt(&env, &owner, &msg.collateral_type, msg.principal)
    }

    fn repay_debt(env: Env, msg: MsgRepayDebt) -> Result<Cdp, CdpError> {
        let owner = authorize(&env, &msg)?;
        bump_instance(&env);
        controller::cdp::repay_debt(&env, &owner, &msg.collateral_type, msg.payment)
    }

    // ################################################################
    //                             Keeper
    // ################################################################

    fn liquidate(env: Env, msg: MsgLiquidate) -> Result<LiquidationOutcome, CdpError> {
        let keeper = authorize(&env, &msg)?;
        let borrower = harbor::utils::parse_address(&env, &msg.borrower)?;
        bump_instance(&env);
        controller::liquidation::liquidate(&env, &keeper, &borrower, &msg.collateral_type)
    }

    fn tick(env: Env) -> Result<TickSummary, CdpError> {
        bump_instance(&env);
        controller::tick::tick(&env)
    }

    // ################################################################
    //                             Queries
    // ################################################################

    fn get_config(env: Env) -> Result<LedgerConfig, CdpError> {
        get_config(&env)
    }

    fn get_collateral_params(env: Env, collateral_type: String) -> Result<CollateralParams, CdpError> {
        get_collateral_params(&env, &collateral_type)
    }

    fn get_collateral_state(env: Env, collateral_type: String) -> Result<CollateralState, CdpError> {
        get_collateral_state(&env, &collateral_type)
    }

    fn get_cdp(env: Env, owner: Address, collateral_type: String) -> Result<Cdp, CdpError> {
        controller::cdp::find_cdp(&env, &owner, &collateral_type)
    }

    fn get_cdp_by_id(env: Env, cdp_id: u64) -> Result<Cdp, CdpError> {
        get_cdp(&env, cdp_id).ok_or(CdpError::NotFound)
    }

    /// Debt of the CDP including interest accrued since the last accrual,
    /// without writing state.
    fn get_current_debt(env: Env, owner: Address, collateral_type: String) -> Result<i128, CdpError> {
        let cdp = controller::cdp::find_cdp(&env, &owner, &collateral_type)?;
        let state = get_collateral_state(&env, &collateral_type)?;
        let now = env.ledger().timestamp();
        let elapsed = now.saturating_sub(state.last_accrual_time);
        let factor = accumulate_interest_factor(state.interest_factor, state.per_second_fee, elapsed)?;
        Ok(cdp.current_debt(factor)?)
    }

    fn get_accounts(env: Env) -> SystemAccounts {
        get_accounts(&env)
    }

    fn next_cdp_id(env: Env) -> u64 {
        get_next_cdp_id(&env)
    }
}

#[contractimpl]
impl AuctionHouseTrait for HarborCdp {
    // ################################################################
    //                             Admin
    // ################################################################

    fn set_auction_params(env: Env, params: AuctionParams) -> Result<(), CdpError> {
        require_admin(&env)?;
        params.validate(&env)?;
        save_auction_params(&env, &params);
        bump_instance(&env);
        Ok(())
    }

    fn start_surplus_auction(env: Env, lot: i128) -> Result<u64, CdpError> {
        require_admin(&env)?;
        bump_instance(&env);
        controller::auction::start_surplus_auction(&env, lot)
    }

    fn start_debt_auction(env: Env, debt: i128, initial_lot: i128) -> Result<u64, CdpError> {
        require_admin(&env)?;
        bump_instance(&env);
        controller::auction::start_debt_auction(&env, debt, initial_lot)
    }

    // ################################################################
    //                             User
    // ################################################################

    fn place_bid(env: Env, msg: MsgPlaceBid) -> Result<Auction, CdpError> {
        let bidder = authorize(&env, &msg)?;
        bump_instance(&env);
        controller::auction::place_bid(&env, msg.auction_id, &bidder, msg.amount)
    }

    fn close_auction(env: Env, auction_id: u64) -> Result<Auction, CdpError> {
        bump_instance(&env);
        let (auction, _) = controller::auction::close_auction(&env, auction_id)?;
        Ok(auction)
    }

    // ################################################################
    //                             Queries
    // ################################################################

    fn get_auction(env: Env, auction_id: u64) -> Result<Auction, CdpError> {
        controller::auction::find_auction(&env, auction_id)
    }

    fn list_auctions(env: Env, query: AuctionQuery) -> Vec<Auction> {
        controller::auction::list_auctions(&env, &query)
    }

    fn get_auction_params(env: Env) -> AuctionParams {
        get_auction_params(&env)
    }

    fn next_auction_id(env: Env) -> u64 {
        get_next_auction_id(&env)
    }

    fn export_genesis(env: Env) -> GenesisState {
        let auctions = controller::auction::list_auctions(&env, &AuctionQuery::all(&env));
        GenesisState {
            next_auction_id: get_next_auction_id(&env),
            params: get_auction_params(&env),
            auctions: pack_auctions(&env, &auctions),
        }
    }
}
