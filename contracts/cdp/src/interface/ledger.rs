use soroban_sdk::{ Address, Env, String, Vec };

use crate::{
    errors::CdpError,
    msg::{ MsgCreateCdp, MsgDeposit, MsgDrawDebt, MsgLiquidate, MsgRepayDebt, MsgWithdraw },
    types::{
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

pub trait CdpLedgerTrait {
    // ################################################################
    //                             Admin
    // ################################################################

    fn initialize(
        env: Env,
        config: LedgerConfig,
        collateral_params: Vec<CollateralParams>,
        genesis: GenesisState
    );

    fn set_collateral_params(env: Env, params: CollateralParams) -> Result<(), CdpError>;

    fn update_config(env: Env, update: ConfigUpdate) -> Result<LedgerConfig, CdpError>;

    // ################################################################
    //                             User
    // ################################################################

    fn create_cdp(env: Env, msg: MsgCreateCdp) -> Result<Cdp, CdpError>;

    fn deposit(env: Env, msg: MsgDeposit) -> Result<Cdp, CdpError>;

    fn withdraw(env: Env, msg: MsgWithdraw) -> Result<Cdp, CdpError>;

    fn draw_debt(env: Env, msg: MsgDrawDebt) -> Result<Cdp, CdpError>;

    fn repay_debt(env: Env, msg: MsgRepayDebt) -> Result<Cdp, CdpError>;

    // ################################################################
    //                             Keeper
    // ################################################################

    fn liquidate(env: Env, msg: MsgLiquidate) -> Result<LiquidationOutcome, CdpError>;

    fn tick(env: Env) -> Result<TickSummary, CdpError>;

    // ################################################################
    //                             Queries
    // ################################################################

    fn get_config(env: Env) -> Result<LedgerConfig, CdpError>;

    fn get_collateral_params(env: Env, collateral_type: String) -> Result<CollateralParams, CdpError>;

    fn get_collateral_state(env: Env, collateral_type: String) -> Result<CollateralState, CdpError>;

    fn get_cdp(env: Env, owner: Address, collateral_type: String) -> Result<Cdp, CdpError>;

    fn get_cdp_by_id(env: Env, cdp_id: u64) -> Result<Cdp, CdpError>;

    fn get_current_debt(env: Env, owner: Address, collateral_type: String) -> Result<i128, CdpError>;

    fn get_accounts(env: Env) -> SystemAccounts;

    fn next_cdp_id(env: Env) -> u64;
}
