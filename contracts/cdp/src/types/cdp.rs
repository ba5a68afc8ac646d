use harbor::{ error::HarborResult, math::interest::apply_interest_factor };
use soroban_sdk::{ contracttype, Address, String, Vec };

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Cdp {
    pub id: u64,
    pub owner: Address,
    pub collateral_type: String,
    /// Escrowed collateral in token base units
    pub collateral: i128,
    /// Debt as of `updated_at`, interest included
    pub principal: i128,
    /// Interest factor of the collateral type when `principal` was last written
    pub interest_factor: u128,
    pub created_at: u64,
    pub updated_at: u64,
}

impl Cdp {
    /// Debt owed under the collateral type's current interest factor
    pub fn current_debt(&self, interest_factor: u128) -> HarborResult<i128> {
        apply_interest_factor(self.principal, interest_factor, self.interest_factor)
    }

    /// Folds accrued interest into the principal and returns the amount added.
    pub fn sync(&mut self, interest_factor: u128, now: u64) -> HarborResult<i128> {
        let debt = self.current_debt(interest_factor)?;
        let accrued = debt - self.principal;
        self.principal = debt;
        self.interest_factor = interest_factor;
        self.updated_at = now;
        Ok(accrued)
    }
}

/// Interest bookkeeping of one collateral type
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CollateralState {
    pub interest_factor: u128,
    /// Per-second factor derived from the annual stability fee
    pub per_second_fee: u128,
    pub last_accrual_time: u64,
    /// Sum of all CDP debts of the type under `interest_factor`
    pub total_principal: i128,
}

/// Protocol balances held in debt tokens
#[contracttype]
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct SystemAccounts {
    pub surplus: i128,
    pub bad_debt: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum LiquidationOutcome {
    /// Ids of the collateral auctions opened for the seized position
    Liquidated(Vec<u64>),
    /// No usable price; the position is left untouched
    Deferred,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TickSummary {
    pub sequence: u32,
    pub liquidated: u32,
    pub deferred: u32,
    pub closed_auctions: u32,
    pub started_auctions: Vec<u64>,
}
