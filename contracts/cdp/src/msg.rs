//! Signed user messages.
//!
//! Addresses travel as strkey strings exactly as the signer produced them and
//! are parsed during `validate_basic`, so malformed input fails with
//! `InvalidAddress` instead of trapping.

use harbor::{ utils::parse_address, validate };
use soroban_sdk::{ contracttype, xdr::ToXdr, Address, Bytes, Env, IntoVal, String, Val };

use crate::{ errors::CdpError, types::params::validate_collateral_type };

pub trait Msg: Clone + IntoVal<Env, Val> {
    /// Stable message name
    const TYPE: &'static str;

    /// Stateless checks, run before any storage access.
    fn validate_basic(&self, env: &Env) -> Result<(), CdpError>;

    /// Account whose authorization the message requires
    fn signer(&self, env: &Env) -> Result<Address, CdpError>;

    /// Canonical bytes covered by the signature: the message type followed
    /// by the XDR encoding of the message.
    fn sign_bytes(&self, env: &Env) -> Bytes {
        let mut bytes = Bytes::from_slice(env, Self::TYPE.as_bytes());
        bytes.append(&self.clone().to_xdr(env));
        bytes
    }
}

fn parse(env: &Env, strkey: &String) -> Result<Address, CdpError> {
    Ok(parse_address(env, strkey)?)
}

fn validate_positive(env: &Env, amount: i128) -> Result<(), CdpError> {
    validate!(env, amount > 0, CdpError::InvalidCoins, "amount must be positive: {}", amount)
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MsgCreateCdp {
    pub sender: String,
    pub collateral: i128,
    pub principal: i128,
    pub collateral_type: String,
}

impl Msg for MsgCreateCdp {
    const TYPE: &'static str = "create_cdp";

    fn validate_basic(&self, env: &Env) -> Result<(), CdpError> {
        parse(env, &self.sender)?;
        validate_positive(env, self.collateral)?;
        validate_positive(env, self.principal)?;
        validate_collateral_type(env, &self.collateral_type)
    }

    fn signer(&self, env: &Env) -> Result<Address, CdpError> {
        parse(env, &self.sender)
    }
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MsgDeposit {
    pub owner: String,
    pub depositor: String,
    pub collateral: i128,
    pub collateral_type: String,
}

impl Msg for MsgDeposit {
    const TYPE: &'static str = "deposit";

    fn validate_basic(&self, env: &Env) -> Result<(), CdpError> {
        parse(env, &self.owner)?;
        parse(env, &self.depositor)?;
        validate_positive(env, self.collateral)?;
        validate_collateral_type(env, &self.collateral_type)
    }

    fn signer(&self, env: &Env) -> Result<Address, CdpError> {
        parse(env, &self.depositor)
    }
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MsgWithdraw {
    pub owner: String,
    pub depositor: String,
    pub collateral: i128,
    pub collateral_type: String,
}

impl Msg for MsgWithdraw {
    const TYPE: &'static str = "withdraw";

    fn validate_basic(&self, env: &Env) -> Result<(), CdpError> {
        parse(env, &self.owner)?;
        parse(env, &self.depositor)?;
        validate_positive(env, self.collateral)?;
        validate_collateral_type(env, &self.collateral_type)
    }

    fn signer(&self, env: &Env) -> Result<Address, CdpError> {
        parse(env, &self.depositor)
    }
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MsgDrawDebt {
    pub sender: String,
    pub collateral_type: String,
    pub principal: i128,
}

impl Msg for MsgDrawDebt {
    const TYPE: &'static str = "draw_debt";

    fn validate_basic(&self, env: &Env) -> Result<(), CdpError> {
        parse(env, &self.sender)?;
        validate_positive(env, self.principal)?;
        validate_collateral_type(env, &self.collateral_type)
    }

    fn signer(&self, env: &Env) -> Result<Address, CdpError> {
        parse(env, &self.sender)
    }
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MsgRepayDebt {
    pub sender: String,
    pub collateral_type: String,
    pub payment: i128,
}

impl Msg for MsgRepayDebt {
    const TYPE: &'static str = "repay_debt";

    fn validate_basic(&self, env: &Env) -> Result<(), CdpError> {
        parse(env, &self.sender)?;
        validate_positive(env, self.payment)?;
        validate_collateral_type(env, &self.collateral_type)
    }

    fn signer(&self, env: &Env) -> Result<Address, CdpError> {
        parse(env, &self.sender)
    }
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MsgLiquidate {
    pub keeper: String,
    pub borrower: String,
    pub collateral_type: String,
}

impl Msg for MsgLiquidate {
    const TYPE: &'static str = "liquidate";

    fn validate_basic(&self, env: &Env) -> Result<(), CdpError> {
        parse(env, &self.keeper)?;
        parse(env, &self.borrower)?;
        validate_collateral_type(env, &self.collateral_type)
    }

    fn signer(&self, env: &Env) -> Result<Address, CdpError> {
        parse(env, &self.keeper)
    }
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MsgPlaceBid {
    pub auction_id: u64,
    pub bidder: String,
    /// Bid for forward auctions, lot for reverse auctions
    pub amount: i128,
}

impl Msg for MsgPlaceBid {
    const TYPE: &'static str = "place_bid";

    fn validate_basic(&self, env: &Env) -> Result<(), CdpError> {
        parse(env, &self.bidder)?;
        validate!(
            env,
            self.amount >= 0,
            CdpError::InvalidCoins,
            "bid amount cannot be negative: {}",
            self.amount
        )
    }

    fn signer(&self, env: &Env) -> Result<Address, CdpError> {
        parse(env, &self.bidder)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    const OWNER: &str = "CCZ4RN7UHYPZC7D2KUIA5VAMNEMJLGSHVDXLY3MAM57O2DM5B3FRC63U";
    const KEEPER: &str = "CC363OS7X3V7ZS2OHP5WQVHJ7ENYDFXR43FN5HKITXDCIQT44QJH564N";

    fn create_msg(env: &Env, sender: &str, collateral: i128, principal: i128, collateral_type: &str) -> MsgCreateCdp {
        MsgCreateCdp {
            sender: String::from_str(env, sender),
            collateral,
            principal,
            collateral_type: String::from_str(env, collateral_type),
        }
    }

    #[test]
    fn create_cdp_validate_basic() {
        let env = Env::default();
        assert_eq!(create_msg(&env, OWNER, 100, 50, "BTC-A").validate_basic(&env), Ok(()));
        assert_eq!(
            create_msg(&env, "not-an-address", 100, 50, "BTC-A").validate_basic(&env),
            Err(CdpError::InvalidAddress)
        );
        assert_eq!(
            create_msg(&env, OWNER, 0, 50, "BTC-A").validate_basic(&env),
            Err(CdpError::InvalidCoins)
        );
        assert_eq!(
            create_msg(&env, OWNER, 100, -1, "BTC-A").validate_basic(&env),
            Err(CdpError::InvalidCoins)
        );
        assert_eq!(
            create_msg(&env, OWNER, 100, 50, "  ").validate_basic(&env),
            Err(CdpError::EmptyCollateralType)
        );
    }

    #[test]
    fn signer_is_the_parsed_sender() {
        let env = Env::default();
        let msg = MsgLiquidate {
            keeper: String::from_str(&env, KEEPER),
            borrower: String::from_str(&env, OWNER),
            collateral_type: String::from_str(&env, "BTC-A"),
        };
        assert_eq!(msg.validate_basic(&env), Ok(()));
        assert_eq!(msg.signer(&env), Ok(Address::from_string(&String::from_str(&env, KEEPER))));
        assert_eq!(MsgLiquidate::TYPE, "liquidate");
    }

    #[test]
    fn sign_bytes_are_deterministic() {
        let env = Env::default();
        let msg = create_msg(&env, OWNER, 100, 50, "BTC-A");
        assert_eq!(msg.sign_bytes(&env), msg.clone().sign_bytes(&env));
        assert_ne!(msg.sign_bytes(&env), create_msg(&env, OWNER, 100, 51, "BTC-A").sign_bytes(&env));
    }

    #[test]
    fn place_bid_allows_zero_lot() {
        let env = Env::default();
        let msg = MsgPlaceBid {
            auction_id: 1,
            bidder: String::from_str(&env, KEEPER),
            amount: 0,
        };
        assert_eq!(msg.validate_basic(&env), Ok(()));

        let negative = MsgPlaceBid { amount: -1, ..msg };
        assert_eq!(negative.validate_basic(&env), Err(CdpError::InvalidCoins));
    }
}
