use harbor::validate;
use soroban_sdk::{ contracttype, xdr::{ FromXdr, ToXdr }, Bytes, Env, Map, Vec };

use crate::{
    errors::CdpError,
    types::{
        auction::{ Auction, AuctionKind, CollateralAuction, DebtAuction, SurplusAuction },
        params::AuctionParams,
    },
};

pub const DEFAULT_NEXT_AUCTION_ID: u64 = 1;

/// An auction in interchange form: the kind tag plus the XDR encoding of the
/// kind's record.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PackedAuction {
    pub kind: AuctionKind,
    pub payload: Bytes,
}

/// Auction house state exported from and imported into a ledger
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct GenesisState {
    pub next_auction_id: u64,
    pub params: AuctionParams,
    pub auctions: Vec<PackedAuction>,
}

pub fn pack_auction(env: &Env, auction: &Auction) -> PackedAuction {
    let payload = match auction {
        Auction::Collateral(inner) => inner.clone().to_xdr(env),
        Auction::Debt(inner) => inner.clone().to_xdr(env),
        Auction::Surplus(inner) => inner.clone().to_xdr(env),
    };
    PackedAuction {
        kind: auction.kind(),
        payload,
    }
}

pub fn unpack_auction(env: &Env, packed: &PackedAuction) -> Result<Auction, CdpError> {
    let auction = match packed.kind {
        AuctionKind::Collateral =>
            Auction::Collateral(
                CollateralAuction::from_xdr(env, &packed.payload).map_err(|_| CdpError::EncodingFailure)?
            ),
        AuctionKind::Debt =>
            Auction::Debt(
                DebtAuction::from_xdr(env, &packed.payload).map_err(|_| CdpError::EncodingFailure)?
            ),
        AuctionKind::Surplus =>
            Auction::Surplus(
                SurplusAuction::from_xdr(env, &packed.payload).map_err(|_| CdpError::EncodingFailure)?
            ),
    };
    Ok(auction)
}

pub fn pack_auctions(env: &Env, auctions: &Vec<Auction>) -> Vec<PackedAuction> {
    let mut packed = Vec::new(env);
    for auction in auctions.iter() {
        packed.push_back(pack_auction(env, &auction));
    }
    packed
}

pub fn unpack_auctions(env: &Env, packed: &Vec<PackedAuction>) -> Result<Vec<Auction>, CdpError> {
    let mut auctions = Vec::new(env);
    for entry in packed.iter() {
        auctions.push_back(unpack_auction(env, &entry)?);
    }
    Ok(auctions)
}

impl GenesisState {
    /// Packs `auctions` and validates the resulting state.
    pub fn new(
        env: &Env,
        next_auction_id: u64,
        params: AuctionParams,
        auctions: &Vec<Auction>
    ) -> Result<Self, CdpError> {
        let state = GenesisState {
            next_auction_id,
            params,
            auctions: pack_auctions(env, auctions),
        };
        state.validate(env)?;
        Ok(state)
    }

    pub fn default_genesis(env: &Env) -> Self {
        GenesisState {
            next_auction_id: DEFAULT_NEXT_AUCTION_ID,
            params: AuctionParams::default(),
            auctions: Vec::new(env),
        }
    }

    pub fn unpacked_auctions(&self, env: &Env) -> Result<Vec<Auction>, CdpError> {
        unpack_auctions(env, &self.auctions)
    }

    /// Rejects invalid params, invalid auctions, duplicate ids and ids at or
    /// above `next_auction_id`. Gaps between ids are allowed.
    pub fn validate(&self, env: &Env) -> Result<(), CdpError> {
        self.params.validate(env)?;

        let mut seen: Map<u64, bool> = Map::new(env);
        for auction in self.unpacked_auctions(env)?.iter() {
            auction.validate(env)?;

            let id = auction.id();
            validate!(
                env,
                !seen.contains_key(id),
                CdpError::DuplicateAuctionId,
                "duplicate auction id {}",
                id
            )?;
            seen.set(id, true);

            validate!(
                env,
                id < self.next_auction_id,
                CdpError::AuctionIdTooHigh,
                "auction id {} not below next auction id {}",
                id,
                self.next_auction_id
            )?;
        }
        Ok(())
    }

    /// Deterministic XDR encoding of the whole state
    pub fn canonical_bytes(&self, env: &Env) -> Bytes {
        self.clone().to_xdr(env)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::types::auction::{ AuctionStatus, BaseAuction };
    use soroban_sdk::{ testutils::Address as _, vec, Address, String };

    fn base(env: &Env, id: u64, bid: i128) -> BaseAuction {
        BaseAuction {
            id,
            initiator: Address::generate(env),
            lot_token: Address::generate(env),
            lot: 1_000,
            bid_token: Address::generate(env),
            bid,
            bidder: None,
            end_time: 5_000,
            max_end_time: 90_000,
            bid_duration: 3_600,
            increment: 500_000,
            status: AuctionStatus::Active,
        }
    }

    fn sample_auctions(env: &Env) -> Vec<Auction> {
        vec![
            env,
            Auction::Collateral(CollateralAuction {
                base: base(env, 1, 0),
                collateral_type: String::from_str(env, "BTC-A"),
                corresponding_debt: 500,
                penalty: 25,
                max_bid: 525,
                leftover_receiver: Address::generate(env),
            }),
            Auction::Debt(DebtAuction {
                base: base(env, 4, 300),
                corresponding_debt: 300,
            }),
            Auction::Surplus(SurplusAuction {
                base: base(env, 2, 0),
            })
        ]
    }

    #[test]
    fn pack_then_unpack_is_identity() {
        let env = Env::default();
        let auctions = sample_auctions(&env);

        let packed = pack_auctions(&env, &auctions);
        assert_eq!(packed.len(), 3);
        assert_eq!(packed.get(1).unwrap().kind, AuctionKind::Debt);
        assert_eq!(unpack_auctions(&env, &packed), Ok(auctions));
    }

    #[test]
    fn new_validates_and_keeps_order() {
        let env = Env::default();
        let auctions = sample_auctions(&env);

        let state = GenesisState::new(&env, 5, AuctionParams::default(), &auctions).unwrap();
        assert_eq!(state.unpacked_auctions(&env), Ok(auctions));
        assert_eq!(state.canonical_bytes(&env), state.clone().canonical_bytes(&env));
    }

    #[test]
    fn default_genesis_is_valid() {
        let env = Env::default();
        let state = GenesisState::default_genesis(&env);
        assert_eq!(state.next_auction_id, DEFAULT_NEXT_AUCTION_ID);
        assert_eq!(state.validate(&env), Ok(()));
    }

    #[test]
    fn id_at_next_auction_id_is_rejected() {
        let env = Env::default();
        let auctions = sample_auctions(&env);
        assert_eq!(
            GenesisState::new(&env, 4, AuctionParams::default(), &auctions),
            Err(CdpError::AuctionIdTooHigh)
        );
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let env = Env::default();
        let mut auctions = sample_auctions(&env);
        auctions.push_back(
            Auction::Surplus(SurplusAuction {
                base: base(&env, 1, 0),
            })
        );
        assert_eq!(
            GenesisState::new(&env, 10, AuctionParams::default(), &auctions),
            Err(CdpError::DuplicateAuctionId)
        );
    }

    #[test]
    fn invalid_auction_is_rejected() {
        let env = Env::default();
        let mut broken = base(&env, 1, 0);
        broken.end_time = broken.max_end_time + 1;
        let auctions = vec![&env, Auction::Surplus(SurplusAuction { base: broken })];
        assert_eq!(
            GenesisState::new(&env, 10, AuctionParams::default(), &auctions),
            Err(CdpError::InvalidAuction)
        );
    }

    #[test]
    fn invalid_params_are_rejected() {
        let env = Env::default();
        let params = AuctionParams {
            increment_debt: 0,
            ..AuctionParams::default()
        };
        assert_eq!(
            GenesisState::new(&env, 1, params, &Vec::new(&env)),
            Err(CdpError::InvalidParams)
        );
    }
}
