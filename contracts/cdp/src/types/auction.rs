use harbor::{ constants::SCALAR_7, validate };
use soroban_sdk::{ contracttype, Address, Env, Map, String, Vec };

use crate::errors::CdpError;

#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum AuctionKind {
    Collateral = 0,
    Debt = 1,
    Surplus = 2,
}

#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum AuctionStatus {
    Active = 0,
    Closed = 1,
}

/// Forward auctions compete on bid size, reverse auctions on lot size
#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum AuctionPhase {
    Forward = 0,
    Reverse = 1,
}

/// Fields shared by every auction kind
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct BaseAuction {
    pub id: u64,
    pub initiator: Address,
    pub lot_token: Address,
    pub lot: i128,
    pub bid_token: Address,
    pub bid: i128,
    pub bidder: Option<Address>,
    pub end_time: u64,
    pub max_end_time: u64,
    /// Extension granted by each accepted bid
    pub bid_duration: u64,
    /// Minimum relative bid step, `SCALAR_7`
    pub increment: i128,
    pub status: AuctionStatus,
}

impl BaseAuction {
    pub fn has_received_bids(&self) -> bool {
        self.bidder.is_some()
    }

    pub fn is_expired(&self, now: u64) -> bool {
        now >= self.end_time
    }

    /// Pushes the end time out by one bid duration, never past `max_end_time`.
    pub fn extend(&mut self, now: u64) {
        self.end_time = now.saturating_add(self.bid_duration).min(self.max_end_time);
    }

    pub fn validate(&self, env: &Env) -> Result<(), CdpError> {
        validate!(
            env,
            self.lot >= 0 && self.bid >= 0,
            CdpError::InvalidAuction,
            "auction {} has negative coins",
            self.id
        )?;
        validate!(
            env,
            self.end_time > 0 && self.end_time <= self.max_end_time,
            CdpError::InvalidAuction,
            "auction {} end time after max end time",
            self.id
        )?;
        validate!(
            env,
            self.bid_duration > 0,
            CdpError::InvalidAuction,
            "auction {} has no bid duration",
            self.id
        )?;
        validate!(
            env,
            self.increment > 0 && self.increment < SCALAR_7,
            CdpError::InvalidAuction,
            "auction {} increment out of range",
            self.id
        )?;
        validate!(
            env,
            self.status == AuctionStatus::Active,
            CdpError::InvalidAuction,
            "auction {} is not active",
            self.id
        )
    }
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CollateralAuction {
    pub base: BaseAuction,
    pub collateral_type: String,
    /// Debt seized with the lot
    pub corresponding_debt: i128,
    pub penalty: i128,
    /// `corresponding_debt + penalty`; reaching it flips the auction to reverse
    pub max_bid: i128,
    /// Original CDP owner, receives excess proceeds and returned collateral
    pub leftover_receiver: Address,
}

impl CollateralAuction {
    pub fn phase(&self) -> AuctionPhase {
        if self.base.bid >= self.max_bid {
            AuctionPhase::Reverse
        } else {
            AuctionPhase::Forward
        }
    }

    pub fn validate(&self, env: &Env) -> Result<(), CdpError> {
        self.base.validate(env)?;
        validate!(
            env,
            self.corresponding_debt >= 0 && self.penalty >= 0,
            CdpError::InvalidAuction,
            "collateral auction {} has negative debt",
            self.base.id
        )?;
        validate!(
            env,
            self.corresponding_debt.checked_add(self.penalty) == Some(self.max_bid),
            CdpError::InvalidAuction,
            "collateral auction {} max bid is not debt plus penalty",
            self.base.id
        )?;
        validate!(
            env,
            self.base.bid <= self.max_bid,
            CdpError::InvalidAuction,
            "collateral auction {} bid above max bid",
            self.base.id
        )?;
        validate!(
            env,
            self.base.has_received_bids() || self.base.bid == 0,
            CdpError::InvalidAuction,
            "collateral auction {} has a bid without bidder",
            self.base.id
        )
    }
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DebtAuction {
    pub base: BaseAuction,
    /// Debt tokens raised by the winning bid, equal to the fixed bid
    pub corresponding_debt: i128,
}

impl DebtAuction {
    pub fn validate(&self, env: &Env) -> Result<(), CdpError> {
        self.base.validate(env)?;
        validate!(
            env,
            self.corresponding_debt > 0 && self.base.bid == self.corresponding_debt,
            CdpError::InvalidAuction,
            "debt auction {} bid must equal its debt",
            self.base.id
        )
    }
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SurplusAuction {
    pub base: BaseAuction,
}

impl SurplusAuction {
    pub fn validate(&self, env: &Env) -> Result<(), CdpError> {
        self.base.validate(env)?;
        validate!(
            env,
            self.base.has_received_bids() || self.base.bid == 0,
            CdpError::InvalidAuction,
            "surplus auction {} has a bid without bidder",
            self.base.id
        )
    }
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Auction {
    Collateral(CollateralAuction),
    Debt(DebtAuction),
    Surplus(SurplusAuction),
}

impl Auction {
    pub fn base(&self) -> &BaseAuction {
        match self {
            Auction::Collateral(auction) => &auction.base,
            Auction::Debt(auction) => &auction.base,
            Auction::Surplus(auction) => &auction.base,
        }
    }

    pub fn base_mut(&mut self) -> &mut BaseAuction {
        match self {
            Auction::Collateral(auction) => &mut auction.base,
            Auction::Debt(auction) => &mut auction.base,
            Auction::Surplus(auction) => &mut auction.base,
        }
    }

    pub fn id(&self) -> u64 {
        self.base().id
    }

    pub fn kind(&self) -> AuctionKind {
        match self {
            Auction::Collateral(_) => AuctionKind::Collateral,
            Auction::Debt(_) => AuctionKind::Debt,
            Auction::Surplus(_) => AuctionKind::Surplus,
        }
    }

    pub fn phase(&self) -> AuctionPhase {
        match self {
            Auction::Collateral(auction) => auction.phase(),
            Auction::Debt(_) => AuctionPhase::Reverse,
            Auction::Surplus(_) => AuctionPhase::Forward,
        }
    }

    pub fn validate(&self, env: &Env) -> Result<(), CdpError> {
        match self {
            Auction::Collateral(auction) => auction.validate(env),
            Auction::Debt(auction) => auction.validate(env),
            Auction::Surplus(auction) => auction.validate(env),
        }
    }

    /// Adds the coins this auction keeps in the ledger's custody to `totals`.
    /// Debt auction lots are minted at close and are not escrowed.
    pub fn add_escrowed_coins(&self, totals: &mut Map<Address, i128>) -> Result<(), CdpError> {
        let base = self.base();
        if self.kind() != AuctionKind::Debt {
            add_coins(totals, &base.lot_token, base.lot)?;
        }
        if base.has_received_bids() {
            add_coins(totals, &base.bid_token, base.bid)?;
        }
        Ok(())
    }

    pub fn matches(&self, query: &AuctionQuery) -> bool {
        if !query.kinds.is_empty() && !query.kinds.contains(self.kind()) {
            return false;
        }
        if let Some(owner) = &query.owner {
            match self {
                Auction::Collateral(auction) if &auction.leftover_receiver == owner => {}
                _ => {
                    return false;
                }
            }
        }
        if let Some(lot_token) = &query.lot_token {
            if &self.base().lot_token != lot_token {
                return false;
            }
        }
        if !query.phases.is_empty() && !query.phases.contains(self.phase()) {
            return false;
        }
        true
    }
}

fn add_coins(totals: &mut Map<Address, i128>, token: &Address, amount: i128) -> Result<(), CdpError> {
    if amount == 0 {
        return Ok(());
    }
    let current = totals.get(token.clone()).unwrap_or(0);
    let total = current.checked_add(amount).ok_or(CdpError::MathError)?;
    totals.set(token.clone(), total);
    Ok(())
}

/// Filter for listing active auctions. Empty lists and `None` fields match
/// everything.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AuctionQuery {
    pub kinds: Vec<AuctionKind>,
    /// Leftover receiver of collateral auctions
    pub owner: Option<Address>,
    pub lot_token: Option<Address>,
    pub phases: Vec<AuctionPhase>,
}

impl AuctionQuery {
    pub fn all(env: &Env) -> Self {
        AuctionQuery {
            kinds: Vec::new(env),
            owner: None,
            lot_token: None,
            phases: Vec::new(env),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use soroban_sdk::{ testutils::Address as _, vec };

    fn base(env: &Env, id: u64) -> BaseAuction {
        BaseAuction {
            id,
            initiator: Address::generate(env),
            lot_token: Address::generate(env),
            lot: 100,
            bid_token: Address::generate(env),
            bid: 0,
            bidder: None,
            end_time: 1_000,
            max_end_time: 2_000,
            bid_duration: 600,
            increment: 500_000,
            status: AuctionStatus::Active,
        }
    }

    fn collateral_auction(env: &Env, id: u64) -> CollateralAuction {
        CollateralAuction {
            base: base(env, id),
            collateral_type: String::from_str(env, "BTC-A"),
            corresponding_debt: 50,
            penalty: 2,
            max_bid: 52,
            leftover_receiver: Address::generate(env),
        }
    }

    #[test]
    fn extend_is_capped_by_max_end_time() {
        let env = Env::default();
        let mut auction = base(&env, 1);
        auction.extend(900);
        assert_eq!(auction.end_time, 1_500);
        auction.extend(1_700);
        assert_eq!(auction.end_time, 2_000);
        assert!(auction.is_expired(2_000));
    }

    #[test]
    fn collateral_phase_follows_max_bid() {
        let env = Env::default();
        let mut auction = collateral_auction(&env, 1);
        assert_eq!(auction.phase(), AuctionPhase::Forward);
        auction.base.bid = 52;
        auction.base.bidder = Some(Address::generate(&env));
        assert_eq!(auction.phase(), AuctionPhase::Reverse);
        assert_eq!(auction.validate(&env), Ok(()));
    }

    #[test]
    fn invalid_auctions_are_rejected() {
        let env = Env::default();

        let mut auction = collateral_auction(&env, 1);
        auction.base.end_time = 3_000;
        assert_eq!(auction.validate(&env), Err(CdpError::InvalidAuction));

        let mut auction = collateral_auction(&env, 1);
        auction.max_bid = 60;
        assert_eq!(auction.validate(&env), Err(CdpError::InvalidAuction));

        let mut auction = collateral_auction(&env, 1);
        auction.base.bid = 10;
        assert_eq!(auction.validate(&env), Err(CdpError::InvalidAuction));

        let debt = DebtAuction {
            base: base(&env, 2),
            corresponding_debt: 40,
        };
        assert_eq!(debt.validate(&env), Err(CdpError::InvalidAuction));
    }

    #[test]
    fn escrowed_coins_skip_debt_lots() {
        let env = Env::default();
        let mut totals = Map::new(&env);

        let collateral = Auction::Collateral(collateral_auction(&env, 1));
        collateral.add_escrowed_coins(&mut totals).unwrap();

        let mut debt_base = base(&env, 2);
        debt_base.bid = 40;
        debt_base.bidder = Some(Address::generate(&env));
        let debt = Auction::Debt(DebtAuction {
            base: debt_base.clone(),
            corresponding_debt: 40,
        });
        debt.add_escrowed_coins(&mut totals).unwrap();

        assert_eq!(totals.get(collateral.base().lot_token.clone()), Some(100));
        assert_eq!(totals.get(debt_base.lot_token.clone()), None);
        assert_eq!(totals.get(debt_base.bid_token.clone()), Some(40));
    }

    #[test]
    fn query_filters() {
        let env = Env::default();
        let collateral = collateral_auction(&env, 1);
        let owner = collateral.leftover_receiver.clone();
        let auction = Auction::Collateral(collateral);

        assert!(auction.matches(&AuctionQuery::all(&env)));
        assert!(
            auction.matches(&AuctionQuery {
                kinds: vec![&env, AuctionKind::Debt, AuctionKind::Collateral],
                owner: Some(owner),
                phases: vec![&env, AuctionPhase::Forward],
                ..AuctionQuery::all(&env)
            })
        );
        assert!(
            !auction.matches(&AuctionQuery {
                kinds: vec![&env, AuctionKind::Surplus],
                ..AuctionQuery::all(&env)
            })
        );
        assert!(
            !auction.matches(&AuctionQuery {
                phases: vec![&env, AuctionPhase::Reverse],
                ..AuctionQuery::all(&env)
            })
        );
        assert!(
            !auction.matches(&AuctionQuery {
                owner: Some(Address::generate(&env)),
                ..AuctionQuery::all(&env)
            })
        );
    }
}
