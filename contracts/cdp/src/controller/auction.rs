use harbor::{ constants::SCALAR_7, safe_decrement, safe_increment, validate };
use soroban_fixed_point_math::FixedPoint;
use soroban_sdk::{ log, Address, Env, Vec };

use crate::{
    controller::{ tick::next_batch, token },
    errors::CdpError,
    events::AuctionEvents,
    storage::{
        get_accounts,
        get_auction,
        get_auction_index,
        get_auction_params,
        get_auction_scan_cursor,
        get_collateral_params,
        get_config,
        get_next_auction_id,
        has_auction,
        insert_auction,
        remove_auction,
        save_accounts,
        save_auction,
        set_auction_scan_cursor,
        set_next_auction_id,
    },
    types::{
        params::DEFAULT_MAX_AUCTION_DURATION,
        Auction,
        AuctionPhase,
        AuctionQuery,
        AuctionStatus,
        BaseAuction,
        CollateralAuction,
        CollateralParams,
        DebtAuction,
        LedgerConfig,
        SurplusAuction,
        TickSummary,
    },
};

// ################################################################
//                             Start
// ################################################################

fn take_auction_id(env: &Env) -> Result<u64, CdpError> {
    let id = get_next_auction_id(env);
    validate!(env, !has_auction(env, id), CdpError::DuplicateAuctionId, "auction {} already exists", id)?;
    set_next_auction_id(env, id.checked_add(1).ok_or(CdpError::MathError)?);
    Ok(id)
}

fn open_auction(env: &Env, auction: &Auction) {
    insert_auction(env, auction);
    AuctionEvents::auction_start(env, auction);
}

/// Splits a seized position into collateral auctions of at most
/// `auction_size` collateral each. Debt and penalty are divided pro-rata and
/// the last auction takes the remainder.
#[allow(clippy::too_many_arguments)]
pub fn start_collateral_auctions(
    env: &Env,
    config: &LedgerConfig,
    params: &CollateralParams,
    owner: &Address,
    lot: i128,
    debt: i128,
    penalty: i128,
    now: u64
) -> Result<Vec<u64>, CdpError> {
    let mut ids = Vec::new(env);
    if lot == 0 {
        let mut accounts = get_accounts(env);
        safe_increment!(accounts.bad_debt, debt);
        save_accounts(env, &accounts);
        return Ok(ids);
    }

    let mut remaining_lot = lot;
    let mut remaining_debt = debt;
    let mut remaining_penalty = penalty;
    while remaining_lot > 0 {
        let (chunk, chunk_debt, chunk_penalty) = if remaining_lot <= params.auction_size {
            (remaining_lot, remaining_debt, remaining_penalty)
        } else {
            let chunk = params.auction_size;
            (
                chunk,
                debt.fixed_mul_floor(chunk, lot).ok_or(CdpError::MathError)?,
                penalty.fixed_mul_floor(chunk, lot).ok_or(CdpError::MathError)?,
            )
        };

        let id = take_auction_id(env)?;
        let auction = Auction::Collateral(CollateralAuction {
            base: BaseAuction {
                id,
                initiator: env.current_contract_address(),
                lot_token: params.token.clone(),
                lot: chunk,
                bid_token: config.debt_token.clone(),
                bid: 0,
                bidder: None,
                end_time: now.saturating_add(params.bid_duration),
                max_end_time: now.saturating_add(params.max_auction_duration),
                bid_duration: params.bid_duration,
                increment: params.min_bid_increment,
                status: AuctionStatus::Active,
            },
            collateral_type: params.collateral_type.clone(),
            corresponding_debt: chunk_debt,
            penalty: chunk_penalty,
            max_bid: chunk_debt + chunk_penalty,
            leftover_receiver: owner.clone(),
        });
        open_auction(env, &auction);
        ids.push_back(id);

        remaining_lot -= chunk;
        remaining_debt -= chunk_debt;
        remaining_penalty -= chunk_penalty;
    }
    Ok(ids)
}

/// Auctions `lot` debt tokens of protocol surplus for governance tokens.
pub fn start_surplus_auction(env: &Env, lot: i128) -> Result<u64, CdpError> {
    let config = get_config(env)?;
    let params = get_auction_params(env);
    validate!(env, lot > 0, CdpError::InvalidCoins, "surplus lot must be positive")?;

    let mut accounts = get_accounts(env);
    validate!(
        env,
        lot <= accounts.surplus,
        CdpError::InsufficientBalance,
        "surplus lot {} exceeds surplus {}",
        lot,
        accounts.surplus
    )?;
    safe_decrement!(accounts.surplus, lot);
    save_accounts(env, &accounts);

    let now = env.ledger().timestamp();
    let id = take_auction_id(env)?;
    let auction = Auction::Surplus(SurplusAuction {
        base: BaseAuction {
            id,
            initiator: env.current_contract_address(),
            lot_token: config.debt_token,
            lot,
            bid_token: config.gov_token,
            bid: 0,
            bidder: None,
            end_time: now.saturating_add(params.forward_bid_duration),
            max_end_time: now.saturating_add(params.max_auction_duration),
            bid_duration: params.forward_bid_duration,
            increment: params.increment_surplus,
            status: AuctionStatus::Active,
        },
    });
    open_auction(env, &auction);
    Ok(id)
}

/// Raises `debt` debt tokens against newly minted governance tokens, starting
/// from a lot of `initial_lot`.
pub fn start_debt_auction(env: &Env, debt: i128, initial_lot: i128) -> Result<u64, CdpError> {
    let config = get_config(env)?;
    let params = get_auction_params(env);
    validate!(
        env,
        debt > 0 && initial_lot > 0,
        CdpError::InvalidCoins,
        "debt auction amounts must be positive"
    )?;

    let mut accounts = get_accounts(env);
    validate!(
        env,
        debt <= accounts.bad_debt,
        CdpError::InsufficientBalance,
        "debt {} exceeds bad debt {}",
        debt,
        accounts.bad_debt
    )?;
    safe_decrement!(accounts.bad_debt, debt);
    save_accounts(env, &accounts);

    let now = env.ledger().timestamp();
    let id = take_auction_id(env)?;
    let auction = Auction::Debt(DebtAuction {
        base: BaseAuction {
            id,
            initiator: env.current_contract_address(),
            lot_token: config.gov_token,
            lot: initial_lot,
            bid_token: config.debt_token,
            bid: debt,
            bidder: None,
            end_time: now.saturating_add(params.reverse_bid_duration),
            max_end_time: now.saturating_add(params.max_auction_duration),
            bid_duration: params.reverse_bid_duration,
            increment: params.increment_debt,
            status: AuctionStatus::Active,
        },
        corresponding_debt: debt,
    });
    open_auction(env, &auction);
    Ok(id)
}

// ################################################################
//                              Bid
// ################################################################

fn validate_forward_bid(
    env: &Env,
    base: &BaseAuction,
    amount: i128,
    max_bid: Option<i128>
) -> Result<(), CdpError> {
    validate!(
        env,
        amount > base.bid,
        CdpError::InvalidBid,
        "bid {} must exceed current bid {}",
        amount,
        base.bid
    )?;

    let mut min_bid = base.bid
        .fixed_mul_ceil(SCALAR_7 + base.increment, SCALAR_7)
        .ok_or(CdpError::MathError)?;
    if let Some(max_bid) = max_bid {
        validate!(env, amount <= max_bid, CdpError::InvalidBid, "bid {} above max bid {}", amount, max_bid)?;
        min_bid = min_bid.min(max_bid);
    }
    validate!(
        env,
        amount >= min_bid,
        CdpError::InvalidBid,
        "bid {} below minimum {}",
        amount,
        min_bid
    )
}

fn validate_reverse_bid(env: &Env, base: &BaseAuction, lot: i128) -> Result<(), CdpError> {
    validate!(env, lot >= 0, CdpError::InvalidBid, "lot bid cannot be negative")?;
    validate!(
        env,
        lot < base.lot,
        CdpError::InvalidBid,
        "lot {} must be below current lot {}",
        lot,
        base.lot
    )?;

    let max_lot = base.lot
        .fixed_mul_floor(SCALAR_7 - base.increment, SCALAR_7)
        .ok_or(CdpError::MathError)?;
    validate!(
        env,
        lot <= max_lot,
        CdpError::InvalidBid,
        "lot {} above maximum {}",
        lot,
        max_lot
    )
}

/// Escrows `amount` from the new bidder and refunds the previous one.
fn take_forward_bid(env: &Env, base: &mut BaseAuction, bidder: &Address, amount: i128, now: u64) {
    token::receive(env, &base.bid_token, bidder, amount);
    if let Some(previous) = &base.bidder {
        token::send(env, &base.bid_token, previous, base.bid);
    }
    base.bidder = Some(bidder.clone());
    base.bid = amount;
    base.extend(now);
}

/// The bid stays fixed: the new bidder escrows it, the previous bidder gets
/// it back, and the lot shrinks to `lot`.
fn take_reverse_bid(env: &Env, base: &mut BaseAuction, bidder: &Address, lot: i128, now: u64) {
    token::receive(env, &base.bid_token, bidder, base.bid);
    if let Some(previous) = &base.bidder {
        token::send(env, &base.bid_token, previous, base.bid);
    }
    base.bidder = Some(bidder.clone());
    base.lot = lot;
    base.extend(now);
}

fn bid_collateral_auction(
    env: &Env,
    auction: &mut CollateralAuction,
    bidder: &Address,
    amount: i128,
    now: u64
) -> Result<(), CdpError> {
    match auction.phase() {
        AuctionPhase::Forward => {
            validate_forward_bid(env, &auction.base, amount, Some(auction.max_bid))?;
            take_forward_bid(env, &mut auction.base, bidder, amount, now);
        }
        AuctionPhase::Reverse => {
            validate_reverse_bid(env, &auction.base, amount)?;
            let returned = auction.base.lot - amount;
            take_reverse_bid(env, &mut auction.base, bidder, amount, now);
            token::send(env, &auction.base.lot_token, &auction.leftover_receiver, returned);
        }
    }
    Ok(())
}

pub fn place_bid(env: &Env, auction_id: u64, bidder: &Address, amount: i128) -> Result<Auction, CdpError> {
    let mut auction = find_auction(env, auction_id)?;
    let now = env.ledger().timestamp();
    validate!(
        env,
        !auction.base().is_expired(now),
        CdpError::Expired,
        "auction {} ended at {}",
        auction_id,
        auction.base().end_time
    )?;

    match &mut auction {
        Auction::Collateral(inner) => bid_collateral_auction(env, inner, bidder, amount, now)?,
        Auction::Debt(inner) => {
            validate_reverse_bid(env, &inner.base, amount)?;
            take_reverse_bid(env, &mut inner.base, bidder, amount, now);
        }
        Auction::Surplus(inner) => {
            validate_forward_bid(env, &inner.base, amount, None)?;
            take_forward_bid(env, &mut inner.base, bidder, amount, now);
        }
    }

    save_auction(env, &auction);
    AuctionEvents::auction_bid(env, &auction, bidder.clone());
    Ok(auction)
}

// ################################################################
//                             Close
// ################################################################

/// Starts a fresh collateral auction for the unsold lot of `auction`. The lot
/// stays in the ledger's custody and keeps backing the same debt.
fn reopen_collateral_auction(env: &Env, auction: &CollateralAuction, now: u64) -> Result<u64, CdpError> {
    let (bid_duration, max_duration, increment) = match get_collateral_params(env, &auction.collateral_type) {
        Ok(params) => (params.bid_duration, params.max_auction_duration, params.min_bid_increment),
        Err(_) => (auction.base.bid_duration, DEFAULT_MAX_AUCTION_DURATION, auction.base.increment),
    };

    let id = take_auction_id(env)?;
    let mut reopened = auction.clone();
    reopened.base.id = id;
    reopened.base.end_time = now.saturating_add(bid_duration);
    reopened.base.max_end_time = now.saturating_add(max_duration);
    reopened.base.bid_duration = bid_duration;
    reopened.base.increment = increment;
    open_auction(env, &Auction::Collateral(reopened));

    log!(env, "Unsold lot of auction {} reopened as auction {}", auction.base.id, id);
    Ok(id)
}

/// Pays out a collateral auction. Returns the id of the auction reopened for
/// an unsold lot.
fn settle_collateral_auction(env: &Env, auction: &CollateralAuction, now: u64) -> Result<Option<u64>, CdpError> {
    let base = &auction.base;
    let Some(winner) = &base.bidder else {
        return reopen_collateral_auction(env, auction, now).map(Some);
    };

    let mut accounts = get_accounts(env);
    token::send(env, &base.lot_token, winner, base.lot);

    let debt_paid = base.bid.min(auction.corresponding_debt);
    token::burn(env, &base.bid_token, debt_paid);
    safe_increment!(accounts.bad_debt, auction.corresponding_debt - debt_paid);

    let rest = base.bid - debt_paid;
    let penalty_paid = rest.min(auction.penalty);
    safe_increment!(accounts.surplus, penalty_paid);

    token::send(env, &base.bid_token, &auction.leftover_receiver, rest - penalty_paid);
    save_accounts(env, &accounts);
    Ok(None)
}

fn settle_debt_auction(env: &Env, auction: &DebtAuction) -> Result<(), CdpError> {
    let base = &auction.base;
    match &base.bidder {
        None => {
            let mut accounts = get_accounts(env);
            safe_increment!(accounts.bad_debt, auction.corresponding_debt);
            save_accounts(env, &accounts);
        }
        Some(winner) => {
            token::mint(env, &base.lot_token, winner, base.lot);
            token::burn(env, &base.bid_token, base.bid);
        }
    }
    Ok(())
}

fn settle_surplus_auction(env: &Env, auction: &SurplusAuction) -> Result<(), CdpError> {
    let base = &auction.base;
    match &base.bidder {
        None => {
            let mut accounts = get_accounts(env);
            safe_increment!(accounts.surplus, base.lot);
            save_accounts(env, &accounts);
        }
        Some(winner) => {
            token::send(env, &base.lot_token, winner, base.lot);
            token::burn(env, &base.bid_token, base.bid);
        }
    }
    Ok(())
}

/// Closes an expired auction. Also returns the id of the collateral auction
/// reopened when the lot went unsold.
pub fn close_auction(env: &Env, auction_id: u64) -> Result<(Auction, Option<u64>), CdpError> {
    let mut auction = find_auction(env, auction_id)?;
    let now = env.ledger().timestamp();
    validate!(
        env,
        auction.base().is_expired(now),
        CdpError::AuctionNotExpired,
        "auction {} ends at {}",
        auction_id,
        auction.base().end_time
    )?;

    let reopened = match &auction {
        Auction::Collateral(inner) => settle_collateral_auction(env, inner, now)?,
        Auction::Debt(inner) => {
            settle_debt_auction(env, inner)?;
            None
        }
        Auction::Surplus(inner) => {
            settle_surplus_auction(env, inner)?;
            None
        }
    };

    remove_auction(env, auction_id);
    auction.base_mut().status = AuctionStatus::Closed;
    AuctionEvents::auction_close(env, &auction);
    Ok((auction, reopened))
}

/// Closes the expired auctions among the next `tick_batch_size` active
/// auctions.
pub fn close_expired_auctions(
    env: &Env,
    config: &LedgerConfig,
    now: u64,
    summary: &mut TickSummary
) -> Result<(), CdpError> {
    let batch = next_batch(env, &get_auction_index(env), get_auction_scan_cursor(env), config.tick_batch_size);
    let Some(last) = batch.last() else {
        return Ok(());
    };

    for id in batch.iter() {
        let expired = match get_auction(env, id) {
            Some(auction) => auction.base().is_expired(now),
            None => false,
        };
        if expired {
            let (_, reopened) = close_auction(env, id)?;
            summary.closed_auctions += 1;
            if let Some(reopened) = reopened {
                summary.started_auctions.push_back(reopened);
            }
        }
    }
    set_auction_scan_cursor(env, last);
    Ok(())
}

// ################################################################
//                             Query
// ################################################################

pub fn find_auction(env: &Env, auction_id: u64) -> Result<Auction, CdpError> {
    match get_auction(env, auction_id) {
        Some(auction) => Ok(auction),
        None => {
            log!(env, "Auction {} not found", auction_id);
            Err(CdpError::NotFound)
        }
    }
}

pub fn list_auctions(env: &Env, query: &AuctionQuery) -> Vec<Auction> {
    let mut auctions = Vec::new(env);
    for id in get_auction_index(env).iter() {
        if let Some(auction) = get_auction(env, id) {
            if auction.matches(query) {
                auctions.push_back(auction);
            }
        }
    }
    auctions
}
