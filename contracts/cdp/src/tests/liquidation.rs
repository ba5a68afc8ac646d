extern crate std;

use pretty_assertions::assert_eq;
use soroban_sdk::vec;

use super::setup::{
    setup_ledger, TestLedger, DEPOSITOR, KEEPER, ONE_HOUR, ONE_PERCENT, OWNER, OWNER2,
};
use crate::{
    errors::CdpError,
    msg::MsgLiquidate,
    types::{
        Auction, AuctionKind, AuctionPhase, AuctionQuery, AuctionStatus, ConfigUpdate,
        LiquidationOutcome,
    },
};

fn liquidate_msg(test: &TestLedger, borrower: &str) -> MsgLiquidate {
    MsgLiquidate {
        keeper: test.string(KEEPER),
        borrower: test.string(borrower),
        collateral_type: test.xlm_a(),
    }
}

#[test]
fn healthy_cdp_cannot_be_liquidated() {
    let test = setup_ledger();
    test.open_cdp(OWNER, 100, 50);

    assert_eq!(
        test.ledger.try_liquidate(&liquidate_msg(&test, OWNER)),
        Err(Ok(CdpError::NotUnderCollateralized))
    );
}

#[test]
fn liquidation_opens_collateral_auction() {
    let test = setup_ledger();
    let owner = test.address(OWNER);
    test.open_cdp(OWNER, 100, 50);
    test.set_price(7_000_000);

    let outcome = test.ledger.liquidate(&liquidate_msg(&test, OWNER));
    assert_eq!(outcome, LiquidationOutcome::Liquidated(vec![&test.env, 1]));

    assert_eq!(
        test.ledger.try_get_cdp(&owner, &test.xlm_a()),
        Err(Ok(CdpError::NotFound))
    );
    assert_eq!(test.ledger.get_collateral_state(&test.xlm_a()).total_principal, 0);

    let Auction::Collateral(auction) = test.ledger.get_auction(&1) else {
        panic!("expected a collateral auction");
    };
    assert_eq!(auction.base.lot, 100);
    assert_eq!(auction.base.bid, 0);
    assert_eq!(auction.base.bidder, None);
    assert_eq!(auction.base.lot_token, test.collateral.address);
    assert_eq!(auction.base.bid_token, test.debt.address);
    assert_eq!(auction.base.end_time, super::setup::START_TIME + ONE_HOUR);
    assert_eq!(auction.base.status, AuctionStatus::Active);
    assert_eq!(auction.corresponding_debt, 50);
    assert_eq!(auction.penalty, 2);
    assert_eq!(auction.max_bid, 52);
    assert_eq!(auction.leftover_receiver, owner);
    assert_eq!(auction.phase(), AuctionPhase::Forward);

    // collateral stays escrowed in the ledger
    assert_eq!(test.collateral.balance(&test.ledger.address), 100);
    assert_eq!(test.ledger.next_auction_id(), 2);
}

#[test]
fn keeper_is_paid_from_seized_collateral() {
    let test = setup_ledger();
    let mut params = test.collateral_params();
    params.keeper_reward = ONE_PERCENT;
    test.ledger.set_collateral_params(&params);

    test.open_cdp(OWNER, 10_000, 5_000);
    test.set_price(7_000_000);
    test.ledger.liquidate(&liquidate_msg(&test, OWNER));

    assert_eq!(test.collateral.balance(&test.address(KEEPER)), 100);
    assert_eq!(test.ledger.get_auction(&1).base().lot, 9_900);
}

#[test]
fn large_lots_are_split_into_auctions() {
    let test = setup_ledger();
    let mut params = test.collateral_params();
    params.auction_size = 4_000;
    test.ledger.set_collateral_params(&params);

    test.open_cdp(OWNER, 10_000, 5_000);
    test.set_price(7_000_000);
    let outcome = test.ledger.liquidate(&liquidate_msg(&test, OWNER));
    assert_eq!(
        outcome,
        LiquidationOutcome::Liquidated(vec![&test.env, 1, 2, 3])
    );

    let auctions = test.ledger.list_auctions(&AuctionQuery::all(&test.env));
    assert_eq!(auctions.len(), 3);

    let mut lots = 0;
    let mut debts = 0;
    let mut penalties = 0;
    for auction in auctions.iter() {
        let Auction::Collateral(inner) = auction else {
            panic!("expected a collateral auction");
        };
        assert_eq!(inner.max_bid, inner.corresponding_debt + inner.penalty);
        lots += inner.base.lot;
        debts += inner.corresponding_debt;
        penalties += inner.penalty;
    }
    assert_eq!(lots, 10_000);
    assert_eq!(debts, 5_000);
    assert_eq!(penalties, 250);

    let Auction::Collateral(last) = test.ledger.get_auction(&3) else {
        panic!("expected a collateral auction");
    };
    assert_eq!(last.base.lot, 2_000);
    assert_eq!(last.corresponding_debt, 1_000);
    assert_eq!(last.penalty, 50);
}

#[test]
fn stale_price_defers_liquidation() {
    let test = setup_ledger();
    let owner = test.address(OWNER);
    test.open_cdp(OWNER, 100, 50);
    test.set_price(7_000_000);
    test.jump(2 * ONE_HOUR);

    let outcome = test.ledger.liquidate(&liquidate_msg(&test, OWNER));
    assert_eq!(outcome, LiquidationOutcome::Deferred);
    assert_eq!(test.ledger.get_cdp(&owner, &test.xlm_a()).collateral, 100);
    assert_eq!(test.ledger.next_auction_id(), 1);

    let summary = test.ledger.tick();
    assert_eq!(summary.deferred, 1);
    assert_eq!(summary.liquidated, 0);
}

#[test]
fn tick_liquidates_unsafe_cdps() {
    let test = setup_ledger();
    test.open_cdp(OWNER, 100, 50);
    test.open_cdp(OWNER2, 200, 50);
    test.jump(5);
    test.set_price(7_000_000);

    let summary = test.ledger.tick();
    assert_eq!(summary.liquidated, 1);
    assert_eq!(summary.deferred, 0);
    assert_eq!(summary.started_auctions, vec![&test.env, 1]);

    // the second position is still above 150% at 0.7
    assert_eq!(
        test.ledger.get_cdp(&test.address(OWNER2), &test.xlm_a()).collateral,
        200
    );
    let query = AuctionQuery {
        kinds: vec![&test.env, AuctionKind::Collateral],
        ..AuctionQuery::all(&test.env)
    };
    assert_eq!(test.ledger.list_auctions(&query).len(), 1);

    // a second tick in the same ledger does nothing
    let again = test.ledger.tick();
    assert_eq!(again.liquidated, 0);
    assert_eq!(again.started_auctions.len(), 0);
}

#[test]
fn tick_scans_cdps_in_batches() {
    let test = setup_ledger();
    for owner in [OWNER, OWNER2, DEPOSITOR] {
        test.open_cdp(owner, 100, 50);
    }
    test.ledger.update_config(&ConfigUpdate {
        tick_batch_size: Some(2),
        ..Default::default()
    });
    test.jump(5);
    test.set_price(7_000_000);

    let first = test.ledger.tick();
    assert_eq!(first.liquidated, 2);
    assert_eq!(first.started_auctions, vec![&test.env, 1, 2]);
    assert_eq!(test.ledger.get_cdp(&test.address(DEPOSITOR), &test.xlm_a()).collateral, 100);

    test.jump(5);
    test.set_price(7_000_000);
    let second = test.ledger.tick();
    assert_eq!(second.liquidated, 1);
    assert_eq!(second.started_auctions, vec![&test.env, 3]);
    assert_eq!(
        test.ledger.try_get_cdp(&test.address(DEPOSITOR), &test.xlm_a()),
        Err(Ok(CdpError::NotFound))
    );
}
