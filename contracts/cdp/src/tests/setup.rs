use harbor::oracle::{Asset, PriceData};
use soroban_sdk::{
    contract, contractimpl, contracttype,
    testutils::{Address as _, Ledger},
    token::{StellarAssetClient, TokenClient},
    Address, Env, String, Symbol, Vec,
};

use crate::{
    contract::{HarborCdp, HarborCdpClient},
    errors::CdpError,
    msg::MsgCreateCdp,
    types::{Cdp, CollateralParams, GenesisState, LedgerConfig},
};

// Contract strkeys used as signer addresses in messages
pub const OWNER: &str = "CCZ4RN7UHYPZC7D2KUIA5VAMNEMJLGSHVDXLY3MAM57O2DM5B3FRC63U";
pub const OWNER2: &str = "CCFWDRBQKGABPXTMDHFGROQPQSGP3GFJT2EOMVJA24ODBBZQIXXGF2HX";
pub const KEEPER: &str = "CC363OS7X3V7ZS2OHP5WQVHJ7ENYDFXR43FN5HKITXDCIQT44QJH564N";
pub const BIDDER1: &str = "CA67ZMIWK4QQOIYVTPAI3X4NVWLGMBDWWII63HEADNXWQMZUOZFUGLSG";
pub const BIDDER2: &str = "CDRVCO3NDZG7VDZVEG356KPWP7KOB53DPOQUDSSWPXGZKRSANBJ64CBG";
pub const DEPOSITOR: &str = "CD4J6VJCDEDB36SUN2HBTXI7BJTNGBQLGIOOSMQPR53625FDZ27EYET3";

pub const XLM_A: &str = "XLM-A";
pub const START_TIME: u64 = 1_700_000_000;
pub const ONE_HOUR: u64 = 3_600;
pub const ONE_YEAR: u64 = 31_536_000;

pub const PRICE_ONE: i128 = 1_0000000;
pub const RATIO_150: i128 = 1_5000000;
pub const FIVE_PERCENT: i128 = 500_000;
pub const ONE_PERCENT: i128 = 100_000;

#[contracttype]
enum FeedKey {
    Price(Asset),
}

#[contract]
pub struct MockPriceFeed;

#[contractimpl]
impl MockPriceFeed {
    pub fn set_price(env: Env, asset: Asset, price: i128, timestamp: u64) {
        env.storage()
            .instance()
            .set(&FeedKey::Price(asset), &PriceData { price, timestamp });
    }

    pub fn decimals(_env: Env) -> u32 {
        7
    }

    pub fn lastprice(env: Env, asset: Asset) -> Option<PriceData> {
        env.storage().instance().get(&FeedKey::Price(asset))
    }
}

pub struct TestLedger<'a> {
    pub env: Env,
    pub ledger: HarborCdpClient<'a>,
    pub feed: MockPriceFeedClient<'a>,
    pub admin: Address,
    pub collateral: TokenClient<'a>,
    pub collateral_sac: StellarAssetClient<'a>,
    pub debt: TokenClient<'a>,
    pub debt_sac: StellarAssetClient<'a>,
    pub gov: TokenClient<'a>,
    pub gov_sac: StellarAssetClient<'a>,
}

/// `initialize` returns no `Result`, so its failures surface as host errors.
pub fn init_error(error: CdpError) -> soroban_sdk::Error {
    error.into()
}

/// Registers the ledger, its price feed and tokens without initializing.
pub fn deploy_ledger<'a>() -> TestLedger<'a> {
    let env = Env::default();
    env.mock_all_auths();
    env.cost_estimate().budget().reset_unlimited();
    env.ledger().with_mut(|li| {
        li.timestamp = START_TIME;
        li.sequence_number = 100;
    });

    let admin = Address::generate(&env);
    let ledger_id = env.register(HarborCdp, ());
    let feed_id = env.register(MockPriceFeed, ());

    let collateral_id = env
        .register_stellar_asset_contract_v2(Address::generate(&env))
        .address();
    let debt_id = env
        .register_stellar_asset_contract_v2(ledger_id.clone())
        .address();
    let gov_id = env
        .register_stellar_asset_contract_v2(ledger_id.clone())
        .address();

    TestLedger {
        ledger: HarborCdpClient::new(&env, &ledger_id),
        feed: MockPriceFeedClient::new(&env, &feed_id),
        admin,
        collateral: TokenClient::new(&env, &collateral_id),
        collateral_sac: StellarAssetClient::new(&env, &collateral_id),
        debt: TokenClient::new(&env, &debt_id),
        debt_sac: StellarAssetClient::new(&env, &debt_id),
        gov: TokenClient::new(&env, &gov_id),
        gov_sac: StellarAssetClient::new(&env, &gov_id),
        env,
    }
}

/// A ledger initialized with one interest-free collateral type priced at 1.
pub fn setup_ledger<'a>() -> TestLedger<'a> {
    let test = deploy_ledger();
    let mut params = Vec::new(&test.env);
    params.push_back(test.collateral_params());
    test.ledger.initialize(
        &test.config(),
        &params,
        &GenesisState::default_genesis(&test.env),
    );
    test.set_price(PRICE_ONE);
    test
}

impl<'a> TestLedger<'a> {
    pub fn address(&self, strkey: &str) -> Address {
        Address::from_string(&String::from_str(&self.env, strkey))
    }

    pub fn string(&self, value: &str) -> String {
        String::from_str(&self.env, value)
    }

    pub fn xlm_a(&self) -> String {
        self.string(XLM_A)
    }

    pub fn price_asset(&self) -> Asset {
        Asset::Other(Symbol::new(&self.env, "XLM"))
    }

    pub fn config(&self) -> LedgerConfig {
        LedgerConfig {
            admin: self.admin.clone(),
            debt_token: self.debt.address.clone(),
            gov_token: self.gov.address.clone(),
            price_feed: self.feed.address.clone(),
            max_price_age: ONE_HOUR,
            global_debt_limit: 1_000_000_000_000,
            debt_floor: 10,
            surplus_auction_threshold: 1_000_000_000_000,
            surplus_auction_lot: 500,
            debt_auction_threshold: 1_000_000_000_000,
            debt_auction_lot: 2_000,
            debt_auction_initial_lot: 100_000,
            liquidation_block_interval: 1,
            tick_batch_size: 50,
        }
    }

    pub fn collateral_params(&self) -> CollateralParams {
        CollateralParams {
            collateral_type: self.xlm_a(),
            token: self.collateral.address.clone(),
            price_asset: self.price_asset(),
            liquidation_ratio: RATIO_150,
            debt_ceiling: 1_000_000_000_000,
            stability_fee: 0,
            liquidation_penalty: FIVE_PERCENT,
            auction_size: 1_000_000_000,
            bid_duration: ONE_HOUR,
            max_auction_duration: 24 * ONE_HOUR,
            min_bid_increment: ONE_PERCENT,
            keeper_reward: 0,
        }
    }

    /// Publishes `price` for the collateral at the current ledger time.
    pub fn set_price(&self, price: i128) {
        self.feed
            .set_price(&self.price_asset(), &price, &self.env.ledger().timestamp());
    }

    /// Advances the clock by `seconds` and the sequence by one ledger.
    pub fn jump(&self, seconds: u64) {
        self.env.ledger().with_mut(|li| {
            li.timestamp += seconds;
            li.sequence_number += 1;
        });
    }

    pub fn create_msg(&self, owner: &str, collateral: i128, principal: i128) -> MsgCreateCdp {
        MsgCreateCdp {
            sender: self.string(owner),
            collateral,
            principal,
            collateral_type: self.xlm_a(),
        }
    }

    /// Funds `owner` with `collateral` and opens an XLM-A position.
    pub fn open_cdp(&self, owner: &str, collateral: i128, principal: i128) -> Cdp {
        self.collateral_sac
            .mint(&self.address(owner), &collateral);
        self.ledger
            .create_cdp(&self.create_msg(owner, collateral, principal))
    }
}
