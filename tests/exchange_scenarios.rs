//! End-to-end scenarios for deposits, withdrawals and order settlement.
//!
//! Accounts: alice makes, bob takes, the owner collects 1% maker and 1%
//! taker fees. Every account starts with 1_000_000 native and 1_000_000
//! token units in its wallet.

use dark_exchange::types::{HistoryEvent, TradeRecord};
use dark_exchange::{
    Address, AssetId, Exchange, ExchangeError, FeeSchedule, InMemoryGateway, OrderHash,
    OrderStatus, PlaceOrder,
};

const ONE_PERCENT: u64 = 10_000_000_000_000_000;
const WALLET_FUNDS: u64 = 1_000_000;

fn owner() -> Address {
    Address::repeat_byte(0x01)
}

fn alice() -> Address {
    Address::repeat_byte(0xA1)
}

fn bob() -> Address {
    Address::repeat_byte(0xB0)
}

fn token() -> AssetId {
    AssetId::token(Address::repeat_byte(0x70))
}

fn hash(s: &str) -> OrderHash {
    s.parse().unwrap()
}

fn setup() -> Exchange<InMemoryGateway> {
    let mut gateway = InMemoryGateway::new(Address::repeat_byte(0xEE));
    for account in [owner(), alice(), bob()] {
        gateway.mint(AssetId::NATIVE, account, WALLET_FUNDS);
        gateway.mint(token(), account, WALLET_FUNDS);
    }
    let fees = FeeSchedule::new(owner(), ONE_PERCENT, ONE_PERCENT).unwrap();
    Exchange::new(fees, gateway)
}

/// Sell 10_000 native for 20_000 token
fn sell_native(tag: &str) -> PlaceOrder {
    PlaceOrder {
        sell_amount: 10_000,
        buy_amount: 20_000,
        expiration: 1_557_887_965_572,
        sell_token: AssetId::NATIVE,
        buy_token: token(),
        hash: hash(tag),
    }
}

const HASH_A: &str = "0x6378dda51724bca215ddc353efa47107dd942b67df300b533f8f556caed0ffed";
const HASH_B: &str = "0x6378dda51724bca215ddc353efa47107dd942b67df300b533f8f556caed0ffea";
const HASH_C: &str = "0x6378dda51724bca215ddc353efa47107dd942b67df300b533f8f556caed0ffeb";

const NOW: u64 = 1_557_800_000_000;

// ============================================================================
// Deposit
// ============================================================================

#[test]
fn deposit_tokens() {
    let mut exchange = setup();

    exchange.deposit(alice(), token(), 100, alice(), alice(), 0).unwrap();

    assert_eq!(exchange.balance_of(alice(), token()), 100);
    assert_eq!(exchange.available_balance_of(alice(), token()), 100);
    assert_eq!(exchange.gateway().wallet_balance(alice(), token()), WALLET_FUNDS - 100);
}

#[test]
fn deposit_native() {
    let mut exchange = setup();

    exchange.deposit(alice(), AssetId::NATIVE, 100, alice(), alice(), 100).unwrap();

    assert_eq!(exchange.balance_of(alice(), AssetId::NATIVE), 100);
    assert_eq!(exchange.available_balance_of(alice(), AssetId::NATIVE), 100);
}

#[test]
fn deposit_native_with_invalid_amount_is_rejected() {
    let mut exchange = setup();

    let err = exchange
        .deposit(alice(), AssetId::NATIVE, 100, alice(), alice(), 99)
        .unwrap_err();

    assert_eq!(err, ExchangeError::InvalidAmount { declared: 100, attached: 99 });
    assert_eq!(exchange.balance_of(alice(), AssetId::NATIVE), 0);
    assert_eq!(exchange.version(), 0);
}

#[test]
fn deposit_to_beneficiary() {
    let mut exchange = setup();

    exchange.deposit(alice(), token(), 300, bob(), Address::ZERO, 0).unwrap();

    assert_eq!(exchange.balance_of(bob(), token()), 300);
    assert_eq!(exchange.balance_of(alice(), token()), 0);
    assert_eq!(exchange.gateway().wallet_balance(alice(), token()), WALLET_FUNDS - 300);
}

#[test]
fn referrer_is_recorded_once() {
    let mut exchange = setup();

    // Self-referral and zero are not recorded
    exchange.deposit(alice(), token(), 1, alice(), alice(), 0).unwrap();
    exchange.deposit(alice(), token(), 1, alice(), Address::ZERO, 0).unwrap();
    assert_eq!(exchange.referrer_of(alice()), None);

    exchange.deposit(alice(), token(), 1, alice(), bob(), 0).unwrap();
    assert_eq!(exchange.referrer_of(alice()), Some(bob()));

    exchange.deposit(alice(), token(), 1, alice(), owner(), 0).unwrap();
    assert_eq!(exchange.referrer_of(alice()), Some(bob()));
}

#[test]
fn deposit_tokens_beyond_wallet_fails() {
    let mut exchange = setup();

    let err = exchange
        .deposit(alice(), token(), WALLET_FUNDS + 1, alice(), bob(), 0)
        .unwrap_err();

    assert!(matches!(err, ExchangeError::TokenTransferFailed { .. }));
    assert_eq!(exchange.balance_of(alice(), token()), 0);
    // Failed deposit records no referrer
    assert_eq!(exchange.referrer_of(alice()), None);
}

// ============================================================================
// Withdraw
// ============================================================================

#[test]
fn withdraw_tokens() {
    let mut exchange = setup();
    exchange.deposit(alice(), token(), 100, alice(), alice(), 0).unwrap();

    exchange.withdraw(alice(), token(), 100).unwrap();

    assert_eq!(exchange.balance_of(alice(), token()), 0);
    assert_eq!(exchange.gateway().wallet_balance(alice(), token()), WALLET_FUNDS);
    assert!(exchange.balances_of(alice()).is_empty());
}

#[test]
fn withdraw_native() {
    let mut exchange = setup();
    exchange.deposit(alice(), AssetId::NATIVE, 100, alice(), alice(), 100).unwrap();

    exchange.withdraw(alice(), AssetId::NATIVE, 40).unwrap();

    assert_eq!(exchange.balance_of(alice(), AssetId::NATIVE), 60);
    assert_eq!(
        exchange.gateway().wallet_balance(alice(), AssetId::NATIVE),
        WALLET_FUNDS - 60
    );
}

#[test]
fn withdraw_more_than_balance_fails() {
    let mut exchange = setup();
    exchange.deposit(alice(), token(), 100, alice(), alice(), 0).unwrap();

    let err = exchange.withdraw(alice(), token(), 101).unwrap_err();

    assert!(matches!(err, ExchangeError::InsufficientFunds { have: 100, need: 101, .. }));
    assert_eq!(exchange.balance_of(alice(), token()), 100);
}

#[test]
fn withdraw_locked_funds_fails() {
    let mut exchange = setup();
    exchange.deposit(alice(), AssetId::NATIVE, 10_000, alice(), alice(), 10_000).unwrap();
    exchange.place_order(alice(), NOW, sell_native(HASH_A)).unwrap();

    assert_eq!(exchange.available_balance_of(alice(), AssetId::NATIVE), 0);
    assert_eq!(exchange.balance_of(alice(), AssetId::NATIVE), 10_000);

    let err = exchange.withdraw(alice(), AssetId::NATIVE, 1).unwrap_err();
    assert!(matches!(err, ExchangeError::InsufficientFunds { .. }));
}

// ============================================================================
// Place / Cancel
// ============================================================================

#[test]
fn place_order() {
    let mut exchange = setup();
    exchange.deposit(alice(), AssetId::NATIVE, 1_000_000, alice(), alice(), 1_000_000).unwrap();

    exchange.place_order(alice(), NOW, sell_native(HASH_A)).unwrap();

    assert_eq!(exchange.open_orders_by_user(alice()).len(), 1);
    assert!(exchange.open_orders_by_user(bob()).is_empty());
    assert_eq!(exchange.available_balance_of(alice(), AssetId::NATIVE), 990_000);

    let orders = exchange.open_orders_by_asset(AssetId::NATIVE);
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0].status(), OrderStatus::Open);
    assert_eq!(orders[0].filled, 0);
    assert_eq!(orders[0].taker(), None);
    assert_eq!(orders[0].order_hash(), hash(HASH_A));

    assert_eq!(exchange.open_buy_orders_by_user_and_asset(alice(), token()).len(), 1);
    assert_eq!(exchange.open_sell_orders_by_user_and_asset(alice(), AssetId::NATIVE).len(), 1);
    assert!(exchange.open_sell_orders_by_user_and_asset(alice(), token()).is_empty());
}

#[test]
fn cancel_order() {
    let mut exchange = setup();
    exchange.deposit(alice(), AssetId::NATIVE, 1_000_000, alice(), alice(), 1_000_000).unwrap();
    exchange.place_order(alice(), NOW, sell_native(HASH_A)).unwrap();

    exchange.cancel_order(alice(), hash(HASH_A)).unwrap();

    assert_eq!(exchange.available_balance_of(alice(), AssetId::NATIVE), 1_000_000);
    assert_eq!(exchange.locked_balance_of(alice(), AssetId::NATIVE), 0);
    assert!(exchange.open_orders_by_user(alice()).is_empty());

    let history = exchange.order_history(alice());
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].status, OrderStatus::Cancelled);
    assert_eq!(history[0].event, HistoryEvent::Cancel);
    assert_eq!(history[0].filled, 0);
}

#[test]
fn second_cancel_is_rejected() {
    let mut exchange = setup();
    exchange.deposit(alice(), AssetId::NATIVE, 10_000, alice(), alice(), 10_000).unwrap();
    exchange.place_order(alice(), NOW, sell_native(HASH_A)).unwrap();
    exchange.cancel_order(alice(), hash(HASH_A)).unwrap();

    assert_eq!(
        exchange.cancel_order(alice(), hash(HASH_A)),
        Err(ExchangeError::OrderNotOpen(hash(HASH_A)))
    );
    assert_eq!(exchange.available_balance_of(alice(), AssetId::NATIVE), 10_000);
    assert_eq!(exchange.order_history(alice()).len(), 1);

    // The hash stays taken
    assert_eq!(
        exchange.place_order(alice(), NOW, sell_native(HASH_A)),
        Err(ExchangeError::DuplicateOrderHash(hash(HASH_A)))
    );
}

#[test]
fn expired_order_cannot_be_taken_but_can_be_cancelled() {
    let mut exchange = setup();
    exchange.deposit(alice(), AssetId::NATIVE, 10_000, alice(), alice(), 10_000).unwrap();
    exchange.deposit(bob(), token(), 20_000, bob(), Address::ZERO, 0).unwrap();
    exchange.place_order(alice(), NOW, sell_native(HASH_A)).unwrap();

    let later = sell_native(HASH_A).expiration + 1;
    assert_eq!(exchange.order_status(hash(HASH_A), later), Some(OrderStatus::Expired));
    assert_eq!(exchange.order_status(hash(HASH_A), NOW), Some(OrderStatus::Open));

    let version = exchange.version();
    assert_eq!(
        exchange.take_order(bob(), later, alice(), hash(HASH_A), 20_000),
        Err(ExchangeError::OrderNotOpen(hash(HASH_A)))
    );
    assert_eq!(exchange.version(), version);
    assert_eq!(exchange.available_balance_of(bob(), token()), 20_000);

    // Funds stay locked until the maker cancels
    assert_eq!(exchange.locked_balance_of(alice(), AssetId::NATIVE), 10_000);
    exchange.cancel_order(alice(), hash(HASH_A)).unwrap();
    assert_eq!(exchange.available_balance_of(alice(), AssetId::NATIVE), 10_000);
    assert_eq!(exchange.locked_balance_of(alice(), AssetId::NATIVE), 0);
}

// ============================================================================
// Take
// ============================================================================

#[test]
fn fully_take_order() {
    let mut exchange = setup();
    exchange.deposit(alice(), AssetId::NATIVE, 1_000_000, alice(), alice(), 1_000_000).unwrap();
    exchange.deposit(bob(), token(), 1_000_000, bob(), bob(), 0).unwrap();
    exchange.place_order(alice(), NOW, sell_native(HASH_B)).unwrap();

    let fill = exchange.take_order(bob(), NOW + 1, alice(), hash(HASH_B), 20_000).unwrap();

    assert_eq!(fill.status, OrderStatus::Filled);
    assert!(exchange.open_orders_by_user(alice()).is_empty());

    let maker_history = exchange.order_history(alice());
    assert_eq!(maker_history.len(), 1);
    assert_eq!(maker_history[0].filled, 20_000);
    assert_eq!(maker_history[0].sell_token, AssetId::NATIVE);
    assert_eq!(maker_history[0].taker, Some(bob()));

    let taker_history = exchange.order_history(bob());
    assert_eq!(taker_history.len(), 1);
    assert_eq!(taker_history[0].filled, 10_000);
    assert_eq!(taker_history[0].buy_token, AssetId::NATIVE);
    assert_eq!(taker_history[0].sell_token, token());
}

#[test]
fn partially_take_order() {
    let mut exchange = setup();
    exchange.deposit(alice(), AssetId::NATIVE, 1_000_000, alice(), alice(), 1_000_000).unwrap();
    exchange.deposit(bob(), token(), 1_000_000, bob(), bob(), 0).unwrap();
    exchange.place_order(alice(), NOW, sell_native(HASH_C)).unwrap();

    let fill = exchange.take_order(bob(), NOW + 1, alice(), hash(HASH_C), 10_000).unwrap();
    assert_eq!(fill.received, 5_000);

    let orders = exchange.open_orders_by_user(alice());
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0].status(), OrderStatus::PartiallyFilled);
    assert_eq!(orders[0].filled, 5_000);
    assert_eq!(exchange.locked_balance_of(alice(), AssetId::NATIVE), 5_000);

    assert_eq!(exchange.order_history(alice())[0].filled, 10_000);
    assert_eq!(exchange.order_history(bob())[0].filled, 5_000);

    // Second take exhausts the order
    let fill = exchange.take_order(bob(), NOW + 2, alice(), hash(HASH_C), 10_000).unwrap();
    assert_eq!(fill.status, OrderStatus::Filled);
    assert!(exchange.open_orders_by_user(alice()).is_empty());
    assert_eq!(exchange.locked_balance_of(alice(), AssetId::NATIVE), 0);
    assert_eq!(exchange.order_history(alice()).len(), 2);
    assert_eq!(exchange.order_history(bob()).len(), 2);

    assert_eq!(
        exchange.take_order(bob(), NOW + 3, alice(), hash(HASH_C), 1),
        Err(ExchangeError::OrderNotOpen(hash(HASH_C)))
    );
}

#[test]
fn take_updates_balances_with_fees() {
    let mut exchange = setup();
    exchange.deposit(alice(), AssetId::NATIVE, 1_000_000, alice(), alice(), 1_000_000).unwrap();
    exchange.deposit(bob(), token(), 1_000_000, bob(), bob(), 0).unwrap();
    exchange.place_order(alice(), NOW, sell_native(HASH_A)).unwrap();

    exchange.take_order(bob(), NOW + 1, alice(), hash(HASH_A), 20_000).unwrap();

    // Taker: paid 20_000 token, received 10_000 native minus 1%
    assert_eq!(exchange.balance_of(bob(), token()), 980_000);
    assert_eq!(exchange.balance_of(bob(), AssetId::NATIVE), 9_900);

    // Maker: delivered 10_000 native, received 20_000 token minus 1%
    assert_eq!(exchange.balance_of(alice(), AssetId::NATIVE), 990_000);
    assert_eq!(exchange.balance_of(alice(), token()), 19_800);

    // Fee account: maker fee in token, taker fee in native
    assert_eq!(exchange.balance_of(owner(), token()), 200);
    assert_eq!(exchange.balance_of(owner(), AssetId::NATIVE), 100);

    // Conservation
    assert_eq!(exchange.total_supply(AssetId::NATIVE), 1_000_000);
    assert_eq!(exchange.total_supply(token()), 1_000_000);
}

#[test]
fn take_overfill_and_dust_are_rejected() {
    let mut exchange = setup();
    exchange.deposit(alice(), AssetId::NATIVE, 10_000, alice(), alice(), 10_000).unwrap();
    exchange.deposit(bob(), token(), 100_000, bob(), bob(), 0).unwrap();
    exchange.place_order(alice(), NOW, sell_native(HASH_A)).unwrap();

    assert_eq!(
        exchange.take_order(bob(), NOW + 1, alice(), hash(HASH_A), 20_001),
        Err(ExchangeError::OrderOverfill { offered: 20_001, capacity: 20_000 })
    );
    assert_eq!(
        exchange.take_order(bob(), NOW + 1, alice(), hash(HASH_A), 0),
        Err(ExchangeError::OrderDustAmount(0))
    );
    assert_eq!(
        exchange.take_order(bob(), NOW + 1, alice(), hash(HASH_A), 1),
        Err(ExchangeError::OrderDustAmount(1))
    );
    assert_eq!(exchange.balance_of(bob(), token()), 100_000);
    assert_eq!(exchange.order_status(hash(HASH_A), NOW + 1), Some(OrderStatus::Open));
}

#[test]
fn take_without_funds_is_rejected() {
    let mut exchange = setup();
    exchange.deposit(alice(), AssetId::NATIVE, 10_000, alice(), alice(), 10_000).unwrap();
    exchange.deposit(bob(), token(), 19_999, bob(), bob(), 0).unwrap();
    exchange.place_order(alice(), NOW, sell_native(HASH_A)).unwrap();

    let err = exchange
        .take_order(bob(), NOW + 1, alice(), hash(HASH_A), 20_000)
        .unwrap_err();

    assert!(matches!(err, ExchangeError::InsufficientFunds { .. }));
    assert_eq!(exchange.locked_balance_of(alice(), AssetId::NATIVE), 10_000);
    assert!(exchange.order_history(bob()).is_empty());
    assert!(exchange.trade_history_by_asset(token()).is_empty());
}

#[test]
fn trade_history_is_recorded_under_both_assets() {
    let mut exchange = setup();
    exchange.deposit(alice(), AssetId::NATIVE, 10_000, alice(), alice(), 10_000).unwrap();
    exchange.deposit(bob(), token(), 20_000, bob(), bob(), 0).unwrap();
    exchange.place_order(alice(), NOW, sell_native(HASH_A)).unwrap();

    exchange.take_order(bob(), NOW + 5, alice(), hash(HASH_A), 20_000).unwrap();

    let expected = TradeRecord {
        hash: hash(HASH_A),
        maker: alice(),
        taker: bob(),
        sell_asset: AssetId::NATIVE,
        buy_asset: token(),
        taker_paid: 20_000,
        taker_received: 10_000,
        maker_fee: 200,
        taker_fee: 100,
        timestamp: NOW + 5,
    };
    assert_eq!(exchange.trade_history_by_asset(token()), &[expected.clone()]);
    assert_eq!(exchange.trade_history_by_asset(AssetId::NATIVE), &[expected]);
}

#[test]
fn balances_of_lists_every_asset() {
    let mut exchange = setup();
    exchange.deposit(alice(), AssetId::NATIVE, 500, alice(), alice(), 500).unwrap();
    exchange.deposit(alice(), token(), 700, alice(), alice(), 0).unwrap();

    let balances = exchange.balances_of(alice());

    assert_eq!(balances.len(), 2);
    assert_eq!(balances[0].0, AssetId::NATIVE);
    assert_eq!(balances[0].1.available, 500);
    assert_eq!(balances[1].0, token());
    assert_eq!(balances[1].1.available, 700);
}

#[test]
fn same_transitions_same_commitment() {
    let run = || {
        let mut exchange = setup();
        exchange.deposit(alice(), AssetId::NATIVE, 10_000, alice(), alice(), 10_000).unwrap();
        exchange.deposit(bob(), token(), 20_000, bob(), alice(), 0).unwrap();
        exchange.place_order(alice(), NOW, sell_native(HASH_A)).unwrap();
        exchange.take_order(bob(), NOW + 1, alice(), hash(HASH_A), 5_000).unwrap();
        exchange.state_commitment().unwrap()
    };

    let first = run();
    assert_eq!(first, run());
    assert_eq!(first.version, 4);
    assert_eq!(first.order_count, 1);
}
