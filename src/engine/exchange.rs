//! The exchange state machine.
//!
//! ## Transitions
//!
//! Every public mutator is one atomic transition:
//!
//! 1. **Checks**: validate arguments and look up orders. Nothing is written.
//! 2. **Staging**: balance moves go into a [`BalanceTx`](crate::ledger::BalanceTx).
//!    Any `Err` drops the transaction.
//! 3. **External call** (deposit/withdraw only): the gateway moves real
//!    value. A failure still drops the transaction.
//! 4. **Effects**: order store and history are updated, the transaction is
//!    committed and the version is bumped. Nothing in this phase can fail.
//!
//! A rejected transition leaves balances, orders, history and the version
//! exactly as they were.
//!
//! ## Example
//!
//! ```
//! use dark_exchange::engine::{Exchange, InMemoryGateway};
//! use dark_exchange::fees::FeeSchedule;
//! use dark_exchange::types::{Address, AssetId, OrderHash, OrderStatus, PlaceOrder};
//!
//! let token = AssetId::token(Address::repeat_byte(0x70));
//! let (maker, taker) = (Address::repeat_byte(0xA1), Address::repeat_byte(0xB0));
//!
//! let mut gateway = InMemoryGateway::new(Address::repeat_byte(0xEE));
//! gateway.mint(AssetId::NATIVE, maker, 10_000);
//! gateway.mint(token, taker, 20_000);
//!
//! let fees = FeeSchedule::new(Address::repeat_byte(0xFE), 0, 0).unwrap();
//! let mut exchange = Exchange::new(fees, gateway);
//!
//! exchange.deposit(maker, AssetId::NATIVE, 10_000, maker, Address::ZERO, 10_000).unwrap();
//! exchange.deposit(taker, token, 20_000, taker, Address::ZERO, 0).unwrap();
//!
//! let hash = OrderHash::from_bytes([1u8; 32]);
//! exchange.place_order(maker, 0, PlaceOrder {
//!     sell_amount: 10_000,
//!     buy_amount: 20_000,
//!     expiration: 100,
//!     sell_token: AssetId::NATIVE,
//!     buy_token: token,
//!     hash,
//! }).unwrap();
//!
//! let fill = exchange.take_order(taker, 1, maker, hash, 20_000).unwrap();
//! assert_eq!(fill.status, OrderStatus::Filled);
//! assert_eq!(exchange.balance_of(taker, AssetId::NATIVE), 10_000);
//! ```

use tracing::{info, warn};

use crate::config::ExchangeConfig;
use crate::engine::fill::{self, Fill};
use crate::engine::gateway::{AssetGateway, GatewayError, TransferIn, TransferOut};
use crate::error::{ExchangeError, Result};
use crate::fees::FeeSchedule;
use crate::ledger::{BalanceLedger, ReferralRegistry};
use crate::orderbook::OrderStore;
use crate::types::{
    Address, AssetId, Balance, HistoryEntry, Order, OrderHash, OrderStatus, PlaceOrder,
    StateCommitment, TradeRecord,
};

/// Balances, orders and fees of one exchange deployment.
#[derive(Debug)]
pub struct Exchange<G> {
    /// Fixed at construction
    fees: FeeSchedule,

    balances: BalanceLedger,

    referrals: ReferralRegistry,

    orders: OrderStore,

    /// Token contract / native payout boundary
    gateway: G,

    /// Committed transitions
    version: u64,
}

impl<G: AssetGateway> Exchange<G> {
    /// Create an empty exchange
    pub fn new(fees: FeeSchedule, gateway: G) -> Self {
        Self::with_capacity(fees, gateway, 0)
    }

    /// Create an empty exchange with room for `order_capacity` orders
    pub fn with_capacity(fees: FeeSchedule, gateway: G, order_capacity: usize) -> Self {
        info!(
            fee_account = %fees.recipient(),
            maker_rate = fees.maker_rate(),
            taker_rate = fees.taker_rate(),
            "exchange initialized"
        );
        Self {
            fees,
            balances: BalanceLedger::new(),
            referrals: ReferralRegistry::new(),
            orders: OrderStore::with_capacity(order_capacity),
            gateway,
            version: 0,
        }
    }

    /// Create an exchange from deployment parameters
    pub fn from_config(config: &ExchangeConfig, gateway: G) -> Result<Self> {
        let fees = config.fee_schedule()?;
        Ok(Self::with_capacity(fees, gateway, config.order_capacity))
    }

    /// Fee rates and recipient
    #[inline]
    pub fn fee_schedule(&self) -> &FeeSchedule {
        &self.fees
    }

    /// External transfer boundary
    #[inline]
    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    /// External transfer boundary, mutably (funding wallets in tests)
    #[inline]
    pub fn gateway_mut(&mut self) -> &mut G {
        &mut self.gateway
    }

    /// Number of committed transitions
    #[inline]
    pub fn version(&self) -> u64 {
        self.version
    }

    // ========================================================================
    // Deposit / Withdraw
    // ========================================================================

    /// Credit `beneficiary` with `amount` of `asset`
    ///
    /// Native deposits must attach exactly `amount` of native value. Token
    /// deposits must not attach native value. Either way `amount` is pulled
    /// from `caller` into custody through the gateway. The first deposit to
    /// name a usable referral candidate records it as the beneficiary's
    /// referrer.
    ///
    /// # Errors
    ///
    /// - [`ExchangeError::InvalidAmount`] on an attached-value mismatch
    /// - [`ExchangeError::TokenTransferFailed`] if the pull fails
    /// - [`ExchangeError::Overflow`] if the credit does not fit
    pub fn deposit(
        &mut self,
        caller: Address,
        asset: AssetId,
        amount: u64,
        beneficiary: Address,
        referral: Address,
        attached: u64,
    ) -> Result<()> {
        let result = self.apply_deposit(caller, asset, amount, beneficiary, referral, attached);
        rejected("deposit", result)
    }

    fn apply_deposit(
        &mut self,
        caller: Address,
        asset: AssetId,
        amount: u64,
        beneficiary: Address,
        referral: Address,
        attached: u64,
    ) -> Result<()> {
        let declared = if asset.is_native() { amount } else { 0 };
        if attached != declared {
            return Err(ExchangeError::InvalidAmount { declared, attached });
        }

        let mut tx = self.balances.transaction();
        tx.credit(beneficiary, asset, amount)?;

        self.gateway
            .transfer_in(TransferIn {
                asset,
                from: caller,
                amount,
            })
            .map_err(|e| transfer_failed(asset, e))?;

        tx.commit();
        let referred = self.referrals.record(beneficiary, referral);
        self.version += 1;

        info!(%caller, %beneficiary, %asset, amount, referred, "deposit");
        Ok(())
    }

    /// Debit `caller`'s available balance and push the funds out
    ///
    /// # Errors
    ///
    /// - [`ExchangeError::InsufficientFunds`] if `available < amount`
    /// - [`ExchangeError::TokenTransferFailed`] if the push fails; the debit
    ///   is rolled back
    pub fn withdraw(&mut self, caller: Address, asset: AssetId, amount: u64) -> Result<()> {
        let result = self.apply_withdraw(caller, asset, amount);
        rejected("withdraw", result)
    }

    fn apply_withdraw(&mut self, caller: Address, asset: AssetId, amount: u64) -> Result<()> {
        let mut tx = self.balances.transaction();
        tx.debit(caller, asset, amount)?;

        self.gateway
            .transfer_out(TransferOut {
                asset,
                to: caller,
                amount,
            })
            .map_err(|e| transfer_failed(asset, e))?;

        tx.commit();
        self.version += 1;

        info!(%caller, %asset, amount, "withdraw");
        Ok(())
    }

    // ========================================================================
    // Orders
    // ========================================================================

    /// Lock `sell_amount` of the maker's `sell_token` and rest a new order
    ///
    /// # Errors
    ///
    /// - [`ExchangeError::InvalidOrder`] for zero amounts, identical assets or
    ///   an expiration not after `now`
    /// - [`ExchangeError::DuplicateOrderHash`] if the hash was ever used
    /// - [`ExchangeError::InsufficientFunds`] if the maker cannot lock
    pub fn place_order(&mut self, maker: Address, now: u64, request: PlaceOrder) -> Result<()> {
        let result = self.apply_place(maker, now, request);
        rejected("place_order", result)
    }

    fn apply_place(&mut self, maker: Address, now: u64, request: PlaceOrder) -> Result<()> {
        if request.sell_amount == 0 || request.buy_amount == 0 {
            return Err(ExchangeError::InvalidOrder("amounts must be non-zero"));
        }
        if request.sell_token == request.buy_token {
            return Err(ExchangeError::InvalidOrder("sell and buy asset must differ"));
        }
        if request.expiration <= now {
            return Err(ExchangeError::InvalidOrder("expiration must be in the future"));
        }
        if self.orders.contains_hash(request.hash) {
            return Err(ExchangeError::DuplicateOrderHash(request.hash));
        }

        let mut tx = self.balances.transaction();
        tx.lock(maker, request.sell_token, request.sell_amount)?;
        self.orders.insert(Order::new(maker, &request))?;

        tx.commit();
        self.version += 1;

        info!(
            %maker,
            hash = %request.hash,
            sell = %request.sell_token,
            buy = %request.buy_token,
            sell_amount = request.sell_amount,
            buy_amount = request.buy_amount,
            expiration = request.expiration,
            "order placed"
        );
        Ok(())
    }

    /// Cancel an open (or expired) order and unlock its unfilled remainder
    ///
    /// # Errors
    ///
    /// - [`ExchangeError::OrderNotFound`] if no order has this hash
    /// - [`ExchangeError::Unauthorized`] if `caller` is not the maker
    /// - [`ExchangeError::OrderNotOpen`] if the order is Filled or Cancelled
    pub fn cancel_order(&mut self, caller: Address, hash: OrderHash) -> Result<()> {
        let result = self.apply_cancel(caller, hash);
        rejected("cancel_order", result)
    }

    fn apply_cancel(&mut self, caller: Address, hash: OrderHash) -> Result<()> {
        let key = self
            .orders
            .key_of(hash)
            .ok_or(ExchangeError::OrderNotFound(hash))?;
        let order = self
            .orders
            .get(key)
            .ok_or(ExchangeError::OrderNotFound(hash))?;

        if order.maker() != caller {
            return Err(ExchangeError::Unauthorized(caller));
        }
        // Stored status: expired orders are still Open here
        if !order.status().is_open() {
            return Err(ExchangeError::OrderNotOpen(hash));
        }

        let sell_asset = order.sell_asset();
        let remaining = order.remaining();

        let mut tx = self.balances.transaction();
        tx.unlock(caller, sell_asset, remaining)?;

        let cancelled = self
            .orders
            .mark_cancelled(key)
            .map(HistoryEntry::cancelled)
            .ok_or(ExchangeError::OrderNotFound(hash))?;
        self.orders.push_history(caller, cancelled);

        tx.commit();
        self.version += 1;

        info!(%caller, %hash, unlocked = remaining, "order cancelled");
        Ok(())
    }

    /// Pay `pay` units of the order's buy asset and receive its sell asset
    ///
    /// The maker receives `pay` minus the maker fee; the taker receives the
    /// proportional amount of the sell asset minus the taker fee.
    ///
    /// # Errors
    ///
    /// - [`ExchangeError::OrderNotFound`] if `maker` has no order `hash`
    /// - [`ExchangeError::OrderNotOpen`] if filled, cancelled or expired
    /// - [`ExchangeError::OrderOverfill`] if `pay` exceeds the capacity
    /// - [`ExchangeError::OrderDustAmount`] if `pay` buys nothing
    /// - [`ExchangeError::InsufficientFunds`] if the taker cannot pay
    pub fn take_order(
        &mut self,
        taker: Address,
        now: u64,
        maker: Address,
        hash: OrderHash,
        pay: u64,
    ) -> Result<Fill> {
        let result = self.apply_take(taker, now, maker, hash, pay);
        rejected("take_order", result)
    }

    fn apply_take(
        &mut self,
        taker: Address,
        now: u64,
        maker: Address,
        hash: OrderHash,
        pay: u64,
    ) -> Result<Fill> {
        let key = self
            .orders
            .key_of(hash)
            .ok_or(ExchangeError::OrderNotFound(hash))?;
        let order = self
            .orders
            .get(key)
            .filter(|order| order.maker() == maker)
            .ok_or(ExchangeError::OrderNotFound(hash))?;

        if !order.status_at(now).is_open() {
            return Err(ExchangeError::OrderNotOpen(hash));
        }

        let receive = fill::quote(order, pay)?;
        let sell_asset = order.sell_asset();
        let buy_asset = order.buy_asset();
        let recipient = self.fees.recipient();

        let mut tx = self.balances.transaction();
        tx.lock(taker, buy_asset, pay)?;
        let maker_fee = tx.settle(taker, maker, buy_asset, pay, self.fees.maker_rate(), recipient)?;
        let taker_fee =
            tx.settle(maker, taker, sell_asset, receive, self.fees.taker_rate(), recipient)?;

        let updated = self
            .orders
            .apply_fill(key, taker, receive)
            .cloned()
            .ok_or(ExchangeError::OrderNotFound(hash))?;

        self.orders
            .push_history(maker, HistoryEntry::maker_fill(&updated, pay));
        self.orders
            .push_history(taker, HistoryEntry::taker_fill(&updated, receive));
        self.orders.push_trade(TradeRecord {
            hash,
            maker,
            taker,
            sell_asset,
            buy_asset,
            taker_paid: pay,
            taker_received: receive,
            maker_fee,
            taker_fee,
            timestamp: now,
        });

        tx.commit();
        self.version += 1;

        let fill = Fill {
            hash,
            maker,
            taker,
            paid: pay,
            received: receive,
            maker_fee,
            taker_fee,
            status: updated.status(),
        };

        info!(
            %taker,
            %maker,
            %hash,
            paid = pay,
            received = receive,
            maker_fee,
            taker_fee,
            status = ?fill.status,
            "order taken"
        );
        Ok(fill)
    }

    // ========================================================================
    // Balance reads
    // ========================================================================

    /// `available + locked`
    #[inline]
    pub fn balance_of(&self, account: Address, asset: AssetId) -> u64 {
        self.balances.total_of(account, asset)
    }

    /// Withdrawable or lockable units
    #[inline]
    pub fn available_balance_of(&self, account: Address, asset: AssetId) -> u64 {
        self.balances.available_of(account, asset)
    }

    /// Units committed to open orders
    #[inline]
    pub fn locked_balance_of(&self, account: Address, asset: AssetId) -> u64 {
        self.balances.locked_of(account, asset)
    }

    /// Every non-empty balance of `account`
    pub fn balances_of(&self, account: Address) -> Vec<(AssetId, Balance)> {
        self.balances.balances_of(account)
    }

    /// Sum of every account's `available + locked` in `asset`
    pub fn total_supply(&self, asset: AssetId) -> u128 {
        self.balances.asset_supply(asset)
    }

    /// Referrer recorded for `account`
    #[inline]
    pub fn referrer_of(&self, account: Address) -> Option<Address> {
        self.referrals.referrer_of(account)
    }

    // ========================================================================
    // Order reads
    // ========================================================================

    /// Order by hash, with its stored status
    #[inline]
    pub fn order(&self, hash: OrderHash) -> Option<&Order> {
        self.orders.get_by_hash(hash)
    }

    /// Status of `hash` as observed at `now`
    pub fn order_status(&self, hash: OrderHash, now: u64) -> Option<OrderStatus> {
        self.order(hash).map(|order| order.status_at(now))
    }

    /// Open orders placed by `account`, oldest first
    ///
    /// Expired orders stay listed until the maker cancels them.
    pub fn open_orders_by_user(&self, account: Address) -> Vec<Order> {
        self.orders.open_by_maker(account)
    }

    /// Open orders selling `asset`, oldest first
    pub fn open_orders_by_asset(&self, asset: AssetId) -> Vec<Order> {
        self.orders.open_by_sell_asset(asset)
    }

    /// Open orders of `account` that buy `asset`
    pub fn open_buy_orders_by_user_and_asset(&self, account: Address, asset: AssetId) -> Vec<Order> {
        self.orders.open_by_maker_buying(account, asset)
    }

    /// Open orders of `account` that sell `asset`
    pub fn open_sell_orders_by_user_and_asset(&self, account: Address, asset: AssetId) -> Vec<Order> {
        self.orders.open_by_maker_selling(account, asset)
    }

    /// Open orders in the whole book
    #[inline]
    pub fn open_order_count(&self) -> usize {
        self.orders.open_count()
    }

    /// Cancel and fill rows involving `account`, in append order
    #[inline]
    pub fn order_history(&self, account: Address) -> &[HistoryEntry] {
        self.orders.history_of(account)
    }

    /// Trades in which `asset` was bought or sold
    #[inline]
    pub fn trade_history_by_asset(&self, asset: AssetId) -> &[TradeRecord] {
        self.orders.trades_of(asset)
    }

    // ========================================================================
    // Commitment
    // ========================================================================

    /// Versioned SHA-256 root over every balance row and every order
    ///
    /// Balance rows are encoded in (owner, asset) order, orders in placement
    /// order, both as SSZ.
    pub fn state_commitment(&self) -> Result<StateCommitment> {
        let mut data = Vec::new();
        for entry in self.balances.entries() {
            data.extend(ssz_rs::serialize(&entry)?);
        }
        for order in self.orders.iter() {
            data.extend(ssz_rs::serialize(order)?);
        }
        Ok(StateCommitment::from_data(
            self.version,
            self.orders.len() as u64,
            self.balances.row_count() as u64,
            &data,
        ))
    }
}

fn transfer_failed(asset: AssetId, err: GatewayError) -> ExchangeError {
    ExchangeError::TokenTransferFailed {
        asset,
        reason: err.to_string(),
    }
}

fn rejected<T>(operation: &'static str, result: Result<T>) -> Result<T> {
    if let Err(err) = &result {
        warn!(operation, error = %err, "transition rejected");
    }
    result
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::InMemoryGateway;

    const ONE_PERCENT: u64 = 10_000_000_000_000_000;

    fn fee_account() -> Address {
        Address::repeat_byte(0xFE)
    }

    fn maker() -> Address {
        Address::repeat_byte(0xA1)
    }

    fn taker() -> Address {
        Address::repeat_byte(0xB0)
    }

    fn token() -> AssetId {
        AssetId::token(Address::repeat_byte(0x70))
    }

    fn hash(tag: u8) -> OrderHash {
        OrderHash::from_bytes([tag; 32])
    }

    fn request(tag: u8) -> PlaceOrder {
        PlaceOrder {
            sell_amount: 10_000,
            buy_amount: 20_000,
            expiration: 100,
            sell_token: AssetId::NATIVE,
            buy_token: token(),
            hash: hash(tag),
        }
    }

    /// Maker holds 1_000_000 native, taker 1_000_000 token, 1% fees
    fn funded() -> Exchange<InMemoryGateway> {
        let mut gateway = InMemoryGateway::new(Address::repeat_byte(0xEE));
        gateway.mint(AssetId::NATIVE, maker(), 1_000_000);
        gateway.mint(token(), taker(), 1_000_000);
        let fees = FeeSchedule::new(fee_account(), ONE_PERCENT, ONE_PERCENT).unwrap();
        let mut exchange = Exchange::new(fees, gateway);

        exchange
            .deposit(maker(), AssetId::NATIVE, 1_000_000, maker(), Address::ZERO, 1_000_000)
            .unwrap();
        exchange
            .deposit(taker(), token(), 1_000_000, taker(), Address::ZERO, 0)
            .unwrap();
        exchange
    }

    #[test]
    fn test_place_locks_sell_amount() {
        let mut exchange = funded();
        exchange.place_order(maker(), 0, request(1)).unwrap();

        assert_eq!(exchange.available_balance_of(maker(), AssetId::NATIVE), 990_000);
        assert_eq!(exchange.locked_balance_of(maker(), AssetId::NATIVE), 10_000);
        assert_eq!(exchange.balance_of(maker(), AssetId::NATIVE), 1_000_000);
        assert_eq!(exchange.open_orders_by_user(maker()).len(), 1);
    }

    #[test]
    fn test_place_validation() {
        let mut exchange = funded();
        let version = exchange.version();

        let zero = PlaceOrder { sell_amount: 0, ..request(1) };
        assert!(matches!(
            exchange.place_order(maker(), 0, zero),
            Err(ExchangeError::InvalidOrder(_))
        ));

        let same = PlaceOrder { buy_token: AssetId::NATIVE, ..request(1) };
        assert!(matches!(
            exchange.place_order(maker(), 0, same),
            Err(ExchangeError::InvalidOrder(_))
        ));

        assert!(matches!(
            exchange.place_order(maker(), 100, request(1)),
            Err(ExchangeError::InvalidOrder(_))
        ));

        let too_big = PlaceOrder { sell_amount: 1_000_001, ..request(1) };
        assert!(matches!(
            exchange.place_order(maker(), 0, too_big),
            Err(ExchangeError::InsufficientFunds { .. })
        ));

        assert_eq!(exchange.version(), version);
        assert!(exchange.order(hash(1)).is_none());
    }

    #[test]
    fn test_duplicate_hash_rejected() {
        let mut exchange = funded();
        exchange.place_order(maker(), 0, request(1)).unwrap();

        assert_eq!(
            exchange.place_order(maker(), 0, request(1)),
            Err(ExchangeError::DuplicateOrderHash(hash(1)))
        );
        assert_eq!(exchange.locked_balance_of(maker(), AssetId::NATIVE), 10_000);
    }

    #[test]
    fn test_take_settles_with_fees() {
        let mut exchange = funded();
        exchange.place_order(maker(), 0, request(1)).unwrap();

        let fill = exchange.take_order(taker(), 1, maker(), hash(1), 20_000).unwrap();

        assert_eq!(fill.received, 10_000);
        assert_eq!(fill.maker_fee, 200);
        assert_eq!(fill.taker_fee, 100);
        assert_eq!(fill.status, OrderStatus::Filled);

        assert_eq!(exchange.balance_of(maker(), token()), 19_800);
        assert_eq!(exchange.balance_of(maker(), AssetId::NATIVE), 990_000);
        assert_eq!(exchange.balance_of(taker(), AssetId::NATIVE), 9_900);
        assert_eq!(exchange.balance_of(taker(), token()), 980_000);
        assert_eq!(exchange.balance_of(fee_account(), token()), 200);
        assert_eq!(exchange.balance_of(fee_account(), AssetId::NATIVE), 100);
        assert_eq!(exchange.locked_balance_of(taker(), token()), 0);
        assert!(exchange.open_orders_by_user(maker()).is_empty());
    }

    #[test]
    fn test_take_wrong_maker_is_not_found() {
        let mut exchange = funded();
        exchange.place_order(maker(), 0, request(1)).unwrap();

        assert_eq!(
            exchange.take_order(taker(), 1, taker(), hash(1), 20_000),
            Err(ExchangeError::OrderNotFound(hash(1)))
        );
    }

    #[test]
    fn test_expired_order_cannot_be_taken_but_can_be_cancelled() {
        let mut exchange = funded();
        exchange.place_order(maker(), 0, request(1)).unwrap();

        assert_eq!(
            exchange.take_order(taker(), 101, maker(), hash(1), 20_000),
            Err(ExchangeError::OrderNotOpen(hash(1)))
        );
        assert_eq!(exchange.order_status(hash(1), 101), Some(OrderStatus::Expired));
        // Still locked until cancelled
        assert_eq!(exchange.locked_balance_of(maker(), AssetId::NATIVE), 10_000);

        exchange.cancel_order(maker(), hash(1)).unwrap();
        assert_eq!(exchange.locked_balance_of(maker(), AssetId::NATIVE), 0);
        assert_eq!(exchange.order_status(hash(1), 101), Some(OrderStatus::Cancelled));
    }

    #[test]
    fn test_cancel_by_other_account_unauthorized() {
        let mut exchange = funded();
        exchange.place_order(maker(), 0, request(1)).unwrap();

        assert_eq!(
            exchange.cancel_order(taker(), hash(1)),
            Err(ExchangeError::Unauthorized(taker()))
        );
        assert_eq!(
            exchange.cancel_order(maker(), hash(9)),
            Err(ExchangeError::OrderNotFound(hash(9)))
        );
    }

    #[test]
    fn test_rejected_take_leaves_state_unchanged() {
        let mut exchange = funded();
        exchange.place_order(maker(), 0, request(1)).unwrap();
        let before = exchange.state_commitment().unwrap();

        // Taker has no native to pay with on the reverse order
        let reverse = PlaceOrder {
            sell_token: token(),
            buy_token: AssetId::NATIVE,
            ..request(2)
        };
        exchange.place_order(taker(), 0, reverse).unwrap();
        let mid = exchange.state_commitment().unwrap();
        assert_ne!(before, mid);

        let err = exchange
            .take_order(Address::repeat_byte(0xC0), 1, taker(), hash(2), 20_000)
            .unwrap_err();
        assert!(matches!(err, ExchangeError::InsufficientFunds { .. }));
        assert_eq!(exchange.state_commitment().unwrap(), mid);
    }

    #[test]
    fn test_token_deposit_with_attached_value_rejected() {
        let mut exchange = funded();

        assert_eq!(
            exchange.deposit(taker(), token(), 5, taker(), Address::ZERO, 5),
            Err(ExchangeError::InvalidAmount { declared: 0, attached: 5 })
        );
    }

    #[test]
    fn test_failed_push_rolls_back_withdraw() {
        let mut exchange = funded();
        exchange.gateway_mut().freeze(taker());

        let err = exchange.withdraw(taker(), token(), 100).unwrap_err();

        assert!(matches!(err, ExchangeError::TokenTransferFailed { .. }));
        assert_eq!(exchange.balance_of(taker(), token()), 1_000_000);
        assert_eq!(exchange.gateway().custody_of(token()), 1_000_000);
    }

    #[test]
    fn test_commitment_tracks_version() {
        let exchange = funded();
        let commitment = exchange.state_commitment().unwrap();

        assert_eq!(commitment.version, 2);
        assert_eq!(commitment.order_count, 0);
        assert_eq!(commitment.balance_rows, 2);
    }

    #[test]
    fn test_from_config() {
        let config = ExchangeConfig {
            fee_account: fee_account(),
            ..ExchangeConfig::default()
        };
        let exchange = Exchange::from_config(&config, InMemoryGateway::default()).unwrap();

        assert_eq!(exchange.fee_schedule().recipient(), fee_account());
        assert_eq!(exchange.fee_schedule().maker_rate(), ONE_PERCENT);
    }
}
