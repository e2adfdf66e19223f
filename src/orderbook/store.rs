//! Durable order store.
//!
//! ## Architecture
//!
//! - **Slab**: every order ever placed, keyed by a `usize` handed out in
//!   placement order. Orders are never removed, so keys are never reused.
//! - **HashMap**: order hash → slab key, covering open *and* terminal
//!   orders. A hash stays taken forever.
//! - **OpenOrderIndex**: open orders by maker, by sell asset, and by
//!   (maker, buy asset).
//! - **HistoryLog**: per-account history rows and per-asset trades.
//!
//! ## Memory Model
//!
//! Per slab docs (https://docs.rs/slab/0.4.11):
//! - `Slab::with_capacity(n)` pre-allocates n slots
//! - O(1) insert and lookup
//!
//! ## Lock-step Updates
//!
//! Status changes go through [`OrderStore::apply_fill`] and
//! [`OrderStore::mark_cancelled`], which update the order and the open
//! indices together. There is no `get_mut` escape hatch.
//!
//! ## Example
//!
//! ```
//! use dark_exchange::orderbook::OrderStore;
//! use dark_exchange::types::{Address, AssetId, Order, OrderHash, PlaceOrder};
//!
//! let mut store = OrderStore::with_capacity(1_000);
//! let maker = Address::repeat_byte(0xA1);
//! let order = Order::new(maker, &PlaceOrder {
//!     sell_amount: 10_000,
//!     buy_amount: 20_000,
//!     expiration: 100,
//!     sell_token: AssetId::NATIVE,
//!     buy_token: AssetId::token(Address::repeat_byte(0x70)),
//!     hash: OrderHash::from_bytes([1u8; 32]),
//! });
//!
//! store.insert(order).unwrap();
//! assert_eq!(store.open_by_maker(maker).len(), 1);
//! ```

use std::collections::HashMap;

use slab::Slab;

use crate::error::{ExchangeError, Result};
use crate::orderbook::{HistoryLog, OpenOrderIndex};
use crate::types::{
    Address, AssetId, HistoryEntry, Order, OrderHash, OrderStatus, TradeRecord,
};

/// Orders, their indices, and settlement history.
#[derive(Debug, Default)]
pub struct OrderStore {
    /// Every order ever placed
    orders: Slab<Order>,

    /// Order hash to slab key mapping
    by_hash: HashMap<OrderHash, usize>,

    /// Open-order buckets
    open: OpenOrderIndex,

    /// History rows and trade log
    history: HistoryLog,
}

impl OrderStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store with pre-allocated capacity
    pub fn with_capacity(order_capacity: usize) -> Self {
        Self {
            orders: Slab::with_capacity(order_capacity),
            by_hash: HashMap::with_capacity(order_capacity),
            open: OpenOrderIndex::new(),
            history: HistoryLog::new(),
        }
    }

    // ========================================================================
    // Capacity and Size
    // ========================================================================

    /// Orders ever placed
    #[inline]
    pub fn len(&self) -> usize {
        self.orders.len()
    }

    /// Whether no order was ever placed
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    /// Orders currently open
    #[inline]
    pub fn open_count(&self) -> usize {
        self.open.len()
    }

    // ========================================================================
    // Order Management
    // ========================================================================

    /// Whether `hash` has ever been used
    #[inline]
    pub fn contains_hash(&self, hash: OrderHash) -> bool {
        self.by_hash.contains_key(&hash)
    }

    /// Insert a new order and index it as open
    ///
    /// # Returns
    ///
    /// The slab key of the stored order
    pub fn insert(&mut self, order: Order) -> Result<usize> {
        let hash = order.order_hash();
        if self.contains_hash(hash) {
            return Err(ExchangeError::DuplicateOrderHash(hash));
        }

        let is_open = order.status().is_open();
        let key = self.orders.insert(order);
        self.by_hash.insert(hash, key);
        if is_open {
            self.open.insert(key, &self.orders[key]);
        }
        Ok(key)
    }

    /// Slab key for `hash`
    #[inline]
    pub fn key_of(&self, hash: OrderHash) -> Option<usize> {
        self.by_hash.get(&hash).copied()
    }

    /// Order by slab key
    #[inline]
    pub fn get(&self, key: usize) -> Option<&Order> {
        self.orders.get(key)
    }

    /// Order by hash
    #[inline]
    pub fn get_by_hash(&self, hash: OrderHash) -> Option<&Order> {
        self.key_of(hash).and_then(|key| self.orders.get(key))
    }

    /// Record delivery of `amount` sell units to `taker`
    ///
    /// Updates `filled`, status and taker, and leaves the open indices once
    /// the order is Filled. Returns the updated order.
    pub fn apply_fill(&mut self, key: usize, taker: Address, amount: u64) -> Option<&Order> {
        let order = self.orders.get_mut(key)?;
        order.fill(amount);
        order.set_taker(taker);
        if order.status() == OrderStatus::Filled {
            self.open.remove(key, &self.orders[key]);
        }
        self.orders.get(key)
    }

    /// Mark an order Cancelled and drop it from the open indices
    pub fn mark_cancelled(&mut self, key: usize) -> Option<&Order> {
        let order = self.orders.get_mut(key)?;
        order.set_status(OrderStatus::Cancelled);
        self.open.remove(key, &self.orders[key]);
        self.orders.get(key)
    }

    // ========================================================================
    // Open-order queries (placement order)
    // ========================================================================

    fn collect(&self, keys: impl Iterator<Item = usize>) -> Vec<Order> {
        keys.filter_map(|key| self.orders.get(key)).cloned().collect()
    }

    /// Open orders placed by `maker`
    pub fn open_by_maker(&self, maker: Address) -> Vec<Order> {
        self.collect(self.open.by_maker(maker))
    }

    /// Open orders selling `asset`
    pub fn open_by_sell_asset(&self, asset: AssetId) -> Vec<Order> {
        self.collect(self.open.by_sell_asset(asset))
    }

    /// Open orders of `maker` that buy `asset`
    pub fn open_by_maker_buying(&self, maker: Address, asset: AssetId) -> Vec<Order> {
        self.collect(self.open.by_maker_buy_asset(maker, asset))
    }

    /// Open orders of `maker` that sell `asset`
    pub fn open_by_maker_selling(&self, maker: Address, asset: AssetId) -> Vec<Order> {
        self.collect(
            self.open
                .by_maker(maker)
                .filter(|key| self.orders[*key].sell_asset() == asset),
        )
    }

    /// Every order in placement order
    pub fn iter(&self) -> impl Iterator<Item = &Order> + '_ {
        self.orders.iter().map(|(_, order)| order)
    }

    // ========================================================================
    // History
    // ========================================================================

    /// Append a history row for `account`
    #[inline]
    pub fn push_history(&mut self, account: Address, entry: HistoryEntry) {
        self.history.push_entry(account, entry);
    }

    /// Append a trade to the per-asset log
    #[inline]
    pub fn push_trade(&mut self, record: TradeRecord) {
        self.history.push_trade(record);
    }

    /// `account`'s history rows
    #[inline]
    pub fn history_of(&self, account: Address) -> &[HistoryEntry] {
        self.history.entries(account)
    }

    /// Trades touching `asset`
    #[inline]
    pub fn trades_of(&self, asset: AssetId) -> &[TradeRecord] {
        self.history.trades(asset)
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
