//! Order types for the exchange.
//!
//! ## SSZ Serialization
//!
//! [`Order`] derives `SimpleSerialize` from ssz_rs so the state commitment
//! encodes every order identically on every node. Addresses, assets and the
//! order hash are stored as raw `[u8; 32]` and the status as a `u8`; typed
//! accessors convert on the way out.
//!
//! ## Amounts
//!
//! `sell_amount` and `buy_amount` are integers in each asset's smallest unit.
//! Together they fix the exchange ratio for the life of the order. `filled`
//! counts units of the *sell* asset already delivered to takers.

use std::fmt;
use std::str::FromStr;

use ssz_rs::prelude::*;

use crate::types::address::{Address, AssetId, ParseAddressError, ADDRESS_LEN};

// ============================================================================
// OrderHash
// ============================================================================

/// Maker-supplied unique order identifier.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct OrderHash([u8; 32]);

impl OrderHash {
    /// Wrap raw bytes
    #[inline]
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Raw bytes
    #[inline]
    pub const fn to_bytes(self) -> [u8; 32] {
        self.0
    }
}

impl fmt::Display for OrderHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for OrderHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "OrderHash({})", self)
    }
}

impl FromStr for OrderHash {
    type Err = ParseAddressError;

    /// Order hashes share the 32-byte hex format of addresses
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let addr: Address = s.parse()?;
        Ok(Self(addr.to_bytes()))
    }
}

impl From<[u8; 32]> for OrderHash {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

// ============================================================================
// OrderStatus enum
// ============================================================================

/// Lifecycle state of an order
///
/// Represented as u8 for SSZ compatibility:
/// - Open = 0
/// - PartiallyFilled = 1
/// - Filled = 2
/// - Cancelled = 3
/// - Expired = 4
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum OrderStatus {
    /// Resting, nothing filled yet
    #[default]
    Open,
    /// Resting, some of the sell amount delivered
    PartiallyFilled,
    /// Entire sell amount delivered
    Filled,
    /// Withdrawn by the maker; unfilled remainder unlocked
    Cancelled,
    /// Past its expiration; unmatchable
    Expired,
}

impl OrderStatus {
    /// Convert to u8 for serialization
    pub fn to_u8(self) -> u8 {
        match self {
            OrderStatus::Open => 0,
            OrderStatus::PartiallyFilled => 1,
            OrderStatus::Filled => 2,
            OrderStatus::Cancelled => 3,
            OrderStatus::Expired => 4,
        }
    }

    /// Convert from u8 for deserialization
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(OrderStatus::Open),
            1 => Some(OrderStatus::PartiallyFilled),
            2 => Some(OrderStatus::Filled),
            3 => Some(OrderStatus::Cancelled),
            4 => Some(OrderStatus::Expired),
            _ => None,
        }
    }

    /// Open or PartiallyFilled
    #[inline]
    pub fn is_open(self) -> bool {
        matches!(self, OrderStatus::Open | OrderStatus::PartiallyFilled)
    }

    /// Filled, Cancelled or Expired: the order can no longer change
    #[inline]
    pub fn is_terminal(self) -> bool {
        !self.is_open()
    }
}

// ============================================================================
// PlaceOrder request
// ============================================================================

/// Parameters of a `place_order` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaceOrder {
    /// Units of `sell_token` offered
    pub sell_amount: u64,
    /// Units of `buy_token` requested in exchange
    pub buy_amount: u64,
    /// Timestamp after which the order can no longer be taken
    pub expiration: u64,
    /// Asset the maker gives
    pub sell_token: AssetId,
    /// Asset the maker wants
    pub buy_token: AssetId,
    /// Maker-chosen unique identifier
    pub hash: OrderHash,
}

// ============================================================================
// Order struct
// ============================================================================

/// A resting order.
///
/// ## SSZ Layout
///
/// Fixed-size container of 4 x 32-byte identifiers, the taker, three u64
/// amounts, the status byte and the expiration: 32*5 + 8*3 + 1 + 8 = 193 bytes.
///
/// ## Example
///
/// ```
/// use dark_exchange::types::{Address, AssetId, Order, OrderHash, OrderStatus, PlaceOrder};
///
/// let maker = Address::repeat_byte(0xA1);
/// let order = Order::new(maker, &PlaceOrder {
///     sell_amount: 10_000,
///     buy_amount: 20_000,
///     expiration: 1_700_000_000,
///     sell_token: AssetId::NATIVE,
///     buy_token: AssetId::token(Address::repeat_byte(0x70)),
///     hash: OrderHash::from_bytes([1u8; 32]),
/// });
///
/// assert_eq!(order.status(), OrderStatus::Open);
/// assert_eq!(order.remaining(), 10_000);
/// assert_eq!(order.taker(), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, SimpleSerialize)]
pub struct Order {
    /// Maker-supplied identifier
    pub hash: [u8; ADDRESS_LEN],

    /// Account that placed the order
    pub maker: [u8; ADDRESS_LEN],

    /// Asset given by the maker (all zero = native)
    pub sell_token: [u8; ADDRESS_LEN],

    /// Asset wanted by the maker (all zero = native)
    pub buy_token: [u8; ADDRESS_LEN],

    /// Total units of `sell_token` offered
    pub sell_amount: u64,

    /// Total units of `buy_token` requested
    pub buy_amount: u64,

    /// Cumulative units of `sell_token` delivered to takers
    pub filled: u64,

    /// Status as u8 (see [`OrderStatus`])
    pub status_raw: u8,

    /// Expiration timestamp
    pub expiration: u64,

    /// Most recent counterparty (all zero while untouched)
    pub taker: [u8; ADDRESS_LEN],
}

impl Order {
    /// Create a new open order for `maker`
    pub fn new(maker: Address, request: &PlaceOrder) -> Self {
        Self {
            hash: request.hash.to_bytes(),
            maker: maker.to_bytes(),
            sell_token: request.sell_token.to_bytes(),
            buy_token: request.buy_token.to_bytes(),
            sell_amount: request.sell_amount,
            buy_amount: request.buy_amount,
            filled: 0,
            status_raw: OrderStatus::Open.to_u8(),
            expiration: request.expiration,
            taker: [0u8; ADDRESS_LEN],
        }
    }

    /// Order identifier
    #[inline]
    pub fn order_hash(&self) -> OrderHash {
        OrderHash::from_bytes(self.hash)
    }

    /// Maker address
    #[inline]
    pub fn maker(&self) -> Address {
        Address::from_bytes(self.maker)
    }

    /// Asset given by the maker
    #[inline]
    pub fn sell_asset(&self) -> AssetId {
        AssetId::from(self.sell_token)
    }

    /// Asset wanted by the maker
    #[inline]
    pub fn buy_asset(&self) -> AssetId {
        AssetId::from(self.buy_token)
    }

    /// Most recent counterparty, if any
    #[inline]
    pub fn taker(&self) -> Option<Address> {
        let taker = Address::from_bytes(self.taker);
        if taker.is_zero() {
            None
        } else {
            Some(taker)
        }
    }

    /// Record the most recent counterparty
    #[inline]
    pub fn set_taker(&mut self, taker: Address) {
        self.taker = taker.to_bytes();
    }

    /// Stored status (does not account for expiry, see [`Order::status_at`])
    pub fn status(&self) -> OrderStatus {
        OrderStatus::from_u8(self.status_raw).unwrap_or(OrderStatus::Open)
    }

    /// Set the stored status
    pub fn set_status(&mut self, status: OrderStatus) {
        self.status_raw = status.to_u8();
    }

    /// Status as observed at time `now`
    ///
    /// Expiry is evaluated lazily: an open order whose expiration has passed
    /// reports [`OrderStatus::Expired`] without any stored transition.
    pub fn status_at(&self, now: u64) -> OrderStatus {
        let status = self.status();
        if status.is_open() && self.is_expired(now) {
            OrderStatus::Expired
        } else {
            status
        }
    }

    /// Whether `now` is past the expiration
    #[inline]
    pub fn is_expired(&self, now: u64) -> bool {
        now > self.expiration
    }

    /// Units of the sell asset still locked for this order
    #[inline]
    pub fn remaining(&self) -> u64 {
        self.sell_amount.saturating_sub(self.filled)
    }

    /// Check if the order is fully filled
    #[inline]
    pub fn is_filled(&self) -> bool {
        self.filled >= self.sell_amount
    }

    /// Record delivery of `amount` sell units and recompute the status
    ///
    /// Returns the amount actually applied (never more than remaining).
    pub fn fill(&mut self, amount: u64) -> u64 {
        let applied = amount.min(self.remaining());
        self.filled += applied;
        if self.is_filled() {
            self.set_status(OrderStatus::Filled);
        } else if self.filled > 0 {
            self.set_status(OrderStatus::PartiallyFilled);
        }
        applied
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
