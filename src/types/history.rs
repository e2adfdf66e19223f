//! Order history entries and the per-asset trade log.
//!
//! History rows are snapshots taken at the moment of a cancel or a take.
//! One row is produced per settlement event, so an order that is partially
//! filled and later completed shows up several times for each party.

use crate::types::address::{Address, AssetId};
use crate::types::order::{Order, OrderHash, OrderStatus};

/// What produced a history row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HistoryEvent {
    /// The maker cancelled the order
    Cancel,
    /// A taker consumed part or all of the order
    Fill,
}

/// Immutable snapshot of an order, seen from one party.
///
/// For the maker, `sell_token`/`buy_token` are the order's own. For the
/// taker they are swapped: the taker sold what the maker was buying.
///
/// `filled` is event-scoped on fills: the gross amount the owning party
/// received in that settlement. On a cancel it is the order's cumulative
/// `filled` at the time of cancellation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    /// Order identifier
    pub hash: OrderHash,
    /// Order maker
    pub maker: Address,
    /// Counterparty of this event (None for cancels of untouched orders)
    pub taker: Option<Address>,
    /// Asset given, from this party's point of view
    pub sell_token: AssetId,
    /// Asset received, from this party's point of view
    pub buy_token: AssetId,
    /// Order size on the `sell_token` side
    pub sell_amount: u64,
    /// Order size on the `buy_token` side
    pub buy_amount: u64,
    /// See type docs
    pub filled: u64,
    /// Order status right after the event
    pub status: OrderStatus,
    /// Order expiration
    pub expiration: u64,
    /// Kind of event
    pub event: HistoryEvent,
}

impl HistoryEntry {
    /// Maker's row for a cancel
    pub fn cancelled(order: &Order) -> Self {
        Self {
            hash: order.order_hash(),
            maker: order.maker(),
            taker: order.taker(),
            sell_token: order.sell_asset(),
            buy_token: order.buy_asset(),
            sell_amount: order.sell_amount,
            buy_amount: order.buy_amount,
            filled: order.filled,
            status: order.status(),
            expiration: order.expiration,
            event: HistoryEvent::Cancel,
        }
    }

    /// Maker's row for a fill; `received` is in the order's buy asset
    pub fn maker_fill(order: &Order, received: u64) -> Self {
        Self {
            filled: received,
            event: HistoryEvent::Fill,
            ..Self::cancelled(order)
        }
    }

    /// Taker's row for a fill; `received` is in the order's sell asset
    pub fn taker_fill(order: &Order, received: u64) -> Self {
        Self {
            hash: order.order_hash(),
            maker: order.maker(),
            taker: order.taker(),
            sell_token: order.buy_asset(),
            buy_token: order.sell_asset(),
            sell_amount: order.buy_amount,
            buy_amount: order.sell_amount,
            filled: received,
            status: order.status(),
            expiration: order.expiration,
            event: HistoryEvent::Fill,
        }
    }
}

/// One settled take, recorded under both assets of the pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TradeRecord {
    /// Order that was taken
    pub hash: OrderHash,
    /// Resting party
    pub maker: Address,
    /// Consuming party
    pub taker: Address,
    /// Asset the maker delivered
    pub sell_asset: AssetId,
    /// Asset the taker delivered
    pub buy_asset: AssetId,
    /// Gross units of `buy_asset` paid by the taker
    pub taker_paid: u64,
    /// Gross units of `sell_asset` delivered to the taker
    pub taker_received: u64,
    /// Fee withheld from the maker's proceeds (in `buy_asset`)
    pub maker_fee: u64,
    /// Fee withheld from the taker's proceeds (in `sell_asset`)
    pub taker_fee: u64,
    /// Block time of the take
    pub timestamp: u64,
}

// ============================================================================
// Unit Tests
// ============================================================================
