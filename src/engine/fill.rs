//! Fill arithmetic for takes.
//!
//! An order fixes the ratio `sell_amount : buy_amount`. A taker names how
//! much of the buy asset it pays; the order delivers the proportional,
//! floored amount of the sell asset.
//!
//! ```text
//! capacity = buy_amount - floor(filled * buy_amount / sell_amount)
//! receive  = floor(sell_amount * pay / buy_amount)
//! ```
//!
//! Flooring leaves dust behind on every partial take. A take that pays the
//! entire remaining capacity therefore receives the entire unfilled
//! remainder, so every order can be driven to Filled.

use crate::error::{ExchangeError, Result};
use crate::types::rate::mul_div_floor;
use crate::types::{Address, Order, OrderHash, OrderStatus};

/// Outcome of a successful take.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fill {
    /// Order taken
    pub hash: OrderHash,
    /// Resting party
    pub maker: Address,
    /// Consuming party
    pub taker: Address,
    /// Gross buy-asset units paid by the taker
    pub paid: u64,
    /// Gross sell-asset units delivered to the taker
    pub received: u64,
    /// Withheld from the maker's proceeds, in the buy asset
    pub maker_fee: u64,
    /// Withheld from the taker's proceeds, in the sell asset
    pub taker_fee: u64,
    /// Order status after the take
    pub status: OrderStatus,
}

impl Fill {
    /// Buy-asset units credited to the maker
    #[inline]
    pub fn maker_net(&self) -> u64 {
        self.paid - self.maker_fee
    }

    /// Sell-asset units credited to the taker
    #[inline]
    pub fn taker_net(&self) -> u64 {
        self.received - self.taker_fee
    }
}

/// Buy-asset units the order can still absorb
pub fn capacity(order: &Order) -> u64 {
    let consumed = mul_div_floor(order.filled, order.buy_amount, order.sell_amount)
        .unwrap_or(order.buy_amount);
    order.buy_amount.saturating_sub(consumed)
}

/// Sell-asset units delivered for paying `pay`
///
/// # Errors
///
/// - [`ExchangeError::OrderDustAmount`] if `pay` is zero or buys nothing
/// - [`ExchangeError::OrderOverfill`] if `pay` exceeds [`capacity`]
pub fn quote(order: &Order, pay: u64) -> Result<u64> {
    if pay == 0 {
        return Err(ExchangeError::OrderDustAmount(pay));
    }

    let capacity = capacity(order);
    if pay > capacity {
        return Err(ExchangeError::OrderOverfill {
            offered: pay,
            capacity,
        });
    }

    let receive = if pay == capacity {
        order.remaining()
    } else {
        mul_div_floor(order.sell_amount, pay, order.buy_amount)
            .ok_or(ExchangeError::Overflow)?
            .min(order.remaining())
    };

    if receive == 0 {
        return Err(ExchangeError::OrderDustAmount(pay));
    }
    Ok(receive)
}

// ============================================================================
// Unit Tests
// ============================================================================
