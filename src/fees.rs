//! Fee engine.
//!
//! `fee = floor(gross * rate / 10^18)`. Rates are fixed at deployment and
//! never change afterwards. Because the fee floors and the payee gets
//! `gross - fee`, a settlement always credits exactly `gross` in total; the
//! rounding bias is toward the fee recipient receiving at most the exact fee.

use crate::error::{ExchangeError, Result};
use crate::types::rate::{format_rate, mul_div_floor, FEE_SCALE};
use crate::types::Address;

/// Compute the fee on `gross` at fixed-point `rate`
///
/// # Example
///
/// ```
/// use dark_exchange::fees::compute_fee;
///
/// // 1% of 20_000
/// assert_eq!(compute_fee(20_000, 10_000_000_000_000_000), 200);
/// // rounds down
/// assert_eq!(compute_fee(99, 10_000_000_000_000_000), 0);
/// ```
#[inline]
pub fn compute_fee(gross: u64, rate: u64) -> u64 {
    // rate <= FEE_SCALE is enforced at construction, so the quotient never
    // exceeds gross; min() keeps the guarantee for direct callers too.
    mul_div_floor(gross, rate, FEE_SCALE).map_or(gross, |fee| fee.min(gross))
}

/// Maker/taker rates and the account that collects fees.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeeSchedule {
    recipient: Address,
    maker_rate: u64,
    taker_rate: u64,
}

impl FeeSchedule {
    /// Build a schedule, rejecting rates above 100%
    pub fn new(recipient: Address, maker_rate: u64, taker_rate: u64) -> Result<Self> {
        for (name, rate) in [("maker", maker_rate), ("taker", taker_rate)] {
            if rate > FEE_SCALE {
                return Err(ExchangeError::InvalidConfig(format!(
                    "{} fee rate {} exceeds 100%",
                    name,
                    format_rate(rate)
                )));
            }
        }
        Ok(Self {
            recipient,
            maker_rate,
            taker_rate,
        })
    }

    /// Account credited with every fee
    #[inline]
    pub fn recipient(&self) -> Address {
        self.recipient
    }

    /// Rate charged on what the maker receives
    #[inline]
    pub fn maker_rate(&self) -> u64 {
        self.maker_rate
    }

    /// Rate charged on what the taker receives
    #[inline]
    pub fn taker_rate(&self) -> u64 {
        self.taker_rate
    }

    /// Maker fee on `gross`
    #[inline]
    pub fn maker_fee(&self, gross: u64) -> u64 {
        compute_fee(gross, self.maker_rate)
    }

    /// Taker fee on `gross`
    #[inline]
    pub fn taker_fee(&self, gross: u64) -> u64 {
        compute_fee(gross, self.taker_rate)
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
