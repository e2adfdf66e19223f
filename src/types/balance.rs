//! Per-account, per-asset balance record.

use ssz_rs::prelude::*;

use crate::types::address::{Address, AssetId, ADDRESS_LEN};

/// Available and locked units of one asset held by one account.
///
/// `available` can be withdrawn or locked into an order; `locked` is
/// committed to open orders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Balance {
    /// Immediately withdrawable or lockable
    pub available: u64,
    /// Committed to open orders
    pub locked: u64,
}

impl Balance {
    /// Create a balance record
    pub const fn new(available: u64, locked: u64) -> Self {
        Self { available, locked }
    }

    /// `available + locked`
    ///
    /// The ledger rejects credits that would make this sum exceed
    /// `u64::MAX`, so the saturation never triggers for ledger rows.
    #[inline]
    pub fn total(&self) -> u64 {
        self.available.saturating_add(self.locked)
    }

    /// Whether both sides are zero
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.available == 0 && self.locked == 0
    }
}

/// SSZ container for one ledger row, used when computing the state root.
#[derive(Debug, Clone, PartialEq, Eq, Default, SimpleSerialize)]
pub struct BalanceEntry {
    /// Account owning the balance
    pub owner: [u8; ADDRESS_LEN],
    /// Asset identifier (all zero = native)
    pub asset: [u8; ADDRESS_LEN],
    /// Available units
    pub available: u64,
    /// Locked units
    pub locked: u64,
}

impl BalanceEntry {
    /// Build an entry from a ledger row
    pub fn new(owner: Address, asset: AssetId, balance: Balance) -> Self {
        Self {
            owner: owner.to_bytes(),
            asset: asset.to_bytes(),
            available: balance.available,
            locked: balance.locked,
        }
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
