//! Balance ledger with staged, all-or-nothing transactions.
//!
//! ## Design
//!
//! Rows are keyed by `(owner, asset)` in a `BTreeMap`, so iteration order
//! (and therefore the state root) is deterministic.
//!
//! Every mutation goes through a [`BalanceTx`]. The transaction stages
//! modified rows on the side and only writes them back on
//! [`BalanceTx::commit`]. Dropping a transaction, which is what happens when
//! any step returns `Err` and `?` unwinds the caller, discards every staged
//! change. A transition therefore either applies all of its balance moves or
//! none of them.
//!
//! ```text
//! begin ──► lock / unlock / credit / debit / settle ──► commit
//!                          │
//!                          └── Err ──► drop (nothing written)
//! ```

use std::collections::BTreeMap;

use crate::error::{ExchangeError, Result};
use crate::fees::compute_fee;
use crate::types::{Address, AssetId, Balance, BalanceEntry};

/// Committed per-account, per-asset balances.
#[derive(Debug, Default, Clone)]
pub struct BalanceLedger {
    rows: BTreeMap<(Address, AssetId), Balance>,
}

impl BalanceLedger {
    /// Create an empty ledger
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a staged transaction
    pub fn transaction(&mut self) -> BalanceTx<'_> {
        BalanceTx {
            ledger: self,
            staged: BTreeMap::new(),
        }
    }

    // ========================================================================
    // Reads
    // ========================================================================

    /// Balance record (zero if the row does not exist)
    #[inline]
    pub fn get(&self, owner: Address, asset: AssetId) -> Balance {
        self.rows.get(&(owner, asset)).copied().unwrap_or_default()
    }

    /// `available + locked`
    #[inline]
    pub fn total_of(&self, owner: Address, asset: AssetId) -> u64 {
        self.get(owner, asset).total()
    }

    /// Available units
    #[inline]
    pub fn available_of(&self, owner: Address, asset: AssetId) -> u64 {
        self.get(owner, asset).available
    }

    /// Locked units
    #[inline]
    pub fn locked_of(&self, owner: Address, asset: AssetId) -> u64 {
        self.get(owner, asset).locked
    }

    /// Every non-empty balance held by `owner`, ordered by asset
    pub fn balances_of(&self, owner: Address) -> Vec<(AssetId, Balance)> {
        self.rows
            .range((owner, AssetId::NATIVE)..)
            .take_while(|((row_owner, _), _)| *row_owner == owner)
            .map(|((_, asset), balance)| (*asset, *balance))
            .collect()
    }

    /// Sum of `available + locked` over every account for `asset`
    ///
    /// Computed in u128 so that the conservation check itself cannot overflow.
    pub fn asset_supply(&self, asset: AssetId) -> u128 {
        self.rows
            .iter()
            .filter(|((_, row_asset), _)| *row_asset == asset)
            .map(|(_, balance)| balance.available as u128 + balance.locked as u128)
            .sum()
    }

    /// Number of non-empty rows
    #[inline]
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// SSZ rows in key order, for the state commitment
    pub fn entries(&self) -> impl Iterator<Item = BalanceEntry> + '_ {
        self.rows
            .iter()
            .map(|((owner, asset), balance)| BalanceEntry::new(*owner, *asset, *balance))
    }
}

// ============================================================================
// BalanceTx
// ============================================================================

/// Staged set of balance changes against a [`BalanceLedger`].
///
/// Reads see staged values first, so a sequence of operations composes as if
/// applied in place.
#[derive(Debug)]
pub struct BalanceTx<'a> {
    ledger: &'a mut BalanceLedger,
    staged: BTreeMap<(Address, AssetId), Balance>,
}

impl<'a> BalanceTx<'a> {
    /// Current (staged or committed) balance
    #[inline]
    pub fn get(&self, owner: Address, asset: AssetId) -> Balance {
        self.staged
            .get(&(owner, asset))
            .copied()
            .unwrap_or_else(|| self.ledger.get(owner, asset))
    }

    #[inline]
    fn put(&mut self, owner: Address, asset: AssetId, balance: Balance) {
        self.staged.insert((owner, asset), balance);
    }

    /// Add `amount` to `available`
    pub fn credit(&mut self, owner: Address, asset: AssetId, amount: u64) -> Result<()> {
        let mut balance = self.get(owner, asset);
        balance.available = balance
            .available
            .checked_add(amount)
            .ok_or(ExchangeError::Overflow)?;
        // available + locked must stay representable
        balance
            .available
            .checked_add(balance.locked)
            .ok_or(ExchangeError::Overflow)?;
        self.put(owner, asset, balance);
        Ok(())
    }

    /// Remove `amount` from `available`
    pub fn debit(&mut self, owner: Address, asset: AssetId, amount: u64) -> Result<()> {
        let mut balance = self.get(owner, asset);
        balance.available = balance.available.checked_sub(amount).ok_or(
            ExchangeError::InsufficientFunds {
                account: owner,
                asset,
                have: balance.available,
                need: amount,
            },
        )?;
        self.put(owner, asset, balance);
        Ok(())
    }

    /// Move `amount` from `available` to `locked`
    pub fn lock(&mut self, owner: Address, asset: AssetId, amount: u64) -> Result<()> {
        let mut balance = self.get(owner, asset);
        if balance.available < amount {
            return Err(ExchangeError::InsufficientFunds {
                account: owner,
                asset,
                have: balance.available,
                need: amount,
            });
        }
        balance.available -= amount;
        balance.locked += amount;
        self.put(owner, asset, balance);
        tracing::debug!(%owner, %asset, amount, "locked");
        Ok(())
    }

    /// Move `amount` from `locked` back to `available`
    pub fn unlock(&mut self, owner: Address, asset: AssetId, amount: u64) -> Result<()> {
        let mut balance = self.get(owner, asset);
        if balance.locked < amount {
            return Err(ExchangeError::InsufficientFunds {
                account: owner,
                asset,
                have: balance.locked,
                need: amount,
            });
        }
        balance.locked -= amount;
        balance.available += amount;
        self.put(owner, asset, balance);
        tracing::debug!(%owner, %asset, amount, "unlocked");
        Ok(())
    }

    /// Remove `amount` from `locked`
    fn debit_locked(&mut self, owner: Address, asset: AssetId, amount: u64) -> Result<()> {
        let mut balance = self.get(owner, asset);
        balance.locked = balance.locked.checked_sub(amount).ok_or(
            ExchangeError::InsufficientFunds {
                account: owner,
                asset,
                have: balance.locked,
                need: amount,
            },
        )?;
        self.put(owner, asset, balance);
        Ok(())
    }

    /// Pay `gross` out of `from`'s locked funds to `to`, minus a fee
    ///
    /// `fee = floor(gross * fee_rate / 10^18)` goes to `fee_recipient`,
    /// `gross - fee` to `to`. The two credits always add up to `gross`.
    ///
    /// # Returns
    ///
    /// The fee withheld
    pub fn settle(
        &mut self,
        from: Address,
        to: Address,
        asset: AssetId,
        gross: u64,
        fee_rate: u64,
        fee_recipient: Address,
    ) -> Result<u64> {
        let fee = compute_fee(gross, fee_rate);
        self.debit_locked(from, asset, gross)?;
        self.credit(to, asset, gross - fee)?;
        self.credit(fee_recipient, asset, fee)?;
        tracing::debug!(%from, %to, %asset, gross, fee, "settled");
        Ok(fee)
    }

    /// Write every staged row back to the ledger
    ///
    /// Rows that end up empty are dropped so that "never touched" and
    /// "drained to zero" share one canonical representation.
    pub fn commit(self) {
        for (key, balance) in self.staged {
            if balance.is_empty() {
                self.ledger.rows.remove(&key);
            } else {
                self.ledger.rows.insert(key, balance);
            }
        }
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
