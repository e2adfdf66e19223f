//! Referral registry.
//!
//! Each account can be associated with the address that referred it. The
//! association is written on the account's first deposit that names a
//! usable candidate and never changes afterwards.

use std::collections::BTreeMap;

use crate::types::Address;

/// Account → referrer, first write wins.
#[derive(Debug, Default, Clone)]
pub struct ReferralRegistry {
    referrers: BTreeMap<Address, Address>,
}

impl ReferralRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `candidate` would be recorded as `account`'s referrer
    ///
    /// True only when `account` has no referrer yet and `candidate` is
    /// non-zero and not `account` itself.
    pub fn accepts(&self, account: Address, candidate: Address) -> bool {
        !candidate.is_zero() && candidate != account && !self.referrers.contains_key(&account)
    }

    /// Record `candidate` if [`ReferralRegistry::accepts`] allows it
    ///
    /// # Returns
    ///
    /// `true` if a new entry was written
    pub fn record(&mut self, account: Address, candidate: Address) -> bool {
        if !self.accepts(account, candidate) {
            return false;
        }
        self.referrers.insert(account, candidate);
        true
    }

    /// Referrer of `account`, if any
    #[inline]
    pub fn referrer_of(&self, account: Address) -> Option<Address> {
        self.referrers.get(&account).copied()
    }

    /// Number of accounts with a referrer
    #[inline]
    pub fn len(&self) -> usize {
        self.referrers.len()
    }

    /// Whether no referral has been recorded
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.referrers.is_empty()
    }

    /// All entries in account order
    pub fn iter(&self) -> impl Iterator<Item = (Address, Address)> + '_ {
        self.referrers.iter().map(|(account, referrer)| (*account, *referrer))
    }
}
