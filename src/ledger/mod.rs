//! Balance ledger and referral registry.
//!
//! ## Components
//!
//! - [`BalanceLedger`]: committed `(owner, asset) → (available, locked)` rows
//! - [`BalanceTx`]: staged mutations (`credit`, `debit`, `lock`, `unlock`,
//!   `settle`) applied atomically on commit
//! - [`ReferralRegistry`]: one-time referrer per account

pub mod balances;
pub mod referral;

pub use balances::{BalanceLedger, BalanceTx};
pub use referral::ReferralRegistry;
