//! Core data types for the exchange
//!
//! Types stored in the state commitment implement SSZ serialization for
//! deterministic encoding. All amounts are unsigned integers in an asset's
//! smallest unit.
//!
//! ## Types
//!
//! - [`Address`] / [`AssetId`]: 32-byte identifiers; native asset = all zero
//! - [`Order`] / [`OrderStatus`] / [`OrderHash`]: resting orders
//! - [`Balance`]: available vs. locked units
//! - [`HistoryEntry`] / [`TradeRecord`]: settlement snapshots
//! - [`StateCommitment`]: versioned state root
//!
//! ## Fixed-Point Rates
//!
//! Fee rates are `u64` scaled by 10^18, see [`rate`].

mod address;
mod balance;
mod history;
mod order;
mod receipt;
pub mod rate;

pub use address::{Address, AssetId, AssetKind, ParseAddressError, ADDRESS_LEN};
pub use balance::{Balance, BalanceEntry};
pub use history::{HistoryEntry, HistoryEvent, TradeRecord};
pub use order::{Order, OrderHash, OrderStatus, PlaceOrder};
pub use receipt::StateCommitment;
