//! Order storage for the Dark Exchange.
//!
//! ## Architecture
//!
//! Orders are never physically deleted. Once placed they live in the
//! slab-backed [`OrderStore`] forever; what changes is whether they sit in
//! the open-order indices.
//!
//! - **Slab-based storage**: O(1) insertion and lookup, keys in placement order
//! - **Hash index**: order hash → slab key, permanent
//! - **Open indices**: by maker, by sell asset, by (maker, buy asset)
//! - **History**: append-only per-account rows and per-asset trades
//!
//! ## Components
//!
//! - [`OpenOrderIndex`]: open-order buckets
//! - [`HistoryLog`]: history rows and trade log
//! - [`OrderStore`]: owns both and keeps them in lock-step with order status
//!
//! ## Performance
//!
//! | Operation | Complexity |
//! |-----------|------------|
//! | Insert order | O(log n) |
//! | Lookup by hash | O(1) |
//! | Fill / cancel | O(log n) |
//! | Open orders of maker | O(k) |

pub mod history;
pub mod index;
pub mod store;

pub use history::HistoryLog;
pub use index::OpenOrderIndex;
pub use store::OrderStore;
