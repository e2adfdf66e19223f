//! # Dark Exchange
//!
//! Non-custodial exchange core: balance ledger and order-matching engine.
//!
//! ## Architecture
//!
//! The exchange consists of:
//! - **Types**: Core data structures (Address, Order, Balance, StateCommitment)
//! - **Ledger**: Available/locked balances with staged transactions, referrals
//! - **Fees**: Fixed-point maker/taker fee computation
//! - **OrderBook**: Slab-backed order store, open-order indices, history
//! - **Engine**: Deposit, withdraw, place, cancel and take transitions
//!
//! ## Design Principles
//!
//! 1. **Determinism**: All operations produce identical results for identical inputs
//! 2. **No Floating Point**: All amounts are integers; fee rates are scaled by 10^18
//! 3. **Conservation**: Per asset, balances change only by deposits minus withdrawals
//! 4. **Atomicity**: A rejected transition changes nothing

// ============================================================================
// Module declarations
// ============================================================================

/// Core data types: Address, Order, Balance, StateCommitment
pub mod types;

/// Error taxonomy
pub mod error;

/// Fee engine
pub mod fees;

/// Balance ledger and referral registry
pub mod ledger;

/// Order store: slab-based storage, indices and history
pub mod orderbook;

/// Matching engine: exchange transitions and the token boundary
pub mod engine;

/// Deployment configuration
pub mod config;

// ============================================================================
// Re-exports for convenience
// ============================================================================

pub use config::ExchangeConfig;
pub use engine::{AssetGateway, Exchange, Fill, InMemoryGateway};
pub use error::{ExchangeError, Result};
pub use fees::FeeSchedule;
pub use types::{Address, AssetId, Order, OrderHash, OrderStatus, PlaceOrder, StateCommitment};
