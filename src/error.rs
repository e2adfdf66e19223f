//! Error types for the exchange
//!
//! Every variant except [`ExchangeError::Config`] and
//! [`ExchangeError::Serialization`] is a rejection of one
//! attempted transition: the state is left exactly as it was and the
//! exchange stays usable.

use thiserror::Error;

use crate::types::{Address, AssetId, OrderHash};

/// Result type for exchange operations
pub type Result<T> = std::result::Result<T, ExchangeError>;

/// Exchange errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExchangeError {
    /// Native deposit amount differs from the value attached to the call
    #[error("invalid amount: declared {declared}, attached {attached}")]
    InvalidAmount {
        /// Amount named in the call
        declared: u64,
        /// Native value actually transferred
        attached: u64,
    },

    /// External token pull or push failed
    #[error("token transfer failed for {asset}: {reason}")]
    TokenTransferFailed {
        /// Asset being moved
        asset: AssetId,
        /// Reason reported by the gateway
        reason: String,
    },

    /// Source sub-balance is short
    #[error("insufficient funds: {account} has {have} of {asset}, needs {need}")]
    InsufficientFunds {
        /// Account being debited
        account: Address,
        /// Asset being debited
        asset: AssetId,
        /// Units held on the debited side
        have: u64,
        /// Units required
        need: u64,
    },

    /// No such order for this maker
    #[error("order not found: {0}")]
    OrderNotFound(OrderHash),

    /// Order is filled, cancelled or expired
    #[error("order not open: {0}")]
    OrderNotOpen(OrderHash),

    /// Taker offered more than the order can absorb
    #[error("order overfill: offered {offered}, capacity {capacity}")]
    OrderOverfill {
        /// Amount offered by the taker
        offered: u64,
        /// Remaining buy-side capacity
        capacity: u64,
    },

    /// Take would deliver zero units
    #[error("dust amount: {0} buys nothing from this order")]
    OrderDustAmount(u64),

    /// Order hash has been used before
    #[error("duplicate order hash: {0}")]
    DuplicateOrderHash(OrderHash),

    /// Order parameters rejected
    #[error("invalid order: {0}")]
    InvalidOrder(&'static str),

    /// Caller is not allowed to act on this resource
    #[error("unauthorized: {0}")]
    Unauthorized(Address),

    /// Arithmetic would leave the u64 range
    #[error("arithmetic overflow")]
    Overflow,

    /// Deployment parameters rejected
    #[error("invalid config: {0}")]
    InvalidConfig(String),

    /// Configuration could not be loaded
    #[error("configuration error: {0}")]
    Config(String),

    /// State could not be SSZ-encoded for the commitment
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl From<ssz_rs::SerializeError> for ExchangeError {
    fn from(err: ssz_rs::SerializeError) -> Self {
        ExchangeError::Serialization(format!("{:?}", err))
    }
}

impl From<std::io::Error> for ExchangeError {
    fn from(err: std::io::Error) -> Self {
        ExchangeError::Config(err.to_string())
    }
}

impl From<toml::de::Error> for ExchangeError {
    fn from(err: toml::de::Error) -> Self {
        ExchangeError::Config(format!("failed to parse config: {}", err))
    }
}
