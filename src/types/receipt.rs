//! State commitment over the whole exchange state.
//!
//! The commitment pairs the store version (number of committed transitions)
//! with a SHA-256 root over the SSZ encoding of every balance row and every
//! order. Two replicas that applied the same transitions in the same order
//! produce the same commitment.

use ssz_rs::prelude::*;
use sha2::{Digest, Sha256};

/// Versioned digest of the exchange state.
///
/// ## Example
///
/// ```
/// use dark_exchange::types::StateCommitment;
///
/// let commitment = StateCommitment::from_data(3, 2, 5, b"encoded state");
/// assert_eq!(commitment.version, 3);
/// assert_eq!(commitment.state_root_hex().len(), 64);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, SimpleSerialize)]
pub struct StateCommitment {
    /// Number of transitions committed so far
    pub version: u64,

    /// Number of orders ever placed (open and terminal)
    pub order_count: u64,

    /// Number of (account, asset) balance rows
    pub balance_rows: u64,

    /// SHA-256 over the encoded balances and orders
    pub state_root: [u8; 32],
}

impl StateCommitment {
    /// Create a commitment from its parts
    pub fn new(version: u64, order_count: u64, balance_rows: u64, state_root: [u8; 32]) -> Self {
        Self {
            version,
            order_count,
            balance_rows,
            state_root,
        }
    }

    /// Create a commitment hashing `state_data` as the root
    pub fn from_data(version: u64, order_count: u64, balance_rows: u64, state_data: &[u8]) -> Self {
        Self::new(version, order_count, balance_rows, Self::compute_hash(state_data))
    }

    /// Compute SHA-256 hash of the given data
    pub fn compute_hash(data: &[u8]) -> [u8; 32] {
        let mut hasher = Sha256::new();
        hasher.update(data);
        let result = hasher.finalize();

        let mut hash = [0u8; 32];
        hash.copy_from_slice(&result);
        hash
    }

    /// Get the state root as a hex string
    pub fn state_root_hex(&self) -> String {
        hex::encode(self.state_root)
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
