//! Typed boundary to the external token contract and native payouts.
//!
//! The exchange never moves external value itself. Deposits are pulled into
//! custody with [`AssetGateway::transfer_in`] (for the native asset this
//! accepts the value attached to the call; for tokens it is a
//! `transferFrom`); withdrawals are pushed with
//! [`AssetGateway::transfer_out`].
//!
//! The gateway is passed to the exchange as an owned collaborator. It holds no
//! reference back to the exchange, so a transfer cannot re-enter it.

use std::collections::{BTreeMap, BTreeSet};

use thiserror::Error;

use crate::types::{Address, AssetId, AssetKind};

/// Pull `amount` of `asset` from `from` into exchange custody.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferIn {
    /// Native or token
    pub asset: AssetId,
    /// Wallet being debited
    pub from: Address,
    /// Units to pull
    pub amount: u64,
}

/// Push `amount` of `asset` out of exchange custody to `to`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferOut {
    /// Native or token
    pub asset: AssetId,
    /// Recipient wallet
    pub to: Address,
    /// Units to push
    pub amount: u64,
}

/// Acknowledgement of a completed transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferReceipt {
    /// Asset moved
    pub asset: AssetId,
    /// Units moved
    pub amount: u64,
}

/// Gateway errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GatewayError {
    /// Wallet or custody does not hold enough of the asset
    #[error("insufficient {asset} balance for {holder}: have {have}, need {need}")]
    InsufficientBalance {
        /// Asset being moved
        asset: AssetId,
        /// Wallet (or the exchange, for custody) being debited
        holder: Address,
        /// Units held
        have: u64,
        /// Units required
        need: u64,
    },

    /// Token contract refused the transfer
    #[error("transfer rejected: {0}")]
    Rejected(String),

    /// Recipient balance would overflow
    #[error("recipient balance overflow")]
    Overflow,
}

/// External value movements required by deposits and withdrawals.
pub trait AssetGateway {
    /// Pull value from a wallet into exchange custody
    fn transfer_in(&mut self, request: TransferIn) -> Result<TransferReceipt, GatewayError>;

    /// Push native value or tokens from exchange custody to a wallet
    fn transfer_out(&mut self, request: TransferOut) -> Result<TransferReceipt, GatewayError>;
}

// ============================================================================
// InMemoryGateway
// ============================================================================

/// Wallet balances and exchange custody held in memory.
///
/// ## Model
///
/// - `wallets`: (holder, asset) → units held outside the exchange
/// - `custody`: asset → units held by the exchange
///
/// Frozen holders model a token contract that refuses transfers; native
/// transfers are never refused.
#[derive(Debug, Default, Clone)]
pub struct InMemoryGateway {
    /// The exchange's own address, reported as holder on custody shortfalls
    exchange: Address,

    wallets: BTreeMap<(Address, AssetId), u64>,

    custody: BTreeMap<AssetId, u64>,

    /// Holders whose token transfers are refused
    frozen: BTreeSet<Address>,
}

impl InMemoryGateway {
    /// Create a gateway whose custody account is `exchange`
    pub fn new(exchange: Address) -> Self {
        Self {
            exchange,
            ..Self::default()
        }
    }

    /// Give `holder` `amount` units of `asset` outside the exchange
    pub fn mint(&mut self, asset: AssetId, holder: Address, amount: u64) {
        let balance = self.wallets.entry((holder, asset)).or_default();
        *balance = balance.saturating_add(amount);
    }

    /// Refuse every token transfer to or from `holder`
    pub fn freeze(&mut self, holder: Address) {
        self.frozen.insert(holder);
    }

    /// Lift a [`InMemoryGateway::freeze`]
    pub fn unfreeze(&mut self, holder: Address) {
        self.frozen.remove(&holder);
    }

    /// Units of `asset` held by `holder` outside the exchange
    pub fn wallet_balance(&self, holder: Address, asset: AssetId) -> u64 {
        self.wallets.get(&(holder, asset)).copied().unwrap_or(0)
    }

    /// Units of `asset` held by the exchange
    pub fn custody_of(&self, asset: AssetId) -> u64 {
        self.custody.get(&asset).copied().unwrap_or(0)
    }

    fn check_frozen(&self, asset: AssetId, holder: Address) -> Result<(), GatewayError> {
        if let AssetKind::Token(token) = asset.kind() {
            if self.frozen.contains(&holder) {
                return Err(GatewayError::Rejected(format!(
                    "{} is frozen on token {}",
                    holder, token
                )));
            }
        }
        Ok(())
    }

    fn debit_wallet(&mut self, holder: Address, asset: AssetId, amount: u64) -> Result<(), GatewayError> {
        let have = self.wallet_balance(holder, asset);
        let rest = have
            .checked_sub(amount)
            .ok_or(GatewayError::InsufficientBalance {
                asset,
                holder,
                have,
                need: amount,
            })?;
        self.wallets.insert((holder, asset), rest);
        Ok(())
    }

    fn credit_custody(&mut self, asset: AssetId, amount: u64) -> Result<(), GatewayError> {
        let held = self.custody.entry(asset).or_default();
        *held = held.checked_add(amount).ok_or(GatewayError::Overflow)?;
        Ok(())
    }
}

impl AssetGateway for InMemoryGateway {
    fn transfer_in(&mut self, request: TransferIn) -> Result<TransferReceipt, GatewayError> {
        let asset = request.asset;
        self.check_frozen(asset, request.from)?;

        // Check the custody credit before touching the wallet
        self.custody_of(asset)
            .checked_add(request.amount)
            .ok_or(GatewayError::Overflow)?;
        self.debit_wallet(request.from, asset, request.amount)?;
        self.credit_custody(asset, request.amount)?;

        Ok(TransferReceipt {
            asset,
            amount: request.amount,
        })
    }

    fn transfer_out(&mut self, request: TransferOut) -> Result<TransferReceipt, GatewayError> {
        self.check_frozen(request.asset, request.to)?;

        let held = self.custody_of(request.asset);
        let rest = held
            .checked_sub(request.amount)
            .ok_or(GatewayError::InsufficientBalance {
                asset: request.asset,
                holder: self.exchange,
                have: held,
                need: request.amount,
            })?;
        let wallet = self.wallet_balance(request.to, request.asset);
        let wallet = wallet
            .checked_add(request.amount)
            .ok_or(GatewayError::Overflow)?;

        self.custody.insert(request.asset, rest);
        self.wallets.insert((request.to, request.asset), wallet);

        Ok(TransferReceipt {
            asset: request.asset,
            amount: request.amount,
        })
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
