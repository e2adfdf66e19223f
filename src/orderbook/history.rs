//! Append-only per-account order history and per-asset trade log.

use std::collections::HashMap;

use crate::types::{Address, AssetId, HistoryEntry, TradeRecord};

/// History rows per account and trade records per asset.
#[derive(Debug, Default, Clone)]
pub struct HistoryLog {
    by_account: HashMap<Address, Vec<HistoryEntry>>,
    trades_by_asset: HashMap<AssetId, Vec<TradeRecord>>,
}

impl HistoryLog {
    /// Create an empty log
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a row to `account`'s history
    pub fn push_entry(&mut self, account: Address, entry: HistoryEntry) {
        self.by_account.entry(account).or_default().push(entry);
    }

    /// Record a trade under both assets of the pair
    pub fn push_trade(&mut self, record: TradeRecord) {
        self.trades_by_asset
            .entry(record.buy_asset)
            .or_default()
            .push(record.clone());
        self.trades_by_asset
            .entry(record.sell_asset)
            .or_default()
            .push(record);
    }

    /// `account`'s history in append order
    pub fn entries(&self, account: Address) -> &[HistoryEntry] {
        self.by_account
            .get(&account)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Trades touching `asset` in append order
    pub fn trades(&self, asset: AssetId) -> &[TradeRecord] {
        self.trades_by_asset
            .get(&asset)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}
