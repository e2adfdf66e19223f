//! Open-order indices.
//!
//! ## Design
//!
//! Indices hold slab keys, never orders. Slab keys are handed out in
//! placement order and orders are never removed from the slab, so a
//! `BTreeSet<usize>` per bucket yields orders oldest-first for free.
//!
//! The indices are derived data: [`OrderStore`](crate::orderbook::OrderStore)
//! is the only writer and updates them in the same call that changes an
//! order's status.

use std::collections::{BTreeSet, HashMap};

use crate::types::{Address, AssetId, Order};

/// Buckets of open-order keys.
#[derive(Debug, Default, Clone)]
pub struct OpenOrderIndex {
    /// Maker → open orders
    by_maker: HashMap<Address, BTreeSet<usize>>,

    /// Sell asset → open orders
    by_sell_asset: HashMap<AssetId, BTreeSet<usize>>,

    /// (Maker, buy asset) → open orders
    by_maker_buy_asset: HashMap<(Address, AssetId), BTreeSet<usize>>,

    /// Total open orders
    count: usize,
}

impl OpenOrderIndex {
    /// Create empty indices
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an order to every bucket it belongs to
    pub fn insert(&mut self, key: usize, order: &Order) {
        let maker = order.maker();
        let inserted = self.by_maker.entry(maker).or_default().insert(key);
        self.by_sell_asset
            .entry(order.sell_asset())
            .or_default()
            .insert(key);
        self.by_maker_buy_asset
            .entry((maker, order.buy_asset()))
            .or_default()
            .insert(key);
        if inserted {
            self.count += 1;
        }
    }

    /// Remove an order from every bucket, dropping buckets that become empty
    pub fn remove(&mut self, key: usize, order: &Order) {
        let maker = order.maker();
        let removed = remove_from(&mut self.by_maker, &maker, key);
        remove_from(&mut self.by_sell_asset, &order.sell_asset(), key);
        remove_from(&mut self.by_maker_buy_asset, &(maker, order.buy_asset()), key);
        if removed {
            self.count -= 1;
        }
    }

    /// Open keys of `maker`, oldest first
    pub fn by_maker(&self, maker: Address) -> impl Iterator<Item = usize> + '_ {
        self.by_maker.get(&maker).into_iter().flatten().copied()
    }

    /// Open keys selling `asset`, oldest first
    pub fn by_sell_asset(&self, asset: AssetId) -> impl Iterator<Item = usize> + '_ {
        self.by_sell_asset.get(&asset).into_iter().flatten().copied()
    }

    /// Open keys of `maker` buying `asset`, oldest first
    pub fn by_maker_buy_asset(
        &self,
        maker: Address,
        asset: AssetId,
    ) -> impl Iterator<Item = usize> + '_ {
        self.by_maker_buy_asset
            .get(&(maker, asset))
            .into_iter()
            .flatten()
            .copied()
    }

    /// Whether `key` is currently indexed as open
    pub fn contains(&self, maker: Address, key: usize) -> bool {
        self.by_maker
            .get(&maker)
            .is_some_and(|keys| keys.contains(&key))
    }

    /// Total open orders
    #[inline]
    pub fn len(&self) -> usize {
        self.count
    }

    /// Whether no order is open
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}

fn remove_from<K>(map: &mut HashMap<K, BTreeSet<usize>>, bucket: &K, key: usize) -> bool
where
    K: std::hash::Hash + Eq,
{
    let Some(keys) = map.get_mut(bucket) else {
        return false;
    };
    let removed = keys.remove(&key);
    if keys.is_empty() {
        map.remove(bucket);
    }
    removed
}

// ============================================================================
// Unit Tests
// ============================================================================
