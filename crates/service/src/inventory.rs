//! In-memory product stock levels.
//!
//! Owned by the hosting application and handed to the supplier store, which
//! bumps the intake product's stock after each persisted delivery. Nothing here
//! survives a restart.

use std::{collections::BTreeMap, sync::Arc};

use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::{debug, warn};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct InventoryLevel {
    pub name: String,
    pub current_stock: f64,
    pub safety_stock: f64,
}

impl InventoryLevel {
    pub fn new(name: impl Into<String>, current_stock: f64, safety_stock: f64) -> Self {
        Self { name: name.into(), current_stock, safety_stock }
    }

    pub fn below_safety(&self) -> bool {
        self.current_stock < self.safety_stock
    }
}

/// Shared handle to per-product stock, keyed by product id.
#[derive(Clone)]
pub struct InventoryLevels {
    inner: Arc<RwLock<BTreeMap<String, InventoryLevel>>>,
    intake_product: String,
}

impl InventoryLevels {
    pub fn new(levels: BTreeMap<String, InventoryLevel>, intake_product: impl Into<String>) -> Self {
        Self { inner: Arc::new(RwLock::new(levels)), intake_product: intake_product.into() }
    }

    /// Whole milk (101) and skim milk (102) starting levels.
    pub fn seeded(intake_product: impl Into<String>) -> Self {
        let mut levels = BTreeMap::new();
        levels.insert("101".to_string(), InventoryLevel::new("Whole Milk", 1000.0, 1200.0));
        levels.insert("102".to_string(), InventoryLevel::new("Skim Milk", 800.0, 600.0));
        Self::new(levels, intake_product)
    }

    pub async fn snapshot(&self) -> BTreeMap<String, InventoryLevel> {
        self.inner.read().await.clone()
    }

    pub async fn get(&self, product_id: &str) -> Option<InventoryLevel> {
        self.inner.read().await.get(product_id).cloned()
    }

    /// Add delivered liters to the intake product; returns its new stock.
    ///
    /// Zero quantities are ignored. An unknown intake product is logged and skipped.
    pub async fn record_intake(&self, quantity_liters: f64) -> Option<f64> {
        if quantity_liters == 0.0 {
            return None;
        }
        let mut map = self.inner.write().await;
        match map.get_mut(&self.intake_product) {
            Some(level) => {
                level.current_stock += quantity_liters;
                debug!(product = %self.intake_product, stock = level.current_stock, "intake recorded");
                Some(level.current_stock)
            }
            None => {
                warn!(product = %self.intake_product, "intake product missing from inventory");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn intake_bumps_configured_product_only() {
        let inv = InventoryLevels::seeded("101");
        assert_eq!(inv.record_intake(50.0).await, Some(1050.0));
        assert_eq!(inv.get("101").await.unwrap().current_stock, 1050.0);
        assert_eq!(inv.get("102").await.unwrap().current_stock, 800.0);
    }

    #[tokio::test]
    async fn zero_and_unknown_are_noops() {
        let inv = InventoryLevels::seeded("101");
        assert_eq!(inv.record_intake(0.0).await, None);
        assert_eq!(inv.get("101").await.unwrap().current_stock, 1000.0);

        let inv = InventoryLevels::seeded("999");
        assert_eq!(inv.record_intake(10.0).await, None);
        assert_eq!(inv.snapshot().await, InventoryLevels::seeded("101").snapshot().await);
    }

    #[tokio::test]
    async fn clones_share_state() {
        let inv = InventoryLevels::seeded("102");
        let other = inv.clone();
        other.record_intake(1.5).await;
        assert_eq!(inv.get("102").await.unwrap().current_stock, 801.5);
        assert!(inv.get("101").await.unwrap().below_safety());
    }
}
