use std::sync::Arc;

use service::{inventory::InventoryLevels, suppliers::SupplierRepository};

/// Shared handler state. Built once by the host and cloned per request.
#[derive(Clone)]
pub struct AppState {
    pub suppliers: Arc<dyn SupplierRepository>,
    pub inventory: InventoryLevels,
}

impl AppState {
    pub fn new(suppliers: Arc<dyn SupplierRepository>, inventory: InventoryLevels) -> Self {
        Self { suppliers, inventory }
    }
}
