use async_trait::async_trait;

use crate::errors::ServiceError;
use crate::inventory::InventoryLevels;
use crate::suppliers::domain::{NewSupplier, SupplierPatch, SupplierRecord, SupplierView};

/// Trait abstraction for supplier storage.
/// The CSV file store is the only implementation; handlers depend on the trait.
#[async_trait]
pub trait SupplierRepository: Send + Sync {
    async fn list_with_earnings(&self) -> Result<Vec<SupplierView>, ServiceError>;
    async fn add(&self, input: NewSupplier, inventory: &InventoryLevels) -> Result<SupplierRecord, ServiceError>;
    async fn update(&self, id: u64, patch: SupplierPatch) -> Result<SupplierRecord, ServiceError>;
}
