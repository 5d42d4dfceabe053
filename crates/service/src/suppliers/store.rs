use std::{path::PathBuf, sync::Arc};

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use crate::errors::ServiceError;
use crate::inventory::InventoryLevels;
use crate::storage::csv_table::CsvTable;
use crate::suppliers::domain::{NewSupplier, SupplierPatch, SupplierRecord, SupplierView};
use crate::suppliers::repository::SupplierRepository;

/// Next free id: one past the largest stored id, or 1 for an empty table.
///
/// Ids are never reused, even if a lower id is missing from the sequence.
pub fn next_id(records: &[SupplierRecord]) -> u64 {
    records.iter().map(|r| r.id).max().map_or(1, |max| max + 1)
}

/// Build a record from `input` with a fresh id and append it.
pub fn append_record(
    records: &mut Vec<SupplierRecord>,
    input: NewSupplier,
    now: DateTime<Utc>,
) -> SupplierRecord {
    let rec = input.into_record(next_id(records), now);
    records.push(rec.clone());
    rec
}

/// Apply `patch` to the record with `id` in place.
pub fn apply_update(
    records: &mut [SupplierRecord],
    id: u64,
    patch: SupplierPatch,
) -> Result<SupplierRecord, ServiceError> {
    let existing = records
        .iter_mut()
        .find(|r| r.id == id)
        .ok_or_else(|| ServiceError::not_found("Supplier"))?;
    patch.apply_to(existing);
    Ok(existing.clone())
}

/// Attach `earnings` to every record. The input is left untouched.
pub fn list_with_earnings(records: &[SupplierRecord]) -> Vec<SupplierView> {
    records.iter().map(SupplierView::from).collect()
}

/// CSV-backed supplier store.
///
/// `add` and `update` run load-mutate-save under the table's write lock, so
/// writers inside one process never lose each other's changes.
pub struct SupplierStore {
    table: CsvTable<SupplierRecord>,
}

impl SupplierStore {
    /// Open the store at `path`. Fails if an existing file cannot be parsed.
    pub async fn new<P: Into<PathBuf>>(path: P) -> Result<Arc<Self>, ServiceError> {
        let table = CsvTable::new(path);
        let existing = table.load().await?;
        info!(path = %table.path().display(), records = existing.len(), "supplier store opened");
        Ok(Arc::new(Self { table }))
    }

    pub async fn load(&self) -> Result<Vec<SupplierRecord>, ServiceError> {
        self.table.load().await
    }

    pub async fn save(&self, records: &[SupplierRecord]) -> Result<(), ServiceError> {
        self.table.save(records).await
    }

    pub async fn list_with_earnings(&self) -> Result<Vec<SupplierView>, ServiceError> {
        Ok(list_with_earnings(&self.load().await?))
    }

    /// Append a new record and persist it.
    ///
    /// The intake quantity reaches `inventory` only after the save succeeded.
    pub async fn add(
        &self,
        input: NewSupplier,
        inventory: &InventoryLevels,
    ) -> Result<SupplierRecord, ServiceError> {
        input.validate()?;
        let now = Utc::now();
        let rec = self.table.transact(|records| Ok(append_record(records, input, now))).await?;
        info!(id = rec.id, "supplier added");

        if let Some(q) = rec.quantity_liters {
            inventory.record_intake(q).await;
        }
        Ok(rec)
    }

    pub async fn update(&self, id: u64, patch: SupplierPatch) -> Result<SupplierRecord, ServiceError> {
        patch.validate()?;
        match self.table.transact(|records| apply_update(records, id, patch)).await {
            Ok(rec) => {
                info!(id, "supplier updated");
                Ok(rec)
            }
            Err(e @ ServiceError::NotFound(_)) => {
                warn!(id, "update target not found");
                Err(e)
            }
            Err(e) => Err(e),
        }
    }
}

#[async_trait::async_trait]
impl SupplierRepository for SupplierStore {
    async fn list_with_earnings(&self) -> Result<Vec<SupplierView>, ServiceError> {
        self.list_with_earnings().await
    }
    async fn add(&self, input: NewSupplier, inventory: &InventoryLevels) -> Result<SupplierRecord, ServiceError> {
        self.add(input, inventory).await
    }
    async fn update(&self, id: u64, patch: SupplierPatch) -> Result<SupplierRecord, ServiceError> {
        self.update(id, patch).await
    }
}
