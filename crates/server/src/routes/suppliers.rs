use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use service::suppliers::{NewSupplier, SupplierPatch, SupplierRecord, SupplierView};

use crate::errors::ApiError;
use crate::metrics::SUPPLIER_WRITES_TOTAL;
use crate::state::AppState;

/// Write acknowledgement carrying the stored record (without derived fields).
#[derive(Debug, Serialize)]
pub struct SupplierAck {
    pub message: &'static str,
    pub supplier: SupplierRecord,
}

/// List all suppliers with derived earnings.
pub async fn list_suppliers(State(state): State<AppState>) -> Result<Json<Vec<SupplierView>>, ApiError> {
    Ok(Json(state.suppliers.list_with_earnings().await?))
}

/// Record a new supplier delivery.
pub async fn add_supplier(
    State(state): State<AppState>,
    Json(input): Json<NewSupplier>,
) -> Result<(StatusCode, Json<SupplierAck>), ApiError> {
    let supplier = state.suppliers.add(input, &state.inventory).await?;
    SUPPLIER_WRITES_TOTAL.with_label_values(&["add"]).inc();
    Ok((
        StatusCode::CREATED,
        Json(SupplierAck { message: "Supplier added successfully", supplier }),
    ))
}

/// Partially update the editable fields of one supplier.
pub async fn update_supplier(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    Json(patch): Json<SupplierPatch>,
) -> Result<Json<SupplierAck>, ApiError> {
    let supplier = state.suppliers.update(id, patch).await?;
    SUPPLIER_WRITES_TOTAL.with_label_values(&["update"]).inc();
    Ok(Json(SupplierAck { message: "Supplier updated successfully", supplier }))
}
