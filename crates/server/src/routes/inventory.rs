use std::collections::BTreeMap;

use axum::{extract::State, Json};
use service::inventory::InventoryLevel;

use crate::state::AppState;

/// Current stock per product id.
pub async fn get_inventory(State(state): State<AppState>) -> Json<BTreeMap<String, InventoryLevel>> {
    Json(state.inventory.snapshot().await)
}
