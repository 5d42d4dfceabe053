use axum::Router;
use configs::AppConfig;
use tower_http::cors::CorsLayer;
use tracing::info;

use service::{inventory::InventoryLevels, runtime, suppliers::SupplierStore};

use crate::errors::StartupError;
use crate::routes;
use crate::state::AppState;

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

/// Open the supplier store and assemble the router for `cfg`.
pub async fn build_app(cfg: &AppConfig) -> Result<Router, StartupError> {
    runtime::ensure_env(&cfg.storage.static_dir, &cfg.storage.suppliers_file).await?;

    let store = SupplierStore::new(&cfg.storage.suppliers_file)
        .await
        .map_err(|e| StartupError::Runtime(e.to_string()))?;
    let inventory = InventoryLevels::seeded(cfg.inventory.supplier_product_id.clone());
    let state = AppState::new(store, inventory);

    Ok(routes::build_router(state, build_cors(), &cfg.storage.static_dir))
}

/// Public entry: build the app and run the HTTP server
pub async fn run(cfg: AppConfig) -> Result<(), StartupError> {
    let app = build_app(&cfg).await?;

    let addr = cfg.server.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| StartupError::InvalidConfig(format!("cannot bind {addr}: {e}")))?;
    let local = listener.local_addr().map_err(|e| StartupError::Runtime(e.to_string()))?;
    info!(addr = %local, suppliers_file = %cfg.storage.suppliers_file.display(), "starting dairy server");
    axum::serve(listener, app)
        .await
        .map_err(|e| StartupError::Runtime(e.to_string()))?;
    Ok(())
}
