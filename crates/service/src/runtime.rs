//! Runtime environment helpers
//!
//! Thin wrapper around `common::env` so the server crate can prepare the
//! supplier table's directory without reaching into `common` itself.

use std::path::Path;

/// Ensure the data directory for `suppliers_file` exists; warn if `static_dir` is missing.
pub async fn ensure_env(static_dir: &str, suppliers_file: &Path) -> anyhow::Result<()> {
    let data_dir = suppliers_file.parent().unwrap_or_else(|| Path::new(""));
    common::env::ensure_env(static_dir, data_dir).await
}
