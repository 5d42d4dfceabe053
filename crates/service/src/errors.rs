use std::path::Path;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("validation error: {0}")]
    Validation(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("cannot read {path}: {reason}")]
    StorageRead { path: String, reason: String },
    #[error("cannot write {path}: {reason}")]
    StorageWrite { path: String, reason: String },
}

impl ServiceError {
    pub fn not_found(entity: &str) -> Self { Self::NotFound(format!("{} not found", entity)) }

    pub fn read(path: &Path, reason: impl ToString) -> Self {
        Self::StorageRead { path: path.display().to_string(), reason: reason.to_string() }
    }

    pub fn write(path: &Path, reason: impl ToString) -> Self {
        Self::StorageWrite { path: path.display().to_string(), reason: reason.to_string() }
    }
}
