pub mod domain;
pub mod repository;
pub mod store;

pub use domain::{NewSupplier, Patch, SupplierPatch, SupplierRecord, SupplierView};
pub use repository::SupplierRepository;
pub use store::SupplierStore;
