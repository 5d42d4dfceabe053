//! Service layer for the dairy backend.
//! - `suppliers`: CSV-backed supplier records with derived earnings.
//! - `inventory`: process-lifetime stock levels fed by supplier intake.
//! - `storage`: the ordered, atomically rewritten table the store sits on.

pub mod errors;
pub mod inventory;
pub mod runtime;
pub mod storage;
pub mod suppliers;
