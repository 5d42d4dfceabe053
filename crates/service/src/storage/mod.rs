//! Storage abstractions for service layer
//!
//! Contains the file-backed ordered table used by the supplier store.

pub mod csv_table;
