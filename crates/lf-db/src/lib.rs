//! lf-db - Storage layer for Lateflow
//!
//! This crate provides the `AttendanceStore` trait and implementations
//! for DuckDB and for plain memory.

mod ddl;
pub mod duckdb;
pub mod error;
pub mod memory;
mod migration;
pub mod traits;

pub use duckdb::DuckDbStore;
pub use error::{DbError, DbResult};
pub use memory::MemoryStore;
pub use traits::{AttendanceStore, HistoryRange};
