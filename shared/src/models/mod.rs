//! Data models
//!
//! Shared between hr-service and any request layer built on top of it.
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`;
//! rows carrying decimals are mapped by the repositories instead.
//! All IDs are `i64` (SQLite INTEGER PRIMARY KEY).

pub mod admin;
pub mod attendance;
pub mod employee;
pub mod salary;

// Re-exports
pub use admin::*;
pub use attendance::*;
pub use employee::*;
pub use salary::*;
