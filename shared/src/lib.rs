//! Shared types for the HR workspace
//!
//! Domain models, calendar primitives and the unified error system used by
//! `hr-service` and by whatever request layer sits on top of it.

pub mod calendar;
pub mod error;
pub mod models;
pub mod types;
pub mod util;

// Re-exports
pub use calendar::{YearMonth, parse_date};
pub use error::{AppError, AppResult, ErrorCode, ErrorKind};
pub use serde::{Deserialize, Serialize};
