//! Core module: configuration and shared state
//!
//! - [`Config`] - environment-driven configuration
//! - [`AppState`] - database handle plus the service set built on it

pub mod config;
pub mod state;

pub use config::{Config, PayrollConfig};
pub use state::AppState;
