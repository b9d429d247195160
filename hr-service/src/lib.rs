//! HR service core
//!
//! Employee records, daily attendance and monthly payroll on SQLite, plus an
//! injected insight gateway that turns aggregates into free text.
//!
//! # Module layout
//!
//! ```text
//! hr-service/src/
//! ├── core/          # configuration, shared state
//! ├── db/            # pool, migrations, repositories
//! ├── services/      # attendance, payroll, employee, admin, insight
//! └── utils/         # logging, validation
//! ```

pub mod core;
pub mod db;
pub mod services;
pub mod utils;

pub use crate::core::{AppState, Config, PayrollConfig};
pub use db::DbService;
pub use services::{
    AdminService, AttendanceService, DisabledGateway, EmployeeService, InsightGateway,
    InsightRequest, InsightService, PayrollService,
};
pub use utils::logger::{init_logger, init_logger_with_file};
pub use utils::{AppError, AppResult, ErrorCode};

/// Load `.env` and initialize logging from `LOG_LEVEL`, `LOG_JSON` and `LOG_DIR`
pub fn setup_environment() {
    dotenv::dotenv().ok();

    let log_level = std::env::var("LOG_LEVEL").ok();
    let log_json = std::env::var("LOG_JSON")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(false);
    let log_dir = std::env::var("LOG_DIR").ok().filter(|d| !d.is_empty());
    if let Some(dir) = &log_dir
        && let Err(e) = std::fs::create_dir_all(dir)
    {
        eprintln!("Cannot create log directory {dir}: {e}");
    }

    init_logger_with_file(log_level.as_deref(), log_json, log_dir.as_deref());
}
