//! Service layer
//!
//! - [`AttendanceService`] - daily attendance marking
//! - [`PayrollService`] - monthly salary generation and payment status
//! - [`EmployeeService`] - employee records and read models
//! - [`AdminService`] - admin accounts and credential checks
//! - [`InsightService`] - aggregate facts for the injected insight gateway

pub mod admin;
pub mod attendance;
pub mod employee;
pub mod insight;
pub mod payroll;

pub use admin::AdminService;
pub use attendance::AttendanceService;
pub use employee::EmployeeService;
pub use insight::{DisabledGateway, InsightGateway, InsightRequest, InsightService};
pub use payroll::PayrollService;
