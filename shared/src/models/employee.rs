//! Employee Model

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::attendance::Attendance;
use super::salary::SalaryRecord;
use crate::error::AppError;

/// Employment status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
pub enum EmployeeStatus {
    #[default]
    Active,
    Inactive,
    #[serde(rename = "On Leave")]
    #[cfg_attr(feature = "db", sqlx(rename = "On Leave"))]
    OnLeave,
}

impl EmployeeStatus {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "Active",
            Self::Inactive => "Inactive",
            Self::OnLeave => "On Leave",
        }
    }
}

impl fmt::Display for EmployeeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EmployeeStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Active" => Ok(Self::Active),
            "Inactive" => Ok(Self::Inactive),
            "On Leave" => Ok(Self::OnLeave),
            other => Err(AppError::invalid_status(other)),
        }
    }
}

/// Employee entity
///
/// `salary` is the monthly base pay used by payroll generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub department: String,
    pub position: String,
    pub salary: Decimal,
    pub joining_date: NaiveDate,
    pub status: EmployeeStatus,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Employee {
    pub fn is_active(&self) -> bool {
        self.status == EmployeeStatus::Active
    }
}

/// Create employee payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmployeeCreate {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub department: String,
    pub position: String,
    pub salary: Decimal,
    /// `YYYY-MM-DD`, defaults to today
    pub joining_date: Option<String>,
    /// Defaults to Active
    pub status: Option<EmployeeStatus>,
}

/// Update employee payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EmployeeUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub department: Option<String>,
    pub position: Option<String>,
    pub salary: Option<Decimal>,
    /// `YYYY-MM-DD`
    pub joining_date: Option<String>,
    pub status: Option<EmployeeStatus>,
}

/// Sort order for employee listings
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmployeeSort {
    /// Name ascending
    #[default]
    Name,
    /// Highest salary first
    #[serde(rename = "salary")]
    SalaryDesc,
    /// Department, then name
    Department,
}

/// Employee list filter
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EmployeeFilter {
    /// Case-insensitive substring match on name, email or position
    pub search: Option<String>,
    pub department: Option<String>,
    pub status: Option<EmployeeStatus>,
    #[serde(default)]
    pub sort: EmployeeSort,
}

/// Headline numbers for the dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardStats {
    pub total_employees: i64,
    pub active_employees: i64,
    pub departments: i64,
    pub present_today: i64,
}

/// Employee with recent attendance and the current month's salary record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmployeeDetail {
    pub employee: Employee,
    /// Newest first
    pub recent_attendance: Vec<Attendance>,
    pub present_days: i64,
    pub absent_days: i64,
    pub current_salary: Option<SalaryRecord>,
}
