//! Salary Record Model

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calendar::YearMonth;
use crate::error::AppError;

/// Payment status of a salary record
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
pub enum PaymentStatus {
    #[default]
    Pending,
    Paid,
    Failed,
}

impl PaymentStatus {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Paid => "Paid",
            Self::Failed => "Failed",
        }
    }

    /// Allowed payment transitions
    ///
    /// ```text
    /// Pending -> Paid | Failed
    /// Failed  -> Paid | Pending
    /// Paid    -> (terminal)
    /// ```
    pub fn can_transition_to(&self, next: PaymentStatus) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Paid)
                | (Self::Pending, Self::Failed)
                | (Self::Failed, Self::Paid)
                | (Self::Failed, Self::Pending)
        )
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Pending" => Ok(Self::Pending),
            "Paid" => Ok(Self::Paid),
            "Failed" => Ok(Self::Failed),
            other => Err(AppError::invalid_status(other)),
        }
    }
}

/// Salary record, one per employee per month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalaryRecord {
    pub id: i64,
    pub employee_id: i64,
    pub month: YearMonth,
    pub basic_salary: Decimal,
    pub allowances: Decimal,
    pub deductions: Decimal,
    /// basic_salary + allowances - deductions
    pub net_salary: Decimal,
    pub payment_status: PaymentStatus,
    /// Set when the record is marked Paid (Unix millis)
    pub payment_date: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Allowances and deductions applied to one employee during generation
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Adjustment {
    #[serde(default)]
    pub allowances: Decimal,
    #[serde(default)]
    pub deductions: Decimal,
}

impl Adjustment {
    pub fn new(allowances: Decimal, deductions: Decimal) -> Self {
        Self {
            allowances,
            deductions,
        }
    }

    /// Net pay for the given base salary
    pub fn net(&self, basic_salary: Decimal) -> Decimal {
        basic_salary + self.allowances - self.deductions
    }
}

/// Per-employee adjustments keyed by employee id
pub type Adjustments = HashMap<i64, Adjustment>;

/// Salary record list filter
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SalaryFilter {
    pub employee_id: Option<i64>,
    pub month: Option<YearMonth>,
    pub status: Option<PaymentStatus>,
}

/// Aggregates for one payroll month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthTotals {
    pub month: YearMonth,
    pub records: i64,
    pub paid: i64,
    pub total_basic: Decimal,
    pub total_allowances: Decimal,
    pub total_deductions: Decimal,
    pub total_net: Decimal,
}
