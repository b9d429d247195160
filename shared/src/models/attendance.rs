//! Attendance Model

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Daily attendance status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
pub enum AttendanceStatus {
    #[default]
    Present,
    Absent,
    Late,
    #[serde(rename = "Sick Leave")]
    #[cfg_attr(feature = "db", sqlx(rename = "Sick Leave"))]
    SickLeave,
    #[serde(rename = "Casual Leave")]
    #[cfg_attr(feature = "db", sqlx(rename = "Casual Leave"))]
    CasualLeave,
}

impl AttendanceStatus {
    pub const ALL: [AttendanceStatus; 5] = [
        Self::Present,
        Self::Absent,
        Self::Late,
        Self::SickLeave,
        Self::CasualLeave,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Present => "Present",
            Self::Absent => "Absent",
            Self::Late => "Late",
            Self::SickLeave => "Sick Leave",
            Self::CasualLeave => "Casual Leave",
        }
    }
}

impl fmt::Display for AttendanceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AttendanceStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s.trim())
            .ok_or_else(|| AppError::invalid_status(s))
    }
}

/// Attendance entity, one per employee per day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Attendance {
    pub id: i64,
    pub employee_id: i64,
    pub date: NaiveDate,
    pub status: AttendanceStatus,
    pub notes: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Mark attendance payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttendanceMark {
    pub employee_id: i64,
    /// `YYYY-MM-DD`
    pub date: String,
    pub status: AttendanceStatus,
    pub notes: Option<String>,
}

/// Explicit entry of a bulk mark
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BulkEntry {
    pub status: AttendanceStatus,
    pub notes: Option<String>,
}

/// Bulk mark payload
///
/// Active employees missing from `entries` are marked Present.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulkAttendanceMark {
    /// `YYYY-MM-DD`
    pub date: String,
    #[serde(default)]
    pub entries: BTreeMap<i64, BulkEntry>,
}

/// Attendance list filter (date bounds inclusive)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AttendanceFilter {
    pub employee_id: Option<i64>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub status: Option<AttendanceStatus>,
}

/// Per-status counts over a date window
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceSummary {
    pub present: i64,
    pub absent: i64,
    pub late: i64,
    pub sick_leave: i64,
    pub casual_leave: i64,
}

impl AttendanceSummary {
    pub fn add(&mut self, status: AttendanceStatus, count: i64) {
        match status {
            AttendanceStatus::Present => self.present += count,
            AttendanceStatus::Absent => self.absent += count,
            AttendanceStatus::Late => self.late += count,
            AttendanceStatus::SickLeave => self.sick_leave += count,
            AttendanceStatus::CasualLeave => self.casual_leave += count,
        }
    }

    /// All recorded days in the window
    pub fn total(&self) -> i64 {
        self.present + self.absent + self.late + self.sick_leave + self.casual_leave
    }

    /// Recorded days that were not Present
    pub fn not_present(&self) -> i64 {
        self.total() - self.present
    }

    /// Present days as a percentage of recorded days (0 when nothing recorded)
    pub fn present_rate(&self) -> f64 {
        let total = self.total();
        if total == 0 {
            return 0.0;
        }
        self.present as f64 / total as f64 * 100.0
    }
}
