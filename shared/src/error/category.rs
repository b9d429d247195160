//! Error classification
//!
//! [`ErrorCategory`] groups codes by the domain that raised them (derived from
//! the numeric range). [`ErrorKind`] groups them by how a caller should react.

use super::codes::ErrorCode;
use serde::{Deserialize, Serialize};

/// Error category classification based on error code ranges
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// General errors (0xxx)
    General,
    /// Authentication errors (1xxx)
    Auth,
    /// Employee errors (80xx)
    Employee,
    /// Attendance errors (81xx)
    Attendance,
    /// Payroll errors (82xx)
    Payroll,
    /// Admin errors (83xx)
    Admin,
    /// System errors (9xxx and anything unassigned)
    System,
}

impl ErrorCategory {
    /// Determine category from error code value
    pub fn from_code(code: u16) -> Self {
        match code {
            0..1000 => Self::General,
            1000..2000 => Self::Auth,
            8000..8100 => Self::Employee,
            8100..8200 => Self::Attendance,
            8200..8300 => Self::Payroll,
            8300..8400 => Self::Admin,
            _ => Self::System,
        }
    }

    /// Get the string name for this category
    pub fn name(&self) -> &'static str {
        match self {
            Self::General => "general",
            Self::Auth => "auth",
            Self::Employee => "employee",
            Self::Attendance => "attendance",
            Self::Payroll => "payroll",
            Self::Admin => "admin",
            Self::System => "system",
        }
    }
}

/// How a failure should be handled by the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// The referenced record does not exist
    NotFound,
    /// Input was malformed or out of range; nothing was written
    InvalidArgument,
    /// The write collides with existing state (uniqueness, month guard, transition)
    Conflict,
    /// The store failed; the transaction was rolled back
    StorageFailure,
    /// Credential check failed
    Auth,
    /// Anything else
    Internal,
}

impl ErrorCode {
    /// Get the category for this error code
    pub fn category(&self) -> ErrorCategory {
        ErrorCategory::from_code(self.code())
    }

    /// Get the handling kind for this error code
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound
            | Self::EmployeeNotFound
            | Self::AttendanceNotFound
            | Self::SalaryRecordNotFound
            | Self::AdminNotFound => ErrorKind::NotFound,

            Self::ValidationFailed
            | Self::InvalidRequest
            | Self::InvalidFormat
            | Self::RequiredField
            | Self::ValueOutOfRange
            | Self::InvalidDate
            | Self::InvalidMonth
            | Self::InvalidAmount
            | Self::InvalidStatus => ErrorKind::InvalidArgument,

            Self::AlreadyExists
            | Self::EmployeeEmailExists
            | Self::PayrollAlreadyGenerated
            | Self::InvalidPaymentTransition
            | Self::AdminExists => ErrorKind::Conflict,

            Self::DatabaseError => ErrorKind::StorageFailure,

            Self::InvalidCredentials => ErrorKind::Auth,

            Self::Success | Self::Unknown | Self::InternalError | Self::ConfigError => {
                ErrorKind::Internal
            }
        }
    }
}
