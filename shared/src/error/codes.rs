//! Unified error codes for the HR workspace
//!
//! Error codes are organized by category:
//! - 0xxx: General errors (validation, parsing, lookup)
//! - 1xxx: Authentication errors
//! - 80xx: Employee errors
//! - 81xx: Attendance errors
//! - 82xx: Payroll errors
//! - 83xx: Admin errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values so they serialize compactly
/// and stay stable across language boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,
    /// Invalid request
    InvalidRequest = 5,
    /// Invalid format
    InvalidFormat = 6,
    /// Required field missing
    RequiredField = 7,
    /// Value out of range
    ValueOutOfRange = 8,
    /// Date is not `YYYY-MM-DD`
    InvalidDate = 10,
    /// Month is not `YYYY-MM`
    InvalidMonth = 11,
    /// Negative or malformed amount
    InvalidAmount = 12,
    /// Unknown status value
    InvalidStatus = 13,

    // ==================== 1xxx: Auth ====================
    /// Invalid credentials (email/password)
    InvalidCredentials = 1002,

    // ==================== 80xx: Employee ====================
    /// Employee not found
    EmployeeNotFound = 8001,
    /// Employee email already in use
    EmployeeEmailExists = 8002,

    // ==================== 81xx: Attendance ====================
    /// Attendance record not found
    AttendanceNotFound = 8101,

    // ==================== 82xx: Payroll ====================
    /// Salary record not found
    SalaryRecordNotFound = 8201,
    /// Payroll already generated for the month
    PayrollAlreadyGenerated = 8202,
    /// Payment status change not allowed
    InvalidPaymentTransition = 8203,

    // ==================== 83xx: Admin ====================
    /// Admin not found
    AdminNotFound = 8301,
    /// Admin email or username already exists
    AdminExists = 8302,

    // ==================== 9xxx: System ====================
    /// Internal error
    InternalError = 9001,
    /// Database error
    DatabaseError = 9002,
    /// Configuration error
    ConfigError = 9005,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Check if this is a success code
    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, ErrorCode::Success)
    }

    /// Get the developer-facing English message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::Success => "Operation completed successfully",
            ErrorCode::Unknown => "An unknown error occurred",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::AlreadyExists => "Resource already exists",
            ErrorCode::InvalidRequest => "Invalid request",
            ErrorCode::InvalidFormat => "Invalid format",
            ErrorCode::RequiredField => "Required field is missing",
            ErrorCode::ValueOutOfRange => "Value is out of range",
            ErrorCode::InvalidDate => "Invalid date, expected YYYY-MM-DD",
            ErrorCode::InvalidMonth => "Invalid month, expected YYYY-MM",
            ErrorCode::InvalidAmount => "Invalid amount",
            ErrorCode::InvalidStatus => "Invalid status",

            // Auth
            ErrorCode::InvalidCredentials => "Invalid email or password",

            // Employee
            ErrorCode::EmployeeNotFound => "Employee not found",
            ErrorCode::EmployeeEmailExists => "Employee email already exists",

            // Attendance
            ErrorCode::AttendanceNotFound => "Attendance record not found",

            // Payroll
            ErrorCode::SalaryRecordNotFound => "Salary record not found",
            ErrorCode::PayrollAlreadyGenerated => "Payroll already generated for this month",
            ErrorCode::InvalidPaymentTransition => "Payment status change is not allowed",

            // Admin
            ErrorCode::AdminNotFound => "Admin not found",
            ErrorCode::AdminExists => "Admin already exists",

            // System
            ErrorCode::InternalError => "Internal server error",
            ErrorCode::DatabaseError => "Database error",
            ErrorCode::ConfigError => "Configuration error",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error when converting from an invalid u16 to ErrorCode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            // General
            0 => Ok(ErrorCode::Success),
            1 => Ok(ErrorCode::Unknown),
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),
            4 => Ok(ErrorCode::AlreadyExists),
            5 => Ok(ErrorCode::InvalidRequest),
            6 => Ok(ErrorCode::InvalidFormat),
            7 => Ok(ErrorCode::RequiredField),
            8 => Ok(ErrorCode::ValueOutOfRange),
            10 => Ok(ErrorCode::InvalidDate),
            11 => Ok(ErrorCode::InvalidMonth),
            12 => Ok(ErrorCode::InvalidAmount),
            13 => Ok(ErrorCode::InvalidStatus),

            // Auth
            1002 => Ok(ErrorCode::InvalidCredentials),

            // Employee
            8001 => Ok(ErrorCode::EmployeeNotFound),
            8002 => Ok(ErrorCode::EmployeeEmailExists),

            // Attendance
            8101 => Ok(ErrorCode::AttendanceNotFound),

            // Payroll
            8201 => Ok(ErrorCode::SalaryRecordNotFound),
            8202 => Ok(ErrorCode::PayrollAlreadyGenerated),
            8203 => Ok(ErrorCode::InvalidPaymentTransition),

            // Admin
            8301 => Ok(ErrorCode::AdminNotFound),
            8302 => Ok(ErrorCode::AdminExists),

            // System
            9001 => Ok(ErrorCode::InternalError),
            9002 => Ok(ErrorCode::DatabaseError),
            9005 => Ok(ErrorCode::ConfigError),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
