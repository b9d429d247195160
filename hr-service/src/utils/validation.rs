//! Input validation helpers
//!
//! Centralized text length limits and field validators. SQLite TEXT has no
//! built-in length enforcement, so limits live here.

use rust_decimal::Decimal;
use shared::error::{AppError, ErrorCode};
use validator::ValidateEmail;

// ── Text length limits ──────────────────────────────────────────────

/// Person names, departments, positions
pub const MAX_NAME_LEN: usize = 200;

/// Attendance notes
pub const MAX_NOTE_LEN: usize = 500;

/// Short identifiers: phone, username, role
pub const MAX_SHORT_TEXT_LEN: usize = 100;

/// Email addresses (RFC 5321)
pub const MAX_EMAIL_LEN: usize = 254;

/// Passwords (before hashing)
pub const MAX_PASSWORD_LEN: usize = 128;

/// Minimum admin password length
pub const MIN_PASSWORD_LEN: usize = 8;

// ── Validation helpers ──────────────────────────────────────────────

/// Validate that a required string is non-empty and within the length limit.
pub fn validate_required_text(value: &str, field: &str, max_len: usize) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::with_message(
            ErrorCode::RequiredField,
            format!("{field} must not be empty"),
        )
        .with_detail("field", field));
    }
    if value.len() > max_len {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            value.len()
        ))
        .with_detail("field", field));
    }
    Ok(())
}

/// Validate that an optional string, if present, is within the length limit.
pub fn validate_optional_text(
    value: &Option<String>,
    field: &str,
    max_len: usize,
) -> Result<(), AppError> {
    if let Some(v) = value
        && v.len() > max_len
    {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            v.len()
        ))
        .with_detail("field", field));
    }
    Ok(())
}

/// HTML5 email syntax with a dotted domain
pub fn validate_email(email: &str) -> Result<(), AppError> {
    validate_required_text(email, "email", MAX_EMAIL_LEN)?;
    let email = email.trim();
    let dotted = email
        .rsplit_once('@')
        .is_some_and(|(_, domain)| domain.contains('.'));
    if !dotted || !email.validate_email() {
        return Err(
            AppError::with_message(ErrorCode::InvalidFormat, format!("Invalid email: {email}"))
                .with_detail("field", "email"),
        );
    }
    Ok(())
}

/// Money amounts must be zero or positive.
pub fn validate_non_negative(value: Decimal, field: &str) -> Result<(), AppError> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err(AppError::invalid_amount(
            field,
            format!("{field} cannot be negative: {value}"),
        ));
    }
    Ok(())
}

/// Trim and drop empty optional text
pub fn normalize_optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
