//! Repository Module
//!
//! Free async functions over a `SqlitePool` (or an open transaction), one
//! module per table.

pub mod admin;
pub mod attendance;
pub mod employee;
pub mod salary;

use rust_decimal::Decimal;
use shared::error::{AppError, ErrorCode};
use sqlx::{Sqlite, SqlitePool, Transaction};
use std::str::FromStr;
use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<sqlx::Error> for RepoError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::RowNotFound => RepoError::NotFound("Row not found".into()),
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                RepoError::Duplicate(db_err.message().to_string())
            }
            sqlx::Error::Database(db_err) if db_err.is_foreign_key_violation() => {
                RepoError::NotFound(db_err.message().to_string())
            }
            sqlx::Error::Database(db_err) if db_err.is_check_violation() => {
                RepoError::Validation(db_err.message().to_string())
            }
            _ => RepoError::Database(err.to_string()),
        }
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound(msg) => AppError::with_message(ErrorCode::NotFound, msg),
            RepoError::Duplicate(msg) => AppError::with_message(ErrorCode::AlreadyExists, msg),
            RepoError::Validation(msg) => AppError::validation(msg),
            RepoError::Database(msg) => {
                tracing::error!(error = %msg, "Storage failure");
                AppError::database(msg)
            }
        }
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

/// Open a transaction that holds the write lock from its first statement
///
/// Reads inside it see the latest committed state, and a concurrent writer
/// waits on `busy_timeout` instead of failing its read-to-write upgrade.
pub async fn begin_write(pool: &SqlitePool) -> RepoResult<Transaction<'static, Sqlite>> {
    Ok(pool.begin_with("BEGIN IMMEDIATE").await?)
}

/// Decode a decimal stored as TEXT
pub(crate) fn parse_decimal(value: &str, column: &str) -> RepoResult<Decimal> {
    Decimal::from_str(value)
        .map_err(|e| RepoError::Database(format!("Corrupt decimal in {column}: {value:?} ({e})")))
}

/// Escape `%`, `_` and `\` for a `LIKE ... ESCAPE '\'` pattern
pub(crate) fn like_pattern(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len() + 2);
    escaped.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("jane"), "%jane%");
        assert_eq!(like_pattern("50%_off"), "%50\\%\\_off%");
    }

    #[test]
    fn test_parse_decimal() {
        assert_eq!(
            parse_decimal("5150.00", "net_salary").unwrap().to_string(),
            "5150.00"
        );
        assert!(matches!(
            parse_decimal("abc", "net_salary"),
            Err(RepoError::Database(_))
        ));
    }

    #[test]
    fn test_repo_error_into_app_error() {
        let err: AppError = RepoError::NotFound("Employee 9 not found".into()).into();
        assert_eq!(err.code, ErrorCode::NotFound);

        let err: AppError = RepoError::Duplicate("x".into()).into();
        assert_eq!(err.code, ErrorCode::AlreadyExists);

        let err: AppError = RepoError::Database("disk I/O error".into()).into();
        assert_eq!(err.code, ErrorCode::DatabaseError);
    }

    #[tokio::test]
    async fn test_begin_write_rolls_back_on_drop() {
        let pool = test_support::test_pool().await;
        {
            let mut tx = begin_write(&pool).await.unwrap();
            sqlx::query("INSERT INTO employee (name, email, department, position, salary, joining_date, status, created_at, updated_at) VALUES ('Jane', 'jane@example.com', 'Ops', 'Engineer', '1.00', '2020-01-15', 'Active', 0, 0)")
                .execute(&mut *tx)
                .await
                .unwrap();
        }
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM employee")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(count, 0);

        let tx = begin_write(&pool).await.unwrap();
        tx.commit().await.unwrap();
    }
}
