//! Attendance Repository

use super::RepoResult;
use chrono::NaiveDate;
use shared::models::{Attendance, AttendanceFilter, AttendanceStatus, AttendanceSummary};
use shared::types::PageRequest;
use sqlx::{SqliteConnection, SqliteExecutor, SqlitePool};

const ATTENDANCE_COLUMNS: &str = "id, employee_id, date, status, notes, created_at, updated_at";

const ATTENDANCE_FILTER: &str = "WHERE (?1 IS NULL OR employee_id = ?1) AND (?2 IS NULL OR date >= ?2) AND (?3 IS NULL OR date <= ?3) AND (?4 IS NULL OR status = ?4)";

pub async fn find<'e, E>(
    executor: E,
    employee_id: i64,
    date: NaiveDate,
) -> RepoResult<Option<Attendance>>
where
    E: SqliteExecutor<'e>,
{
    let sql = format!("SELECT {ATTENDANCE_COLUMNS} FROM attendance WHERE employee_id = ? AND date = ?");
    let row = sqlx::query_as::<_, Attendance>(&sql)
        .bind(employee_id)
        .bind(date)
        .fetch_optional(executor)
        .await?;
    Ok(row)
}

/// Insert or overwrite the (employee, date) row; the UNIQUE pair settles races
pub async fn upsert(
    conn: &mut SqliteConnection,
    employee_id: i64,
    date: NaiveDate,
    status: AttendanceStatus,
    notes: Option<&str>,
) -> RepoResult<Attendance> {
    let now = shared::util::now_millis();
    let sql = format!(
        "INSERT INTO attendance (employee_id, date, status, notes, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?5) \
         ON CONFLICT (employee_id, date) DO UPDATE SET status = excluded.status, notes = excluded.notes, updated_at = excluded.updated_at \
         RETURNING {ATTENDANCE_COLUMNS}"
    );
    let row = sqlx::query_as::<_, Attendance>(&sql)
        .bind(employee_id)
        .bind(date)
        .bind(status)
        .bind(notes)
        .bind(now)
        .fetch_one(&mut *conn)
        .await?;
    Ok(row)
}

pub async fn list(
    pool: &SqlitePool,
    filter: &AttendanceFilter,
    page: PageRequest,
) -> RepoResult<Vec<Attendance>> {
    let sql = format!(
        "SELECT {ATTENDANCE_COLUMNS} FROM attendance {ATTENDANCE_FILTER} ORDER BY date DESC, employee_id ASC LIMIT ?5 OFFSET ?6"
    );
    let rows = sqlx::query_as::<_, Attendance>(&sql)
        .bind(filter.employee_id)
        .bind(filter.from)
        .bind(filter.to)
        .bind(filter.status)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

pub async fn count(pool: &SqlitePool, filter: &AttendanceFilter) -> RepoResult<i64> {
    let sql = format!("SELECT COUNT(*) FROM attendance {ATTENDANCE_FILTER}");
    let total = sqlx::query_scalar::<_, i64>(&sql)
        .bind(filter.employee_id)
        .bind(filter.from)
        .bind(filter.to)
        .bind(filter.status)
        .fetch_one(pool)
        .await?;
    Ok(total)
}

/// One employee's rows on or after `since`, newest first
pub async fn recent(
    pool: &SqlitePool,
    employee_id: i64,
    since: NaiveDate,
) -> RepoResult<Vec<Attendance>> {
    let sql = format!(
        "SELECT {ATTENDANCE_COLUMNS} FROM attendance WHERE employee_id = ? AND date >= ? ORDER BY date DESC"
    );
    let rows = sqlx::query_as::<_, Attendance>(&sql)
        .bind(employee_id)
        .bind(since)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

/// Per-status counts for one employee on or after `since`
pub async fn summary(
    pool: &SqlitePool,
    employee_id: i64,
    since: NaiveDate,
) -> RepoResult<AttendanceSummary> {
    let rows: Vec<(AttendanceStatus, i64)> = sqlx::query_as(
        "SELECT status, COUNT(*) FROM attendance WHERE employee_id = ? AND date >= ? GROUP BY status",
    )
    .bind(employee_id)
    .bind(since)
    .fetch_all(pool)
    .await?;
    Ok(fold_summary(rows))
}

/// Per-status counts across a department on or after `since`
pub async fn department_summary(
    pool: &SqlitePool,
    department: &str,
    since: NaiveDate,
) -> RepoResult<AttendanceSummary> {
    let rows: Vec<(AttendanceStatus, i64)> = sqlx::query_as(
        "SELECT a.status, COUNT(*) FROM attendance a JOIN employee e ON e.id = a.employee_id WHERE e.department = ? AND a.date >= ? GROUP BY a.status",
    )
    .bind(department)
    .bind(since)
    .fetch_all(pool)
    .await?;
    Ok(fold_summary(rows))
}

fn fold_summary(rows: Vec<(AttendanceStatus, i64)>) -> AttendanceSummary {
    rows.into_iter()
        .fold(AttendanceSummary::default(), |mut acc, (status, n)| {
            acc.add(status, n);
            acc
        })
}

/// Rows with `status` on `date`, all employees
pub async fn count_on(pool: &SqlitePool, date: NaiveDate, status: AttendanceStatus) -> RepoResult<i64> {
    let total = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM attendance WHERE date = ? AND status = ?",
    )
    .bind(date)
    .bind(status)
    .fetch_one(pool)
    .await?;
    Ok(total)
}

pub async fn count_for(pool: &SqlitePool, employee_id: i64) -> RepoResult<i64> {
    let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM attendance WHERE employee_id = ?")
        .bind(employee_id)
        .fetch_one(pool)
        .await?;
    Ok(total)
}
