//! Attendance Engine
//!
//! One row per (employee, day). Marking upserts; bulk marking covers every
//! Active employee in a single transaction.

use std::collections::BTreeSet;

use chrono::{Days, NaiveDate};
use shared::calendar::parse_date;
use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::{
    Attendance, AttendanceFilter, AttendanceMark, AttendanceStatus, AttendanceSummary,
    BulkAttendanceMark,
};
use shared::types::{Page, PageRequest};
use sqlx::SqlitePool;

use crate::db::repository::{RepoError, attendance, begin_write, employee};
use crate::utils::validation::{MAX_NOTE_LEN, normalize_optional, validate_optional_text};

/// Attendance listing page size
pub const ATTENDANCE_PER_PAGE: u32 = 20;

/// Look-back window for attendance aggregates
pub const ATTENDANCE_WINDOW_DAYS: u64 = 30;

/// First day of the aggregate window ending at `today`
pub fn window_start(today: NaiveDate) -> NaiveDate {
    today
        .checked_sub_days(Days::new(ATTENDANCE_WINDOW_DAYS))
        .unwrap_or(NaiveDate::MIN)
}

#[derive(Clone)]
pub struct AttendanceService {
    pool: SqlitePool,
}

impl AttendanceService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Record one employee's status for a day, overwriting any earlier mark
    pub async fn mark(&self, req: AttendanceMark) -> AppResult<Attendance> {
        let date = parse_date(&req.date)?;
        validate_optional_text(&req.notes, "notes", MAX_NOTE_LEN)?;
        let notes = normalize_optional(req.notes);

        let mut tx = begin_write(&self.pool).await?;

        // An unknown employee surfaces as a foreign key violation
        let row = attendance::upsert(&mut tx, req.employee_id, date, req.status, notes.as_deref())
            .await
            .map_err(|e| match e {
                RepoError::NotFound(_) => AppError::employee_not_found(req.employee_id),
                other => other.into(),
            })?;
        tx.commit().await.map_err(RepoError::from)?;

        tracing::debug!(
            employee_id = row.employee_id,
            date = %row.date,
            status = %row.status,
            "Attendance marked"
        );
        Ok(row)
    }

    /// Mark every Active employee for `date`
    ///
    /// Employees without an entry default to Present. Entries for employees
    /// that are not Active are applied as well. Returns the number of rows
    /// written; nothing is written when any entry names an unknown employee.
    pub async fn bulk_mark(&self, req: BulkAttendanceMark) -> AppResult<usize> {
        let date = parse_date(&req.date)?;
        for entry in req.entries.values() {
            validate_optional_text(&entry.notes, "notes", MAX_NOTE_LEN)?;
        }

        let mut tx = begin_write(&self.pool).await?;

        let explicit: Vec<i64> = req.entries.keys().copied().collect();
        if !explicit.is_empty() {
            let known: BTreeSet<i64> = employee::existing_ids(&mut *tx, &explicit)
                .await?
                .into_iter()
                .collect();
            if let Some(missing) = explicit.iter().find(|id| !known.contains(id)) {
                return Err(AppError::employee_not_found(*missing));
            }
        }

        let mut targets: BTreeSet<i64> = employee::find_active(&mut *tx)
            .await?
            .into_iter()
            .map(|e| e.id)
            .collect();
        targets.extend(explicit);

        for employee_id in &targets {
            let (status, notes) = match req.entries.get(employee_id) {
                Some(entry) => (entry.status, normalize_optional(entry.notes.clone())),
                None => (AttendanceStatus::Present, None),
            };
            attendance::upsert(&mut tx, *employee_id, date, status, notes.as_deref()).await?;
        }

        tx.commit().await.map_err(RepoError::from)?;

        tracing::info!(date = %date, marked = targets.len(), "Bulk attendance recorded");
        Ok(targets.len())
    }

    pub async fn find(&self, employee_id: i64, date: &str) -> AppResult<Attendance> {
        let date = parse_date(date)?;
        attendance::find(&self.pool, employee_id, date)
            .await?
            .ok_or_else(|| {
                AppError::with_message(
                    ErrorCode::AttendanceNotFound,
                    format!("No attendance for employee {employee_id} on {date}"),
                )
                .with_detail("employee_id", employee_id)
            })
    }

    /// Filtered listing, newest date first
    pub async fn list(
        &self,
        filter: &AttendanceFilter,
        page: Option<PageRequest>,
    ) -> AppResult<Page<Attendance>> {
        if let (Some(from), Some(to)) = (filter.from, filter.to)
            && from > to
        {
            return Err(AppError::with_message(
                ErrorCode::InvalidDate,
                format!("Date range is inverted: {from} > {to}"),
            ));
        }

        let page = page.unwrap_or(PageRequest::new(1, ATTENDANCE_PER_PAGE));
        let items = attendance::list(&self.pool, filter, page).await?;
        let total = attendance::count(&self.pool, filter).await?;
        Ok(Page::new(items, page.page, page.per_page, total))
    }

    /// Per-status counts for one employee on or after `since`
    pub async fn summary(&self, employee_id: i64, since: NaiveDate) -> AppResult<AttendanceSummary> {
        if employee::find_by_id(&self.pool, employee_id).await?.is_none() {
            return Err(AppError::employee_not_found(employee_id));
        }
        Ok(attendance::summary(&self.pool, employee_id, since).await?)
    }
}
