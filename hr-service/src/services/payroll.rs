//! Payroll Engine
//!
//! Monthly batch generation of salary records and payment status changes.
//! Amounts are `rust_decimal::Decimal` end to end.

use std::collections::HashSet;

use rust_decimal::Decimal;
use shared::calendar::YearMonth;
use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::{
    Adjustment, Adjustments, Employee, MonthTotals, PaymentStatus, SalaryFilter, SalaryRecord,
};
use shared::types::{Page, PageRequest};
use sqlx::{SqliteConnection, SqlitePool};

use crate::core::config::PayrollConfig;
use crate::db::repository::{RepoError, begin_write, employee, salary};
use crate::db::repository::salary::NewSalaryRecord;
use crate::utils::validation::validate_non_negative;

/// Salary listing page size
pub const SALARY_PER_PAGE: u32 = 20;

#[derive(Clone)]
pub struct PayrollService {
    pool: SqlitePool,
    config: PayrollConfig,
}

impl PayrollService {
    pub fn new(pool: SqlitePool, config: PayrollConfig) -> Self {
        Self { pool, config }
    }

    /// Generate Pending records for every Active employee
    ///
    /// Refuses with `PayrollAlreadyGenerated` when any record exists for the
    /// month. All inserts share one transaction.
    pub async fn generate(&self, month: &str, adjustments: &Adjustments) -> AppResult<Vec<SalaryRecord>> {
        let month: YearMonth = month.parse()?;
        validate_adjustments(adjustments)?;

        let mut tx = begin_write(&self.pool).await?;

        if salary::count_for_month(&mut *tx, month).await? > 0 {
            tracing::warn!(month = %month, "Payroll generation refused, month already has records");
            return Err(already_generated(month));
        }

        let active = employee::find_active(&mut *tx).await?;
        check_adjustment_targets(&active, adjustments)?;

        let records = insert_batch(&mut tx, month, &active, adjustments).await?;
        tx.commit().await.map_err(RepoError::from)?;

        tracing::info!(month = %month, records = records.len(), "Payroll generated");
        Ok(records)
    }

    /// Generate records only for Active employees that have none for the month
    ///
    /// Adjustments naming employees that already have a record are ignored.
    pub async fn generate_missing(
        &self,
        month: &str,
        adjustments: &Adjustments,
    ) -> AppResult<Vec<SalaryRecord>> {
        let month: YearMonth = month.parse()?;
        validate_adjustments(adjustments)?;

        let mut tx = begin_write(&self.pool).await?;

        let active = employee::find_active(&mut *tx).await?;
        check_adjustment_targets(&active, adjustments)?;

        let existing: HashSet<i64> = salary::employee_ids_for_month(&mut *tx, month)
            .await?
            .into_iter()
            .collect();
        let missing: Vec<Employee> = active
            .into_iter()
            .filter(|e| !existing.contains(&e.id))
            .collect();

        let records = insert_batch(&mut tx, month, &missing, adjustments).await?;
        tx.commit().await.map_err(RepoError::from)?;

        tracing::info!(
            month = %month,
            existing = existing.len(),
            added = records.len(),
            "Payroll topped up"
        );
        Ok(records)
    }

    /// Mark a record Paid and stamp `payment_date`
    pub async fn mark_paid(&self, salary_id: i64) -> AppResult<SalaryRecord> {
        let now = shared::util::now_millis();
        self.transition(salary_id, PaymentStatus::Paid, Some(now)).await
    }

    /// Mark a record Failed; an earlier `payment_date` is kept
    pub async fn mark_failed(&self, salary_id: i64) -> AppResult<SalaryRecord> {
        self.transition(salary_id, PaymentStatus::Failed, None).await
    }

    async fn transition(
        &self,
        salary_id: i64,
        next: PaymentStatus,
        payment_date: Option<i64>,
    ) -> AppResult<SalaryRecord> {
        let mut tx = begin_write(&self.pool).await?;

        let current = salary::find_by_id(&mut *tx, salary_id)
            .await?
            .ok_or_else(|| salary_not_found(salary_id))?;

        if !current.payment_status.can_transition_to(next) {
            if self.config.strict_transitions {
                return Err(AppError::with_message(
                    ErrorCode::InvalidPaymentTransition,
                    format!(
                        "Cannot move salary record {salary_id} from {} to {next}",
                        current.payment_status
                    ),
                )
                .with_detail("from", current.payment_status.as_str())
                .with_detail("to", next.as_str()));
            }
            tracing::debug!(
                salary_id,
                from = %current.payment_status,
                to = %next,
                "Payment transition outside table (lenient mode)"
            );
        }

        let updated = salary::set_status(&mut tx, salary_id, next, payment_date).await?;
        tx.commit().await.map_err(RepoError::from)?;

        tracing::info!(
            salary_id,
            employee_id = updated.employee_id,
            month = %updated.month,
            status = %updated.payment_status,
            "Payment status updated"
        );
        Ok(updated)
    }

    pub async fn find_by_id(&self, salary_id: i64) -> AppResult<SalaryRecord> {
        salary::find_by_id(&self.pool, salary_id)
            .await?
            .ok_or_else(|| salary_not_found(salary_id))
    }

    /// Filtered listing, newest month first
    pub async fn list(
        &self,
        filter: &SalaryFilter,
        page: Option<PageRequest>,
    ) -> AppResult<Page<SalaryRecord>> {
        let page = page.unwrap_or(PageRequest::new(1, SALARY_PER_PAGE));
        let items = salary::list(&self.pool, filter, page).await?;
        let total = salary::count(&self.pool, filter).await?;
        Ok(Page::new(items, page.page, page.per_page, total))
    }

    /// Record count, paid count and amount sums for a month
    pub async fn month_totals(&self, month: &str) -> AppResult<MonthTotals> {
        let month: YearMonth = month.parse()?;
        let records = salary::find_by_month(&self.pool, month).await?;

        let mut totals = MonthTotals {
            month,
            records: records.len() as i64,
            paid: 0,
            total_basic: Decimal::ZERO,
            total_allowances: Decimal::ZERO,
            total_deductions: Decimal::ZERO,
            total_net: Decimal::ZERO,
        };
        for record in &records {
            if record.payment_status == PaymentStatus::Paid {
                totals.paid += 1;
            }
            totals.total_basic += record.basic_salary;
            totals.total_allowances += record.allowances;
            totals.total_deductions += record.deductions;
            totals.total_net += record.net_salary;
        }
        Ok(totals)
    }
}

async fn insert_batch(
    conn: &mut SqliteConnection,
    month: YearMonth,
    employees: &[Employee],
    adjustments: &Adjustments,
) -> AppResult<Vec<SalaryRecord>> {
    let mut records = Vec::with_capacity(employees.len());
    for emp in employees {
        let adj = adjustments.get(&emp.id).copied().unwrap_or_default();
        let net_salary = adj.net(emp.salary);
        if net_salary.is_sign_negative() && !net_salary.is_zero() {
            tracing::warn!(employee_id = emp.id, month = %month, net = %net_salary, "Negative net salary");
        }

        let data = NewSalaryRecord {
            employee_id: emp.id,
            month,
            basic_salary: emp.salary,
            allowances: adj.allowances,
            deductions: adj.deductions,
            net_salary,
        };
        let record = salary::insert(&mut *conn, &data).await.map_err(|e| match e {
            // Lost a race with another generator
            RepoError::Duplicate(_) => already_generated(month).with_detail("employee_id", emp.id),
            other => other.into(),
        })?;
        records.push(record);
    }
    Ok(records)
}

fn validate_adjustments(adjustments: &Adjustments) -> AppResult<()> {
    for (employee_id, Adjustment { allowances, deductions }) in adjustments {
        validate_non_negative(*allowances, "allowances")
            .and_then(|_| validate_non_negative(*deductions, "deductions"))
            .map_err(|e| e.with_detail("employee_id", *employee_id))?;
    }
    Ok(())
}

/// Adjustments may only name employees included in the run
fn check_adjustment_targets(active: &[Employee], adjustments: &Adjustments) -> AppResult<()> {
    let active_ids: HashSet<i64> = active.iter().map(|e| e.id).collect();
    let mut stray: Vec<i64> = adjustments
        .keys()
        .filter(|id| !active_ids.contains(id))
        .copied()
        .collect();
    if stray.is_empty() {
        return Ok(());
    }
    stray.sort_unstable();
    Err(AppError::validation(format!(
        "Adjustments given for employees outside the payroll run: {stray:?}"
    ))
    .with_detail("employee_ids", stray))
}

fn already_generated(month: YearMonth) -> AppError {
    AppError::with_message(
        ErrorCode::PayrollAlreadyGenerated,
        format!("Payroll for {month} has already been generated"),
    )
    .with_detail("month", month.to_string())
}

fn salary_not_found(salary_id: i64) -> AppError {
    AppError::with_message(
        ErrorCode::SalaryRecordNotFound,
        format!("Salary record {salary_id} not found"),
    )
    .with_detail("salary_id", salary_id)
}
