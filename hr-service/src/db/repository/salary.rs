//! Salary Record Repository

use super::{RepoError, RepoResult, parse_decimal};
use rust_decimal::Decimal;
use shared::calendar::YearMonth;
use shared::models::{PaymentStatus, SalaryFilter, SalaryRecord};
use shared::types::PageRequest;
use sqlx::{SqliteConnection, SqliteExecutor, SqlitePool};

const SALARY_COLUMNS: &str = "id, employee_id, month, basic_salary, allowances, deductions, net_salary, payment_status, payment_date, created_at, updated_at";

const SALARY_FILTER: &str = "WHERE (?1 IS NULL OR employee_id = ?1) AND (?2 IS NULL OR month = ?2) AND (?3 IS NULL OR payment_status = ?3)";

#[derive(sqlx::FromRow)]
struct SalaryRow {
    id: i64,
    employee_id: i64,
    month: String,
    basic_salary: String,
    allowances: String,
    deductions: String,
    net_salary: String,
    payment_status: PaymentStatus,
    payment_date: Option<i64>,
    created_at: i64,
    updated_at: i64,
}

impl TryFrom<SalaryRow> for SalaryRecord {
    type Error = RepoError;

    fn try_from(row: SalaryRow) -> Result<Self, Self::Error> {
        let month: YearMonth = row
            .month
            .parse()
            .map_err(|_| RepoError::Database(format!("Corrupt month in salary_record: {:?}", row.month)))?;
        Ok(SalaryRecord {
            id: row.id,
            employee_id: row.employee_id,
            month,
            basic_salary: parse_decimal(&row.basic_salary, "salary_record.basic_salary")?,
            allowances: parse_decimal(&row.allowances, "salary_record.allowances")?,
            deductions: parse_decimal(&row.deductions, "salary_record.deductions")?,
            net_salary: parse_decimal(&row.net_salary, "salary_record.net_salary")?,
            payment_status: row.payment_status,
            payment_date: row.payment_date,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

fn into_records(rows: Vec<SalaryRow>) -> RepoResult<Vec<SalaryRecord>> {
    rows.into_iter().map(SalaryRecord::try_from).collect()
}

/// Insert data for one generated record
#[derive(Debug, Clone)]
pub struct NewSalaryRecord {
    pub employee_id: i64,
    pub month: YearMonth,
    pub basic_salary: Decimal,
    pub allowances: Decimal,
    pub deductions: Decimal,
    pub net_salary: Decimal,
}

pub async fn find_by_id<'e, E>(executor: E, id: i64) -> RepoResult<Option<SalaryRecord>>
where
    E: SqliteExecutor<'e>,
{
    let sql = format!("SELECT {SALARY_COLUMNS} FROM salary_record WHERE id = ?");
    let row = sqlx::query_as::<_, SalaryRow>(&sql)
        .bind(id)
        .fetch_optional(executor)
        .await?;
    row.map(SalaryRecord::try_from).transpose()
}

pub async fn find_for(
    pool: &SqlitePool,
    employee_id: i64,
    month: YearMonth,
) -> RepoResult<Option<SalaryRecord>> {
    let sql = format!("SELECT {SALARY_COLUMNS} FROM salary_record WHERE employee_id = ? AND month = ?");
    let row = sqlx::query_as::<_, SalaryRow>(&sql)
        .bind(employee_id)
        .bind(month.to_string())
        .fetch_optional(pool)
        .await?;
    row.map(SalaryRecord::try_from).transpose()
}

/// All records of a month, by employee id
pub async fn find_by_month<'e, E>(executor: E, month: YearMonth) -> RepoResult<Vec<SalaryRecord>>
where
    E: SqliteExecutor<'e>,
{
    let sql = format!("SELECT {SALARY_COLUMNS} FROM salary_record WHERE month = ? ORDER BY employee_id");
    let rows = sqlx::query_as::<_, SalaryRow>(&sql)
        .bind(month.to_string())
        .fetch_all(executor)
        .await?;
    into_records(rows)
}

pub async fn count_for_month<'e, E>(executor: E, month: YearMonth) -> RepoResult<i64>
where
    E: SqliteExecutor<'e>,
{
    let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM salary_record WHERE month = ?")
        .bind(month.to_string())
        .fetch_one(executor)
        .await?;
    Ok(total)
}

/// Employees that already have a record for `month`
pub async fn employee_ids_for_month<'e, E>(executor: E, month: YearMonth) -> RepoResult<Vec<i64>>
where
    E: SqliteExecutor<'e>,
{
    let ids = sqlx::query_scalar::<_, i64>(
        "SELECT employee_id FROM salary_record WHERE month = ? ORDER BY employee_id",
    )
    .bind(month.to_string())
    .fetch_all(executor)
    .await?;
    Ok(ids)
}

/// Insert a Pending record; a second record for the same (employee, month) is a Duplicate
pub async fn insert(conn: &mut SqliteConnection, data: &NewSalaryRecord) -> RepoResult<SalaryRecord> {
    let now = shared::util::now_millis();
    let sql = format!(
        "INSERT INTO salary_record (employee_id, month, basic_salary, allowances, deductions, net_salary, payment_status, payment_date, created_at, updated_at) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, 'Pending', NULL, ?7, ?7) RETURNING {SALARY_COLUMNS}"
    );
    let row = sqlx::query_as::<_, SalaryRow>(&sql)
        .bind(data.employee_id)
        .bind(data.month.to_string())
        .bind(data.basic_salary.to_string())
        .bind(data.allowances.to_string())
        .bind(data.deductions.to_string())
        .bind(data.net_salary.to_string())
        .bind(now)
        .fetch_one(&mut *conn)
        .await?;
    SalaryRecord::try_from(row)
}

/// Set the payment status; `payment_date` is only written when given
pub async fn set_status(
    conn: &mut SqliteConnection,
    id: i64,
    status: PaymentStatus,
    payment_date: Option<i64>,
) -> RepoResult<SalaryRecord> {
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE salary_record SET payment_status = ?1, payment_date = COALESCE(?2, payment_date), updated_at = ?3 WHERE id = ?4",
    )
    .bind(status)
    .bind(payment_date)
    .bind(now)
    .bind(id)
    .execute(&mut *conn)
    .await?;

    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Salary record {id} not found")));
    }
    find_by_id(&mut *conn, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Salary record {id} not found")))
}

pub async fn list(
    pool: &SqlitePool,
    filter: &SalaryFilter,
    page: PageRequest,
) -> RepoResult<Vec<SalaryRecord>> {
    let sql = format!(
        "SELECT {SALARY_COLUMNS} FROM salary_record {SALARY_FILTER} ORDER BY month DESC, employee_id ASC LIMIT ?4 OFFSET ?5"
    );
    let rows = sqlx::query_as::<_, SalaryRow>(&sql)
        .bind(filter.employee_id)
        .bind(filter.month.map(|m| m.to_string()))
        .bind(filter.status)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(pool)
        .await?;
    into_records(rows)
}

pub async fn count(pool: &SqlitePool, filter: &SalaryFilter) -> RepoResult<i64> {
    let sql = format!("SELECT COUNT(*) FROM salary_record {SALARY_FILTER}");
    let total = sqlx::query_scalar::<_, i64>(&sql)
        .bind(filter.employee_id)
        .bind(filter.month.map(|m| m.to_string()))
        .bind(filter.status)
        .fetch_one(pool)
        .await?;
    Ok(total)
}

pub async fn count_for(pool: &SqlitePool, employee_id: i64) -> RepoResult<i64> {
    let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM salary_record WHERE employee_id = ?")
        .bind(employee_id)
        .fetch_one(pool)
        .await?;
    Ok(total)
}
