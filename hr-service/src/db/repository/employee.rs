//! Employee Repository

use super::{RepoError, RepoResult, like_pattern, parse_decimal};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use shared::models::{Employee, EmployeeFilter, EmployeeSort, EmployeeStatus};
use shared::types::PageRequest;
use sqlx::{SqliteExecutor, SqlitePool};

const EMPLOYEE_SELECT: &str = "SELECT id, name, email, phone, department, position, salary, joining_date, status, created_at, updated_at FROM employee";

/// Filter clause shared by `list` and `count`; unset filters bind NULL
const EMPLOYEE_FILTER: &str = "WHERE (?1 IS NULL OR name LIKE ?1 ESCAPE '\\' OR email LIKE ?1 ESCAPE '\\' OR position LIKE ?1 ESCAPE '\\') AND (?2 IS NULL OR department = ?2) AND (?3 IS NULL OR status = ?3)";

#[derive(sqlx::FromRow)]
struct EmployeeRow {
    id: i64,
    name: String,
    email: String,
    phone: Option<String>,
    department: String,
    position: String,
    salary: String,
    joining_date: NaiveDate,
    status: EmployeeStatus,
    created_at: i64,
    updated_at: i64,
}

impl TryFrom<EmployeeRow> for Employee {
    type Error = RepoError;

    fn try_from(row: EmployeeRow) -> Result<Self, Self::Error> {
        Ok(Employee {
            salary: parse_decimal(&row.salary, "employee.salary")?,
            id: row.id,
            name: row.name,
            email: row.email,
            phone: row.phone,
            department: row.department,
            position: row.position,
            joining_date: row.joining_date,
            status: row.status,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

fn into_employees(rows: Vec<EmployeeRow>) -> RepoResult<Vec<Employee>> {
    rows.into_iter().map(Employee::try_from).collect()
}

/// Validated insert data
#[derive(Debug, Clone)]
pub struct NewEmployee {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub department: String,
    pub position: String,
    pub salary: Decimal,
    pub joining_date: NaiveDate,
    pub status: EmployeeStatus,
}

/// Validated partial update; `None` keeps the stored value
#[derive(Debug, Clone, Default)]
pub struct EmployeeChanges {
    pub name: Option<String>,
    pub email: Option<String>,
    /// `Some(None)` clears the stored phone
    pub phone: Option<Option<String>>,
    pub department: Option<String>,
    pub position: Option<String>,
    pub salary: Option<Decimal>,
    pub joining_date: Option<NaiveDate>,
    pub status: Option<EmployeeStatus>,
}

pub async fn find_by_id<'e, E>(executor: E, id: i64) -> RepoResult<Option<Employee>>
where
    E: SqliteExecutor<'e>,
{
    let sql = format!("{EMPLOYEE_SELECT} WHERE id = ?");
    let row = sqlx::query_as::<_, EmployeeRow>(&sql)
        .bind(id)
        .fetch_optional(executor)
        .await?;
    row.map(Employee::try_from).transpose()
}

pub async fn find_by_email(pool: &SqlitePool, email: &str) -> RepoResult<Option<Employee>> {
    let sql = format!("{EMPLOYEE_SELECT} WHERE email = ? COLLATE NOCASE");
    let row = sqlx::query_as::<_, EmployeeRow>(&sql)
        .bind(email)
        .fetch_optional(pool)
        .await?;
    row.map(Employee::try_from).transpose()
}

/// All Active employees, ordered by id
pub async fn find_active<'e, E>(executor: E) -> RepoResult<Vec<Employee>>
where
    E: SqliteExecutor<'e>,
{
    let sql = format!("{EMPLOYEE_SELECT} WHERE status = 'Active' ORDER BY id");
    let rows = sqlx::query_as::<_, EmployeeRow>(&sql)
        .fetch_all(executor)
        .await?;
    into_employees(rows)
}

pub async fn find_by_department(pool: &SqlitePool, department: &str) -> RepoResult<Vec<Employee>> {
    let sql = format!("{EMPLOYEE_SELECT} WHERE department = ? ORDER BY name");
    let rows = sqlx::query_as::<_, EmployeeRow>(&sql)
        .bind(department)
        .fetch_all(pool)
        .await?;
    into_employees(rows)
}

/// Ids among `ids` that exist, any status
pub async fn existing_ids<'e, E>(executor: E, ids: &[i64]) -> RepoResult<Vec<i64>>
where
    E: SqliteExecutor<'e>,
{
    if ids.is_empty() {
        return Ok(Vec::new());
    }
    let placeholders = vec!["?"; ids.len()].join(", ");
    let sql = format!("SELECT id FROM employee WHERE id IN ({placeholders}) ORDER BY id");
    let mut query = sqlx::query_scalar::<_, i64>(&sql);
    for id in ids {
        query = query.bind(id);
    }
    Ok(query.fetch_all(executor).await?)
}

pub async fn list(
    pool: &SqlitePool,
    filter: &EmployeeFilter,
    page: PageRequest,
) -> RepoResult<Vec<Employee>> {
    let order_by = match filter.sort {
        EmployeeSort::Name => "name COLLATE NOCASE ASC, id ASC",
        EmployeeSort::SalaryDesc => "CAST(salary AS REAL) DESC, name COLLATE NOCASE ASC, id ASC",
        EmployeeSort::Department => "department COLLATE NOCASE ASC, name COLLATE NOCASE ASC, id ASC",
    };
    let sql = format!("{EMPLOYEE_SELECT} {EMPLOYEE_FILTER} ORDER BY {order_by} LIMIT ?4 OFFSET ?5");
    let rows = sqlx::query_as::<_, EmployeeRow>(&sql)
        .bind(search_pattern(filter))
        .bind(filter.department.as_deref())
        .bind(filter.status)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(pool)
        .await?;
    into_employees(rows)
}

pub async fn count(pool: &SqlitePool, filter: &EmployeeFilter) -> RepoResult<i64> {
    let sql = format!("SELECT COUNT(*) FROM employee {EMPLOYEE_FILTER}");
    let total = sqlx::query_scalar::<_, i64>(&sql)
        .bind(search_pattern(filter))
        .bind(filter.department.as_deref())
        .bind(filter.status)
        .fetch_one(pool)
        .await?;
    Ok(total)
}

fn search_pattern(filter: &EmployeeFilter) -> Option<String> {
    filter
        .search
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(like_pattern)
}

/// Distinct department names, sorted
pub async fn departments(pool: &SqlitePool) -> RepoResult<Vec<String>> {
    let rows = sqlx::query_scalar::<_, String>(
        "SELECT DISTINCT department FROM employee ORDER BY department COLLATE NOCASE",
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// (total, active, distinct departments)
pub async fn headcount(pool: &SqlitePool) -> RepoResult<(i64, i64, i64)> {
    let row: (i64, i64, i64) = sqlx::query_as(
        "SELECT COUNT(*), COALESCE(SUM(CASE WHEN status = 'Active' THEN 1 ELSE 0 END), 0), COUNT(DISTINCT department) FROM employee",
    )
    .fetch_one(pool)
    .await?;
    Ok(row)
}

pub async fn create(pool: &SqlitePool, data: &NewEmployee) -> RepoResult<Employee> {
    let now = shared::util::now_millis();
    let id: i64 = sqlx::query_scalar(
        "INSERT INTO employee (name, email, phone, department, position, salary, joining_date, status, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?9) RETURNING id",
    )
    .bind(&data.name)
    .bind(&data.email)
    .bind(&data.phone)
    .bind(&data.department)
    .bind(&data.position)
    .bind(data.salary.to_string())
    .bind(data.joining_date)
    .bind(data.status)
    .bind(now)
    .fetch_one(pool)
    .await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create employee".into()))
}

pub async fn update(pool: &SqlitePool, id: i64, data: &EmployeeChanges) -> RepoResult<Employee> {
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE employee SET name = COALESCE(?1, name), email = COALESCE(?2, email), phone = CASE WHEN ?11 THEN ?3 ELSE phone END, department = COALESCE(?4, department), position = COALESCE(?5, position), salary = COALESCE(?6, salary), joining_date = COALESCE(?7, joining_date), status = COALESCE(?8, status), updated_at = ?9 WHERE id = ?10",
    )
    .bind(&data.name)
    .bind(&data.email)
    .bind(data.phone.as_ref().and_then(|p| p.as_deref()))
    .bind(&data.department)
    .bind(&data.position)
    .bind(data.salary.map(|s| s.to_string()))
    .bind(data.joining_date)
    .bind(data.status)
    .bind(now)
    .bind(id)
    .bind(data.phone.is_some())
    .execute(pool)
    .await?;

    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Employee {id} not found")));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Employee {id} not found")))
}

/// Hard delete; attendance and salary rows go with it (ON DELETE CASCADE)
pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let rows = sqlx::query("DELETE FROM employee WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected() > 0)
}
