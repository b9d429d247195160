//! Employee records
//!
//! Validation, uniqueness of email and the read models built on top of the
//! employee table (listing, dashboard counts, detail view).

use chrono::NaiveDate;
use shared::calendar::{YearMonth, parse_date};
use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::{
    AttendanceStatus, DashboardStats, Employee, EmployeeCreate, EmployeeDetail, EmployeeFilter,
    EmployeeUpdate,
};
use shared::types::{Page, PageRequest};
use sqlx::SqlitePool;

use super::attendance::window_start;
use crate::db::repository::employee::{EmployeeChanges, NewEmployee};
use crate::db::repository::{RepoError, attendance, employee, salary};
use crate::utils::validation::{
    MAX_NAME_LEN, MAX_SHORT_TEXT_LEN, normalize_optional, validate_email, validate_non_negative,
    validate_optional_text, validate_required_text,
};

/// Employee listing page size
pub const EMPLOYEES_PER_PAGE: u32 = 10;

#[derive(Clone)]
pub struct EmployeeService {
    pool: SqlitePool,
}

impl EmployeeService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, data: EmployeeCreate) -> AppResult<Employee> {
        validate_required_text(&data.name, "name", MAX_NAME_LEN)?;
        validate_required_text(&data.department, "department", MAX_NAME_LEN)?;
        validate_required_text(&data.position, "position", MAX_NAME_LEN)?;
        validate_optional_text(&data.phone, "phone", MAX_SHORT_TEXT_LEN)?;
        validate_email(&data.email)?;
        validate_non_negative(data.salary, "salary")?;

        let joining_date = match data.joining_date.as_deref().map(str::trim) {
            Some(raw) if !raw.is_empty() => parse_date(raw)?,
            _ => shared::util::today(),
        };
        let email = normalize_email(&data.email);

        if employee::find_by_email(&self.pool, &email).await?.is_some() {
            return Err(email_taken(&email));
        }

        let new = NewEmployee {
            name: data.name.trim().to_string(),
            email,
            phone: normalize_optional(data.phone),
            department: data.department.trim().to_string(),
            position: data.position.trim().to_string(),
            salary: data.salary,
            joining_date,
            status: data.status.unwrap_or_default(),
        };
        let created = employee::create(&self.pool, &new)
            .await
            .map_err(|e| map_write_error(e, &new.email))?;

        tracing::info!(
            employee_id = created.id,
            department = %created.department,
            "Employee created"
        );
        Ok(created)
    }

    /// Partial update; absent fields keep their stored value
    pub async fn update(&self, id: i64, data: EmployeeUpdate) -> AppResult<Employee> {
        if let Some(name) = &data.name {
            validate_required_text(name, "name", MAX_NAME_LEN)?;
        }
        if let Some(department) = &data.department {
            validate_required_text(department, "department", MAX_NAME_LEN)?;
        }
        if let Some(position) = &data.position {
            validate_required_text(position, "position", MAX_NAME_LEN)?;
        }
        validate_optional_text(&data.phone, "phone", MAX_SHORT_TEXT_LEN)?;
        if let Some(email) = &data.email {
            validate_email(email)?;
        }
        if let Some(salary) = data.salary {
            validate_non_negative(salary, "salary")?;
        }
        let joining_date = data.joining_date.as_deref().map(parse_date).transpose()?;
        let email = data.email.as_deref().map(normalize_email);

        if employee::find_by_id(&self.pool, id).await?.is_none() {
            return Err(AppError::employee_not_found(id));
        }
        if let Some(email) = &email
            && let Some(owner) = employee::find_by_email(&self.pool, email).await?
            && owner.id != id
        {
            return Err(email_taken(email));
        }

        let changes = EmployeeChanges {
            name: data.name.map(|v| v.trim().to_string()),
            email,
            // A blank phone clears the stored one
            phone: data.phone.map(|p| normalize_optional(Some(p))),
            department: data.department.map(|v| v.trim().to_string()),
            position: data.position.map(|v| v.trim().to_string()),
            salary: data.salary,
            joining_date,
            status: data.status,
        };
        let updated = employee::update(&self.pool, id, &changes)
            .await
            .map_err(|e| match e {
                RepoError::NotFound(_) => AppError::employee_not_found(id),
                other => map_write_error(other, changes.email.as_deref().unwrap_or_default()),
            })?;

        tracing::info!(employee_id = id, "Employee updated");
        Ok(updated)
    }

    /// Hard delete; attendance and salary rows are removed with the employee
    pub async fn delete(&self, id: i64) -> AppResult<()> {
        if !employee::delete(&self.pool, id).await? {
            return Err(AppError::employee_not_found(id));
        }
        tracing::info!(employee_id = id, "Employee deleted");
        Ok(())
    }

    pub async fn find_by_id(&self, id: i64) -> AppResult<Employee> {
        employee::find_by_id(&self.pool, id)
            .await?
            .ok_or_else(|| AppError::employee_not_found(id))
    }

    pub async fn list(
        &self,
        filter: &EmployeeFilter,
        page: Option<PageRequest>,
    ) -> AppResult<Page<Employee>> {
        let page = page.unwrap_or(PageRequest::new(1, EMPLOYEES_PER_PAGE));
        let items = employee::list(&self.pool, filter, page).await?;
        let total = employee::count(&self.pool, filter).await?;
        Ok(Page::new(items, page.page, page.per_page, total))
    }

    pub async fn departments(&self) -> AppResult<Vec<String>> {
        Ok(employee::departments(&self.pool).await?)
    }

    pub async fn dashboard_stats(&self, today: NaiveDate) -> AppResult<DashboardStats> {
        let (total_employees, active_employees, departments) = employee::headcount(&self.pool).await?;
        let present_today = attendance::count_on(&self.pool, today, AttendanceStatus::Present).await?;
        Ok(DashboardStats {
            total_employees,
            active_employees,
            departments,
            present_today,
        })
    }

    /// Employee with recent attendance and the salary record for `today`'s month
    pub async fn detail(&self, id: i64, today: NaiveDate) -> AppResult<EmployeeDetail> {
        let employee = self.find_by_id(id).await?;
        let recent_attendance = attendance::recent(&self.pool, id, window_start(today)).await?;
        let present_days = recent_attendance
            .iter()
            .filter(|a| a.status == AttendanceStatus::Present)
            .count() as i64;
        let absent_days = recent_attendance.len() as i64 - present_days;
        let current_salary = salary::find_for(&self.pool, id, YearMonth::of(today)).await?;

        Ok(EmployeeDetail {
            employee,
            recent_attendance,
            present_days,
            absent_days,
            current_salary,
        })
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn email_taken(email: &str) -> AppError {
    AppError::with_message(
        ErrorCode::EmployeeEmailExists,
        format!("Employee email already in use: {email}"),
    )
    .with_detail("email", email)
}

/// A unique violation on a write can only be the email column
fn map_write_error(err: RepoError, email: &str) -> AppError {
    match err {
        RepoError::Duplicate(_) => email_taken(email),
        other => other.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::test_support::test_pool;
    use rust_decimal::Decimal;
    use shared::models::{AttendanceMark, EmployeeSort, EmployeeStatus};
    use std::str::FromStr;

    fn jane() -> EmployeeCreate {
        EmployeeCreate {
            name: "Jane Doe".into(),
            email: "Jane.Doe@Example.com".into(),
            phone: Some("555-0100".into()),
            department: "Engineering".into(),
            position: "Developer".into(),
            salary: Decimal::from_str("5000.00").unwrap(),
            joining_date: Some("2021-06-01".into()),
            status: None,
        }
    }

    fn person(name: &str, email: &str, department: &str, salary: &str) -> EmployeeCreate {
        EmployeeCreate {
            name: name.into(),
            email: email.into(),
            phone: None,
            department: department.into(),
            position: "Analyst".into(),
            salary: Decimal::from_str(salary).unwrap(),
            joining_date: None,
            status: None,
        }
    }

    #[tokio::test]
    async fn test_create_normalizes_and_defaults() {
        let service = EmployeeService::new(test_pool().await);
        let created = service.create(jane()).await.unwrap();
        assert_eq!(created.email, "jane.doe@example.com");
        assert_eq!(created.status, EmployeeStatus::Active);
        assert_eq!(created.joining_date, NaiveDate::from_ymd_opt(2021, 6, 1).unwrap());

        let defaulted = service
            .create(person("Sam", "sam@example.com", "Ops", "10"))
            .await
            .unwrap();
        assert_eq!(defaulted.joining_date, shared::util::today());
    }

    #[tokio::test]
    async fn test_create_validation() {
        let service = EmployeeService::new(test_pool().await);

        let mut bad = jane();
        bad.name = "  ".into();
        assert_eq!(service.create(bad).await.unwrap_err().code, ErrorCode::RequiredField);

        let mut bad = jane();
        bad.email = "not-an-email".into();
        assert_eq!(service.create(bad).await.unwrap_err().code, ErrorCode::InvalidFormat);

        let mut bad = jane();
        bad.salary = Decimal::from_str("-1").unwrap();
        assert_eq!(service.create(bad).await.unwrap_err().code, ErrorCode::InvalidAmount);

        let mut bad = jane();
        bad.joining_date = Some("01/06/2021".into());
        assert_eq!(service.create(bad).await.unwrap_err().code, ErrorCode::InvalidDate);
    }

    #[tokio::test]
    async fn test_duplicate_email_conflicts() {
        let service = EmployeeService::new(test_pool().await);
        let first = service.create(jane()).await.unwrap();

        let dup = person("Other Jane", "JANE.DOE@example.com", "Sales", "1");
        let err = service.create(dup).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::EmployeeEmailExists);
        assert!(err.is_conflict());

        let bob = service
            .create(person("Bob", "bob@example.com", "Sales", "1"))
            .await
            .unwrap();
        let err = service
            .update(
                bob.id,
                EmployeeUpdate { email: Some("jane.doe@example.com".into()), ..Default::default() },
            )
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::EmployeeEmailExists);

        // Re-saving one's own email is fine
        let same = service
            .update(
                first.id,
                EmployeeUpdate { email: Some("jane.doe@example.com".into()), ..Default::default() },
            )
            .await
            .unwrap();
        assert_eq!(same.email, first.email);
    }

    #[tokio::test]
    async fn test_update_and_delete() {
        let pool = test_pool().await;
        let service = EmployeeService::new(pool.clone());
        let created = service.create(jane()).await.unwrap();

        let updated = service
            .update(
                created.id,
                EmployeeUpdate {
                    salary: Some(Decimal::from_str("5500.50").unwrap()),
                    status: Some(EmployeeStatus::OnLeave),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.salary, Decimal::from_str("5500.50").unwrap());
        assert_eq!(updated.status, EmployeeStatus::OnLeave);
        assert_eq!(updated.name, "Jane Doe");
        assert_eq!(updated.phone.as_deref(), Some("555-0100"));

        let cleared = service
            .update(created.id, EmployeeUpdate { phone: Some("  ".into()), ..Default::default() })
            .await
            .unwrap();
        assert_eq!(cleared.phone, None);

        let err = service.update(999, EmployeeUpdate::default()).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::EmployeeNotFound);

        service.delete(created.id).await.unwrap();
        let err = service.delete(created.id).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::EmployeeNotFound);
    }

    #[tokio::test]
    async fn test_list_search_and_sort() {
        let service = EmployeeService::new(test_pool().await);
        service.create(person("Zed", "zed@example.com", "Sales", "900")).await.unwrap();
        service.create(person("amy", "amy@example.com", "Engineering", "7000")).await.unwrap();
        service.create(person("Bea", "bea@corp.example.com", "Engineering", "80")).await.unwrap();

        let page = service.list(&EmployeeFilter::default(), None).await.unwrap();
        assert_eq!(page.per_page, EMPLOYEES_PER_PAGE);
        let names: Vec<&str> = page.items.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["amy", "Bea", "Zed"]);

        let by_salary = EmployeeFilter { sort: EmployeeSort::SalaryDesc, ..Default::default() };
        let page = service.list(&by_salary, None).await.unwrap();
        assert_eq!(page.items[0].name, "amy");
        assert_eq!(page.items[2].name, "Bea");

        let search = EmployeeFilter { search: Some("CORP".into()), ..Default::default() };
        let page = service.list(&search, None).await.unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.items[0].name, "Bea");

        assert_eq!(service.departments().await.unwrap(), ["Engineering", "Sales"]);
    }

    #[tokio::test]
    async fn test_dashboard_and_detail() {
        let pool = test_pool().await;
        let service = EmployeeService::new(pool.clone());
        let attendance = crate::services::AttendanceService::new(pool.clone());
        let jane = service.create(jane()).await.unwrap();
        service
            .create(EmployeeCreate { status: Some(EmployeeStatus::Inactive), ..person("Old", "old@example.com", "Ops", "1") })
            .await
            .unwrap();

        let today = NaiveDate::from_ymd_opt(2024, 3, 20).unwrap();
        for (date, status) in [
            ("2024-03-20", AttendanceStatus::Present),
            ("2024-03-19", AttendanceStatus::Absent),
            ("2024-03-18", AttendanceStatus::Late),
            ("2024-01-02", AttendanceStatus::Present),
        ] {
            attendance
                .mark(AttendanceMark { employee_id: jane.id, date: date.into(), status, notes: None })
                .await
                .unwrap();
        }

        let stats = service.dashboard_stats(today).await.unwrap();
        assert_eq!(stats.total_employees, 2);
        assert_eq!(stats.active_employees, 1);
        assert_eq!(stats.departments, 2);
        assert_eq!(stats.present_today, 1);

        let detail = service.detail(jane.id, today).await.unwrap();
        assert_eq!(detail.recent_attendance.len(), 3);
        assert_eq!(detail.present_days, 1);
        assert_eq!(detail.absent_days, 2);
        assert!(detail.current_salary.is_none());

        let err = service.detail(999, today).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::EmployeeNotFound);
    }
}
