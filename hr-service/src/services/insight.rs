//! Insight Gateway
//!
//! Builds aggregate facts from the store and hands them to an injected text
//! generator. The gateway is read-only; when it yields nothing a fixed
//! fallback sentence is returned instead.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use shared::error::AppResult;
use shared::models::Employee;
use sqlx::SqlitePool;

use super::attendance::window_start;
use crate::db::repository::{attendance, employee};

pub const NO_EMPLOYEES_IN_DEPARTMENT: &str = "No employees in this department";

/// Aggregated facts sent to the gateway
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum InsightRequest {
    SalaryRecommendation {
        name: String,
        position: String,
        department: String,
        salary: Decimal,
        years_of_service: f64,
    },
    PerformanceInsight {
        name: String,
        department: String,
        /// Present days as a percentage of recorded days
        attendance_score: f64,
        months_employed: i64,
    },
    AttendanceAnalysis {
        name: String,
        present_days: i64,
        absent_days: i64,
        total_days: i64,
        rate: f64,
    },
    DepartmentInsight {
        department: String,
        total_employees: i64,
        avg_salary: Decimal,
        avg_attendance: f64,
    },
}

impl InsightRequest {
    /// Text returned when the gateway has no answer
    pub fn fallback(&self) -> &'static str {
        match self {
            Self::SalaryRecommendation { .. } => "Unable to generate recommendation at this time.",
            Self::PerformanceInsight { .. } | Self::DepartmentInsight { .. } => {
                "Unable to generate insight at this time."
            }
            Self::AttendanceAnalysis { .. } => "Unable to generate analysis at this time.",
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::SalaryRecommendation { .. } => "salary_recommendation",
            Self::PerformanceInsight { .. } => "performance_insight",
            Self::AttendanceAnalysis { .. } => "attendance_analysis",
            Self::DepartmentInsight { .. } => "department_insight",
        }
    }
}

/// Free-text generator fed with aggregate facts
#[async_trait]
pub trait InsightGateway: Send + Sync {
    /// `None` when no text could be produced
    async fn generate(&self, request: &InsightRequest) -> Option<String>;
}

/// Gateway used when none is configured
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledGateway;

#[async_trait]
impl InsightGateway for DisabledGateway {
    async fn generate(&self, _request: &InsightRequest) -> Option<String> {
        None
    }
}

#[derive(Clone)]
pub struct InsightService {
    pool: SqlitePool,
    gateway: Arc<dyn InsightGateway>,
    max_chars: usize,
}

impl InsightService {
    pub fn new(pool: SqlitePool, gateway: Arc<dyn InsightGateway>, max_chars: usize) -> Self {
        Self {
            pool,
            gateway,
            max_chars,
        }
    }

    pub async fn salary_recommendation(&self, employee_id: i64, today: NaiveDate) -> AppResult<String> {
        let emp = self.employee(employee_id).await?;
        let request = InsightRequest::SalaryRecommendation {
            years_of_service: days_employed(&emp, today) as f64 / 365.25,
            name: emp.name,
            position: emp.position,
            department: emp.department,
            salary: emp.salary,
        };
        Ok(self.ask(&request).await)
    }

    pub async fn performance_insight(&self, employee_id: i64, today: NaiveDate) -> AppResult<String> {
        let emp = self.employee(employee_id).await?;
        let summary = attendance::summary(&self.pool, employee_id, window_start(today)).await?;
        let request = InsightRequest::PerformanceInsight {
            attendance_score: summary.present_rate(),
            months_employed: days_employed(&emp, today) / 30,
            name: emp.name,
            department: emp.department,
        };
        Ok(self.ask(&request).await)
    }

    pub async fn attendance_analysis(&self, employee_id: i64, today: NaiveDate) -> AppResult<String> {
        let emp = self.employee(employee_id).await?;
        let summary = attendance::summary(&self.pool, employee_id, window_start(today)).await?;
        let request = InsightRequest::AttendanceAnalysis {
            name: emp.name,
            present_days: summary.present,
            absent_days: summary.not_present(),
            total_days: summary.total(),
            rate: summary.present_rate(),
        };
        Ok(self.ask(&request).await)
    }

    /// Department-wide view; an empty department never reaches the gateway
    pub async fn department_insight(&self, department: &str, today: NaiveDate) -> AppResult<String> {
        let members = employee::find_by_department(&self.pool, department).await?;
        if members.is_empty() {
            return Ok(NO_EMPLOYEES_IN_DEPARTMENT.to_string());
        }

        let total_employees = members.len() as i64;
        let payroll: Decimal = members.iter().map(|e| e.salary).sum();
        let avg_salary = (payroll / Decimal::from(total_employees)).round_dp(2);
        let summary =
            attendance::department_summary(&self.pool, department, window_start(today)).await?;

        let request = InsightRequest::DepartmentInsight {
            department: department.to_string(),
            total_employees,
            avg_salary,
            avg_attendance: summary.present_rate(),
        };
        Ok(self.ask(&request).await)
    }

    async fn employee(&self, id: i64) -> AppResult<Employee> {
        employee::find_by_id(&self.pool, id)
            .await?
            .ok_or_else(|| shared::error::AppError::employee_not_found(id))
    }

    async fn ask(&self, request: &InsightRequest) -> String {
        match self.gateway.generate(request).await {
            Some(text) if !text.trim().is_empty() => truncate_chars(text.trim(), self.max_chars),
            _ => {
                tracing::debug!(kind = request.kind(), "Insight gateway returned nothing, using fallback");
                request.fallback().to_string()
            }
        }
    }
}

fn days_employed(emp: &Employee, today: NaiveDate) -> i64 {
    (today - emp.joining_date).num_days().max(0)
}

fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => text[..idx].to_string(),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::test_support::{seed_employee, test_pool};
    use shared::error::ErrorCode;
    use shared::models::{AttendanceStatus, EmployeeStatus};
    use std::sync::Mutex;

    /// Replies with a fixed text and records what it was asked
    struct EchoGateway {
        reply: Option<String>,
        seen: Mutex<Vec<InsightRequest>>,
    }

    impl EchoGateway {
        fn new(reply: Option<&str>) -> Arc<Self> {
            Arc::new(Self {
                reply: reply.map(String::from),
                seen: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl InsightGateway for EchoGateway {
        async fn generate(&self, request: &InsightRequest) -> Option<String> {
            self.seen.lock().unwrap().push(request.clone());
            self.reply.clone()
        }
    }

    async fn mark(pool: &SqlitePool, employee_id: i64, date: &str, status: AttendanceStatus) {
        let mut conn = pool.acquire().await.unwrap();
        let date = NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap();
        attendance::upsert(&mut conn, employee_id, date, status, None).await.unwrap();
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 20).unwrap()
    }

    #[tokio::test]
    async fn test_fallback_when_gateway_is_silent() {
        let pool = test_pool().await;
        let emp = seed_employee(&pool, "Jane Doe", "jane@example.com", "Engineering", "5000.00", EmployeeStatus::Active).await;
        let service = InsightService::new(pool, Arc::new(DisabledGateway), 500);

        assert_eq!(
            service.salary_recommendation(emp.id, today()).await.unwrap(),
            "Unable to generate recommendation at this time."
        );
        assert_eq!(
            service.performance_insight(emp.id, today()).await.unwrap(),
            "Unable to generate insight at this time."
        );
        assert_eq!(
            service.attendance_analysis(emp.id, today()).await.unwrap(),
            "Unable to generate analysis at this time."
        );
        assert_eq!(
            service.department_insight("Engineering", today()).await.unwrap(),
            "Unable to generate insight at this time."
        );
    }

    #[tokio::test]
    async fn test_blank_reply_uses_fallback() {
        let pool = test_pool().await;
        let emp = seed_employee(&pool, "Jane Doe", "jane@example.com", "Engineering", "5000.00", EmployeeStatus::Active).await;
        let service = InsightService::new(pool, EchoGateway::new(Some("   ")), 500);
        assert_eq!(
            service.attendance_analysis(emp.id, today()).await.unwrap(),
            "Unable to generate analysis at this time."
        );
    }

    #[tokio::test]
    async fn test_attendance_facts_and_truncation() {
        let pool = test_pool().await;
        let emp = seed_employee(&pool, "Jane Doe", "jane@example.com", "Engineering", "5000.00", EmployeeStatus::Active).await;
        mark(&pool, emp.id, "2024-03-18", AttendanceStatus::Present).await;
        mark(&pool, emp.id, "2024-03-19", AttendanceStatus::Present).await;
        mark(&pool, emp.id, "2024-03-20", AttendanceStatus::SickLeave).await;
        mark(&pool, emp.id, "2024-03-17", AttendanceStatus::Absent).await;
        mark(&pool, emp.id, "2023-12-01", AttendanceStatus::Absent).await;

        let gateway = EchoGateway::new(Some("é".repeat(600).as_str()));
        let service = InsightService::new(pool, gateway.clone(), 500);

        let text = service.attendance_analysis(emp.id, today()).await.unwrap();
        assert_eq!(text.chars().count(), 500);

        let seen = gateway.seen.lock().unwrap();
        assert_eq!(
            seen[0],
            InsightRequest::AttendanceAnalysis {
                name: "Jane Doe".into(),
                present_days: 2,
                absent_days: 2,
                total_days: 4,
                rate: 50.0,
            }
        );
    }

    #[tokio::test]
    async fn test_tenure_facts() {
        let pool = test_pool().await;
        // seeded employees joined on 2020-01-15
        let emp = seed_employee(&pool, "Jane Doe", "jane@example.com", "Engineering", "5000.00", EmployeeStatus::Active).await;
        let gateway = EchoGateway::new(Some("ok"));
        let service = InsightService::new(pool, gateway.clone(), 500);

        assert_eq!(service.salary_recommendation(emp.id, today()).await.unwrap(), "ok");
        assert_eq!(service.performance_insight(emp.id, today()).await.unwrap(), "ok");

        let days = (today() - emp.joining_date).num_days();
        let seen = gateway.seen.lock().unwrap();
        match &seen[0] {
            InsightRequest::SalaryRecommendation { years_of_service, salary, .. } => {
                assert!((years_of_service - days as f64 / 365.25).abs() < 1e-9);
                assert_eq!(salary.to_string(), "5000.00");
            }
            other => panic!("unexpected request: {other:?}"),
        }
        match &seen[1] {
            InsightRequest::PerformanceInsight { months_employed, attendance_score, .. } => {
                assert_eq!(*months_employed, days / 30);
                assert_eq!(*attendance_score, 0.0);
            }
            other => panic!("unexpected request: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_department_insight() {
        let pool = test_pool().await;
        let a = seed_employee(&pool, "Alice", "alice@example.com", "Ops", "1000.00", EmployeeStatus::Active).await;
        seed_employee(&pool, "Bob", "bob@example.com", "Ops", "2000.02", EmployeeStatus::Inactive).await;
        mark(&pool, a.id, "2024-03-19", AttendanceStatus::Present).await;
        mark(&pool, a.id, "2024-03-20", AttendanceStatus::Late).await;

        let gateway = EchoGateway::new(Some("Ops is fine"));
        let service = InsightService::new(pool, gateway.clone(), 500);

        assert_eq!(
            service.department_insight("Nowhere", today()).await.unwrap(),
            NO_EMPLOYEES_IN_DEPARTMENT
        );
        assert!(gateway.seen.lock().unwrap().is_empty());

        assert_eq!(service.department_insight("Ops", today()).await.unwrap(), "Ops is fine");
        let seen = gateway.seen.lock().unwrap();
        assert_eq!(
            seen[0],
            InsightRequest::DepartmentInsight {
                department: "Ops".into(),
                total_employees: 2,
                avg_salary: Decimal::new(150001, 2),
                avg_attendance: 50.0,
            }
        );
    }

    #[tokio::test]
    async fn test_unknown_employee() {
        let service = InsightService::new(test_pool().await, Arc::new(DisabledGateway), 500);
        let err = service.performance_insight(77, today()).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::EmployeeNotFound);
    }

    #[test]
    fn test_truncate_chars() {
        assert_eq!(truncate_chars("abc", 5), "abc");
        assert_eq!(truncate_chars("abcdef", 3), "abc");
        assert_eq!(truncate_chars("ééé", 2), "éé");
    }
}
