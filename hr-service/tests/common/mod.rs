#![allow(dead_code)]

use std::str::FromStr;
use std::sync::Arc;

use hr_service::{AppState, Config, DbService, DisabledGateway, InsightGateway};
use rust_decimal::Decimal;
use shared::models::{Employee, EmployeeCreate};

/// Development config with no environment variables set
pub fn test_config() -> Config {
    Config::from_lookup(|_| None).unwrap()
}

/// State over a private in-memory database
pub async fn memory_state() -> AppState {
    memory_state_with(test_config(), Arc::new(DisabledGateway)).await
}

pub async fn memory_state_with(config: Config, gateway: Arc<dyn InsightGateway>) -> AppState {
    let db = DbService::in_memory().await.unwrap();
    AppState::from_parts(config, db, gateway)
}

pub fn dec(value: &str) -> Decimal {
    Decimal::from_str(value).unwrap()
}

pub fn new_employee(name: &str, email: &str, department: &str, salary: &str) -> EmployeeCreate {
    EmployeeCreate {
        name: name.into(),
        email: email.into(),
        phone: None,
        department: department.into(),
        position: "Engineer".into(),
        salary: dec(salary),
        joining_date: Some("2022-01-10".into()),
        status: None,
    }
}

pub async fn hire(state: &AppState, name: &str, department: &str, salary: &str) -> Employee {
    let email = format!("{}@example.com", name.to_lowercase().replace(' ', "."));
    state
        .employees()
        .create(new_employee(name, &email, department, salary))
        .await
        .unwrap()
}
