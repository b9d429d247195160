use std::sync::Arc;

use crate::core::Config;
use crate::db::DbService;
use crate::services::{
    AdminService, AttendanceService, DisabledGateway, EmployeeService, InsightGateway,
    InsightService, PayrollService,
};
use shared::error::AppError;

/// Application state: configuration, database and the services built on it
///
/// Cheap to clone; every service shares the same connection pool.
///
/// | Field | Type | Notes |
/// |-------|------|-------|
/// | config | Config | Immutable |
/// | db | DbService | SQLite pool |
/// | gateway | Arc<dyn InsightGateway> | Injected text generator |
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub db: DbService,
    gateway: Arc<dyn InsightGateway>,
}

impl AppState {
    /// Open the configured database with the insight gateway disabled
    pub async fn initialize(config: &Config) -> Result<Self, AppError> {
        Self::with_gateway(config, Arc::new(DisabledGateway)).await
    }

    /// Open the configured database with an explicit insight gateway
    pub async fn with_gateway(
        config: &Config,
        gateway: Arc<dyn InsightGateway>,
    ) -> Result<Self, AppError> {
        if let Some(parent) = config.database_path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(|e| {
                AppError::internal(format!(
                    "Failed to create data directory {}: {e}",
                    parent.display()
                ))
            })?;
        }
        let db = DbService::new(config.database_path_str()?, config.db_max_connections).await?;
        Ok(Self::from_parts(config.clone(), db, gateway))
    }

    /// Assemble state from an already opened database
    pub fn from_parts(config: Config, db: DbService, gateway: Arc<dyn InsightGateway>) -> Self {
        Self {
            config,
            db,
            gateway,
        }
    }

    pub fn employees(&self) -> EmployeeService {
        EmployeeService::new(self.db.pool.clone())
    }

    pub fn attendance(&self) -> AttendanceService {
        AttendanceService::new(self.db.pool.clone())
    }

    pub fn payroll(&self) -> PayrollService {
        PayrollService::new(self.db.pool.clone(), self.config.payroll)
    }

    pub fn admins(&self) -> AdminService {
        AdminService::new(self.db.pool.clone())
    }

    pub fn insights(&self) -> InsightService {
        InsightService::new(
            self.db.pool.clone(),
            self.gateway.clone(),
            self.config.insight_max_chars,
        )
    }
}
