//! Admin Model

use serde::{Deserialize, Serialize};

/// Administrator account (password hash never leaves the store)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Admin {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub full_name: Option<String>,
    pub role: String,
    pub is_active: bool,
    pub last_login: Option<i64>,
    pub created_at: i64,
}

/// Create admin payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminCreate {
    pub username: String,
    pub email: String,
    pub password: String,
    pub full_name: Option<String>,
    /// Defaults to `admin`
    pub role: Option<String>,
}
