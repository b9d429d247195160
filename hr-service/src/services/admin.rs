//! Admin accounts and credential checks

use argon2::Argon2;
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::{Admin, AdminCreate};
use sqlx::SqlitePool;

use crate::core::config::AdminSeed;
use crate::db::repository::admin::NewAdmin;
use crate::db::repository::{RepoError, admin};
use crate::utils::validation::{
    MAX_NAME_LEN, MAX_PASSWORD_LEN, MAX_SHORT_TEXT_LEN, MIN_PASSWORD_LEN, normalize_optional,
    validate_email, validate_optional_text, validate_required_text,
};

const DEFAULT_ROLE: &str = "admin";

#[derive(Clone)]
pub struct AdminService {
    pool: SqlitePool,
}

impl AdminService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, data: AdminCreate) -> AppResult<Admin> {
        validate_required_text(&data.username, "username", MAX_SHORT_TEXT_LEN)?;
        validate_email(&data.email)?;
        validate_optional_text(&data.full_name, "full_name", MAX_NAME_LEN)?;
        validate_optional_text(&data.role, "role", MAX_SHORT_TEXT_LEN)?;
        validate_password(&data.password)?;

        let password_hash = hash_password(&data.password)
            .map_err(|e| AppError::internal(format!("Failed to hash password: {e}")))?;

        let new = NewAdmin {
            username: data.username.trim().to_string(),
            email: data.email.trim().to_lowercase(),
            password_hash,
            full_name: normalize_optional(data.full_name),
            role: normalize_optional(data.role).unwrap_or_else(|| DEFAULT_ROLE.to_string()),
        };
        let created = admin::create(&self.pool, &new).await.map_err(|e| match e {
            RepoError::Duplicate(_) => AppError::with_message(
                ErrorCode::AdminExists,
                format!("Admin username or email already in use: {}", new.username),
            )
            .with_detail("username", new.username.clone()),
            other => other.into(),
        })?;

        tracing::info!(admin_id = created.id, username = %created.username, "Admin created");
        Ok(created)
    }

    /// Verify credentials and stamp `last_login`
    ///
    /// Unknown email, wrong password and disabled account are indistinguishable
    /// to the caller.
    pub async fn authenticate(&self, email: &str, password: &str) -> AppResult<Admin> {
        let email = email.trim().to_lowercase();
        let Some(creds) = admin::find_credentials_by_email(&self.pool, &email).await? else {
            tracing::warn!(email = %email, "Login failed: unknown email");
            return Err(AppError::invalid_credentials());
        };

        let valid = match verify_password(password, &creds.password_hash) {
            Ok(valid) => valid,
            Err(e) => {
                tracing::error!(admin_id = creds.admin.id, error = %e, "Stored password hash is unreadable");
                false
            }
        };
        if !valid {
            tracing::warn!(admin_id = creds.admin.id, "Login failed: wrong password");
            return Err(AppError::invalid_credentials());
        }
        if !creds.admin.is_active {
            tracing::warn!(admin_id = creds.admin.id, "Login failed: account disabled");
            return Err(AppError::invalid_credentials());
        }

        let now = shared::util::now_millis();
        admin::touch_last_login(&self.pool, creds.admin.id, now).await?;

        tracing::info!(admin_id = creds.admin.id, "Admin logged in");
        Ok(Admin {
            last_login: Some(now),
            ..creds.admin
        })
    }

    /// Seed the bootstrap admin when the table is empty
    pub async fn ensure_default(&self, seed: &AdminSeed) -> AppResult<Option<Admin>> {
        if admin::count(&self.pool).await? > 0 {
            return Ok(None);
        }
        let created = self
            .create(AdminCreate {
                username: seed.username.clone(),
                email: seed.email.clone(),
                password: seed.password.clone(),
                full_name: Some("Administrator".into()),
                role: None,
            })
            .await?;
        tracing::info!(username = %created.username, "Default admin seeded");
        Ok(Some(created))
    }

    pub async fn find_by_id(&self, id: i64) -> AppResult<Admin> {
        admin::find_by_id(&self.pool, id)
            .await?
            .ok_or_else(|| admin_not_found(id))
    }

    /// Enable or disable an account
    pub async fn set_active(&self, id: i64, is_active: bool) -> AppResult<Admin> {
        let updated = admin::set_active(&self.pool, id, is_active)
            .await
            .map_err(|e| match e {
                RepoError::NotFound(_) => admin_not_found(id),
                other => other.into(),
            })?;
        tracing::info!(admin_id = id, is_active, "Admin active flag changed");
        Ok(updated)
    }
}

fn validate_password(password: &str) -> AppResult<()> {
    let len = password.chars().count();
    if !(MIN_PASSWORD_LEN..=MAX_PASSWORD_LEN).contains(&len) {
        return Err(AppError::validation(format!(
            "Password must be {MIN_PASSWORD_LEN} to {MAX_PASSWORD_LEN} characters"
        ))
        .with_detail("field", "password"));
    }
    Ok(())
}

fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default().hash_password(password.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

fn verify_password(password: &str, hash: &str) -> Result<bool, argon2::password_hash::Error> {
    let parsed = PasswordHash::new(hash)?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

fn admin_not_found(id: i64) -> AppError {
    AppError::with_message(ErrorCode::AdminNotFound, format!("Admin {id} not found"))
        .with_detail("admin_id", id)
}
