//! Admin Repository

use super::{RepoError, RepoResult};
use shared::models::Admin;
use sqlx::SqlitePool;

const ADMIN_SELECT: &str = "SELECT id, username, email, full_name, role, is_active, last_login, created_at FROM admin";

/// Admin row together with its stored password hash
#[derive(Debug, sqlx::FromRow)]
pub struct AdminCredentials {
    #[sqlx(flatten)]
    pub admin: Admin,
    pub password_hash: String,
}

/// Insert data; `password_hash` is an argon2 PHC string
#[derive(Debug, Clone)]
pub struct NewAdmin {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub full_name: Option<String>,
    pub role: String,
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Admin>> {
    let sql = format!("{ADMIN_SELECT} WHERE id = ?");
    let row = sqlx::query_as::<_, Admin>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn find_credentials_by_email(
    pool: &SqlitePool,
    email: &str,
) -> RepoResult<Option<AdminCredentials>> {
    let row = sqlx::query_as::<_, AdminCredentials>(
        "SELECT id, username, email, full_name, role, is_active, last_login, created_at, password_hash FROM admin WHERE email = ? COLLATE NOCASE",
    )
    .bind(email)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

pub async fn count(pool: &SqlitePool) -> RepoResult<i64> {
    let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM admin")
        .fetch_one(pool)
        .await?;
    Ok(total)
}

pub async fn create(pool: &SqlitePool, data: &NewAdmin) -> RepoResult<Admin> {
    let now = shared::util::now_millis();
    let id: i64 = sqlx::query_scalar(
        "INSERT INTO admin (username, email, password_hash, full_name, role, is_active, created_at) VALUES (?1, ?2, ?3, ?4, ?5, 1, ?6) RETURNING id",
    )
    .bind(&data.username)
    .bind(&data.email)
    .bind(&data.password_hash)
    .bind(&data.full_name)
    .bind(&data.role)
    .bind(now)
    .fetch_one(pool)
    .await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create admin".into()))
}

pub async fn touch_last_login(pool: &SqlitePool, id: i64, at: i64) -> RepoResult<()> {
    let rows = sqlx::query("UPDATE admin SET last_login = ? WHERE id = ?")
        .bind(at)
        .bind(id)
        .execute(pool)
        .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Admin {id} not found")));
    }
    Ok(())
}

pub async fn set_active(pool: &SqlitePool, id: i64, is_active: bool) -> RepoResult<Admin> {
    let rows = sqlx::query("UPDATE admin SET is_active = ? WHERE id = ?")
        .bind(is_active)
        .bind(id)
        .execute(pool)
        .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Admin {id} not found")));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Admin {id} not found")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::test_support::test_pool;

    fn new_admin(username: &str, email: &str) -> NewAdmin {
        NewAdmin {
            username: username.into(),
            email: email.into(),
            password_hash: "$argon2id$v=19$m=19456,t=2,p=1$c2FsdA$aGFzaA".into(),
            full_name: Some("Root Admin".into()),
            role: "admin".into(),
        }
    }

    #[tokio::test]
    async fn test_create_and_lookup() {
        let pool = test_pool().await;
        let admin = create(&pool, &new_admin("root", "root@example.com")).await.unwrap();
        assert!(admin.is_active);
        assert_eq!(admin.role, "admin");
        assert_eq!(admin.last_login, None);

        let creds = find_credentials_by_email(&pool, "ROOT@example.com")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(creds.admin, admin);
        assert!(creds.password_hash.starts_with("$argon2id$"));
        assert_eq!(count(&pool).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_duplicate_username_or_email() {
        let pool = test_pool().await;
        create(&pool, &new_admin("root", "root@example.com")).await.unwrap();

        let err = create(&pool, &new_admin("root", "other@example.com")).await.unwrap_err();
        assert!(matches!(err, RepoError::Duplicate(_)));

        let err = create(&pool, &new_admin("other", "root@example.com")).await.unwrap_err();
        assert!(matches!(err, RepoError::Duplicate(_)));
    }

    #[tokio::test]
    async fn test_last_login_and_active_flag() {
        let pool = test_pool().await;
        let admin = create(&pool, &new_admin("root", "root@example.com")).await.unwrap();

        touch_last_login(&pool, admin.id, 42).await.unwrap();
        assert_eq!(find_by_id(&pool, admin.id).await.unwrap().unwrap().last_login, Some(42));

        let disabled = set_active(&pool, admin.id, false).await.unwrap();
        assert!(!disabled.is_active);

        assert!(matches!(
            touch_last_login(&pool, 999, 1).await,
            Err(RepoError::NotFound(_))
        ));
    }
}
