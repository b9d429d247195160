use std::path::{Path, PathBuf};

use shared::error::{AppError, ErrorCode};

/// Service configuration
///
/// # Environment variables
///
/// | Variable | Default | Notes |
/// |----------|---------|-------|
/// | WORK_DIR | ./data | Database and log root |
/// | DATABASE_PATH | $WORK_DIR/hr.db | SQLite file |
/// | ENVIRONMENT | development | development / staging / production |
/// | LOG_LEVEL | info | Overridden by RUST_LOG |
/// | LOG_DIR | (console) | Daily rolling files when set |
/// | LOG_JSON | false | JSON log lines |
/// | DB_MAX_CONNECTIONS | 5 | Pool size |
/// | PAYROLL_STRICT_TRANSITIONS | false | Enforce the payment transition table |
/// | ADMIN_EMAIL | admin@example.com | Bootstrap admin |
/// | ADMIN_USERNAME | admin | Bootstrap admin |
/// | ADMIN_PASSWORD | (required outside development) | Bootstrap admin |
/// | INSIGHT_MAX_CHARS | 500 | Cap on gateway text |
#[derive(Debug, Clone)]
pub struct Config {
    pub work_dir: PathBuf,
    pub database_path: PathBuf,
    /// development | staging | production
    pub environment: String,
    pub log_level: String,
    pub log_dir: Option<PathBuf>,
    pub log_json: bool,
    pub db_max_connections: u32,
    pub payroll: PayrollConfig,
    pub admin: AdminSeed,
    pub insight_max_chars: usize,
}

/// Payroll engine switches
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PayrollConfig {
    /// Reject payment status changes outside the transition table
    pub strict_transitions: bool,
}

/// Bootstrap admin created when the admin table is empty
#[derive(Clone)]
pub struct AdminSeed {
    pub email: String,
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for AdminSeed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminSeed")
            .field("email", &self.email)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

pub const DEFAULT_INSIGHT_MAX_CHARS: usize = 500;

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration from an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment = lookup("ENVIRONMENT").unwrap_or_else(|| "development".into());
        let work_dir = PathBuf::from(lookup("WORK_DIR").unwrap_or_else(|| "./data".into()));
        let database_path = lookup("DATABASE_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| work_dir.join("hr.db"));

        Ok(Self {
            database_path,
            log_level: lookup("LOG_LEVEL").unwrap_or_else(|| "info".into()),
            log_dir: lookup("LOG_DIR").filter(|d| !d.is_empty()).map(PathBuf::from),
            log_json: lookup("LOG_JSON")
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
            db_max_connections: lookup("DB_MAX_CONNECTIONS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(5),
            payroll: PayrollConfig {
                strict_transitions: lookup("PAYROLL_STRICT_TRANSITIONS")
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(false),
            },
            admin: AdminSeed {
                email: lookup("ADMIN_EMAIL").unwrap_or_else(|| "admin@example.com".into()),
                username: lookup("ADMIN_USERNAME").unwrap_or_else(|| "admin".into()),
                password: Self::require_secret(&lookup, "ADMIN_PASSWORD", &environment)?,
            },
            insight_max_chars: lookup("INSIGHT_MAX_CHARS")
                .and_then(|v| v.parse().ok())
                .filter(|n| *n > 0)
                .unwrap_or(DEFAULT_INSIGHT_MAX_CHARS),
            work_dir,
            environment,
        })
    }

    /// Require a secret: must be set and non-empty outside development.
    fn require_secret<F>(lookup: &F, name: &str, environment: &str) -> Result<String, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let val = match lookup(name) {
            Some(v) => v,
            None => {
                if environment != "development" {
                    return Err(AppError::with_message(
                        ErrorCode::ConfigError,
                        format!("{name} must be set in {environment} environment"),
                    ));
                }
                format!("dev-{name}-not-for-production")
            }
        };
        if val.is_empty() && environment != "development" {
            return Err(AppError::with_message(
                ErrorCode::ConfigError,
                format!("{name} must not be empty in {environment} environment"),
            ));
        }
        Ok(val)
    }

    pub fn database_path_str(&self) -> Result<&str, AppError> {
        path_str(&self.database_path)
    }

    /// Whether this is a production environment
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// Whether this is a development environment
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}

fn path_str(path: &Path) -> Result<&str, AppError> {
    path.to_str().ok_or_else(|| {
        AppError::with_message(
            ErrorCode::ConfigError,
            format!("Path is not valid UTF-8: {}", path.display()),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<Config, AppError> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|name| map.get(name).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[]).unwrap();
        assert!(config.is_development());
        assert_eq!(config.database_path, PathBuf::from("./data").join("hr.db"));
        assert_eq!(config.db_max_connections, 5);
        assert!(!config.payroll.strict_transitions);
        assert_eq!(config.insight_max_chars, DEFAULT_INSIGHT_MAX_CHARS);
        assert_eq!(config.admin.password, "dev-ADMIN_PASSWORD-not-for-production");
        assert!(config.log_dir.is_none());
    }

    #[test]
    fn test_overrides() {
        let config = load(&[
            ("WORK_DIR", "/srv/hr"),
            ("PAYROLL_STRICT_TRANSITIONS", "true"),
            ("DB_MAX_CONNECTIONS", "9"),
            ("INSIGHT_MAX_CHARS", "120"),
            ("LOG_DIR", "/var/log/hr"),
        ])
        .unwrap();
        assert_eq!(config.database_path, PathBuf::from("/srv/hr/hr.db"));
        assert!(config.payroll.strict_transitions);
        assert_eq!(config.db_max_connections, 9);
        assert_eq!(config.insight_max_chars, 120);
        assert_eq!(config.log_dir, Some(PathBuf::from("/var/log/hr")));
    }

    #[test]
    fn test_production_requires_admin_password() {
        let err = load(&[("ENVIRONMENT", "production")]).unwrap_err();
        assert_eq!(err.code, ErrorCode::ConfigError);

        let err = load(&[("ENVIRONMENT", "production"), ("ADMIN_PASSWORD", "")]).unwrap_err();
        assert_eq!(err.code, ErrorCode::ConfigError);

        let config = load(&[("ENVIRONMENT", "production"), ("ADMIN_PASSWORD", "s3cret-pass")]).unwrap();
        assert!(config.is_production());
        assert_eq!(config.admin.password, "s3cret-pass");
    }

    #[test]
    fn test_admin_seed_debug_redacts_password() {
        let config = load(&[("ADMIN_PASSWORD", "hunter2-hunter2")]).unwrap();
        let debug = format!("{:?}", config.admin);
        assert!(!debug.contains("hunter2"));
    }
}
