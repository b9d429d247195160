use anyhow::Context;
use hr_service::{AppState, Config, setup_environment};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. .env and logging
    setup_environment();
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "HR service starting");

    // 2. Configuration
    let config = Config::from_env().context("invalid configuration")?;
    tracing::info!(
        environment = %config.environment,
        database = %config.database_path.display(),
        strict_transitions = config.payroll.strict_transitions,
        "Configuration loaded"
    );

    // 3. Database and migrations
    let state = AppState::initialize(&config)
        .await
        .context("failed to open database")?;

    // 4. Bootstrap admin
    if let Some(admin) = state
        .admins()
        .ensure_default(&config.admin)
        .await
        .context("failed to seed default admin")?
    {
        tracing::info!(admin_id = admin.id, email = %admin.email, "Bootstrap admin ready");
    }

    // 5. Status report
    let stats = state
        .employees()
        .dashboard_stats(shared::util::today())
        .await
        .context("failed to read dashboard stats")?;
    tracing::info!(
        total_employees = stats.total_employees,
        active_employees = stats.active_employees,
        departments = stats.departments,
        present_today = stats.present_today,
        "Store ready"
    );

    state.db.pool.close().await;
    Ok(())
}
