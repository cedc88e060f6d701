use std::sync::Arc;

use anyhow::Result;

use workpulse_be::database::{PgPayrollStore, init_database};
use workpulse_be::{Config, PayrollEngine};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize logger
    env_logger::init();

    println!("🚀 Starting WorkPulse payroll engine...");

    let config = Config::from_env()?;
    println!(
        "📋 Configuration loaded (environment: {})",
        config.environment
    );

    let pool = init_database(&config.database_url).await?;
    println!("✅ Database initialized");

    let store = Arc::new(PgPayrollStore::new(pool));
    let engine = PayrollEngine::new(store, &config);
    let scheduler = engine.start_scheduler(&config);
    println!(
        "⏱  Scheduler running (payroll close every {}s, attendance rollup every {}s)",
        config.payroll_close_interval_seconds, config.attendance_rollup_interval_seconds
    );

    tokio::signal::ctrl_c().await?;
    log::info!("shutdown signal received");
    scheduler.stop();
    engine.shutdown();

    Ok(())
}
