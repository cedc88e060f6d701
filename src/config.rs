use anyhow::Result;
use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub environment: String,
    /// Max cached earnings breakdowns before insertion-order eviction.
    pub cache_capacity: usize,
    /// How often the cache sweeps out expired entries.
    pub cache_sweep_seconds: u64,
    /// How often the monthly-close trigger fires. The close itself is
    /// idempotent, so a coarse interval is enough.
    pub payroll_close_interval_seconds: u64,
    /// How often yesterday's attendance rows are materialized.
    pub attendance_rollup_interval_seconds: u64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        // Load .env file if it exists
        dotenvy::dotenv().ok();

        Ok(Config {
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "postgres://@localhost:5432/workpulse".to_string()),
            environment: env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
            cache_capacity: env::var("EARNINGS_CACHE_CAPACITY")
                .unwrap_or_else(|_| "1024".to_string())
                .parse()
                .unwrap_or(1024),
            cache_sweep_seconds: env::var("EARNINGS_CACHE_SWEEP_SECONDS")
                .unwrap_or_else(|_| "60".to_string())
                .parse()
                .unwrap_or(60),
            payroll_close_interval_seconds: env::var("PAYROLL_CLOSE_INTERVAL_SECONDS")
                .unwrap_or_else(|_| "21600".to_string())
                .parse()
                .unwrap_or(21600),
            attendance_rollup_interval_seconds: env::var("ATTENDANCE_ROLLUP_INTERVAL_SECONDS")
                .unwrap_or_else(|_| "86400".to_string())
                .parse()
                .unwrap_or(86400),
        })
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}
