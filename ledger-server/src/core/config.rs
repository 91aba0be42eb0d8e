//! Server configuration
//!
//! All settings come from environment variables with documented defaults:
//!
//! | Variable | Default | Meaning |
//! |----------|---------|---------|
//! | HTTP_PORT | 3000 | HTTP API port |
//! | DATABASE_URL | sqlite:ledger.db | SQLite database |
//! | STORE_ID | loja-1 | Store identifier on registers and reports |
//! | TIMEZONE | America/Fortaleza | Business timezone |
//! | BUSINESS_DAY_CUTOFF | 02:00 | Business day boundary (HH:MM) |
//! | CASHBACK_ACCRUAL_PERCENT | 5.0 | Cashback earned per paid real |
//! | BLOCK_UNKNOWN_NEIGHBORHOOD | false | Reject checkout for unknown neighborhoods |
//! | DEFAULT_DELIVERY_ETA_MINUTES | 50 | ETA quoted when the neighborhood is unknown |
//! | LOG_LEVEL | info | Tracing level |
//! | LOG_DIR | (unset) | Daily-rolling log file directory |

use chrono::NaiveTime;
use chrono_tz::Tz;

use crate::utils::time::parse_cutoff;

#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP API port
    pub http_port: u16,
    /// SQLite connection string
    pub database_url: String,
    /// Store identifier stamped on registers and reports
    pub store_id: String,
    /// Business timezone for day boundaries
    pub timezone: Tz,
    /// Business day cutoff: sales before this hour belong to the previous day
    pub business_day_cutoff: NaiveTime,
    /// Cashback accrued per paid total, in percent (5.0 = 5%)
    pub cashback_accrual_percent: f64,
    /// When true, an unknown neighborhood blocks checkout instead of
    /// falling back to a zero delivery fee
    pub block_unknown_neighborhood: bool,
    /// ETA quoted when the neighborhood is not in the reference set
    pub default_delivery_eta_minutes: i32,
    /// Tracing level
    pub log_level: String,
    /// Optional directory for daily-rolling log files
    pub log_dir: Option<String>,
}

impl Config {
    /// Load configuration from environment variables, with defaults for
    /// anything unset.
    pub fn from_env() -> Self {
        let timezone = std::env::var("TIMEZONE")
            .ok()
            .and_then(|tz| tz.parse().ok())
            .unwrap_or(chrono_tz::America::Fortaleza);

        let cutoff_str =
            std::env::var("BUSINESS_DAY_CUTOFF").unwrap_or_else(|_| "02:00".to_string());

        Self {
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            database_url: std::env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite:ledger.db".to_string()),
            store_id: std::env::var("STORE_ID").unwrap_or_else(|_| "loja-1".to_string()),
            timezone,
            business_day_cutoff: parse_cutoff(&cutoff_str),
            cashback_accrual_percent: std::env::var("CASHBACK_ACCRUAL_PERCENT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(crate::cashback::DEFAULT_ACCRUAL_PERCENT),
            block_unknown_neighborhood: std::env::var("BLOCK_UNKNOWN_NEIGHBORHOOD")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
            default_delivery_eta_minutes: std::env::var("DEFAULT_DELIVERY_ETA_MINUTES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(50),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            log_dir: std::env::var("LOG_DIR").ok(),
        }
    }

    /// Configuration for tests: in-memory database, defaults elsewhere.
    pub fn for_tests() -> Self {
        let mut config = Self::from_env();
        config.database_url = "sqlite::memory:".to_string();
        config
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
