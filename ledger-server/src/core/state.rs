//! Shared server state

use std::sync::Arc;

use sqlx::SqlitePool;

use super::Config;
use crate::db;

/// State handed to every handler: the connection pool and configuration.
#[derive(Clone)]
pub struct ServerState {
    pub pool: SqlitePool,
    pub config: Arc<Config>,
}

impl ServerState {
    /// Open the database (running migrations) and build the state.
    pub async fn initialize(config: &Config) -> anyhow::Result<Self> {
        let pool = db::init_pool(&config.database_url).await?;
        Ok(Self {
            pool,
            config: Arc::new(config.clone()),
        })
    }

    /// State over an in-memory database, for tests.
    pub async fn for_tests(config: Config) -> anyhow::Result<Self> {
        let pool = db::init_memory_pool().await?;
        Ok(Self {
            pool,
            config: Arc::new(config),
        })
    }
}
