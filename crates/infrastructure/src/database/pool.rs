use std::time::Duration;

use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Postgres, Transaction};
use tokio::sync::OnceCell;
use tracing::info;

use todolist_config::DatabaseConfig;
use todolist_errors::TodolistResult;

/// Process-wide connection pool handle. Owned by the composition root and
/// passed down by reference; the pool itself is created on first use.
/// `OnceCell` makes the first-call race single-flight: concurrent callers
/// share one connection attempt instead of each opening a pool.
pub struct Database {
    config: DatabaseConfig,
    pool: OnceCell<PgPool>,
}

impl Database {
    pub fn new(config: DatabaseConfig) -> Self {
        Self {
            config,
            pool: OnceCell::new(),
        }
    }

    pub async fn pool(&self) -> TodolistResult<&PgPool> {
        let pool = self
            .pool
            .get_or_try_init(|| async {
                info!(
                    max_connections = self.config.max_connections,
                    "initializing database connection pool"
                );
                PgPoolOptions::new()
                    .max_connections(self.config.max_connections)
                    .min_connections(self.config.min_connections)
                    .acquire_timeout(Duration::from_secs(self.config.connection_timeout_seconds))
                    .idle_timeout(Duration::from_secs(self.config.idle_timeout_seconds))
                    .connect(&self.config.url)
                    .await
            })
            .await?;
        Ok(pool)
    }

    /// Upper bound applied to each routine invocation.
    pub fn statement_timeout(&self) -> Duration {
        Duration::from_secs(self.config.statement_timeout_seconds)
    }

    /// Opens a transaction on the shared pool. Routine calls that need
    /// atomicity across invocations run against the returned handle instead
    /// of the pool.
    pub async fn begin(&self) -> TodolistResult<Transaction<'static, Postgres>> {
        let tx = self.pool().await?.begin().await?;
        Ok(tx)
    }
}

pub async fn commit_transaction(tx: Transaction<'static, Postgres>) -> TodolistResult<()> {
    tx.commit().await?;
    Ok(())
}

pub async fn rollback_transaction(tx: Transaction<'static, Postgres>) -> TodolistResult<()> {
    tx.rollback().await?;
    Ok(())
}
