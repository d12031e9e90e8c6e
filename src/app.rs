use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::signal;
use tracing::info;

use todolist_api::auth::Credential;
use todolist_api::routes::{create_routes, AppState};
use todolist_config::AppConfig;
use todolist_infrastructure::{Database, PostgresTaskRepository};

/// Composition root. Owns the configuration and wires the pool handle,
/// repository, and router together; nothing below this holds global state.
pub struct Application {
    config: AppConfig,
}

impl Application {
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    pub async fn run(self) -> Result<()> {
        let database = Arc::new(Database::new(self.config.database.clone()));
        let task_repo = Arc::new(PostgresTaskRepository::new(database));

        let state = AppState {
            task_repo,
            credential: Credential {
                id_account: self.config.auth.id_account,
                id_user: self.config.auth.id_user,
            },
        };
        let router = create_routes(state, &self.config.api);

        let listener = tokio::net::TcpListener::bind(&self.config.api.bind_address)
            .await
            .with_context(|| format!("failed to bind {}", self.config.api.bind_address))?;
        info!(address = %self.config.api.bind_address, "task service listening");

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .context("server error")?;

        info!("task service stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("received Ctrl+C");
        },
        _ = terminate => {
            info!("received SIGTERM");
        },
    }
}
