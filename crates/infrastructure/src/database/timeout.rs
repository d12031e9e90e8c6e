use std::future::Future;
use std::time::Duration;

use tokio::time::timeout;
use tracing::error;

use todolist_errors::{TodolistError, TodolistResult};

/// Bounds a database call with an explicit deadline. The driver has its own
/// acquire timeout; this covers the statement itself.
pub async fn with_statement_timeout<T, F>(limit: Duration, operation: F) -> TodolistResult<T>
where
    F: Future<Output = TodolistResult<T>>,
{
    match timeout(limit, operation).await {
        Ok(result) => result,
        Err(_) => {
            error!(limit_seconds = limit.as_secs(), "database call exceeded deadline");
            Err(TodolistError::timeout(format!(
                "database call exceeded {}s",
                limit.as_secs()
            )))
        }
    }
}
