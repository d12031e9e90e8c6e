use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, instrument};

use todolist_domain::entities::Task;
use todolist_domain::repositories::{TaskCreatePayload, TaskRepository};
use todolist_errors::{TodolistError, TodolistResult};

use super::pool::Database;
use super::routine::RoutineCall;
use super::timeout::with_statement_timeout;

/// Stored-procedure-backed task repository. No SQL of its own: every write
/// goes through a named routine, and retry or transaction discipline is the
/// routine's business.
pub struct PostgresTaskRepository {
    db: Arc<Database>,
}

impl PostgresTaskRepository {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl TaskRepository for PostgresTaskRepository {
    #[instrument(skip(self, payload), fields(
        id_account = payload.id_account,
        id_user = payload.id_user,
    ))]
    async fn create(&self, payload: &TaskCreatePayload) -> TodolistResult<Task> {
        let pool = self.db.pool().await?;

        let call = RoutineCall::new("functional.sp_task_create")
            .param("id_account", payload.id_account)
            .param("id_user", payload.id_user)
            .param("title", payload.title.as_str())
            .param("description", payload.description.as_str())
            .param("due_date", payload.due_date)
            .param("priority", i32::from(payload.priority))
            .param("id_category", payload.id_category)
            .param("recurrence", i32::from(payload.recurrence))
            .param(
                "recurrence_config_json",
                payload.recurrence_config_json.clone(),
            );

        let task = with_statement_timeout(
            self.db.statement_timeout(),
            call.fetch_single::<Task, _>(pool),
        )
        .await?
        .ok_or_else(|| TodolistError::database_error("sp_task_create returned no row"))?;

        debug!(id_task = task.id_task, "task created");
        Ok(task)
    }
}
