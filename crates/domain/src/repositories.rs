use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::entities::{Task, TaskPriority, TaskRecurrence};
use todolist_errors::TodolistResult;

/// Everything the persistence routine needs to create a task. Account and
/// user identifiers come from the authenticated credential, never from
/// request parameters.
#[derive(Debug, Clone)]
pub struct TaskCreatePayload {
    pub id_account: i64,
    pub id_user: i64,
    pub title: String,
    pub description: String,
    pub due_date: Option<DateTime<Utc>>,
    pub priority: TaskPriority,
    pub id_category: Option<i64>,
    pub recurrence: TaskRecurrence,
    pub recurrence_config_json: Option<String>,
}

#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Creates a task and returns the persisted row, identifiers and
    /// timestamps included. Errors propagate unclassified; the handler
    /// boundary decides what the client sees.
    async fn create(&self, payload: &TaskCreatePayload) -> TodolistResult<Task>;
}
