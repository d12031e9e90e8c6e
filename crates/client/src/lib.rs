//! REST client for the task-creation endpoint, plus the form flow that feeds
//! it. The form mirrors the server's field constraints so most mistakes are
//! caught before a request goes out.

pub mod form;

use serde::Deserialize;
use tracing::warn;

use todolist_domain::entities::Task;

pub use form::{CreateTaskDto, FieldError, TaskForm};

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("form validation failed")]
    Form(Vec<FieldError>),
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("server rejected the request: {message}")]
    Api { code: String, message: String },
    #[error("unexpected response shape: {0}")]
    Envelope(String),
}

/// Either side of the response envelope. The server never sets both.
#[derive(Debug, Deserialize)]
struct Envelope {
    success: bool,
    data: Option<Task>,
    error: Option<EnvelopeError>,
}

#[derive(Debug, Deserialize)]
struct EnvelopeError {
    code: String,
    message: String,
}

pub struct TaskApiClient {
    base_url: String,
    http: reqwest::Client,
}

impl TaskApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            http: reqwest::Client::new(),
        }
    }

    /// Validates the form, composes the request body, and creates the task.
    /// API rejections are logged here and returned for the caller to decide
    /// what the user sees.
    pub async fn submit(&self, form: &TaskForm) -> Result<Task, ClientError> {
        let dto = form.to_dto().map_err(ClientError::Form)?;
        self.create_task(&dto).await
    }

    pub async fn create_task(&self, dto: &CreateTaskDto) -> Result<Task, ClientError> {
        let response = self
            .http
            .post(format!("{}/internal/task", self.base_url))
            .json(dto)
            .send()
            .await?;

        let envelope: Envelope = response.json().await?;
        if envelope.success {
            envelope
                .data
                .ok_or_else(|| ClientError::Envelope("success response without data".to_string()))
        } else {
            let (code, message) = envelope
                .error
                .map(|e| (e.code, e.message))
                .unwrap_or_else(|| ("ERROR".to_string(), "unknown error".to_string()));
            warn!(code = %code, message = %message, "task creation rejected");
            Err(ClientError::Api { code, message })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_parses_success() {
        let json = serde_json::json!({
            "success": true,
            "data": {
                "idTask": 42, "idAccount": 1, "idUserCreator": 1, "idCategory": null,
                "title": "Buy milk", "description": "2%", "dueDate": null,
                "priority": 1, "status": 0, "recurrence": 0, "recurrenceConfigJson": null,
                "dateCreated": "2026-08-27T10:00:00Z", "dateModified": "2026-08-27T10:00:00Z",
                "deleted": false
            },
            "metadata": { "timestamp": "2026-08-27T10:00:00Z" }
        });
        let envelope: Envelope = serde_json::from_value(json).unwrap();
        assert!(envelope.success);
        assert_eq!(envelope.data.unwrap().title, "Buy milk");
    }

    #[test]
    fn test_envelope_parses_error() {
        let json = serde_json::json!({
            "success": false,
            "error": { "code": "ERROR", "message": "Category not found" },
            "timestamp": "2026-08-27T10:00:00Z"
        });
        let envelope: Envelope = serde_json::from_value(json).unwrap();
        assert!(!envelope.success);
        assert!(envelope.data.is_none());
        assert_eq!(envelope.error.unwrap().message, "Category not found");
    }
}
