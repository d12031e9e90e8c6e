use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use tracing::error;

use todolist_errors::TodolistError;

use crate::response::ErrorResponse;
use crate::validation::Violation;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("request validation failed")]
    Validation(Vec<Violation>),

    #[error(transparent)]
    Domain(#[from] TodolistError),
}

pub type ApiResult<T> = Result<T, ApiError>;

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::Validation(violations) => {
                let details = serde_json::to_value(&violations).ok();
                (
                    StatusCode::BAD_REQUEST,
                    ErrorResponse::new("VALIDATION_ERROR", "Request validation failed", details),
                )
            }
            ApiError::Domain(err) if err.is_business_rule() => {
                // The routine's message is written for the client.
                let message = err
                    .business_rule_message()
                    .unwrap_or("Business rule violation")
                    .to_string();
                (StatusCode::BAD_REQUEST, ErrorResponse::new("ERROR", message, None))
            }
            ApiError::Domain(err) => {
                // Logged server-side only; the client gets a generic envelope.
                error!(error = %err, "request failed with internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse::new("INTERNAL_SERVER_ERROR", "An unexpected error occurred", None),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}
