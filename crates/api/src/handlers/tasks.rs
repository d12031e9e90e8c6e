use std::collections::HashMap;

use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use serde_json::Value;
use tracing::instrument;

use todolist_domain::repositories::TaskCreatePayload;

use crate::auth::Credential;
use crate::error::{ApiError, ApiResult};
use crate::extract::merge_request_params;
use crate::response::created;
use crate::routes::AppState;
use crate::validation::validate_create_task;

/// `POST /internal/task` — normalize, validate, create, envelope.
///
/// Validation failures never reach the repository; repository failures are
/// classified once by [`ApiError`]'s response mapping.
#[instrument(skip_all, fields(id_account = credential.id_account))]
pub async fn create_task(
    State(state): State<AppState>,
    Extension(credential): Extension<Credential>,
    Path(path_params): Path<HashMap<String, String>>,
    Query(query_params): Query<HashMap<String, String>>,
    Json(body): Json<Value>,
) -> ApiResult<impl axum::response::IntoResponse> {
    let params = merge_request_params(&path_params, &query_params, &body);
    let request = validate_create_task(&params).map_err(ApiError::Validation)?;

    let payload = TaskCreatePayload {
        id_account: credential.id_account,
        id_user: credential.id_user,
        title: request.title,
        description: request.description,
        due_date: request.due_date,
        priority: request.priority,
        id_category: request.id_category,
        recurrence: request.recurrence,
        recurrence_config_json: request.recurrence_config_json,
    };

    let task = state.task_repo.create(&payload).await?;
    Ok(created(task))
}
