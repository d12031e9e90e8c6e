use std::sync::Arc;
use std::time::Duration;

use axum::{
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};

use todolist_config::ApiConfig;
use todolist_domain::repositories::TaskRepository;

use crate::auth::{credential_middleware, Credential};
use crate::handlers::{health::health_check, tasks::create_task};
use crate::middleware::{cors_layer, request_logging, timeout_layer, trace_layer};

#[derive(Clone)]
pub struct AppState {
    pub task_repo: Arc<dyn TaskRepository>,
    pub credential: Credential,
}

pub fn create_routes(state: AppState, config: &ApiConfig) -> Router {
    let mut router = Router::new()
        .route("/health", get(health_check))
        .route("/internal/task", post(create_task))
        .layer(from_fn_with_state(state.clone(), credential_middleware))
        .layer(axum::middleware::from_fn(request_logging))
        .layer(trace_layer())
        .layer(timeout_layer(Duration::from_secs(
            config.request_timeout_seconds,
        )));

    if config.cors_enabled {
        router = router.layer(cors_layer());
    }

    router.with_state(state)
}
