use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use todolist_api::auth::Credential;
use todolist_api::routes::{create_routes, AppState};
use todolist_config::ApiConfig;
use todolist_domain::entities::{Task, TaskStatus};
use todolist_domain::repositories::{TaskCreatePayload, TaskRepository};
use todolist_errors::{TodolistError, TodolistResult};

enum FakeOutcome {
    Created,
    BusinessRule,
    Infrastructure,
}

/// Echoes the payload back as a persisted row, or fails the way the
/// persistence layer would.
struct FakeTaskRepository {
    outcome: FakeOutcome,
    calls: AtomicUsize,
}

impl FakeTaskRepository {
    fn new(outcome: FakeOutcome) -> Arc<Self> {
        Arc::new(Self {
            outcome,
            calls: AtomicUsize::new(0),
        })
    }
}

#[async_trait]
impl TaskRepository for FakeTaskRepository {
    async fn create(&self, payload: &TaskCreatePayload) -> TodolistResult<Task> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.outcome {
            FakeOutcome::Created => Ok(Task {
                id_task: 42,
                id_account: payload.id_account,
                id_user_creator: payload.id_user,
                id_category: payload.id_category,
                title: payload.title.clone(),
                description: payload.description.clone(),
                due_date: payload.due_date,
                priority: payload.priority,
                status: TaskStatus::Pending,
                recurrence: payload.recurrence,
                recurrence_config_json: payload.recurrence_config_json.clone(),
                date_created: chrono::Utc::now(),
                date_modified: chrono::Utc::now(),
                deleted: false,
            }),
            FakeOutcome::BusinessRule => Err(TodolistError::BusinessRule {
                code: "51000".to_string(),
                message: "Category not found".to_string(),
            }),
            FakeOutcome::Infrastructure => {
                Err(TodolistError::database_error("connection refused"))
            }
        }
    }
}

fn test_app(repo: Arc<FakeTaskRepository>) -> Router {
    let state = AppState {
        task_repo: repo,
        credential: Credential {
            id_account: 1,
            id_user: 1,
        },
    };
    let config = ApiConfig {
        bind_address: "127.0.0.1:0".to_string(),
        cors_enabled: false,
        request_timeout_seconds: 5,
    };
    create_routes(state, &config)
}

fn post_task(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_create_task_success() {
    let repo = FakeTaskRepository::new(FakeOutcome::Created);
    let app = test_app(repo.clone());

    let request = post_task(
        "/internal/task",
        json!({"title": "Buy milk", "description": "2%", "priority": 1, "recurrence": 0}),
    );
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["title"], "Buy milk");
    assert_eq!(body["data"]["idTask"], 42);
    assert_eq!(body["data"]["idAccount"], 1);
    assert_eq!(body["data"]["idUserCreator"], 1);
    assert_eq!(body["data"]["priority"], 1);
    assert_eq!(body["data"]["status"], 0);
    assert!(body["metadata"]["timestamp"].is_string());
    assert_eq!(repo.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_short_title_is_rejected_before_persistence() {
    let repo = FakeTaskRepository::new(FakeOutcome::Created);
    let app = test_app(repo.clone());

    let request = post_task("/internal/task", json!({"title": "Hi", "description": "x"}));
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");

    let details = body["error"]["details"].as_array().unwrap();
    let title_violation = details
        .iter()
        .find(|v| v["path"] == "title")
        .expect("violation attached to title");
    assert!(title_violation["message"]
        .as_str()
        .unwrap()
        .contains("at least 3 characters"));

    // validation failures never reach the persistence layer
    assert_eq!(repo.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_recurring_task_without_config_is_rejected() {
    let repo = FakeTaskRepository::new(FakeOutcome::Created);
    let app = test_app(repo.clone());

    let request = post_task(
        "/internal/task",
        json!({"title": "Weekly sync", "description": "team call", "recurrence": 2}),
    );
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    let details = body["error"]["details"].as_array().unwrap();
    assert!(details.iter().any(|v| v["path"] == "recurrenceConfigJson"));
    assert_eq!(repo.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_business_rule_error_maps_to_bad_request() {
    let repo = FakeTaskRepository::new(FakeOutcome::BusinessRule);
    let app = test_app(repo);

    let request = post_task(
        "/internal/task",
        json!({"title": "Buy milk", "description": "2%", "idCategory": 99}),
    );
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["message"], "Category not found");
}

#[tokio::test]
async fn test_infrastructure_error_is_opaque() {
    let repo = FakeTaskRepository::new(FakeOutcome::Infrastructure);
    let app = test_app(repo);

    let request = post_task("/internal/task", json!({"title": "Buy milk", "description": "2%"}));
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_json(response).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["message"], "An unexpected error occurred");
    // no driver detail may leak into the response
    assert!(!body.to_string().contains("connection refused"));
}

#[tokio::test]
async fn test_body_overrides_query_parameter() {
    let repo = FakeTaskRepository::new(FakeOutcome::Created);
    let app = test_app(repo);

    let request = post_task(
        "/internal/task?title=From%20query",
        json!({"title": "From body", "description": "precedence check"}),
    );
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    assert_eq!(body["data"]["title"], "From body");
}

#[tokio::test]
async fn test_health_endpoint() {
    let repo = FakeTaskRepository::new(FakeOutcome::Created);
    let app = test_app(repo);

    let request = Request::builder()
        .uri("/health")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "ok");
}
