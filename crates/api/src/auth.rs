use axum::{extract::Request, extract::State, middleware::Next, response::Response};
use serde::{Deserialize, Serialize};

use crate::routes::AppState;

/// The authenticated caller's identity. Injected as a request extension by
/// [`credential_middleware`] and consumed by handlers as an argument — never
/// read from request parameters or ambient state.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Credential {
    pub id_account: i64,
    pub id_user: i64,
}

/// Static credential stub. The values come from configuration; a real
/// authentication middleware will replace this function with one that
/// derives the credential from the session.
pub async fn credential_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    request.extensions_mut().insert(state.credential);
    next.run(request).await
}
