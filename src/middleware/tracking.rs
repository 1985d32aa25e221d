use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::state::AppState;

/// Route layer: counts the handler invocation as in flight until its
/// response is produced or the request is dropped.
pub async fn track_operations(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let _operation = state.operations.track();
    next.run(request).await
}
