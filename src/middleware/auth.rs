use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::auth::{bearer_token, is_exempt, is_global, tenant_url_from_path};
use crate::error::ApiError;
use crate::rpc::security::{AuthenticateRequest, TOKEN_TYPE_BEARER};
use crate::state::{AppState, Deadline};

/// Authentication middleware: resolves the bearer token to a `Profile`
/// through the security service and injects it into the request.
pub async fn authenticate(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let path = request.uri().path().to_string();
    if is_exempt(request.method(), &path) {
        return Ok(next.run(request).await);
    }

    let token = bearer_token(request.headers());
    if token.is_empty() {
        return Err(ApiError::unauthorized(
            "missing or malformed bearer token",
            "Authentication required",
        ));
    }

    // Global routes legitimately carry no tenant; check them first.
    let tenant_url = tenant_url_from_path(&path);
    if tenant_url.is_empty() && !is_global(&path) {
        return Err(ApiError::bad_request("tenant_url is required", "Invalid request path"));
    }

    let response = state
        .security
        .authenticate(
            AuthenticateRequest {
                tenant_url: tenant_url.clone(),
                token_type: TOKEN_TYPE_BEARER.to_string(),
                token,
            },
            state.deadline(Deadline::Security),
        )
        .await
        .map_err(|e| ApiError::internal_server_error(e.to_string(), "Failed to authenticate request"))?;

    let profile = response
        .accepted_profile()
        .ok_or_else(|| ApiError::unauthorized("invalid or expired token", "Authentication failed"))?;

    tracing::debug!(
        tenant_url = %tenant_url,
        tenant_id = %profile.tenant_id,
        user_id = %profile.user_id,
        "request authenticated"
    );
    request.extensions_mut().insert(profile);

    Ok(next.run(request).await)
}
