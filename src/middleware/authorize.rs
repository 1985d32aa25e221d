use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::auth::{derive_permission, is_exempt, Profile};
use crate::error::ApiError;
use crate::rpc::security::AuthorizeRequest;
use crate::state::{AppState, Deadline};

/// Authorization middleware. Runs after `authenticate`; asks the security
/// service whether the profile may perform the action the URL describes.
pub async fn authorize(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let path = request.uri().path().to_string();
    if is_exempt(request.method(), &path) {
        return Ok(next.run(request).await);
    }

    let profile = request.extensions().get::<Profile>().cloned().ok_or_else(|| {
        ApiError::internal_server_error(
            "authorization ran without an authenticated profile",
            "Internal server error",
        )
    })?;

    let permission = derive_permission(request.method(), &path);
    let decision = state
        .security
        .authorize(
            AuthorizeRequest {
                tenant_id: profile.tenant_id.clone(),
                user_id: profile.user_id.clone(),
                resource_type: permission.resource_type.clone(),
                resource_id: permission.resource_id.clone(),
                action: permission.action.clone(),
            },
            state.deadline(Deadline::Security),
        )
        .await
        .map_err(|e| ApiError::internal_server_error(e.to_string(), "Failed to authorize request"))?;

    if !decision.authorized {
        let reason = if decision.message.is_empty() {
            "insufficient permissions".to_string()
        } else {
            decision.message
        };
        tracing::info!(
            user_id = %profile.user_id,
            resource_type = %permission.resource_type,
            resource_id = %permission.resource_id,
            action = %permission.action,
            "authorization denied"
        );
        return Err(ApiError::forbidden(reason, "Access denied"));
    }

    Ok(next.run(request).await)
}
