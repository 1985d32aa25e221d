// handlers/protected/auth.rs - session endpoints for an authenticated caller

use axum::{extract::State, http::HeaderMap};
use serde_json::{json, Value};

use crate::api::{MutationResponse, Status};
use crate::auth::{bearer_token, Profile};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::rpc::security::LogoutRequest;
use crate::state::{AppState, Deadline};

/// POST /{tenant_url}/api/v1/auth/logout - revoke the presented token
pub async fn logout(
    State(state): State<AppState>,
    profile: Profile,
    headers: HeaderMap,
) -> ApiResult<MutationResponse> {
    let response = state
        .security
        .logout(
            LogoutRequest {
                tenant_id: profile.tenant_id,
                user_id: profile.user_id,
                token: bearer_token(&headers),
            },
            state.deadline(Deadline::Security),
        )
        .await
        .map_err(|e| ApiError::from_rpc(&e, "Failed to logout"))?;

    if matches!(response.status, Some(Status::Failure) | Some(Status::Error)) {
        let reason = if response.message.is_empty() {
            "logout rejected".to_string()
        } else {
            response.message
        };
        return Err(ApiError::internal_server_error(reason, "Failed to logout"));
    }

    let message = if response.message.is_empty() {
        "Logout successful".to_string()
    } else {
        response.message
    };
    Ok(ApiResponse::success(MutationResponse::new(message, Status::Success)))
}

/// GET /{tenant_url}/api/v1/auth/profile - the identity attached by authentication
pub async fn profile(profile: Profile) -> ApiResult<Value> {
    Ok(ApiResponse::success(json!({ "profile": profile })))
}
