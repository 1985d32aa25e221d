// handlers/public/login.rs - POST /{tenant_url}/api/v1/auth/login handler

use axum::extract::State;
use serde::{Deserialize, Serialize};

use crate::api::extract::require;
use crate::api::{ApiJson, ApiPath, Status, Validate};
use crate::auth::Profile;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::rpc::security::LoginRequest;
use crate::state::{AppState, Deadline};

#[derive(Debug, Deserialize)]
pub struct LoginBody {
    pub username: String,
    pub password: String,
    /// Requested token lifetime, passed through to the security service.
    #[serde(default)]
    pub expiry: Option<String>,
}

impl Validate for LoginBody {
    fn validate(&self) -> Result<(), ApiError> {
        require("username", &self.username)?;
        require("password", &self.password)
    }
}

#[derive(Debug, Serialize)]
pub struct LoginResult {
    pub message: String,
    pub success: bool,
    pub status: Status,
    pub token: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile: Option<Profile>,
}

/// POST /{tenant_url}/api/v1/auth/login - exchange credentials for a bearer token
pub async fn login(
    State(state): State<AppState>,
    ApiPath(tenant_url): ApiPath<String>,
    ApiJson(body): ApiJson<LoginBody>,
) -> ApiResult<LoginResult> {
    body.validate()?;

    let response = state
        .security
        .login(
            LoginRequest {
                tenant_url: tenant_url.clone(),
                username: body.username.clone(),
                password: body.password,
                expiry: body.expiry,
            },
            state.deadline(Deadline::Security),
        )
        .await
        .map_err(|e| ApiError::from_rpc(&e, "Failed to login"))?;

    if response.status != Some(Status::Success) || response.token.is_empty() {
        tracing::info!(tenant_url = %tenant_url, username = %body.username, "login rejected");
        let reason = if response.message.is_empty() {
            "invalid credentials".to_string()
        } else {
            response.message
        };
        return Err(ApiError::unauthorized(reason, "Login failed"));
    }

    Ok(ApiResponse::success(LoginResult {
        message: "Login successful".to_string(),
        success: true,
        status: Status::Success,
        token: response.token,
        expires_at: response.expires_at,
        profile: response.profile,
    }))
}
