use std::time::Duration;

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tonic::transport::{Channel, Endpoint};

use super::codec::JsonCodec;
use super::core::method_path;
use super::{with_deadline, RpcError};
use crate::api::types::Status;
use crate::auth::Profile;

const SECURITY_SERVICE: &str = "security.v1.SecurityService";

/// Token scheme literal sent with every authentication call.
pub const TOKEN_TYPE_BEARER: &str = "Bearer";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthenticateRequest {
    pub tenant_url: String,
    pub token_type: String,
    pub token: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuthenticateResponse {
    #[serde(default)]
    pub status: Option<Status>,
    #[serde(default)]
    pub profile: Option<Profile>,
}

impl AuthenticateResponse {
    /// The profile, if the security service accepted the token.
    pub fn accepted_profile(self) -> Option<Profile> {
        match self.status {
            Some(Status::Success) => self.profile,
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthorizeRequest {
    pub tenant_id: String,
    pub user_id: String,
    pub resource_type: String,
    pub resource_id: String,
    pub action: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuthorizeResponse {
    #[serde(default)]
    pub authorized: bool,
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub tenant_url: String,
    pub username: String,
    pub password: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiry: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoginResponse {
    #[serde(default)]
    pub status: Option<Status>,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub token: String,
    #[serde(default)]
    pub expires_at: Option<String>,
    #[serde(default)]
    pub profile: Option<Profile>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogoutRequest {
    pub tenant_id: String,
    pub user_id: String,
    pub token: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LogoutResponse {
    #[serde(default)]
    pub status: Option<Status>,
    #[serde(default)]
    pub message: String,
}

/// Client side of the security service: identity and permission decisions.
#[async_trait]
pub trait SecurityService: Send + Sync {
    async fn authenticate(
        &self,
        request: AuthenticateRequest,
        deadline: Duration,
    ) -> Result<AuthenticateResponse, RpcError>;

    async fn authorize(
        &self,
        request: AuthorizeRequest,
        deadline: Duration,
    ) -> Result<AuthorizeResponse, RpcError>;

    async fn login(&self, request: LoginRequest, deadline: Duration) -> Result<LoginResponse, RpcError>;

    async fn logout(&self, request: LogoutRequest, deadline: Duration) -> Result<LogoutResponse, RpcError>;
}

#[derive(Clone, Debug)]
pub struct GrpcSecurityClient {
    inner: tonic::client::Grpc<Channel>,
}

impl GrpcSecurityClient {
    pub fn connect_lazy(url: &str, connect_timeout: Duration) -> Result<Self, RpcError> {
        let channel = Endpoint::from_shared(url.to_string())
            .map_err(|e| RpcError::Transport(format!("invalid security service url {}: {}", url, e)))?
            .connect_timeout(connect_timeout)
            .connect_lazy();
        Ok(Self {
            inner: tonic::client::Grpc::new(channel),
        })
    }

    async fn unary<Req, Resp>(&self, method: &str, request: Req, deadline: Duration) -> Result<Resp, RpcError>
    where
        Req: Serialize + Send + Sync + 'static,
        Resp: DeserializeOwned + Send + Sync + 'static,
    {
        let path = method_path(SECURITY_SERVICE, method)?;
        let mut request = tonic::Request::new(request);
        request.set_timeout(deadline);

        with_deadline(deadline, async {
            let mut grpc = self.inner.clone();
            grpc.ready()
                .await
                .map_err(|e| RpcError::Transport(format!("security service was not ready: {}", e)))?;
            let response = grpc
                .unary(request, path, JsonCodec::<Req, Resp>::default())
                .await?;
            Ok(response.into_inner())
        })
        .await
    }
}

#[async_trait]
impl SecurityService for GrpcSecurityClient {
    async fn authenticate(
        &self,
        request: AuthenticateRequest,
        deadline: Duration,
    ) -> Result<AuthenticateResponse, RpcError> {
        self.unary("Authenticate", request, deadline).await
    }

    async fn authorize(
        &self,
        request: AuthorizeRequest,
        deadline: Duration,
    ) -> Result<AuthorizeResponse, RpcError> {
        self.unary("Authorize", request, deadline).await
    }

    async fn login(&self, request: LoginRequest, deadline: Duration) -> Result<LoginResponse, RpcError> {
        self.unary("Login", request, deadline).await
    }

    async fn logout(&self, request: LogoutRequest, deadline: Duration) -> Result<LogoutResponse, RpcError> {
        self.unary("Logout", request, deadline).await
    }
}
