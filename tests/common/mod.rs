#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use futures::StreamExt;
use serde_json::Value;
use tonic::Code;

use clientapi::api::Status;
use clientapi::auth::Profile;
use clientapi::config::{AppConfig, TimeoutConfig};
use clientapi::rpc::security::{
    AuthenticateRequest, AuthenticateResponse, AuthorizeRequest, AuthorizeResponse, LoginRequest, LoginResponse,
    LogoutRequest, LogoutResponse,
};
use clientapi::rpc::{CoreService, RpcError, RpcStream, SecurityService};
use clientapi::tracking::OperationTracker;
use clientapi::AppState;

pub const TENANT_URL: &str = "acme";
pub const TENANT_ID: &str = "tenant-acme";
pub const USER_ID: &str = "user-1";
pub const TOKEN: &str = "token-acme";
pub const ROOT_TOKEN: &str = "token-root";

#[derive(Clone)]
enum Reply {
    Ok(Value),
    Err(Code, String),
}

/// In-process stand-in for the core service. Unregistered methods answer
/// `Unimplemented`; every call is recorded.
#[derive(Default)]
pub struct FakeCore {
    replies: Mutex<HashMap<String, Reply>>,
    streams: Mutex<HashMap<String, Vec<Reply>>>,
    calls: Mutex<Vec<(String, Value)>>,
    delay: Mutex<Option<Duration>>,
}

impl FakeCore {
    pub fn on(&self, method: &str, response: Value) {
        self.replies
            .lock()
            .unwrap()
            .insert(method.to_string(), Reply::Ok(response));
    }

    pub fn fail(&self, method: &str, code: Code, message: &str) {
        self.replies
            .lock()
            .unwrap()
            .insert(method.to_string(), Reply::Err(code, message.to_string()));
    }

    pub fn stream(&self, method: &str, messages: Vec<Value>) {
        self.streams
            .lock()
            .unwrap()
            .insert(method.to_string(), messages.into_iter().map(Reply::Ok).collect());
    }

    pub fn stream_then_fail(&self, method: &str, messages: Vec<Value>, code: Code, message: &str) {
        let mut replies: Vec<Reply> = messages.into_iter().map(Reply::Ok).collect();
        replies.push(Reply::Err(code, message.to_string()));
        self.streams.lock().unwrap().insert(method.to_string(), replies);
    }

    pub fn delay(&self, delay: Duration) {
        *self.delay.lock().unwrap() = Some(delay);
    }

    pub fn calls(&self) -> Vec<(String, Value)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn calls_to(&self, method: &str) -> Vec<Value> {
        self.calls()
            .into_iter()
            .filter(|(m, _)| m == method)
            .map(|(_, request)| request)
            .collect()
    }

    fn record(&self, method: &str, request: Value) {
        self.calls.lock().unwrap().push((method.to_string(), request));
    }
}

fn to_result(reply: Reply) -> Result<Value, RpcError> {
    match reply {
        Reply::Ok(value) => Ok(value),
        Reply::Err(code, message) => Err(RpcError::Status(tonic::Status::new(code, message))),
    }
}

#[async_trait]
impl CoreService for FakeCore {
    async fn call(&self, method: &str, request: Value, _deadline: Duration) -> Result<Value, RpcError> {
        self.record(method, request);
        let delay = *self.delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        let reply = self.replies.lock().unwrap().get(method).cloned();
        match reply {
            Some(reply) => to_result(reply),
            None => Err(RpcError::Status(tonic::Status::unimplemented(format!(
                "{} not registered",
                method
            )))),
        }
    }

    async fn call_streaming(
        &self,
        method: &str,
        request: Value,
        _deadline: Duration,
    ) -> Result<RpcStream, RpcError> {
        self.record(method, request);
        // A configured delay slows both opening the stream and every message
        let delay = *self.delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        let replies = self.streams.lock().unwrap().get(method).cloned();
        match replies {
            Some(replies) => Ok(futures::stream::iter(replies.into_iter().map(to_result))
                .then(move |reply| async move {
                    if let Some(delay) = delay {
                        tokio::time::sleep(delay).await;
                    }
                    reply
                })
                .boxed()),
            None => Err(RpcError::Status(tonic::Status::unimplemented(format!(
                "{} not registered",
                method
            )))),
        }
    }
}

/// In-process stand-in for the security service.
#[derive(Default)]
pub struct FakeSecurity {
    /// token -> (tenant_url the token belongs to, profile)
    tokens: Mutex<HashMap<String, (String, Profile)>>,
    /// (resource_type, action) pairs to deny, with the denial message
    denials: Mutex<Vec<(String, String, String)>>,
    unavailable: Mutex<bool>,
    authorizations: Mutex<Vec<AuthorizeRequest>>,
    logins: Mutex<HashMap<(String, String), String>>,
    logouts: Mutex<Vec<LogoutRequest>>,
}

impl FakeSecurity {
    pub fn issue(&self, token: &str, tenant_url: &str, profile: Profile) {
        self.tokens
            .lock()
            .unwrap()
            .insert(token.to_string(), (tenant_url.to_string(), profile));
    }

    pub fn deny(&self, resource_type: &str, action: &str, message: &str) {
        self.denials.lock().unwrap().push((
            resource_type.to_string(),
            action.to_string(),
            message.to_string(),
        ));
    }

    pub fn set_unavailable(&self, unavailable: bool) {
        *self.unavailable.lock().unwrap() = unavailable;
    }

    pub fn accept_login(&self, username: &str, password: &str, token: &str) {
        self.logins
            .lock()
            .unwrap()
            .insert((username.to_string(), password.to_string()), token.to_string());
    }

    pub fn authorizations(&self) -> Vec<AuthorizeRequest> {
        self.authorizations.lock().unwrap().clone()
    }

    pub fn logouts(&self) -> Vec<LogoutRequest> {
        self.logouts.lock().unwrap().clone()
    }

    fn check_available(&self) -> Result<(), RpcError> {
        if *self.unavailable.lock().unwrap() {
            return Err(RpcError::Transport("security service was not ready: connection refused".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl SecurityService for FakeSecurity {
    async fn authenticate(
        &self,
        request: AuthenticateRequest,
        _deadline: Duration,
    ) -> Result<AuthenticateResponse, RpcError> {
        self.check_available()?;
        assert_eq!(request.token_type, "Bearer");
        let entry = self.tokens.lock().unwrap().get(&request.token).cloned();
        let response = match entry {
            // Global routes carry no tenant_url
            Some((tenant_url, profile)) if request.tenant_url.is_empty() || request.tenant_url == tenant_url => {
                AuthenticateResponse {
                    status: Some(Status::Success),
                    profile: Some(profile),
                }
            }
            _ => AuthenticateResponse {
                status: Some(Status::Failure),
                profile: None,
            },
        };
        Ok(response)
    }

    async fn authorize(
        &self,
        request: AuthorizeRequest,
        _deadline: Duration,
    ) -> Result<AuthorizeResponse, RpcError> {
        self.check_available()?;
        self.authorizations.lock().unwrap().push(request.clone());
        let denial = self
            .denials
            .lock()
            .unwrap()
            .iter()
            .find(|(t, a, _)| *t == request.resource_type && *a == request.action)
            .map(|(_, _, message)| message.clone());
        Ok(match denial {
            Some(message) => AuthorizeResponse {
                authorized: false,
                message,
            },
            None => AuthorizeResponse {
                authorized: true,
                message: String::new(),
            },
        })
    }

    async fn login(&self, request: LoginRequest, _deadline: Duration) -> Result<LoginResponse, RpcError> {
        self.check_available()?;
        let token = self
            .logins
            .lock()
            .unwrap()
            .get(&(request.username.clone(), request.password.clone()))
            .cloned();
        Ok(match token {
            Some(token) => LoginResponse {
                status: Some(Status::Success),
                message: String::new(),
                token,
                expires_at: Some("2030-01-01T00:00:00Z".to_string()),
                profile: Some(acme_profile()),
            },
            None => LoginResponse {
                status: Some(Status::Failure),
                message: "invalid username or password".to_string(),
                ..LoginResponse::default()
            },
        })
    }

    async fn logout(&self, request: LogoutRequest, _deadline: Duration) -> Result<LogoutResponse, RpcError> {
        self.check_available()?;
        self.logouts.lock().unwrap().push(request);
        Ok(LogoutResponse {
            status: Some(Status::Success),
            message: String::new(),
        })
    }
}

pub fn acme_profile() -> Profile {
    Profile {
        tenant_id: TENANT_ID.to_string(),
        user_id: USER_ID.to_string(),
        username: "alice".to_string(),
        email: "alice@acme.test".to_string(),
        name: "Alice".to_string(),
    }
}

pub fn root_profile() -> Profile {
    Profile {
        tenant_id: "tenant-root".to_string(),
        user_id: "root-admin".to_string(),
        username: "root".to_string(),
        email: "root@platform.test".to_string(),
        name: "Root".to_string(),
    }
}

/// The router served on a free port with fake backends behind it.
pub struct TestServer {
    pub port: u16,
    pub base_url: String,
    pub core: Arc<FakeCore>,
    pub security: Arc<FakeSecurity>,
    pub operations: Arc<OperationTracker>,
    pub client: reqwest::Client,
}

impl TestServer {
    pub async fn spawn() -> Result<Self> {
        Self::spawn_with(TimeoutConfig::default()).await
    }

    pub async fn spawn_with(timeouts: TimeoutConfig) -> Result<Self> {
        // Pick an unused port for isolation
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);

        let core = Arc::new(FakeCore::default());
        let security = Arc::new(FakeSecurity::default());
        security.issue(TOKEN, TENANT_URL, acme_profile());
        security.issue(ROOT_TOKEN, "", root_profile());

        let operations = OperationTracker::new();
        let state = AppState::new(core.clone(), security.clone(), timeouts, operations.clone());
        let app = clientapi::app(state, &AppConfig::development().api);

        let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
            .await
            .with_context(|| format!("failed to bind {}", base_url))?;
        tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                eprintln!("test server error: {}", e);
            }
        });

        Ok(Self {
            port,
            base_url,
            core,
            security,
            operations,
            client: reqwest::Client::new(),
        })
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// `/{tenant}/api/v1{path}` for the test tenant
    pub fn tenant_url(&self, path: &str) -> String {
        format!("{}/{}/api/v1{}", self.base_url, TENANT_URL, path)
    }

    pub fn get(&self, url: String) -> reqwest::RequestBuilder {
        self.client.get(url).bearer_auth(TOKEN)
    }

    pub fn post(&self, url: String) -> reqwest::RequestBuilder {
        self.client.post(url).bearer_auth(TOKEN)
    }

    pub fn put(&self, url: String) -> reqwest::RequestBuilder {
        self.client.put(url).bearer_auth(TOKEN)
    }

    pub fn delete(&self, url: String) -> reqwest::RequestBuilder {
        self.client.delete(url).bearer_auth(TOKEN)
    }
}

/// Asserts the uniform error envelope and returns it.
pub async fn error_envelope(res: reqwest::Response) -> Result<Value> {
    let body: Value = res.json().await?;
    assert_eq!(body["status"], "error", "not an error envelope: {}", body);
    assert!(body["error"].is_string(), "missing error: {}", body);
    assert!(body["message"].is_string(), "missing message: {}", body);
    Ok(body)
}
