use std::sync::Arc;
use std::time::Duration;

use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

use crate::config::TimeoutConfig;
use crate::error::ApiError;
use crate::rpc::{CoreService, RpcStream, SecurityService};
use crate::tracking::OperationTracker;

/// Which bound applies to a backend call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Deadline {
    /// Ordinary core service calls.
    Default,
    /// Bulk operations such as mapping data copies.
    Bulk,
    /// Authenticate / authorize / login / logout.
    Security,
}

/// Shared by every request. Backend handles are cheap clones of one channel.
#[derive(Clone)]
pub struct AppState {
    pub core: Arc<dyn CoreService>,
    pub security: Arc<dyn SecurityService>,
    pub timeouts: TimeoutConfig,
    pub operations: Arc<OperationTracker>,
}

impl AppState {
    pub fn new(
        core: Arc<dyn CoreService>,
        security: Arc<dyn SecurityService>,
        timeouts: TimeoutConfig,
        operations: Arc<OperationTracker>,
    ) -> Self {
        Self {
            core,
            security,
            timeouts,
            operations,
        }
    }

    pub fn deadline(&self, deadline: Deadline) -> Duration {
        let secs = match deadline {
            Deadline::Default => self.timeouts.request_secs,
            Deadline::Bulk => self.timeouts.bulk_secs,
            Deadline::Security => self.timeouts.security_secs,
        };
        Duration::from_secs(secs)
    }

    /// Unary core call with typed request and response. Backend failures are
    /// translated through the shared status table, labelled with `failure`.
    pub async fn core_call<Req, Resp>(
        &self,
        method: &str,
        request: &Req,
        deadline: Deadline,
        failure: &str,
    ) -> Result<Resp, ApiError>
    where
        Req: Serialize + ?Sized,
        Resp: DeserializeOwned,
    {
        let request = encode_request(request, failure)?;
        let response = self
            .core
            .call(method, request, self.deadline(deadline))
            .await
            .map_err(|e| ApiError::from_rpc(&e, failure))?;
        decode_response(response, method, failure)
    }

    pub async fn core_stream<Req>(
        &self,
        method: &str,
        request: &Req,
        deadline: Deadline,
        failure: &str,
    ) -> Result<RpcStream, ApiError>
    where
        Req: Serialize + ?Sized,
    {
        let request = encode_request(request, failure)?;
        self.core
            .call_streaming(method, request, self.deadline(deadline))
            .await
            .map_err(|e| ApiError::from_rpc(&e, failure))
    }
}

fn encode_request<Req: Serialize + ?Sized>(request: &Req, failure: &str) -> Result<Value, ApiError> {
    serde_json::to_value(request)
        .map_err(|e| ApiError::internal_server_error(format!("failed to encode backend request: {}", e), failure))
}

pub(crate) fn decode_response<Resp: DeserializeOwned>(
    response: Value,
    method: &str,
    failure: &str,
) -> Result<Resp, ApiError> {
    serde_json::from_value(response).map_err(|e| {
        ApiError::internal_server_error(format!("unexpected {} response: {}", method, e), failure)
    })
}
