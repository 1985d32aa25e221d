//! Backend RPC plumbing: the core and security service clients, the JSON
//! message codec they share, and the status-code table used to turn backend
//! failures into HTTP responses.

pub mod codec;
pub mod core;
pub mod security;
pub mod status;

use std::time::Duration;

use futures::stream::BoxStream;
use serde_json::Value;
use thiserror::Error;

pub use self::core::{CoreService, GrpcCoreClient};
pub use self::security::{GrpcSecurityClient, SecurityService};

/// A server-streaming backend response, one JSON message per item.
pub type RpcStream = BoxStream<'static, Result<Value, RpcError>>;

#[derive(Debug, Error)]
pub enum RpcError {
    /// The backend answered with a structured gRPC status.
    #[error("backend returned {:?}: {}", .0.code(), .0.message())]
    Status(#[from] tonic::Status),

    #[error("backend transport error: {0}")]
    Transport(String),

    #[error("backend call exceeded deadline of {0:?}")]
    DeadlineExceeded(Duration),

    #[error("backend message codec error: {0}")]
    Codec(String),

    #[error("invalid backend method path: {0}")]
    InvalidMethod(String),
}

impl RpcError {
    /// The structured backend status, if this failure carries one.
    pub fn status(&self) -> Option<&tonic::Status> {
        match self {
            RpcError::Status(status) => Some(status),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for RpcError {
    fn from(err: serde_json::Error) -> Self {
        RpcError::Codec(err.to_string())
    }
}

/// Run a backend call under a deadline. An elapsed deadline without a
/// structured status from the backend is an unstructured failure.
pub async fn with_deadline<T, F>(deadline: Duration, call: F) -> Result<T, RpcError>
where
    F: std::future::Future<Output = Result<T, RpcError>>,
{
    match tokio::time::timeout(deadline, call).await {
        Ok(result) => result,
        Err(_) => Err(RpcError::DeadlineExceeded(deadline)),
    }
}
