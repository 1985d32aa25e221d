use std::time::Duration;

use async_trait::async_trait;
use futures::StreamExt;
use serde_json::Value;
use tonic::codegen::http::uri::PathAndQuery;
use tonic::transport::{Channel, Endpoint};

use super::codec::JsonCodec;
use super::{with_deadline, RpcError, RpcStream};

const CORE_SERVICE: &str = "core.v1.CoreService";

/// Client side of the backend core service.
///
/// One method per call shape rather than per RPC: the gateway never looks
/// inside resource payloads beyond the DTO conversion done by each handler
/// group, so requests and responses cross this seam as JSON values.
#[async_trait]
pub trait CoreService: Send + Sync {
    /// Unary call, e.g. `ListRegions`.
    async fn call(&self, method: &str, request: Value, deadline: Duration) -> Result<Value, RpcError>;

    /// Server-streaming call, e.g. `CopyMappingData`. The deadline bounds
    /// establishing the stream and is forwarded to the backend; the caller
    /// bounds consumption.
    async fn call_streaming(
        &self,
        method: &str,
        request: Value,
        deadline: Duration,
    ) -> Result<RpcStream, RpcError>;
}

/// gRPC implementation over a shared, lazily connected channel.
#[derive(Clone, Debug)]
pub struct GrpcCoreClient {
    inner: tonic::client::Grpc<Channel>,
}

impl GrpcCoreClient {
    /// Build a client without dialing; the first call connects.
    pub fn connect_lazy(url: &str, connect_timeout: Duration) -> Result<Self, RpcError> {
        let channel = Endpoint::from_shared(url.to_string())
            .map_err(|e| RpcError::Transport(format!("invalid core service url {}: {}", url, e)))?
            .connect_timeout(connect_timeout)
            .connect_lazy();
        Ok(Self {
            inner: tonic::client::Grpc::new(channel),
        })
    }

    async fn ready(&self) -> Result<tonic::client::Grpc<Channel>, RpcError> {
        let mut grpc = self.inner.clone();
        grpc.ready()
            .await
            .map_err(|e| RpcError::Transport(format!("core service was not ready: {}", e)))?;
        Ok(grpc)
    }
}

pub(crate) fn method_path(service: &str, method: &str) -> Result<PathAndQuery, RpcError> {
    let path = format!("/{}/{}", service, method);
    PathAndQuery::try_from(path.clone()).map_err(|_| RpcError::InvalidMethod(path))
}

#[async_trait]
impl CoreService for GrpcCoreClient {
    async fn call(&self, method: &str, request: Value, deadline: Duration) -> Result<Value, RpcError> {
        let path = method_path(CORE_SERVICE, method)?;
        let mut request = tonic::Request::new(request);
        request.set_timeout(deadline);

        with_deadline(deadline, async {
            let mut grpc = self.ready().await?;
            let response = grpc
                .unary(request, path, JsonCodec::<Value, Value>::default())
                .await?;
            Ok(response.into_inner())
        })
        .await
    }

    async fn call_streaming(
        &self,
        method: &str,
        request: Value,
        deadline: Duration,
    ) -> Result<RpcStream, RpcError> {
        let path = method_path(CORE_SERVICE, method)?;
        let mut request = tonic::Request::new(request);
        request.set_timeout(deadline);

        with_deadline(deadline, async {
            let mut grpc = self.ready().await?;
            let response = grpc
                .server_streaming(request, path, JsonCodec::<Value, Value>::default())
                .await?;
            let stream = response
                .into_inner()
                .map(|message| message.map_err(RpcError::from))
                .boxed();
            Ok(stream)
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn method_paths() {
        let path = method_path(CORE_SERVICE, "ListRegions").unwrap();
        assert_eq!(path.as_str(), "/core.v1.CoreService/ListRegions");
        assert!(matches!(
            method_path(CORE_SERVICE, "List Regions"),
            Err(RpcError::InvalidMethod(_))
        ));
    }

    #[tokio::test]
    async fn bad_url_is_rejected_up_front() {
        let err = GrpcCoreClient::connect_lazy("not a url", Duration::from_secs(1)).unwrap_err();
        assert!(matches!(err, RpcError::Transport(_)));
    }
}
