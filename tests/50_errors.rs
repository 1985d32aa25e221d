mod common;

use std::time::Duration;

use anyhow::Result;
use common::{error_envelope, TestServer};
use reqwest::{Method, StatusCode};
use serde_json::{json, Value};
use tonic::Code;

#[tokio::test]
async fn health_and_status_need_no_token() -> Result<()> {
    let server = TestServer::spawn().await?;

    let res = server.client.get(server.url("/health")).send().await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await?;
    assert_eq!(body["status"], "healthy");
    assert!(body["timestamp"].is_string());

    let res = server.client.get(server.url("/api/v1/status")).send().await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await?;
    assert_eq!(body["service"], "clientapi");
    assert!(body["in_flight_operations"].is_u64());

    assert!(server.security.authorizations().is_empty());
    Ok(())
}

#[tokio::test]
async fn backend_codes_map_to_http_statuses() -> Result<()> {
    let server = TestServer::spawn().await?;
    let cases = [
        (Code::NotFound, StatusCode::NOT_FOUND),
        (Code::AlreadyExists, StatusCode::CONFLICT),
        (Code::InvalidArgument, StatusCode::BAD_REQUEST),
        (Code::PermissionDenied, StatusCode::FORBIDDEN),
        (Code::Unauthenticated, StatusCode::UNAUTHORIZED),
        (Code::Unavailable, StatusCode::INTERNAL_SERVER_ERROR),
        (Code::Internal, StatusCode::INTERNAL_SERVER_ERROR),
    ];

    for (code, expected) in cases {
        server.core.fail("ShowWorkspace", code, "workspace lookup failed");
        let res = server.get(server.tenant_url("/workspaces/analytics")).send().await?;
        assert_eq!(res.status(), expected, "{:?}", code);
        let body = error_envelope(res).await?;
        assert_eq!(body["error"], "workspace lookup failed");
        assert_eq!(body["message"], "Failed to get workspace");
    }
    Ok(())
}

#[tokio::test]
async fn not_found_is_consistent_across_resources() -> Result<()> {
    let server = TestServer::spawn().await?;
    let cases = [
        ("ShowPolicy", "/policies/p-404", "Failed to get policy"),
        ("ShowAnchor", "/anchors/a-404", "Failed to get anchor"),
        ("ShowSatellite", "/satellites/s-404", "Failed to get satellite"),
        ("ShowDataProduct", "/data-products/dp-404", "Failed to get data product"),
        ("ShowMcpServer", "/mcp-servers/srv-404", "Failed to get MCP server"),
    ];

    for (method, path, message) in cases {
        server.core.fail(method, Code::NotFound, "no such entity");
        let res = server.get(server.tenant_url(path)).send().await?;
        assert_eq!(res.status(), StatusCode::NOT_FOUND, "{}", path);
        let body = error_envelope(res).await?;
        assert_eq!(body["message"], message, "{}", path);
    }
    Ok(())
}

#[tokio::test]
async fn empty_backend_message_uses_the_handler_message() -> Result<()> {
    let server = TestServer::spawn().await?;
    server.core.fail("DeleteAnchor", Code::NotFound, "");

    let res = server.delete(server.tenant_url("/anchors/a-1")).send().await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let body = error_envelope(res).await?;
    assert_eq!(body["error"], "Failed to delete anchor");
    Ok(())
}

#[tokio::test]
async fn unregistered_backend_method_is_internal() -> Result<()> {
    let server = TestServer::spawn().await?;

    let res = server.get(server.tenant_url("/satellites")).send().await?;
    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = error_envelope(res).await?;
    assert_eq!(body["message"], "Failed to list satellites");
    Ok(())
}

#[tokio::test]
async fn unknown_route_is_json_404_without_auth() -> Result<()> {
    let server = TestServer::spawn().await?;

    let res = server.client.get(server.url("/acme/api/v1/gadgets")).send().await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let content_type = res
        .headers()
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert!(content_type.starts_with("application/json"), "{}", content_type);
    let body = error_envelope(res).await?;
    assert_eq!(body["message"], "Route not found");
    Ok(())
}

#[tokio::test]
async fn preflight_is_answered_without_auth() -> Result<()> {
    let server = TestServer::spawn().await?;

    let res = server
        .client
        .request(Method::OPTIONS, server.tenant_url("/regions"))
        .header("Origin", "https://console.example.com")
        .header("Access-Control-Request-Method", "POST")
        .header("Access-Control-Request-Headers", "authorization,content-type")
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(
        res.headers()
            .get("access-control-allow-origin")
            .and_then(|v| v.to_str().ok()),
        Some("*")
    );
    assert!(server.security.authorizations().is_empty());
    assert!(server.core.calls().is_empty());
    Ok(())
}

#[tokio::test]
async fn responses_carry_cors_headers() -> Result<()> {
    let server = TestServer::spawn().await?;
    server.core.on("ListRegions", json!({"regions": []}));

    let res = server
        .get(server.tenant_url("/regions"))
        .header("Origin", "https://console.example.com")
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    assert!(res.headers().get("access-control-allow-origin").is_some());
    Ok(())
}

#[tokio::test]
async fn operations_are_tracked_while_in_flight() -> Result<()> {
    let server = TestServer::spawn().await?;
    server.core.on("ShowRegion", json!({"region": {"region_name": "us-west-2"}}));
    server.core.delay(Duration::from_millis(400));

    let pending = tokio::spawn(server.get(server.tenant_url("/regions/us-west-2")).send());
    tokio::time::sleep(Duration::from_millis(150)).await;
    assert_eq!(server.operations.in_flight(), 1);

    let res = pending.await??;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(server.operations.in_flight(), 0);
    assert!(server.operations.wait_for_drain(Duration::from_millis(50)).await);
    Ok(())
}

#[tokio::test]
async fn failed_operations_are_untracked() -> Result<()> {
    let server = TestServer::spawn().await?;
    server.core.fail("ShowRegion", Code::Internal, "boom");

    let res = server.get(server.tenant_url("/regions/us-west-2")).send().await?;
    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(server.operations.in_flight(), 0);
    Ok(())
}

#[tokio::test]
async fn invalid_query_is_a_bad_request() -> Result<()> {
    let server = TestServer::spawn().await?;

    let res = server
        .get(server.tenant_url("/commits?database_name=orders-db&limit=many"))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body = error_envelope(res).await?;
    assert_eq!(body["message"], "Invalid query parameters");

    let res = server.get(server.tenant_url("/commits")).send().await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert!(server.core.calls().is_empty());
    Ok(())
}

#[tokio::test]
async fn commits_and_resources_are_listed() -> Result<()> {
    let server = TestServer::spawn().await?;
    server
        .core
        .on("ListCommits", json!({"commits": [{"commit_id": "c1", "commit_message": "init"}]}));
    server
        .core
        .on("ListResourceContainers", json!({"containers": [{"container_id": "k1"}]}));

    let res = server
        .get(server.tenant_url("/commits?database_name=orders-db&limit=10"))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await?;
    assert_eq!(body["commits"][0]["commit_id"], "c1");
    let calls = server.core.calls_to("ListCommits");
    assert_eq!(calls[0]["database_name"], "orders-db");
    assert_eq!(calls[0]["limit"], 10);

    let res = server.get(server.tenant_url("/resources/containers")).send().await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await?;
    assert_eq!(body["containers"][0]["container_id"], "k1");
    Ok(())
}
