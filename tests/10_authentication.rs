mod common;

use anyhow::Result;
use common::{error_envelope, TestServer, TENANT_ID, TOKEN, USER_ID};
use reqwest::StatusCode;
use serde_json::{json, Value};

#[tokio::test]
async fn missing_token_is_rejected_before_the_backend() -> Result<()> {
    let server = TestServer::spawn().await?;

    let res = server.client.get(server.tenant_url("/regions")).send().await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let body = error_envelope(res).await?;
    assert_eq!(body["message"], "Authentication required");

    assert!(server.core.calls().is_empty());
    assert!(server.security.authorizations().is_empty());
    Ok(())
}

#[tokio::test]
async fn malformed_authorization_header_is_rejected() -> Result<()> {
    let server = TestServer::spawn().await?;

    for header in ["Basic dXNlcjpwYXNz", "Bearer", "bearer token-acme", TOKEN] {
        let res = server
            .client
            .get(server.tenant_url("/regions"))
            .header("Authorization", header)
            .send()
            .await?;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED, "header {:?}", header);
    }
    assert!(server.core.calls().is_empty());
    Ok(())
}

#[tokio::test]
async fn unknown_token_fails_authentication() -> Result<()> {
    let server = TestServer::spawn().await?;

    let res = server
        .client
        .get(server.tenant_url("/regions"))
        .bearer_auth("not-a-real-token")
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let body = error_envelope(res).await?;
    assert_eq!(body["message"], "Authentication failed");
    assert!(server.core.calls().is_empty());
    Ok(())
}

#[tokio::test]
async fn token_from_another_tenant_is_rejected() -> Result<()> {
    let server = TestServer::spawn().await?;

    let res = server
        .get(server.url("/globex/api/v1/regions"))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    assert!(server.core.calls().is_empty());
    Ok(())
}

#[tokio::test]
async fn security_service_outage_is_internal() -> Result<()> {
    let server = TestServer::spawn().await?;
    server.security.set_unavailable(true);

    let res = server.get(server.tenant_url("/regions")).send().await?;
    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = error_envelope(res).await?;
    assert_eq!(body["message"], "Failed to authenticate request");
    assert!(server.core.calls().is_empty());
    Ok(())
}

#[tokio::test]
async fn profile_returns_the_authenticated_identity() -> Result<()> {
    let server = TestServer::spawn().await?;

    let res = server.get(server.tenant_url("/auth/profile")).send().await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await?;
    assert_eq!(body["profile"]["tenant_id"], TENANT_ID);
    assert_eq!(body["profile"]["user_id"], USER_ID);
    assert_eq!(body["profile"]["username"], "alice");
    Ok(())
}

#[tokio::test]
async fn login_is_exempt_and_returns_a_token() -> Result<()> {
    let server = TestServer::spawn().await?;
    server.security.accept_login("alice", "s3cret", "fresh-token");

    let res = server
        .client
        .post(server.tenant_url("/auth/login"))
        .json(&json!({"username": "alice", "password": "s3cret"}))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await?;
    assert_eq!(body["success"], true);
    assert_eq!(body["token"], "fresh-token");
    assert_eq!(body["profile"]["user_id"], USER_ID);

    // No authorization check runs for an exempt route
    assert!(server.security.authorizations().is_empty());
    Ok(())
}

#[tokio::test]
async fn login_with_bad_credentials_is_unauthorized() -> Result<()> {
    let server = TestServer::spawn().await?;

    let res = server
        .client
        .post(server.tenant_url("/auth/login"))
        .json(&json!({"username": "alice", "password": "wrong"}))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    error_envelope(res).await?;
    Ok(())
}

#[tokio::test]
async fn login_requires_username_and_password() -> Result<()> {
    let server = TestServer::spawn().await?;

    let res = server
        .client
        .post(server.tenant_url("/auth/login"))
        .json(&json!({"username": "alice", "password": ""}))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body = error_envelope(res).await?;
    assert_eq!(body["error"], "password is required");
    Ok(())
}

#[tokio::test]
async fn logout_forwards_the_presented_token() -> Result<()> {
    let server = TestServer::spawn().await?;

    let res = server.post(server.tenant_url("/auth/logout")).send().await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await?;
    assert_eq!(body["message"], "Logout successful");

    let logouts = server.security.logouts();
    assert_eq!(logouts.len(), 1);
    assert_eq!(logouts[0].token, TOKEN);
    assert_eq!(logouts[0].user_id, USER_ID);
    Ok(())
}
