mod common;

use std::time::Duration;

use anyhow::Result;
use clientapi::config::TimeoutConfig;
use common::{error_envelope, TestServer, TENANT_ID, USER_ID};
use reqwest::StatusCode;
use serde_json::{json, Value};
use tonic::Code;

fn existing(names: &[&str]) -> Value {
    let mappings: Vec<Value> = names
        .iter()
        .map(|name| json!({"mapping_name": name, "mapping_type": "table"}))
        .collect();
    json!({ "mappings": mappings })
}

#[tokio::test]
async fn missing_mapping_name_is_rejected_without_backend_calls() -> Result<()> {
    let server = TestServer::spawn().await?;

    let res = server
        .post(server.tenant_url("/mappings"))
        .json(&json!({"mapping_name": "", "mapping_type": "table"}))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body = error_envelope(res).await?;
    assert_eq!(body["error"], "mapping_name is required");

    let res = server
        .post(server.tenant_url("/mappings"))
        .json(&json!({"mapping_type": "table", "mapping_source": "sales.orders"}))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body = error_envelope(res).await?;
    assert_eq!(body["message"], "Invalid request body");

    assert!(server.core.calls().is_empty());
    Ok(())
}

#[tokio::test]
async fn free_name_is_kept() -> Result<()> {
    let server = TestServer::spawn().await?;
    server.core.on("ListMappings", existing(&["users"]));
    server
        .core
        .on("AddMapping", json!({"mapping": {"mapping_name": "orders", "mapping_type": "table"}}));

    let res = server
        .post(server.tenant_url("/mappings"))
        .json(&json!({"mapping_name": "orders", "mapping_type": "table"}))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CREATED);
    let body: Value = res.json().await?;
    assert_eq!(body["status"], "created");
    assert_eq!(body["mapping"]["mapping_name"], "orders");

    let adds = server.core.calls_to("AddMapping");
    assert_eq!(adds[0]["mapping_name"], "orders");
    assert_eq!(adds[0]["tenant_id"], TENANT_ID);
    assert_eq!(adds[0]["owner_id"], USER_ID);
    Ok(())
}

#[tokio::test]
async fn taken_name_gets_the_first_free_suffix() -> Result<()> {
    let server = TestServer::spawn().await?;
    server
        .core
        .on("ListMappings", existing(&["orders", "orders_2", "orders_3"]));
    server.core.on("AddMapping", json!({}));

    let res = server
        .post(server.tenant_url("/mappings"))
        .json(&json!({"mapping_name": "orders", "mapping_type": "table"}))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CREATED);

    let adds = server.core.calls_to("AddMapping");
    assert_eq!(adds.len(), 1);
    assert_eq!(adds[0]["mapping_name"], "orders_4");

    // Listing happens before adding
    let methods: Vec<String> = server.core.calls().into_iter().map(|(m, _)| m).collect();
    assert_eq!(methods, vec!["ListMappings", "AddMapping"]);
    Ok(())
}

#[tokio::test]
async fn source_and_target_are_normalized() -> Result<()> {
    let server = TestServer::spawn().await?;
    server.core.on("ListMappings", existing(&[]));
    server.core.on("AddMapping", json!({}));

    let res = server
        .post(server.tenant_url("/mappings"))
        .json(&json!({
            "mapping_name": "orders-sync",
            "mapping_type": "table",
            "mapping_source": "sales.orders",
            "mapping_target": "redb://database/warehouse/table/orders"
        }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CREATED);

    let adds = server.core.calls_to("AddMapping");
    assert_eq!(adds[0]["mapping_source"], "redb://data/database/sales/table/orders");
    assert_eq!(adds[0]["mapping_target"], "redb://data/database/warehouse/table/orders");
    Ok(())
}

#[tokio::test]
async fn malformed_source_is_a_bad_request() -> Result<()> {
    let server = TestServer::spawn().await?;

    let res = server
        .post(server.tenant_url("/mappings"))
        .json(&json!({
            "mapping_name": "orders-sync",
            "mapping_type": "table",
            "mapping_source": "ftp://files/orders"
        }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    error_envelope(res).await?;
    assert!(server.core.calls().is_empty());
    Ok(())
}

#[tokio::test]
async fn listing_failure_stops_the_create() -> Result<()> {
    let server = TestServer::spawn().await?;
    server.core.fail("ListMappings", Code::Unavailable, "core is restarting");

    let res = server
        .post(server.tenant_url("/mappings"))
        .json(&json!({"mapping_name": "orders", "mapping_type": "table"}))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = error_envelope(res).await?;
    assert_eq!(body["message"], "Failed to create mapping");
    assert!(server.core.calls_to("AddMapping").is_empty());
    Ok(())
}

#[tokio::test]
async fn rules_are_added_and_removed() -> Result<()> {
    let server = TestServer::spawn().await?;
    server.core.on(
        "AddMappingRule",
        json!({"mapping_rule": {"mapping_rule_name": "copy-total", "mapping_rule_source": "redb://data/database/sales/table/orders/column/total"}}),
    );
    server.core.on("RemoveMappingRule", json!({}));

    let res = server
        .post(server.tenant_url("/mappings/orders-sync/rules"))
        .json(&json!({
            "mapping_rule_name": "copy-total",
            "mapping_rule_source": "sales.orders.total",
            "mapping_rule_target": "warehouse.orders.total"
        }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CREATED);
    let body: Value = res.json().await?;
    assert_eq!(body["mapping_rule"]["mapping_rule_name"], "copy-total");

    let adds = server.core.calls_to("AddMappingRule");
    assert_eq!(adds[0]["mapping_name"], "orders-sync");
    assert_eq!(
        adds[0]["mapping_rule_target"],
        "redb://data/database/warehouse/table/orders/column/total"
    );

    let res = server
        .delete(server.tenant_url("/mappings/orders-sync/rules/copy-total"))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await?;
    assert_eq!(body["status"], "deleted");
    let removes = server.core.calls_to("RemoveMappingRule");
    assert_eq!(removes[0]["mapping_rule_name"], "copy-total");
    Ok(())
}

#[tokio::test]
async fn copy_data_aggregates_the_stream() -> Result<()> {
    let server = TestServer::spawn().await?;
    server.core.stream(
        "CopyMappingData",
        vec![
            json!({"status": "in_progress", "rows_copied": 100, "tables_copied": ["orders"]}),
            json!({"status": "in_progress", "rows_copied": 50, "tables_copied": ["orders", "customers"]}),
            json!({"status": "completed", "rows_copied": 0, "message": "copy complete"}),
        ],
    );

    let res = server
        .post(server.tenant_url("/mappings/orders-sync/copy-data"))
        .json(&json!({"batch_size": 500}))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await?;
    assert_eq!(body["success"], true);
    assert_eq!(body["status"], "success");
    assert_eq!(body["rows_copied"], 150);
    assert_eq!(body["tables_copied"], json!(["orders", "customers"]));
    assert_eq!(body["message"], "copy complete");

    let calls = server.core.calls_to("CopyMappingData");
    assert_eq!(calls[0]["mapping_name"], "orders-sync");
    assert_eq!(calls[0]["batch_size"], 500);
    Ok(())
}

#[tokio::test]
async fn copy_data_reports_row_errors() -> Result<()> {
    let server = TestServer::spawn().await?;
    server.core.stream(
        "CopyMappingData",
        vec![json!({"status": "in_progress", "rows_copied": 9, "errors": ["row 10 violates constraint"]})],
    );

    // No body at all is accepted
    let res = server
        .post(server.tenant_url("/mappings/orders-sync/copy-data"))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await?;
    assert_eq!(body["success"], false);
    assert_eq!(body["status"], "failure");
    assert_eq!(body["errors"], json!(["row 10 violates constraint"]));
    Ok(())
}

#[tokio::test]
async fn copy_data_stream_failure_maps_its_status() -> Result<()> {
    let server = TestServer::spawn().await?;
    server.core.stream_then_fail(
        "CopyMappingData",
        vec![json!({"rows_copied": 5})],
        Code::NotFound,
        "mapping orders-sync not found",
    );

    let res = server
        .post(server.tenant_url("/mappings/orders-sync/copy-data"))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let body = error_envelope(res).await?;
    assert_eq!(body["error"], "mapping orders-sync not found");
    assert_eq!(body["message"], "Failed to copy mapping data");
    Ok(())
}

#[tokio::test]
async fn copy_data_has_one_deadline_for_setup_and_drain() -> Result<()> {
    let server = TestServer::spawn_with(TimeoutConfig {
        bulk_secs: 1,
        ..TimeoutConfig::default()
    })
    .await?;
    server
        .core
        .stream("CopyMappingData", vec![json!({"status": "completed", "rows_copied": 3})]);
    // Opening and draining each fit the bound alone, but not together
    server.core.delay(Duration::from_millis(600));

    let res = server
        .post(server.tenant_url("/mappings/orders-sync/copy-data"))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = error_envelope(res).await?;
    assert_eq!(body["message"], "Failed to copy mapping data");
    Ok(())
}
