// handlers/protected/resources.rs - /{tenant_url}/api/v1/resources
//
// Read-only views over discovered resource containers (tables, collections,
// topics, ...) and the items inside them (columns, fields, ...).

use axum::extract::State;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::api::extract::require_one_of;
use crate::api::{ApiPath, ApiQuery, Validate};
use crate::auth::Profile;
use crate::error::ApiError;
use crate::handlers::crud::{self, Empty};
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::{AppState, Deadline};

pub const CONTAINER_TYPES: &[&str] = &[
    "tabular",
    "document",
    "graph",
    "vector",
    "keyvalue",
    "search",
    "timeseries",
    "stream",
    "mcp",
    "webhook",
];

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ResourceContainer {
    pub tenant_id: String,
    pub container_id: String,
    pub container_name: String,
    pub container_type: String,
    pub container_uri: String,
    pub database_id: String,
    pub database_name: String,
    pub item_count: i64,
    pub status: String,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ResourceItem {
    pub tenant_id: String,
    pub item_id: String,
    pub item_name: String,
    pub item_uri: String,
    pub container_id: String,
    pub data_type: String,
    pub is_nullable: bool,
    pub is_primary_key: bool,
    pub is_unique: bool,
    pub is_indexed: bool,
    pub default_value: Value,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ListContainersQuery {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub container_type: Option<String>,
}

impl Validate for ListContainersQuery {
    fn validate(&self) -> Result<(), ApiError> {
        match &self.container_type {
            Some(container_type) => require_one_of("container_type", container_type, CONTAINER_TYPES),
            None => Ok(()),
        }
    }
}

/// GET /{tenant_url}/api/v1/resources/containers?container_type=
pub async fn list_containers(
    State(state): State<AppState>,
    profile: Profile,
    ApiQuery(query): ApiQuery<ListContainersQuery>,
) -> ApiResult<Value> {
    query.validate()?;
    let failure = "Failed to list resource containers";
    let request = crud::scoped_request(&profile, &query, &[])?;
    let response: Value = state
        .core_call("ListResourceContainers", &request, Deadline::Default, failure)
        .await?;
    let containers: Vec<ResourceContainer> = crud::take_list(&response, "containers", failure)?;
    Ok(ApiResponse::success(crud::keyed("containers", &containers, failure)?))
}

/// GET /{tenant_url}/api/v1/resources/containers/:container_id
pub async fn show_container(
    State(state): State<AppState>,
    profile: Profile,
    ApiPath((_tenant_url, container_id)): ApiPath<(String, String)>,
) -> ApiResult<Value> {
    let failure = "Failed to get resource container";
    let request = crud::scoped_request(&profile, &Empty {}, &[("container_id", container_id.as_str())])?;
    let response: Value = state
        .core_call("ShowResourceContainer", &request, Deadline::Default, failure)
        .await?;
    let container: ResourceContainer = crud::take_entity(&response, "container", failure)?;
    Ok(ApiResponse::success(crud::keyed("container", &container, failure)?))
}

/// GET /{tenant_url}/api/v1/resources/containers/:container_id/items
pub async fn list_items(
    State(state): State<AppState>,
    profile: Profile,
    ApiPath((_tenant_url, container_id)): ApiPath<(String, String)>,
) -> ApiResult<Value> {
    let failure = "Failed to list resource items";
    let request = crud::scoped_request(&profile, &Empty {}, &[("container_id", container_id.as_str())])?;
    let response: Value = state
        .core_call("ListResourceItems", &request, Deadline::Default, failure)
        .await?;
    let items: Vec<ResourceItem> = crud::take_list(&response, "items", failure)?;
    Ok(ApiResponse::success(crud::keyed("items", &items, failure)?))
}

/// GET /{tenant_url}/api/v1/resources/items/:item_id
pub async fn show_item(
    State(state): State<AppState>,
    profile: Profile,
    ApiPath((_tenant_url, item_id)): ApiPath<(String, String)>,
) -> ApiResult<Value> {
    let failure = "Failed to get resource item";
    let request = crud::scoped_request(&profile, &Empty {}, &[("item_id", item_id.as_str())])?;
    let response: Value = state
        .core_call("ShowResourceItem", &request, Deadline::Default, failure)
        .await?;
    let item: ResourceItem = crud::take_entity(&response, "item", failure)?;
    Ok(ApiResponse::success(crud::keyed("item", &item, failure)?))
}
