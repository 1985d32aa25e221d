// Router assembly.
//
// Request flow (outermost first): content-type default → CORS → trace →
// body limit → authenticate → authorize → track_operations → handler.
// The auth chain is a route layer, so unmatched paths reach the 404
// fallback without needing a token.

use axum::{
    extract::DefaultBodyLimit,
    http::{header::CONTENT_TYPE, HeaderValue, Method, Uri},
    middleware::from_fn_with_state,
    routing::{delete, get, post},
    Router,
};
use tower_http::{cors::CorsLayer, set_header::SetResponseHeaderLayer, trace::TraceLayer};

use crate::config::ApiConfig;
use crate::error::ApiError;
use crate::handlers::crud;
use crate::handlers::elevated::{mesh, tenants::Tenants};
use crate::handlers::protected::{
    anchors::Anchors, auth, commits, data_products::DataProducts, databases, databases::Databases, mappings,
    mappings::Mappings, mcp::McpResources, mcp::McpServers, mcp::McpTools, policies::Policies, regions::Regions,
    relationships::Relationships, resources, satellites::Satellites, workspaces::Workspaces,
};
use crate::handlers::public;
use crate::middleware::{authenticate, authorize, track_operations};
use crate::state::AppState;

pub fn app(state: AppState, api: &ApiConfig) -> Router {
    Router::new()
        .merge(public_routes())
        .merge(auth_routes())
        .merge(workspace_routes())
        .merge(region_routes())
        .merge(database_routes())
        .merge(mapping_routes())
        .merge(policy_routes())
        .merge(anchor_routes())
        .merge(satellite_routes())
        .merge(relationship_routes())
        .merge(commit_routes())
        .merge(resource_routes())
        .merge(data_product_routes())
        .merge(mcp_routes())
        .merge(tenant_routes())
        .merge(mesh_routes())
        // Innermost first: tracking wraps only the handler
        .route_layer(from_fn_with_state(state.clone(), track_operations))
        .route_layer(from_fn_with_state(state.clone(), authorize))
        .route_layer(from_fn_with_state(state.clone(), authenticate))
        .fallback(not_found)
        // Global middleware
        .layer(DefaultBodyLimit::max(api.max_request_size_bytes))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .layer(SetResponseHeaderLayer::if_not_present(
            CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        ))
        .with_state(state)
}

fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(public::health))
        .route("/api/v1/status", get(public::api_status))
        .route("/:tenant_url/api/v1/auth/login", post(public::login))
}

fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/:tenant_url/api/v1/auth/logout", post(auth::logout))
        .route("/:tenant_url/api/v1/auth/profile", get(auth::profile))
}

fn workspace_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/:tenant_url/api/v1/workspaces",
            get(crud::list::<Workspaces>).post(crud::create::<Workspaces>),
        )
        .route(
            "/:tenant_url/api/v1/workspaces/:workspace_name",
            get(crud::show::<Workspaces>)
                .put(crud::modify::<Workspaces>)
                .delete(crud::remove::<Workspaces>),
        )
}

fn region_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/:tenant_url/api/v1/regions",
            get(crud::list::<Regions>).post(crud::create::<Regions>),
        )
        .route(
            "/:tenant_url/api/v1/regions/:region_name",
            get(crud::show::<Regions>)
                .put(crud::modify::<Regions>)
                .delete(crud::remove::<Regions>),
        )
}

fn database_routes() -> Router<AppState> {
    Router::new()
        .route("/:tenant_url/api/v1/databases", get(crud::list::<Databases>))
        .route("/:tenant_url/api/v1/databases/connect", post(crud::create::<Databases>))
        .route(
            "/:tenant_url/api/v1/databases/:database_name",
            get(crud::show::<Databases>).put(crud::modify::<Databases>),
        )
        .route(
            "/:tenant_url/api/v1/databases/:database_name/reconnect",
            post(databases::reconnect),
        )
        .route(
            "/:tenant_url/api/v1/databases/:database_name/disconnect",
            delete(crud::remove::<Databases>),
        )
}

fn mapping_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/:tenant_url/api/v1/mappings",
            get(crud::list::<Mappings>).post(mappings::create),
        )
        .route(
            "/:tenant_url/api/v1/mappings/:mapping_name",
            get(crud::show::<Mappings>)
                .put(crud::modify::<Mappings>)
                .delete(crud::remove::<Mappings>),
        )
        .route("/:tenant_url/api/v1/mappings/:mapping_name/rules", post(mappings::add_rule))
        .route(
            "/:tenant_url/api/v1/mappings/:mapping_name/rules/:rule_name",
            delete(mappings::remove_rule),
        )
        .route(
            "/:tenant_url/api/v1/mappings/:mapping_name/copy-data",
            post(mappings::copy_data),
        )
}

fn policy_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/:tenant_url/api/v1/policies",
            get(crud::list::<Policies>).post(crud::create::<Policies>),
        )
        .route(
            "/:tenant_url/api/v1/policies/:policy_id",
            get(crud::show::<Policies>)
                .put(crud::modify::<Policies>)
                .delete(crud::remove::<Policies>),
        )
}

fn anchor_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/:tenant_url/api/v1/anchors",
            get(crud::list::<Anchors>).post(crud::create::<Anchors>),
        )
        .route(
            "/:tenant_url/api/v1/anchors/:anchor_name",
            get(crud::show::<Anchors>)
                .put(crud::modify::<Anchors>)
                .delete(crud::remove::<Anchors>),
        )
}

fn satellite_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/:tenant_url/api/v1/satellites",
            get(crud::list::<Satellites>).post(crud::create::<Satellites>),
        )
        .route(
            "/:tenant_url/api/v1/satellites/:satellite_name",
            get(crud::show::<Satellites>)
                .put(crud::modify::<Satellites>)
                .delete(crud::remove::<Satellites>),
        )
}

fn relationship_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/:tenant_url/api/v1/relationships",
            get(crud::list::<Relationships>).post(crud::create::<Relationships>),
        )
        .route(
            "/:tenant_url/api/v1/relationships/:relationship_name",
            get(crud::show::<Relationships>).delete(crud::remove::<Relationships>),
        )
}

fn commit_routes() -> Router<AppState> {
    Router::new()
        .route("/:tenant_url/api/v1/commits", get(commits::list))
        .route("/:tenant_url/api/v1/commits/:commit_id", get(commits::show))
}

fn resource_routes() -> Router<AppState> {
    Router::new()
        .route("/:tenant_url/api/v1/resources/containers", get(resources::list_containers))
        .route(
            "/:tenant_url/api/v1/resources/containers/:container_id",
            get(resources::show_container),
        )
        .route(
            "/:tenant_url/api/v1/resources/containers/:container_id/items",
            get(resources::list_items),
        )
        .route("/:tenant_url/api/v1/resources/items/:item_id", get(resources::show_item))
}

fn data_product_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/:tenant_url/api/v1/data-products",
            get(crud::list::<DataProducts>).post(crud::create::<DataProducts>),
        )
        .route(
            "/:tenant_url/api/v1/data-products/:product_name",
            get(crud::show::<DataProducts>)
                .put(crud::modify::<DataProducts>)
                .delete(crud::remove::<DataProducts>),
        )
}

fn mcp_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/:tenant_url/api/v1/mcp-servers",
            get(crud::list::<McpServers>).post(crud::create::<McpServers>),
        )
        .route(
            "/:tenant_url/api/v1/mcp-servers/:server_name",
            get(crud::show::<McpServers>)
                .put(crud::modify::<McpServers>)
                .delete(crud::remove::<McpServers>),
        )
        .route(
            "/:tenant_url/api/v1/mcp-resources",
            get(crud::list::<McpResources>).post(crud::create::<McpResources>),
        )
        .route(
            "/:tenant_url/api/v1/mcp-resources/:resource_name",
            get(crud::show::<McpResources>).delete(crud::remove::<McpResources>),
        )
        .route(
            "/:tenant_url/api/v1/mcp-tools",
            get(crud::list::<McpTools>).post(crud::create::<McpTools>),
        )
        .route(
            "/:tenant_url/api/v1/mcp-tools/:tool_name",
            get(crud::show::<McpTools>).delete(crud::remove::<McpTools>),
        )
}

fn tenant_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/api/v1/tenants",
            get(crud::list::<Tenants>).post(crud::create::<Tenants>),
        )
        .route(
            "/api/v1/tenants/:tenant_id",
            get(crud::show::<Tenants>)
                .put(crud::modify::<Tenants>)
                .delete(crud::remove::<Tenants>),
        )
}

fn mesh_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/api/v1/mesh",
            get(mesh::show)
                .post(mesh::seed)
                .put(mesh::modify)
                .delete(mesh::drop_mesh),
        )
        .route("/api/v1/mesh/nodes", get(mesh::list_nodes))
}

async fn not_found(method: Method, uri: Uri) -> ApiError {
    ApiError::not_found(format!("no route for {} {}", method, uri.path()), "Route not found")
}
