// handlers/elevated/mesh.rs - /api/v1/mesh and /api/v1/mesh/nodes
//
// There is one mesh per deployment, so no route carries a key.

use axum::extract::State;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::api::extract::require;
use crate::api::{ApiJson, MutationResponse, Validate};
use crate::auth::Profile;
use crate::error::ApiError;
use crate::handlers::crud::{self, Empty, Op, Resource};
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::{AppState, Deadline};

pub struct MeshResource;

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Mesh {
    pub mesh_id: String,
    pub mesh_name: String,
    pub mesh_description: String,
    pub allow_join: bool,
    pub node_count: i64,
    pub status: String,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Node {
    pub node_id: String,
    pub node_name: String,
    pub node_description: String,
    pub node_platform: String,
    pub node_version: String,
    pub region_id: String,
    pub region_name: String,
    pub ip_address: String,
    pub port: i32,
    pub status: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SeedMesh {
    pub mesh_name: String,
    #[serde(default)]
    pub mesh_description: String,
    #[serde(default)]
    pub allow_join: bool,
}

impl Validate for SeedMesh {
    fn validate(&self) -> Result<(), ApiError> {
        require("mesh_name", &self.mesh_name)
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ModifyMesh {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mesh_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mesh_description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allow_join: Option<bool>,
}

impl Validate for ModifyMesh {}

impl Resource for MeshResource {
    const SINGULAR: &'static str = "mesh";
    const PLURAL: &'static str = "meshes";
    const LABEL: &'static str = "mesh";
    const LABEL_PLURAL: &'static str = "meshes";
    const KEY_FIELD: &'static str = "mesh_id";
    const RPC_NOUN: &'static str = "Mesh";
    const RPC_NOUN_PLURAL: &'static str = "Meshes";

    type Entity = Mesh;
    type Create = SeedMesh;
    type Modify = ModifyMesh;
    type ListQuery = Empty;

    fn rpc(op: Op) -> String {
        match op {
            Op::Create => "SeedMesh".to_string(),
            Op::Delete => "DropMesh".to_string(),
            Op::Modify => "ModifyMesh".to_string(),
            Op::Show | Op::List => "ShowMesh".to_string(),
        }
    }

    fn failure(op: Op) -> String {
        match op {
            Op::Create => "Failed to seed mesh".to_string(),
            Op::Delete => "Failed to drop mesh".to_string(),
            Op::Modify => "Failed to update mesh".to_string(),
            Op::Show | Op::List => "Failed to get mesh".to_string(),
        }
    }

    fn success(op: Op) -> String {
        match op {
            Op::Create => "Mesh seeded successfully".to_string(),
            Op::Delete => "Mesh dropped successfully".to_string(),
            _ => "Mesh updated successfully".to_string(),
        }
    }
}

/// GET /api/v1/mesh
pub async fn show(State(state): State<AppState>, profile: Profile) -> ApiResult<Value> {
    let failure = MeshResource::failure(Op::Show);
    let request = crud::scoped_request(&profile, &Empty {}, &[])?;
    let response: Value = state
        .core_call(&MeshResource::rpc(Op::Show), &request, Deadline::Default, &failure)
        .await?;
    let mesh: Mesh = crud::take_entity(&response, MeshResource::SINGULAR, &failure)?;
    Ok(ApiResponse::success(crud::keyed(MeshResource::SINGULAR, &mesh, &failure)?))
}

/// POST /api/v1/mesh - seed a new mesh from this node
pub async fn seed(
    State(state): State<AppState>,
    profile: Profile,
    ApiJson(body): ApiJson<SeedMesh>,
) -> ApiResult<MutationResponse> {
    let body = MeshResource::prepare_create(body)?;
    mutate(&state, &profile, &body, Op::Create)
        .await
        .map(ApiResponse::created)
}

/// PUT /api/v1/mesh
pub async fn modify(
    State(state): State<AppState>,
    profile: Profile,
    ApiJson(body): ApiJson<ModifyMesh>,
) -> ApiResult<MutationResponse> {
    let body = MeshResource::prepare_modify(body)?;
    mutate(&state, &profile, &body, Op::Modify)
        .await
        .map(ApiResponse::success)
}

/// DELETE /api/v1/mesh
pub async fn drop_mesh(State(state): State<AppState>, profile: Profile) -> ApiResult<MutationResponse> {
    mutate(&state, &profile, &Empty {}, Op::Delete)
        .await
        .map(ApiResponse::success)
}

async fn mutate<B: Serialize>(
    state: &AppState,
    profile: &Profile,
    body: &B,
    op: Op,
) -> Result<MutationResponse, ApiError> {
    let failure = MeshResource::failure(op);
    let request = crud::scoped_request(profile, body, &[])?;
    let response: Value = state
        .core_call(&MeshResource::rpc(op), &request, Deadline::Default, &failure)
        .await?;
    crud::mutation_envelope::<MeshResource>(&response, op, &failure)
}

/// GET /api/v1/mesh/nodes
pub async fn list_nodes(State(state): State<AppState>, profile: Profile) -> ApiResult<Value> {
    let failure = "Failed to list nodes";
    let request = crud::scoped_request(&profile, &Empty {}, &[])?;
    let response: Value = state
        .core_call("ListNodes", &request, Deadline::Default, failure)
        .await?;
    let nodes: Vec<Node> = crud::take_list(&response, "nodes", failure)?;
    Ok(ApiResponse::success(crud::keyed("nodes", &nodes, failure)?))
}
