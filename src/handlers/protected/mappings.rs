// handlers/protected/mappings.rs - /{tenant_url}/api/v1/mappings
//
// List, show, modify and delete go through the generic handlers. Create
// assigns a unique name first; rules and copy-data are mapping-specific.

use std::collections::{HashMap, HashSet};

use axum::{body::Bytes, extract::State};
use futures::StreamExt;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::time::Instant;

use crate::api::extract::{require, require_one_of};
use crate::api::{ApiJson, ApiPath, MutationResponse, Status, Validate};
use crate::auth::Profile;
use crate::error::ApiError;
use crate::handlers::crud::{self, Empty, Op, Resource};
use crate::middleware::{ApiResponse, ApiResult};
use crate::naming::assign_unique_name;
use crate::resource_uri::ResourceUri;
use crate::rpc::{with_deadline, RpcError};
use crate::state::{AppState, Deadline};

pub const MAPPING_TYPES: &[&str] = &["table", "identity", "stream", "mcp"];

pub struct Mappings;

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Mapping {
    pub tenant_id: String,
    pub mapping_id: String,
    pub mapping_name: String,
    pub mapping_description: String,
    pub mapping_type: String,
    pub mapping_source: String,
    pub mapping_target: String,
    pub policy_ids: Vec<String>,
    pub mapping_rule_count: i64,
    pub mapping_rules: Vec<MappingRule>,
    pub owner_id: String,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MappingRule {
    pub mapping_rule_id: String,
    pub mapping_rule_name: String,
    pub mapping_rule_description: String,
    pub mapping_rule_source: String,
    pub mapping_rule_target: String,
    pub mapping_rule_transformation_name: String,
    pub mapping_rule_transformation_options: Value,
    pub mapping_rule_metadata: Value,
}

/// Source and target are optional; when given they accept either address
/// grammar and are forwarded in canonical form.
#[derive(Debug, Serialize, Deserialize)]
pub struct CreateMapping {
    pub mapping_name: String,
    pub mapping_type: String,
    #[serde(default)]
    pub mapping_description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mapping_source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mapping_target: Option<String>,
    #[serde(default)]
    pub policy_ids: Vec<String>,
}

impl Validate for CreateMapping {
    fn validate(&self) -> Result<(), ApiError> {
        require("mapping_name", &self.mapping_name)?;
        require_one_of("mapping_type", &self.mapping_type, MAPPING_TYPES)
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ModifyMapping {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mapping_name_new: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mapping_description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub policy_ids: Option<Vec<String>>,
}

impl Validate for ModifyMapping {
    fn validate(&self) -> Result<(), ApiError> {
        match &self.mapping_name_new {
            Some(name) => require("mapping_name_new", name),
            None => Ok(()),
        }
    }
}

impl Resource for Mappings {
    const SINGULAR: &'static str = "mapping";
    const PLURAL: &'static str = "mappings";
    const LABEL: &'static str = "mapping";
    const LABEL_PLURAL: &'static str = "mappings";
    const KEY_FIELD: &'static str = "mapping_name";
    const RPC_NOUN: &'static str = "Mapping";
    const RPC_NOUN_PLURAL: &'static str = "Mappings";

    type Entity = Mapping;
    type Create = CreateMapping;
    type Modify = ModifyMapping;
    type ListQuery = Empty;

    fn prepare_create(mut body: CreateMapping) -> Result<CreateMapping, ApiError> {
        body.validate()?;
        body.mapping_source = normalize_optional(body.mapping_source)?;
        body.mapping_target = normalize_optional(body.mapping_target)?;
        Ok(body)
    }
}

fn normalize_optional(uri: Option<String>) -> Result<Option<String>, ApiError> {
    match uri {
        Some(uri) if !uri.trim().is_empty() => Ok(Some(ResourceUri::normalize(&uri)?)),
        _ => Ok(None),
    }
}

/// POST /{tenant_url}/api/v1/mappings - create a mapping under a unique name
///
/// A taken name gets the first free `_N` suffix. The list-then-add sequence
/// is not atomic; the backend rejects a name taken in between with a 409.
pub async fn create(
    State(state): State<AppState>,
    profile: Profile,
    ApiJson(body): ApiJson<CreateMapping>,
) -> ApiResult<MutationResponse> {
    let mut body = Mappings::prepare_create(body)?;
    let failure = Mappings::failure(Op::Create);

    let existing = existing_mapping_names(&state, &profile, &failure).await?;
    let proposed = body.mapping_name.trim().to_string();
    body.mapping_name = assign_unique_name(&proposed, &existing).ok_or_else(|| {
        ApiError::conflict(
            format!("could not assign a unique name for mapping '{}'", proposed),
            failure.clone(),
        )
    })?;
    if body.mapping_name != proposed {
        tracing::debug!(proposed = %proposed, assigned = %body.mapping_name, "mapping name taken, using suffix");
    }

    let request = crud::scoped_request(&profile, &body, &[])?;
    let response: Value = state
        .core_call(&Mappings::rpc(Op::Create), &request, Deadline::Default, &failure)
        .await?;
    Ok(ApiResponse::created(crud::mutation_envelope::<Mappings>(
        &response,
        Op::Create,
        &failure,
    )?))
}

async fn existing_mapping_names(
    state: &AppState,
    profile: &Profile,
    failure: &str,
) -> Result<HashSet<String>, ApiError> {
    let request = crud::scoped_request(profile, &Empty {}, &[])?;
    let response: Value = state
        .core_call(&Mappings::rpc(Op::List), &request, Deadline::Default, failure)
        .await?;
    let mappings: Vec<Mapping> = crud::take_list(&response, Mappings::PLURAL, failure)?;
    Ok(mappings.into_iter().map(|m| m.mapping_name).collect())
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AddMappingRule {
    pub mapping_rule_name: String,
    #[serde(default)]
    pub mapping_rule_description: String,
    pub mapping_rule_source: String,
    pub mapping_rule_target: String,
    #[serde(default)]
    pub mapping_rule_transformation_name: String,
    #[serde(default)]
    pub mapping_rule_transformation_options: Value,
    #[serde(default)]
    pub mapping_rule_metadata: Value,
}

impl Validate for AddMappingRule {
    fn validate(&self) -> Result<(), ApiError> {
        require("mapping_rule_name", &self.mapping_rule_name)?;
        require("mapping_rule_source", &self.mapping_rule_source)?;
        require("mapping_rule_target", &self.mapping_rule_target)
    }
}

/// POST /{tenant_url}/api/v1/mappings/:mapping_name/rules - add a rule
pub async fn add_rule(
    State(state): State<AppState>,
    profile: Profile,
    ApiPath((_tenant_url, mapping_name)): ApiPath<(String, String)>,
    ApiJson(mut body): ApiJson<AddMappingRule>,
) -> ApiResult<MutationResponse> {
    body.validate()?;
    body.mapping_rule_source = ResourceUri::normalize(&body.mapping_rule_source)?;
    body.mapping_rule_target = ResourceUri::normalize(&body.mapping_rule_target)?;

    let failure = "Failed to add mapping rule";
    let request = crud::scoped_request(&profile, &body, &[("mapping_name", mapping_name.as_str())])?;
    let response: Value = state
        .core_call("AddMappingRule", &request, Deadline::Default, failure)
        .await?;

    let message = crud::backend_message(&response).unwrap_or_else(|| "Mapping rule added successfully".to_string());
    let mut envelope = MutationResponse::new(message, Status::Created);
    if response.get("mapping_rule").map_or(false, |v| !v.is_null()) {
        let rule: MappingRule = crud::take_entity(&response, "mapping_rule", failure)?;
        let rule = serde_json::to_value(rule).map_err(|e| ApiError::internal_server_error(e.to_string(), failure))?;
        envelope = envelope.with_entity("mapping_rule", rule);
    }
    Ok(ApiResponse::created(envelope))
}

/// DELETE /{tenant_url}/api/v1/mappings/:mapping_name/rules/:rule_name - remove a rule
pub async fn remove_rule(
    State(state): State<AppState>,
    profile: Profile,
    ApiPath(params): ApiPath<HashMap<String, String>>,
) -> ApiResult<MutationResponse> {
    let mapping_name = crud::path_param(&params, "mapping_name")?;
    let rule_name = crud::path_param(&params, "rule_name")?;

    let failure = "Failed to remove mapping rule";
    let request = crud::scoped_request(
        &profile,
        &Empty {},
        &[("mapping_name", mapping_name), ("mapping_rule_name", rule_name)],
    )?;
    let response: Value = state
        .core_call("RemoveMappingRule", &request, Deadline::Default, failure)
        .await?;

    let message = crud::backend_message(&response).unwrap_or_else(|| "Mapping rule removed successfully".to_string());
    Ok(ApiResponse::success(MutationResponse::new(message, Status::Deleted)))
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct CopyDataOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub batch_size: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dry_run: Option<bool>,
}

/// One progress message from the `CopyMappingData` stream.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CopyDataChunk {
    pub status: String,
    pub message: String,
    pub rows_copied: i64,
    pub tables_copied: Vec<String>,
    pub errors: Vec<String>,
}

/// Running totals over a copy-data stream.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CopyDataSummary {
    pub message: String,
    pub success: bool,
    pub status: Status,
    pub rows_copied: i64,
    pub tables_copied: Vec<String>,
    pub errors: Vec<String>,
}

impl CopyDataSummary {
    pub fn new() -> Self {
        Self {
            message: String::new(),
            success: true,
            status: Status::Pending,
            rows_copied: 0,
            tables_copied: Vec::new(),
            errors: Vec::new(),
        }
    }

    pub fn absorb(&mut self, chunk: CopyDataChunk) {
        self.rows_copied += chunk.rows_copied;
        for table in chunk.tables_copied {
            if !self.tables_copied.contains(&table) {
                self.tables_copied.push(table);
            }
        }
        if !chunk.errors.is_empty() {
            self.success = false;
            self.errors.extend(chunk.errors);
        }
        if matches!(chunk.status.as_str(), "error" | "failure" | "failed") {
            self.success = false;
        }
        if !chunk.message.is_empty() {
            self.message = chunk.message;
        }
    }

    pub fn finish(mut self) -> Self {
        self.status = if self.success { Status::Success } else { Status::Failure };
        if self.message.is_empty() {
            self.message = if self.success {
                "Mapping data copied successfully".to_string()
            } else {
                "Mapping data copy finished with errors".to_string()
            };
        }
        self
    }
}

/// POST /{tenant_url}/api/v1/mappings/:mapping_name/copy-data - bulk copy
///
/// Consumes the whole backend stream under the bulk deadline and answers once
/// with the aggregate. The body is optional.
pub async fn copy_data(
    State(state): State<AppState>,
    profile: Profile,
    ApiPath((_tenant_url, mapping_name)): ApiPath<(String, String)>,
    body: Bytes,
) -> ApiResult<CopyDataSummary> {
    let failure = "Failed to copy mapping data";
    let options: CopyDataOptions = if body.iter().all(u8::is_ascii_whitespace) {
        CopyDataOptions::default()
    } else {
        serde_json::from_slice(&body).map_err(|e| ApiError::bad_request(e.to_string(), "Invalid request body"))?
    };

    let request = crud::scoped_request(&profile, &options, &[("mapping_name", mapping_name.as_str())])?;
    // One bound covers both opening the stream and draining it
    let deadline = Instant::now() + state.deadline(Deadline::Bulk);
    let mut stream = state
        .core_stream("CopyMappingData", &request, Deadline::Bulk, failure)
        .await?;

    let summary = with_deadline(deadline.saturating_duration_since(Instant::now()), async {
        let mut summary = CopyDataSummary::new();
        while let Some(message) = stream.next().await {
            let chunk: CopyDataChunk = serde_json::from_value(message?)?;
            summary.absorb(chunk);
        }
        Ok::<_, RpcError>(summary.finish())
    })
    .await
    .map_err(|e| ApiError::from_rpc(&e, failure))?;

    tracing::info!(
        mapping_name = %mapping_name,
        rows_copied = summary.rows_copied,
        tables = summary.tables_copied.len(),
        errors = summary.errors.len(),
        "mapping data copy finished"
    );
    Ok(ApiResponse::success(summary))
}
