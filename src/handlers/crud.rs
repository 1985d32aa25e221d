//! Generic resource handlers.
//!
//! Every resource family behind the gateway has the same five operations with
//! the same shape: pull parameters, take the authenticated profile, build a
//! backend request scoped to that profile, call the core service, and convert
//! the reply. A family implements [`Resource`] (names, DTOs, optional field
//! mapping) and mounts `list::<R>`, `show::<R>`, `create::<R>`,
//! `modify::<R>` and `remove::<R>` on its routes.

use std::collections::HashMap;

use axum::extract::State;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::api::{ApiJson, ApiPath, ApiQuery, MutationResponse, Status, Validate};
use crate::auth::Profile;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::{AppState, Deadline};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    List,
    Show,
    Create,
    Modify,
    Delete,
}

/// Placeholder body / query for operations that take none.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Empty {}

impl Validate for Empty {}

pub trait Resource: Send + Sync + 'static {
    /// JSON key of one entity, e.g. `region`.
    const SINGULAR: &'static str;
    /// JSON key of the collection, e.g. `regions`.
    const PLURAL: &'static str;
    /// Human-readable names used in messages.
    const LABEL: &'static str;
    const LABEL_PLURAL: &'static str;
    /// Route parameter and backend request field naming one entity.
    const KEY_FIELD: &'static str;
    /// Backend RPC nouns: `ListRegions`, `ShowRegion`, ...
    const RPC_NOUN: &'static str;
    const RPC_NOUN_PLURAL: &'static str;

    /// REST shape of one entity. Backend fields it does not name are dropped.
    type Entity: Serialize + DeserializeOwned + Send;
    type Create: Serialize + DeserializeOwned + Validate + Send;
    type Modify: Serialize + DeserializeOwned + Validate + Send;
    type ListQuery: Serialize + DeserializeOwned + Validate + Send;

    fn rpc(op: Op) -> String {
        match op {
            Op::List => format!("List{}", Self::RPC_NOUN_PLURAL),
            Op::Show => format!("Show{}", Self::RPC_NOUN),
            Op::Create => format!("Add{}", Self::RPC_NOUN),
            Op::Modify => format!("Modify{}", Self::RPC_NOUN),
            Op::Delete => format!("Delete{}", Self::RPC_NOUN),
        }
    }

    fn failure(op: Op) -> String {
        match op {
            Op::List => format!("Failed to list {}", Self::LABEL_PLURAL),
            Op::Show => format!("Failed to get {}", Self::LABEL),
            Op::Create => format!("Failed to create {}", Self::LABEL),
            Op::Modify => format!("Failed to update {}", Self::LABEL),
            Op::Delete => format!("Failed to delete {}", Self::LABEL),
        }
    }

    fn success(op: Op) -> String {
        let verb = match op {
            Op::Create => "created",
            Op::Modify => "updated",
            Op::Delete => "deleted",
            Op::List | Op::Show => "retrieved",
        };
        format!("{} {} successfully", capitalize(Self::LABEL), verb)
    }

    fn success_status(op: Op) -> Status {
        match op {
            Op::Create => Status::Created,
            Op::Modify => Status::Updated,
            Op::Delete => Status::Deleted,
            Op::List | Op::Show => Status::Success,
        }
    }

    /// Validate and normalize a create body before it is forwarded.
    fn prepare_create(body: Self::Create) -> Result<Self::Create, ApiError> {
        body.validate()?;
        Ok(body)
    }

    fn prepare_modify(body: Self::Modify) -> Result<Self::Modify, ApiError> {
        body.validate()?;
        Ok(body)
    }
}

/// GET collection
pub async fn list<R: Resource>(
    State(state): State<AppState>,
    profile: Profile,
    ApiQuery(query): ApiQuery<R::ListQuery>,
) -> ApiResult<Value> {
    query.validate()?;
    let failure = R::failure(Op::List);
    let request = scoped_request(&profile, &query, &[])?;
    let response: Value = state
        .core_call(&R::rpc(Op::List), &request, Deadline::Default, &failure)
        .await?;
    let entities: Vec<R::Entity> = take_list(&response, R::PLURAL, &failure)?;
    Ok(ApiResponse::success(keyed(R::PLURAL, &entities, &failure)?))
}

/// GET one entity
pub async fn show<R: Resource>(
    State(state): State<AppState>,
    profile: Profile,
    ApiPath(params): ApiPath<HashMap<String, String>>,
) -> ApiResult<Value> {
    let failure = R::failure(Op::Show);
    let key = path_param(&params, R::KEY_FIELD)?;
    let request = scoped_request(&profile, &Empty {}, &[(R::KEY_FIELD, key)])?;
    let response: Value = state
        .core_call(&R::rpc(Op::Show), &request, Deadline::Default, &failure)
        .await?;
    let entity: R::Entity = take_entity(&response, R::SINGULAR, &failure)?;
    Ok(ApiResponse::success(keyed(R::SINGULAR, &entity, &failure)?))
}

/// POST collection
pub async fn create<R: Resource>(
    State(state): State<AppState>,
    profile: Profile,
    ApiJson(body): ApiJson<R::Create>,
) -> ApiResult<MutationResponse> {
    let body = R::prepare_create(body)?;
    let failure = R::failure(Op::Create);
    let request = scoped_request(&profile, &body, &[])?;
    let response: Value = state
        .core_call(&R::rpc(Op::Create), &request, Deadline::Default, &failure)
        .await?;
    Ok(ApiResponse::created(mutation_envelope::<R>(&response, Op::Create, &failure)?))
}

/// PUT one entity
pub async fn modify<R: Resource>(
    State(state): State<AppState>,
    profile: Profile,
    ApiPath(params): ApiPath<HashMap<String, String>>,
    ApiJson(body): ApiJson<R::Modify>,
) -> ApiResult<MutationResponse> {
    let key = path_param(&params, R::KEY_FIELD)?;
    let body = R::prepare_modify(body)?;
    let failure = R::failure(Op::Modify);
    let request = scoped_request(&profile, &body, &[(R::KEY_FIELD, key)])?;
    let response: Value = state
        .core_call(&R::rpc(Op::Modify), &request, Deadline::Default, &failure)
        .await?;
    Ok(ApiResponse::success(mutation_envelope::<R>(&response, Op::Modify, &failure)?))
}

/// DELETE one entity
pub async fn remove<R: Resource>(
    State(state): State<AppState>,
    profile: Profile,
    ApiPath(params): ApiPath<HashMap<String, String>>,
) -> ApiResult<MutationResponse> {
    let failure = R::failure(Op::Delete);
    let key = path_param(&params, R::KEY_FIELD)?;
    let request = scoped_request(&profile, &Empty {}, &[(R::KEY_FIELD, key)])?;
    let response: Value = state
        .core_call(&R::rpc(Op::Delete), &request, Deadline::Default, &failure)
        .await?;
    Ok(ApiResponse::success(mutation_envelope::<R>(&response, Op::Delete, &failure)?))
}

/// Backend request: the body's fields, then identity from the profile, then
/// path keys. Identity always comes from the profile; `tenant_id` and
/// `owner_id` sent by the client are discarded.
pub fn scoped_request<B: Serialize + ?Sized>(
    profile: &Profile,
    body: &B,
    keys: &[(&str, &str)],
) -> Result<Value, ApiError> {
    let mut request = match serde_json::to_value(body) {
        Ok(Value::Object(map)) => map,
        Ok(Value::Null) => Map::new(),
        Ok(other) => {
            return Err(ApiError::internal_server_error(
                format!("backend request body must be an object, got {}", other),
                "Failed to build backend request",
            ))
        }
        Err(e) => {
            return Err(ApiError::internal_server_error(e.to_string(), "Failed to build backend request"))
        }
    };
    request.insert("tenant_id".to_string(), Value::String(profile.tenant_id.clone()));
    request.insert("owner_id".to_string(), Value::String(profile.user_id.clone()));
    for (field, value) in keys {
        request.insert(field.to_string(), Value::String(value.to_string()));
    }
    Ok(Value::Object(request))
}

pub fn path_param<'a>(params: &'a HashMap<String, String>, name: &str) -> Result<&'a str, ApiError> {
    match params.get(name).map(|v| v.trim()) {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(ApiError::missing_field(name)),
    }
}

/// `{"<key>": value}`
pub fn keyed<T: Serialize + ?Sized>(key: &str, value: &T, failure: &str) -> Result<Value, ApiError> {
    let value = serde_json::to_value(value)
        .map_err(|e| ApiError::internal_server_error(e.to_string(), failure))?;
    let mut body = Map::new();
    body.insert(key.to_string(), value);
    Ok(Value::Object(body))
}

/// Collection field of a backend reply. Absent or null means empty.
pub fn take_list<E: DeserializeOwned>(response: &Value, key: &str, failure: &str) -> Result<Vec<E>, ApiError> {
    match response.get(key) {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(items) => serde_json::from_value(items.clone()).map_err(|e| {
            ApiError::internal_server_error(format!("unexpected backend {}: {}", key, e), failure)
        }),
    }
}

/// Required entity field of a backend reply.
pub fn take_entity<E: DeserializeOwned>(response: &Value, key: &str, failure: &str) -> Result<E, ApiError> {
    match response.get(key) {
        None | Some(Value::Null) => Err(ApiError::internal_server_error(
            format!("backend response is missing {}", key),
            failure,
        )),
        Some(entity) => serde_json::from_value(entity.clone()).map_err(|e| {
            ApiError::internal_server_error(format!("unexpected backend {}: {}", key, e), failure)
        }),
    }
}

/// `{"message", "success", "status", "<singular>"?}` for a mutating call.
/// The backend's message is used when it sent one.
pub fn mutation_envelope<R: Resource>(
    response: &Value,
    op: Op,
    failure: &str,
) -> Result<MutationResponse, ApiError> {
    let message = backend_message(response).unwrap_or_else(|| R::success(op));
    let mut envelope = MutationResponse::new(message, R::success_status(op));
    if let Some(entity) = response.get(R::SINGULAR).filter(|v| !v.is_null()) {
        let entity: R::Entity = serde_json::from_value(entity.clone()).map_err(|e| {
            ApiError::internal_server_error(format!("unexpected backend {}: {}", R::SINGULAR, e), failure)
        })?;
        let entity = serde_json::to_value(entity)
            .map_err(|e| ApiError::internal_server_error(e.to_string(), failure))?;
        envelope = envelope.with_entity(R::SINGULAR, entity);
    }
    Ok(envelope)
}

pub fn backend_message(response: &Value) -> Option<String> {
    response
        .get("message")
        .and_then(Value::as_str)
        .filter(|m| !m.is_empty())
        .map(str::to_string)
}

fn capitalize(label: &str) -> String {
    let mut chars = label.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
