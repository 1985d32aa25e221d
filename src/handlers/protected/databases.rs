// handlers/protected/databases.rs - /{tenant_url}/api/v1/databases
//
// Databases are connected and disconnected rather than added and deleted;
// the generic create and remove handlers serve those routes under the
// connect / disconnect names.

use std::collections::HashMap;

use axum::extract::State;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::api::extract::{require, require_one_of};
use crate::api::{ApiPath, MutationResponse, Status, Validate};
use crate::auth::Profile;
use crate::error::ApiError;
use crate::handlers::crud::{self, Empty, Op, Resource};
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::{AppState, Deadline};

pub const DATABASE_TYPES: &[&str] = &[
    "postgres",
    "mysql",
    "mariadb",
    "sqlserver",
    "oracle",
    "mongodb",
    "redis",
    "cassandra",
    "elasticsearch",
    "neo4j",
    "clickhouse",
    "snowflake",
];

pub struct Databases;

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Database {
    pub tenant_id: String,
    pub workspace_id: String,
    pub database_id: String,
    pub database_name: String,
    pub database_description: String,
    pub database_type: String,
    pub database_vendor: String,
    pub database_version: String,
    pub database_status: String,
    pub database_db_name: String,
    pub instance_id: String,
    pub instance_name: String,
    pub instance_host: String,
    pub instance_port: i32,
    pub environment_id: String,
    pub owner_id: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ConnectDatabase {
    pub database_name: String,
    pub database_type: String,
    #[serde(default)]
    pub database_description: String,
    #[serde(default)]
    pub database_vendor: String,
    pub host: String,
    pub port: u16,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub db_name: String,
    #[serde(default)]
    pub workspace_name: String,
    #[serde(default)]
    pub environment_id: String,
    #[serde(default)]
    pub node_id: String,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_enabled() -> bool {
    true
}

impl Validate for ConnectDatabase {
    fn validate(&self) -> Result<(), ApiError> {
        require("database_name", &self.database_name)?;
        require("host", &self.host)?;
        require_one_of("database_type", &self.database_type, DATABASE_TYPES)
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ModifyDatabase {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database_name_new: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database_description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub db_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
}

impl Validate for ModifyDatabase {
    fn validate(&self) -> Result<(), ApiError> {
        match &self.database_name_new {
            Some(name) => require("database_name_new", name),
            None => Ok(()),
        }
    }
}

impl Resource for Databases {
    const SINGULAR: &'static str = "database";
    const PLURAL: &'static str = "databases";
    const LABEL: &'static str = "database";
    const LABEL_PLURAL: &'static str = "databases";
    const KEY_FIELD: &'static str = "database_name";
    const RPC_NOUN: &'static str = "Database";
    const RPC_NOUN_PLURAL: &'static str = "Databases";

    type Entity = Database;
    type Create = ConnectDatabase;
    type Modify = ModifyDatabase;
    type ListQuery = Empty;

    fn rpc(op: Op) -> String {
        match op {
            Op::Create => "ConnectDatabase".to_string(),
            Op::Delete => "DisconnectDatabase".to_string(),
            Op::List => "ListDatabases".to_string(),
            Op::Show => "ShowDatabase".to_string(),
            Op::Modify => "ModifyDatabase".to_string(),
        }
    }

    fn failure(op: Op) -> String {
        match op {
            Op::Create => "Failed to connect database".to_string(),
            Op::Delete => "Failed to disconnect database".to_string(),
            Op::List => "Failed to list databases".to_string(),
            Op::Show => "Failed to get database".to_string(),
            Op::Modify => "Failed to update database".to_string(),
        }
    }

    fn success(op: Op) -> String {
        match op {
            Op::Create => "Database connected successfully".to_string(),
            Op::Delete => "Database disconnected successfully".to_string(),
            _ => "Database updated successfully".to_string(),
        }
    }

    fn success_status(op: Op) -> Status {
        match op {
            Op::Create => Status::Connected,
            Op::Delete => Status::Disconnected,
            Op::Modify => Status::Updated,
            Op::List | Op::Show => Status::Success,
        }
    }
}

/// POST /{tenant_url}/api/v1/databases/:database_name/reconnect
pub async fn reconnect(
    State(state): State<AppState>,
    profile: Profile,
    ApiPath(params): ApiPath<HashMap<String, String>>,
) -> ApiResult<MutationResponse> {
    let failure = "Failed to reconnect database";
    let database_name = crud::path_param(&params, Databases::KEY_FIELD)?;
    let request = crud::scoped_request(&profile, &Empty {}, &[(Databases::KEY_FIELD, database_name)])?;
    let response: Value = state
        .core_call("ReconnectDatabase", &request, Deadline::Default, failure)
        .await?;

    let mut envelope = crud::mutation_envelope::<Databases>(&response, Op::Modify, failure)?;
    envelope.status = Status::Connected;
    if crud::backend_message(&response).is_none() {
        envelope.message = "Database reconnected successfully".to_string();
    }
    Ok(ApiResponse::success(envelope))
}
