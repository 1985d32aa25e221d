// handlers/protected/workspaces.rs - /{tenant_url}/api/v1/workspaces

use serde::{Deserialize, Serialize};

use crate::api::extract::require;
use crate::api::Validate;
use crate::error::ApiError;
use crate::handlers::crud::{Empty, Resource};

pub struct Workspaces;

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Workspace {
    pub tenant_id: String,
    pub workspace_id: String,
    pub workspace_name: String,
    pub workspace_description: String,
    pub instance_count: i64,
    pub database_count: i64,
    pub owner_id: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateWorkspace {
    pub workspace_name: String,
    #[serde(default)]
    pub workspace_description: String,
}

impl Validate for CreateWorkspace {
    fn validate(&self) -> Result<(), ApiError> {
        require("workspace_name", &self.workspace_name)
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ModifyWorkspace {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workspace_name_new: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workspace_description: Option<String>,
}

impl Validate for ModifyWorkspace {
    fn validate(&self) -> Result<(), ApiError> {
        match &self.workspace_name_new {
            Some(name) => require("workspace_name_new", name),
            None => Ok(()),
        }
    }
}

impl Resource for Workspaces {
    const SINGULAR: &'static str = "workspace";
    const PLURAL: &'static str = "workspaces";
    const LABEL: &'static str = "workspace";
    const LABEL_PLURAL: &'static str = "workspaces";
    const KEY_FIELD: &'static str = "workspace_name";
    const RPC_NOUN: &'static str = "Workspace";
    const RPC_NOUN_PLURAL: &'static str = "Workspaces";

    type Entity = Workspace;
    type Create = CreateWorkspace;
    type Modify = ModifyWorkspace;
    type ListQuery = Empty;
}
