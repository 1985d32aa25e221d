// handlers/elevated/tenants.rs - /api/v1/tenants
//
// The path key `tenant_id` names the target tenant and replaces the caller's
// own tenant id in the backend request; `owner_id` stays the caller.

use serde::{Deserialize, Serialize};

use crate::api::extract::require;
use crate::api::Validate;
use crate::error::ApiError;
use crate::handlers::crud::{Empty, Resource};

pub struct Tenants;

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Tenant {
    pub tenant_id: String,
    pub tenant_name: String,
    pub tenant_description: String,
    pub tenant_url: String,
    pub status: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateTenant {
    pub tenant_name: String,
    pub tenant_url: String,
    #[serde(default)]
    pub tenant_description: String,
    pub user_email: String,
    pub user_password: String,
}

impl Validate for CreateTenant {
    fn validate(&self) -> Result<(), ApiError> {
        require("tenant_name", &self.tenant_name)?;
        require("tenant_url", &self.tenant_url)?;
        if self.tenant_url.contains('/') {
            return Err(ApiError::bad_request("tenant_url must be a single path segment", "Invalid request"));
        }
        require("user_email", &self.user_email)?;
        require("user_password", &self.user_password)
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ModifyTenant {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tenant_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tenant_description: Option<String>,
}

impl Validate for ModifyTenant {}

impl Resource for Tenants {
    const SINGULAR: &'static str = "tenant";
    const PLURAL: &'static str = "tenants";
    const LABEL: &'static str = "tenant";
    const LABEL_PLURAL: &'static str = "tenants";
    const KEY_FIELD: &'static str = "tenant_id";
    const RPC_NOUN: &'static str = "Tenant";
    const RPC_NOUN_PLURAL: &'static str = "Tenants";

    type Entity = Tenant;
    type Create = CreateTenant;
    type Modify = ModifyTenant;
    type ListQuery = Empty;
}
