// handlers/protected/policies.rs - /{tenant_url}/api/v1/policies

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::api::extract::require;
use crate::api::Validate;
use crate::error::ApiError;
use crate::handlers::crud::{Empty, Resource};

pub struct Policies;

/// `policy_object` is the policy document itself, passed through untouched.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Policy {
    pub tenant_id: String,
    pub policy_id: String,
    pub policy_name: String,
    pub policy_description: String,
    pub policy_object: Value,
    pub owner_id: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreatePolicy {
    pub policy_name: String,
    #[serde(default)]
    pub policy_description: String,
    pub policy_object: Value,
}

impl Validate for CreatePolicy {
    fn validate(&self) -> Result<(), ApiError> {
        require("policy_name", &self.policy_name)?;
        if self.policy_object.is_null() {
            return Err(ApiError::missing_field("policy_object"));
        }
        Ok(())
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ModifyPolicy {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub policy_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub policy_description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub policy_object: Option<Value>,
}

impl Validate for ModifyPolicy {}

impl Resource for Policies {
    const SINGULAR: &'static str = "policy";
    const PLURAL: &'static str = "policies";
    const LABEL: &'static str = "policy";
    const LABEL_PLURAL: &'static str = "policies";
    const KEY_FIELD: &'static str = "policy_id";
    const RPC_NOUN: &'static str = "Policy";
    const RPC_NOUN_PLURAL: &'static str = "Policies";

    type Entity = Policy;
    type Create = CreatePolicy;
    type Modify = ModifyPolicy;
    type ListQuery = Empty;
}
