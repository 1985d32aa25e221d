// handlers/protected/anchors.rs - /{tenant_url}/api/v1/anchors

use serde::{Deserialize, Serialize};

use crate::api::extract::require;
use crate::api::Validate;
use crate::error::ApiError;
use crate::handlers::crud::{Empty, Resource};

pub struct Anchors;

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Anchor {
    pub tenant_id: String,
    pub anchor_id: String,
    pub anchor_name: String,
    pub anchor_description: String,
    pub anchor_platform: String,
    pub anchor_version: String,
    pub ip_address: String,
    pub node_id: String,
    pub status: String,
    pub owner_id: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateAnchor {
    pub anchor_name: String,
    #[serde(default)]
    pub anchor_description: String,
    #[serde(default)]
    pub ip_address: String,
    #[serde(default)]
    pub node_id: String,
}

impl Validate for CreateAnchor {
    fn validate(&self) -> Result<(), ApiError> {
        require("anchor_name", &self.anchor_name)
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ModifyAnchor {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub anchor_name_new: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub anchor_description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node_id: Option<String>,
}

impl Validate for ModifyAnchor {}

impl Resource for Anchors {
    const SINGULAR: &'static str = "anchor";
    const PLURAL: &'static str = "anchors";
    const LABEL: &'static str = "anchor";
    const LABEL_PLURAL: &'static str = "anchors";
    const KEY_FIELD: &'static str = "anchor_name";
    const RPC_NOUN: &'static str = "Anchor";
    const RPC_NOUN_PLURAL: &'static str = "Anchors";

    type Entity = Anchor;
    type Create = CreateAnchor;
    type Modify = ModifyAnchor;
    type ListQuery = Empty;
}
