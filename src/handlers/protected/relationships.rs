// handlers/protected/relationships.rs - /{tenant_url}/api/v1/relationships

use serde::{Deserialize, Serialize};

use crate::api::extract::require;
use crate::api::Validate;
use crate::error::ApiError;
use crate::handlers::crud::{Empty, Resource};
use crate::resource_uri::ResourceUri;

pub struct Relationships;

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Relationship {
    pub tenant_id: String,
    pub relationship_id: String,
    pub relationship_name: String,
    pub relationship_description: String,
    pub relationship_type: String,
    pub relationship_source: String,
    pub relationship_target: String,
    pub mapping_name: String,
    pub policy_ids: Vec<String>,
    pub status: String,
    pub owner_id: String,
}

/// Source and target accept either address grammar and are forwarded in
/// canonical form.
#[derive(Debug, Serialize, Deserialize)]
pub struct CreateRelationship {
    pub relationship_name: String,
    #[serde(default)]
    pub relationship_description: String,
    #[serde(default)]
    pub relationship_type: String,
    pub relationship_source: String,
    pub relationship_target: String,
    #[serde(default)]
    pub mapping_name: String,
    #[serde(default)]
    pub policy_ids: Vec<String>,
}

impl Validate for CreateRelationship {
    fn validate(&self) -> Result<(), ApiError> {
        require("relationship_name", &self.relationship_name)?;
        require("relationship_source", &self.relationship_source)?;
        require("relationship_target", &self.relationship_target)
    }
}

impl Resource for Relationships {
    const SINGULAR: &'static str = "relationship";
    const PLURAL: &'static str = "relationships";
    const LABEL: &'static str = "relationship";
    const LABEL_PLURAL: &'static str = "relationships";
    const KEY_FIELD: &'static str = "relationship_name";
    const RPC_NOUN: &'static str = "Relationship";
    const RPC_NOUN_PLURAL: &'static str = "Relationships";

    type Entity = Relationship;
    type Create = CreateRelationship;
    type Modify = Empty;
    type ListQuery = Empty;

    fn prepare_create(mut body: CreateRelationship) -> Result<CreateRelationship, ApiError> {
        body.validate()?;
        body.relationship_source = ResourceUri::normalize(&body.relationship_source)?;
        body.relationship_target = ResourceUri::normalize(&body.relationship_target)?;
        Ok(body)
    }
}
