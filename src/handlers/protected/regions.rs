// handlers/protected/regions.rs - /{tenant_url}/api/v1/regions

use serde::{Deserialize, Serialize};

use crate::api::extract::{require, require_one_of};
use crate::api::Validate;
use crate::error::ApiError;
use crate::handlers::crud::{Empty, Resource};

pub const REGION_TYPES: &[&str] = &["aws", "azure", "gcp", "on-premise"];

pub struct Regions;

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Region {
    pub tenant_id: String,
    pub region_id: String,
    pub region_name: String,
    pub region_description: String,
    pub region_location: String,
    pub region_latitude: Option<f64>,
    pub region_longitude: Option<f64>,
    pub region_type: String,
    pub node_count: i64,
    pub instance_count: i64,
    pub database_count: i64,
    pub status: String,
    pub owner_id: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateRegion {
    pub region_name: String,
    pub region_type: String,
    #[serde(default)]
    pub region_description: String,
    #[serde(default)]
    pub region_location: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region_latitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region_longitude: Option<f64>,
}

impl Validate for CreateRegion {
    fn validate(&self) -> Result<(), ApiError> {
        require("region_name", &self.region_name)?;
        require_one_of("region_type", &self.region_type, REGION_TYPES)
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ModifyRegion {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region_name_new: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region_description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region_location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region_latitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region_longitude: Option<f64>,
}

impl Validate for ModifyRegion {
    fn validate(&self) -> Result<(), ApiError> {
        match &self.region_name_new {
            Some(name) => require("region_name_new", name),
            None => Ok(()),
        }
    }
}

impl Resource for Regions {
    const SINGULAR: &'static str = "region";
    const PLURAL: &'static str = "regions";
    const LABEL: &'static str = "region";
    const LABEL_PLURAL: &'static str = "regions";
    const KEY_FIELD: &'static str = "region_name";
    const RPC_NOUN: &'static str = "Region";
    const RPC_NOUN_PLURAL: &'static str = "Regions";

    type Entity = Region;
    type Create = CreateRegion;
    type Modify = ModifyRegion;
    type ListQuery = Empty;
}
