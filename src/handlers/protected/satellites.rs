// handlers/protected/satellites.rs - /{tenant_url}/api/v1/satellites

use serde::{Deserialize, Serialize};

use crate::api::extract::require;
use crate::api::Validate;
use crate::error::ApiError;
use crate::handlers::crud::{Empty, Resource};

pub struct Satellites;

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Satellite {
    pub tenant_id: String,
    pub satellite_id: String,
    pub satellite_name: String,
    pub satellite_description: String,
    pub satellite_platform: String,
    pub satellite_version: String,
    pub ip_address: String,
    pub node_id: String,
    pub status: String,
    pub owner_id: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateSatellite {
    pub satellite_name: String,
    #[serde(default)]
    pub satellite_description: String,
    #[serde(default)]
    pub satellite_platform: String,
    #[serde(default)]
    pub satellite_version: String,
    #[serde(default)]
    pub ip_address: String,
    #[serde(default)]
    pub node_id: String,
}

impl Validate for CreateSatellite {
    fn validate(&self) -> Result<(), ApiError> {
        require("satellite_name", &self.satellite_name)
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ModifySatellite {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub satellite_name_new: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub satellite_description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub satellite_platform: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub satellite_version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node_id: Option<String>,
}

impl Validate for ModifySatellite {}

impl Resource for Satellites {
    const SINGULAR: &'static str = "satellite";
    const PLURAL: &'static str = "satellites";
    const LABEL: &'static str = "satellite";
    const LABEL_PLURAL: &'static str = "satellites";
    const KEY_FIELD: &'static str = "satellite_name";
    const RPC_NOUN: &'static str = "Satellite";
    const RPC_NOUN_PLURAL: &'static str = "Satellites";

    type Entity = Satellite;
    type Create = CreateSatellite;
    type Modify = ModifySatellite;
    type ListQuery = Empty;
}
