// handlers/protected/data_products.rs - /{tenant_url}/api/v1/data-products

use serde::{Deserialize, Serialize};

use crate::api::extract::require;
use crate::api::Validate;
use crate::error::ApiError;
use crate::handlers::crud::{Empty, Resource};

pub struct DataProducts;

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DataProduct {
    pub tenant_id: String,
    pub product_id: String,
    pub product_name: String,
    pub product_description: String,
    pub resource_items: Vec<String>,
    pub status: String,
    pub owner_id: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateDataProduct {
    pub product_name: String,
    #[serde(default)]
    pub product_description: String,
    #[serde(default)]
    pub resource_items: Vec<String>,
}

impl Validate for CreateDataProduct {
    fn validate(&self) -> Result<(), ApiError> {
        require("product_name", &self.product_name)
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ModifyDataProduct {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_name_new: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_items: Option<Vec<String>>,
}

impl Validate for ModifyDataProduct {
    fn validate(&self) -> Result<(), ApiError> {
        match &self.product_name_new {
            Some(name) => require("product_name_new", name),
            None => Ok(()),
        }
    }
}

impl Resource for DataProducts {
    const SINGULAR: &'static str = "data_product";
    const PLURAL: &'static str = "data_products";
    const LABEL: &'static str = "data product";
    const LABEL_PLURAL: &'static str = "data products";
    const KEY_FIELD: &'static str = "product_name";
    const RPC_NOUN: &'static str = "DataProduct";
    const RPC_NOUN_PLURAL: &'static str = "DataProducts";

    type Entity = DataProduct;
    type Create = CreateDataProduct;
    type Modify = ModifyDataProduct;
    type ListQuery = Empty;
}
