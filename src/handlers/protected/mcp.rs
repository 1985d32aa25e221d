// handlers/protected/mcp.rs - MCP servers, resources and tools
//
// /{tenant_url}/api/v1/mcp-servers, /mcp-resources, /mcp-tools. Each carries
// an opaque `config` document forwarded as-is.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::api::extract::require;
use crate::api::Validate;
use crate::error::ApiError;
use crate::handlers::crud::{Empty, Resource};
use crate::resource_uri::ResourceUri;

pub struct McpServers;

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct McpServer {
    pub tenant_id: String,
    pub server_id: String,
    pub server_name: String,
    pub server_description: String,
    pub server_host: String,
    pub server_port: i32,
    pub server_enabled: bool,
    pub config: Value,
    pub status: String,
    pub owner_id: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateMcpServer {
    pub server_name: String,
    #[serde(default)]
    pub server_description: String,
    #[serde(default)]
    pub server_host: String,
    #[serde(default)]
    pub server_port: Option<u16>,
    #[serde(default)]
    pub server_enabled: Option<bool>,
    #[serde(default)]
    pub config: Value,
}

impl Validate for CreateMcpServer {
    fn validate(&self) -> Result<(), ApiError> {
        require("server_name", &self.server_name)
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ModifyMcpServer {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server_description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server_host: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server_port: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server_enabled: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<Value>,
}

impl Validate for ModifyMcpServer {}

impl Resource for McpServers {
    const SINGULAR: &'static str = "mcp_server";
    const PLURAL: &'static str = "mcp_servers";
    const LABEL: &'static str = "MCP server";
    const LABEL_PLURAL: &'static str = "MCP servers";
    const KEY_FIELD: &'static str = "server_name";
    const RPC_NOUN: &'static str = "McpServer";
    const RPC_NOUN_PLURAL: &'static str = "McpServers";

    type Entity = McpServer;
    type Create = CreateMcpServer;
    type Modify = ModifyMcpServer;
    type ListQuery = Empty;
}

pub struct McpResources;

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct McpResource {
    pub tenant_id: String,
    pub resource_id: String,
    pub resource_name: String,
    pub resource_description: String,
    pub resource_uri: String,
    pub mapping_name: String,
    pub config: Value,
    pub owner_id: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateMcpResource {
    pub resource_name: String,
    #[serde(default)]
    pub resource_description: String,
    pub resource_uri: String,
    #[serde(default)]
    pub mapping_name: String,
    #[serde(default)]
    pub config: Value,
}

impl Validate for CreateMcpResource {
    fn validate(&self) -> Result<(), ApiError> {
        require("resource_name", &self.resource_name)?;
        require("resource_uri", &self.resource_uri)
    }
}

impl Resource for McpResources {
    const SINGULAR: &'static str = "mcp_resource";
    const PLURAL: &'static str = "mcp_resources";
    const LABEL: &'static str = "MCP resource";
    const LABEL_PLURAL: &'static str = "MCP resources";
    const KEY_FIELD: &'static str = "resource_name";
    const RPC_NOUN: &'static str = "McpResource";
    const RPC_NOUN_PLURAL: &'static str = "McpResources";

    type Entity = McpResource;
    type Create = CreateMcpResource;
    type Modify = Empty;
    type ListQuery = Empty;

    fn prepare_create(mut body: CreateMcpResource) -> Result<CreateMcpResource, ApiError> {
        body.validate()?;
        body.resource_uri = ResourceUri::normalize(&body.resource_uri)?;
        Ok(body)
    }
}

pub struct McpTools;

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct McpTool {
    pub tenant_id: String,
    pub tool_id: String,
    pub tool_name: String,
    pub tool_description: String,
    pub mapping_name: String,
    pub config: Value,
    pub owner_id: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateMcpTool {
    pub tool_name: String,
    #[serde(default)]
    pub tool_description: String,
    #[serde(default)]
    pub mapping_name: String,
    #[serde(default)]
    pub config: Value,
}

impl Validate for CreateMcpTool {
    fn validate(&self) -> Result<(), ApiError> {
        require("tool_name", &self.tool_name)
    }
}

impl Resource for McpTools {
    const SINGULAR: &'static str = "mcp_tool";
    const PLURAL: &'static str = "mcp_tools";
    const LABEL: &'static str = "MCP tool";
    const LABEL_PLURAL: &'static str = "MCP tools";
    const KEY_FIELD: &'static str = "tool_name";
    const RPC_NOUN: &'static str = "McpTool";
    const RPC_NOUN_PLURAL: &'static str = "McpTools";

    type Entity = McpTool;
    type Create = CreateMcpTool;
    type Modify = Empty;
    type ListQuery = Empty;
}
