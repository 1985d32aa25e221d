// handlers/protected/mod.rs - Tenant-scoped handlers
//
// Route Prefix: /{tenant_url}/api/v1
// Middleware: authenticate → authorize → track_operations

pub mod anchors;
pub mod auth;
pub mod commits;
pub mod data_products;
pub mod databases;
pub mod mappings;
pub mod mcp;
pub mod policies;
pub mod regions;
pub mod relationships;
pub mod resources;
pub mod satellites;
pub mod workspaces;
