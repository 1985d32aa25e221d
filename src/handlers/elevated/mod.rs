// handlers/elevated/mod.rs - Global handlers above tenant scope
//
// Route Prefix: /api/v1/tenants, /api/v1/mesh (no tenant segment)
// Middleware: authenticate (empty tenant_url) → authorize → track_operations

pub mod mesh;
pub mod tenants;
