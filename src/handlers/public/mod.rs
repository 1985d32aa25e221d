// handlers/public/mod.rs - Public handlers (no token required)
//
// Route Prefix: none for health, /api/v1/status, /{tenant_url}/api/v1/auth/login
// Middleware: authentication and authorization pass these routes through

pub mod login;
pub mod status;

pub use login::login;
pub use status::{api_status, health};
