pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod naming;
pub mod resource_uri;
pub mod routes;
pub mod rpc;
pub mod state;
pub mod tracking;

pub use routes::app;
pub use state::AppState;
