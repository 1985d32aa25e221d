pub mod auth;
pub mod authorize;
pub mod response;
pub mod tracking;

pub use auth::authenticate;
pub use authorize::authorize;
pub use response::{ApiResponse, ApiResult};
pub use tracking::track_operations;
