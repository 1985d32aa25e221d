pub mod extract;
pub mod types;

pub use extract::{ApiJson, ApiPath, ApiQuery, Validate};
pub use types::{ErrorResponse, MutationResponse, Status};
