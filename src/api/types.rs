use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Operation outcome attached to response envelopes. Descriptive only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Healthy,
    Unhealthy,
    Success,
    Failure,
    Pending,
    Error,
    Created,
    Updated,
    Deleted,
    Connected,
    Disconnected,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Healthy => "healthy",
            Status::Unhealthy => "unhealthy",
            Status::Success => "success",
            Status::Failure => "failure",
            Status::Pending => "pending",
            Status::Error => "error",
            Status::Created => "created",
            Status::Updated => "updated",
            Status::Deleted => "deleted",
            Status::Connected => "connected",
            Status::Disconnected => "disconnected",
        }
    }
}

/// The one shape every failed request is reported with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status: Status,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
            status: Status::Error,
        }
    }
}

/// Success envelope for mutating operations:
/// `{"message": ..., "success": true, "status": ..., "<entity_key>": {...}}`
#[derive(Debug, Clone, Serialize)]
pub struct MutationResponse {
    pub message: String,
    pub success: bool,
    pub status: Status,
    #[serde(flatten)]
    pub entity: Map<String, Value>,
}

impl MutationResponse {
    pub fn new(message: impl Into<String>, status: Status) -> Self {
        Self {
            message: message.into(),
            success: true,
            status,
            entity: Map::new(),
        }
    }

    /// Attach the primary entity under its lower-snake-case resource key.
    pub fn with_entity(mut self, key: &str, entity: Value) -> Self {
        self.entity.insert(key.to_string(), entity);
        self
    }
}
