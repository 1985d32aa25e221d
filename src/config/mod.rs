use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must not be empty")]
    Empty(&'static str),

    #[error("{0} must be greater than zero")]
    Zero(&'static str),

    #[error("{field} must be an http:// or https:// URL, got '{value}'")]
    BadUrl { field: &'static str, value: String },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub server: ServerConfig,
    pub backend: BackendConfig,
    pub timeouts: TimeoutConfig,
    pub api: ApiConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// How long shutdown waits for in-flight operations.
    pub shutdown_drain_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    pub core_service_url: String,
    pub security_service_url: String,
    pub connect_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeoutConfig {
    /// Default bound on a core service call.
    pub request_secs: u64,
    /// Bound on bulk calls such as mapping data copies.
    pub bulk_secs: u64,
    /// Bound on authenticate / authorize calls.
    pub security_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub enable_request_logging: bool,
    pub max_request_size_bytes: usize,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        // Set defaults based on environment, then override with specific env vars
        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        // Server overrides
        if let Ok(v) = env::var("CLIENTAPI_HOST") {
            self.server.host = v;
        }
        if let Some(v) = env::var("CLIENTAPI_PORT")
            .ok()
            .or_else(|| env::var("PORT").ok())
            .and_then(|s| s.parse().ok())
        {
            self.server.port = v;
        }
        if let Ok(v) = env::var("SHUTDOWN_DRAIN_SECS") {
            self.server.shutdown_drain_secs = v.parse().unwrap_or(self.server.shutdown_drain_secs);
        }

        // Backend overrides
        if let Ok(v) = env::var("CORE_SERVICE_URL") {
            self.backend.core_service_url = v;
        }
        if let Ok(v) = env::var("SECURITY_SERVICE_URL") {
            self.backend.security_service_url = v;
        }
        if let Ok(v) = env::var("BACKEND_CONNECT_TIMEOUT_SECS") {
            self.backend.connect_timeout_secs = v.parse().unwrap_or(self.backend.connect_timeout_secs);
        }

        // Timeout overrides
        if let Ok(v) = env::var("BACKEND_TIMEOUT_SECS") {
            self.timeouts.request_secs = v.parse().unwrap_or(self.timeouts.request_secs);
        }
        if let Ok(v) = env::var("BULK_TIMEOUT_SECS") {
            self.timeouts.bulk_secs = v.parse().unwrap_or(self.timeouts.bulk_secs);
        }
        if let Ok(v) = env::var("SECURITY_TIMEOUT_SECS") {
            self.timeouts.security_secs = v.parse().unwrap_or(self.timeouts.security_secs);
        }

        // API overrides
        if let Ok(v) = env::var("API_ENABLE_REQUEST_LOGGING") {
            self.api.enable_request_logging = v.parse().unwrap_or(self.api.enable_request_logging);
        }
        if let Ok(v) = env::var("API_MAX_REQUEST_SIZE_BYTES") {
            self.api.max_request_size_bytes = v.parse().unwrap_or(self.api.max_request_size_bytes);
        }

        self
    }

    pub fn development() -> Self {
        Self {
            environment: Environment::Development,
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 8080,
                shutdown_drain_secs: 5,
            },
            backend: BackendConfig {
                core_service_url: "http://127.0.0.1:50055".to_string(),
                security_service_url: "http://127.0.0.1:50051".to_string(),
                connect_timeout_secs: 5,
            },
            timeouts: TimeoutConfig::default(),
            api: ApiConfig {
                enable_request_logging: true,
                max_request_size_bytes: 10 * 1024 * 1024, // 10MB
            },
        }
    }

    pub fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 8080,
                shutdown_drain_secs: 30,
            },
            backend: BackendConfig {
                core_service_url: "http://core:50055".to_string(),
                security_service_url: "http://security:50051".to_string(),
                connect_timeout_secs: 5,
            },
            timeouts: TimeoutConfig::default(),
            api: ApiConfig {
                enable_request_logging: true,
                max_request_size_bytes: 5 * 1024 * 1024, // 5MB
            },
        }
    }

    pub fn production() -> Self {
        Self {
            environment: Environment::Production,
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 8080,
                shutdown_drain_secs: 60,
            },
            backend: BackendConfig {
                core_service_url: "http://core:50055".to_string(),
                security_service_url: "http://security:50051".to_string(),
                connect_timeout_secs: 3,
            },
            timeouts: TimeoutConfig::default(),
            api: ApiConfig {
                enable_request_logging: false,
                max_request_size_bytes: 2 * 1024 * 1024, // 2MB
            },
        }
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.backend.connect_timeout_secs)
    }

    pub fn shutdown_drain(&self) -> Duration {
        Duration::from_secs(self.server.shutdown_drain_secs)
    }

    /// Reject settings the server cannot start with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.host.trim().is_empty() {
            return Err(ConfigError::Empty("server.host"));
        }
        for (field, value) in [
            ("backend.core_service_url", &self.backend.core_service_url),
            ("backend.security_service_url", &self.backend.security_service_url),
        ] {
            if !(value.starts_with("http://") || value.starts_with("https://")) {
                return Err(ConfigError::BadUrl {
                    field,
                    value: value.clone(),
                });
            }
        }
        for (field, value) in [
            ("timeouts.request_secs", self.timeouts.request_secs),
            ("timeouts.bulk_secs", self.timeouts.bulk_secs),
            ("timeouts.security_secs", self.timeouts.security_secs),
        ] {
            if value == 0 {
                return Err(ConfigError::Zero(field));
            }
        }
        if self.api.max_request_size_bytes == 0 {
            return Err(ConfigError::Zero("api.max_request_size_bytes"));
        }
        Ok(())
    }
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            request_secs: 30,
            bulk_secs: 10 * 60,
            security_secs: 10,
        }
    }
}

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

// Convenience function for accessing config
pub fn config() -> &'static AppConfig {
    &CONFIG
}
