use serde::{Deserialize, Serialize};
use std::env;
use thiserror::Error;
use url::Url;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {var}: {message}")]
    Invalid { var: &'static str, message: String },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub data_service: DataServiceConfig,
    pub api: ApiConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

/// Connection settings for the hosted data service. The anon key is the
/// low-privilege credential (row-level security applies); the service key
/// bypasses it and must never reach a per-user client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataServiceConfig {
    pub base_url: Url,
    pub anon_key: String,
    pub service_key: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub enable_cors: bool,
    pub enable_request_logging: bool,
}

impl AppConfig {
    /// Build the process configuration from the environment. Called exactly
    /// once in `main`; a missing URL or credential aborts startup.
    pub fn from_env() -> Result<Self, ConfigError> {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        Ok(Self {
            data_service: DataServiceConfig::from_env()?,
            api: ApiConfig::for_environment(&environment),
            environment,
        })
    }
}

impl DataServiceConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let raw_url = require("DATA_SERVICE_URL")?;
        let base_url = Url::parse(&raw_url).map_err(|e| ConfigError::Invalid {
            var: "DATA_SERVICE_URL",
            message: e.to_string(),
        })?;

        Ok(Self {
            base_url,
            anon_key: require("DATA_SERVICE_ANON_KEY")?,
            service_key: require("DATA_SERVICE_SERVICE_KEY")?,
        })
    }
}

impl ApiConfig {
    fn for_environment(environment: &Environment) -> Self {
        match environment {
            Environment::Production => Self {
                enable_cors: true,
                enable_request_logging: false,
            },
            Environment::Staging | Environment::Development => Self {
                enable_cors: true,
                enable_request_logging: true,
            },
        }
    }
}

fn require(var: &'static str) -> Result<String, ConfigError> {
    match env::var(var) {
        Ok(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(ConfigError::Missing(var)),
    }
}
