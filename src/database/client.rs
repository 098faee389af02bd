use thiserror::Error;
use url::Url;

use crate::auth::AuthUser;
use crate::config::DataServiceConfig;
use crate::filter::{validate_identifier, FilterError};

use super::query::TableQuery;

/// Errors from the remote data service. Failure kinds beyond transport vs
/// upstream are deliberately not distinguished; no call is ever retried.
#[derive(Debug, Error)]
pub enum DataServiceError {
    #[error("Data service returned {status}: {message}")]
    Upstream { status: u16, message: String },

    #[error(transparent)]
    Transport(#[from] reqwest::Error),

    #[error("Unexpected data service response: {0}")]
    InvalidResponse(String),

    #[error("Refusing unfiltered {0} against the whole table")]
    Unfiltered(&'static str),

    #[error("Invalid request URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error(transparent)]
    Filter(#[from] FilterError),
}

/// A configured handle to the remote data service: base URL, api-key header
/// and bearer credential. Handles are constructed fresh per invocation; the
/// underlying `reqwest::Client` connection pool is shared process-wide.
#[derive(Debug, Clone)]
pub struct DataClient {
    http: reqwest::Client,
    base_url: Url,
    api_key: String,
    bearer: String,
}

impl DataClient {
    /// Low-privilege handle; row-level security applies.
    pub fn anon(config: &DataServiceConfig, http: &reqwest::Client) -> Self {
        Self::build(config, http, config.anon_key.clone())
    }

    /// High-privilege handle for trusted server-side operations; bypasses
    /// row-level security.
    pub fn service(config: &DataServiceConfig, http: &reqwest::Client) -> Self {
        Self::build(config, http, config.service_key.clone())
    }

    /// Handle acting as the end user: anon api key plus the caller's bearer
    /// token, so row-level security is evaluated for that user.
    pub fn for_user(config: &DataServiceConfig, http: &reqwest::Client, token: &str) -> Self {
        Self::build(config, http, token.to_string())
    }

    fn build(config: &DataServiceConfig, http: &reqwest::Client, bearer: String) -> Self {
        Self {
            http: http.clone(),
            base_url: config.base_url.clone(),
            api_key: config.anon_key.clone(),
            bearer,
        }
    }

    /// Start a query against one table. The name is validated before it is
    /// ever placed in a URL.
    pub fn from(&self, table: &str) -> Result<TableQuery, DataServiceError> {
        validate_identifier(table)?;
        Ok(TableQuery::new(self.clone(), table.to_string()))
    }

    /// Forward the handle's bearer token to the user-verification endpoint.
    /// Every failure path is "unauthenticated", never an error: rejection,
    /// an unparseable body, and transport failures all yield `None`.
    pub async fn verify_token(&self) -> Option<AuthUser> {
        let url = match self.base_url.join("auth/v1/user") {
            Ok(url) => url,
            Err(e) => {
                tracing::error!("could not build verification URL: {}", e);
                return None;
            }
        };

        let response = self
            .http
            .get(url)
            .header("apikey", &self.api_key)
            .bearer_auth(&self.bearer)
            .send()
            .await;

        match response {
            Ok(resp) if resp.status().is_success() => match resp.json::<AuthUser>().await {
                Ok(user) => Some(user),
                Err(e) => {
                    tracing::warn!("unparseable identity from auth endpoint: {}", e);
                    None
                }
            },
            Ok(resp) => {
                tracing::debug!("token rejected by auth endpoint: {}", resp.status());
                None
            }
            Err(e) => {
                tracing::warn!("auth endpoint unreachable: {}", e);
                None
            }
        }
    }

    /// Liveness probe against the table API root.
    pub async fn health(&self) -> Result<(), DataServiceError> {
        let url = self.base_url.join("rest/v1/")?;
        let resp = self
            .http
            .get(url)
            .header("apikey", &self.api_key)
            .bearer_auth(&self.bearer)
            .send()
            .await?;

        if resp.status().is_success() {
            Ok(())
        } else {
            Err(DataServiceError::Upstream {
                status: resp.status().as_u16(),
                message: "health probe failed".to_string(),
            })
        }
    }

    pub(super) fn table_url(&self, table: &str) -> Result<Url, DataServiceError> {
        Ok(self.base_url.join(&format!("rest/v1/{}", table))?)
    }

    pub(super) fn http(&self) -> &reqwest::Client {
        &self.http
    }

    pub(super) fn api_key(&self) -> &str {
        &self.api_key
    }

    pub(super) fn bearer(&self) -> &str {
        &self.bearer
    }
}
