//! `reqwest`-backed [`Transport`] for the Crocodoc REST API.
//!
//! Resource names are resolved to `<base_url>/<api_path>/<resource>`. The API
//! token travels as the `token` query parameter and is never logged.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::CONTENT_TYPE;
use serde::Deserialize;
use tracing::{debug, instrument, warn};
use url::Url;

use crate::error::CrocodocError;
use crate::user_agent;

use super::{QueryParams, Transport};

/// Default Crocodoc API base URL.
pub const DEFAULT_BASE_URL: &str = "https://crocodoc.com/api/v2";

const TOKEN_PARAM: &str = "token";
const CONNECT_TIMEOUT_SECS: u64 = 10;
const READ_TIMEOUT_SECS: u64 = 60;

/// Error body returned by the API on failure: `{"error": "invalid_document_uuid"}`.
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: String,
}

/// Settings for [`HttpTransport`].
#[derive(Clone)]
pub struct HttpTransportConfig {
    /// API token attached to every request.
    pub api_token: String,
    /// API root, e.g. `https://crocodoc.com/api/v2`.
    pub base_url: String,
    /// API section the resource names live under (e.g. `download`); empty
    /// means resources sit directly under the base URL.
    pub api_path: String,
    /// TCP connect timeout in seconds.
    pub connect_timeout_secs: u64,
    /// Whole-request timeout in seconds.
    pub read_timeout_secs: u64,
}

impl HttpTransportConfig {
    /// Creates a config with the default base URL and timeouts and no API section.
    #[must_use]
    pub fn new(api_token: impl Into<String>) -> Self {
        Self {
            api_token: api_token.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            api_path: String::new(),
            connect_timeout_secs: CONNECT_TIMEOUT_SECS,
            read_timeout_secs: READ_TIMEOUT_SECS,
        }
    }

    /// Overrides the API base URL (used for staging hosts and wiremock).
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Overrides the API section path.
    #[must_use]
    pub fn with_api_path(mut self, api_path: impl Into<String>) -> Self {
        self.api_path = api_path.into();
        self
    }

    /// Overrides connect and read timeouts.
    #[must_use]
    pub fn with_timeouts(mut self, connect_timeout_secs: u64, read_timeout_secs: u64) -> Self {
        self.connect_timeout_secs = connect_timeout_secs;
        self.read_timeout_secs = read_timeout_secs;
        self
    }
}

impl fmt::Debug for HttpTransportConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpTransportConfig")
            .field("api_token", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("api_path", &self.api_path)
            .field("connect_timeout_secs", &self.connect_timeout_secs)
            .field("read_timeout_secs", &self.read_timeout_secs)
            .finish()
    }
}

/// HTTP transport for the Crocodoc API.
///
/// Created once and reused; the inner `reqwest::Client` pools connections.
///
/// # Example
///
/// ```no_run
/// use crocodoc::transport::{HttpTransport, HttpTransportConfig};
///
/// # fn example() -> Result<(), crocodoc::CrocodocError> {
/// let transport = HttpTransport::new(HttpTransportConfig::new("my-api-token"))?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct HttpTransport {
    client: Client,
    base_url: Url,
    api_path: String,
    api_token: String,
}

impl HttpTransport {
    /// Builds a transport from `config`.
    ///
    /// # Errors
    ///
    /// Returns [`CrocodocError::MissingApiToken`] for a blank token,
    /// [`CrocodocError::InvalidBaseUrl`] when the base URL cannot carry a
    /// path, and [`CrocodocError::ClientBuild`] if reqwest rejects the
    /// client configuration.
    #[instrument(level = "debug", fields(base_url = %config.base_url, api_path = %config.api_path))]
    pub fn new(config: HttpTransportConfig) -> Result<Self, CrocodocError> {
        if config.api_token.trim().is_empty() {
            return Err(CrocodocError::MissingApiToken);
        }

        let base_url = Url::parse(&config.base_url)
            .ok()
            .filter(|url| !url.cannot_be_a_base())
            .ok_or_else(|| CrocodocError::InvalidBaseUrl {
                url: config.base_url.clone(),
            })?;

        let client = build_client(config.connect_timeout_secs, config.read_timeout_secs)?;

        Ok(Self {
            client,
            base_url,
            api_path: config.api_path,
            api_token: config.api_token,
        })
    }

    /// Resource path relative to the base URL, e.g. `download/thumbnail`.
    fn resource_path(&self, resource: &str) -> String {
        let api_path = self.api_path.trim_matches('/');
        let resource = resource.trim_matches('/');
        if api_path.is_empty() {
            resource.to_string()
        } else {
            format!("{api_path}/{resource}")
        }
    }

    fn endpoint(&self, resource_path: &str) -> Result<Url, CrocodocError> {
        let mut url = self.base_url.clone();
        {
            let mut segments =
                url.path_segments_mut()
                    .map_err(|()| CrocodocError::InvalidBaseUrl {
                        url: self.base_url.to_string(),
                    })?;
            segments.pop_if_empty();
            for segment in resource_path.split('/').filter(|s| !s.is_empty()) {
                segments.push(segment);
            }
        }
        Ok(url)
    }
}

impl fmt::Debug for HttpTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpTransport")
            .field("base_url", &self.base_url.as_str())
            .field("api_path", &self.api_path)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl Transport for HttpTransport {
    #[instrument(skip(self, query, body))]
    async fn request(
        &self,
        resource: &str,
        query: QueryParams,
        body: Option<Vec<u8>>,
        expect_json: bool,
    ) -> Result<Vec<u8>, CrocodocError> {
        let resource_path = self.resource_path(resource);
        let mut url = self.endpoint(&resource_path)?;
        {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in &query {
                pairs.append_pair(key, &value.to_string());
            }
            pairs.append_pair(TOKEN_PARAM, &self.api_token);
        }

        debug!(
            resource = %resource_path,
            params = ?query.keys().collect::<Vec<_>>(),
            post = body.is_some(),
            "Calling Crocodoc API"
        );

        let request = match body {
            Some(body) => self
                .client
                .post(url)
                .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(body),
            None => self.client.get(url),
        };

        let response = request.send().await.map_err(|error| {
            warn!(resource = %resource_path, error = %error, "Crocodoc API request failed");
            CrocodocError::network(&resource_path, error)
        })?;

        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .map_err(|error| CrocodocError::network(&resource_path, error))?;

        if !status.is_success() {
            let error = match api_error_code(&bytes) {
                Some(code) => CrocodocError::api(&resource_path, status.as_u16(), code),
                None => CrocodocError::http_status(&resource_path, status.as_u16()),
            };
            warn!(status = status.as_u16(), code = %error.code(), "Crocodoc API error");
            return Err(error);
        }

        if expect_json {
            let value: serde_json::Value = serde_json::from_slice(&bytes).map_err(|error| {
                debug!(error = %error, "Response body is not JSON");
                CrocodocError::invalid_json(&resource_path)
            })?;
            if let Some(code) = value.get("error").and_then(serde_json::Value::as_str) {
                warn!(code = %code, "Crocodoc API returned an error body");
                return Err(CrocodocError::api(&resource_path, status.as_u16(), code));
            }
        }

        debug!(bytes = bytes.len(), "Crocodoc API response received");
        Ok(bytes.to_vec())
    }
}

fn api_error_code(body: &[u8]) -> Option<String> {
    serde_json::from_slice::<ApiErrorBody>(body)
        .ok()
        .map(|parsed| parsed.error)
        .filter(|code| !code.trim().is_empty())
}

fn build_client(connect_timeout_secs: u64, read_timeout_secs: u64) -> Result<Client, CrocodocError> {
    Client::builder()
        .connect_timeout(Duration::from_secs(connect_timeout_secs))
        .timeout(Duration::from_secs(read_timeout_secs))
        .user_agent(user_agent::default_user_agent())
        .gzip(true)
        .build()
        .map_err(|error| CrocodocError::ClientBuild {
            reason: error.to_string(),
        })
}
