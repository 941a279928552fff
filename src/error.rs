//! Error types for Crocodoc API operations.
//!
//! Two origins feed this enum: local argument validation (raised before any
//! request is sent) and transport failures (network, HTTP status, decoded API
//! errors). The download client never wraps or rewrites transport errors.

use thiserror::Error;

/// Errors that can occur while talking to the Crocodoc API.
#[derive(Debug, Error)]
pub enum CrocodocError {
    /// Thumbnail width was supplied but is less than 1.
    #[error("[{client}::{method}] invalid_width: thumbnail width must be at least 1")]
    InvalidWidth {
        /// API client that rejected the argument (e.g. `download`).
        client: &'static str,
        /// Operation that rejected the argument (e.g. `thumbnail`).
        method: &'static str,
    },

    /// Thumbnail height was supplied but is less than 1.
    #[error("[{client}::{method}] invalid_height: thumbnail height must be at least 1")]
    InvalidHeight {
        /// API client that rejected the argument.
        client: &'static str,
        /// Operation that rejected the argument.
        method: &'static str,
    },

    /// No API token was configured for the HTTP transport.
    #[error(
        "missing_api_token: no Crocodoc API token configured\n  Suggestion: pass --token or set CROCODOC_API_TOKEN"
    )]
    MissingApiToken,

    /// The configured API base URL cannot be parsed.
    #[error("invalid base URL: {url}")]
    InvalidBaseUrl {
        /// The rejected base URL.
        url: String,
    },

    /// The HTTP client could not be constructed.
    #[error("HTTP client construction failed: {reason}")]
    ClientBuild {
        /// Why construction failed.
        reason: String,
    },

    /// Network-level error (DNS, connection refused, TLS, body read).
    #[error("network error calling {resource}: {source}")]
    Network {
        /// The API resource being called (e.g. `download/document`).
        resource: String,
        /// The underlying network error.
        #[source]
        source: reqwest::Error,
    },

    /// Non-success HTTP status without a decodable API error body.
    #[error("server_error_{status}: HTTP {status} calling {resource}")]
    HttpStatus {
        /// The API resource being called.
        resource: String,
        /// The HTTP status code.
        status: u16,
    },

    /// The API answered with a JSON `{"error": "..."}` body.
    #[error("{code}: Crocodoc API error calling {resource} (HTTP {status})")]
    Api {
        /// The API resource being called.
        resource: String,
        /// The HTTP status code of the response.
        status: u16,
        /// The error code reported by the server.
        code: String,
    },

    /// A JSON response was expected but the body did not parse.
    #[error("server_response_not_valid_json: response from {resource} is not valid JSON")]
    InvalidJson {
        /// The API resource being called.
        resource: String,
    },
}

impl CrocodocError {
    /// Creates an `InvalidWidth` validation error.
    #[must_use]
    pub fn invalid_width(client: &'static str, method: &'static str) -> Self {
        Self::InvalidWidth { client, method }
    }

    /// Creates an `InvalidHeight` validation error.
    #[must_use]
    pub fn invalid_height(client: &'static str, method: &'static str) -> Self {
        Self::InvalidHeight { client, method }
    }

    /// Creates a network error from a reqwest error.
    pub fn network(resource: impl Into<String>, source: reqwest::Error) -> Self {
        Self::Network {
            resource: resource.into(),
            source,
        }
    }

    /// Creates an HTTP status error.
    pub fn http_status(resource: impl Into<String>, status: u16) -> Self {
        Self::HttpStatus {
            resource: resource.into(),
            status,
        }
    }

    /// Creates an API error carrying the server's error code.
    pub fn api(resource: impl Into<String>, status: u16, code: impl Into<String>) -> Self {
        Self::Api {
            resource: resource.into(),
            status,
            code: code.into(),
        }
    }

    /// Creates an invalid JSON error.
    pub fn invalid_json(resource: impl Into<String>) -> Self {
        Self::InvalidJson {
            resource: resource.into(),
        }
    }

    /// Stable snake_case code identifying the failure kind.
    ///
    /// Validation errors report `invalid_width` / `invalid_height`; API errors
    /// report the code sent by the server.
    #[must_use]
    pub fn code(&self) -> String {
        match self {
            Self::InvalidWidth { .. } => "invalid_width".to_string(),
            Self::InvalidHeight { .. } => "invalid_height".to_string(),
            Self::MissingApiToken => "missing_api_token".to_string(),
            Self::InvalidBaseUrl { .. } => "invalid_base_url".to_string(),
            Self::ClientBuild { .. } => "client_build_failed".to_string(),
            Self::Network { .. } => "network_error".to_string(),
            Self::HttpStatus { status, .. } => format!("server_error_{status}"),
            Self::Api { code, .. } => code.clone(),
            Self::InvalidJson { .. } => "server_response_not_valid_json".to_string(),
        }
    }

    /// Returns true for errors raised locally before any request was sent.
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::InvalidWidth { .. } | Self::InvalidHeight { .. })
    }
}

// No `From<reqwest::Error>`: every transport variant needs the resource name,
// which the source error does not carry. Use the helper constructors.
