//! Request primitive shared by Crocodoc API clients.
//!
//! API clients do not talk HTTP themselves. They build a flat query map and
//! hand it to a [`Transport`], which resolves the resource name into a URL,
//! attaches authentication, performs the call and decodes failures.
//!
//! - [`Transport`] - Async trait implemented by request backends
//! - [`HttpTransport`] - Default backend built on `reqwest`
//! - [`QueryParams`] / [`QueryValue`] - Outgoing query parameters

mod http;

pub use http::{DEFAULT_BASE_URL, HttpTransport, HttpTransportConfig};

use std::collections::BTreeMap;
use std::fmt;

use async_trait::async_trait;

use crate::error::CrocodocError;

/// A single query parameter value.
///
/// The API distinguishes textual flags (`pdf=true`) from numeric ones
/// (`annotated=1`); both serialize to plain strings on the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryValue {
    /// String value.
    Text(String),
    /// Integer value.
    Int(i64),
}

impl fmt::Display for QueryValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(value) => f.write_str(value),
            Self::Int(value) => write!(f, "{value}"),
        }
    }
}

impl From<&str> for QueryValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for QueryValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i64> for QueryValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

/// Outgoing query parameters, ordered by key so the emitted query string is
/// deterministic.
pub type QueryParams = BTreeMap<String, QueryValue>;

/// Backend that performs one API request.
///
/// # Object Safety
///
/// This trait uses `async_trait` so clients can hold an `Arc<dyn Transport>`.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Performs a request against `resource` and returns the raw response body.
    ///
    /// * `resource` - Resource name within the transport's API section
    ///   (e.g. `thumbnail`)
    /// * `query` - Query parameters, excluding authentication
    /// * `body` - Form body; `None` means a GET request
    /// * `expect_json` - Whether the response must be a JSON document
    ///
    /// # Errors
    ///
    /// Returns [`CrocodocError`] for network failures, non-success statuses,
    /// API error bodies, and malformed JSON when `expect_json` is set.
    async fn request(
        &self,
        resource: &str,
        query: QueryParams,
        body: Option<Vec<u8>>,
        expect_json: bool,
    ) -> Result<Vec<u8>, CrocodocError>;
}
