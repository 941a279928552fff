//! Download API client.
//!
//! Each operation marshals its typed arguments into a flat query map and
//! forwards it to the injected [`Transport`]. Response bytes are returned
//! untouched and transport errors are propagated as-is.

use std::fmt;
use std::sync::Arc;

use tracing::{debug, instrument};

use crate::error::CrocodocError;
use crate::transport::{HttpTransport, HttpTransportConfig, QueryParams, QueryValue, Transport};

use super::options::DocumentOptions;

/// API section the Download resources live under.
pub const API_PATH: &str = "download";

/// Resource serving the original or converted document.
pub const DOCUMENT_RESOURCE: &str = "document";
/// Resource serving extracted plain text.
pub const TEXT_RESOURCE: &str = "text";
/// Resource serving a thumbnail image.
pub const THUMBNAIL_RESOURCE: &str = "thumbnail";

const CLIENT_NAME: &str = "download";

/// Client for the Crocodoc Download API.
///
/// Holds no per-call state; clones share the same transport and every call
/// is independent, so one client can serve many tasks concurrently.
///
/// # Example
///
/// ```no_run
/// use crocodoc::download::{DocumentOptions, DownloadClient};
///
/// # async fn example() -> Result<(), crocodoc::CrocodocError> {
/// let client = DownloadClient::with_token("my-api-token")?;
/// let options = DocumentOptions::new().as_pdf().with_annotations().with_filter(vec!["1", "2"]);
/// let pdf = client.document("8a1b2c3d", &options).await?;
/// println!("downloaded {} bytes", pdf.len());
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct DownloadClient {
    transport: Arc<dyn Transport>,
}

impl DownloadClient {
    /// Creates a client on top of an existing transport.
    ///
    /// The transport must resolve resource names under the `download` section.
    #[must_use]
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// Creates a client backed by [`HttpTransport`] with default settings.
    ///
    /// # Errors
    ///
    /// Returns [`CrocodocError`] if the transport cannot be built (blank token).
    pub fn with_token(api_token: impl Into<String>) -> Result<Self, CrocodocError> {
        Self::from_config(HttpTransportConfig::new(api_token))
    }

    /// Creates a client backed by [`HttpTransport`] built from `config`.
    ///
    /// The config's API section is forced to [`API_PATH`].
    ///
    /// # Errors
    ///
    /// Returns [`CrocodocError`] if the transport cannot be built.
    pub fn from_config(config: HttpTransportConfig) -> Result<Self, CrocodocError> {
        let transport = HttpTransport::new(config.with_api_path(API_PATH))?;
        Ok(Self::new(Arc::new(transport)))
    }

    /// Downloads a document's original file, optionally as PDF and with annotations.
    ///
    /// # Errors
    ///
    /// Propagates the transport's error unchanged.
    #[instrument(skip(self), fields(resource = DOCUMENT_RESOURCE))]
    pub async fn document(
        &self,
        uuid: &str,
        options: &DocumentOptions,
    ) -> Result<Vec<u8>, CrocodocError> {
        let query = document_query(uuid, options);
        self.transport
            .request(DOCUMENT_RESOURCE, query, None, false)
            .await
    }

    /// Downloads the text extracted from a document.
    ///
    /// # Errors
    ///
    /// Propagates the transport's error unchanged.
    #[instrument(skip(self), fields(resource = TEXT_RESOURCE))]
    pub async fn text(&self, uuid: &str) -> Result<Vec<u8>, CrocodocError> {
        self.transport
            .request(TEXT_RESOURCE, text_query(uuid), None, false)
            .await
    }

    /// Downloads a document's thumbnail, optionally at `width`x`height`.
    ///
    /// A size is applied only when both dimensions are given.
    ///
    /// # Errors
    ///
    /// Returns [`CrocodocError::InvalidWidth`] or [`CrocodocError::InvalidHeight`]
    /// (width checked first) without sending a request when a supplied
    /// dimension is below 1. Otherwise propagates the transport's error.
    #[instrument(skip(self), fields(resource = THUMBNAIL_RESOURCE))]
    pub async fn thumbnail(
        &self,
        uuid: &str,
        width: Option<i64>,
        height: Option<i64>,
    ) -> Result<Vec<u8>, CrocodocError> {
        let query = thumbnail_query(uuid, width, height)?;
        self.transport
            .request(THUMBNAIL_RESOURCE, query, None, false)
            .await
    }
}

impl fmt::Debug for DownloadClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DownloadClient").finish_non_exhaustive()
    }
}

fn uuid_query(uuid: &str) -> QueryParams {
    let mut query = QueryParams::new();
    query.insert("uuid".to_string(), QueryValue::from(uuid));
    query
}

/// Builds the query for the `document` resource.
#[must_use]
pub fn document_query(uuid: &str, options: &DocumentOptions) -> QueryParams {
    let mut query = uuid_query(uuid);
    if options.pdf {
        query.insert("pdf".to_string(), QueryValue::from("true"));
    }
    if options.annotated {
        query.insert("annotated".to_string(), QueryValue::Int(1));
        if let Some(filter) = options.filter.normalized() {
            query.insert("filter".to_string(), QueryValue::Text(filter));
        }
    }
    query
}

/// Builds the query for the `text` resource.
#[must_use]
pub fn text_query(uuid: &str) -> QueryParams {
    uuid_query(uuid)
}

/// Builds the query for the `thumbnail` resource.
///
/// # Errors
///
/// Returns [`CrocodocError::InvalidWidth`] / [`CrocodocError::InvalidHeight`]
/// when both dimensions are given and one is below 1.
pub fn thumbnail_query(
    uuid: &str,
    width: Option<i64>,
    height: Option<i64>,
) -> Result<QueryParams, CrocodocError> {
    let mut query = uuid_query(uuid);
    if let (Some(width), Some(height)) = (width, height) {
        if width < 1 {
            return Err(CrocodocError::invalid_width(CLIENT_NAME, THUMBNAIL_RESOURCE));
        }
        if height < 1 {
            return Err(CrocodocError::invalid_height(CLIENT_NAME, THUMBNAIL_RESOURCE));
        }
        query.insert(
            "size".to_string(),
            QueryValue::Text(format!("{width}x{height}")),
        );
    } else if width.is_some() || height.is_some() {
        debug!(?width, ?height, "Partial thumbnail size ignored");
    }
    Ok(query)
}
