//! Crocodoc API client library.
//!
//! Binding for the Download section of the Crocodoc document-conversion API:
//! fetch a document (original or PDF, optionally annotated), its extracted
//! text, or a thumbnail.
//!
//! # Architecture
//!
//! - [`download`] - Download API client and its typed options
//! - [`transport`] - Request primitive (`Transport` trait) and the default
//!   `reqwest` implementation
//! - [`error`] - Error type shared by clients and transports
//!
//! # Example
//!
//! ```no_run
//! use crocodoc::{DocumentOptions, DownloadClient};
//!
//! # async fn example() -> Result<(), crocodoc::CrocodocError> {
//! let client = DownloadClient::with_token("my-api-token")?;
//! let text = client.text("8a1b2c3d").await?;
//! let thumb = client.thumbnail("8a1b2c3d", Some(200), Some(150)).await?;
//! let original = client.document("8a1b2c3d", &DocumentOptions::default()).await?;
//! # let _ = (text, thumb, original);
//! # Ok(())
//! # }
//! ```

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod download;
pub mod error;
pub mod transport;
mod user_agent;

// Re-export commonly used types
pub use download::{DocumentOptions, DownloadClient, Filter};
pub use error::CrocodocError;
pub use transport::{HttpTransport, HttpTransportConfig, QueryParams, QueryValue, Transport};
