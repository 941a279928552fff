//! Crocodoc Download API.
//!
//! Retrieves an uploaded document's original or PDF rendition, its extracted
//! text, or a thumbnail image.
//!
//! - [`DownloadClient`] - `document`, `text` and `thumbnail` operations
//! - [`DocumentOptions`] - PDF / annotation switches for `document`
//! - [`Filter`] - Which users' annotations to include

mod client;
mod options;

pub use client::{
    API_PATH, DOCUMENT_RESOURCE, DownloadClient, TEXT_RESOURCE, THUMBNAIL_RESOURCE,
    document_query, text_query, thumbnail_query,
};
pub use options::{DocumentOptions, Filter};
