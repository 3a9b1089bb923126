//! Catalog search adapter.
//!
//! Talks to the external book-catalog provider's volumes-search endpoint and
//! normalizes its raw records into domain [`Book`](crate::domain::Book)
//! values. The provider's ranking is opaque; this module is a pure transform
//! over the response plus the HTTP plumbing to obtain it.

mod client;
mod types;

pub use client::{CatalogClient, CatalogConfig};
pub use types::{ImageLinks, Volume, VolumeInfo, VolumeList, NO_DESCRIPTION, NO_TITLE, UNKNOWN_AUTHOR};
