//! Seam to the remote document store.
//!
//! The platform stores its records in a remote document database organized as
//! nested collections of key-addressable documents:
//!
//! - `Users/{uid}`
//! - `Users/{uid}/Follow/{username}`
//! - `Users/{uid}/SavedBooks/{title}`
//! - `Reviews/{bookTitle}/UserReviews/{reviewId}`
//!
//! Repositories talk to the store exclusively through [`DocumentStore`], so
//! the transport (and the vendor) stays out of this crate. Every operation is
//! async and resolves exactly once; a failed call surfaces as
//! [`AppError::Remote`](crate::error::AppError) carrying the store's message.

mod memory;

pub use memory::MemoryStore;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::Result;

/// Field map of a single document. Values are plain JSON.
pub type Fields = serde_json::Map<String, Value>;

/// Convert a `json!` object literal into a field map.
pub fn fields(value: Value) -> Fields {
    match value {
        Value::Object(map) => map,
        _ => Fields::new(),
    }
}

/// Sort direction for ordered collection reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Order {
    Asc,
    Desc,
}

/// A document read back from the store, together with the collection path it
/// lives under (e.g. `Reviews/Dune/UserReviews`).
#[derive(Debug, Clone)]
pub struct StoredDoc {
    pub id: String,
    pub path: String,
    pub fields: Fields,
}

impl StoredDoc {
    pub fn str_field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).and_then(Value::as_str)
    }

    pub fn f64_field(&self, name: &str) -> Option<f64> {
        self.fields.get(name).and_then(Value::as_f64)
    }

    pub fn i64_field(&self, name: &str) -> Option<i64> {
        self.fields.get(name).and_then(Value::as_i64)
    }

    /// Id of the document owning this document's collection. For a review at
    /// `Reviews/{bookTitle}/UserReviews/{reviewId}` this is the book title.
    pub fn parent_document_id(&self) -> Option<&str> {
        let mut segments = self.path.rsplit('/');
        segments.next()?;
        segments.next()
    }
}

/// Async client contract for the remote document store.
///
/// Writes are idempotent upserts (`set`) or deletes; `add` creates a document
/// with a store-generated id. `update` merges the given fields into an
/// existing document and fails with `NotFound` when the target is absent,
/// while `delete` of an absent document is a no-op.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn get(&self, collection: &str, id: &str) -> Result<Option<StoredDoc>>;

    /// Create or overwrite the document at `collection/id`.
    async fn set(&self, collection: &str, id: &str, fields: Fields) -> Result<()>;

    /// Append a document with a store-generated id; returns the id.
    async fn add(&self, collection: &str, fields: Fields) -> Result<String>;

    /// Merge `patch` into an existing document. `NotFound` when absent.
    async fn update(&self, collection: &str, id: &str, patch: Fields) -> Result<()>;

    async fn delete(&self, collection: &str, id: &str) -> Result<()>;

    async fn list(&self, collection: &str) -> Result<Vec<StoredDoc>>;

    /// Collection read ordered by a document field. Documents missing the
    /// field sort after the rest.
    async fn list_ordered(&self, collection: &str, field: &str, order: Order)
        -> Result<Vec<StoredDoc>>;

    /// Range query over a string field, inclusive on both bounds, ordered
    /// ascending by the field. Prefix search passes `[prefix, prefix + U+F8FF]`.
    async fn query_range(
        &self,
        collection: &str,
        field: &str,
        start: &str,
        end: &str,
    ) -> Result<Vec<StoredDoc>>;

    /// Equality query across every collection named `subcollection`
    /// regardless of parent (collection-group query).
    async fn query_group(
        &self,
        subcollection: &str,
        field: &str,
        value: &str,
    ) -> Result<Vec<StoredDoc>>;

    async fn count(&self, collection: &str) -> Result<usize>;

    async fn count_group(&self, subcollection: &str, field: &str, value: &str) -> Result<usize>;
}
