//! Per-user saved-book documents under `Users/{uid}/SavedBooks/{title}`.
//!
//! The document is a full Book snapshot keyed by title; its existence is the
//! saved signal. Save and remove are idempotent upserts/deletes. `is_saved`
//! fails open: when the store cannot be reached the answer is `false`, the
//! same as for a logged-out user.

use std::sync::Arc;

use serde_json::Value;

use crate::domain::Book;
use crate::error::Result;
use crate::store::{fields, DocumentStore};

use super::paths;

pub struct SavedBooksRepository {
    store: Arc<dyn DocumentStore>,
}

impl SavedBooksRepository {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Store the book snapshot under the user's saved set. Saving an
    /// already-saved book overwrites the same document.
    pub async fn save(&self, uid: &str, book: &Book) -> Result<()> {
        let snapshot = serde_json::to_value(book).unwrap_or(Value::Null);
        self.store
            .set(&paths::saved_books(uid), &book.title, fields(snapshot))
            .await
    }

    /// Drop the book from the saved set; removing an unsaved book is a no-op.
    pub async fn remove(&self, uid: &str, book: &Book) -> Result<()> {
        self.store.delete(&paths::saved_books(uid), &book.title).await
    }

    /// Whether the user has saved this book. Degrades to `false` on store
    /// failure instead of surfacing an error.
    pub async fn is_saved(&self, uid: &str, book: &Book) -> bool {
        match self.store.get(&paths::saved_books(uid), &book.title).await {
            Ok(doc) => doc.is_some(),
            Err(e) => {
                log::warn!("is_saved check failed, treating '{}' as unsaved: {e}", book.title);
                false
            }
        }
    }

    /// All books the user has saved. Snapshots that no longer parse are
    /// skipped with a warning.
    pub async fn fetch_saved(&self, uid: &str) -> Result<Vec<Book>> {
        let docs = self.store.list(&paths::saved_books(uid)).await?;
        Ok(docs
            .into_iter()
            .filter_map(|doc| {
                match serde_json::from_value::<Book>(Value::Object(doc.fields)) {
                    Ok(book) => Some(book.ensure_id()),
                    Err(e) => {
                        log::warn!("skipping malformed saved-book snapshot '{}': {e}", doc.id);
                        None
                    }
                }
            })
            .collect())
    }
}
