//! Domain entities - behavior lives WITH data

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

// ====== Identity ======

/// The acting user's identity, passed explicitly into every mutating
/// repository call. There is no ambient "current user" anywhere in the crate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserContext {
    pub uid: String,
    pub username: String,
}

impl UserContext {
    pub fn new(uid: impl Into<String>, username: impl Into<String>) -> Self {
        Self {
            uid: uid.into(),
            username: username.into(),
        }
    }
}

// ====== User ======

/// A registered account. `id` is the store-assigned document id; `username`
/// is unique and queryable by prefix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    #[serde(default)]
    pub id: String,
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub bio: String,
}

impl User {
    pub fn new(id: impl Into<String>, username: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            username: username.into(),
            email: email.into(),
            bio: String::new(),
        }
    }
}

// ====== Book ======

/// A catalog book. Shared, read-mostly value object; once constructed from a
/// catalog response it is never mutated in place. The store keys saved-book
/// and review documents by `title`; `id` is a stable synthesized key carried
/// alongside so distinct same-title books stay distinguishable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    #[serde(default)]
    pub id: String,
    pub title: String,
    pub author: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub thumbnail_url: String,
    #[serde(default)]
    pub rating: f32,
}

impl Book {
    pub fn new(
        title: impl Into<String>,
        author: impl Into<String>,
        description: impl Into<String>,
        thumbnail_url: impl Into<String>,
        rating: f32,
    ) -> Self {
        let title = title.into();
        let author = author.into();
        let id = synthesize_book_key(&title, &author);
        Self {
            id,
            title,
            author,
            description: description.into(),
            thumbnail_url: thumbnail_url.into(),
            rating,
        }
    }

    /// Recompute the synthesized key when a snapshot predates the `id` field.
    pub fn ensure_id(mut self) -> Self {
        if self.id.is_empty() {
            self.id = synthesize_book_key(&self.title, &self.author);
        }
        self
    }
}

/// Stable key for a book: 32 hex chars of SHA-256 over `title + "\n" + author`.
/// Title alone collides across distinct books; folding the author in keeps
/// the key stable for the same edition while separating homonyms.
pub fn synthesize_book_key(title: &str, author: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(title.as_bytes());
    hasher.update(b"\n");
    hasher.update(author.as_bytes());
    let digest = hasher.finalize();
    hex::encode(&digest[..16])
}

// ====== Review ======

/// A review posted under a book. `username` is a display snapshot taken at
/// post time, not re-derived from the author record; `author_id` is the
/// immutable ownership key used for the mutation check.
#[derive(Debug, Clone, PartialEq)]
pub struct Review {
    pub review_id: String,
    pub book_id: String,
    pub username: String,
    pub rating: f32,
    pub comment: String,
    pub thumbnail_url: String,
    pub author_id: String,
    /// Millisecond epoch set at write time; descending sort key for fetches.
    pub posted_at: i64,
}

impl Review {
    /// True when both identifiers required for a remote mutation are present.
    pub fn has_identifiers(&self) -> bool {
        !self.book_id.is_empty() && !self.review_id.is_empty()
    }
}
