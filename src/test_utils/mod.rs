//! Shared helpers for the test suite.

#[cfg(test)]
pub mod fixtures {
    use std::sync::Arc;

    use serde_json::json;

    use crate::domain::{Book, UserContext};
    use crate::store::{fields, DocumentStore, MemoryStore};

    pub fn memory_store() -> Arc<MemoryStore> {
        Arc::new(MemoryStore::new())
    }

    /// A store pre-seeded with `(uid, username)` account documents.
    pub async fn store_with_users(users: &[(&str, &str)]) -> Arc<MemoryStore> {
        let store = memory_store();
        for (uid, username) in users {
            store
                .set(
                    "Users",
                    uid,
                    fields(json!({
                        "username": username,
                        "email": format!("{username}@example.com"),
                        "bio": "",
                    })),
                )
                .await
                .expect("seeding users");
        }
        store
    }

    pub fn sample_book(title: &str) -> Book {
        Book::new(
            title,
            "Test Author",
            "A test book.",
            "https://covers.example/thumb.png",
            4.0,
        )
    }

    pub fn ctx(uid: &str, username: &str) -> UserContext {
        UserContext::new(uid, username)
    }
}
