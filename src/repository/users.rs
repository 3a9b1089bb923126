//! Account documents under `Users/{uid}`.

use std::sync::Arc;

use serde_json::json;

use crate::domain::User;
use crate::error::{AppError, Result};
use crate::store::{fields, DocumentStore, StoredDoc};

use super::paths;

pub struct UserRepository {
    store: Arc<dyn DocumentStore>,
}

impl UserRepository {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Write a new account document. The store assigns nothing here; `uid`
    /// comes from the authentication layer. Bio starts empty.
    pub async fn create(&self, uid: &str, username: &str, email: &str) -> Result<()> {
        if uid.is_empty() || username.is_empty() {
            return Err(AppError::validation("uid and username are required"));
        }
        self.store
            .set(
                paths::USERS,
                uid,
                fields(json!({
                    "username": username,
                    "email": email,
                    "bio": "",
                })),
            )
            .await
    }

    /// Fetch a full profile. `Ok(None)` when no such user exists; a document
    /// that exists but cannot be parsed is an error, not a silent miss.
    pub async fn fetch_profile(&self, uid: &str) -> Result<Option<User>> {
        match self.store.get(paths::USERS, uid).await? {
            None => {
                log::debug!("user document not found for uid {uid}");
                Ok(None)
            }
            Some(doc) => match parse_user(&doc) {
                Some(user) => Ok(Some(user)),
                None => Err(AppError::remote(format!(
                    "failed to parse user document {uid}"
                ))),
            },
        }
    }

    /// Username lookup for a known uid. Missing user or missing username
    /// field are both `NotFound`.
    pub async fn fetch_username(&self, uid: &str) -> Result<String> {
        let doc = self
            .store
            .get(paths::USERS, uid)
            .await?
            .ok_or_else(|| AppError::not_found(format!("user document not found for {uid}")))?;
        match doc.str_field("username") {
            Some(name) if !name.is_empty() => Ok(name.to_string()),
            _ => Err(AppError::not_found(format!("username not found for {uid}"))),
        }
    }
}

/// Map a user document into the domain type. Username is essential; email
/// and bio degrade to empty strings.
pub(super) fn parse_user(doc: &StoredDoc) -> Option<User> {
    let username = doc.str_field("username")?;
    if username.trim().is_empty() {
        return None;
    }
    Some(User {
        id: doc.id.clone(),
        username: username.to_string(),
        email: doc.str_field("email").unwrap_or_default().to_string(),
        bio: doc.str_field("bio").unwrap_or_default().to_string(),
    })
}
