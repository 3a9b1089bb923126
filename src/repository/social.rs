//! Follow edges under `Users/{uid}/Follow/{username}`, plus username search.
//!
//! Follow/unfollow are idempotent: the edge document is keyed by the followed
//! username, so repeating either operation converges on the same state.
//! Racing follow/unfollow toggles resolve last-write-wins in the store; no
//! compare-and-swap is layered on top.

use std::sync::Arc;

use chrono::Utc;
use serde_json::json;

use crate::domain::{User, UserContext};
use crate::error::{AppError, Result};
use crate::store::{fields, DocumentStore};

use super::paths;
use super::users::parse_user;

/// Upper bound for prefix range scans; sorts after every printable string
/// that shares the prefix.
const HIGH_SENTINEL: char = '\u{f8ff}';

pub struct SocialGraphRepository {
    store: Arc<dyn DocumentStore>,
}

impl SocialGraphRepository {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// All users whose username starts with `prefix`, lexicographic order.
    /// Implemented as a range scan over `[prefix, prefix + U+F8FF]`.
    pub async fn search_users(&self, prefix: &str) -> Result<Vec<User>> {
        let end = format!("{prefix}{HIGH_SENTINEL}");
        let docs = self
            .store
            .query_range(paths::USERS, "username", prefix, &end)
            .await?;
        Ok(docs
            .iter()
            .filter_map(|doc| match parse_user(doc) {
                Some(user) => Some(user),
                None => {
                    log::warn!("skipping malformed user document {}", doc.id);
                    None
                }
            })
            .collect())
    }

    /// Record that the acting user follows `followed_username`. Following an
    /// already-followed user overwrites the same edge: a no-op success.
    pub async fn follow(&self, ctx: &UserContext, followed_username: &str) -> Result<()> {
        if followed_username.is_empty() {
            return Err(AppError::validation("followed username is required"));
        }
        self.store
            .set(
                &paths::follow(&ctx.uid),
                followed_username,
                fields(json!({
                    "followed": followed_username,
                    "timestamp": Utc::now().timestamp_millis(),
                })),
            )
            .await
    }

    /// Remove the follow edge. Unfollowing someone not followed is a no-op.
    pub async fn unfollow(&self, ctx: &UserContext, followed_username: &str) -> Result<()> {
        if followed_username.is_empty() {
            return Err(AppError::validation("followed username is required"));
        }
        self.store
            .delete(&paths::follow(&ctx.uid), followed_username)
            .await
    }

    /// Usernames the user follows; the edge keys themselves.
    pub async fn fetch_following_usernames(&self, uid: &str) -> Result<Vec<String>> {
        let docs = self.store.list(&paths::follow(uid)).await?;
        Ok(docs.into_iter().map(|doc| doc.id).collect())
    }

    pub async fn fetch_following_count(&self, uid: &str) -> Result<usize> {
        self.store.count(&paths::follow(uid)).await
    }

    /// How many users follow `username`. A collection-group scan over every
    /// Follow sub-collection; fine at moderate scale, not cheap beyond it.
    pub async fn fetch_followers_count(&self, username: &str) -> Result<usize> {
        self.store
            .count_group(paths::FOLLOW, "followed", username)
            .await
    }
}
