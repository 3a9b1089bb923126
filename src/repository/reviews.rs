//! Review documents under `Reviews/{bookTitle}/UserReviews/{reviewId}`.
//!
//! Post appends with a store-generated id and a write-time timestamp; the
//! book-scoped fetch orders by that timestamp descending. Mutation is gated
//! on authorship: the repository reads the stored document and refuses
//! update/delete when the acting user is not the recorded author.

use std::sync::Arc;

use chrono::Utc;
use serde_json::json;

use crate::domain::{Book, Review, UserContext};
use crate::error::{AppError, Result};
use crate::store::{fields, DocumentStore, Order, StoredDoc};

use super::paths;

pub struct ReviewRepository {
    store: Arc<dyn DocumentStore>,
}

impl ReviewRepository {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Append a new review under the book. The username and thumbnail are
    /// snapshotted from the acting user and the book at post time; returns
    /// the store-assigned review id.
    pub async fn post(
        &self,
        ctx: &UserContext,
        book: &Book,
        rating: f32,
        comment: &str,
    ) -> Result<String> {
        if book.title.is_empty() {
            return Err(AppError::validation("book title is required to post a review"));
        }
        let review_id = self
            .store
            .add(
                &paths::user_reviews(&book.title),
                fields(json!({
                    "username": ctx.username,
                    "rating": rating,
                    "comment": comment,
                    "timestamp": Utc::now().timestamp_millis(),
                    "thumbnailUrl": book.thumbnail_url,
                    "authorUid": ctx.uid,
                })),
            )
            .await?;
        log::debug!("posted review {review_id} for book '{}'", book.title);
        Ok(review_id)
    }

    /// All reviews for a book, most recent first. Malformed documents are
    /// skipped, never fatal.
    pub async fn fetch_for_book(&self, book_id: &str) -> Result<Vec<Review>> {
        let docs = self
            .store
            .list_ordered(&paths::user_reviews(book_id), "timestamp", Order::Desc)
            .await?;
        Ok(docs.iter().filter_map(parse_review).collect())
    }

    /// Cross-book fetch of one author's reviews, matched on the denormalized
    /// username snapshot. Same skip policy as `fetch_for_book`; ordering is
    /// whatever the store returns.
    pub async fn fetch_for_author_username(&self, username: &str) -> Result<Vec<Review>> {
        let docs = self
            .store
            .query_group(paths::USER_REVIEWS, "username", username)
            .await?;
        if docs.is_empty() {
            log::debug!("no reviews found for username '{username}'");
        }
        Ok(docs.iter().filter_map(parse_review).collect())
    }

    /// Rewrite rating and comment of an existing review. Every other field
    /// is immutable after creation.
    pub async fn update(&self, ctx: &UserContext, review: &Review) -> Result<()> {
        if !review.has_identifiers() {
            return Err(AppError::validation("review identifiers missing"));
        }
        let collection = paths::user_reviews(&review.book_id);
        let stored = self
            .store
            .get(&collection, &review.review_id)
            .await?
            .ok_or_else(|| {
                AppError::not_found(format!("review {} not found", review.review_id))
            })?;
        check_author(&stored, ctx)?;

        self.store
            .update(
                &collection,
                &review.review_id,
                fields(json!({
                    "rating": review.rating,
                    "comment": review.comment,
                })),
            )
            .await
    }

    /// Delete a review. Deleting one that is already gone is a no-op
    /// success.
    pub async fn delete(&self, ctx: &UserContext, review: &Review) -> Result<()> {
        if !review.has_identifiers() {
            return Err(AppError::validation("review identifiers missing"));
        }
        let collection = paths::user_reviews(&review.book_id);
        let Some(stored) = self.store.get(&collection, &review.review_id).await? else {
            return Ok(());
        };
        check_author(&stored, ctx)?;
        self.store.delete(&collection, &review.review_id).await
    }
}

/// The stored author must match the acting user. A review written without an
/// author record is owned by nobody and cannot be mutated.
fn check_author(stored: &StoredDoc, ctx: &UserContext) -> Result<()> {
    match stored.str_field("authorUid") {
        Some(author) if author == ctx.uid => Ok(()),
        Some(_) => Err(AppError::unauthorized("review belongs to another user")),
        None => Err(AppError::unauthorized("review has no recorded author")),
    }
}

/// Map a stored review document into the domain type. Username is essential;
/// the rest degrades with a logged default. The book id comes from the
/// document's parent path segment.
fn parse_review(doc: &StoredDoc) -> Option<Review> {
    let username = match doc.str_field("username") {
        Some(name) if !name.trim().is_empty() => name.to_string(),
        _ => {
            log::warn!("skipping review {}: missing username", doc.id);
            return None;
        }
    };
    let rating = match doc.f64_field("rating") {
        Some(value) => value as f32,
        None => {
            log::warn!("review {}: rating missing or not a number, defaulting to 0", doc.id);
            0.0
        }
    };

    Some(Review {
        review_id: doc.id.clone(),
        book_id: doc.parent_document_id().unwrap_or_default().to_string(),
        username,
        rating,
        comment: doc.str_field("comment").unwrap_or_default().to_string(),
        thumbnail_url: doc.str_field("thumbnailUrl").unwrap_or_default().to_string(),
        author_id: doc.str_field("authorUid").unwrap_or_default().to_string(),
        posted_at: doc.i64_field("timestamp").unwrap_or(0),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use crate::test_utils::fixtures;

    fn repo() -> (Arc<MemoryStore>, ReviewRepository) {
        let store = fixtures::memory_store();
        (store.clone(), ReviewRepository::new(store))
    }

    #[tokio::test]
    async fn post_then_fetch_returns_the_review_with_an_id() {
        let (_, reviews) = repo();
        let ctx = fixtures::ctx("u1", "Khurshid");
        let book = fixtures::sample_book("Test Book");

        let id = reviews.post(&ctx, &book, 5.0, "Great read!").await.unwrap();
        assert!(!id.is_empty());

        let fetched = reviews.fetch_for_book("Test Book").await.unwrap();
        assert_eq!(fetched.len(), 1);
        let review = &fetched[0];
        assert_eq!(review.review_id, id);
        assert_eq!(review.book_id, "Test Book");
        assert_eq!(review.username, "Khurshid");
        assert_eq!(review.rating, 5.0);
        assert_eq!(review.comment, "Great read!");
        assert_eq!(review.author_id, "u1");
        assert_eq!(review.thumbnail_url, book.thumbnail_url);
        assert!(review.posted_at > 0);
    }

    #[tokio::test]
    async fn malformed_documents_are_skipped_not_fatal() {
        let (store, reviews) = repo();
        let collection = paths::user_reviews("Test Book");
        store
            .set(&collection, "good", fields(json!({
                "username": "alice",
                "rating": 4,
                "comment": "ok",
                "timestamp": 100,
                "authorUid": "u1",
            })))
            .await
            .unwrap();
        store
            .set(&collection, "no-username", fields(json!({"rating": 2, "timestamp": 200})))
            .await
            .unwrap();

        let fetched = reviews.fetch_for_book("Test Book").await.unwrap();
        assert_eq!(fetched.len(), 1);
        assert_eq!(fetched[0].username, "alice");
    }

    #[tokio::test]
    async fn missing_rating_defaults_to_zero_instead_of_skipping() {
        let (store, reviews) = repo();
        store
            .set(
                &paths::user_reviews("Test Book"),
                "r1",
                fields(json!({"username": "alice", "comment": "", "timestamp": 1})),
            )
            .await
            .unwrap();

        let fetched = reviews.fetch_for_book("Test Book").await.unwrap();
        assert_eq!(fetched[0].rating, 0.0);
    }

    #[tokio::test]
    async fn fetch_orders_by_write_time_descending() {
        let (store, reviews) = repo();
        let collection = paths::user_reviews("Test Book");
        for (id, ts) in [("a", 100), ("b", 300), ("c", 200)] {
            store
                .set(&collection, id, fields(json!({
                    "username": "alice",
                    "rating": 3,
                    "comment": "",
                    "timestamp": ts,
                    "authorUid": "u1",
                })))
                .await
                .unwrap();
        }

        let fetched = reviews.fetch_for_book("Test Book").await.unwrap();
        let times: Vec<i64> = fetched.iter().map(|r| r.posted_at).collect();
        assert_eq!(times, [300, 200, 100]);
        assert!(crate::test_utils::assertions::sorted_newest_first(&fetched));
    }

    #[tokio::test]
    async fn author_username_query_spans_books() {
        let (_, reviews) = repo();
        let alice = fixtures::ctx("u1", "alice");
        let bella = fixtures::ctx("u2", "bella");

        reviews.post(&alice, &fixtures::sample_book("Book A"), 4.0, "a").await.unwrap();
        reviews.post(&alice, &fixtures::sample_book("Book B"), 3.0, "b").await.unwrap();
        reviews.post(&bella, &fixtures::sample_book("Book A"), 2.0, "c").await.unwrap();

        let mine = reviews.fetch_for_author_username("alice").await.unwrap();
        assert_eq!(mine.len(), 2);
        let mut book_ids: Vec<&str> = mine.iter().map(|r| r.book_id.as_str()).collect();
        book_ids.sort_unstable();
        assert_eq!(book_ids, ["Book A", "Book B"]);
    }

    #[tokio::test]
    async fn update_without_identifiers_never_reaches_the_store() {
        let (store, reviews) = repo();
        store.set_offline(true);

        let ctx = fixtures::ctx("u1", "alice");
        let review = Review {
            review_id: String::new(),
            book_id: "Test Book".into(),
            username: "alice".into(),
            rating: 4.0,
            comment: "x".into(),
            thumbnail_url: String::new(),
            author_id: "u1".into(),
            posted_at: 0,
        };

        let err = reviews.update(&ctx, &review).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        let err = reviews.delete(&ctx, &review).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn update_touches_only_rating_and_comment() {
        let (_, reviews) = repo();
        let ctx = fixtures::ctx("u1", "Khurshid");
        let book = fixtures::sample_book("Test Book");
        let id = reviews.post(&ctx, &book, 5.0, "Great read!").await.unwrap();

        let posted = reviews.fetch_for_book("Test Book").await.unwrap().remove(0);
        let mut edited = posted.clone();
        edited.rating = 4.0;
        edited.comment = "Actually pretty good".into();
        reviews.update(&ctx, &edited).await.unwrap();

        let after = reviews.fetch_for_book("Test Book").await.unwrap().remove(0);
        assert_eq!(after.review_id, id);
        assert_eq!(after.rating, 4.0);
        assert_eq!(after.comment, "Actually pretty good");
        assert_eq!(after.book_id, posted.book_id);
        assert_eq!(after.author_id, posted.author_id);
        assert_eq!(after.posted_at, posted.posted_at);
        assert_eq!(after.username, posted.username);
    }

    #[tokio::test]
    async fn non_author_mutation_is_rejected() {
        let (_, reviews) = repo();
        let author = fixtures::ctx("u1", "alice");
        let intruder = fixtures::ctx("u2", "bella");
        let book = fixtures::sample_book("Test Book");
        reviews.post(&author, &book, 5.0, "mine").await.unwrap();

        let mut review = reviews.fetch_for_book("Test Book").await.unwrap().remove(0);
        review.comment = "hijacked".into();

        let err = reviews.update(&intruder, &review).await.unwrap_err();
        assert!(matches!(err, AppError::Unauthorized(_)));
        let err = reviews.delete(&intruder, &review).await.unwrap_err();
        assert!(matches!(err, AppError::Unauthorized(_)));

        let untouched = reviews.fetch_for_book("Test Book").await.unwrap().remove(0);
        assert_eq!(untouched.comment, "mine");
    }

    #[tokio::test]
    async fn review_without_recorded_author_cannot_be_mutated() {
        let (store, reviews) = repo();
        store
            .set(
                &paths::user_reviews("Test Book"),
                "orphan",
                fields(json!({"username": "alice", "rating": 3, "timestamp": 1})),
            )
            .await
            .unwrap();

        let ctx = fixtures::ctx("u1", "alice");
        let review = reviews.fetch_for_book("Test Book").await.unwrap().remove(0);
        let err = reviews.delete(&ctx, &review).await.unwrap_err();
        assert!(matches!(err, AppError::Unauthorized(_)));
    }

    #[tokio::test]
    async fn delete_twice_is_a_no_op() {
        let (_, reviews) = repo();
        let ctx = fixtures::ctx("u1", "alice");
        let book = fixtures::sample_book("Test Book");
        reviews.post(&ctx, &book, 5.0, "x").await.unwrap();

        let review = reviews.fetch_for_book("Test Book").await.unwrap().remove(0);
        reviews.delete(&ctx, &review).await.unwrap();
        reviews.delete(&ctx, &review).await.unwrap();
        assert!(reviews.fetch_for_book("Test Book").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn updating_a_deleted_review_is_not_found() {
        let (_, reviews) = repo();
        let ctx = fixtures::ctx("u1", "alice");
        let book = fixtures::sample_book("Test Book");
        reviews.post(&ctx, &book, 5.0, "x").await.unwrap();

        let review = reviews.fetch_for_book("Test Book").await.unwrap().remove(0);
        reviews.delete(&ctx, &review).await.unwrap();

        let err = reviews.update(&ctx, &review).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
