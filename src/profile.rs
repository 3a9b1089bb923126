//! Profile aggregation - "show everything about user X" in one call.
//!
//! Fans out over the repositories concurrently and joins once every branch
//! has completed. Branches fail independently: a failure in one never
//! cancels the others, and the result carries whatever data arrived plus
//! the per-branch errors.

use std::sync::Arc;

use crate::domain::{Book, Review};
use crate::error::AppError;
use crate::repository::{
    ReviewRepository, SavedBooksRepository, SocialGraphRepository, UserRepository,
};
use crate::store::DocumentStore;

/// One failed aggregation branch.
#[derive(Debug)]
pub struct BranchError {
    pub branch: &'static str,
    pub error: AppError,
}

/// Partial-tolerant profile snapshot. Fields stay at their empty/`None`
/// defaults when their branch failed; `errors` says which ones did.
#[derive(Debug, Default)]
pub struct ProfileOverview {
    pub uid: String,
    pub username: Option<String>,
    pub reviews: Vec<Review>,
    pub followers: Option<usize>,
    pub following: Option<usize>,
    pub saved_books: Vec<Book>,
    pub errors: Vec<BranchError>,
}

impl ProfileOverview {
    pub fn is_complete(&self) -> bool {
        self.errors.is_empty()
    }
}

pub struct ProfileService {
    users: UserRepository,
    reviews: ReviewRepository,
    social: SocialGraphRepository,
    saved_books: SavedBooksRepository,
}

impl ProfileService {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            users: UserRepository::new(store.clone()),
            reviews: ReviewRepository::new(store.clone()),
            social: SocialGraphRepository::new(store.clone()),
            saved_books: SavedBooksRepository::new(store),
        }
    }

    /// Aggregate a user's profile. The username resolves first because the
    /// review and follower branches join on it; the remaining branches then
    /// run concurrently and complete independently.
    pub async fn overview(&self, uid: &str) -> ProfileOverview {
        let mut overview = ProfileOverview {
            uid: uid.to_string(),
            ..Default::default()
        };

        let username = match self.users.fetch_username(uid).await {
            Ok(name) => Some(name),
            Err(error) => {
                overview.errors.push(BranchError { branch: "username", error });
                None
            }
        };
        overview.username = username.clone();

        let reviews_branch = async {
            match username.as_deref() {
                Some(name) => self.reviews.fetch_for_author_username(name).await,
                None => Ok(Vec::new()),
            }
        };
        let followers_branch = async {
            match username.as_deref() {
                Some(name) => self.social.fetch_followers_count(name).await.map(Some),
                None => Ok(None),
            }
        };
        let following_branch = self.social.fetch_following_count(uid);
        let saved_branch = self.saved_books.fetch_saved(uid);

        let (reviews, followers, following, saved_books) = futures::join!(
            reviews_branch,
            followers_branch,
            following_branch,
            saved_branch
        );

        match reviews {
            Ok(list) => overview.reviews = list,
            Err(error) => overview.errors.push(BranchError { branch: "reviews", error }),
        }
        match followers {
            Ok(count) => overview.followers = count,
            Err(error) => overview.errors.push(BranchError { branch: "followers", error }),
        }
        match following {
            Ok(count) => overview.following = Some(count),
            Err(error) => overview.errors.push(BranchError { branch: "following", error }),
        }
        match saved_books {
            Ok(list) => overview.saved_books = list,
            Err(error) => overview.errors.push(BranchError { branch: "saved_books", error }),
        }

        if !overview.is_complete() {
            log::warn!(
                "profile overview for {uid} is partial: {} branch(es) failed",
                overview.errors.len()
            );
        }
        overview
    }
}
