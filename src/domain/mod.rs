pub mod models;

pub use models::{Book, Review, User, UserContext};
