//! Wire types for the catalog provider's volumes-search response, and their
//! normalization into domain books.
//!
//! Every nested field is optional upstream; normalization fills the gaps with
//! fixed sentinels so the rest of the crate never sees missing data.

use serde::Deserialize;

use crate::domain::Book;

/// Placeholder title when the upstream record has none.
pub const NO_TITLE: &str = "No Title";
/// Sentinel author when the upstream author list is absent or empty.
pub const UNKNOWN_AUTHOR: &str = "Unknown Author";
/// Sentinel description when the upstream record has none.
pub const NO_DESCRIPTION: &str = "No description available.";

#[derive(Debug, Deserialize)]
pub struct VolumeList {
    #[serde(default)]
    pub items: Option<Vec<Volume>>,
}

#[derive(Debug, Deserialize)]
pub struct Volume {
    #[serde(rename = "volumeInfo")]
    pub volume_info: Option<VolumeInfo>,
}

#[derive(Debug, Deserialize)]
pub struct VolumeInfo {
    pub title: Option<String>,
    pub authors: Option<Vec<String>>,
    pub description: Option<String>,
    #[serde(rename = "averageRating")]
    pub average_rating: Option<f32>,
    #[serde(rename = "imageLinks")]
    pub image_links: Option<ImageLinks>,
}

#[derive(Debug, Deserialize)]
pub struct ImageLinks {
    pub thumbnail: Option<String>,
}

impl Volume {
    /// Normalize one raw record. Records with no volume payload carry
    /// nothing usable and are dropped.
    pub fn into_book(self) -> Option<Book> {
        let info = self.volume_info?;

        let title = info.title.unwrap_or_else(|| NO_TITLE.to_string());
        let author = info
            .authors
            .filter(|authors| !authors.is_empty())
            .map(|mut authors| authors.remove(0))
            .unwrap_or_else(|| UNKNOWN_AUTHOR.to_string());
        let description = info
            .description
            .unwrap_or_else(|| NO_DESCRIPTION.to_string());
        let thumbnail = info
            .image_links
            .and_then(|links| links.thumbnail)
            .map(secure_url)
            .unwrap_or_default();
        let rating = info.average_rating.unwrap_or(0.0);

        Some(Book::new(title, author, description, thumbnail, rating))
    }
}

/// Upgrade a plain-http thumbnail link to the secure scheme.
fn secure_url(url: String) -> String {
    match url.strip_prefix("http://") {
        Some(rest) => format!("https://{rest}"),
        None => url,
    }
}
