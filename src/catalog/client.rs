//! HTTP client for the catalog provider.

use std::env;
use std::time::Duration;

use anyhow::Context;
use url::Url;

use crate::domain::Book;
use crate::error::{AppError, Result};

use super::types::VolumeList;

const DEFAULT_BASE_URL: &str = "https://www.googleapis.com/books/v1";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Catalog endpoint configuration. `BOOKERY_CATALOG_URL` and
/// `BOOKERY_CATALOG_KEY` override the defaults at runtime; tests point
/// `base_url` at a mock server.
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    pub timeout: Duration,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl CatalogConfig {
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(url) = env::var("BOOKERY_CATALOG_URL") {
            if !url.is_empty() {
                config.base_url = url;
            }
        }
        if let Ok(key) = env::var("BOOKERY_CATALOG_KEY") {
            if !key.is_empty() {
                config.api_key = Some(key);
            }
        }
        config
    }
}

/// Client for the catalog provider's volumes-search endpoint.
pub struct CatalogClient {
    http: reqwest::Client,
    config: CatalogConfig,
}

impl CatalogClient {
    pub fn new(config: CatalogConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .context("Failed to build catalog HTTP client")?;
        Ok(Self { http, config })
    }

    /// Free-text search. `query` may carry the `subject:<genre>` convention;
    /// the provider interprets it, this client passes it through untouched.
    pub async fn search(&self, query: &str, max_results: u32) -> Result<Vec<Book>> {
        let url = self.search_url(query, max_results)?;
        log::debug!("catalog search: q={query:?} max={max_results}");

        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| AppError::remote(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = if body.trim().is_empty() {
                format!("catalog returned status {status}")
            } else {
                body
            };
            log::warn!("catalog search failed with {status}");
            return Err(AppError::remote(message));
        }

        let list: VolumeList = response
            .json()
            .await
            .map_err(|e| AppError::remote(format!("failed to parse catalog response: {e}")))?;

        let books: Vec<Book> = list
            .items
            .unwrap_or_default()
            .into_iter()
            .filter_map(|volume| volume.into_book())
            .collect();
        log::debug!("catalog search returned {} books", books.len());
        Ok(books)
    }

    /// Genre browsing via the `subject:` filter convention.
    pub async fn search_by_genre(&self, genre: &str, max_results: u32) -> Result<Vec<Book>> {
        self.search(&format!("subject:{genre}"), max_results).await
    }

    /// The landing-page "top rated fiction" shelf.
    pub async fn top_rated(&self, max_results: u32) -> Result<Vec<Book>> {
        self.search("top rated fiction", max_results).await
    }

    fn search_url(&self, query: &str, max_results: u32) -> Result<Url> {
        let base = self.config.base_url.trim_end_matches('/');
        let mut url = Url::parse(&format!("{base}/volumes"))
            .context("Invalid catalog base URL")?;
        url.query_pairs_mut()
            .append_pair("q", query)
            .append_pair("maxResults", &max_results.to_string());
        if let Some(key) = &self.config.api_key {
            url.query_pairs_mut().append_pair("key", key);
        }
        Ok(url)
    }
}
