//! Trend feed client
//!
//! Fetches the list of trending products from a JSON feed. The feed may be a
//! bare array of products or an object with an `items` array.

use super::Product;
use async_trait::async_trait;
use log::{debug, warn};
use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;

/// Errors that can occur when fetching trending products
#[derive(Debug, Error)]
pub enum TrendsError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Local catalog could not be read
    #[error("Failed to read catalog: {0}")]
    IoError(#[from] std::io::Error),

    /// Feed body was not a product list
    #[error("Failed to parse trend feed: {0}")]
    ParseError(String),
}

/// A source of trending products
///
/// An empty list is a valid answer. Callers decide what an empty or failed
/// fetch means for their cached data.
#[async_trait]
pub trait TrendFetcher: Send + Sync {
    async fn fetch_trends(&self) -> Result<Vec<Product>, TrendsError>;
}

/// Accepted shapes of a trend feed body
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum FeedBody {
    List(Vec<Product>),
    Wrapped { items: Vec<Product> },
}

impl FeedBody {
    pub(crate) fn into_products(self) -> Vec<Product> {
        match self {
            FeedBody::List(items) | FeedBody::Wrapped { items } => items,
        }
    }
}

/// Parses a feed body into products
pub(crate) fn parse_feed(body: &str) -> Result<Vec<Product>, TrendsError> {
    serde_json::from_str::<FeedBody>(body)
        .map(FeedBody::into_products)
        .map_err(|e| TrendsError::ParseError(e.to_string()))
}

/// Client for fetching trending products over HTTP
#[derive(Debug, Clone)]
pub struct TrendsClient {
    /// HTTP client for making requests
    http_client: Client,
    /// Feed URL
    feed_url: String,
}

impl TrendsClient {
    /// Creates a client for the given feed URL
    pub fn new(feed_url: impl Into<String>) -> Self {
        Self {
            http_client: Client::new(),
            feed_url: feed_url.into(),
        }
    }
}

#[async_trait]
impl TrendFetcher for TrendsClient {
    async fn fetch_trends(&self) -> Result<Vec<Product>, TrendsError> {
        debug!("Fetching trends from {}", self.feed_url);

        let body = self
            .http_client
            .get(&self.feed_url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        parse_feed(&body)
    }
}

/// Source used when no feed or catalog is configured
///
/// Always returns an empty list, so cached research stays in place.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoTrendSource;

#[async_trait]
impl TrendFetcher for NoTrendSource {
    async fn fetch_trends(&self) -> Result<Vec<Product>, TrendsError> {
        warn!("No trend source configured; set --source-url or --catalog");
        Ok(Vec::new())
    }
}
