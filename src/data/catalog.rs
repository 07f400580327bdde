//! Local catalog file source
//!
//! Reads trending products from a JSON file on disk, in the same shape as the
//! HTTP feed. Useful offline and for curated catalogs.

use super::trends::{parse_feed, TrendFetcher, TrendsError};
use super::Product;
use async_trait::async_trait;
use log::debug;
use std::path::PathBuf;

/// Trend source backed by a JSON file
#[derive(Debug, Clone)]
pub struct CatalogFileSource {
    path: PathBuf,
}

impl CatalogFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl TrendFetcher for CatalogFileSource {
    async fn fetch_trends(&self) -> Result<Vec<Product>, TrendsError> {
        debug!("Reading catalog from {}", self.path.display());
        let body = tokio::fs::read_to_string(&self.path).await?;
        parse_feed(&body)
    }
}
