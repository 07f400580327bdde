//! Core data models for the catalog browser
//!
//! This module contains the product, research, settings and lead types used
//! throughout the application, plus the trend sources that produce products.

pub mod catalog;
pub mod trends;

pub use catalog::CatalogFileSource;
pub use trends::{NoTrendSource, TrendFetcher, TrendsClient, TrendsError};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A product surfaced by trend research
///
/// Field names follow the camelCase shape of the trend feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Unique identifier within a research result
    pub id: String,
    /// Display name
    pub name: String,
    /// Market niche, e.g. "Casa" or "Fitness"
    #[serde(default)]
    pub niche: String,
    /// Short marketing description
    #[serde(default)]
    pub description: String,
    /// Base outbound link to the product page
    pub link: String,
    /// Product image URL
    #[serde(default)]
    pub image_url: String,
    /// Selling platform, e.g. "Shopee"
    #[serde(default)]
    pub platform: String,
    /// Affiliate link supplied with the product, used ahead of the prefix
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub affiliate_link: Option<String>,
    /// Total commission percentage offered by the platform
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_commission: Option<f64>,
    /// Commission percentage passed through to the partner
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub partner_commission: Option<f64>,
}

/// The single retained result of a trend fetch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResearchResult {
    /// When the products were fetched
    pub last_updated: DateTime<Utc>,
    /// Products in feed order
    pub items: Vec<Product>,
}

impl ResearchResult {
    /// Creates a result stamped with the current time
    pub fn new(items: Vec<Product>) -> Self {
        Self {
            last_updated: Utc::now(),
            items,
        }
    }
}

/// Global affiliate configuration
///
/// The default is an empty prefix with auto-apply disabled.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppSettings {
    /// Prefix prepended to base links, e.g.
    /// `https://shopee.com.br/universal-link?aff_id=123&url=`
    pub global_affiliate_prefix: String,
    /// Whether the prefix is applied at all
    pub auto_apply_prefix: bool,
}

/// A consent record captured from a product landing view
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lead {
    pub id: String,
    pub email: String,
    pub product_id: String,
    pub product_name: String,
    pub niche: String,
    pub consented_at: DateTime<Utc>,
}

/// A product as shown to the user, with its resolved outbound link
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListedProduct {
    /// The product as fetched
    pub product: Product,
    /// The link the user is sent to
    pub outbound_link: String,
}

impl ListedProduct {
    /// Case-insensitive substring match over name and niche
    ///
    /// `query_lower` must already be lowercased; an empty query matches.
    pub fn matches(&self, query_lower: &str) -> bool {
        self.product.name.to_lowercase().contains(query_lower)
            || self.product.niche.to_lowercase().contains(query_lower)
    }
}

#[cfg(test)]
pub(crate) fn sample_product(id: &str, link: &str) -> Product {
    Product {
        id: id.to_string(),
        name: format!("Product {}", id),
        niche: "Casa".to_string(),
        description: String::new(),
        link: link.to_string(),
        image_url: String::new(),
        platform: "Shopee".to_string(),
        affiliate_link: None,
        total_commission: None,
        partner_commission: None,
    }
}
