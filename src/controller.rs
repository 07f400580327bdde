//! Listing state and refresh policy for the catalog browser
//!
//! The controller decides whether to fetch trends or reuse the research
//! cache, runs every product through the link resolver, and keeps the
//! projected list, loading flag and search query the presentation reads.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use log::{debug, info, warn};

use crate::data::{AppSettings, ListedProduct, Product, ResearchResult, TrendFetcher};
use crate::links::resolve;
use crate::store::{ResearchCache, SettingsStore, StoreError};

/// What a call to [`Controller::load`] did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The cached result was reused without fetching
    Cached,
    /// Fresh products were fetched and stored
    Fetched,
    /// A fetch was attempted but returned nothing usable; prior data kept
    Unchanged,
}

/// Orchestrates the trend source, research cache and settings
pub struct Controller {
    /// Source of trending products
    fetcher: Box<dyn TrendFetcher>,
    /// Single-slot research result and link overrides
    research: ResearchCache,
    /// Global affiliate settings
    settings: SettingsStore,
    /// Result the current projection was built from
    current: Option<ResearchResult>,
    /// Products with resolved links, in feed order
    products: Vec<ListedProduct>,
    /// Whether a load is in progress
    loading: bool,
    /// Current search text
    search_query: String,
}

impl Controller {
    pub fn new(
        fetcher: Box<dyn TrendFetcher>,
        research: ResearchCache,
        settings: SettingsStore,
    ) -> Self {
        Self {
            fetcher,
            research,
            settings,
            current: None,
            products: Vec::new(),
            loading: false,
            search_query: String::new(),
        }
    }

    /// Loads the product list
    ///
    /// Without `force`, a cached result is used as-is and only an empty cache
    /// triggers a fetch. With `force`, trends are always fetched. A failed or
    /// empty fetch never replaces existing data.
    ///
    /// Taking `&mut self` keeps a single fetch in flight per controller.
    pub async fn load(&mut self, force: bool) -> LoadOutcome {
        self.loading = true;

        let cached = if force { None } else { self.research.get() };
        let (result, outcome) = match cached {
            Some(result) => {
                debug!("Using cached research from {}", result.last_updated);
                (Some(result), LoadOutcome::Cached)
            }
            None => self.refresh().await,
        };

        self.project(result);
        self.loading = false;
        outcome
    }

    /// Fetches trends and stores them, falling back to the cache on failure
    async fn refresh(&mut self) -> (Option<ResearchResult>, LoadOutcome) {
        let items = match self.fetcher.fetch_trends().await {
            Ok(items) if items.is_empty() => {
                warn!("Trend source returned no products; keeping cached research");
                return (self.fallback(), LoadOutcome::Unchanged);
            }
            Ok(items) => items,
            Err(e) => {
                warn!("Trend fetch failed: {}; keeping cached research", e);
                return (self.fallback(), LoadOutcome::Unchanged);
            }
        };

        let result = ResearchResult::new(dedup_by_id(items));
        if let Err(e) = self.research.save(&result) {
            warn!("Could not store research result: {}", e);
        }
        info!("Fetched {} trending products", result.items.len());
        (Some(result), LoadOutcome::Fetched)
    }

    fn fallback(&self) -> Option<ResearchResult> {
        self.research.get().or_else(|| self.current.clone())
    }

    /// Sets an admin link override and re-resolves the displayed list
    ///
    /// No fetch happens; the products already loaded (or cached) are reused.
    /// An empty link clears the override.
    pub fn apply_override(&mut self, product_id: &str, link: &str) -> Result<(), StoreError> {
        self.research.set_link_override(product_id, link)?;
        self.reproject();
        Ok(())
    }

    /// The admin override stored for `product_id`, whether or not it is listed
    pub fn link_override(&self, product_id: &str) -> Option<String> {
        self.research.override_for(product_id)
    }

    /// Saves global settings and re-resolves the displayed list
    pub fn save_settings(&mut self, settings: &AppSettings) -> Result<(), StoreError> {
        self.settings.save(settings)?;
        self.reproject();
        Ok(())
    }

    /// Returns the current global settings
    pub fn settings(&self) -> AppSettings {
        self.settings.get()
    }

    fn reproject(&mut self) {
        let result = self.current.take().or_else(|| self.research.get());
        self.project(result);
    }

    /// Rebuilds the projected list from `result` with current settings and overrides
    fn project(&mut self, result: Option<ResearchResult>) {
        let settings = self.settings.get();
        let overrides = self.research.overrides();

        self.products = result
            .as_ref()
            .map(|r| {
                r.items
                    .iter()
                    .map(|product| {
                        let link_override = overrides
                            .get(&product.id)
                            .map(String::as_str)
                            .filter(|l| !l.is_empty())
                            .or(product.affiliate_link.as_deref());
                        ListedProduct {
                            outbound_link: resolve(product, &settings, link_override),
                            product: product.clone(),
                        }
                    })
                    .collect()
            })
            .unwrap_or_default();
        self.current = result;
    }

    /// All projected products in feed order
    pub fn products(&self) -> &[ListedProduct] {
        &self.products
    }

    /// Projected products matching the search query
    pub fn visible_products(&self) -> Vec<&ListedProduct> {
        let query = self.search_query.to_lowercase();
        self.products.iter().filter(|p| p.matches(&query)).collect()
    }

    /// Looks up a projected product for its landing view
    pub fn product(&self, product_id: &str) -> Option<&ListedProduct> {
        self.products.iter().find(|p| p.product.id == product_id)
    }

    pub fn set_search_query(&mut self, query: impl Into<String>) {
        self.search_query = query.into();
    }

    pub fn search_query(&self) -> &str {
        &self.search_query
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// When the displayed products were fetched
    pub fn last_sync(&self) -> Option<DateTime<Utc>> {
        self.current.as_ref().map(|r| r.last_updated)
    }
}

/// Keeps the first product for each id
fn dedup_by_id(items: Vec<Product>) -> Vec<Product> {
    let mut seen = HashSet::new();
    let total = items.len();
    let unique: Vec<Product> = items
        .into_iter()
        .filter(|p| seen.insert(p.id.clone()))
        .collect();
    if unique.len() < total {
        warn!(
            "Dropped {} products with duplicate ids",
            total - unique.len()
        );
    }
    unique
}
