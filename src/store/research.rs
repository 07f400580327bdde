//! Single-slot research cache and per-product link overrides
//!
//! The research result and the override map live under separate keys, so a
//! new fetch replaces the products without touching admin overrides. The
//! two are combined when links are resolved.

use std::collections::HashMap;

use log::{debug, info};

use super::manager::{Store, StoreError};
use crate::data::ResearchResult;

const RESEARCH_KEY: &str = "research";
const CUSTOM_LINKS_KEY: &str = "custom_links";

/// Holds the last fetched research result and the admin link overrides
#[derive(Debug, Clone)]
pub struct ResearchCache {
    store: Store,
}

impl ResearchCache {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    /// Returns the stored result, or `None` if nothing has been fetched yet
    pub fn get(&self) -> Option<ResearchResult> {
        self.store.read::<ResearchResult>(RESEARCH_KEY)
    }

    /// Replaces the stored result
    pub fn save(&self, result: &ResearchResult) -> Result<(), StoreError> {
        self.store.write(RESEARCH_KEY, result)?;
        info!("Saved research result with {} products", result.items.len());
        Ok(())
    }

    /// Returns all overrides keyed by product id
    pub fn overrides(&self) -> HashMap<String, String> {
        self.store
            .read::<HashMap<String, String>>(CUSTOM_LINKS_KEY)
            .unwrap_or_default()
    }

    /// Returns the override for one product, if set
    pub fn override_for(&self, product_id: &str) -> Option<String> {
        self.overrides().remove(product_id)
    }

    /// Records an override for `product_id`
    ///
    /// The id does not have to exist in the current result. The link is
    /// stored verbatim; an empty or whitespace-only link clears the override.
    pub fn set_link_override(&self, product_id: &str, link: &str) -> Result<(), StoreError> {
        let mut overrides = self.overrides();

        if link.trim().is_empty() {
            if overrides.remove(product_id).is_none() {
                return Ok(());
            }
            debug!("Cleared link override for '{}'", product_id);
        } else {
            overrides.insert(product_id.to_string(), link.to_string());
            debug!("Set link override for '{}'", product_id);
        }

        self.store.write(CUSTOM_LINKS_KEY, &overrides)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::sample_product;
    use std::fs;
    use tempfile::TempDir;

    fn create_test_cache() -> (ResearchCache, TempDir) {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let cache = ResearchCache::new(Store::with_dir(temp_dir.path().to_path_buf()));
        (cache, temp_dir)
    }

    #[test]
    fn test_get_is_none_before_first_save() {
        let (cache, _temp_dir) = create_test_cache();
        assert!(cache.get().is_none());
    }

    #[test]
    fn test_save_then_get_returns_result() {
        let (cache, _temp_dir) = create_test_cache();
        let result = ResearchResult::new(vec![sample_product("a", "x.com/a")]);

        cache.save(&result).unwrap();

        assert_eq!(cache.get(), Some(result));
    }

    #[test]
    fn test_save_replaces_previous_result() {
        let (cache, _temp_dir) = create_test_cache();
        cache
            .save(&ResearchResult::new(vec![sample_product("a", "x.com/a")]))
            .unwrap();
        let second = ResearchResult::new(vec![
            sample_product("b", "x.com/b"),
            sample_product("c", "x.com/c"),
        ]);

        cache.save(&second).unwrap();

        let stored = cache.get().unwrap();
        assert_eq!(stored.items.len(), 2);
        assert!(
            stored.items.iter().all(|p| p.id != "a"),
            "Only one result is retained"
        );
    }

    #[test]
    fn test_override_for_unknown_id_is_stored() {
        let (cache, _temp_dir) = create_test_cache();

        cache.set_link_override("never-fetched", "aff.com/n").unwrap();

        assert_eq!(
            cache.override_for("never-fetched").as_deref(),
            Some("aff.com/n")
        );
    }

    #[test]
    fn test_override_survives_new_save() {
        let (cache, _temp_dir) = create_test_cache();
        cache.set_link_override("a", "aff.com/a").unwrap();

        cache
            .save(&ResearchResult::new(vec![sample_product("a", "x.com/a")]))
            .unwrap();
        cache
            .save(&ResearchResult::new(vec![sample_product("a", "x.com/a2")]))
            .unwrap();

        assert_eq!(cache.override_for("a").as_deref(), Some("aff.com/a"));
    }

    #[test]
    fn test_override_replaced_and_cleared() {
        let (cache, _temp_dir) = create_test_cache();
        cache.set_link_override("a", "aff.com/1").unwrap();
        cache.set_link_override("b", "aff.com/b").unwrap();

        cache.set_link_override("a", "aff.com/2").unwrap();
        assert_eq!(cache.override_for("a").as_deref(), Some("aff.com/2"));

        cache.set_link_override("a", "   ").unwrap();
        assert!(cache.override_for("a").is_none());
        assert_eq!(cache.overrides().len(), 1);
    }

    #[test]
    fn test_corrupt_override_map_reads_empty() {
        let (cache, temp_dir) = create_test_cache();
        fs::write(temp_dir.path().join("custom_links.json"), "[[[").unwrap();

        assert!(cache.overrides().is_empty());

        cache.set_link_override("a", "aff.com/a").unwrap();
        assert_eq!(cache.override_for("a").as_deref(), Some("aff.com/a"));
    }
}
