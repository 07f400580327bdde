//! Outbound link resolution
//!
//! Decides which link a product sends the user to. An admin override always
//! wins; otherwise the global affiliate prefix is prepended when auto-apply
//! is on; otherwise the product's base link is used as-is.

use crate::data::{AppSettings, Product};

/// Computes the effective outbound link for a product
///
/// # Arguments
/// * `product` - The product whose base link is used
/// * `settings` - Global affiliate prefix and auto-apply flag
/// * `link_override` - Admin-specified link for this product, if any
///
/// # Returns
/// * The override, unchanged, when it is non-empty
/// * `prefix + product.link` when auto-apply is on and the prefix is non-empty
/// * `product.link` otherwise
pub fn resolve(product: &Product, settings: &AppSettings, link_override: Option<&str>) -> String {
    if let Some(link) = link_override.filter(|l| !l.is_empty()) {
        return link.to_string();
    }

    if settings.auto_apply_prefix && !settings.global_affiliate_prefix.is_empty() {
        return format!("{}{}", settings.global_affiliate_prefix, product.link);
    }

    product.link.clone()
}
