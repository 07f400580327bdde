//! Consent lead capture
//!
//! Leads are appended to a persisted list and otherwise left alone.

use chrono::Utc;
use log::info;
use thiserror::Error;

use super::manager::{Store, StoreError};
use crate::data::{Lead, Product};

const LEADS_KEY: &str = "leads";

/// Errors that can occur when capturing a lead
#[derive(Debug, Error)]
pub enum LeadError {
    /// The email address is obviously not one
    #[error("Invalid email address: '{0}'")]
    InvalidEmail(String),

    /// The lead could not be persisted
    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Debug, Clone)]
pub struct LeadStore {
    store: Store,
}

impl LeadStore {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    /// Returns all captured leads in capture order
    pub fn all(&self) -> Vec<Lead> {
        self.store
            .read::<Vec<Lead>>(LEADS_KEY)
            .unwrap_or_default()
    }

    /// Records that `email` consented to offers for `product`
    pub fn capture(&self, email: &str, product: &Product) -> Result<Lead, LeadError> {
        let email = email.trim();
        if !email.contains('@') {
            return Err(LeadError::InvalidEmail(email.to_string()));
        }

        let consented_at = Utc::now();
        let lead = Lead {
            id: format!("{}-{}", product.id, consented_at.timestamp_millis()),
            email: email.to_string(),
            product_id: product.id.clone(),
            product_name: product.name.clone(),
            niche: product.niche.clone(),
            consented_at,
        };

        let mut leads = self.all();
        leads.push(lead.clone());
        self.store.write(LEADS_KEY, &leads)?;

        info!("Captured lead for product '{}'", product.id);
        Ok(lead)
    }
}
