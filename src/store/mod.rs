//! Persistent state for the catalog browser
//!
//! `Store` is the key-value file layer. `ResearchCache`, `SettingsStore` and
//! `LeadStore` each own a fixed set of keys on top of it.

mod leads;
mod manager;
mod research;
mod settings;

pub use leads::{LeadError, LeadStore};
pub use manager::{Store, StoreError};
pub use research::ResearchCache;
pub use settings::SettingsStore;
