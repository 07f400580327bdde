//! Global affiliate settings persistence

use log::info;

use super::manager::{Store, StoreError};
use crate::data::AppSettings;

const SETTINGS_KEY: &str = "settings";

#[derive(Debug, Clone)]
pub struct SettingsStore {
    store: Store,
}

impl SettingsStore {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    /// Returns the saved settings, or the defaults if none are saved or the
    /// saved record is unreadable
    pub fn get(&self) -> AppSettings {
        self.store
            .read::<AppSettings>(SETTINGS_KEY)
            .unwrap_or_default()
    }

    /// Replaces the saved settings. The prefix is stored verbatim.
    pub fn save(&self, settings: &AppSettings) -> Result<(), StoreError> {
        self.store.write(SETTINGS_KEY, settings)?;
        info!(
            "Saved settings (auto-apply prefix: {})",
            settings.auto_apply_prefix
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn create_test_settings() -> (SettingsStore, TempDir) {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let settings = SettingsStore::new(Store::with_dir(temp_dir.path().to_path_buf()));
        (settings, temp_dir)
    }

    #[test]
    fn test_get_returns_defaults_when_never_saved() {
        let (settings, _temp_dir) = create_test_settings();
        assert_eq!(settings.get(), AppSettings::default());
    }

    #[test]
    fn test_save_replaces_settings_wholesale() {
        let (settings, _temp_dir) = create_test_settings();
        settings
            .save(&AppSettings {
                global_affiliate_prefix: "aff.com/?u=".to_string(),
                auto_apply_prefix: true,
            })
            .unwrap();

        let replacement = AppSettings {
            global_affiliate_prefix: String::new(),
            auto_apply_prefix: false,
        };
        settings.save(&replacement).unwrap();

        assert_eq!(settings.get(), replacement);
    }

    #[test]
    fn test_malformed_prefix_is_kept_verbatim() {
        let (settings, _temp_dir) = create_test_settings();
        let weird = AppSettings {
            global_affiliate_prefix: "  not a url ?? &&".to_string(),
            auto_apply_prefix: true,
        };

        settings.save(&weird).unwrap();

        assert_eq!(settings.get().global_affiliate_prefix, "  not a url ?? &&");
    }

    #[test]
    fn test_corrupt_settings_fall_back_to_defaults() {
        let (settings, temp_dir) = create_test_settings();
        fs::write(
            temp_dir.path().join("settings.json"),
            r#"{"data": {"autoApplyPrefix": "yes"}}"#,
        )
        .unwrap();

        assert_eq!(settings.get(), AppSettings::default());
    }
}
