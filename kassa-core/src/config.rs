//! Configuration management
//!
//! Settings live in `settings.json` under the kassa directory:
//! ```json
//! {
//!   "app": { "backendUrl": "...", "locale": "ru", ... },
//!   "importProfiles": { "profiles": { ... } }
//! }
//! ```
//! Fields the CLI does not manage are preserved on save.

use std::collections::HashMap;
use std::path::Path;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::domain::ColumnMapping;

/// Raw settings.json structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SettingsFile {
    #[serde(default)]
    app: AppSettings,
    #[serde(default)]
    import_profiles: ImportProfilesContainer,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AppSettings {
    #[serde(default)]
    backend_url: Option<String>,
    #[serde(default)]
    auth_token: Option<String>,
    #[serde(default)]
    tenant_id: Option<String>,
    #[serde(default)]
    locale: Option<String>,
    #[serde(default)]
    currency: Option<String>,
    #[serde(flatten)]
    other: HashMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ImportProfilesContainer {
    #[serde(default)]
    profiles: HashMap<String, ImportProfile>,
}

/// Kassa configuration (simplified view of settings)
#[derive(Debug, Clone)]
pub struct Config {
    pub backend_url: Option<String>,
    pub auth_token: Option<String>,
    /// Active tenant, used to pick the default currency
    pub tenant_id: Option<String>,
    pub locale: String,
    /// Fallback currency used when the tenant list is unavailable
    pub currency: Option<String>,
    pub import_profiles: HashMap<String, ImportProfile>,
    // Keep the raw settings for preservation when saving
    raw_settings: SettingsFile,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend_url: None,
            auth_token: None,
            tenant_id: None,
            locale: "ru".to_string(),
            currency: None,
            import_profiles: HashMap::new(),
            raw_settings: SettingsFile::default(),
        }
    }
}

impl Config {
    /// Load config from the kassa directory
    ///
    /// The backend URL can be overridden via the `KASSA_BACKEND_URL`
    /// environment variable (for CI/testing).
    pub fn load(kassa_dir: &Path) -> Result<Self> {
        let settings_path = kassa_dir.join("settings.json");

        let raw: SettingsFile = if settings_path.exists() {
            let content = std::fs::read_to_string(&settings_path)?;
            serde_json::from_str(&content).unwrap_or_default()
        } else {
            SettingsFile::default()
        };

        let backend_url = std::env::var("KASSA_BACKEND_URL")
            .ok()
            .or_else(|| raw.app.backend_url.clone());

        Ok(Self {
            backend_url,
            auth_token: raw.app.auth_token.clone(),
            tenant_id: raw.app.tenant_id.clone(),
            locale: raw.app.locale.clone().unwrap_or_else(|| "ru".to_string()),
            currency: raw.app.currency.clone(),
            import_profiles: raw.import_profiles.profiles.clone(),
            raw_settings: raw,
        })
    }

    /// Save config to the kassa directory
    /// Preserves other settings that the CLI doesn't manage
    pub fn save(&self, kassa_dir: &Path) -> Result<()> {
        let settings_path = kassa_dir.join("settings.json");

        // Load existing settings to preserve fields we don't manage
        let mut settings = if settings_path.exists() {
            let content = std::fs::read_to_string(&settings_path)?;
            serde_json::from_str::<SettingsFile>(&content).unwrap_or_default()
        } else {
            self.raw_settings.clone()
        };

        settings.app.backend_url = self.backend_url.clone();
        settings.app.auth_token = self.auth_token.clone();
        settings.app.tenant_id = self.tenant_id.clone();
        settings.app.locale = Some(self.locale.clone());
        settings.app.currency = self.currency.clone();
        settings.import_profiles.profiles = self.import_profiles.clone();

        let content = serde_json::to_string_pretty(&settings)?;
        std::fs::write(&settings_path, content)?;
        Ok(())
    }
}

/// Saved import profile: a column mapping plus the parse settings that
/// produced it
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportProfile {
    pub column_mapping: ColumnMapping,
    #[serde(default)]
    pub delimiter: Option<char>,
    #[serde(default)]
    pub quote: Option<char>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(dir.path()).unwrap();
        assert!(config.backend_url.is_none());
        assert_eq!(config.locale, "ru");
        assert!(config.import_profiles.is_empty());
    }

    #[test]
    fn test_save_and_reload_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.backend_url = Some("https://budget.example.com".to_string());
        config.locale = "en".to_string();
        config.import_profiles.insert(
            "mybank".to_string(),
            ImportProfile {
                column_mapping: ColumnMapping {
                    date_column: Some("Дата операции".to_string()),
                    amount_column: Some("Сумма".to_string()),
                    ..Default::default()
                },
                delimiter: Some(';'),
                quote: None,
            },
        );
        config.save(dir.path()).unwrap();

        let reloaded = Config::load(dir.path()).unwrap();
        assert_eq!(
            reloaded.backend_url.as_deref(),
            Some("https://budget.example.com")
        );
        assert_eq!(reloaded.locale, "en");
        let profile = &reloaded.import_profiles["mybank"];
        assert_eq!(profile.delimiter, Some(';'));
        assert_eq!(
            profile.column_mapping.amount_column.as_deref(),
            Some("Сумма")
        );
    }

    #[test]
    fn test_save_preserves_unmanaged_fields() {
        let dir = tempfile::tempdir().unwrap();
        let settings_path = dir.path().join("settings.json");
        std::fs::write(
            &settings_path,
            r#"{"app": {"theme": "dark", "locale": "en"}}"#,
        )
        .unwrap();

        let config = Config::load(dir.path()).unwrap();
        config.save(dir.path()).unwrap();

        let content = std::fs::read_to_string(&settings_path).unwrap();
        let value: serde_json::Value = serde_json::from_str(&content).unwrap();
        assert_eq!(value["app"]["theme"], "dark");
        assert_eq!(value["app"]["locale"], "en");
    }
}
