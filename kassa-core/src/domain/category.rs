//! Category taxonomy entities

use serde::{Deserialize, Serialize};

/// Whether a category collects income or expenses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CategoryKind {
    Income,
    Expense,
}

/// Localized category name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryTranslation {
    pub locale: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// A category as owned by the remote category service
///
/// The import engine only reads these and, optionally, requests creation of
/// new ones; it never mutates them locally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryRecord {
    pub id: String,
    pub code: String,
    pub kind: CategoryKind,
    #[serde(default)]
    pub is_active: bool,
    /// Denormalized display name, when the backend sends one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub translations: Vec<CategoryTranslation>,
}

impl CategoryRecord {
    /// Human-readable name: explicit name, then `ru` translation, then `en`,
    /// then the first translation, then the code.
    pub fn display_name(&self) -> &str {
        if let Some(name) = self.name.as_deref() {
            return name;
        }
        for locale in ["ru", "en"] {
            if let Some(tr) = self.translations.iter().find(|t| t.locale == locale) {
                return &tr.name;
            }
        }
        self.translations
            .first()
            .map(|t| t.name.as_str())
            .unwrap_or(&self.code)
    }

    /// True if the raw name matches this category's code or any translation,
    /// compared trimmed and lower-cased
    pub fn matches_name(&self, raw: &str) -> bool {
        let normalized = normalize_category_name(raw);
        if normalize_category_name(&self.code) == normalized {
            return true;
        }
        self.translations
            .iter()
            .any(|t| normalize_category_name(&t.name) == normalized)
    }
}

/// Canonical form used for all category name comparisons
pub fn normalize_category_name(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// A category name from the file that matched nothing in the taxonomy
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingCategory {
    /// Raw name as it appears in the file (trimmed)
    pub name: String,
    /// Kind guessed from the rows carrying this name
    pub inferred_kind: CategoryKind,
}
