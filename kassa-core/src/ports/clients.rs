//! Remote service client ports
//!
//! The budgeting backend exposes category, transaction, and tenant services.
//! The import engine depends only on these traits; adapters provide the
//! actual transport (Connect HTTP in production, in-memory for tests).

use async_trait::async_trait;

use crate::domain::result::Result;
use crate::domain::{
    CategoryKind, CategoryRecord, CategoryTranslation, PreparedTransaction, TenantMembership,
};

/// Payload for creating a category
#[derive(Debug, Clone)]
pub struct NewCategory {
    pub kind: CategoryKind,
    pub code: String,
    pub is_active: bool,
    pub translations: Vec<CategoryTranslation>,
}

impl NewCategory {
    /// Category named after a raw CSV value, with one translation in the
    /// session locale
    pub fn from_raw_name(name: &str, kind: CategoryKind, locale: &str) -> Self {
        Self {
            kind,
            code: name.to_string(),
            is_active: true,
            translations: vec![CategoryTranslation {
                locale: locale.to_string(),
                name: name.to_string(),
                description: None,
            }],
        }
    }
}

/// Category service abstraction
#[async_trait]
pub trait CategoryClient: Send + Sync {
    /// List categories of one kind
    async fn list_categories(
        &self,
        kind: CategoryKind,
        include_inactive: bool,
    ) -> Result<Vec<CategoryRecord>>;

    /// Create a category, returning the stored record (with its new id)
    async fn create_category(&self, category: &NewCategory) -> Result<CategoryRecord>;
}

/// Transaction service abstraction
#[async_trait]
pub trait TransactionClient: Send + Sync {
    /// Create one transaction
    async fn create_transaction(&self, tx: &PreparedTransaction) -> Result<()>;
}

/// Tenant service abstraction
#[async_trait]
pub trait TenantClient: Send + Sync {
    /// List tenants the current user belongs to
    async fn list_my_tenants(&self) -> Result<Vec<TenantMembership>>;
}
