//! In-memory backend
//!
//! Implements all three client ports against plain vectors behind mutexes.
//! Used by the integration tests and by offline/demo runs of the CLI; it
//! records every write so a test can assert exactly what the engine
//! submitted, and can be told to start failing after N transaction creates
//! to exercise the abort-without-rollback path.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::result::{Error, Result};
use crate::domain::{
    CategoryKind, CategoryRecord, PreparedTransaction, Tenant, TenantMembership,
};
use crate::ports::{CategoryClient, NewCategory, TenantClient, TransactionClient};

/// In-memory stand-in for the remote budget backend
#[derive(Debug, Default)]
pub struct MemoryBackend {
    categories: Mutex<Vec<CategoryRecord>>,
    transactions: Mutex<Vec<PreparedTransaction>>,
    memberships: Mutex<Vec<TenantMembership>>,
    next_id: AtomicU64,
    /// When set, transaction creates beyond this count are rejected
    fail_transactions_after: Mutex<Option<usize>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the category taxonomy
    pub fn with_categories(self, categories: Vec<CategoryRecord>) -> Self {
        *self.categories.lock().unwrap() = categories;
        self
    }

    /// Seed tenant memberships
    pub fn with_membership(self, tenant_id: &str, default_currency: &str) -> Self {
        self.memberships.lock().unwrap().push(TenantMembership {
            tenant: Tenant {
                id: tenant_id.to_string(),
                name: tenant_id.to_string(),
                default_currency_code: Some(default_currency.to_string()),
            },
            role: None,
        });
        self
    }

    /// Reject transaction creates after the first `n` succeed
    pub fn fail_transactions_after(&self, n: usize) {
        *self.fail_transactions_after.lock().unwrap() = Some(n);
    }

    /// Everything submitted via `create_transaction`, in call order
    pub fn created_transactions(&self) -> Vec<PreparedTransaction> {
        self.transactions.lock().unwrap().clone()
    }

    /// Current taxonomy, including categories created through the port
    pub fn all_categories(&self) -> Vec<CategoryRecord> {
        self.categories.lock().unwrap().clone()
    }
}

#[async_trait]
impl CategoryClient for MemoryBackend {
    async fn list_categories(
        &self,
        kind: CategoryKind,
        include_inactive: bool,
    ) -> Result<Vec<CategoryRecord>> {
        Ok(self
            .categories
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.kind == kind && (include_inactive || c.is_active))
            .cloned()
            .collect())
    }

    async fn create_category(&self, category: &NewCategory) -> Result<CategoryRecord> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        let record = CategoryRecord {
            id: format!("mem-cat-{}", id),
            code: category.code.clone(),
            kind: category.kind,
            is_active: category.is_active,
            name: None,
            translations: category.translations.clone(),
        };
        self.categories.lock().unwrap().push(record.clone());
        Ok(record)
    }
}

#[async_trait]
impl TransactionClient for MemoryBackend {
    async fn create_transaction(&self, tx: &PreparedTransaction) -> Result<()> {
        let mut transactions = self.transactions.lock().unwrap();
        if let Some(limit) = *self.fail_transactions_after.lock().unwrap() {
            if transactions.len() >= limit {
                return Err(Error::backend("simulated transaction-create failure"));
            }
        }
        transactions.push(tx.clone());
        Ok(())
    }
}

#[async_trait]
impl TenantClient for MemoryBackend {
    async fn list_my_tenants(&self) -> Result<Vec<TenantMembership>> {
        Ok(self.memberships.lock().unwrap().clone())
    }
}
