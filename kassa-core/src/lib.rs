//! Kassa Core - CSV transaction import for the Kassa budgeting backend
//!
//! This crate implements the import engine following hexagonal architecture:
//!
//! - **domain**: Core entities (ParsedTable, CategoryRecord, PreparedTransaction, ...)
//! - **parse**: CSV tokenizer, mapping inference, field normalizers
//! - **ports**: Trait definitions for the remote services (category, transaction, tenant)
//! - **services**: Reconciliation and import orchestration
//! - **adapters**: Concrete clients (Connect HTTP, in-memory)

pub mod adapters;
pub mod config;
pub mod domain;
pub mod parse;
pub mod ports;
pub mod services;

use std::path::Path;
use std::sync::Arc;

use anyhow::Result;

use adapters::ConnectBackend;
use config::Config;
use ports::{CategoryClient, TenantClient, TransactionClient};
use services::ImportService;

// Re-export commonly used types at crate root
pub use domain::result::Error;
pub use domain::{
    CategoryKind, CategoryRecord, ColumnMapping, Money, ParsedTable, PreparedTransaction,
    TransactionType,
};
pub use services::{ImportOutcome, ImportPreview, ImportProgress, ImportSession};

/// Main context for Kassa operations
///
/// The primary entry point: holds the configuration and the import service
/// wired to a backend. The engine itself only ever sees the client traits,
/// so tests and batch tools can swap the backend for an in-memory one.
pub struct KassaContext {
    pub config: Config,
    pub import_service: ImportService,
}

impl KassaContext {
    /// Create a context backed by the configured Connect backend
    pub fn new(kassa_dir: &Path) -> Result<Self> {
        let config = Config::load(kassa_dir)?;
        let backend_url = config.backend_url.as_deref().ok_or_else(|| {
            anyhow::anyhow!("No backend URL configured; run `kassa config set-url <url>` first")
        })?;
        let backend = Arc::new(ConnectBackend::new(
            backend_url,
            config.auth_token.clone(),
        )?);
        Ok(Self::with_clients(
            config,
            backend.clone(),
            backend.clone(),
            backend,
        ))
    }

    /// Create a context over explicit client implementations
    pub fn with_clients(
        config: Config,
        categories: Arc<dyn CategoryClient>,
        transactions: Arc<dyn TransactionClient>,
        tenants: Arc<dyn TenantClient>,
    ) -> Self {
        let import_service = ImportService::new(categories, transactions, tenants);
        Self {
            config,
            import_service,
        }
    }
}
