//! CLI command implementations

pub mod categories;
pub mod import;
pub mod setup;

use std::path::PathBuf;

use anyhow::{Context, Result};
use kassa_core::KassaContext;

/// Get the kassa directory from environment or default
pub fn get_kassa_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("KASSA_DIR") {
        PathBuf::from(dir)
    } else {
        dirs::home_dir()
            .expect("Could not find home directory")
            .join(".kassa")
    }
}

/// Get or create kassa context
pub fn get_context() -> Result<KassaContext> {
    let kassa_dir = get_kassa_dir();

    std::fs::create_dir_all(&kassa_dir)
        .with_context(|| format!("Failed to create kassa directory: {:?}", kassa_dir))?;

    KassaContext::new(&kassa_dir).context("Failed to initialize kassa context")
}
