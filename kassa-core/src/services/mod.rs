//! Service layer - business logic orchestration
//!
//! Services coordinate domain logic and port interactions. Each service
//! focuses on a specific use case or feature area.

pub mod import;
pub mod reconcile;

pub use import::{
    ImportOutcome, ImportPreview, ImportProgress, ImportService, ImportSession, RowPreview,
};
pub use reconcile::{
    distinct_category_names, reconcile, suggest_kinds, CategoryIndex, CategoryResolver,
    Reconciliation,
};
