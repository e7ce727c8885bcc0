//! Domain entities for the import engine

pub mod category;
pub mod result;
pub mod table;
pub mod tenant;
pub mod transaction;

pub use category::{
    normalize_category_name, CategoryKind, CategoryRecord, CategoryTranslation, MissingCategory,
};
pub use table::{ColumnMapping, MappedIndices, ParsedTable};
pub use tenant::{Tenant, TenantMembership};
pub use transaction::{Money, PreparedTransaction, TransactionType};
