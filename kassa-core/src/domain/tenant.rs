//! Tenant (account) entities
//!
//! The import engine reads the tenant list for exactly one thing: the
//! default currency code of the active tenant. Everything else about tenant
//! management belongs to the backend.

use serde::{Deserialize, Serialize};

/// A tenant the current user belongs to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tenant {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub default_currency_code: Option<String>,
}

/// Membership of the current user in a tenant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TenantMembership {
    pub tenant: Tenant,
    #[serde(default)]
    pub role: Option<String>,
}
