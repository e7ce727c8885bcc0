//! Transaction domain model

use serde::{Deserialize, Serialize};

use crate::domain::category::CategoryKind;

/// Direction of a transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionType {
    Income,
    Expense,
}

impl TransactionType {
    /// The category kind a transaction of this type belongs to
    pub fn category_kind(self) -> CategoryKind {
        match self {
            Self::Income => CategoryKind::Income,
            Self::Expense => CategoryKind::Expense,
        }
    }
}

/// Monetary amount in minor units (cents, kopecks)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Money {
    pub currency_code: String,
    pub minor_units: i64,
}

/// A fully-normalized CSV row, ready for submission
///
/// A row yields one of these only if its date, amount, and type all parsed;
/// no partial or defaulted transaction is ever built. The amount is stored
/// as its absolute value, direction is carried solely by `transaction_type`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedTransaction {
    pub transaction_type: TransactionType,
    pub amount: Money,
    /// Local-time epoch seconds
    pub occurred_at: i64,
    pub category_id: Option<String>,
    pub comment: String,
}
