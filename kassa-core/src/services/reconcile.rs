//! Category reconciliation
//!
//! Free-text category names from the file are matched against the tenant's
//! taxonomy by normalized code or translation name. Whatever doesn't match
//! becomes the missing set, each entry annotated with a kind guessed from
//! the rows that carry the name. The pure functions here feed both the
//! auto-create path and the manual mapping flow in the import service.

use std::collections::{BTreeSet, HashMap};

use crate::domain::{
    normalize_category_name, CategoryKind, CategoryRecord, ColumnMapping, MissingCategory,
    ParsedTable, TransactionType,
};
use crate::parse::{infer_type, parse_amount_minor_units};

/// Lookup from normalized code/translation name to category
#[derive(Debug, Default)]
pub struct CategoryIndex {
    by_name: HashMap<String, CategoryRecord>,
}

impl CategoryIndex {
    /// Build the index across both kinds
    ///
    /// Later entries win on collision, matching the behavior of rebuilding
    /// a plain map from the concatenated income+expense listing.
    pub fn build(categories: &[CategoryRecord]) -> Self {
        let mut by_name = HashMap::new();
        for cat in categories {
            by_name.insert(normalize_category_name(&cat.code), cat.clone());
            for tr in &cat.translations {
                by_name.insert(normalize_category_name(&tr.name), cat.clone());
            }
        }
        Self { by_name }
    }

    /// Look up a raw category string (trimmed + lower-cased internally)
    pub fn lookup(&self, raw: &str) -> Option<&CategoryRecord> {
        self.by_name.get(&normalize_category_name(raw))
    }
}

/// Outcome of matching the file's category names against the taxonomy
#[derive(Debug, Default)]
pub struct Reconciliation {
    /// Normalized name -> matched category id
    pub matched: HashMap<String, String>,
    /// Names that matched nothing, with their guessed kinds
    pub missing: Vec<MissingCategory>,
}

/// Distinct non-empty category values in the mapped column, sorted
pub fn distinct_category_names(table: &ParsedTable, mapping: &ColumnMapping) -> Vec<String> {
    let Some(idx) = mapping
        .category_column
        .as_deref()
        .and_then(|c| table.column_index(c))
    else {
        return Vec::new();
    };
    let mut names = BTreeSet::new();
    for row in &table.rows {
        let value = table.cell(row, Some(idx)).trim();
        if !value.is_empty() {
            names.insert(value.to_string());
        }
    }
    names.into_iter().collect()
}

/// Match every distinct file category against the taxonomy
pub fn reconcile(
    table: &ParsedTable,
    mapping: &ColumnMapping,
    categories: &[CategoryRecord],
) -> Reconciliation {
    let index = CategoryIndex::build(categories);
    let names = distinct_category_names(table, mapping);

    let mut matched = HashMap::new();
    let mut missing_names = Vec::new();
    for name in names {
        match index.lookup(&name) {
            Some(cat) => {
                matched.insert(normalize_category_name(&name), cat.id.clone());
            }
            None => missing_names.push(name),
        }
    }

    let kinds = suggest_kinds(table, mapping, &missing_names);
    let missing = missing_names
        .into_iter()
        .map(|name| {
            let inferred_kind = kinds
                .get(&name)
                .copied()
                .unwrap_or(CategoryKind::Expense);
            MissingCategory {
                name,
                inferred_kind,
            }
        })
        .collect();

    Reconciliation { matched, missing }
}

/// Guess a kind per missing name from the dominant transaction type among
/// its rows: income wins ties, names with no usable rows default to expense
pub fn suggest_kinds(
    table: &ParsedTable,
    mapping: &ColumnMapping,
    missing_names: &[String],
) -> HashMap<String, CategoryKind> {
    let idx = mapping.indices(table);
    let mut counts: HashMap<&str, (u32, u32)> = HashMap::new();

    for row in &table.rows {
        let cat = table.cell(row, idx.category).trim();
        let Some(name) = missing_names.iter().find(|n| n.as_str() == cat) else {
            continue;
        };
        let amount = match idx.amount {
            Some(_) => parse_amount_minor_units(table.cell(row, idx.amount)),
            None => None,
        };
        let raw_type = idx.kind.map(|_| table.cell(row, idx.kind));
        let entry = counts.entry(name.as_str()).or_default();
        match infer_type(raw_type, amount) {
            Some(TransactionType::Income) => entry.0 += 1,
            Some(TransactionType::Expense) => entry.1 += 1,
            None => {}
        }
    }

    missing_names
        .iter()
        .map(|name| {
            // Majority vote, income wins ties; no usable rows means no
            // vote at all and falls through to expense
            let kind = match counts.get(name.as_str()) {
                Some(&(inc, exp)) if inc + exp > 0 && inc >= exp => CategoryKind::Income,
                _ => CategoryKind::Expense,
            };
            (name.clone(), kind)
        })
        .collect()
}

/// Final name-to-id resolution at commit time
///
/// The manual map always beats a coincidental automatic match; names with
/// no mapping at all leave the transaction uncategorized rather than
/// blocking the row.
#[derive(Debug, Default)]
pub struct CategoryResolver {
    manual: HashMap<String, String>,
    matched: HashMap<String, String>,
}

impl CategoryResolver {
    pub fn new(matched: HashMap<String, String>, manual: &HashMap<String, String>) -> Self {
        let manual = manual
            .iter()
            .filter(|(_, id)| !id.is_empty())
            .map(|(name, id)| (normalize_category_name(name), id.clone()))
            .collect();
        Self { manual, matched }
    }

    /// Record an auto-created category id under the raw file name
    pub fn add_created(&mut self, raw_name: &str, id: String) {
        self.matched.insert(normalize_category_name(raw_name), id);
    }

    /// Resolve a raw category cell, manual first, then matched/created
    pub fn resolve(&self, raw: &str) -> Option<String> {
        let name = normalize_category_name(raw);
        if name.is_empty() {
            return None;
        }
        self.manual
            .get(&name)
            .or_else(|| self.matched.get(&name))
            .cloned()
    }
}
