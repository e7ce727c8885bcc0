//! Integration tests for the import engine
//!
//! Network IO is replaced by the in-memory backend; the engine itself runs
//! exactly as it does against the production Connect client, one awaited
//! call at a time.
//!
//! Run with: cargo test --test import_tests -- --nocapture

use std::sync::Arc;

use chrono::{Local, NaiveDate, TimeZone};

use kassa_core::adapters::MemoryBackend;
use kassa_core::domain::category::CategoryTranslation;
use kassa_core::services::{ImportProgress, ImportService, ImportSession};
use kassa_core::{CategoryKind, CategoryRecord, TransactionType};

// ============================================================================
// Test Helpers
// ============================================================================

fn category(id: &str, code: &str, kind: CategoryKind, ru_name: &str) -> CategoryRecord {
    CategoryRecord {
        id: id.to_string(),
        code: code.to_string(),
        kind,
        is_active: true,
        name: None,
        translations: vec![CategoryTranslation {
            locale: "ru".to_string(),
            name: ru_name.to_string(),
            description: None,
        }],
    }
}

fn service(backend: &Arc<MemoryBackend>) -> ImportService {
    ImportService::new(backend.clone(), backend.clone(), backend.clone())
}

fn local_midnight(year: i32, month: u32, day: u32) -> i64 {
    let naive = NaiveDate::from_ymd_opt(year, month, day)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap();
    Local
        .from_local_datetime(&naive)
        .earliest()
        .unwrap()
        .timestamp()
}

// ============================================================================
// End-to-end commit
// ============================================================================

#[tokio::test]
async fn test_single_row_commit_end_to_end() {
    let backend = Arc::new(
        MemoryBackend::new()
            .with_categories(vec![category("cat-1", "Food", CategoryKind::Expense, "Еда")]),
    );
    let service = service(&backend);

    let text = "date,amount,currency,type,category,comment\n\
                2024-01-02,1200.50,RUB,expense,Food,Lunch\n";
    let session = ImportSession::from_text(text, '"', "RUB", "ru");

    let categories = service.load_categories().await.unwrap();
    let outcome = service
        .commit(&session, &categories, |_| {})
        .await
        .unwrap();

    assert_eq!(outcome.inserted, 1);
    assert_eq!(outcome.categories_created, 0);

    let created = backend.created_transactions();
    assert_eq!(created.len(), 1);
    let tx = &created[0];
    assert_eq!(tx.transaction_type, TransactionType::Expense);
    assert_eq!(tx.amount.currency_code, "RUB");
    assert_eq!(tx.amount.minor_units, 120_050);
    assert_eq!(tx.occurred_at, local_midnight(2024, 1, 2));
    assert_eq!(tx.category_id.as_deref(), Some("cat-1"));
    assert_eq!(tx.comment, "Lunch");
}

#[tokio::test]
async fn test_invalid_rows_are_skipped_not_submitted() {
    let backend = Arc::new(MemoryBackend::new());
    let service = service(&backend);

    let text = "date,amount\n\
                2024-01-02,-100\n\
                garbage,-100\n\
                2024-01-03,not-a-number\n\
                2024-01-04,50\n";
    let session = ImportSession::from_text(text, '"', "RUB", "ru");

    assert_eq!(session.preview().valid, 2);
    assert_eq!(session.preview().invalid, 2);

    let outcome = service.commit(&session, &[], |_| {}).await.unwrap();
    assert_eq!(outcome.inserted, 2);
    assert_eq!(outcome.total_rows, 4);
    assert_eq!(backend.created_transactions().len(), 2);
}

#[tokio::test]
async fn test_auto_create_missing_categories_before_transactions() {
    let backend = Arc::new(MemoryBackend::new());
    let service = service(&backend);

    let text = "date,amount,category\n\
                2024-01-02,-100,Taxi\n\
                2024-01-03,200,Bonus\n";
    let mut session = ImportSession::from_text(text, '"', "RUB", "ru");
    session.auto_create_missing_categories = true;

    let mut events = Vec::new();
    let outcome = service
        .commit(&session, &[], |p| events.push(p.clone()))
        .await
        .unwrap();

    assert_eq!(outcome.categories_created, 2);
    assert_eq!(outcome.inserted, 2);

    // Kinds follow the dominant transaction type per name
    let taxonomy = backend.all_categories();
    let taxi = taxonomy.iter().find(|c| c.code == "Taxi").unwrap();
    let bonus = taxonomy.iter().find(|c| c.code == "Bonus").unwrap();
    assert_eq!(taxi.kind, CategoryKind::Expense);
    assert_eq!(bonus.kind, CategoryKind::Income);

    // Created ids flow into the committed transactions
    for tx in backend.created_transactions() {
        assert!(tx.category_id.is_some());
    }

    // Both creates happen before the first insert
    let first_insert = events
        .iter()
        .position(|e| matches!(e, ImportProgress::Inserting { .. }))
        .unwrap();
    let creates = events
        .iter()
        .filter(|e| matches!(e, ImportProgress::CreatingCategory { .. }))
        .count();
    assert_eq!(creates, 2);
    assert!(events[..first_insert]
        .iter()
        .filter(|e| matches!(e, ImportProgress::CreatingCategory { .. }))
        .count() == 2);
}

#[tokio::test]
async fn test_manual_mapping_beats_automatic_match() {
    let backend = Arc::new(MemoryBackend::new().with_categories(vec![
        category("cat-1", "Food", CategoryKind::Expense, "Еда"),
        category("cat-2", "Groceries", CategoryKind::Expense, "Продукты"),
    ]));
    let service = service(&backend);

    let text = "date,amount,category\n2024-01-02,-100,Food\n";
    let mut session = ImportSession::from_text(text, '"', "RUB", "ru");
    session
        .manual_category_map
        .insert("Food".to_string(), "cat-2".to_string());

    let categories = service.load_categories().await.unwrap();
    service.commit(&session, &categories, |_| {}).await.unwrap();

    let created = backend.created_transactions();
    assert_eq!(created[0].category_id.as_deref(), Some("cat-2"));
}

#[tokio::test]
async fn test_unmatched_category_never_blocks_the_row() {
    let backend = Arc::new(MemoryBackend::new());
    let service = service(&backend);

    let text = "date,amount,category\n2024-01-02,-100,Mystery\n";
    let session = ImportSession::from_text(text, '"', "RUB", "ru");

    let outcome = service.commit(&session, &[], |_| {}).await.unwrap();
    assert_eq!(outcome.inserted, 1);
    assert!(backend.created_transactions()[0].category_id.is_none());
}

#[tokio::test]
async fn test_mid_commit_failure_keeps_applied_writes() {
    let backend = Arc::new(MemoryBackend::new());
    backend.fail_transactions_after(2);
    let service = service(&backend);

    let text = "date,amount\n\
                2024-01-02,-10\n\
                2024-01-03,-20\n\
                2024-01-04,-30\n";
    let session = ImportSession::from_text(text, '"', "RUB", "ru");

    let err = service.commit(&session, &[], |_| {}).await.unwrap_err();
    assert!(err.to_string().contains("Backend error"));

    // No rollback: the first two inserts stay applied
    assert_eq!(backend.created_transactions().len(), 2);
}

#[tokio::test]
async fn test_progress_counts_file_positions() {
    let backend = Arc::new(MemoryBackend::new());
    let service = service(&backend);

    // Row 2 is invalid, so inserts report positions 1 and 3 of 3
    let text = "date,amount\n2024-01-02,-10\nbad,-20\n2024-01-04,-30\n";
    let session = ImportSession::from_text(text, '"', "RUB", "ru");

    let mut messages = Vec::new();
    service
        .commit(&session, &[], |p| messages.push(p.to_string()))
        .await
        .unwrap();

    assert_eq!(messages[0], "preparing");
    assert!(messages.contains(&"inserting 1 / 3".to_string()));
    assert!(messages.contains(&"inserting 3 / 3".to_string()));
    assert!(!messages.contains(&"inserting 2 / 3".to_string()));
}

// ============================================================================
// Default currency
// ============================================================================

#[tokio::test]
async fn test_default_currency_from_active_tenant() {
    let backend = Arc::new(
        MemoryBackend::new()
            .with_membership("tenant-1", "USD")
            .with_membership("tenant-2", "EUR"),
    );
    let service = service(&backend);

    assert_eq!(
        service.default_currency(Some("tenant-2")).await.unwrap(),
        "EUR"
    );
    // Unknown or missing tenant id falls back to the first membership
    assert_eq!(
        service.default_currency(Some("nope")).await.unwrap(),
        "USD"
    );
    assert_eq!(service.default_currency(None).await.unwrap(), "USD");
}

#[tokio::test]
async fn test_default_currency_fallback_without_memberships() {
    let backend = Arc::new(MemoryBackend::new());
    let service = service(&backend);
    assert_eq!(service.default_currency(None).await.unwrap(), "RUB");
}

// ============================================================================
// Currency column
// ============================================================================

#[tokio::test]
async fn test_currency_cell_overrides_default() {
    let backend = Arc::new(MemoryBackend::new());
    let service = service(&backend);

    let text = "date,amount,currency\n\
                2024-01-02,-10,USD\n\
                2024-01-03,-20,\n";
    let session = ImportSession::from_text(text, '"', "KZT", "ru");

    service.commit(&session, &[], |_| {}).await.unwrap();
    let created = backend.created_transactions();
    assert_eq!(created[0].amount.currency_code, "USD");
    assert_eq!(created[1].amount.currency_code, "KZT");
}
