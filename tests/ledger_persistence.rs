//! 账本 + JSON 文件存储

use std::sync::Arc;

use chrono::Local;
use quick_apply_agent::models::{ApplicationDraft, ApplicationStatus};
use quick_apply_agent::services::{ApplicationLedger, LogProgress};
use quick_apply_agent::storage::{DocumentStore, JsonFileStore};

fn ledger(store: Arc<JsonFileStore>) -> ApplicationLedger {
    ApplicationLedger::new(store, Arc::new(LogProgress))
}

#[tokio::test]
async fn test_records_survive_reopening_the_store() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("quick_apply.json");

    let first = ledger(Arc::new(JsonFileStore::new(&path)));
    let mut draft = ApplicationDraft::new("Rust Engineer", "Acme", "linkedin");
    draft.description = Some("Rust, Python and React. Salary $140,000 per year".into());
    let record = first.process_application(draft).await.unwrap();
    assert_eq!(record.salary, Some(140000));
    assert!(record.match_score > 0.0 && record.match_score <= 1.0);

    let reopened = ledger(Arc::new(JsonFileStore::new(&path)));
    let applications = reopened.real_applications().await.unwrap();
    assert_eq!(applications.len(), 1);
    assert_eq!(applications[0].id, record.id);
    assert_eq!(reopened.today_count().await.unwrap(), 1);
}

#[tokio::test]
async fn test_startup_maintenance_on_file_store() {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(JsonFileStore::new(dir.path().join("data.json")));
    let ledger = ledger(store.clone());

    ledger
        .record_completed(ApplicationDraft::new("A", "X", "linkedin"))
        .await
        .unwrap();
    ledger
        .record_completed(ApplicationDraft::new("B", "Y", "linkedin"))
        .await
        .unwrap();

    // 手工制造一条重复记录，并把一条改成面试
    let mut doc = store.load().await.unwrap();
    let mut copy = doc.applications[0].clone();
    copy.id = "copy".into();
    doc.applications.push(copy);
    doc.applications[1].status = ApplicationStatus::Interview;
    store.save(&doc).await.unwrap();

    assert_eq!(ledger.sweep_duplicates().await.unwrap(), 1);
    let stats = ledger.update_response_rates().await.unwrap();
    assert_eq!(stats.response_rate, 50);
    assert_eq!(stats.interviews_scheduled, 1);

    let today = Local::now().date_naive();
    assert!(ledger.reset_daily_stats(today).await.unwrap());
    assert!(!ledger.reset_daily_stats(today).await.unwrap());
    assert_eq!(ledger.stats().await.unwrap().today_applications, 0);
}
