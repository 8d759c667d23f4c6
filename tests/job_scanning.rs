//! 职位列表扫描

mod common;

use std::collections::HashSet;

use common::{FakeJob, FakeSite, RecordingProgress};
use quick_apply_agent::dom::{DomAction, ElementHandle};
use quick_apply_agent::models::Platform;
use quick_apply_agent::services::JobScanner;
use quick_apply_agent::utils::timing::Timing;

async fn scan(site: &FakeSite, processed: &HashSet<String>) -> Vec<quick_apply_agent::JobCandidate> {
    let timing = Timing::instant();
    let progress = RecordingProgress::default();
    JobScanner::new(site, Platform::Linkedin, &timing, &progress)
        .scan(processed)
        .await
        .unwrap()
}

#[tokio::test]
async fn test_card_identity_and_defaults() {
    let mut occludable = FakeJob::easy("unused", "Data Engineer", "Globex");
    occludable.job_id = None;
    occludable.occludable_id = Some("occ-2".into());

    let mut anonymous = FakeJob::external("unused", "QA Engineer", "Hooli");
    anonymous.job_id = None;
    anonymous.location = None;
    anonymous.has_link = false;

    let mut no_company = FakeJob::easy("4", "Ghost Role", "");
    no_company.company = None;

    let site = FakeSite::new(vec![
        FakeJob::easy("101", "Rust Engineer", "Acme"),
        occludable,
        anonymous,
        no_company,
    ]);

    let jobs = scan(&site, &HashSet::new()).await;

    assert_eq!(jobs.len(), 3);
    assert_eq!(jobs[0].id, "101");
    assert!(!jobs[0].synthesized_id);
    assert!(jobs[0].has_quick_apply);
    assert_eq!(jobs[0].dom_handle, ElementHandle::new("link-0"));

    assert_eq!(jobs[1].id, "occ-2");
    assert!(!jobs[1].synthesized_id);

    assert!(jobs[2].id.starts_with("job_2_"));
    assert!(jobs[2].synthesized_id);
    assert!(!jobs[2].has_quick_apply);
    assert_eq!(jobs[2].location, "N/A");
    assert_eq!(jobs[2].dom_handle, ElementHandle::new("card-2"));
}

#[tokio::test]
async fn test_processed_ids_are_filtered() {
    let site = FakeSite::new(vec![
        FakeJob::easy("1", "Rust Engineer", "Acme"),
        FakeJob::easy("2", "Go Engineer", "Acme"),
    ]);
    let processed: HashSet<String> = ["1".to_string()].into_iter().collect();

    let jobs = scan(&site, &processed).await;

    assert_eq!(jobs.len(), 1);
    assert_eq!(jobs[0].id, "2");
}

#[tokio::test]
async fn test_scroll_loads_more_once() {
    let site = FakeSite::new(vec![FakeJob::easy("1", "Rust Engineer", "Acme")]).with_more_jobs(vec![
        FakeJob::easy("2", "Go Engineer", "Initech"),
        FakeJob::easy("1", "Rust Engineer", "Acme"),
    ]);

    let jobs = scan(&site, &HashSet::new()).await;

    let ids: Vec<&str> = jobs.iter().map(|j| j.id.as_str()).collect();
    assert_eq!(ids, vec!["1", "2"]);
    assert_eq!(site.actions_on("list"), vec![DomAction::ScrollToBottom]);
}

#[tokio::test]
async fn test_unknown_platform_finds_nothing() {
    let site = FakeSite::new(vec![FakeJob::easy("1", "Rust Engineer", "Acme")])
        .at_url("https://www.indeed.com/jobs");
    let timing = Timing::instant();
    let progress = RecordingProgress::default();

    let jobs = JobScanner::new(&site, Platform::Indeed, &timing, &progress)
        .scan(&HashSet::new())
        .await
        .unwrap();

    assert!(jobs.is_empty());
    assert_eq!(progress.toasts.lock().unwrap().len(), 1);
}
