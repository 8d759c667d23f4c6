//! 会话级场景：扫描 → 逐个申请 → 入账

mod common;

use std::time::Duration;

use common::{seeded_document, text_input, FakeJob, FakeSite, Harness, ENDLESS};
use quick_apply_agent::dom::DomAction;
use quick_apply_agent::models::{ApplicationDraft, ApplicationSource};

#[tokio::test]
async fn test_single_easy_apply_job_is_submitted_and_recorded() {
    let job = FakeJob::easy("4001", "Senior Rust Engineer", "Acme")
        .with_form(vec![text_input("email", "Email address")]);
    let h = Harness::new(FakeSite::new(vec![job]), seeded_document());

    let report = h.browser.start().await.expect("会话应该启动");

    assert_eq!(report.applied, 1);
    assert_eq!(report.failed, 0);
    assert!(h.progress.has_toast("Applied to Senior Rust Engineer (1/50)"));
    assert!(h.progress.has_toast("Completed! Applied to 1 jobs"));
    assert_eq!(h.site.clicks_on("apply"), 1);
    assert_eq!(h.site.clicks_on("dismiss"), 1);
    assert!(!h.site.is_modal_open());
    assert!(h
        .site
        .actions_on("email")
        .contains(&DomAction::SetValue("jane@example.com".into())));

    let doc = h.store.snapshot().await;
    assert_eq!(doc.applications.len(), 1);
    let record = &doc.applications[0];
    assert_eq!(record.job_title, "Senior Rust Engineer");
    assert_eq!(record.company, "Acme");
    assert_eq!(record.platform, "linkedin");
    assert_eq!(record.source, ApplicationSource::AutoApply);
    assert_eq!(doc.stats.total_applications, 1);
    assert!(!doc.session.is_processing);
    assert!(!h.control.is_processing());
}

#[tokio::test]
async fn test_external_job_is_skipped_without_opening_modal() {
    let jobs = vec![
        FakeJob::external("1", "Platform Engineer", "Globex"),
        FakeJob::easy("2", "Backend Engineer", "Initech"),
    ];
    let h = Harness::new(FakeSite::new(jobs), seeded_document());

    let report = h.browser.start().await.unwrap();

    assert_eq!(report.skipped, 1);
    assert_eq!(report.applied, 1);
    // 外部职位只点击了卡片
    assert_eq!(h.site.clicks_on("link-0"), 1);
    assert_eq!(h.site.clicks_on("apply"), 1);
    let doc = h.store.snapshot().await;
    assert_eq!(doc.applications.len(), 1);
    assert_eq!(doc.applications[0].company, "Initech");
}

#[tokio::test]
async fn test_processed_jobs_are_not_scanned_again() {
    let h = Harness::new(
        FakeSite::new(vec![FakeJob::easy("77", "Rust Developer", "Acme")]),
        seeded_document(),
    );

    let first = h.browser.start().await.unwrap();
    assert_eq!(first.applied, 1);

    let second = h.browser.start().await.unwrap();
    assert_eq!(second, Default::default());
    assert!(h.progress.has_toast("No new jobs found to process."));
    assert_eq!(h.site.clicks_on("apply"), 1);
}

#[tokio::test]
async fn test_daily_limit_counts_earlier_applications() {
    let mut doc = seeded_document();
    doc.settings.daily_limit = 2;
    let jobs = vec![
        FakeJob::easy("1", "Rust Engineer", "A Corp"),
        FakeJob::easy("2", "Systems Engineer", "B Corp"),
        FakeJob::easy("3", "Backend Engineer", "C Corp"),
    ];
    let h = Harness::new(FakeSite::new(jobs), doc);
    h.ledger()
        .record_completed(ApplicationDraft::new("Earlier Job", "Old Corp", "linkedin"))
        .await
        .unwrap();

    let report = h.browser.start().await.unwrap();

    assert_eq!(report.applied, 1);
    assert!(h.progress.has_toast("Applied to Rust Engineer (2/2)"));
    assert!(h.progress.has_toast("Daily limit of 2 applications reached"));
    assert_eq!(h.site.clicks_on("apply"), 1);
    assert_eq!(h.store.snapshot().await.applications.len(), 2);
}

#[tokio::test]
async fn test_endless_form_is_abandoned_after_ten_steps() {
    let h = Harness::new(
        FakeSite::new(vec![FakeJob::easy("9", "Rust Engineer", "Loop Inc").with_steps(ENDLESS)]),
        seeded_document(),
    );

    let report = h.browser.start().await.unwrap();

    assert_eq!(report.applied, 0);
    assert_eq!(report.failed, 1);
    assert_eq!(h.site.clicks_on("advance"), 10);
    assert!(h.store.snapshot().await.applications.is_empty());
}

#[tokio::test]
async fn test_failed_job_stays_eligible_for_next_scan() {
    let mut job = FakeJob::easy("5", "Rust Engineer", "Flaky Corp");
    job.opens_modal = false;
    let h = Harness::new(FakeSite::new(vec![job]), seeded_document());

    let report = h.browser.start().await.unwrap();
    assert_eq!(report.failed, 1);

    let jobs = h.browser.scan().await.unwrap();
    assert_eq!(jobs.len(), 1);
    assert_eq!(jobs[0].id, "5");
}

#[tokio::test]
async fn test_excluded_title_is_prefiltered() {
    let jobs = vec![
        FakeJob::easy("1", "Junior Web Developer", "Acme"),
        FakeJob::easy("2", "Staff Rust Engineer", "Acme"),
    ];
    let h = Harness::new(FakeSite::new(jobs), seeded_document());

    let report = h.browser.start().await.unwrap();

    assert_eq!(report.skipped, 1);
    assert_eq!(report.applied, 1);
    // 预过滤的职位不会被打开
    assert_eq!(h.site.clicks_on("link-0"), 0);
    // 预过滤的职位后面不倒计时，第二个职位是最后一个
    let ticks = h.progress.countdowns.lock().unwrap().clone();
    assert!(ticks.is_empty());
}

#[tokio::test]
async fn test_stop_during_countdown_ends_session() {
    let jobs = vec![
        FakeJob::easy("1", "Rust Engineer", "A Corp"),
        FakeJob::easy("2", "Systems Engineer", "B Corp"),
    ];
    let h = Harness::new(FakeSite::new(jobs), seeded_document());
    h.progress.stop_at_first_countdown(h.control.clone());

    let report = h.browser.start().await.unwrap();

    assert_eq!(report.applied, 1);
    assert_eq!(h.site.clicks_on("link-1"), 0);
    assert!(!h.store.snapshot().await.session.is_processing);
}

#[tokio::test]
async fn test_second_start_is_refused_while_running() {
    let h = Harness::new(FakeSite::new(Vec::new()), seeded_document());
    assert!(h.control.begin());

    assert!(h.browser.start().await.is_none());
    assert!(h.browser.stop().await);
    assert!(h.progress.has_toast("Auto-browse stopped"));
}

#[tokio::test]
async fn test_missing_job_list_reports_error() {
    let h = Harness::new(FakeSite::new(Vec::new()).without_list(), seeded_document());

    let report = h.browser.start().await.unwrap();

    assert_eq!(report, Default::default());
    assert!(h
        .progress
        .has_toast("Could not find job list. Are you on a LinkedIn jobs page?"));
}

/// 两个职位，间隔 3 秒
fn two_jobs_three_second_gap() -> Harness {
    let mut doc = seeded_document();
    doc.settings.delay_between_jobs.min_secs = 3;
    doc.settings.delay_between_jobs.max_secs = 3;
    Harness::new(
        FakeSite::new(vec![
            FakeJob::easy("1", "Rust Engineer", "A Corp"),
            FakeJob::easy("2", "Systems Engineer", "B Corp"),
        ]),
        doc,
    )
}

#[tokio::test]
async fn test_pause_freezes_countdown_until_resumed() {
    let h = two_jobs_three_second_gap();
    h.progress.pause_at_first_countdown(h.control.clone());

    let browser = h.browser.clone();
    let session = tokio::spawn(async move { browser.start().await });
    tokio::time::sleep(Duration::from_millis(200)).await;

    // 暂停期间倒计时停在第一格，第二个职位没有被打开
    assert!(h.control.is_paused());
    assert_eq!(h.progress.countdown_ticks(), vec![3]);
    assert_eq!(h.site.clicks_on("link-1"), 0);

    assert!(!h.browser.toggle_pause());
    let report = session.await.unwrap().unwrap();

    assert_eq!(report.applied, 2);
    assert_eq!(h.progress.countdown_ticks(), vec![3, 2, 1, 0]);
    assert_eq!(h.site.clicks_on("link-1"), 1);
}

#[tokio::test]
async fn test_stop_while_paused_ends_countdown() {
    let h = two_jobs_three_second_gap();
    h.progress.pause_at_first_countdown(h.control.clone());

    let browser = h.browser.clone();
    let session = tokio::spawn(async move { browser.start().await });
    tokio::time::sleep(Duration::from_millis(200)).await;
    assert!(h.control.is_paused());

    assert!(h.browser.stop().await);
    let report = session.await.unwrap().unwrap();

    assert_eq!(report.applied, 1);
    assert_eq!(h.progress.countdown_ticks(), vec![3, 0]);
    assert_eq!(h.site.clicks_on("link-1"), 0);
    assert!(!h.store.snapshot().await.session.is_processing);
}

#[tokio::test]
async fn test_confirmation_without_dismiss_counts_when_modal_closed() {
    let site = FakeSite::new(vec![FakeJob::easy("1", "Rust Engineer", "Acme")])
        .without_dismiss()
        .closing_on_submit();
    let h = Harness::new(site, seeded_document());

    let report = h.browser.start().await.unwrap();

    assert_eq!(report.applied, 1);
    assert_eq!(h.site.clicks_on("dismiss"), 0);
    assert_eq!(h.store.snapshot().await.applications.len(), 1);
}

#[tokio::test]
async fn test_confirmation_without_dismiss_fails_while_modal_open() {
    let site = FakeSite::new(vec![FakeJob::easy("1", "Rust Engineer", "Acme")]).without_dismiss();
    let h = Harness::new(site, seeded_document());

    let report = h.browser.start().await.unwrap();

    assert_eq!(report.applied, 0);
    assert_eq!(report.failed, 1);
    assert!(h.site.is_modal_open());
    assert!(h.store.snapshot().await.applications.is_empty());
}

#[tokio::test]
async fn test_stop_leaves_running_session_state_to_session_task() {
    let mut doc = seeded_document();
    doc.session.is_processing = true;
    let h = Harness::new(FakeSite::new(Vec::new()), doc);

    assert!(h.control.begin());
    assert!(h.browser.stop().await);
    assert!(h.store.snapshot().await.session.is_processing);

    // 没有会话在运行时直接清掉残留标志
    assert!(!h.browser.stop().await);
    assert!(!h.store.snapshot().await.session.is_processing);
}
