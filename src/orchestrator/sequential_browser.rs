//! 顺序浏览器 - 编排层
//!
//! ## 职责
//!
//! 一次会话的完整调度：扫描职位列表，逐个打开职位，
//! 快速申请的职位交给 `StepDriver`，成功后写入账本。
//!
//! ## 状态
//!
//! - 会话：Idle → Scanning → Processing → Idle
//! - 单个职位：Select → Open → (Apply) → CoolDown
//!
//! ## 设计特点
//!
//! - **严格顺序**：同一时间只操作一个职位、一个步骤
//! - **协作式取消**：在职位、步骤和倒计时边界检查 `SessionControl`
//! - **错误边界**：单个职位的错误只影响该职位；会话级错误写入错误日志后重置为 Idle

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

use crate::dom::{ElementInfo, HostPage, SelectorCatalog};
use crate::error::{AppError, AppResult, RejectReason};
use crate::models::{ApplicationDraft, ApplicationSource, JobCandidate, Platform, Settings};
use crate::services::{
    ApplicationLedger, FieldClassifier, JobFilter, JobScanner, ProgressSink, ToastKind,
    ValueApplier,
};
use crate::utils::logging::log_queue_loaded;
use crate::utils::timing::{wait, Timing};
use crate::workflow::{ApplyCtx, SessionControl, StepDriver, StepState};

/// 暂停时检查标志的最小间隔
const MIN_PAUSE_POLL: Duration = Duration::from_millis(20);

/// 会话统计
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionReport {
    pub applied: usize,
    pub skipped: usize,
    pub failed: usize,
}

/// 单个职位的处理结果
#[derive(Debug)]
enum JobOutcome {
    Applied(ApplicationDraft),
    NotQuickApply,
    Failed(String),
}

/// 顺序浏览器
///
/// 持有页面端口、账本和会话标志；只有它驱动页面
pub struct SequentialBrowser {
    page: Arc<dyn HostPage>,
    ledger: ApplicationLedger,
    progress: Arc<dyn ProgressSink>,
    control: Arc<SessionControl>,
    timing: Timing,
    processed: Mutex<HashSet<String>>,
}

impl SequentialBrowser {
    pub fn new(
        page: Arc<dyn HostPage>,
        ledger: ApplicationLedger,
        progress: Arc<dyn ProgressSink>,
        control: Arc<SessionControl>,
        timing: Timing,
    ) -> Self {
        Self {
            page,
            ledger,
            progress,
            control,
            timing,
            processed: Mutex::new(HashSet::new()),
        }
    }

    pub fn control(&self) -> &Arc<SessionControl> {
        &self.control
    }

    pub fn ledger(&self) -> &ApplicationLedger {
        &self.ledger
    }

    /// 根据当前页面 URL 识别平台
    pub async fn platform(&self) -> AppResult<Platform> {
        Ok(Platform::detect(&self.page.current_url().await?))
    }

    /// 扫描当前页面，不打开任何职位
    pub async fn scan(&self) -> AppResult<Vec<JobCandidate>> {
        let platform = self.platform().await?;
        self.scan_on(platform).await
    }

    async fn scan_on(&self, platform: Platform) -> AppResult<Vec<JobCandidate>> {
        let processed = self.processed.lock().await.clone();
        JobScanner::new(
            self.page.as_ref(),
            platform,
            &self.timing,
            self.progress.as_ref(),
        )
        .scan(&processed)
        .await
    }

    /// 运行一次会话
    ///
    /// 已在运行时直接返回 None；会话级错误在这里被捕获
    pub async fn start(&self) -> Option<SessionReport> {
        if !self.control.begin() {
            info!("⚠️ 会话已在运行中，忽略启动请求");
            return None;
        }
        Some(self.run_begun().await)
    }

    /// 接管调用方已经 `begin` 的会话
    ///
    /// 开始前已被停止时不扫描也不打开任何职位
    pub async fn run_begun(&self) -> SessionReport {
        let mut report = SessionReport::default();
        if !self.control.is_processing() {
            info!("⏹️ 会话在开始前已被停止");
            self.persist_processing(false).await;
            return report;
        }
        info!("🚀 开始自动浏览与申请...");
        self.persist_processing(true).await;

        if let Err(e) = self.run_session(&mut report).await {
            error!("❌ 会话异常终止: {}", e);
            if let Err(log_err) = self.ledger.log_error("Auto-browse Error", &e.to_string()).await {
                warn!("⚠️ 写入错误日志失败: {}", log_err);
            }
        }

        self.control.stop();
        self.progress.hide().await;
        self.persist_processing(false).await;
        info!(
            "🏁 会话结束: 申请 {} 个，跳过 {} 个，失败 {} 个",
            report.applied, report.skipped, report.failed
        );
        report
    }

    /// 请求停止，返回停止前是否在运行
    ///
    /// 正在进行的申请会在下一个步骤边界退出；运行中的会话由会话任务在结束时写回状态
    pub async fn stop(&self) -> bool {
        let was_running = self.control.stop();
        if was_running {
            info!("⏹️ 已请求停止自动浏览");
            self.progress.hide().await;
            self.progress
                .toast("Auto-browse stopped", ToastKind::Warning)
                .await;
        } else {
            self.persist_processing(false).await;
        }
        was_running
    }

    /// 切换暂停，返回切换后是否处于暂停
    pub fn toggle_pause(&self) -> bool {
        let paused = self.control.toggle_pause();
        info!("{}", if paused { "⏸️ 已暂停" } else { "▶️ 已继续" });
        paused
    }

    async fn run_session(&self, report: &mut SessionReport) -> AppResult<()> {
        // 设置在会话开始时读取一次
        let doc = self.ledger.load().await?;
        let settings = doc.settings;
        let classifier = FieldClassifier::new(doc.user_profile, doc.custom_answers)
            .with_preferred_locations(settings.locations.clone());
        let limit = settings.daily_limit;
        let today_before = self.ledger.today_count().await?;

        self.progress.show(limit).await;
        self.progress.update_count(today_before, limit).await;

        let platform = self.platform().await?;
        let queue = self.scan_on(platform).await?;
        if queue.is_empty() {
            self.progress
                .toast("No new jobs found to process.", ToastKind::Warning)
                .await;
            return Ok(());
        }
        log_queue_loaded(
            queue.len(),
            queue.iter().filter(|j| j.has_quick_apply).count(),
        );

        let catalog = SelectorCatalog::for_platform(platform);
        let total = queue.len();

        for (i, job) in queue.iter().enumerate() {
            if !self.wait_while_paused().await {
                info!("⏹️ 会话已停止");
                break;
            }
            if today_before + report.applied >= limit {
                warn!("🛑 已达到每日上限 {}", limit);
                self.progress
                    .toast(
                        &format!("Daily limit of {} applications reached", limit),
                        ToastKind::Warning,
                    )
                    .await;
                break;
            }

            let ctx = ApplyCtx::new(job, i + 1, total);
            self.progress.update_job(job, i + 1, total).await;

            if let Err(reason) = prefilter(&settings, job) {
                info!("{} ⏭️ 预过滤跳过: {}", ctx, reason);
                self.mark_processed(job).await;
                report.skipped += 1;
                continue;
            }

            match self.process_job(job, &ctx, catalog, &classifier).await {
                Ok(JobOutcome::Applied(draft)) => {
                    report.applied += 1;
                    self.mark_processed(job).await;
                    self.record(draft, &ctx).await;
                    let count = today_before + report.applied;
                    self.progress
                        .toast(
                            &format!("Applied to {} ({}/{})", job.title, count, limit),
                            ToastKind::Success,
                        )
                        .await;
                    self.progress.update_count(count, limit).await;
                }
                Ok(JobOutcome::NotQuickApply) => {
                    info!("{} ⏭️ 不是 Easy Apply 职位，跳过", ctx);
                    self.mark_processed(job).await;
                    report.skipped += 1;
                }
                Ok(JobOutcome::Failed(reason)) => {
                    warn!("{} ⚠️ 申请未完成: {}", ctx, reason);
                    report.failed += 1;
                }
                Err(e) => {
                    error!("{} ❌ 处理职位出错: {}", ctx, e);
                    report.failed += 1;
                }
            }

            if i + 1 < total {
                self.countdown(settings.delay_between_jobs.sample_secs())
                    .await;
            }
        }

        self.progress
            .toast(
                &format!("Completed! Applied to {} jobs", report.applied),
                ToastKind::Success,
            )
            .await;
        Ok(())
    }

    /// Open → (Apply)
    async fn process_job(
        &self,
        job: &JobCandidate,
        ctx: &ApplyCtx,
        catalog: &'static SelectorCatalog,
        classifier: &FieldClassifier,
    ) -> AppResult<JobOutcome> {
        let page = self.page.as_ref();
        let applier = ValueApplier::new(page, &self.timing);

        info!("{} 🖱️ 打开职位", ctx);
        applier.open_card(&job.dom_handle).await?;
        if !job.has_quick_apply {
            return Ok(JobOutcome::NotQuickApply);
        }

        wait(self.timing.apply_pre_wait).await;
        let draft = self.read_details(job, catalog).await?;

        let Some(trigger) = self.find_trigger(ctx, catalog).await? else {
            return Ok(JobOutcome::Failed("未找到 Easy Apply 按钮".to_string()));
        };
        info!("{} 🖱️ 点击 Easy Apply", ctx);
        applier.click(&trigger.handle).await?;
        wait(self.timing.modal_open_wait).await;

        if !catalog.modal.is_present(page).await? {
            return Ok(JobOutcome::Failed("点击后弹窗没有打开".to_string()));
        }
        info!("{} ✅ 申请弹窗已打开", ctx);

        let outcome = StepDriver::new(page, catalog, classifier, &self.timing, &self.control)
            .run(ctx)
            .await?;
        match outcome.status {
            StepState::Done => Ok(JobOutcome::Applied(draft)),
            StepState::Abandoned(reason) => Ok(JobOutcome::Failed(format!(
                "{} (第 {} 步)",
                reason, outcome.iterations
            ))),
            other => Ok(JobOutcome::Failed(format!("意外的结束状态 {:?}", other))),
        }
    }

    /// 轮询快速申请按钮
    async fn find_trigger(
        &self,
        ctx: &ApplyCtx,
        catalog: &'static SelectorCatalog,
    ) -> AppResult<Option<ElementInfo>> {
        let attempts = self.timing.trigger_poll_attempts;
        for attempt in 1..=attempts {
            if let Some(button) = catalog.quick_apply_trigger.first_hit(self.page.as_ref()).await? {
                return Ok(Some(button));
            }
            debug!("{} ⏳ 等待 Easy Apply 按钮... {}/{}", ctx, attempt, attempts);
            wait(self.timing.trigger_poll_interval).await;
        }
        Ok(None)
    }

    /// 从详情面板读取职位信息，读不到时使用卡片上的值
    async fn read_details(
        &self,
        job: &JobCandidate,
        catalog: &'static SelectorCatalog,
    ) -> AppResult<ApplicationDraft> {
        let page = self.page.as_ref();
        let title = catalog.detail_title.first_text(page).await?;
        let company = catalog.detail_company.first_text(page).await?;
        let location = catalog.detail_location.first_text(page).await?;
        let description = catalog.detail_description.first_text(page).await?;
        let url = page.current_url().await.ok().filter(|u| !u.is_empty());

        let mut draft = ApplicationDraft::new(
            title.unwrap_or_else(|| job.title.clone()),
            company.unwrap_or_else(|| job.company.clone()),
            job.platform.name(),
        );
        draft.location = location.or_else(|| Some(job.location.clone()));
        draft.description = description;
        draft.url = url;
        draft.source = Some(ApplicationSource::AutoApply);
        Ok(draft)
    }

    /// 入账；重复或写入失败只记日志
    async fn record(&self, draft: ApplicationDraft, ctx: &ApplyCtx) {
        match self.ledger.record_completed(draft).await {
            Ok(record) => debug!("{} 已入账 #{}", ctx, record.id),
            Err(AppError::Rejected(RejectReason::Duplicate)) => {
                info!("{} ℹ️ 账本中已有该职位的记录", ctx);
            }
            Err(e) => error!("{} ❌ 申请已提交但入账失败: {}", ctx, e),
        }
    }

    async fn mark_processed(&self, job: &JobCandidate) {
        self.processed.lock().await.insert(job.id.clone());
    }

    /// 暂停时原地等待，返回会话是否仍在运行
    async fn wait_while_paused(&self) -> bool {
        loop {
            if !self.control.is_processing() {
                return false;
            }
            if !self.control.is_paused() {
                return true;
            }
            wait(self.timing.countdown_tick.max(MIN_PAUSE_POLL)).await;
        }
    }

    /// CoolDown：按秒倒计时，停止即结束，暂停则冻结
    async fn countdown(&self, seconds: u64) {
        let mut remaining = seconds;
        while remaining > 0 {
            if !self.wait_while_paused().await {
                break;
            }
            self.progress.countdown(remaining).await;
            wait(self.timing.countdown_tick).await;
            remaining -= 1;
        }
        self.progress.countdown(0).await;
    }

    async fn persist_processing(&self, is_processing: bool) {
        if let Err(e) = self.ledger.set_processing(is_processing).await {
            warn!("⚠️ 保存会话状态失败: {}", e);
        }
    }
}

/// 打开职位前的智能预过滤
fn prefilter(settings: &Settings, job: &JobCandidate) -> Result<(), RejectReason> {
    if !settings.smart_filter_enabled {
        return Ok(());
    }
    JobFilter::new(settings).check_candidate(job)
}
