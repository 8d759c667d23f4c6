//! 集成测试共用的假页面
//!
//! `FakeSite` 按脚本模拟一个 LinkedIn 职位列表页：卡片、Easy Apply 按钮、
//! 申请弹窗的多步表单和成功提示。所有操作都会被记录下来。

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use quick_apply_agent::dom::{
    CardFields, DomAction, ElementHandle, ElementInfo, HostPage, RawCard, RawControl,
    ScrollMetrics, SelectOption,
};
use quick_apply_agent::error::{AppError, AppResult};
use quick_apply_agent::models::{JobCandidate, StoreDocument, UserProfile};
use quick_apply_agent::services::{ApplicationLedger, ProgressSink, ToastKind};
use quick_apply_agent::storage::MemoryStore;
use quick_apply_agent::utils::timing::Timing;
use quick_apply_agent::workflow::SessionControl;
use quick_apply_agent::SequentialBrowser;

pub const JOBS_URL: &str = "https://www.linkedin.com/jobs/search/?f_AL=true";

const LIST: &str = ".scaffold-layout__list";
const FIRST_CARD_SELECTOR: &str = "li.scaffold-layout__list-item";
const APPLY_BUTTON: &str = ".jobs-apply-button.jobs-apply-button--inline";
const MODAL: &str = "div.jobs-easy-apply-modal";
const CONTINUE_BUTTON: &str = "button[aria-label*=\"Continue\"]";
const COMPLETION_HEADER: &str = "h2.t-24, p.t-24, #post-apply-modal-header__text";
const DISMISS_BUTTON: &str = "button[aria-label=\"Dismiss\"]";
const VALIDATION_ERROR: &str = ".artdeco-inline-feedback--error";
const DETAIL_TITLE: &str = ".top-card-layout__title";
const DETAIL_COMPANY: &str = ".top-card-layout__card .top-card-layout__first-subline a";

/// 永远不会出现提交按钮的步骤数
pub const ENDLESS: usize = usize::MAX;

/// 脚本中的一个职位
#[derive(Debug, Clone)]
pub struct FakeJob {
    pub job_id: Option<String>,
    pub occludable_id: Option<String>,
    pub title: Option<String>,
    pub company: Option<String>,
    pub location: Option<String>,
    pub quick_apply: bool,
    /// 弹窗中点击几次"下一步"后出现成功提示
    pub steps: usize,
    /// 点击 Easy Apply 后弹窗是否打开
    pub opens_modal: bool,
    /// 卡片内是否有链接（没有时点击整张卡片）
    pub has_link: bool,
    /// 弹窗打开时的表单
    pub form: Vec<RawControl>,
}

impl FakeJob {
    pub fn easy(id: &str, title: &str, company: &str) -> Self {
        Self {
            job_id: Some(id.to_string()),
            occludable_id: None,
            title: Some(title.to_string()),
            company: Some(company.to_string()),
            location: Some("Remote".to_string()),
            quick_apply: true,
            steps: 2,
            opens_modal: true,
            has_link: true,
            form: Vec::new(),
        }
    }

    pub fn external(id: &str, title: &str, company: &str) -> Self {
        Self {
            quick_apply: false,
            ..Self::easy(id, title, company)
        }
    }

    pub fn with_steps(mut self, steps: usize) -> Self {
        self.steps = steps;
        self
    }

    pub fn with_form(mut self, form: Vec<RawControl>) -> Self {
        self.form = form;
        self
    }
}

#[derive(Debug, Default)]
struct SiteState {
    url: String,
    has_list: bool,
    jobs: Vec<FakeJob>,
    /// 滚动到底部后追加的职位
    more_jobs: Vec<FakeJob>,
    scrolled: bool,
    selected: Option<usize>,
    modal_open: bool,
    step: usize,
    completed: bool,
    controls: Vec<RawControl>,
    validation_error: bool,
    /// 成功提示旁没有关闭按钮
    no_dismiss: bool,
    /// 提交后弹窗自行关闭
    closes_on_submit: bool,
    /// 读取表单控件总是失败
    form_reads_fail: bool,
    actions: Vec<(String, DomAction)>,
}

impl SiteState {
    fn visible_jobs(&self) -> Vec<&FakeJob> {
        let extra = if self.scrolled { self.more_jobs.len() } else { 0 };
        self.jobs.iter().chain(self.more_jobs.iter().take(extra)).collect()
    }

    fn selected_job(&self) -> Option<&FakeJob> {
        let jobs = self.visible_jobs();
        self.selected.and_then(|i| jobs.get(i).copied())
    }

    fn click(&mut self, handle: &str) {
        if let Some(index) = card_index(handle) {
            self.selected = Some(index);
            return;
        }
        match handle {
            "apply" => {
                let Some(job) = self.selected_job().cloned() else {
                    return;
                };
                if job.opens_modal {
                    self.modal_open = true;
                    self.step = 0;
                    self.completed = job.steps == 0;
                    self.controls = job.form;
                }
            }
            "advance" => {
                self.step = self.step.saturating_add(1);
                let steps = self.selected_job().map(|j| j.steps).unwrap_or(0);
                if self.step >= steps {
                    self.completed = true;
                    if self.closes_on_submit {
                        self.modal_open = false;
                    }
                }
            }
            "dismiss" => {
                self.modal_open = false;
                self.completed = false;
                self.controls.clear();
            }
            _ => {}
        }
    }

    fn apply_to_control(&mut self, handle: &str, action: &DomAction) {
        let Some(pos) = self.controls.iter().position(|c| c.handle.as_str() == handle) else {
            return;
        };
        match action {
            DomAction::SetValue(value) => {
                self.controls[pos].value = value.clone();
                self.controls[pos].invalid = false;
            }
            DomAction::Clear => self.controls[pos].value.clear(),
            DomAction::SetChecked(checked) => {
                let name = self.controls[pos].name.clone();
                if *checked && self.controls[pos].input_type == "radio" {
                    for other in self.controls.iter_mut().filter(|c| c.name == name) {
                        other.checked = false;
                    }
                }
                self.controls[pos].checked = *checked;
            }
            DomAction::SelectIndex(index) => {
                self.controls[pos].selected_index = Some(*index);
                self.controls[pos].invalid = false;
            }
            _ => {}
        }
    }
}

fn card_index(handle: &str) -> Option<usize> {
    handle
        .strip_prefix("link-")
        .or_else(|| handle.strip_prefix("card-"))
        .and_then(|i| i.parse().ok())
}

fn element(handle: &str, tag: &str, text: &str) -> ElementInfo {
    ElementInfo {
        handle: ElementHandle::new(handle),
        tag: tag.to_string(),
        text: text.to_string(),
        aria_label: None,
        visible: true,
        disabled: false,
    }
}

/// 脚本化的假页面
pub struct FakeSite {
    state: Mutex<SiteState>,
}

impl FakeSite {
    pub fn new(jobs: Vec<FakeJob>) -> Self {
        Self {
            state: Mutex::new(SiteState {
                url: JOBS_URL.to_string(),
                has_list: true,
                jobs,
                ..SiteState::default()
            }),
        }
    }

    /// 滚动到底部后才出现的职位
    pub fn with_more_jobs(self, more: Vec<FakeJob>) -> Self {
        self.state.lock().unwrap().more_jobs = more;
        self
    }

    pub fn without_list(self) -> Self {
        self.state.lock().unwrap().has_list = false;
        self
    }

    pub fn at_url(self, url: &str) -> Self {
        self.state.lock().unwrap().url = url.to_string();
        self
    }

    /// 直接打开一个只有表单的弹窗（测试填写器用）
    pub fn with_open_form(self, form: Vec<RawControl>) -> Self {
        {
            let mut state = self.state.lock().unwrap();
            state.modal_open = true;
            state.controls = form;
        }
        self
    }

    pub fn with_validation_error(self) -> Self {
        self.state.lock().unwrap().validation_error = true;
        self
    }

    /// 成功提示出现后找不到关闭按钮
    pub fn without_dismiss(self) -> Self {
        self.state.lock().unwrap().no_dismiss = true;
        self
    }

    /// 提交后弹窗自行关闭
    pub fn closing_on_submit(self) -> Self {
        self.state.lock().unwrap().closes_on_submit = true;
        self
    }

    /// 表单控件采集脚本报错
    pub fn with_failing_form_reads(self) -> Self {
        self.state.lock().unwrap().form_reads_fail = true;
        self
    }

    pub fn actions(&self) -> Vec<(String, DomAction)> {
        self.state.lock().unwrap().actions.clone()
    }

    /// 对某个句柄执行过的操作
    pub fn actions_on(&self, handle: &str) -> Vec<DomAction> {
        self.actions()
            .into_iter()
            .filter(|(h, _)| h == handle)
            .map(|(_, a)| a)
            .collect()
    }

    pub fn clicks_on(&self, handle: &str) -> usize {
        self.actions_on(handle)
            .iter()
            .filter(|a| **a == DomAction::Click)
            .count()
    }

    pub fn control(&self, handle: &str) -> Option<RawControl> {
        self.state
            .lock()
            .unwrap()
            .controls
            .iter()
            .find(|c| c.handle.as_str() == handle)
            .cloned()
    }

    pub fn is_modal_open(&self) -> bool {
        self.state.lock().unwrap().modal_open
    }
}

#[async_trait]
impl HostPage for FakeSite {
    async fn current_url(&self) -> AppResult<String> {
        Ok(self.state.lock().unwrap().url.clone())
    }

    async fn query_all(&self, selector: &str) -> AppResult<Vec<ElementInfo>> {
        let state = self.state.lock().unwrap();
        let found = match selector {
            LIST if state.has_list => vec![element("list", "div", "")],
            APPLY_BUTTON => match state.selected_job() {
                Some(job) if job.quick_apply && !state.modal_open => {
                    vec![element("apply", "button", "Easy Apply")]
                }
                _ => Vec::new(),
            },
            MODAL if state.modal_open => vec![element("modal", "div", "")],
            CONTINUE_BUTTON if state.modal_open && !state.completed => {
                let steps = state.selected_job().map(|j| j.steps).unwrap_or(ENDLESS);
                let label = if state.step.saturating_add(1) >= steps {
                    "Submit application"
                } else {
                    "Next"
                };
                vec![element("advance", "button", label)]
            }
            COMPLETION_HEADER if state.completed => {
                vec![element("done", "h2", "Application sent")]
            }
            DISMISS_BUTTON if state.completed && !state.no_dismiss => {
                vec![element("dismiss", "button", "Dismiss")]
            }
            VALIDATION_ERROR if state.modal_open && state.validation_error => {
                vec![element("feedback", "div", "Please enter a valid answer")]
            }
            DETAIL_TITLE => state
                .selected_job()
                .and_then(|j| j.title.clone())
                .map(|t| vec![element("detail-title", "h1", &t)])
                .unwrap_or_default(),
            DETAIL_COMPANY => state
                .selected_job()
                .and_then(|j| j.company.clone())
                .map(|c| vec![element("detail-company", "a", &c)])
                .unwrap_or_default(),
            _ => Vec::new(),
        };
        Ok(found)
    }

    async fn form_controls(&self) -> AppResult<Vec<RawControl>> {
        let state = self.state.lock().unwrap();
        if state.form_reads_fail {
            return Err(AppError::Other("表单脚本执行失败".into()));
        }
        if state.modal_open && !state.completed {
            Ok(state.controls.clone())
        } else {
            Ok(Vec::new())
        }
    }

    async fn job_cards(
        &self,
        container: &ElementHandle,
        card_selector: &str,
        _fields: &CardFields,
    ) -> AppResult<Vec<RawCard>> {
        let state = self.state.lock().unwrap();
        if container.as_str() != "list" || card_selector != FIRST_CARD_SELECTOR {
            return Ok(Vec::new());
        }
        Ok(state
            .visible_jobs()
            .iter()
            .enumerate()
            .map(|(i, job)| RawCard {
                handle: ElementHandle::new(format!("card-{}", i)),
                click_handle: job
                    .has_link
                    .then(|| ElementHandle::new(format!("link-{}", i))),
                job_id_attr: job.job_id.clone(),
                occludable_id_attr: job.occludable_id.clone(),
                title: job.title.clone(),
                company: job.company.clone(),
                location: job.location.clone(),
                text: format!(
                    "{} {} {}",
                    job.title.clone().unwrap_or_default(),
                    job.company.clone().unwrap_or_default(),
                    if job.quick_apply { "Easy Apply" } else { "Apply" }
                ),
            })
            .collect())
    }

    async fn scroll_metrics(&self, handle: &ElementHandle) -> AppResult<ScrollMetrics> {
        let state = self.state.lock().unwrap();
        if handle.as_str() != "list" {
            return Ok(ScrollMetrics::default());
        }
        let rows = state.visible_jobs().len() as f64;
        let scrollable = !state.more_jobs.is_empty();
        Ok(ScrollMetrics {
            scroll_height: 100.0 * rows + if scrollable && !state.scrolled { 1.0 } else { 0.0 },
            client_height: if scrollable { 50.0 } else { 100.0 * rows },
        })
    }

    async fn perform(&self, handle: &ElementHandle, action: DomAction) -> AppResult<()> {
        let mut state = self.state.lock().unwrap();
        state
            .actions
            .push((handle.as_str().to_string(), action.clone()));
        match &action {
            DomAction::Click => state.click(handle.as_str()),
            DomAction::ScrollToBottom if handle.as_str() == "list" => state.scrolled = true,
            other => state.apply_to_control(handle.as_str(), other),
        }
        Ok(())
    }
}

// ========== 表单控件 ==========

pub fn text_input(handle: &str, label: &str) -> RawControl {
    RawControl {
        handle: ElementHandle::new(handle),
        tag: "input".into(),
        input_type: "text".into(),
        name: handle.into(),
        label_for: Some(label.into()),
        visible: true,
        ..RawControl::default()
    }
}

pub fn radio(handle: &str, group: &str, question: &str, option: &str) -> RawControl {
    RawControl {
        handle: ElementHandle::new(handle),
        tag: "input".into(),
        input_type: "radio".into(),
        name: group.into(),
        fieldset_legend: Some(question.into()),
        option_label: Some(option.into()),
        visible: true,
        ..RawControl::default()
    }
}

pub fn select(handle: &str, label: &str, options: &[&str]) -> RawControl {
    let mut all = vec![SelectOption {
        index: 0,
        text: "Select an option".into(),
        value: String::new(),
    }];
    all.extend(options.iter().enumerate().map(|(i, text)| SelectOption {
        index: i + 1,
        text: text.to_string(),
        value: text.to_string(),
    }));
    RawControl {
        handle: ElementHandle::new(handle),
        tag: "select".into(),
        name: handle.into(),
        label_for: Some(label.into()),
        visible: true,
        options: all,
        selected_index: Some(0),
        ..RawControl::default()
    }
}

// ========== 进度记录 ==========

/// 记录所有进度输出的 sink
#[derive(Default)]
pub struct RecordingProgress {
    pub toasts: Mutex<Vec<(String, ToastKind)>>,
    pub notifications: Mutex<Vec<(String, String)>>,
    pub counts: Mutex<Vec<(usize, usize)>>,
    pub countdowns: Mutex<Vec<u64>>,
    /// 第一次倒计时时停止会话
    stop_on_countdown: Mutex<Option<Arc<SessionControl>>>,
    /// 第一次倒计时时暂停会话
    pause_on_countdown: Mutex<Option<Arc<SessionControl>>>,
}

impl RecordingProgress {
    pub fn stop_at_first_countdown(&self, control: Arc<SessionControl>) {
        *self.stop_on_countdown.lock().unwrap() = Some(control);
    }

    pub fn pause_at_first_countdown(&self, control: Arc<SessionControl>) {
        *self.pause_on_countdown.lock().unwrap() = Some(control);
    }

    pub fn countdown_ticks(&self) -> Vec<u64> {
        self.countdowns.lock().unwrap().clone()
    }

    pub fn toast_messages(&self) -> Vec<String> {
        self.toasts
            .lock()
            .unwrap()
            .iter()
            .map(|(m, _)| m.clone())
            .collect()
    }

    pub fn has_toast(&self, message: &str) -> bool {
        self.toast_messages().iter().any(|m| m == message)
    }
}

#[async_trait]
impl ProgressSink for RecordingProgress {
    async fn show(&self, _daily_limit: usize) {}

    async fn update_job(&self, _job: &JobCandidate, _position: usize, _total: usize) {}

    async fn update_count(&self, applied_today: usize, daily_limit: usize) {
        self.counts.lock().unwrap().push((applied_today, daily_limit));
    }

    async fn countdown(&self, seconds_left: u64) {
        self.countdowns.lock().unwrap().push(seconds_left);
        if seconds_left > 0 {
            if let Some(control) = self.stop_on_countdown.lock().unwrap().take() {
                control.stop();
            }
            if let Some(control) = self.pause_on_countdown.lock().unwrap().take() {
                control.toggle_pause();
            }
        }
    }

    async fn toast(&self, message: &str, kind: ToastKind) {
        self.toasts.lock().unwrap().push((message.to_string(), kind));
    }

    async fn notify(&self, title: &str, message: &str) {
        self.notifications
            .lock()
            .unwrap()
            .push((title.to_string(), message.to_string()));
    }

    async fn hide(&self) {}
}

// ========== 组装 ==========

pub fn profile() -> UserProfile {
    UserProfile {
        name: "Jane Doe".into(),
        email: "jane@example.com".into(),
        phone: "+1 555 0100".into(),
        experience: "4".into(),
        ..UserProfile::default()
    }
}

/// 带资料的文档，两次申请之间不等待
pub fn seeded_document() -> StoreDocument {
    let mut doc = StoreDocument {
        user_profile: profile(),
        ..StoreDocument::default()
    };
    doc.settings.delay_between_jobs.min_secs = 1;
    doc.settings.delay_between_jobs.max_secs = 1;
    doc
}

/// 一次会话所需的全部部件
pub struct Harness {
    pub site: Arc<FakeSite>,
    pub store: Arc<MemoryStore>,
    pub progress: Arc<RecordingProgress>,
    pub control: Arc<SessionControl>,
    pub browser: Arc<SequentialBrowser>,
}

impl Harness {
    pub fn new(site: FakeSite, doc: StoreDocument) -> Self {
        let site = Arc::new(site);
        let store = Arc::new(MemoryStore::with_document(doc));
        let progress = Arc::new(RecordingProgress::default());
        let control = Arc::new(SessionControl::new());
        let ledger = ApplicationLedger::new(store.clone(), progress.clone());
        let browser = Arc::new(SequentialBrowser::new(
            site.clone(),
            ledger,
            progress.clone(),
            control.clone(),
            Timing::instant(),
        ));
        Self {
            site,
            store,
            progress,
            control,
            browser,
        }
    }

    pub fn ledger(&self) -> &ApplicationLedger {
        self.browser.ledger()
    }
}
