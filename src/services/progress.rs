//! 进度展示 - 业务能力层
//!
//! 进度面板、倒计时、提示和通知。`LogProgress` 只写日志，
//! `PageOverlay` 把面板注入到页面里（同时也写日志）。

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::{debug, info, warn};

use crate::infrastructure::JsExecutor;
use crate::models::JobCandidate;

/// 提示类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Warning,
    Error,
}

impl ToastKind {
    fn icon(self) -> &'static str {
        match self {
            ToastKind::Success => "✅",
            ToastKind::Warning => "⚠️",
            ToastKind::Error => "❌",
        }
    }
}

/// 进度输出
///
/// 展示失败不影响流程，实现方自行记录日志，不返回错误
#[async_trait]
pub trait ProgressSink: Send + Sync {
    /// 会话开始时显示面板
    async fn show(&self, daily_limit: usize);
    /// 正在处理第 `position` 个职位（从 1 开始）
    async fn update_job(&self, job: &JobCandidate, position: usize, total: usize);
    /// 今日申请计数 "n/limit"
    async fn update_count(&self, applied_today: usize, daily_limit: usize);
    /// 下一个职位的倒计时，0 表示隐藏
    async fn countdown(&self, seconds_left: u64);
    async fn toast(&self, message: &str, kind: ToastKind);
    /// 系统通知（标题 + 内容）
    async fn notify(&self, title: &str, message: &str);
    async fn hide(&self);
}

/// 只写日志的进度输出
#[derive(Debug, Default, Clone)]
pub struct LogProgress;

#[async_trait]
impl ProgressSink for LogProgress {
    async fn show(&self, daily_limit: usize) {
        info!("🤖 自动浏览已启动 (每日上限 {})", daily_limit);
    }

    async fn update_job(&self, job: &JobCandidate, position: usize, total: usize) {
        info!("\n🎯 处理职位 {}/{}: {}", position, total, job);
    }

    async fn update_count(&self, applied_today: usize, daily_limit: usize) {
        info!("📊 今日已申请: {}/{}", applied_today, daily_limit);
    }

    async fn countdown(&self, seconds_left: u64) {
        if seconds_left > 0 {
            debug!("⏱️ 下一个职位: {}s", seconds_left);
        }
    }

    async fn toast(&self, message: &str, kind: ToastKind) {
        match kind {
            ToastKind::Success => info!("{} {}", kind.icon(), message),
            ToastKind::Warning | ToastKind::Error => warn!("{} {}", kind.icon(), message),
        }
    }

    async fn notify(&self, title: &str, message: &str) {
        info!("🔔 {}: {}", title, message);
    }

    async fn hide(&self) {
        debug!("隐藏进度面板");
    }
}

/// 注入页面的进度面板
pub struct PageOverlay {
    executor: Arc<JsExecutor>,
    log: LogProgress,
}

impl PageOverlay {
    pub fn new(executor: Arc<JsExecutor>) -> Self {
        Self {
            executor,
            log: LogProgress,
        }
    }

    async fn run(&self, js_code: String) {
        if let Err(e) = self.executor.eval(js_code).await {
            debug!("进度面板脚本执行失败: {}", e);
        }
    }

    async fn render_toast(&self, message: &str, kind: ToastKind) {
        let color = match kind {
            ToastKind::Success => "#48bb78",
            ToastKind::Warning => "#ed8936",
            ToastKind::Error => "#f56565",
        };
        let js_code = format!(
            r#"
            (() => {{
                const old = document.querySelector('.jh-toast');
                if (old) old.remove();
                const toast = document.createElement('div');
                toast.className = 'jh-toast';
                toast.style.cssText = {style} + 'border:3px solid {color};';
                toast.textContent = {text};
                document.body.appendChild(toast);
                setTimeout(() => toast.remove(), 4000);
                return true;
            }})()
            "#,
            style = json!(TOAST_STYLE),
            color = color,
            text = json!(format!("{} {}", kind.icon(), message)),
        );
        self.run(js_code).await;
    }
}

const PANEL_STYLE: &str = "position:fixed;top:20px;right:20px;background:white;border:3px solid #48bb78;border-radius:12px;padding:20px;box-shadow:0 10px 30px rgba(0,0,0,0.3);z-index:999999;font-family:-apple-system,sans-serif;min-width:350px;max-width:400px;";
const TOAST_STYLE: &str = "position:fixed;top:20px;left:50%;transform:translateX(-50%);background:white;border-radius:12px;padding:16px 24px;box-shadow:0 8px 25px rgba(0,0,0,0.2);z-index:1000000;font-size:16px;font-weight:600;";

#[async_trait]
impl ProgressSink for PageOverlay {
    async fn show(&self, daily_limit: usize) {
        self.log.show(daily_limit).await;
        let js_code = format!(
            r#"
            (() => {{
                const old = document.getElementById('auto-browser-ui');
                if (old) old.remove();
                const ui = document.createElement('div');
                ui.id = 'auto-browser-ui';
                ui.style.cssText = {style};
                ui.innerHTML = `
                    <h3 style="margin:0 0 15px 0;font-size:18px;">🤖 Auto Job Browser</h3>
                    <div id="browser-status" style="font-size:14px;margin-bottom:8px;">Initializing...</div>
                    <div id="current-job-info" style="font-size:13px;color:#718096;">Scanning job listings...</div>
                    <div style="margin:12px 0;"><span id="progress-text" style="font-size:12px;">0/0</span>
                        <div style="background:#e2e8f0;border-radius:4px;height:8px;overflow:hidden;">
                            <div id="progress-bar" style="background:#48bb78;height:100%;width:0%;"></div>
                        </div>
                    </div>
                    <div id="countdown-section" style="display:none;font-size:13px;color:#e67e22;">⏱️ Next job in: <span id="countdown-timer"></span>s</div>
                    <div style="margin-top:12px;font-size:11px;color:#a0aec0;">Applications today: <span id="apps-today">0</span> / {limit}</div>`;
                document.body.appendChild(ui);
                return true;
            }})()
            "#,
            style = json!(PANEL_STYLE),
            limit = daily_limit,
        );
        self.run(js_code).await;
    }

    async fn update_job(&self, job: &JobCandidate, position: usize, total: usize) {
        self.log.update_job(job, position, total).await;
        let percent = if total == 0 {
            0.0
        } else {
            position as f64 / total as f64 * 100.0
        };
        let js_code = format!(
            r#"
            (() => {{
                const set = (id, text) => {{ const el = document.getElementById(id); if (el) el.textContent = text; }};
                set('browser-status', {status});
                set('current-job-info', {info});
                set('progress-text', {progress});
                const bar = document.getElementById('progress-bar');
                if (bar) bar.style.width = '{percent:.1}%';
                return true;
            }})()
            "#,
            status = json!(format!("Processing Job {} of {}", position, total)),
            info = json!(format!("{} · {}", job.title, job.company)),
            progress = json!(format!("{}/{}", position, total)),
            percent = percent,
        );
        self.run(js_code).await;
    }

    async fn update_count(&self, applied_today: usize, daily_limit: usize) {
        self.log.update_count(applied_today, daily_limit).await;
        let js_code = format!(
            "(() => {{ const el = document.getElementById('apps-today'); if (el) el.textContent = {}; return true; }})()",
            json!(applied_today.to_string())
        );
        self.run(js_code).await;
    }

    async fn countdown(&self, seconds_left: u64) {
        self.log.countdown(seconds_left).await;
        let js_code = format!(
            r#"
            (() => {{
                const section = document.getElementById('countdown-section');
                const timer = document.getElementById('countdown-timer');
                if (!section || !timer) return false;
                section.style.display = {seconds} > 0 ? 'block' : 'none';
                timer.textContent = '{seconds}';
                return true;
            }})()
            "#,
            seconds = seconds_left,
        );
        self.run(js_code).await;
    }

    async fn toast(&self, message: &str, kind: ToastKind) {
        self.log.toast(message, kind).await;
        self.render_toast(message, kind).await;
    }

    async fn notify(&self, title: &str, message: &str) {
        self.log.notify(title, message).await;
        self.render_toast(&format!("{}: {}", title, message), ToastKind::Success)
            .await;
    }

    async fn hide(&self) {
        self.log.hide().await;
        self.run(
            "(() => { const ui = document.getElementById('auto-browser-ui'); if (ui) ui.remove(); return true; })()"
                .to_string(),
        )
        .await;
    }
}
