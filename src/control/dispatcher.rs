//! 命令分发
//!
//! 命令循环与会话任务并发运行：这里只切换会话标志或读写存储，
//! 真正驱动页面的只有 `SequentialBrowser::start` 所在的会话任务。

use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use crate::control::command::{Command, Response};
use crate::error::AppError;
use crate::models::{JobSummary, Platform};
use crate::orchestrator::SequentialBrowser;
use crate::utils::logging::print_session_stats;

/// 命令分发器
pub struct Dispatcher {
    browser: Arc<SequentialBrowser>,
    log_file: String,
    session: Option<JoinHandle<()>>,
}

impl Dispatcher {
    pub fn new(browser: Arc<SequentialBrowser>, log_file: impl Into<String>) -> Self {
        Self {
            browser,
            log_file: log_file.into(),
            session: None,
        }
    }

    pub fn is_running(&self) -> bool {
        self.browser.control().is_processing()
    }

    /// 处理一条命令
    pub async fn handle(&mut self, command: Command) -> Response {
        info!("📨 收到命令: {}", command.name());
        match command {
            Command::GetStatus => {
                let platform = self
                    .browser
                    .platform()
                    .await
                    .unwrap_or(Platform::Unknown);
                let control = self.browser.control();
                Response::Status {
                    platform,
                    is_running: control.is_processing(),
                    is_paused: control.is_paused(),
                }
            }
            Command::ScanForJobs => {
                if self.is_running() {
                    return Response::error("A session is already running");
                }
                match self.browser.scan().await {
                    Ok(jobs) => Response::Jobs {
                        jobs: jobs.iter().map(JobSummary::from).collect(),
                    },
                    Err(e) => Response::error(e.to_string()),
                }
            }
            Command::StartAutoApply => {
                if self.start_session().await {
                    Response::ack(&command, "Auto-browse started")
                } else {
                    Response::ack(&command, "Auto-browse already running")
                }
            }
            Command::StopAutoApply => {
                let was_running = self.browser.stop().await;
                Response::ack(
                    &command,
                    if was_running {
                        "Auto-browse stopped"
                    } else {
                        "Auto-browse was not running"
                    },
                )
            }
            Command::PauseAutoApply => {
                if !self.is_running() {
                    return Response::error("No session is running");
                }
                let paused = self.browser.toggle_pause();
                Response::ack(&command, if paused { "Paused" } else { "Resumed" })
            }
            Command::ApplicationCompleted { application } => {
                admission(self.browser.ledger().record_completed(application).await)
            }
            Command::ProcessApplication { application } => {
                admission(self.browser.ledger().process_application(application).await)
            }
            Command::GetStats => match self.browser.ledger().stats().await {
                Ok(stats) => Response::Stats { stats },
                Err(e) => Response::error(e.to_string()),
            },
            Command::GetRealApplications => {
                match self.browser.ledger().real_applications().await {
                    Ok(applications) => Response::Applications { applications },
                    Err(e) => Response::error(e.to_string()),
                }
            }
            Command::UpdateSettings { settings } => {
                match self.browser.ledger().update_settings(settings).await {
                    Ok(settings) => Response::Settings { settings },
                    Err(e) => Response::error(e.to_string()),
                }
            }
            Command::Quit => {
                self.shutdown().await;
                Response::ack(&command, "Bye")
            }
        }
    }

    /// 在后台任务中启动会话，已在运行时返回 false
    ///
    /// 运行标志在返回前就已置位，紧随其后的 stop 一定能看到它
    pub async fn start_session(&mut self) -> bool {
        if self.is_running() {
            return false;
        }
        // 上一个会话已请求停止，但任务可能还没退出
        self.wait_session().await;
        if !self.browser.control().begin() {
            return false;
        }
        let browser = self.browser.clone();
        let log_file = self.log_file.clone();
        self.session = Some(tokio::spawn(async move {
            let report = browser.run_begun().await;
            print_session_stats(report.applied, report.skipped, report.failed, &log_file);
        }));
        true
    }

    /// 停止会话并等待会话任务退出
    pub async fn shutdown(&mut self) {
        self.browser.stop().await;
        if let Some(handle) = self.session.take() {
            info!("⏳ 等待会话退出...");
            if let Err(e) = handle.await {
                error!("❌ 会话任务异常结束: {}", e);
            }
        }
    }

    /// 等待当前会话自然结束
    pub async fn wait_session(&mut self) {
        if let Some(handle) = self.session.take() {
            if let Err(e) = handle.await {
                error!("❌ 会话任务异常结束: {}", e);
            }
        }
    }
}

fn admission(result: Result<crate::models::ApplicationRecord, AppError>) -> Response {
    match result {
        Ok(application) => Response::Saved { application },
        Err(AppError::Rejected(reason)) => Response::Rejected {
            reason: reason.to_string(),
        },
        Err(e) => {
            warn!("⚠️ 申请入账失败: {}", e);
            Response::Rejected {
                reason: e.to_string(),
            }
        }
    }
}

/// 把响应写成一行 JSON
pub fn emit(response: &Response) {
    match serde_json::to_string(response) {
        Ok(line) => println!("{}", line),
        Err(e) => error!("❌ 序列化响应失败: {}", e),
    }
}
