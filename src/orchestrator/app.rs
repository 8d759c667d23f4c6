//! 应用入口 - 编排层
//!
//! ## 职责
//!
//! 1. **应用初始化**：日志文件、连接或启动浏览器、创建 JsExecutor
//! 2. **存储准备**：加载文档、合并资料种子、每日重置与统计维护
//! 3. **命令循环**：stdin / Ctrl-C 命令交给 `Dispatcher`，响应写到 stdout
//! 4. **资源管理**：持有 Browser，保证会话期间页面有效

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use chromiumoxide::Browser;
use chrono::Local;
use tokio::sync::mpsc;
use tracing::info;

use crate::browser;
use crate::config::Config;
use crate::control::{emit, spawn_ctrl_c, spawn_stdin_source, Command, Dispatcher};
use crate::dom::HostPage;
use crate::infrastructure::{CdpHostPage, JsExecutor};
use crate::models::load_profile_seed;
use crate::orchestrator::SequentialBrowser;
use crate::services::{ApplicationLedger, LogProgress, PageOverlay, ProgressSink};
use crate::storage::{DocumentStore, JsonFileStore};
use crate::utils::logging::{init_log_file, log_startup};
use crate::workflow::SessionControl;

/// 复用已打开标签页时匹配的 URL 片段
const JOBS_PAGE_HINT: &str = "linkedin.com/jobs";

/// 应用主结构
pub struct App {
    _browser: Browser,
    dispatcher: Dispatcher,
    /// 启动后是否立即开始（上次会话未结束或配置了自动开始）
    resume: bool,
}

impl App {
    /// 初始化应用
    pub async fn initialize(config: Config) -> Result<Self> {
        // 初始化日志文件
        init_log_file(&config.output_log_file)?;

        // 连接浏览器
        let (browser, page) = if config.launch_headless {
            browser::launch_headless_browser(
                &config.target_url,
                config.chrome_executable.as_deref(),
            )
            .await
            .context("启动无头浏览器失败")?
        } else {
            browser::connect_to_browser_and_page(
                config.browser_debug_port,
                &config.target_url,
                Some(JOBS_PAGE_HINT),
            )
            .await
            .context("连接浏览器失败")?
        };

        // 创建 JsExecutor（持有 page）
        let executor = Arc::new(JsExecutor::new(page));

        // 准备存储
        let store: Arc<dyn DocumentStore> = Arc::new(JsonFileStore::new(&config.store_path));
        let mut doc = store.load().await.context("加载存储文档失败")?;
        if let Some(path) = &config.profile_toml {
            if let Some(seed) = load_profile_seed(Path::new(path)).await? {
                seed.apply_to(&mut doc);
                store.save(&doc).await?;
                info!("✓ 已合并资料文件: {}", path);
            }
        }

        let progress: Arc<dyn ProgressSink> = if config.launch_headless {
            Arc::new(LogProgress)
        } else {
            Arc::new(PageOverlay::new(executor.clone()))
        };

        let ledger = ApplicationLedger::new(store, progress.clone());
        ledger.reset_daily_stats(Local::now().date_naive()).await?;
        ledger.sweep_duplicates().await?;
        ledger.update_response_rates().await?;

        log_startup(&config.target_url, doc.settings.daily_limit);

        let page: Arc<dyn HostPage> = Arc::new(CdpHostPage::new(executor));
        let sequential = Arc::new(SequentialBrowser::new(
            page,
            ledger,
            progress,
            Arc::new(SessionControl::new()),
            config.timing(),
        ));

        Ok(Self {
            _browser: browser,
            dispatcher: Dispatcher::new(sequential, config.output_log_file.clone()),
            resume: doc.session.is_processing || config.auto_start,
        })
    }

    /// 运行命令循环，直到收到 quit
    pub async fn run(mut self) -> Result<()> {
        let (tx, mut rx) = mpsc::channel::<Command>(32);
        spawn_stdin_source(tx.clone());
        spawn_ctrl_c(tx);

        if self.resume {
            info!("▶️ 恢复 / 自动开始会话");
            self.dispatcher.start_session().await;
        }
        info!("💡 可用命令: start / stop / pause / status / scan / stats / quit，或 JSON 行");

        while let Some(command) = rx.recv().await {
            let quit = command == Command::Quit;
            let response = self.dispatcher.handle(command).await;
            emit(&response);
            if quit {
                break;
            }
        }

        self.dispatcher.shutdown().await;
        info!("👋 程序退出");
        Ok(())
    }
}
