//! # Quick Apply Agent
//!
//! 一个用于在职位列表页自动完成"快速申请"的 Rust 应用程序
//!
//! ## 架构设计
//!
//! 本系统采用严格的四层架构：
//!
//! ### ① 基础设施层（Infrastructure）
//! - `infrastructure/` - 持有稀缺资源（Page），只暴露能力
//! - `JsExecutor` - 唯一的 page owner，提供 eval() 能力
//! - `CdpHostPage` - 用页面脚本实现 `dom::HostPage` 端口
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 描述"我能做什么"，只处理单个字段 / 单个职位
//! - `FieldClassifier` - 推断问题并给出答案
//! - `FormFiller` / `ValueApplier` - 填写当前步骤
//! - `JobScanner` - 扫描职位列表
//! - `ApplicationLedger` - 申请记录入账与统计
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - 定义"一个申请弹窗"的完整处理流程
//! - `ApplyCtx` - 上下文封装（job_id + position）
//! - `StepDriver` - 步骤状态机（fill → validate → advance → complete）
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/sequential_browser` - 顺序浏览器，逐个处理职位
//! - `orchestrator/app` - 资源管理与命令循环
//!
//! ## 模块结构

pub mod browser;
pub mod config;
pub mod control;
pub mod dom;
pub mod error;
pub mod infrastructure;

pub mod models;
pub mod orchestrator;
pub mod services;
pub mod storage;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use browser::{connect_to_browser_and_page, launch_headless_browser};
pub use config::Config;
pub use error::{AppError, AppResult, RejectReason};
pub use infrastructure::{CdpHostPage, JsExecutor};
pub use models::{ApplicationDraft, ApplicationRecord, JobCandidate, StoreDocument};
pub use orchestrator::{App, SequentialBrowser, SessionReport};
pub use workflow::{ApplyCtx, SessionControl, StepDriver, StepOutcome};
