//! 编排层（Orchestration Layer）
//!
//! ## 职责
//!
//! 本层负责会话调度和资源管理，是整个系统的"指挥中心"。
//!
//! ## 模块划分
//!
//! ### `app` - 应用入口
//! - 管理应用生命周期（初始化、命令循环、退出）
//! - 管理浏览器资源（Browser、JsExecutor）
//! - 准备存储（资料种子合并、每日重置）
//!
//! ### `sequential_browser` - 顺序浏览器
//! - 扫描职位列表（Vec<JobCandidate>）
//! - 逐个打开职位，快速申请交给 StepDriver
//! - 每日上限、暂停、停止、倒计时
//! - 成功申请写入账本
//!
//! ## 层次关系
//!
//! ```text
//! app (命令循环)
//!     ↓
//! sequential_browser (处理 Vec<JobCandidate>)
//!     ↓
//! workflow::StepDriver (处理单个申请弹窗)
//!     ↓
//! services (能力层：classifier / filler / scanner / ledger)
//!     ↓
//! dom + infrastructure (HostPage / JsExecutor)
//! ```
//!
//! ## 设计原则
//!
//! 1. **资源隔离**：只有编排层持有 Browser 和 JsExecutor
//! 2. **向下依赖**：编排层 → workflow → services → dom / infrastructure
//! 3. **严格顺序**：同一时间只有一个会话任务在操作页面

pub mod app;
pub mod sequential_browser;

// 重新导出主要类型
pub use app::App;
pub use sequential_browser::{SequentialBrowser, SessionReport};
