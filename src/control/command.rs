//! 控制通道的消息定义
//!
//! 入站命令按 `action` 字段区分，出站响应按 `type` 字段区分。
//! 命令行也接受简写关键字（start / stop / pause / status / scan / stats / quit）。

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::models::{ApplicationDraft, ApplicationRecord, JobSummary, Platform, Settings, Stats};

/// 入站命令
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum Command {
    GetStatus,
    ScanForJobs,
    StartAutoApply,
    StopAutoApply,
    /// 切换暂停
    PauseAutoApply,
    /// 页面上已完成的申请，只做校验和去重
    ApplicationCompleted { application: ApplicationDraft },
    /// 完整入账流程（含智能过滤）
    ProcessApplication {
        #[serde(alias = "applicationData")]
        application: ApplicationDraft,
    },
    GetStats,
    GetRealApplications,
    /// 部分设置，只覆盖传入的字段
    UpdateSettings { settings: Value },
    Quit,
}

/// 命令解析错误
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("空命令")]
    Empty,
    #[error("未知命令: {0}")]
    Unknown(String),
    #[error("命令格式错误: {0}")]
    Malformed(#[from] serde_json::Error),
}

impl Command {
    /// 解析一行输入：JSON 对象或关键字
    pub fn parse(line: &str) -> Result<Command, CommandError> {
        let line = line.trim();
        if line.is_empty() {
            return Err(CommandError::Empty);
        }
        if line.starts_with('{') {
            return Ok(serde_json::from_str(line)?);
        }
        match line.to_lowercase().as_str() {
            "start" => Ok(Command::StartAutoApply),
            "stop" => Ok(Command::StopAutoApply),
            "pause" => Ok(Command::PauseAutoApply),
            "status" => Ok(Command::GetStatus),
            "scan" => Ok(Command::ScanForJobs),
            "stats" => Ok(Command::GetStats),
            "applications" => Ok(Command::GetRealApplications),
            "quit" | "exit" => Ok(Command::Quit),
            other => Err(CommandError::Unknown(other.to_string())),
        }
    }

    /// 命令名（与 JSON 中的 action 一致）
    pub fn name(&self) -> &'static str {
        match self {
            Command::GetStatus => "getStatus",
            Command::ScanForJobs => "scanForJobs",
            Command::StartAutoApply => "startAutoApply",
            Command::StopAutoApply => "stopAutoApply",
            Command::PauseAutoApply => "pauseAutoApply",
            Command::ApplicationCompleted { .. } => "applicationCompleted",
            Command::ProcessApplication { .. } => "processApplication",
            Command::GetStats => "getStats",
            Command::GetRealApplications => "getRealApplications",
            Command::UpdateSettings { .. } => "updateSettings",
            Command::Quit => "quit",
        }
    }
}

/// 出站响应，每条一行 JSON 写到 stdout
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Response {
    Status {
        platform: Platform,
        #[serde(rename = "isRunning")]
        is_running: bool,
        #[serde(rename = "isPaused")]
        is_paused: bool,
    },
    Jobs {
        jobs: Vec<JobSummary>,
    },
    /// 命令已受理
    Ack {
        action: String,
        message: String,
    },
    Saved {
        application: ApplicationRecord,
    },
    Rejected {
        reason: String,
    },
    Stats {
        stats: Stats,
    },
    Applications {
        applications: Vec<ApplicationRecord>,
    },
    Settings {
        settings: Settings,
    },
    Error {
        message: String,
    },
}

impl Response {
    pub fn ack(command: &Command, message: impl Into<String>) -> Self {
        Response::Ack {
            action: command.name().to_string(),
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Response::Error {
            message: message.into(),
        }
    }
}
