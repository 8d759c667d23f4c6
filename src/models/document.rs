use crate::models::application::ApplicationRecord;
use crate::models::settings::{default_custom_answers, KeywordAnswer, Settings, UserProfile};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 错误日志上限，超过后丢弃最旧的记录
pub const ERROR_LOG_CAP: usize = 50;

/// 统计信息
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct Stats {
    pub total_applications: usize,
    pub today_applications: usize,
    pub real_applications: usize,
    pub auto_applications: usize,
    /// 回复率（百分比）
    pub response_rate: u32,
    pub interviews_scheduled: usize,
    /// 上次每日重置的日期（YYYY-MM-DD）
    pub last_reset_date: String,
}

/// 成功申请的简要记录
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SuccessfulApplication {
    pub job_id: String,
    pub platform: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct JobSiteData {
    pub successful_applications: Vec<SuccessfulApplication>,
}

/// 错误日志条目
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ErrorLogEntry {
    pub title: String,
    pub error: String,
    pub timestamp: DateTime<Utc>,
}

/// 会话状态（只在会话开始 / 结束时写入）
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct SessionState {
    pub is_processing: bool,
}

/// 持久化文档
///
/// 整体读取、内存修改、整体写回；缺失字段使用默认值
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct StoreDocument {
    pub applications: Vec<ApplicationRecord>,
    pub settings: Settings,
    pub user_profile: UserProfile,
    pub custom_answers: Vec<KeywordAnswer>,
    pub stats: Stats,
    pub job_site_data: JobSiteData,
    pub error_log: Vec<ErrorLogEntry>,
    pub session: SessionState,
}

impl Default for StoreDocument {
    fn default() -> Self {
        Self {
            applications: Vec::new(),
            settings: Settings::default(),
            user_profile: UserProfile::default(),
            custom_answers: default_custom_answers(),
            stats: Stats::default(),
            job_site_data: JobSiteData::default(),
            error_log: Vec::new(),
            session: SessionState::default(),
        }
    }
}

impl StoreDocument {
    /// 追加错误日志并保持上限
    pub fn push_error(&mut self, title: impl Into<String>, error: impl Into<String>) {
        self.error_log.push(ErrorLogEntry {
            title: title.into(),
            error: error.into(),
            timestamp: Utc::now(),
        });
        if self.error_log.len() > ERROR_LOG_CAP {
            let overflow = self.error_log.len() - ERROR_LOG_CAP;
            self.error_log.drain(..overflow);
        }
    }
}
