use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 申请状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ApplicationStatus {
    #[default]
    Applied,
    Interview,
    Offer,
    Response,
    Rejected,
}

impl ApplicationStatus {
    /// 是否算作收到回复
    pub fn is_response(self) -> bool {
        matches!(
            self,
            ApplicationStatus::Interview | ApplicationStatus::Offer | ApplicationStatus::Response
        )
    }
}

/// 申请来源
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationSource {
    #[default]
    AutoApply,
    ManualApplication,
    Demo,
}

/// 待入账的申请数据
///
/// 由编排器在提交成功后构建，或通过消息通道传入
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct ApplicationDraft {
    pub job_title: String,
    pub company: String,
    pub platform: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<ApplicationSource>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl ApplicationDraft {
    pub fn new(
        job_title: impl Into<String>,
        company: impl Into<String>,
        platform: impl Into<String>,
    ) -> Self {
        Self {
            job_title: job_title.into(),
            company: company.into(),
            platform: platform.into(),
            ..Self::default()
        }
    }

    /// 唯一性元组是否与记录相同
    pub fn same_job_as(&self, record: &ApplicationRecord) -> bool {
        record.job_title == self.job_title
            && record.company == self.company
            && record.platform == self.platform
    }
}

/// 已持久化的申请记录
///
/// 只追加；唯一性由 (job_title, company, platform) 保证，重复记录直接丢弃
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationRecord {
    pub id: String,
    pub job_title: String,
    pub company: String,
    pub platform: String,
    pub location: String,
    pub applied_at: DateTime<Utc>,
    #[serde(default)]
    pub status: ApplicationStatus,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub source: ApplicationSource,
    #[serde(rename = "realApplication", default)]
    pub is_real_application: bool,
    /// 匹配度，始终位于 [0, 1]
    #[serde(default)]
    pub match_score: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub salary: Option<u64>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub notes: String,
}

impl ApplicationRecord {
    /// 是否为真实申请（用于统计与报表）
    pub fn counts_as_real(&self) -> bool {
        self.is_real_application
            || matches!(
                self.source,
                ApplicationSource::AutoApply | ApplicationSource::ManualApplication
            )
    }

    /// 与另一条记录是否为同一职位
    pub fn same_job_as(&self, other: &ApplicationRecord) -> bool {
        self.job_title == other.job_title
            && self.company == other.company
            && self.platform == other.platform
    }
}
