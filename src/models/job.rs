use crate::dom::ElementHandle;
use phf::phf_map;
use serde::{Deserialize, Serialize};
use std::fmt;

/// 招聘平台
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Linkedin,
    Indeed,
    Ziprecruiter,
    Glassdoor,
    Unknown,
}

/// 域名片段 → 平台
static HOST_PLATFORMS: phf::Map<&'static str, Platform> = phf_map! {
    "linkedin.com" => Platform::Linkedin,
    "indeed.com" => Platform::Indeed,
    "ziprecruiter.com" => Platform::Ziprecruiter,
    "glassdoor.com" => Platform::Glassdoor,
};

impl Platform {
    /// 根据页面 URL 识别平台
    pub fn detect(url: &str) -> Self {
        let host = host_of(url);
        HOST_PLATFORMS
            .entries()
            .find(|(fragment, _)| host.contains(*fragment))
            .map(|(_, platform)| *platform)
            .unwrap_or(Platform::Unknown)
    }

    /// 获取标准名称（与持久化文档中的字符串一致）
    pub fn name(self) -> &'static str {
        match self {
            Platform::Linkedin => "linkedin",
            Platform::Indeed => "indeed",
            Platform::Ziprecruiter => "ziprecruiter",
            Platform::Glassdoor => "glassdoor",
            Platform::Unknown => "unknown",
        }
    }

    /// 从名称解析平台
    pub fn from_name(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "linkedin" => Platform::Linkedin,
            "indeed" => Platform::Indeed,
            "ziprecruiter" => Platform::Ziprecruiter,
            "glassdoor" => Platform::Glassdoor,
            _ => Platform::Unknown,
        }
    }

    /// 所有已知平台
    pub fn all_known() -> Vec<Platform> {
        vec![
            Platform::Linkedin,
            Platform::Indeed,
            Platform::Ziprecruiter,
            Platform::Glassdoor,
        ]
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

fn host_of(url: &str) -> &str {
    let without_scheme = url.split("://").nth(1).unwrap_or(url);
    without_scheme
        .split(['/', '?', '#'])
        .next()
        .unwrap_or(without_scheme)
}

/// 扫描得到的候选职位
///
/// 扫描时创建，只读；处理完成后丢弃，仅 id 保留在会话的已处理集合中
#[derive(Debug, Clone, PartialEq)]
pub struct JobCandidate {
    /// 职位 ID（站点属性，缺失时由 index + 时间戳合成，合成 ID 跨扫描不稳定）
    pub id: String,
    pub title: String,
    pub company: String,
    pub location: String,
    /// 卡片文本中是否包含快速申请标签
    pub has_quick_apply: bool,
    /// 用于点击的元素句柄
    pub dom_handle: ElementHandle,
    pub platform: Platform,
    /// id 是否为合成值
    pub synthesized_id: bool,
}

impl fmt::Display for JobCandidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} @ {} [#{}]", self.title, self.company, self.id)
    }
}

/// 对外展示的职位摘要（消息通道返回）
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct JobSummary {
    pub id: String,
    pub title: String,
    pub company: String,
    pub location: String,
    pub has_quick_apply: bool,
    pub platform: Platform,
}

impl From<&JobCandidate> for JobSummary {
    fn from(job: &JobCandidate) -> Self {
        Self {
            id: job.id.clone(),
            title: job.title.clone(),
            company: job.company.clone(),
            location: job.location.clone(),
            has_quick_apply: job.has_quick_apply,
            platform: job.platform,
        }
    }
}
