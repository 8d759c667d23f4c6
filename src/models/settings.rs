use crate::models::job::Platform;
use serde::{Deserialize, Serialize};

/// 期望薪资区间
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct SalaryRange {
    pub min: u64,
    pub max: u64,
}

impl SalaryRange {
    pub fn contains(&self, salary: u64) -> bool {
        salary >= self.min && salary <= self.max
    }
}

/// 两次申请之间的等待区间（秒）
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DelayBounds {
    pub min_secs: u64,
    pub max_secs: u64,
}

impl DelayBounds {
    /// 在区间内随机取一个秒数
    pub fn sample_secs(&self) -> u64 {
        use rand::Rng;
        let (lo, hi) = if self.min_secs <= self.max_secs {
            (self.min_secs, self.max_secs)
        } else {
            (self.max_secs, self.min_secs)
        };
        if lo == hi {
            lo
        } else {
            rand::thread_rng().gen_range(lo..=hi)
        }
    }
}

/// 自动申请设置（单例）
///
/// 会话开始时读取一次，会话期间的修改在下一次会话生效
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    pub auto_apply_enabled: bool,
    pub smart_filter_enabled: bool,
    /// 每日申请上限
    pub daily_limit: usize,
    /// 两次申请之间的等待区间
    pub delay_between_jobs: DelayBounds,
    /// 技能关键词（用于匹配度打分）
    pub keywords: Vec<String>,
    /// 标题排除词
    pub exclude_keywords: Vec<String>,
    pub salary_range: SalaryRange,
    /// 目标职位名称，为空时不限制
    pub target_job_titles: Vec<String>,
    pub blacklisted_companies: Vec<String>,
    pub platforms: Vec<Platform>,
    pub locations: Vec<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            auto_apply_enabled: false,
            smart_filter_enabled: true,
            daily_limit: 50,
            delay_between_jobs: DelayBounds {
                min_secs: 10,
                max_secs: 10,
            },
            keywords: ["javascript", "react", "node", "python", "typescript"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            exclude_keywords: ["intern", "entry level", "junior", "part time", "contract"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            salary_range: SalaryRange {
                min: 60000,
                max: 180000,
            },
            target_job_titles: Vec::new(),
            blacklisted_companies: Vec::new(),
            platforms: Platform::all_known(),
            locations: Vec::new(),
        }
    }
}

/// 用户资料
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct UserProfile {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub linkedin_profile: String,
    pub github_profile: String,
    /// 工作年限，旧文档中可能是数字
    #[serde(deserialize_with = "deserialize_experience")]
    pub experience: String,
    pub current_salary: String,
    pub expected_salary: String,
    pub skills: Vec<String>,
    pub resume_url: String,
    pub cover_letter_template: String,
}

// 工作年限既可能是字符串也可能是整数
fn deserialize_experience<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::Visitor;
    use std::fmt;

    struct ExperienceVisitor;

    impl<'de> Visitor<'de> for ExperienceVisitor {
        type Value = String;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a string or number of years")
        }

        fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(value.to_string())
        }

        fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(value.to_string())
        }

        fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(value.to_string())
        }

        fn visit_f64<E>(self, value: f64) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(value.to_string())
        }
    }

    deserializer.deserialize_any(ExperienceVisitor)
}

/// 关键词 → 答案
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct KeywordAnswer {
    pub keyword: String,
    pub answer: String,
}

impl KeywordAnswer {
    pub fn new(keyword: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            keyword: keyword.into(),
            answer: answer.into(),
        }
    }
}

/// 默认的关键词答案表
pub fn default_custom_answers() -> Vec<KeywordAnswer> {
    [
        ("aws", "3"),
        ("graphql", "2"),
        ("react", "4"),
        ("javascript", "5"),
        ("years of experience", "4"),
        ("willing to relocate", "Yes"),
        ("work remotely", "Yes"),
        ("authorized to work", "Yes"),
        ("require sponsorship", "No"),
        ("salary expectation", "80000"),
        ("current salary", "75000"),
    ]
    .iter()
    .map(|(k, v)| KeywordAnswer::new(*k, *v))
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_experience_accepts_number() {
        let profile: UserProfile = serde_json::from_str(r#"{"experience": 4}"#).unwrap();
        assert_eq!(profile.experience, "4");
        let profile: UserProfile = serde_json::from_str(r#"{"experience": "2"}"#).unwrap();
        assert_eq!(profile.experience, "2");
    }

    #[test]
    fn test_settings_defaults_fill_missing_fields() {
        let settings: Settings = serde_json::from_str(r#"{"dailyLimit": 5}"#).unwrap();
        assert_eq!(settings.daily_limit, 5);
        assert!(settings.smart_filter_enabled);
        assert_eq!(settings.platforms.len(), 4);
    }

    #[test]
    fn test_delay_bounds_sample() {
        let bounds = DelayBounds {
            min_secs: 3,
            max_secs: 5,
        };
        for _ in 0..20 {
            assert!((3..=5).contains(&bounds.sample_secs()));
        }
    }
}
