//! 匹配度打分、薪资提取与智能过滤 - 业务能力层
//!
//! 纯函数，不访问页面也不访问存储

use crate::error::RejectReason;
use crate::models::{ApplicationDraft, JobCandidate, Settings};
use regex::Regex;
use std::sync::LazyLock;

/// 按顺序尝试的薪资模式，取第一个命中模式中的第一个数字
static SALARY_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?i)\$([0-9,]+(?:\.[0-9]{2})?)\s*(?:per year|annually|/year)",
        r"(?i)([0-9,]+)(k?)\s*(?:per year|annually|/year)",
        r"(?i)\$([0-9,]+(?:\.[0-9]{2})?)\s*-\s*\$([0-9,]+(?:\.[0-9]{2})?)",
    ]
    .iter()
    .filter_map(|p| Regex::new(p).ok())
    .collect()
});

/// 从职位描述中提取年薪
///
/// "120k per year" 按千位展开为 120000
pub fn extract_salary(description: &str) -> Option<u64> {
    for pattern in SALARY_PATTERNS.iter() {
        let Some(caps) = pattern.captures(description) else {
            continue;
        };
        let Some(value) = caps.get(1).and_then(|m| leading_number(m.as_str())) else {
            continue;
        };
        let thousands = caps
            .get(2)
            .map(|m| m.as_str().eq_ignore_ascii_case("k"))
            .unwrap_or(false);
        if !thousands {
            return Some(value);
        }
        match value.checked_mul(1000) {
            Some(salary) => return Some(salary),
            None => continue,
        }
    }
    None
}

/// 取开头的 `[0-9,]` 片段，去掉逗号后解析；小数部分丢弃
fn leading_number(raw: &str) -> Option<u64> {
    let digits: String = raw
        .chars()
        .take_while(|c| c.is_ascii_digit() || *c == ',')
        .filter(|c| *c != ',')
        .collect();
    digits.parse().ok()
}

/// 计算匹配度，结果始终位于 [0, 1]
pub fn match_score(job_title: &str, description: Option<&str>, skills: &[String]) -> f64 {
    let mut score = 0.5;

    let title = job_title.to_lowercase();
    if title.contains("senior") {
        score += 0.2;
    }
    if title.contains("lead") || title.contains("principal") {
        score += 0.15;
    }
    if title.contains("engineer") || title.contains("developer") {
        score += 0.1;
    }
    if title.contains("remote") {
        score += 0.1;
    }

    if let Some(description) = description {
        let description = description.to_lowercase();
        let matched = skills
            .iter()
            .filter(|skill| !skill.is_empty() && description.contains(&skill.to_lowercase()))
            .count();
        score += matched as f64 * 0.05;
    }

    score.clamp(0.0, 1.0)
}

/// 智能过滤
pub struct JobFilter<'a> {
    settings: &'a Settings,
}

impl<'a> JobFilter<'a> {
    pub fn new(settings: &'a Settings) -> Self {
        Self { settings }
    }

    /// 标题：排除词 → 目标职位
    pub fn check_title(&self, title: &str) -> Result<(), RejectReason> {
        let title = title.to_lowercase();
        if self
            .settings
            .exclude_keywords
            .iter()
            .any(|k| !k.is_empty() && title.contains(&k.to_lowercase()))
        {
            return Err(RejectReason::ExcludedKeyword);
        }

        let targets = &self.settings.target_job_titles;
        if !targets.is_empty() && !targets.iter().any(|t| title.contains(&t.to_lowercase())) {
            return Err(RejectReason::MissingTargetTitle);
        }
        Ok(())
    }

    pub fn check_company(&self, company: &str) -> Result<(), RejectReason> {
        let company = company.to_lowercase();
        if self
            .settings
            .blacklisted_companies
            .iter()
            .any(|c| !c.is_empty() && company.contains(&c.to_lowercase()))
        {
            return Err(RejectReason::BlacklistedCompany);
        }
        Ok(())
    }

    /// 描述中能提取到薪资时才检查
    pub fn check_salary(&self, description: Option<&str>) -> Result<(), RejectReason> {
        match description.and_then(extract_salary) {
            Some(salary) if !self.settings.salary_range.contains(salary) => {
                Err(RejectReason::SalaryOutOfRange)
            }
            _ => Ok(()),
        }
    }

    /// 入账前的完整过滤
    pub fn check_draft(&self, draft: &ApplicationDraft) -> Result<(), RejectReason> {
        self.check_title(&draft.job_title)?;
        self.check_company(&draft.company)?;
        self.check_salary(draft.description.as_deref())
    }

    /// 打开职位前的预过滤（此时还没有描述）
    pub fn check_candidate(&self, job: &JobCandidate) -> Result<(), RejectReason> {
        if !self.settings.platforms.contains(&job.platform) {
            return Err(RejectReason::PlatformDisabled);
        }
        self.check_title(&job.title)?;
        self.check_company(&job.company)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_salary_patterns() {
        assert_eq!(extract_salary("Pay: $120,000 per year"), Some(120000));
        assert_eq!(extract_salary("Range $90,000 - $130,000 DOE"), Some(90000));
        assert_eq!(extract_salary("95000 annually"), Some(95000));
        assert_eq!(extract_salary("150k per year"), Some(150000));
        assert_eq!(extract_salary("competitive compensation"), None);
    }

    #[test]
    fn test_extract_salary_drops_cents() {
        assert_eq!(
            extract_salary("Pay: $85,000.50 per year plus bonus"),
            Some(85000)
        );
        assert_eq!(
            extract_salary("$70,000.00 - $90,000.00 depending on level"),
            Some(70000)
        );
    }

    #[test]
    fn test_extract_salary_huge_thousands_does_not_overflow() {
        assert_eq!(extract_salary("99999999999999999k per year"), None);
        assert_eq!(extract_salary("999999999999999999999999 per year"), None);
    }

    #[test]
    fn test_match_score_is_clamped() {
        let skills: Vec<String> = ["javascript", "react", "node", "python", "typescript"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let score = match_score(
            "Senior Lead Software Engineer (Remote)",
            Some("javascript react node python typescript"),
            &skills,
        );
        assert_eq!(score, 1.0);
        assert_eq!(match_score("Cashier", None, &skills), 0.5);
        let dev = match_score("Developer", Some("We use Python"), &skills);
        assert!((dev - 0.65).abs() < 1e-9);
    }

    #[test]
    fn test_filter_order_and_reasons() {
        let mut settings = Settings::default();
        settings.target_job_titles = vec!["engineer".into()];
        settings.blacklisted_companies = vec!["Evil".into()];
        let filter = JobFilter::new(&settings);

        assert_eq!(
            filter.check_title("Junior Engineer"),
            Err(RejectReason::ExcludedKeyword)
        );
        assert_eq!(
            filter.check_title("Designer"),
            Err(RejectReason::MissingTargetTitle)
        );
        assert_eq!(
            filter.check_company("Evil Corp"),
            Err(RejectReason::BlacklistedCompany)
        );
        assert_eq!(
            filter.check_salary(Some("$20,000 per year")),
            Err(RejectReason::SalaryOutOfRange)
        );
        assert_eq!(filter.check_salary(None), Ok(()));
    }

    #[test]
    fn test_candidate_platform_allowlist() {
        use crate::dom::ElementHandle;
        use crate::models::Platform;

        let mut settings = Settings::default();
        settings.platforms = vec![Platform::Indeed];
        let job = JobCandidate {
            id: "1".into(),
            title: "Engineer".into(),
            company: "Acme".into(),
            location: "N/A".into(),
            has_quick_apply: true,
            dom_handle: ElementHandle::new("jh-1"),
            platform: Platform::Linkedin,
            synthesized_id: false,
        };
        assert_eq!(
            JobFilter::new(&settings).check_candidate(&job),
            Err(RejectReason::PlatformDisabled)
        );
    }
}
