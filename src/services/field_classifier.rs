//! 字段分类器 - 业务能力层
//!
//! 从控件及其周围文本推断"这个字段在问什么"，再从用户资料和关键词答案表中
//! 找出最合适的答案。只做判断，不操作页面。

use crate::dom::RawControl;
use crate::models::{FieldKind, KeywordAnswer, UserProfile};

/// 兄弟元素文本超过这个长度时不当作问题
const MAX_SIBLING_QUESTION_LEN: usize = 200;

/// 回答"是"的问题线索
const YES_CUES: &[&str] = &[
    "comfortable",
    "available",
    "authorized",
    "eligible",
    "relocate",
    "start",
    "onsite",
];

/// 回答"否"的问题线索
const NO_CUES: &[&str] = &["sponsorship", "not required"];

/// 同意类复选框的线索
const CONSENT_CUES: &[&str] = &["terms", "privacy", "agree", "consent", "policy"];

const PREFERRED_LOCATIONS: &[&str] = &["united states", "canada", "remote"];
const PREFERRED_EDUCATION: &[&str] = &["bachelor", "university", "graduate"];

/// 必填文本框的保守答案
const REQUIRED_TEXT_FILLER: &str = "Available immediately";
/// 必填数字框的保守答案
const REQUIRED_NUMBER_FILLER: &str = "3";

const MOTIVATION_PARAGRAPH: &str = "I am interested in this position because it aligns with my technical skills and career goals. I am available to start immediately.";
const GENERIC_PARAGRAPH: &str = "I am excited about this opportunity and believe my technical skills and experience make me a strong candidate for this position. I look forward to contributing to your team.";

/// 推断出的答案
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolved {
    /// 文本 / 数字 / 多行文本的值
    Text(String),
    /// 选中第几个选项（下拉框为 option 下标，单选组为组内下标）
    Choice(usize),
    /// 勾选复选框
    Check,
}

/// 分类结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub question: String,
    pub answer: Option<Resolved>,
}

/// 字段分类器
///
/// 会话开始时用当次的资料和答案表构建，会话期间不变
#[derive(Debug, Clone, Default)]
pub struct FieldClassifier {
    profile: UserProfile,
    answers: Vec<KeywordAnswer>,
    preferred_locations: Vec<String>,
}

impl FieldClassifier {
    pub fn new(profile: UserProfile, answers: Vec<KeywordAnswer>) -> Self {
        Self {
            profile,
            answers,
            preferred_locations: Vec::new(),
        }
    }

    /// 设置中的地点偏好优先于内置列表
    pub fn with_preferred_locations(mut self, locations: Vec<String>) -> Self {
        self.preferred_locations = locations;
        self
    }

    /// 对单个控件分类（单选按钮请用 `classify_radio_group`）
    pub fn classify(&self, control: &RawControl, kind: FieldKind) -> Classification {
        let question = question_for(control);
        let answer = match kind {
            FieldKind::Text | FieldKind::Number => self
                .text_answer(control, &question, kind)
                .map(Resolved::Text),
            FieldKind::Textarea => Some(Resolved::Text(self.textarea_answer(&question))),
            FieldKind::Select => self.select_answer(control, &question).map(Resolved::Choice),
            FieldKind::Checkbox => is_consent(&question).then_some(Resolved::Check),
            FieldKind::Radio => self
                .choose_radio(std::slice::from_ref(control), &question)
                .map(Resolved::Choice),
        };
        Classification { question, answer }
    }

    /// 对整个单选组分类，返回组内下标
    pub fn classify_radio_group(&self, group: &[RawControl]) -> Classification {
        let question = radio_group_question(group);
        let answer = self.choose_radio(group, &question).map(Resolved::Choice);
        Classification { question, answer }
    }

    // ========== 文本 / 数字 ==========

    fn text_answer(&self, control: &RawControl, question: &str, kind: FieldKind) -> Option<String> {
        let combined = format!(
            "{} {} {}",
            question,
            control.placeholder.as_deref().unwrap_or(""),
            control.name
        )
        .to_lowercase();
        let numeric = kind == FieldKind::Number;

        // 1. 关键词答案表
        if let Some(answer) = self
            .answers
            .iter()
            .filter(|a| !a.keyword.is_empty())
            .find(|a| {
                combined.contains(&a.keyword.to_lowercase())
                    && (!numeric || is_numeric(&a.answer))
            })
        {
            return Some(answer.answer.clone());
        }

        // 2. 领域启发式
        if numeric {
            if combined.contains("how many") || combined.contains("challenging tasks") {
                return Some("5".to_string());
            }
        } else if let Some(answer) = self.contact_answer(control, &combined) {
            return Some(answer);
        }

        // 3. 薪资
        if combined.contains("salary") || combined.contains("compensation") {
            let salary = if combined.contains("current") {
                self.salary_answer(&self.profile.current_salary, "current salary", "75000")
            } else {
                self.salary_answer(&self.profile.expected_salary, "salary expectation", "85000")
            };
            return Some(if numeric { digits_only(&salary) } else { salary });
        }

        // 4. 工作年限
        if combined.contains("year") || combined.contains("experience") {
            let experience = if numeric {
                leading_number(&self.profile.experience)
            } else {
                self.profile.experience.trim().to_string()
            };
            if !experience.is_empty() {
                return Some(experience);
            }
        }

        // 5. 必填兜底
        if control.required {
            return Some(if numeric {
                REQUIRED_NUMBER_FILLER
            } else {
                REQUIRED_TEXT_FILLER
            }
            .to_string());
        }

        None
    }

    fn contact_answer(&self, control: &RawControl, combined: &str) -> Option<String> {
        let profile = &self.profile;
        let candidate = if control.input_type == "email" || combined.contains("email") {
            &profile.email
        } else if control.input_type == "tel" || combined.contains("phone") {
            &profile.phone
        } else if combined.contains("name") {
            &profile.name
        } else if control.input_type == "url"
            || combined.contains("website")
            || combined.contains("linkedin")
        {
            &profile.linkedin_profile
        } else {
            return None;
        };
        let value = candidate.trim();
        (!value.is_empty()).then(|| value.to_string())
    }

    fn salary_answer(&self, profile_value: &str, keyword: &str, fallback: &str) -> String {
        if !profile_value.trim().is_empty() {
            return profile_value.trim().to_string();
        }
        self.answers
            .iter()
            .find(|a| a.keyword.eq_ignore_ascii_case(keyword))
            .map(|a| a.answer.clone())
            .unwrap_or_else(|| fallback.to_string())
    }

    // ========== 多行文本 ==========

    fn textarea_answer(&self, question: &str) -> String {
        let lower = question.to_lowercase();
        if let Some(answer) = self.keyword_answer(&lower) {
            return answer.to_string();
        }
        if lower.contains("why") || lower.contains("interest") {
            return MOTIVATION_PARAGRAPH.to_string();
        }
        let template = self.profile.cover_letter_template.trim();
        if template.is_empty() {
            GENERIC_PARAGRAPH.to_string()
        } else {
            template.to_string()
        }
    }

    // ========== 下拉框 ==========

    fn select_answer(&self, control: &RawControl, question: &str) -> Option<usize> {
        let lower = question.to_lowercase();
        let labels: Vec<String> = control.options.iter().map(|o| o.text.clone()).collect();

        let real = |index: usize| {
            control
                .options
                .get(index)
                .filter(|o| !o.is_placeholder())
                .map(|o| o.index)
        };

        // 关键词答案表：问题命中关键词，且有选项包含对应答案
        for entry in self.answers.iter().filter(|a| !a.keyword.is_empty()) {
            if lower.contains(&entry.keyword.to_lowercase()) {
                if let Some(i) = find_option(&labels, &entry.answer).and_then(real) {
                    return Some(i);
                }
            }
        }

        if lower.contains("country") || lower.contains("location") {
            let preferred = self
                .preferred_locations
                .iter()
                .map(String::as_str)
                .chain(PREFERRED_LOCATIONS.iter().copied());
            for place in preferred {
                if let Some(i) = find_option(&labels, place).and_then(real) {
                    return Some(i);
                }
            }
        }

        if lower.contains("education") || lower.contains("degree") {
            for level in PREFERRED_EDUCATION {
                if let Some(i) = find_option(&labels, level).and_then(real) {
                    return Some(i);
                }
            }
        }

        if has_yes_no(&labels) {
            if let Some(i) = find_option(&labels, yes_no_answer(question)).and_then(real) {
                return Some(i);
            }
        }

        control.first_real_option().map(|o| o.index)
    }

    // ========== 单选组 ==========

    fn choose_radio(&self, group: &[RawControl], question: &str) -> Option<usize> {
        if group.is_empty() {
            return None;
        }
        let labels: Vec<String> = group.iter().map(radio_label).collect();
        let lower = question.to_lowercase();

        let answer = self
            .keyword_answer(&lower)
            .filter(|answer| find_option(&labels, answer).is_some())
            .unwrap_or_else(|| yes_no_answer(question));

        Some(find_option(&labels, answer).unwrap_or(0))
    }

    fn keyword_answer(&self, lower_question: &str) -> Option<&str> {
        self.answers
            .iter()
            .filter(|a| !a.keyword.is_empty())
            .find(|a| lower_question.contains(&a.keyword.to_lowercase()))
            .map(|a| a.answer.as_str())
    }
}

// ========== 问题推断 ==========

/// 推断控件对应的问题
///
/// 优先级：label[for] → 包裹的 label（去掉当前值）→ 问题容器标签 →
/// 较短的前一个兄弟文本 → aria-label → placeholder
pub fn question_for(control: &RawControl) -> String {
    let enclosing = control.enclosing_label.as_deref().map(|label| {
        if control.value.is_empty() {
            label.to_string()
        } else {
            label.replace(&control.value, "")
        }
    });
    let sibling = control
        .preceding_text
        .as_deref()
        .filter(|t| t.trim().chars().count() < MAX_SIBLING_QUESTION_LEN);

    let question = [
        control.label_for.as_deref(),
        enclosing.as_deref(),
        control.container_label.as_deref(),
        sibling,
        control.aria_label.as_deref(),
        control.placeholder.as_deref(),
    ]
    .into_iter()
    .flatten()
    .map(clean_question)
    .find(|q| !q.is_empty())
    .unwrap_or_default();
    question
}

/// 单选组的问题：legend → 容器标签 → aria-label → 第一个选项的问题
pub fn radio_group_question(group: &[RawControl]) -> String {
    let Some(first) = group.first() else {
        return String::new();
    };
    [
        first.fieldset_legend.as_deref(),
        first.container_label.as_deref(),
        first.aria_label.as_deref(),
    ]
    .into_iter()
    .flatten()
    .map(clean_question)
    .find(|q| !q.is_empty())
    .unwrap_or_else(|| question_for(first))
}

/// 单选按钮自身的选项文字
pub fn radio_label(control: &RawControl) -> String {
    if let Some(label) = control.label_for.as_deref().filter(|l| !l.trim().is_empty()) {
        return label.trim().to_string();
    }
    if let Some(label) = control.enclosing_label.as_deref() {
        let label = if control.value.is_empty() {
            label.to_string()
        } else {
            label.replace(&control.value, "")
        };
        if !label.trim().is_empty() {
            return label.trim().to_string();
        }
    }
    if let Some(label) = control.option_label.as_deref().filter(|l| !l.trim().is_empty()) {
        return label.trim().to_string();
    }
    control.value.trim().to_string()
}

/// 去掉结尾的星号、冒号、问号等，合并内部空白
fn clean_question(raw: &str) -> String {
    let collapsed = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    collapsed
        .trim_end_matches(|c: char| c == '*' || c == ':' || c == '?' || c == '.' || c.is_whitespace())
        .to_string()
}

// ========== 判断辅助 ==========

/// 是 / 否 启发式
pub fn yes_no_answer(question: &str) -> &'static str {
    let lower = question.to_lowercase();
    if YES_CUES.iter().any(|cue| lower.contains(cue)) {
        return "Yes";
    }
    if NO_CUES.iter().any(|cue| lower.contains(cue)) {
        return "No";
    }
    "Yes"
}

pub fn is_consent(question: &str) -> bool {
    let lower = question.to_lowercase();
    CONSENT_CUES.iter().any(|cue| lower.contains(cue))
}

/// 先找完全相同的选项，再找包含答案的选项（忽略大小写）
fn find_option(labels: &[String], answer: &str) -> Option<usize> {
    let answer = answer.trim().to_lowercase();
    if answer.is_empty() {
        return None;
    }
    labels
        .iter()
        .position(|l| l.trim().to_lowercase() == answer)
        .or_else(|| labels.iter().position(|l| l.to_lowercase().contains(&answer)))
}

fn has_yes_no(labels: &[String]) -> bool {
    let has = |word: &str| labels.iter().any(|l| l.trim().eq_ignore_ascii_case(word));
    has("yes") && has("no")
}

fn is_numeric(value: &str) -> bool {
    let value = value.trim();
    !value.is_empty() && value.parse::<f64>().is_ok()
}

fn digits_only(value: &str) -> String {
    value.chars().filter(|c| c.is_ascii_digit()).collect()
}

fn leading_number(value: &str) -> String {
    value
        .trim()
        .chars()
        .take_while(|c| c.is_ascii_digit() || *c == '.')
        .collect()
}
