//! 各平台的选择器目录
//!
//! 目前只有 LinkedIn 有完整目录，其他平台使用空目录（所有查找都返回"不存在"）。

use crate::dom::matcher::{Filter, Matcher, MatcherChain};
use crate::dom::snapshot::CardFields;
use crate::models::job::Platform;

/// 下一步按钮允许的文本
pub const ADVANCE_WORDS: &[&str] = &["continue", "next", "review application", "submit application"];

/// 申请成功提示文本
pub const COMPLETION_WORDS: &[&str] = &["application sent", "submitted"];

/// 跳过简历上传按钮的文本
pub const RESUME_SKIP_WORDS: &[&str] = &["skip", "use existing", "continue without"];

/// 单个平台的全部选择器
#[derive(Debug)]
pub struct SelectorCatalog {
    pub list_container: MatcherChain,
    /// 卡片选择器，第一个能找到卡片的生效
    pub job_cards: &'static [&'static str],
    pub card_fields: CardFields,
    /// 卡片文本中表示快速申请的标签，空字符串表示不支持
    pub quick_apply_label: &'static str,
    pub quick_apply_trigger: MatcherChain,
    pub modal: MatcherChain,
    pub advance: MatcherChain,
    pub completion: MatcherChain,
    pub dismiss: MatcherChain,
    pub validation_error: MatcherChain,
    pub resume_skip: MatcherChain,
    pub detail_title: MatcherChain,
    pub detail_company: MatcherChain,
    pub detail_location: MatcherChain,
    pub detail_description: MatcherChain,
}

impl SelectorCatalog {
    pub fn for_platform(platform: Platform) -> &'static SelectorCatalog {
        match platform {
            Platform::Linkedin => &LINKEDIN,
            _ => &EMPTY,
        }
    }

    /// 卡片文本是否带有快速申请标签
    pub fn marks_quick_apply(&self, card_text: &str) -> bool {
        !self.quick_apply_label.is_empty() && card_text.contains(self.quick_apply_label)
    }
}

pub static LINKEDIN: SelectorCatalog = SelectorCatalog {
    list_container: MatcherChain(&[
        Matcher::any(".scaffold-layout__list"),
        Matcher::any("div.jobs-search-results-list__pane"),
        Matcher::any(".jobs-search-results-list"),
        Matcher::any("[aria-label=\"Job listings\"]"),
    ]),
    job_cards: &[
        "li.scaffold-layout__list-item",
        "li[data-occludable-job-id]",
        "div.job-search-card",
    ],
    card_fields: CardFields {
        title: "a.job-card-container__link strong, a.job-card-list__title strong",
        company: ".job-card-container__primary-description, .artdeco-entity-lockup__subtitle",
        location: ".job-card-container__metadata-item",
        click_target: "a.job-card-container__link",
    },
    quick_apply_label: "Easy Apply",
    quick_apply_trigger: MatcherChain(&[
        Matcher::clickable(".jobs-apply-button.jobs-apply-button--inline"),
        Matcher::clickable("button.jobs-apply-button[aria-label*=\"Easy Apply\"]"),
        Matcher::clickable(
            ".job-details-jobs-unified-top-card__primary-actions-container .jobs-apply-button",
        ),
        Matcher::clickable(".jobs-s-apply__button"),
    ]),
    modal: MatcherChain(&[
        Matcher::visible("div.jobs-easy-apply-modal"),
        Matcher::visible("div[aria-labelledby*=\"jobs-apply-header\"]"),
        Matcher::visible("div[role=\"dialog\"].artdeco-modal"),
    ]),
    advance: MatcherChain(&[
        Matcher::new("button[aria-label*=\"Continue\"]", Filter::TextIn(ADVANCE_WORDS)),
        Matcher::new("button[aria-label*=\"Next\"]", Filter::TextIn(ADVANCE_WORDS)),
        Matcher::new("button[aria-label*=\"Submit\"]", Filter::TextIn(ADVANCE_WORDS)),
        Matcher::new("button[aria-label*=\"Review\"]", Filter::TextIn(ADVANCE_WORDS)),
        Matcher::new(".artdeco-button--primary:not([disabled])", Filter::TextIn(ADVANCE_WORDS)),
    ]),
    completion: MatcherChain(&[
        Matcher::new(
            "h2.t-24, p.t-24, #post-apply-modal-header__text",
            Filter::TextContains(COMPLETION_WORDS),
        ),
        Matcher::any(".jobs-easy-apply-confirmation"),
    ]),
    dismiss: MatcherChain(&[
        Matcher::visible("button[aria-label=\"Dismiss\"]"),
        Matcher::visible(".artdeco-modal__actionbar .artdeco-button--primary"),
        Matcher::visible("button.jobs-apply-completion__ad-modal-dismiss-button"),
    ]),
    validation_error: MatcherChain(&[
        Matcher::any(".artdeco-inline-feedback--error"),
        Matcher::any("[aria-invalid=\"true\"]"),
    ]),
    resume_skip: MatcherChain(&[
        Matcher::new("button[aria-label*=\"resume\"]", Filter::TextContains(RESUME_SKIP_WORDS)),
        Matcher::new("button[aria-label*=\"Upload\"]", Filter::TextContains(RESUME_SKIP_WORDS)),
        Matcher::new(".file-upload-button", Filter::TextContains(RESUME_SKIP_WORDS)),
    ]),
    detail_title: MatcherChain(&[
        Matcher::has_text(".top-card-layout__title"),
        Matcher::has_text(".job-details-jobs-unified-top-card__job-title h1"),
        Matcher::has_text(".jobs-unified-top-card__job-title"),
    ]),
    detail_company: MatcherChain(&[
        Matcher::has_text(".top-card-layout__card .top-card-layout__first-subline a"),
        Matcher::has_text(".job-details-jobs-unified-top-card__company-name a"),
        Matcher::has_text(".jobs-unified-top-card__company-name a"),
    ]),
    detail_location: MatcherChain(&[
        Matcher::has_text(".top-card-layout__second-subline"),
        Matcher::has_text(".job-details-jobs-unified-top-card__bullet"),
        Matcher::has_text(".jobs-unified-top-card__bullet"),
    ]),
    detail_description: MatcherChain(&[
        Matcher::has_text(".jobs-description__content .jobs-box__html-content"),
        Matcher::has_text(".job-details-module__content"),
        Matcher::has_text(".jobs-description-content__text"),
    ]),
};

pub static EMPTY: SelectorCatalog = SelectorCatalog {
    list_container: MatcherChain::EMPTY,
    job_cards: &[],
    card_fields: CardFields {
        title: "",
        company: "",
        location: "",
        click_target: "",
    },
    quick_apply_label: "",
    quick_apply_trigger: MatcherChain::EMPTY,
    modal: MatcherChain::EMPTY,
    advance: MatcherChain::EMPTY,
    completion: MatcherChain::EMPTY,
    dismiss: MatcherChain::EMPTY,
    validation_error: MatcherChain::EMPTY,
    resume_skip: MatcherChain::EMPTY,
    detail_title: MatcherChain::EMPTY,
    detail_company: MatcherChain::EMPTY,
    detail_location: MatcherChain::EMPTY,
    detail_description: MatcherChain::EMPTY,
};
