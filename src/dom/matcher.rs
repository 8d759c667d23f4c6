//! 选择器回退链
//!
//! 每个逻辑目标（列表容器、Easy Apply 按钮、下一步按钮……）对应一条有序的
//! `MatcherChain`。链上每个 `Matcher` = 选择器 + 对查询结果的纯过滤，第一个命中即返回。

use crate::dom::host_page::{ElementInfo, HostPage};
use crate::error::AppResult;
use tracing::debug;

/// 对查询结果的过滤条件
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Filter {
    /// 任意元素
    Any,
    /// 可见
    Visible,
    /// 可见且未禁用
    Clickable,
    /// 非空文本
    HasText,
    /// 可点击，且小写文本恰好是词表中的某一项
    TextIn(&'static [&'static str]),
    /// 小写文本包含词表中的任一片段
    TextContains(&'static [&'static str]),
}

impl Filter {
    pub fn accepts(&self, element: &ElementInfo) -> bool {
        match self {
            Filter::Any => true,
            Filter::Visible => element.visible,
            Filter::Clickable => element.is_clickable(),
            Filter::HasText => !element.text.trim().is_empty(),
            Filter::TextIn(words) => {
                let text = element.text.trim().to_lowercase();
                element.is_clickable() && words.iter().any(|w| *w == text)
            }
            Filter::TextContains(fragments) => {
                let text = element.text.to_lowercase();
                fragments.iter().any(|f| text.contains(f))
            }
        }
    }
}

/// 单个匹配策略
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Matcher {
    pub selector: &'static str,
    pub filter: Filter,
}

impl Matcher {
    pub const fn new(selector: &'static str, filter: Filter) -> Self {
        Self { selector, filter }
    }

    pub const fn any(selector: &'static str) -> Self {
        Self::new(selector, Filter::Any)
    }

    pub const fn visible(selector: &'static str) -> Self {
        Self::new(selector, Filter::Visible)
    }

    pub const fn clickable(selector: &'static str) -> Self {
        Self::new(selector, Filter::Clickable)
    }

    pub const fn has_text(selector: &'static str) -> Self {
        Self::new(selector, Filter::HasText)
    }

    /// 在查询结果中找第一个通过过滤的元素
    pub fn pick(&self, elements: Vec<ElementInfo>) -> Option<ElementInfo> {
        elements.into_iter().find(|e| self.filter.accepts(e))
    }
}

/// 有序的匹配策略链
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatcherChain(pub &'static [Matcher]);

impl MatcherChain {
    pub const EMPTY: MatcherChain = MatcherChain(&[]);

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// 依次尝试每个策略，返回第一个命中的元素
    pub async fn first_hit(&self, page: &dyn HostPage) -> AppResult<Option<ElementInfo>> {
        for matcher in self.0 {
            let elements = page.query_all(matcher.selector).await?;
            if let Some(hit) = matcher.pick(elements) {
                debug!("选择器命中: {}", matcher.selector);
                return Ok(Some(hit));
            }
        }
        Ok(None)
    }

    /// 是否有任一策略命中
    pub async fn is_present(&self, page: &dyn HostPage) -> AppResult<bool> {
        Ok(self.first_hit(page).await?.is_some())
    }

    /// 第一个命中元素的文本
    pub async fn first_text(&self, page: &dyn HostPage) -> AppResult<Option<String>> {
        Ok(self
            .first_hit(page)
            .await?
            .map(|e| e.text.trim().to_string())
            .filter(|t| !t.is_empty()))
    }
}
