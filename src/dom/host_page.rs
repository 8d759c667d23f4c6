//! 宿主页面端口
//!
//! 第三方页面的唯一接缝。所有查找都容忍"不存在"：返回空结果，而不是错误。
//! 元素句柄是不透明的令牌，只在同一页面生命周期内有效。

use crate::dom::snapshot::{CardFields, RawCard, RawControl, ScrollMetrics};
use crate::error::AppResult;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

/// 元素句柄
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementHandle(pub String);

impl ElementHandle {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ElementHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// 选择器查询结果中的一个元素
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ElementInfo {
    pub handle: ElementHandle,
    pub tag: String,
    /// 去除首尾空白后的文本内容
    pub text: String,
    pub aria_label: Option<String>,
    pub visible: bool,
    pub disabled: bool,
}

impl ElementInfo {
    /// 可见且未禁用
    pub fn is_clickable(&self) -> bool {
        self.visible && !self.disabled
    }
}

/// 派发给控件的原生事件
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DomEvent {
    Input,
    Change,
    Blur,
    Click,
}

impl DomEvent {
    pub fn name(self) -> &'static str {
        match self {
            DomEvent::Input => "input",
            DomEvent::Change => "change",
            DomEvent::Blur => "blur",
            DomEvent::Click => "click",
        }
    }
}

/// 对单个元素的原子操作
#[derive(Debug, Clone, PartialEq)]
pub enum DomAction {
    Focus,
    Clear,
    SetValue(String),
    SetChecked(bool),
    SelectIndex(usize),
    /// 只派发事件，不触发默认行为
    Dispatch(DomEvent),
    /// 真实点击（触发默认行为）
    Click,
    ScrollIntoView,
    ScrollToBottom,
}

/// 宿主页面
#[async_trait]
pub trait HostPage: Send + Sync {
    /// 当前页面 URL
    async fn current_url(&self) -> AppResult<String>;

    /// 查询匹配选择器的全部元素（文档顺序）
    async fn query_all(&self, selector: &str) -> AppResult<Vec<ElementInfo>>;

    /// 当前文档中全部表单控件的快照（文档顺序）
    async fn form_controls(&self) -> AppResult<Vec<RawControl>>;

    /// 在列表容器内按卡片选择器提取职位卡片
    async fn job_cards(
        &self,
        container: &ElementHandle,
        card_selector: &str,
        fields: &CardFields,
    ) -> AppResult<Vec<RawCard>>;

    /// 元素的滚动尺寸，元素不存在时为零
    async fn scroll_metrics(&self, handle: &ElementHandle) -> AppResult<ScrollMetrics>;

    /// 对元素执行操作，元素已不存在时静默忽略
    async fn perform(&self, handle: &ElementHandle, action: DomAction) -> AppResult<()>;
}
