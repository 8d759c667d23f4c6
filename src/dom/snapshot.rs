//! 页面快照类型
//!
//! 由页面脚本一次性采集，Rust 侧只读。字段名与脚本返回的 JSON 对应（camelCase）。

use crate::dom::host_page::ElementHandle;
use serde::{Deserialize, Serialize};

/// 下拉框选项
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectOption {
    pub index: usize,
    pub text: String,
    pub value: String,
}

impl SelectOption {
    /// "Select an option" 一类的占位选项
    pub fn is_placeholder(&self) -> bool {
        let text = self.text.trim().to_lowercase();
        self.value.trim().is_empty()
            || text.is_empty()
            || text.starts_with("select")
            || text.starts_with("choose")
    }
}

/// 表单控件快照
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawControl {
    pub handle: ElementHandle,
    /// 小写标签名：input / select / textarea
    pub tag: String,
    /// input 的 type（小写），其他标签为空
    pub input_type: String,
    pub name: String,
    pub id: String,
    pub placeholder: Option<String>,
    pub aria_label: Option<String>,
    pub value: String,
    pub required: bool,
    pub visible: bool,
    pub disabled: bool,
    pub checked: bool,
    /// aria-invalid="true"
    pub invalid: bool,
    pub inputmode: Option<String>,
    /// `label[for=id]` 的文本
    pub label_for: Option<String>,
    /// 包裹控件的 label 文本（含控件当前值）
    pub enclosing_label: Option<String>,
    /// 最近的问题容器中的标签文本（不包含控件本身）
    pub container_label: Option<String>,
    /// 所在 fieldset 的 legend
    pub fieldset_legend: Option<String>,
    /// 前一个兄弟元素的文本
    pub preceding_text: Option<String>,
    /// 紧随其后的文本节点（单选按钮的选项文字）
    pub option_label: Option<String>,
    pub options: Vec<SelectOption>,
    pub selected_index: Option<usize>,
}

impl RawControl {
    /// 可见、未禁用、非 hidden
    pub fn is_interactive(&self) -> bool {
        self.visible && !self.disabled && self.input_type != "hidden"
    }

    /// 文本类控件是否已有值（等于 placeholder 的值不算）
    pub fn has_value(&self) -> bool {
        let value = self.value.trim();
        !value.is_empty() && Some(self.value.as_str()) != self.placeholder.as_deref()
    }

    /// 下拉框当前是否选中了非占位选项
    pub fn has_real_selection(&self) -> bool {
        self.selected_index
            .and_then(|i| self.options.get(i))
            .map(|opt| !opt.is_placeholder())
            .unwrap_or(false)
    }

    /// 第一个非占位选项
    pub fn first_real_option(&self) -> Option<&SelectOption> {
        self.options.iter().find(|opt| !opt.is_placeholder())
    }

    /// 单选组的分组键，无 name 时归入同一默认组
    pub fn group_key(&self) -> &str {
        if self.name.is_empty() {
            "default"
        } else {
            &self.name
        }
    }
}

/// 卡片内各字段的选择器
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CardFields {
    pub title: &'static str,
    pub company: &'static str,
    pub location: &'static str,
    pub click_target: &'static str,
}

/// 职位卡片快照
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawCard {
    pub handle: ElementHandle,
    /// 卡片内的链接，缺失时点击整张卡片
    pub click_handle: Option<ElementHandle>,
    pub job_id_attr: Option<String>,
    pub occludable_id_attr: Option<String>,
    pub title: Option<String>,
    pub company: Option<String>,
    pub location: Option<String>,
    /// 卡片全文
    pub text: String,
}

/// 滚动尺寸
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ScrollMetrics {
    pub scroll_height: f64,
    pub client_height: f64,
}

impl ScrollMetrics {
    pub fn is_scrollable(&self) -> bool {
        self.scroll_height > self.client_height
    }
}
