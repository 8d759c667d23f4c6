use crate::dom::{ElementHandle, RawControl};
use serde::{Deserialize, Serialize};

/// 表单控件类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    Radio,
    Checkbox,
    Text,
    Textarea,
    Number,
    Select,
}

impl FieldKind {
    /// 从控件快照识别类型，无法填写的控件（hidden / file / submit 等）返回 None
    pub fn of(control: &RawControl) -> Option<Self> {
        match control.tag.as_str() {
            "textarea" => Some(FieldKind::Textarea),
            "select" => Some(FieldKind::Select),
            "input" => {
                let input_type = control.input_type.as_str();
                match input_type {
                    "radio" => Some(FieldKind::Radio),
                    "checkbox" => Some(FieldKind::Checkbox),
                    "number" => Some(FieldKind::Number),
                    "" | "text" | "email" | "tel" | "url" | "search" => {
                        if control.inputmode.as_deref() == Some("numeric")
                            || looks_numeric_text(control)
                        {
                            Some(FieldKind::Number)
                        } else {
                            Some(FieldKind::Text)
                        }
                    }
                    _ => None,
                }
            }
            _ => None,
        }
    }
}

/// name / placeholder 提示为年限类的文本框按数字处理
fn looks_numeric_text(control: &RawControl) -> bool {
    if control.input_type != "text" {
        return false;
    }
    let name = control.name.to_lowercase();
    let placeholder = control.placeholder.as_deref().unwrap_or("").to_lowercase();
    ["year", "experience"]
        .iter()
        .any(|hint| name.contains(hint) || placeholder.contains(hint))
}

/// 当前步骤中的一个字段
///
/// 每一步都重新生成：宿主页面在步骤之间会重新渲染表单
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDescriptor {
    pub dom_handle: ElementHandle,
    pub inferred_question: String,
    pub field_kind: FieldKind,
    pub is_required: bool,
    pub current_value: String,
}
