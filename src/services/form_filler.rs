//! 表单填写 - 业务能力层
//!
//! 只处理"当前这一步"的表单。按类别固定顺序填写：
//! 单选 → 复选 → 文本/数字 → 多行文本 → 下拉框，每个类别前重新采集快照。
//! 已有值的字段一律跳过，所以对同一页面重复调用不会产生新的操作。

use tracing::{debug, info, warn};

use crate::dom::{HostPage, RawControl};
use crate::error::AppResult;
use crate::models::{FieldDescriptor, FieldKind};
use crate::services::field_classifier::{radio_label, FieldClassifier, Resolved};
use crate::services::value_applier::ValueApplier;
use crate::utils::logging::truncate_text;
use crate::utils::timing::Timing;

/// 修复校验错误时数字框使用的值
const REPAIR_NUMBER: &str = "3";
/// 修复校验错误时文本框使用的值
const REPAIR_TEXT: &str = "N/A";

/// 单步填写结果
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FillReport {
    /// 本次写入的字段
    pub filled: Vec<FieldDescriptor>,
    /// 已有值或无需处理而跳过的字段数
    pub skipped: usize,
    /// 推断不出答案的字段数
    pub unanswered: usize,
}

impl FillReport {
    pub fn filled_count(&self) -> usize {
        self.filled.len()
    }
}

/// 表单填写器
pub struct FormFiller<'a> {
    page: &'a dyn HostPage,
    classifier: &'a FieldClassifier,
    applier: ValueApplier<'a>,
}

impl<'a> FormFiller<'a> {
    pub fn new(page: &'a dyn HostPage, classifier: &'a FieldClassifier, timing: &'a Timing) -> Self {
        Self {
            page,
            classifier,
            applier: ValueApplier::new(page, timing),
        }
    }

    /// 填写当前步骤
    pub async fn fill_step(&self) -> AppResult<FillReport> {
        let mut report = FillReport::default();

        self.fill_radios(&mut report).await?;
        self.fill_checkboxes(&mut report).await?;
        self.fill_text_like(&mut report, &[FieldKind::Text, FieldKind::Number])
            .await?;
        self.fill_text_like(&mut report, &[FieldKind::Textarea]).await?;
        self.fill_selects(&mut report).await?;

        info!(
            "📝 本步填写 {} 个字段，跳过 {} 个，无答案 {} 个",
            report.filled_count(),
            report.skipped,
            report.unanswered
        );
        Ok(report)
    }

    /// 修复带 aria-invalid 的空字段，返回修复数量
    pub async fn repair_invalid(&self) -> AppResult<usize> {
        let mut repaired = 0;
        for (control, kind) in self.snapshot(&[
            FieldKind::Text,
            FieldKind::Number,
            FieldKind::Textarea,
            FieldKind::Select,
        ])
        .await?
        {
            if !control.invalid {
                continue;
            }
            match kind {
                FieldKind::Select => {
                    if control.has_real_selection() {
                        continue;
                    }
                    let Some(option) = control.first_real_option() else {
                        continue;
                    };
                    self.applier
                        .select_index(&control.handle, option.index)
                        .await?;
                }
                FieldKind::Number => {
                    if control.has_value() {
                        continue;
                    }
                    self.applier.set_text(&control.handle, REPAIR_NUMBER).await?;
                }
                _ => {
                    if control.has_value() {
                        continue;
                    }
                    self.applier.set_text(&control.handle, REPAIR_TEXT).await?;
                }
            }
            self.applier.notify_change(&control.handle).await?;
            debug!("修复校验错误字段: {}", field_id(&control));
            repaired += 1;
        }
        if repaired > 0 {
            warn!("🔧 已修复 {} 个校验错误字段", repaired);
        }
        Ok(repaired)
    }

    // ========== 各类别 ==========

    async fn fill_radios(&self, report: &mut FillReport) -> AppResult<()> {
        let radios: Vec<RawControl> = self
            .snapshot(&[FieldKind::Radio])
            .await?
            .into_iter()
            .map(|(c, _)| c)
            .collect();

        for group in group_radios(radios) {
            if group.iter().any(|r| r.checked) {
                report.skipped += 1;
                continue;
            }
            let classification = self.classifier.classify_radio_group(&group);
            match classification.answer {
                Some(Resolved::Choice(i)) if i < group.len() => {
                    let chosen = &group[i];
                    self.applier.select_radio(&chosen.handle).await?;
                    let label = radio_label(chosen);
                    debug!(
                        "选择单选: {} → {}",
                        truncate_text(&classification.question, 60),
                        label
                    );
                    report.filled.push(describe(
                        chosen,
                        classification.question,
                        FieldKind::Radio,
                        label,
                    ));
                }
                _ => report.unanswered += 1,
            }
        }
        Ok(())
    }

    async fn fill_checkboxes(&self, report: &mut FillReport) -> AppResult<()> {
        for (control, kind) in self.snapshot(&[FieldKind::Checkbox]).await? {
            if control.checked {
                report.skipped += 1;
                continue;
            }
            let classification = self.classifier.classify(&control, kind);
            if classification.answer == Some(Resolved::Check) {
                self.applier.check(&control.handle).await?;
                debug!("勾选同意项: {}", truncate_text(&classification.question, 60));
                report.filled.push(describe(
                    &control,
                    classification.question,
                    kind,
                    "checked".to_string(),
                ));
            } else {
                report.skipped += 1;
            }
        }
        Ok(())
    }

    async fn fill_text_like(&self, report: &mut FillReport, kinds: &[FieldKind]) -> AppResult<()> {
        for (control, kind) in self.snapshot(kinds).await? {
            if control.has_value() {
                report.skipped += 1;
                continue;
            }
            let classification = self.classifier.classify(&control, kind);
            match classification.answer {
                Some(Resolved::Text(value)) => {
                    self.applier.set_text(&control.handle, &value).await?;
                    debug!(
                        "填写 {:?}: {} = {}",
                        kind,
                        truncate_text(&classification.question, 60),
                        truncate_text(&value, 40)
                    );
                    report
                        .filled
                        .push(describe(&control, classification.question, kind, value));
                }
                _ => {
                    debug!("无答案: {}", truncate_text(&classification.question, 60));
                    report.unanswered += 1;
                }
            }
        }
        Ok(())
    }

    async fn fill_selects(&self, report: &mut FillReport) -> AppResult<()> {
        for (control, kind) in self.snapshot(&[FieldKind::Select]).await? {
            if control.has_real_selection() {
                report.skipped += 1;
                continue;
            }
            let classification = self.classifier.classify(&control, kind);
            match classification.answer {
                Some(Resolved::Choice(index)) => {
                    self.applier.select_index(&control.handle, index).await?;
                    let text = control
                        .options
                        .iter()
                        .find(|o| o.index == index)
                        .map(|o| o.text.clone())
                        .unwrap_or_default();
                    debug!(
                        "选择下拉项: {} → {}",
                        truncate_text(&classification.question, 60),
                        text
                    );
                    report
                        .filled
                        .push(describe(&control, classification.question, kind, text));
                }
                _ => report.unanswered += 1,
            }
        }
        Ok(())
    }

    /// 采集快照，只保留指定类别中可交互的控件
    async fn snapshot(&self, kinds: &[FieldKind]) -> AppResult<Vec<(RawControl, FieldKind)>> {
        Ok(self
            .page
            .form_controls()
            .await?
            .into_iter()
            .filter(|c| c.is_interactive())
            .filter_map(|c| FieldKind::of(&c).map(|k| (c, k)))
            .filter(|(_, k)| kinds.contains(k))
            .collect())
    }
}

/// 按 name 分组，保持文档顺序
fn group_radios(radios: Vec<RawControl>) -> Vec<Vec<RawControl>> {
    let mut groups: Vec<(String, Vec<RawControl>)> = Vec::new();
    for radio in radios {
        let key = radio.group_key().to_string();
        match groups.iter_mut().find(|(k, _)| *k == key) {
            Some((_, members)) => members.push(radio),
            None => groups.push((key, vec![radio])),
        }
    }
    groups.into_iter().map(|(_, members)| members).collect()
}

fn describe(
    control: &RawControl,
    question: String,
    kind: FieldKind,
    value: String,
) -> FieldDescriptor {
    FieldDescriptor {
        dom_handle: control.handle.clone(),
        inferred_question: question,
        field_kind: kind,
        is_required: control.required,
        current_value: value,
    }
}

fn field_id(control: &RawControl) -> &str {
    if !control.name.is_empty() {
        &control.name
    } else if !control.id.is_empty() {
        &control.id
    } else {
        control.handle.as_str()
    }
}
