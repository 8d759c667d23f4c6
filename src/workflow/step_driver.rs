//! 申请弹窗步骤驱动 - 流程层
//!
//! 核心职责：把一个已打开的快速申请弹窗推进到完成
//!
//! 状态顺序：
//! 1. FillingStep → ValidationCheck → Advancing → FillingStep（最多 10 轮）
//! 2. 没有下一步按钮或检测到成功提示 → Completing
//! 3. Completing → Done | Abandoned

use std::fmt;

use tracing::{debug, error, info, warn};

use crate::dom::{HostPage, SelectorCatalog};
use crate::error::AppResult;
use crate::services::{FieldClassifier, FormFiller, ValueApplier};
use crate::utils::timing::{random_pause, wait, Timing};
use crate::workflow::apply_ctx::ApplyCtx;
use crate::workflow::session::SessionControl;

/// 填写 / 前进的最大轮数
pub const MAX_STEP_ITERATIONS: usize = 10;

/// 驱动状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepState {
    FillingStep,
    ValidationCheck,
    Advancing,
    Completing,
    Done,
    Abandoned(AbandonReason),
}

/// 放弃原因
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AbandonReason {
    /// 会话被停止
    Cancelled,
    /// 超过最大轮数
    MaxIterations,
    /// 轮询结束仍未确认成功，弹窗也没有关闭
    NotConfirmed,
}

impl fmt::Display for AbandonReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            AbandonReason::Cancelled => "会话已停止",
            AbandonReason::MaxIterations => "超过最大步骤数",
            AbandonReason::NotConfirmed => "未确认提交成功",
        };
        write!(f, "{}", text)
    }
}

/// 驱动结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepOutcome {
    /// Done 或 Abandoned
    pub status: StepState,
    /// 实际执行的填写轮数
    pub iterations: usize,
}

impl StepOutcome {
    pub fn is_success(&self) -> bool {
        self.status == StepState::Done
    }
}

/// 步骤驱动
///
/// - 不持有页面资源，只借用
/// - 每一轮都重新采集表单，不缓存字段
pub struct StepDriver<'a> {
    page: &'a dyn HostPage,
    catalog: &'static SelectorCatalog,
    classifier: &'a FieldClassifier,
    timing: &'a Timing,
    control: &'a SessionControl,
}

impl<'a> StepDriver<'a> {
    pub fn new(
        page: &'a dyn HostPage,
        catalog: &'static SelectorCatalog,
        classifier: &'a FieldClassifier,
        timing: &'a Timing,
        control: &'a SessionControl,
    ) -> Self {
        Self {
            page,
            catalog,
            classifier,
            timing,
            control,
        }
    }

    pub async fn run(&self, ctx: &ApplyCtx) -> AppResult<StepOutcome> {
        let filler = FormFiller::new(self.page, self.classifier, self.timing);
        let applier = ValueApplier::new(self.page, self.timing);
        let mut iterations = 0;

        loop {
            if iterations >= MAX_STEP_ITERATIONS {
                warn!("{} ⚠️ 已达到最大步骤数 {}，放弃", ctx, MAX_STEP_ITERATIONS);
                return Ok(self.abandon(AbandonReason::MaxIterations, iterations));
            }
            if !self.control.is_processing() {
                info!("{} ⏹️ 会话已停止，退出申请流程", ctx);
                return Ok(self.abandon(AbandonReason::Cancelled, iterations));
            }

            random_pause(self.timing.step_settle).await;
            iterations += 1;
            info!("{} 📄 处理第 {} 步...", ctx, iterations);

            if self.catalog.completion.is_present(self.page).await? {
                info!("{} ✅ 检测到提交成功提示", ctx);
                break;
            }

            // ========== FillingStep ==========
            debug!("{} 状态: {:?}", ctx, StepState::FillingStep);
            if let Err(e) = filler.fill_step().await {
                error!("{} ❌ 填写表单出错: {}", ctx, e);
            }
            if let Some(skip) = self.catalog.resume_skip.first_hit(self.page).await? {
                info!("{} ⏭️ 跳过简历上传", ctx);
                applier.click(&skip.handle).await?;
                random_pause(self.timing.step_settle).await;
            }

            // ========== ValidationCheck ==========
            debug!("{} 状态: {:?}", ctx, StepState::ValidationCheck);
            if self.catalog.validation_error.is_present(self.page).await? {
                warn!("{} ⚠️ 发现校验错误，尝试修复...", ctx);
                if let Err(e) = filler.repair_invalid().await {
                    error!("{} ❌ 修复校验错误失败: {}", ctx, e);
                }
            }

            // ========== Advancing ==========
            match self.catalog.advance.first_hit(self.page).await? {
                Some(button) => {
                    debug!("{} 状态: {:?} ({})", ctx, StepState::Advancing, button.text);
                    info!("{} ➡️ 点击 \"{}\"", ctx, button.text.trim());
                    applier.click(&button.handle).await?;
                }
                None => {
                    info!("{} 没有更多下一步按钮，检查是否完成...", ctx);
                    break;
                }
            }
        }

        let status = self.complete(ctx, &applier).await?;
        Ok(StepOutcome { status, iterations })
    }

    /// Completing：轮询成功提示，确认后关闭弹窗
    async fn complete(&self, ctx: &ApplyCtx, applier: &ValueApplier<'_>) -> AppResult<StepState> {
        debug!("{} 状态: {:?}", ctx, StepState::Completing);

        for attempt in 1..=self.timing.completion_poll_attempts {
            if self.catalog.completion.is_present(self.page).await? {
                random_pause(self.timing.dismiss_wait).await;
                if let Some(dismiss) = self.catalog.dismiss.first_hit(self.page).await? {
                    info!("{} 🖱️ 点击关闭按钮", ctx);
                    applier.click(&dismiss.handle).await?;
                    random_pause(self.timing.step_settle).await;
                    return Ok(StepState::Done);
                }
            }
            debug!(
                "{} ⏳ 等待完成确认... {}/{}",
                ctx, attempt, self.timing.completion_poll_attempts
            );
            wait(self.timing.completion_poll_interval).await;
        }

        if self.catalog.modal.is_present(self.page).await? {
            warn!("{} ⚠️ 未能确认提交成功，弹窗仍然打开", ctx);
            Ok(StepState::Abandoned(AbandonReason::NotConfirmed))
        } else {
            info!("{} ✅ 弹窗已关闭，视为提交成功", ctx);
            Ok(StepState::Done)
        }
    }

    fn abandon(&self, reason: AbandonReason, iterations: usize) -> StepOutcome {
        StepOutcome {
            status: StepState::Abandoned(reason),
            iterations,
        }
    }
}
