//! 控件赋值 - 业务能力层
//!
//! 宿主页面的前端框架只认原生事件，直接改 value 不会更新它的状态。
//! 这里把"给控件赋值"统一成固定的操作序列。

use crate::dom::{DomAction, DomEvent, ElementHandle, HostPage};
use crate::error::AppResult;
use crate::utils::timing::{random_pause, wait, Timing};

/// 控件赋值器
pub struct ValueApplier<'a> {
    page: &'a dyn HostPage,
    timing: &'a Timing,
}

impl<'a> ValueApplier<'a> {
    pub fn new(page: &'a dyn HostPage, timing: &'a Timing) -> Self {
        Self { page, timing }
    }

    /// 文本 / 数字 / 多行文本：focus → clear → set → input → change → blur
    pub async fn set_text(&self, handle: &ElementHandle, value: &str) -> AppResult<()> {
        self.page.perform(handle, DomAction::Focus).await?;
        random_pause(self.timing.field_settle).await;
        self.page.perform(handle, DomAction::Clear).await?;
        self.page
            .perform(handle, DomAction::SetValue(value.to_string()))
            .await?;
        self.page
            .perform(handle, DomAction::Dispatch(DomEvent::Input))
            .await?;
        random_pause(self.timing.field_event_pause).await;
        self.page
            .perform(handle, DomAction::Dispatch(DomEvent::Change))
            .await?;
        random_pause(self.timing.field_event_pause).await;
        self.page
            .perform(handle, DomAction::Dispatch(DomEvent::Blur))
            .await?;
        random_pause(self.timing.field_settle).await;
        Ok(())
    }

    /// 单选按钮：checked → change → click 事件
    pub async fn select_radio(&self, handle: &ElementHandle) -> AppResult<()> {
        self.page.perform(handle, DomAction::SetChecked(true)).await?;
        self.page
            .perform(handle, DomAction::Dispatch(DomEvent::Change))
            .await?;
        self.page
            .perform(handle, DomAction::Dispatch(DomEvent::Click))
            .await?;
        random_pause(self.timing.field_settle).await;
        Ok(())
    }

    /// 复选框：checked → change
    pub async fn check(&self, handle: &ElementHandle) -> AppResult<()> {
        self.page.perform(handle, DomAction::SetChecked(true)).await?;
        self.page
            .perform(handle, DomAction::Dispatch(DomEvent::Change))
            .await?;
        Ok(())
    }

    /// 下拉框：selectedIndex → change
    pub async fn select_index(&self, handle: &ElementHandle, index: usize) -> AppResult<()> {
        self.page.perform(handle, DomAction::SelectIndex(index)).await?;
        self.page
            .perform(handle, DomAction::Dispatch(DomEvent::Change))
            .await?;
        random_pause(self.timing.field_settle).await;
        Ok(())
    }

    /// 滚动到可见位置后真实点击
    pub async fn click(&self, handle: &ElementHandle) -> AppResult<()> {
        self.page.perform(handle, DomAction::ScrollIntoView).await?;
        random_pause(self.timing.click_settle).await;
        self.page.perform(handle, DomAction::Click).await
    }

    /// 点击职位卡片，等待详情面板
    pub async fn open_card(&self, handle: &ElementHandle) -> AppResult<()> {
        self.page.perform(handle, DomAction::ScrollIntoView).await?;
        wait(self.timing.card_scroll_settle).await;
        self.page.perform(handle, DomAction::Click).await?;
        wait(self.timing.job_open_settle).await;
        Ok(())
    }

    /// 派发一次 change 事件
    pub async fn notify_change(&self, handle: &ElementHandle) -> AppResult<()> {
        self.page
            .perform(handle, DomAction::Dispatch(DomEvent::Change))
            .await
    }
}
