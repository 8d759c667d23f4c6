//! 等待与节奏控制
//!
//! 所有挂起点都是有界的定时等待：交互间隔、倒计时、点击后的稳定等待、轮询间隔。
//! 这些常量集中在 `Timing` 中，测试使用 `Timing::instant()` 全部置零。

use rand::Rng;
use std::time::Duration;
use tokio::time::sleep;

/// 随机等待区间（毫秒）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PauseRange {
    pub min_ms: u64,
    pub max_ms: u64,
}

impl PauseRange {
    pub const fn new(min_ms: u64, max_ms: u64) -> Self {
        Self { min_ms, max_ms }
    }

    pub const fn zero() -> Self {
        Self::new(0, 0)
    }

    /// 在区间内随机取一个时长
    pub fn sample(&self) -> Duration {
        if self.max_ms == 0 {
            return Duration::ZERO;
        }
        let (lo, hi) = if self.min_ms <= self.max_ms {
            (self.min_ms, self.max_ms)
        } else {
            (self.max_ms, self.min_ms)
        };
        Duration::from_millis(rand::thread_rng().gen_range(lo..=hi))
    }

    fn scaled(self, factor: f64) -> Self {
        Self::new(scale_ms(self.min_ms, factor), scale_ms(self.max_ms, factor))
    }
}

/// 自动化流程中的全部时间常量
#[derive(Debug, Clone)]
pub struct Timing {
    /// 滚动到职位卡片后等待
    pub card_scroll_settle: Duration,
    /// 点击职位卡片后等待详情面板渲染
    pub job_open_settle: Duration,
    /// 开始寻找 Easy Apply 按钮前的等待
    pub apply_pre_wait: Duration,
    /// 寻找 Easy Apply 按钮的轮询间隔
    pub trigger_poll_interval: Duration,
    /// 寻找 Easy Apply 按钮的最大轮询次数
    pub trigger_poll_attempts: u32,
    /// 点击 Easy Apply 后等待弹窗打开
    pub modal_open_wait: Duration,
    /// 每一步开始前等待内容加载
    pub step_settle: PauseRange,
    /// 点击按钮前的滚动等待
    pub click_settle: PauseRange,
    /// 完成检测的轮询间隔
    pub completion_poll_interval: Duration,
    /// 完成检测的最大轮询次数
    pub completion_poll_attempts: u32,
    /// 确认成功后点击关闭按钮前的等待
    pub dismiss_wait: PauseRange,
    /// 字段赋值过程中每个事件之间的短暂停顿
    pub field_event_pause: PauseRange,
    /// 字段赋值完成后的停顿
    pub field_settle: PauseRange,
    /// 列表滚动到底部后等待新内容加载
    pub load_more_wait: Duration,
    /// 倒计时的单次 tick
    pub countdown_tick: Duration,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            card_scroll_settle: Duration::from_millis(1000),
            job_open_settle: Duration::from_millis(3000),
            apply_pre_wait: Duration::from_millis(2000),
            trigger_poll_interval: Duration::from_millis(1000),
            trigger_poll_attempts: 10,
            modal_open_wait: Duration::from_millis(2500),
            step_settle: PauseRange::new(1500, 2500),
            click_settle: PauseRange::new(500, 1000),
            completion_poll_interval: Duration::from_millis(1000),
            completion_poll_attempts: 10,
            dismiss_wait: PauseRange::new(1000, 1500),
            field_event_pause: PauseRange::new(100, 200),
            field_settle: PauseRange::new(200, 400),
            load_more_wait: Duration::from_millis(3000),
            countdown_tick: Duration::from_secs(1),
        }
    }
}

impl Timing {
    /// 所有等待为零，轮询次数保持不变（测试用）
    pub fn instant() -> Self {
        Self::default().scaled(0.0)
    }

    /// 按比例缩放所有等待时长，轮询次数保持不变
    pub fn scaled(&self, factor: f64) -> Self {
        let factor = factor.max(0.0);
        Self {
            card_scroll_settle: scale(self.card_scroll_settle, factor),
            job_open_settle: scale(self.job_open_settle, factor),
            apply_pre_wait: scale(self.apply_pre_wait, factor),
            trigger_poll_interval: scale(self.trigger_poll_interval, factor),
            trigger_poll_attempts: self.trigger_poll_attempts,
            modal_open_wait: scale(self.modal_open_wait, factor),
            step_settle: self.step_settle.scaled(factor),
            click_settle: self.click_settle.scaled(factor),
            completion_poll_interval: scale(self.completion_poll_interval, factor),
            completion_poll_attempts: self.completion_poll_attempts,
            dismiss_wait: self.dismiss_wait.scaled(factor),
            field_event_pause: self.field_event_pause.scaled(factor),
            field_settle: self.field_settle.scaled(factor),
            load_more_wait: scale(self.load_more_wait, factor),
            countdown_tick: scale(self.countdown_tick, factor),
        }
    }
}

fn scale(duration: Duration, factor: f64) -> Duration {
    duration.mul_f64(factor)
}

fn scale_ms(ms: u64, factor: f64) -> u64 {
    (ms as f64 * factor).round() as u64
}

/// 固定时长等待，零时长直接返回
pub async fn wait(duration: Duration) {
    if !duration.is_zero() {
        sleep(duration).await;
    }
}

/// 随机时长等待
pub async fn random_pause(range: PauseRange) {
    wait(range.sample()).await;
}
