//! 会话控制
//!
//! 会话的运行 / 暂停标志。命令循环只改这两个标志，
//! 会话任务在职位、步骤和倒计时的边界上检查它们。

use std::sync::atomic::{AtomicBool, Ordering};

#[derive(Debug, Default)]
pub struct SessionControl {
    processing: AtomicBool,
    paused: AtomicBool,
}

impl SessionControl {
    pub fn new() -> Self {
        Self::default()
    }

    /// 进入运行状态，已经在运行时返回 false
    pub fn begin(&self) -> bool {
        let started = self
            .processing
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok();
        if started {
            self.paused.store(false, Ordering::SeqCst);
        }
        started
    }

    /// 请求停止，返回停止前是否在运行
    pub fn stop(&self) -> bool {
        self.paused.store(false, Ordering::SeqCst);
        self.processing.swap(false, Ordering::SeqCst)
    }

    pub fn is_processing(&self) -> bool {
        self.processing.load(Ordering::SeqCst)
    }

    /// 切换暂停状态，返回切换后的值
    pub fn toggle_pause(&self) -> bool {
        !self.paused.fetch_xor(true, Ordering::SeqCst)
    }

    pub fn is_paused(&self) -> bool {
        self.paused.load(Ordering::SeqCst)
    }
}
