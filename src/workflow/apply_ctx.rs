//! 申请处理上下文
//!
//! 封装"我正在处理队列中第几个职位"这一信息

use std::fmt::Display;

use crate::models::JobCandidate;

/// 申请处理上下文
#[derive(Debug, Clone)]
pub struct ApplyCtx {
    /// 职位 ID
    pub job_id: String,

    /// 职位名称（仅用于日志显示）
    pub title: String,

    /// 在本次队列中的位置（从1开始）
    pub position: usize,

    /// 队列总数
    pub total: usize,
}

impl ApplyCtx {
    pub fn new(job: &JobCandidate, position: usize, total: usize) -> Self {
        Self {
            job_id: job.id.clone(),
            title: job.title.clone(),
            position,
            total,
        }
    }
}

impl Display for ApplyCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[职位 {}/{} #{} {}]",
            self.position, self.total, self.job_id, self.title
        )
    }
}
