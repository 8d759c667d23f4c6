//! 申请记录账本 - 业务能力层
//!
//! 负责申请记录的校验、去重、过滤、入账和统计维护。
//! 所有操作都是"整体读取 → 内存修改 → 整体写回"。

use std::sync::Arc;

use chrono::{DateTime, Local, NaiveDate, Utc};
use serde_json::Value;
use tracing::{debug, error, info, warn};

use crate::error::{AppError, AppResult, RejectReason};
use crate::models::{
    ApplicationDraft, ApplicationRecord, ApplicationSource, ApplicationStatus, Settings, Stats,
    StoreDocument, SuccessfulApplication,
};
use crate::services::progress::ProgressSink;
use crate::services::scoring::{extract_salary, match_score, JobFilter};
use crate::storage::DocumentStore;

/// 描述最多保留的字符数
pub const DESCRIPTION_LIMIT: usize = 500;
/// 缺少地点时的默认值
const DEFAULT_LOCATION: &str = "Not specified";
/// 每日重置日期格式
const RESET_DATE_FORMAT: &str = "%Y-%m-%d";

/// 申请记录账本
#[derive(Clone)]
pub struct ApplicationLedger {
    store: Arc<dyn DocumentStore>,
    progress: Arc<dyn ProgressSink>,
}

impl ApplicationLedger {
    pub fn new(store: Arc<dyn DocumentStore>, progress: Arc<dyn ProgressSink>) -> Self {
        Self { store, progress }
    }

    pub async fn load(&self) -> AppResult<StoreDocument> {
        self.store.load().await
    }

    /// 外部传入的申请：校验 → 去重 → 智能过滤 → 入账 → 通知
    ///
    /// 非拒绝类错误写入错误日志后再返回
    pub async fn process_application(&self, draft: ApplicationDraft) -> AppResult<ApplicationRecord> {
        match self.admit(draft, true).await {
            Ok(record) => {
                self.progress
                    .notify(
                        "Application Submitted",
                        &format!("Applied to {} at {}", record.job_title, record.company),
                    )
                    .await;
                Ok(record)
            }
            Err(AppError::Rejected(reason)) => {
                info!("⏭️ 申请未入账: {}", reason);
                Err(AppError::Rejected(reason))
            }
            Err(e) => {
                error!("❌ 处理申请失败: {}", e);
                if let Err(log_err) = self
                    .log_error("Real Application Processing Error", &e.to_string())
                    .await
                {
                    warn!("⚠️ 写入错误日志失败: {}", log_err);
                }
                Err(e)
            }
        }
    }

    /// 已在页面上提交完成的申请：校验 → 去重 → 入账（不做智能过滤）
    pub async fn record_completed(&self, draft: ApplicationDraft) -> AppResult<ApplicationRecord> {
        self.admit(draft, false).await
    }

    async fn admit(&self, draft: ApplicationDraft, smart_filter: bool) -> AppResult<ApplicationRecord> {
        validate(&draft)?;

        let mut doc = self.store.load().await?;
        if doc.applications.iter().any(|r| draft.same_job_as(r)) {
            debug!(
                "重复申请: {} @ {} ({})",
                draft.job_title, draft.company, draft.platform
            );
            return Err(RejectReason::Duplicate.into());
        }

        if smart_filter && doc.settings.smart_filter_enabled {
            JobFilter::new(&doc.settings).check_draft(&draft)?;
        }

        let mut record = finalize(draft, &doc.settings, Utc::now());
        record.id = unique_id(&doc.applications, record.id);
        save_record(&mut doc, record.clone(), Local::now().date_naive());
        self.store.save(&doc).await?;

        info!(
            "💾 申请已入账: {} @ {} (匹配度 {:.2})",
            record.job_title, record.company, record.match_score
        );
        Ok(record)
    }

    /// 清理重复记录，保留每组中最早的一条，返回删除数量
    pub async fn sweep_duplicates(&self) -> AppResult<usize> {
        let mut doc = self.store.load().await?;
        let before = doc.applications.len();
        let mut kept: Vec<ApplicationRecord> = Vec::with_capacity(before);
        for record in doc.applications.drain(..) {
            if !kept.iter().any(|k| k.same_job_as(&record)) {
                kept.push(record);
            }
        }
        let removed = before - kept.len();
        doc.applications = kept;
        if removed > 0 {
            warn!("🧹 清理了 {} 条重复申请记录", removed);
            self.store.save(&doc).await?;
        }
        Ok(removed)
    }

    /// 重新计算回复率和面试数
    pub async fn update_response_rates(&self) -> AppResult<Stats> {
        let mut doc = self.store.load().await?;
        if doc.applications.is_empty() {
            return Ok(doc.stats);
        }
        let total = doc.applications.len();
        let responses = doc
            .applications
            .iter()
            .filter(|r| r.status.is_response())
            .count();
        doc.stats.response_rate = ((responses as f64 / total as f64) * 100.0).round() as u32;
        doc.stats.interviews_scheduled = doc
            .applications
            .iter()
            .filter(|r| r.status == ApplicationStatus::Interview)
            .count();
        self.store.save(&doc).await?;
        debug!("回复率已更新: {}%", doc.stats.response_rate);
        Ok(doc.stats)
    }

    /// 跨天时清零今日计数，返回是否发生了重置
    pub async fn reset_daily_stats(&self, today: NaiveDate) -> AppResult<bool> {
        let mut doc = self.store.load().await?;
        let today_str = today.format(RESET_DATE_FORMAT).to_string();
        if doc.stats.last_reset_date == today_str {
            return Ok(false);
        }
        doc.stats.today_applications = 0;
        doc.stats.last_reset_date = today_str;
        self.store.save(&doc).await?;
        info!("🌅 每日统计已重置");
        self.progress
            .notify(
                "Daily Reset",
                "Application stats have been reset for the new day",
            )
            .await;
        Ok(true)
    }

    /// 追加错误日志（保留最近 50 条）
    pub async fn log_error(&self, title: &str, message: &str) -> AppResult<()> {
        let mut doc = self.store.load().await?;
        doc.push_error(title, message);
        self.store.save(&doc).await
    }

    pub async fn real_applications(&self) -> AppResult<Vec<ApplicationRecord>> {
        Ok(self
            .store
            .load()
            .await?
            .applications
            .into_iter()
            .filter(ApplicationRecord::counts_as_real)
            .collect())
    }

    /// 今天（本地日期）已入账的申请数
    pub async fn today_count(&self) -> AppResult<usize> {
        let doc = self.store.load().await?;
        Ok(count_on(&doc.applications, Local::now().date_naive()))
    }

    pub async fn stats(&self) -> AppResult<Stats> {
        Ok(self.store.load().await?.stats)
    }

    /// 合并部分设置（只覆盖传入的字段），返回合并后的设置
    pub async fn update_settings(&self, patch: Value) -> AppResult<Settings> {
        let Value::Object(patch) = patch else {
            return Err(AppError::Other("settings 必须是 JSON 对象".to_string()));
        };
        let mut doc = self.store.load().await?;
        let mut merged = serde_json::to_value(&doc.settings)
            .map_err(|e| AppError::Other(format!("序列化设置失败: {}", e)))?;
        if let Value::Object(current) = &mut merged {
            for (key, value) in patch {
                current.insert(key, value);
            }
        }
        doc.settings = serde_json::from_value(merged)
            .map_err(|e| AppError::Other(format!("设置格式不正确: {}", e)))?;
        self.store.save(&doc).await?;
        info!("⚙️ 设置已更新");
        Ok(doc.settings)
    }

    /// 写入会话状态（只在会话开始 / 结束时调用）
    pub async fn set_processing(&self, is_processing: bool) -> AppResult<()> {
        let mut doc = self.store.load().await?;
        if doc.session.is_processing == is_processing {
            return Ok(());
        }
        doc.session.is_processing = is_processing;
        self.store.save(&doc).await
    }
}

fn validate(draft: &ApplicationDraft) -> Result<(), RejectReason> {
    let blank = |s: &str| s.trim().is_empty();
    if blank(&draft.job_title) || blank(&draft.company) || blank(&draft.platform) {
        return Err(RejectReason::InvalidData);
    }
    Ok(())
}

fn finalize(draft: ApplicationDraft, settings: &Settings, now: DateTime<Utc>) -> ApplicationRecord {
    let description = draft.description.as_deref();
    ApplicationRecord {
        id: now.timestamp_millis().to_string(),
        match_score: match_score(&draft.job_title, description, &settings.keywords),
        salary: description.and_then(extract_salary),
        description: description
            .map(|d| d.chars().take(DESCRIPTION_LIMIT).collect())
            .unwrap_or_default(),
        location: draft
            .location
            .filter(|l| !l.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_LOCATION.to_string()),
        url: draft.url.unwrap_or_default(),
        source: draft.source.unwrap_or(ApplicationSource::AutoApply),
        notes: draft.notes.unwrap_or_default(),
        applied_at: now,
        status: ApplicationStatus::Applied,
        is_real_application: true,
        job_title: draft.job_title,
        company: draft.company,
        platform: draft.platform,
    }
}

/// 追加记录并重新计算统计
fn save_record(doc: &mut StoreDocument, record: ApplicationRecord, today: NaiveDate) {
    doc.job_site_data
        .successful_applications
        .push(SuccessfulApplication {
            job_id: record.id.clone(),
            platform: record.platform.clone(),
            timestamp: record.applied_at,
        });
    doc.applications.push(record);

    let apps = &doc.applications;
    doc.stats.total_applications = apps.len();
    doc.stats.today_applications = count_on(apps, today);
    doc.stats.real_applications = apps.iter().filter(|r| r.counts_as_real()).count();
    doc.stats.auto_applications = apps
        .iter()
        .filter(|r| r.source == ApplicationSource::AutoApply)
        .count();
}

/// 同一毫秒内入账的记录追加序号
fn unique_id(apps: &[ApplicationRecord], base: String) -> String {
    if !apps.iter().any(|r| r.id == base) {
        return base;
    }
    let mut n = 1;
    loop {
        let id = format!("{}-{}", base, n);
        if !apps.iter().any(|r| r.id == id) {
            return id;
        }
        n += 1;
    }
}

fn count_on(apps: &[ApplicationRecord], day: NaiveDate) -> usize {
    apps.iter()
        .filter(|r| r.applied_at.with_timezone(&Local).date_naive() == day)
        .count()
}
