//! 职位列表扫描 - 业务能力层
//!
//! 从列表面板中提取候选职位，必要时滚动一次加载更多

use std::collections::HashSet;

use chrono::Utc;
use tracing::{debug, error, info, warn};

use crate::dom::{DomAction, ElementInfo, HostPage, RawCard, SelectorCatalog};
use crate::error::AppResult;
use crate::models::{JobCandidate, Platform};
use crate::services::progress::{ProgressSink, ToastKind};
use crate::utils::timing::{wait, Timing};

/// 卡片缺少地点时的默认值
const UNKNOWN_LOCATION: &str = "N/A";

/// 职位扫描器
pub struct JobScanner<'a> {
    page: &'a dyn HostPage,
    catalog: &'static SelectorCatalog,
    platform: Platform,
    timing: &'a Timing,
    progress: &'a dyn ProgressSink,
}

impl<'a> JobScanner<'a> {
    pub fn new(
        page: &'a dyn HostPage,
        platform: Platform,
        timing: &'a Timing,
        progress: &'a dyn ProgressSink,
    ) -> Self {
        Self {
            page,
            catalog: SelectorCatalog::for_platform(platform),
            platform,
            timing,
            progress,
        }
    }

    /// 扫描职位列表，跳过已处理的 id
    ///
    /// 每次调用最多滚动加载一次
    pub async fn scan(&self, processed: &HashSet<String>) -> AppResult<Vec<JobCandidate>> {
        info!("📋 正在扫描职位列表...");

        let Some(container) = self.catalog.list_container.first_hit(self.page).await? else {
            error!("❌ 未找到职位列表容器");
            self.progress
                .toast(
                    "Could not find job list. Are you on a LinkedIn jobs page?",
                    ToastKind::Error,
                )
                .await;
            return Ok(Vec::new());
        };

        let Some((card_selector, cards)) = self.collect_cards(&container).await? else {
            warn!("⚠️ 列表容器中没有职位卡片");
            return Ok(Vec::new());
        };

        let mut queue = self.extract(&cards, 0, processed);
        info!("✅ 初次扫描得到 {} 个待处理职位", queue.len());

        // 滚动加载一次
        let metrics = self.page.scroll_metrics(&container.handle).await?;
        if metrics.is_scrollable() {
            info!("📜 滚动加载更多职位...");
            self.page
                .perform(&container.handle, DomAction::ScrollToBottom)
                .await?;
            wait(self.timing.load_more_wait).await;

            let grown = self.page.scroll_metrics(&container.handle).await?;
            if grown.scroll_height > metrics.scroll_height {
                info!("✅ 已加载更多职位，重新扫描");
                let more = self
                    .page
                    .job_cards(&container.handle, card_selector, &self.catalog.card_fields)
                    .await?;
                let known: HashSet<String> = queue.iter().map(|j| j.id.clone()).collect();
                let added: Vec<JobCandidate> = self
                    .extract(&more, cards.len(), processed)
                    .into_iter()
                    .filter(|j| !known.contains(&j.id))
                    .collect();
                info!("➕ 新增 {} 个职位", added.len());
                queue.extend(added);
            } else {
                info!("🏁 已到达职位列表底部");
            }
        }

        Ok(queue)
    }

    /// 按卡片选择器链查找，第一个能找到卡片的选择器生效
    async fn collect_cards(
        &self,
        container: &ElementInfo,
    ) -> AppResult<Option<(&'static str, Vec<RawCard>)>> {
        for &selector in self.catalog.job_cards {
            let cards = self
                .page
                .job_cards(&container.handle, selector, &self.catalog.card_fields)
                .await?;
            if !cards.is_empty() {
                debug!("找到 {} 张卡片，选择器: {}", cards.len(), selector);
                return Ok(Some((selector, cards)));
            }
        }
        Ok(None)
    }

    /// 从 `start` 开始把卡片转换为候选职位
    fn extract(
        &self,
        cards: &[RawCard],
        start: usize,
        processed: &HashSet<String>,
    ) -> Vec<JobCandidate> {
        cards
            .iter()
            .enumerate()
            .skip(start)
            .filter_map(|(index, card)| self.to_candidate(card, index))
            .filter(|job| {
                let fresh = !processed.contains(&job.id);
                if !fresh {
                    debug!("跳过已处理职位: {}", job);
                }
                fresh
            })
            .collect()
    }

    fn to_candidate(&self, card: &RawCard, index: usize) -> Option<JobCandidate> {
        let title = non_blank(card.title.as_deref())?;
        let company = non_blank(card.company.as_deref())?;

        let attr_id = non_blank(card.job_id_attr.as_deref())
            .or_else(|| non_blank(card.occludable_id_attr.as_deref()));
        let (id, synthesized_id) = match attr_id {
            Some(id) => (id, false),
            None => (
                format!("job_{}_{}", index, Utc::now().timestamp_millis()),
                true,
            ),
        };

        let has_quick_apply = self.catalog.marks_quick_apply(&card.text);
        let job = JobCandidate {
            id,
            title,
            company,
            location: non_blank(card.location.as_deref())
                .unwrap_or_else(|| UNKNOWN_LOCATION.to_string()),
            has_quick_apply,
            dom_handle: card.click_handle.clone().unwrap_or_else(|| card.handle.clone()),
            platform: self.platform,
            synthesized_id,
        };
        debug!(
            "📌 职位 {}: {} {}",
            index,
            job,
            if has_quick_apply { "✅ Easy Apply" } else { "❌ External" }
        );
        Some(job)
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
