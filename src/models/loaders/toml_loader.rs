use crate::error::{AppError, AppResult, ConfigError};
use crate::models::document::StoreDocument;
use crate::models::settings::{KeywordAnswer, Settings, UserProfile};
use serde::Deserialize;
use std::path::Path;
use tokio::fs;

/// 用户资料种子文件
///
/// ```toml
/// [user_profile]
/// name = "Jane Doe"
/// email = "jane@example.com"
/// experience = 4
///
/// [settings]
/// dailyLimit = 20
///
/// [[custom_answers]]
/// keyword = "kubernetes"
/// answer = "2"
/// ```
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct ProfileSeed {
    pub user_profile: Option<UserProfile>,
    pub settings: Option<Settings>,
    pub custom_answers: Vec<KeywordAnswer>,
}

impl ProfileSeed {
    /// 合并到持久化文档
    ///
    /// 资料和设置整体替换；关键词答案按 keyword 覆盖已有项，新关键词追加到末尾
    pub fn apply_to(&self, doc: &mut StoreDocument) {
        if let Some(profile) = &self.user_profile {
            doc.user_profile = profile.clone();
        }
        if let Some(settings) = &self.settings {
            doc.settings = settings.clone();
        }
        for seed in &self.custom_answers {
            match doc
                .custom_answers
                .iter_mut()
                .find(|existing| existing.keyword.eq_ignore_ascii_case(&seed.keyword))
            {
                Some(existing) => existing.answer = seed.answer.clone(),
                None => doc.custom_answers.push(seed.clone()),
            }
        }
    }
}

/// 从 TOML 文件加载用户资料种子
///
/// 文件不存在时返回 `None`
pub async fn load_profile_seed(toml_file_path: &Path) -> AppResult<Option<ProfileSeed>> {
    if !toml_file_path.exists() {
        tracing::info!("未找到资料文件 {}，跳过", toml_file_path.display());
        return Ok(None);
    }

    let content = fs::read_to_string(toml_file_path)
        .await
        .map_err(|e| AppError::storage_read_failed(toml_file_path.display().to_string(), e))?;

    let seed: ProfileSeed =
        toml::from_str(&content).map_err(|source| ConfigError::ProfileParseFailed {
            path: toml_file_path.display().to_string(),
            source,
        })?;

    tracing::info!(
        "成功加载资料文件: {} (自定义答案 {} 条)",
        toml_file_path
            .file_name()
            .unwrap_or_default()
            .to_string_lossy(),
        seed.custom_answers.len()
    );

    Ok(Some(seed))
}
