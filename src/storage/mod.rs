//! 文档存储
//!
//! 整个应用的持久化只有一个 JSON 文档：整体读取、内存中修改、整体写回。
//! 没有事务，最后一次写入生效。

pub mod json_file;
pub mod memory;

use crate::error::AppResult;
use crate::models::StoreDocument;
use async_trait::async_trait;

pub use json_file::JsonFileStore;
pub use memory::MemoryStore;

/// 文档存储
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// 读取整个文档，缺失的字段使用默认值
    async fn load(&self) -> AppResult<StoreDocument>;

    /// 写回整个文档
    async fn save(&self, doc: &StoreDocument) -> AppResult<()>;
}
