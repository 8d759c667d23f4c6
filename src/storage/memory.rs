use crate::error::AppResult;
use crate::models::StoreDocument;
use crate::storage::DocumentStore;
use async_trait::async_trait;
use tokio::sync::RwLock;

/// 内存文档存储
#[derive(Default)]
pub struct MemoryStore {
    doc: RwLock<StoreDocument>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_document(doc: StoreDocument) -> Self {
        Self {
            doc: RwLock::new(doc),
        }
    }

    /// 当前文档的拷贝
    pub async fn snapshot(&self) -> StoreDocument {
        self.doc.read().await.clone()
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn load(&self) -> AppResult<StoreDocument> {
        Ok(self.doc.read().await.clone())
    }

    async fn save(&self, doc: &StoreDocument) -> AppResult<()> {
        *self.doc.write().await = doc.clone();
        Ok(())
    }
}
