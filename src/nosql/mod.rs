use anyhow::Result;
use async_trait::async_trait;

use crate::declare::QuoteRecord;

pub mod redis;

/// 報價的儲存區，只需要整筆覆蓋寫入
#[async_trait]
pub trait QuoteStore: Send + Sync {
    /// 不論 key 原本有沒有資料，都以 record 整筆取代
    async fn upsert(&self, key: &str, record: &QuoteRecord) -> Result<()>;
}
