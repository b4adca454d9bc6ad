use anyhow::Result;
use async_trait::async_trait;

use crate::declare::Symbol;

/// Google 財經
pub mod google;

/// 取得報價頁面原始 HTML 的來源
#[async_trait]
pub trait QuoteSource: Send + Sync {
    /// 2xx 才回傳頁面內容，其餘一律視為失敗，不重試
    async fn fetch_page(&self, symbol: &Symbol) -> Result<String>;
}
