use std::sync::Arc;

use crate::{
    crawler::{google::extractor::PriceExtractor, QuoteSource},
    declare::{QuoteRecord, Symbol},
    error::PipelineError,
    logging,
    nosql::QuoteStore,
};

/// 單一代號的 fetch → extract → store
pub struct Pipeline {
    source: Arc<dyn QuoteSource>,
    extractor: PriceExtractor,
    store: Arc<dyn QuoteStore>,
    key_prefix: String,
}

impl Pipeline {
    pub fn new(
        source: Arc<dyn QuoteSource>,
        extractor: PriceExtractor,
        store: Arc<dyn QuoteStore>,
        key_prefix: impl Into<String>,
    ) -> Self {
        Pipeline {
            source,
            extractor,
            store,
            key_prefix: key_prefix.into(),
        }
    }

    /// 執行一次並把結果寫進 log，任何失敗都不往外傳
    pub async fn execute(&self, symbol: &Symbol) {
        match self.run(symbol).await {
            Ok(record) => {
                logging::info_file_async(format!("{}: {}", symbol, record.live_price));
            }
            Err(why @ PipelineError::NotFound { .. }) => {
                logging::warn_file_async(why.to_string());
            }
            Err(why) => {
                logging::error_file_async(why.to_string());
            }
        }
    }

    /// 失敗時不重試，下一輪輪到同一個代號時自然會再抓一次
    pub async fn run(&self, symbol: &Symbol) -> Result<QuoteRecord, PipelineError> {
        let html = self
            .source
            .fetch_page(symbol)
            .await
            .map_err(|cause| PipelineError::Fetch {
                symbol: symbol.to_string(),
                cause,
            })?;

        let price = self
            .extractor
            .extract(&html)
            .ok_or_else(|| PipelineError::NotFound {
                symbol: symbol.to_string(),
            })?;

        let key = symbol.store_key(&self.key_prefix);
        let record = QuoteRecord::new(price);
        self.store
            .upsert(&key, &record)
            .await
            .map_err(|cause| PipelineError::Store { key, cause })?;

        Ok(record)
    }
}
