use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use anyhow::{anyhow, Result};
use async_trait::async_trait;

use crate::{
    config,
    crawler::{google::extractor::PriceExtractor, QuoteSource},
    declare::{QuoteRecord, Symbol},
    nosql::QuoteStore,
    scheduler::pipeline::Pipeline,
};

pub fn quote_page(price: &str) -> String {
    format!(
        r#"<html><body><div class="rPF6Lc"><div class="YMlKec fxKbKc">{}</div></div></body></html>"#,
        price
    )
}

/// 依代號回傳事先準備好的頁面，沒準備的代號一律當成連線失敗
#[derive(Default)]
pub struct StubSource {
    pages: HashMap<String, String>,
    calls: Mutex<Vec<String>>,
}

impl StubSource {
    pub fn with_page(mut self, symbol: &str, html: impl Into<String>) -> Self {
        self.pages.insert(symbol.to_string(), html.into());
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl QuoteSource for StubSource {
    async fn fetch_page(&self, symbol: &Symbol) -> Result<String> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(symbol.to_string());
        }

        self.pages
            .get(symbol.as_str())
            .cloned()
            .ok_or_else(|| anyhow!("connection reset while fetching {}", symbol))
    }
}

#[derive(Default)]
pub struct MemoryStore {
    records: Mutex<HashMap<String, QuoteRecord>>,
    writes: Mutex<Vec<String>>,
    unavailable: bool,
}

impl MemoryStore {
    pub fn unavailable() -> Self {
        MemoryStore {
            unavailable: true,
            ..Default::default()
        }
    }

    pub fn seed(&self, key: &str, record: QuoteRecord) {
        if let Ok(mut records) = self.records.lock() {
            records.insert(key.to_string(), record);
        }
    }

    pub fn get(&self, key: &str) -> Option<QuoteRecord> {
        self.records.lock().ok()?.get(key).cloned()
    }

    pub fn writes(&self) -> Vec<String> {
        self.writes.lock().map(|w| w.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl QuoteStore for MemoryStore {
    async fn upsert(&self, key: &str, record: &QuoteRecord) -> Result<()> {
        if self.unavailable {
            return Err(anyhow!("permission denied"));
        }

        if let Ok(mut writes) = self.writes.lock() {
            writes.push(key.to_string());
        }

        if let Ok(mut records) = self.records.lock() {
            records.insert(key.to_string(), record.clone());
        }

        Ok(())
    }
}

pub fn pipeline(source: Arc<StubSource>, store: Arc<MemoryStore>, prefix: &str) -> Pipeline {
    Pipeline::new(
        source,
        PriceExtractor::new(&config::Source::default().selector).expect("valid selector"),
        store,
        prefix,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_pipeline_uses_configured_selector() {
        let source = Arc::new(StubSource::default().with_page("NIFTY_50", quote_page("24,141.95")));
        let store = Arc::new(MemoryStore::default());

        pipeline(source, store.clone(), "indices")
            .run(&Symbol::new("NIFTY_50"))
            .await
            .expect("run");

        assert_eq!(store.get("indices/NIFTY 50"), Some(QuoteRecord::new("24,141.95")));
    }
}
