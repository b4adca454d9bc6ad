//! # Google 財經採集模組
//!
//! 從 Google 財經的報價頁面抓取指數的即時報價文字。
//!
//! - 頁面網址：`https://{host}/finance/quote/{symbol}:{exchange}?hl={locale}`
//! - 頁面結構屬於第三方，隨時可能改變，解析的部分全部集中在 [`extractor`]。

use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;

use crate::{config, crawler::QuoteSource, declare::Symbol, util};

/// 報價欄位的解析
pub mod extractor;

/// Google 財經採集器
pub struct GoogleFinance {
    host: String,
    exchange: String,
    locale: String,
    timeout: Option<Duration>,
}

impl GoogleFinance {
    pub fn new(source: &config::Source) -> Self {
        GoogleFinance {
            host: source.host.clone(),
            exchange: source.exchange.clone(),
            locale: source.locale.clone(),
            timeout: match source.timeout_secs {
                0 => None,
                secs => Some(Duration::from_secs(secs)),
            },
        }
    }

    pub fn quote_url(&self, symbol: &Symbol) -> String {
        format!(
            "https://{host}/finance/quote/{symbol}:{exchange}?hl={locale}",
            host = self.host,
            symbol = symbol.as_str(),
            exchange = self.exchange,
            locale = self.locale
        )
    }
}

#[async_trait]
impl QuoteSource for GoogleFinance {
    async fn fetch_page(&self, symbol: &Symbol) -> Result<String> {
        util::http::get(&self.quote_url(symbol), self.timeout).await
    }
}
