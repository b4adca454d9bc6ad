use std::fmt;

use serde::{Deserialize, Serialize};

/// 追蹤的指數代號，例如 `NIFTY_50`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Symbol(String);

impl Symbol {
    pub fn new(symbol: impl Into<String>) -> Self {
        Symbol(symbol.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// 寫入儲存區時使用的名稱，只把第一個底線換成空白
    ///
    /// `NIFTY_50` -> `NIFTY 50`，`NIFTY_NEXT_50` -> `NIFTY NEXT_50`
    pub fn store_name(&self) -> String {
        self.0.replacen('_', " ", 1)
    }

    /// 儲存區的 key，格式為 `{prefix}/{store_name}`
    pub fn store_key(&self, prefix: &str) -> String {
        if prefix.is_empty() {
            return self.store_name();
        }

        format!("{}/{}", prefix.trim_end_matches('/'), self.store_name())
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// 每個指數在儲存區內的最新報價
///
/// 每次寫入都是整筆覆蓋，下游另外設定的 `TTS`、`alarm` 會在下一輪被重設。
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct QuoteRecord {
    /// 頁面上顯示的報價文字，不做數值轉換
    #[serde(rename = "LivePrice")]
    pub live_price: String,
    /// 給語音播報使用，這裡一律寫 false
    #[serde(rename = "TTS")]
    pub tts_enabled: bool,
    /// 給警示使用，這裡一律寫空字串
    #[serde(rename = "alarm")]
    pub alarm_threshold: String,
    /// 給差異比對使用，這裡一律寫空字串
    #[serde(rename = "oldPrice")]
    pub previous_price: String,
}

impl QuoteRecord {
    pub fn new(live_price: impl Into<String>) -> Self {
        QuoteRecord {
            live_price: live_price.into(),
            ..Default::default()
        }
    }
}
