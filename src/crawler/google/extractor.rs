use anyhow::{anyhow, Result};
use scraper::{Html, Selector};

/// 從報價頁面取出價格欄位的顯示文字
///
/// 只取第一個符合 selector 的元素，去掉前後空白後原樣回傳，不做數值轉換。
#[derive(Debug, Clone)]
pub struct PriceExtractor {
    selector: Selector,
}

impl PriceExtractor {
    pub fn new(css_selector: &str) -> Result<Self> {
        let selector = Selector::parse(css_selector).map_err(|why| {
            anyhow!(
                "Failed to Selector::parse({}) because: {:?}",
                css_selector,
                why
            )
        })?;

        Ok(PriceExtractor { selector })
    }

    /// 找不到元素或元素內沒有文字時回傳 None
    pub fn extract(&self, html: &str) -> Option<String> {
        let document = Html::parse_document(html);
        document
            .select(&self.selector)
            .next()
            .map(|element| element.text().collect::<String>().trim().to_string())
            .filter(|text| !text.is_empty())
    }
}
