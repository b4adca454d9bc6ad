use thiserror::Error;

/// 單一輪 fetch → extract → store 的失敗原因，只會記錄在 log，不會往外傳
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Failed to fetch the webpage for {symbol} because {cause:?}")]
    Fetch {
        symbol: String,
        cause: anyhow::Error,
    },

    #[error("{symbol}: Div with the specified class not found.")]
    NotFound { symbol: String },

    #[error("Failed to store {key} because {cause:?}")]
    Store { key: String, cause: anyhow::Error },
}
