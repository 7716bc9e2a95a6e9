/// Ошибки Admin API витрины
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Превышен лимит запросов (HTTP 429). Единственная повторяемая ошибка.
    #[error("storefront API rate limit exceeded")]
    RateLimited,

    #[error("storefront API request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("storefront API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("storefront API parse error: {0}")]
    Parse(String),

    /// Все попытки исчерпаны, команда не применена
    #[error("retries exhausted for {operation} after {attempts} attempts")]
    RetryExhausted { operation: String, attempts: u32 },
}

impl ApiError {
    pub fn is_retryable(&self) -> bool {
        matches!(self, ApiError::RateLimited)
    }
}
