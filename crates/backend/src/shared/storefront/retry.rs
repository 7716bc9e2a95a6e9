use super::error::ApiError;
use std::future::Future;
use std::time::Duration;

/// Политика повторов для команд Admin API
///
/// Задержки растут экспоненциально: base*2, base*4, base*8, ...
/// В тестах base задаётся в миллисекундах, чтобы не ждать.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub base_delay: Duration,
    pub max_attempts: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            base_delay: Duration::from_secs(1),
            max_attempts: 5,
        }
    }
}

/// Выполнить команду с повторами по политике
///
/// Повторяются только ошибки лимита запросов. После исчерпания попыток
/// возвращается `RetryExhausted`, и команда считается не применённой.
pub async fn with_retry<T, F, Fut>(
    policy: &RetryPolicy,
    operation: &str,
    mut run: F,
) -> Result<T, ApiError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ApiError>>,
{
    let mut attempt: u32 = 0;
    loop {
        match run().await {
            Ok(value) => return Ok(value),
            Err(e) if e.is_retryable() => {
                attempt += 1;
                if attempt >= policy.max_attempts {
                    tracing::error!(
                        "{}: rate limited, giving up after {} attempts",
                        operation,
                        attempt
                    );
                    return Err(ApiError::RetryExhausted {
                        operation: operation.to_string(),
                        attempts: attempt,
                    });
                }
                let delay = policy.base_delay * 2u32.pow(attempt);
                tracing::warn!(
                    "{}: rate limited, retry {}/{} in {:?}",
                    operation,
                    attempt,
                    policy.max_attempts - 1,
                    delay
                );
                tokio::time::sleep(delay).await;
            }
            Err(e) => return Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn fast_policy() -> RetryPolicy {
        RetryPolicy {
            base_delay: Duration::from_millis(1),
            max_attempts: 5,
        }
    }

    #[tokio::test]
    async fn test_succeeds_after_rate_limits() {
        let calls = AtomicU32::new(0);
        let result = with_retry(&fast_policy(), "test op", || {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            async move {
                if n < 2 {
                    Err(ApiError::RateLimited)
                } else {
                    Ok(42)
                }
            }
        })
        .await;

        assert_eq!(result.unwrap(), 42);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_exhausts_after_max_attempts() {
        let calls = AtomicU32::new(0);
        let result: Result<(), _> = with_retry(&fast_policy(), "test op", || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err(ApiError::RateLimited) }
        })
        .await;

        match result {
            Err(ApiError::RetryExhausted {
                operation,
                attempts,
            }) => {
                assert_eq!(operation, "test op");
                assert_eq!(attempts, 5);
            }
            other => panic!("Expected RetryExhausted, got {:?}", other.map(|_| ())),
        }
        assert_eq!(calls.load(Ordering::SeqCst), 5);
    }

    #[tokio::test]
    async fn test_fatal_error_is_not_retried() {
        let calls = AtomicU32::new(0);
        let result: Result<(), _> = with_retry(&fast_policy(), "test op", || {
            calls.fetch_add(1, Ordering::SeqCst);
            async {
                Err(ApiError::Api {
                    status: 422,
                    message: "unprocessable".to_string(),
                })
            }
        })
        .await;

        assert!(matches!(result, Err(ApiError::Api { status: 422, .. })));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
