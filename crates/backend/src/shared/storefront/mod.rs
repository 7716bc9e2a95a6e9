pub mod client;
pub mod error;
pub mod retry;

pub use client::{RemoteProduct, StorefrontClient};
pub use error::ApiError;
pub use retry::{with_retry, RetryPolicy};
