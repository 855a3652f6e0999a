/// Retry with exponential backoff
pub mod retry;

pub use retry::{retry_with_backoff, RetryPolicy};
