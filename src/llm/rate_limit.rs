//! Client-side request pacing.
//!
//! `RateLimitedClient` wraps any [`LlmClient`] and holds each call until a
//! token is available in an in-memory token bucket. It never retries; a 429
//! from the upstream still propagates to the caller.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::sync::Mutex;

use super::client::LlmClient;
use super::types::{CompletionRequest, CompletionResponse, LlmError, Usage};

/// Rate limit configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct RateLimitConfig {
    /// Tokens added to the bucket per second.
    pub requests_per_second: f64,
    /// Maximum number of tokens the bucket can hold (burst size).
    pub max_bucket_size: f64,
}

impl RateLimitConfig {
    /// Check that calls can ever proceed under this configuration.
    pub fn validate(&self) -> Result<(), String> {
        if !(self.requests_per_second > 0.0) {
            return Err(format!(
                "requests_per_second must be positive, got {}",
                self.requests_per_second
            ));
        }
        if self.max_bucket_size < 1.0 {
            return Err(format!("max_bucket_size must be at least 1, got {}", self.max_bucket_size));
        }
        Ok(())
    }
}

/// Token bucket state.
///
/// The bucket starts empty, so the very first request waits one refill
/// interval.
#[derive(Debug)]
pub struct TokenBucket {
    config: RateLimitConfig,
    tokens: f64,
    last_refill: Instant,
}

impl TokenBucket {
    /// Create an empty bucket whose clock starts at `now`.
    pub fn new(config: RateLimitConfig, now: Instant) -> Self {
        Self {
            config,
            tokens: 0.0,
            last_refill: now,
        }
    }

    fn refill(&mut self, now: Instant) {
        let elapsed = now.saturating_duration_since(self.last_refill).as_secs_f64();
        self.tokens = (self.tokens + elapsed * self.config.requests_per_second).min(self.config.max_bucket_size);
        self.last_refill = now;
    }

    /// Take one token, or report how long until one is available.
    pub fn try_acquire(&mut self, now: Instant) -> Result<(), Duration> {
        self.refill(now);

        if self.tokens >= 1.0 {
            self.tokens -= 1.0;
            return Ok(());
        }

        let missing = 1.0 - self.tokens;
        Err(Duration::from_secs_f64(missing / self.config.requests_per_second))
    }
}

/// LLM client decorator that paces calls through a token bucket.
pub struct RateLimitedClient<C: LlmClient> {
    inner: C,
    bucket: Mutex<TokenBucket>,
}

impl<C: LlmClient> RateLimitedClient<C> {
    /// Wrap `inner`. Call [`RateLimitConfig::validate`] first; a bucket
    /// that can never hold a whole token would block forever.
    pub fn new(inner: C, config: RateLimitConfig) -> Self {
        Self {
            inner,
            bucket: Mutex::new(TokenBucket::new(config, Instant::now())),
        }
    }

    /// Wait until the bucket hands out a token.
    async fn acquire(&self) {
        loop {
            let wait = {
                let mut bucket = self.bucket.lock().await;
                match bucket.try_acquire(Instant::now()) {
                    Ok(()) => return,
                    Err(wait) => wait,
                }
            };
            log::debug!("Rate limiter holding request for {}ms", wait.as_millis());
            tokio::time::sleep(wait).await;
        }
    }
}

#[async_trait]
impl<C: LlmClient> LlmClient for RateLimitedClient<C> {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError> {
        self.acquire().await;
        self.inner.complete(request).await
    }

    fn model(&self) -> &str {
        self.inner.model()
    }

    fn is_ready(&self) -> bool {
        self.inner.is_ready()
    }

    fn total_usage(&self) -> Usage {
        self.inner.total_usage()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::client::MockLlmClient;

    fn config(rps: f64, bucket: f64) -> RateLimitConfig {
        RateLimitConfig {
            requests_per_second: rps,
            max_bucket_size: bucket,
        }
    }

    #[test]
    fn test_bucket_starts_empty() {
        let start = Instant::now();
        let mut bucket = TokenBucket::new(config(2.0, 1.0), start);

        let wait = bucket.try_acquire(start).unwrap_err();
        assert_eq!(wait, Duration::from_millis(500));
    }

    #[test]
    fn test_bucket_refills_over_time() {
        let start = Instant::now();
        let mut bucket = TokenBucket::new(config(2.0, 1.0), start);

        assert!(bucket.try_acquire(start + Duration::from_millis(500)).is_ok());
        assert!(bucket.try_acquire(start + Duration::from_millis(500)).is_err());
        assert!(bucket.try_acquire(start + Duration::from_millis(1000)).is_ok());
    }

    #[test]
    fn test_bucket_caps_at_max_size() {
        let start = Instant::now();
        let mut bucket = TokenBucket::new(config(1.0, 2.0), start);

        let later = start + Duration::from_secs(60);
        assert!(bucket.try_acquire(later).is_ok());
        assert!(bucket.try_acquire(later).is_ok());
        assert!(bucket.try_acquire(later).is_err());
    }

    #[test]
    fn test_partial_token_wait() {
        let start = Instant::now();
        let mut bucket = TokenBucket::new(config(1.0, 1.0), start);

        let wait = bucket.try_acquire(start + Duration::from_millis(250)).unwrap_err();
        assert_eq!(wait, Duration::from_millis(750));
    }

    #[test]
    fn test_validate_rejects_non_positive_rate() {
        assert!(config(0.0, 1.0).validate().is_err());
        assert!(config(-1.0, 1.0).validate().is_err());
        assert!(config(f64::NAN, 1.0).validate().is_err());
    }

    #[test]
    fn test_validate_rejects_small_bucket() {
        assert!(config(1.0, 0.5).validate().is_err());
        assert!(config(0.5, 1.0).validate().is_ok());
    }

    #[tokio::test]
    async fn test_delegates_to_inner_client() {
        let client = RateLimitedClient::new(MockLlmClient::new(["paced"]), config(1000.0, 1.0));

        let response = client
            .complete(CompletionRequest::new("system", "user"))
            .await
            .unwrap();

        assert_eq!(response.content, "paced");
        assert_eq!(client.model(), "mock-model");
    }
}
