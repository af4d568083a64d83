//! LLM Client Layer - text-completion services behind one trait
//!
//! This module provides:
//! - Message types for LLM communication
//! - LlmClient trait for API abstraction
//! - OpenAI-compatible and Anthropic implementations
//! - A token-bucket rate limiter with the same call shape
//! - A scripted mock for tests

pub mod anthropic;
pub mod client;
pub mod openai;
pub mod rate_limit;
pub mod types;

use std::sync::Arc;

pub use anthropic::{AnthropicClient, AnthropicConfig};
pub use client::{LlmClient, MockLlmClient, MockReply};
pub use openai::{OpenAiClient, OpenAiConfig};
pub use rate_limit::{RateLimitConfig, RateLimitedClient, TokenBucket};
pub use types::{CompletionRequest, CompletionResponse, LlmError, Message, Role, StopReason, Usage};

use crate::config::{Config, Provider};
use crate::error::{ResumeError, Result};

/// Build the client described by `config`, wrapped in the rate limiter when enabled.
///
/// The API key is passed in explicitly; this function never reads the
/// environment.
pub fn build_client(config: &Config, api_key: impl Into<String>) -> Result<Arc<dyn LlmClient>> {
    let api_key = api_key.into();
    let llm = &config.llm;

    match llm.provider {
        Provider::OpenAi => {
            let client = OpenAiClient::with_api_key(
                api_key,
                OpenAiConfig {
                    base_url: llm.base_url().to_string(),
                    model: llm.model().to_string(),
                    temperature: llm.temperature,
                    max_tokens: llm.max_tokens,
                    timeout: llm.timeout(),
                },
            )?;
            wrap(client, config)
        }
        Provider::Anthropic => {
            let client = AnthropicClient::with_api_key(
                api_key,
                AnthropicConfig {
                    base_url: llm.base_url().to_string(),
                    model: llm.model().to_string(),
                    max_tokens: llm.max_tokens,
                    temperature: Some(llm.temperature),
                    timeout: llm.timeout(),
                },
            )?;
            wrap(client, config)
        }
    }
}

fn wrap<C: LlmClient + 'static>(client: C, config: &Config) -> Result<Arc<dyn LlmClient>> {
    if !config.rate_limit.enabled {
        return Ok(Arc::new(client));
    }

    let limits = config.rate_limit_config();
    limits.validate().map_err(ResumeError::Config)?;
    log::info!(
        "Rate limiting LLM calls to {} req/s (burst {})",
        limits.requests_per_second,
        limits.max_bucket_size
    );
    Ok(Arc::new(RateLimitedClient::new(client, limits)))
}
