//! LLM client trait and a scripted mock implementation

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use super::types::{CompletionRequest, CompletionResponse, LlmError, Usage};

/// Stateless LLM client - each call is independent (fresh context)
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Single completion request (blocking until complete)
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError>;

    /// Model identifier used when a request does not override it
    fn model(&self) -> &str;

    /// Whether the client has what it needs to make calls
    fn is_ready(&self) -> bool {
        true
    }

    /// Cumulative token usage across all calls made by this client
    fn total_usage(&self) -> Usage {
        Usage::default()
    }
}

/// One scripted reply for [`MockLlmClient`]
#[derive(Debug, Clone)]
pub enum MockReply {
    /// Successful completion with this text
    Text(String),
    /// API failure with this status and message
    Error { status: u16, message: String },
}

impl From<&str> for MockReply {
    fn from(text: &str) -> Self {
        MockReply::Text(text.to_string())
    }
}

impl From<String> for MockReply {
    fn from(text: String) -> Self {
        MockReply::Text(text)
    }
}

/// Mock client that replays scripted replies in order and records requests
#[derive(Debug, Default)]
pub struct MockLlmClient {
    replies: Mutex<VecDeque<MockReply>>,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl MockLlmClient {
    /// Create a mock with the given replies
    pub fn new<R: Into<MockReply>>(replies: impl IntoIterator<Item = R>) -> Self {
        Self {
            replies: Mutex::new(replies.into_iter().map(Into::into).collect()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// All requests received so far
    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().map(|r| r.clone()).unwrap_or_default()
    }

    /// Number of requests received so far
    pub fn call_count(&self) -> usize {
        self.requests.lock().map(|r| r.len()).unwrap_or(0)
    }

    /// Replies not yet consumed
    pub fn remaining(&self) -> usize {
        self.replies.lock().map(|r| r.len()).unwrap_or(0)
    }
}

#[async_trait]
impl LlmClient for MockLlmClient {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError> {
        self.requests
            .lock()
            .map_err(|e| LlmError::InvalidResponse(format!("mock lock poisoned: {}", e)))?
            .push(request);

        let reply = self
            .replies
            .lock()
            .map_err(|e| LlmError::InvalidResponse(format!("mock lock poisoned: {}", e)))?
            .pop_front();

        match reply {
            Some(MockReply::Text(content)) => Ok(CompletionResponse {
                content,
                model: "mock-model".to_string(),
                ..Default::default()
            }),
            Some(MockReply::Error { status, message }) => Err(LlmError::Api { status, message }),
            None => Err(LlmError::InvalidResponse("mock script exhausted".to_string())),
        }
    }

    fn model(&self) -> &str {
        "mock-model"
    }
}
