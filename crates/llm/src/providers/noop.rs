//! Completion provider that never generates anything.

use crate::client::{LlmClient, LlmRequest, LlmResponse};
use concierge_core::{AppError, AppResult};

/// Stand-in client used when no generative provider is configured.
///
/// Every call fails with `AppError::Llm`, which the answering pipeline treats
/// as "fall back to a deterministic answer".
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopClient;

impl NoopClient {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait::async_trait]
impl LlmClient for NoopClient {
    fn provider_name(&self) -> &str {
        "none"
    }

    fn is_enabled(&self) -> bool {
        false
    }

    async fn complete(&self, _request: &LlmRequest) -> AppResult<LlmResponse> {
        Err(AppError::Llm(
            "No completion provider configured".to_string(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_noop_always_declines() {
        let client = NoopClient::new();
        assert!(!client.is_enabled());
        let result = client.complete(&LlmRequest::new("hello", "any")).await;
        assert!(matches!(result, Err(AppError::Llm(_))));
    }
}
