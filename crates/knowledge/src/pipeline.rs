//! Request handling: one message in, one reply out.

use crate::config::load_config;
use crate::respond::{Answer, Synthesizer};
use crate::snapshot::KnowledgeHandle;
use crate::types::{Intent, Route};
use chrono::{DateTime, Utc};
use concierge_core::{AppConfig, AppError, AppResult};
use concierge_llm::create_client;
use concierge_prompt::{resolve_prompt, ANSWER_PROMPT_ID};
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

/// An incoming chat message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub message: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
}

impl ChatRequest {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            session_id: None,
        }
    }

    pub fn with_session(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = Some(session_id.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseMetadata {
    pub timestamp: DateTime<Utc>,
    pub message_length: usize,
    pub response_length: usize,
    pub intent: Intent,
    pub route: Route,
}

/// A produced reply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatResponse {
    pub response: String,
    pub session_id: String,
    pub metadata: ResponseMetadata,
}

/// Result of handling one request. Anything but `Success` means no answer
/// was produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ChatOutcome {
    Success(ChatResponse),
    Failure {
        error: String,
        session_id: String,
    },
}

impl ChatOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, ChatOutcome::Success(_))
    }
}

/// The assembled question-answering service.
#[derive(Debug)]
pub struct Concierge {
    knowledge: KnowledgeHandle,
    synthesizer: Synthesizer,
}

impl Concierge {
    pub fn new(knowledge: KnowledgeHandle, synthesizer: Synthesizer) -> Self {
        Self {
            knowledge,
            synthesizer,
        }
    }

    /// Wire up the service for a workspace: knowledge config, data, the
    /// configured completion provider and the answer prompt.
    pub fn open(config: &AppConfig) -> AppResult<Self> {
        let knowledge_config = load_config(&config.workspace)?;

        let endpoint = config.provider_endpoint();
        let llm = create_client(
            &config.provider,
            endpoint.as_deref(),
            Some(Duration::from_secs(knowledge_config.completion_timeout_secs)),
        )
        .map_err(AppError::Llm)?;
        tracing::debug!("Completion provider: {}", llm.provider_name());

        let prompt = resolve_prompt(&config.workspace, ANSWER_PROMPT_ID)?;
        let synthesizer = Synthesizer::new(llm, config.model.clone(), prompt, &knowledge_config);
        let knowledge = KnowledgeHandle::open(&config.workspace, knowledge_config);

        Ok(Self::new(knowledge, synthesizer))
    }

    pub fn knowledge(&self) -> &KnowledgeHandle {
        &self.knowledge
    }

    pub fn synthesizer(&self) -> &Synthesizer {
        &self.synthesizer
    }

    /// Answer against the current snapshot.
    pub async fn answer(&self, message: &str) -> AppResult<Answer> {
        let snapshot = self.knowledge.current();
        self.synthesizer.respond(&snapshot, message).await
    }

    /// Handle one request, echoing or minting its session id.
    pub async fn handle_request(&self, request: ChatRequest) -> ChatOutcome {
        let start = Instant::now();
        let session_id = request
            .session_id
            .clone()
            .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

        match self.answer(&request.message).await {
            Ok(answer) => {
                tracing::info!(
                    session = %session_id,
                    route = ?answer.route,
                    intent = %answer.intent,
                    "Answered in {}ms",
                    start.elapsed().as_millis()
                );
                ChatOutcome::Success(ChatResponse {
                    metadata: ResponseMetadata {
                        timestamp: Utc::now(),
                        message_length: request.message.chars().count(),
                        response_length: answer.text.chars().count(),
                        intent: answer.intent,
                        route: answer.route,
                    },
                    response: answer.text,
                    session_id,
                })
            }
            Err(e) => {
                tracing::error!(session = %session_id, "Failed to answer: {}", e);
                ChatOutcome::Failure {
                    error: e.to_string(),
                    session_id,
                }
            }
        }
    }
}
