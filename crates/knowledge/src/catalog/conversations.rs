//! Conversation log parsing.
//!
//! The log is a list of exchanges, each an ordered pair of turns. It may be
//! wrapped as `{"conversations": [...]}` or be a bare array.

use crate::types::QaPair;
use concierge_core::AppResult;
use serde::Deserialize;
use serde_json::Value;

#[derive(Deserialize)]
#[serde(untagged)]
enum ConversationLog {
    Wrapped { conversations: Vec<Value> },
    Bare(Vec<Value>),
}

#[derive(Deserialize)]
struct Exchange {
    conversations: Vec<Turn>,
}

#[derive(Deserialize)]
struct Turn {
    content: String,
}

/// Parse a conversation log into question/answer pairs.
///
/// Exchanges with fewer than two turns, or that do not have the expected
/// shape, are skipped with a warning.
pub fn parse_conversations(json: &str) -> AppResult<Vec<QaPair>> {
    let log: ConversationLog = serde_json::from_str(json)?;
    let items = match log {
        ConversationLog::Wrapped { conversations } => conversations,
        ConversationLog::Bare(items) => items,
    };

    let mut pairs = Vec::with_capacity(items.len());
    for (index, item) in items.into_iter().enumerate() {
        match serde_json::from_value::<Exchange>(item) {
            Ok(exchange) if exchange.conversations.len() >= 2 => {
                let mut turns = exchange.conversations.into_iter();
                if let (Some(question), Some(answer)) = (turns.next(), turns.next()) {
                    pairs.push(QaPair {
                        question: question.content,
                        answer: answer.content,
                    });
                }
            }
            Ok(_) => tracing::debug!("Skipping exchange {}: fewer than two turns", index),
            Err(e) => tracing::warn!("Skipping malformed exchange {}: {}", index, e),
        }
    }

    Ok(pairs)
}
