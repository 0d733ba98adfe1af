//! Ask command handler.
//!
//! Answers one question and prints the reply, or the request/response
//! document with `--json`.

use clap::Args;
use concierge_core::{config::AppConfig, AppError, AppResult};
use concierge_knowledge::{ChatOutcome, ChatRequest, Concierge};
use std::path::PathBuf;

/// Answer a single question
#[derive(Args, Debug)]
pub struct AskCommand {
    /// The question to ask
    pub message: Option<String>,

    /// Read the question from a file
    #[arg(short, long, conflicts_with = "message")]
    pub file: Option<PathBuf>,

    /// Session identifier to echo in the response
    #[arg(long)]
    pub session: Option<String>,

    /// Print the context assembled for the question instead of answering
    #[arg(long)]
    pub show_context: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl AskCommand {
    /// Execute the ask command.
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing ask command");
        tracing::debug!("Ask command options: {:?}", self);

        let message = self
            .get_message()
            .ok_or_else(|| AppError::Config("No question provided".to_string()))?;

        let concierge = Concierge::open(config)?;

        if self.show_context {
            let snapshot = concierge.knowledge().current();
            let context = concierge.synthesizer().context(&snapshot, &message);
            println!("{}", context.render());
            return Ok(());
        }

        let outcome = concierge
            .handle_request(ChatRequest {
                message,
                session_id: self.session.clone(),
            })
            .await;

        if self.json {
            println!("{}", serde_json::to_string_pretty(&outcome)?);
        }

        match outcome {
            ChatOutcome::Success(response) => {
                if !self.json {
                    println!("{}", response.response);
                }
                tracing::debug!(
                    "Intent: {}, route: {:?}, {} chars",
                    response.metadata.intent,
                    response.metadata.route,
                    response.metadata.response_length
                );
                Ok(())
            }
            ChatOutcome::Failure { error, .. } => Err(AppError::Knowledge(error)),
        }
    }

    /// Get the question text from the argument or the file.
    fn get_message(&self) -> Option<String> {
        self.message
            .clone()
            .or_else(|| {
                self.file.as_ref().and_then(|path| {
                    std::fs::read_to_string(path)
                        .map_err(|e| tracing::error!("Failed to read question file: {}", e))
                        .ok()
                })
            })
            .map(|text| text.trim().to_string())
            .filter(|text| !text.is_empty())
    }
}
