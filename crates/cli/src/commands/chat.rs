//! Chat command handler.
//!
//! An interactive session over stdin. Lines starting with `/` are session
//! commands; everything else is a question. The exchange is saved as a
//! transcript when the session ends.

use anyhow::Context;
use chrono::{DateTime, Utc};
use clap::Args;
use concierge_core::{config::AppConfig, AppResult};
use concierge_knowledge::{ChatOutcome, ChatRequest, Concierge, Intent, Route};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

/// Interactive question-and-answer session
#[derive(Args, Debug)]
pub struct ChatCommand {
    /// Name recorded in the transcript file name
    #[arg(long, default_value = "cli")]
    pub client: String,

    /// Do not save a transcript
    #[arg(long)]
    pub no_save: bool,
}

#[derive(Debug, Serialize)]
struct TranscriptEntry {
    timestamp: DateTime<Utc>,
    user: String,
    assistant: String,
    intent: Option<Intent>,
    route: Option<Route>,
}

#[derive(Debug, Serialize)]
struct Transcript<'a> {
    session_id: &'a str,
    client: &'a str,
    started_at: DateTime<Utc>,
    messages: &'a [TranscriptEntry],
}

const HELP: &str = "Commands: /status, /reload, /context <question>, /help, /quit";

impl ChatCommand {
    /// Execute the chat command.
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing chat command");

        let concierge = Concierge::open(config)?;
        let session_id = uuid::Uuid::new_v4().to_string();
        let started_at = Utc::now();
        let mut entries: Vec<TranscriptEntry> = Vec::new();

        let org = concierge.knowledge().current().catalog.display_name().to_string();
        println!("Ask me anything about {}. {}", org, HELP);

        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        let mut stdout = tokio::io::stdout();

        loop {
            stdout.write_all(b"> ").await?;
            stdout.flush().await?;

            let Some(line) = lines.next_line().await? else {
                break;
            };
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            match line.split_once(' ').unwrap_or((line, "")) {
                ("/quit" | "/exit", _) => break,
                ("/help", _) => println!("{}", HELP),
                ("/status", _) => print_status(&concierge),
                ("/reload", _) => {
                    let snapshot = concierge.knowledge().reload();
                    println!(
                        "Reloaded: {} facilities, {} chunks",
                        snapshot.catalog.all_facilities().len(),
                        snapshot.chunks.len()
                    );
                }
                ("/context", question) if !question.trim().is_empty() => {
                    let snapshot = concierge.knowledge().current();
                    let context = concierge.synthesizer().context(&snapshot, question.trim());
                    println!("{}", context.render());
                }
                (command, _) if command.starts_with('/') => {
                    println!("Unknown command {}. {}", command, HELP)
                }
                _ => {
                    let request = ChatRequest {
                        message: line.to_string(),
                        session_id: Some(session_id.clone()),
                    };
                    let entry = match concierge.handle_request(request).await {
                        ChatOutcome::Success(response) => TranscriptEntry {
                            timestamp: response.metadata.timestamp,
                            user: line.to_string(),
                            assistant: response.response,
                            intent: Some(response.metadata.intent),
                            route: Some(response.metadata.route),
                        },
                        ChatOutcome::Failure { error, .. } => TranscriptEntry {
                            timestamp: Utc::now(),
                            user: line.to_string(),
                            assistant: format!("Error: {}", error),
                            intent: None,
                            route: None,
                        },
                    };
                    println!("\n{}\n", entry.assistant);
                    entries.push(entry);
                }
            }
        }

        if !self.no_save && !entries.is_empty() {
            let transcript = Transcript {
                session_id: &session_id,
                client: &self.client,
                started_at,
                messages: &entries,
            };
            match save_transcript(&config.concierge_dir(), &transcript) {
                Ok(path) => println!("Conversation saved to {}", path.display()),
                Err(e) => tracing::warn!("Failed to save conversation: {:#}", e),
            }
        }

        Ok(())
    }
}

fn print_status(concierge: &Concierge) {
    let snapshot = concierge.knowledge().current();
    println!("Organisation: {}", snapshot.catalog.display_name());
    println!("Facilities:   {}", snapshot.catalog.all_facilities().len());
    println!("Staff:        {}", snapshot.catalog.all_staff().len());
    println!("Chunks:       {}", snapshot.chunks.len());
    println!("Events:       {}", snapshot.event_titles.len());
    println!("Loaded at:    {}", snapshot.loaded_at.to_rfc3339());
    println!("Resolver:     {:?}", concierge.synthesizer().resolver());
}

/// Write `<dir>/conversations/<client>_<timestamp>.json`.
fn save_transcript(concierge_dir: &Path, transcript: &Transcript<'_>) -> anyhow::Result<PathBuf> {
    let dir = concierge_dir.join("conversations");
    std::fs::create_dir_all(&dir).with_context(|| format!("creating {}", dir.display()))?;

    let client: String = transcript
        .client
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '-' { c } else { '_' })
        .collect();
    let path = dir.join(format!(
        "{}_{}.json",
        client,
        transcript.started_at.format("%Y%m%d_%H%M%S")
    ));

    let json = serde_json::to_string_pretty(transcript).context("serialising transcript")?;
    std::fs::write(&path, json).with_context(|| format!("writing {}", path.display()))?;
    Ok(path)
}
