//! Status command handler.
//!
//! Reports the last chunking run and what the answering pipeline would load.

use clap::Args;
use concierge_core::{config::AppConfig, AppResult};
use concierge_knowledge::config::load_config;
use concierge_knowledge::{ChunkSummary, KnowledgeSnapshot};
use concierge_prompt::list_prompts;

/// Show what knowledge is loaded
#[derive(Args, Debug)]
pub struct StatusCommand {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl StatusCommand {
    pub fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing status command");

        let knowledge = load_config(&config.workspace)?;
        let summary =
            ChunkSummary::load(&knowledge.data_file(&config.workspace, &knowledge.metadata_file))?;
        let snapshot = KnowledgeSnapshot::load(&config.workspace, &knowledge);
        let prompts = list_prompts(&config.workspace)?;

        if self.json {
            let output = serde_json::json!({
                "organisation": snapshot.catalog.display_name(),
                "facilities": snapshot.catalog.all_facilities().len(),
                "staff": snapshot.catalog.all_staff().len(),
                "chunks": snapshot.chunks.len(),
                "eventTitles": snapshot.event_titles.len(),
                "terminologyRules": snapshot.terminology.len(),
                "provider": config.provider,
                "model": config.model,
                "prompts": prompts,
                "lastChunking": summary,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
            return Ok(());
        }

        println!("Organisation:  {}", snapshot.catalog.display_name());
        println!("Facilities:    {}", snapshot.catalog.all_facilities().len());
        println!("Staff:         {}", snapshot.catalog.all_staff().len());
        println!("Chunks:        {}", snapshot.chunks.len());
        println!("Event titles:  {}", snapshot.event_titles.len());
        println!("Provider:      {} ({})", config.provider, config.model);
        println!("Prompts:       {}", prompts.join(", "));

        match summary {
            Some(summary) => {
                println!(
                    "Last chunking: {} ({} pages, {} chunks)",
                    summary.last_updated.to_rfc3339(),
                    summary.total_pages_scraped,
                    summary.total_chunks_created
                );
                if let Some(url) = summary.source_url {
                    println!("Source:        {}", url);
                }
            }
            None => println!("Last chunking: never (run `concierge chunk`)"),
        }

        Ok(())
    }
}
