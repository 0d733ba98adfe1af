//! Response synthesis.
//!
//! Each message walks a fixed ladder and stops at the first rung that
//! produces a reply:
//!
//! 1. input without letters gets a request to rephrase
//! 2. an exact greeting, farewell, thanks or contact phrase gets a canned reply
//! 3. a catalog-wide listing request gets the listing
//! 4. a named facility, staff member or event gets its details
//! 5. anything else gets a completion over the assembled context, then the
//!    closest logged answer, then an apology
//!
//! Every reply then passes through terminology repair and link appending.

pub mod canned;
pub mod entity;
pub mod format;
pub mod listing;

use crate::config::KnowledgeConfig;
use crate::context::{assemble, QueryContext};
use crate::intent::broad_category;
use crate::links::append_links;
use crate::resolve::EntityResolver;
use crate::snapshot::KnowledgeSnapshot;
use crate::types::{Intent, Route};
use concierge_core::AppResult;
use concierge_llm::{LlmClient, LlmRequest};
use concierge_prompt::{build_prompt, PromptDefinition};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use canned::{fixed_phrase_reply, is_non_text, non_text_reply, FixedPhrase};
use format::{format_response, Section};

/// A finished reply and how it was produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Answer {
    pub text: String,
    pub intent: Intent,
    pub route: Route,
}

/// Turns messages into replies against a knowledge snapshot.
pub struct Synthesizer {
    llm: Arc<dyn LlmClient>,
    model: String,
    prompt: PromptDefinition,
    resolver: EntityResolver,
    timeout: Duration,
    temperature: f32,
    min_completion_chars: usize,
    context_top_k: usize,
    event_top_k: usize,
    links_enabled: bool,
}

impl std::fmt::Debug for Synthesizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Synthesizer")
            .field("provider", &self.llm.provider_name())
            .field("model", &self.model)
            .field("prompt", &self.prompt.id)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl Synthesizer {
    pub fn new(
        llm: Arc<dyn LlmClient>,
        model: impl Into<String>,
        prompt: PromptDefinition,
        config: &KnowledgeConfig,
    ) -> Self {
        Self {
            llm,
            model: model.into(),
            prompt,
            resolver: EntityResolver::from_config(config),
            timeout: Duration::from_secs(config.completion_timeout_secs),
            temperature: config.completion_temperature,
            min_completion_chars: config.min_completion_chars,
            context_top_k: config.context_top_k,
            event_top_k: config.event_search_top_k,
            links_enabled: config.links_enabled,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn resolver(&self) -> &EntityResolver {
        &self.resolver
    }

    /// Context the completion stage would see for `message`.
    pub fn context(&self, snapshot: &KnowledgeSnapshot, message: &str) -> QueryContext {
        assemble(
            &snapshot.catalog,
            &snapshot.chunks,
            &self.resolver,
            message,
            self.context_top_k,
        )
    }

    /// Answer one message.
    ///
    /// Misses at every stage fall through to the next; the only error is a
    /// prompt template that fails to render.
    pub async fn respond(&self, snapshot: &KnowledgeSnapshot, message: &str) -> AppResult<Answer> {
        let (text, intent, route) = self.route(snapshot, message).await?;
        tracing::debug!(route = ?route, intent = %intent, "Answered");

        Ok(Answer {
            text: self.finish(snapshot, message, &text),
            intent,
            route,
        })
    }

    async fn route(
        &self,
        snapshot: &KnowledgeSnapshot,
        message: &str,
    ) -> AppResult<(String, Intent, Route)> {
        let catalog = &snapshot.catalog;
        let org = catalog.display_name();

        if is_non_text(message) {
            return Ok((non_text_reply(org), Intent::General, Route::NonText));
        }

        if let Some(phrase) = FixedPhrase::detect(message) {
            tracing::debug!("Fixed phrase: {:?}", phrase);
            return Ok((
                fixed_phrase_reply(phrase, catalog),
                Intent::General,
                Route::FixedPhrase,
            ));
        }

        let intent = snapshot.classifier.classify(message);

        if let Some(category) = broad_category(message) {
            tracing::debug!("Broad category: {:?}", category);
            match listing::broad_listing(category, catalog, &snapshot.chunks, self.event_top_k) {
                Some(text) => return Ok((text, intent, Route::BroadListing)),
                None => tracing::debug!("Nothing to list for {:?}, falling through", category),
            }
        }

        let facility = self
            .resolver
            .resolve_facility(catalog.all_facilities().iter().map(|f| f.name.as_str()), message)
            .and_then(|name| catalog.facility(name));
        if let Some(facility) = facility {
            tracing::debug!("Resolved facility: {}", facility.name);
            let pricing_hits = snapshot
                .classifier
                .scores(message)
                .into_iter()
                .find(|(i, _)| *i == Intent::Pricing)
                .map_or(0, |(_, hits)| hits);
            let intent = if pricing_hits > 0 {
                Intent::Pricing
            } else {
                Intent::Facility
            };
            return Ok((entity::facility_reply(facility, org), intent, Route::Facility));
        }

        if let Some(member) = entity::find_staff(catalog.all_staff(), message) {
            tracing::debug!("Matched staff member: {}", member.name);
            let text = entity::staff_reply(member, snapshot.chunks.all_chunks(), org);
            return Ok((text, Intent::Staff, Route::Staff));
        }

        if let Some(title) = entity::find_event(&snapshot.event_titles, message) {
            tracing::debug!("Matched event: {}", title);
            let text = entity::event_reply(title, catalog, snapshot.chunks.all_chunks());
            return Ok((text, Intent::Event, Route::Event));
        }

        let context = self.context(snapshot, message);

        if self.llm.is_enabled() {
            if let Some(text) = self.complete(org, intent, message, &context).await? {
                return Ok((text, intent, Route::Completion));
            }
        }

        if let Some(best) = context.best_qa() {
            tracing::debug!(
                "Answering from logged question '{}' (overlap {})",
                best.pair.question,
                best.overlap
            );
            let section = Section::new("").paragraph(best.pair.answer.clone());
            let title = format!("{} Information", capitalize(intent.as_str()));
            return Ok((
                format_response(&title, &[section], org),
                intent,
                Route::QaExtract,
            ));
        }

        Ok((apology(org), intent, Route::Apology))
    }

    /// Ask the model, returning `None` when it fails, times out or says
    /// too little.
    async fn complete(
        &self,
        organisation: &str,
        intent: Intent,
        message: &str,
        context: &QueryContext,
    ) -> AppResult<Option<String>> {
        let mut vars = HashMap::new();
        vars.insert("organisation".to_string(), organisation.to_string());
        vars.insert("intent".to_string(), intent.to_string());
        vars.insert("prompt".to_string(), message.to_string());

        let built = build_prompt(&self.prompt, vars, Some(context.render().to_string()))?;

        let mut request = LlmRequest::new(built.user.clone(), self.model.clone())
            .with_temperature(self.temperature);
        if let Some(system) = &built.system {
            request = request.with_system(system.clone());
        }

        let response = match tokio::time::timeout(self.timeout, self.llm.complete(&request)).await
        {
            Ok(Ok(response)) => response,
            Ok(Err(e)) => {
                tracing::warn!("Completion failed, using fallback: {}", e);
                return Ok(None);
            }
            Err(_) => {
                tracing::warn!(
                    "Completion timed out after {}s, using fallback",
                    self.timeout.as_secs()
                );
                return Ok(None);
            }
        };

        let content = response
            .content
            .strip_prefix(built.user.as_str())
            .unwrap_or(&response.content)
            .trim();

        if content.chars().count() > self.min_completion_chars {
            Ok(Some(content.to_string()))
        } else {
            tracing::warn!(
                "Completion too short ({} chars), using fallback",
                content.chars().count()
            );
            Ok(None)
        }
    }

    /// Terminology repair, then links.
    fn finish(&self, snapshot: &KnowledgeSnapshot, message: &str, text: &str) -> String {
        let text = snapshot.terminology.standardize(text);
        if self.links_enabled {
            append_links(&text, message, snapshot.links.as_ref())
        } else {
            text
        }
    }
}

/// Reply when nothing in the knowledge base fits.
pub fn apology(organisation: &str) -> String {
    format!(
        "I don't have specific information about that. Please try asking about {} facilities, equipment, pricing, staff, internships, events, policies, or tools. If you need further assistance, please contact {} staff.",
        organisation, organisation
    )
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("pricing"), "Pricing");
        assert_eq!(capitalize(""), "");
    }

    #[test]
    fn test_apology_names_organisation() {
        let text = apology("Arts Lab");
        assert!(text.starts_with("I don't have specific information about that."));
        assert!(text.ends_with("please contact Arts Lab staff."));
    }
}
