//! AI Insight Client
//!
//! Requests a one-sentence blurb for a restaurant from a Groq (OpenAI
//! compatible) chat-completions endpoint.
//!
//! `generate()` never fails: missing credentials, network errors, timeouts,
//! provider errors and empty completions all yield `FALLBACK_INSIGHT`.
//! Successful insights are cached per prompt for one hour.

use moka::future::Cache;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::config::AppConfig;
use crate::data::Restaurant;

/// Returned whenever the provider cannot answer
pub const FALLBACK_INSIGHT: &str =
    "A local favorite known for its consistent quality and great atmosphere.";

const SYSTEM_PROMPT: &str = "You are a witty Bangalore food expert. Provide very concise, \
    single-sentence restaurant insights (max 20 words).";

/// Upper bound on returned insight length (characters)
pub const MAX_INSIGHT_CHARS: usize = 240;

const CACHE_TTL: Duration = Duration::from_secs(3600);

/// Prompt describing one restaurant
pub fn restaurant_prompt(restaurant: &Restaurant) -> String {
    format!(
        "Tell me why {} in {} is a great pick. It serves {} and has a {} rating.",
        restaurant.name,
        restaurant.locality,
        restaurant.cuisines_label(),
        restaurant.rating
    )
}

// ============================================================================
// Wire types
// ============================================================================

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    temperature: f32,
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Deserialize)]
struct ChatReply {
    content: Option<String>,
}

// ============================================================================
// Client
// ============================================================================

#[derive(Clone)]
pub struct InsightClient {
    http_client: Client,
    api_key: Option<String>,
    model: String,
    base_url: String,
    cache: Cache<String, String>,
}

impl InsightClient {
    pub fn new(config: &AppConfig) -> Self {
        let http_client = Client::builder()
            .timeout(config.insight_timeout)
            .build()
            .unwrap_or_else(|e| {
                tracing::warn!("Failed to build insight HTTP client ({}), using defaults", e);
                Client::new()
            });

        Self {
            http_client,
            api_key: config.groq_api_key.clone(),
            model: config.groq_model.clone(),
            base_url: config.groq_base_url.trim_end_matches('/').to_string(),
            cache: Cache::builder()
                .max_capacity(1_000)
                .time_to_live(CACHE_TTL)
                .build(),
        }
    }

    /// One sentence about the prompt's subject, or the fallback sentence
    pub async fn generate(&self, prompt: &str) -> String {
        if let Some(cached) = self.cache.get(prompt).await {
            return cached;
        }

        let Some(api_key) = self.api_key.as_deref() else {
            return FALLBACK_INSIGHT.to_string();
        };

        match self.request(api_key, prompt).await {
            Ok(insight) => {
                self.cache.insert(prompt.to_string(), insight.clone()).await;
                insight
            }
            Err(e) => {
                tracing::warn!("Insight request failed, using fallback: {}", e);
                FALLBACK_INSIGHT.to_string()
            }
        }
    }

    async fn request(&self, api_key: &str, prompt: &str) -> anyhow::Result<String> {
        let body = ChatRequest {
            model: &self.model,
            messages: [
                ChatMessage { role: "system", content: SYSTEM_PROMPT },
                ChatMessage { role: "user", content: prompt },
            ],
            temperature: 0.7,
            max_tokens: 50,
        };

        let response: ChatResponse = self
            .http_client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .and_then(|content| clean_insight(&content))
            .ok_or_else(|| anyhow::anyhow!("provider returned no content"))
    }
}

/// Trim whitespace and wrapping quotes, cap the length; `None` if nothing is left
fn clean_insight(raw: &str) -> Option<String> {
    let text = raw.trim().trim_matches('"').trim();
    if text.is_empty() {
        return None;
    }
    match text.char_indices().nth(MAX_INSIGHT_CHARS) {
        Some((cut, _)) => Some(format!("{}…", text[..cut].trim_end())),
        None => Some(text.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_restaurant_prompt() {
        let records = crate::fallback::sample_restaurants();
        let prompt = restaurant_prompt(&records[0]);
        assert_eq!(
            prompt,
            "Tell me why Jalsa in Banashankari is a great pick. \
             It serves North Indian, Mughlai, Chinese and has a 4.1 rating."
        );
    }

    #[test]
    fn test_clean_insight() {
        assert_eq!(clean_insight("  \"Great dosa.\"  ").as_deref(), Some("Great dosa."));
        assert_eq!(clean_insight(" \"\" "), None);

        let long = "a".repeat(MAX_INSIGHT_CHARS + 50);
        let cleaned = clean_insight(&long).unwrap();
        assert_eq!(cleaned.chars().count(), MAX_INSIGHT_CHARS + 1);
    }

    #[tokio::test]
    async fn test_missing_key_falls_back() {
        let client = InsightClient::new(&AppConfig::default());
        assert_eq!(client.generate("anything").await, FALLBACK_INSIGHT);
    }

    #[tokio::test]
    async fn test_unreachable_provider_falls_back() {
        let config = AppConfig {
            groq_api_key: Some("test-key".to_string()),
            groq_base_url: "http://127.0.0.1:9".to_string(),
            insight_timeout: Duration::from_secs(2),
            ..AppConfig::default()
        };
        let client = InsightClient::new(&config);
        assert_eq!(client.generate("anything").await, FALLBACK_INSIGHT);
    }
}
