//! Fake AI client for tests and offline development.
//!
//! Responses are matched by checking if the prompt contains a registered
//! substring, so tests run without network access or API costs.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use super::client::{AiClient, AiError};
use super::types::{ChatRequest, ChatResponse, Usage};

/// Enriched recipe returned by [`FakeAiClient::with_recipe_response`].
pub const SAMPLE_ENRICHED_RECIPE: &str = r#"{
    "judul": "Crispy Fried Egg",
    "deskripsi": "A golden fried egg with lacy, crunchy edges.",
    "bahan_detail": [
        {"nama": "2 eggs", "icon": "fa-egg"},
        {"nama": "1/4 tsp salt", "icon": "fa-mortar-pestle"},
        {"nama": "2 tbsp cooking oil", "icon": "fa-bottle-droplet"}
    ],
    "langkah": [
        "Heat the oil in a small pan until shimmering.",
        "Crack the eggs into the pan and season with salt.",
        "Fry until the edges are crisp and the white is set."
    ],
    "trik": "Let the oil get properly hot before adding the eggs.",
    "nutrisi": {"kalori": "210", "protein": "12g", "karbo": "1g", "lemak": "17g"},
    "image_prompt": "Overhead photo of a crispy fried egg in a cast iron pan, natural light"
}"#;

/// A fake AI client.
///
/// Patterns are checked in registration order, case-insensitively.
#[derive(Debug, Default)]
pub struct FakeAiClient {
    responses: Vec<(String, String)>,
    default_response: Option<String>,
    calls: AtomicUsize,
}

impl FakeAiClient {
    /// Create a new client with no registered responses.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a client that returns `response` for prompts containing `prompt_contains`.
    pub fn with_response(prompt_contains: &str, response: &str) -> Self {
        let mut client = Self::new();
        client.add_response(prompt_contains, response);
        client
    }

    /// Create a client that answers every prompt with [`SAMPLE_ENRICHED_RECIPE`].
    pub fn with_recipe_response() -> Self {
        Self::new().with_default_response(SAMPLE_ENRICHED_RECIPE)
    }

    pub fn add_response(&mut self, prompt_contains: &str, response: &str) {
        self.responses
            .push((prompt_contains.to_lowercase(), response.to_string()));
    }

    /// Set the response used when no pattern matches.
    pub fn with_default_response(mut self, response: &str) -> Self {
        self.default_response = Some(response.to_string());
        self
    }

    /// Number of completed calls so far.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl AiClient for FakeAiClient {
    async fn complete(
        &self,
        _prompt_name: &str,
        request: ChatRequest,
    ) -> Result<ChatResponse, AiError> {
        self.calls.fetch_add(1, Ordering::Relaxed);

        let prompt = request
            .messages
            .iter()
            .map(|m| m.content.to_lowercase())
            .collect::<Vec<_>>()
            .join("\n");

        let content = self
            .responses
            .iter()
            .find(|(pattern, _)| prompt.contains(pattern.as_str()))
            .map(|(_, response)| response.clone())
            .or_else(|| self.default_response.clone())
            .ok_or_else(|| {
                AiError::Api(format!(
                    "FakeAiClient: no response configured for prompt (first 100 chars): {}",
                    prompt.chars().take(100).collect::<String>()
                ))
            })?;

        Ok(ChatResponse {
            content,
            usage: Usage::default(),
        })
    }

    fn model_name(&self) -> &str {
        "fake-model"
    }
}
