//! AI client module for recipe enrichment.
//!
//! This module provides:
//! - `AiClient` trait for abstracting chat completion providers
//! - `OpenAiClient`, an OpenAI-compatible implementation
//! - `FakeAiClient` for tests and offline runs
//! - The enrichment prompt and response parsing
//!
//! # Example
//!
//! ```ignore
//! use chefart_core::ai::{client_from_config, enrich_recipe};
//! use chefart_core::config::AiConfig;
//! use chefart_core::RecipeInput;
//!
//! let client = client_from_config(&AiConfig::from_env()?)?;
//! let input = RecipeInput::new("Fried Egg", "egg, salt", "beat egg, fry", "");
//! let recipe = enrich_recipe(client.as_ref(), &input).await?;
//! println!("{}", recipe.title);
//! ```

mod client;
mod enrich;
mod fake;
pub mod prompts;
mod types;

use std::sync::Arc;

pub use client::{AiClient, AiError, OpenAiClient};
pub use enrich::{enrich_recipe, parse_enriched_recipe};
pub use fake::{FakeAiClient, SAMPLE_ENRICHED_RECIPE};
pub use types::{ChatMessage, ChatRequest, ChatResponse, Role, Usage};

use crate::config::{AiConfig, ProviderKind};

/// Build the client selected by `config.provider`.
pub fn client_from_config(config: &AiConfig) -> Result<Arc<dyn AiClient>, AiError> {
    match config.provider {
        ProviderKind::OpenAi => Ok(Arc::new(OpenAiClient::new(config)?)),
        ProviderKind::Fake => {
            tracing::warn!("Using fake enrichment provider");
            Ok(Arc::new(FakeAiClient::with_recipe_response()))
        }
    }
}
