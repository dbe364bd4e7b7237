//! Recipe enrichment: one chat request, parsed into an [`EnrichedRecipe`].

use serde_json::Value;

use crate::ai::prompts::{render_enrich_recipe_prompt, ENRICH_RECIPE_PROMPT_NAME};
use crate::ai::{AiClient, AiError, ChatMessage, ChatRequest};
use crate::recipe::{EnrichedRecipe, RecipeInput, REQUIRED_KEYS};

/// Ask the model to complete and structure `input`.
///
/// Fails with [`AiError::DataFormat`] when the response is not a JSON object of
/// the expected shape and [`AiError::MissingField`] when a required key is
/// absent. The response is never repaired.
pub async fn enrich_recipe(
    ai_client: &dyn AiClient,
    input: &RecipeInput,
) -> Result<EnrichedRecipe, AiError> {
    let request = ChatRequest {
        messages: vec![ChatMessage::user(render_enrich_recipe_prompt(input))],
        json_response: true,
        max_tokens: Some(2048),
        temperature: Some(0.7),
    };

    let response = ai_client
        .complete(ENRICH_RECIPE_PROMPT_NAME, request)
        .await?;

    let recipe = parse_enriched_recipe(&response.content)?;

    tracing::info!(
        title = %recipe.title,
        ingredients = recipe.ingredients.len(),
        steps = recipe.steps.len(),
        model = ai_client.model_name(),
        "Recipe enriched"
    );

    Ok(recipe)
}

/// Parse raw response text into an [`EnrichedRecipe`].
pub fn parse_enriched_recipe(text: &str) -> Result<EnrichedRecipe, AiError> {
    let value: Value = serde_json::from_str(text.trim())
        .map_err(|e| AiError::DataFormat(format!("not valid JSON: {}", e)))?;

    let object = value
        .as_object()
        .ok_or_else(|| AiError::DataFormat("expected a JSON object".to_string()))?;

    for spellings in REQUIRED_KEYS {
        if !spellings.iter().any(|key| object.contains_key(*key)) {
            return Err(AiError::MissingField(spellings.join("|")));
        }
    }

    serde_json::from_value(value).map_err(|e| AiError::DataFormat(e.to_string()))
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::ai::{ChatResponse, FakeAiClient, Role, Usage, SAMPLE_ENRICHED_RECIPE};

    /// Keeps every request it receives.
    #[derive(Default)]
    struct RecordingClient {
        requests: Mutex<Vec<ChatRequest>>,
    }

    #[async_trait]
    impl AiClient for RecordingClient {
        async fn complete(
            &self,
            _prompt_name: &str,
            request: ChatRequest,
        ) -> Result<ChatResponse, AiError> {
            self.requests.lock().unwrap().push(request);
            Ok(ChatResponse {
                content: SAMPLE_ENRICHED_RECIPE.to_string(),
                usage: Usage::default(),
            })
        }

        fn model_name(&self) -> &str {
            "recording"
        }
    }

    #[tokio::test]
    async fn test_enrich_sends_single_user_message() {
        let client = RecordingClient::default();
        let input = RecipeInput::new("Fried Egg", "egg, salt", "beat egg, fry", "");

        enrich_recipe(&client, &input).await.unwrap();

        let requests = client.requests.lock().unwrap();
        assert_eq!(requests.len(), 1);
        let messages = &requests[0].messages;
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].role, Role::User);
        assert!(messages[0].content.contains("food scientist"));
        assert!(messages[0].content.contains("Title: Fried Egg"));
        assert!(requests[0].json_response);
    }

    #[tokio::test]
    async fn test_enrich_recipe_parses_response() {
        let client = FakeAiClient::with_response("food scientist", SAMPLE_ENRICHED_RECIPE);
        let input = RecipeInput::new("Fried Egg", "egg, salt", "beat egg, fry", "");

        let recipe = enrich_recipe(&client, &input).await.unwrap();

        assert_eq!(recipe.title, "Crispy Fried Egg");
        assert!(recipe.ingredients.len() >= 2);
        assert!(recipe.steps.len() >= 2);
        assert!(recipe.image_prompt.is_some());
        assert_eq!(client.call_count(), 1);
    }

    #[tokio::test]
    async fn test_enrich_recipe_rejects_prose() {
        let client = FakeAiClient::new().with_default_response("Sure! Here is your recipe.");
        let input = RecipeInput::new("Fried Egg", "egg", "fry", "");

        let err = enrich_recipe(&client, &input).await.unwrap_err();
        assert!(matches!(err, AiError::DataFormat(_)));
    }

    #[test]
    fn test_parse_missing_required_key() {
        let err = parse_enriched_recipe(r#"{"judul": "Egg", "langkah": ["fry"]}"#).unwrap_err();
        match err {
            AiError::MissingField(field) => assert_eq!(field, "bahan_detail|bahan"),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_parse_accepts_plain_bahan() {
        let recipe =
            parse_enriched_recipe(r#"{"judul": "Egg", "bahan": ["egg"], "langkah": "fry it"}"#)
                .unwrap();
        assert_eq!(recipe.ingredients[0].name, "egg");
        assert_eq!(recipe.steps, vec!["fry it".to_string()]);
    }

    #[test]
    fn test_parse_rejects_wrong_types() {
        let err = parse_enriched_recipe(r#"{"judul": 7, "bahan_detail": [], "langkah": []}"#)
            .unwrap_err();
        assert!(matches!(err, AiError::DataFormat(_)));

        let err = parse_enriched_recipe("[1, 2, 3]").unwrap_err();
        assert!(matches!(err, AiError::DataFormat(_)));
    }
}
