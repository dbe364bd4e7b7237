//! Dish photo generation.
//!
//! Generation is best effort: [`resolve_image_url`] turns every failure into
//! the placeholder URL so a poster always has an image.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::AiConfig;

/// Size requested from the image API.
pub const IMAGE_SIZE: &str = "1024x1024";

#[derive(Debug, Error)]
pub enum ImageGenError {
    #[error("Image request failed: {0}")]
    RequestFailed(String),

    #[error("Image API returned error: {status} - {message}")]
    ApiError { status: u16, message: String },

    #[error("Failed to parse image response: {0}")]
    ParseError(String),
}

/// Turns a text description into a hosted image.
#[async_trait]
pub trait ImageGenerator: Send + Sync {
    /// Generate one image and return its URL.
    async fn generate(&self, prompt: &str) -> Result<String, ImageGenError>;
}

/// OpenAI-compatible `images/generations` client.
#[derive(Debug)]
pub struct OpenAiImageGenerator {
    api_key: String,
    model: String,
    endpoint: String,
    client: reqwest::Client,
}

impl OpenAiImageGenerator {
    pub fn new(config: &AiConfig) -> Result<Self, ImageGenError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ImageGenError::RequestFailed(e.to_string()))?;

        Ok(Self {
            api_key: config.api_key.clone(),
            model: config.image_model.clone(),
            endpoint: format!("{}/images/generations", config.base_url.trim_end_matches('/')),
            client,
        })
    }
}

#[derive(Debug, Serialize)]
struct ImageRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    size: &'a str,
    n: u8,
}

#[derive(Debug, Deserialize)]
struct ImageResponse {
    data: Vec<ImageData>,
}

#[derive(Debug, Deserialize)]
struct ImageData {
    url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ImageApiError {
    message: String,
}

#[derive(Debug, Deserialize)]
struct ImageErrorResponse {
    error: ImageApiError,
}

#[async_trait]
impl ImageGenerator for OpenAiImageGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, ImageGenError> {
        let request = ImageRequest {
            model: &self.model,
            prompt,
            size: IMAGE_SIZE,
            n: 1,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| ImageGenError::RequestFailed(e.to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| ImageGenError::RequestFailed(e.to_string()))?;

        if status != 200 {
            // Quota and content-policy rejections come back as structured errors
            let message = serde_json::from_str::<ImageErrorResponse>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(ImageGenError::ApiError { status, message });
        }

        let response: ImageResponse =
            serde_json::from_str(&body).map_err(|e| ImageGenError::ParseError(e.to_string()))?;

        response
            .data
            .into_iter()
            .find_map(|d| d.url)
            .ok_or_else(|| ImageGenError::ParseError("No image URL in response".to_string()))
    }
}

/// Pick the header image for a poster.
///
/// Returns the generated URL on success and `placeholder` when generation is
/// disabled (`generator` is `None`), the prompt is absent or blank, or the
/// call fails for any reason.
pub async fn resolve_image_url(
    generator: Option<&dyn ImageGenerator>,
    prompt: Option<&str>,
    placeholder: &str,
) -> String {
    let Some(generator) = generator else {
        return placeholder.to_string();
    };

    let Some(prompt) = prompt.map(str::trim).filter(|p| !p.is_empty()) else {
        tracing::warn!("Enriched recipe has no image prompt, using placeholder image");
        return placeholder.to_string();
    };

    match generator.generate(prompt).await {
        Ok(url) if !url.trim().is_empty() => {
            tracing::info!("Generated dish image");
            url
        }
        Ok(_) => {
            tracing::warn!("Image generation returned an empty URL, using placeholder");
            placeholder.to_string()
        }
        Err(e) => {
            tracing::warn!(error = %e, "Image generation failed, using placeholder");
            placeholder.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PLACEHOLDER: &str = "https://example.com/placeholder.jpg";

    struct FixedGenerator(Result<&'static str, u16>);

    #[async_trait]
    impl ImageGenerator for FixedGenerator {
        async fn generate(&self, _prompt: &str) -> Result<String, ImageGenError> {
            match self.0 {
                Ok(url) => Ok(url.to_string()),
                Err(status) => Err(ImageGenError::ApiError {
                    status,
                    message: "Billing hard limit has been reached".to_string(),
                }),
            }
        }
    }

    #[tokio::test]
    async fn test_resolve_uses_generated_url() {
        let generator = FixedGenerator(Ok("https://images.example/dish.png"));
        let url = resolve_image_url(Some(&generator), Some("fried egg"), PLACEHOLDER).await;
        assert_eq!(url, "https://images.example/dish.png");
    }

    #[tokio::test]
    async fn test_resolve_falls_back_on_failure() {
        let generator = FixedGenerator(Err(400));
        let url = resolve_image_url(Some(&generator), Some("fried egg"), PLACEHOLDER).await;
        assert_eq!(url, PLACEHOLDER);
    }

    #[tokio::test]
    async fn test_resolve_falls_back_on_empty_url() {
        let generator = FixedGenerator(Ok("  "));
        let url = resolve_image_url(Some(&generator), Some("fried egg"), PLACEHOLDER).await;
        assert_eq!(url, PLACEHOLDER);
    }

    #[tokio::test]
    async fn test_resolve_without_generator_or_prompt() {
        assert_eq!(
            resolve_image_url(None, Some("fried egg"), PLACEHOLDER).await,
            PLACEHOLDER
        );

        let generator = FixedGenerator(Ok("https://images.example/dish.png"));
        assert_eq!(
            resolve_image_url(Some(&generator), Some(" "), PLACEHOLDER).await,
            PLACEHOLDER
        );
        assert_eq!(
            resolve_image_url(Some(&generator), None, PLACEHOLDER).await,
            PLACEHOLDER
        );
    }
}
