//! Configuration from environment variables.
//!
//! Every setting has a default except the API key, which is only required when
//! a real provider is selected.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::poster::QrConfig;

/// Default OpenAI-compatible base URL.
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Default chat model for enrichment.
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Default image model.
pub const DEFAULT_IMAGE_MODEL: &str = "dall-e-3";

/// Shown when image generation is disabled or fails.
pub const DEFAULT_PLACEHOLDER_IMAGE_URL: &str =
    "https://images.unsplash.com/photo-1546069901-ba9599a7e63c?q=80&w=1000";

pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 60;
pub const DEFAULT_RENDER_TIMEOUT_SECS: u64 = 30;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid value for {name}: {value}")]
    InvalidValue { name: String, value: String },
}

/// Which enrichment backend to talk to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    OpenAi,
    Fake,
}

/// Settings for the text and image generation services.
#[derive(Debug, Clone)]
pub struct AiConfig {
    pub provider: ProviderKind,
    /// Empty for the fake provider.
    pub api_key: String,
    pub model: String,
    pub image_model: String,
    pub base_url: String,
    pub timeout: Duration,
}

impl AiConfig {
    /// Load configuration from environment variables.
    ///
    /// - `ENRICHMENT_PROVIDER`: "openai" (default) or "fake"
    /// - `OPENAI_API_KEY`: required for "openai"
    /// - `CHEFART_AI_MODEL`: chat model (default: "gpt-4o-mini")
    /// - `CHEFART_IMAGE_MODEL`: image model (default: "dall-e-3")
    /// - `CHEFART_AI_BASE_URL`: API base URL
    /// - `CHEFART_HTTP_TIMEOUT_SECS`: per-request timeout (default: 60)
    pub fn from_env() -> Result<Self, ConfigError> {
        let provider = match env::var("ENRICHMENT_PROVIDER")
            .unwrap_or_else(|_| "openai".to_string())
            .as_str()
        {
            "openai" => ProviderKind::OpenAi,
            "fake" => ProviderKind::Fake,
            other => {
                return Err(ConfigError::InvalidValue {
                    name: "ENRICHMENT_PROVIDER".to_string(),
                    value: other.to_string(),
                })
            }
        };

        let api_key = match provider {
            ProviderKind::OpenAi => env::var("OPENAI_API_KEY")
                .map_err(|_| ConfigError::MissingEnvVar("OPENAI_API_KEY".to_string()))?,
            ProviderKind::Fake => String::new(),
        };

        Ok(Self {
            provider,
            api_key,
            model: env::var("CHEFART_AI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string()),
            image_model: env::var("CHEFART_IMAGE_MODEL")
                .unwrap_or_else(|_| DEFAULT_IMAGE_MODEL.to_string()),
            base_url: env::var("CHEFART_AI_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string()),
            timeout: Duration::from_secs(parse_env_or(
                "CHEFART_HTTP_TIMEOUT_SECS",
                DEFAULT_HTTP_TIMEOUT_SECS,
            )?),
        })
    }
}

/// Settings for the generation pipeline itself.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Root directory for per-job PNG output.
    pub output_dir: PathBuf,
    pub placeholder_image_url: String,
    pub qr: QrConfig,
    /// Reject blank title/ingredients before calling any service.
    pub strict_input: bool,
    pub render_timeout: Duration,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            placeholder_image_url: DEFAULT_PLACEHOLDER_IMAGE_URL.to_string(),
            qr: QrConfig::default(),
            strict_input: true,
            render_timeout: Duration::from_secs(DEFAULT_RENDER_TIMEOUT_SECS),
        }
    }
}

impl PipelineConfig {
    /// Load configuration from environment variables.
    ///
    /// - `CHEFART_OUTPUT_DIR` (default: `$TMPDIR/chefart`)
    /// - `CHEFART_PLACEHOLDER_IMAGE_URL`
    /// - `CHEFART_QR_HOST` (default: "chefart.ai")
    /// - `CHEFART_STRICT_INPUT` (default: true)
    /// - `CHEFART_RENDER_TIMEOUT_SECS` (default: 30)
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let mut qr = defaults.qr;
        if let Ok(host) = env::var("CHEFART_QR_HOST") {
            qr.payload_host = host;
        }

        Ok(Self {
            output_dir: env::var("CHEFART_OUTPUT_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.output_dir),
            placeholder_image_url: match env::var("CHEFART_PLACEHOLDER_IMAGE_URL") {
                Ok(url) => parse_placeholder_url(url)?,
                Err(_) => defaults.placeholder_image_url,
            },
            qr,
            strict_input: env::var("CHEFART_STRICT_INPUT")
                .map(|v| parse_flag(&v))
                .unwrap_or(defaults.strict_input),
            render_timeout: Duration::from_secs(parse_env_or(
                "CHEFART_RENDER_TIMEOUT_SECS",
                DEFAULT_RENDER_TIMEOUT_SECS,
            )?),
        })
    }
}

pub fn default_output_dir() -> PathBuf {
    env::temp_dir().join("chefart")
}

/// "false", "0", "no" and "off" (any case) turn a flag off; anything else is on.
fn parse_flag(value: &str) -> bool {
    !["false", "0", "no", "off"]
        .iter()
        .any(|off| value.trim().eq_ignore_ascii_case(off))
}

/// Posters always need an image source, so a blank placeholder is rejected.
fn parse_placeholder_url(url: String) -> Result<String, ConfigError> {
    if url.trim().is_empty() {
        return Err(ConfigError::InvalidValue {
            name: "CHEFART_PLACEHOLDER_IMAGE_URL".to_string(),
            value: url,
        });
    }
    Ok(url)
}

fn parse_env_or(name: &str, default: u64) -> Result<u64, ConfigError> {
    match env::var(name) {
        Ok(value) => value.parse().map_err(|_| ConfigError::InvalidValue {
            name: name.to_string(),
            value,
        }),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pipeline_defaults() {
        let config = PipelineConfig::default();
        assert!(config.strict_input);
        assert_eq!(config.placeholder_image_url, DEFAULT_PLACEHOLDER_IMAGE_URL);
        assert!(config.output_dir.ends_with("chefart"));
        assert_eq!(config.render_timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_parse_flag_ignores_case() {
        for off in ["false", "FALSE", "False", "0", "no", " Off "] {
            assert!(!parse_flag(off), "{}", off);
        }
        for on in ["true", "TRUE", "1", "yes"] {
            assert!(parse_flag(on), "{}", on);
        }
    }

    #[test]
    fn test_blank_placeholder_is_rejected() {
        for blank in ["", "   "] {
            match parse_placeholder_url(blank.to_string()) {
                Err(ConfigError::InvalidValue { name, .. }) => {
                    assert_eq!(name, "CHEFART_PLACEHOLDER_IMAGE_URL")
                }
                other => panic!("expected InvalidValue, got {:?}", other),
            }
        }
        assert_eq!(
            parse_placeholder_url("https://example.com/dish.jpg".to_string()).unwrap(),
            "https://example.com/dish.jpg"
        );
    }

    #[test]
    fn test_parse_env_or_default() {
        let value = parse_env_or("CHEFART_TEST_UNSET_VARIABLE", 42).unwrap();
        assert_eq!(value, 42);
    }
}
