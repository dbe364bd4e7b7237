//! End-to-end pipeline tests with fake services.
//!
//! Nothing here touches the network or launches a browser.

use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chefart_core::ai::{AiError, FakeAiClient, SAMPLE_ENRICHED_RECIPE};
use chefart_core::image_gen::{ImageGenError, ImageGenerator};
use chefart_core::pipeline::{artifact_path, generate_posters, GenerateRequest, Services};
use chefart_core::{
    FormatSpec, PipelineConfig, PipelineError, PosterDocument, RasterError, Rasterizer,
    RecipeInput, StylePreset,
};
use image::{ImageBuffer, ImageFormat, Rgb};

/// Writes a blank PNG of the poster's dimensions.
#[derive(Default)]
struct BlankRasterizer {
    calls: AtomicUsize,
}

#[async_trait]
impl Rasterizer for BlankRasterizer {
    async fn rasterize(&self, document: &PosterDocument, dest: &Path) -> Result<(), RasterError> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        let (width, height) = document.format.dimensions();
        let img: ImageBuffer<Rgb<u8>, Vec<u8>> = ImageBuffer::new(width, height);
        let mut buf = Cursor::new(Vec::new());
        img.write_to(&mut buf, ImageFormat::Png).unwrap();

        std::fs::create_dir_all(dest.parent().unwrap()).unwrap();
        std::fs::write(dest, buf.into_inner()).unwrap();
        Ok(())
    }
}

/// Fails like a missing Chrome binary.
struct BrokenRasterizer;

#[async_trait]
impl Rasterizer for BrokenRasterizer {
    async fn rasterize(&self, _document: &PosterDocument, _dest: &Path) -> Result<(), RasterError> {
        Err(RasterError::Unavailable(
            "Failed to launch browser: no chrome".to_string(),
        ))
    }
}

struct QuotaExceededGenerator;

#[async_trait]
impl ImageGenerator for QuotaExceededGenerator {
    async fn generate(&self, _prompt: &str) -> Result<String, ImageGenError> {
        Err(ImageGenError::ApiError {
            status: 429,
            message: "quota exceeded".to_string(),
        })
    }
}

struct FixedGenerator;

#[async_trait]
impl ImageGenerator for FixedGenerator {
    async fn generate(&self, _prompt: &str) -> Result<String, ImageGenError> {
        Ok("https://images.example/fried-egg.png".to_string())
    }
}

fn test_config() -> PipelineConfig {
    PipelineConfig {
        output_dir: std::env::temp_dir().join(format!("chefart-test-{}", uuid::Uuid::new_v4())),
        placeholder_image_url: "https://example.com/placeholder.jpg".to_string(),
        ..PipelineConfig::default()
    }
}

fn fried_egg(style: StylePreset, generate_image: bool) -> GenerateRequest {
    GenerateRequest {
        input: RecipeInput::new("Fried Egg", "egg, salt", "beat egg, fry", ""),
        style,
        format: FormatSpec::from_label("Square Post (1:1)"),
        generate_image,
    }
}

fn services(
    ai: FakeAiClient,
    images: Option<Arc<dyn ImageGenerator>>,
    rasterizer: Arc<dyn Rasterizer>,
) -> Services {
    Services {
        ai: Arc::new(ai),
        images,
        rasterizer,
    }
}

/// Visible text of the first list after `marker`, tags stripped.
fn list_text(html: &str, marker: &str) -> String {
    let start = html.find(marker).unwrap();
    let list_start = start + html[start..].find("<ul>").unwrap();
    let list_end = list_start + html[list_start..].find("</ul>").unwrap();

    let mut text = String::new();
    let mut in_tag = false;
    for c in html[list_start..list_end].chars() {
        match c {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => text.push(c),
            _ => {}
        }
    }
    text
}

#[tokio::test]
async fn test_fried_egg_produces_two_matching_posters() {
    let config = test_config();
    let rasterizer = Arc::new(BlankRasterizer::default());
    let services = services(
        FakeAiClient::with_recipe_response(),
        Some(Arc::new(FixedGenerator)),
        rasterizer.clone(),
    );

    let generation = generate_posters(
        &services,
        &config,
        fried_egg(StylePreset::from_label("Modern Bento"), true),
    )
    .await
    .unwrap();

    assert_eq!(generation.recipe.title, "Crispy Fried Egg");
    assert!(generation.recipe.ingredients.len() >= 2);
    assert!(generation.recipe.steps.len() >= 2);
    assert_eq!(generation.image_url, "https://images.example/fried-egg.png");
    assert_eq!(generation.variants.len(), 2);
    assert_eq!(rasterizer.calls.load(Ordering::Relaxed), 2);

    let a = &generation.variants[0].document;
    let b = &generation.variants[1].document;
    assert_eq!(a.style, StylePreset::ModernBento);
    assert_eq!(b.style, StylePreset::NeonPopArt);
    assert_eq!(a.format, FormatSpec::SquarePost);

    let expected_items = generation.recipe.ingredients.len() + generation.recipe.steps.len();
    for doc in [a, b] {
        assert!(doc.html.contains("Crispy Fried Egg"));
        assert_eq!(doc.html.matches("<li>").count(), expected_items);
    }

    // Styles differ, recipe content does not
    assert_ne!(a.html, b.html);
    let ingredients = list_text(&a.html, "class=\"card ingredients\"");
    assert!(ingredients.contains("2 eggs"));
    assert_eq!(ingredients, list_text(&b.html, "class=\"card ingredients\""));
    let steps = list_text(&a.html, "class=\"card steps\"");
    assert!(steps.contains("Crack the eggs"));
    assert_eq!(steps, list_text(&b.html, "class=\"card steps\""));

    for outcome in &generation.variants {
        let png: &PathBuf = outcome.png.as_ref().unwrap();
        let expected = artifact_path(
            &config.output_dir,
            &generation.job_id.to_string(),
            &outcome.document.variant_id,
        )
        .unwrap();
        assert_eq!(png, &expected);
        assert!(png.exists());
    }

    std::fs::remove_dir_all(&config.output_dir).unwrap();
}

#[tokio::test]
async fn test_image_failure_uses_placeholder() {
    let config = test_config();
    let services = services(
        FakeAiClient::with_recipe_response(),
        Some(Arc::new(QuotaExceededGenerator)),
        Arc::new(BlankRasterizer::default()),
    );

    let generation = generate_posters(&services, &config, fried_egg(StylePreset::NeonPopArt, true))
        .await
        .unwrap();

    assert_eq!(generation.image_url, config.placeholder_image_url);
    for outcome in &generation.variants {
        assert!(outcome
            .document
            .html
            .contains("src=\"https://example.com/placeholder.jpg\""));
    }

    let _ = std::fs::remove_dir_all(&config.output_dir);
}

#[tokio::test]
async fn test_image_toggle_off_skips_generation() {
    let config = test_config();
    let services = services(
        FakeAiClient::with_recipe_response(),
        Some(Arc::new(FixedGenerator)),
        Arc::new(BlankRasterizer::default()),
    );

    let generation = generate_posters(&services, &config, fried_egg(StylePreset::ModernBento, false))
        .await
        .unwrap();

    assert_eq!(generation.image_url, config.placeholder_image_url);
    let _ = std::fs::remove_dir_all(&config.output_dir);
}

#[tokio::test]
async fn test_unparseable_enrichment_renders_nothing() {
    let config = test_config();
    let rasterizer = Arc::new(BlankRasterizer::default());
    let services = services(
        FakeAiClient::new().with_default_response("I'm sorry, I can't help with that."),
        None,
        rasterizer.clone(),
    );

    let err = generate_posters(&services, &config, fried_egg(StylePreset::ModernBento, true))
        .await
        .unwrap_err();

    assert!(matches!(err, PipelineError::Enrichment(AiError::DataFormat(_))));
    assert!(err.is_data_format());
    assert_eq!(rasterizer.calls.load(Ordering::Relaxed), 0);
    assert!(!config.output_dir.exists());
}

#[tokio::test]
async fn test_strict_input_rejected_before_enrichment() {
    let config = test_config();
    let ai = Arc::new(FakeAiClient::with_recipe_response());
    let services = Services {
        ai: ai.clone(),
        images: None,
        rasterizer: Arc::new(BlankRasterizer::default()),
    };

    let mut request = fried_egg(StylePreset::ModernBento, false);
    request.input.ingredients = "   ".to_string();

    let err = generate_posters(&services, &config, request.clone())
        .await
        .unwrap_err();
    assert!(matches!(err, PipelineError::InvalidInput(_)));
    assert_eq!(ai.call_count(), 0);

    // Lenient mode passes the input through
    let lenient = PipelineConfig {
        strict_input: false,
        ..config.clone()
    };
    generate_posters(&services, &lenient, request).await.unwrap();
    assert_eq!(ai.call_count(), 1);

    let _ = std::fs::remove_dir_all(&config.output_dir);
}

#[tokio::test]
async fn test_rasterizer_failure_reported_per_variant() {
    let config = test_config();
    let services = services(
        FakeAiClient::with_response("food scientist", SAMPLE_ENRICHED_RECIPE),
        None,
        Arc::new(BrokenRasterizer),
    );

    let generation = generate_posters(&services, &config, fried_egg(StylePreset::ModernBento, true))
        .await
        .unwrap();

    assert_eq!(generation.variants.len(), 2);
    for outcome in &generation.variants {
        assert!(matches!(outcome.png, Err(RasterError::Unavailable(_))));
        // Markup is still available for preview
        assert!(outcome.document.html.contains("Crispy Fried Egg"));
    }
}
