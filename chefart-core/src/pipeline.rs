//! End-to-end generation: validate → enrich → image → render → rasterize.
//!
//! One submission produces one [`EnrichedRecipe`] and two posters that differ
//! only by style. Service handles are passed in through [`Services`].

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, SystemTime};

use thiserror::Error;
use uuid::Uuid;

use crate::ai::{client_from_config, enrich_recipe, AiClient, AiError};
use crate::config::{AiConfig, PipelineConfig, ProviderKind};
use crate::image_gen::{resolve_image_url, ImageGenError, ImageGenerator, OpenAiImageGenerator};
use crate::poster::{render_poster, PosterDocument, PosterError, PosterOptions, QrConfig};
use crate::raster::{ChromeRasterizer, RasterError, Rasterizer};
use crate::recipe::{EnrichedRecipe, InputError, RecipeInput};
use crate::style::{FormatSpec, StylePreset};

/// Variant ids, in display order. "A" uses the chosen style, "B" the comparison style.
pub const VARIANT_IDS: [&str; 2] = ["A", "B"];

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    InvalidInput(#[from] InputError),

    #[error(transparent)]
    Enrichment(#[from] AiError),

    #[error(transparent)]
    Poster(#[from] PosterError),

    #[error("Failed to set up image generation: {0}")]
    ImageSetup(#[from] ImageGenError),
}

impl PipelineError {
    /// True when the enrichment service answered with unusable data.
    pub fn is_data_format(&self) -> bool {
        matches!(
            self,
            PipelineError::Enrichment(AiError::DataFormat(_) | AiError::MissingField(_))
                | PipelineError::Poster(_)
        )
    }
}

/// External service handles used by one pipeline run.
#[derive(Clone)]
pub struct Services {
    pub ai: Arc<dyn AiClient>,
    /// `None` disables image generation entirely.
    pub images: Option<Arc<dyn ImageGenerator>>,
    pub rasterizer: Arc<dyn Rasterizer>,
}

impl Services {
    /// Build the real services for `ai_config`. The fake provider gets no
    /// image generator.
    pub fn from_config(
        ai_config: &AiConfig,
        pipeline: &PipelineConfig,
    ) -> Result<Self, PipelineError> {
        let images: Option<Arc<dyn ImageGenerator>> = match ai_config.provider {
            ProviderKind::OpenAi => Some(Arc::new(OpenAiImageGenerator::new(ai_config)?)),
            ProviderKind::Fake => None,
        };

        Ok(Self {
            ai: client_from_config(ai_config)?,
            images,
            rasterizer: Arc::new(ChromeRasterizer::new(pipeline.render_timeout)),
        })
    }
}

/// One user submission.
#[derive(Debug, Clone)]
pub struct GenerateRequest {
    pub input: RecipeInput,
    pub style: StylePreset,
    pub format: FormatSpec,
    pub generate_image: bool,
}

/// A rendered variant and the result of rasterizing it.
#[derive(Debug)]
pub struct VariantOutcome {
    pub document: PosterDocument,
    pub png: Result<PathBuf, RasterError>,
}

/// Result of a successful pipeline run.
#[derive(Debug)]
pub struct Generation {
    pub job_id: Uuid,
    pub recipe: EnrichedRecipe,
    pub image_url: String,
    pub variants: Vec<VariantOutcome>,
}

/// Run the whole pipeline for one submission.
///
/// Invalid input and unusable enrichment abort the run. Image generation
/// failures fall back to the placeholder image; rasterization failures are
/// reported per variant in [`VariantOutcome::png`].
pub async fn generate_posters(
    services: &Services,
    config: &PipelineConfig,
    request: GenerateRequest,
) -> Result<Generation, PipelineError> {
    if config.strict_input {
        request.input.validate()?;
    }

    let recipe = enrich_recipe(services.ai.as_ref(), &request.input).await?;

    let image_url = if request.generate_image {
        resolve_image_url(
            services.images.as_deref(),
            recipe.image_prompt.as_deref(),
            &config.placeholder_image_url,
        )
        .await
    } else {
        config.placeholder_image_url.clone()
    };

    let documents = render_variants(&recipe, request.style, request.format, &image_url, &config.qr)?;

    let job_id = Uuid::new_v4();
    let job_dir = config.output_dir.join(job_id.to_string());
    tracing::info!(%job_id, style = %request.style, format = %request.format, "Rasterizing posters");

    let [first, second] = documents;
    let (first_png, second_png) = tokio::join!(
        rasterize_variant(services.rasterizer.as_ref(), &first, &job_dir),
        rasterize_variant(services.rasterizer.as_ref(), &second, &job_dir),
    );

    Ok(Generation {
        job_id,
        recipe,
        image_url,
        variants: vec![
            VariantOutcome {
                document: first,
                png: first_png,
            },
            VariantOutcome {
                document: second,
                png: second_png,
            },
        ],
    })
}

/// Render both variants: "A" in `style`, "B" in its comparison style.
pub fn render_variants(
    recipe: &EnrichedRecipe,
    style: StylePreset,
    format: FormatSpec,
    image_url: &str,
    qr: &QrConfig,
) -> Result<[PosterDocument; 2], PosterError> {
    let styles = [style, style.comparison_alternative()];
    let render = |i: usize| {
        render_poster(
            recipe,
            &PosterOptions {
                style: styles[i],
                format,
                variant_id: VARIANT_IDS[i],
                image_url,
                qr,
            },
        )
    };
    Ok([render(0)?, render(1)?])
}

async fn rasterize_variant(
    rasterizer: &dyn Rasterizer,
    document: &PosterDocument,
    job_dir: &Path,
) -> Result<PathBuf, RasterError> {
    let dest = job_dir.join(artifact_file_name(&document.variant_id));
    match rasterizer.rasterize(document, &dest).await {
        Ok(()) => Ok(dest),
        Err(e) => {
            tracing::warn!(variant = %document.variant_id, error = %e, "Rasterization failed");
            Err(e)
        }
    }
}

fn artifact_file_name(variant_id: &str) -> String {
    format!("option_{}.png", variant_id.to_ascii_lowercase())
}

/// File name offered to the user when downloading a variant.
pub fn download_file_name(variant_id: &str) -> String {
    format!("Option_{}.png", variant_id)
}

/// Path of a variant's PNG, or `None` if the ids are not ones this pipeline
/// produces. Keeps request-supplied ids from escaping `output_dir`.
pub fn artifact_path(output_dir: &Path, job_id: &str, variant_id: &str) -> Option<PathBuf> {
    let job_id = Uuid::parse_str(job_id).ok()?;
    let variant_id = VARIANT_IDS
        .iter()
        .find(|v| v.eq_ignore_ascii_case(variant_id))?;
    Some(
        output_dir
            .join(job_id.to_string())
            .join(artifact_file_name(variant_id)),
    )
}

/// Delete job directories older than `max_age`. Returns how many were removed.
pub fn prune_jobs(output_dir: &Path, max_age: Duration) -> usize {
    let Ok(entries) = std::fs::read_dir(output_dir) else {
        return 0;
    };
    let now = SystemTime::now();

    entries
        .filter_map(|e| e.ok())
        .filter(|e| Uuid::parse_str(&e.file_name().to_string_lossy()).is_ok())
        .filter(|e| {
            e.metadata()
                .and_then(|m| m.modified())
                .ok()
                .and_then(|modified| now.duration_since(modified).ok())
                .is_some_and(|age| age > max_age)
        })
        .filter(|e| match std::fs::remove_dir_all(e.path()) {
            Ok(()) => true,
            Err(err) => {
                tracing::warn!(path = %e.path().display(), error = %err, "Failed to prune job");
                false
            }
        })
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_artifact_path_accepts_known_ids() {
        let job = Uuid::new_v4().to_string();
        let path = artifact_path(Path::new("/tmp/chefart"), &job, "a").unwrap();
        assert_eq!(
            path,
            Path::new("/tmp/chefart").join(&job).join("option_a.png")
        );
    }

    #[test]
    fn test_artifact_path_rejects_traversal() {
        let job = Uuid::new_v4().to_string();
        assert!(artifact_path(Path::new("/tmp"), "../etc", "A").is_none());
        assert!(artifact_path(Path::new("/tmp"), &job, "../../passwd").is_none());
        assert!(artifact_path(Path::new("/tmp"), &job, "C").is_none());
    }

    #[test]
    fn test_download_file_name() {
        assert_eq!(download_file_name("B"), "Option_B.png");
    }

    #[test]
    fn test_prune_missing_dir() {
        let dir = std::env::temp_dir().join(format!("chefart-prune-{}", Uuid::new_v4()));
        assert_eq!(prune_jobs(&dir, Duration::from_secs(0)), 0);
    }

    #[test]
    fn test_prune_removes_only_job_dirs() {
        let dir = std::env::temp_dir().join(format!("chefart-prune-{}", Uuid::new_v4()));
        let job = dir.join(Uuid::new_v4().to_string());
        let other = dir.join("keep-me");
        std::fs::create_dir_all(&job).unwrap();
        std::fs::create_dir_all(&other).unwrap();
        std::thread::sleep(Duration::from_millis(20));

        assert_eq!(prune_jobs(&dir, Duration::from_millis(1)), 1);
        assert!(!job.exists());
        assert!(other.exists());

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_data_format_classification() {
        let err = PipelineError::Enrichment(AiError::DataFormat("bad".to_string()));
        assert!(err.is_data_format());
        let err = PipelineError::Enrichment(AiError::Api("down".to_string()));
        assert!(!err.is_data_format());
        let err = PipelineError::InvalidInput(InputError::MissingField("title"));
        assert!(!err.is_data_format());
    }
}
