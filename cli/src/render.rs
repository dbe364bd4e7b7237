use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use chefart_core::raster::ChromeRasterizer;
use chefart_core::{
    render_poster, EnrichedRecipe, FormatSpec, PipelineConfig, PosterOptions, Rasterizer,
    StylePreset,
};

pub struct RenderArgs {
    pub recipe: PathBuf,
    pub output: PathBuf,
    pub style: String,
    pub format: String,
    pub variant: String,
    pub image_url: Option<String>,
}

pub async fn render(args: RenderArgs) -> Result<()> {
    let config = PipelineConfig::from_env().context("Failed to load pipeline configuration")?;

    let text = fs::read_to_string(&args.recipe)
        .with_context(|| format!("Failed to read recipe file: {}", args.recipe.display()))?;
    let recipe: EnrichedRecipe = serde_json::from_str(&text)
        .with_context(|| format!("Failed to parse recipe file: {}", args.recipe.display()))?;

    let image_url = args
        .image_url
        .unwrap_or_else(|| config.placeholder_image_url.clone());
    let document = render_poster(
        &recipe,
        &PosterOptions {
            style: StylePreset::from_label(&args.style),
            format: FormatSpec::from_label(&args.format),
            variant_id: &args.variant,
            image_url: &image_url,
            qr: &config.qr,
        },
    )?;

    let wants_html = args
        .output
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("html"));

    if wants_html {
        fs::write(&args.output, &document.html)
            .with_context(|| format!("Failed to write {}", args.output.display()))?;
    } else {
        ChromeRasterizer::new(config.render_timeout)
            .rasterize(&document, &args.output)
            .await?;
    }

    println!("{}", args.output.display());
    Ok(())
}
