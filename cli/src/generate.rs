use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use chefart_core::{
    generate_posters, AiConfig, FormatSpec, GenerateRequest, PipelineConfig, RecipeInput,
    Services, StylePreset,
};

pub struct GenerateArgs {
    pub title: String,
    pub ingredients: String,
    pub steps: String,
    pub tip: String,
    pub style: String,
    pub format: String,
    pub generate_image: bool,
    pub out_dir: Option<PathBuf>,
}

pub async fn generate(args: GenerateArgs) -> Result<()> {
    let ai_config = AiConfig::from_env().context("Failed to load AI configuration")?;
    let mut config = PipelineConfig::from_env().context("Failed to load pipeline configuration")?;
    if let Some(out_dir) = args.out_dir {
        config.output_dir = out_dir;
    }
    let services =
        Services::from_config(&ai_config, &config).context("Failed to set up services")?;

    let request = GenerateRequest {
        input: RecipeInput::new(args.title, args.ingredients, args.steps, args.tip),
        style: StylePreset::from_label(&args.style),
        format: FormatSpec::from_label(&args.format),
        generate_image: args.generate_image,
    };

    let generation = generate_posters(&services, &config, request)
        .await
        .context("Poster generation failed")?;

    println!("{}", generation.recipe.title);
    println!("Image: {}", generation.image_url);

    let mut written = 0;
    for outcome in &generation.variants {
        let doc = &outcome.document;
        match &outcome.png {
            Ok(path) => {
                written += 1;
                println!("Option {} ({}): {}", doc.variant_id, doc.style, path.display());
            }
            Err(e) => eprintln!("Option {} ({}): {}", doc.variant_id, doc.style, e),
        }
    }

    if written == 0 {
        bail!("No poster could be rasterized");
    }
    Ok(())
}
