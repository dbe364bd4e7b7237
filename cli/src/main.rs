mod generate;
mod render;

use std::path::PathBuf;

use anyhow::Result;
use chefart_core::{FormatSpec, StylePreset};
use clap::{Parser, Subcommand};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[derive(Parser)]
#[command(name = "chefart")]
#[command(about = "ChefArt CLI: turn rough recipes into posters", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Enrich a recipe and render both poster variants to PNG
    Generate {
        /// Dish name
        #[arg(long)]
        title: String,
        /// Ingredients, free text
        #[arg(long)]
        ingredients: String,
        /// Cooking steps, free text
        #[arg(long, default_value = "")]
        steps: String,
        /// Secret tip
        #[arg(long, default_value = "")]
        tip: String,
        /// Style pack label
        #[arg(long, default_value = StylePreset::DEFAULT.label())]
        style: String,
        /// Layout format label
        #[arg(long, default_value = FormatSpec::DEFAULT.label())]
        format: String,
        /// Skip AI image generation and use the placeholder image
        #[arg(long)]
        no_image: bool,
        /// Where to write the posters (default: CHEFART_OUTPUT_DIR)
        #[arg(long, env = "CHEFART_OUTPUT_DIR")]
        out_dir: Option<PathBuf>,
    },
    /// Render an already-enriched recipe JSON file as one poster
    Render {
        /// Enriched recipe JSON (judul, bahan_detail, langkah, ...)
        #[arg(long)]
        recipe: PathBuf,
        /// Output path. A `.html` extension writes markup only.
        #[arg(long, short)]
        output: PathBuf,
        /// Style pack label
        #[arg(long, default_value = StylePreset::DEFAULT.label())]
        style: String,
        /// Layout format label
        #[arg(long, default_value = FormatSpec::DEFAULT.label())]
        format: String,
        /// Variant id shown in the QR payload
        #[arg(long, default_value = "A")]
        variant: String,
        /// Hero image URL (default: the placeholder image)
        #[arg(long)]
        image_url: Option<String>,
    },
    /// List style packs and layout formats
    Styles,
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Generate {
            title,
            ingredients,
            steps,
            tip,
            style,
            format,
            no_image,
            out_dir,
        } => {
            generate::generate(generate::GenerateArgs {
                title,
                ingredients,
                steps,
                tip,
                style,
                format,
                generate_image: !no_image,
                out_dir,
            })
            .await?;
        }
        Commands::Render {
            recipe,
            output,
            style,
            format,
            variant,
            image_url,
        } => {
            render::render(render::RenderArgs {
                recipe,
                output,
                style,
                format,
                variant,
                image_url,
            })
            .await?;
        }
        Commands::Styles => list_styles(),
    }

    Ok(())
}

fn list_styles() {
    println!("Styles:");
    for style in StylePreset::ALL {
        let marker = if style == StylePreset::DEFAULT { " (default)" } else { "" };
        println!("  {}{}", style.label(), marker);
    }
    println!("Formats:");
    for format in FormatSpec::ALL {
        let (width, height) = format.dimensions();
        let marker = if format == FormatSpec::DEFAULT { " (default)" } else { "" };
        println!("  {} {}x{}{}", format.label(), width, height, marker);
    }
}
