//! Recipe poster generation.
//!
//! A rough recipe goes through [`ai::enrich_recipe`], gets a header image from
//! [`image_gen`], is rendered by [`poster::render_poster`] in two styles and
//! rasterized by a [`raster::Rasterizer`]. [`pipeline::generate_posters`] runs
//! the whole flow.

pub mod ai;
pub mod config;
pub mod image_gen;
pub mod pipeline;
pub mod poster;
pub mod raster;
pub mod recipe;
pub mod style;

pub use config::{AiConfig, ConfigError, PipelineConfig};
pub use pipeline::{generate_posters, GenerateRequest, Generation, PipelineError, Services};
pub use poster::{render_poster, PosterDocument, PosterError, PosterOptions, QrConfig};
pub use raster::{RasterError, Rasterizer};
pub use recipe::{EnrichedRecipe, IngredientEntry, InputError, Nutrition, RecipeInput};
pub use style::{FormatSpec, StylePreset};

/// Unique identifier for this build, generated at compile time.
pub const BUILD_ID: &str = env!("BUILD_ID");
