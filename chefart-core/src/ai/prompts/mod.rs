//! AI prompt templates.

pub mod enrich_recipe;

pub use enrich_recipe::{render_enrich_recipe_prompt, ENRICH_RECIPE_PROMPT_NAME};
