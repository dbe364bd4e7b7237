//! JSON bodies for the API. These mirror the core types so they can carry
//! OpenAPI schemas.

use chefart_core::recipe::text_or_number;
use chefart_core::{EnrichedRecipe, IngredientEntry, Nutrition, RecipeInput};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Rough recipe as typed by the user.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct RecipeInputBody {
    pub title: String,
    pub ingredients: String,
    #[serde(default)]
    pub steps: String,
    #[serde(default)]
    pub tip: String,
}

impl From<RecipeInputBody> for RecipeInput {
    fn from(body: RecipeInputBody) -> Self {
        RecipeInput::new(body.title, body.ingredients, body.steps, body.tip)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct IngredientBody {
    pub nama: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

/// Nutrition values. Numbers are accepted and kept as text.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct NutritionBody {
    #[serde(default, deserialize_with = "text_or_number")]
    pub kalori: String,
    #[serde(default, deserialize_with = "text_or_number")]
    pub protein: String,
    #[serde(default, deserialize_with = "text_or_number")]
    pub karbo: String,
    #[serde(default, deserialize_with = "text_or_number")]
    pub lemak: String,
}

/// Enriched recipe, using the same field names the enrichment model returns.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct EnrichedRecipeBody {
    pub judul: String,
    #[serde(default)]
    pub deskripsi: String,
    pub bahan_detail: Vec<IngredientBody>,
    pub langkah: Vec<String>,
    #[serde(default)]
    pub trik: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nutrisi: Option<NutritionBody>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_prompt: Option<String>,
}

impl From<EnrichedRecipe> for EnrichedRecipeBody {
    fn from(recipe: EnrichedRecipe) -> Self {
        Self {
            judul: recipe.title,
            deskripsi: recipe.description,
            bahan_detail: recipe
                .ingredients
                .into_iter()
                .map(|i| IngredientBody {
                    nama: i.name,
                    icon: i.icon,
                })
                .collect(),
            langkah: recipe.steps,
            trik: recipe.tips,
            nutrisi: recipe.nutrition.map(|n| NutritionBody {
                kalori: n.calories,
                protein: n.protein,
                karbo: n.carbohydrate,
                lemak: n.fat,
            }),
            image_prompt: recipe.image_prompt,
        }
    }
}

impl From<EnrichedRecipeBody> for EnrichedRecipe {
    fn from(body: EnrichedRecipeBody) -> Self {
        Self {
            title: body.judul,
            description: body.deskripsi,
            ingredients: body
                .bahan_detail
                .into_iter()
                .map(|i| IngredientEntry {
                    name: i.nama,
                    icon: i.icon,
                })
                .collect(),
            steps: body.langkah,
            tips: body.trik,
            nutrition: body.nutrisi.map(|n| Nutrition {
                calories: n.kalori,
                protein: n.protein,
                carbohydrate: n.karbo,
                fat: n.lemak,
            }),
            image_prompt: body.image_prompt,
        }
    }
}
