//! Prompt asking the model to complete and structure a rough recipe.

use crate::recipe::RecipeInput;

/// Prompt name used to label requests.
pub const ENRICH_RECIPE_PROMPT_NAME: &str = "enrich_recipe";

/// Render the enrichment prompt.
///
/// The user's fields are embedded verbatim; the schema field names are the
/// contract [`crate::recipe::EnrichedRecipe`] deserializes.
pub fn render_enrich_recipe_prompt(input: &RecipeInput) -> String {
    format!(
        r#"You are a food scientist and senior graphic designer. Analyze this recipe. The fields may be fragmentary or in any language.

Title: {title}
Ingredients: {ingredients}
Steps: {steps}
Secret tip: {tip}

Tasks:
1. Complete the recipe and polish the wording. Keep the language the user wrote in.
2. Estimate the nutrition per serving (calories, protein, carbohydrate, fat).
3. Pick a Font Awesome 6 solid icon that fits each ingredient (for example "fa-egg", "fa-fire-burner", "fa-lemon").
4. Write a short prompt for a photographic image of the finished dish.

Return ONLY valid JSON matching this schema. No other text.

{{
  "judul": "string - the refined dish title",
  "deskripsi": "string - one or two sentences describing the dish",
  "bahan_detail": [
    {{"nama": "string - ingredient with quantity", "icon": "string - Font Awesome icon class, e.g. fa-egg"}}
  ],
  "langkah": ["string - one cooking step per entry, in order"],
  "trik": "string - the most useful tip for this recipe",
  "nutrisi": {{
    "kalori": "string - kilocalories per serving, number only",
    "protein": "string - grams of protein, e.g. 12g",
    "karbo": "string - grams of carbohydrate, e.g. 30g",
    "lemak": "string - grams of fat, e.g. 8g"
  }},
  "image_prompt": "string - description of a photograph of the finished dish"
}}"#,
        title = input.title,
        ingredients = input.ingredients,
        steps = input.steps,
        tip = input.tip,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_embeds_fields_verbatim() {
        let input = RecipeInput::new(
            "Telur Dadar Crispy",
            "Telur, tepung beras, {garam}",
            "Kocok telur, goreng kering.",
            "Minyak panas",
        );
        let prompt = render_enrich_recipe_prompt(&input);

        assert!(prompt.contains("Title: Telur Dadar Crispy"));
        assert!(prompt.contains("Ingredients: Telur, tepung beras, {garam}"));
        assert!(prompt.contains("Steps: Kocok telur, goreng kering."));
        assert!(prompt.contains("Secret tip: Minyak panas"));
    }

    #[test]
    fn test_prompt_opens_with_persona() {
        let input = RecipeInput::new("Fried Egg", "egg, salt", "beat egg, fry", "");
        let prompt = render_enrich_recipe_prompt(&input);
        assert!(prompt.starts_with("You are a food scientist and senior graphic designer."));
    }

    #[test]
    fn test_prompt_names_every_schema_field() {
        let prompt = render_enrich_recipe_prompt(&RecipeInput::default());
        for field in [
            "\"judul\"",
            "\"deskripsi\"",
            "\"bahan_detail\"",
            "\"nama\"",
            "\"icon\"",
            "\"langkah\"",
            "\"trik\"",
            "\"nutrisi\"",
            "\"kalori\"",
            "\"protein\"",
            "\"karbo\"",
            "\"lemak\"",
            "\"image_prompt\"",
        ] {
            assert!(prompt.contains(field), "prompt is missing {}", field);
        }
    }
}
