//! Poster rendering: enriched recipe + style + format → self-contained HTML.
//!
//! Output depends only on the inputs, so the same recipe and options always
//! produce byte-identical markup. All recipe text goes through maud's escaping.

use maud::{html, Markup, PreEscaped, DOCTYPE};
use thiserror::Error;

use crate::recipe::{EnrichedRecipe, Nutrition};
use crate::style::{FormatSpec, StyleParams, StylePreset};

const FONT_AWESOME_CSS: &str =
    "https://cdnjs.cloudflare.com/ajax/libs/font-awesome/6.4.0/css/all.min.css";

const GOOGLE_FONTS_CSS: &str = "https://fonts.googleapis.com/css2?family=Playfair+Display:wght@700&family=Inter:wght@400;700&family=Indie+Flower&family=Orbitron:wght@700&family=Caveat:wght@700&display=swap";

/// Icon used when the model gave none or gave something unusable.
pub const DEFAULT_ICON: &str = "fa-utensils";

const BASE_CSS: &str = "\
html, body { margin: 0; padding: 0; }
.poster { padding: 20px; box-sizing: border-box; overflow: hidden; position: relative; border: 1px solid #ddd; }
.hero { height: 40%; border-radius: 10px; margin-bottom: 15px; position: relative; overflow: hidden; }
.hero img { width: 100%; height: 100%; object-fit: cover; display: block; }
.hero .fade { position: absolute; bottom: 0; width: 100%; height: 50%; }
.title { margin: 0 0 10px 0; font-size: 24px; text-transform: uppercase; }
.description { margin: 0 0 10px 0; font-size: 11px; opacity: 0.85; }
.columns { display: flex; gap: 15px; height: 45%; }
.card { padding: 10px; border-radius: 8px; overflow: hidden; }
.card .heading { font-size: 12px; font-weight: bold; display: block; margin-bottom: 10px; }
.card ul { list-style: none; margin: 0; padding: 0; }
.ingredients { flex: 1; }
.ingredients li { font-size: 11px; margin-bottom: 5px; }
.ingredients i { width: 20px; }
.steps { flex: 1.5; }
.steps li { font-size: 11px; margin-bottom: 8px; }
.tip { font-size: 10px; font-style: italic; margin: 8px 0 0 0; }
.footer { position: absolute; bottom: 15px; left: 20px; right: 20px; display: flex; justify-content: space-between; align-items: center; }
.nutrition { font-size: 9px; opacity: 0.8; }
.qr { width: 40px; height: 40px; background: white; }
";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PosterError {
    #[error("Recipe is missing required field: {0}")]
    MissingField(&'static str),
}

/// Where the QR code image comes from and what it points to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QrConfig {
    /// QR image service endpoint, queried with `size` and `data`.
    pub service_url: String,
    /// Host used in the encoded `https://<host>/recipe/<variant>` payload.
    pub payload_host: String,
    /// Edge length in pixels requested from the service.
    pub size: u32,
}

impl Default for QrConfig {
    fn default() -> Self {
        Self {
            service_url: "https://api.qrserver.com/v1/create-qr-code/".to_string(),
            payload_host: "chefart.ai".to_string(),
            size: 150,
        }
    }
}

impl QrConfig {
    /// URL the QR code encodes.
    pub fn payload_url(&self, variant_id: &str) -> String {
        format!("https://{}/recipe/{}", self.payload_host, variant_id)
    }

    /// Image URL for the QR code of `variant_id`.
    pub fn image_url(&self, variant_id: &str) -> String {
        let size = format!("{0}x{0}", self.size);
        let payload = self.payload_url(variant_id);
        match url::Url::parse_with_params(
            &self.service_url,
            [("size", size.as_str()), ("data", payload.as_str())],
        ) {
            Ok(url) => url.to_string(),
            Err(e) => {
                tracing::warn!(service_url = %self.service_url, error = %e, "Invalid QR service URL");
                format!("{}?size={}&data={}", self.service_url, size, payload)
            }
        }
    }
}

/// Everything besides the recipe that determines a poster.
#[derive(Debug, Clone, Copy)]
pub struct PosterOptions<'a> {
    pub style: StylePreset,
    pub format: FormatSpec,
    /// Distinguishes posters rendered from the same recipe; seeds the QR payload.
    pub variant_id: &'a str,
    pub image_url: &'a str,
    pub qr: &'a QrConfig,
}

/// Rendered poster markup, ready for preview or rasterization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PosterDocument {
    pub html: String,
    pub style: StylePreset,
    pub format: FormatSpec,
    pub variant_id: String,
}

/// Render `recipe` as a poster.
///
/// Fails fast with [`PosterError::MissingField`] instead of drawing a poster
/// with a blank title or empty lists.
pub fn render_poster(
    recipe: &EnrichedRecipe,
    options: &PosterOptions<'_>,
) -> Result<PosterDocument, PosterError> {
    if recipe.title.trim().is_empty() {
        return Err(PosterError::MissingField("judul"));
    }
    if recipe.ingredients.is_empty() {
        return Err(PosterError::MissingField("bahan_detail"));
    }
    if recipe.steps.is_empty() {
        return Err(PosterError::MissingField("langkah"));
    }

    let s = options.style.params();
    let (width, height) = options.format.dimensions();

    let markup = html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                title { (recipe.title) }
                link rel="stylesheet" href=(FONT_AWESOME_CSS);
                link rel="stylesheet" href=(GOOGLE_FONTS_CSS);
                style { (PreEscaped(BASE_CSS)) }
            }
            body {
                div id={ "poster_" (options.variant_id) } class="poster" style=(format!(
                    "width: {}px; height: {}px; background: {}; color: {}; font-family: {};",
                    width, height, s.background, s.text, s.font_family
                )) {
                    div class="hero" {
                        img src=(options.image_url) alt=(recipe.title);
                        div class="fade" style=(format!(
                            "background: linear-gradient(transparent, {});",
                            s.background
                        )) {}
                    }
                    h2 class="title" style=(format!("color: {};", s.accent)) { (recipe.title) }
                    @if !recipe.description.trim().is_empty() {
                        p class="description" { (recipe.description) }
                    }
                    div class="columns" {
                        (ingredient_card(recipe, &s))
                        (step_card(recipe, &s))
                    }
                    @for tip in recipe.tips.iter().filter(|t| !t.trim().is_empty()) {
                        p class="tip" { "Tip: " (tip) }
                    }
                    div class="footer" {
                        div class="nutrition" {
                            @if let Some(summary) = recipe.nutrition.as_ref().and_then(nutrition_summary) {
                                (summary)
                            }
                        }
                        img class="qr" src=(options.qr.image_url(options.variant_id))
                            alt="QR code"
                            style=(format!("border: 2px solid {};", s.accent));
                    }
                }
            }
        }
    };

    Ok(PosterDocument {
        html: markup.into_string(),
        style: options.style,
        format: options.format,
        variant_id: options.variant_id.to_string(),
    })
}

fn ingredient_card(recipe: &EnrichedRecipe, s: &StyleParams) -> Markup {
    html! {
        div class="card ingredients" style=(s.card) {
            span class="heading" style=(format!("color: {};", s.accent)) { "INGREDIENTS" }
            ul {
                @for item in &recipe.ingredients {
                    li {
                        i class={ "fa-solid " (icon_class(item.icon.as_deref())) }
                            style=(format!("color: {};", s.accent)) {}
                        " " (item.name)
                    }
                }
            }
        }
    }
}

fn step_card(recipe: &EnrichedRecipe, s: &StyleParams) -> Markup {
    html! {
        div class="card steps" style=(s.card) {
            span class="heading" style=(format!("color: {};", s.accent)) { "STEPS" }
            ul {
                @for (i, step) in recipe.steps.iter().enumerate() {
                    li { b { (i + 1) "." } " " (step) }
                }
            }
        }
    }
}

/// Normalize a model-supplied icon to a single Font Awesome class name.
///
/// Accepts "fa-egg", "egg" or "fa-solid fa-egg"; anything else becomes
/// [`DEFAULT_ICON`].
pub fn icon_class(icon: Option<&str>) -> String {
    let Some(name) = icon.and_then(|i| i.split_whitespace().last()) else {
        return DEFAULT_ICON.to_string();
    };

    let name = name.to_ascii_lowercase();
    let valid = !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-');

    match (valid, name.starts_with("fa-")) {
        (false, _) => DEFAULT_ICON.to_string(),
        (true, true) if name.len() > 3 => name,
        (true, true) => DEFAULT_ICON.to_string(),
        (true, false) => format!("fa-{}", name),
    }
}

/// One-line footer summary, or `None` when every field is blank.
pub fn nutrition_summary(nutrition: &Nutrition) -> Option<String> {
    let calories = nutrition.calories.trim();
    let calories = if !calories.is_empty()
        && calories.chars().all(|c| c.is_ascii_digit() || c == '.')
    {
        format!("{} kcal", calories)
    } else {
        calories.to_string()
    };

    let parts: Vec<String> = [
        ("🔥 ", calories.as_str()),
        ("💪 P: ", nutrition.protein.trim()),
        ("🍞 C: ", nutrition.carbohydrate.trim()),
        ("🧈 F: ", nutrition.fat.trim()),
    ]
    .into_iter()
    .filter(|(_, value)| !value.is_empty())
    .map(|(label, value)| format!("{}{}", label, value))
    .collect();

    if parts.is_empty() {
        None
    } else {
        Some(parts.join(" | "))
    }
}
