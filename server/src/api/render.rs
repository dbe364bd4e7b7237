use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chefart_core::poster::{render_poster, PosterOptions};
use chefart_core::{EnrichedRecipe, FormatSpec, StylePreset};
use serde::Deserialize;
use utoipa::{OpenApi, ToSchema};

use crate::api::types::EnrichedRecipeBody;
use crate::api::{api_error, ErrorResponse};
use crate::AppState;

const MAX_VARIANT_ID_LEN: usize = 16;

/// Request to render an already-enriched recipe as poster markup.
#[derive(Debug, Deserialize, ToSchema)]
pub struct RenderRequest {
    pub recipe: EnrichedRecipeBody,
    /// Style label, e.g. "Modern Bento". Unknown labels use the default style.
    #[serde(default)]
    pub style: Option<String>,
    /// Format label, e.g. "Square Post (1:1)".
    #[serde(default)]
    pub format: Option<String>,
    /// Short alphanumeric id used in the element id and QR payload.
    #[serde(default)]
    pub variant_id: Option<String>,
    /// Hero image URL. Defaults to the configured placeholder.
    #[serde(default)]
    pub image_url: Option<String>,
}

fn valid_variant_id(id: &str) -> bool {
    !id.is_empty() && id.len() <= MAX_VARIANT_ID_LEN && id.chars().all(|c| c.is_ascii_alphanumeric())
}

/// Render poster markup
///
/// Produces the self-contained HTML document for one poster. No AI calls and
/// no rasterization.
#[utoipa::path(
    post,
    path = "/api/render",
    tag = "render",
    request_body = RenderRequest,
    responses(
        (status = 200, description = "Poster markup", body = String, content_type = "text/html"),
        (status = 400, description = "Invalid variant id", body = ErrorResponse),
        (status = 422, description = "Recipe is missing required content", body = ErrorResponse)
    )
)]
pub async fn render(
    State(state): State<AppState>,
    Json(request): Json<RenderRequest>,
) -> Response {
    let variant_id = request.variant_id.as_deref().unwrap_or("A");
    if !valid_variant_id(variant_id) {
        return api_error(
            StatusCode::BAD_REQUEST,
            "variant_id must be 1-16 letters or digits".to_string(),
        );
    }

    let style = request
        .style
        .as_deref()
        .map_or(StylePreset::DEFAULT, StylePreset::from_label);
    let format = request
        .format
        .as_deref()
        .map_or(FormatSpec::DEFAULT, FormatSpec::from_label);
    let image_url = request
        .image_url
        .as_deref()
        .filter(|u| !u.trim().is_empty())
        .unwrap_or(&state.config.placeholder_image_url);

    let recipe = EnrichedRecipe::from(request.recipe);
    let options = PosterOptions {
        style,
        format,
        variant_id,
        image_url,
        qr: &state.config.qr,
    };

    match render_poster(&recipe, &options) {
        Ok(document) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/html; charset=utf-8")],
            document.html,
        )
            .into_response(),
        Err(e) => api_error(StatusCode::UNPROCESSABLE_ENTITY, e.to_string()),
    }
}

#[derive(OpenApi)]
#[openapi(paths(render), components(schemas(RenderRequest)))]
pub struct ApiDoc;
