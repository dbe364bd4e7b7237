use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use chefart_core::ai::{enrich_recipe as run_enrichment, AiError};
use chefart_core::RecipeInput;
use utoipa::OpenApi;

use crate::api::types::{EnrichedRecipeBody, IngredientBody, NutritionBody, RecipeInputBody};
use crate::api::{api_error, ErrorResponse};
use crate::AppState;

/// Enrich a rough recipe using AI
///
/// Stateless: returns the structured recipe without rendering anything. The
/// result can be passed to `POST /api/render`.
#[utoipa::path(
    post,
    path = "/api/enrich",
    tag = "enrich",
    request_body = RecipeInputBody,
    responses(
        (status = 200, description = "Enriched recipe", body = EnrichedRecipeBody),
        (status = 422, description = "Title or ingredients missing", body = ErrorResponse),
        (status = 502, description = "AI returned unusable data", body = ErrorResponse),
        (status = 503, description = "AI service unavailable", body = ErrorResponse)
    )
)]
pub async fn enrich_recipe(
    State(state): State<AppState>,
    Json(request): Json<RecipeInputBody>,
) -> impl IntoResponse {
    let input = RecipeInput::from(request);

    if state.config.strict_input {
        if let Err(e) = input.validate() {
            return api_error(StatusCode::UNPROCESSABLE_ENTITY, e.to_string());
        }
    }

    match run_enrichment(state.services.ai.as_ref(), &input).await {
        Ok(recipe) => (StatusCode::OK, Json(EnrichedRecipeBody::from(recipe))).into_response(),
        Err(e @ (AiError::DataFormat(_) | AiError::MissingField(_))) => {
            tracing::warn!(error = %e, "AI returned unusable recipe data");
            api_error(StatusCode::BAD_GATEWAY, e.to_string())
        }
        Err(e) => {
            tracing::warn!(error = %e, "AI call failed");
            api_error(
                StatusCode::SERVICE_UNAVAILABLE,
                format!("AI service error: {}", e),
            )
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(enrich_recipe),
    components(schemas(RecipeInputBody, EnrichedRecipeBody, IngredientBody, NutritionBody))
)]
pub struct ApiDoc;
