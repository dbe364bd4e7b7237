use axum::Json;
use chefart_core::{FormatSpec, StylePreset};
use serde::Serialize;
use utoipa::{OpenApi, ToSchema};

#[derive(Debug, Serialize, ToSchema)]
pub struct FormatInfo {
    pub label: String,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct StylesResponse {
    pub styles: Vec<String>,
    pub default_style: String,
    pub formats: Vec<FormatInfo>,
    pub default_format: String,
}

/// List style presets and layout formats
#[utoipa::path(
    get,
    path = "/api/styles",
    tag = "render",
    responses(
        (status = 200, description = "Available styles and formats", body = StylesResponse)
    )
)]
pub async fn list_styles() -> Json<StylesResponse> {
    Json(StylesResponse {
        styles: StylePreset::ALL
            .iter()
            .map(|s| s.label().to_string())
            .collect(),
        default_style: StylePreset::DEFAULT.label().to_string(),
        formats: FormatSpec::ALL
            .iter()
            .map(|f| {
                let (width, height) = f.dimensions();
                FormatInfo {
                    label: f.label().to_string(),
                    width,
                    height,
                }
            })
            .collect(),
        default_format: FormatSpec::DEFAULT.label().to_string(),
    })
}

#[derive(OpenApi)]
#[openapi(
    paths(list_styles),
    components(schemas(StylesResponse, FormatInfo))
)]
pub struct ApiDoc;
