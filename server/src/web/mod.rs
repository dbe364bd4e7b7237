//! Form-based web UI: submit a recipe, compare two posters, download PNGs.

mod pages;

use std::time::Duration;

use axum::{
    body::Body,
    extract::{Path, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Form, Router,
};
use chefart_core::pipeline::{artifact_path, download_file_name, generate_posters, prune_jobs};
use chefart_core::{FormatSpec, GenerateRequest, PipelineError, RecipeInput, StylePreset};
use serde::Deserialize;

use crate::AppState;

/// Job directories older than this are removed on the next submission.
const JOB_RETENTION: Duration = Duration::from_secs(60 * 60);

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(index))
        .route("/generate", post(generate))
        .route("/download/{job_id}/{variant}", get(download))
}

/// Raw form fields. Kept as submitted so the form can be re-rendered.
#[derive(Debug, Clone, Deserialize)]
pub struct GenerateForm {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub ingredients: String,
    #[serde(default)]
    pub steps: String,
    #[serde(default)]
    pub tip: String,
    #[serde(default)]
    pub style: String,
    #[serde(default)]
    pub format: String,
    /// Checkbox: present ("on") when checked.
    #[serde(default)]
    pub generate_image: Option<String>,
}

impl Default for GenerateForm {
    fn default() -> Self {
        Self {
            title: "Crispy Omelette".to_string(),
            ingredients: "Eggs, rice flour, shallots, salt".to_string(),
            steps: "Beat the eggs with the seasoning, fry until crisp.".to_string(),
            tip: "Make sure the oil is really hot".to_string(),
            style: StylePreset::MinimalistLuxury.label().to_string(),
            format: FormatSpec::SquarePost.label().to_string(),
            generate_image: Some("on".to_string()),
        }
    }
}

impl GenerateForm {
    fn to_request(&self) -> GenerateRequest {
        GenerateRequest {
            input: RecipeInput::new(&self.title, &self.ingredients, &self.steps, &self.tip),
            style: StylePreset::from_label(&self.style),
            format: FormatSpec::from_label(&self.format),
            generate_image: self.generate_image.is_some(),
        }
    }
}

async fn index() -> Html<String> {
    Html(pages::form_page(&GenerateForm::default(), None))
}

async fn generate(State(state): State<AppState>, Form(form): Form<GenerateForm>) -> Response {
    let output_dir = state.config.output_dir.clone();
    tokio::task::spawn_blocking(move || {
        let pruned = prune_jobs(&output_dir, JOB_RETENTION);
        if pruned > 0 {
            tracing::debug!(pruned, "Removed old poster jobs");
        }
    });

    match generate_posters(&state.services, &state.config, form.to_request()).await {
        Ok(generation) => Html(pages::result_page(&form, &generation)).into_response(),
        Err(PipelineError::InvalidInput(e)) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Html(pages::form_page(&form, Some(&e.to_string()))),
        )
            .into_response(),
        Err(e) => {
            let status = if e.is_data_format() {
                StatusCode::BAD_GATEWAY
            } else {
                StatusCode::SERVICE_UNAVAILABLE
            };
            tracing::warn!(error = %e, "Poster generation failed");
            let message = format!("Could not generate posters: {}", e);
            (status, Html(pages::form_page(&form, Some(&message)))).into_response()
        }
    }
}

async fn download(
    State(state): State<AppState>,
    Path((job_id, variant)): Path<(String, String)>,
) -> Response {
    let Some(path) = artifact_path(&state.config.output_dir, &job_id, &variant) else {
        return (StatusCode::NOT_FOUND, "Poster not found").into_response();
    };

    let data = match tokio::fs::read(&path).await {
        Ok(data) => data,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return (StatusCode::NOT_FOUND, "Poster not found").into_response()
        }
        Err(e) => {
            tracing::error!(path = %path.display(), error = %e, "Failed to read poster");
            return (StatusCode::INTERNAL_SERVER_ERROR, "Failed to read poster").into_response();
        }
    };

    let disposition = format!(
        "attachment; filename=\"{}\"",
        download_file_name(&variant.to_ascii_uppercase())
    );

    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "image/png".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        Body::from(data),
    )
        .into_response()
}
