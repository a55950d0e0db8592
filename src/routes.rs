//! HTTP surface: router, request handlers, and multipart extraction.

use crate::app::App;
use crate::models::GenerateResponse;
use crate::upload::StoredUpload;
use crate::{Error, Result};
use axum::extract::{DefaultBodyLimit, Multipart, State};
use axum::response::Html;
use axum::routing::{get, post};
use axum::{Json, Router};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

/// 16 MiB cap on request bodies, matching the original upload limit.
const MAX_BODY_BYTES: usize = 16 * 1024 * 1024;

#[derive(Clone)]
pub struct AppState {
    pub app: Arc<App>,
}

pub fn router(app: Arc<App>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/healthz", get(healthz))
        .route("/generate", post(generate))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(AppState { app })
}

async fn index() -> Html<&'static str> {
    Html(include_str!("../templates/index.html"))
}

async fn healthz(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "configured": state.app.is_configured(),
    }))
}

async fn generate(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<GenerateResponse>> {
    // Fail fast before touching the filesystem.
    state.app.ensure_configured()?;

    let form = read_generate_form(multipart).await?;
    tracing::info!(
        "Generate request: {} byte image ({}), {} char dream",
        form.image.len(),
        form.filename,
        form.dream.len()
    );

    let upload = StoredUpload::persist(state.app.upload_dir(), &form.filename, &form.image).await?;
    let capsule = state.app.generate(&upload, &form.dream).await?;

    Ok(Json(GenerateResponse::from(capsule)))
}

struct GenerateForm {
    filename: String,
    image: Vec<u8>,
    dream: String,
}

async fn read_generate_form(mut multipart: Multipart) -> Result<GenerateForm> {
    let mut image: Option<(String, Vec<u8>)> = None;
    let mut dream: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| Error::InvalidInput(format!("Malformed multipart request: {}", e)))?
    {
        let field_name = field.name().unwrap_or("").to_string();
        match field_name.as_str() {
            "image" => {
                let filename = field
                    .file_name()
                    .map(str::to_string)
                    .filter(|name| !name.is_empty())
                    .ok_or_else(|| Error::InvalidInput("No image file selected".to_string()))?;
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| Error::InvalidInput(format!("Failed to read image field: {}", e)))?;
                image = Some((filename, bytes.to_vec()));
            }
            "dream" => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| Error::InvalidInput(format!("Failed to read dream field: {}", e)))?;
                dream = Some(text);
            }
            _ => {}
        }
    }

    let (filename, image) =
        image.ok_or_else(|| Error::InvalidInput("No image file provided".to_string()))?;

    let dream = dream
        .map(|d| d.trim().to_string())
        .filter(|d| !d.is_empty())
        .ok_or_else(|| Error::InvalidInput("Dream text is required".to_string()))?;

    Ok(GenerateForm {
        filename,
        image,
        dream,
    })
}
