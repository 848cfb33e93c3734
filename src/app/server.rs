//! HTTP surface: `POST /upload`, health, root redirect and static files.

use crate::core::analyzer::StyleAnalyzer;
use crate::domain::model::StyleAnalysis;
use crate::domain::ports::Storage;
use axum::body::Bytes;
use axum::extract::multipart::MultipartError;
use axum::extract::{DefaultBodyLimit, Multipart, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Redirect, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::Instrument;
use uuid::Uuid;

pub const IMAGE_REQUIRED_MESSAGE: &str =
    "File must be an image. Supported formats include JPEG, PNG, and WebP.";

#[derive(Clone)]
pub struct AppState<S> {
    pub analyzer: Arc<StyleAnalyzer>,
    pub storage: S,
    /// Cancelled on shutdown; in-flight vision calls get a child token.
    pub shutdown: CancellationToken,
}

impl<S> AppState<S> {
    pub fn new(analyzer: Arc<StyleAnalyzer>, storage: S, shutdown: CancellationToken) -> Self {
        Self {
            analyzer,
            storage,
            shutdown,
        }
    }
}

#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    PayloadTooLarge(String),
    Internal(String),
}

impl From<MultipartError> for ApiError {
    fn from(err: MultipartError) -> Self {
        if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
            ApiError::PayloadTooLarge(err.body_text())
        } else {
            ApiError::BadRequest(format!("Multipart error: {}", err.body_text()))
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, detail) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::PayloadTooLarge(msg) => (StatusCode::PAYLOAD_TOO_LARGE, msg),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        (status, Json(serde_json::json!({ "detail": detail }))).into_response()
    }
}

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub success: bool,
    #[serde(flatten)]
    pub analysis: StyleAnalysis,
    pub filename: String,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    status: &'static str,
    model: String,
    credential_configured: bool,
    color_analysis: bool,
}

struct UploadedImage {
    data: Bytes,
    content_type: String,
    file_name: Option<String>,
}

pub fn build_router<S>(state: AppState<S>, static_dir: &str, max_upload_bytes: usize) -> Router
where
    S: Storage + Clone + 'static,
{
    Router::new()
        .route("/", get(root))
        .route("/health", get(health::<S>))
        .route("/upload", post(upload_image::<S>))
        .nest_service("/static", ServeDir::new(static_dir))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn root() -> Redirect {
    Redirect::temporary("/static/index.html")
}

async fn health<S>(State(state): State<AppState<S>>) -> Json<HealthResponse>
where
    S: Storage + Clone + 'static,
{
    Json(HealthResponse {
        status: "ok",
        model: state.analyzer.model_name().to_string(),
        credential_configured: state.analyzer.is_configured(),
        color_analysis: state.analyzer.includes_color_analysis(),
    })
}

/// Accepts multipart/form-data with an image in the `file` field.
///
/// Returns 200 with the analysis whenever the image could be stored, even if
/// the model call failed; 400 for non-image or missing files; 500 when the
/// upload cannot be written.
async fn upload_image<S>(
    State(state): State<AppState<S>>,
    multipart: Multipart,
) -> Result<Json<UploadResponse>, ApiError>
where
    S: Storage + Clone + 'static,
{
    let request_id = Uuid::new_v4();
    let span = tracing::info_span!("upload", %request_id);
    process_upload(state, multipart).instrument(span).await
}

async fn process_upload<S>(
    state: AppState<S>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, ApiError>
where
    S: Storage + Clone + 'static,
{
    let upload = read_image_field(&mut multipart).await?;

    let filename = unique_filename(upload.file_name.as_deref());
    state
        .storage
        .write_file(&filename, &upload.data)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to store upload");
            ApiError::Internal(format!("Error processing image: {}", e))
        })?;

    let cancel = state.shutdown.child_token();
    let analysis = state
        .analyzer
        .analyze_with_cancel(&upload.data, &upload.content_type, &cancel)
        .await;

    tracing::info!(
        filename = %filename,
        status = ?analysis.status(),
        style_title = analysis.style_title(),
        "Upload analysed"
    );

    Ok(Json(UploadResponse {
        success: true,
        analysis,
        filename,
    }))
}

async fn read_image_field(multipart: &mut Multipart) -> Result<UploadedImage, ApiError> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some("file") {
            continue;
        }

        let content_type = field.content_type().unwrap_or_default().to_string();
        if !content_type.starts_with("image/") {
            tracing::warn!(content_type = %content_type, "Rejected non-image upload");
            return Err(ApiError::BadRequest(IMAGE_REQUIRED_MESSAGE.to_string()));
        }

        let file_name = field.file_name().map(str::to_string);
        let data = field.bytes().await?;
        if data.is_empty() {
            return Err(ApiError::BadRequest("Uploaded file is empty".to_string()));
        }

        return Ok(UploadedImage {
            data,
            content_type,
            file_name,
        });
    }

    Err(ApiError::BadRequest(
        "Missing file in multipart form".to_string(),
    ))
}

/// Fresh UUID name that keeps a simple alphanumeric extension when present.
fn unique_filename(original: Option<&str>) -> String {
    let extension = original
        .and_then(|name| Path::new(name).extension())
        .and_then(|ext| ext.to_str())
        .filter(|ext| ext.len() <= 10 && ext.chars().all(|c| c.is_ascii_alphanumeric()));

    match extension {
        Some(ext) => format!("{}.{}", Uuid::new_v4(), ext.to_ascii_lowercase()),
        None => Uuid::new_v4().to_string(),
    }
}
