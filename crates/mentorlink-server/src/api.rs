use std::sync::Arc;

use axum::{
    extract::{DefaultBodyLimit, Multipart, Path, State},
    http::{header, Method, StatusCode},
    response::IntoResponse,
    routing::{get, post, put},
    Json, Router,
};
use serde::Serialize;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;
use uuid::Uuid;

use mentorlink_store::{DocumentStore, RatingWriteMode};

use crate::error::ServerError;
use crate::photo_store::PhotoStore;
use crate::{accounts, dashboard, directory};

/// Room for multipart framing on top of the photo itself.
const MULTIPART_OVERHEAD: usize = 64 * 1024;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn DocumentStore>,
    pub photos: Arc<PhotoStore>,
    pub rating_write_mode: RatingWriteMode,
}

impl AppState {
    pub fn store(&self) -> &dyn DocumentStore {
        self.store.as_ref()
    }
}

pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers(Any);

    let body_limit = state.photos.max_size() + MULTIPART_OVERHEAD;

    Router::new()
        .route("/health", get(health_check))
        .route("/accounts", post(accounts::create))
        .route("/accounts/me", get(accounts::me).put(accounts::update_me))
        .route("/photos", post(photo_upload))
        .route("/photos/:id", get(photo_download))
        .route("/mentors", get(directory::list).post(directory::register))
        .route("/mentors/:id", get(directory::show).put(directory::update))
        .route("/mentors/:id/connect", post(directory::connect))
        .route("/mentors/:id/booking", get(directory::booking))
        .route("/mentors/:id/reviews", post(directory::submit_review))
        .route("/dashboard", get(dashboard::overview))
        .route(
            "/dashboard/tasks",
            get(dashboard::list_tasks).post(dashboard::add_task),
        )
        .route("/dashboard/tasks/events", get(dashboard::task_events))
        .route(
            "/dashboard/tasks/:id",
            put(dashboard::edit_task).delete(dashboard::delete_task),
        )
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

#[derive(Serialize)]
struct PhotoUploadResponse {
    id: Uuid,
    url: String,
}

async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

async fn photo_upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<PhotoUploadResponse>), ServerError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ServerError::BadRequest(format!("Multipart error: {}", e)))?
    {
        if field.name() == Some("file") {
            let data = field
                .bytes()
                .await
                .map_err(|e| ServerError::BadRequest(format!("Failed to read field: {}", e)))?;

            let id = state.photos.store_photo(&data).await?;
            info!(id = %id, size = data.len(), "Photo uploaded");

            return Ok((
                StatusCode::CREATED,
                Json(PhotoUploadResponse {
                    id,
                    url: state.photos.download_url(id),
                }),
            ));
        }
    }

    Err(ServerError::BadRequest(
        "Missing 'file' field in multipart form".to_string(),
    ))
}

async fn photo_download(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ServerError> {
    let data = state.photos.get_photo(id).await?;
    Ok(([(header::CONTENT_TYPE, "application/octet-stream")], data))
}

pub async fn serve(state: AppState, addr: std::net::SocketAddr) -> anyhow::Result<()> {
    let app = build_router(state);

    info!(addr = %addr, "Starting HTTP API server");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<std::net::SocketAddr>(),
    )
    .await?;

    Ok(())
}
