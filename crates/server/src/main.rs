use std::{net::SocketAddr, sync::Arc};

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use chrono::Local;
use shared::{
    domain::GenerationResult,
    error::{ApiError, ErrorCode},
    protocol::{GenerationRequest, GENERATE_ROUTE, HEALTH_ROUTE},
};
use tower_http::{limit::RequestBodyLimitLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod api;
mod app_state;
mod catalog;
mod config;
mod keywords;

use api::ApiContext;
use app_state::AppState;
use config::load_settings;

const MAX_REQUEST_BYTES: usize = 256 * 1024;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let settings = load_settings();
    let api = ApiContext::from_settings(&settings);
    info!(
        public_url = %api.public_url,
        media_dir = %api.media_dir.display(),
        max_script_chars = api.max_script_chars,
        "generation backend configured"
    );

    let app = build_router(Arc::new(AppState { api }));

    let addr: SocketAddr = settings.server_bind.parse()?;
    info!(%addr, "server listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route(HEALTH_ROUTE, get(healthz))
        .route(GENERATE_ROUTE, post(generate))
        .route("/media/:folder/:file", get(media))
        .layer(RequestBodyLimitLayer::new(MAX_REQUEST_BYTES))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn healthz() -> &'static str {
    "ok"
}

async fn generate(
    State(state): State<Arc<AppState>>,
    Json(req): Json<GenerationRequest>,
) -> Result<Json<GenerationResult>, (StatusCode, Json<ApiError>)> {
    let result = api::generate(&state.api, &req.text, Local::now())
        .await
        .map_err(|err| {
            warn!(text_len = req.text.len(), error = %err.message, "generation rejected");
            reject(err)
        })?;

    info!(
        text_len = req.text.len(),
        keywords = result.keywords.len(),
        video = %result.result.video.url,
        "generation completed"
    );
    Ok(Json(result))
}

async fn media(
    State(state): State<Arc<AppState>>,
    Path((folder, file)): Path<(String, String)>,
) -> Result<impl IntoResponse, (StatusCode, Json<ApiError>)> {
    let bytes = api::read_media(&state.api, &folder, &file)
        .await
        .map_err(reject)?;
    Ok((
        [(header::CONTENT_TYPE, api::content_type_for(&file))],
        bytes,
    ))
}

fn reject(err: ApiError) -> (StatusCode, Json<ApiError>) {
    let status = match err.code {
        ErrorCode::Validation => StatusCode::UNPROCESSABLE_ENTITY,
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, Json(err))
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
