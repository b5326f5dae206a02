// HTTP surface - axum router over the extractor and transcoder

pub mod error;
pub mod handlers;

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::downloader::{AudioTranscoder, InfoExtractor, ToolManager};

pub use error::ApiError;

/// Read-only state shared by every request
#[derive(Clone)]
pub struct AppState {
    pub extractor: Arc<dyn InfoExtractor>,
    pub transcoder: Arc<dyn AudioTranscoder>,
    pub tools: Arc<ToolManager>,
}

impl AppState {
    pub fn new(
        extractor: Arc<dyn InfoExtractor>,
        transcoder: Arc<dyn AudioTranscoder>,
        tools: ToolManager,
    ) -> Self {
        Self {
            extractor,
            transcoder,
            tools: Arc::new(tools),
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/health", get(handlers::health))
        .route("/download", post(handlers::download))
        .route("/download_mp3", post(handlers::download_mp3))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Bind `addr` and serve until `shutdown` resolves.
pub async fn run_server<F>(
    addr: SocketAddr,
    state: AppState,
    shutdown: F,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>>
where
    F: Future<Output = ()> + Send + 'static,
{
    tracing::info!(
        "Extractor: {}, transcoder: {}",
        state.extractor.name(),
        state.transcoder.name()
    );
    if !state.transcoder.is_available() {
        tracing::warn!("ffmpeg not found; /download_mp3 will report FFMPEG_MISSING");
    }

    let app = build_router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("HTTP server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;

    tracing::info!("HTTP server stopped");
    Ok(())
}
