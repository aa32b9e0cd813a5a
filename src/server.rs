use std::net::SocketAddr;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use eyre::{Result, WrapErr};
use log::{info, warn};
use serde::Serialize;
use serde_json::Value;

use crate::AnalysisResponse;
use crate::analyze::{self, AnalyzeError, AnalyzeRequest};
use crate::youtube::YouTubeClient;

pub const ANALYZE_PATH: &str = "/analyze_social_video";

#[derive(Clone)]
pub struct AppState {
    pub youtube: YouTubeClient,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

impl IntoResponse for AnalyzeError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorResponse { error: self.to_string() };
        (status, Json(body)).into_response()
    }
}

/// HTTP front end serving `POST /analyze_social_video`
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route(ANALYZE_PATH, post(analyze_social_video).fallback(method_not_allowed))
        .fallback(fallback)
        .with_state(state)
}

async fn analyze_social_video(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<AnalysisResponse>, AnalyzeError> {
    let body: Value = serde_json::from_slice(&body).map_err(|e| {
        info!("Rejected request body: {e}");
        AnalyzeError::InvalidBody
    })?;
    let request = AnalyzeRequest::from(&body);

    match analyze::analyze(&state.youtube, &request).await {
        Ok(resp) => {
            info!(
                "Analyzed {} (transcript: {})",
                resp.video_id, resp.transcript.kind
            );
            Ok(Json(resp))
        }
        Err(AnalyzeError::Upstream(detail)) => {
            warn!("Malformed upstream response: {detail}");
            Err(AnalyzeError::Upstream(detail))
        }
        Err(e) => {
            info!("Request failed with {}: {e}", e.status_code());
            Err(e)
        }
    }
}

async fn method_not_allowed() -> Response {
    (StatusCode::METHOD_NOT_ALLOWED, "Method Not Allowed").into_response()
}

/// Non-POST requests are refused before the path is looked at
async fn fallback(method: Method) -> Response {
    if method == Method::POST {
        (StatusCode::NOT_FOUND, "Not Found").into_response()
    } else {
        method_not_allowed().await
    }
}

pub async fn serve(addr: SocketAddr, state: AppState) -> Result<()> {
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .wrap_err_with(|| format!("failed to bind {addr}"))?;
    info!("Listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .wrap_err("server error")?;

    info!("Server shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    info!("Received shutdown signal");
}
