//! Ingestion endpoint
//!
//! `POST /api/posts` lets external writers publish articles straight into
//! the remote store. Requests must carry `Authorization: Bearer <secret>`.
//! Every response body is JSON with a `success` flag.

use std::sync::Arc;

use anyhow::{bail, Context, Result};
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{header, HeaderMap, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use serde_json::json;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use guru_core::ingest::verify_bearer;
use guru_core::{remote, Config, IngestError, IngestRequest, Ingestor};

pub const POSTS_PATH: &str = "/api/posts";

#[derive(Clone)]
pub struct AppState {
    ingestor: Arc<Ingestor>,
    secret: Arc<str>,
}

impl AppState {
    pub fn new(ingestor: Ingestor, secret: &str) -> Self {
        Self {
            ingestor: Arc::new(ingestor),
            secret: Arc::from(secret),
        }
    }
}

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]);

    Router::new()
        .route(
            POSTS_PATH,
            post(create_post)
                .options(preflight)
                .fallback(method_not_allowed),
        )
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Run the endpoint until Ctrl-C
pub async fn serve(config: &Config, bind: Option<String>) -> Result<()> {
    let remote = remote::connect(config);
    if !remote.is_ready() {
        bail!(
            "Remote store is not configured; refusing to accept posts.\n\
             Set firebase_api_key, firebase_project_id and firebase_app_id \
             (or GURU_FIREBASE_API_KEY, GURU_FIREBASE_PROJECT_ID, GURU_FIREBASE_APP_ID)."
        );
    }
    if config.api_secret_token.as_deref().map_or(true, str::is_empty) {
        warn!("No api_secret_token configured; accepting the development token");
    }

    let state = AppState::new(Ingestor::new(remote, config.site_url.clone()), config.api_secret());
    let addr = bind.unwrap_or_else(|| config.bind_addr.clone());
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!("Ingestion endpoint listening on http://{}{}", addr, POSTS_PATH);
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;
    info!("Ingestion endpoint stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for Ctrl-C: {}", e);
    }
}

async fn create_post(State(state): State<AppState>, headers: HeaderMap, body: Bytes) -> Response {
    let authorization = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok());
    if let Err(e) = verify_bearer(authorization, &state.secret) {
        return ingest_failure(e);
    }

    let request: IngestRequest = match serde_json::from_slice(&body) {
        Ok(request) => request,
        Err(e) => {
            warn!("Rejected post with malformed JSON: {}", e);
            return failure(StatusCode::BAD_REQUEST, format!("Invalid JSON body: {}", e));
        }
    };

    match state.ingestor.ingest(request).await {
        Ok(receipt) => (
            StatusCode::CREATED,
            Json(json!({
                "success": true,
                "id": receipt.id,
                "slug": receipt.slug,
                "url": receipt.url
            })),
        )
            .into_response(),
        Err(e) => ingest_failure(e),
    }
}

async fn preflight() -> StatusCode {
    StatusCode::OK
}

async fn method_not_allowed() -> Response {
    failure(StatusCode::METHOD_NOT_ALLOWED, "Method Not Allowed".to_string())
}

fn ingest_failure(e: IngestError) -> Response {
    let status = StatusCode::from_u16(e.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    if status.is_server_error() {
        error!("Ingestion failed: {}", e);
    } else {
        warn!("Rejected post: {}", e);
    }
    failure(status, e.to_string())
}

fn failure(status: StatusCode, message: String) -> Response {
    (status, Json(json!({"success": false, "error": message}))).into_response()
}
