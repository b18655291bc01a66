//! Dealer HTTP API
//!
//! Axum server that exposes dealerships and sentiment-annotated reviews to
//! the front end.
//!
//! Architecture: each endpoint has a thin axum handler that delegates to an
//! inner function returning `(StatusCode, serde_json::Value)`. The inner
//! functions are directly testable without axum dispatch machinery.
//!
//! Endpoints:
//! - GET  /health                    : liveness plus configured upstreams
//! - GET  /version                   : server version info
//! - GET  /get_dealers[/:state]      : dealerships, optionally by state
//! - GET  /get_dealer/:dealer_id     : one dealership
//! - GET  /reviews/dealer/:dealer_id : reviews with sentiment
//! - POST /add_review                : submit a review (authenticated)

use std::sync::Arc;

use anyhow::Result;
use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode, Uri};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use dealer_core::{
    Actor, DealerConfig, DealerId, ErrorKind, ReviewSource, SentimentService, ServiceError,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;

use crate::auth::{Authenticator, HeaderAuthenticator};
use crate::subsystems::dealers::DealerDirectory;
use crate::subsystems::reviews::ReviewPipeline;
use crate::subsystems::submit::ReviewSubmitter;

/// Shared state for all HTTP handlers
pub struct HttpState {
    pub pipeline: ReviewPipeline,
    pub submitter: ReviewSubmitter,
    pub directory: DealerDirectory,
    pub authenticator: Arc<dyn Authenticator>,
    pub config: DealerConfig,
}

impl HttpState {
    /// Wire the request flows around one review source and one sentiment
    /// backend, with header-based actor resolution.
    pub fn new(
        source: Arc<dyn ReviewSource>,
        sentiment: Arc<dyn SentimentService>,
        config: DealerConfig,
    ) -> Self {
        Self {
            pipeline: ReviewPipeline::new(
                source.clone(),
                sentiment,
                config.pipeline.classify_concurrency,
            ),
            submitter: ReviewSubmitter::new(source.clone()),
            directory: DealerDirectory::new(source),
            authenticator: Arc::new(HeaderAuthenticator::new(config.auth.user_header.clone())),
            config,
        }
    }
}

/// Build the Axum router with all endpoints
pub fn build_router(state: Arc<HttpState>) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/version", get(version_handler))
        .route("/get_dealers", get(dealers_handler))
        .route("/get_dealers/:state", get(dealers_by_state_handler))
        .route("/get_dealer/:dealer_id", get(dealer_handler))
        .route("/reviews/dealer/:dealer_id", get(reviews_handler))
        .route("/add_review", post(add_review_handler))
        .fallback(fallback_handler)
        .with_state(state)
}

/// Start the HTTP server on the configured address.
/// Gracefully shuts down when the broadcast shutdown signal fires.
pub async fn start_http_server(
    state: Arc<HttpState>,
    mut shutdown: broadcast::Receiver<()>,
) -> Result<()> {
    let addr = format!("{}:{}", state.config.http.host, state.config.http.port);

    let app = build_router(state);
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("Dealer HTTP API listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            let _ = shutdown.recv().await;
            tracing::info!("HTTP server shutting down...");
        })
        .await?;

    Ok(())
}

// ============================================================================
// Inner (directly testable) request functions
// ============================================================================

/// Inner health. Liveness only; upstreams are reported, not probed.
pub fn health_inner(state: &HttpState) -> (StatusCode, serde_json::Value) {
    (
        StatusCode::OK,
        serde_json::json!({
            "status": "healthy",
            "version": env!("CARGO_PKG_VERSION"),
            "review_source": state.config.review_source.base_url,
            "sentiment_backend": state.config.sentiment.backend,
        }),
    )
}

/// Inner version. Returns version info (pure, no IO).
pub fn version_inner() -> serde_json::Value {
    serde_json::json!({
        "version": env!("CARGO_PKG_VERSION"),
        "protocol": "dealer/1",
    })
}

pub async fn dealers_inner(
    directory: &DealerDirectory,
    state: Option<&str>,
) -> (StatusCode, serde_json::Value) {
    match directory.get_dealerships(state).await {
        Ok(dealers) => (
            StatusCode::OK,
            serde_json::json!({ "status": 200, "dealers": dealers }),
        ),
        Err(e) => error_response(&e),
    }
}

pub async fn dealer_inner(
    directory: &DealerDirectory,
    raw_id: &str,
) -> (StatusCode, serde_json::Value) {
    let result = match DealerId::parse_optional(raw_id) {
        Ok(id) => directory.get_dealer_details(id).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(dealer) => (
            StatusCode::OK,
            serde_json::json!({ "status": 200, "dealer": dealer }),
        ),
        Err(e) => error_response(&e),
    }
}

/// Inner reviews. The enrichment pipeline behind `/reviews/dealer/:id`.
pub async fn reviews_inner(
    pipeline: &ReviewPipeline,
    raw_id: &str,
) -> (StatusCode, serde_json::Value) {
    let result = match DealerId::parse_optional(raw_id) {
        Ok(id) => pipeline.get_dealer_reviews(id).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(reviews) => (
            StatusCode::OK,
            serde_json::json!({ "status": 200, "reviews": reviews }),
        ),
        Err(e) => error_response(&e),
    }
}

/// Inner fallback. Unknown routes, including an empty dealer id segment,
/// get the same `{error, status}` body as every other failure.
pub fn not_found_inner(path: &str) -> (StatusCode, serde_json::Value) {
    error_response(&ServiceError::NotFound(format!("No route for {}", path)))
}

/// Inner add_review. Parses the raw body so malformed JSON gets the same
/// structured 400 as every other client error.
pub async fn add_review_inner(
    submitter: &ReviewSubmitter,
    actor: &Actor,
    body: &[u8],
) -> (StatusCode, serde_json::Value) {
    let payload = match parse_review_payload(body) {
        Ok(p) => p,
        Err(e) => return error_response(&e),
    };

    match submitter.add_review(actor, payload).await {
        Ok(receipt) => (
            StatusCode::OK,
            serde_json::json!({ "status": 200, "review": receipt }),
        ),
        Err(e) => error_response(&e),
    }
}

// ============================================================================
// Axum handler wrappers (thin, delegate to inner functions)
// ============================================================================

pub async fn health_handler(State(state): State<Arc<HttpState>>) -> impl IntoResponse {
    let (status, body) = health_inner(&state);
    (status, Json(body))
}

pub async fn version_handler() -> impl IntoResponse {
    (StatusCode::OK, Json(version_inner()))
}

pub async fn dealers_handler(State(state): State<Arc<HttpState>>) -> impl IntoResponse {
    let (status, body) = dealers_inner(&state.directory, None).await;
    (status, Json(body))
}

pub async fn dealers_by_state_handler(
    State(state): State<Arc<HttpState>>,
    Path(us_state): Path<String>,
) -> impl IntoResponse {
    let (status, body) = dealers_inner(&state.directory, Some(&us_state)).await;
    (status, Json(body))
}

pub async fn dealer_handler(
    State(state): State<Arc<HttpState>>,
    Path(dealer_id): Path<String>,
) -> impl IntoResponse {
    let (status, body) = dealer_inner(&state.directory, &dealer_id).await;
    (status, Json(body))
}

pub async fn reviews_handler(
    State(state): State<Arc<HttpState>>,
    Path(dealer_id): Path<String>,
) -> impl IntoResponse {
    let (status, body) = reviews_inner(&state.pipeline, &dealer_id).await;
    (status, Json(body))
}

pub async fn add_review_handler(
    State(state): State<Arc<HttpState>>,
    headers: HeaderMap,
    body: Bytes,
) -> impl IntoResponse {
    let actor = state.authenticator.authenticate(&headers);
    let (status, body) = add_review_inner(&state.submitter, &actor, &body).await;
    (status, Json(body))
}

pub async fn fallback_handler(uri: Uri) -> impl IntoResponse {
    let (status, body) = not_found_inner(uri.path());
    (status, Json(body))
}

// ============================================================================
// Helpers
// ============================================================================

/// `{error, status}` body for a failed request. Internal details never
/// reach the client.
pub fn error_response(err: &ServiceError) -> (StatusCode, serde_json::Value) {
    if err.kind() == ErrorKind::Internal {
        tracing::error!(error = %err, "Request failed with internal error");
    }

    let status =
        StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (
        status,
        serde_json::json!({
            "error": err.public_message(),
            "status": status.as_u16(),
        }),
    )
}

fn parse_review_payload(body: &[u8]) -> Result<serde_json::Value, ServiceError> {
    let payload: serde_json::Value = serde_json::from_slice(body)
        .map_err(|e| ServiceError::BadRequest(format!("Invalid review payload: {}", e)))?;
    if !payload.is_object() {
        return Err(ServiceError::BadRequest(
            "Review payload must be a JSON object".to_string(),
        ));
    }
    Ok(payload)
}

// ============================================================================
// Unit Tests, calling inner functions directly
// ============================================================================
