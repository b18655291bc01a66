//! Sentiment analyzer service
//!
//! Serves the lexicon classifier over HTTP:
//! - GET /              : welcome text
//! - GET /analyze/      : classify the empty text
//! - GET /analyze/:text : classify one percent-decoded path segment
//!
//! Responses are `{"sentiment": "positive" | "negative" | "neutral"}`.

use std::sync::Arc;

use anyhow::Result;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use dealer_core::{Sentiment, SentimentClassifier};
use serde::Serialize;
use tokio::net::TcpListener;
use tokio::sync::broadcast;

pub const WELCOME: &str = "Welcome to the Sentiment Analyzer. Use /analyze/text to get the sentiment";

pub struct AnalyzerState {
    pub classifier: SentimentClassifier,
}

#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    pub sentiment: Sentiment,
}

pub fn build_router(state: Arc<AnalyzerState>) -> Router {
    Router::new()
        .route("/", get(welcome_handler))
        .route("/analyze/", get(analyze_empty_handler))
        .route("/analyze/:text", get(analyze_handler))
        .with_state(state)
}

pub async fn start_analyzer(
    state: Arc<AnalyzerState>,
    addr: &str,
    mut shutdown: broadcast::Receiver<()>,
) -> Result<()> {
    let app = build_router(state);
    let listener = TcpListener::bind(addr).await?;
    tracing::info!("Sentiment analyzer listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            let _ = shutdown.recv().await;
            tracing::info!("Analyzer shutting down...");
        })
        .await?;

    Ok(())
}

/// Pure classification step behind both analyze routes.
pub fn analyze_inner(classifier: &SentimentClassifier, text: &str) -> AnalyzeResponse {
    AnalyzeResponse {
        sentiment: classifier.classify(text),
    }
}

async fn welcome_handler() -> impl IntoResponse {
    (StatusCode::OK, WELCOME)
}

async fn analyze_empty_handler(State(state): State<Arc<AnalyzerState>>) -> impl IntoResponse {
    Json(analyze_inner(&state.classifier, ""))
}

async fn analyze_handler(
    State(state): State<Arc<AnalyzerState>>,
    Path(text): Path<String>,
) -> impl IntoResponse {
    Json(analyze_inner(&state.classifier, &text))
}
