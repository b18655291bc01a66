//! Sentiment service backends.
//!
//! - **remote**: `GET {base}/analyze/<text>` on the analyzer service
//! - **local**: the lexicon classifier, in-process

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::Deserialize;

use crate::config::{SentimentConfig, UpstreamConfig};
use crate::error::{DealerError, Unavailable, Upstream};
use crate::sentiment::{LexiconModel, Sentiment, SentimentClassifier};
use crate::upstream::{build_http_client, call_with_retry, send_json};

/// Abstraction over where classification happens.
#[async_trait]
pub trait SentimentService: Send + Sync {
    async fn classify(&self, text: &str) -> Result<Sentiment, Unavailable>;

    /// Backend name for logging.
    fn name(&self) -> &str;
}

/// Create the backend selected by `[sentiment] backend`.
pub fn create_sentiment_service(
    config: &SentimentConfig,
) -> Result<Box<dyn SentimentService>, DealerError> {
    match config.backend.as_str() {
        "local" => {
            let model = LexiconModel::with_optional_file(config.lexicon_path.as_deref())?;
            Ok(Box::new(LocalSentimentService::new(SentimentClassifier::new(
                Arc::new(model),
            ))))
        }
        "remote" => Ok(Box::new(SentimentServiceClient::new(config.upstream())?)),
        other => {
            tracing::warn!(backend = other, "Unknown sentiment backend, using remote");
            Ok(Box::new(SentimentServiceClient::new(config.upstream())?))
        }
    }
}

#[derive(Debug, Deserialize)]
struct AnalyzeResponse {
    sentiment: Sentiment,
}

/// HTTP client for the analyzer service.
#[derive(Debug, Clone)]
pub struct SentimentServiceClient {
    client: Client,
    config: UpstreamConfig,
    base_url: Url,
}

impl SentimentServiceClient {
    pub fn new(config: UpstreamConfig) -> Result<Self, DealerError> {
        let base_url = Url::parse(&config.base_url).map_err(|e| DealerError::InvalidUrl {
            url: config.base_url.clone(),
            reason: e.to_string(),
        })?;
        if base_url.cannot_be_a_base() {
            return Err(DealerError::InvalidUrl {
                url: config.base_url.clone(),
                reason: "cannot be a base URL".to_string(),
            });
        }

        let client = build_http_client(&config)?;
        Ok(Self {
            client,
            config,
            base_url,
        })
    }

    /// `{base}/analyze/<text>` with the text percent-encoded as one segment.
    pub fn analyze_url(&self, text: &str) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push("analyze").push(text);
        }
        url
    }
}

#[async_trait]
impl SentimentService for SentimentServiceClient {
    async fn classify(&self, text: &str) -> Result<Sentiment, Unavailable> {
        let url = self.analyze_url(text);
        tracing::debug!(chars = text.chars().count(), "Sentiment request");

        let response: AnalyzeResponse = call_with_retry(Upstream::SentimentService, &self.config, || {
            send_json(self.client.get(url.clone()))
        })
        .await?;

        Ok(response.sentiment)
    }

    fn name(&self) -> &str {
        "remote"
    }
}

/// Classifies in-process. Never fails.
#[derive(Debug, Clone)]
pub struct LocalSentimentService {
    classifier: SentimentClassifier,
}

impl LocalSentimentService {
    pub fn new(classifier: SentimentClassifier) -> Self {
        Self { classifier }
    }
}

#[async_trait]
impl SentimentService for LocalSentimentService {
    async fn classify(&self, text: &str) -> Result<Sentiment, Unavailable> {
        Ok(self.classifier.classify(text))
    }

    fn name(&self) -> &str {
        "local"
    }
}
