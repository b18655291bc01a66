//! Client for the external review/dealer store.
//!
//! Endpoints (all JSON):
//! - GET  /fetchReviews/dealer/<id>
//! - GET  /fetchDealers, /fetchDealers/<state>
//! - GET  /fetchDealer/<id>
//! - POST /insert_review

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;

use crate::config::UpstreamConfig;
use crate::error::{DealerError, Unavailable, Upstream};
use crate::models::{Dealer, DealerId, Review, ReviewReceipt};
use crate::upstream::{build_http_client, call_with_retry, send_json};

/// State value meaning "no state filter".
pub const ALL_STATES: &str = "All";

/// Read/write access to the review store.
#[async_trait]
pub trait ReviewSource: Send + Sync {
    /// Reviews for one dealer, in store order.
    async fn fetch_reviews(&self, dealer_id: DealerId) -> Result<Vec<Review>, Unavailable>;

    /// All dealers, or those in `state` when given.
    async fn fetch_dealers(&self, state: Option<&str>) -> Result<Vec<Dealer>, Unavailable>;

    /// `Ok(None)` when the store has no such dealer.
    async fn fetch_dealer(&self, dealer_id: DealerId) -> Result<Option<Dealer>, Unavailable>;

    /// Forward a new review verbatim.
    async fn submit_review(
        &self,
        payload: &serde_json::Value,
    ) -> Result<ReviewReceipt, Unavailable>;
}

/// Build `{base}/{endpoint}?k=v&k=v`. Keys and values are inserted as
/// given; nothing is escaped.
pub fn build_request_url(base_url: &str, endpoint: &str, params: &[(&str, &str)]) -> String {
    let mut url = format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        endpoint.trim_start_matches('/')
    );

    if !params.is_empty() {
        let query = params
            .iter()
            .map(|(key, value)| format!("{}={}", key, value))
            .collect::<Vec<_>>()
            .join("&");
        url.push('?');
        url.push_str(&query);
    }

    url
}

/// HTTP implementation of [`ReviewSource`].
#[derive(Debug, Clone)]
pub struct ReviewSourceClient {
    client: Client,
    config: UpstreamConfig,
}

impl ReviewSourceClient {
    pub fn new(config: UpstreamConfig) -> Result<Self, DealerError> {
        let client = build_http_client(&config)?;
        Ok(Self { client, config })
    }

    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    /// GET an endpoint of the store and decode its JSON body.
    pub async fn get_request<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        params: &[(&str, &str)],
    ) -> Result<T, Unavailable> {
        let url = build_request_url(&self.config.base_url, endpoint, params);
        tracing::info!(url = %url, "Review source request");

        call_with_retry(Upstream::ReviewSource, &self.config, || {
            send_json(self.client.get(&url))
        })
        .await
    }
}

#[async_trait]
impl ReviewSource for ReviewSourceClient {
    async fn fetch_reviews(&self, dealer_id: DealerId) -> Result<Vec<Review>, Unavailable> {
        let reviews: Vec<Review> = self
            .get_request(&format!("fetchReviews/dealer/{}", dealer_id), &[])
            .await?;
        tracing::debug!(dealer_id = %dealer_id, count = reviews.len(), "Fetched reviews");
        Ok(reviews)
    }

    async fn fetch_dealers(&self, state: Option<&str>) -> Result<Vec<Dealer>, Unavailable> {
        let endpoint = match state {
            Some(state) if state != ALL_STATES => format!("fetchDealers/{}", state),
            _ => "fetchDealers".to_string(),
        };
        self.get_request(&endpoint, &[]).await
    }

    async fn fetch_dealer(&self, dealer_id: DealerId) -> Result<Option<Dealer>, Unavailable> {
        self.get_request(&format!("fetchDealer/{}", dealer_id), &[])
            .await
    }

    async fn submit_review(
        &self,
        payload: &serde_json::Value,
    ) -> Result<ReviewReceipt, Unavailable> {
        // A failed insert can still reach the store, so submissions are
        // never retried.
        let config = UpstreamConfig {
            max_retries: 0,
            ..self.config.clone()
        };
        let url = build_request_url(&config.base_url, "insert_review", &[]);
        tracing::info!(url = %url, "Review source submission");

        call_with_retry(Upstream::ReviewSource, &config, || {
            send_json(self.client.post(&url).json(payload))
        })
        .await
    }
}
