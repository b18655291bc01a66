//! Review enrichment pipeline
//!
//! dealer id → raw reviews from the review source → one sentiment call per
//! review → enriched reviews in source order.
//!
//! All-or-nothing: a single failed classification fails the whole request
//! and no partially enriched list ever leaves this module.

use std::sync::Arc;

use dealer_core::{
    DealerId, EnrichedReview, FetchTarget, ReviewSource, SentimentService, ServiceError,
};
use futures::stream::{self, StreamExt, TryStreamExt};

pub struct ReviewPipeline {
    source: Arc<dyn ReviewSource>,
    sentiment: Arc<dyn SentimentService>,
    concurrency: usize,
}

impl ReviewPipeline {
    /// `concurrency` bounds in-flight sentiment calls; 1 classifies
    /// strictly one review at a time.
    pub fn new(
        source: Arc<dyn ReviewSource>,
        sentiment: Arc<dyn SentimentService>,
        concurrency: usize,
    ) -> Self {
        Self {
            source,
            sentiment,
            concurrency: concurrency.max(1),
        }
    }

    /// Fetch and enrich every review of `dealer_id`.
    ///
    /// Dropping the returned future abandons any in-flight classification.
    pub async fn get_dealer_reviews(
        &self,
        dealer_id: Option<DealerId>,
    ) -> Result<Vec<EnrichedReview>, ServiceError> {
        let dealer_id =
            dealer_id.ok_or_else(|| ServiceError::BadRequest("Dealer id is required".to_string()))?;

        let reviews = self.source.fetch_reviews(dealer_id).await.map_err(|e| {
            tracing::error!(dealer_id = %dealer_id, error = %e, "Failed to get reviews from review source");
            ServiceError::FetchFailed {
                target: FetchTarget::Reviews,
                source: e,
            }
        })?;

        let total = reviews.len();
        let sentiment = self.sentiment.as_ref();

        // `buffered` yields in input order regardless of completion order;
        // `try_collect` stops at the first error and drops the rest.
        let enriched: Vec<EnrichedReview> = stream::iter(reviews)
            .map(|review| async move {
                match sentiment.classify(&review.review).await {
                    Ok(label) => Ok(EnrichedReview::new(review, label)),
                    Err(e) => {
                        tracing::error!(
                            dealer_id = %dealer_id,
                            review_id = review.id,
                            backend = sentiment.name(),
                            error = %e,
                            "Failed to analyze review sentiment"
                        );
                        Err(ServiceError::EnrichmentFailed {
                            review_id: review.id,
                            source: e,
                        })
                    }
                }
            })
            .buffered(self.concurrency)
            .try_collect()
            .await?;

        if enriched.len() != total {
            return Err(ServiceError::Internal(format!(
                "enriched {} of {} reviews for dealer {}",
                enriched.len(),
                total,
                dealer_id
            )));
        }

        tracing::info!(
            dealer_id = %dealer_id,
            reviews = total,
            backend = sentiment.name(),
            "Enriched dealer reviews"
        );
        Ok(enriched)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use dealer_core::{
        Dealer, ErrorKind, Review, ReviewReceipt, Sentiment, Unavailable,
    };
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    // ------------------------------------------------------------------
    // Fakes for unit tests (no HTTP)
    // ------------------------------------------------------------------

    fn review(id: i64, text: &str) -> Review {
        Review {
            id,
            name: format!("Reviewer {}", id),
            review: text.to_string(),
            purchase: true,
            purchase_date: Some("2023-05-01".to_string()),
            car_make: "Toyota".to_string(),
            car_model: "Corolla".to_string(),
            car_year: 2020,
        }
    }

    /// Source that serves a fixed review list, or fails when `None`.
    struct FakeSource {
        reviews: Option<Vec<Review>>,
        calls: AtomicUsize,
    }

    impl FakeSource {
        fn with(reviews: Vec<Review>) -> Self {
            Self {
                reviews: Some(reviews),
                calls: AtomicUsize::new(0),
            }
        }

        fn failing() -> Self {
            Self {
                reviews: None,
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl ReviewSource for FakeSource {
        async fn fetch_reviews(&self, _dealer_id: DealerId) -> Result<Vec<Review>, Unavailable> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.reviews.clone().ok_or_else(Unavailable::review_source)
        }
        async fn fetch_dealers(&self, _state: Option<&str>) -> Result<Vec<Dealer>, Unavailable> {
            Ok(Vec::new())
        }
        async fn fetch_dealer(&self, _dealer_id: DealerId) -> Result<Option<Dealer>, Unavailable> {
            Ok(None)
        }
        async fn submit_review(
            &self,
            _payload: &serde_json::Value,
        ) -> Result<ReviewReceipt, Unavailable> {
            Err(Unavailable::review_source())
        }
    }

    /// Labels by text; texts listed in `fail_on` fail. Optional per-text
    /// delays let later reviews finish before earlier ones.
    struct FakeSentiment {
        labels: HashMap<String, Sentiment>,
        fail_on: Vec<String>,
        delays_ms: HashMap<String, u64>,
        calls: AtomicUsize,
    }

    impl FakeSentiment {
        fn new(labels: &[(&str, Sentiment)]) -> Self {
            Self {
                labels: labels.iter().map(|(t, s)| (t.to_string(), *s)).collect(),
                fail_on: Vec::new(),
                delays_ms: HashMap::new(),
                calls: AtomicUsize::new(0),
            }
        }

        fn failing_on(mut self, text: &str) -> Self {
            self.fail_on.push(text.to_string());
            self
        }

        fn delayed(mut self, text: &str, ms: u64) -> Self {
            self.delays_ms.insert(text.to_string(), ms);
            self
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl SentimentService for FakeSentiment {
        async fn classify(&self, text: &str) -> Result<Sentiment, Unavailable> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(ms) = self.delays_ms.get(text) {
                tokio::time::sleep(Duration::from_millis(*ms)).await;
            }
            if self.fail_on.iter().any(|t| t == text) {
                return Err(Unavailable::sentiment_service());
            }
            Ok(self.labels.get(text).copied().unwrap_or(Sentiment::Neutral))
        }
        fn name(&self) -> &str {
            "fake"
        }
    }

    fn labels() -> Vec<(&'static str, Sentiment)> {
        vec![
            ("Great service!", Sentiment::Positive),
            ("Terrible, avoid", Sentiment::Negative),
            ("It was fine", Sentiment::Neutral),
        ]
    }

    fn three_reviews() -> Vec<Review> {
        vec![
            review(30, "Great service!"),
            review(10, "Terrible, avoid"),
            review(20, "It was fine"),
        ]
    }

    #[tokio::test]
    async fn test_enriches_all_reviews_in_source_order() {
        let source = Arc::new(FakeSource::with(three_reviews()));
        let sentiment = Arc::new(FakeSentiment::new(&labels()));
        let pipeline = ReviewPipeline::new(source, sentiment.clone(), 1);

        let enriched = pipeline.get_dealer_reviews(Some(DealerId(15))).await.unwrap();

        let ids: Vec<i64> = enriched.iter().map(|r| r.review.id).collect();
        assert_eq!(ids, vec![30, 10, 20], "source order must be preserved");
        let sentiments: Vec<Sentiment> = enriched.iter().map(|r| r.sentiment).collect();
        assert_eq!(
            sentiments,
            vec![Sentiment::Positive, Sentiment::Negative, Sentiment::Neutral]
        );
        assert_eq!(sentiment.calls(), 3);
    }

    #[tokio::test]
    async fn test_missing_dealer_id_is_bad_request_without_calls() {
        let source = Arc::new(FakeSource::with(three_reviews()));
        let sentiment = Arc::new(FakeSentiment::new(&labels()));
        let pipeline = ReviewPipeline::new(source.clone(), sentiment.clone(), 1);

        let err = pipeline.get_dealer_reviews(None).await.unwrap_err();

        assert_eq!(err.kind(), ErrorKind::BadRequest);
        assert_eq!(err.status_code(), 400);
        assert_eq!(source.calls.load(Ordering::SeqCst), 0);
        assert_eq!(sentiment.calls(), 0);
    }

    #[tokio::test]
    async fn test_source_failure_makes_no_classification_calls() {
        let sentiment = Arc::new(FakeSentiment::new(&labels()));
        let pipeline = ReviewPipeline::new(Arc::new(FakeSource::failing()), sentiment.clone(), 4);

        let err = pipeline.get_dealer_reviews(Some(DealerId(1))).await.unwrap_err();

        assert!(matches!(
            err,
            ServiceError::FetchFailed {
                target: FetchTarget::Reviews,
                ..
            }
        ));
        assert_eq!(err.kind(), ErrorKind::UpstreamUnavailable);
        assert_eq!(sentiment.calls(), 0);
    }

    #[tokio::test]
    async fn test_single_classification_failure_fails_whole_request() {
        let source = Arc::new(FakeSource::with(three_reviews()));
        let sentiment = Arc::new(FakeSentiment::new(&labels()).failing_on("Terrible, avoid"));
        let pipeline = ReviewPipeline::new(source, sentiment, 1);

        let result = pipeline.get_dealer_reviews(Some(DealerId(15))).await;

        match result {
            Err(ServiceError::EnrichmentFailed { review_id, .. }) => assert_eq!(review_id, 10),
            other => panic!("Expected EnrichmentFailed, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_failure_on_last_review_returns_no_entries() {
        let source = Arc::new(FakeSource::with(three_reviews()));
        let sentiment = Arc::new(FakeSentiment::new(&labels()).failing_on("It was fine"));
        let pipeline = ReviewPipeline::new(source, sentiment.clone(), 1);

        let result = pipeline.get_dealer_reviews(Some(DealerId(15))).await;

        let err = result.expect_err("no partial list may be returned");
        assert_eq!(err.kind(), ErrorKind::UpstreamUnavailable);
        assert_eq!(err.public_message(), "Failed to analyze review sentiment");
        assert_eq!(sentiment.calls(), 3);
    }

    #[tokio::test]
    async fn test_empty_review_list_is_ok_and_empty() {
        let sentiment = Arc::new(FakeSentiment::new(&labels()));
        let pipeline =
            ReviewPipeline::new(Arc::new(FakeSource::with(Vec::new())), sentiment.clone(), 1);

        let enriched = pipeline.get_dealer_reviews(Some(DealerId(2))).await.unwrap();
        assert!(enriched.is_empty());
        assert_eq!(sentiment.calls(), 0);
    }

    #[tokio::test]
    async fn test_duplicate_reviews_are_not_deduplicated() {
        let reviews = vec![review(1, "It was fine"), review(1, "It was fine")];
        let pipeline = ReviewPipeline::new(
            Arc::new(FakeSource::with(reviews)),
            Arc::new(FakeSentiment::new(&labels())),
            1,
        );

        let enriched = pipeline.get_dealer_reviews(Some(DealerId(2))).await.unwrap();
        assert_eq!(enriched.len(), 2);
    }

    #[tokio::test]
    async fn test_concurrent_classification_keeps_source_order() {
        // The first review is the slowest, so completion order differs
        // from source order.
        let sentiment = Arc::new(
            FakeSentiment::new(&labels())
                .delayed("Great service!", 60)
                .delayed("Terrible, avoid", 30),
        );
        let pipeline =
            ReviewPipeline::new(Arc::new(FakeSource::with(three_reviews())), sentiment, 3);

        let enriched = pipeline.get_dealer_reviews(Some(DealerId(15))).await.unwrap();

        let ids: Vec<i64> = enriched.iter().map(|r| r.review.id).collect();
        assert_eq!(ids, vec![30, 10, 20]);
        assert_eq!(enriched[0].sentiment, Sentiment::Positive);
    }

    #[tokio::test]
    async fn test_concurrent_failure_still_all_or_nothing() {
        let sentiment = Arc::new(
            FakeSentiment::new(&labels())
                .delayed("Great service!", 40)
                .failing_on("It was fine"),
        );
        let pipeline =
            ReviewPipeline::new(Arc::new(FakeSource::with(three_reviews())), sentiment, 3);

        let err = pipeline
            .get_dealer_reviews(Some(DealerId(15)))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::EnrichmentFailed { review_id: 20, .. }));
    }

    #[tokio::test]
    async fn test_zero_concurrency_is_clamped_to_sequential() {
        let pipeline = ReviewPipeline::new(
            Arc::new(FakeSource::with(three_reviews())),
            Arc::new(FakeSentiment::new(&labels())),
            0,
        );
        let enriched = pipeline.get_dealer_reviews(Some(DealerId(15))).await.unwrap();
        assert_eq!(enriched.len(), 3);
    }

    #[tokio::test]
    async fn test_cancelled_request_abandons_in_flight_calls() {
        let sentiment = Arc::new(FakeSentiment::new(&labels()).delayed("Great service!", 5_000));
        let pipeline = ReviewPipeline::new(
            Arc::new(FakeSource::with(three_reviews())),
            sentiment.clone(),
            1,
        );

        let outcome = tokio::time::timeout(
            Duration::from_millis(50),
            pipeline.get_dealer_reviews(Some(DealerId(15))),
        )
        .await;

        assert!(outcome.is_err(), "caller gave up before the slow call finished");
        assert_eq!(sentiment.calls(), 1, "later reviews were never classified");
    }
}
