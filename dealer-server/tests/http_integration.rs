//! HTTP integration tests for the dealer API.
//!
//! Both upstreams are wiremock servers; requests go through the real
//! clients and the full axum router via `oneshot`.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use dealer_core::config::UpstreamConfig;
use dealer_core::{DealerConfig, ReviewSourceClient, SentimentServiceClient};
use dealer_server::http::{build_router, HttpState};
use serde_json::json;
use tower::ServiceExt;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

struct Upstreams {
    store: MockServer,
    analyzer: MockServer,
}

impl Upstreams {
    async fn start() -> Self {
        Self {
            store: MockServer::start().await,
            analyzer: MockServer::start().await,
        }
    }

    fn router(&self) -> axum::Router {
        let upstream = |base_url: String| UpstreamConfig {
            base_url,
            timeout_secs: 2,
            max_retries: 0,
            retry_delay_ms: 10,
        };
        let source = ReviewSourceClient::new(upstream(self.store.uri())).unwrap();
        let sentiment = SentimentServiceClient::new(upstream(self.analyzer.uri())).unwrap();
        let state = HttpState::new(Arc::new(source), Arc::new(sentiment), DealerConfig::default());
        build_router(Arc::new(state))
    }

    async fn label(&self, encoded_text: &str, sentiment: &str) {
        Mock::given(method("GET"))
            .and(path(format!("/analyze/{}", encoded_text)))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "sentiment": sentiment })))
            .mount(&self.analyzer)
            .await;
    }
}

fn review_json(id: i64, text: &str) -> serde_json::Value {
    json!({
        "_id": format!("oid-{}", id),
        "id": id,
        "name": "Berkly Shepley",
        "dealership": 15,
        "review": text,
        "purchase": true,
        "purchase_date": "07/11/2020",
        "car_make": "Audi",
        "car_model": "A6",
        "car_year": 2010,
        "__v": 0
    })
}

async fn send(app: axum::Router, req: Request<Body>) -> (StatusCode, serde_json::Value) {
    let resp = app.oneshot(req).await.unwrap();
    let status = resp.status();
    let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&body).unwrap())
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

#[tokio::test]
async fn test_version_endpoint() {
    let upstreams = Upstreams::start().await;
    let (status, json) = send(upstreams.router(), get("/version")).await;

    assert_eq!(status, StatusCode::OK);
    assert!(json["version"].is_string());
    assert_eq!(json["protocol"], "dealer/1");
}

#[tokio::test]
async fn test_reviews_enriched_in_store_order() {
    let upstreams = Upstreams::start().await;
    Mock::given(method("GET"))
        .and(path("/fetchReviews/dealer/15"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            review_json(1, "Great service!"),
            review_json(2, "Terrible, avoid"),
            review_json(3, "It was fine"),
        ])))
        .expect(1)
        .mount(&upstreams.store)
        .await;
    upstreams.label("Great%20service!", "positive").await;
    upstreams.label("Terrible,%20avoid", "negative").await;
    upstreams.label("It%20was%20fine", "neutral").await;

    let (status, json) = send(upstreams.router(), get("/reviews/dealer/15")).await;

    assert_eq!(status, StatusCode::OK, "body: {}", json);
    assert_eq!(json["status"], 200);
    let reviews = json["reviews"].as_array().unwrap();
    let labels: Vec<(i64, &str)> = reviews
        .iter()
        .map(|r| (r["id"].as_i64().unwrap(), r["sentiment"].as_str().unwrap()))
        .collect();
    assert_eq!(labels, vec![(1, "positive"), (2, "negative"), (3, "neutral")]);
    assert_eq!(reviews[0]["car_make"], "Audi");
    assert!(reviews[0].get("_id").is_none(), "store bookkeeping is not passed through");
}

#[tokio::test]
async fn test_reviews_empty_store_makes_no_sentiment_calls() {
    let upstreams = Upstreams::start().await;
    Mock::given(method("GET"))
        .and(path("/fetchReviews/dealer/7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&upstreams.store)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "sentiment": "positive" })))
        .expect(0)
        .mount(&upstreams.analyzer)
        .await;

    let (status, json) = send(upstreams.router(), get("/reviews/dealer/7")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["reviews"], json!([]));
}

#[tokio::test]
async fn test_reviews_sentiment_failure_is_structured_500() {
    let upstreams = Upstreams::start().await;
    Mock::given(method("GET"))
        .and(path("/fetchReviews/dealer/15"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            review_json(1, "Great service!"),
            review_json(2, "Terrible, avoid"),
        ])))
        .mount(&upstreams.store)
        .await;
    upstreams.label("Great%20service!", "positive").await;
    Mock::given(method("GET"))
        .and(path("/analyze/Terrible,%20avoid"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&upstreams.analyzer)
        .await;

    let (status, json) = send(upstreams.router(), get("/reviews/dealer/15")).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        json,
        json!({ "error": "Failed to analyze review sentiment", "status": 500 })
    );
}

#[tokio::test]
async fn test_reviews_store_down_is_structured_500() {
    let upstreams = Upstreams::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&upstreams.store)
        .await;

    let (status, json) = send(upstreams.router(), get("/reviews/dealer/15")).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json, json!({ "error": "Failed to get reviews", "status": 500 }));
}

#[tokio::test]
async fn test_reviews_invalid_id_is_400_without_upstream_calls() {
    let upstreams = Upstreams::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(0)
        .mount(&upstreams.store)
        .await;

    let (status, json) = send(upstreams.router(), get("/reviews/dealer/abc")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["status"], 400);

    let (status, json) = send(upstreams.router(), get("/reviews/dealer/-5")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "Invalid dealer id: -5");
}

#[tokio::test]
async fn test_unknown_routes_get_structured_404() {
    let upstreams = Upstreams::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(0)
        .mount(&upstreams.store)
        .await;

    let (status, json) = send(upstreams.router(), get("/reviews/dealer/")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(
        json,
        json!({ "error": "No route for /reviews/dealer/", "status": 404 })
    );

    let (status, json) = send(upstreams.router(), get("/no/such/path")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["status"], 404);
}

#[tokio::test]
async fn test_dealers_by_state() {
    let upstreams = Upstreams::start().await;
    Mock::given(method("GET"))
        .and(path("/fetchDealers/Kansas"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": 1, "city": "El Paso", "state": "Kansas", "st": "KS", "zip": "88563" }
        ])))
        .expect(1)
        .mount(&upstreams.store)
        .await;

    let (status, json) = send(upstreams.router(), get("/get_dealers/Kansas")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["dealers"][0]["st"], "KS");
}

#[tokio::test]
async fn test_dealers_all_uses_unfiltered_endpoint() {
    let upstreams = Upstreams::start().await;
    Mock::given(method("GET"))
        .and(path("/fetchDealers"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{ "id": 1 }, { "id": 2 }])))
        .expect(2)
        .mount(&upstreams.store)
        .await;

    let (_, all) = send(upstreams.router(), get("/get_dealers")).await;
    let (_, also_all) = send(upstreams.router(), get("/get_dealers/All")).await;

    assert_eq!(all["dealers"].as_array().unwrap().len(), 2);
    assert_eq!(all, also_all);
}

#[tokio::test]
async fn test_dealer_missing_is_404() {
    let upstreams = Upstreams::start().await;
    Mock::given(method("GET"))
        .and(path("/fetchDealer/99"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::Value::Null))
        .mount(&upstreams.store)
        .await;

    let (status, json) = send(upstreams.router(), get("/get_dealer/99")).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["status"], 404);
}

#[tokio::test]
async fn test_add_review_requires_authenticated_actor() {
    let upstreams = Upstreams::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": 1 })))
        .expect(0)
        .mount(&upstreams.store)
        .await;

    let req = Request::builder()
        .method("POST")
        .uri("/add_review")
        .header("content-type", "application/json")
        .body(Body::from(r#"{"review":"Nice"}"#))
        .unwrap();
    let (status, json) = send(upstreams.router(), req).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(json, json!({ "error": "Unauthorized", "status": 403 }));
}

#[tokio::test]
async fn test_add_review_forwards_payload_verbatim() {
    let upstreams = Upstreams::start().await;
    let payload = json!({
        "name": "jdoe",
        "dealership": 15,
        "review": "Smooth purchase",
        "purchase": true,
        "purchase_date": "2024-03-01",
        "car_make": "Audi",
        "car_model": "A6",
        "car_year": 2021
    });
    let mut saved = payload.clone();
    saved["id"] = json!(1301);
    Mock::given(method("POST"))
        .and(path("/insert_review"))
        .and(body_json(&payload))
        .respond_with(ResponseTemplate::new(200).set_body_json(&saved))
        .expect(1)
        .mount(&upstreams.store)
        .await;

    let req = Request::builder()
        .method("POST")
        .uri("/add_review")
        .header("content-type", "application/json")
        .header("x-remote-user", "jdoe")
        .body(Body::from(payload.to_string()))
        .unwrap();
    let (status, json) = send(upstreams.router(), req).await;

    assert_eq!(status, StatusCode::OK, "body: {}", json);
    assert_eq!(json["status"], 200);
    assert_eq!(json["review"]["id"], 1301);
    assert_eq!(json["review"]["review"], "Smooth purchase");
}

#[tokio::test]
async fn test_add_review_malformed_json_is_400() {
    let upstreams = Upstreams::start().await;
    let req = Request::builder()
        .method("POST")
        .uri("/add_review")
        .header("x-remote-user", "jdoe")
        .body(Body::from("{\"review\":"))
        .unwrap();
    let (status, json) = send(upstreams.router(), req).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["status"], 400);
}
