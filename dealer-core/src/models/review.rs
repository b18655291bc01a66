use serde::{Deserialize, Serialize};

use crate::sentiment::Sentiment;

/// A review as stored by the review store. Store bookkeeping fields
/// (`_id`, `__v`, `dealership`) are ignored on read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    pub id: i64,
    pub name: String,
    pub review: String,
    pub purchase: bool,
    #[serde(default)]
    pub purchase_date: Option<String>,
    pub car_make: String,
    pub car_model: String,
    pub car_year: i32,
}

/// A review annotated with the sentiment of its text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedReview {
    #[serde(flatten)]
    pub review: Review,
    pub sentiment: Sentiment,
}

impl EnrichedReview {
    pub fn new(review: Review, sentiment: Sentiment) -> Self {
        Self { review, sentiment }
    }
}

/// Acknowledgment returned by the store for a submitted review: the saved
/// document, including its newly assigned id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewReceipt {
    pub id: i64,
    #[serde(flatten)]
    pub document: serde_json::Map<String, serde_json::Value>,
}
