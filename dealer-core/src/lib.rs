pub mod config;
pub mod error;
pub mod models;
pub mod review_source;
pub mod sentiment;
pub mod sentiment_client;
mod upstream;

pub use config::DealerConfig;
pub use error::{DealerError, ErrorKind, FetchTarget, ServiceError, Unavailable, Upstream};
pub use models::{Actor, Dealer, DealerId, EnrichedReview, Review, ReviewReceipt};
pub use review_source::{ReviewSource, ReviewSourceClient};
pub use sentiment::{label_for, LexiconModel, PolarityModel, PolarityScore, Sentiment, SentimentClassifier};
pub use sentiment_client::{
    create_sentiment_service, LocalSentimentService, SentimentService, SentimentServiceClient,
};
