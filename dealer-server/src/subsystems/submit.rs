//! Review submission flow
//!
//! Authorization is decided by the caller's [`Actor`]; anonymous actors are
//! turned away before the review source is touched. Accepted payloads are
//! forwarded verbatim. Submitted reviews are not classified here; sentiment
//! is only computed when reviews are read.

use std::sync::Arc;

use dealer_core::{Actor, ReviewReceipt, ReviewSource, ServiceError};

pub struct ReviewSubmitter {
    source: Arc<dyn ReviewSource>,
}

impl ReviewSubmitter {
    pub fn new(source: Arc<dyn ReviewSource>) -> Self {
        Self { source }
    }

    pub async fn add_review(
        &self,
        actor: &Actor,
        payload: serde_json::Value,
    ) -> Result<ReviewReceipt, ServiceError> {
        let Some(username) = actor.username() else {
            tracing::warn!("Rejected review submission from anonymous actor");
            return Err(ServiceError::Unauthorized);
        };

        let receipt = self.source.submit_review(&payload).await.map_err(|e| {
            tracing::error!(user = username, error = %e, "Failed to add review");
            ServiceError::SubmissionFailed(e)
        })?;

        tracing::info!(user = username, review_id = receipt.id, "Review submitted");
        Ok(receipt)
    }
}
