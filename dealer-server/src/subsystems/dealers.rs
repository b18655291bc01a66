//! Dealer directory: pass-through reads of dealership records.

use std::sync::Arc;

use dealer_core::{Dealer, DealerId, FetchTarget, ReviewSource, ServiceError};

pub struct DealerDirectory {
    source: Arc<dyn ReviewSource>,
}

impl DealerDirectory {
    pub fn new(source: Arc<dyn ReviewSource>) -> Self {
        Self { source }
    }

    /// All dealers, or those in `state`. `None` and `"All"` mean no filter.
    pub async fn get_dealerships(&self, state: Option<&str>) -> Result<Vec<Dealer>, ServiceError> {
        self.source.fetch_dealers(state).await.map_err(|e| {
            tracing::error!(state = ?state, error = %e, "Failed to fetch dealerships from review source");
            ServiceError::FetchFailed {
                target: FetchTarget::Dealerships,
                source: e,
            }
        })
    }

    pub async fn get_dealer_details(
        &self,
        dealer_id: Option<DealerId>,
    ) -> Result<Dealer, ServiceError> {
        let dealer_id =
            dealer_id.ok_or_else(|| ServiceError::BadRequest("Dealer id is required".to_string()))?;

        let dealer = self.source.fetch_dealer(dealer_id).await.map_err(|e| {
            tracing::error!(dealer_id = %dealer_id, error = %e, "Failed to get dealer from review source");
            ServiceError::FetchFailed {
                target: FetchTarget::Dealer,
                source: e,
            }
        })?;

        dealer.ok_or_else(|| ServiceError::NotFound(format!("Dealer {} not found", dealer_id)))
    }
}
