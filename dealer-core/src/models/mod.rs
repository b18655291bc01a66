pub mod actor;
pub mod dealer;
pub mod review;

pub use actor::Actor;
pub use dealer::{Dealer, DealerId};
pub use review::{EnrichedReview, Review, ReviewReceipt};
