//! Actor resolution at the HTTP edge.
//!
//! Authentication itself happens in front of this service; the edge only
//! reads whatever identity the fronting layer attached to the request.

use axum::http::HeaderMap;
use dealer_core::Actor;

pub trait Authenticator: Send + Sync {
    fn authenticate(&self, headers: &HeaderMap) -> Actor;
}

/// Trusts a username header set by the reverse proxy / auth gateway.
#[derive(Debug, Clone)]
pub struct HeaderAuthenticator {
    header: String,
}

impl HeaderAuthenticator {
    pub fn new(header: impl Into<String>) -> Self {
        Self {
            header: header.into().to_ascii_lowercase(),
        }
    }
}

impl Authenticator for HeaderAuthenticator {
    fn authenticate(&self, headers: &HeaderMap) -> Actor {
        let username = headers
            .get(self.header.as_str())
            .and_then(|value| value.to_str().ok());
        Actor::from_username(username)
    }
}
