//! Request/response plumbing shared by the review source and sentiment
//! service clients: bounded timeouts, optional retry with backoff, and the
//! collapse of every failure into [`Unavailable`].

use std::future::Future;
use std::time::Duration;

use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tokio_retry::strategy::{jitter, ExponentialBackoff};
use tokio_retry::RetryIf;

use crate::config::UpstreamConfig;
use crate::error::{DealerError, Unavailable, Upstream};

const MAX_LOGGED_BODY: usize = 256;

/// Why a single upstream call failed. Only ever logged; callers see
/// [`Unavailable`].
#[derive(Error, Debug)]
pub(crate) enum CallError {
    #[error("transport error: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("upstream returned status {code}: {body}")]
    Status { code: u16, body: String },

    #[error("malformed response body: {0}")]
    Decode(#[source] serde_json::Error),
}

impl CallError {
    fn is_retryable(&self) -> bool {
        match self {
            CallError::Transport(_) => true,
            CallError::Status { code, .. } => *code == 429 || *code >= 500,
            CallError::Decode(_) => false,
        }
    }

    fn is_timeout(&self) -> bool {
        matches!(self, CallError::Transport(e) if e.is_timeout())
    }
}

pub(crate) fn build_http_client(config: &UpstreamConfig) -> Result<Client, DealerError> {
    let client = Client::builder()
        .timeout(Duration::from_secs(config.timeout_secs))
        .build()?;
    Ok(client)
}

/// Send one request and decode a JSON body, keeping the failure kinds apart.
pub(crate) async fn send_json<T: DeserializeOwned>(request: RequestBuilder) -> Result<T, CallError> {
    let response = request.send().await.map_err(CallError::Transport)?;
    let status = response.status();
    let body = response.text().await.map_err(CallError::Transport)?;

    if !status.is_success() {
        let body: String = body.chars().take(MAX_LOGGED_BODY).collect();
        return Err(CallError::Status {
            code: status.as_u16(),
            body,
        });
    }

    serde_json::from_str(&body).map_err(CallError::Decode)
}

/// Run `call` with the configured retry budget. Only transport errors,
/// 429 and 5xx are retried.
pub(crate) async fn call_with_retry<T, F, Fut>(
    service: Upstream,
    config: &UpstreamConfig,
    call: F,
) -> Result<T, Unavailable>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, CallError>>,
{
    let retry_strategy = ExponentialBackoff::from_millis(config.retry_delay_ms.max(1))
        .max_delay(Duration::from_secs(10))
        .map(jitter)
        .take(config.max_retries);

    RetryIf::spawn(retry_strategy, call, CallError::is_retryable)
        .await
        .map_err(|e| {
            tracing::error!(
                service = %service,
                error = %e,
                timeout = e.is_timeout(),
                max_retries = config.max_retries,
                "Upstream call failed"
            );
            Unavailable { service }
        })
}
