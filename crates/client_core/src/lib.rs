use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header, Client};
use shared::protocol::{PredictRequest, PredictionResult};
use thiserror::Error;
use tracing::{debug, info, warn};
use url::Url;

const PREDICT_PATH: &str = "predict";

#[derive(Debug, Error)]
pub enum PredictError {
    #[error("invalid prediction server url {url:?}: {reason}")]
    InvalidEndpoint { url: String, reason: String },
    #[error("HTTP error! status: {0}")]
    Status(u16),
    #[error("transport error")]
    Transport(#[source] reqwest::Error),
    #[error("malformed prediction response: {0}")]
    MalformedResponse(String),
}

impl PredictError {
    pub fn status_code(&self) -> Option<u16> {
        match self {
            PredictError::Status(code) => Some(*code),
            _ => None,
        }
    }
}

#[async_trait]
pub trait PredictionService: Send + Sync {
    async fn predict(&self, request: &PredictRequest) -> Result<PredictionResult, PredictError>;
}

#[derive(Debug, Clone, Default)]
pub struct ClientOptions {
    /// No timeout when unset; a stalled request then stays pending.
    pub request_timeout: Option<Duration>,
}

pub struct PredictionClient {
    http: Client,
    endpoint: Url,
}

impl PredictionClient {
    pub fn new(server_url: &str, options: ClientOptions) -> Result<Self, PredictError> {
        let endpoint = predict_endpoint(server_url)?;
        let mut builder = Client::builder();
        if let Some(timeout) = options.request_timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().map_err(PredictError::Transport)?;
        Ok(Self { http, endpoint })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl PredictionService for PredictionClient {
    async fn predict(&self, request: &PredictRequest) -> Result<PredictionResult, PredictError> {
        info!(endpoint = %self.endpoint, "requesting yield prediction");
        let response = self
            .http
            .post(self.endpoint.clone())
            .header(header::CONTENT_TYPE, "application/json")
            .json(request)
            .send()
            .await
            .map_err(|err| {
                warn!(%err, "prediction request failed before a response arrived");
                PredictError::Transport(err)
            })?;

        let status = response.status();
        debug!(status = status.as_u16(), "prediction endpoint responded");
        if !status.is_success() {
            return Err(PredictError::Status(status.as_u16()));
        }

        let body = response.bytes().await.map_err(PredictError::Transport)?;
        serde_json::from_slice::<PredictionResult>(&body)
            .map_err(|err| PredictError::MalformedResponse(err.to_string()))
    }
}

/// `{server_url}/predict`, tolerating a trailing slash on the base.
pub fn predict_endpoint(server_url: &str) -> Result<Url, PredictError> {
    let trimmed = server_url.trim().trim_end_matches('/');
    let invalid = |reason: String| PredictError::InvalidEndpoint {
        url: server_url.to_string(),
        reason,
    };

    let base = Url::parse(&format!("{trimmed}/")).map_err(|err| invalid(err.to_string()))?;
    if !matches!(base.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme {}", base.scheme())));
    }
    base.join(PREDICT_PATH)
        .map_err(|err| invalid(err.to_string()))
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
