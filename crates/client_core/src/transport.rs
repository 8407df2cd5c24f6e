use async_trait::async_trait;
use reqwest::Client;
use shared::{
    domain::GenerationResult,
    protocol::{ErrorBody, GenerationRequest, GENERATE_ROUTE},
};
use thiserror::Error;
use tracing::{info, warn};
use url::Url;

/// Failure of a single generation call. `Display` is the text shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("failed to reach generation service: {0}")]
    Network(String),
    #[error("{message}")]
    Status { status: u16, message: String },
    #[error("invalid generation response: {0}")]
    Decode(String),
}

impl TransportError {
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[async_trait]
pub trait GenerationTransport: Send + Sync {
    async fn generate(&self, request: &GenerationRequest)
        -> Result<GenerationResult, TransportError>;
}

pub struct HttpTransport {
    http: Client,
    base_url: Url,
}

impl HttpTransport {
    pub fn new(base_url: Url) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(http: Client, base_url: Url) -> Self {
        Self { http, base_url }
    }

    pub fn endpoint(&self) -> String {
        format!(
            "{}{GENERATE_ROUTE}",
            self.base_url.as_str().trim_end_matches('/')
        )
    }
}

#[async_trait]
impl GenerationTransport for HttpTransport {
    async fn generate(
        &self,
        request: &GenerationRequest,
    ) -> Result<GenerationResult, TransportError> {
        let endpoint = self.endpoint();
        let response = self
            .http
            .post(&endpoint)
            .json(request)
            .send()
            .await
            .map_err(|err| TransportError::Network(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorBody>(&body)
                .ok()
                .and_then(ErrorBody::into_message)
                .unwrap_or_else(|| format!("generation request failed with status {status}"));
            warn!(%endpoint, status = status.as_u16(), %message, "generation request rejected");
            return Err(TransportError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|err| TransportError::Network(err.to_string()))?;
        let result: GenerationResult =
            serde_json::from_slice(&body).map_err(|err| TransportError::Decode(err.to_string()))?;
        validate_result(&result)?;

        info!(
            %endpoint,
            execution_time = result.execution_time,
            clips = result.result.video.clips.len(),
            "generation response received"
        );
        Ok(result)
    }
}

fn validate_result(result: &GenerationResult) -> Result<(), TransportError> {
    if result.result.video.url.trim().is_empty() {
        return Err(TransportError::Decode("video url is missing".to_string()));
    }
    Ok(())
}

#[cfg(test)]
#[path = "tests/transport_tests.rs"]
mod tests;
