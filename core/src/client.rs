use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::time::Duration;
use tracing::{debug, warn};

use crate::config::StudyConfig;
use crate::errors::{StudyError, StudyResult};
use crate::types::*;

/// Anything that can turn a prompt into generated text
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Issue one generation request; never fails, failures are folded into the result.
    async fn generate(&self, request: &GenerationRequest) -> GenerationResult;

    /// Model identifier requests should carry
    fn model_name(&self) -> String;
}

/// Client for a local `/api/generate` endpoint
#[derive(Debug, Clone)]
pub struct GenerationClient {
    client: Client,
    endpoint: String,
    model_name: String,
}

impl GenerationClient {
    /// Create a new generation client
    pub fn new(config: &StudyConfig) -> StudyResult<Self> {
        let mut builder = Client::builder();
        if let Some(secs) = config.request_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder.build().map_err(|e| {
            StudyError::Config(format!("Failed to build HTTP client: {}", e))
        })?;

        Ok(Self {
            client,
            endpoint: config.endpoint(),
            model_name: config.model_name(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Send one request and surface every failure mode as a distinct error.
    ///
    /// Only status 200 counts as success. A 200 body without `response` is
    /// [`StudyError::MalformedResponse`].
    pub async fn try_generate(&self, request: &GenerationRequest) -> StudyResult<String> {
        debug!(
            model = %request.model_id,
            prompt_len = request.prompt_text.len(),
            "Sending generation request"
        );

        let response = self
            .client
            .post(&self.endpoint)
            .json(&request.to_wire())
            .send()
            .await
            .map_err(|e| StudyError::Transport(e.to_string()))?;

        let status = response.status();
        if status != StatusCode::OK {
            let error_body = response.text().await.unwrap_or_default();
            return Err(StudyError::Service {
                status_code: status.as_u16(),
                message: error_body,
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| StudyError::Transport(e.to_string()))?;
        let payload: GenerateResponse = serde_json::from_str(&body)
            .map_err(|e| StudyError::Parsing(format!("Failed to parse response: {}", e)))?;

        payload.response.ok_or_else(|| {
            StudyError::MalformedResponse("No 'response' field in payload".to_string())
        })
    }

    /// Convenience wrapper building the request from a bare prompt.
    pub async fn generate_text(&self, prompt_text: &str) -> GenerationResult {
        let request = GenerationRequest::new(prompt_text, self.model_name.clone());
        self.generate(&request).await
    }
}

/// Folds the typed outcome into the result shape callers see.
///
/// A missing `response` field becomes `Success { text: "Failed." }`, which
/// downstream code cannot tell apart from a failure except by inspecting the
/// text.
pub fn fold_outcome(outcome: StudyResult<String>) -> GenerationResult {
    match outcome {
        Ok(text) => GenerationResult::success(text),
        Err(StudyError::MalformedResponse(msg)) => {
            warn!("{}; substituting placeholder text", msg);
            GenerationResult::success(FAILED_SENTINEL)
        }
        Err(StudyError::Service { status_code, .. }) => {
            warn!(status_code, "Generation endpoint returned an error status");
            GenerationResult::failure(FAILED_SENTINEL)
        }
        Err(e) => {
            warn!(error = %e, "Generation request failed");
            GenerationResult::failure(e.to_string())
        }
    }
}

#[async_trait]
impl TextGenerator for GenerationClient {
    async fn generate(&self, request: &GenerationRequest) -> GenerationResult {
        fold_outcome(self.try_generate(request).await)
    }

    fn model_name(&self) -> String {
        self.model_name.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fold_outcome_mapping() {
        assert_eq!(
            fold_outcome(Ok("hello".to_string())),
            GenerationResult::success("hello")
        );
        assert_eq!(
            fold_outcome(Err(StudyError::Service {
                status_code: 503,
                message: "busy".to_string()
            })),
            GenerationResult::failure("Failed.")
        );
        assert_eq!(
            fold_outcome(Err(StudyError::MalformedResponse("missing".to_string()))),
            GenerationResult::success("Failed.")
        );

        let transport = fold_outcome(Err(StudyError::Transport("connection refused".to_string())));
        match transport {
            GenerationResult::Failure { reason } => assert!(reason.contains("connection refused")),
            other => panic!("expected failure, got {:?}", other),
        }
    }

    #[test]
    fn test_client_uses_config() {
        let config = StudyConfig {
            endpoint: Some("http://127.0.0.1:9/api/generate".to_string()),
            model_name: Some("mistral".to_string()),
            ..StudyConfig::default()
        };
        let client = GenerationClient::new(&config).unwrap();
        assert_eq!(client.endpoint(), "http://127.0.0.1:9/api/generate");
        assert_eq!(client.model_name(), "mistral");
    }
}
