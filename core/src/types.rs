use serde::{Deserialize, Serialize};

/// The sentinel text the generation path uses for both a failed call and a
/// payload without a `response` field.
pub const FAILED_SENTINEL: &str = "Failed.";

/// One prompt bound for the generation endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    pub prompt_text: String,
    pub model_id: String,
    /// Output format hint forwarded to the endpoint (`"json"` in structured mode).
    pub format: Option<String>,
}

impl GenerationRequest {
    pub fn new(prompt_text: impl Into<String>, model_id: impl Into<String>) -> Self {
        Self {
            prompt_text: prompt_text.into(),
            model_id: model_id.into(),
            format: None,
        }
    }

    pub fn with_format(mut self, format: Option<&str>) -> Self {
        self.format = format.map(str::to_string);
        self
    }

    pub(crate) fn to_wire(&self) -> GenerateRequest<'_> {
        GenerateRequest {
            model: &self.model_id,
            prompt: &self.prompt_text,
            stream: false,
            format: self.format.as_deref(),
        }
    }
}

/// Outcome of a single generation call as seen by callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum GenerationResult {
    Success { text: String },
    Failure { reason: String },
}

impl GenerationResult {
    pub fn success(text: impl Into<String>) -> Self {
        Self::Success { text: text.into() }
    }

    pub fn failure(reason: impl Into<String>) -> Self {
        Self::Failure {
            reason: reason.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// Generated text, if the call succeeded.
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Success { text } => Some(text),
            Self::Failure { .. } => None,
        }
    }

    /// Whether the presentation layer should report this as a failure.
    ///
    /// A `Success` carrying the `"Failed."` placeholder is indistinguishable
    /// from a real failure at this level, so any text containing `"Failed"`
    /// counts.
    pub fn looks_failed(&self) -> bool {
        match self {
            Self::Success { text } => text.contains("Failed"),
            Self::Failure { .. } => true,
        }
    }
}

/// Request body for the `/api/generate` endpoint
#[derive(Serialize, Debug)]
pub(crate) struct GenerateRequest<'a> {
    pub model: &'a str,
    pub prompt: &'a str,
    pub stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<&'a str>,
}

/// Response body from the `/api/generate` endpoint; unknown fields are ignored
#[derive(Deserialize, Debug, Default)]
pub(crate) struct GenerateResponse {
    #[serde(default)]
    pub response: Option<String>,
}
