use async_trait::async_trait;
use royal_core::errors::ApplicationError;
use thiserror::Error;

use crate::schema::ResponseSchema;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum LlmError {
    #[error("AI credential is not configured (set ROYAL_AI_API_KEY or API_KEY)")]
    MissingCredential,
    #[error("AI transport failure: {0}")]
    Transport(String),
    #[error("AI endpoint returned status {status}: {body}")]
    Endpoint { status: u16, body: String },
    #[error("AI endpoint response could not be decoded: {0}")]
    Decode(String),
    #[error("AI endpoint response carried no text")]
    EmptyResponse,
}

impl From<LlmError> for ApplicationError {
    fn from(value: LlmError) -> Self {
        match value {
            LlmError::MissingCredential => Self::Configuration(value.to_string()),
            other => Self::Integration(other.to_string()),
        }
    }
}

/// Text generation endpoint. One outstanding request per call, no retries.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Free-text completion of a natural-language prompt.
    async fn complete(&self, prompt: &str) -> Result<String, LlmError>;

    /// Completion constrained to JSON matching `schema`. Returns the raw JSON
    /// text; callers own parsing and validation.
    async fn complete_structured(
        &self,
        prompt: &str,
        schema: &ResponseSchema,
    ) -> Result<String, LlmError>;
}
