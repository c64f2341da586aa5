use async_trait::async_trait;
use reqwest::Client;
use royal_core::config::AiConfig;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::llm::{LlmClient, LlmError};
use crate::schema::ResponseSchema;

const API_KEY_HEADER: &str = "x-goog-api-key";
const ERROR_BODY_LIMIT: usize = 512;

/// `generateContent` client. The credential is only checked when a request is
/// made, so a client can be built before a key is configured.
#[derive(Clone, Debug)]
pub struct GeminiClient {
    http: Client,
    base_url: String,
    model: String,
    api_key: Option<SecretString>,
}

impl GeminiClient {
    pub fn new(
        base_url: impl Into<String>,
        model: impl Into<String>,
        api_key: Option<SecretString>,
    ) -> Result<Self, LlmError> {
        let http = Client::builder().build().map_err(|err| LlmError::Transport(err.to_string()))?;
        let mut base_url = base_url.into();
        let trimmed_len = base_url.trim_end_matches('/').len();
        base_url.truncate(trimmed_len);

        Ok(Self { http, base_url, model: model.into(), api_key })
    }

    pub fn from_config(config: &AiConfig) -> Result<Self, LlmError> {
        Self::new(config.base_url.clone(), config.model.clone(), config.credential().cloned())
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!("{}/v1beta/models/{}:generateContent", self.base_url, self.model)
    }

    async fn generate(
        &self,
        prompt: &str,
        generation_config: Option<GenerationConfig<'_>>,
    ) -> Result<String, LlmError> {
        let api_key = self
            .api_key
            .as_ref()
            .filter(|key| !key.expose_secret().trim().is_empty())
            .ok_or(LlmError::MissingCredential)?;

        let structured = generation_config.is_some();
        let request = GenerateContentRequest {
            contents: vec![Content { role: "user", parts: vec![Part { text: prompt }] }],
            generation_config,
        };

        debug!(
            event_name = "ai.request.sent",
            model = %self.model,
            structured,
            "sending generation request"
        );

        let response = self
            .http
            .post(self.endpoint())
            .header(API_KEY_HEADER, api_key.expose_secret())
            .json(&request)
            .send()
            .await
            .map_err(|err| LlmError::Transport(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let mut body = response.text().await.unwrap_or_default();
            if body.len() > ERROR_BODY_LIMIT {
                let mut cut = ERROR_BODY_LIMIT;
                while !body.is_char_boundary(cut) {
                    cut -= 1;
                }
                body.truncate(cut);
            }
            warn!(
                event_name = "ai.request.rejected",
                model = %self.model,
                status = status.as_u16(),
                "generation endpoint returned an error status"
            );
            return Err(LlmError::Endpoint { status: status.as_u16(), body });
        }

        let payload: GenerateContentResponse =
            response.json().await.map_err(|err| LlmError::Decode(err.to_string()))?;
        payload.text().ok_or(LlmError::EmptyResponse)
    }
}

#[async_trait]
impl LlmClient for GeminiClient {
    async fn complete(&self, prompt: &str) -> Result<String, LlmError> {
        self.generate(prompt, None).await
    }

    async fn complete_structured(
        &self,
        prompt: &str,
        schema: &ResponseSchema,
    ) -> Result<String, LlmError> {
        let config =
            GenerationConfig { response_mime_type: "application/json", response_schema: schema };
        self.generate(prompt, Some(config)).await
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig<'a>>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    role: &'static str,
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig<'a> {
    response_mime_type: &'static str,
    response_schema: &'a ResponseSchema,
}

#[derive(Debug, Default, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

impl GenerateContentResponse {
    /// Concatenated text parts of the first candidate.
    fn text(self) -> Option<String> {
        let content = self.candidates.into_iter().next()?.content?;
        let texts: Vec<String> = content.parts.into_iter().filter_map(|part| part.text).collect();
        if texts.is_empty() {
            None
        } else {
            Some(texts.concat())
        }
    }
}
