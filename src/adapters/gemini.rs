//! Gemini `generateContent` client implementing [`VisionClient`].

use crate::config::{ApiKey, VisionSettings};
use crate::domain::ports::VisionClient;
use crate::utils::error::{ModelErrorKind, Result, StyleError};
use async_trait::async_trait;
use base64::Engine;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tokio_util::sync::CancellationToken;

/// Substrings Gemini uses when it rejects the API key.
const INVALID_KEY_MARKERS: [&str; 2] = ["API key not valid", "API_KEY_INVALID"];

#[derive(Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
#[serde(untagged)]
enum Part<'a> {
    Text { text: &'a str },
    InlineData { inline_data: InlineData<'a> },
}

#[derive(Serialize)]
struct InlineData<'a> {
    mime_type: &'a str,
    data: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    candidates: Option<Vec<Candidate>>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    parts: Option<Vec<ResponsePart>>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

impl GenerateContentResponse {
    /// Text parts of the first candidate, joined in order.
    fn into_text(self) -> std::result::Result<String, String> {
        if let Some(reason) = self.prompt_feedback.and_then(|f| f.block_reason) {
            return Err(format!("request blocked by the model: {}", reason));
        }

        let text: String = self
            .candidates
            .and_then(|candidates| candidates.into_iter().next())
            .and_then(|candidate| candidate.content)
            .and_then(|content| content.parts)
            .unwrap_or_default()
            .into_iter()
            .filter_map(|part| part.text)
            .collect();

        if text.trim().is_empty() {
            Err("no text in model response".to_string())
        } else {
            Ok(text)
        }
    }
}

/// Maps an upstream failure message onto the error taxonomy.
pub fn classify_failure(message: &str) -> ModelErrorKind {
    if INVALID_KEY_MARKERS
        .iter()
        .any(|marker| message.contains(marker))
    {
        ModelErrorKind::InvalidCredential
    } else {
        ModelErrorKind::UpstreamFailure
    }
}

/// Error for a non-2xx reply. `body` is the response text or the reason it
/// could not be read.
fn http_failure(status: StatusCode, body: std::result::Result<String, String>) -> StyleError {
    match body {
        Ok(body) => {
            let detail = serde_json::from_str::<ErrorEnvelope>(&body)
                .map(|envelope| envelope.error.message)
                .unwrap_or_else(|_| body.clone());
            // The reason code sits in `details`, so classify on the raw body.
            let kind = classify_failure(&body);
            StyleError::model(kind, format!("HTTP {}: {}", status, detail))
        }
        Err(read_error) => StyleError::model(
            ModelErrorKind::UpstreamFailure,
            format!("HTTP {}: failed to read error body: {}", status, read_error),
        ),
    }
}

pub struct GeminiVisionClient {
    settings: VisionSettings,
    client: Client,
}

impl GeminiVisionClient {
    pub fn new(settings: VisionSettings) -> Self {
        Self {
            settings,
            client: Client::new(),
        }
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.settings.api_base_url.trim_end_matches('/'),
            self.settings.model
        )
    }

    async fn generate(
        &self,
        api_key: &ApiKey,
        image_data: &[u8],
        mime_type: &str,
        prompt: &str,
    ) -> Result<String> {
        let body = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![
                    Part::Text { text: prompt },
                    Part::InlineData {
                        inline_data: InlineData {
                            mime_type,
                            data: base64::engine::general_purpose::STANDARD.encode(image_data),
                        },
                    },
                ],
            }],
        };

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", api_key.expose())
            .json(&body)
            .timeout(self.settings.timeout)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.map_err(|e| e.to_string());
            return Err(http_failure(status, body));
        }

        let parsed: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| self.transport_error(e))?;

        parsed
            .into_text()
            .map(|text| text.trim().to_string())
            .map_err(|detail| StyleError::model(ModelErrorKind::UpstreamFailure, detail))
    }

    fn transport_error(&self, err: reqwest::Error) -> StyleError {
        if err.is_timeout() {
            return self.timeout_error();
        }
        let message = err.to_string();
        StyleError::model(classify_failure(&message), message)
    }

    fn timeout_error(&self) -> StyleError {
        StyleError::model(
            ModelErrorKind::Timeout,
            format!(
                "no response from the vision model within {}s",
                self.settings.timeout.as_secs()
            ),
        )
    }
}

#[async_trait]
impl VisionClient for GeminiVisionClient {
    async fn invoke(
        &self,
        image_data: &[u8],
        mime_type: &str,
        prompt: &str,
        cancel: &CancellationToken,
    ) -> Result<String> {
        let api_key = self
            .settings
            .credential
            .api_key()
            .ok_or_else(|| StyleError::ConfigError {
                message: "GEMINI_API_KEY is missing or still set to a placeholder".to_string(),
            })?;

        tracing::info!(
            model = %self.settings.model,
            image_bytes = image_data.len(),
            mime_type,
            "Calling vision model"
        );
        let started = Instant::now();

        let outcome = tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(StyleError::model(
                ModelErrorKind::Cancelled,
                "request was cancelled before the vision model answered",
            )),
            result = tokio::time::timeout(
                self.settings.timeout,
                self.generate(api_key, image_data, mime_type, prompt),
            ) => result.unwrap_or_else(|_| Err(self.timeout_error())),
        };

        let elapsed_ms = started.elapsed().as_millis() as u64;
        match &outcome {
            Ok(text) => tracing::info!(elapsed_ms, response_len = text.len(), "Vision model responded"),
            Err(err) => tracing::warn!(
                elapsed_ms,
                kind = err.model_error_kind().map(|k| k.as_str()),
                error = %err,
                "Vision model call failed"
            ),
        }
        outcome
    }

    fn model_name(&self) -> &str {
        &self.settings.model
    }

    fn is_configured(&self) -> bool {
        self.settings.credential.is_usable()
    }
}
