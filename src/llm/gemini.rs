//! Google Gemini bridge implementation

use super::{Credential, ProviderRole, ProviderTurn, RemoteBridge, RemoteError};
use crate::persona::SYSTEM_PROMPT;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
const MAX_OUTPUT_TOKENS: i32 = 512;
const TEMPERATURE: f32 = 0.9;

/// Gemini bridge
pub struct GeminiBridge {
    client: Client,
    url: String,
    model_id: String,
}

impl GeminiBridge {
    /// `base_url` overrides the public endpoint (gateway or test server)
    pub fn new(model: &str, base_url: Option<&str>, timeout: Duration) -> Result<Self, RemoteError> {
        let base = base_url.unwrap_or(DEFAULT_BASE_URL).trim_end_matches('/');
        let url = format!("{base}/v1beta/models/{model}:generateContent");

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| RemoteError::network(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            url,
            model_id: model.to_string(),
        })
    }

    fn translate_request(history: &[ProviderTurn], new_input: &str) -> GeminiRequest {
        let mut contents: Vec<GeminiContent> = Vec::with_capacity(history.len() + 1);

        let turns = history
            .iter()
            .map(|turn| (turn.role, turn.text.as_str()))
            .chain(std::iter::once((ProviderRole::User, new_input)));

        for (role, text) in turns {
            let role = match role {
                ProviderRole::User => "user",
                ProviderRole::Model => "model",
            };
            let part = GeminiPart {
                text: text.to_string(),
            };

            // Adjacent turns from the same speaker travel as one content
            match contents.last_mut() {
                Some(last) if last.role.as_deref() == Some(role) => last.parts.push(part),
                _ => contents.push(GeminiContent {
                    role: Some(role.to_string()),
                    parts: vec![part],
                }),
            }
        }

        GeminiRequest {
            contents,
            system_instruction: Some(GeminiContent {
                role: None,
                parts: vec![GeminiPart {
                    text: SYSTEM_PROMPT.to_string(),
                }],
            }),
            generation_config: Some(GeminiGenerationConfig {
                max_output_tokens: Some(MAX_OUTPUT_TOKENS),
                temperature: Some(TEMPERATURE),
            }),
        }
    }

    fn normalize_response(resp: GeminiResponse) -> Result<String, RemoteError> {
        if let Some(reason) = resp.prompt_feedback.and_then(|f| f.block_reason) {
            return Err(RemoteError::invalid_request(format!("Prompt blocked: {reason}")));
        }

        let candidate = resp
            .candidates
            .into_iter()
            .next()
            .ok_or_else(|| RemoteError::malformed("No candidates in response"))?;

        let text = candidate
            .content
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .map(|part| part.text)
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default();

        let text = text.trim();
        if text.is_empty() {
            let reason = candidate.finish_reason.unwrap_or_else(|| "unknown".to_string());
            return Err(RemoteError::malformed(format!(
                "Empty reply (finish reason: {reason})"
            )));
        }

        Ok(text.to_string())
    }
}

/// Map a non-success HTTP status to an error kind
fn status_error(status: StatusCode, message: &str) -> RemoteError {
    match status.as_u16() {
        400 => RemoteError::invalid_request(format!("Invalid request: {message}")),
        401 | 403 => RemoteError::auth(format!("Authentication failed: {message}")),
        429 => RemoteError::quota(format!("Rate limit exceeded: {message}")),
        500..=599 => RemoteError::server_error(format!("Server error: {message}")),
        _ => RemoteError::malformed(format!("HTTP {status}: {message}")),
    }
}

#[async_trait]
impl RemoteBridge for GeminiBridge {
    async fn send(
        &self,
        credential: &Credential,
        history: &[ProviderTurn],
        new_input: &str,
    ) -> Result<String, RemoteError> {
        let gemini_request = Self::translate_request(history, new_input);

        let response = self
            .client
            .post(&self.url)
            .header("Content-Type", "application/json")
            .header("x-goog-api-key", credential.expose())
            .json(&gemini_request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    RemoteError::timeout(format!("Request timeout: {e}"))
                } else if e.is_connect() {
                    RemoteError::network(format!("Connection failed: {e}"))
                } else {
                    RemoteError::network(format!("Request failed: {e}"))
                }
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            if e.is_timeout() {
                RemoteError::timeout(format!("Timed out reading response: {e}"))
            } else {
                RemoteError::network(format!("Failed to read response: {e}"))
            }
        })?;

        if !status.is_success() {
            let message = serde_json::from_str::<GeminiErrorResponse>(&body)
                .map_or(body, |error_resp| error_resp.error.message);
            return Err(status_error(status, &message));
        }

        let gemini_response: GeminiResponse = serde_json::from_str(&body).map_err(|e| {
            RemoteError::malformed(format!("Failed to parse response: {e} - body: {body}"))
        })?;

        Self::normalize_response(gemini_response)
    }

    fn model_id(&self) -> &str {
        &self.model_id
    }
}

// Gemini API types

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<GeminiContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GeminiGenerationConfig>,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiContent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiPart {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiGenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    max_output_tokens: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
    #[serde(default)]
    prompt_feedback: Option<GeminiPromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiCandidate {
    #[serde(default)]
    content: Option<GeminiContent>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiPromptFeedback {
    block_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorResponse {
    error: GeminiError,
}

#[derive(Debug, Deserialize)]
struct GeminiError {
    message: String,
}
