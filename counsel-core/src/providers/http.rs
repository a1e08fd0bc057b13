//! HTTP gateway implementation using reqwest
//!
//! Thin I/O wrapper around the two provider APIs: OpenAI chat completions
//! and Gemini generateContent. Carries only the minimal contract the engine
//! needs (send prompt, obtain text); everything else about the wire formats
//! is deliberately ignored.

use async_trait::async_trait;
use reqwest::{Client, ClientBuilder, StatusCode};
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::catalog::{ModelId, ProviderKind};
use crate::config::{ApiKey, CounselConfig};
use crate::providers::adapter::Gateway;
use crate::providers::error::ProviderError;

const USER_AGENT: &str = concat!("counsel/", env!("CARGO_PKG_VERSION"));
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// Gateway over plain HTTPS with a pooled client.
pub struct HttpGateway {
    client: Client,
    openai_key: Option<ApiKey>,
    gemini_key: Option<ApiKey>,
    openai_base_url: String,
    google_base_url: String,
}

impl HttpGateway {
    /// Build a gateway from resolved configuration.
    pub fn new(config: &CounselConfig) -> Result<Self, ProviderError> {
        let client = ClientBuilder::new()
            .pool_max_idle_per_host(10)
            .pool_idle_timeout(Duration::from_secs(90))
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(REQUEST_TIMEOUT)
            .user_agent(USER_AGENT)
            .gzip(true)
            .build()
            .map_err(|e| {
                ProviderError::Configuration(format!("failed to build HTTP client: {}", e))
            })?;

        Ok(Self {
            client,
            openai_key: config.openai_api_key.clone(),
            gemini_key: config.gemini_api_key.clone(),
            openai_base_url: config.openai_base_url.clone(),
            google_base_url: config.google_base_url.clone(),
        })
    }

    fn key_for(&self, provider: ProviderKind) -> Result<&ApiKey, ProviderError> {
        let key = match provider {
            ProviderKind::OpenAI => self.openai_key.as_ref(),
            ProviderKind::Google => self.gemini_key.as_ref(),
        };
        key.ok_or_else(|| {
            ProviderError::Authentication(format!("no API key configured for {}", provider))
        })
    }

    async fn invoke_openai(
        &self,
        model: ModelId,
        prompt: &str,
        system: Option<&str>,
    ) -> Result<String, ProviderError> {
        let request_id = Uuid::new_v4();
        let url = format!("{}/chat/completions", self.openai_base_url);

        let mut messages = Vec::with_capacity(2);
        if let Some(system) = system {
            messages.push(json!({"role": "system", "content": system}));
        }
        messages.push(json!({"role": "user", "content": prompt}));
        let body = json!({"model": model.as_str(), "messages": messages});

        debug!(%request_id, url = %url, model = model.as_str(), "openai request");
        let response = self
            .client
            .post(&url)
            .bearer_auth(self.key_for(ProviderKind::OpenAI)?.expose_secret())
            .header("X-Request-ID", request_id.to_string())
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.ok();
            warn!(%request_id, status = status.as_u16(), "openai request failed");
            return Err(map_status(status, body));
        }

        let parsed: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::Parse(e.to_string()))?;
        let text = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| {
                ProviderError::Parse("chat completion contained no message content".to_string())
            })?;

        info!(%request_id, model = model.as_str(), "openai request completed");
        Ok(text)
    }

    async fn invoke_gemini(
        &self,
        model: ModelId,
        prompt: &str,
        system: Option<&str>,
    ) -> Result<String, ProviderError> {
        let request_id = Uuid::new_v4();
        let url = format!(
            "{}/models/{}:generateContent",
            self.google_base_url,
            model.as_str()
        );

        let mut body = json!({
            "contents": [{"role": "user", "parts": [{"text": prompt}]}]
        });
        if let Some(system) = system {
            body["system_instruction"] = json!({"parts": [{"text": system}]});
        }

        debug!(%request_id, url = %url, model = model.as_str(), "gemini request");
        let response = self
            .client
            .post(&url)
            .header(
                "x-goog-api-key",
                self.key_for(ProviderKind::Google)?.expose_secret(),
            )
            .header("X-Request-ID", request_id.to_string())
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.ok();
            warn!(%request_id, status = status.as_u16(), "gemini request failed");
            return Err(map_status(status, body));
        }

        let parsed: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::Parse(e.to_string()))?;
        let text: String = parsed
            .candidates
            .into_iter()
            .next()
            .map(|c| {
                c.content
                    .parts
                    .into_iter()
                    .filter_map(|p| p.text)
                    .collect::<Vec<_>>()
                    .join("")
            })
            .filter(|t| !t.is_empty())
            .ok_or_else(|| {
                ProviderError::Parse("generateContent returned no candidate text".to_string())
            })?;

        info!(%request_id, model = model.as_str(), "gemini request completed");
        Ok(text)
    }
}

#[async_trait]
impl Gateway for HttpGateway {
    async fn invoke(
        &self,
        model: ModelId,
        prompt: &str,
        system: Option<&str>,
    ) -> Result<String, ProviderError> {
        match model.provider() {
            ProviderKind::OpenAI => self.invoke_openai(model, prompt, system).await,
            ProviderKind::Google => self.invoke_gemini(model, prompt, system).await,
        }
    }
}

/// Map a non-success HTTP status (and optional body) to a provider error.
fn map_status(status: StatusCode, body: Option<String>) -> ProviderError {
    let message = body
        .as_ref()
        .and_then(|b| serde_json::from_str::<Value>(b).ok())
        .and_then(|v| extract_error_message(&v))
        .or(body)
        .unwrap_or_else(|| format!("HTTP error {}", status.as_u16()));

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ProviderError::Authentication(message),
        StatusCode::TOO_MANY_REQUESTS => ProviderError::RateLimit(message),
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => {
            ProviderError::Timeout(REQUEST_TIMEOUT.as_secs())
        }
        status => ProviderError::Upstream {
            status: status.as_u16(),
            message,
        },
    }
}

/// Pull a human-readable message from a provider error body.
///
/// Both providers nest it under `error.message`; a top-level `message` is
/// accepted as a fallback.
fn extract_error_message(json: &Value) -> Option<String> {
    if let Some(message) = json
        .get("error")
        .and_then(|e| e.get("message"))
        .and_then(|m| m.as_str())
    {
        return Some(message.to_string());
    }
    json.get("message")
        .and_then(|m| m.as_str())
        .map(String::from)
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}
