//! Gemini gateway: one `generateContent` call per analysis, with bounded retry.
//!
//! The credential travels in the `x-goog-api-key` header, never in the URL, so transport
//! errors (which include the URL) cannot leak it.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::analysis_gateway::{AnalysisGateway, RetryPolicy};
use crate::config::AuraConfig;
use crate::error::GatewayError;

const API_KEY_HEADER: &str = "x-goog-api-key";
/// Longest slice of a non-JSON error body carried into an error message.
const MAX_ERROR_BODY: usize = 300;

#[derive(Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<RequestContent<'a>>,
}

#[derive(Serialize)]
struct RequestContent<'a> {
    parts: Vec<RequestPart<'a>>,
}

#[derive(Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<CandidateContent>,
    finish_reason: Option<String>,
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
    message: Option<String>,
    status: Option<String>,
}

/// Live gateway to the Gemini Generative Language API.
pub struct GeminiGateway {
    api_base: String,
    model: String,
    timeout: Duration,
    retry: RetryPolicy,
    client: reqwest::Client,
}

impl GeminiGateway {
    /// Build from config: base URL, model, per-attempt timeout and retry policy.
    pub fn from_config(config: &AuraConfig) -> Result<Self, GatewayError> {
        let timeout = Duration::from_secs(config.request_timeout_secs);
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| GatewayError::Configuration(format!("HTTP client: {}", e)))?;
        Ok(Self {
            api_base: config.api_base.trim_end_matches('/').to_string(),
            model: config.model.trim().to_string(),
            timeout,
            retry: RetryPolicy::new(
                config.max_attempts,
                Duration::from_millis(config.retry_base_delay_ms),
            ),
            client,
        })
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.api_base, self.model)
    }

    async fn generate_once(&self, prompt: &str, api_key: &str) -> Result<String, GatewayError> {
        let body = GenerateContentRequest {
            contents: vec![RequestContent {
                parts: vec![RequestPart { text: prompt }],
            }],
        };

        let res = self
            .client
            .post(self.endpoint())
            .header(API_KEY_HEADER, api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = res.status();
        let text = res.text().await.map_err(|e| self.transport_error(e))?;

        if !status.is_success() {
            return Err(classify_failure(status.as_u16(), &text));
        }
        parse_generate_response(&text)
    }

    fn transport_error(&self, e: reqwest::Error) -> GatewayError {
        if e.is_timeout() {
            GatewayError::Timeout(self.timeout.as_secs())
        } else {
            GatewayError::Transport(e.to_string())
        }
    }
}

#[async_trait]
impl AnalysisGateway for GeminiGateway {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn generate(&self, prompt: &str, api_key: &str) -> Result<String, GatewayError> {
        let api_key = api_key.trim();
        if api_key.is_empty() {
            return Err(GatewayError::Configuration("Gemini API key is empty".into()));
        }

        let mut attempt = 1;
        loop {
            match self.generate_once(prompt, api_key).await {
                Ok(text) => {
                    tracing::debug!(attempt, model = %self.model, "Gemini reply received");
                    return Ok(text);
                }
                Err(e) if self.retry.should_retry(attempt, &e) => {
                    let delay = self.retry.delay_for(attempt);
                    tracing::warn!(
                        attempt,
                        max_attempts = self.retry.max_attempts,
                        delay_ms = delay.as_millis() as u64,
                        error = %e,
                        "Gemini call failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

/// Map a non-success response to an error kind. Rejected credentials are configuration
/// problems, not upstream ones.
pub fn classify_failure(status: u16, body: &str) -> GatewayError {
    let message = provider_message(body);
    let key_rejected = status == 401
        || status == 403
        || (status == 400 && body.contains("API_KEY_INVALID"));
    if key_rejected {
        GatewayError::Configuration(format!(
            "Gemini rejected the API key ({}): {}",
            status, message
        ))
    } else {
        GatewayError::Status { status, message }
    }
}

fn provider_message(body: &str) -> String {
    match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(ErrorEnvelope { error }) => match (error.status, error.message) {
            (Some(s), Some(m)) => format!("{}: {}", s, m),
            (None, Some(m)) => m,
            (Some(s), None) => s,
            (None, None) => "no error message".to_string(),
        },
        Err(_) => {
            let trimmed = body.trim();
            if trimmed.is_empty() {
                "empty response body".to_string()
            } else {
                trimmed.chars().take(MAX_ERROR_BODY).collect()
            }
        }
    }
}

/// Extract the reply text: all text parts of the first candidate, concatenated.
pub fn parse_generate_response(body: &str) -> Result<String, GatewayError> {
    let parsed: GenerateContentResponse = serde_json::from_str(body)
        .map_err(|e| GatewayError::MalformedResponse(e.to_string()))?;

    let Some(candidate) = parsed.candidates.into_iter().next() else {
        let reason = parsed
            .prompt_feedback
            .and_then(|f| f.block_reason)
            .map(|r| format!("prompt blocked: {}", r))
            .unwrap_or_else(|| "no candidates in response".to_string());
        return Err(GatewayError::MalformedResponse(reason));
    };

    let text: String = candidate
        .content
        .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();

    if text.is_empty() {
        let reason = candidate
            .finish_reason
            .map(|r| format!("empty candidate (finish reason {})", r))
            .unwrap_or_else(|| "empty candidate".to_string());
        return Err(GatewayError::MalformedResponse(reason));
    }
    Ok(text)
}
