//! Request pipeline: credential gate, empty gate, validation, prompt, gateway call.
//!
//! Each step is a hard gate; nothing reaches the gateway unless every earlier step passed.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::analysis_gateway::{AnalysisGateway, MockGateway};
use crate::config::{AuraConfig, LlmMode};
use crate::entry::{day_count, AnalysisRequest};
use crate::error::{AuraError, AuraResult, GatewayError};
use crate::gemini_service::GeminiGateway;
use crate::prompts::{PromptBuilder, PromptTemplate};

/// Successful analysis, serialized as the response body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub analysis: String,
    pub entries_analyzed: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analysis_type: Option<String>,
}

pub struct AnalysisService {
    api_key: Option<String>,
    prompts: PromptBuilder,
    gateway: Arc<dyn AnalysisGateway>,
}

impl AnalysisService {
    /// Service with an explicit gateway. Credential and template come from `config`.
    pub fn new(config: &AuraConfig, gateway: Arc<dyn AnalysisGateway>) -> Self {
        Self {
            api_key: config.gemini_api_key.clone(),
            prompts: PromptBuilder::new(config.template),
            gateway,
        }
    }

    /// Service with the gateway selected by `llm_mode`.
    pub fn from_config(config: &AuraConfig) -> Result<Self, GatewayError> {
        let gateway: Arc<dyn AnalysisGateway> = match config.llm_mode {
            LlmMode::Live => Arc::new(GeminiGateway::from_config(config)?),
            LlmMode::Mock => Arc::new(MockGateway::default()),
        };
        Ok(Self::new(config, gateway))
    }

    pub fn template(&self) -> PromptTemplate {
        self.prompts.template()
    }

    pub fn gateway_name(&self) -> &str {
        self.gateway.name()
    }

    /// The credential, or `MissingCredential`.
    pub fn ensure_configured(&self) -> AuraResult<&str> {
        self.api_key.as_deref().ok_or(AuraError::MissingCredential)
    }

    /// Full pipeline from a raw JSON body. The credential is checked before the body is parsed.
    pub async fn analyze_payload(&self, body: &[u8]) -> AuraResult<AnalysisResult> {
        self.ensure_configured()?;
        let request = AnalysisRequest::from_slice(body)?;
        self.analyze(request).await
    }

    pub async fn analyze(&self, request: AnalysisRequest) -> AuraResult<AnalysisResult> {
        let api_key = self.ensure_configured()?;
        if request.is_empty() {
            return Err(AuraError::NoEntries);
        }
        request.validate()?;

        let entries = request.entries;
        let days = day_count(&entries);
        let prompt = self.prompts.render(&entries, days)?;

        tracing::info!(
            entries = entries.len(),
            days,
            template = %self.prompts.template(),
            gateway = self.gateway.name(),
            "Analyzing journal entries"
        );

        let analysis = self.gateway.generate(&prompt, api_key).await?;

        Ok(AnalysisResult {
            analysis,
            entries_analyzed: entries.len(),
            analysis_type: self.prompts.template().analysis_type().map(str::to_string),
        })
    }
}
