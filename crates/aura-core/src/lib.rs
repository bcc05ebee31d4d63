//! Aura core library.
//! Journal entry validation, prompt templates, and the Gemini analysis gateway.

pub mod analysis_gateway;
pub mod analysis_service;
pub mod config;
pub mod entry;
pub mod error;
pub mod gemini_service;
pub mod prompts;

pub use analysis_gateway::{AnalysisGateway, MockGateway, RetryPolicy};
pub use analysis_service::{AnalysisResult, AnalysisService};
pub use config::{AuraConfig, LlmMode};
pub use entry::{day_count, AnalysisRequest, Entry};
pub use error::{AuraError, AuraResult, GatewayError};
pub use gemini_service::GeminiGateway;
pub use prompts::{PromptBuilder, PromptTemplate};

pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
