//! Error types for the Aura analysis pipeline.

use thiserror::Error;

/// Result type alias for analysis operations.
pub type AuraResult<T> = Result<T, AuraError>;

/// Everything that can stop an analysis request.
#[derive(Error, Debug)]
pub enum AuraError {
    /// The provider credential is not configured. Deployment defect.
    #[error("GEMINI_API_KEY not found")]
    MissingCredential,

    #[error("No entries provided for analysis")]
    NoEntries,

    /// Body is not JSON, or a field is missing or mistyped. Carries the serde message.
    #[error("{0}")]
    MalformedBody(String),

    /// Well-formed entry with an out-of-range value.
    #[error("{field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("prompt rendering failed: {0}")]
    Prompt(String),

    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

impl AuraError {
    pub fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        AuraError::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// True for errors caused by the caller's payload.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            AuraError::NoEntries | AuraError::MalformedBody(_) | AuraError::Validation { .. }
        )
    }
}

/// Failures reported by an [`AnalysisGateway`](crate::AnalysisGateway).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GatewayError {
    /// Missing or rejected credential.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Provider returned a non-success status.
    #[error("Gemini API error {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Gemini request timed out after {0}s")]
    Timeout(u64),

    #[error("Gemini request failed: {0}")]
    Transport(String),

    /// Success status but no usable text in the body.
    #[error("Gemini response parse failed: {0}")]
    MalformedResponse(String),
}

impl GatewayError {
    /// Transient failures are worth another attempt; everything else is final.
    pub fn is_transient(&self) -> bool {
        match self {
            GatewayError::Timeout(_) | GatewayError::Transport(_) => true,
            GatewayError::Status { status, .. } => *status == 429 || *status >= 500,
            GatewayError::Configuration(_) | GatewayError::MalformedResponse(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transient_classification() {
        assert!(GatewayError::Timeout(60).is_transient());
        assert!(GatewayError::Transport("connection reset".into()).is_transient());
        assert!(GatewayError::Status { status: 429, message: "quota".into() }.is_transient());
        assert!(GatewayError::Status { status: 503, message: "busy".into() }.is_transient());
        assert!(!GatewayError::Status { status: 400, message: "bad".into() }.is_transient());
        assert!(!GatewayError::Configuration("rejected".into()).is_transient());
        assert!(!GatewayError::MalformedResponse("no candidates".into()).is_transient());
    }

    #[test]
    fn client_errors() {
        assert!(AuraError::NoEntries.is_client_error());
        assert!(AuraError::validation("entries[0].mood", "out of range").is_client_error());
        assert!(AuraError::MalformedBody("expected value at line 1 column 1".into()).is_client_error());
        assert!(!AuraError::MissingCredential.is_client_error());
        assert!(!AuraError::from(GatewayError::Timeout(1)).is_client_error());
    }

    #[test]
    fn messages_match_api_details() {
        assert_eq!(AuraError::MissingCredential.to_string(), "GEMINI_API_KEY not found");
        assert_eq!(AuraError::NoEntries.to_string(), "No entries provided for analysis");
        assert_eq!(
            AuraError::validation("entries[1].energy", "must be between 1 and 10, got 11").to_string(),
            "entries[1].energy: must be between 1 and 10, got 11"
        );
    }
}
