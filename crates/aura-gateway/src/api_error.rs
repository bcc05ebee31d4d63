//! HTTP mapping for pipeline errors: each `AuraError` kind gets its own status.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use aura_core::AuraError;

/// Response body is always `{ "detail": "<message>" }`.
#[derive(Debug)]
pub struct ApiError(pub AuraError);

impl From<AuraError> for ApiError {
    fn from(err: AuraError) -> Self {
        ApiError(err)
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            AuraError::MissingCredential => StatusCode::INTERNAL_SERVER_ERROR,
            AuraError::NoEntries => StatusCode::BAD_REQUEST,
            AuraError::MalformedBody(_) | AuraError::Validation { .. } => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            AuraError::Prompt(_) | AuraError::Gateway(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn detail(&self) -> String {
        match &self.0 {
            AuraError::MissingCredential | AuraError::NoEntries => self.0.to_string(),
            AuraError::MalformedBody(reason) => format!("Invalid request body: {}", reason),
            AuraError::Validation { field, reason } => {
                format!("Invalid entry: {}: {}", field, reason)
            }
            other => format!("Analysis failed: {}", other),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let detail = self.detail();
        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), %detail, "Analysis request failed");
        } else {
            tracing::warn!(status = status.as_u16(), %detail, "Analysis request rejected");
        }
        (status, Json(serde_json::json!({ "detail": detail }))).into_response()
    }
}
