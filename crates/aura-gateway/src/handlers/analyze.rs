//! Pattern analysis handler.
//!
//! The analysis body is taken as raw bytes so the credential gate runs before any parsing;
//! `AnalysisService::analyze_payload` does the strict parse afterwards.

use axum::body::Bytes;
use axum::extract::State;
use axum::Json;
use aura_core::AnalysisResult;

use crate::api_error::ApiError;
use crate::AppState;

/// POST /api/v1/analyze-patterns
pub async fn analyze_patterns(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<AnalysisResult>, ApiError> {
    let result = state.service.analyze_payload(&body).await?;
    tracing::info!(
        entries_analyzed = result.entries_analyzed,
        analysis_chars = result.analysis.len(),
        "Analysis complete"
    );
    Ok(Json(result))
}
