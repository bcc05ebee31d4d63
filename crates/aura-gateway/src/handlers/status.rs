use axum::Json;

/// GET /: liveness only.
pub async fn status() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "Aura API is running" }))
}
