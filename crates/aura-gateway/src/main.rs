//! Aura Gateway: journal pattern analysis API.
//! One analysis route backed by Gemini; no persistence, no auth.

mod api_error;
mod handlers;

use std::sync::Arc;
use std::time::Instant;

use axum::{
    body::Body,
    http::{HeaderValue, Method, Request},
    middleware::Next,
    response::Response,
    routing::{get, post},
    Router,
};
use aura_core::{AnalysisService, AuraConfig};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Clone)]
pub struct AppState {
    pub service: Arc<AnalysisService>,
}

#[tokio::main]
async fn main() {
    // Keys stay in the backend; the frontend never sees GEMINI_API_KEY.
    if let Err(e) = dotenvy::dotenv() {
        eprintln!("[aura-gateway] .env not loaded: {} (using system environment)", e);
    }

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = match AuraConfig::load() {
        Ok(c) => c,
        Err(e) => {
            tracing::error!(error = %e, "Invalid configuration");
            std::process::exit(1);
        }
    };
    if !config.has_api_key() {
        tracing::warn!(
            "GEMINI_API_KEY is not set; analysis requests will return 500 until it is configured"
        );
    }

    let service = match AnalysisService::from_config(&config) {
        Ok(s) => s,
        Err(e) => {
            tracing::error!(error = %e, "Could not build the analysis gateway");
            std::process::exit(1);
        }
    };

    let state = AppState {
        service: Arc::new(service),
    };
    let app = build_app(state, &config.cors_origins);

    let addr = config.bind_addr();
    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(l) => l,
        Err(e) => {
            tracing::error!(%addr, error = %e, "Could not bind");
            std::process::exit(1);
        }
    };

    tracing::info!(
        %addr,
        version = aura_core::version(),
        template = %config.template,
        llm_mode = ?config.llm_mode,
        model = %config.model,
        "Aura API listening"
    );

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        tracing::error!(error = %e, "Server error");
        std::process::exit(1);
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "Ctrl-C handler unavailable");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}

fn build_app(state: AppState, cors_origins: &[String]) -> Router {
    Router::new()
        .route("/", get(handlers::status))
        .route("/api/v1/analyze-patterns", post(handlers::analyze_patterns))
        .with_state(state)
        .layer(cors_layer(cors_origins))
        .layer(axum::middleware::from_fn(log_requests))
}

/// CORS allow-list from config. `*` allows any origin; unparsable entries are skipped.
fn cors_layer(origins: &[String]) -> CorsLayer {
    let allow_origin = if origins.iter().any(|o| o.trim() == "*") {
        AllowOrigin::any()
    } else {
        let values: Vec<HeaderValue> = origins
            .iter()
            .filter_map(|o| match HeaderValue::from_str(o.trim()) {
                Ok(v) => Some(v),
                Err(_) => {
                    tracing::warn!(origin = %o, "Ignoring invalid CORS origin");
                    None
                }
            })
            .collect();
        AllowOrigin::list(values)
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any)
}

async fn log_requests(request: Request<Body>, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let started = Instant::now();
    let response = next.run(request).await;
    tracing::info!(
        %method,
        %path,
        status = response.status().as_u16(),
        latency_ms = started.elapsed().as_millis() as u64,
        "request"
    );
    response
}
