//! Integration test: GeminiGateway against a local stand-in for the Gemini API.
//!
//! The stand-in is a throwaway axum server on 127.0.0.1:0 that replays a scripted list of
//! responses, one per request, and records the path, key header and body it received.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, Uri};
use axum::Router;
use aura_core::{AnalysisGateway, AuraConfig, GatewayError, GeminiGateway};

#[derive(Clone)]
struct Scripted {
    status: u16,
    body: &'static str,
    delay: Duration,
}

fn reply(status: u16, body: &'static str) -> Scripted {
    Scripted {
        status,
        body,
        delay: Duration::ZERO,
    }
}

#[derive(Clone, Default)]
struct FakeGemini {
    script: Arc<Vec<Scripted>>,
    hits: Arc<AtomicUsize>,
    last_path: Arc<Mutex<Option<String>>>,
    last_key: Arc<Mutex<Option<String>>>,
    last_body: Arc<Mutex<Option<serde_json::Value>>>,
}

async fn fake_handler(
    State(fake): State<FakeGemini>,
    headers: HeaderMap,
    uri: Uri,
    body: String,
) -> (StatusCode, String) {
    let n = fake.hits.fetch_add(1, Ordering::SeqCst);
    *fake.last_path.lock().unwrap() = Some(uri.path().to_string());
    *fake.last_key.lock().unwrap() = headers
        .get("x-goog-api-key")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    *fake.last_body.lock().unwrap() = serde_json::from_str(&body).ok();

    let step = fake.script[n.min(fake.script.len() - 1)].clone();
    if !step.delay.is_zero() {
        tokio::time::sleep(step.delay).await;
    }
    (StatusCode::from_u16(step.status).unwrap(), step.body.to_string())
}

async fn spawn_fake(script: Vec<Scripted>) -> (String, FakeGemini) {
    let fake = FakeGemini {
        script: Arc::new(script),
        ..FakeGemini::default()
    };
    let app = Router::new()
        .fallback(fake_handler)
        .with_state(fake.clone());
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("http://{}/v1beta", addr), fake)
}

fn gateway(api_base: &str, max_attempts: u32, timeout_secs: u64) -> GeminiGateway {
    let config = AuraConfig {
        api_base: api_base.to_string(),
        model: "gemini-test".to_string(),
        request_timeout_secs: timeout_secs,
        max_attempts,
        retry_base_delay_ms: 5,
        ..AuraConfig::default()
    };
    GeminiGateway::from_config(&config).unwrap()
}

const OK_BODY: &str = r#"{"candidates":[{"content":{"parts":[{"text":"Looks stable."}],"role":"model"},"finishReason":"STOP"}]}"#;

#[tokio::test]
async fn sends_prompt_and_key_header() {
    let (base, fake) = spawn_fake(vec![reply(200, OK_BODY)]).await;
    let text = gateway(&base, 3, 5)
        .generate("the whole prompt", "AIza-test-key")
        .await
        .unwrap();

    assert_eq!(text, "Looks stable.");
    assert_eq!(fake.hits.load(Ordering::SeqCst), 1);
    assert_eq!(
        fake.last_path.lock().unwrap().as_deref(),
        Some("/v1beta/models/gemini-test:generateContent")
    );
    assert_eq!(fake.last_key.lock().unwrap().as_deref(), Some("AIza-test-key"));
    let body = fake.last_body.lock().unwrap().clone().unwrap();
    assert_eq!(body["contents"][0]["parts"][0]["text"], "the whole prompt");
}

#[tokio::test]
async fn retries_transient_failures() {
    let (base, fake) = spawn_fake(vec![
        reply(503, r#"{"error":{"code":503,"message":"The model is overloaded.","status":"UNAVAILABLE"}}"#),
        reply(429, r#"{"error":{"code":429,"message":"quota","status":"RESOURCE_EXHAUSTED"}}"#),
        reply(200, OK_BODY),
    ])
    .await;

    let text = gateway(&base, 3, 5).generate("p", "key").await.unwrap();
    assert_eq!(text, "Looks stable.");
    assert_eq!(fake.hits.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn persistent_failure_is_reported_after_budget() {
    let (base, fake) = spawn_fake(vec![reply(
        500,
        r#"{"error":{"code":500,"message":"internal","status":"INTERNAL"}}"#,
    )])
    .await;

    let err = gateway(&base, 3, 5).generate("p", "key").await.unwrap_err();
    assert_eq!(fake.hits.load(Ordering::SeqCst), 3);
    assert_eq!(
        err,
        GatewayError::Status {
            status: 500,
            message: "INTERNAL: internal".into()
        }
    );
}

#[tokio::test]
async fn rejected_key_is_not_retried() {
    let (base, fake) = spawn_fake(vec![reply(
        400,
        r#"{"error":{"code":400,"message":"API key not valid. Please pass a valid API key.","status":"INVALID_ARGUMENT","details":[{"reason":"API_KEY_INVALID"}]}}"#,
    )])
    .await;

    let err = gateway(&base, 3, 5)
        .generate("p", "AIza-wrong-key")
        .await
        .unwrap_err();
    assert_eq!(fake.hits.load(Ordering::SeqCst), 1);
    assert!(matches!(err, GatewayError::Configuration(_)));
    assert!(!err.to_string().contains("AIza-wrong-key"));
}

#[tokio::test]
async fn blocked_prompt_is_not_retried() {
    let (base, fake) = spawn_fake(vec![reply(200, r#"{"promptFeedback":{"blockReason":"SAFETY"}}"#)]).await;

    let err = gateway(&base, 3, 5).generate("p", "key").await.unwrap_err();
    assert_eq!(fake.hits.load(Ordering::SeqCst), 1);
    assert!(matches!(err, GatewayError::MalformedResponse(_)));
}

#[tokio::test]
async fn slow_provider_times_out() {
    let (base, _fake) = spawn_fake(vec![Scripted {
        status: 200,
        body: OK_BODY,
        delay: Duration::from_secs(3),
    }])
    .await;

    let err = gateway(&base, 1, 1).generate("p", "key").await.unwrap_err();
    assert_eq!(err, GatewayError::Timeout(1));
}

#[tokio::test]
async fn unreachable_provider_is_transport_error() {
    // Bind then drop to get a port with nothing listening.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = gateway(&format!("http://{}/v1beta", addr), 2, 2)
        .generate("p", "AIza-secret")
        .await
        .unwrap_err();
    assert!(matches!(err, GatewayError::Transport(_)));
    assert!(!err.to_string().contains("AIza-secret"));
}
