use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use forge_engine::{
    Completion, CompletionClient, CompletionError, CompletionSettings, EngineEvent, EngineHandle,
    FailureKind,
};
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::method;
use wiremock::{Mock, MockServer, ResponseTemplate};

const WAIT: Duration = Duration::from_secs(5);

/// Echoes the instruction back, or fails when it is "fail".
#[derive(Default)]
struct EchoClient {
    calls: AtomicUsize,
}

#[async_trait::async_trait]
impl CompletionClient for EchoClient {
    async fn complete(&self, instruction: &str) -> Result<Completion, CompletionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if instruction == "fail" {
            return Err(CompletionError {
                kind: FailureKind::Network,
                message: "connection refused".to_string(),
            });
        }
        Ok(Completion {
            text: format!("echo: {instruction}"),
            model: "echo".to_string(),
            finish_reason: None,
        })
    }
}

#[test]
fn submitted_request_comes_back_with_its_id() {
    let client = Arc::new(EchoClient::default());
    let engine = EngineHandle::with_client(client.clone()).expect("engine");

    engine.submit(7, "hello");
    let event = engine.recv_timeout(WAIT).expect("event");

    assert_eq!(
        event,
        EngineEvent::CompletionFinished {
            request_id: 7,
            result: Ok(Completion {
                text: "echo: hello".to_string(),
                model: "echo".to_string(),
                finish_reason: None,
            }),
        }
    );
    assert_eq!(client.calls.load(Ordering::SeqCst), 1);
}

#[test]
fn client_failure_is_delivered_as_event() {
    let engine = EngineHandle::with_client(Arc::new(EchoClient::default())).expect("engine");

    engine.submit(3, "fail");
    let EngineEvent::CompletionFinished { request_id, result } =
        engine.recv_timeout(WAIT).expect("event");

    assert_eq!(request_id, 3);
    assert_eq!(result.unwrap_err().kind, FailureKind::Network);
}

#[test]
fn nothing_arrives_without_submission() {
    let engine = EngineHandle::with_client(Arc::new(EchoClient::default())).expect("engine");
    assert!(engine.try_recv().is_none());
    assert!(engine.recv_timeout(Duration::from_millis(50)).is_none());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn gemini_engine_round_trip() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{ "content": { "parts": [{ "text": "<p>ok</p>" }] } }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let engine = EngineHandle::new(CompletionSettings {
        endpoint: server.uri(),
        api_key: Some("k".to_string()),
        ..CompletionSettings::default()
    })
    .expect("engine");

    engine.submit(1, "instruction");
    let event = tokio::task::spawn_blocking(move || engine.recv_timeout(WAIT))
        .await
        .unwrap();
    let EngineEvent::CompletionFinished { request_id, result } = event.expect("event");

    assert_eq!(request_id, 1);
    assert_eq!(result.expect("completion").text, "<p>ok</p>");
}
