//! End-to-end tests for the chat HTTP API.
//!
//! These tests spin up the **real** Axum router on an OS-assigned ephemeral
//! port and drive it with `reqwest`. The completion endpoint is replaced by
//! scripted clients and the clipboard by an in-memory one.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tokio::sync::Notify;

use chatmark_agent::{AgentError, ChatSession, CompletionClient, FALLBACK_REPLY, Turn};
use chatmark_render::{Clipboard, CopyRegistry, MemoryClipboard, RenderError, ReplyRenderer};
use chatmark_web::{WebConfig, WebServer};

// ── helpers ──────────────────────────────────────────────────────────────────

struct ScriptedClient {
    replies: Mutex<Vec<chatmark_agent::Result<String>>>,
}

impl ScriptedClient {
    fn new(replies: Vec<chatmark_agent::Result<String>>) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies.into_iter().rev().collect()),
        })
    }
}

#[async_trait]
impl CompletionClient for ScriptedClient {
    async fn complete(&self, _turns: &[Turn]) -> chatmark_agent::Result<String> {
        self.replies
            .lock()
            .unwrap()
            .pop()
            .unwrap_or(Err(AgentError::EmptyReply))
    }
}

struct GatedClient {
    started: Notify,
    release: Notify,
}

#[async_trait]
impl CompletionClient for GatedClient {
    async fn complete(&self, _turns: &[Turn]) -> chatmark_agent::Result<String> {
        self.started.notify_one();
        self.release.notified().await;
        Ok("finally".into())
    }
}

struct UnavailableClipboard;

impl Clipboard for UnavailableClipboard {
    fn write_text(&self, _text: &str) -> chatmark_render::Result<()> {
        Err(RenderError::Clipboard {
            reason: "no display server".into(),
        })
    }
}

/// Bind to 127.0.0.1:0, start the router, return (base_url, clipboard).
async fn start_test_server(client: Arc<dyn CompletionClient>) -> (String, Arc<MemoryClipboard>) {
    let clipboard = Arc::new(MemoryClipboard::new());
    let base = start_server_with_clipboard(client, clipboard.clone()).await;
    (base, clipboard)
}

async fn start_server_with_clipboard(
    client: Arc<dyn CompletionClient>,
    clipboard: Arc<dyn Clipboard>,
) -> String {
    let renderer = ReplyRenderer::new(Arc::new(CopyRegistry::new()), clipboard);
    let session = Arc::new(ChatSession::new(client, renderer));
    let app = WebServer::new(WebConfig::default(), session).router();

    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind to port 0");
    let addr: SocketAddr = listener.local_addr().expect("get local addr");
    let base = format!("http://127.0.0.1:{}", addr.port());

    tokio::spawn(async move {
        axum::serve(listener, app).await.ok();
    });

    base
}

async fn post_chat(base: &str, message: &str) -> reqwest::Response {
    reqwest::Client::new()
        .post(format!("{base}/api/chat"))
        .json(&json!({"message": message}))
        .send()
        .await
        .expect("request failed")
}

async fn get_json(url: String) -> Value {
    reqwest::get(url)
        .await
        .expect("request failed")
        .json()
        .await
        .expect("invalid JSON")
}

fn copy_id(html: &str) -> String {
    html.split("data-copy-id=\"")
        .nth(1)
        .and_then(|rest| rest.split('"').next())
        .expect("copy id in reply")
        .to_owned()
}

// ── GET / ────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn index_serves_page() {
    let (base, _) = start_test_server(ScriptedClient::new(vec![])).await;

    let resp = reqwest::get(format!("{base}/")).await.expect("request failed");
    assert_eq!(resp.status(), 200);

    let content_type = resp
        .headers()
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_owned();
    assert!(content_type.contains("text/html"));

    let body = resp.text().await.expect("failed to read body");
    assert!(body.contains("<title>chatmark</title>"));
}

// ── POST /api/chat ───────────────────────────────────────────────────────────

#[tokio::test]
async fn chat_round_trip() {
    let (base, _) =
        start_test_server(ScriptedClient::new(vec![Ok("The answer is **4**.".into())])).await;

    let resp = post_chat(&base, "2+2?").await;
    assert_eq!(resp.status(), 200);
    let turn: Value = resp.json().await.expect("invalid JSON");
    assert_eq!(turn["speaker"], "assistant");
    assert!(
        turn["content"]
            .as_str()
            .unwrap()
            .contains("The answer is <strong>4</strong>.")
    );

    let messages = get_json(format!("{base}/api/messages")).await;
    let messages = messages.as_array().unwrap();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0], json!({"speaker": "user", "content": "2+2?"}));
    assert_eq!(messages[1], turn);
}

#[tokio::test]
async fn chat_failure_returns_fallback_turn() {
    let (base, _) = start_test_server(ScriptedClient::new(vec![Err(
        AgentError::LlmRequestFailed {
            reason: "timeout".into(),
        },
    )]))
    .await;

    let resp = post_chat(&base, "hello").await;
    assert_eq!(resp.status(), 200);
    let turn: Value = resp.json().await.expect("invalid JSON");
    assert_eq!(turn["content"], FALLBACK_REPLY);
}

#[tokio::test]
async fn blank_chat_is_bad_request() {
    let (base, _) = start_test_server(ScriptedClient::new(vec![])).await;

    let resp = post_chat(&base, "   ").await;
    assert_eq!(resp.status(), 400);

    let messages = get_json(format!("{base}/api/messages")).await;
    assert!(messages.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn concurrent_chat_is_conflict() {
    let client = Arc::new(GatedClient {
        started: Notify::new(),
        release: Notify::new(),
    });
    let (base, _) = start_test_server(client.clone()).await;

    let first = tokio::spawn({
        let base = base.clone();
        async move { post_chat(&base, "slow one").await.status() }
    });
    client.started.notified().await;

    let status = get_json(format!("{base}/api/status")).await;
    assert_eq!(status["loading"], true);

    let resp = post_chat(&base, "impatient").await;
    assert_eq!(resp.status(), 409);

    client.release.notify_one();
    assert_eq!(first.await.unwrap(), 200);

    let status = get_json(format!("{base}/api/status")).await;
    assert_eq!(status["loading"], false);
    assert_eq!(status["turns"], 2);
}

// ── POST /api/new ────────────────────────────────────────────────────────────

#[tokio::test]
async fn new_chat_clears_messages() {
    let (base, _) = start_test_server(ScriptedClient::new(vec![Ok("hi".into())])).await;
    post_chat(&base, "hello").await;

    let resp = reqwest::Client::new()
        .post(format!("{base}/api/new"))
        .send()
        .await
        .expect("request failed");
    assert_eq!(resp.status(), 200);

    let messages = get_json(format!("{base}/api/messages")).await;
    assert!(messages.as_array().unwrap().is_empty());
}

// ── POST /api/copy/{id} ──────────────────────────────────────────────────────

#[tokio::test]
async fn copy_writes_code_to_clipboard() {
    let (base, clipboard) = start_test_server(ScriptedClient::new(vec![Ok(
        "Try this:\n\n```sh\necho \"a < b\"\n```\n".into(),
    )]))
    .await;

    let turn: Value = post_chat(&base, "shell?").await.json().await.unwrap();
    let id = copy_id(turn["content"].as_str().unwrap());

    let resp = reqwest::Client::new()
        .post(format!("{base}/api/copy/{id}"))
        .send()
        .await
        .expect("request failed");
    assert_eq!(resp.status(), 200);

    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["copied"], true);
    assert_eq!(body["text"], "echo \"a < b\"\n");
    assert_eq!(clipboard.contents().as_deref(), Some("echo \"a < b\"\n"));
}

#[tokio::test]
async fn copy_without_clipboard_still_returns_text() {
    let base = start_server_with_clipboard(
        ScriptedClient::new(vec![Ok("```py\nprint(1 & 2)\n```".into())]),
        Arc::new(UnavailableClipboard),
    )
    .await;

    let turn: Value = post_chat(&base, "python?").await.json().await.unwrap();
    let id = copy_id(turn["content"].as_str().unwrap());

    let resp = reqwest::Client::new()
        .post(format!("{base}/api/copy/{id}"))
        .send()
        .await
        .expect("request failed");
    assert_eq!(resp.status(), 200);

    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["copied"], false);
    assert_eq!(body["text"], "print(1 & 2)\n");
    assert!(body["error"].as_str().unwrap().contains("no display server"));
}

#[tokio::test]
async fn stale_copy_id_is_not_found() {
    let (base, clipboard) = start_test_server(ScriptedClient::new(vec![
        Ok("```\nfirst\n```".into()),
        Ok("no code here".into()),
    ]))
    .await;

    let turn: Value = post_chat(&base, "one").await.json().await.unwrap();
    let stale = copy_id(turn["content"].as_str().unwrap());
    post_chat(&base, "two").await;

    let resp = reqwest::Client::new()
        .post(format!("{base}/api/copy/{stale}"))
        .send()
        .await
        .expect("request failed");
    assert_eq!(resp.status(), 404);
    assert!(clipboard.contents().is_none());
}
