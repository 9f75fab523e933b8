#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::Value;
use tower::ServiceExt;

use task_relay::config::Config;
use task_relay::llm::{ChatCompletion, CompletionRequest, LLMError, StructuredLLMInterface};
use task_relay::routes::build_app;
use task_relay::state::AppState;

pub const ALLOWED_ORIGIN: &str = "https://tasks.example";

type Reply = Box<dyn Fn(&CompletionRequest) -> Result<ChatCompletion, LLMError> + Send + Sync>;

/// LLM double that records every request and answers from a closure
pub struct RecordingLLM {
    reply: Reply,
    calls: Mutex<Vec<CompletionRequest>>,
}

impl RecordingLLM {
    pub fn new(
        reply: impl Fn(&CompletionRequest) -> Result<ChatCompletion, LLMError>
            + Send
            + Sync
            + 'static,
    ) -> Arc<Self> {
        Arc::new(Self {
            reply: Box::new(reply),
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn answering(content: &str) -> Arc<Self> {
        let content = content.to_string();
        Self::new(move |_| Ok(ChatCompletion::from_content(content.clone())))
    }

    /// Answers with the user message it was sent, i.e. an identity translation
    pub fn echoing() -> Arc<Self> {
        Self::new(|request| Ok(ChatCompletion::from_content(request.messages[1].content.clone())))
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn calls(&self) -> Vec<CompletionRequest> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl StructuredLLMInterface for RecordingLLM {
    async fn complete(&self, request: CompletionRequest) -> Result<ChatCompletion, LLMError> {
        let reply = (self.reply)(&request);
        self.calls.lock().unwrap().push(request);
        reply
    }
}

pub fn config(allowed_origins: &[&str], script_url: Option<String>) -> Config {
    let mut config = Config::default();
    config.cors.allowed_origins = allowed_origins.iter().map(|o| o.to_string()).collect();
    config.contact.script_url = script_url;
    config
}

pub fn app(config: Config, llm: Arc<RecordingLLM>) -> Router {
    build_app(AppState::with_llm(config, llm))
}

pub fn request(
    method: Method,
    uri: &str,
    origin: Option<&str>,
    body: Option<&str>,
) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(origin) = origin {
        builder = builder.header(header::ORIGIN, origin);
    }
    let body = match body {
        Some(body) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(body.to_string())
        }
        None => Body::empty(),
    };
    builder.body(body).unwrap()
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: axum::http::HeaderMap,
    pub bytes: Vec<u8>,
}

impl TestResponse {
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.bytes).unwrap()
    }

    pub fn error(&self) -> String {
        self.json()["error"].as_str().unwrap().to_string()
    }
}

pub async fn send(app: Router, request: Request<Body>) -> TestResponse {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec();
    TestResponse { status, headers, bytes }
}
