//! In-process stand-in for the marketplace API, for tests.
//!
//! Every request gets the same canned [`Reply`] and is recorded for
//! assertions.

use std::sync::{Arc, Mutex};

use axum::Router;
use axum::body::{Body, Bytes};
use axum::extract::State;
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderMap, Method, Uri};
use axum::response::Response;
use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;

use crate::config::ClientConfig;
use crate::net::gateway::Gateway;
use crate::state::auth::SessionHandle;

#[derive(Debug, Clone)]
pub(crate) struct Reply {
    pub status: u16,
    pub content_type: Option<&'static str>,
    pub body: String,
}

impl Reply {
    pub fn json(value: &serde_json::Value) -> Self {
        Self { status: 200, content_type: Some("application/json"), body: value.to_string() }
    }

    pub fn text(status: u16, body: &str) -> Self {
        Self { status, content_type: Some("text/plain"), body: body.to_owned() }
    }

    pub fn raw(status: u16, content_type: Option<&'static str>, body: &str) -> Self {
        Self { status, content_type, body: body.to_owned() }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct Captured {
    pub method: Method,
    pub path: String,
    pub query: Option<String>,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl Captured {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    pub fn json(&self) -> serde_json::Value {
        serde_json::from_slice(&self.body).unwrap()
    }
}

#[derive(Clone)]
struct FakeState {
    reply: Arc<Reply>,
    captured: Arc<Mutex<Vec<Captured>>>,
}

pub(crate) struct FakeApi {
    pub base_url: String,
    captured: Arc<Mutex<Vec<Captured>>>,
}

impl FakeApi {
    pub async fn start(reply: Reply) -> Self {
        let captured = Arc::new(Mutex::new(Vec::new()));
        let state = FakeState { reply: Arc::new(reply), captured: captured.clone() };
        let app = Router::new().fallback(handle).with_state(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { base_url: format!("http://{addr}"), captured }
    }

    /// Gateway pointed at this fake with a fresh, empty session handle.
    pub fn gateway(&self) -> Gateway {
        Gateway::new(&ClientConfig::new(&self.base_url), SessionHandle::default()).unwrap()
    }

    pub fn requests(&self) -> Vec<Captured> {
        self.captured.lock().unwrap().clone()
    }

    pub fn last(&self) -> Captured {
        self.requests().pop().expect("no request captured")
    }
}

async fn handle(State(state): State<FakeState>, method: Method, uri: Uri, headers: HeaderMap, body: Bytes) -> Response {
    state.captured.lock().unwrap().push(Captured {
        method,
        path: uri.path().to_owned(),
        query: uri.query().map(str::to_owned),
        headers,
        body: body.to_vec(),
    });

    let mut builder = Response::builder().status(state.reply.status);
    if let Some(content_type) = state.reply.content_type {
        builder = builder.header(CONTENT_TYPE, content_type);
    }
    builder.body(Body::from(state.reply.body.clone())).unwrap()
}

/// Unsigned JWT carrying `claims` as its payload.
pub(crate) fn token_for(claims: &serde_json::Value) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(claims.to_string());
    format!("{header}.{payload}.c2lnbmF0dXJl")
}
