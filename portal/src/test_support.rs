//! Shared fixtures: unsigned token builder and an in-process mock backend.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use axum::Router;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, Method, StatusCode, Uri, header::AUTHORIZATION};
use axum::response::{IntoResponse, Response};
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde_json::{Value, json};
use tokio::sync::mpsc::{self, UnboundedReceiver};

use crate::config::ClientConfig;
use crate::net::api::{ApiClient, ClientEvent};
use crate::state::session::SessionStore;
use crate::state::storage::MemoryStorage;

/// Build a `header.payload.signature` token around `claims`. The signature
/// is junk; the client never checks it.
pub(crate) fn make_token(claims: &Value) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(claims.to_string());
    let signature = URL_SAFE_NO_PAD.encode(b"test-signature");
    format!("{header}.{payload}.{signature}")
}

/// One request as the mock backend saw it.
#[derive(Debug, Clone)]
pub(crate) struct Recorded {
    pub method: String,
    pub path: String,
    pub query: Option<String>,
    pub authorization: Option<String>,
    pub body: Value,
}

#[derive(Default)]
struct MockState {
    routes: Mutex<HashMap<(String, String), VecDeque<(u16, Value)>>>,
    requests: Mutex<Vec<Recorded>>,
}

/// Canned-response HTTP server on an ephemeral port.
///
/// Each `(method, path)` holds a queue of responses: the front is popped
/// while more than one remains, then the last one repeats. Unknown routes
/// answer 404 with an `error` body.
pub(crate) struct MockBackend {
    pub api_url: String,
    state: Arc<MockState>,
}

impl MockBackend {
    pub async fn start() -> Self {
        let state = Arc::new(MockState::default());
        let app = Router::new().fallback(handle).with_state(state.clone());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        Self {
            api_url: format!("http://{addr}/api/v1"),
            state,
        }
    }

    /// Queue a response for `method path` (path relative to `/api/v1`).
    pub fn respond(&self, method: &str, path: &str, status: u16, body: Value) -> &Self {
        self.state
            .routes
            .lock()
            .unwrap()
            .entry((method.to_owned(), format!("/api/v1{path}")))
            .or_default()
            .push_back((status, body));
        self
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.state.requests.lock().unwrap().clone()
    }

    /// Requests matching `method path` (path relative to `/api/v1`).
    pub fn requests_to(&self, method: &str, path: &str) -> Vec<Recorded> {
        let full = format!("/api/v1{path}");
        self.requests()
            .into_iter()
            .filter(|r| r.method == method && r.path == full)
            .collect()
    }

    pub fn config(&self) -> ClientConfig {
        let dir = std::env::temp_dir().join(format!("portal-test-{}", uuid::Uuid::new_v4()));
        ClientConfig::new(&self.api_url, dir)
    }

    /// API client over fresh in-memory session storage.
    pub fn client(&self) -> (ApiClient, Arc<SessionStore>, UnboundedReceiver<ClientEvent>) {
        let session = Arc::new(SessionStore::open(MemoryStorage::new()));
        let (tx, rx) = mpsc::unbounded_channel();
        let api = ApiClient::new(&self.config(), session.clone(), tx).unwrap();
        (api, session, rx)
    }
}

async fn handle(
    State(state): State<Arc<MockState>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let path = uri.path().to_owned();
    state.requests.lock().unwrap().push(Recorded {
        method: method.to_string(),
        path: path.clone(),
        query: uri.query().map(str::to_owned),
        authorization: headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned),
        body: serde_json::from_slice(&body).unwrap_or(Value::Null),
    });

    let canned = {
        let mut routes = state.routes.lock().unwrap();
        routes.get_mut(&(method.to_string(), path)).and_then(|queue| {
            if queue.len() > 1 {
                queue.pop_front()
            } else {
                queue.front().cloned()
            }
        })
    };

    match canned {
        Some((status, body)) => {
            let status = StatusCode::from_u16(status).unwrap();
            if body.is_null() {
                status.into_response()
            } else {
                (status, axum::Json(body)).into_response()
            }
        }
        None => {
            (StatusCode::NOT_FOUND, axum::Json(json!({ "error": "not found" }))).into_response()
        }
    }
}

/// Backend-shaped ticket JSON.
pub(crate) fn ticket_json(id: i64, status: &str) -> Value {
    json!({
        "id": id,
        "flight_id": 3,
        "passenger_id": 11,
        "seat_no": null,
        "price": 199.5,
        "status": status,
        "created_at": "2026-02-01T10:00:00Z",
    })
}

/// Backend-shaped flight JSON.
pub(crate) fn flight_json(id: i64, flight_no: &str) -> Value {
    json!({
        "id": id,
        "flight_no": flight_no,
        "origin": "SGN",
        "destination": "HAN",
        "departure_time": "2026-04-01T08:30:00Z",
        "arrival_time": "2026-04-01T10:40:00+07:00",
        "status": "SCHEDULED",
        "version": 1,
        "created_at": "2026-01-01T00:00:00Z",
        "updated_at": "2026-01-01T00:00:00Z",
        "total_seats": 180,
        "base_price": 120.0,
    })
}
