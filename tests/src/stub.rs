//! Local stand-in for the spreadsheet web app, bound to an ephemeral port.

use axum::{
    body::Bytes,
    extract::State,
    http::{header::CONTENT_TYPE, HeaderMap, StatusCode},
    routing::get,
    Json, Router,
};
use parking_lot::Mutex;
use serde_json::Value;
use std::sync::Arc;
use tokio::net::TcpListener;

/// What the stub answers to GET.
#[derive(Clone)]
pub enum Listing {
    Records(Vec<Value>),
    /// A JSON body that is not an array.
    Body(Value),
    Status(StatusCode),
}

#[derive(Clone)]
struct StubState {
    appended: Arc<Mutex<Vec<Appended>>>,
    listing: Arc<Mutex<Listing>>,
    append_status: Arc<Mutex<StatusCode>>,
}

/// One POST as the stub received it.
#[derive(Clone, Debug)]
pub struct Appended {
    pub content_type: Option<String>,
    pub body: Bytes,
}

/// A running stub sheet.
pub struct StubSheet {
    pub url: String,
    state: StubState,
}

impl StubSheet {
    /// Start a stub listening on 127.0.0.1 with an empty listing.
    pub async fn start() -> Self {
        let state = StubState {
            appended: Arc::new(Mutex::new(Vec::new())),
            listing: Arc::new(Mutex::new(Listing::Records(Vec::new()))),
            append_status: Arc::new(Mutex::new(StatusCode::OK)),
        };

        let app = Router::new()
            .route("/exec", get(list).post(append))
            .with_state(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind stub listener");
        let addr = listener.local_addr().expect("Stub has no local address");
        tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        Self {
            url: format!("http://{}/exec", addr),
            state,
        }
    }

    /// Payloads received by POST, decoded, in arrival order.
    pub fn appended(&self) -> Vec<Value> {
        self.appended_raw()
            .iter()
            .map(|a| serde_json::from_slice(&a.body).expect("Appended body is not JSON"))
            .collect()
    }

    /// Requests received by POST, as sent.
    pub fn appended_raw(&self) -> Vec<Appended> {
        self.state.appended.lock().clone()
    }

    pub fn set_listing(&self, listing: Listing) {
        *self.state.listing.lock() = listing;
    }

    pub fn set_append_status(&self, status: StatusCode) {
        *self.state.append_status.lock() = status;
    }
}

async fn append(
    State(state): State<StubState>,
    headers: HeaderMap,
    body: Bytes,
) -> (StatusCode, Json<Value>) {
    let status = *state.append_status.lock();
    if status.is_success() {
        let content_type = headers
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        state.appended.lock().push(Appended { content_type, body });
    }
    (status, Json(serde_json::json!({ "result": "success" })))
}

async fn list(State(state): State<StubState>) -> (StatusCode, Json<Value>) {
    let listing = state.listing.lock().clone();
    match listing {
        Listing::Records(records) => (StatusCode::OK, Json(Value::Array(records))),
        Listing::Body(body) => (StatusCode::OK, Json(body)),
        Listing::Status(status) => (status, Json(serde_json::json!({ "result": "error" }))),
    }
}
