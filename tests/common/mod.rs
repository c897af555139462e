use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::{
    Form, Json, Router,
    extract::{Path, State},
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde_json::Value;
use tokio::net::TcpListener;

/// Fake animevost: `info` and `playlist` keyed by the posted id, plus
/// `/media/{name}` with range support.
#[derive(Default)]
pub struct FakeSite {
    pub info: HashMap<String, Value>,
    pub playlist: HashMap<String, Value>,
    pub media: HashMap<String, Vec<u8>>,
    pub hits: Mutex<Vec<String>>,
}

impl FakeSite {
    pub fn hits(&self) -> Vec<String> {
        self.hits.lock().unwrap().clone()
    }
}

pub struct Running {
    pub site: Arc<FakeSite>,
    pub base: String,
}

impl Running {
    pub fn api_url(&self) -> String {
        format!("{}api/", self.base)
    }
}

/// Binds first so `build` can embed media urls (`<base>media/<name>`) in
/// the playlist bodies.
pub async fn start(build: impl FnOnce(&str) -> FakeSite) -> Running {
    let listener = TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0)))
        .await
        .unwrap();
    let base = format!("http://{}/", listener.local_addr().unwrap());

    let site = Arc::new(build(&base));
    let app = Router::new()
        .route("/api/info", post(info))
        .route("/api/playlist", post(playlist))
        .route("/media/{name}", get(media))
        .with_state(Arc::clone(&site));
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    Running { site, base }
}

async fn info(
    State(site): State<Arc<FakeSite>>,
    Form(form): Form<HashMap<String, String>>,
) -> Response {
    let id = form.get("id").cloned().unwrap_or_default();
    site.hits.lock().unwrap().push(format!("info {}", id));
    match site.info.get(&id) {
        Some(body) => Json(body.clone()).into_response(),
        None => Json(serde_json::json!({"state": {"status": "error"}})).into_response(),
    }
}

async fn playlist(
    State(site): State<Arc<FakeSite>>,
    Form(form): Form<HashMap<String, String>>,
) -> Response {
    let id = form.get("id").cloned().unwrap_or_default();
    site.hits.lock().unwrap().push(format!("playlist {}", id));
    Json(site.playlist.get(&id).cloned().unwrap_or(Value::Array(vec![]))).into_response()
}

async fn media(
    State(site): State<Arc<FakeSite>>,
    Path(name): Path<String>,
    headers: HeaderMap,
) -> Response {
    site.hits.lock().unwrap().push(format!("media {}", name));
    let Some(body) = site.media.get(&name) else {
        return StatusCode::NOT_FOUND.into_response();
    };

    let start = headers
        .get(header::RANGE)
        .and_then(|value| value.to_str().ok())
        .and_then(|r| r.strip_prefix("bytes=")?.strip_suffix('-')?.parse::<usize>().ok());

    match start {
        None => (StatusCode::OK, body.clone()).into_response(),
        Some(start) if start >= body.len() => StatusCode::RANGE_NOT_SATISFIABLE.into_response(),
        Some(start) => (StatusCode::PARTIAL_CONTENT, body[start..].to_vec()).into_response(),
    }
}
