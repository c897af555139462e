//! In-process HTTP fixtures for the downloader tests.

use std::collections::HashMap;
use std::io;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    Json, Router,
    body::Body,
    extract::{Path, State},
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use futures::StreamExt;
use serde_json::Value;
use tokio::net::TcpListener;

use crate::api::ApiClient;

/// Binds `app` to an ephemeral port and returns its base url with a
/// trailing slash.
pub async fn serve(app: Router) -> String {
    let listener = TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0)))
        .await
        .unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}/", addr)
}

/// API answering `info` and `playlist` with fixed bodies.
pub async fn mock_api(info: Value, playlist: Value) -> ApiClient {
    let app = Router::new()
        .route("/info", post(move || async move { Json(info) }))
        .route("/playlist", post(move || async move { Json(playlist) }));
    ApiClient::new(reqwest::Client::new(), serve(app).await)
}

#[derive(Default)]
pub struct MediaState {
    pub files: HashMap<String, Vec<u8>>,
    /// Answer range requests with the full body, like servers without
    /// range support.
    pub ignore_range: bool,
    /// Full-body requests for these names stop after the given number of
    /// bytes and the connection is dropped.
    pub cut_after: HashMap<String, usize>,
    /// `(file name, Range header)` of every request received.
    pub requests: Mutex<Vec<(String, Option<String>)>>,
}

impl MediaState {
    pub fn new(files: &[(&str, &[u8])]) -> Self {
        MediaState {
            files: files
                .iter()
                .map(|(name, body)| (name.to_string(), body.to_vec()))
                .collect(),
            ..Default::default()
        }
    }

    pub fn requests(&self) -> Vec<(String, Option<String>)> {
        self.requests.lock().unwrap().clone()
    }
}

/// Serves `/media/{name}` with `bytes=N-` range support. Unknown names are 404.
pub async fn serve_media(state: Arc<MediaState>) -> String {
    let app = Router::new()
        .route("/media/{name}", get(media))
        .with_state(state);
    format!("{}media/", serve(app).await)
}

async fn media(
    State(state): State<Arc<MediaState>>,
    Path(name): Path<String>,
    headers: HeaderMap,
) -> Response {
    let range = headers
        .get(header::RANGE)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);
    state.requests.lock().unwrap().push((name.clone(), range.clone()));

    let Some(body) = state.files.get(&name) else {
        return StatusCode::NOT_FOUND.into_response();
    };

    let start = range
        .filter(|_| !state.ignore_range)
        .and_then(|r| r.strip_prefix("bytes=")?.strip_suffix('-')?.parse::<usize>().ok());

    match start {
        None => match state.cut_after.get(&name) {
            Some(cut) => (StatusCode::OK, dropped_after(body[..*cut].to_vec())).into_response(),
            None => (StatusCode::OK, body.clone()).into_response(),
        },
        Some(start) if start >= body.len() => (
            StatusCode::RANGE_NOT_SATISFIABLE,
            [(header::CONTENT_RANGE, format!("bytes */{}", body.len()))],
        )
            .into_response(),
        Some(start) => (
            StatusCode::PARTIAL_CONTENT,
            [(
                header::CONTENT_RANGE,
                format!("bytes {}-{}/{}", start, body.len() - 1, body.len()),
            )],
            body[start..].to_vec(),
        )
            .into_response(),
    }
}

fn dropped_after(head: Vec<u8>) -> Body {
    let stream = futures::stream::iter([Ok::<_, io::Error>(head)]).chain(futures::stream::once(
        async {
            tokio::time::sleep(Duration::from_millis(50)).await;
            Err(io::Error::new(io::ErrorKind::ConnectionReset, "connection dropped"))
        },
    ));
    Body::from_stream(stream)
}
