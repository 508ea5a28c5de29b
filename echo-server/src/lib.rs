use std::collections::BTreeMap;

use axum::{
    body::Bytes,
    extract::RawQuery,
    http::{header, HeaderMap, Method, StatusCode},
    routing::{any, delete, get, patch, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;

/// What the server saw, decoded the way an application server would.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Echo {
    pub method: String,
    pub args: BTreeMap<String, String>,
    pub headers: BTreeMap<String, String>,
    pub form: BTreeMap<String, String>,
    pub json: Option<serde_json::Value>,
    pub data: String,
}

pub fn app() -> Router {
    Router::new()
        .route("/get", get(echo))
        .route("/post", post(echo))
        .route("/put", put(echo))
        .route("/patch", patch(echo))
        .route("/delete", delete(echo))
        .route("/anything", any(echo))
        .route("/anything/{*rest}", any(echo))
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

fn decode_pairs(input: &[u8]) -> BTreeMap<String, String> {
    url::form_urlencoded::parse(input).into_owned().collect()
}

async fn echo(
    method: Method,
    headers: HeaderMap,
    RawQuery(query): RawQuery,
    body: Bytes,
) -> Result<Json<Echo>, (StatusCode, String)> {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();

    let form = if content_type.starts_with("application/x-www-form-urlencoded") {
        decode_pairs(&body)
    } else {
        BTreeMap::new()
    };

    let json = if content_type.starts_with("application/json") {
        let value = serde_json::from_slice(&body)
            .map_err(|e| (StatusCode::BAD_REQUEST, format!("invalid JSON body: {e}")))?;
        Some(value)
    } else {
        None
    };

    let headers = headers
        .iter()
        .filter_map(|(name, value)| Some((name.to_string(), value.to_str().ok()?.to_string())))
        .collect();

    tracing::debug!(%method, query = query.as_deref().unwrap_or(""), body_len = body.len(), "echo");

    Ok(Json(Echo {
        method: method.to_string(),
        args: query.map(|q| decode_pairs(q.as_bytes())).unwrap_or_default(),
        headers,
        form,
        json,
        data: String::from_utf8_lossy(&body).into_owned(),
    }))
}
